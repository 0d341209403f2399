//! Delegated credential validation against the remote authority.
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{StatusCode, header};
use url::Url;

use crate::services::auth::{AuthorizationOutcome, Credential};

/// Remote authority that decides whether a credential is valid.
///
/// Implementations must be safe to share across all request tasks and must
/// never resolve an ambiguous answer to `Authorized`.
#[async_trait]
pub trait Authority: Send + Sync {
    async fn validate(&self, credential: &Credential) -> AuthorizationOutcome;
}

/// `GET {base}/validate` with the credential forwarded as `Authorization`.
///
/// - 2xx => Authorized
/// - 401 => Rejected
/// - anything else (other status, connect error, timeout) => Unreachable
///
/// Exactly one attempt per call. The timeout is fixed at construction.
#[derive(Clone, Debug)]
pub struct HttpAuthority {
    client: reqwest::Client,
    validate_url: Url,
}

impl HttpAuthority {
    pub fn new(
        base_url: &Url,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            // A redirect is not an answer: 3xx must stay Unreachable
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let mut validate_url = base_url.clone();
        validate_url.set_path("/validate");
        validate_url.set_query(None);

        Ok(Self {
            client,
            validate_url,
        })
    }

    pub fn validate_url(&self) -> &Url {
        &self.validate_url
    }
}

#[async_trait]
impl Authority for HttpAuthority {
    async fn validate(&self, credential: &Credential) -> AuthorizationOutcome {
        let result = self
            .client
            .get(self.validate_url.clone())
            .header(header::AUTHORIZATION, credential.header_value())
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => AuthorizationOutcome::Authorized,
            Ok(response) if response.status() == StatusCode::UNAUTHORIZED => {
                AuthorizationOutcome::Rejected {
                    reason: "authority answered 401".to_string(),
                }
            }
            Ok(response) => AuthorizationOutcome::Unreachable {
                cause: format!("unexpected authority status {}", response.status()),
            },
            Err(err) if err.is_timeout() => AuthorizationOutcome::Unreachable {
                cause: "authority call timed out".to_string(),
            },
            Err(err) if err.is_connect() => AuthorizationOutcome::Unreachable {
                cause: format!("authority connection failed: {err}"),
            },
            Err(err) => AuthorizationOutcome::Unreachable {
                cause: format!("authority call failed: {err}"),
            },
        }
    }
}
