use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Result of asking the authority about one credential.
///
/// Every validation attempt resolves to exactly one of these; there is no
/// "maybe" state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Authorized,
    Rejected { reason: String },
    Unreachable { cause: String },
}

impl AuthorizationOutcome {
    /// Fold the outcome into a rejection, keeping `Authorized` as `Ok`.
    pub fn into_result(self) -> Result<(), AuthRejection> {
        match self {
            Self::Authorized => Ok(()),
            Self::Rejected { reason } => Err(AuthRejection::CredentialRejected(reason)),
            Self::Unreachable { cause } => Err(AuthRejection::AuthorityUnreachable(cause)),
        }
    }
}

/// What the filter does with the request.
///
/// `Forward` iff the outcome was `Authorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyDecision {
    Forward,
    ShortCircuit(StatusCode),
}

impl From<&Result<(), AuthRejection>> for ProxyDecision {
    fn from(result: &Result<(), AuthRejection>) -> Self {
        match result {
            Ok(()) => Self::Forward,
            Err(rejection) => Self::ShortCircuit(rejection.status()),
        }
    }
}

/// Why a request was refused at the gateway.
///
/// All variants are fail-closed and map to the same client contract:
/// `401 Unauthorized` with an empty body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("missing or malformed bearer credential")]
    MissingCredential,
    #[error("credential rejected by authority: {0}")]
    CredentialRejected(String),
    #[error("authority unreachable: {0}")]
    AuthorityUnreachable(String),
}

impl AuthRejection {
    pub fn status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    // Short, stable label for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::CredentialRejected(_) => "credential_rejected",
            Self::AuthorityUnreachable(_) => "authority_unreachable",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_authorized_forwards() {
        let forward = AuthorizationOutcome::Authorized.into_result();
        assert_eq!(ProxyDecision::from(&forward), ProxyDecision::Forward);

        let outcomes = [
            AuthorizationOutcome::Rejected {
                reason: "expired".into(),
            },
            AuthorizationOutcome::Unreachable {
                cause: "timeout".into(),
            },
        ];
        for outcome in outcomes {
            let result = outcome.into_result();
            assert_eq!(
                ProxyDecision::from(&result),
                ProxyDecision::ShortCircuit(StatusCode::UNAUTHORIZED)
            );
        }
    }

    #[test]
    fn outcome_maps_to_matching_rejection() {
        assert_eq!(
            AuthorizationOutcome::Rejected {
                reason: "expired".into()
            }
            .into_result(),
            Err(AuthRejection::CredentialRejected("expired".into()))
        );
        assert_eq!(
            AuthorizationOutcome::Unreachable {
                cause: "connection refused".into()
            }
            .into_result(),
            Err(AuthRejection::AuthorityUnreachable(
                "connection refused".into()
            ))
        );
    }

    #[tokio::test]
    async fn every_rejection_is_an_empty_401() {
        let rejections = [
            AuthRejection::MissingCredential,
            AuthRejection::CredentialRejected("expired".into()),
            AuthRejection::AuthorityUnreachable("timeout".into()),
        ];

        for rejection in rejections {
            let response = rejection.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            assert!(body.is_empty());
        }
    }
}
