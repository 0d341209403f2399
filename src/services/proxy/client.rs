// HTTP client used to forward authorized requests to upstream services.
//
// Handles:
// - request forwarding (method, headers, body, path after prefix strip, query)
// - response relaying (status, headers, body)
// - transport error reporting (caller maps it to 502)

use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, Request, Response, header},
};
use http_body_util::LengthLimitError;
use thiserror::Error;

use crate::services::proxy::Route;

// Connection-scoped headers: never forwarded in either direction.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
    header::PROXY_AUTHORIZATION,
];

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to read inbound body: {0}")]
    RequestBody(axum::Error),
    #[error("inbound body exceeds the configured limit")]
    BodyTooLarge,
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("failed to read upstream body: {0}")]
    UpstreamBody(reqwest::Error),
    #[error("failed to build response: {0}")]
    BuildResponse(#[from] axum::http::Error),
}

/// Shared upstream HTTP client (connection pool is process-wide).
#[derive(Clone, Debug)]
pub struct ServiceClient {
    client: reqwest::Client,
}

impl ServiceClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            // Redirects are the client's business, relay them as-is
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client })
    }

    /// Forward `request` to `route`'s upstream and relay whatever comes back.
    ///
    /// Non-2xx upstream statuses are NOT errors here; they are relayed.
    /// Only transport-level failures return `Err`.
    pub async fn forward(
        &self,
        route: &Route,
        request: Request<Body>,
    ) -> Result<Response<Body>, ProxyError> {
        let (parts, body) = request.into_parts();
        let target = route.target_url(parts.uri.path(), parts.uri.query());

        // Inbound size is already bounded by the body-limit layer
        let body_bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(request_body_error)?;

        let mut upstream_request = self
            .client
            .request(parts.method.clone(), target.clone())
            .headers(strip_hop_by_hop(&parts.headers));

        if !body_bytes.is_empty() {
            upstream_request = upstream_request.body(body_bytes);
        }

        tracing::debug!(
            route = route.name(),
            method = %parts.method,
            target = %target,
            "forwarding request"
        );

        let upstream_response = upstream_request.send().await?;
        let status = upstream_response.status();
        let headers = strip_hop_by_hop(upstream_response.headers());
        let body = upstream_response
            .bytes()
            .await
            .map_err(ProxyError::UpstreamBody)?;

        let mut response = Response::builder().status(status).body(Body::from(body))?;
        *response.headers_mut() = headers;

        Ok(response)
    }
}

// A body without Content-Length is only cut off by the limit layer while it is
// being read, so the overflow shows up here instead of as the layer's 413.
fn request_body_error(err: axum::Error) -> ProxyError {
    let over_limit = std::iter::successors(Some(&err as &dyn std::error::Error), |e| e.source())
        .any(|e| e.is::<LengthLimitError>());

    if over_limit {
        ProxyError::BodyTooLarge
    } else {
        ProxyError::RequestBody(err)
    }
}

fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in HOP_BY_HOP.iter() {
        out.remove(name);
    }
    out
}
