//! Authorization filter: bearer extraction -> authority check -> forward or 401.
//!
//! The continuation (`next`) is the proxied backend call. It runs at most once,
//! and only after the authority has answered `Authorized`. Every other path
//! (no credential, rejected, authority unreachable) short-circuits with an
//! empty `401` and never touches the backend.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::services::auth::{AuthRejection, Authority, ProxyDecision, extract_credential};
use crate::state::AppState;

/// Put the authorization filter in front of every route of `router`.
///
/// ```ignore
/// let patients = proxy_routes(route);
/// let patients = middleware::auth::access::apply(patients, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: unmatched paths fall through to the 404 fallback without an authority call
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

/// Extract the credential and ask the authority about it.
///
/// No network call is made when the credential is missing.
pub async fn authorize(
    authority: &dyn Authority,
    headers: &HeaderMap,
) -> Result<(), AuthRejection> {
    let credential = extract_credential(headers).ok_or(AuthRejection::MissingCredential)?;

    authority.validate(&credential).await.into_result()
}

async fn access_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let result = authorize(state.authority.as_ref(), req.headers()).await;

    if let Err(rejection) = &result {
        tracing::warn!(
            kind = rejection.kind(),
            error = %rejection,
            method = %req.method(),
            path = %req.uri().path(),
            "request rejected at gateway"
        );
    }

    match ProxyDecision::from(&result) {
        ProxyDecision::Forward => next.run(req).await,
        ProxyDecision::ShortCircuit(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        http::{StatusCode, header},
        routing::any,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::services::auth::{AuthorizationOutcome, Credential};
    use crate::services::proxy::ServiceClient;

    struct StubAuthority {
        outcome: AuthorizationOutcome,
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl StubAuthority {
        fn answering(outcome: AuthorizationOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Authority for StubAuthority {
        async fn validate(&self, credential: &Credential) -> AuthorizationOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push(credential.header_value().to_string());
            self.outcome.clone()
        }
    }

    /// Router with one protected route whose handler counts invocations and
    /// records how many authority calls had completed when it ran.
    fn protected_app(
        authority: Arc<StubAuthority>,
    ) -> (Router, Arc<AtomicUsize>, Arc<Mutex<Vec<usize>>>) {
        let backend_calls = Arc::new(AtomicUsize::new(0));
        let authority_calls_at_backend = Arc::new(Mutex::new(Vec::new()));

        let state = AppState::new(
            authority.clone(),
            ServiceClient::new(Duration::from_secs(1)).unwrap(),
            Vec::new(),
        );

        let counter = backend_calls.clone();
        let observed = authority_calls_at_backend.clone();
        let stub = authority.clone();
        let router = Router::new().route(
            "/protected",
            any(move || {
                let counter = counter.clone();
                let observed = observed.clone();
                let stub = stub.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    observed.lock().unwrap().push(stub.calls());
                    (StatusCode::OK, "backend says hi")
                }
            }),
        );

        let app = apply(router, state.clone()).with_state(state);
        (app, backend_calls, authority_calls_at_backend)
    }

    fn request(authorization: Option<&'static str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_of(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn missing_header_short_circuits_without_authority_call() {
        let authority = StubAuthority::answering(AuthorizationOutcome::Authorized);
        let (app, backend_calls, _) = protected_app(authority.clone());

        let response = app.oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_of(response).await.is_empty());
        assert_eq!(authority.calls(), 0);
        assert_eq!(backend_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_bearer_header_short_circuits_without_authority_call() {
        let authority = StubAuthority::answering(AuthorizationOutcome::Authorized);
        let (app, backend_calls, _) = protected_app(authority.clone());

        let response = app
            .oneshot(request(Some("Basic dXNlcjpwYXNz")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(authority.calls(), 0);
        assert_eq!(backend_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn authorized_runs_backend_once_after_decision() {
        let authority = StubAuthority::answering(AuthorizationOutcome::Authorized);
        let (app, backend_calls, observed) = protected_app(authority.clone());

        let response = app.oneshot(request(Some("Bearer abc123"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, b"backend says hi");
        assert_eq!(backend_calls.load(Ordering::SeqCst), 1);
        // The authority had already answered when the backend ran
        assert_eq!(*observed.lock().unwrap(), vec![1]);
        assert_eq!(
            *authority.seen.lock().unwrap(),
            vec!["Bearer abc123".to_string()]
        );
    }

    #[tokio::test]
    async fn rejected_credential_never_reaches_backend() {
        let authority = StubAuthority::answering(AuthorizationOutcome::Rejected {
            reason: "expired".into(),
        });
        let (app, backend_calls, _) = protected_app(authority.clone());

        let response = app.oneshot(request(Some("Bearer expired"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_of(response).await.is_empty());
        assert_eq!(authority.calls(), 1);
        assert_eq!(backend_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unreachable_authority_fails_closed() {
        let authority = StubAuthority::answering(AuthorizationOutcome::Unreachable {
            cause: "authority call timed out".into(),
        });
        let (app, backend_calls, _) = protected_app(authority.clone());

        let response = app.oneshot(request(Some("Bearer abc123"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(authority.calls(), 1);
        assert_eq!(backend_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn authorize_reports_missing_credential() {
        let authority = StubAuthority::answering(AuthorizationOutcome::Authorized);

        let result = authorize(authority.as_ref(), &HeaderMap::new()).await;

        assert_eq!(result, Err(AuthRejection::MissingCredential));
        assert_eq!(authority.calls(), 0);
    }
}
