//! Bearer credential extraction.
//!
//! Pure header inspection: no I/O, and absence is a normal value (`None`),
//! never an error.
use std::fmt;

use axum::http::{HeaderMap, header};

const BEARER_PREFIX: &str = "Bearer ";

/// The raw `Authorization` header value of a request that carries a bearer token.
///
/// The whole value (prefix included) is kept so it can be forwarded verbatim
/// to the authority.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn header_value(&self) -> &str {
        &self.0
    }

    pub fn token(&self) -> &str {
        &self.0[BEARER_PREFIX.len()..]
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the token
        f.debug_tuple("Credential")
            .field(&format_args!("Bearer <{} bytes>", self.token().len()))
            .finish()
    }
}

/// Returns `Some` only when the first `Authorization` header starts with the
/// literal `"Bearer "` (case-sensitive, single space).
pub fn extract_credential(headers: &HeaderMap) -> Option<Credential> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.starts_with(BEARER_PREFIX))
        .map(|v| Credential(v.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_header_yields_credential() {
        let credential = extract_credential(&headers_with("Bearer abc123")).unwrap();

        assert_eq!(credential.header_value(), "Bearer abc123");
        assert_eq!(credential.token(), "abc123");
    }

    #[test]
    fn missing_header_is_none() {
        assert!(extract_credential(&HeaderMap::new()).is_none());
    }

    #[test]
    fn prefix_is_case_sensitive() {
        assert!(extract_credential(&headers_with("bearer abc123")).is_none());
        assert!(extract_credential(&headers_with("BEARER abc123")).is_none());
    }

    #[test]
    fn other_schemes_and_spacing_are_rejected() {
        assert!(extract_credential(&headers_with("Basic dXNlcjpwYXNz")).is_none());
        assert!(extract_credential(&headers_with("Bearer")).is_none());
        assert!(extract_credential(&headers_with("Bearerabc")).is_none());
        assert!(extract_credential(&headers_with(" Bearer abc")).is_none());
    }

    #[test]
    fn empty_token_after_prefix_is_still_a_credential() {
        // Whether an empty token is valid is the authority's call.
        let credential = extract_credential(&headers_with("Bearer ")).unwrap();
        assert_eq!(credential.token(), "");
    }

    #[test]
    fn non_ascii_header_value_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert!(extract_credential(&headers).is_none());
    }

    #[test]
    fn debug_output_hides_token() {
        let credential = extract_credential(&headers_with("Bearer secret-token")).unwrap();
        let printed = format!("{credential:?}");

        assert!(!printed.contains("secret-token"));
    }
}
