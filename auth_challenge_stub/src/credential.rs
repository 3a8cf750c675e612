use axum::http::{HeaderMap, header::AUTHORIZATION};

/// Case-sensitive scheme marker, including the separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// What the caller presented in its `Authorization` header.
///
/// Recomputed for every request; the token is never checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    Missing,
}

impl Credential {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(|token| Credential::Bearer(token.to_string()))
            .unwrap_or(Credential::Missing)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Credential::Bearer(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(auth: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(auth));
        headers
    }

    #[test]
    fn missing_header_is_missing() {
        assert_eq!(Credential::from_headers(&HeaderMap::new()), Credential::Missing);
    }

    #[test]
    fn bearer_token_is_accepted_verbatim() {
        let credential = Credential::from_headers(&headers_with("Bearer abc123"));
        assert_eq!(credential, Credential::Bearer("abc123".to_string()));
        assert!(credential.is_present());
    }

    #[test]
    fn empty_bearer_token_still_counts() {
        let credential = Credential::from_headers(&headers_with("Bearer "));
        assert_eq!(credential, Credential::Bearer(String::new()));
    }

    #[test]
    fn other_schemes_are_missing() {
        for value in ["Basic dXNlcjpwYXNz", "bearer abc123", "Bearer", "Token abc"] {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
            assert_eq!(
                Credential::from_headers(&headers),
                Credential::Missing,
                "{value:?} should not authenticate"
            );
        }
    }

    #[test]
    fn non_ascii_header_is_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        assert_eq!(Credential::from_headers(&headers), Credential::Missing);
    }
}
