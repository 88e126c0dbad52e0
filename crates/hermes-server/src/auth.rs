//! Shared-secret token guard.

use axum::http::HeaderMap;
use axum::http::header;

use crate::error::ApiError;

/// Checks the request against the configured API token.
///
/// Accepts either `Authorization: Bearer <token>` or `X-API-Token:
/// <token>`; when both are present the Bearer value decides the outcome.
/// Exact string comparison. With no token configured every request
/// passes.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when a token is configured and the
/// request carries no matching credential.
pub fn check_token(expected: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let presented = match bearer {
        Some(token) => Some(token),
        None => headers.get("x-api-token").and_then(|v| v.to_str().ok()),
    };

    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_no_token_configured_is_open() {
        assert!(check_token(None, &headers(&[])).is_ok());
        assert!(check_token(None, &headers(&[("authorization", "Bearer junk")])).is_ok());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        assert!(check_token(Some("secret"), &headers(&[])).is_err());
    }

    #[test]
    fn test_bearer_match() {
        let h = headers(&[("authorization", "Bearer secret")]);
        assert!(check_token(Some("secret"), &h).is_ok());
    }

    #[test]
    fn test_bearer_mismatch() {
        let h = headers(&[("authorization", "Bearer wrong")]);
        assert!(check_token(Some("secret"), &h).is_err());
    }

    #[test]
    fn test_x_api_token_match() {
        let h = headers(&[("x-api-token", "secret")]);
        assert!(check_token(Some("secret"), &h).is_ok());
    }

    #[test]
    fn test_bearer_takes_precedence_over_header() {
        // Correct bearer wins even with a wrong X-API-Token alongside.
        let h = headers(&[
            ("authorization", "Bearer secret"),
            ("x-api-token", "wrong"),
        ]);
        assert!(check_token(Some("secret"), &h).is_ok());

        // Wrong bearer loses even with a correct X-API-Token alongside.
        let h = headers(&[
            ("authorization", "Bearer wrong"),
            ("x-api-token", "secret"),
        ]);
        assert!(check_token(Some("secret"), &h).is_err());
    }

    #[test]
    fn test_non_bearer_authorization_falls_through() {
        let h = headers(&[
            ("authorization", "Basic dXNlcjpwYXNz"),
            ("x-api-token", "secret"),
        ]);
        assert!(check_token(Some("secret"), &h).is_ok());
    }
}
