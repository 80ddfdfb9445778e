//! Pricing verification predicate.

use axum::http::HeaderMap;
use chrono::Utc;
use thiserror::Error;

use crate::config::PRICING_COOKIE_NAME;
use crate::pricing::token::{find_cookies, verify_token, TokenStatus};

/// Failure of the verification mechanism itself, as opposed to a negative
/// answer.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("verification backend error: {0}")]
    Backend(String),
}

/// Decides whether a request carries pricing access.
pub trait PricingVerifier: Send + Sync {
    fn is_verified(&self, headers: &HeaderMap) -> Result<bool, VerifyError>;
}

/// Checks the signed `pricing-session` cookie.
///
/// Verified when any `pricing-session` value carries a valid token. Missing,
/// malformed, forged and expired cookies are `Ok(false)`.
pub struct SessionCookieVerifier {
    secret: String,
}

impl SessionCookieVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl PricingVerifier for SessionCookieVerifier {
    fn is_verified(&self, headers: &HeaderMap) -> Result<bool, VerifyError> {
        let now = Utc::now();
        let mut expired = false;

        for token in find_cookies(headers, PRICING_COOKIE_NAME) {
            match verify_token(&self.secret, token, now) {
                TokenStatus::Valid { .. } => return Ok(true),
                TokenStatus::Expired => expired = true,
                TokenStatus::Invalid => {}
            }
        }

        if expired {
            tracing::debug!("Pricing session expired");
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::token::issue_token;
    use axum::http::{header, HeaderValue};
    use chrono::Duration;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_no_cookie_is_not_verified() {
        let verifier = SessionCookieVerifier::new("secret");
        assert!(!verifier.is_verified(&HeaderMap::new()).unwrap());
    }

    #[test]
    fn test_valid_session_is_verified() {
        let verifier = SessionCookieVerifier::new("secret");
        let token = issue_token("secret", Utc::now()).unwrap();
        let headers = headers_with_cookie(&format!("a=b; pricing-session={token}"));
        assert!(verifier.is_verified(&headers).unwrap());
    }

    #[test]
    fn test_expired_session_is_not_verified() {
        let verifier = SessionCookieVerifier::new("secret");
        let token = issue_token("secret", Utc::now() - Duration::days(31)).unwrap();
        let headers = headers_with_cookie(&format!("pricing-session={token}"));
        assert!(!verifier.is_verified(&headers).unwrap());
    }

    #[test]
    fn test_any_matching_session_cookie_verifies() {
        let verifier = SessionCookieVerifier::new("secret");
        let stale = issue_token("secret", Utc::now() - Duration::days(31)).unwrap();
        let fresh = issue_token("secret", Utc::now()).unwrap();

        let headers = headers_with_cookie(&format!(
            "pricing-session={stale}; pricing-session={fresh}"
        ));
        assert!(verifier.is_verified(&headers).unwrap());

        let headers = headers_with_cookie(&format!(
            "pricing-session=garbage; pricing-session={stale}"
        ));
        assert!(!verifier.is_verified(&headers).unwrap());
    }

    #[test]
    fn test_session_signed_with_other_secret() {
        let verifier = SessionCookieVerifier::new("secret");
        let token = issue_token("rotated", Utc::now()).unwrap();
        let headers = headers_with_cookie(&format!("pricing-session={token}"));
        assert!(!verifier.is_verified(&headers).unwrap());
    }
}
