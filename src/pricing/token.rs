//! Signed `pricing-session` tokens.
//!
//! Format: `v1.<expires_unix>.<base64url(hmac_sha256(secret, "v1.<expires_unix>"))>`.

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::config::{PRICING_COOKIE_MAX_AGE, PRICING_COOKIE_NAME};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_VERSION: &str = "v1";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid signing key: {0}")]
    InvalidKey(#[from] hmac::digest::InvalidLength),
}

/// Result of checking a presented token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Valid { expires_at: DateTime<Utc> },
    Expired,
    Invalid,
}

impl TokenStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenStatus::Valid { .. })
    }
}

fn mac(secret: &str, payload: &str) -> Result<HmacSha256, TokenError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(payload.as_bytes());
    Ok(mac)
}

/// Issue a token valid for [`PRICING_COOKIE_MAX_AGE`] seconds from `now`.
pub fn issue_token(secret: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
    let expires = now.timestamp() + PRICING_COOKIE_MAX_AGE as i64;
    let payload = format!("{TOKEN_VERSION}.{expires}");
    let signature = mac(secret, &payload)?.finalize().into_bytes();
    Ok(format!("{payload}.{}", URL_SAFE_NO_PAD.encode(signature)))
}

/// Check a token's signature and expiry.
pub fn verify_token(secret: &str, token: &str, now: DateTime<Utc>) -> TokenStatus {
    let Some((payload, signature)) = token.rsplit_once('.') else {
        return TokenStatus::Invalid;
    };
    let Some((version, expires)) = payload.split_once('.') else {
        return TokenStatus::Invalid;
    };
    if version != TOKEN_VERSION {
        return TokenStatus::Invalid;
    }
    let Ok(expires) = expires.parse::<i64>() else {
        return TokenStatus::Invalid;
    };
    let Ok(signature) = URL_SAFE_NO_PAD.decode(signature) else {
        return TokenStatus::Invalid;
    };
    let Ok(expected) = mac(secret, payload) else {
        return TokenStatus::Invalid;
    };
    if expected.verify_slice(&signature).is_err() {
        return TokenStatus::Invalid;
    }

    match Utc.timestamp_opt(expires, 0).single() {
        Some(expires_at) if expires_at > now => TokenStatus::Valid { expires_at },
        Some(_) => TokenStatus::Expired,
        None => TokenStatus::Invalid,
    }
}

/// `Set-Cookie` value carrying `token`.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{PRICING_COOKIE_NAME}={token}; Max-Age={PRICING_COOKIE_MAX_AGE}; Path=/; HttpOnly; SameSite=Lax; Secure"
    )
}

/// Every value of the cookie `name`, in header order, across all `Cookie`
/// headers.
pub fn find_cookies<'a>(headers: &'a HeaderMap, name: &'a str) -> impl Iterator<Item = &'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(move |(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issued_token_is_valid_for_max_age() {
        let now = Utc::now();
        let token = issue_token(SECRET, now).unwrap();
        assert!(token.starts_with("v1."));

        match verify_token(SECRET, &token, now) {
            TokenStatus::Valid { expires_at } => {
                assert_eq!(expires_at.timestamp(), now.timestamp() + 2_592_000)
            }
            other => panic!("expected valid token, got {other:?}"),
        }

        let later = now + Duration::seconds(PRICING_COOKIE_MAX_AGE as i64);
        assert_eq!(verify_token(SECRET, &token, later), TokenStatus::Expired);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let now = Utc::now();
        let token = issue_token(SECRET, now).unwrap();
        assert_eq!(verify_token("other", &token, now), TokenStatus::Invalid);
    }

    #[test]
    fn test_tampered_expiry_is_invalid() {
        let now = Utc::now();
        let token = issue_token(SECRET, now).unwrap();
        let (_, signature) = token.rsplit_once('.').unwrap();
        let forged = format!("v1.{}.{signature}", now.timestamp() + 10 * 365 * 86_400);
        assert_eq!(verify_token(SECRET, &forged, now), TokenStatus::Invalid);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let now = Utc::now();
        for token in ["", "v1", "v1.abc.def", "v2.1.AAAA", "v1.1.!!!"] {
            assert_eq!(verify_token(SECRET, token, now), TokenStatus::Invalid, "{token:?}");
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok");
        assert!(cookie.starts_with("pricing-session=tok;"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_find_cookies_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; pricing-session=old; lang=en"),
        );
        headers.append(header::COOKIE, HeaderValue::from_static("pricing-session=abc.def"));

        let sessions: Vec<_> = find_cookies(&headers, "pricing-session").collect();
        assert_eq!(sessions, vec!["old", "abc.def"]);
        assert_eq!(find_cookies(&headers, "lang").collect::<Vec<_>>(), vec!["en"]);
        assert_eq!(find_cookies(&headers, "missing").next(), None);
    }
}
