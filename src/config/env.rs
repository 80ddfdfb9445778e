//! Environment-sourced settings and the pricing cookie constants.

use crate::config::loader::ConfigError;
use crate::config::schema::SiteConfig;

/// Name of the pricing session cookie.
pub const PRICING_COOKIE_NAME: &str = "pricing-session";

/// Lifetime of the pricing session cookie in seconds (30 days).
pub const PRICING_COOKIE_MAX_AGE: u64 = 30 * 24 * 60 * 60;

/// Environment variable holding the session signing secret.
pub const PRICING_COOKIE_SECRET_ENV: &str = "PRICING_COOKIE_SECRET";

/// Read the pricing cookie secret from the process environment.
///
/// Returns [`ConfigError::MissingEnv`] when the variable is unset or empty.
/// The value is otherwise returned verbatim.
pub fn pricing_cookie_secret() -> Result<String, ConfigError> {
    pricing_cookie_secret_from(|key| std::env::var(key).ok())
}

/// Same as [`pricing_cookie_secret`] with an injectable variable lookup.
pub fn pricing_cookie_secret_from<F>(lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(PRICING_COOKIE_SECRET_ENV) {
        Some(secret) if !secret.is_empty() => Ok(secret),
        _ => Err(ConfigError::MissingEnv(PRICING_COOKIE_SECRET_ENV)),
    }
}

impl SiteConfig {
    /// Overlay environment-sourced fields from the process environment.
    pub fn with_process_env(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    /// Overlay environment-sourced fields using `lookup`.
    ///
    /// A missing secret leaves the field empty; `validate_config` reports it
    /// together with every other problem.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Ok(secret) = pricing_cookie_secret_from(lookup) {
            self.pricing.cookie_secret = secret;
        }
        self
    }
}
