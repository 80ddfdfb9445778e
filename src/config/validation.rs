//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the route table is well-formed
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check locale list consistency
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before any request is served

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::env::PRICING_COOKIE_SECRET_ENV;
use crate::config::schema::SiteConfig;
use crate::routing::table::{check_table, RouteDescriptor, RouteTableError, GLOBAL_ROUTES};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} environment variable is not set.")]
    MissingEnv(&'static str),

    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("listener.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("i18n.locales must not be empty")]
    NoLocales,

    #[error("locale code at index {0} is blank")]
    BlankLocale(usize),

    #[error("locale '{0}' is listed more than once")]
    DuplicateLocale(String),

    #[error("default locale '{0}' is not in i18n.locales")]
    UnknownDefaultLocale(String),

    #[error("route table: {0}")]
    Route(RouteTableError),

    #[error("route {method} {path} requires auth but admin.api_token is not set")]
    MissingAdminToken { method: &'static str, path: &'static str },
}

/// Validate the config against the built-in route table.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    validate_with_routes(config, GLOBAL_ROUTES)
}

/// Validate the config against an explicit route table.
pub fn validate_with_routes(
    config: &SiteConfig,
    routes: &[RouteDescriptor],
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.pricing.cookie_secret.is_empty() {
        errors.push(ValidationError::MissingEnv(PRICING_COOKIE_SECRET_ENV));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    validate_locales(config, &mut errors);

    if let Err(route_errors) = check_table(routes) {
        errors.extend(route_errors.into_iter().map(ValidationError::Route));
    }

    if config.admin.api_token.as_deref().map_or(true, str::is_empty) {
        for route in routes.iter().filter(|r| r.auth) {
            errors.push(ValidationError::MissingAdminToken {
                method: route.method.as_str(),
                path: route.path,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_locales(config: &SiteConfig, errors: &mut Vec<ValidationError>) {
    let locales = &config.i18n.locales;
    if locales.is_empty() {
        errors.push(ValidationError::NoLocales);
        return;
    }

    let mut seen = HashSet::new();
    for (i, code) in locales.iter().enumerate() {
        if code.trim().is_empty() {
            errors.push(ValidationError::BlankLocale(i));
        } else if !seen.insert(code.as_str()) {
            errors.push(ValidationError::DuplicateLocale(code.clone()));
        }
    }

    if !locales.contains(&config.i18n.default_locale) {
        errors.push(ValidationError::UnknownDefaultLocale(
            config.i18n.default_locale.clone(),
        ));
    }
}
