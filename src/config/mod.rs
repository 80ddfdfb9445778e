//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → env.rs (overlay PRICING_COOKIE_SECRET)
//!     → validation.rs (semantic checks, all errors collected)
//!     → SiteConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is loaded and validated once, before the listener binds
//! - All fields have defaults to allow minimal configs
//! - Secrets come only from the environment, never from the file

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::{
    pricing_cookie_secret, pricing_cookie_secret_from, PRICING_COOKIE_MAX_AGE,
    PRICING_COOKIE_NAME, PRICING_COOKIE_SECRET_ENV,
};
pub use loader::{finalize, load_config, load_config_str, ConfigError};
pub use schema::{
    AdminConfig, I18nConfig, ListenerConfig, ObservabilityConfig, PricingConfig, SiteConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
