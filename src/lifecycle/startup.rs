//! Startup orchestration.
//!
//! # Responsibilities
//! - Locate, load and validate configuration
//! - Initialize logging and metrics
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Every validation error is logged before exiting

use std::path::{Path, PathBuf};

use crate::config::{self, ConfigError, SiteConfig};
use crate::observability::{logging, metrics};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "PRICING_GATE_CONFIG";

/// Pick the config path: explicit argument first, then the environment.
pub fn config_path(arg: Option<String>, env: Option<String>) -> Option<PathBuf> {
    arg.or(env).filter(|p| !p.is_empty()).map(PathBuf::from)
}

/// Load config from `path`, or defaults plus environment when absent.
pub fn load(path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    match path {
        Some(path) => config::load_config(path),
        None => config::finalize(SiteConfig::default().with_process_env()),
    }
}

/// Load configuration and bring up logging and metrics.
pub fn prepare(path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let config = match load(path) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&config::ObservabilityConfig::default());
            match &e {
                ConfigError::Validation(errors) => {
                    for error in errors {
                        tracing::error!(%error, "Invalid configuration");
                    }
                }
                other => tracing::error!(error = %other, "Failed to load configuration"),
            }
            return Err(e);
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        config_file = ?path,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        locales = ?config.i18n.locales,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_precedence() {
        assert_eq!(
            config_path(Some("a.toml".into()), Some("b.toml".into())),
            Some(PathBuf::from("a.toml"))
        );
        assert_eq!(config_path(None, Some("b.toml".into())), Some(PathBuf::from("b.toml")));
        assert_eq!(config_path(None, Some(String::new())), None);
        assert_eq!(config_path(None, None), None);
    }

    #[test]
    fn test_missing_file_fails() {
        let result = prepare(Some(Path::new("/nonexistent/gate.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
