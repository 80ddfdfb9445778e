//! Pricing gate library: CMS global routes, pricing-session status and
//! locale handling behind one axum server.

pub mod cms;
pub mod config;
pub mod http;
pub mod i18n;
pub mod lifecycle;
pub mod observability;
pub mod pricing;
pub mod routing;

pub use config::schema::SiteConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
