//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Mount the CMS route table
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request},
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cms::GlobalStore;
use crate::config::loader::join_errors;
use crate::config::{validate_config, SiteConfig, ValidationError};
use crate::http::request::{MakeRequestUuidV4, RequestIdExt};
use crate::i18n::SupportedLocales;
use crate::observability::metrics;
use crate::pricing::{self, PricingVerifier, SessionCookieVerifier};
use crate::routing::{mount, HandlerRegistry, RouteTableError, GLOBAL_ROUTES};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub locales: Arc<SupportedLocales>,
    pub store: Arc<GlobalStore>,
    pub verifier: Arc<dyn PricingVerifier>,
}

/// Errors building the server from a config.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Config(Vec<ValidationError>),

    #[error("no supported locales configured")]
    NoLocales,

    #[error(transparent)]
    Route(#[from] RouteTableError),
}

/// HTTP server for the pricing gate.
pub struct HttpServer {
    router: Router,
    config: SiteConfig,
}

impl HttpServer {
    /// Create a server that verifies pricing sessions with the configured
    /// cookie secret.
    pub fn new(config: SiteConfig) -> Result<Self, ServerError> {
        let verifier = Arc::new(SessionCookieVerifier::new(
            config.pricing.cookie_secret.clone(),
        ));
        Self::with_verifier(config, verifier)
    }

    /// Create a server with a custom pricing verifier.
    ///
    /// The config is validated here as well as at load time, so a server
    /// never starts with an empty cookie secret or an unlisted default locale.
    pub fn with_verifier(
        config: SiteConfig,
        verifier: Arc<dyn PricingVerifier>,
    ) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ServerError::Config)?;
        let locales = SupportedLocales::from_config(&config.i18n).ok_or(ServerError::NoLocales)?;

        let state = AppState {
            locales: Arc::new(locales),
            store: Arc::new(GlobalStore::new()),
            verifier,
        };

        let router = Self::build_router(&config, state)?;
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &SiteConfig, state: AppState) -> Result<Router, RouteTableError> {
        let cms = mount(
            GLOBAL_ROUTES,
            &HandlerRegistry::with_cms_handlers(),
            config.admin.api_token.as_deref(),
        )?;

        Ok(Router::new()
            .route("/health", get(health))
            .route("/api/pricing/status", get(pricing::handlers::status))
            .merge(cms)
            .with_state(state)
            .layer(middleware::from_fn(track_metrics))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
                tracing::info_span!(
                    "request",
                    request_id = %req.request_id(),
                    method = %req.method(),
                    path = %req.uri().path(),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4)))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            locales = ?self.config.i18n.locales,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}

/// `GET /health`: liveness probe.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), &route, start);
    response
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use tower::ServiceExt;

    fn server() -> HttpServer {
        HttpServer::new(valid_config()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let res = server()
            .router()
            .oneshot(HttpRequest::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    }

    #[tokio::test]
    async fn test_request_id_generated_and_propagated() {
        let router = server().router();

        let res = router
            .clone()
            .oneshot(HttpRequest::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(res.headers().contains_key("x-request-id"));

        let res = router
            .oneshot(
                HttpRequest::get("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let res = server()
            .router()
            .oneshot(HttpRequest::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    fn valid_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.pricing.cookie_secret = "test-secret".into();
        config
    }

    #[test]
    fn test_empty_locales_rejected() {
        let mut config = valid_config();
        config.i18n.locales.clear();
        match HttpServer::new(config) {
            Err(ServerError::Config(errors)) => {
                assert_eq!(errors, vec![ValidationError::NoLocales])
            }
            other => panic!("expected config error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_missing_secret_rejected() {
        match HttpServer::new(SiteConfig::default()) {
            Err(ServerError::Config(errors)) => {
                assert_eq!(errors, vec![ValidationError::MissingEnv("PRICING_COOKIE_SECRET")])
            }
            other => panic!("expected config error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_unlisted_default_locale_rejected() {
        let mut config = valid_config();
        config.i18n.default_locale = "nl".into();
        let err = HttpServer::new(config).err();
        assert!(matches!(
            err,
            Some(ServerError::Config(errors))
                if errors == vec![ValidationError::UnknownDefaultLocale("nl".into())]
        ));
    }

    #[tokio::test]
    async fn test_token_signed_with_empty_key_is_not_verified() {
        let token = crate::pricing::issue_token("", chrono::Utc::now()).unwrap();
        let res = server()
            .router()
            .oneshot(
                HttpRequest::get("/api/pricing/status")
                    .header("cookie", format!("pricing-session={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = http_body_util::BodyExt::collect(res.into_body()).await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"verified":false}"#);
    }
}
