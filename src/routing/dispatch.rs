//! Route table dispatch.
//!
//! Binds each [`RouteDescriptor`] to the axum handler registered under its
//! handler id. Routes declaring `auth: true` are wrapped in a bearer-token
//! check; with no token configured those routes reject every request.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::cms::handlers as global;
use crate::http::server::AppState;
use crate::routing::table::{check_table, HttpMethod, RouteDescriptor, RouteTableError};

/// Builds a method router for the given verb.
pub type RouteFactory = fn(MethodFilter) -> MethodRouter<AppState>;

/// Handler ids known to the dispatcher.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, RouteFactory>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the global single-type controller.
    pub fn with_cms_handlers() -> Self {
        let mut registry = Self::new();
        registry
            .register("global.find", |filter| on(filter, global::find))
            .register("global.sync", |filter| on(filter, global::sync));
        registry
    }

    pub fn register(&mut self, id: &'static str, factory: RouteFactory) -> &mut Self {
        self.handlers.insert(id, factory);
        self
    }

    pub fn get(&self, id: &str) -> Option<RouteFactory> {
        self.handlers.get(id).copied()
    }
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Delete => MethodFilter::DELETE,
    }
}

/// Turn a route table into an axum router.
pub fn mount(
    table: &[RouteDescriptor],
    registry: &HandlerRegistry,
    admin_token: Option<&str>,
) -> Result<Router<AppState>, RouteTableError> {
    if let Err(mut errors) = check_table(table) {
        return Err(errors.remove(0));
    }

    let token: Option<Arc<str>> = admin_token.filter(|t| !t.is_empty()).map(Arc::from);
    let mut by_path: BTreeMap<&'static str, MethodRouter<AppState>> = BTreeMap::new();

    for route in table {
        let factory = registry
            .get(route.handler)
            .ok_or(RouteTableError::UnknownHandler(route.handler))?;

        let mut method_router = factory(method_filter(route.method));
        if route.auth {
            method_router = method_router
                .route_layer(middleware::from_fn_with_state(token.clone(), require_admin));
        }

        tracing::debug!(
            method = %route.method,
            path = route.path,
            handler = route.handler,
            auth = route.auth,
            "Mounted route"
        );

        let merged = match by_path.remove(route.path) {
            Some(existing) => existing.merge(method_router),
            None => method_router,
        };
        by_path.insert(route.path, merged);
    }

    Ok(by_path
        .into_iter()
        .fold(Router::new(), |router, (path, method_router)| {
            router.route(path, method_router)
        }))
}

async fn require_admin(
    State(token): State<Option<Arc<str>>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let expected = token.ok_or(StatusCode::UNAUTHORIZED)?;

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|presented| token_matches(&expected, presented));

    if !authorized {
        tracing::warn!(path = %request.uri().path(), "Rejected unauthenticated request");
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

/// Compare bearer tokens in constant time by MACing a fixed message under
/// each and checking the tags with `verify_slice`.
fn token_matches(expected: &str, presented: &str) -> bool {
    const CONTEXT: &[u8] = b"pricing-gate admin token";

    let (Ok(mut reference), Ok(mut candidate)) = (
        Hmac::<Sha256>::new_from_slice(expected.as_bytes()),
        Hmac::<Sha256>::new_from_slice(presented.as_bytes()),
    ) else {
        return false;
    };
    reference.update(CONTEXT);
    candidate.update(CONTEXT);
    candidate
        .verify_slice(&reference.finalize().into_bytes())
        .is_ok()
}
