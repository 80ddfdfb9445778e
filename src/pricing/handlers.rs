//! `GET /api/pricing/status`.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingStatus {
    pub verified: bool,
}

/// Report whether the caller holds pricing access.
///
/// Verifier failures propagate as 500; they are never reported as
/// `verified: false`.
pub async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let verified = state.verifier.is_verified(&headers)?;
    metrics::record_pricing_check(verified);

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(PricingStatus { verified }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::http::server::test_support::test_state;
    use crate::pricing::{PricingVerifier, VerifyError};

    struct Fixed(Result<bool, &'static str>);

    impl PricingVerifier for Fixed {
        fn is_verified(&self, _: &HeaderMap) -> Result<bool, VerifyError> {
            self.0.map_err(|e| VerifyError::Backend(e.to_string()))
        }
    }

    async fn get_status(verifier: Fixed) -> (StatusCode, Option<String>, String) {
        let mut state = test_state();
        state.verifier = Arc::new(verifier);
        let app = Router::new()
            .route("/api/pricing/status", get(status))
            .with_state(state);

        let res = app
            .oneshot(Request::get("/api/pricing/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let code = res.status();
        let cache = res
            .headers()
            .get(header::CACHE_CONTROL)
            .map(|v| v.to_str().unwrap().to_string());
        let body = res.into_body().collect().await.unwrap().to_bytes();
        (code, cache, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_verified_true() {
        let (code, cache, body) = get_status(Fixed(Ok(true))).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body, r#"{"verified":true}"#);
    }

    #[tokio::test]
    async fn test_verified_false() {
        let (code, _, body) = get_status(Fixed(Ok(false))).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body, r#"{"verified":false}"#);
    }

    #[tokio::test]
    async fn test_verifier_failure_propagates() {
        let (code, _, body) = get_status(Fixed(Err("session store down"))).await;
        assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"internal server error"}"#);
    }
}
