//! Controller for the global single type.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cms::GlobalEntry;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::i18n::{Locale, LocaleCheck};

#[derive(Debug, Deserialize)]
pub struct FindParams {
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub locale: Option<String>,
    pub attributes: Value,
}

#[derive(Debug, Serialize)]
pub struct FindResponse {
    pub data: GlobalEntry,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub data: GlobalEntry,
    pub created: bool,
}

fn resolve_locale(state: &AppState, requested: Option<&str>) -> Result<Locale, ApiError> {
    match state.locales.resolve(requested) {
        LocaleCheck::Supported(locale) => Ok(locale),
        LocaleCheck::Unsupported(raw) => Err(ApiError::UnsupportedLocale(raw)),
    }
}

/// `global.find`: return the global entry for a locale.
pub async fn find(
    State(state): State<AppState>,
    Query(params): Query<FindParams>,
) -> Result<Json<FindResponse>, ApiError> {
    let locale = resolve_locale(&state, params.locale.as_deref())?;
    let data = state
        .store
        .find(&locale)
        .ok_or_else(|| ApiError::NotFound(format!("global content for locale '{locale}'")))?;
    Ok(Json(FindResponse { data }))
}

/// `global.sync`: replace the global entry for a locale.
pub async fn sync(
    State(state): State<AppState>,
    body: Result<Json<SyncRequest>, JsonRejection>,
) -> Result<Json<SyncResponse>, ApiError> {
    let Json(request) = body?;
    let locale = resolve_locale(&state, request.locale.as_deref())?;

    let Value::Object(attributes) = request.attributes else {
        return Err(ApiError::InvalidRequest(
            "attributes must be a JSON object".to_string(),
        ));
    };

    let (data, created) = state.store.upsert(locale, attributes, Utc::now());
    tracing::info!(locale = %data.locale, created, "Global content synced");

    Ok(Json(SyncResponse { data, created }))
}
