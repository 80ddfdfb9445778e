use reqwest::{header::COOKIE, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingStatus {
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalEntry {
    pub locale: String,
    pub attributes: serde_json::Map<String, serde_json::Value>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub attributes: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncResponse {
    pub data: GlobalEntry,
    pub created: bool,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gate returned error status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

pub struct GateClient {
    client: Client,
    base_url: String,
}

impl GateClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask whether a session token grants pricing access.
    pub async fn pricing_status(&self, session: Option<&str>) -> Result<PricingStatus, GateError> {
        let mut req = self.client.get(format!("{}/api/pricing/status", self.base_url));
        if let Some(token) = session {
            req = req.header(COOKIE, format!("pricing-session={}", token));
        }
        decode(req.send().await?).await
    }

    /// Fetch the global entry, using the server's default locale when `None`.
    pub async fn global(&self, locale: Option<&str>) -> Result<GlobalEntry, GateError> {
        let mut req = self.client.get(format!("{}/global", self.base_url));
        if let Some(locale) = locale {
            req = req.query(&[("locale", locale)]);
        }
        let envelope: DataEnvelope<GlobalEntry> = decode(req.send().await?).await?;
        Ok(envelope.data)
    }

    /// Replace the global entry for a locale.
    pub async fn sync_global(&self, req: &SyncRequest) -> Result<SyncResponse, GateError> {
        let resp = self
            .client
            .post(format!("{}/global/sync", self.base_url))
            .json(req)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, GateError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GateError::Status { status, body });
    }
    Ok(resp.json().await?)
}
