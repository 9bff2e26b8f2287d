//! Client for the hosted JSON document that holds the whole leaderboard.
//!
//! The document is read with `GET {base}/b/{id}/latest` (body `{ "record": [...] }`)
//! and replaced wholesale with `PUT {base}/b/{id}`.

use crate::config::StoreConfig;
use crate::models::PlayerRecord;
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde::Deserialize;

const MASTER_KEY_HEADER: &str = "X-Master-Key";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required setting is missing.
    #[error("Document store misconfigured: {0} is not set")]
    Misconfigured(&'static str),
    #[error("Document store unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success HTTP status from the store.
    #[error("Document store returned status {0}")]
    Status(u16),
    #[error("Document store returned an unreadable body: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn is_misconfigured(&self) -> bool {
        matches!(self, StoreError::Misconfigured(_))
    }
}

/// Read-latest / overwrite-all access to the leaderboard document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Full current list, in stored order. A missing or null record is an empty list.
    async fn fetch_latest(&self) -> Result<Vec<PlayerRecord>, StoreError>;

    /// Replace the whole document with `records`.
    async fn overwrite(&self, records: &[PlayerRecord]) -> Result<(), StoreError>;
}

#[derive(Deserialize)]
struct LatestBody {
    #[serde(default)]
    record: Option<Vec<PlayerRecord>>,
}

/// HTTP-backed store (jsonbin.io v3 API shape).
pub struct JsonBinStore {
    client: reqwest::Client,
    base_url: String,
    bin_id: Option<String>,
    api_key: Option<String>,
}

impl JsonBinStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &StoreConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bin_id: config.bin_id.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn credentials(&self) -> Result<(&str, &str), StoreError> {
        let bin_id = self
            .bin_id
            .as_deref()
            .ok_or(StoreError::Misconfigured("JSONBIN_BIN_ID"))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(StoreError::Misconfigured("JSONBIN_API_KEY"))?;
        Ok((bin_id, api_key))
    }

    fn latest_url(&self, bin_id: &str) -> String {
        format!("{}/b/{}/latest", self.base_url, bin_id)
    }

    fn document_url(&self, bin_id: &str) -> String {
        format!("{}/b/{}", self.base_url, bin_id)
    }
}

#[async_trait]
impl DocumentStore for JsonBinStore {
    async fn fetch_latest(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        let (bin_id, api_key) = self.credentials()?;
        let resp = self
            .client
            .get(self.latest_url(bin_id))
            .header(MASTER_KEY_HEADER, api_key)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            log::warn!("Leaderboard fetch failed with status {}", status);
            return Err(StoreError::Status(status.as_u16()));
        }
        let bytes = resp.bytes().await?;
        parse_latest(&bytes)
    }

    async fn overwrite(&self, records: &[PlayerRecord]) -> Result<(), StoreError> {
        let (bin_id, api_key) = self.credentials()?;
        let resp = self
            .client
            .put(self.document_url(bin_id))
            .header(MASTER_KEY_HEADER, api_key)
            .json(records)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            log::warn!("Leaderboard save failed with status {}", status);
            return Err(StoreError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Decode a `/latest` response body.
pub fn parse_latest(body: &[u8]) -> Result<Vec<PlayerRecord>, StoreError> {
    let parsed: LatestBody =
        serde_json::from_slice(body).map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(parsed.record.unwrap_or_default())
}
