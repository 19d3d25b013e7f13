use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::ReadingStore;
use crate::error::StoreError;
use crate::fetch::{HttpClient, fetch_json, post_json};
use crate::reading::{BusyLevel, LocationKey, Reading};

/// Submission body. The server stamps `submitted_at` itself.
#[derive(Debug, Serialize)]
struct SubmitPayload<'a> {
    location: &'a LocationKey,
    busy_level: BusyLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted_by: Option<&'a str>,
}

/// Remote store reached over `GET`/`POST {base}/readings`.
pub struct HttpReadingStore<C> {
    base_url: String,
    client: C,
}

impl<C: HttpClient> HttpReadingStore<C> {
    pub fn new(base_url: &str, client: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn readings_url(&self) -> String {
        format!("{}/readings", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClient> ReadingStore for HttpReadingStore<C> {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        let payload = SubmitPayload {
            location: &reading.location,
            busy_level: reading.busy_level,
            submitted_by: reading.submitted_by.as_deref(),
        };
        post_json(&self.client, &self.readings_url(), &payload).await
    }

    async fn list_all(&self) -> Result<Vec<Reading>, StoreError> {
        let readings: Vec<Reading> = fetch_json(&self.client, &self.readings_url()).await?;
        debug!(count = readings.len(), "Fetched remote snapshot");
        Ok(readings)
    }
}
