mod client;
mod basic;

pub use client::HttpClient;
pub use basic::BasicClient;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::StoreError;

fn build_request(method: Method, url: &str) -> Result<Request, StoreError> {
    let url = url
        .parse()
        .map_err(|e| StoreError::Unavailable(format!("invalid url '{url}': {e}")))?;
    Ok(Request::new(method, url))
}

async fn ensure_success(resp: Response) -> Result<Response, StoreError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Unavailable(format!(
        "server returned status {status}: {body}"
    )))
}

/// GETs `url` and decodes the JSON body.
pub async fn fetch_json<C: HttpClient + ?Sized, T: DeserializeOwned>(
    client: &C,
    url: &str,
) -> Result<T, StoreError> {
    let req = build_request(Method::GET, url)?;

    let resp = ensure_success(client.execute(req).await?).await?;
    let bytes = resp.bytes().await?;
    debug!(url, bytes = bytes.len(), "Fetched JSON payload");

    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// POSTs `body` as JSON to `url`, discarding the response body.
pub async fn post_json<C: HttpClient + ?Sized, B: Serialize + ?Sized>(
    client: &C,
    url: &str,
    body: &B,
) -> Result<(), StoreError> {
    let mut req = build_request(Method::POST, url)?;
    let payload = serde_json::to_vec(body).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(payload.into());

    ensure_success(client.execute(req).await?).await?;
    Ok(())
}
