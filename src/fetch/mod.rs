//! Ingestion boundary: pulls the raw report bytes from the sheet export.
//!
//! There is exactly one best-effort attempt per run. Any transport error or
//! non-success status is returned to the caller, which aborts the run.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches `url` with `client`, failing on any non-2xx response.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse()
            .with_context(|| format!("invalid source url '{url}'"))?,
    );

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!("source returned status {}", status));
    }

    let bytes = resp.bytes().await?.to_vec();
    debug!(bytes = bytes.len(), "Source bytes received");
    Ok(bytes)
}

/// Loads the report from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(source), fields(source = %source))]
pub async fn load_source(source: &str, timeout: Duration) -> Result<Vec<u8>> {
    if is_remote(source) {
        let client = BasicClient::with_timeout(timeout)?;
        let started = std::time::Instant::now();
        let bytes = fetch_bytes(&client, source).await?;
        let elapsed = started.elapsed();
        if elapsed.as_secs() > 15 {
            warn!(elapsed_secs = elapsed.as_secs(), "Source fetch was slow");
        }
        Ok(bytes)
    } else {
        std::fs::read(source).with_context(|| format!("failed to read source file '{source}'"))
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
