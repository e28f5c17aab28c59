//! Fetching the latest reading from a Nightscout site.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::env::HttpTransport;

use super::error::FetchError;
use super::types::Reading;

/// Something that can produce the latest reading.
pub trait ReadingSource: Send + Sync {
    fn fetch(&self) -> Result<Reading, FetchError>;
}

/// Fetches the newest entry over HTTP on every call.
pub struct LiveSource {
    http: Arc<dyn HttpTransport>,
    url: String,
    timeout: Duration,
}

impl LiveSource {
    pub fn new(http: Arc<dyn HttpTransport>, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            url: url.into(),
            timeout,
        }
    }

    /// The entries URL this source reads.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ReadingSource for LiveSource {
    fn fetch(&self) -> Result<Reading, FetchError> {
        let body = self.http.get(&self.url, self.timeout)?;
        let reading = parse_latest(&body)?;

        debug!(
            url = %self.url,
            sgv = reading.sgv,
            direction = %reading.direction,
            "Fetched Nightscout entry"
        );

        Ok(reading)
    }
}

/// Parse an entries response and take the newest (first) entry.
///
/// Only the first entry has to be a reading; later entries may be of any
/// shape (meter or calibration records, say).
pub fn parse_latest(body: &[u8]) -> Result<Reading, FetchError> {
    let entries: Vec<Value> =
        serde_json::from_slice(body).map_err(|e| FetchError::parse(e.to_string(), body))?;

    let first = entries
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::parse("empty response array", body))?;

    serde_json::from_value(first).map_err(|e| FetchError::parse(e.to_string(), body))
}
