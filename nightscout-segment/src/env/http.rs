//! Blocking HTTP GET transport.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};

/// Errors from the HTTP transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// A blocking GET of a URL, bounded by a timeout.
pub trait HttpTransport: Send + Sync {
    /// Fetch the body at `url`.
    ///
    /// Non-success statuses are reported as errors, never as a body.
    fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, TransportError>;
}

/// `HttpTransport` backed by `reqwest::blocking`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    pub fn new() -> Self {
        Self
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        // The timeout is per call, so the client is too.
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        let response = http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = TransportError::Status {
            status: 401,
            message: "Unauthorized".into(),
        };
        assert_eq!(err.to_string(), "HTTP status 401: Unauthorized");

        let err = TransportError::Client("TLS backend unavailable".into());
        assert_eq!(err.to_string(), "HTTP client error: TLS backend unavailable");
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let transport = ReqwestTransport::new();
        // Nothing listens on the discard port locally.
        let result = transport.get(
            "http://127.0.0.1:9/api/v1/entries.json",
            Duration::from_millis(200),
        );
        assert!(matches!(result, Err(TransportError::Http(_))));
    }
}
