//! Fetch error types.

use crate::env::TransportError;

/// Errors fetching the latest reading.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The GET itself failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body was not a non-empty array of entries
    #[error("JSON parse error: {message}")]
    Parse {
        message: String,
        body: Option<String>,
    },
}

impl FetchError {
    /// A parse error keeping the start of the offending body.
    pub(crate) fn parse(message: impl Into<String>, body: &[u8]) -> Self {
        FetchError::Parse {
            message: message.into(),
            body: Some(String::from_utf8_lossy(body).chars().take(500).collect()),
        }
    }
}
