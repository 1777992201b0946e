//! Infrastructure-level errors (HTTP transport and payload decoding)

use thiserror::Error;

/// Infrastructure errors carry the request URL for diagnostics.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("received status_code={status} (non-OK) response from {url}. response='{snippet} ...'")]
    Status {
        url: String,
        status: u16,
        snippet: String,
    },

    #[error("invalid JSON response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl InfraError {
    /// Create a transport error with the offending URL.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// URL of the failed request.
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } | Self::Decode { url, .. } => {
                url
            }
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
