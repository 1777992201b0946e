//! I/O boundary traits for testability
//!
//! The HTTP GET against the CED is abstracted so services can be tested
//! with stub implementations.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::infrastructure::{InfraError, InfraResult};

/// Number of body characters quoted in a non-OK status error.
const SNIPPET_LEN: usize = 20;

/// HTTP GET returning a decoded JSON document.
pub trait Fetcher: Send + Sync {
    /// GET `url` with `params` as query string and decode the body as JSON.
    ///
    /// Repeated keys in `params` are sent as repeated query parameters.
    /// Any status other than 200 is an error regardless of body content.
    fn get_json(&self, url: &str, params: &[(String, String)], verify: bool) -> InfraResult<Value>;
}

// ============================================================
// REAL IMPLEMENTATION
// ============================================================

/// Blocking HTTP fetcher.
///
/// With `verify` the OS trust store is used for certificate validation (site
/// PKI is usually only installed there); without it, certificates are not
/// checked at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl HttpFetcher {
    fn client(verify: bool) -> reqwest::Result<Client> {
        Client::builder()
            .danger_accept_invalid_certs(!verify)
            .build()
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self, params))]
    fn get_json(&self, url: &str, params: &[(String, String)], verify: bool) -> InfraResult<Value> {
        let client = Self::client(verify).map_err(|e| InfraError::transport(url, e))?;

        let response = client
            .get(url)
            .query(params)
            .send()
            .map_err(|e| InfraError::transport(url, e))?;

        let request_url = response.url().to_string();
        let status = response.status();
        debug!("GET {} -> {}", request_url, status);

        let body = response
            .text()
            .map_err(|e| InfraError::transport(request_url.as_str(), e))?;

        if status != StatusCode::OK {
            return Err(InfraError::Status {
                url: request_url,
                status: status.as_u16(),
                snippet: snippet(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| InfraError::Decode {
            url: request_url,
            source,
        })
    }
}

/// Leading part of a response body on a single line.
fn snippet(body: &str) -> String {
    let head: String = body.chars().take(SNIPPET_LEN).collect();
    head.trim().lines().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_multiline_body_when_snippet_then_joins_first_chars() {
        assert_eq!(snippet("  <html>\n<body>Internal error occurred"), "<html> <body>Inter");
    }

    #[test]
    fn given_short_body_when_snippet_then_keeps_all() {
        assert_eq!(snippet("oops"), "oops");
    }
}
