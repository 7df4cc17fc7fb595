//! Transport to the remote processor
//!
//! The gateway only needs one operation: send a body, get a body back. A
//! non-success status is an error that still carries the body the server
//! attached, because the processor explains refusals in it.

use crate::config::GatewayConfig;
use crate::scrub::scrub;
use crate::{GatewayError, Result};
use async_trait::async_trait;
use http::{HeaderMap, Method};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// One network round trip
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `body` and return the raw response body.
    ///
    /// # Errors
    ///
    /// [`GatewayError::ResponseError`] when the server answered with a
    /// non-success status (its body is preserved), [`GatewayError::Http`] when
    /// no answer arrived at all.
    async fn send(&self, method: Method, url: &str, body: String, headers: &HeaderMap) -> Result<String>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with an optional request timeout
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client))
    }

    /// Create a transport honouring the configured timeout
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Self::new(config.timeout())
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, url: &str, body: String, headers: &HeaderMap) -> Result<String> {
        debug!(
            "-> {} {}\n{}",
            method,
            url,
            scrub(&(transcript_headers(headers) + &body))
        );

        let response = self
            .client
            .request(method, url)
            .headers(headers.clone())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!("<- {} {}\n{}", status.as_u16(), url, scrub(&text));

        if !status.is_success() {
            return Err(GatewayError::ResponseError {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}

fn transcript_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}\n", canonical_name(name.as_str()), value.to_str().unwrap_or("<binary>")))
        .collect()
}

// http lowercases header names; the scrubber matches the canonical spelling
fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
