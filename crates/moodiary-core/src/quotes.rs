//! Motivational-quote HTTP client.
//!
//! Thin fetch contract over an external quote API; retry/backoff is the
//! caller's concern, not this client's.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default quote API used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.quotable.io";

/// A fetched motivational quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Quote body.
    pub content: String,
    /// Attributed author.
    pub author: String,
}

/// HTTP client for the motivational-quote API.
#[derive(Debug, Clone)]
pub struct QuoteApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl QuoteApiClient {
    /// Builds a client for an explicit API base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into().as_str())?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| Error::QuoteApi(format!("Failed to construct HTTP client: {error}")))?;
        Ok(Self { base_url, client })
    }

    /// Builds a client for the default quote API.
    pub fn default_api() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one random quote.
    pub async fn fetch_random(&self) -> Result<Quote> {
        let url = format!("{}/random", self.base_url);
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|error| Error::QuoteApi(format!("Quote request failed: {error}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(Error::QuoteApi(format!(
                "Quote request failed with HTTP {status}"
            )));
        }

        response
            .json::<Quote>()
            .await
            .map_err(|error| Error::QuoteApi(format!("Malformed quote payload: {error}")))
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::QuoteApi("Base URL cannot be empty".to_string()));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(Error::QuoteApi(format!(
            "Base URL must be http(s): {trimmed}"
        )));
    }
    Ok(trimmed.to_string())
}
