// src/utils/http.rs

//! HTTP fetching.
//!
//! Every failure is returned as a [`FetchError`]; nothing here panics or
//! retries. A request is attempted exactly once and is bounded by the client
//! timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use url::Url;

use crate::error::{FetchError, Result};
use crate::models::CrawlerConfig;

/// A fetched page: the response body and the URL it was served from, after
/// any redirects.
///
/// Parsing happens on demand and synchronously, so the parsed tree never
/// outlives the extraction call that built it.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub url: String,
    pub body: String,
}

impl FetchedDocument {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// Parse the body as an HTML document.
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.body)
    }

    /// Source URL, if it is absolute.
    pub fn base_url(&self) -> Option<Url> {
        Url::parse(&self.url).ok()
    }
}

/// Source of HTML pages.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedDocument, FetchError>;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Build a fetcher with the configured user agent and timeout.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedDocument, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        // Redirects are followed; relative links resolve against where we landed.
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(FetchError::network)?;
        Ok(FetchedDocument::new(final_url, body))
    }
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}
