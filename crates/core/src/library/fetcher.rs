use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ETAG, IF_NONE_MATCH};
use reqwest::StatusCode;
use tracing::{debug, error};
use url::Url;

use super::types::LibraryError;
use crate::config::CatalogConfig;

/// Result of a conditional catalog fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The server answered 304; the cached catalog is still current.
    NotModified,
    /// A fresh feed body, with the new etag when the server sent one.
    Fetched {
        data: Vec<u8>,
        etag: Option<String>,
        url_host: String,
    },
}

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch the catalog feed, conditionally when an etag is known.
    async fn fetch(&self, etag: Option<&str>) -> Result<FetchOutcome, LibraryError>;
}

/// reqwest-backed fetcher for the configured catalog endpoint.
pub struct HttpFeedFetcher {
    client: reqwest::Client,
    url: String,
    url_host: String,
}

impl HttpFeedFetcher {
    pub fn new(config: &CatalogConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        let url_host = Url::parse(&config.url)
            .ok()
            .and_then(|url| {
                url.host_str()
                    .map(|host| format!("{}://{}", url.scheme(), host))
            })
            .unwrap_or_else(|| config.url.clone());

        Self {
            client,
            url: config.url.clone(),
            url_host,
        }
    }

    pub fn url_host(&self) -> &str {
        &self.url_host
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, etag: Option<&str>) -> Result<FetchOutcome, LibraryError> {
        let mut request = self.client.get(&self.url);
        if let Some(etag) = etag {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await.map_err(|e| {
            error!(url = %self.url, error = %e, "Catalog request failed");
            LibraryError::Retrieval {
                status: None,
                message: e.to_string(),
            }
        })?;

        match response.status() {
            StatusCode::OK => {
                let etag = response
                    .headers()
                    .get(ETAG)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string);
                let data = response
                    .bytes()
                    .await
                    .map_err(|e| LibraryError::Retrieval {
                        status: None,
                        message: e.to_string(),
                    })?
                    .to_vec();
                debug!(bytes = data.len(), "Fetched catalog feed");
                Ok(FetchOutcome::Fetched {
                    data,
                    etag,
                    url_host: self.url_host.clone(),
                })
            }
            StatusCode::NOT_MODIFIED => Ok(FetchOutcome::NotModified),
            status => Err(LibraryError::Retrieval {
                status: Some(status.as_u16()),
                message: format!("HTTP Status {}.", status.as_u16()),
            }),
        }
    }
}
