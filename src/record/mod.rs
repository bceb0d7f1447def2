//! congress.gov Congressional Record API access.
//!
//! Like a news scraper, the record source is handled in two phases:
//!
//! 1. **Indexing**: [`metadata::latest_issue`] finds the most recent issue and
//!    [`articles::index_articles`] pages through its article index
//! 2. **Fetching**: [`articles::fetch_article`] downloads one article's
//!    formatted text
//!
//! Index calls carry the API key in the `x-api-key` header. Article bodies
//! are public and fetched without it.

pub mod articles;
pub mod metadata;

use crate::config::Config;
use crate::http::{Backoff, build_client, get_text_with_backoff};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::error::Error;
use tracing::{debug, instrument};
use url::Url;

/// Client for the record API and the article text it links to.
#[derive(Debug, Clone)]
pub struct RecordClient {
    http: Client,
    base_url: Url,
    api_key: String,
    backoff: Backoff,
}

impl RecordClient {
    pub fn new(config: &Config) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            http: build_client(config.request_timeout)?,
            base_url: config.record_api_url.clone(),
            api_key: config.record_api_key.clone(),
            backoff: config.backoff,
        })
    }

    /// GET `path` (relative to the API base) with `format=json` plus `query`,
    /// and decode the JSON body.
    #[instrument(level = "debug", skip(self, query))]
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Box<dyn Error>> {
        let url = self.base_url.join(path)?;
        let body = get_text_with_backoff(&self.backoff, path, || {
            self.http
                .get(url.clone())
                .header("x-api-key", &self.api_key)
                .query(&[("format", "json")])
                .query(query)
        })
        .await?;
        debug!(bytes = body.len(), "Record API response");

        serde_json::from_str(&body)
            .map_err(|e| format!("malformed response from {path}: {e}").into())
    }

    /// Unauthenticated GET of an absolute URL, returned as opaque text.
    pub(crate) async fn get_public_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        get_text_with_backoff(&self.backoff, url, || self.http.get(url)).await
    }
}
