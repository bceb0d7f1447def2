//! Runtime configuration assembled once at startup.
//!
//! [`Config`] is built from the parsed [`Cli`] and handed to every component,
//! so nothing reads the process environment after startup. Missing
//! credentials are rejected here, before any network call is attempted.

use crate::cli::{Cli, Mode};
use crate::http::Backoff;
use std::error::Error;
use std::time::Duration;
use url::Url;

/// Articles requested per page of an issue's article index.
pub const PAGE_SIZE: usize = 20;

/// Characters of article body sent to the LLM in per-article mode.
pub const ARTICLE_CHAR_LIMIT: usize = 10_000;

/// Upper bound on article index pages fetched for a single issue.
pub const MAX_PAGES: usize = 1_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub output_dir: String,
    pub record_api_key: String,
    pub record_api_url: Url,
    pub llm_api_key: String,
    pub llm_api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub backoff: Backoff,
}

impl Config {
    /// Validate CLI/environment input and build the run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either API key is missing or blank, or if the
    /// record API base URL does not parse.
    pub fn from_cli(cli: Cli) -> Result<Self, Box<dyn Error>> {
        let record_api_key = required(cli.record_api_key, "X_API_KEY")?;
        let llm_api_key = required(cli.llm_api_key, "ANTHROPIC_API_KEY")?;

        // Url::join drops the last path segment unless the base ends in '/'.
        let mut base = cli.record_api_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let record_api_url = Url::parse(&base)?;

        Ok(Self {
            mode: cli.mode,
            output_dir: cli.output_dir,
            record_api_key,
            record_api_url,
            llm_api_key,
            llm_api_url: cli.llm_api_url.trim_end_matches('/').to_string(),
            model: cli.model,
            max_tokens: cli.max_tokens,
            request_timeout: Duration::from_secs(cli.timeout_secs),
            backoff: Backoff::new(cli.max_retries, Duration::from_secs(1)),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Configuration pointing both services at local mock servers.
    pub fn for_tests(record_api_url: &str, llm_api_url: &str) -> Self {
        Self {
            mode: Mode::WholeDigest,
            output_dir: "summaries".to_string(),
            record_api_key: "test-record-key".to_string(),
            record_api_url: Url::parse(&format!("{}/v3/", record_api_url.trim_end_matches('/')))
                .unwrap(),
            llm_api_key: "test-llm-key".to_string(),
            llm_api_url: llm_api_url.trim_end_matches('/').to_string(),
            model: "claude-haiku-4-5-20251001".to_string(),
            max_tokens: 500,
            request_timeout: Duration::from_secs(5),
            backoff: Backoff::new(0, Duration::from_millis(1)),
        }
    }
}

fn required(value: Option<String>, var: &str) -> Result<String, Box<dyn Error>> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("{var} is not set; export it or pass it as a flag").into()),
    }
}
