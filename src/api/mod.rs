//! LLM summarization with exponential backoff retry logic.
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`AskAsync`]: Core trait defining async LLM interaction
//! - [`claude::ClaudeClient`]: Anthropic Messages API backend
//! - [`RetryAsk`]: Decorator that adds retry logic to any `AskAsync` implementation
//! - [`PromptTemplate`]: The two fixed prompts (whole digest, single article)
//!
//! # Retry Strategy
//!
//! [`RetryAsk`] follows the shared [`Backoff`] policy and only repeats
//! failures that look transient: network timeouts and connection errors,
//! `429` and `5xx` (including Anthropic's `529 overloaded`).

pub mod claude;

use crate::config::Config;
use crate::http::{Backoff, is_transient};
use claude::{ApiStatusError, ClaudeClient};
use std::error::Error;
use std::fmt;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Trait for async LLM interaction.
///
/// Implementors of this trait can send text to an LLM and receive a response.
/// This abstraction allows for different LLM backends or decorators (like retry logic).
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send a fully rendered prompt to the LLM and receive a response.
    async fn ask(&self, prompt: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Prompt wrapped around the text being summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// The whole day's concatenated articles.
    Digest,
    /// A single article.
    Article,
}

impl PromptTemplate {
    pub fn render(&self, text: &str) -> String {
        match self {
            PromptTemplate::Digest => {
                format!("Summarize this digest of events in 10-15 concise paragraphs:\n\n{text}")
            }
            PromptTemplate::Article => format!(
                "Summarize this article in 1-2 concise paragraphs. Return only the paragraphs:\n\n{text}"
            ),
        }
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
pub struct RetryAsk<T> {
    /// The underlying LLM client to wrap.
    inner: T,
    backoff: Backoff,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    pub fn new(inner: T, backoff: Backoff) -> Self {
        Self { inner, backoff }
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.backoff.max_retries)
            .field("base_delay", &self.backoff.base_delay)
            .field("max_delay", &self.backoff.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, prompt: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(prompt).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if !is_retryable(&*e) || attempt > self.backoff.max_retries {
                        error!(
                            attempt,
                            max = self.backoff.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis(),
                            elapsed_ms_total = total_dt.as_millis(),
                            error = %e,
                            "ask() giving up"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff.delay_for(attempt);
                    warn!(
                        attempt,
                        max = self.backoff.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis(),
                        elapsed_ms_total = total_dt.as_millis(),
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

fn is_retryable(e: &(dyn Error + 'static)) -> bool {
    if let Some(e) = e.downcast_ref::<reqwest::Error>() {
        return is_transient(e);
    }
    if let Some(e) = e.downcast_ref::<ApiStatusError>() {
        return e.is_transient();
    }
    false
}

/// Build the production summarizer: a Claude client behind [`RetryAsk`].
pub fn summarizer(config: &Config) -> Result<RetryAsk<ClaudeClient>, Box<dyn Error>> {
    let client = ClaudeClient::new(config)?;
    Ok(RetryAsk::new(client, config.backoff))
}
