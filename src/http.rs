//! Bounded-retry HTTP helpers shared by the record API and article fetches.
//!
//! # Retry Strategy
//!
//! - Only transient failures are retried: timeouts, connection errors,
//!   `429 Too Many Requests` and `5xx` responses
//! - Exponential backoff starting at `base_delay`, capped at 30 seconds
//! - Random jitter (0-250ms) added to every delay

use rand::{Rng, rng};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::error::Error;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Retry policy for network calls.
///
/// The delay before retry `n` (1-based) is:
/// ```text
/// delay = min(base_delay * 2^(n-1), max_delay) + random_jitter(0..250ms)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Backoff {
    pub fn new(max_retries: usize, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }

    /// Delay before retry number `attempt` (1-based), without jitter.
    pub fn base_delay_for(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(31) as u32;
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    /// Delay before retry number `attempt` (1-based), jitter included.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let jitter_ms: u64 = rng().random_range(0..=250);
        self.base_delay_for(attempt) + Duration::from_millis(jitter_ms)
    }
}

/// Build a client with a finite per-request timeout.
pub fn build_client(timeout: Duration) -> Result<Client, Box<dyn Error>> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Whether a failed request is worth repeating.
pub fn is_transient(e: &reqwest::Error) -> bool {
    if e.is_timeout() || e.is_connect() {
        return true;
    }
    e.status()
        .is_some_and(|s| s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error())
}

/// Send a GET built by `request` and return the body as text, retrying
/// transient failures according to `backoff`.
///
/// `request` is called once per attempt because a [`RequestBuilder`] is
/// consumed by sending it.
#[instrument(level = "debug", skip_all, fields(%label))]
pub async fn get_text_with_backoff<F>(
    backoff: &Backoff,
    label: &str,
    request: F,
) -> Result<String, Box<dyn Error>>
where
    F: Fn() -> RequestBuilder,
{
    let total_t0 = Instant::now();
    let mut attempt = 0usize;

    loop {
        let attempt_t0 = Instant::now();
        match send_once(request()).await {
            Ok(body) => return Ok(body),
            Err(e) => {
                attempt += 1;
                let elapsed_ms_attempt = attempt_t0.elapsed().as_millis();
                let elapsed_ms_total = total_t0.elapsed().as_millis();

                if !is_transient(&e) || attempt > backoff.max_retries {
                    error!(
                        attempt,
                        max = backoff.max_retries,
                        elapsed_ms_attempt,
                        elapsed_ms_total,
                        error = %e,
                        "GET failed"
                    );
                    return Err(e.into());
                }

                let delay = backoff.delay_for(attempt);
                warn!(
                    attempt,
                    max = backoff.max_retries,
                    elapsed_ms_attempt,
                    elapsed_ms_total,
                    ?delay,
                    error = %e,
                    "GET attempt failed; backing off"
                );
                sleep(delay).await;
            }
        }
    }
}

async fn send_once(request: RequestBuilder) -> Result<String, reqwest::Error> {
    let response = request.send().await?.error_for_status()?;
    response.text().await
}
