//! Command-line interface definitions for Congress Digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option has a default or an environment fallback, so running the
//! binary with no arguments executes the full pipeline.

use clap::{Parser, ValueEnum};

/// How the day's articles are turned into summaries.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Concatenate every article and summarize the whole day once.
    WholeDigest,
    /// Summarize each article on its own, skipping failures.
    PerArticle,
}

/// Command-line arguments for the Congress Digest application.
///
/// # Examples
///
/// ```sh
/// # Whole-day digest into ./summaries
/// congress_digest
///
/// # One summary per article
/// congress_digest --mode per-article
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Summarization granularity
    #[arg(long, value_enum, default_value_t = Mode::WholeDigest)]
    pub mode: Mode,

    /// Output directory for the dated Markdown digest
    #[arg(short, long, default_value = "summaries")]
    pub output_dir: String,

    /// congress.gov API key
    #[arg(long, env = "X_API_KEY", hide_env_values = true)]
    pub record_api_key: Option<String>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Base URL of the congress.gov record API
    #[arg(long, default_value = "https://api.congress.gov/v3/")]
    pub record_api_url: String,

    /// Base URL of the Anthropic Messages API
    #[arg(long, default_value = "https://api.anthropic.com/v1")]
    pub llm_api_url: String,

    /// Model used for summarization
    #[arg(long, default_value = "claude-haiku-4-5-20251001")]
    pub model: String,

    /// Maximum output tokens per summary
    #[arg(long, default_value_t = 500)]
    pub max_tokens: u32,

    /// Per-request timeout in seconds (record API, article bodies and LLM)
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Retries for transient network failures
    #[arg(long, default_value_t = 3)]
    pub max_retries: usize,
}
