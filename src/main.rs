//! # Congress Digest
//!
//! Summarizes the latest daily issue of the U.S. Congressional Record into a
//! dated Markdown file.
//!
//! ## Usage
//!
//! ```sh
//! X_API_KEY=... ANTHROPIC_API_KEY=... congress_digest
//! congress_digest --mode per-article
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Resolving**: Find the most recent issue on the congress.gov API
//! 2. **Indexing**: Page through the issue's article index
//! 3. **Fetching**: Download each article's formatted text, in order
//! 4. **Summarizing**: Send the whole day, or each article, to Claude
//! 5. **Output**: Write `summaries/<YYYY-MM-DD>.md`

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod http;
mod models;
mod outputs;
mod pipeline;
mod record;
mod utils;

use cli::Cli;
use config::Config;
use outputs::markdown;
use record::RecordClient;
use utils::{ensure_writable_dir, today};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("congress_digest starting up");

    let args = Cli::parse();
    debug!(mode = ?args.mode, output_dir = %args.output_dir, model = %args.model, "Parsed CLI arguments");

    // Credentials are checked before anything touches the network.
    let config = match Config::from_cli(args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };

    let output_dir = Path::new(&config.output_dir);
    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(
            path = %output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let record = RecordClient::new(&config)?;
    let summarizer = api::summarizer(&config)?;

    let digest = pipeline::run(config.mode, &record, &summarizer).await?;

    let date = today();
    let md = markdown::digest_to_markdown(&digest, &date);
    let (path, size) = markdown::write_digest(output_dir, &date, &md).await?;
    println!("File written. Size: {size} bytes");

    let elapsed = start_time.elapsed();
    info!(
        path = %path.display(),
        bytes = size,
        empty = digest.is_empty(),
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
