//! Resolve the most recent daily issue of the Congressional Record.

use super::RecordClient;
use crate::models::{DailyRecordListing, IssueMetadata};
use std::error::Error;
use tracing::{info, instrument};

const LISTING_PATH: &str = "daily-congressional-record";

/// Fetch the newest issue from the record listing endpoint.
///
/// # Errors
///
/// Fails if the request fails, the body does not match the listing schema,
/// or the listing is empty. None of these are recoverable: without an issue
/// there is nothing to summarize.
#[instrument(level = "info", skip_all)]
pub async fn latest_issue(client: &RecordClient) -> Result<IssueMetadata, Box<dyn Error>> {
    let listing: DailyRecordListing = client
        .get_json(LISTING_PATH, &[("limit", "1".to_string())])
        .await?;

    let issue = listing
        .daily_congressional_record
        .into_iter()
        .next()
        .ok_or("record listing returned no issues")?;

    info!(
        congress = %issue.congress,
        session = %issue.session_number,
        volume = %issue.volume_number,
        issue = %issue.issue_number,
        date = %issue.issue_date,
        "Resolved latest Congressional Record issue"
    );
    Ok(issue)
}
