//! Markdown rendering and writing of the dated digest.
//!
//! # Layout
//!
//! Whole-day mode:
//! ```text
//! # Congressional Summary - 2024-03-05
//!
//! https://www.congress.gov/congressional-record/volume-170/issue-40/daily-digest
//!
//! <summary>
//!
//! Input: 48211, Output: 497
//! ```
//!
//! Per-article mode repeats a `## <title>` block (URL, token footer,
//! summary, `---`) for every summarized article. With nothing to show, both
//! modes render the `No summaries for <date>` placeholder.

use crate::models::{Digest, Summary};
use std::error::Error;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Render `digest` for the run dated `date` (`YYYY-MM-DD`).
pub fn digest_to_markdown(digest: &Digest, date: &str) -> String {
    let mut md = String::new();
    writeln!(md, "# Congressional Summary - {date}\n").unwrap();

    match digest {
        Digest::WholeDay {
            digest_url,
            summary: Some(summary),
        } => {
            writeln!(md, "{digest_url}\n").unwrap();
            writeln!(md, "{}\n", summary.text).unwrap();
            writeln!(md, "{}\n", token_footer(summary)).unwrap();
        }
        Digest::PerArticle { summaries } if !summaries.is_empty() => {
            for item in summaries {
                writeln!(md, "## {}\n", item.article.title).unwrap();
                writeln!(md, "{}\n", item.article.url).unwrap();
                writeln!(md, "{}\n", token_footer(&item.summary)).unwrap();
                writeln!(md, "{}\n", item.summary.text).unwrap();
                writeln!(md, "---\n").unwrap();
            }
        }
        _ => {
            writeln!(md, "---\n").unwrap();
            writeln!(md, "No summaries for {date}\n").unwrap();
        }
    }
    md
}

fn token_footer(summary: &Summary) -> String {
    format!(
        "Input: {}, Output: {}",
        summary.input_tokens, summary.output_tokens
    )
}

/// Write `markdown` to `{output_dir}/{date}.md`, replacing any earlier file
/// for the same date, and return the path and its size in bytes.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), %date))]
pub async fn write_digest(
    output_dir: &Path,
    date: &str,
    markdown: &str,
) -> Result<(PathBuf, u64), Box<dyn Error>> {
    fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(format!("{date}.md"));

    fs::write(&path, markdown).await?;
    let size = fs::metadata(&path).await?.len();
    info!(path = %path.display(), bytes = size, "Wrote digest Markdown");
    Ok((path, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleRef, SummarizedArticle};

    fn summary(text: &str, input: u32, output: u32) -> Summary {
        Summary {
            text: text.to_string(),
            input_tokens: input,
            output_tokens: output,
        }
    }

    fn summarized(title: &str, url: &str, s: Summary) -> SummarizedArticle {
        SummarizedArticle {
            article: ArticleRef {
                section: "Senate".to_string(),
                title: title.to_string(),
                url: url.to_string(),
            },
            summary: s,
        }
    }

    #[test]
    fn test_whole_day_layout() {
        let digest = Digest::WholeDay {
            digest_url: "https://www.congress.gov/x/daily-digest".to_string(),
            summary: Some(summary("The Senate convened.", 48211, 497)),
        };

        assert_eq!(
            digest_to_markdown(&digest, "2024-03-05"),
            "# Congressional Summary - 2024-03-05\n\n\
             https://www.congress.gov/x/daily-digest\n\n\
             The Senate convened.\n\n\
             Input: 48211, Output: 497\n\n"
        );
    }

    #[test]
    fn test_per_article_layout() {
        let digest = Digest::PerArticle {
            summaries: vec![
                summarized("Prayer", "https://example.com/1.htm", summary("One.", 10, 2)),
                summarized("Recess", "https://example.com/3.htm", summary("Three.", 30, 4)),
            ],
        };

        assert_eq!(
            digest_to_markdown(&digest, "2024-03-05"),
            "# Congressional Summary - 2024-03-05\n\n\
             ## Prayer\n\nhttps://example.com/1.htm\n\nInput: 10, Output: 2\n\nOne.\n\n---\n\n\
             ## Recess\n\nhttps://example.com/3.htm\n\nInput: 30, Output: 4\n\nThree.\n\n---\n\n"
        );
    }

    #[test]
    fn test_placeholder_for_empty_digests() {
        let expected = "# Congressional Summary - 2024-03-05\n\n---\n\nNo summaries for 2024-03-05\n\n";

        let failed = Digest::WholeDay {
            digest_url: "https://www.congress.gov/x".to_string(),
            summary: None,
        };
        let none = Digest::PerArticle { summaries: vec![] };

        assert_eq!(digest_to_markdown(&failed, "2024-03-05"), expected);
        assert_eq!(digest_to_markdown(&none, "2024-03-05"), expected);
    }

    #[tokio::test]
    async fn test_write_digest_creates_dir_and_reports_size() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("summaries");

        let (path, size) = write_digest(&dir, "2024-03-05", "# hello\n").await.unwrap();
        assert_eq!(path, dir.join("2024-03-05.md"));
        assert_eq!(size, 8);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hello\n");
    }

    #[tokio::test]
    async fn test_write_digest_overwrites_same_day() {
        let tmp = tempfile::tempdir().unwrap();

        write_digest(tmp.path(), "2024-03-05", "first run, much longer content\n")
            .await
            .unwrap();
        let (path, size) = write_digest(tmp.path(), "2024-03-05", "second\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
        assert_eq!(size, 7);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}
