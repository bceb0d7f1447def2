//! Data models for Congressional Record issues, articles and summaries.
//!
//! This module defines the core data structures used throughout the application:
//! - [`IssueMetadata`]: The most recent daily issue as reported by the record API
//! - [`ArticleRef`]: Where one article of an issue lives
//! - [`Summary`]: LLM output plus token usage
//! - [`SummarizedArticle`]: An [`ArticleRef`] paired with its [`Summary`]
//! - [`Digest`]: The run's result, handed to the Markdown renderer
//!
//! The record API wire types ([`DailyRecordListing`], [`ArticlesPage`] and
//! friends) use camelCase field names, mapped with `#[serde(rename_all)]`.

use serde::{Deserialize, Deserializer};

/// The `type` value marking the article text item we summarize.
pub const FORMATTED_TEXT: &str = "Formatted Text";

/// One dated publication of the Congressional Record.
///
/// Identifier fields are normalized to strings because the record API is
/// not consistent about emitting them as numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueMetadata {
    #[serde(deserialize_with = "string_or_number")]
    pub congress: String,
    pub issue_date: String,
    #[serde(deserialize_with = "string_or_number")]
    pub issue_number: String,
    #[serde(deserialize_with = "string_or_number")]
    pub session_number: String,
    pub url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub volume_number: String,
}

impl IssueMetadata {
    /// Public congress.gov page for this issue's daily digest.
    pub fn digest_url(&self) -> String {
        format!(
            "https://www.congress.gov/congressional-record/volume-{}/issue-{}/daily-digest",
            self.volume_number, self.issue_number
        )
    }
}

/// Location of one article within an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    /// Name of the section the article belongs to (e.g. "Senate").
    pub section: String,
    /// The article title.
    pub title: String,
    /// URL of the article's formatted text.
    pub url: String,
}

impl ArticleRef {
    /// Heading line used when the article is concatenated into a digest.
    pub fn heading(&self) -> String {
        format!("{}: {}", self.section, self.title)
    }
}

/// Generated text plus the token usage reported by the LLM service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// One successfully summarized article (per-article mode only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizedArticle {
    pub article: ArticleRef,
    pub summary: Summary,
}

/// Everything the renderer needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Digest {
    /// One summary of the whole day; `None` when summarization failed or
    /// there was nothing to summarize.
    WholeDay {
        digest_url: String,
        summary: Option<Summary>,
    },
    /// Successfully summarized articles, in issue order.
    PerArticle { summaries: Vec<SummarizedArticle> },
}

impl Digest {
    /// Whether the digest has no summary content at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Digest::WholeDay { summary, .. } => summary.is_none(),
            Digest::PerArticle { summaries } => summaries.is_empty(),
        }
    }
}

// -----------------------------------------------------------------------------
// Record API wire types
// -----------------------------------------------------------------------------

/// Response of the `daily-congressional-record` listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecordListing {
    pub daily_congressional_record: Vec<IssueMetadata>,
}

/// One page of an issue's article index.
#[derive(Debug, Deserialize)]
pub struct ArticlesPage {
    #[serde(default)]
    pub articles: Vec<Section>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub count: usize,
}

/// A named section of an issue and the articles printed in it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub name: String,
    #[serde(default)]
    pub section_articles: Vec<SectionArticle>,
}

#[derive(Debug, Deserialize)]
pub struct SectionArticle {
    pub title: String,
    #[serde(default)]
    pub text: Vec<TextItem>,
}

impl SectionArticle {
    /// URL of the first "Formatted Text" item, if the article has one.
    pub fn formatted_text_url(&self) -> Option<&str> {
        self.text
            .iter()
            .find(|item| item.kind == FORMATTED_TEXT)
            .map(|item| item.url.as_str())
    }
}

/// A renditions entry of an article (formatted text, PDF, ...).
#[derive(Debug, Deserialize)]
pub struct TextItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}
