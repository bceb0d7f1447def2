//! The fetch-paginate-summarize pipeline.
//!
//! Both modes share one loop: every located article is fetched in issue
//! order and handed to a [`Collector`] chosen by [`Mode`]. The collector
//! decides the summarization granularity:
//!
//! - **Whole digest**: bodies are buffered as `"<section>: <title>\n\n<body>"`
//!   and the newline-joined day is summarized once, untruncated
//! - **Per article**: each body, capped at [`ARTICLE_CHAR_LIMIT`] characters,
//!   is summarized as soon as it is fetched
//!
//! A failure while fetching or summarizing one article is logged with the
//! article's location and skipped; it never aborts the run.

use crate::api::{AskAsync, PromptTemplate};
use crate::cli::Mode;
use crate::config::ARTICLE_CHAR_LIMIT;
use crate::models::{ArticleRef, Digest, IssueMetadata, SummarizedArticle, Summary};
use crate::record::{RecordClient, articles, metadata};
use crate::utils::{error_chain, truncate_chars, truncate_for_log};
use itertools::Itertools;
use std::error::Error;
use tracing::{debug, error, info, instrument};

/// Resolve the latest issue, locate its articles and summarize them.
///
/// # Errors
///
/// Only the fatal preconditions escape: the metadata lookup and the article
/// index. Per-article and summarization failures are absorbed into the
/// returned [`Digest`].
#[instrument(level = "info", skip_all, fields(?mode))]
pub async fn run<S>(
    mode: Mode,
    record: &RecordClient,
    summarizer: &S,
) -> Result<Digest, Box<dyn Error>>
where
    S: AskAsync<Response = Summary>,
{
    let issue = metadata::latest_issue(record).await?;
    let located = articles::index_articles(record, &issue).await?;
    Ok(summarize_issue(mode, record, summarizer, &issue, &located).await)
}

/// Fetch and summarize already-located articles of `issue`.
#[instrument(level = "info", skip_all, fields(?mode, articles = located.len()))]
pub async fn summarize_issue<S>(
    mode: Mode,
    record: &RecordClient,
    summarizer: &S,
    issue: &IssueMetadata,
    located: &[ArticleRef],
) -> Digest
where
    S: AskAsync<Response = Summary>,
{
    let mut collector = Collector::new(mode);
    let mut failed = 0usize;

    for (index, article) in located.iter().enumerate() {
        debug!(index, section = %article.section, title = %article.title, "Processing article");
        let outcome = match articles::fetch_article(record, article).await {
            Ok(body) => collector.accept(summarizer, article, body).await,
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            failed += 1;
            error!(
                index,
                section = %article.section,
                title = %article.title,
                url = %article.url,
                error = %e,
                chain = %error_chain(&*e),
                "Article failed; skipping"
            );
        }
    }

    info!(
        total = located.len(),
        successful = located.len() - failed,
        failed,
        "Completed article processing"
    );
    collector.finish(summarizer, issue.digest_url()).await
}

/// Per-mode accumulation state for the article loop.
enum Collector {
    WholeDay { texts: Vec<String> },
    PerArticle { summaries: Vec<SummarizedArticle> },
}

impl Collector {
    fn new(mode: Mode) -> Self {
        match mode {
            Mode::WholeDigest => Collector::WholeDay { texts: Vec::new() },
            Mode::PerArticle => Collector::PerArticle {
                summaries: Vec::new(),
            },
        }
    }

    async fn accept<S>(
        &mut self,
        summarizer: &S,
        article: &ArticleRef,
        body: String,
    ) -> Result<(), Box<dyn Error>>
    where
        S: AskAsync<Response = Summary>,
    {
        match self {
            Collector::WholeDay { texts } => {
                texts.push(format!("{}\n\n{}", article.heading(), body));
            }
            Collector::PerArticle { summaries } => {
                let text = truncate_chars(&body, ARTICLE_CHAR_LIMIT);
                let summary = summarizer.ask(&PromptTemplate::Article.render(text)).await?;
                debug!(
                    title = %article.title,
                    preview = %truncate_for_log(&summary.text, 120),
                    "Article summarized"
                );
                summaries.push(SummarizedArticle {
                    article: article.clone(),
                    summary,
                });
            }
        }
        Ok(())
    }

    async fn finish<S>(self, summarizer: &S, digest_url: String) -> Digest
    where
        S: AskAsync<Response = Summary>,
    {
        match self {
            Collector::PerArticle { summaries } => Digest::PerArticle { summaries },
            Collector::WholeDay { texts } if texts.is_empty() => {
                info!("No article text collected; skipping digest summary");
                Digest::WholeDay {
                    digest_url,
                    summary: None,
                }
            }
            Collector::WholeDay { texts } => {
                let digest = texts.iter().join("\n");
                info!(articles = texts.len(), chars = digest.chars().count(), "Summarizing whole digest");
                let summary = match summarizer.ask(&PromptTemplate::Digest.render(&digest)).await {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        error!(error = %e, chain = %error_chain(&*e), "Digest summarization failed");
                        None
                    }
                };
                Digest::WholeDay {
                    digest_url,
                    summary,
                }
            }
        }
    }
}
