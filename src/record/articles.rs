//! Locate and fetch the articles of one Congressional Record issue.
//!
//! The article index is paginated. The offset-0 page reports
//! `pagination.count`; further pages are requested at offsets advancing by
//! exactly [`PAGE_SIZE`] until the offset reaches the count, so every index
//! entry is read once with no gaps or overlaps.

use super::RecordClient;
use crate::config::{MAX_PAGES, PAGE_SIZE};
use crate::models::{ArticleRef, ArticlesPage, IssueMetadata};
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Page through an issue's article index and flatten it into [`ArticleRef`]s.
///
/// Order follows the API response: page by page, section by section,
/// article by article. Articles without a "Formatted Text" item have no body
/// to summarize and are skipped with a warning.
///
/// # Errors
///
/// Any failed or malformed page aborts indexing; a partial index would
/// silently drop articles from the digest.
#[instrument(level = "info", skip_all, fields(volume = %issue.volume_number, issue = %issue.issue_number))]
pub async fn index_articles(
    client: &RecordClient,
    issue: &IssueMetadata,
) -> Result<Vec<ArticleRef>, Box<dyn Error>> {
    index_articles_capped(client, issue, MAX_PAGES).await
}

/// [`index_articles`] with an explicit bound on the number of pages fetched.
async fn index_articles_capped(
    client: &RecordClient,
    issue: &IssueMetadata,
    max_pages: usize,
) -> Result<Vec<ArticleRef>, Box<dyn Error>> {
    let path = format!(
        "daily-congressional-record/{}/{}/articles",
        issue.volume_number, issue.issue_number
    );

    let mut articles = Vec::new();
    let mut skipped = 0usize;
    let mut offset = 0usize;
    let mut total: Option<usize> = None;

    for page_no in 0..max_pages {
        let page: ArticlesPage = client
            .get_json(
                &path,
                &[("offset", offset.to_string()), ("limit", PAGE_SIZE.to_string())],
            )
            .await?;

        let count = *total.get_or_insert(page.pagination.count);
        debug!(page_no, offset, count, sections = page.articles.len(), "Fetched article index page");

        for section in page.articles {
            for entry in section.section_articles {
                match entry.formatted_text_url() {
                    Some(url) => articles.push(ArticleRef {
                        section: section.name.clone(),
                        title: entry.title.clone(),
                        url: url.to_string(),
                    }),
                    None => {
                        skipped += 1;
                        warn!(section = %section.name, title = %entry.title, "No formatted text; skipping article");
                    }
                }
            }
        }

        offset += PAGE_SIZE;
        if offset >= count {
            info!(count = articles.len(), skipped, pages = page_no + 1, "Indexed Congressional Record articles");
            return Ok(articles);
        }
    }

    warn!(
        max_pages,
        count = articles.len(),
        reported = total.unwrap_or_default(),
        "Article index pagination hit the page cap; index may be incomplete"
    );
    Ok(articles)
}

/// Download one article's formatted text.
///
/// The body (HTML or plain text) is returned untouched.
#[instrument(level = "info", skip_all, fields(url = %article.url))]
pub async fn fetch_article(
    client: &RecordClient,
    article: &ArticleRef,
) -> Result<String, Box<dyn Error>> {
    let body = client.get_public_text(&article.url).await?;
    info!(bytes = body.len(), "Fetched article text");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ARTICLES_PATH: &str = "/v3/daily-congressional-record/170/40/articles";

    fn issue() -> IssueMetadata {
        IssueMetadata {
            congress: "118".to_string(),
            issue_date: "2024-03-05T05:00:00Z".to_string(),
            issue_number: "40".to_string(),
            session_number: "2".to_string(),
            url: String::new(),
            volume_number: "170".to_string(),
        }
    }

    fn client_for(server: &MockServer) -> RecordClient {
        RecordClient::new(&Config::for_tests(&server.uri(), &server.uri())).unwrap()
    }

    fn section(i: usize) -> Value {
        json!({
            "name": format!("Section {i}"),
            "sectionArticles": [{
                "title": format!("Article {i}"),
                "text": [
                    {"type": "PDF", "url": format!("https://example.com/{i}.pdf")},
                    {"type": "Formatted Text", "url": format!("https://example.com/{i}.htm")}
                ]
            }]
        })
    }

    /// Mount one mock per page for an index of `n` single-article sections.
    async fn mount_index(server: &MockServer, n: usize) {
        let mut offset = 0;
        loop {
            let sections: Vec<Value> = (offset..(offset + PAGE_SIZE).min(n)).map(section).collect();
            Mock::given(method("GET"))
                .and(path(ARTICLES_PATH))
                .and(query_param("offset", offset.to_string()))
                .and(query_param("limit", PAGE_SIZE.to_string()))
                .and(header("x-api-key", "test-record-key"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "articles": sections,
                    "pagination": {"count": n}
                })))
                .expect(1)
                .mount(server)
                .await;
            offset += PAGE_SIZE;
            if offset >= n {
                break;
            }
        }
    }

    async fn assert_indexes_exactly(n: usize) {
        let server = MockServer::start().await;
        mount_index(&server, n).await;

        let articles = index_articles(&client_for(&server), &issue()).await.unwrap();
        assert_eq!(articles.len(), n);
        for (i, article) in articles.iter().enumerate() {
            assert_eq!(article.section, format!("Section {i}"));
            assert_eq!(article.title, format!("Article {i}"));
            assert_eq!(article.url, format!("https://example.com/{i}.htm"));
        }
    }

    #[tokio::test]
    async fn test_index_empty_issue() {
        assert_indexes_exactly(0).await;
    }

    #[tokio::test]
    async fn test_index_single_partial_page() {
        assert_indexes_exactly(7).await;
    }

    #[tokio::test]
    async fn test_index_exactly_one_page() {
        assert_indexes_exactly(20).await;
    }

    #[tokio::test]
    async fn test_index_one_past_page_boundary() {
        assert_indexes_exactly(21).await;
    }

    #[tokio::test]
    async fn test_index_several_pages() {
        assert_indexes_exactly(45).await;
    }

    #[tokio::test]
    async fn test_index_stops_at_page_cap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ARTICLES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": [],
                "pagination": {"count": 1_000_000_000usize}
            })))
            .expect(3)
            .mount(&server)
            .await;

        let articles = index_articles_capped(&client_for(&server), &issue(), 3)
            .await
            .unwrap();
        assert!(articles.is_empty());

        let offsets: Vec<String> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter_map(|r| {
                r.url
                    .query_pairs()
                    .find(|(k, _)| k == "offset")
                    .map(|(_, v)| v.into_owned())
            })
            .collect();
        assert_eq!(offsets, vec!["0", "20", "40"]);
    }

    #[tokio::test]
    async fn test_index_flattens_sections_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ARTICLES_PATH))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": [
                    {
                        "name": "Senate",
                        "sectionArticles": [
                            {"title": "Prayer", "text": [{"type": "Formatted Text", "url": "https://example.com/s1.htm"}]},
                            {"title": "Pledge", "text": [{"type": "Formatted Text", "url": "https://example.com/s2.htm"}]}
                        ]
                    },
                    {
                        "name": "House",
                        "sectionArticles": [
                            {"title": "Recess", "text": [{"type": "Formatted Text", "url": "https://example.com/h1.htm"}]}
                        ]
                    }
                ],
                "pagination": {"count": 2}
            })))
            .mount(&server)
            .await;

        let articles = index_articles(&client_for(&server), &issue()).await.unwrap();
        let headings: Vec<String> = articles.iter().map(ArticleRef::heading).collect();
        assert_eq!(headings, vec!["Senate: Prayer", "Senate: Pledge", "House: Recess"]);
    }

    #[tokio::test]
    async fn test_index_skips_article_without_formatted_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ARTICLES_PATH))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": [{
                    "name": "Senate",
                    "sectionArticles": [
                        {"title": "PDF only", "text": [{"type": "PDF", "url": "https://example.com/x.pdf"}]},
                        {"title": "No renditions", "text": []},
                        {"title": "Has text", "text": [{"type": "Formatted Text", "url": "https://example.com/ok.htm"}]}
                    ]
                }],
                "pagination": {"count": 1}
            })))
            .mount(&server)
            .await;

        let articles = index_articles(&client_for(&server), &issue()).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Has text");
    }

    #[tokio::test]
    async fn test_index_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ARTICLES_PATH))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        assert!(index_articles(&client_for(&server), &issue()).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_article_returns_body_without_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/text/1.htm"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<pre>Mr. President...</pre>"))
            .mount(&server)
            .await;

        let article = ArticleRef {
            section: "Senate".to_string(),
            title: "Morning Business".to_string(),
            url: format!("{}/text/1.htm", server.uri()),
        };
        let body = fetch_article(&client_for(&server), &article).await.unwrap();
        assert_eq!(body, "<pre>Mr. President...</pre>");

        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| !r.headers.contains_key("x-api-key")));
    }
}
