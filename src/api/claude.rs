//! Anthropic Messages API backend for [`AskAsync`].

use super::AskAsync;
use crate::config::Config;
use crate::http::build_client;
use crate::models::Summary;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    User,
}

#[derive(Debug, Clone, Serialize)]
struct WireMessage {
    role: Role,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

impl ChatResponse {
    fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other => None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Non-success HTTP status returned by the Messages API.
#[derive(Debug)]
pub struct ApiStatusError {
    status: StatusCode,
    body: String,
}

impl ApiStatusError {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Rate limiting and server-side failures (including `529 overloaded`).
    pub fn is_transient(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS || self.status.is_server_error()
    }
}

impl fmt::Display for ApiStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Claude API error ({}): {}", self.status, self.body)
    }
}

impl Error for ApiStatusError {}

// =============================================================================
// Client
// =============================================================================

/// Single-shot summarization against `POST {base}/messages`.
pub struct ClaudeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeClient {
    pub fn new(config: &Config) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            http: build_client(config.request_timeout)?,
            base_url: config.llm_api_url.clone(),
            api_key: config.llm_api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn headers(&self) -> Result<HeaderMap, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

impl fmt::Debug for ClaudeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaudeClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl AskAsync for ClaudeClient {
    type Response = Summary;

    #[instrument(level = "info", skip_all, fields(model = %self.model, prompt_bytes = prompt.len()))]
    async fn ask(&self, prompt: &str) -> Result<Summary, Box<dyn Error>> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![WireMessage {
                role: Role::User,
                content: prompt.to_string(),
            }],
        };

        debug!("Claude messages request");
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(elapsed_ms = t0.elapsed().as_millis(), %status, "Claude API call failed");
            return Err(Box::new(ApiStatusError::new(status, body)));
        }

        let chat: ChatResponse = response.json().await?;
        let text = chat.text().ok_or("Claude response contained no text block")?;

        info!(
            elapsed_ms = t0.elapsed().as_millis(),
            input_tokens = chat.usage.input_tokens,
            output_tokens = chat.usage.output_tokens,
            "Claude summary received"
        );
        Ok(Summary {
            text: text.to_string(),
            input_tokens: chat.usage.input_tokens,
            output_tokens: chat.usage.output_tokens,
        })
    }
}
