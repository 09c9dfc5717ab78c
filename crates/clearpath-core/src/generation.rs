//! Text-generation collaborator
//!
//! The pipeline only needs `generate(prompt) -> text`. [`GeminiClient`] is
//! the shipped adapter, calling the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GeminiConfig;
use crate::error::{ClearPathError, Result};

/// Turns a single prompt into a single text reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit `prompt` and return the reply text.
    ///
    /// Transport, auth, and status failures are `GenerationUnavailable`.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate; empty when there is none.
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Gemini REST client
pub struct GeminiClient {
    config: GeminiConfig,
    api_key: String,
    http_client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client. Fails with `Config` when no API key is set.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("clearpath/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClearPathError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(GeminiClient {
            config,
            api_key,
            http_client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.config.model, prompt_chars = prompt.len(), "requesting generation");

        let request = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(ClearPathError::generation_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "text generation returned an error status");
            return Err(ClearPathError::GenerationUnavailable(format!(
                "generation returned HTTP {status}: {}",
                truncate(&body, 200)
            )));
        }

        let decoded: GenerateContentResponse = response.json().await.map_err(|e| {
            ClearPathError::GenerationUnavailable(format!("undecodable generation response: {e}"))
        })?;

        Ok(decoded.into_text())
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
