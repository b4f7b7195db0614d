//! Gemini client with Google Search grounding
//!
//! Gemini runs its own search tool, so prompts sent here carry no external
//! context.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::http;
use super::{AnswerApi, AnswerOutcome, Backend, GenerationSettings};
use crate::config::ENV_GEMINI_API_KEY;
use crate::error::{ApiError, Result};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Grounded generation can take a while
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    tools: Vec<Tool>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    model: String,
    settings: GenerationSettings,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        host: Option<String>,
        settings: GenerationSettings,
    ) -> Result<Self> {
        Ok(Self {
            http: http::http_client(REQUEST_TIMEOUT)?,
            base_url: http::base_url(host, API_BASE_URL),
            api_key,
            model: model.into(),
            settings,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ApiError::MissingKey(ENV_GEMINI_API_KEY))?;

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_output_tokens,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(ApiError::from)?;

        let body: GenerateResponse = http::read_json(response, "Gemini").await?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| ApiError::InvalidResponse("Gemini returned no candidates".to_string()))?;

        Ok(text)
    }
}

#[async_trait]
impl AnswerApi for GeminiClient {
    fn backend(&self) -> Backend {
        Backend::Gemini
    }

    async fn answer(&self, prompt: &str) -> AnswerOutcome {
        AnswerOutcome::from_result(Backend::Gemini, self.generate(prompt).await)
    }
}
