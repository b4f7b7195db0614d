//! Groq chat completions client (OpenAI-compatible API)

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::http::{self, DEFAULT_TIMEOUT};
use super::{AnswerApi, AnswerOutcome, Backend, GenerationSettings};
use crate::config::ENV_GROQ_API_KEY;
use crate::error::{ApiError, Result};

const API_BASE_URL: &str = "https://api.groq.com";
const COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Groq client; sends the prompt as a single user message
pub struct GroqClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    model: String,
    settings: GenerationSettings,
}

impl GroqClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        host: Option<String>,
        settings: GenerationSettings,
    ) -> Result<Self> {
        Ok(Self {
            http: http::http_client(DEFAULT_TIMEOUT)?,
            base_url: http::base_url(host, API_BASE_URL),
            api_key,
            model: model.into(),
            settings,
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ApiError::MissingKey(ENV_GROQ_API_KEY))?;

        let request = CompletionRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.settings.temperature,
            max_completion_tokens: self.settings.max_output_tokens,
        };

        let url = format!("{}{}", self.base_url, COMPLETIONS_PATH);
        log::debug!("POST {} (model {})", url, self.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(ApiError::from)?;

        let body: CompletionResponse = http::read_json(response, "Groq").await?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ApiError::InvalidResponse("Groq returned no choices".to_string()).into())
    }
}

#[async_trait]
impl AnswerApi for GroqClient {
    fn backend(&self) -> Backend {
        Backend::Groq
    }

    async fn answer(&self, prompt: &str) -> AnswerOutcome {
        AnswerOutcome::from_result(Backend::Groq, self.complete(prompt).await)
    }
}
