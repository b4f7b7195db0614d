//! Ollama client for local models

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::http;
use super::{AnswerApi, AnswerOutcome, Backend, GenerationSettings};
use crate::error::{ApiError, Result};

pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// Local generation on CPU can be slow
const GENERATE_TIMEOUT: Duration = Duration::from_secs(120);

/// Pulling a model downloads gigabytes
const PULL_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

/// Ollama client; pulls the model on first use if it is not installed
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    model: String,
    settings: GenerationSettings,
}

impl OllamaClient {
    pub fn new(
        model: impl Into<String>,
        host: Option<String>,
        settings: GenerationSettings,
    ) -> Result<Self> {
        Ok(Self {
            http: http::http_client(GENERATE_TIMEOUT)?,
            base_url: http::base_url(host, DEFAULT_HOST),
            model: model.into(),
            settings,
        })
    }

    /// Whether the model is already installed locally
    async fn has_model(&self) -> Result<bool> {
        let response = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(ApiError::from)?;

        let list: ListModelsResponse = http::read_json(response, "Ollama").await?;
        let tagged = format!("{}:latest", self.model);

        Ok(list
            .models
            .iter()
            .any(|m| m.name == self.model || m.name == tagged))
    }

    /// Pull the model if it is not installed
    async fn ensure_model(&self) -> Result<()> {
        if self.has_model().await? {
            return Ok(());
        }

        log::info!("Pulling Ollama model {}", self.model);

        let response = self
            .http
            .post(format!("{}/api/pull", self.base_url))
            .timeout(PULL_TIMEOUT)
            .json(&PullRequest {
                model: &self.model,
                stream: false,
            })
            .send()
            .await
            .map_err(ApiError::from)?;

        let pull: PullResponse = http::read_json(response, "Ollama").await?;
        log::debug!("Ollama pull {}: {}", self.model, pull.status);

        Ok(())
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.ensure_model().await?;

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.settings.temperature,
                num_predict: self.settings.max_output_tokens,
            },
        };

        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(ApiError::from)?;

        let body: GenerateResponse = http::read_json(response, "Ollama").await?;
        Ok(body.response)
    }
}

#[async_trait]
impl AnswerApi for OllamaClient {
    fn backend(&self) -> Backend {
        Backend::Ollama
    }

    async fn answer(&self, prompt: &str) -> AnswerOutcome {
        AnswerOutcome::from_result(Backend::Ollama, self.generate(prompt).await)
    }
}
