//! Answer backend selection and outcome types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sampling temperature used by every backend
pub const TEMPERATURE: f32 = 0.5;

/// Output token budget used by every backend
pub const MAX_OUTPUT_TOKENS: u32 = 1024;

/// The answer backends a run can use
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Gemini with Google Search grounding (no external context needed)
    #[value(alias = "default-cloud")]
    Gemini,
    /// Groq chat completions, fed with web search context
    #[value(alias = "cloud-with-search")]
    Groq,
    /// Local Ollama model, fed with web search context
    #[value(alias = "local-with-search")]
    Ollama,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Gemini, Backend::Groq, Backend::Ollama];

    /// Human-readable backend name
    pub fn display_name(self) -> &'static str {
        match self {
            Backend::Gemini => "Gemini",
            Backend::Groq => "Groq",
            Backend::Ollama => "Ollama",
        }
    }

    /// Whether prompts for this backend must carry external search context
    pub fn needs_search_context(self) -> bool {
        match self {
            Backend::Gemini => false,
            Backend::Groq | Backend::Ollama => true,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Sampling parameters shared by all backends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// Result of asking a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Normalized answer text
    Success(String),
    /// The backend could not produce an answer
    Failure { backend: Backend, reason: String },
}

impl AnswerOutcome {
    /// Build an outcome from a raw backend result.
    ///
    /// Errors and blank answers become failures and are logged.
    pub fn from_result(backend: Backend, result: Result<String>) -> Self {
        match result {
            Ok(text) => {
                let normalized = normalize_answer(&text);
                if normalized.is_empty() {
                    log::warn!("{} returned an empty answer", backend);
                    AnswerOutcome::Failure {
                        backend,
                        reason: "empty response".to_string(),
                    }
                } else {
                    AnswerOutcome::Success(normalized)
                }
            }
            Err(e) => {
                log::warn!("Error querying {} API: {}", backend, e);
                AnswerOutcome::Failure {
                    backend,
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AnswerOutcome::Failure { .. })
    }

    /// DRM status string: the answer, or a sentinel naming the failed backend
    pub fn into_status(self) -> String {
        match self {
            AnswerOutcome::Success(text) => text,
            AnswerOutcome::Failure { backend, .. } => failure_sentinel(backend),
        }
    }
}

/// Status recorded when a backend fails
pub fn failure_sentinel(backend: Backend) -> String {
    format!("Error: Could not get data from {}", backend.display_name())
}

/// Trim the answer and turn each line break into a single space
pub fn normalize_answer(text: &str) -> String {
    text.trim().replace("\r\n", " ").replace('\n', " ")
}
