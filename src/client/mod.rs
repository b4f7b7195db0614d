//! Upstream API clients
//!
//! Each external service sits behind a small trait so the pipeline can be
//! driven by real HTTP clients in the CLI and by mocks in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod answer;
pub mod gemini;
pub mod groq;
pub(crate) mod http;
#[cfg(test)]
pub mod mock;
pub mod ollama;
pub mod search;
pub mod steam;

pub use answer::{AnswerOutcome, Backend, GenerationSettings};
pub use gemini::GeminiClient;
pub use groq::GroqClient;
#[cfg(test)]
pub use mock::{MockAnswerClient, MockLibraryClient, MockSearchClient};
pub use ollama::OllamaClient;
pub use search::GoogleSearchClient;
pub use steam::SteamClient;

/// Game library lookups (Steam Web API)
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// Resolve a custom profile URL name to a SteamID64
    async fn resolve_vanity(&self, vanity: &str) -> Result<String>;

    /// List the games owned by an account
    async fn owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>>;
}

/// Best-effort web search.
///
/// Implementations absorb every failure and return an empty string, which
/// callers treat as "no additional context".
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Combined snippet text for a query
    async fn search(&self, query: &str) -> String;
}

/// A language model that answers a prompt with text.
///
/// Implementations never return errors; failures come back as
/// [`AnswerOutcome::Failure`].
#[async_trait]
pub trait AnswerApi: Send + Sync {
    /// Which backend this client talks to
    fn backend(&self) -> Backend;

    /// Answer a prompt with normalized text
    async fn answer(&self, prompt: &str) -> AnswerOutcome;
}

/// A game owned by the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedGame {
    /// Steam app ID, stringified
    pub appid: String,

    /// Display name
    pub name: String,
}

impl OwnedGame {
    pub fn new(appid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            appid: appid.into(),
            name: name.into(),
        }
    }
}
