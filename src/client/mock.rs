//! Mock clients for testing
//!
//! Provide in-memory implementations of the client traits so the pipeline and
//! handlers can be exercised without network access.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{AnswerApi, AnswerOutcome, Backend, LibraryApi, OwnedGame, SearchApi};
use crate::error::{ApiError, Result};

/// Mock Steam library.
///
/// # Example
/// ```ignore
/// let mock = MockLibraryClient::new()
///     .with_vanity("gaben", "765")
///     .with_games(vec![OwnedGame::new("440", "Team Fortress 2")]);
/// ```
#[derive(Default)]
pub struct MockLibraryClient {
    vanity: Arc<Mutex<Vec<(String, String)>>>,
    games: Arc<Mutex<Vec<OwnedGame>>>,
    /// Error to return from the next call, consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    call_count: Arc<Mutex<LibraryCallCounts>>,
    requested_ids: Arc<Mutex<Vec<String>>>,
}

/// Tracks library call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct LibraryCallCounts {
    pub resolve_vanity: usize,
    pub owned_games: usize,
}

impl MockLibraryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vanity(self, vanity: &str, steam_id: &str) -> Self {
        self.vanity
            .try_lock()
            .expect("fresh mock")
            .push((vanity.to_string(), steam_id.to_string()));
        self
    }

    pub fn with_games(self, games: Vec<OwnedGame>) -> Self {
        *self.games.try_lock().expect("fresh mock") = games;
        self
    }

    pub fn with_error(self, error: ApiError) -> Self {
        *self.error.try_lock().expect("fresh mock") = Some(error);
        self
    }

    pub async fn call_counts(&self) -> LibraryCallCounts {
        self.call_count.lock().await.clone()
    }

    /// Steam IDs passed to `owned_games`
    pub async fn requested_ids(&self) -> Vec<String> {
        self.requested_ids.lock().await.clone()
    }

    async fn take_error(&self) -> Result<()> {
        match self.error.lock().await.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LibraryApi for MockLibraryClient {
    async fn resolve_vanity(&self, vanity: &str) -> Result<String> {
        self.call_count.lock().await.resolve_vanity += 1;
        self.take_error().await?;

        self.vanity
            .lock()
            .await
            .iter()
            .find(|(name, _)| name == vanity)
            .map(|(_, id)| id.clone())
            .ok_or_else(|| ApiError::NotFound(format!("Steam profile '{}'", vanity)).into())
    }

    async fn owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>> {
        self.call_count.lock().await.owned_games += 1;
        self.requested_ids.lock().await.push(steam_id.to_string());
        self.take_error().await?;
        Ok(self.games.lock().await.clone())
    }
}

/// Mock web search returning a fixed context and recording queries
#[derive(Default)]
pub struct MockSearchClient {
    context: Arc<Mutex<String>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(self, context: &str) -> Self {
        *self.context.try_lock().expect("fresh mock") = context.to_string();
        self
    }

    /// A search backend that is down; it yields no context like the real
    /// client does after absorbing an error
    pub fn failing() -> Self {
        Self::default()
    }

    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl SearchApi for MockSearchClient {
    async fn search(&self, query: &str) -> String {
        self.queries.lock().await.push(query.to_string());
        self.context.lock().await.clone()
    }
}

/// Mock answer backend returning a fixed outcome and recording prompts
pub struct MockAnswerClient {
    backend: Backend,
    outcome: Arc<Mutex<AnswerOutcome>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockAnswerClient {
    /// Backend that answers every prompt with `answer`
    pub fn new(backend: Backend, answer: &str) -> Self {
        Self {
            backend,
            outcome: Arc::new(Mutex::new(AnswerOutcome::Success(answer.to_string()))),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Backend that fails every prompt
    pub fn failing(backend: Backend) -> Self {
        Self {
            backend,
            outcome: Arc::new(Mutex::new(AnswerOutcome::Failure {
                backend,
                reason: "mock failure".to_string(),
            })),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn set_answer(&self, answer: &str) {
        *self.outcome.lock().await = AnswerOutcome::Success(answer.to_string());
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.prompts.lock().await.len()
    }
}

#[async_trait]
impl AnswerApi for MockAnswerClient {
    fn backend(&self) -> Backend {
        self.backend
    }

    async fn answer(&self, prompt: &str) -> AnswerOutcome {
        self.prompts.lock().await.push(prompt.to_string());
        self.outcome.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_library_error_consumed_once() {
        let mock = MockLibraryClient::new()
            .with_games(vec![OwnedGame::new("1", "A")])
            .with_error(ApiError::ServerError("down".to_string()));

        assert!(mock.owned_games("x").await.is_err());
        assert_eq!(mock.owned_games("x").await.unwrap().len(), 1);
        assert_eq!(mock.call_counts().await.owned_games, 2);
    }

    #[tokio::test]
    async fn test_unknown_vanity_not_found() {
        let mock = MockLibraryClient::new().with_vanity("gaben", "765");
        assert_eq!(mock.resolve_vanity("gaben").await.unwrap(), "765");
        assert!(mock.resolve_vanity("other").await.is_err());
    }

    #[tokio::test]
    async fn test_answer_records_prompts() {
        let mock = MockAnswerClient::new(Backend::Groq, "Denuvo");
        assert_eq!(
            mock.answer("p1").await,
            AnswerOutcome::Success("Denuvo".to_string())
        );
        mock.set_answer("DRM-Free").await;
        assert_eq!(mock.answer("p2").await.into_status(), "DRM-Free");
        assert_eq!(mock.prompts().await, vec!["p1", "p2"]);
    }
}
