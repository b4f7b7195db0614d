//! Library check command
//!
//! Takes a Steam account, resolves it to a SteamID64, fetches the owned games
//! and runs every title through the DRM pipeline.

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use crate::cache::CacheStore;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::{Backend, LibraryApi};
use crate::error::{Error, Result};
use crate::models::LibraryReport;
use crate::output;
use crate::pipeline::{DrmPipeline, GameDrm};

/// Run the check command
pub async fn run(ctx: &CommandContext, account: &str, backend: Option<Backend>) -> Result<()> {
    let backend = ctx.backend(backend);
    debug!("Checking library of '{}' with {}", account.trim(), backend);

    let library = ctx.library()?;
    let pipeline = ctx.pipeline()?.with_progress(progress_bar(ctx.format));

    let games = check_library(&library, &pipeline, &ctx.cache, account, backend).await?;
    output::print(&LibraryReport::new(games), ctx.format)
}

/// Resolve an account's library to DRM statuses, sorted by name.
///
/// Library errors abort the whole run; nothing is cached in that case.
pub async fn check_library(
    library: &dyn LibraryApi,
    pipeline: &DrmPipeline,
    store: &CacheStore,
    account: &str,
    backend: Backend,
) -> Result<Vec<GameDrm>> {
    let account = validate_account(account)?;
    let steam_id = resolve_steam_id(library, account).await?;

    let games = library.owned_games(&steam_id).await?;
    debug!("Steam ID {} owns {} games", steam_id, games.len());
    if games.is_empty() {
        return Ok(Vec::new());
    }

    pipeline.run(store, &games, backend).await
}

/// Trim the account and reject blank input
pub fn validate_account(account: &str) -> Result<&str> {
    let account = account.trim();
    if account.is_empty() {
        return Err(Error::Input(
            "Steam ID or profile name must not be empty".to_string(),
        ));
    }
    Ok(account)
}

/// All-digit input is a SteamID64; anything else is a vanity name
async fn resolve_steam_id(library: &dyn LibraryApi, account: &str) -> Result<String> {
    if account.chars().all(|c| c.is_ascii_digit()) {
        return Ok(account.to_string());
    }
    library.resolve_vanity(account).await
}

fn progress_bar(format: OutputFormat) -> ProgressBar {
    if format == OutputFormat::Json {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar().template("{bar:30} {pos}/{len} {wide_msg}") {
        pb.set_style(style);
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::client::mock::{MockAnswerClient, MockLibraryClient, MockSearchClient};
    use crate::client::{AnswerApi, OwnedGame};
    use crate::error::ApiError;
    use crate::pipeline::AnswerBackends;

    struct Harness {
        _dir: TempDir,
        store: CacheStore,
        groq: Arc<MockAnswerClient>,
        pipeline: DrmPipeline,
    }

    fn harness() -> Harness {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::at(dir.path().join("cache.json"));
        let groq = Arc::new(MockAnswerClient::new(Backend::Groq, "DRM-Free"));
        let backends = AnswerBackends::new(
            Arc::new(MockAnswerClient::new(Backend::Gemini, "Steam DRM")),
            Arc::clone(&groq) as Arc<dyn AnswerApi>,
            Arc::new(MockAnswerClient::new(Backend::Ollama, "Denuvo")),
        );
        let pipeline = DrmPipeline::new(backends, Arc::new(MockSearchClient::new()));

        Harness {
            _dir: dir,
            store,
            groq,
            pipeline,
        }
    }

    #[test]
    fn test_validate_account() {
        assert_eq!(validate_account("  gaben ").unwrap(), "gaben");
        assert!(matches!(validate_account(""), Err(Error::Input(_))));
        assert!(matches!(validate_account(" \t "), Err(Error::Input(_))));
    }

    #[tokio::test]
    async fn test_blank_account_does_no_work() {
        let h = harness();
        let library = MockLibraryClient::new();

        let result = check_library(&library, &h.pipeline, &h.store, "   ", Backend::Groq).await;

        assert!(matches!(result, Err(Error::Input(_))));
        let counts = library.call_counts().await;
        assert_eq!(counts.resolve_vanity, 0);
        assert_eq!(counts.owned_games, 0);
        assert!(!h.store.path().exists());
    }

    #[tokio::test]
    async fn test_numeric_id_skips_vanity_lookup() {
        let h = harness();
        let library =
            MockLibraryClient::new().with_games(vec![OwnedGame::new("440", "Team Fortress 2")]);

        let games = check_library(
            &library,
            &h.pipeline,
            &h.store,
            "76561197960287930",
            Backend::Groq,
        )
        .await
        .unwrap();

        assert_eq!(library.call_counts().await.resolve_vanity, 0);
        assert_eq!(library.requested_ids().await, vec!["76561197960287930"]);
        assert_eq!(games[0].drm, "DRM-Free");
    }

    #[tokio::test]
    async fn test_vanity_name_resolved_first() {
        let h = harness();
        let library = MockLibraryClient::new()
            .with_vanity("gaben", "76561197960287930")
            .with_games(vec![
                OwnedGame::new("2", "Zelda-like"),
                OwnedGame::new("1", "Alpha Quest"),
            ]);

        let games = check_library(&library, &h.pipeline, &h.store, "gaben", Backend::Groq)
            .await
            .unwrap();

        assert_eq!(library.requested_ids().await, vec!["76561197960287930"]);
        let names: Vec<_> = games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha Quest", "Zelda-like"]);
        assert_eq!(h.groq.call_count().await, 2);
        assert_eq!(h.store.load().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_vanity_aborts() {
        let h = harness();
        let library = MockLibraryClient::new();

        let result = check_library(&library, &h.pipeline, &h.store, "nobody", Backend::Groq).await;

        assert!(matches!(result, Err(Error::Api(ApiError::NotFound(_)))));
        assert_eq!(library.call_counts().await.owned_games, 0);
    }

    #[tokio::test]
    async fn test_library_error_aborts_without_results() {
        let h = harness();
        let library = MockLibraryClient::new()
            .with_games(vec![OwnedGame::new("440", "Team Fortress 2")])
            .with_error(ApiError::ServerError("Steam is down".to_string()));

        let result = check_library(&library, &h.pipeline, &h.store, "440", Backend::Groq).await;

        assert!(matches!(result, Err(Error::Api(ApiError::ServerError(_)))));
        assert_eq!(h.groq.call_count().await, 0);
        assert!(h.store.load().is_empty());
    }

    #[tokio::test]
    async fn test_private_profile_returns_empty() {
        let h = harness();
        let library = MockLibraryClient::new();

        let games = check_library(&library, &h.pipeline, &h.store, "123", Backend::Groq)
            .await
            .unwrap();

        assert!(games.is_empty());
        assert_eq!(h.groq.call_count().await, 0);
    }

    #[test]
    fn test_progress_hidden_for_json() {
        assert!(progress_bar(OutputFormat::Json).is_hidden());
    }
}
