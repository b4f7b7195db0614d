//! Per-title DRM resolution
//!
//! Every title goes through the same steps: check the cache, and on a miss or
//! an expired record ask an answer backend, then record the answer. Titles
//! are processed one at a time; the answer backends and the cache are never
//! touched concurrently within a run.

pub mod prompt;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use indicatif::ProgressBar;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheStore, DEFAULT_TTL_DAYS, DrmCache, Freshness};
use crate::client::{AnswerApi, Backend, OwnedGame, SearchApi};
use crate::config::{Config, RefreshBackend};
use crate::error::Result;

/// DRM status resolved for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDrm {
    pub name: String,
    pub appid: String,
    pub drm: String,
}

/// The three answer backends, one client each
pub struct AnswerBackends {
    gemini: Arc<dyn AnswerApi>,
    groq: Arc<dyn AnswerApi>,
    ollama: Arc<dyn AnswerApi>,
}

impl AnswerBackends {
    pub fn new(
        gemini: Arc<dyn AnswerApi>,
        groq: Arc<dyn AnswerApi>,
        ollama: Arc<dyn AnswerApi>,
    ) -> Self {
        Self {
            gemini,
            groq,
            ollama,
        }
    }

    /// Client for a backend
    pub fn get(&self, backend: Backend) -> &dyn AnswerApi {
        match backend {
            Backend::Gemini => self.gemini.as_ref(),
            Backend::Groq => self.groq.as_ref(),
            Backend::Ollama => self.ollama.as_ref(),
        }
    }
}

/// Tunables for a resolution run
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Age at which a cached status is re-queried
    pub ttl: Duration,
    /// Store backend failures in the cache like any other answer
    pub cache_failures: bool,
    /// Backend used for expired records
    pub refresh_backend: RefreshBackend,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::days(i64::from(DEFAULT_TTL_DAYS)),
            cache_failures: true,
            refresh_backend: RefreshBackend::Gemini,
        }
    }
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            ttl: config.cache_ttl(),
            cache_failures: config.preferences.cache_failures,
            refresh_backend: config.preferences.refresh_backend,
        }
    }
}

/// Counters for one run, logged when the run finishes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub cache_hits: usize,
    pub refreshed: usize,
    pub queried: usize,
    pub failures: usize,
}

/// Resolves DRM status for a list of games
pub struct DrmPipeline {
    backends: AnswerBackends,
    search: Arc<dyn SearchApi>,
    options: PipelineOptions,
    progress: Option<ProgressBar>,
}

impl DrmPipeline {
    pub fn new(backends: AnswerBackends, search: Arc<dyn SearchApi>) -> Self {
        Self {
            backends,
            search,
            options: PipelineOptions::default(),
            progress: None,
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Tick a progress bar once per resolved title
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run the full pipeline against a cache file.
    ///
    /// Loads the cache, resolves every game with `backend` for cache misses,
    /// saves the cache once, and returns results sorted by name.
    pub async fn run(
        &self,
        store: &CacheStore,
        games: &[OwnedGame],
        backend: Backend,
    ) -> Result<Vec<GameDrm>> {
        let mut cache = store.load();
        if cache.is_empty() {
            debug!("Starting from an empty cache at {}", store.path().display());
        }
        let (results, _) = self
            .resolve_all(&mut cache, games, backend, Utc::now())
            .await;
        store.save(&cache)?;
        Ok(results)
    }

    /// Resolve every game against an in-memory cache.
    ///
    /// `now` is the run start: it decides freshness and stamps new records.
    pub async fn resolve_all(
        &self,
        cache: &mut DrmCache,
        games: &[OwnedGame],
        backend: Backend,
        now: DateTime<Utc>,
    ) -> (Vec<GameDrm>, RunStats) {
        let mut stats = RunStats::default();
        let mut results = Vec::with_capacity(games.len());

        if let Some(pb) = &self.progress {
            pb.set_length(games.len() as u64);
        }

        for game in games {
            if let Some(pb) = &self.progress {
                pb.set_message(game.name.clone());
            }

            let drm = self.resolve_title(cache, game, backend, now, &mut stats).await;
            results.push(GameDrm {
                name: game.name.clone(),
                appid: game.appid.clone(),
                drm,
            });

            if let Some(pb) = &self.progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }

        sort_by_name(&mut results);

        info!(
            "Resolved {} games: {} cached, {} refreshed, {} queried, {} failed",
            results.len(),
            stats.cache_hits,
            stats.refreshed,
            stats.queried,
            stats.failures
        );

        (results, stats)
    }

    async fn resolve_title(
        &self,
        cache: &mut DrmCache,
        game: &OwnedGame,
        backend: Backend,
        now: DateTime<Utc>,
        stats: &mut RunStats,
    ) -> String {
        if let Some(drm) = cache.lookup(&game.appid, now, self.options.ttl) {
            debug!("Cache hit for {}", game.name);
            stats.cache_hits += 1;
            return drm.to_string();
        }

        let query_backend = if let Freshness::Expired(stale) =
            cache.freshness(&game.appid, now, self.options.ttl)
        {
            let refresh = match self.options.refresh_backend {
                RefreshBackend::Gemini => Backend::Gemini,
                RefreshBackend::Selected => backend,
            };
            debug!(
                "Cache expired for {} (was {}). Researching again with {}",
                game.name, stale, refresh
            );
            stats.refreshed += 1;
            refresh
        } else {
            debug!("Cache miss for {}. Querying {}", game.name, backend);
            stats.queried += 1;
            backend
        };

        let outcome = self
            .backends
            .get(query_backend)
            .answer(&self.build_prompt(&game.name, query_backend).await)
            .await;

        let failed = outcome.is_failure();
        let drm = outcome.into_status();

        if failed {
            stats.failures += 1;
            if !self.options.cache_failures {
                debug!("Not caching failed lookup for {}", game.name);
                return drm;
            }
        }

        cache.put(&game.appid, drm.clone(), now);
        drm
    }

    /// Final prompt for a game; fetches search context when the backend needs it
    async fn build_prompt(&self, game_name: &str, backend: Backend) -> String {
        let base = prompt::base_prompt(game_name);
        if !backend.needs_search_context() {
            return base;
        }

        let context = self.search.search(&prompt::search_query(game_name)).await;
        prompt::with_search_context(&base, &context)
    }
}

/// Sort results by name using ordinal string comparison
pub fn sort_by_name(results: &mut [GameDrm]) {
    results.sort_by(|a, b| a.name.cmp(&b.name));
}
