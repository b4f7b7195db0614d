//! Command execution context
//!
//! Loads configuration once and builds the upstream clients that commands
//! need. Clients are constructed here and handed to the pipeline explicitly;
//! nothing is kept in process-wide state.

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{
    AnswerApi, Backend, GeminiClient, GenerationSettings, GoogleSearchClient, GroqClient,
    OllamaClient, SteamClient,
};
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{AnswerBackends, DrmPipeline, PipelineOptions};

/// Backend used when neither the CLI nor the config names one
pub const DEFAULT_BACKEND: Backend = Backend::Groq;

/// Context for command execution containing config and runtime options.
pub struct CommandContext {
    /// Loaded configuration with environment overrides applied
    pub config: Config,
    /// DRM cache file
    pub cache: CacheStore,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Load config (file, then environment) and resolve the cache location.
    ///
    /// Precedence for the cache file: `--cache-file` > config file > default.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let mut config = Config::load_at(opts.config_ref())?;
        config.apply_env();

        let cache_path = opts
            .cache_file_ref()
            .or(config.preferences.cache_file.as_deref());
        let cache = CacheStore::open_at(cache_path)?;

        Ok(Self {
            config,
            cache,
            format: opts.format,
        })
    }

    /// Backend for a run: explicit choice, then config default, then Groq
    pub fn backend(&self, requested: Option<Backend>) -> Backend {
        requested
            .or(self.config.preferences.default_backend)
            .unwrap_or(DEFAULT_BACKEND)
    }

    /// Steam library client
    pub fn library(&self) -> Result<SteamClient> {
        SteamClient::with_host(
            self.config.steam_api_key.clone(),
            self.config.hosts.steam.clone(),
        )
    }

    /// Answer client for one backend
    pub fn answer_client(&self, backend: Backend) -> Result<Arc<dyn AnswerApi>> {
        let settings = GenerationSettings::default();
        let config = &self.config;

        let client: Arc<dyn AnswerApi> = match backend {
            Backend::Gemini => Arc::new(GeminiClient::new(
                config.gemini_api_key.clone(),
                config.models.gemini.clone(),
                config.hosts.gemini.clone(),
                settings,
            )?),
            Backend::Groq => Arc::new(GroqClient::new(
                config.groq_api_key.clone(),
                config.models.groq.clone(),
                config.hosts.groq.clone(),
                settings,
            )?),
            Backend::Ollama => Arc::new(OllamaClient::new(
                config.models.ollama.clone(),
                config.hosts.ollama.clone(),
                settings,
            )?),
        };
        Ok(client)
    }

    /// Resolution pipeline wired to the real backends
    pub fn pipeline(&self) -> Result<DrmPipeline> {
        let backends = AnswerBackends::new(
            self.answer_client(Backend::Gemini)?,
            self.answer_client(Backend::Groq)?,
            self.answer_client(Backend::Ollama)?,
        );
        let search = Arc::new(GoogleSearchClient::new(
            self.config.google_search_api_key.clone(),
            self.config.search_engine_id.clone(),
            self.config.hosts.search.clone(),
        )?);

        Ok(DrmPipeline::new(backends, search).with_options(PipelineOptions::from(&self.config)))
    }
}
