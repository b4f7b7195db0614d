//! Configuration management for drmscope
//!
//! Settings come from an optional YAML file (`~/.drmscope/config.yaml`) with
//! environment variables layered on top. API keys are never validated up
//! front; a missing key surfaces on the first call that needs it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_TTL_DAYS;
use crate::client::Backend;
use crate::error::{ConfigError, Result};

/// Environment variables holding API credentials
pub const ENV_STEAM_API_KEY: &str = "STEAM_API_KEY";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_GOOGLE_SEARCH_API_KEY: &str = "GOOGLE_SEARCH_API_KEY";
pub const ENV_SEARCH_ENGINE_ID: &str = "SEARCH_ENGINE_ID";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Steam Web API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam_api_key: Option<String>,

    /// Gemini API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,

    /// Groq API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groq_api_key: Option<String>,

    /// Google Custom Search API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search_api_key: Option<String>,

    /// Google Programmable Search Engine ID (`cx`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_engine_id: Option<String>,

    /// Base URL overrides, mostly for testing against local servers
    #[serde(default)]
    pub hosts: ApiHosts,

    /// Model names per backend
    #[serde(default)]
    pub models: ModelNames,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Base URL overrides for upstream APIs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiHosts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama: Option<String>,
}

/// Model identifiers used by each answer backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelNames {
    #[serde(default = "default_gemini_model")]
    pub gemini: String,
    #[serde(default = "default_groq_model")]
    pub groq: String,
    #[serde(default = "default_ollama_model")]
    pub ollama: String,
}

fn default_gemini_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_groq_model() -> String {
    "moonshotai/kimi-k2-instruct".to_string()
}

fn default_ollama_model() -> String {
    "gemma3n:e4b".to_string()
}

impl Default for ModelNames {
    fn default() -> Self {
        Self {
            gemini: default_gemini_model(),
            groq: default_groq_model(),
            ollama: default_ollama_model(),
        }
    }
}

/// Which backend re-queries a title whose cache record has expired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshBackend {
    /// Always Gemini with native search, whatever the run selected
    #[default]
    Gemini,
    /// The backend selected for the run
    Selected,
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Backend used when `--backend` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_backend: Option<Backend>,

    /// Cache file location (defaults to the XDG cache dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<String>,

    /// Days before a cached DRM status is re-queried
    #[serde(default = "default_cache_ttl_days")]
    pub cache_ttl_days: u32,

    /// Whether backend failures are written to the cache
    #[serde(default = "default_cache_failures")]
    pub cache_failures: bool,

    /// Backend used to refresh expired records
    #[serde(default)]
    pub refresh_backend: RefreshBackend,
}

fn default_cache_ttl_days() -> u32 {
    DEFAULT_TTL_DAYS
}

fn default_cache_failures() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_backend: None,
            cache_file: None,
            cache_ttl_days: default_cache_ttl_days(),
            cache_failures: default_cache_failures(),
            refresh_backend: RefreshBackend::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".drmscope").join("config.yaml"))
    }

    /// Resolve an explicit path or fall back to the default location
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a path (or the default path).
    ///
    /// A missing file yields the default configuration.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to a path (or the default path)
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(&Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // Keys live in this file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// Empty values are ignored so that `FOO=` does not clear a file setting.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let keys: [(&str, &mut Option<String>); 5] = [
            (ENV_STEAM_API_KEY, &mut self.steam_api_key),
            (ENV_GEMINI_API_KEY, &mut self.gemini_api_key),
            (ENV_GROQ_API_KEY, &mut self.groq_api_key),
            (ENV_GOOGLE_SEARCH_API_KEY, &mut self.google_search_api_key),
            (ENV_SEARCH_ENGINE_ID, &mut self.search_engine_id),
        ];
        for (name, slot) in keys {
            if let Some(value) = get(name) {
                *slot = Some(value);
            }
        }

        let hosts: [(&str, &mut Option<String>); 5] = [
            ("DRMSCOPE_STEAM_API_HOST", &mut self.hosts.steam),
            ("DRMSCOPE_GEMINI_API_HOST", &mut self.hosts.gemini),
            ("DRMSCOPE_GROQ_API_HOST", &mut self.hosts.groq),
            ("DRMSCOPE_SEARCH_API_HOST", &mut self.hosts.search),
            ("OLLAMA_HOST", &mut self.hosts.ollama),
        ];
        for (name, slot) in hosts {
            if let Some(value) = get(name) {
                *slot = Some(value);
            }
        }

        let models: [(&str, &mut String); 3] = [
            ("DRMSCOPE_GEMINI_MODEL", &mut self.models.gemini),
            ("DRMSCOPE_GROQ_MODEL", &mut self.models.groq),
            ("DRMSCOPE_OLLAMA_MODEL", &mut self.models.ollama),
        ];
        for (name, slot) in models {
            if let Some(value) = get(name) {
                *slot = value;
            }
        }
    }

    /// Cache TTL as a duration
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.preferences.cache_ttl_days))
    }
}
