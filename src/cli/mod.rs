//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod ask;
pub mod cache;
pub mod check;
pub mod context;
pub mod init;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

use crate::client::Backend;

/// drmscope - find out which DRM the games in a Steam library use
#[derive(Parser, Debug)]
#[command(name = "drmscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "DRMSCOPE_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "DRMSCOPE_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override DRM cache file location
    #[arg(long, global = true, env = "DRMSCOPE_CACHE_FILE", hide_env = true)]
    pub cache_file: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "DRMSCOPE_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up the DRM of every game in a Steam library
    #[command(after_help = "\
Examples:
  drmscope check 76561197960287930
  drmscope check gaben --backend gemini
  drmscope check gaben --backend ollama --format json")]
    Check {
        /// SteamID64 or custom profile URL name
        account: String,

        /// Answer backend used for games not in the cache
        #[arg(long, short, value_enum, env = "DRMSCOPE_BACKEND", hide_env = true)]
        backend: Option<Backend>,
    },

    /// Send a raw prompt to one answer backend
    Ask {
        /// Prompt text
        prompt: String,

        /// Answer backend
        #[arg(long, short, value_enum, default_value = "gemini")]
        backend: Backend,
    },

    /// Store API keys in the config file
    Init,

    /// Show configuration status
    Status,

    /// Display version information
    Version,

    /// Manage the local DRM cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Generate shell completions
    #[command(after_help = "\
  bash:   drmscope completion bash > /etc/bash_completion.d/drmscope
  zsh:    drmscope completion zsh > \"${fpath[1]}/_drmscope\"
  fish:   drmscope completion fish > ~/.config/fish/completions/drmscope.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,
    /// Clear all cached DRM results
    Clear,
    /// Print cache file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_with_backend_alias() {
        let cli = Cli::parse_from(["drmscope", "check", "gaben", "--backend", "local-with-search"]);
        match cli.command {
            Commands::Check { account, backend } => {
                assert_eq!(account, "gaben");
                assert_eq!(backend, Some(Backend::Ollama));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "drmscope",
            "cache",
            "path",
            "--cache-file",
            "/tmp/x.json",
            "--format",
            "json",
        ]);
        assert_eq!(cli.cache_file.as_deref(), Some("/tmp/x.json"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Cache(CacheCommands::Path)));
    }

    #[test]
    fn test_ask_defaults_to_gemini() {
        let cli = Cli::parse_from(["drmscope", "ask", "hello"]);
        match cli.command {
            Commands::Ask { backend, .. } => assert_eq!(backend, Backend::Gemini),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
