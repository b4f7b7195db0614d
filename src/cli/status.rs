//! Status command implementation

use colored::Colorize;

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::client::{Backend, ollama};
use crate::config::{Config, RefreshBackend};
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions, ctx: &CommandContext) -> Result<()> {
    println!("{}\n", "drmscope Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    if config_path.exists() {
        println!("Config file: {}", config_path.display().to_string().cyan());
    } else {
        println!(
            "Config file: {} {}",
            config_path.display().to_string().cyan(),
            "(not created, using environment)".dimmed()
        );
    }
    println!(
        "Cache file:  {}",
        ctx.cache.path().display().to_string().cyan()
    );
    println!();

    let config = &ctx.config;
    let keys = [
        ("Steam API key", &config.steam_api_key),
        ("Gemini API key", &config.gemini_api_key),
        ("Groq API key", &config.groq_api_key),
        ("Google Search API key", &config.google_search_api_key),
        ("Search engine ID", &config.search_engine_id),
    ];
    let mut missing = false;
    for (label, value) in keys {
        if value.is_some() {
            println!("{} {} configured", "✓".green(), label);
        } else {
            println!("{} {} not configured", "✗".red(), label);
            missing = true;
        }
    }
    if missing {
        println!("  → Run 'drmscope init' or set the environment variables");
    }

    println!();
    println!(
        "{} Default backend: {}",
        "○".dimmed(),
        ctx.backend(None).to_string().bold()
    );
    let refresh = match config.preferences.refresh_backend {
        RefreshBackend::Gemini => Backend::Gemini.to_string(),
        RefreshBackend::Selected => "selected backend".to_string(),
    };
    println!("{} Expired entries refreshed with: {}", "○".dimmed(), refresh);
    println!(
        "{} Cache TTL: {} days{}",
        "○".dimmed(),
        config.preferences.cache_ttl_days,
        if config.preferences.cache_failures {
            ""
        } else {
            " (failures not cached)"
        }
    );
    println!(
        "{} Ollama host: {}",
        "○".dimmed(),
        config
            .hosts
            .ollama
            .as_deref()
            .unwrap_or(ollama::DEFAULT_HOST)
    );
    println!();

    Ok(())
}
