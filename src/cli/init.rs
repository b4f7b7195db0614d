//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Password, Select, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::client::Backend;
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Prompts for each API key. Leaving a prompt blank keeps the stored value.
/// Environment variables are not written to the file.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to drmscope!".bold().green());
    println!("Let's set up your API keys. Leave a prompt blank to keep the current value.\n");

    let mut config = Config::load_at(opts.config_ref())?;
    let theme = ColorfulTheme::default();

    prompt_secret(&theme, "Steam Web API key", &mut config.steam_api_key)?;
    prompt_secret(&theme, "Gemini API key", &mut config.gemini_api_key)?;
    prompt_secret(&theme, "Groq API key", &mut config.groq_api_key)?;
    prompt_secret(
        &theme,
        "Google Custom Search API key",
        &mut config.google_search_api_key,
    )?;

    let engine_id: String = Input::with_theme(&theme)
        .with_prompt("Programmable Search Engine ID")
        .allow_empty(true)
        .interact_text()?;
    merge_value(&mut config.search_engine_id, engine_id);

    let names: Vec<&str> = Backend::ALL.iter().map(|b| b.display_name()).collect();
    let current = config
        .preferences
        .default_backend
        .and_then(|b| Backend::ALL.iter().position(|x| *x == b))
        .unwrap_or(1);
    let selection = Select::with_theme(&theme)
        .with_prompt("Default backend for `drmscope check`")
        .items(&names)
        .default(current)
        .interact_opt()?;
    if let Some(idx) = selection {
        config.preferences.default_backend = Some(Backend::ALL[idx]);
    }

    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "drmscope status".cyan());
    println!(
        "  {} - Check a Steam library",
        "drmscope check <STEAM_ID>".cyan()
    );

    Ok(())
}

fn prompt_secret(theme: &ColorfulTheme, label: &str, slot: &mut Option<String>) -> Result<()> {
    let prompt = if slot.is_some() {
        format!("{} (configured)", label)
    } else {
        label.to_string()
    };

    let value = Password::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?;
    merge_value(slot, value);
    Ok(())
}

/// Replace a stored value unless the input is blank
fn merge_value(slot: &mut Option<String>, input: String) {
    let input = input.trim();
    if !input.is_empty() {
        *slot = Some(input.to_string());
    }
}
