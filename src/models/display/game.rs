//! Game DRM display model

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::{Formattable, json::format_json, table::format_table};
use crate::pipeline::GameDrm;

/// Printed instead of a table when the library has no games
pub const EMPTY_LIBRARY: &str = "No games found or profile is private.";

/// One row of the DRM table
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct GameDisplay {
    #[tabled(rename = "GAME")]
    pub name: String,

    #[tabled(rename = "APPID")]
    pub appid: String,

    #[tabled(rename = "DRM")]
    pub drm: String,
}

impl From<&GameDrm> for GameDisplay {
    fn from(game: &GameDrm) -> Self {
        Self {
            name: game.name.clone(),
            appid: game.appid.clone(),
            drm: game.drm.clone(),
        }
    }
}

/// Results of a library check, serialized as `{"games": [...]}`
#[derive(Debug, Clone, Serialize)]
pub struct LibraryReport {
    pub games: Vec<GameDrm>,
}

impl LibraryReport {
    pub fn new(games: Vec<GameDrm>) -> Self {
        Self { games }
    }

    fn pretty(&self) -> String {
        if self.games.is_empty() {
            return EMPTY_LIBRARY.to_string();
        }

        let width = self
            .games
            .iter()
            .map(|g| g.name.chars().count())
            .max()
            .unwrap_or(0);

        self.games
            .iter()
            .map(|g| {
                format!(
                    "{:<width$}  {}",
                    g.name,
                    colorize_drm(&g.drm),
                    width = width
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Formattable for LibraryReport {
    fn format(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Json => format_json(self)?,
            OutputFormat::Table => {
                let rows: Vec<GameDisplay> = self.games.iter().map(GameDisplay::from).collect();
                format_table(&rows, EMPTY_LIBRARY)
            }
            OutputFormat::Pretty => self.pretty(),
        })
    }
}

/// Highlight the statuses people scan for
fn colorize_drm(drm: &str) -> String {
    let lower = drm.to_lowercase();
    if lower.contains("denuvo") {
        drm.red().bold().to_string()
    } else if lower.contains("drm-free") || lower.contains("drm free") {
        drm.green().to_string()
    } else if drm.starts_with("Error:") || lower.contains("could not be determined") {
        drm.dimmed().to_string()
    } else {
        drm.yellow().to_string()
    }
}
