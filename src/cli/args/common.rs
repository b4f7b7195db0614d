//! Common CLI types shared across commands

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - colored, one line per game
    #[default]
    Pretty,
    /// Table format - aligned columns
    Table,
    /// JSON format - structured for scripts/APIs
    Json,
}
