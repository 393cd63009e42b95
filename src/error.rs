use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid token usage: {field} is {value} (counts must be non-negative)")]
    InvalidUsage { field: &'static str, value: i64 },

    #[error("Invalid price table: {rate} rate is {value} (rates must be finite and non-negative)")]
    InvalidPriceTable { rate: &'static str, value: f64 },

    #[error("Unknown model \"{model}\" (no built-in pricing; set [pricing] in the config)")]
    UnknownModel { model: String },

    #[error("ANTHROPIC_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("Document is empty: {path}")]
    EmptyDocument { path: String },

    #[error("System prompt is empty: {}", path.display())]
    EmptySystemPrompt { path: PathBuf },

    #[error("No HTML documents found in {}", dir.display())]
    NoCachedDocuments { dir: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("Claude API error: {0}")]
    Api(String),

    #[error("History database error: {0}")]
    History(#[from] rusqlite::Error),

    #[error("Could not determine a data directory for the history database")]
    NoDataDir,
}
