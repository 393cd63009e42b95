//! CLI subcommand definitions.

use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate post drafts with the Claude API (default)
    Generate,
    /// Generate post drafts offline, without calling the API
    Simulate,
    /// Compute a cost breakdown for explicit token counts
    Cost(CostArgs),
    /// Show past generation runs
    History,
}

#[derive(Debug, Args)]
pub(crate) struct CostArgs {
    /// Non-cached input tokens
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub(crate) input_tokens: i64,

    /// Output tokens
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub(crate) output_tokens: i64,

    /// Tokens written into the prompt cache
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub(crate) cache_creation_tokens: i64,

    /// Tokens served from the prompt cache
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub(crate) cache_read_tokens: i64,
}
