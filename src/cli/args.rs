//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::Config;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "postgen")]
#[command(
    about = "Generate social-media post drafts from a blog article with Claude",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Pre-fetched HTML file to analyze (default: newest file in the HTML cache)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub(crate) input: Option<PathBuf>,

    /// Fetch the article from a URL instead of a local file
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) url: Option<String>,

    /// Output Markdown file (default: posts/postgen-<timestamp>.md)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub(crate) output: Option<PathBuf>,

    /// Model to call and price
    #[arg(short, long, global = true)]
    pub(crate) model: Option<String>,

    /// Disable prompt caching for this run
    #[arg(long, global = true)]
    pub(crate) no_cache: bool,

    /// Output the run summary as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// USD conversion rate for the secondary currency
    #[arg(long, global = true, value_name = "RATE")]
    pub(crate) exchange_rate: Option<f64>,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug output (show processing details)
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }
        if self.model.is_none() {
            self.model = config.model.clone();
        }
        if self.exchange_rate.is_none() {
            self.exchange_rate = config.exchange_rate;
        }
        // `cache = false` in the config disables caching unless the CLI
        // already asked for that explicitly.
        if !self.no_cache && config.cache == Some(false) {
            self.no_cache = true;
        }
        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn cache_enabled(&self) -> bool {
        !self.no_cache
    }
}
