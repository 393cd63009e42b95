use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::pricing::PriceTable;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) model: Option<String>,
    /// Prompt caching on by default; set false to disable for every run
    #[serde(default)]
    pub(crate) cache: Option<bool>,
    #[serde(default)]
    pub(crate) exchange_rate: Option<f64>,
    #[serde(default)]
    pub(crate) currency: Option<String>,
    #[serde(default)]
    pub(crate) system_prompt: Option<PathBuf>,
    #[serde(default)]
    pub(crate) html_cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) output_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    /// Overrides the built-in per-model rates when set
    #[serde(default)]
    pub(crate) pricing: Option<PriceTable>,
}

impl Config {
    pub(crate) fn load() -> Self {
        Self::load_internal(false)
    }

    pub(crate) fn load_quiet() -> Self {
        Self::load_internal(true)
    }

    fn load_internal(quiet: bool) -> Self {
        // Try config locations in order of priority
        let config_paths = Self::get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        if !quiet {
                            eprintln!("Loaded config from {}", path.display());
                        }
                        return config;
                    }
                    Err(e) => {
                        if !quiet {
                            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                        }
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/postgen/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("postgen").join("config.toml"));
        }

        // 2. macOS Application Support: ~/Library/Application Support/postgen/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let macos_path = config_dir.join("postgen").join("config.toml");
            if !paths.contains(&macos_path) {
                paths.push(macos_path);
            }
        }

        // 3. Home directory: ~/.postgen.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".postgen.toml"));
        }

        paths
    }
}
