/// Timestamp format for default output filenames: "20250115-093000"
pub(crate) const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Model used when neither the CLI nor the config names one
pub(crate) const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// USD conversion rate for the secondary currency column (no live lookup)
pub(crate) const DEFAULT_EXCHANGE_RATE: f64 = 150.0;

/// Label for the converted amount
pub(crate) const DEFAULT_CURRENCY: &str = "JPY";

/// Default location of the cacheable system prompt
pub(crate) const DEFAULT_SYSTEM_PROMPT_PATH: &str = "prompts/system_prompt.md";

/// Default directory searched for pre-fetched HTML documents
pub(crate) const DEFAULT_HTML_CACHE_DIR: &str = "html_cache";

/// Default directory for generated Markdown files
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "posts";
