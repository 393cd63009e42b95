//! Markdown file output: generated content prefixed by a metadata header.
//!
//! The header is an HTML comment wrapping a YAML block, so it is invisible
//! when the Markdown is rendered but machine-readable for anything that
//! post-processes the posts directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::consts::FILE_TIMESTAMP_FORMAT;
use crate::error::AppError;
use crate::pricing::ASSUMED_MONTHLY_RUNS;

use super::RunReport;

pub(crate) fn default_output_path(dir: &Path) -> PathBuf {
    let timestamp = Local::now().format(FILE_TIMESTAMP_FORMAT);
    dir.join(format!("postgen-{timestamp}.md"))
}

pub(crate) fn write_post(path: &Path, report: &RunReport<'_>, content: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| AppError::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let document = render_document(report, content);
    fs::write(path, document).map_err(|source| AppError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

fn render_document(report: &RunReport<'_>, content: &str) -> String {
    format!("{}\n{}", render_header(report), content)
}

fn render_header(report: &RunReport<'_>) -> String {
    let usage = report.usage;
    let costs = report.costs;
    let currency = report.currency.to_ascii_lowercase();

    let mut header = format!(
        r#"<!--
---
source: "{origin}"
generated_at: "{generated_at}"
generator: "postgen"
generator_version: "{version}"
mode: "{mode}"

api:
  model: "{model}"
  response_id: "{response_id}"
  stop_reason: "{stop_reason}"

prompt_cache:
  enabled: {cache_enabled}
  cache_read_tokens: {cache_read}
  cache_creation_tokens: {cache_creation}
  cache_hit_percent: {cache_hit:.1}

costs_usd:
  cache_read: {cache_read_cost:.6}
  cache_write: {cache_write_cost:.6}
  input: {input_cost:.6}
  output: {output_cost:.6}
  total: {total_cost:.6}

costs_{currency}:
  exchange_rate: {exchange_rate}
  total: {converted:.2}

token_usage:
  input: {input_tokens}
  cache_creation: {cache_creation}
  cache_read: {cache_read}
  total_input: {total_input}
  output: {output_tokens}

pricing_per_million_usd:
  input: {p_input}
  output: {p_output}
  cache_write: {p_cache_write}
  cache_read: {p_cache_read}
"#,
        origin = report.origin,
        generated_at = Local::now().to_rfc3339(),
        version = env!("CARGO_PKG_VERSION"),
        mode = if report.simulated { "simulated" } else { "api" },
        model = report.model,
        response_id = report.response_id.unwrap_or("none"),
        stop_reason = report.stop_reason.unwrap_or("none"),
        cache_enabled = report.cache_enabled,
        cache_read = usage.cache_read_input_tokens,
        cache_creation = usage.cache_creation_input_tokens,
        cache_hit = report.cache_hit_percent(),
        cache_read_cost = costs.cache_read_cost,
        cache_write_cost = costs.cache_write_cost,
        input_cost = costs.input_cost,
        output_cost = costs.output_cost,
        total_cost = costs.total_cost,
        currency = currency,
        exchange_rate = report.exchange_rate,
        converted = costs.total_in_currency(report.exchange_rate),
        input_tokens = usage.input_tokens,
        total_input = usage.total_input_tokens(),
        output_tokens = usage.output_tokens,
        p_input = report.prices.input,
        p_output = report.prices.output,
        p_cache_write = report.prices.cache_write,
        p_cache_read = report.prices.cache_read,
    );

    if let Some(savings) = &costs.savings {
        header.push_str(&format!(
            r#"
savings_usd:
  cost_without_cache: {without:.6}
  cost_reduction: {reduction:.6}
  cost_reduction_percent: {percent:.1}
  monthly: {monthly:.2}
  yearly: {yearly:.2}
  monthly_runs_assumption: {runs}
"#,
            without = savings.cost_without_cache,
            reduction = savings.cost_reduction,
            percent = savings.cost_reduction_percent,
            monthly = savings.monthly_savings,
            yearly = savings.yearly_savings,
            runs = ASSUMED_MONTHLY_RUNS as i64,
        ));
    }

    header.push_str("---\n-->\n");
    header
}
