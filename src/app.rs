//! Command dispatch: resolve inputs, run the pipeline, report the run.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::api::ApiClient;
use crate::cli::{Cli, Commands, CostArgs};
use crate::config::Config;
use crate::consts::{
    DEFAULT_CURRENCY, DEFAULT_EXCHANGE_RATE, DEFAULT_HTML_CACHE_DIR, DEFAULT_MODEL,
    DEFAULT_OUTPUT_DIR, DEFAULT_SYSTEM_PROMPT_PATH,
};
use crate::error::AppError;
use crate::generate::{build_user_prompt, simulate};
use crate::history::{HistoryDb, RunRecord};
use crate::output::{self, RunReport};
use crate::pricing::{PriceTable, TokenUsage, compute_cost, resolve_price_table};
use crate::source::{self, SourceDocument};

pub(crate) fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    match &cli.command {
        Some(Commands::Cost(args)) => run_cost(cli, config, args),
        Some(Commands::History) => run_history(cli),
        Some(Commands::Simulate) => run_generate(cli, config, true),
        Some(Commands::Generate) | None => run_generate(cli, config, false),
    }
}

/// Model name after merging; `with_config` has already applied the config
fn resolve_model(cli: &Cli) -> &str {
    cli.model.as_deref().unwrap_or(DEFAULT_MODEL)
}

/// A `[pricing]` table in the config overrides the built-in per-model rates
fn resolve_prices(config: &Config, model: &str) -> Result<PriceTable, AppError> {
    match config.pricing {
        Some(prices) => {
            prices.validate()?;
            Ok(prices)
        }
        None => resolve_price_table(model),
    }
}

/// Input priority: explicit file, then URL, then the newest cached HTML
fn load_document(cli: &Cli, config: &Config) -> Result<SourceDocument, AppError> {
    if let Some(path) = &cli.input {
        return source::load_html_file(path);
    }
    if let Some(url) = &cli.url {
        return source::fetch_url(url);
    }
    let dir = config
        .html_cache_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HTML_CACHE_DIR));
    let newest = source::newest_cached_html(&dir)?;
    source::load_html_file(&newest)
}

fn run_generate(cli: &Cli, config: &Config, simulated: bool) -> Result<(), AppError> {
    let model = resolve_model(cli);
    let cache_enabled = cli.cache_enabled();
    let prices = resolve_prices(config, model)?;
    let doc = load_document(cli, config)?;

    let (content, usage, response_id, stop_reason, model_label) = if simulated {
        let run = simulate(&doc, cache_enabled);
        (run.content, run.usage, None, None, model.to_string())
    } else {
        let client = ApiClient::from_env()?;
        let prompt_path = config
            .system_prompt
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSTEM_PROMPT_PATH));
        let system_prompt = source::load_system_prompt(&prompt_path)?;
        let user_prompt = build_user_prompt(&doc);

        let response = client.generate(model, &system_prompt, &user_prompt, cache_enabled)?;
        let content = response.text();
        let usage = response.usage.to_token_usage();
        (
            content,
            usage,
            Some(response.id),
            response.stop_reason,
            response.model,
        )
    };

    let costs = compute_cost(&usage, &prices, cache_enabled)?;

    let output_path = cli.output.clone().unwrap_or_else(|| {
        let dir = config
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        output::default_output_path(&dir)
    });

    let report = RunReport {
        origin: &doc.origin,
        model: &model_label,
        response_id: response_id.as_deref(),
        stop_reason: stop_reason.as_deref(),
        simulated,
        cache_enabled,
        usage: &usage,
        costs: &costs,
        prices: &prices,
        exchange_rate: cli.exchange_rate.unwrap_or(DEFAULT_EXCHANGE_RATE),
        currency: config.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
    };

    output::write_post(&output_path, &report, &content)?;
    record_run(&report, &output_path);

    if cli.json {
        println!("{}", output::print_run_json(&report, Some(&output_path)));
    } else {
        output::print_run_report(&report, cli.use_color());
        println!("\nSaved {}", output_path.display());
    }
    Ok(())
}

/// Best-effort: a run that produced its Markdown file should not fail
/// because the history database is unavailable.
fn record_run(report: &RunReport<'_>, output_path: &Path) {
    let record = RunRecord {
        timestamp: Local::now().to_rfc3339(),
        model: report.model.to_string(),
        usage: *report.usage,
        total_cost: report.costs.total_cost,
        cache_enabled: report.cache_enabled,
        output_file: output_path.display().to_string(),
    };
    if let Err(e) = HistoryDb::open_default().and_then(|db| db.record(&record)) {
        eprintln!("Warning: failed to record run history: {e}");
    }
}

/// Cost breakdown for explicit token counts; no file is written and no
/// history row is recorded.
fn run_cost(cli: &Cli, config: &Config, args: &CostArgs) -> Result<(), AppError> {
    let model = resolve_model(cli);
    let cache_enabled = cli.cache_enabled();
    let prices = resolve_prices(config, model)?;

    let usage = TokenUsage {
        input_tokens: args.input_tokens,
        output_tokens: args.output_tokens,
        cache_creation_input_tokens: args.cache_creation_tokens,
        cache_read_input_tokens: args.cache_read_tokens,
    };
    let costs = compute_cost(&usage, &prices, cache_enabled)?;

    let report = RunReport {
        origin: "manual token counts",
        model,
        response_id: None,
        stop_reason: None,
        simulated: true,
        cache_enabled,
        usage: &usage,
        costs: &costs,
        prices: &prices,
        exchange_rate: cli.exchange_rate.unwrap_or(DEFAULT_EXCHANGE_RATE),
        currency: config.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
    };

    if cli.json {
        println!("{}", output::print_run_json(&report, None));
    } else {
        output::print_run_report(&report, cli.use_color());
    }
    Ok(())
}

fn run_history(cli: &Cli) -> Result<(), AppError> {
    let records = HistoryDb::open_default()?.list()?;
    if cli.json {
        println!("{}", output::print_history_json(&records));
    } else if records.is_empty() {
        println!("No recorded runs.");
    } else {
        output::print_history_table(&records, cli.use_color());
    }
    Ok(())
}
