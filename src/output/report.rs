//! Console reporting: styled tables for humans, a single JSON document for
//! scripts.

use std::path::Path;

use comfy_table::Color;

use crate::history::RunRecord;
use crate::pricing::{ASSUMED_MONTHLY_RUNS, CacheSavings};

use super::RunReport;
use super::format::{
    create_styled_table, format_cost, format_money, format_number, format_percent, header_cell,
    right_cell, styled_cell,
};

pub(crate) fn print_run_report(report: &RunReport<'_>, use_color: bool) {
    print_cost_table(report, use_color);
    if let Some(savings) = &report.costs.savings {
        print_savings_table(savings, use_color);
    }
    print_usage_table(report, use_color);
}

fn print_cost_table(report: &RunReport<'_>, use_color: bool) {
    let costs = report.costs;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Cost", use_color),
        header_cell("USD", use_color),
    ]);

    let rows = [
        ("Cache read", costs.cache_read_cost),
        ("Cache write", costs.cache_write_cost),
        ("Input", costs.input_cost),
        ("Output", costs.output_cost),
    ];
    for (label, amount) in rows {
        table.add_row(vec![
            styled_cell(label, None, false),
            right_cell(&format_cost(amount), None, false),
        ]);
    }

    let total_color = use_color.then_some(Color::Yellow);
    table.add_row(vec![
        styled_cell("Total", total_color, true),
        right_cell(&format_cost(costs.total_cost), total_color, true),
    ]);
    table.add_row(vec![
        styled_cell(&format!("Total ({})", report.currency), None, false),
        right_cell(
            &format!("{:.2}", costs.total_in_currency(report.exchange_rate)),
            None,
            false,
        ),
    ]);

    println!("{table}");
}

fn print_savings_table(savings: &CacheSavings, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Cache Savings", use_color),
        header_cell("Value", use_color),
    ]);

    let green = use_color.then_some(Color::Green);
    table.add_row(vec![
        styled_cell("Without cache", None, false),
        right_cell(&format_cost(savings.cost_without_cache), None, false),
    ]);
    table.add_row(vec![
        styled_cell("Reduction", green, true),
        right_cell(&format_cost(savings.cost_reduction), green, true),
    ]);
    table.add_row(vec![
        styled_cell("Reduction %", green, false),
        right_cell(&format_percent(savings.cost_reduction_percent), green, false),
    ]);
    table.add_row(vec![
        styled_cell(
            &format!("Monthly ({} runs)", ASSUMED_MONTHLY_RUNS as i64),
            None,
            false,
        ),
        right_cell(&format_money(savings.monthly_savings), None, false),
    ]);
    table.add_row(vec![
        styled_cell("Yearly", None, false),
        right_cell(&format_money(savings.yearly_savings), None, false),
    ]);

    println!("{table}");
}

fn print_usage_table(report: &RunReport<'_>, use_color: bool) {
    let usage = report.usage;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Tokens", use_color),
        header_cell("Count", use_color),
    ]);

    let rows = [
        ("Cache read", usage.cache_read_input_tokens),
        ("Cache creation", usage.cache_creation_input_tokens),
        ("Input", usage.input_tokens),
        ("Total input", usage.total_input_tokens()),
        ("Output", usage.output_tokens),
    ];
    for (label, count) in rows {
        table.add_row(vec![
            styled_cell(label, None, false),
            right_cell(&format_number(count), None, false),
        ]);
    }
    if report.cache_enabled {
        table.add_row(vec![
            styled_cell("Cache hit", None, false),
            right_cell(&format_percent(report.cache_hit_percent()), None, false),
        ]);
    }

    println!("{table}");
}

pub(crate) fn print_run_json(report: &RunReport<'_>, output_path: Option<&Path>) -> String {
    let usage = report.usage;
    let output = serde_json::json!({
        "source": report.origin,
        "model": report.model,
        "mode": if report.simulated { "simulated" } else { "api" },
        "response_id": report.response_id,
        "stop_reason": report.stop_reason,
        "cache_enabled": report.cache_enabled,
        "cache_hit_percent": report.cache_hit_percent(),
        "usage": {
            "input_tokens": usage.input_tokens,
            "output_tokens": usage.output_tokens,
            "cache_creation_input_tokens": usage.cache_creation_input_tokens,
            "cache_read_input_tokens": usage.cache_read_input_tokens,
            "total_input_tokens": usage.total_input_tokens(),
            "total_tokens": usage.total_tokens(),
        },
        "costs": report.costs,
        "currency": {
            "label": report.currency,
            "exchange_rate": report.exchange_rate,
            "total": report.costs.total_in_currency(report.exchange_rate),
        },
        "pricing_per_million_usd": report.prices,
        "output_file": output_path.map(|p| p.display().to_string()),
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Failed to serialize JSON output: {e}");
        "{}".to_string()
    })
}

pub(crate) fn print_history_table(records: &[RunRecord], use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Timestamp", use_color),
        header_cell("Model", use_color),
        header_cell("Input", use_color),
        header_cell("Output", use_color),
        header_cell("Cache R", use_color),
        header_cell("Cost", use_color),
        header_cell("Cached", use_color),
        header_cell("Output File", use_color),
    ]);

    let mut total_cost = 0.0;
    let mut total_tokens = 0i64;
    for record in records {
        total_cost += record.total_cost;
        total_tokens += record.usage.total_tokens();
        table.add_row(vec![
            styled_cell(&record.timestamp, None, false),
            styled_cell(&record.model, None, false),
            right_cell(&format_number(record.usage.total_input_tokens()), None, false),
            right_cell(&format_number(record.usage.output_tokens), None, false),
            right_cell(
                &format_number(record.usage.cache_read_input_tokens),
                None,
                false,
            ),
            right_cell(&format_cost(record.total_cost), None, false),
            styled_cell(if record.cache_enabled { "yes" } else { "no" }, None, false),
            styled_cell(&record.output_file, None, false),
        ]);
    }

    println!("{table}");
    println!(
        "\n  {} runs | {} tokens | {} total\n",
        records.len(),
        format_number(total_tokens),
        format_money(total_cost)
    );
}

pub(crate) fn print_history_json(records: &[RunRecord]) -> String {
    let output: Vec<serde_json::Value> = records
        .iter()
        .map(|record| {
            serde_json::json!({
                "timestamp": record.timestamp,
                "model": record.model,
                "usage": record.usage,
                "total_cost": record.total_cost,
                "cache_enabled": record.cache_enabled,
                "output_file": record.output_file,
            })
        })
        .collect();

    serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Failed to serialize JSON output: {e}");
        "[]".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{PriceTable, TokenUsage, compute_cost};

    #[test]
    fn run_json_includes_costs_and_savings() {
        let usage = TokenUsage {
            input_tokens: 19_000,
            output_tokens: 2_000,
            cache_creation_input_tokens: 0,
            cache_read_input_tokens: 20_000,
        };
        let prices = PriceTable {
            input: 3.00,
            output: 15.00,
            cache_write: 3.75,
            cache_read: 0.30,
        };
        let costs = compute_cost(&usage, &prices, true).unwrap();
        let report = RunReport {
            origin: "a.html",
            model: "claude-3-5-sonnet-20241022",
            response_id: None,
            stop_reason: None,
            simulated: true,
            cache_enabled: true,
            usage: &usage,
            costs: &costs,
            prices: &prices,
            exchange_rate: 150.0,
            currency: "JPY",
        };

        let json = print_run_json(&report, Some(Path::new("posts/out.md")));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mode"], "simulated");
        assert_eq!(value["usage"]["total_input_tokens"].as_i64(), Some(39_000));
        assert!((value["costs"]["total_cost"].as_f64().unwrap() - 0.093).abs() < 1e-9);
        assert!(
            (value["costs"]["savings"]["cost_reduction"].as_f64().unwrap() - 0.054).abs() < 1e-9
        );
        assert_eq!(value["output_file"], "posts/out.md");
    }

    #[test]
    fn run_json_omits_savings_when_cache_disabled() {
        let usage = TokenUsage::default();
        let prices = PriceTable {
            input: 3.00,
            output: 15.00,
            cache_write: 3.75,
            cache_read: 0.30,
        };
        let costs = compute_cost(&usage, &prices, false).unwrap();
        let report = RunReport {
            origin: "a.html",
            model: "claude-3-5-sonnet-20241022",
            response_id: None,
            stop_reason: None,
            simulated: true,
            cache_enabled: false,
            usage: &usage,
            costs: &costs,
            prices: &prices,
            exchange_rate: 150.0,
            currency: "JPY",
        };

        let json = print_run_json(&report, None);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["costs"].get("savings").is_none());
        assert!(value["output_file"].is_null());
    }

    #[test]
    fn history_json_round_trips_records() {
        let records = vec![RunRecord {
            timestamp: "2026-02-06T10:00:00+00:00".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
                cache_creation_input_tokens: 0,
                cache_read_input_tokens: 20,
            },
            total_cost: 0.001,
            cache_enabled: true,
            output_file: "posts/a.md".to_string(),
        }];

        let json = print_history_json(&records);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["usage"]["input_tokens"].as_i64(), Some(100));
        assert_eq!(value[0]["cache_enabled"], true);
    }
}
