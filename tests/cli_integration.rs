use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("postgen-{prefix}-{}-{nanos}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn run_postgen(args: &[&str], envs: &[(&str, &Path)]) -> (bool, Vec<u8>, Vec<u8>) {
    let bin = std::env::var("CARGO_BIN_EXE_postgen").unwrap_or_else(|_| {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("target");
        path.push("debug");
        if cfg!(windows) {
            path.push("postgen.exe");
        } else {
            path.push("postgen");
        }
        path.to_string_lossy().into_owned()
    });
    let mut cmd = Command::new(bin);
    cmd.args(args);
    // Keep the parent environment's config and credentials out of the run
    cmd.env_remove("XDG_CONFIG_HOME");
    cmd.env_remove("XDG_DATA_HOME");
    cmd.env_remove("ANTHROPIC_API_KEY");
    for (k, v) in envs {
        cmd.env(k, v);
    }
    let output = cmd.output().expect("run postgen");
    (output.status.success(), output.stdout, output.stderr)
}

/// Temp HOME and history dir so runs neither read nor write real state
fn isolated_env(root: &Path) -> (PathBuf, PathBuf) {
    let home = root.join("home");
    let data = root.join("data");
    fs::create_dir_all(&home).expect("create home");
    fs::create_dir_all(&data).expect("create data dir");
    (home, data)
}

#[test]
fn simulate_json_reports_usage_costs_and_savings() {
    let root = unique_temp_dir("simulate");
    let (home, data) = isolated_env(&root);

    // 4000 content chars at 4 bytes/token: 1000 document tokens
    let input = root.join("article.html");
    fs::write(&input, "x".repeat(4000)).expect("write input");
    let output = root.join("posts").join("out.md");

    let (ok, stdout, stderr) = run_postgen(
        &[
            "simulate",
            "--json",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ],
        &[("HOME", &home), ("POSTGEN_DATA_DIR", &data)],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["mode"].as_str(), Some("simulated"));
    assert_eq!(json["cache_enabled"], true);
    // 15_000 search + 500 user + 1_000 document
    assert_eq!(json["usage"]["input_tokens"].as_i64(), Some(16_500));
    assert_eq!(json["usage"]["cache_read_input_tokens"].as_i64(), Some(20_000));
    assert_eq!(json["usage"]["output_tokens"].as_i64(), Some(2_000));
    assert!(json["costs"]["total_cost"].as_f64().expect("total") > 0.0);
    assert!(json["costs"]["savings"]["cost_reduction"].as_f64().expect("reduction") > 0.0);
    assert_eq!(
        json["output_file"].as_str(),
        Some(output.to_str().unwrap())
    );

    let written = fs::read_to_string(&output).expect("markdown written");
    assert!(written.starts_with("<!--"));
    assert!(written.contains("generator: \"postgen\""));
    assert!(written.contains("### Variant A"));
}

#[test]
fn cost_json_matches_reference_scenario() {
    let root = unique_temp_dir("cost");
    let (home, data) = isolated_env(&root);

    let (ok, stdout, stderr) = run_postgen(
        &[
            "cost",
            "--json",
            "--input-tokens",
            "19000",
            "--output-tokens",
            "2000",
            "--cache-read-tokens",
            "20000",
        ],
        &[("HOME", &home), ("POSTGEN_DATA_DIR", &data)],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    let costs = &json["costs"];
    assert!((costs["total_cost"].as_f64().unwrap() - 0.093).abs() < 1e-9);
    assert!((costs["savings"]["cost_without_cache"].as_f64().unwrap() - 0.147).abs() < 1e-9);
    assert!(
        (costs["savings"]["cost_reduction_percent"].as_f64().unwrap() - 36.734_693_877_551_02)
            .abs()
            < 1e-6
    );
    assert!((costs["savings"]["monthly_savings"].as_f64().unwrap() - 2.7).abs() < 1e-9);
    assert!((json["currency"]["total"].as_f64().unwrap() - 13.95).abs() < 1e-9);
    assert!(json["output_file"].is_null());
}

#[test]
fn cost_without_cache_charges_full_rate_and_omits_savings() {
    let root = unique_temp_dir("cost-nocache");
    let (home, data) = isolated_env(&root);

    let (ok, stdout, stderr) = run_postgen(
        &[
            "cost",
            "--json",
            "--no-cache",
            "--input-tokens",
            "19000",
            "--output-tokens",
            "2000",
            "--cache-read-tokens",
            "20000",
        ],
        &[("HOME", &home), ("POSTGEN_DATA_DIR", &data)],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert!((json["costs"]["total_cost"].as_f64().unwrap() - 0.147).abs() < 1e-9);
    assert_eq!(json["costs"]["cache_read_cost"].as_f64(), Some(0.0));
    assert!(json["costs"].get("savings").is_none());
}

#[test]
fn negative_token_count_is_rejected() {
    let root = unique_temp_dir("cost-negative");
    let (home, data) = isolated_env(&root);

    let (ok, _stdout, stderr) = run_postgen(
        &["cost", "--output-tokens", "-5"],
        &[("HOME", &home), ("POSTGEN_DATA_DIR", &data)],
    );
    assert!(!ok);
    let stderr = String::from_utf8_lossy(&stderr);
    assert!(stderr.contains("Invalid token usage"), "stderr: {stderr}");
}

#[test]
fn unknown_model_is_rejected() {
    let root = unique_temp_dir("cost-unknown-model");
    let (home, data) = isolated_env(&root);

    let (ok, _stdout, stderr) = run_postgen(
        &["cost", "--model", "gpt-4o", "--input-tokens", "100"],
        &[("HOME", &home), ("POSTGEN_DATA_DIR", &data)],
    );
    assert!(!ok);
    let stderr = String::from_utf8_lossy(&stderr);
    assert!(stderr.contains("gpt-4o"), "stderr: {stderr}");
}

#[test]
fn custom_exchange_rate_applies_to_converted_total() {
    let root = unique_temp_dir("cost-rate");
    let (home, data) = isolated_env(&root);

    let (ok, stdout, stderr) = run_postgen(
        &[
            "cost",
            "--json",
            "--exchange-rate",
            "100",
            "--input-tokens",
            "19000",
            "--output-tokens",
            "2000",
            "--cache-read-tokens",
            "20000",
        ],
        &[("HOME", &home), ("POSTGEN_DATA_DIR", &data)],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["currency"]["exchange_rate"].as_f64(), Some(100.0));
    assert!((json["currency"]["total"].as_f64().unwrap() - 9.3).abs() < 1e-9);
}

#[test]
fn history_lists_recorded_simulate_runs() {
    let root = unique_temp_dir("history");
    let (home, data) = isolated_env(&root);

    let input = root.join("article.html");
    fs::write(&input, "<html>dotfiles with powershell</html>").expect("write input");

    for name in ["first.md", "second.md"] {
        let output = root.join("posts").join(name);
        let (ok, _stdout, stderr) = run_postgen(
            &[
                "simulate",
                "--json",
                "-i",
                input.to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
            ],
            &[("HOME", &home), ("POSTGEN_DATA_DIR", &data)],
        );
        assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    }

    let (ok, stdout, stderr) = run_postgen(
        &["history", "--json"],
        &[("HOME", &home), ("POSTGEN_DATA_DIR", &data)],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    let records = json.as_array().expect("array output");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["cache_enabled"], true);
    assert_eq!(records[0]["usage"]["cache_read_input_tokens"].as_i64(), Some(20_000));
    assert!(records[0]["total_cost"].as_f64().unwrap() > 0.0);
    assert!(
        records[1]["output_file"]
            .as_str()
            .unwrap()
            .ends_with("second.md")
    );
}

#[test]
fn missing_api_key_fails_generate() {
    let root = unique_temp_dir("generate-nokey");
    let (home, data) = isolated_env(&root);

    let input = root.join("article.html");
    fs::write(&input, "<html>body</html>").expect("write input");

    let (ok, _stdout, stderr) = run_postgen(
        &["generate", "-i", input.to_str().unwrap()],
        &[("HOME", &home), ("POSTGEN_DATA_DIR", &data)],
    );
    assert!(!ok);
    let stderr = String::from_utf8_lossy(&stderr);
    assert!(stderr.contains("ANTHROPIC_API_KEY"), "stderr: {stderr}");
}

#[test]
fn empty_html_cache_is_a_clear_error() {
    let root = unique_temp_dir("empty-cache");
    let (home, data) = isolated_env(&root);
    // No -i and no --url: falls back to the (empty) HTML cache directory
    let cache_dir = root.join("html_cache");
    fs::create_dir_all(&cache_dir).expect("create cache dir");

    let config_dir = home.join(".config").join("postgen");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(
        config_dir.join("config.toml"),
        format!("html_cache_dir = {:?}\n", cache_dir.to_str().unwrap()),
    )
    .expect("write config");

    let (ok, _stdout, stderr) = run_postgen(
        &["simulate"],
        &[("HOME", &home), ("POSTGEN_DATA_DIR", &data)],
    );
    assert!(!ok);
    let stderr = String::from_utf8_lossy(&stderr);
    assert!(stderr.contains("No HTML documents found"), "stderr: {stderr}");
}

#[test]
fn config_pricing_overrides_builtin_table() {
    let root = unique_temp_dir("config-pricing");
    let (home, data) = isolated_env(&root);

    let config_dir = home.join(".config").join("postgen");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(
        config_dir.join("config.toml"),
        "[pricing]\ninput = 1.0\noutput = 2.0\ncache_write = 1.25\ncache_read = 0.1\n",
    )
    .expect("write config");

    let (ok, stdout, stderr) = run_postgen(
        &[
            "cost",
            "--json",
            "--input-tokens",
            "1000000",
            "--output-tokens",
            "1000000",
        ],
        &[("HOME", &home), ("POSTGEN_DATA_DIR", &data)],
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert!((json["costs"]["input_cost"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert!((json["costs"]["output_cost"].as_f64().unwrap() - 2.0).abs() < 1e-9);
    assert_eq!(json["pricing_per_million_usd"]["cache_read"].as_f64(), Some(0.1));
}
