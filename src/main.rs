mod api;
mod app;
mod cli;
mod config;
mod consts;
mod error;
mod generate;
mod history;
mod output;
mod pricing;
mod source;
mod utils;

use clap::Parser;

use cli::Cli;
use config::Config;

fn main() {
    let cli = Cli::parse();

    // Keep stdout parseable in JSON mode: config diagnostics go quiet
    let config = if cli.json {
        Config::load_quiet()
    } else {
        Config::load()
    };
    let cli = cli.with_config(&config);
    utils::set_debug(cli.debug);

    if let Err(e) = app::run(&cli, &config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
