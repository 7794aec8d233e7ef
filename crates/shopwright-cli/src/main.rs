//! Shopwright CLI: run the UI and API suites
//!
//! ## Usage
//!
//! ```bash
//! shopwright order-items --browser chrome      # Storefront cart flow
//! shopwright parabank-login --headless         # Banking login
//! shopwright trello --test-data data/test_data.json
//! shopwright config                            # Show resolved configuration
//! ```

use clap::Parser;
use shopwright::WebDriverLauncher;
use shopwright_cli::runner::{self, apply_api_args, apply_ui_args, resolve_config};
use shopwright_cli::{output, Cli, CliError, CliResult, Commands};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let mut config = resolve_config(&cli)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let (report, json) = match &cli.command {
        Commands::OrderItems(args) => {
            apply_ui_args(&mut config, args);
            (rt.block_on(runner::order_items(&config, WebDriverLauncher))?, args.json)
        }
        Commands::ParabankLogin(args) => {
            apply_ui_args(&mut config, args);
            (rt.block_on(runner::parabank_login(&config, WebDriverLauncher))?, args.json)
        }
        Commands::Trello(args) => {
            apply_api_args(&mut config, args);
            (rt.block_on(runner::trello(&config))?, args.json)
        }
        Commands::Config => {
            print!("{}", runner::config_yaml(&config)?);
            return Ok(());
        }
    };

    output::print_report(&report, json).map_err(CliError::from)?;
    runner::check(&report)
}
