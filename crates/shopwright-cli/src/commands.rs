//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Shopwright: storefront, banking and board-service test suites
#[derive(Parser, Debug)]
#[command(name = "shopwright")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no console log output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Suite configuration file
    #[arg(short, long, default_value = "shopwright.yaml", global = true)]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the storefront search/cart/remove scenario
    OrderItems(UiArgs),

    /// Run the banking login scenario
    ParabankLogin(UiArgs),

    /// Run the board service API smoke suite
    Trello(ApiArgs),

    /// Print the resolved configuration as YAML
    Config,
}

/// Options shared by the browser suites
#[derive(Args, Debug, Default)]
pub struct UiArgs {
    /// Browser to drive (chrome or firefox)
    #[arg(short, long)]
    pub browser: Option<String>,

    /// Run without a visible window
    #[arg(long)]
    pub headless: bool,

    /// WebDriver endpoint (chromedriver, geckodriver or a grid)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Element wait timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for the API suite
#[derive(Args, Debug, Default)]
pub struct ApiArgs {
    /// Service root
    #[arg(long)]
    pub base_url: Option<String>,

    /// Test-data JSON file (`api_key`, `token`)
    #[arg(long)]
    pub test_data: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
