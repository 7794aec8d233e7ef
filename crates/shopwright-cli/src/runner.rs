//! Suite execution: resolve configuration, install logging, run, report.

use shopwright::api::{suite, ApiSession, TestData};
use shopwright::{BrowserSession, DriverLauncher, LogContext, ScenarioReport, SuiteConfig};

use crate::commands::{ApiArgs, Cli, UiArgs};
use crate::error::{CliError, CliResult};

/// Configuration file, then `SHOPWRIGHT_*` variables, then global flags.
pub fn resolve_config(cli: &Cli) -> CliResult<SuiteConfig> {
    let mut config = SuiteConfig::load(&cli.config)?.apply_env()?;
    match cli.verbose {
        0 => {}
        1 => config.logging.level = "debug".to_string(),
        _ => config.logging.level = "trace".to_string(),
    }
    if cli.quiet {
        config.logging.console = false;
    }
    Ok(config)
}

/// Apply browser suite flags
pub fn apply_ui_args(config: &mut SuiteConfig, args: &UiArgs) {
    if let Some(browser) = &args.browser {
        config.browser.name.clone_from(browser);
    }
    if args.headless {
        config.browser.headless = true;
    }
    if let Some(url) = &args.webdriver_url {
        config.browser.webdriver_url.clone_from(url);
    }
    if let Some(timeout) = args.timeout {
        config.wait.timeout_ms = timeout;
    }
}

/// Apply API suite flags
pub fn apply_api_args(config: &mut SuiteConfig, args: &ApiArgs) {
    if let Some(url) = &args.base_url {
        config.api.base_url.clone_from(url);
    }
    if let Some(path) = &args.test_data {
        config.api.test_data.clone_from(path);
    }
}

/// A failed report becomes [`CliError::SuiteFailed`]
pub fn check(report: &ScenarioReport) -> CliResult<()> {
    match &report.error {
        Some(e) => Err(CliError::suite_failed(report.name.clone(), e.to_string())),
        None => Ok(()),
    }
}

/// Storefront cart scenario. A failing scenario still returns its report.
pub async fn order_items(config: &SuiteConfig, launcher: impl DriverLauncher + 'static) -> CliResult<ScenarioReport> {
    let locators = config.storefront_locators()?;
    let _log = LogContext::init(&config.logging)?;
    let session = config.browser_manager(launcher)?.start(&config.browser.name).await?;
    let report = config.order_items.run(&session, &locators, config.wait).await;
    close_after(&session, &report).await;
    Ok(report)
}

/// Banking login scenario
pub async fn parabank_login(config: &SuiteConfig, launcher: impl DriverLauncher + 'static) -> CliResult<ScenarioReport> {
    let locators = config.bank_locators()?;
    let _log = LogContext::init(&config.logging)?;
    let session = config.browser_manager(launcher)?.start(&config.browser.name).await?;
    let report = config.login.run(&session, &locators, config.wait).await;
    close_after(&session, &report).await;
    Ok(report)
}

// A scenario outcome outranks a failed close; the close error is only logged.
async fn close_after(session: &BrowserSession, report: &ScenarioReport) {
    if let Err(e) = session.close().await {
        tracing::warn!(suite = %report.name, "Browser close failed after scenario: {e}");
    }
}

/// Board service smoke suite
pub async fn trello(config: &SuiteConfig) -> CliResult<ScenarioReport> {
    let data = TestData::load(&config.api.test_data)?;
    let _log = LogContext::init(&config.logging)?;
    let session = ApiSession::with_base_url(data, &config.api.base_url)?;
    let report = suite::run(&session).await;
    Ok(report)
}

/// Resolved configuration as YAML
pub fn config_yaml(config: &SuiteConfig) -> CliResult<String> {
    serde_yaml_ng::to_string(config).map_err(|e| CliError::config(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use shopwright::mock::{MockDriver, MockLauncher};
    use shopwright::ShopError;
    use tempfile::TempDir;

    fn quiet_config(dir: &TempDir) -> SuiteConfig {
        let mut config = SuiteConfig::default();
        config.logging = config.logging.with_dir(dir.path().join("logs")).with_console(false);
        config.screenshots.dir = dir.path().join("shots");
        config
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = SuiteConfig::default();
        apply_ui_args(
            &mut config,
            &UiArgs {
                browser: Some("firefox".to_string()),
                headless: true,
                webdriver_url: Some("http://grid:4444".to_string()),
                timeout: Some(1234),
                json: false,
            },
        );
        assert_eq!(config.browser.name, "firefox");
        assert!(config.browser.headless);
        assert_eq!(config.browser.webdriver_url, "http://grid:4444");
        assert_eq!(config.wait.timeout_ms, 1234);
    }

    #[test]
    fn test_verbosity_sets_level() {
        let tmp = TempDir::new().unwrap();
        let cli = Cli::try_parse_from([
            "shopwright",
            "-vv",
            "-q",
            "--config",
            tmp.path().join("missing.yaml").to_str().unwrap(),
            "config",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.logging.level, "trace");
        assert!(!config.logging.console);
    }

    #[test]
    fn test_api_args() {
        let mut config = SuiteConfig::default();
        apply_api_args(
            &mut config,
            &ApiArgs {
                base_url: Some("http://localhost:8080".to_string()),
                test_data: Some("qa.json".into()),
                json: true,
            },
        );
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.test_data, std::path::PathBuf::from("qa.json"));
    }

    #[tokio::test]
    async fn test_unsupported_browser_never_launches() {
        let tmp = TempDir::new().unwrap();
        let mut config = quiet_config(&tmp);
        config.browser.name = "safari".to_string();
        let launcher = MockLauncher::new(MockDriver::new());

        let err = order_items(&config, launcher.clone()).await.unwrap_err();
        assert!(matches!(err, CliError::Shop(ShopError::UnsupportedBrowser { .. })));
        assert_eq!(launcher.launches(), 0);
    }

    #[tokio::test]
    async fn test_failed_scenario_still_reports() {
        let tmp = TempDir::new().unwrap();
        let mut config = quiet_config(&tmp);
        config.login.credentials_csv = tmp.path().join("missing.csv");
        config.wait = config.wait.with_timeout(20).with_poll_interval(5);
        let launcher = MockLauncher::new(MockDriver::new());

        let report = parabank_login(&config, launcher.clone()).await.unwrap();
        assert!(!report.passed());
        assert!(matches!(check(&report), Err(CliError::SuiteFailed { .. })));
        assert_eq!(launcher.driver().quit_calls(), 1);
    }

    #[tokio::test]
    async fn test_close_failure_keeps_report() {
        let tmp = TempDir::new().unwrap();
        let mut config = quiet_config(&tmp);
        config.login.credentials_csv = tmp.path().join("missing.csv");
        config.wait = config.wait.with_timeout(20).with_poll_interval(5);
        let launcher = MockLauncher::new(MockDriver::new().failing_quit("connection refused"));

        let report = parabank_login(&config, launcher.clone()).await.unwrap();
        assert_eq!(report.name, shopwright::LoginScenario::NAME);
        assert!(!report.passed());
        assert_eq!(launcher.driver().quit_calls(), 1);

        let log = std::fs::read_to_string(config.logging.log_path()).unwrap();
        assert!(log.contains("Browser close failed after scenario"), "{log}");
    }

    #[test]
    fn test_config_yaml_round_trips() {
        let yaml = config_yaml(&SuiteConfig::default()).unwrap();
        let parsed = SuiteConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.browser.name, "chrome");
    }
}
