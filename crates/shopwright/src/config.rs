//! Suite configuration.
//!
//! One YAML document drives every suite. Precedence, lowest first:
//! built-in defaults, the YAML file, `SHOPWRIGHT_*` environment variables,
//! then whatever the CLI applies on top.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{DEFAULT_BASE_URL, DEFAULT_TEST_DATA};
use crate::browser::{BrowserKind, BrowserManager};
use crate::driver::{DriverLauncher, DEFAULT_IMPLICIT_WAIT, DEFAULT_WEBDRIVER_URL};
use crate::logging::LogConfig;
use crate::page::WaitOptions;
use crate::pages::{BankLocators, StorefrontLocators};
use crate::result::{ShopError, ShopResult};
use crate::scenario::{LoginScenario, OrderItemsScenario};
use crate::screenshot::{ScreenshotManager, DEFAULT_SCREENSHOT_DIR};

/// Default configuration file
pub const DEFAULT_CONFIG_FILE: &str = "shopwright.yaml";

/// Browser name override
pub const ENV_BROWSER: &str = "SHOPWRIGHT_BROWSER";
/// WebDriver endpoint override
pub const ENV_WEBDRIVER_URL: &str = "SHOPWRIGHT_WEBDRIVER_URL";
/// Headless override (`1`/`true`/`yes` or `0`/`false`/`no`)
pub const ENV_HEADLESS: &str = "SHOPWRIGHT_HEADLESS";

/// Browser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Browser name, resolved when the session starts
    pub name: String,
    /// WebDriver endpoint
    pub webdriver_url: String,
    /// Run without a visible window
    pub headless: bool,
    /// Implicit element wait in milliseconds
    pub implicit_wait_ms: u64,
    /// Extra browser arguments
    pub args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            name: BrowserKind::default().as_str().to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: false,
            implicit_wait_ms: u64::try_from(DEFAULT_IMPLICIT_WAIT.as_millis()).unwrap_or(u64::MAX),
            args: Vec::new(),
        }
    }
}

/// Screenshot settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    /// Output directory
    pub dir: PathBuf,
    /// Delete existing captures when a session starts
    pub clear_on_start: bool,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            clear_on_start: false,
        }
    }
}

/// Board service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service root
    pub base_url: String,
    /// JSON file with `api_key`, `token` and optional fixture payloads
    pub test_data: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            test_data: PathBuf::from(DEFAULT_TEST_DATA),
        }
    }
}

/// Locator table overrides; built-in tables are used when unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Storefront table
    pub storefront: Option<PathBuf>,
    /// Banking table
    pub bank: Option<PathBuf>,
}

/// Everything the suites read
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Browser settings
    pub browser: BrowserConfig,
    /// Explicit element waits
    pub wait: WaitOptions,
    /// Screenshot settings
    pub screenshots: ScreenshotConfig,
    /// Logging
    pub logging: LogConfig,
    /// Locator table overrides
    pub locators: LocatorConfig,
    /// Storefront cart scenario
    pub order_items: OrderItemsScenario,
    /// Banking login scenario
    pub login: LoginScenario,
    /// Board service suite
    pub api: ApiConfig,
}

impl SuiteConfig {
    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> ShopResult<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| ShopError::config(format!("invalid configuration: {e}")))
    }

    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> ShopResult<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(yaml) => {
                tracing::debug!("Loaded configuration from {}", path.display());
                Self::from_yaml(&yaml)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ShopError::config(format!("cannot read {}: {e}", path.display()))),
        }
    }

    /// Apply `SHOPWRIGHT_*` variables from the process environment
    pub fn apply_env(self) -> ShopResult<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`
    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> ShopResult<Self> {
        if let Some(name) = lookup(ENV_BROWSER) {
            self.browser.name = name;
        }
        if let Some(url) = lookup(ENV_WEBDRIVER_URL) {
            self.browser.webdriver_url = url;
        }
        if let Some(flag) = lookup(ENV_HEADLESS) {
            self.browser.headless = parse_flag(ENV_HEADLESS, &flag)?;
        }
        Ok(self)
    }

    /// Implicit wait as a duration
    #[must_use]
    pub const fn implicit_wait(&self) -> Duration {
        Duration::from_millis(self.browser.implicit_wait_ms)
    }

    /// Screenshot manager for the configured directory
    #[must_use]
    pub fn screenshot_manager(&self) -> ScreenshotManager {
        ScreenshotManager::new(&self.screenshots.dir)
    }

    /// Browser manager launching through `launcher` with these settings.
    ///
    /// Clears the screenshot directory first when `clear_on_start` is set.
    pub fn browser_manager(&self, launcher: impl DriverLauncher + 'static) -> ShopResult<BrowserManager> {
        let screenshots = self.screenshot_manager();
        if self.screenshots.clear_on_start {
            screenshots.clear()?;
        }
        let mut manager = BrowserManager::new(launcher)
            .with_screenshots(screenshots)
            .with_headless(self.browser.headless)
            .with_webdriver_url(self.browser.webdriver_url.clone())
            .with_implicit_wait(self.implicit_wait());
        for arg in &self.browser.args {
            manager = manager.with_arg(arg.clone());
        }
        Ok(manager)
    }

    /// Storefront locators, from the override file if one is set
    pub fn storefront_locators(&self) -> ShopResult<StorefrontLocators> {
        match &self.locators.storefront {
            Some(path) => StorefrontLocators::load(path),
            None => StorefrontLocators::builtin(),
        }
    }

    /// Banking locators, from the override file if one is set
    pub fn bank_locators(&self) -> ShopResult<BankLocators> {
        match &self.locators.bank {
            Some(path) => BankLocators::load(path),
            None => BankLocators::builtin(),
        }
    }
}

fn parse_flag(key: &str, value: &str) -> ShopResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ShopError::config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockLauncher};
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.browser.name, "chrome");
        assert_eq!(config.browser.webdriver_url, "http://localhost:4444");
        assert_eq!(config.implicit_wait(), Duration::from_secs(10));
        assert_eq!(config.wait.timeout_ms, 10_000);
        assert_eq!(config.screenshots.dir, PathBuf::from("screenshots"));
        assert_eq!(config.logging.log_path(), PathBuf::from("logs/automation.log"));
        assert_eq!(config.order_items.pincode, "122017");
        assert_eq!(config.api.base_url, "https://api.trello.com");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = SuiteConfig::from_yaml(
            r"
browser:
  name: firefox
  headless: true
wait:
  timeout_ms: 2000
order_items:
  pincode: '560001'
  products:
    - search: kettle
",
        )
        .unwrap();
        assert_eq!(config.browser.name, "firefox");
        assert!(config.browser.headless);
        assert_eq!(config.wait.timeout_ms, 2000);
        assert_eq!(config.wait.poll_interval_ms, 250);
        assert_eq!(config.order_items.pincode, "560001");
        assert_eq!(config.order_items.products[0].result_index, 1);
        assert_eq!(config.order_items.home_url, "https://www.flipkart.com");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = SuiteConfig::from_yaml("browser: [").unwrap_err();
        assert!(matches!(err, ShopError::Config { .. }));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = SuiteConfig::load("/nonexistent/shopwright.yaml").unwrap();
        assert_eq!(config.browser.name, "chrome");
    }

    #[test]
    fn test_load_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("shopwright.yaml");
        std::fs::write(&path, "api:\n  base_url: http://localhost:9000\n").unwrap();
        let config = SuiteConfig::load(&path).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_BROWSER, "Firefox"),
            (ENV_WEBDRIVER_URL, "http://grid:4444"),
            (ENV_HEADLESS, "yes"),
        ]
        .into_iter()
        .collect();
        let config = SuiteConfig::default()
            .apply_env_with(|k| env.get(k).map(ToString::to_string))
            .unwrap();
        assert_eq!(config.browser.name, "Firefox");
        assert_eq!(config.browser.webdriver_url, "http://grid:4444");
        assert!(config.browser.headless);
    }

    #[test]
    fn test_bad_headless_flag() {
        let err = SuiteConfig::default()
            .apply_env_with(|k| (k == ENV_HEADLESS).then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("SHOPWRIGHT_HEADLESS"));
    }

    #[tokio::test]
    async fn test_browser_manager_applies_settings() {
        let tmp = TempDir::new().unwrap();
        let shots = tmp.path().join("shots");
        std::fs::create_dir_all(&shots).unwrap();
        std::fs::write(shots.join("old.png"), b"x").unwrap();

        let mut config = SuiteConfig::default();
        config.screenshots = ScreenshotConfig {
            dir: shots.clone(),
            clear_on_start: true,
        };
        config.browser.headless = true;
        config.browser.implicit_wait_ms = 1500;

        let launcher = MockLauncher::new(MockDriver::new());
        let manager = config.browser_manager(launcher.clone()).unwrap();
        assert!(!shots.join("old.png").exists());

        let session = manager.start("chrome").await.unwrap();
        let options = launcher.last_options().unwrap();
        assert!(options.headless);
        assert_eq!(options.implicit_wait, Duration::from_millis(1500));
        session.close().await.unwrap();
    }

    #[test]
    fn test_builtin_locators() {
        let config = SuiteConfig::default();
        assert!(config.storefront_locators().is_ok());
        assert!(config.bank_locators().is_ok());
    }
}
