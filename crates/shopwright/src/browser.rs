//! Browser session management.
//!
//! [`BrowserManager::start`] resolves the browser kind, launches it through a
//! [`DriverLauncher`], applies the implicit element wait and captures a
//! `browser_launched` screenshot. The returned [`BrowserSession`] is owned by
//! the caller; page objects only borrow it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::driver::{BrowserDriver, BrowserOptions, DriverLauncher, DEFAULT_IMPLICIT_WAIT};
use crate::journal::{StepJournal, StepRecord};
use crate::result::{ShopError, ShopResult};
use crate::screenshot::ScreenshotManager;

/// Label of the screenshot taken right after launch
pub const LAUNCH_SCREENSHOT: &str = "browser_launched";

/// Supported browsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Google Chrome via chromedriver
    #[default]
    Chrome,
    /// Mozilla Firefox via geckodriver
    Firefox,
}

impl BrowserKind {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            _ => Err(ShopError::UnsupportedBrowser {
                name: s.to_string(),
            }),
        }
    }
}

/// Starts browser sessions.
pub struct BrowserManager {
    launcher: Box<dyn DriverLauncher>,
    screenshots: ScreenshotManager,
    headless: bool,
    webdriver_url: Option<String>,
    implicit_wait: Duration,
    args: Vec<String>,
}

impl fmt::Debug for BrowserManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserManager")
            .field("screenshots", &self.screenshots)
            .field("headless", &self.headless)
            .field("webdriver_url", &self.webdriver_url)
            .field("implicit_wait", &self.implicit_wait)
            .finish_non_exhaustive()
    }
}

impl BrowserManager {
    /// Manager launching through `launcher`
    #[must_use]
    pub fn new(launcher: impl DriverLauncher + 'static) -> Self {
        Self {
            launcher: Box::new(launcher),
            screenshots: ScreenshotManager::default(),
            headless: false,
            webdriver_url: None,
            implicit_wait: DEFAULT_IMPLICIT_WAIT,
            args: Vec::new(),
        }
    }

    /// Manager backed by a W3C WebDriver endpoint
    #[cfg(feature = "webdriver")]
    #[must_use]
    pub fn webdriver() -> Self {
        Self::new(crate::webdriver::WebDriverLauncher)
    }

    /// Set the screenshot manager
    #[must_use]
    pub fn with_screenshots(mut self, screenshots: ScreenshotManager) -> Self {
        self.screenshots = screenshots;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the WebDriver endpoint
    #[must_use]
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = Some(url.into());
        self
    }

    /// Set the implicit element wait
    #[must_use]
    pub const fn with_implicit_wait(mut self, wait: Duration) -> Self {
        self.implicit_wait = wait;
        self
    }

    /// Append a browser argument
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Options that [`start_kind`](Self::start_kind) hands to the launcher
    #[must_use]
    pub fn options_for(&self, kind: BrowserKind) -> BrowserOptions {
        let mut options = BrowserOptions::new(kind)
            .with_headless(self.headless)
            .with_implicit_wait(self.implicit_wait);
        if let Some(url) = &self.webdriver_url {
            options = options.with_webdriver_url(url.clone());
        }
        options.args.clone_from(&self.args);
        options
    }

    /// Start a browser by name (`chrome`/`firefox`, any case).
    ///
    /// An unknown name fails before anything is launched.
    pub async fn start(&self, browser: &str) -> ShopResult<BrowserSession> {
        let kind = browser.parse::<BrowserKind>().inspect_err(|e| {
            tracing::error!("{e}");
        })?;
        self.start_kind(kind).await
    }

    /// Start a browser of `kind`
    pub async fn start_kind(&self, kind: BrowserKind) -> ShopResult<BrowserSession> {
        let options = self.options_for(kind);
        tracing::info!(browser = %kind, headless = options.headless, "Launching browser");

        let driver = self.launcher.launch(&options).await.map_err(|e| match e {
            ShopError::BrowserLaunch { .. } => e,
            other => ShopError::BrowserLaunch {
                browser: kind.to_string(),
                message: other.to_string(),
            },
        })?;
        let session = BrowserSession::new(driver, kind, self.screenshots.clone());

        if let Err(e) = session.driver()?.set_implicit_wait(options.implicit_wait).await {
            // the session is already up; close it before failing
            if let Err(close_err) = session.close().await {
                tracing::warn!(browser = %kind, "Failed to close browser after launch error: {close_err}");
            }
            return Err(ShopError::BrowserLaunch {
                browser: kind.to_string(),
                message: e.to_string(),
            });
        }

        tracing::info!(browser = %kind, "Browser started");
        if let Err(e) = session.capture(LAUNCH_SCREENSHOT).await {
            tracing::warn!("Launch screenshot failed: {e}");
        }
        Ok(session)
    }
}

/// An open browser plus its artifacts.
pub struct BrowserSession {
    driver: Box<dyn BrowserDriver>,
    kind: BrowserKind,
    screenshots: ScreenshotManager,
    journal: StepJournal,
    closed: AtomicBool,
}

impl fmt::Debug for BrowserSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserSession")
            .field("kind", &self.kind)
            .field("screenshots", &self.screenshots)
            .field("steps", &self.journal.len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl BrowserSession {
    /// Wrap an already-launched driver
    #[must_use]
    pub fn new(driver: Box<dyn BrowserDriver>, kind: BrowserKind, screenshots: ScreenshotManager) -> Self {
        Self {
            driver,
            kind,
            screenshots,
            journal: StepJournal::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Browser kind
    #[must_use]
    pub const fn kind(&self) -> BrowserKind {
        self.kind
    }

    /// Whether [`close`](Self::close) has run
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// The driver, unless the session is closed
    pub fn driver(&self) -> ShopResult<&dyn BrowserDriver> {
        if self.is_closed() {
            return Err(ShopError::driver("browser session is closed"));
        }
        Ok(self.driver.as_ref())
    }

    /// Screenshot manager
    #[must_use]
    pub const fn screenshots(&self) -> &ScreenshotManager {
        &self.screenshots
    }

    /// Step journal
    #[must_use]
    pub const fn journal(&self) -> &StepJournal {
        &self.journal
    }

    /// Append a step record
    pub fn record(&self, record: StepRecord) {
        self.journal.record(record);
    }

    /// Navigate to `url`
    pub async fn navigate(&self, url: &str) -> ShopResult<()> {
        self.driver()?.goto(url).await.map_err(|e| match e {
            ShopError::Navigation { .. } => e,
            other => ShopError::Navigation {
                url: url.to_string(),
                message: other.to_string(),
            },
        })?;
        tracing::info!("Navigated to {url}");
        Ok(())
    }

    /// Document title
    pub async fn title(&self) -> ShopResult<String> {
        self.driver()?.title().await
    }

    /// Current URL
    pub async fn current_url(&self) -> ShopResult<String> {
        self.driver()?.current_url().await
    }

    /// Capture a screenshot under `label`
    pub async fn capture(&self, label: &str) -> ShopResult<PathBuf> {
        let png = self
            .driver()?
            .screenshot_png()
            .await
            .map_err(|e| ShopError::Screenshot {
                label: label.to_string(),
                message: e.to_string(),
            })?;
        self.screenshots.save(label, &png)
    }

    /// Quit the browser. Safe to call more than once.
    pub async fn close(&self) -> ShopResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Browser already closed");
            return Ok(());
        }
        match self.driver.quit().await {
            Ok(()) => {
                tracing::info!(browser = %self.kind, "Browser closed");
                Ok(())
            }
            Err(e) if is_already_closed(&e) => {
                tracing::debug!("Browser was already gone: {e}");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to close browser: {e}");
                Err(e)
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.is_closed() {
            tracing::warn!(browser = %self.kind, "Browser session dropped without close()");
        }
    }
}

fn is_already_closed(err: &ShopError) -> bool {
    let message = err.to_string().to_ascii_lowercase();
    ["invalid session id", "session deleted", "already closed", "no such window"]
        .iter()
        .any(|needle| message.contains(needle))
}
