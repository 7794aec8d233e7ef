//! Browser driver boundary.
//!
//! Page objects never talk to a WebDriver client directly. They go through
//! [`BrowserDriver`], which has two implementations:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  BrowserDriver (async trait)                               │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────────┐  ┌─────────────────────────┐ │
//! │  │  WebDriverBackend        │  │  MockDriver             │ │
//! │  │  thirtyfour over W3C     │  │  scripted in-memory DOM │ │
//! │  │  chromedriver/geckodriver│  │  (unit + scenario tests)│ │
//! │  └──────────────────────────┘  └─────────────────────────┘ │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Element handles are not exposed. A lookup returns [`ElementSnapshot`]s
//! and interactions address an element by locator plus match index, so
//! stale handles cannot leak into page objects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::browser::BrowserKind;
use crate::locator::Locator;
use crate::result::ShopResult;

/// Default implicit element wait applied at launch
pub const DEFAULT_IMPLICIT_WAIT: Duration = Duration::from_secs(10);

/// Default W3C WebDriver endpoint
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Point-in-time view of one matched element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Rendered text
    pub text: String,
    /// Displayed on the page
    pub displayed: bool,
    /// Enabled for interaction
    pub enabled: bool,
}

impl ElementSnapshot {
    /// Visible, enabled element with `text`
    #[must_use]
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            displayed: true,
            enabled: true,
        }
    }

    /// Displayed and enabled
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        self.displayed && self.enabled
    }
}

/// Launch options handed to a [`DriverLauncher`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserOptions {
    /// Browser kind
    pub kind: BrowserKind,
    /// Run without a visible window
    pub headless: bool,
    /// Start maximized
    pub maximized: bool,
    /// Extra command-line arguments for the browser binary
    pub args: Vec<String>,
    /// WebDriver endpoint
    pub webdriver_url: String,
    /// Implicit element wait
    #[serde(with = "duration_ms")]
    pub implicit_wait: Duration,
}

impl BrowserOptions {
    /// Defaults for `kind`: maximized, headed, 10 s implicit wait
    #[must_use]
    pub fn new(kind: BrowserKind) -> Self {
        Self {
            kind,
            headless: false,
            maximized: true,
            args: Vec::new(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            implicit_wait: DEFAULT_IMPLICIT_WAIT,
        }
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
        self.webdriver_url = url.into();
        self
    }

    /// Append a browser argument
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the implicit element wait
    #[must_use]
    pub const fn with_implicit_wait(mut self, wait: Duration) -> Self {
        self.implicit_wait = wait;
        self
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Browser automation operations used by page objects.
///
/// Every method takes `&self`; implementations own whatever synchronization
/// their client needs.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to URL
    async fn goto(&self, url: &str) -> ShopResult<()>;

    /// Document title
    async fn title(&self) -> ShopResult<String>;

    /// Current URL
    async fn current_url(&self) -> ShopResult<String>;

    /// Snapshot every element matching `locator`, in document order
    async fn find_all(&self, locator: &Locator) -> ShopResult<Vec<ElementSnapshot>>;

    /// Click the `index`-th match
    async fn click(&self, locator: &Locator, index: usize) -> ShopResult<()>;

    /// Clear the `index`-th match
    async fn clear(&self, locator: &Locator, index: usize) -> ShopResult<()>;

    /// Send keystrokes to the `index`-th match
    async fn send_keys(&self, locator: &Locator, index: usize, text: &str) -> ShopResult<()>;

    /// Capture the viewport as PNG
    async fn screenshot_png(&self) -> ShopResult<Vec<u8>>;

    /// Configure the implicit element wait. A WebDriver backend applies it to
    /// every `find_all` that matches nothing.
    async fn set_implicit_wait(&self, wait: Duration) -> ShopResult<()>;

    /// End the browser session
    async fn quit(&self) -> ShopResult<()>;
}

/// Starts a browser and returns its driver.
#[async_trait]
pub trait DriverLauncher: Send + Sync {
    /// Launch a browser with `options`
    async fn launch(&self, options: &BrowserOptions) -> ShopResult<Box<dyn BrowserDriver>>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod snapshot_tests {
        use super::*;

        #[test]
        fn test_clickable_requires_both_flags() {
            assert!(ElementSnapshot::visible("Add to cart").is_clickable());
            let hidden = ElementSnapshot {
                displayed: false,
                ..ElementSnapshot::visible("x")
            };
            assert!(!hidden.is_clickable());
            let disabled = ElementSnapshot {
                enabled: false,
                ..ElementSnapshot::visible("x")
            };
            assert!(!disabled.is_clickable());
        }
    }

    mod options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let opts = BrowserOptions::new(BrowserKind::Chrome);
            assert!(opts.maximized);
            assert!(!opts.headless);
            assert_eq!(opts.implicit_wait, Duration::from_secs(10));
            assert_eq!(opts.webdriver_url, DEFAULT_WEBDRIVER_URL);
        }

        #[test]
        fn test_builder() {
            let opts = BrowserOptions::new(BrowserKind::Firefox)
                .with_headless(true)
                .with_arg("--width=1280")
                .with_webdriver_url("http://grid:4444");
            assert!(opts.headless);
            assert_eq!(opts.args, vec!["--width=1280".to_string()]);
            assert_eq!(opts.webdriver_url, "http://grid:4444");
        }

        #[test]
        fn test_serde_uses_millis() {
            let opts = BrowserOptions::new(BrowserKind::Chrome)
                .with_implicit_wait(Duration::from_millis(1500));
            let json = serde_json::to_value(&opts).unwrap();
            assert_eq!(json["implicit_wait"], 1500);
            let back: BrowserOptions = serde_json::from_value(json).unwrap();
            assert_eq!(back, opts);
        }
    }
}
