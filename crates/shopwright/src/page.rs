//! Page object base.
//!
//! [`BasePage`] holds the locator-driven primitives every page object is
//! built from. Each public operation runs inside [`BasePage::observe`], which
//! emits exactly one log line, takes exactly one screenshot and appends one
//! [`StepRecord`] to the session journal, whether the operation passed or
//! failed. Private helpers (`locate`, `await_clickable`) never observe, so
//! composing them does not double-capture.
//!
//! ```ignore
//! let page = BasePage::new(&session);
//! page.step("Search Bar").type_text(&search_box, "Samsung S24").await?;
//! let total = page.read_text(&total_price).await?;
//! ```

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};

use crate::browser::BrowserSession;
use crate::driver::ElementSnapshot;
use crate::journal::StepRecord;
use crate::locator::Locator;
use crate::result::{ShopError, ShopResult};

/// Default element timeout (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (250 milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Element wait options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn millis(d: Duration) -> u64 {
    d.as_millis() as u64
}

/// Locator-driven primitives bound to one browser session.
#[derive(Debug, Clone)]
pub struct BasePage<'s> {
    session: &'s BrowserSession,
    wait: WaitOptions,
    label: Option<String>,
}

impl<'s> BasePage<'s> {
    /// Page bound to `session` with default waits
    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            session,
            wait: WaitOptions::default(),
            label: None,
        }
    }

    /// Override wait options
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Copy of this page whose next operations use `label` as step name
    #[must_use]
    pub fn step(&self, label: impl Into<String>) -> Self {
        Self {
            session: self.session,
            wait: self.wait,
            label: Some(label.into()),
        }
    }

    /// Underlying session
    #[must_use]
    pub const fn session(&self) -> &'s BrowserSession {
        self.session
    }

    /// Wait options in effect
    #[must_use]
    pub const fn wait(&self) -> WaitOptions {
        self.wait
    }

    /// Run `op` as one observed step: one log line, one screenshot, one
    /// journal record. `default_label` is used unless [`step`](Self::step)
    /// set a label.
    pub async fn observe<T, Fut>(&self, default_label: &str, action: String, op: Fut) -> ShopResult<T>
    where
        Fut: Future<Output = ShopResult<T>>,
    {
        let label = self.label.as_deref().unwrap_or(default_label);
        let started = Instant::now();
        let result = op.await;
        let elapsed = started.elapsed();

        let screenshot = match self.session.capture(label).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(step = label, "Screenshot skipped: {e}");
                None
            }
        };

        let record = match &result {
            Ok(_) => {
                tracing::info!(step = label, elapsed_ms = millis(elapsed), "{action}");
                StepRecord::passed(label, elapsed)
            }
            Err(e) => {
                tracing::error!(step = label, elapsed_ms = millis(elapsed), "{action} failed: {e}");
                StepRecord::failed(label, elapsed, e.to_string())
            }
        };
        self.session.record(record.with_screenshot(screenshot));
        result
    }

    /// Poll until `locator` matches more than `min_index` elements.
    ///
    /// A zero timeout queries exactly once.
    async fn locate(
        &self,
        locator: &Locator,
        min_index: usize,
        timeout: Duration,
    ) -> ShopResult<Vec<ElementSnapshot>> {
        let driver = self.session.driver()?;
        let deadline = Instant::now() + timeout;
        loop {
            let found = driver.find_all(locator).await?;
            if found.len() > min_index {
                return Ok(found);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(ShopError::ElementNotFound {
                    locator: locator.to_string(),
                    timeout_ms: millis(timeout),
                });
            }
            tokio::time::sleep(self.wait.poll_interval().min(deadline - now)).await;
        }
    }

    /// Poll until the `index`-th match is displayed and enabled.
    async fn await_clickable(
        &self,
        locator: &Locator,
        index: usize,
        timeout: Duration,
    ) -> ShopResult<ElementSnapshot> {
        let driver = self.session.driver()?;
        let deadline = Instant::now() + timeout;
        let mut seen = false;
        loop {
            let found = driver.find_all(locator).await?;
            if let Some(element) = found.get(index) {
                seen = true;
                if element.is_clickable() {
                    return Ok(element.clone());
                }
            }
            let now = Instant::now();
            if now >= deadline {
                let locator = locator.to_string();
                let timeout_ms = millis(timeout);
                return Err(if seen {
                    ShopError::ElementNotClickable {
                        locator,
                        timeout_ms,
                    }
                } else {
                    ShopError::ElementNotFound {
                        locator,
                        timeout_ms,
                    }
                });
            }
            tokio::time::sleep(self.wait.poll_interval().min(deadline - now)).await;
        }
    }

    async fn click_inner(&self, locator: &Locator, index: usize) -> ShopResult<()> {
        self.await_clickable(locator, index, self.wait.timeout()).await?;
        self.session
            .driver()?
            .click(locator, index)
            .await
            .map_err(|e| ShopError::Interaction {
                action: "click",
                locator: locator.to_string(),
                message: e.to_string(),
            })
    }

    async fn read_inner(&self, locator: &Locator) -> ShopResult<String> {
        let found = self.locate(locator, 0, self.wait.timeout()).await?;
        Ok(found
            .first()
            .map(|e| e.text.trim().to_string())
            .unwrap_or_default())
    }

    /// Wait up to `timeout` for `locator` to match; returns the first match.
    ///
    /// A zero `timeout` issues exactly one driver query. On a WebDriver
    /// backend that query can itself block for the session's implicit wait
    /// (10 s by default) when nothing matches.
    pub async fn find(&self, locator: &Locator, timeout: Duration) -> ShopResult<ElementSnapshot> {
        self.observe("find_element", format!("Element found: {locator}"), async {
            let mut found = self.locate(locator, 0, timeout).await?;
            Ok(found.swap_remove(0))
        })
        .await
    }

    /// Wait for the first match to be clickable, then click it.
    pub async fn click(&self, locator: &Locator) -> ShopResult<()> {
        self.observe(
            "click_element",
            format!("Clicked element: {locator}"),
            self.click_inner(locator, 0),
        )
        .await
    }

    /// Click the `index`-th match (0-based).
    pub async fn click_nth(&self, locator: &Locator, index: usize) -> ShopResult<()> {
        self.observe(
            "click_element",
            format!("Clicked element #{index}: {locator}"),
            self.click_inner(locator, index),
        )
        .await
    }

    /// Clear the first match and type `text` into it.
    pub async fn type_text(&self, locator: &Locator, text: &str) -> ShopResult<()> {
        self.observe("enter_text", format!("Entered text into {locator}"), async {
            self.locate(locator, 0, self.wait.timeout()).await?;
            let driver = self.session.driver()?;
            let interaction = |e: ShopError| ShopError::Interaction {
                action: "type",
                locator: locator.to_string(),
                message: e.to_string(),
            };
            driver.clear(locator, 0).await.map_err(interaction)?;
            driver.send_keys(locator, 0, text).await.map_err(interaction)
        })
        .await
    }

    /// Wait up to `timeout` for the first match to be displayed and enabled.
    pub async fn wait_clickable(&self, locator: &Locator, timeout: Duration) -> ShopResult<ElementSnapshot> {
        self.observe(
            "wait_clickable",
            format!("Element clickable: {locator}"),
            self.await_clickable(locator, 0, timeout),
        )
        .await
    }

    /// Text of the first match, surrounding whitespace trimmed.
    pub async fn read_text(&self, locator: &Locator) -> ShopResult<String> {
        self.observe(
            "get_text",
            format!("Read text of {locator}"),
            self.read_inner(locator),
        )
        .await
    }

    /// Trimmed text of every match, in document order.
    pub async fn read_all_texts(&self, locator: &Locator) -> ShopResult<Vec<String>> {
        self.observe("get_texts", format!("Read all texts of {locator}"), async {
            let found = self.locate(locator, 0, self.wait.timeout()).await?;
            Ok(found.into_iter().map(|e| e.text.trim().to_string()).collect())
        })
        .await
    }

    /// Single driver query. Never fails on absence.
    ///
    /// No polling happens here, but a WebDriver backend applies the session's
    /// implicit wait to the query, so a missing element can take up to that
    /// long (10 s by default) to report `false`.
    pub async fn is_present(&self, locator: &Locator) -> ShopResult<bool> {
        self.observe("is_present", format!("Checked presence of {locator}"), async {
            Ok(!self.session.driver()?.find_all(locator).await?.is_empty())
        })
        .await
    }

    /// Wait up to `timeout` for `locator` to match nothing.
    pub async fn wait_gone(&self, locator: &Locator, timeout: Duration) -> ShopResult<()> {
        self.observe("wait_gone", format!("Element gone: {locator}"), async {
            let driver = self.session.driver()?;
            let deadline = Instant::now() + timeout;
            loop {
                if driver.find_all(locator).await?.is_empty() {
                    return Ok(());
                }
                let now = Instant::now();
                if now >= deadline {
                    return Err(ShopError::assertion(format!(
                        "{locator} still present after {}ms",
                        millis(timeout)
                    )));
                }
                tokio::time::sleep(self.wait.poll_interval().min(deadline - now)).await;
            }
        })
        .await
    }

    /// Assert the first match's trimmed text equals `expected`.
    pub async fn verify_text(&self, locator: &Locator, expected: &str) -> ShopResult<()> {
        self.observe(
            "verify_text",
            format!("Verified text of {locator} is '{expected}'"),
            async {
                let actual = self.read_inner(locator).await?;
                if actual == expected {
                    Ok(())
                } else {
                    Err(ShopError::assertion(format!(
                        "Expected text '{expected}' at {locator}, but got '{actual}'"
                    )))
                }
            },
        )
        .await
    }

    /// Assert the document title equals `expected`.
    pub async fn verify_title(&self, expected: &str) -> ShopResult<()> {
        self.observe(
            "verify_title",
            format!("Verified title is '{expected}'"),
            async {
                let actual = self.session.title().await?;
                if actual == expected {
                    Ok(())
                } else {
                    Err(ShopError::assertion(format!(
                        "Title mismatch: expected {expected}, but got {actual}"
                    )))
                }
            },
        )
        .await
    }

    /// Navigate the session to `url`.
    pub async fn navigate(&self, url: &str) -> ShopResult<()> {
        self.observe("navigate", format!("Opened {url}"), self.session.navigate(url))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::browser::BrowserManager;
    use crate::driver::ElementSnapshot;
    use crate::journal::StepStatus;
    use crate::mock::{ClickEffect, MockDriver, MockLauncher};
    use crate::screenshot::ScreenshotManager;
    use tempfile::TempDir;

    fn loc(s: &str) -> Locator {
        Locator::parse(s).unwrap()
    }

    async fn session(driver: MockDriver, dir: &TempDir) -> BrowserSession {
        BrowserManager::new(MockLauncher::new(driver))
            .with_screenshots(ScreenshotManager::new(dir.path()))
            .start("chrome")
            .await
            .unwrap()
    }

    fn fast() -> WaitOptions {
        WaitOptions::new().with_timeout(100).with_poll_interval(10)
    }

    mod find_tests {
        use super::*;

        #[tokio::test]
        async fn test_zero_timeout_queries_once_and_captures_once() {
            let tmp = TempDir::new().unwrap();
            let driver = MockDriver::new();
            let session = session(driver.clone(), &tmp).await;
            let page = BasePage::new(&session);
            let missing = loc("css=div.absent");
            let before = driver.screenshot_count();

            let err = page.find(&missing, Duration::ZERO).await.unwrap_err();
            assert!(matches!(err, ShopError::ElementNotFound { timeout_ms: 0, .. }));
            assert_eq!(driver.query_count(&missing), 1);
            assert_eq!(driver.screenshot_count() - before, 1);

            let records = session.journal().records();
            assert_eq!(records.len(), 1);
            assert!(records[0].status.is_failed());
            assert!(records[0].screenshot.is_some());
            session.close().await.unwrap();
        }

        #[tokio::test]
        async fn test_find_polls_until_present() {
            let tmp = TempDir::new().unwrap();
            let target = loc("css=div._1AtVbE");
            let driver = MockDriver::new().with_delayed(&target, 2, vec![ElementSnapshot::visible(" Result ")]);
            let session = session(driver.clone(), &tmp).await;
            let page = BasePage::new(&session).with_wait(fast());

            let found = page.find(&target, Duration::from_millis(500)).await.unwrap();
            assert_eq!(found.text, " Result ");
            assert_eq!(driver.query_count(&target), 3);
            session.close().await.unwrap();
        }

        #[tokio::test]
        async fn test_step_label_names_screenshot() {
            let tmp = TempDir::new().unwrap();
            let target = loc("name=q");
            let session = session(MockDriver::new().with_element(&target, ""), &tmp).await;
            let page = BasePage::new(&session);

            page.step("Search Bar").find(&target, Duration::ZERO).await.unwrap();
            let record = session.journal().records().pop().unwrap();
            assert_eq!(record.label, "Search Bar");
            let file = record.screenshot.unwrap();
            assert!(file.file_name().unwrap().to_string_lossy().starts_with("Search_Bar_"));
            session.close().await.unwrap();
        }
    }

    mod interaction_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_runs_effects() {
            let tmp = TempDir::new().unwrap();
            let button = loc("xpath=//button[contains(text(),'Add to cart')]");
            let toast = loc("css=div.toast");
            let driver = MockDriver::new()
                .with_element(&button, "Add to cart")
                .on_click(&button, vec![ClickEffect::Show(toast.to_string(), vec![ElementSnapshot::visible("Added")])]);
            let session = session(driver.clone(), &tmp).await;
            let page = BasePage::new(&session).with_wait(fast());

            page.click(&button).await.unwrap();
            assert_eq!(page.read_text(&toast).await.unwrap(), "Added");
            assert_eq!(session.journal().len(), 2);
            session.close().await.unwrap();
        }

        #[tokio::test]
        async fn test_click_failure_is_interaction() {
            let tmp = TempDir::new().unwrap();
            let button = loc("css=button.buy");
            let driver = MockDriver::new()
                .with_element(&button, "Buy")
                .failing_click(&button, "element click intercepted");
            let session = session(driver, &tmp).await;
            let page = BasePage::new(&session).with_wait(fast());

            let err = page.click(&button).await.unwrap_err();
            assert!(matches!(err, ShopError::Interaction { action: "click", .. }));
            session.close().await.unwrap();
        }

        #[tokio::test]
        async fn test_disabled_element_not_clickable() {
            let tmp = TempDir::new().unwrap();
            let button = loc("css=button.buy");
            let disabled = ElementSnapshot {
                enabled: false,
                ..ElementSnapshot::visible("Buy")
            };
            let session = session(MockDriver::new().with_elements(&button, vec![disabled]), &tmp).await;
            let page = BasePage::new(&session).with_wait(fast());

            let err = page
                .wait_clickable(&button, Duration::from_millis(30))
                .await
                .unwrap_err();
            assert!(matches!(err, ShopError::ElementNotClickable { .. }));
            session.close().await.unwrap();
        }

        #[tokio::test]
        async fn test_type_text_clears_first() {
            let tmp = TempDir::new().unwrap();
            let input = loc("name=username");
            let driver = MockDriver::new().with_element(&input, "");
            let session = session(driver.clone(), &tmp).await;
            let page = BasePage::new(&session).with_wait(fast());

            page.type_text(&input, "stale").await.unwrap();
            page.type_text(&input, "john").await.unwrap();
            assert_eq!(driver.typed_text(&input).as_deref(), Some("john"));
            session.close().await.unwrap();
        }

        #[tokio::test]
        async fn test_click_nth() {
            let tmp = TempDir::new().unwrap();
            let results = loc("css=div._1AtVbE");
            let driver = MockDriver::new().with_elements(
                &results,
                vec![ElementSnapshot::visible("first"), ElementSnapshot::visible("second")],
            );
            let session = session(driver.clone(), &tmp).await;
            let page = BasePage::new(&session).with_wait(fast());

            page.click_nth(&results, 1).await.unwrap();
            assert!(driver.was_called("click:css=div._1AtVbE#1"));
            session.close().await.unwrap();
        }
    }

    mod read_and_verify_tests {
        use super::*;

        #[tokio::test]
        async fn test_read_all_texts_trims() {
            let tmp = TempDir::new().unwrap();
            let names = loc("css=a._2Kn22P");
            let driver = MockDriver::new().with_elements(
                &names,
                vec![ElementSnapshot::visible(" Samsung S24 \n"), ElementSnapshot::visible("Bajaj Iron")],
            );
            let session = session(driver, &tmp).await;
            let page = BasePage::new(&session).with_wait(fast());

            assert_eq!(
                page.read_all_texts(&names).await.unwrap(),
                vec!["Samsung S24".to_string(), "Bajaj Iron".to_string()]
            );
            session.close().await.unwrap();
        }

        #[tokio::test]
        async fn test_is_present_never_fails_on_absence() {
            let tmp = TempDir::new().unwrap();
            let session = session(MockDriver::new(), &tmp).await;
            let page = BasePage::new(&session);
            assert!(!page.is_present(&loc("css=div.gone")).await.unwrap());
            assert!(session.journal().records()[0].status.is_passed());
            session.close().await.unwrap();
        }

        #[tokio::test]
        async fn test_verify_title_mismatch() {
            let tmp = TempDir::new().unwrap();
            let driver = MockDriver::new().with_page("https://parabank.test", "ParaBank | Welcome");
            let session = session(driver, &tmp).await;
            let page = BasePage::new(&session);

            page.navigate("https://parabank.test").await.unwrap();
            page.verify_title("ParaBank | Welcome").await.unwrap();
            let err = page.verify_title("ParaBank | Accounts Overview").await.unwrap_err();
            assert!(matches!(err, ShopError::AssertionFailed { .. }));

            let last = session.journal().records().pop().unwrap();
            assert!(matches!(last.status, StepStatus::Failed { .. }));
            session.close().await.unwrap();
        }

        #[tokio::test]
        async fn test_wait_gone() {
            let tmp = TempDir::new().unwrap();
            let item = loc("xpath=//a[contains(text(),'Bajaj')]");
            let remove = loc("css=div.remove");
            let driver = MockDriver::new()
                .with_element(&item, "Bajaj")
                .with_element(&remove, "Remove")
                .on_click(&remove, vec![ClickEffect::Hide(item.to_string())]);
            let session = session(driver, &tmp).await;
            let page = BasePage::new(&session).with_wait(fast());

            let err = page.wait_gone(&item, Duration::from_millis(20)).await.unwrap_err();
            assert!(matches!(err, ShopError::AssertionFailed { .. }));
            page.click(&remove).await.unwrap();
            page.wait_gone(&item, Duration::from_millis(20)).await.unwrap();
            session.close().await.unwrap();
        }

        #[tokio::test]
        async fn test_verify_text() {
            let tmp = TempDir::new().unwrap();
            let heading = loc("css=h1.title");
            let session = session(MockDriver::new().with_element(&heading, " Accounts Overview "), &tmp).await;
            let page = BasePage::new(&session).with_wait(fast());

            page.verify_text(&heading, "Accounts Overview").await.unwrap();
            assert!(page.verify_text(&heading, "Welcome").await.is_err());
            session.close().await.unwrap();
        }
    }
}
