//! Scriptable in-memory browser for tests.
//!
//! [`MockDriver`] keeps a tiny "DOM": a map from locator text to the
//! elements it matches. Clicks can be scripted to mutate that map, which is
//! enough to walk the order-items and login flows without a browser.
//!
//! Cloning a `MockDriver` shares its state, so a test can hand one clone to
//! a [`BrowserSession`](crate::browser::BrowserSession) and inspect another.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::driver::{BrowserDriver, BrowserOptions, DriverLauncher, ElementSnapshot};
use crate::locator::Locator;
use crate::result::{ShopError, ShopResult};

/// Minimal PNG signature returned by [`MockDriver::screenshot_png`]
pub const MOCK_PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

/// DOM mutation applied when a scripted element is clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEffect {
    /// Replace the matches for a locator
    Show(String, Vec<ElementSnapshot>),
    /// Remove every match for a locator
    Hide(String),
    /// Change the document title
    SetTitle(String),
    /// Change the current URL
    Navigate(String),
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    title: String,
    titles: HashMap<String, String>,
    elements: HashMap<String, Vec<ElementSnapshot>>,
    delayed: HashMap<String, (usize, Vec<ElementSnapshot>)>,
    on_click: HashMap<String, Vec<ClickEffect>>,
    click_sequences: HashMap<String, (usize, Vec<Vec<ClickEffect>>)>,
    failing_clicks: HashMap<String, String>,
    typed: HashMap<String, String>,
    queries: HashMap<String, usize>,
    actions: Vec<String>,
    screenshots: usize,
    implicit_wait: Option<Duration>,
    implicit_wait_error: Option<String>,
    quit_error: Option<String>,
    quit_calls: usize,
}

/// In-memory [`BrowserDriver`]
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Create an empty mock
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Title reported after navigating to `url`
    #[must_use]
    pub fn with_page(self, url: impl Into<String>, title: impl Into<String>) -> Self {
        self.lock().titles.insert(url.into(), title.into());
        self
    }

    /// Elements matched by `locator`
    #[must_use]
    pub fn with_elements(self, locator: &Locator, elements: Vec<ElementSnapshot>) -> Self {
        self.lock().elements.insert(locator.to_string(), elements);
        self
    }

    /// One visible element with `text`
    #[must_use]
    pub fn with_element(self, locator: &Locator, text: impl Into<String>) -> Self {
        self.with_elements(locator, vec![ElementSnapshot::visible(text)])
    }

    /// Elements that appear only after `misses` empty lookups
    #[must_use]
    pub fn with_delayed(self, locator: &Locator, misses: usize, elements: Vec<ElementSnapshot>) -> Self {
        self.lock()
            .delayed
            .insert(locator.to_string(), (misses, elements));
        self
    }

    /// Effects applied when any match of `locator` is clicked
    #[must_use]
    pub fn on_click(self, locator: &Locator, effects: Vec<ClickEffect>) -> Self {
        self.lock()
            .on_click
            .entry(locator.to_string())
            .or_default()
            .extend(effects);
        self
    }

    /// Effects applied per click: the k-th click of `locator` applies
    /// `rounds[k]`; clicks past the end repeat the last round.
    #[must_use]
    pub fn on_click_sequence(self, locator: &Locator, rounds: Vec<Vec<ClickEffect>>) -> Self {
        self.lock()
            .click_sequences
            .insert(locator.to_string(), (0, rounds));
        self
    }

    /// Make clicks on `locator` fail with `message`
    #[must_use]
    pub fn failing_click(self, locator: &Locator, message: impl Into<String>) -> Self {
        self.lock()
            .failing_clicks
            .insert(locator.to_string(), message.into());
        self
    }

    /// Make `set_implicit_wait` fail with `message`
    #[must_use]
    pub fn failing_implicit_wait(self, message: impl Into<String>) -> Self {
        self.lock().implicit_wait_error = Some(message.into());
        self
    }

    /// Make `quit` fail with `message`
    #[must_use]
    pub fn failing_quit(self, message: impl Into<String>) -> Self {
        self.lock().quit_error = Some(message.into());
        self
    }

    /// Number of `find_all` calls for `locator`
    #[must_use]
    pub fn query_count(&self, locator: &Locator) -> usize {
        self.lock()
            .queries
            .get(&locator.to_string())
            .copied()
            .unwrap_or(0)
    }

    /// Number of screenshots taken
    #[must_use]
    pub fn screenshot_count(&self) -> usize {
        self.lock().screenshots
    }

    /// Text last typed into `locator`
    #[must_use]
    pub fn typed_text(&self, locator: &Locator) -> Option<String> {
        self.lock().typed.get(&locator.to_string()).cloned()
    }

    /// Recorded actions (`goto:..`, `click:..#i`, `send_keys:..`, `quit`)
    #[must_use]
    pub fn actions(&self) -> Vec<String> {
        self.lock().actions.clone()
    }

    /// Check if an action with `prefix` was recorded
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.lock().actions.iter().any(|a| a.starts_with(prefix))
    }

    /// Implicit wait set by the launcher
    #[must_use]
    pub fn implicit_wait(&self) -> Option<Duration> {
        self.lock().implicit_wait
    }

    /// Number of `quit` calls
    #[must_use]
    pub fn quit_calls(&self) -> usize {
        self.lock().quit_calls
    }

    fn target(state: &MockState, locator: &Locator, index: usize) -> ShopResult<String> {
        let key = locator.to_string();
        let count = state.elements.get(&key).map_or(0, Vec::len);
        if index >= count {
            return Err(ShopError::driver(format!(
                "no such element: {key} (index {index}, {count} matches)"
            )));
        }
        Ok(key)
    }
}

#[async_trait]
impl BrowserDriver for MockDriver {
    async fn goto(&self, url: &str) -> ShopResult<()> {
        let mut state = self.lock();
        state.actions.push(format!("goto:{url}"));
        state.url = url.to_string();
        if let Some(title) = state.titles.get(url).cloned() {
            state.title = title;
        }
        Ok(())
    }

    async fn title(&self) -> ShopResult<String> {
        Ok(self.lock().title.clone())
    }

    async fn current_url(&self) -> ShopResult<String> {
        Ok(self.lock().url.clone())
    }

    async fn find_all(&self, locator: &Locator) -> ShopResult<Vec<ElementSnapshot>> {
        let key = locator.to_string();
        let mut state = self.lock();
        *state.queries.entry(key.clone()).or_insert(0) += 1;

        let ready = match state.delayed.get_mut(&key) {
            Some((misses, _)) if *misses > 0 => {
                *misses -= 1;
                return Ok(Vec::new());
            }
            Some(_) => true,
            None => false,
        };
        if ready {
            if let Some((_, elements)) = state.delayed.remove(&key) {
                state.elements.insert(key.clone(), elements);
            }
        }
        Ok(state.elements.get(&key).cloned().unwrap_or_default())
    }

    async fn click(&self, locator: &Locator, index: usize) -> ShopResult<()> {
        let mut state = self.lock();
        let key = Self::target(&state, locator, index)?;
        if let Some(message) = state.failing_clicks.get(&key) {
            return Err(ShopError::driver(message.clone()));
        }
        state.actions.push(format!("click:{key}#{index}"));

        let mut effects = state.on_click.get(&key).cloned().unwrap_or_default();
        if let Some((clicks, rounds)) = state.click_sequences.get_mut(&key) {
            if let Some(round) = rounds.get(*clicks).or_else(|| rounds.last()) {
                effects.extend(round.iter().cloned());
            }
            *clicks += 1;
        }
        for effect in effects {
            match effect {
                ClickEffect::Show(target, elements) => {
                    state.elements.insert(target, elements);
                }
                ClickEffect::Hide(target) => {
                    state.elements.remove(&target);
                }
                ClickEffect::SetTitle(title) => state.title = title,
                ClickEffect::Navigate(url) => state.url = url,
            }
        }
        Ok(())
    }

    async fn clear(&self, locator: &Locator, index: usize) -> ShopResult<()> {
        let mut state = self.lock();
        let key = Self::target(&state, locator, index)?;
        state.actions.push(format!("clear:{key}#{index}"));
        state.typed.insert(key, String::new());
        Ok(())
    }

    async fn send_keys(&self, locator: &Locator, index: usize, text: &str) -> ShopResult<()> {
        let mut state = self.lock();
        let key = Self::target(&state, locator, index)?;
        state.actions.push(format!("send_keys:{key}#{index}"));
        state.typed.entry(key).or_default().push_str(text);
        Ok(())
    }

    async fn screenshot_png(&self) -> ShopResult<Vec<u8>> {
        self.lock().screenshots += 1;
        Ok(MOCK_PNG.to_vec())
    }

    async fn set_implicit_wait(&self, wait: Duration) -> ShopResult<()> {
        let mut state = self.lock();
        if let Some(message) = &state.implicit_wait_error {
            return Err(ShopError::driver(message.clone()));
        }
        state.implicit_wait = Some(wait);
        Ok(())
    }

    async fn quit(&self) -> ShopResult<()> {
        let mut state = self.lock();
        state.quit_calls += 1;
        state.actions.push("quit".to_string());
        match &state.quit_error {
            Some(message) => Err(ShopError::driver(message.clone())),
            None => Ok(()),
        }
    }
}

/// Launcher handing out clones of one [`MockDriver`]
#[derive(Debug, Clone, Default)]
pub struct MockLauncher {
    driver: MockDriver,
    launches: Arc<AtomicUsize>,
    failure: Option<String>,
    last_options: Arc<Mutex<Option<BrowserOptions>>>,
}

impl MockLauncher {
    /// Launcher for `driver`
    #[must_use]
    pub fn new(driver: MockDriver) -> Self {
        Self {
            driver,
            ..Self::default()
        }
    }

    /// Launcher whose every launch fails with `message`
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of launch attempts
    #[must_use]
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    /// Options of the most recent launch
    #[must_use]
    pub fn last_options(&self) -> Option<BrowserOptions> {
        self.last_options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Shared driver handle
    #[must_use]
    pub const fn driver(&self) -> &MockDriver {
        &self.driver
    }
}

#[async_trait]
impl DriverLauncher for MockLauncher {
    async fn launch(&self, options: &BrowserOptions) -> ShopResult<Box<dyn BrowserDriver>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        *self
            .last_options
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(options.clone());
        if let Some(message) = &self.failure {
            return Err(ShopError::BrowserLaunch {
                browser: options.kind.to_string(),
                message: message.clone(),
            });
        }
        Ok(Box::new(self.driver.clone()))
    }
}
