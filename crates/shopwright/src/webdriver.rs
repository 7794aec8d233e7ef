//! W3C WebDriver backend (thirtyfour).
//!
//! Talks to chromedriver, geckodriver or a Selenium grid at the configured
//! endpoint. The driver binary must already be running; this backend does
//! not install or spawn it.

#![allow(clippy::missing_errors_doc)]

use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;

use crate::browser::BrowserKind;
use crate::driver::{BrowserDriver, BrowserOptions, DriverLauncher, ElementSnapshot};
use crate::locator::{Locator, Strategy};
use crate::result::{ShopError, ShopResult};

fn by(locator: &Locator) -> By {
    let selector = locator.selector();
    match locator.strategy() {
        Strategy::Id => By::Id(selector),
        Strategy::Name => By::Name(selector),
        Strategy::ClassName => By::ClassName(selector),
        Strategy::Css => By::Css(selector),
        Strategy::XPath => By::XPath(selector),
        Strategy::LinkText => By::LinkText(selector),
        Strategy::PartialLinkText => By::PartialLinkText(selector),
        Strategy::Tag => By::Tag(selector),
    }
}

fn driver_err(e: &WebDriverError) -> ShopError {
    ShopError::driver(e.to_string())
}

/// thirtyfour-backed [`BrowserDriver`]
#[derive(Debug, Clone)]
pub struct WebDriverBackend {
    driver: WebDriver,
}

impl WebDriverBackend {
    /// Wrap an existing session
    #[must_use]
    pub const fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    async fn element(&self, locator: &Locator, index: usize) -> ShopResult<WebElement> {
        let mut elements = self
            .driver
            .find_all(by(locator))
            .await
            .map_err(|e| driver_err(&e))?;
        if index >= elements.len() {
            return Err(ShopError::driver(format!(
                "no such element: {locator} (index {index}, {} matches)",
                elements.len()
            )));
        }
        Ok(elements.swap_remove(index))
    }
}

#[async_trait]
impl BrowserDriver for WebDriverBackend {
    async fn goto(&self, url: &str) -> ShopResult<()> {
        self.driver.goto(url).await.map_err(|e| ShopError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn title(&self) -> ShopResult<String> {
        self.driver.title().await.map_err(|e| driver_err(&e))
    }

    async fn current_url(&self) -> ShopResult<String> {
        self.driver
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(|e| driver_err(&e))
    }

    async fn find_all(&self, locator: &Locator) -> ShopResult<Vec<ElementSnapshot>> {
        let elements = self
            .driver
            .find_all(by(locator))
            .await
            .map_err(|e| driver_err(&e))?;
        let mut snapshots = Vec::with_capacity(elements.len());
        for element in elements {
            snapshots.push(ElementSnapshot {
                text: element.text().await.map_err(|e| driver_err(&e))?,
                displayed: element.is_displayed().await.map_err(|e| driver_err(&e))?,
                enabled: element.is_enabled().await.map_err(|e| driver_err(&e))?,
            });
        }
        Ok(snapshots)
    }

    async fn click(&self, locator: &Locator, index: usize) -> ShopResult<()> {
        let element = self.element(locator, index).await?;
        element.click().await.map_err(|e| driver_err(&e))
    }

    async fn clear(&self, locator: &Locator, index: usize) -> ShopResult<()> {
        let element = self.element(locator, index).await?;
        element.clear().await.map_err(|e| driver_err(&e))
    }

    async fn send_keys(&self, locator: &Locator, index: usize, text: &str) -> ShopResult<()> {
        let element = self.element(locator, index).await?;
        element.send_keys(text).await.map_err(|e| driver_err(&e))
    }

    async fn screenshot_png(&self) -> ShopResult<Vec<u8>> {
        self.driver
            .screenshot_as_png()
            .await
            .map_err(|e| driver_err(&e))
    }

    async fn set_implicit_wait(&self, wait: Duration) -> ShopResult<()> {
        self.driver
            .set_implicit_wait_timeout(wait)
            .await
            .map_err(|e| driver_err(&e))
    }

    async fn quit(&self) -> ShopResult<()> {
        self.driver.clone().quit().await.map_err(|e| driver_err(&e))
    }
}

/// Launches Chrome or Firefox through a running WebDriver endpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct WebDriverLauncher;

impl WebDriverLauncher {
    fn launch_err(options: &BrowserOptions, e: &WebDriverError) -> ShopError {
        ShopError::BrowserLaunch {
            browser: options.kind.to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl DriverLauncher for WebDriverLauncher {
    async fn launch(&self, options: &BrowserOptions) -> ShopResult<Box<dyn BrowserDriver>> {
        let err = |e: WebDriverError| Self::launch_err(options, &e);
        let driver = match options.kind {
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if options.headless {
                    caps.set_headless().map_err(err)?;
                }
                if options.maximized {
                    caps.add_arg("--start-maximized").map_err(err)?;
                }
                for arg in &options.args {
                    caps.add_arg(arg).map_err(err)?;
                }
                WebDriver::new(&options.webdriver_url, caps)
                    .await
                    .map_err(err)?
            }
            BrowserKind::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if options.headless {
                    caps.set_headless().map_err(err)?;
                }
                for arg in &options.args {
                    caps.add_arg(arg).map_err(err)?;
                }
                WebDriver::new(&options.webdriver_url, caps)
                    .await
                    .map_err(err)?
            }
        };

        if options.maximized {
            driver.maximize_window().await.map_err(err)?;
        }
        tracing::info!(
            browser = %options.kind,
            endpoint = %options.webdriver_url,
            headless = options.headless,
            "WebDriver session started"
        );
        Ok(Box::new(WebDriverBackend::new(driver)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_locator_mapping() {
        let cases = [
            ("id=login", By::Id("login")),
            ("name=q", By::Name("q")),
            ("class=_2xm1JU", By::ClassName("_2xm1JU")),
            ("css=div._1AtVbE", By::Css("div._1AtVbE")),
            ("xpath=//a", By::XPath("//a")),
            ("link=Log Out", By::LinkText("Log Out")),
            ("partial_link=Accounts", By::PartialLinkText("Accounts")),
            ("tag=button", By::Tag("button")),
        ];
        for (input, expected) in cases {
            let locator = Locator::parse(input).unwrap();
            assert_eq!(format!("{:?}", by(&locator)), format!("{expected:?}"), "{input}");
        }
    }
}
