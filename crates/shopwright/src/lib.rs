//! Shopwright: page-object UI suites and REST API fixtures
//!
//! Browser suites for a storefront cart flow and a banking login, plus an
//! HTTP suite for a project-board service. UI suites drive a real browser
//! through WebDriver (or the in-memory [`mock::MockDriver`] in tests); the
//! API suite talks to the service with `reqwest`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   SHOPWRIGHT Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Page       │    │ Browser    │            │
//! │   │ Runner     │───►│ Objects    │───►│ Session    │──► driver  │
//! │   │ (steps)    │    │ (BasePage) │    │ (+shots)   │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │         │                                                        │
//! │         ▼           ┌────────────┐    ┌────────────┐            │
//! │   Cart model        │ API suite  │───►│ Fixtures / │──► HTTP    │
//! │   (totals)          │            │    │ Models     │            │
//! │                     └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use shopwright::prelude::*;
//!
//! let config = SuiteConfig::load("shopwright.yaml")?.apply_env()?;
//! let _log = LogContext::init(&config.logging)?;
//! let session = config.browser_manager(WebDriverLauncher)?.start(&config.browser.name).await?;
//! let report = config
//!     .order_items
//!     .run(&session, &config.storefront_locators()?, config.wait)
//!     .await;
//! session.close().await?;
//! report.into_result()?;
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Board service client, resource models, fixtures and smoke suite
pub mod api;
/// Browser kinds, launch and session lifecycle
pub mod browser;
/// Cart state model
pub mod cart;
/// Suite configuration
pub mod config;
/// CSV login credentials
pub mod credentials;
/// Browser driver abstraction
pub mod driver;
/// Step journal
pub mod journal;
/// Typed element locators
pub mod locator;
/// Log file rotation and subscriber setup
pub mod logging;
/// In-memory driver for tests
pub mod mock;
/// Page object base and element waits
pub mod page;
/// Storefront and banking page objects
pub mod pages;
/// Displayed price parsing
pub mod price;
/// Error types
pub mod result;
/// Scenario runner and built-in scenarios
pub mod scenario;
/// Screenshot files
pub mod screenshot;
/// WebDriver backend
#[cfg(feature = "webdriver")]
pub mod webdriver;

pub use api::{ApiCredentials, ApiResponse, ApiSession, BoardClient, TestData};
pub use browser::{BrowserKind, BrowserManager, BrowserSession};
pub use cart::{Cart, CartItem, Product};
pub use config::SuiteConfig;
pub use credentials::{read_credentials_row, Credentials};
pub use driver::{BrowserDriver, BrowserOptions, DriverLauncher, ElementSnapshot};
pub use journal::{StepJournal, StepRecord, StepStatus};
pub use locator::{Locator, Strategy};
pub use logging::{LogConfig, LogContext};
pub use page::{BasePage, WaitOptions};
pub use price::{format_price, parse_price};
pub use result::{ShopError, ShopResult};
pub use scenario::{LoginScenario, OrderItemsScenario, ScenarioReport, ScenarioRunner};
pub use screenshot::ScreenshotManager;
#[cfg(feature = "webdriver")]
pub use webdriver::WebDriverLauncher;

/// Common imports for suites
pub mod prelude {
    pub use crate::api::{ApiSession, Board, Card, List, TestData};
    pub use crate::browser::{BrowserKind, BrowserManager, BrowserSession};
    pub use crate::cart::{Cart, Product};
    pub use crate::config::SuiteConfig;
    pub use crate::locator::Locator;
    pub use crate::logging::LogContext;
    pub use crate::page::{BasePage, WaitOptions};
    pub use crate::pages::{CartPage, HomePage, LoginPage, ProductPage};
    pub use crate::result::{ShopError, ShopResult};
    pub use crate::scenario::{LoginScenario, OrderItemsScenario, ScenarioReport};
    #[cfg(feature = "webdriver")]
    pub use crate::webdriver::WebDriverLauncher;
}
