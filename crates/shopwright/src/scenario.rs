//! Scenario orchestration.
//!
//! A scenario is a linear pipeline of named steps. The first failing step
//! stops the pipeline (no retry): a `<scenario>_failure` screenshot is taken,
//! the error is logged and the scenario's report carries it.
//!
//! ```text
//! open_home_page → search/select → capture+pincode → add_to_cart → (return home, repeat)
//!   → navigate_to_cart → verify items + total → remove item → verify removed + total
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::browser::BrowserSession;
use crate::cart::Cart;
use crate::credentials::read_credentials_row;
use crate::journal::{StepJournal, StepRecord};
use crate::page::{BasePage, WaitOptions};
use crate::pages::{BankLocators, CartPage, HomePage, LoginPage, ProductPage, StorefrontLocators};
use crate::result::{ShopError, ShopResult};

/// Runs named steps of one scenario against one session.
#[derive(Debug)]
pub struct ScenarioRunner<'s> {
    name: String,
    session: &'s BrowserSession,
    steps: StepJournal,
    started: Instant,
}

impl<'s> ScenarioRunner<'s> {
    /// Runner for scenario `name`
    #[must_use]
    pub fn new(name: impl Into<String>, session: &'s BrowserSession) -> Self {
        Self {
            name: name.into(),
            session,
            steps: StepJournal::new(),
            started: Instant::now(),
        }
    }

    /// Scenario name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run one step. On failure a `<scenario>_failure` screenshot is taken
    /// and the error is returned for the caller to propagate.
    pub async fn step<T, Fut>(&self, step: &str, op: Fut) -> ShopResult<T>
    where
        Fut: Future<Output = ShopResult<T>>,
    {
        tracing::info!(scenario = %self.name, "Step: {step}");
        let started = Instant::now();
        let result = op.await;
        let elapsed = started.elapsed();

        match result {
            Ok(value) => {
                let shot = self.capture(step).await;
                self.steps
                    .record(StepRecord::passed(step, elapsed).with_screenshot(shot));
                Ok(value)
            }
            Err(e) => {
                let shot = self.capture(&format!("{}_failure", self.name)).await;
                let kind = if e.is_test_failure() {
                    "Assertion error"
                } else {
                    "Unexpected error"
                };
                tracing::error!(scenario = %self.name, "{kind} in step '{step}': {e}");
                self.steps
                    .record(StepRecord::failed(step, elapsed, e.to_string()).with_screenshot(shot));
                Err(e)
            }
        }
    }

    async fn capture(&self, label: &str) -> Option<PathBuf> {
        match self.session.capture(label).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(scenario = %self.name, "Screenshot '{label}' skipped: {e}");
                None
            }
        }
    }

    /// Close the run and build its report
    #[must_use]
    pub fn finish(self, result: ShopResult<()>) -> ScenarioReport {
        let report = ScenarioReport {
            name: self.name,
            steps: self.steps.records(),
            duration: self.started.elapsed(),
            error: result.err(),
        };
        if report.passed() {
            tracing::info!("{report}");
        } else {
            tracing::error!("{report}");
        }
        report
    }
}

/// Outcome of one scenario run
#[derive(Debug)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Step records in execution order
    pub steps: Vec<StepRecord>,
    /// Total wall time
    pub duration: Duration,
    /// First failure, if any
    pub error: Option<ShopError>,
}

impl ScenarioReport {
    /// Whether every step passed
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into the scenario's result
    pub fn into_result(self) -> ShopResult<()> {
        self.error.map_or(Ok(()), Err)
    }

    /// Step records serialized with the scenario outcome
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "passed": self.passed(),
            "duration_ms": u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX),
            "error": self.error.as_ref().map(ToString::to_string),
            "steps": self.steps,
        })
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let passed = self.steps.iter().filter(|s| s.status.is_passed()).count();
        write!(
            f,
            "{} {} ({passed}/{} steps, {:.1}s)",
            self.name,
            if self.passed() { "PASSED" } else { "FAILED" },
            self.steps.len(),
            self.duration.as_secs_f64()
        )?;
        if let Some(e) = &self.error {
            write!(f, ": {e}")?;
        }
        Ok(())
    }
}

fn default_result_index() -> usize {
    1
}

/// One product to search for and add
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Search term
    pub search: String,
    /// Result to open (0-based); the first tile is often sponsored
    #[serde(default = "default_result_index")]
    pub result_index: usize,
}

impl ProductQuery {
    /// Query opening result `result_index`
    #[must_use]
    pub fn new(search: impl Into<String>, result_index: usize) -> Self {
        Self {
            search: search.into(),
            result_index,
        }
    }
}

/// Search, add to cart, verify totals, remove one item, verify again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItemsScenario {
    /// Storefront home URL
    pub home_url: String,
    /// Products in the order they are added
    pub products: Vec<ProductQuery>,
    /// Delivery pincode checked on every product page
    pub pincode: String,
    /// Which added product to remove afterwards
    pub remove_index: usize,
}

impl Default for OrderItemsScenario {
    fn default() -> Self {
        Self {
            home_url: "https://www.flipkart.com".to_string(),
            products: vec![
                ProductQuery::new("Samsung S24 128 GB", 1),
                ProductQuery::new("bajaj iron majesty", 1),
            ],
            pincode: "122017".to_string(),
            remove_index: 0,
        }
    }
}

impl OrderItemsScenario {
    /// Scenario name used for logs and the failure screenshot
    pub const NAME: &'static str = "test_order_items";

    fn validate(&self) -> ShopResult<()> {
        if self.products.is_empty() {
            return Err(ShopError::config("order scenario needs at least one product"));
        }
        if self.remove_index >= self.products.len() {
            return Err(ShopError::config(format!(
                "remove_index {} out of range for {} products",
                self.remove_index,
                self.products.len()
            )));
        }
        Ok(())
    }

    /// Run against `session`
    pub async fn run(
        &self,
        session: &BrowserSession,
        locators: &StorefrontLocators,
        wait: WaitOptions,
    ) -> ScenarioReport {
        let runner = ScenarioRunner::new(Self::NAME, session);
        let result = match self.validate() {
            Ok(()) => self.execute(&runner, session, locators, wait).await.map(|cart| {
                tracing::info!("Final {cart}");
            }),
            Err(e) => Err(e),
        };
        runner.finish(result)
    }

    async fn execute(
        &self,
        runner: &ScenarioRunner<'_>,
        session: &BrowserSession,
        locators: &StorefrontLocators,
        wait: WaitOptions,
    ) -> ShopResult<Cart> {
        let page = BasePage::new(session).with_wait(wait);
        let home = HomePage::new(page.clone(), locators.home.clone(), self.home_url.clone());
        let product_page = ProductPage::new(page.clone(), locators.product.clone());
        let cart_page = CartPage::new(page, locators.cart.clone());
        let mut cart = Cart::new();

        runner.step("open_home_page", home.open()).await?;

        for (i, query) in self.products.iter().enumerate() {
            if i > 0 {
                runner.step("return_to_home_page", home.return_home()).await?;
            }
            runner
                .step(&format!("search_and_select_{}", query.search), async {
                    home.search(&query.search).await?;
                    home.select_result(query.result_index).await
                })
                .await?;
            let product = runner
                .step(&format!("check_availability_{}", query.search), async {
                    let product = product_page.capture_product(&self.pincode).await?;
                    if !product.availability {
                        return Err(ShopError::assertion(format!(
                            "'{}' is not deliverable to pincode {}",
                            product.name, self.pincode
                        )));
                    }
                    Ok(product)
                })
                .await?;
            runner
                .step(
                    &format!("add_to_cart_{}", query.search),
                    product_page.add_to_cart(&product),
                )
                .await?;
            cart.add_item(product);
        }

        runner.step("navigate_to_cart", home.open_cart()).await?;
        runner
            .step("verify_cart_items_and_total_price", async {
                cart_page.verify_items_present(&cart.names()).await?;
                cart_page.verify_total(&cart).await
            })
            .await?;

        let removed = cart.items()[self.remove_index].name().to_string();
        runner
            .step(&format!("remove_item_{removed}"), async {
                cart_page.remove_item(&removed).await?;
                cart_page.verify_item_removed(&removed).await
            })
            .await?;
        cart.remove_item(&removed);
        runner
            .step("verify_price_after_removal", cart_page.verify_total(&cart))
            .await?;

        Ok(cart)
    }
}

/// Read credentials from CSV, log in, validate the landing page title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginScenario {
    /// Login page URL
    pub login_url: String,
    /// `username,password` CSV file
    pub credentials_csv: PathBuf,
    /// Row to use (0-based)
    pub row: usize,
    /// Title expected after logging in
    pub expected_title: String,
}

impl Default for LoginScenario {
    fn default() -> Self {
        Self {
            login_url: "https://parabank.parasoft.com/parabank/index.htm".to_string(),
            credentials_csv: PathBuf::from("data/users.csv"),
            row: 0,
            expected_title: "ParaBank | Accounts Overview".to_string(),
        }
    }
}

impl LoginScenario {
    /// Scenario name used for logs and the failure screenshot
    pub const NAME: &'static str = "test_parabank_login";

    /// Run against `session`
    pub async fn run(
        &self,
        session: &BrowserSession,
        locators: &BankLocators,
        wait: WaitOptions,
    ) -> ScenarioReport {
        let runner = ScenarioRunner::new(Self::NAME, session);
        let result = self.execute(&runner, session, locators, wait).await;
        runner.finish(result)
    }

    async fn execute(
        &self,
        runner: &ScenarioRunner<'_>,
        session: &BrowserSession,
        locators: &BankLocators,
        wait: WaitOptions,
    ) -> ShopResult<()> {
        let login = LoginPage::new(
            BasePage::new(session).with_wait(wait),
            locators.login.clone(),
            self.login_url.clone(),
        );

        let credentials = runner
            .step("get_credentials_from_csv", async {
                read_credentials_row(&self.credentials_csv, self.row)
            })
            .await?;
        runner.step("open_login_page", login.open()).await?;
        runner
            .step("login_to_parabank", login.login(&credentials))
            .await?;
        runner
            .step("validate_title", login.verify_title(&self.expected_title))
            .await
    }
}
