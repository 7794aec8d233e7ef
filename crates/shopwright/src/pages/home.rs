//! Storefront home page and search results.

use crate::page::BasePage;
use crate::pages::HomeLocators;
use crate::result::{ShopError, ShopResult};

/// W3C WebDriver key code for Enter
const ENTER_KEY: char = '\u{e007}';

/// Home page
#[derive(Debug, Clone)]
pub struct HomePage<'s> {
    page: BasePage<'s>,
    locators: HomeLocators,
    url: String,
}

impl<'s> HomePage<'s> {
    /// Home page at `url`
    #[must_use]
    pub fn new(page: BasePage<'s>, locators: HomeLocators, url: impl Into<String>) -> Self {
        Self {
            page,
            locators,
            url: url.into(),
        }
    }

    /// Open the home page
    pub async fn open(&self) -> ShopResult<()> {
        self.page.step("storefront_homepage").navigate(&self.url).await
    }

    /// Type `term` into the search bar and submit
    pub async fn search(&self, term: &str) -> ShopResult<()> {
        self.page
            .step(format!("searched_{term}"))
            .type_text(&self.locators.search_box, &format!("{term}{ENTER_KEY}"))
            .await
    }

    /// Click the `index`-th search result (0-based); returns its title line.
    pub async fn select_result(&self, index: usize) -> ShopResult<String> {
        let results = &self.locators.search_results;
        let texts = self.page.step("search_results").read_all_texts(results).await?;
        let name = texts
            .get(index)
            .map(|text| text.lines().next().unwrap_or_default().trim().to_string())
            .ok_or_else(|| ShopError::ElementNotFound {
                locator: format!("{results} (result #{index}, {} shown)", texts.len()),
                timeout_ms: self.page.wait().timeout_ms,
            })?;
        self.page
            .step(format!("selected_{name}"))
            .click_nth(results, index)
            .await?;
        tracing::info!("Selected search result #{index}: {name}");
        Ok(name)
    }

    /// Click the logo to return home
    pub async fn return_home(&self) -> ShopResult<()> {
        self.page
            .step("storefront_homepage_return")
            .click(&self.locators.home_logo)
            .await
    }

    /// Open the cart from the header
    pub async fn open_cart(&self) -> ShopResult<()> {
        self.page
            .step("navigate_to_cart")
            .click(&self.locators.cart_icon)
            .await
    }
}
