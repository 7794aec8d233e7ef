//! Banking demo login page.

use crate::credentials::Credentials;
use crate::page::BasePage;
use crate::pages::LoginLocators;
use crate::result::ShopResult;

/// Login page
#[derive(Debug, Clone)]
pub struct LoginPage<'s> {
    page: BasePage<'s>,
    locators: LoginLocators,
    url: String,
}

impl<'s> LoginPage<'s> {
    /// Login page at `url`
    #[must_use]
    pub fn new(page: BasePage<'s>, locators: LoginLocators, url: impl Into<String>) -> Self {
        Self {
            page,
            locators,
            url: url.into(),
        }
    }

    /// Open the login page
    pub async fn open(&self) -> ShopResult<()> {
        self.page.step("login_page").navigate(&self.url).await
    }

    /// Submit `credentials` and wait for the accounts overview link.
    pub async fn login(&self, credentials: &Credentials) -> ShopResult<()> {
        tracing::info!("Attempting to log in with username: {}", credentials.username());
        self.page
            .step("username")
            .type_text(&self.locators.username, credentials.username())
            .await?;
        self.page
            .step("password")
            .type_text(&self.locators.password, credentials.password())
            .await?;
        self.page
            .step("login_submit")
            .click(&self.locators.submit)
            .await?;
        self.page
            .step("accounts_overview")
            .find(&self.locators.accounts_overview, self.page.wait().timeout())
            .await?;
        tracing::info!("Login successful. Accounts Overview page loaded.");
        Ok(())
    }

    /// Assert the page title
    pub async fn verify_title(&self, expected: &str) -> ShopResult<()> {
        self.page.step("validate_title").verify_title(expected).await
    }
}
