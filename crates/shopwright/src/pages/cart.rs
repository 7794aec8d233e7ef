//! Cart page.

use std::time::Duration;

use crate::cart::Cart;
use crate::page::BasePage;
use crate::pages::CartLocators;
use crate::price::parse_price;
use crate::result::ShopResult;

/// Cart page
#[derive(Debug, Clone)]
pub struct CartPage<'s> {
    page: BasePage<'s>,
    locators: CartLocators,
}

impl<'s> CartPage<'s> {
    /// Create the page
    #[must_use]
    pub const fn new(page: BasePage<'s>, locators: CartLocators) -> Self {
        Self { page, locators }
    }

    fn timeout(&self) -> Duration {
        self.page.wait().timeout()
    }

    /// Names of every item shown in the cart
    pub async fn item_names(&self) -> ShopResult<Vec<String>> {
        self.page
            .step("cart_items")
            .read_all_texts(&self.locators.item_names)
            .await
    }

    /// Fail unless every name in `names` is listed.
    pub async fn verify_items_present<S: AsRef<str>>(&self, names: &[S]) -> ShopResult<()> {
        for name in names {
            let name = name.as_ref();
            let locator = self.locators.item_by_name.with_param(name)?;
            self.page
                .step(format!("verify_item_{name}"))
                .find(&locator, self.timeout())
                .await?;
            tracing::info!("Verified item '{name}' is in the cart");
        }
        Ok(())
    }

    /// Displayed cart total
    pub async fn read_total(&self) -> ShopResult<u64> {
        let text = self
            .page
            .step("total_price")
            .read_text(&self.locators.total_price)
            .await?;
        parse_price(&text)
    }

    /// Fail unless the displayed total equals the cart model's total.
    pub async fn verify_total(&self, cart: &Cart) -> ShopResult<()> {
        let displayed = self.read_total().await?;
        cart.verify_total_price(displayed).inspect_err(|e| tracing::error!("{e}"))?;
        tracing::info!("Verified total price is {displayed}");
        Ok(())
    }

    /// Click the item's remove button and confirm.
    pub async fn remove_item(&self, name: &str) -> ShopResult<()> {
        let remove = self.locators.remove_button.with_param(name)?;
        self.page
            .step(format!("remove_{name}"))
            .click(&remove)
            .await?;
        self.page
            .step(format!("removed_{name}"))
            .click(&self.locators.confirm_remove)
            .await?;
        tracing::info!("Removed {name} from the cart");
        Ok(())
    }

    /// Fail if the item is still listed once the timeout elapses.
    pub async fn verify_item_removed(&self, name: &str) -> ShopResult<()> {
        let locator = self.locators.item_by_name.with_param(name)?;
        self.page
            .step(format!("verify_removed_{name}"))
            .wait_gone(&locator, self.timeout())
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::browser::{BrowserManager, BrowserSession};
    use crate::cart::Product;
    use crate::mock::{ClickEffect, MockDriver, MockLauncher};
    use crate::page::WaitOptions;
    use crate::pages::StorefrontLocators;
    use crate::result::ShopError;
    use crate::screenshot::ScreenshotManager;
    use tempfile::TempDir;

    async fn session(driver: MockDriver, dir: &TempDir) -> BrowserSession {
        BrowserManager::new(MockLauncher::new(driver))
            .with_screenshots(ScreenshotManager::new(dir.path()))
            .start("chrome")
            .await
            .unwrap()
    }

    fn fast(session: &BrowserSession) -> BasePage<'_> {
        BasePage::new(session).with_wait(WaitOptions::new().with_timeout(50).with_poll_interval(10))
    }

    #[tokio::test]
    async fn test_verify_items_and_total() {
        let tmp = TempDir::new().unwrap();
        let locators = StorefrontLocators::builtin().unwrap().cart;
        let driver = MockDriver::new()
            .with_element(&locators.item_by_name.with_param("A").unwrap(), "A")
            .with_element(&locators.item_by_name.with_param("B").unwrap(), "B")
            .with_element(&locators.total_price, "₹350");
        let session = session(driver, &tmp).await;
        let page = CartPage::new(fast(&session), locators);

        let mut cart = Cart::new();
        cart.add_item(Product::new("A", 100, true));
        cart.add_item(Product::new("B", 250, true));

        page.verify_items_present(&cart.names()).await.unwrap();
        page.verify_total(&cart).await.unwrap();

        cart.add_item(Product::new("C", 1, true));
        let err = page.verify_total(&cart).await.unwrap_err();
        assert!(matches!(err, ShopError::PriceMismatch { expected: 351, displayed: 350 }));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_item_fails() {
        let tmp = TempDir::new().unwrap();
        let locators = StorefrontLocators::builtin().unwrap().cart;
        let session = session(MockDriver::new(), &tmp).await;
        let page = CartPage::new(fast(&session), locators);

        let err = page.verify_items_present(&["Ghost"]).await.unwrap_err();
        assert!(matches!(err, ShopError::ElementNotFound { .. }));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_item_confirms_and_disappears() {
        let tmp = TempDir::new().unwrap();
        let locators = StorefrontLocators::builtin().unwrap().cart;
        let item = locators.item_by_name.with_param("A").unwrap();
        let remove = locators.remove_button.with_param("A").unwrap();
        let driver = MockDriver::new()
            .with_element(&item, "A")
            .with_element(&remove, "Remove")
            .on_click(
                &remove,
                vec![ClickEffect::Show(
                    locators.confirm_remove.to_string(),
                    vec![crate::driver::ElementSnapshot::visible("Remove Item")],
                )],
            )
            .on_click(
                &locators.confirm_remove,
                vec![ClickEffect::Hide(item.to_string()), ClickEffect::Hide(remove.to_string())],
            );
        let session = session(driver.clone(), &tmp).await;
        let page = CartPage::new(fast(&session), locators);

        page.remove_item("A").await.unwrap();
        page.verify_item_removed("A").await.unwrap();
        assert!(driver.was_called("click:xpath=//div[text()='Remove Item']#0"));
        session.close().await.unwrap();
    }
}
