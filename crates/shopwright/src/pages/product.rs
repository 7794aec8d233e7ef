//! Product detail page.

use crate::cart::Product;
use crate::page::BasePage;
use crate::pages::ProductLocators;
use crate::price::{format_price, parse_price};
use crate::result::ShopResult;

/// Product detail page
#[derive(Debug, Clone)]
pub struct ProductPage<'s> {
    page: BasePage<'s>,
    locators: ProductLocators,
}

impl<'s> ProductPage<'s> {
    /// Create the page
    #[must_use]
    pub const fn new(page: BasePage<'s>, locators: ProductLocators) -> Self {
        Self { page, locators }
    }

    /// Read name and price, then check delivery to `pincode`.
    pub async fn capture_product(&self, pincode: &str) -> ShopResult<Product> {
        let name = self
            .page
            .step("product_name")
            .read_text(&self.locators.name)
            .await?;
        let price_text = self
            .page
            .step("product_price")
            .read_text(&self.locators.price)
            .await?;
        let price = parse_price(&price_text)?;
        tracing::info!("Product: {name} at {}", format_price(price));

        self.page
            .step("pincode_field")
            .type_text(&self.locators.pincode_input, pincode)
            .await?;
        self.page
            .step("check_pincode")
            .click(&self.locators.check_pincode)
            .await?;
        let blocked = self
            .page
            .step(format!("availability_{name}"))
            .is_present(&self.locators.not_deliverable)
            .await?;
        tracing::info!("Checked availability of {name} for pincode {pincode}: {}", !blocked);

        Ok(Product::new(name, price, !blocked))
    }

    /// Click add-to-cart
    pub async fn add_to_cart(&self, product: &Product) -> ShopResult<()> {
        self.page
            .step(format!("added_{}_to_cart", product.name))
            .click(&self.locators.add_to_cart)
            .await
    }

    /// Follow the go-to-cart link
    pub async fn go_to_cart(&self) -> ShopResult<()> {
        self.page
            .step("go_to_cart")
            .click(&self.locators.go_to_cart)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::browser::{BrowserManager, BrowserSession};
    use crate::mock::{MockDriver, MockLauncher};
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

    fn product_dom(locators: &ProductLocators, price: &str) -> MockDriver {
        MockDriver::new()
            .with_element(&locators.name, " Bajaj Majesty DX 11 Dry Iron ")
            .with_element(&locators.price, price)
            .with_element(&locators.pincode_input, "")
            .with_element(&locators.check_pincode, "Check")
            .with_element(&locators.add_to_cart, "ADD TO CART")
    }

    fn fast(session: &BrowserSession) -> BasePage<'_> {
        BasePage::new(session).with_wait(WaitOptions::new().with_timeout(50).with_poll_interval(10))
    }

    #[tokio::test]
    async fn test_capture_product() {
        let tmp = TempDir::new().unwrap();
        let locators = StorefrontLocators::builtin().unwrap().product;
        let driver = product_dom(&locators, "₹1,299");
        let session = session(driver.clone(), &tmp).await;
        let page = ProductPage::new(fast(&session), locators.clone());

        let product = page.capture_product("122017").await.unwrap();
        assert_eq!(product, Product::new("Bajaj Majesty DX 11 Dry Iron", 1299, true));
        assert_eq!(driver.typed_text(&locators.pincode_input).as_deref(), Some("122017"));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_not_deliverable_marks_unavailable() {
        let tmp = TempDir::new().unwrap();
        let locators = StorefrontLocators::builtin().unwrap().product;
        let driver = product_dom(&locators, "₹799").with_element(&locators.not_deliverable, "Not deliverable");
        let session = session(driver, &tmp).await;
        let page = ProductPage::new(fast(&session), locators);

        assert!(!page.capture_product("000000").await.unwrap().availability);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_unparseable_price_fails() {
        let tmp = TempDir::new().unwrap();
        let locators = StorefrontLocators::builtin().unwrap().product;
        let session = session(product_dom(&locators, "Coming soon"), &tmp).await;
        let page = ProductPage::new(fast(&session), locators);

        let err = page.capture_product("122017").await.unwrap_err();
        assert!(matches!(err, ShopError::PriceParse { .. }));
        session.close().await.unwrap();
    }
}
