//! Page objects for the storefront and banking demo sites.
//!
//! Locators live in YAML tables (`storefront.yaml`, `bank.yaml`) compiled
//! into the crate. A suite can point at its own table when the site's
//! markup changes; every entry is validated when the table is loaded.

mod cart;
mod home;
mod login;
mod product;

pub use cart::CartPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use product::ProductPage;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::locator::Locator;
use crate::result::ShopResult;

const STOREFRONT_YAML: &str = include_str!("storefront.yaml");
const BANK_YAML: &str = include_str!("bank.yaml");

/// Home page / search locators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeLocators {
    /// Search input
    pub search_box: Locator,
    /// Result tiles
    pub search_results: Locator,
    /// Logo linking back home
    pub home_logo: Locator,
    /// Header cart link
    pub cart_icon: Locator,
}

/// Product detail locators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLocators {
    /// Product title
    pub name: Locator,
    /// Displayed price
    pub price: Locator,
    /// Delivery pincode input
    pub pincode_input: Locator,
    /// Pincode check button
    pub check_pincode: Locator,
    /// Message shown when the pincode is not serviceable
    pub not_deliverable: Locator,
    /// Add-to-cart button
    pub add_to_cart: Locator,
    /// Go-to-cart link shown after adding
    pub go_to_cart: Locator,
}

/// Cart page locators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLocators {
    /// Every item name link
    pub item_names: Locator,
    /// Item name link, templated on `{name}`
    pub item_by_name: Locator,
    /// Remove button of one item, templated on `{name}`
    pub remove_button: Locator,
    /// Confirmation button of the remove dialog
    pub confirm_remove: Locator,
    /// Displayed cart total
    pub total_price: Locator,
}

/// Full storefront locator table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontLocators {
    /// Home page
    pub home: HomeLocators,
    /// Product page
    pub product: ProductLocators,
    /// Cart page
    pub cart: CartLocators,
}

/// Banking login locators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginLocators {
    /// Username input
    pub username: Locator,
    /// Password input
    pub password: Locator,
    /// Log-in button
    pub submit: Locator,
    /// Link only present once logged in
    pub accounts_overview: Locator,
}

/// Full banking locator table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankLocators {
    /// Login page
    pub login: LoginLocators,
}

impl StorefrontLocators {
    /// Table compiled into the crate
    pub fn builtin() -> ShopResult<Self> {
        Self::from_yaml(STOREFRONT_YAML)
    }

    /// Parse a YAML table
    pub fn from_yaml(yaml: &str) -> ShopResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a YAML table from disk
    pub fn load(path: impl AsRef<Path>) -> ShopResult<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }
}

impl BankLocators {
    /// Table compiled into the crate
    pub fn builtin() -> ShopResult<Self> {
        Self::from_yaml(BANK_YAML)
    }

    /// Parse a YAML table
    pub fn from_yaml(yaml: &str) -> ShopResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a YAML table from disk
    pub fn load(path: impl AsRef<Path>) -> ShopResult<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::locator::Strategy;

    #[test]
    fn test_builtin_storefront_table_loads() {
        let table = StorefrontLocators::builtin().unwrap();
        assert_eq!(table.home.search_box.strategy(), Strategy::Name);
        assert_eq!(table.home.home_logo.strategy(), Strategy::ClassName);
        assert!(table.cart.item_by_name.is_template());
        assert!(table.cart.remove_button.is_template());
        assert!(!table.cart.total_price.is_template());
    }

    #[test]
    fn test_builtin_bank_table_loads() {
        let table = BankLocators::builtin().unwrap();
        assert_eq!(table.login.submit.selector(), "//input[@value=\"Log In\"]");
    }

    #[test]
    fn test_invalid_entry_fails_at_load() {
        let yaml = STOREFRONT_YAML.replace("name=q", "css=");
        assert!(StorefrontLocators::from_yaml(&yaml).is_err());
    }
}
