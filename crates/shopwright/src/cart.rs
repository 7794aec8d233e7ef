//! In-memory mirror of the storefront cart.
//!
//! Scenarios add an item here every time they add one on the page, then
//! compare the page's displayed total against [`Cart::calculate_total_price`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::price::format_price;
use crate::result::{ShopError, ShopResult};

/// A product read from a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product title
    pub name: String,
    /// Price in whole currency units
    pub price: u64,
    /// Deliverable to the checked pincode
    pub availability: bool,
}

impl Product {
    /// Create a product
    #[must_use]
    pub fn new(name: impl Into<String>, price: u64, availability: bool) -> Self {
        Self {
            name: name.into(),
            price,
            availability,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Product(name={}, price={}, availability={})",
            self.name,
            format_price(self.price),
            self.availability
        )
    }
}

/// A product with a multiplicity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    product: Product,
    quantity: u32,
}

impl CartItem {
    /// Create a cart item; quantity must be at least 1.
    pub fn new(product: Product, quantity: u32) -> ShopResult<Self> {
        if quantity == 0 {
            return Err(ShopError::assertion(format!(
                "cart item '{}' needs a quantity of at least 1",
                product.name
            )));
        }
        Ok(Self { product, quantity })
    }

    /// A single unit of a product
    #[must_use]
    pub const fn single(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Get the product
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Product name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.product.name
    }

    /// Quantity (always >= 1)
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// price × quantity
    pub fn subtotal(&self) -> ShopResult<u64> {
        self.product
            .price
            .checked_mul(u64::from(self.quantity))
            .ok_or_else(|| ShopError::PriceOverflow {
                item: self.product.name.clone(),
            })
    }
}

impl From<Product> for CartItem {
    fn from(product: Product) -> Self {
        Self::single(product)
    }
}

impl fmt::Display for CartItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.product, self.quantity)
    }
}

/// Ordered list of items added so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. No dedup and no price re-validation.
    pub fn add_item(&mut self, item: impl Into<CartItem>) {
        self.items.push(item.into());
    }

    /// Remove every item whose name equals `name`; returns how many were removed.
    ///
    /// Same-named entries are all dropped, not just the first.
    pub fn remove_item(&mut self, name: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.name() != name);
        before - self.items.len()
    }

    /// Σ price × quantity over all items. Overflow is `PriceOverflow`.
    pub fn calculate_total_price(&self) -> ShopResult<u64> {
        self.items.iter().try_fold(0u64, |total, item| {
            total
                .checked_add(item.subtotal()?)
                .ok_or_else(|| ShopError::PriceOverflow {
                    item: item.name().to_string(),
                })
        })
    }

    /// Compare a displayed total against the computed total.
    pub fn verify_total_price(&self, displayed_total: u64) -> ShopResult<()> {
        let expected = self.calculate_total_price()?;
        if displayed_total == expected {
            Ok(())
        } else {
            Err(ShopError::PriceMismatch {
                expected,
                displayed: displayed_total,
            })
        }
    }

    /// Items in insertion order
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Item names in insertion order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(CartItem::name).collect()
    }

    /// Number of entries (not units)
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.items.iter().map(ToString::to_string).collect();
        write!(f, "Cart(items=[{}])", items.join(", "))
    }
}
