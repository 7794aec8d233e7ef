//! Price parsing for rupee-formatted display strings (`₹12,345`).
//!
//! Prices are integers in whole currency units; the storefront never shows
//! fractional amounts.

use crate::result::{ShopError, ShopResult};

/// Currency symbol stripped from displayed prices
pub const CURRENCY_SYMBOL: char = '₹';

/// Thousands separator stripped from displayed prices
pub const THOUSANDS_SEPARATOR: char = ',';

/// Parse a displayed price into an integer amount.
///
/// Removes the currency symbol and every thousands separator, trims
/// whitespace, then parses the remainder as a base-10 integer.
pub fn parse_price(text: &str) -> ShopResult<u64> {
    let digits: String = text
        .chars()
        .filter(|c| *c != CURRENCY_SYMBOL && *c != THOUSANDS_SEPARATOR)
        .collect();
    let digits = digits.trim();

    // u64::from_str accepts a leading '+'
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ShopError::PriceParse {
            input: text.to_string(),
        });
    }

    digits.parse::<u64>().map_err(|_| ShopError::PriceParse {
        input: text.to_string(),
    })
}

/// Format an amount the way the storefront displays it (`₹12,345`).
#[must_use]
pub fn format_price(amount: u64) -> String {
    let raw = amount.to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3 + 1);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(ch);
    }
    format!("{CURRENCY_SYMBOL}{grouped}")
}
