//! Locator abstraction for element selection.
//!
//! A locator is a strategy tag plus a selector string. Selectors are
//! validated when the locator is built, so a page table with an empty entry
//! fails at load time instead of in the middle of a scenario.
//!
//! Locators read and print in the `strategy=selector` form:
//!
//! ```text
//! css=div._1AtVbE
//! xpath=//input[@value="Log In"]
//! name=username
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::result::{ShopError, ShopResult};

/// Placeholder substituted by [`Locator::with_param`]
pub const PARAM_PLACEHOLDER: &str = "{name}";

/// Element lookup strategy (W3C WebDriver parity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// Single CSS class name
    ClassName,
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
    /// Exact link text
    LinkText,
    /// Partial link text
    PartialLinkText,
    /// Tag name
    Tag,
}

impl Strategy {
    /// Prefix used in the `strategy=selector` form
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::ClassName => "class",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::LinkText => "link",
            Self::PartialLinkText => "partial_link",
            Self::Tag => "tag",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        let strategy = match prefix.trim().to_ascii_lowercase().as_str() {
            "id" => Self::Id,
            "name" => Self::Name,
            "class" | "class_name" => Self::ClassName,
            "css" => Self::Css,
            "xpath" => Self::XPath,
            "link" | "link_text" => Self::LinkText,
            "partial_link" | "partial_link_text" => Self::PartialLinkText,
            "tag" => Self::Tag,
            _ => return None,
        };
        Some(strategy)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A validated (strategy, selector) pair identifying a UI element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator {
    strategy: Strategy,
    selector: String,
}

impl Locator {
    /// Create a locator, rejecting blank selectors.
    pub fn new(strategy: Strategy, selector: impl Into<String>) -> ShopResult<Self> {
        let selector = selector.into();
        if selector.trim().is_empty() {
            return Err(ShopError::InvalidLocator {
                input: format!("{strategy}="),
                message: "selector is empty".to_string(),
            });
        }
        if matches!(strategy, Strategy::ClassName) && selector.trim().contains(char::is_whitespace)
        {
            return Err(ShopError::InvalidLocator {
                input: format!("{strategy}={selector}"),
                message: "class strategy takes a single class name; use css for compound classes"
                    .to_string(),
            });
        }
        Ok(Self { strategy, selector })
    }

    /// CSS selector locator
    pub fn css(selector: impl Into<String>) -> ShopResult<Self> {
        Self::new(Strategy::Css, selector)
    }

    /// XPath locator
    pub fn xpath(selector: impl Into<String>) -> ShopResult<Self> {
        Self::new(Strategy::XPath, selector)
    }

    /// `name` attribute locator
    pub fn name(selector: impl Into<String>) -> ShopResult<Self> {
        Self::new(Strategy::Name, selector)
    }

    /// Parse the `strategy=selector` form.
    ///
    /// A string starting with `/` or `(` without a prefix is taken as XPath,
    /// matching the shorthand used by the banking suite's keyword library.
    pub fn parse(input: &str) -> ShopResult<Self> {
        let trimmed = input.trim();
        if trimmed.starts_with('/') || trimmed.starts_with("(/") {
            return Self::new(Strategy::XPath, trimmed);
        }
        let (prefix, selector) = trimmed.split_once('=').ok_or_else(|| ShopError::InvalidLocator {
            input: input.to_string(),
            message: "expected 'strategy=selector'".to_string(),
        })?;
        let strategy = Strategy::from_prefix(prefix).ok_or_else(|| ShopError::InvalidLocator {
            input: input.to_string(),
            message: format!("unknown strategy '{prefix}'"),
        })?;
        Self::new(strategy, selector.trim())
    }

    /// Get the strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the selector
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Whether the selector carries a `{name}` placeholder
    #[must_use]
    pub fn is_template(&self) -> bool {
        self.selector.contains(PARAM_PLACEHOLDER)
    }

    /// Substitute `{name}` in the selector, e.g. an item-specific remove button.
    pub fn with_param(&self, value: &str) -> ShopResult<Self> {
        if !self.is_template() {
            return Err(ShopError::InvalidLocator {
                input: self.to_string(),
                message: format!("no {PARAM_PLACEHOLDER} placeholder to substitute"),
            });
        }
        let selector = match self.strategy {
            Strategy::XPath => {
                let literal = xpath_literal(value);
                self.selector
                    .replace(&format!("'{PARAM_PLACEHOLDER}'"), &literal)
                    .replace(&format!("\"{PARAM_PLACEHOLDER}\""), &literal)
                    .replace(PARAM_PLACEHOLDER, value)
            }
            _ => self.selector.replace(PARAM_PLACEHOLDER, value),
        };
        Self::new(self.strategy, selector)
    }
}

/// XPath 1.0 string literal for `value`. XPath has no escapes, so a value
/// holding both quote kinds becomes a `concat()` of quoted pieces.
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let pieces: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", pieces.join(", \"'\", "))
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.selector)
    }
}

impl FromStr for Locator {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locator {
    type Error = ShopError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        locator.to_string()
    }
}
