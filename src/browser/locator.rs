//! Element locator strategies.
//!
//! A [`Locator`] is an immutable description of how to find an element:
//! a [`Strategy`] plus a selector value.
//!
//! # Example
//!
//! ```ignore
//! use webpoll::Locator;
//!
//! let name = Locator::id("name");
//! let submit = Locator::css("button[type='submit']");
//! let row = Locator::xpath("//tr[td[text()='Ivan']]");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Strategy
// ============================================================================

/// How a selector value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Element `id` attribute.
    Id,
    /// CSS selector.
    Css,
    /// XPath expression.
    XPath,
    /// Element `name` attribute.
    Name,
    /// Single class name.
    ClassName,
    /// Tag name.
    TagName,
    /// Exact link text (for `<a>` elements).
    LinkText,
    /// Partial link text (for `<a>` elements).
    PartialLinkText,
}

impl Strategy {
    /// Returns the short name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::Name => "name",
            Self::ClassName => "class",
            Self::TagName => "tag",
            Self::LinkText => "linkText",
            Self::PartialLinkText => "partialLinkText",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Locator
// ============================================================================

/// Strategy + selector pair identifying how to find an element.
///
/// Locators have value equality and no lifecycle: page objects keep them as
/// constants and hand out clones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Creates a locator from a strategy and value.
    #[inline]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Creates an ID locator.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::new(Strategy::Id, id)
    }

    /// Creates a CSS selector locator.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// Creates an XPath locator.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, expr)
    }

    /// Creates a name attribute locator.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self::new(Strategy::Name, name)
    }

    /// Creates a class name locator.
    #[inline]
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::new(Strategy::ClassName, class)
    }

    /// Creates a tag name locator.
    #[inline]
    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::new(Strategy::TagName, tag)
    }

    /// Creates a link text locator.
    #[inline]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, text)
    }

    /// Creates a partial link text locator.
    #[inline]
    pub fn partial_link_text(text: impl Into<String>) -> Self {
        Self::new(Strategy::PartialLinkText, text)
    }

    /// Returns the strategy.
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the selector value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the `(using, value)` pair understood by a W3C remote end.
    ///
    /// W3C only knows five strategies; `id`, `name` and `class` are rewritten
    /// to CSS.
    #[must_use]
    pub fn to_w3c(&self) -> (&'static str, String) {
        match self.strategy {
            Strategy::Css => ("css selector", self.value.clone()),
            Strategy::XPath => ("xpath", self.value.clone()),
            Strategy::TagName => ("tag name", self.value.clone()),
            Strategy::LinkText => ("link text", self.value.clone()),
            Strategy::PartialLinkText => ("partial link text", self.value.clone()),
            Strategy::Id => ("css selector", attribute_selector("id", &self.value)),
            Strategy::Name => ("css selector", attribute_selector("name", &self.value)),
            Strategy::ClassName => ("css selector", format!(".{}", css_escape(&self.value))),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}

// ============================================================================
// CSS Helpers
// ============================================================================

fn attribute_selector(attribute: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[{attribute}=\"{escaped}\"]")
}

fn css_escape(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    for (i, c) in ident.chars().enumerate() {
        let leading_digit = i == 0 && c.is_ascii_digit();
        if leading_digit {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
