//! WebDriver commands.
//!
//! Each [`Command`] maps to one W3C WebDriver endpoint.
//!
//! | Command | Method | Path (under `/session/{id}`) |
//! |---------|--------|------------------------------|
//! | `NewSession` | POST | `/session` (no id) |
//! | `DeleteSession` | DELETE | `` |
//! | `Navigate` | POST | `/url` |
//! | `Refresh` | POST | `/refresh` |
//! | `GetTitle` | GET | `/title` |
//! | `GetUrl` | GET | `/url` |
//! | `FindElement` | POST | `/element` |
//! | `FindElements` | POST | `/elements` |
//! | `GetElementText` | GET | `/element/{eid}/text` |
//! | `GetElementAttribute` | GET | `/element/{eid}/attribute/{name}` |
//! | `GetElementProperty` | GET | `/element/{eid}/property/{name}` |
//! | `IsElementDisplayed` | GET | `/element/{eid}/displayed` |
//! | `IsElementEnabled` | GET | `/element/{eid}/enabled` |
//! | `ElementClick` | POST | `/element/{eid}/click` |
//! | `ElementClear` | POST | `/element/{eid}/clear` |
//! | `ElementSendKeys` | POST | `/element/{eid}/value` |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use urlencoding::encode;

use crate::browser::Locator;
use crate::error::{Error, Result};
use crate::identifiers::{ElementId, SessionId};

// ============================================================================
// Constants
// ============================================================================

/// JSON key of a web element reference.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

// ============================================================================
// Method
// ============================================================================

/// HTTP method of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl Method {
    /// Returns the method name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ElementRef
// ============================================================================

/// Wire form of an element reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
    /// Remote reference, keyed by [`ELEMENT_KEY`].
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    pub id: ElementId,
}

impl ElementRef {
    /// Decodes a single reference from a response value.
    pub fn decode(value: Value) -> Result<ElementId> {
        let element: Self = serde_json::from_value(value)?;
        Ok(element.id)
    }

    /// Decodes a list of references from a response value.
    pub fn decode_all(value: Value) -> Result<Vec<ElementId>> {
        let elements: Vec<Self> = serde_json::from_value(value)?;
        Ok(elements.into_iter().map(|e| e.id).collect())
    }
}

// ============================================================================
// Command
// ============================================================================

/// A WebDriver command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a session with the given capabilities.
    NewSession {
        /// `{"alwaysMatch": ...}` capabilities object.
        capabilities: Value,
    },

    /// End the session and close the browser.
    DeleteSession,

    /// Navigate to URL.
    Navigate {
        /// Target URL.
        url: String,
    },

    /// Reload current page.
    Refresh,

    /// Get page title.
    GetTitle,

    /// Get current URL.
    GetUrl,

    /// Find the first matching element.
    FindElement(Locator),

    /// Find every matching element.
    FindElements(Locator),

    /// Get rendered text.
    GetElementText(ElementId),

    /// Get an attribute.
    GetElementAttribute {
        /// Element reference.
        element: ElementId,
        /// Attribute name.
        name: String,
    },

    /// Get a DOM property.
    GetElementProperty {
        /// Element reference.
        element: ElementId,
        /// Property name.
        name: String,
    },

    /// Check visibility.
    IsElementDisplayed(ElementId),

    /// Check enabled state.
    IsElementEnabled(ElementId),

    /// Click.
    ElementClick(ElementId),

    /// Clear an editable element.
    ElementClear(ElementId),

    /// Send keystrokes.
    ElementSendKeys {
        /// Element reference.
        element: ElementId,
        /// Text, control keys as private-use code points.
        text: String,
    },
}

// ============================================================================
// Command - Endpoint
// ============================================================================

impl Command {
    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::DeleteSession => Method::Delete,
            Self::GetTitle
            | Self::GetUrl
            | Self::GetElementText(_)
            | Self::GetElementAttribute { .. }
            | Self::GetElementProperty { .. }
            | Self::IsElementDisplayed(_)
            | Self::IsElementEnabled(_) => Method::Get,
            Self::NewSession { .. }
            | Self::Navigate { .. }
            | Self::Refresh
            | Self::FindElement(_)
            | Self::FindElements(_)
            | Self::ElementClick(_)
            | Self::ElementClear(_)
            | Self::ElementSendKeys { .. } => Method::Post,
        }
    }

    /// Builds the request path.
    ///
    /// # Errors
    ///
    /// [`Error::Protocol`] if a session-scoped command has no session.
    pub fn path(&self, session: Option<&SessionId>) -> Result<String> {
        if matches!(self, Self::NewSession { .. }) {
            return Ok("/session".to_string());
        }
        let session = session.ok_or_else(|| {
            Error::protocol(format!("{} requires an open session", self.name()))
        })?;
        let base = format!("/session/{session}");

        Ok(match self {
            Self::NewSession { .. } | Self::DeleteSession => base,
            Self::Navigate { .. } | Self::GetUrl => format!("{base}/url"),
            Self::Refresh => format!("{base}/refresh"),
            Self::GetTitle => format!("{base}/title"),
            Self::FindElement(_) => format!("{base}/element"),
            Self::FindElements(_) => format!("{base}/elements"),
            Self::GetElementText(e) => format!("{base}/element/{e}/text"),
            Self::GetElementAttribute { element, name } => {
                format!("{base}/element/{element}/attribute/{}", encode(name))
            }
            Self::GetElementProperty { element, name } => {
                format!("{base}/element/{element}/property/{}", encode(name))
            }
            Self::IsElementDisplayed(e) => format!("{base}/element/{e}/displayed"),
            Self::IsElementEnabled(e) => format!("{base}/element/{e}/enabled"),
            Self::ElementClick(e) => format!("{base}/element/{e}/click"),
            Self::ElementClear(e) => format!("{base}/element/{e}/clear"),
            Self::ElementSendKeys { element, .. } => format!("{base}/element/{element}/value"),
        })
    }

    /// Builds the JSON body. POST commands always carry an object.
    #[must_use]
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::NewSession { capabilities } => Some(json!({ "capabilities": capabilities })),
            Self::Navigate { url } => Some(json!({ "url": url })),
            Self::FindElement(locator) | Self::FindElements(locator) => {
                let (using, value) = locator.to_w3c();
                Some(json!({ "using": using, "value": value }))
            }
            Self::ElementSendKeys { text, .. } => Some(json!({ "text": text })),
            _ if self.method() == Method::Post => Some(json!({})),
            _ => None,
        }
    }
}

// ============================================================================
// Command - Context
// ============================================================================

impl Command {
    /// Short name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewSession { .. } => "NewSession",
            Self::DeleteSession => "DeleteSession",
            Self::Navigate { .. } => "Navigate",
            Self::Refresh => "Refresh",
            Self::GetTitle => "GetTitle",
            Self::GetUrl => "GetUrl",
            Self::FindElement(_) => "FindElement",
            Self::FindElements(_) => "FindElements",
            Self::GetElementText(_) => "GetElementText",
            Self::GetElementAttribute { .. } => "GetElementAttribute",
            Self::GetElementProperty { .. } => "GetElementProperty",
            Self::IsElementDisplayed(_) => "IsElementDisplayed",
            Self::IsElementEnabled(_) => "IsElementEnabled",
            Self::ElementClick(_) => "ElementClick",
            Self::ElementClear(_) => "ElementClear",
            Self::ElementSendKeys { .. } => "ElementSendKeys",
        }
    }

    /// Locator the command searches for, if any.
    #[must_use]
    pub fn locator(&self) -> Option<&Locator> {
        match self {
            Self::FindElement(locator) | Self::FindElements(locator) => Some(locator),
            _ => None,
        }
    }

    /// Element the command targets, if any.
    #[must_use]
    pub fn element(&self) -> Option<&ElementId> {
        match self {
            Self::GetElementText(e)
            | Self::IsElementDisplayed(e)
            | Self::IsElementEnabled(e)
            | Self::ElementClick(e)
            | Self::ElementClear(e) => Some(e),
            Self::GetElementAttribute { element, .. }
            | Self::GetElementProperty { element, .. }
            | Self::ElementSendKeys { element, .. } => Some(element),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
