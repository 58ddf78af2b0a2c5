//! Remote browser session capability.
//!
//! [`RemoteSession`] is the only surface the wait engine and page objects
//! talk to. Implementations:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`WebDriverSession`] | W3C WebDriver over HTTP |
//! | [`MemorySession`] | Scripted in-process page for offline tests |
//!
//! No call is assumed to be consistent with the previous one: the page is
//! live, and `find` may report "not found" right after a success.

// ============================================================================
// Submodules
// ============================================================================

/// Scripted in-process page.
pub mod memory;

/// W3C WebDriver session over HTTP.
pub mod webdriver;

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::browser::Locator;
use crate::error::Result;
use crate::identifiers::ElementId;

// ============================================================================
// Re-exports
// ============================================================================

pub use memory::{ClickHandler, MemorySession, NodeSpec, PageNode, PageState};
pub use webdriver::WebDriverSession;

// ============================================================================
// RemoteSession
// ============================================================================

/// Browser control channel consumed by the wait engine.
///
/// Lookups fail with [`Error::ElementNotFound`](crate::Error::ElementNotFound)
/// when nothing matches; element commands fail with
/// [`Error::StaleElement`](crate::Error::StaleElement) once the reference is
/// detached and with [`Error::Interaction`](crate::Error::Interaction) when
/// the element rejects input.
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Finds the first element matching `locator`.
    async fn find(&self, locator: &Locator) -> Result<ElementId>;

    /// Finds all elements matching `locator`. Empty when nothing matches.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementId>>;

    /// Navigates to `url` and waits for the document to load.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Reloads the current document.
    async fn refresh(&self) -> Result<()>;

    /// Returns the document title.
    async fn title(&self) -> Result<String>;

    /// Returns the current URL.
    async fn current_url(&self) -> Result<String>;

    /// Returns the rendered text of an element.
    async fn element_text(&self, element: &ElementId) -> Result<String>;

    /// Returns an attribute or property value, `None` when absent.
    async fn element_attribute(&self, element: &ElementId, name: &str) -> Result<Option<String>>;

    /// Returns whether the element is rendered visibly.
    async fn element_displayed(&self, element: &ElementId) -> Result<bool>;

    /// Returns whether the element accepts input.
    async fn element_enabled(&self, element: &ElementId) -> Result<bool>;

    /// Clicks the element.
    async fn element_click(&self, element: &ElementId) -> Result<()>;

    /// Clears an editable element.
    async fn element_clear(&self, element: &ElementId) -> Result<()>;

    /// Sends keystrokes to the element.
    async fn element_send_keys(&self, element: &ElementId, text: &str) -> Result<()>;

    /// Ends the session. Called once, after all page objects are done.
    async fn close(&self) -> Result<()>;
}
