//! Resolved element handles.
//!
//! An [`Element`] is returned by a successful lookup. It keeps the remote
//! reference, the [`Locator`] that produced it, and a weak link to the
//! session: the session outlives and is shared by every element, and an
//! element never keeps it alive.
//!
//! # Example
//!
//! ```ignore
//! let field = page.find_element(&Locator::id("email")).await?;
//! field.type_text("ivan@example.com").await?;
//!
//! let submit = page.find_element(&Locator::css("button[type='submit']")).await?;
//! submit.click().await?; // waits until clickable
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::session::RemoteSession;
use crate::wait::{Condition, Outcome, Poller};

use super::keyboard::Key;
use super::locator::Locator;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for an element.
pub(crate) struct ElementInner {
    /// Remote reference.
    pub id: ElementId,

    /// Locator that resolved this element.
    pub locator: Locator,

    /// Session the reference belongs to.
    pub session: Weak<dyn RemoteSession>,

    /// Poller used by `click`.
    pub poller: Poller,
}

// ============================================================================
// Element
// ============================================================================

/// A handle to a resolved element.
///
/// Only [`click`](Self::click) waits. Reads and typing assume the caller
/// already waited for presence or visibility.
#[derive(Clone)]
pub struct Element {
    /// Shared inner state.
    pub(crate) inner: Arc<ElementInner>,
}

// ============================================================================
// Element - Display
// ============================================================================

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.inner.id)
            .field("locator", &self.inner.locator)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Element - Constructor
// ============================================================================

impl Element {
    /// Creates a new element handle.
    pub(crate) fn new(
        id: ElementId,
        locator: Locator,
        session: &Arc<dyn RemoteSession>,
        poller: Poller,
    ) -> Self {
        Self {
            inner: Arc::new(ElementInner {
                id,
                locator,
                session: Arc::downgrade(session),
                poller,
            }),
        }
    }
}

// ============================================================================
// Element - Accessors
// ============================================================================

impl Element {
    /// Returns the remote reference.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.inner.id
    }

    /// Returns the locator that resolved this element.
    #[inline]
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.inner.locator
    }
}

// ============================================================================
// Element - Actions
// ============================================================================

impl Element {
    /// Clicks the element once it is clickable.
    ///
    /// Waits until this reference is displayed and enabled, then clicks it.
    ///
    /// # Errors
    ///
    /// - [`Error::WaitTimeout`] if it never became clickable
    /// - [`Error::StaleElement`] if the reference detached
    /// - [`Error::Interaction`] if the click was rejected
    pub async fn click(&self) -> Result<()> {
        let session = self.session()?;
        let condition = ReferenceClickable {
            id: &self.inner.id,
            locator: &self.inner.locator,
        };
        self.inner.poller.wait(session.as_ref(), &condition).await?;

        debug!(element_id = %self.inner.id, locator = %self.inner.locator, "Clicking element");
        session.element_click(&self.inner.id).await
    }

    /// Clears the element's value.
    pub async fn clear(&self) -> Result<()> {
        debug!(element_id = %self.inner.id, "Clearing element");
        self.session()?.element_clear(&self.inner.id).await
    }

    /// Replaces the element's content with `text`.
    ///
    /// Clears first, then sends keystrokes. No wait is performed.
    pub async fn type_text(&self, text: &str) -> Result<()> {
        debug!(element_id = %self.inner.id, text_len = text.len(), "Typing text");
        let session = self.session()?;
        session.element_clear(&self.inner.id).await?;
        session.element_send_keys(&self.inner.id, text).await
    }

    /// Presses a navigation/control key without clearing.
    pub async fn press(&self, key: Key) -> Result<()> {
        debug!(element_id = %self.inner.id, ?key, "Pressing key");
        self.session()?
            .element_send_keys(&self.inner.id, &key.as_keys())
            .await
    }
}

// ============================================================================
// Element - Properties
// ============================================================================

impl Element {
    /// Gets the element's rendered text.
    ///
    /// Reads current state; repeated calls return the same text until the
    /// page changes.
    pub async fn text(&self) -> Result<String> {
        self.session()?.element_text(&self.inner.id).await
    }

    /// Gets the element's value (for input elements).
    pub async fn value(&self) -> Result<String> {
        Ok(self.attribute("value").await?.unwrap_or_default())
    }

    /// Gets an attribute value.
    ///
    /// Returns `None` if the attribute doesn't exist.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.session()?
            .element_attribute(&self.inner.id, name)
            .await
    }

    /// Checks if the element is displayed.
    pub async fn is_displayed(&self) -> Result<bool> {
        self.session()?.element_displayed(&self.inner.id).await
    }

    /// Checks if the element is enabled.
    pub async fn is_enabled(&self) -> Result<bool> {
        self.session()?.element_enabled(&self.inner.id).await
    }
}

// ============================================================================
// Element - Internal
// ============================================================================

impl Element {
    /// Upgrades the session link or fails with [`Error::SessionClosed`].
    fn session(&self) -> Result<Arc<dyn RemoteSession>> {
        self.inner.session.upgrade().ok_or(Error::SessionClosed)
    }
}

/// Clickability of one specific reference.
///
/// A detached reference will never become clickable, so staleness is fatal
/// here instead of "not yet".
struct ReferenceClickable<'a> {
    id: &'a ElementId,
    locator: &'a Locator,
}

#[async_trait]
impl<'a> Condition for ReferenceClickable<'a> {
    type Output = ();

    async fn check(&self, session: &dyn RemoteSession) -> Outcome<()> {
        let displayed = match session.element_displayed(self.id).await {
            Ok(displayed) => displayed,
            Err(e) => return Outcome::Fatal(e),
        };
        if !displayed {
            return Outcome::NotYet;
        }
        match session.element_enabled(self.id).await {
            Ok(true) => Outcome::Ready(()),
            Ok(false) => Outcome::NotYet,
            Err(e) => Outcome::Fatal(e),
        }
    }

    fn describe(&self) -> String {
        format!("{} to be clickable", self.locator)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::session::{MemorySession, NodeSpec};
    use crate::wait::WaitConfig;

    fn poller() -> Poller {
        Poller::new(WaitConfig::new(Duration::from_secs(2), Duration::from_millis(50)))
    }

    async fn resolve(session: &Arc<dyn RemoteSession>, locator: Locator) -> Element {
        let id = session.find(&locator).await.expect("find");
        Element::new(id, locator, session, poller())
    }

    #[test]
    fn test_element_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<Element>();
    }

    #[test]
    fn test_element_is_debug() {
        fn assert_debug<T: std::fmt::Debug>() {}
        assert_debug::<Element>();
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_waits_until_clickable() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("btn")).enabled_after(Duration::from_millis(400)));
        memory.add(NodeSpec::new(Locator::id("msg")).hidden());
        memory.on_click(Locator::id("btn"), |page| page.show(&Locator::id("msg")));
        let session: Arc<dyn RemoteSession> = memory.clone();

        let button = resolve(&session, Locator::id("btn")).await;
        let start = Instant::now();
        button.click().await.expect("click");

        assert!(start.elapsed() >= Duration::from_millis(400));
        assert!(start.elapsed() <= Duration::from_millis(450));
        let msg = memory.find(&Locator::id("msg")).await.expect("find");
        assert!(memory.element_displayed(&msg).await.expect("displayed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_times_out_when_never_clickable() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("btn")).disabled());
        let session: Arc<dyn RemoteSession> = memory.clone();

        let button = resolve(&session, Locator::id("btn")).await;
        let start = Instant::now();
        let err = button.click().await.unwrap_err();

        assert!(err.is_timeout());
        assert!(err.to_string().contains("id=btn to be clickable"));
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(start.elapsed() <= Duration::from_millis(2050));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_on_stale_reference_fails_fast() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("btn")));
        let session: Arc<dyn RemoteSession> = memory.clone();

        let button = resolve(&session, Locator::id("btn")).await;
        memory.refresh().await.expect("refresh");

        let start = Instant::now();
        let err = button.click().await.unwrap_err();
        assert!(matches!(err, Error::StaleElement { .. }));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_is_idempotent() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("msg")).text("hello"));
        let session: Arc<dyn RemoteSession> = memory.clone();

        let msg = resolve(&session, Locator::id("msg")).await;
        let first = msg.text().await.expect("text");
        let second = msg.text().await.expect("text");
        assert_eq!(first, "hello");
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_type_text_replaces_content() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("name")).value("old"));
        let session: Arc<dyn RemoteSession> = memory.clone();

        let field = resolve(&session, Locator::id("name")).await;
        field.type_text("Ivan").await.expect("type");
        assert_eq!(field.value().await.expect("value"), "Ivan");

        field.press(Key::Enter).await.expect("press");
        assert_eq!(memory.value_of(&Locator::id("name")), "Ivan\u{E007}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_session_reports_closed() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("msg")));
        let session: Arc<dyn RemoteSession> = memory.clone();

        let msg = resolve(&session, Locator::id("msg")).await;
        drop(session);
        drop(memory);

        assert!(matches!(msg.text().await, Err(Error::SessionClosed)));
    }
}
