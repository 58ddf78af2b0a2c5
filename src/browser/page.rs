//! Page Object base.
//!
//! [`Page`] turns locators into elements through the wait engine. Concrete
//! page objects wrap a `Page` and expose named actions ("fill name",
//! "submit form") built from its primitives.
//!
//! Every boolean "is visible" check is itself a bounded wait, so assertions
//! tolerate rendering delays. Presence checks probe once.
//!
//! # Example
//!
//! ```ignore
//! let page = Page::new(session.clone());
//! page.open("file:///tmp/contact_form.html").await?;
//! page.send_keys(&Locator::id("name"), "Ivan").await?;
//! page.click(&Locator::css("button[type='submit']")).await?;
//! assert!(page.is_element_visible(&Locator::id("successMessage")).await);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::session::RemoteSession;
use crate::wait::{
    Clickable, Condition, Invisibility, Poller, Presence, TextEquals, Visibility, WaitConfig,
};

use super::element::Element;
use super::locator::Locator;

// ============================================================================
// Lookup
// ============================================================================

/// Three-valued result of a single presence probe.
#[derive(Debug)]
pub enum Lookup {
    /// Element found.
    Present(Element),
    /// Session answered that nothing matches.
    Absent,
    /// Session could not answer.
    Indeterminate(Error),
}

impl Lookup {
    /// Returns `true` for [`Lookup::Present`].
    #[inline]
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

// ============================================================================
// Page
// ============================================================================

/// Shared base of all page objects.
///
/// Holds the session reference and the poller; no other state. A page never
/// closes the session.
#[derive(Clone)]
pub struct Page {
    session: Arc<dyn RemoteSession>,
    poller: Poller,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("wait", &self.poller.config())
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Creates a page with the default wait configuration.
    #[must_use]
    pub fn new(session: Arc<dyn RemoteSession>) -> Self {
        Self::with_config(session, WaitConfig::default())
    }

    /// Creates a page with an explicit wait configuration.
    #[must_use]
    pub fn with_config(session: Arc<dyn RemoteSession>, config: WaitConfig) -> Self {
        Self {
            session,
            poller: Poller::new(config),
        }
    }

    /// Returns the session.
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Arc<dyn RemoteSession> {
        &self.session
    }

    /// Returns the wait configuration.
    #[inline]
    #[must_use]
    pub fn wait_config(&self) -> WaitConfig {
        self.poller.config()
    }
}

// ============================================================================
// Page - Navigation
// ============================================================================

impl Page {
    /// Opens `url`.
    pub async fn open(&self, url: &str) -> Result<()> {
        debug!(url, "Opening page");
        self.session.navigate(url).await
    }

    /// Reloads the current document.
    pub async fn refresh(&self) -> Result<()> {
        self.session.refresh().await
    }

    /// Returns the document title.
    pub async fn title(&self) -> Result<String> {
        self.session.title().await
    }

    /// Returns the current URL.
    pub async fn current_url(&self) -> Result<String> {
        self.session.current_url().await
    }
}

// ============================================================================
// Page - Lookup
// ============================================================================

impl Page {
    /// Finds an element with a single probe.
    ///
    /// # Errors
    ///
    /// [`Error::ElementNotFound`] if nothing matches right now.
    pub async fn find_element(&self, locator: &Locator) -> Result<Element> {
        let id = self.session.find(locator).await?;
        Ok(self.element(id, locator))
    }

    /// Finds all matching elements with a single probe.
    pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<Element>> {
        let ids = self.session.find_all(locator).await?;
        Ok(ids.into_iter().map(|id| self.element(id, locator)).collect())
    }

    /// Probes once and reports presence without collapsing errors.
    pub async fn probe_presence(&self, locator: &Locator) -> Lookup {
        let condition = Presence(locator.clone());
        match self
            .poller
            .wait_with(self.session.as_ref(), &condition, WaitConfig::once())
            .await
        {
            Ok(id) => Lookup::Present(self.element(id, locator)),
            Err(e) if e.is_timeout() => Lookup::Absent,
            Err(e) => Lookup::Indeterminate(e),
        }
    }

    /// Returns `true` if the element is present right now.
    ///
    /// Lossy: an unreachable session also yields `false` (logged at `warn`).
    /// Use [`probe_presence`](Self::probe_presence) to tell the cases apart.
    pub async fn is_element_present(&self, locator: &Locator) -> bool {
        match self.probe_presence(locator).await {
            Lookup::Present(_) => true,
            Lookup::Absent => false,
            Lookup::Indeterminate(e) => {
                warn!(%locator, error = %e, "Presence check could not reach session");
                false
            }
        }
    }

    /// Returns `true` if the element becomes visible within the default timeout.
    ///
    /// Lossy in the same way as [`is_element_present`](Self::is_element_present).
    pub async fn is_element_visible(&self, locator: &Locator) -> bool {
        match self.wait_for_visible(locator).await {
            Ok(_) => true,
            Err(e) if e.is_timeout() => false,
            Err(e) => {
                warn!(%locator, error = %e, "Visibility check could not reach session");
                false
            }
        }
    }

    /// Returns `true` if the element stays hidden for the whole `duration`.
    ///
    /// Returns `false` as soon as it is seen visible.
    ///
    /// # Errors
    ///
    /// Fatal session errors propagate.
    pub async fn stays_invisible(&self, locator: &Locator, duration: Duration) -> Result<bool> {
        match self.wait_for_visible_within(locator, duration).await {
            Ok(_) => Ok(false),
            Err(e) if e.is_timeout() => Ok(true),
            Err(e) => Err(e),
        }
    }
}

// ============================================================================
// Page - Waits
// ============================================================================

impl Page {
    /// Waits until the element is attached.
    pub async fn wait_for_element(&self, locator: &Locator) -> Result<Element> {
        self.wait_for_element_within(locator, self.poller.config().timeout)
            .await
    }

    /// Waits until the element is attached, with a custom timeout.
    pub async fn wait_for_element_within(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Element> {
        self.resolve(locator, &Presence(locator.clone()), timeout)
            .await
    }

    /// Waits until the element is displayed.
    pub async fn wait_for_visible(&self, locator: &Locator) -> Result<Element> {
        self.wait_for_visible_within(locator, self.poller.config().timeout)
            .await
    }

    /// Waits until the element is displayed, with a custom timeout.
    pub async fn wait_for_visible_within(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Element> {
        self.resolve(locator, &Visibility(locator.clone()), timeout)
            .await
    }

    /// Waits until the element is displayed and enabled.
    pub async fn wait_for_clickable(&self, locator: &Locator) -> Result<Element> {
        self.wait_for_clickable_within(locator, self.poller.config().timeout)
            .await
    }

    /// Waits until the element is displayed and enabled, with a custom timeout.
    pub async fn wait_for_clickable_within(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Element> {
        self.resolve(locator, &Clickable(locator.clone()), timeout)
            .await
    }

    /// Waits until the element is absent or hidden.
    pub async fn wait_for_invisible(&self, locator: &Locator) -> Result<()> {
        self.wait_for_invisible_within(locator, self.poller.config().timeout)
            .await
    }

    /// Waits until the element is absent or hidden, with a custom timeout.
    pub async fn wait_for_invisible_within(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<()> {
        self.poller
            .wait_with(
                self.session.as_ref(),
                &Invisibility(locator.clone()),
                self.budget(timeout),
            )
            .await
    }

    /// Waits until the element's text equals `expected`.
    pub async fn wait_for_text(&self, locator: &Locator, expected: &str) -> Result<String> {
        self.wait_for_text_within(locator, expected, self.poller.config().timeout)
            .await
    }

    /// Waits until the element's text equals `expected`, with a custom timeout.
    pub async fn wait_for_text_within(
        &self,
        locator: &Locator,
        expected: &str,
        timeout: Duration,
    ) -> Result<String> {
        let condition = TextEquals::new(locator.clone(), expected);
        self.poller
            .wait_with(self.session.as_ref(), &condition, self.budget(timeout))
            .await
    }
}

// ============================================================================
// Page - Interaction
// ============================================================================

impl Page {
    /// Reads the element's text with a single probe.
    pub async fn get_text(&self, locator: &Locator) -> Result<String> {
        self.find_element(locator).await?.text().await
    }

    /// Clicks the element once it is clickable.
    pub async fn click(&self, locator: &Locator) -> Result<()> {
        self.wait_for_clickable(locator).await?.click().await
    }

    /// Replaces the element's content. Single probe, no wait.
    pub async fn send_keys(&self, locator: &Locator, text: &str) -> Result<()> {
        self.find_element(locator).await?.type_text(text).await
    }
}

// ============================================================================
// Page - Internal
// ============================================================================

impl Page {
    /// Default config with `timeout`; the interval shrinks to fit short budgets.
    fn budget(&self, timeout: Duration) -> WaitConfig {
        let config = self.poller.config().with_timeout(timeout);
        if !timeout.is_zero() && config.poll_interval > timeout {
            return config.with_poll_interval(timeout);
        }
        config
    }

    fn element(&self, id: ElementId, locator: &Locator) -> Element {
        Element::new(id, locator.clone(), &self.session, self.poller)
    }

    async fn resolve<C>(
        &self,
        locator: &Locator,
        condition: &C,
        timeout: Duration,
    ) -> Result<Element>
    where
        C: Condition<Output = ElementId>,
    {
        let id = self
            .poller
            .wait_with(self.session.as_ref(), condition, self.budget(timeout))
            .await?;
        Ok(self.element(id, locator))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;
    use crate::session::{MemorySession, NodeSpec};

    fn page_over(memory: &Arc<MemorySession>) -> Page {
        let session: Arc<dyn RemoteSession> = memory.clone();
        Page::with_config(
            session,
            WaitConfig::new(Duration::from_secs(3), Duration::from_millis(100)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_element_present_probes_once() {
        let memory = Arc::new(MemorySession::new());
        let page = page_over(&memory);

        let start = Instant::now();
        assert!(!page.is_element_present(&Locator::id("x")).await);
        assert_eq!(memory.probe_count(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);

        memory.add(NodeSpec::new(Locator::id("x")));
        assert!(page.is_element_present(&Locator::id("x")).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_presence_keeps_cause() {
        let memory = Arc::new(MemorySession::new());
        let page = page_over(&memory);

        assert!(matches!(
            page.probe_presence(&Locator::id("x")).await,
            Lookup::Absent
        ));

        memory.fail_with(|| Error::SessionClosed);
        assert!(matches!(
            page.probe_presence(&Locator::id("x")).await,
            Lookup::Indeterminate(Error::SessionClosed)
        ));
        assert!(!page.is_element_present(&Locator::id("x")).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_element_visible_waits() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("msg")).visible_after(Duration::from_secs(1)));
        let page = page_over(&memory);

        let start = Instant::now();
        assert!(page.is_element_visible(&Locator::id("msg")).await);
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_element_visible_false_after_full_timeout() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("msg")).hidden());
        let page = page_over(&memory);

        let start = Instant::now();
        assert!(!page.is_element_visible(&Locator::id("msg")).await);
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_element_visible_false_on_fatal_without_waiting() {
        let memory = Arc::new(MemorySession::new());
        memory.fail_with(|| Error::connection("refused"));
        let page = page_over(&memory);

        let start = Instant::now();
        assert!(!page.is_element_visible(&Locator::id("msg")).await);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stays_invisible() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("hidden")).hidden());
        memory.add(NodeSpec::new(Locator::id("late")).visible_after(Duration::from_millis(800)));
        let page = page_over(&memory);

        let window = Duration::from_secs(1);
        assert!(page.stays_invisible(&Locator::id("hidden"), window).await.expect("probe"));
        assert!(!page.stays_invisible(&Locator::id("late"), window).await.expect("probe"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_invisible() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("spinner")));
        memory.add(NodeSpec::new(Locator::id("go")));
        memory.on_click(Locator::id("go"), |page| page.remove(&Locator::id("spinner")));
        let page = page_over(&memory);

        let err = page
            .wait_for_invisible_within(&Locator::id("spinner"), Duration::from_millis(300))
            .await
            .unwrap_err();
        assert!(err.is_timeout());

        page.click(&Locator::id("go")).await.expect("click");
        page.wait_for_invisible(&Locator::id("spinner"))
            .await
            .expect("gone");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_text() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("status")).text("pending"));
        memory.add(NodeSpec::new(Locator::id("go")));
        memory.on_click(Locator::id("go"), |page| {
            page.set_text(&Locator::id("status"), "done");
        });
        let page = page_over(&memory);

        page.click(&Locator::id("go")).await.expect("click");
        let text = page
            .wait_for_text(&Locator::id("status"), "done")
            .await
            .expect("text");
        assert_eq!(text, "done");
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_elements_empty_when_missing() {
        let memory = Arc::new(MemorySession::new());
        let page = page_over(&memory);

        let found = page.find_elements(&Locator::tag_name("li")).await.expect("find");
        assert!(found.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_element_does_not_wait() {
        let memory = Arc::new(MemorySession::new());
        memory.add(NodeSpec::new(Locator::id("late")).appears_after(Duration::from_millis(200)));
        let page = page_over(&memory);

        let err = page.find_element(&Locator::id("late")).await.unwrap_err();
        assert!(matches!(err, Error::ElementNotFound { .. }));

        let element = page.wait_for_element(&Locator::id("late")).await.expect("wait");
        assert_eq!(element.locator(), &Locator::id("late"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_and_title() {
        let memory = Arc::new(MemorySession::new());
        memory.set_title("Contact");
        let page = page_over(&memory);

        page.open("file:///contact_form.html").await.expect("open");
        assert_eq!(page.title().await.expect("title"), "Contact");
        assert_eq!(
            page.current_url().await.expect("url"),
            "file:///contact_form.html"
        );
    }
}
