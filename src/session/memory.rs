//! Scripted in-process page.
//!
//! [`MemorySession`] implements [`RemoteSession`] without a browser. A page
//! is a list of [`NodeSpec`]s keyed by their [`Locator`]; each node can be
//! scheduled to appear, become visible, or become enabled some time after
//! the page loads. Click handlers mutate the page the way page scripts
//! would, which makes asynchronous UI behavior reproducible under a paused
//! tokio clock.
//!
//! Lookups match locators by equality only; there is no CSS or XPath engine.
//!
//! # Example
//!
//! ```ignore
//! let session = MemorySession::new();
//! session.add(NodeSpec::new(Locator::id("submit")));
//! session.add(NodeSpec::new(Locator::id("done")).hidden().text("Saved"));
//! session.on_click(Locator::id("submit"), |page| {
//!     page.show_after(&Locator::id("done"), Duration::from_millis(300));
//! });
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::browser::Locator;
use crate::error::{Error, Result};
use crate::identifiers::ElementId;

use super::RemoteSession;

// ============================================================================
// Types
// ============================================================================

/// Page mutation run when an element is clicked.
pub type ClickHandler = Arc<dyn Fn(&mut PageState) + Send + Sync>;

/// Factory for injected session failures.
type FailureFactory = Arc<dyn Fn() -> Error + Send + Sync>;

// ============================================================================
// NodeSpec
// ============================================================================

/// Template of an element, instantiated on every page load.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    locator: Locator,
    text: String,
    value: String,
    attributes: FxHashMap<String, String>,
    displayed: bool,
    enabled: bool,
    appears_after: Option<Duration>,
    visible_after: Option<Duration>,
    enabled_after: Option<Duration>,
}

impl NodeSpec {
    /// Creates a visible, enabled, immediately present node.
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            text: String::new(),
            value: String::new(),
            attributes: FxHashMap::default(),
            displayed: true,
            enabled: true,
            appears_after: None,
            visible_after: None,
            enabled_after: None,
        }
    }

    /// Sets the rendered text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the initial input value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Starts hidden (present but not displayed).
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Starts disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Attaches the node to the document only after `delay`.
    #[must_use]
    pub fn appears_after(mut self, delay: Duration) -> Self {
        self.appears_after = Some(delay);
        self
    }

    /// Starts hidden and becomes displayed after `delay`.
    #[must_use]
    pub fn visible_after(mut self, delay: Duration) -> Self {
        self.displayed = false;
        self.visible_after = Some(delay);
        self
    }

    /// Starts disabled and becomes enabled after `delay`.
    #[must_use]
    pub fn enabled_after(mut self, delay: Duration) -> Self {
        self.enabled = false;
        self.enabled_after = Some(delay);
        self
    }

    fn instantiate(&self, id: ElementId, loaded_at: Instant) -> PageNode {
        PageNode {
            id,
            locator: self.locator.clone(),
            text: self.text.clone(),
            value: self.value.clone(),
            attributes: self.attributes.clone(),
            displayed: self.displayed,
            enabled: self.enabled,
            appears_at: self.appears_after.map(|d| loaded_at + d),
            visible_at: self.visible_after.map(|d| loaded_at + d),
            enabled_at: self.enabled_after.map(|d| loaded_at + d),
        }
    }
}

// ============================================================================
// PageNode
// ============================================================================

/// Live element of a loaded page.
#[derive(Debug, Clone)]
pub struct PageNode {
    /// Reference handed out by `find`.
    pub id: ElementId,
    /// Locator the node answers to.
    pub locator: Locator,
    /// Rendered text.
    pub text: String,
    /// Input value.
    pub value: String,
    /// Attributes.
    pub attributes: FxHashMap<String, String>,
    /// Displayed flag (ignoring the schedule).
    pub displayed: bool,
    /// Enabled flag (ignoring the schedule).
    pub enabled: bool,
    /// Node is detached until this instant.
    pub appears_at: Option<Instant>,
    /// Node becomes displayed at this instant.
    pub visible_at: Option<Instant>,
    /// Node becomes enabled at this instant.
    pub enabled_at: Option<Instant>,
}

impl PageNode {
    fn is_attached(&self, now: Instant) -> bool {
        self.appears_at.is_none_or(|at| now >= at)
    }

    fn is_displayed(&self, now: Instant) -> bool {
        self.displayed || self.visible_at.is_some_and(|at| now >= at)
    }

    fn is_enabled(&self, now: Instant) -> bool {
        self.enabled || self.enabled_at.is_some_and(|at| now >= at)
    }
}

// ============================================================================
// PageState
// ============================================================================

/// Mutable state of the loaded page, handed to click handlers.
#[derive(Debug, Default)]
pub struct PageState {
    url: String,
    title: String,
    nodes: Vec<PageNode>,
}

impl PageState {
    /// Returns the node answering to `locator`, if attached or scheduled.
    pub fn node_mut(&mut self, locator: &Locator) -> Option<&mut PageNode> {
        self.nodes.iter_mut().find(|n| &n.locator == locator)
    }

    /// Returns the current value of an input.
    #[must_use]
    pub fn value_of(&self, locator: &Locator) -> String {
        self.nodes
            .iter()
            .find(|n| &n.locator == locator)
            .map(|n| n.value.clone())
            .unwrap_or_default()
    }

    /// Displays a node immediately.
    pub fn show(&mut self, locator: &Locator) {
        if let Some(node) = self.node_mut(locator) {
            node.displayed = true;
        }
    }

    /// Displays a node once `delay` has elapsed from now.
    pub fn show_after(&mut self, locator: &Locator, delay: Duration) {
        if let Some(node) = self.node_mut(locator) {
            node.visible_at = Some(Instant::now() + delay);
        }
    }

    /// Hides a node and cancels any pending reveal.
    pub fn hide(&mut self, locator: &Locator) {
        if let Some(node) = self.node_mut(locator) {
            node.displayed = false;
            node.visible_at = None;
        }
    }

    /// Replaces the rendered text of a node.
    pub fn set_text(&mut self, locator: &Locator, text: impl Into<String>) {
        if let Some(node) = self.node_mut(locator) {
            node.text = text.into();
        }
    }

    /// Detaches a node; existing references become stale.
    pub fn remove(&mut self, locator: &Locator) {
        self.nodes.retain(|n| &n.locator != locator);
    }

    /// Sets the document title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    fn attached(&self, id: &ElementId, now: Instant) -> Result<&PageNode> {
        self.nodes
            .iter()
            .find(|n| &n.id == id && n.is_attached(now))
            .ok_or_else(|| Error::stale_element(id.clone()))
    }

    fn attached_mut(&mut self, id: &ElementId, now: Instant) -> Result<&mut PageNode> {
        self.nodes
            .iter_mut()
            .find(|n| &n.id == id && n.is_attached(now))
            .ok_or_else(|| Error::stale_element(id.clone()))
    }
}

// ============================================================================
// MemorySession
// ============================================================================

/// In-process [`RemoteSession`] backed by a scripted page.
pub struct MemorySession {
    /// Loaded page.
    state: Mutex<PageState>,
    /// Node templates re-instantiated on every load.
    document: Mutex<Vec<NodeSpec>>,
    /// Click handlers by locator.
    handlers: Mutex<FxHashMap<Locator, ClickHandler>>,
    /// Injected failure returned by every call.
    failure: Mutex<Option<FailureFactory>>,
    /// Number of lookups performed.
    probes: AtomicUsize,
    /// Element ID counter.
    next_id: AtomicU64,
    /// Set once `close` is called.
    closed: Mutex<bool>,
}

impl Default for MemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySession {
    /// Creates an empty page at `about:blank`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PageState {
                url: "about:blank".to_string(),
                ..PageState::default()
            }),
            document: Mutex::new(Vec::new()),
            handlers: Mutex::new(FxHashMap::default()),
            failure: Mutex::new(None),
            probes: AtomicUsize::new(0),
            next_id: AtomicU64::new(1),
            closed: Mutex::new(false),
        }
    }

    /// Sets the title reported for every load.
    pub fn set_title(&self, title: impl Into<String>) {
        self.state.lock().title = title.into();
    }

    /// Adds a node to the document and to the loaded page.
    ///
    /// Schedules are measured from now.
    pub fn add(&self, spec: NodeSpec) {
        let node = spec.instantiate(self.generate_id(), Instant::now());
        self.document.lock().push(spec);
        self.state.lock().nodes.push(node);
    }

    /// Registers a click handler for `locator`.
    pub fn on_click<F>(&self, locator: Locator, handler: F)
    where
        F: Fn(&mut PageState) + Send + Sync + 'static,
    {
        self.handlers.lock().insert(locator, Arc::new(handler));
    }

    /// Mutates the live node answering to `locator`.
    pub fn update<F>(&self, locator: &Locator, f: F)
    where
        F: FnOnce(&mut PageNode),
    {
        if let Some(node) = self.state.lock().node_mut(locator) {
            f(node);
        }
    }

    /// Makes every subsequent call fail with the produced error.
    pub fn fail_with<F>(&self, factory: F)
    where
        F: Fn() -> Error + Send + Sync + 'static,
    {
        *self.failure.lock() = Some(Arc::new(factory));
    }

    /// Removes an injected failure.
    pub fn clear_failure(&self) {
        *self.failure.lock() = None;
    }

    /// Returns the number of `find`/`find_all` calls so far.
    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// Returns the current value of an input on the loaded page.
    #[must_use]
    pub fn value_of(&self, locator: &Locator) -> String {
        self.state.lock().value_of(locator)
    }

    /// Returns `true` once `close` was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.lock()
    }

    fn generate_id(&self) -> ElementId {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        ElementId::new(format!("mem-{n}"))
    }

    fn check_available(&self) -> Result<()> {
        if *self.closed.lock() {
            return Err(Error::SessionClosed);
        }
        if let Some(factory) = self.failure.lock().as_ref() {
            return Err(factory());
        }
        Ok(())
    }

    fn load(&self, url: Option<&str>) {
        let now = Instant::now();
        let nodes: Vec<PageNode> = self
            .document
            .lock()
            .iter()
            .map(|spec| spec.instantiate(self.generate_id(), now))
            .collect();

        let mut state = self.state.lock();
        if let Some(url) = url {
            state.url = url.to_string();
        }
        state.nodes = nodes;
    }
}

// ============================================================================
// RemoteSession Implementation
// ============================================================================

#[async_trait]
impl RemoteSession for MemorySession {
    async fn find(&self, locator: &Locator) -> Result<ElementId> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let now = Instant::now();
        let state = self.state.lock();
        let found = state
            .nodes
            .iter()
            .find(|n| &n.locator == locator && n.is_attached(now))
            .map(|n| n.id.clone());

        trace!(%locator, found = found.is_some(), "Memory find");
        found.ok_or_else(|| Error::element_not_found(locator.to_string()))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementId>> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let now = Instant::now();
        Ok(self
            .state
            .lock()
            .nodes
            .iter()
            .filter(|n| &n.locator == locator && n.is_attached(now))
            .map(|n| n.id.clone())
            .collect())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        self.check_available()?;
        debug!(url, "Memory navigate");
        self.load(Some(url));
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        self.check_available()?;
        self.load(None);
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        self.check_available()?;
        Ok(self.state.lock().title.clone())
    }

    async fn current_url(&self) -> Result<String> {
        self.check_available()?;
        Ok(self.state.lock().url.clone())
    }

    async fn element_text(&self, element: &ElementId) -> Result<String> {
        self.check_available()?;
        let now = Instant::now();
        let state = self.state.lock();
        let node = state.attached(element, now)?;
        // Hidden elements render no text, as in a real browser.
        if node.is_displayed(now) {
            Ok(node.text.clone())
        } else {
            Ok(String::new())
        }
    }

    async fn element_attribute(&self, element: &ElementId, name: &str) -> Result<Option<String>> {
        self.check_available()?;
        let state = self.state.lock();
        let node = state.attached(element, Instant::now())?;
        if name == "value" {
            return Ok(Some(node.value.clone()));
        }
        Ok(node.attributes.get(name).cloned())
    }

    async fn element_displayed(&self, element: &ElementId) -> Result<bool> {
        self.check_available()?;
        let now = Instant::now();
        Ok(self.state.lock().attached(element, now)?.is_displayed(now))
    }

    async fn element_enabled(&self, element: &ElementId) -> Result<bool> {
        self.check_available()?;
        let now = Instant::now();
        Ok(self.state.lock().attached(element, now)?.is_enabled(now))
    }

    async fn element_click(&self, element: &ElementId) -> Result<()> {
        self.check_available()?;
        let now = Instant::now();

        let locator = {
            let state = self.state.lock();
            let node = state.attached(element, now)?;
            if !node.is_displayed(now) || !node.is_enabled(now) {
                return Err(Error::interaction(
                    element.clone(),
                    "element not interactable",
                ));
            }
            node.locator.clone()
        };

        let handler = self.handlers.lock().get(&locator).cloned();
        if let Some(handler) = handler {
            debug!(%locator, "Running click handler");
            handler(&mut *self.state.lock());
        }
        Ok(())
    }

    async fn element_clear(&self, element: &ElementId) -> Result<()> {
        self.check_available()?;
        let mut state = self.state.lock();
        state.attached_mut(element, Instant::now())?.value.clear();
        Ok(())
    }

    async fn element_send_keys(&self, element: &ElementId, text: &str) -> Result<()> {
        self.check_available()?;
        let now = Instant::now();
        let mut state = self.state.lock();
        let node = state.attached_mut(element, now)?;
        if !node.is_enabled(now) {
            return Err(Error::interaction(element.clone(), "element not interactable"));
        }
        node.value.push_str(text);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        *self.closed.lock() = true;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_find_counts_probes() {
        let session = MemorySession::new();
        session.add(NodeSpec::new(Locator::id("a")));

        assert!(session.find(&Locator::id("a")).await.is_ok());
        assert!(session.find(&Locator::id("b")).await.is_err());
        assert_eq!(session.probe_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_node_appears_on_schedule() {
        let session = MemorySession::new();
        session.add(NodeSpec::new(Locator::id("late")).appears_after(Duration::from_millis(500)));

        let err = session.find(&Locator::id("late")).await.unwrap_err();
        assert!(err.is_not_found());

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(session.find(&Locator::id("late")).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_makes_references_stale() {
        let session = MemorySession::new();
        session.add(NodeSpec::new(Locator::id("a")).text("hi"));

        let id = session.find(&Locator::id("a")).await.expect("find");
        session.refresh().await.expect("refresh");

        let err = session.element_text(&id).await.unwrap_err();
        assert!(matches!(err, Error::StaleElement { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_resets_values() {
        let session = MemorySession::new();
        session.add(NodeSpec::new(Locator::id("name")));

        let id = session.find(&Locator::id("name")).await.expect("find");
        session.element_send_keys(&id, "Ivan").await.expect("type");
        assert_eq!(session.value_of(&Locator::id("name")), "Ivan");

        session.refresh().await.expect("refresh");
        assert_eq!(session.value_of(&Locator::id("name")), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_rejected_when_disabled() {
        let session = MemorySession::new();
        session.add(NodeSpec::new(Locator::id("btn")).disabled());

        let id = session.find(&Locator::id("btn")).await.expect("find");
        let err = session.element_click(&id).await.unwrap_err();
        assert!(matches!(err, Error::Interaction { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_handler_mutates_page() {
        let session = MemorySession::new();
        session.add(NodeSpec::new(Locator::id("btn")));
        session.add(NodeSpec::new(Locator::id("msg")).hidden().text("ok"));
        session.on_click(Locator::id("btn"), |page| page.show(&Locator::id("msg")));

        let btn = session.find(&Locator::id("btn")).await.expect("find");
        let msg = session.find(&Locator::id("msg")).await.expect("find");
        assert_eq!(session.element_text(&msg).await.expect("text"), "");

        session.element_click(&btn).await.expect("click");
        assert!(session.element_displayed(&msg).await.expect("displayed"));
        assert_eq!(session.element_text(&msg).await.expect("text"), "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_session_rejects_calls() {
        let session = MemorySession::new();
        session.close().await.expect("close");

        assert!(session.is_closed());
        assert!(matches!(
            session.title().await,
            Err(Error::SessionClosed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_injected_failure() {
        let session = MemorySession::new();
        session.fail_with(|| Error::connection("reset by peer"));
        assert!(session.find(&Locator::id("a")).await.unwrap_err().is_probe_error());

        session.clear_failure();
        assert!(session.find(&Locator::id("a")).await.unwrap_err().is_not_found());
    }
}
