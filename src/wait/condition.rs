//! Wait conditions.
//!
//! A [`Condition`] is a read-only probe evaluated once per poll tick. It
//! reports one of three [`Outcome`]s and never mutates the page, because a
//! single wait may evaluate it many times.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use async_trait::async_trait;

use crate::browser::Locator;
use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::session::RemoteSession;

// ============================================================================
// Outcome
// ============================================================================

/// Result of evaluating a condition once.
#[derive(Debug)]
pub enum Outcome<T> {
    /// State is not reached yet; poll again.
    NotYet,
    /// State is reached; the wait returns this value.
    Ready(T),
    /// Session broke; the wait aborts with this error.
    Fatal(Error),
}

impl<T> Outcome<T> {
    /// Classifies the result of a session call.
    ///
    /// `Ok` is ready, recoverable absence (not found, stale) is `NotYet`,
    /// every other error is fatal.
    pub fn from_probe(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) if e.is_not_found() => Self::NotYet,
            Err(e) => Self::Fatal(e),
        }
    }

    /// Returns `true` for [`Outcome::Ready`].
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Unwraps a probe result inside a condition body.
///
/// Returns early with `NotYet` or `Fatal` when the call did not succeed.
macro_rules! probe {
    ($call:expr) => {
        match Outcome::from_probe($call) {
            Outcome::Ready(value) => value,
            Outcome::NotYet => return Outcome::NotYet,
            Outcome::Fatal(e) => return Outcome::Fatal(e),
        }
    };
}

// ============================================================================
// Condition Trait
// ============================================================================

/// A predicate over live page state.
#[async_trait]
pub trait Condition: Send + Sync {
    /// Value produced once the condition holds.
    type Output: Send;

    /// Evaluates the condition once.
    async fn check(&self, session: &dyn RemoteSession) -> Outcome<Self::Output>;

    /// Human-readable description used in timeout errors.
    fn describe(&self) -> String;
}

// ============================================================================
// Built-in Conditions
// ============================================================================

/// Element is attached to the document.
#[derive(Debug, Clone)]
pub struct Presence(pub Locator);

#[async_trait]
impl Condition for Presence {
    type Output = ElementId;

    async fn check(&self, session: &dyn RemoteSession) -> Outcome<ElementId> {
        Outcome::from_probe(session.find(&self.0).await)
    }

    fn describe(&self) -> String {
        format!("presence of {}", self.0)
    }
}

/// Element is attached and displayed.
#[derive(Debug, Clone)]
pub struct Visibility(pub Locator);

#[async_trait]
impl Condition for Visibility {
    type Output = ElementId;

    async fn check(&self, session: &dyn RemoteSession) -> Outcome<ElementId> {
        let id = probe!(session.find(&self.0).await);
        if probe!(session.element_displayed(&id).await) {
            Outcome::Ready(id)
        } else {
            Outcome::NotYet
        }
    }

    fn describe(&self) -> String {
        format!("visibility of {}", self.0)
    }
}

/// Element is displayed and enabled.
#[derive(Debug, Clone)]
pub struct Clickable(pub Locator);

#[async_trait]
impl Condition for Clickable {
    type Output = ElementId;

    async fn check(&self, session: &dyn RemoteSession) -> Outcome<ElementId> {
        let id = probe!(session.find(&self.0).await);
        if !probe!(session.element_displayed(&id).await) {
            return Outcome::NotYet;
        }
        if probe!(session.element_enabled(&id).await) {
            Outcome::Ready(id)
        } else {
            Outcome::NotYet
        }
    }

    fn describe(&self) -> String {
        format!("{} to be clickable", self.0)
    }
}

/// Element is absent, detached, or hidden.
#[derive(Debug, Clone)]
pub struct Invisibility(pub Locator);

#[async_trait]
impl Condition for Invisibility {
    type Output = ();

    async fn check(&self, session: &dyn RemoteSession) -> Outcome<()> {
        let id = match session.find(&self.0).await {
            Ok(id) => id,
            Err(e) if e.is_not_found() => return Outcome::Ready(()),
            Err(e) => return Outcome::Fatal(e),
        };
        match session.element_displayed(&id).await {
            Ok(false) => Outcome::Ready(()),
            Ok(true) => Outcome::NotYet,
            Err(e) if e.is_not_found() => Outcome::Ready(()),
            Err(e) => Outcome::Fatal(e),
        }
    }

    fn describe(&self) -> String {
        format!("invisibility of {}", self.0)
    }
}

/// Element text equals the expected string exactly.
#[derive(Debug, Clone)]
pub struct TextEquals {
    /// Element to read.
    pub locator: Locator,
    /// Expected rendered text.
    pub expected: String,
}

impl TextEquals {
    /// Creates the condition.
    pub fn new(locator: Locator, expected: impl Into<String>) -> Self {
        Self {
            locator,
            expected: expected.into(),
        }
    }
}

#[async_trait]
impl Condition for TextEquals {
    type Output = String;

    async fn check(&self, session: &dyn RemoteSession) -> Outcome<String> {
        let id = probe!(session.find(&self.locator).await);
        let text = probe!(session.element_text(&id).await);
        if text == self.expected {
            Outcome::Ready(text)
        } else {
            Outcome::NotYet
        }
    }

    fn describe(&self) -> String {
        format!("text of {} to equal {:?}", self.locator, self.expected)
    }
}

// ============================================================================
// Closure Conditions
// ============================================================================

/// Boxed future returned by closure conditions.
pub type ProbeFuture<'a, T> = Pin<Box<dyn Future<Output = Outcome<T>> + Send + 'a>>;

/// Condition built from a closure. See [`condition_fn`].
pub struct FnCondition<F, T> {
    description: String,
    probe: F,
    _output: PhantomData<fn() -> T>,
}

/// Wraps a closure as a [`Condition`].
///
/// # Example
///
/// ```ignore
/// let title = condition_fn("title to be set", |session| {
///     Box::pin(async move {
///         match session.title().await {
///             Ok(t) if !t.is_empty() => Outcome::Ready(t),
///             Ok(_) => Outcome::NotYet,
///             Err(e) => Outcome::Fatal(e),
///         }
///     })
/// });
/// ```
pub fn condition_fn<F, T>(description: impl Into<String>, probe: F) -> FnCondition<F, T>
where
    F: for<'a> Fn(&'a dyn RemoteSession) -> ProbeFuture<'a, T> + Send + Sync,
    T: Send,
{
    FnCondition {
        description: description.into(),
        probe,
        _output: PhantomData,
    }
}

#[async_trait]
impl<F, T> Condition for FnCondition<F, T>
where
    F: for<'a> Fn(&'a dyn RemoteSession) -> ProbeFuture<'a, T> + Send + Sync,
    T: Send,
{
    type Output = T;

    async fn check(&self, session: &dyn RemoteSession) -> Outcome<T> {
        (self.probe)(session).await
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
