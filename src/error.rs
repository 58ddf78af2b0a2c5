//! Error types for webpoll.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webpoll::{Locator, Result};
//!
//! async fn example(page: &Page) -> Result<()> {
//!     page.click(&Locator::id("submit")).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidArgument`] |
//! | Waiting | [`Error::WaitTimeout`], [`Error::Cancelled`] |
//! | Element | [`Error::ElementNotFound`], [`Error::StaleElement`], [`Error::Interaction`] |
//! | Session (probe) | [`Error::SessionClosed`], [`Error::Connection`], [`Error::Protocol`], [`Error::WebDriver`] |
//! | External | [`Error::Http`], [`Error::Json`] |
//!
//! # Recoverable absence
//!
//! [`Error::ElementNotFound`] and [`Error::StaleElement`] are the only
//! errors a wait treats as "not yet". Everything else aborts the wait.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::ElementId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when driver or wait configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Invalid argument passed to an operation.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Wait Errors
    // ========================================================================
    /// Condition did not become true before the deadline.
    ///
    /// This is an ordinary test failure, not a broken session.
    #[error("Timed out after {elapsed_ms}ms (limit {timeout_ms}ms) waiting for {description}")]
    WaitTimeout {
        /// What was being waited for.
        description: String,
        /// Milliseconds actually spent waiting.
        elapsed_ms: u64,
        /// Configured budget in milliseconds.
        timeout_ms: u64,
    },

    /// Wait was cancelled between two poll ticks.
    #[error("Cancelled after {elapsed_ms}ms waiting for {description}")]
    Cancelled {
        /// What was being waited for.
        description: String,
        /// Milliseconds spent before the cancellation was observed.
        elapsed_ms: u64,
    },

    // ========================================================================
    // Element Errors
    // ========================================================================
    /// No element matched the locator.
    ///
    /// Recoverable: the page is live and the element may appear later.
    #[error("Element not found: {locator}")]
    ElementNotFound {
        /// Locator used, formatted as `strategy=value`.
        locator: String,
    },

    /// Element reference is no longer attached to the document.
    #[error("Stale element: {element_id}")]
    StaleElement {
        /// The stale element's ID.
        element_id: ElementId,
    },

    /// Resolved element rejected an interaction.
    ///
    /// Not retried by the element itself; callers may re-resolve.
    #[error("Element {element_id} rejected interaction: {message}")]
    Interaction {
        /// Element that rejected the interaction.
        element_id: ElementId,
        /// Message from the remote end.
        message: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Session is closed or was never opened.
    #[error("Session closed")]
    SessionClosed,

    /// Connection to the WebDriver endpoint failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Protocol violation or unexpected response shape.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Error reported by the remote end that has no dedicated variant.
    #[error("WebDriver error [{code}]: {message}")]
    WebDriver {
        /// W3C error code (e.g. `javascript error`).
        code: String,
        /// Message from the remote end.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a wait timeout error.
    #[inline]
    pub fn wait_timeout(description: impl Into<String>, elapsed_ms: u64, timeout_ms: u64) -> Self {
        Self::WaitTimeout {
            description: description.into(),
            elapsed_ms,
            timeout_ms,
        }
    }

    /// Creates a cancellation error.
    #[inline]
    pub fn cancelled(description: impl Into<String>, elapsed_ms: u64) -> Self {
        Self::Cancelled {
            description: description.into(),
            elapsed_ms,
        }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(locator: impl Into<String>) -> Self {
        Self::ElementNotFound {
            locator: locator.into(),
        }
    }

    /// Creates a stale element error.
    #[inline]
    pub fn stale_element(element_id: ElementId) -> Self {
        Self::StaleElement { element_id }
    }

    /// Creates an interaction error.
    #[inline]
    pub fn interaction(element_id: ElementId, message: impl Into<String>) -> Self {
        Self::Interaction {
            element_id,
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a generic WebDriver error.
    #[inline]
    pub fn webdriver(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WebDriver {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error means "the element is not there right now".
    ///
    /// Waits keep polling on these errors.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::StaleElement { .. }
        )
    }

    /// Returns `true` if this is a wait timeout.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }

    /// Returns `true` if a resolved element rejected an interaction.
    #[inline]
    #[must_use]
    pub fn is_interaction_error(&self) -> bool {
        matches!(
            self,
            Self::Interaction { .. } | Self::StaleElement { .. }
        )
    }

    /// Returns `true` if the session channel itself is broken.
    ///
    /// Retrying cannot help with these.
    #[inline]
    #[must_use]
    pub fn is_probe_error(&self) -> bool {
        matches!(
            self,
            Self::SessionClosed
                | Self::Connection { .. }
                | Self::Protocol { .. }
                | Self::WebDriver { .. }
                | Self::Http(_)
                | Self::Json(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
