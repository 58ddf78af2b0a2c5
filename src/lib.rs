//! webpoll - Page Object UI test harness with explicit waits.
//!
//! UI state changes asynchronously: a message appears 300 ms after a click,
//! a button enables once a request finishes. This crate drives a browser
//! through a [`RemoteSession`] and resolves every interaction through a
//! bounded polling wait instead of a fixed sleep.
//!
//! # Architecture
//!
//! ```text
//! ContactPage ─► Page ─► Poller::wait(Condition over Locator, WaitConfig)
//!                              │
//!                              ▼  repeated probes
//!                        RemoteSession (WebDriver over HTTP, or MemorySession)
//!                              │
//!                              ▼
//!                           Element ─► text / click / type_text
//! ```
//!
//! Key design principles:
//!
//! - Only [`Poller`] sleeps, and never past its timeout
//! - "No such element" and "stale element reference" mean *not yet*; every
//!   other session error aborts the wait immediately
//! - Page objects share the session and never close it
//!
//! # Quick Start
//!
//! ```ignore
//! use webpoll::{Browser, BrowserOptions, ContactForm, ContactPage, Driver, RemoteSession, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let driver = Driver::builder()
//!         .endpoint("http://localhost:9515")
//!         .options(BrowserOptions::headless(Browser::Chrome))
//!         .build()?;
//!
//!     let session = driver.connect().await?;
//!     let contact = ContactPage::new(driver.page(session.clone()));
//!
//!     contact.open("file:///tmp/contact_form.html").await?;
//!     contact
//!         .fill_form(&ContactForm::new("Ivan", "ivan@example.com").message("hello"))
//!         .await?;
//!     contact.submit_form().await?;
//!     assert!(contact.is_success_message_displayed().await);
//!
//!     session.close().await
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | [`Locator`], [`Element`], [`Page`] |
//! | [`wait`] | [`Poller`], [`WaitConfig`], [`Condition`]s |
//! | [`session`] | [`RemoteSession`] and its implementations |
//! | [`pages`] | Concrete page objects |
//! | [`driver`] | Driver factory and configuration |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | WebDriver wire types (internal) |
//! | [`transport`] | HTTP transport (internal) |

// ============================================================================
// Modules
// ============================================================================

/// Page-facing types: Locator, Element, Page.
pub mod browser;

/// Driver factory and configuration.
///
/// Use [`Driver::builder()`] to create a configured driver instance.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for sessions and elements.
pub mod identifiers;

/// Concrete page objects.
pub mod pages;

/// WebDriver wire types.
///
/// Internal module defining commands and reply envelopes.
pub mod protocol;

/// Remote browser session capability.
pub mod session;

/// HTTP transport layer.
///
/// Internal module handling requests to the WebDriver endpoint.
pub mod transport;

/// Condition polling engine.
pub mod wait;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{Element, Key, Locator, Lookup, Page, Strategy};

// Driver types
pub use driver::{Browser, BrowserOptions, Driver, DriverBuilder};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ElementId, SessionId};

// Page objects
pub use pages::{ContactForm, ContactPage};

// Session types
pub use session::{MemorySession, NodeSpec, RemoteSession, WebDriverSession};

// Wait types
pub use wait::{CancelToken, Condition, Outcome, Poller, WaitConfig, condition_fn};
