//! Page-facing types.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Locator`] | Strategy + value pair that identifies elements |
//! | [`Element`] | Resolved element reference |
//! | [`Page`] | Page Object base: lookups, waits, bounded checks |
//! | [`Key`] | Control keys for [`Element::press`] |
//!
//! # Example
//!
//! ```ignore
//! use webpoll::{Locator, Page};
//!
//! let page = Page::new(session);
//! page.open("file:///tmp/contact_form.html").await?;
//! let heading = page.wait_for_visible(&Locator::tag_name("h1")).await?;
//! println!("{}", heading.text().await?);
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Resolved element handles.
pub mod element;

/// Keyboard key definitions.
pub mod keyboard;

/// Element locators.
pub mod locator;

/// Page Object base.
pub mod page;

// ============================================================================
// Re-exports
// ============================================================================

pub use element::Element;
pub use keyboard::Key;
pub use locator::{Locator, Strategy};
pub use page::{Lookup, Page};
