//! Concrete page objects.
//!
//! Each page object wraps a [`Page`](crate::browser::Page), declares its
//! locators, and exposes the named actions tests call.

/// Contact form page.
pub mod contact;

pub use contact::{ContactForm, ContactPage};
