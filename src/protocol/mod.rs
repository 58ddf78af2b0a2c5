//! W3C WebDriver wire types.
//!
//! # Protocol Overview
//!
//! | Type | Direction | Purpose |
//! |------|-----------|---------|
//! | [`Command`] | Local → Remote | Typed endpoint + parameters |
//! | [`Request`] | Local → Remote | Resolved method, path, body |
//! | [`Response`] | Remote → Local | `{"value": ...}` envelope |
//!
//! Error replies are mapped to [`Error`](crate::Error) by
//! [`Response::into_result`].

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions.
pub mod command;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Command, ELEMENT_KEY, ElementRef, Method};
pub use request::{NewSessionReply, Request, Response, WireError};
