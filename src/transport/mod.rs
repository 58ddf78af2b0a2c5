//! Transport layer.
//!
//! ```text
//! ┌──────────────────┐        HTTP + JSON        ┌──────────────────┐
//! │ WebDriverSession │ ────────────────────────► │ chromedriver /   │
//! │  HttpTransport   │ ◄──────────────────────── │ geckodriver      │
//! └──────────────────┘    {"value": ...}         └──────────────────┘
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// HTTP transport.
pub mod http;

// ============================================================================
// Re-exports
// ============================================================================

pub use http::{DEFAULT_REQUEST_TIMEOUT, HttpTransport};
