//! Driver configuration and session factory.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Driver`] | Opens WebDriver sessions |
//! | [`DriverBuilder`] | Fluent configuration builder |
//! | [`BrowserOptions`] | Browser, headless mode, window size, arguments |
//! | [`Browser`] | Chrome or Firefox |
//!
//! # Example
//!
//! ```ignore
//! use webpoll::{Browser, BrowserOptions, Driver, Result};
//!
//! # async fn example() -> Result<()> {
//! let driver = Driver::builder()
//!     .endpoint("http://localhost:9515")
//!     .options(BrowserOptions::headless(Browser::Chrome))
//!     .build()?;
//!
//! let session = driver.connect().await?;
//! let page = driver.page(session.clone());
//! page.open("https://example.com").await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for driver configuration.
pub mod builder;

/// Session factory.
pub mod core;

/// Browser options and capabilities.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::DriverBuilder;
pub use core::Driver;
pub use options::{Browser, BrowserOptions};
