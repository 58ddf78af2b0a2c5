//! Builder pattern for driver configuration.
//!
//! Provides a fluent API for configuring and creating [`Driver`] instances.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use webpoll::{Browser, BrowserOptions, Driver, WaitConfig};
//!
//! let driver = Driver::builder()
//!     .endpoint("http://localhost:9515")
//!     .options(BrowserOptions::headless(Browser::Chrome))
//!     .wait(WaitConfig::default().with_timeout(Duration::from_secs(5)))
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::transport::DEFAULT_REQUEST_TIMEOUT;
use crate::wait::WaitConfig;

use super::core::Driver;
use super::options::BrowserOptions;

// ============================================================================
// DriverBuilder
// ============================================================================

/// Builder for configuring a [`Driver`] instance.
///
/// Use [`Driver::builder()`] to create a new builder.
#[derive(Debug, Clone)]
pub struct DriverBuilder {
    /// WebDriver endpoint URL.
    endpoint: Option<String>,
    /// Browser options for new sessions.
    options: BrowserOptions,
    /// Wait budget for page objects.
    wait: WaitConfig,
    /// Timeout of a single HTTP command.
    request_timeout: Duration,
}

impl Default for DriverBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            options: BrowserOptions::default(),
            wait: WaitConfig::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

// ============================================================================
// DriverBuilder Implementation
// ============================================================================

impl DriverBuilder {
    /// Creates a new driver builder with default configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the WebDriver endpoint.
    ///
    /// # Arguments
    ///
    /// * `url` - Root URL of chromedriver, geckodriver, or a grid
    ///   (e.g., "http://localhost:9515")
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sets the browser options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: BrowserOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the wait configuration handed to page objects.
    #[inline]
    #[must_use]
    pub fn wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Sets the timeout of a single WebDriver command.
    #[inline]
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds the driver with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the endpoint is missing or not an http(s) URL
    /// - [`Error::Config`] if the wait configuration is invalid
    /// - [`Error::Config`] if the request timeout is zero
    pub fn build(self) -> Result<Driver> {
        let endpoint = self.validate_endpoint()?;
        self.wait.validate()?;

        if self.request_timeout.is_zero() {
            return Err(Error::config("Request timeout must be greater than zero"));
        }

        Ok(Driver::new(
            endpoint,
            self.options,
            self.wait,
            self.request_timeout,
        ))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl DriverBuilder {
    /// Validates the endpoint configuration.
    fn validate_endpoint(&self) -> Result<Url> {
        let raw = self.endpoint.as_deref().ok_or_else(|| {
            Error::config(
                "WebDriver endpoint is required. Use .endpoint() to set it.\n\
                 Example: Driver::builder().endpoint(\"http://localhost:9515\")",
            )
        })?;

        let url = Url::parse(raw)
            .map_err(|e| Error::config(format!("Invalid WebDriver endpoint {raw:?}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "WebDriver endpoint must be http(s), got {}",
                url.scheme()
            )));
        }

        Ok(url)
    }
}

// ============================================================================
// Tests
// ============================================================================
