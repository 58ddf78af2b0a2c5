//! WebDriver session factory.
//!
//! The [`Driver`] holds the validated configuration and opens sessions on
//! the remote end. It does not launch or download driver binaries; the
//! endpoint must already be listening.
//!
//! # Example
//!
//! ```ignore
//! use webpoll::{ContactPage, Driver};
//!
//! let driver = Driver::builder().endpoint("http://localhost:9515").build()?;
//! let session = driver.connect().await?;
//!
//! let contact = ContactPage::new(driver.page(session.clone()));
//! contact.open("file:///tmp/contact_form.html").await?;
//!
//! session.close().await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::browser::Page;
use crate::error::Result;
use crate::session::{RemoteSession, WebDriverSession};
use crate::transport::HttpTransport;
use crate::wait::WaitConfig;

use super::builder::DriverBuilder;
use super::options::BrowserOptions;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the driver.
pub(crate) struct DriverInner {
    /// Remote end root URL.
    pub endpoint: Url,

    /// Browser options sent with every new session.
    pub options: BrowserOptions,

    /// Wait budget for pages created by [`Driver::page`].
    pub wait: WaitConfig,

    /// Timeout of a single HTTP command.
    pub request_timeout: Duration,
}

// ============================================================================
// Driver
// ============================================================================

/// WebDriver session factory.
///
/// Cheap to clone; every clone shares the same configuration.
#[derive(Clone)]
pub struct Driver {
    /// Shared inner state.
    pub(crate) inner: Arc<DriverInner>,
}

// ============================================================================
// Driver - Display
// ============================================================================

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("browser", &self.inner.options.browser)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Driver - Public API
// ============================================================================

impl Driver {
    /// Creates a configuration builder for the driver.
    #[inline]
    #[must_use]
    pub fn builder() -> DriverBuilder {
        DriverBuilder::new()
    }

    /// Returns the endpoint.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Returns the browser options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &BrowserOptions {
        &self.inner.options
    }

    /// Returns the wait configuration for pages.
    #[inline]
    #[must_use]
    pub fn wait_config(&self) -> WaitConfig {
        self.inner.wait
    }

    /// Returns the per-command timeout.
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.inner.request_timeout
    }

    /// Opens a new browser session.
    ///
    /// The caller owns the session and closes it once with
    /// [`RemoteSession::close`].
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`](crate::Error::Connection) if the endpoint is unreachable
    /// - [`Error::WebDriver`](crate::Error::WebDriver) if the session is refused
    pub async fn connect(&self) -> Result<Arc<WebDriverSession>> {
        debug!(
            endpoint = %self.inner.endpoint,
            browser = %self.inner.options.browser,
            "Opening session"
        );
        let transport = HttpTransport::new(self.inner.endpoint.clone(), self.inner.request_timeout)?;
        let session = WebDriverSession::open(transport, self.inner.options.to_capabilities()).await?;
        Ok(Arc::new(session))
    }

    /// Creates a page over `session` with this driver's wait configuration.
    #[must_use]
    pub fn page(&self, session: Arc<dyn RemoteSession>) -> Page {
        Page::with_config(session, self.inner.wait)
    }
}

// ============================================================================
// Driver - Internal
// ============================================================================

impl Driver {
    /// Creates a driver from validated configuration.
    pub(crate) fn new(
        endpoint: Url,
        options: BrowserOptions,
        wait: WaitConfig,
        request_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(DriverInner {
                endpoint,
                options,
                wait,
                request_timeout,
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::session::MemorySession;

    #[test]
    fn test_driver_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<Driver>();
    }

    #[test]
    fn test_driver_debug() {
        let driver = Driver::builder()
            .endpoint("http://localhost:9515")
            .build()
            .expect("build");
        let debug = format!("{driver:?}");
        assert!(debug.contains("localhost:9515"));
        assert!(debug.contains("Chrome"));
    }

    #[test]
    fn test_page_uses_driver_wait() {
        let wait = WaitConfig::new(Duration::from_secs(3), Duration::from_millis(250));
        let driver = Driver::builder()
            .endpoint("http://localhost:9515")
            .wait(wait)
            .build()
            .expect("build");

        let page = driver.page(Arc::new(MemorySession::new()));
        assert_eq!(page.wait_config(), wait);
    }

    #[tokio::test]
    async fn test_connect_unreachable_endpoint() {
        let driver = Driver::builder()
            .endpoint("http://127.0.0.1:1")
            .request_timeout(Duration::from_secs(2))
            .build()
            .expect("build");

        let err = driver.connect().await.unwrap_err();
        assert!(matches!(err, Error::Connection { .. }), "{err:?}");
    }
}
