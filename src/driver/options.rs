//! Browser options and W3C capabilities.
//!
//! Provides a type-safe interface for the browser a session asks for:
//! which browser, headless mode, window size, and extra command-line
//! arguments. [`BrowserOptions::to_capabilities`] renders them as the
//! `capabilities` object of a new-session request.
//!
//! # Example
//!
//! ```ignore
//! use webpoll::{Browser, BrowserOptions};
//!
//! let options = BrowserOptions::new(Browser::Chrome)
//!     .with_headless()
//!     .with_window_size(1920, 1080);
//!
//! let args = options.to_args();
//! // ["--headless", "--no-sandbox", "--disable-dev-shm-usage", "--window-size=1920,1080"]
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde_json::{Value, json};

// ============================================================================
// Browser
// ============================================================================

/// Browser family driven by the remote end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Browser {
    /// Chrome / Chromium via chromedriver.
    #[default]
    Chrome,
    /// Firefox via geckodriver.
    Firefox,
}

impl Browser {
    /// W3C `browserName`.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
        }
    }

    /// Vendor key holding the browser arguments.
    #[inline]
    #[must_use]
    pub const fn options_key(self) -> &'static str {
        match self {
            Self::Chrome => "goog:chromeOptions",
            Self::Firefox => "moz:firefoxOptions",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// BrowserOptions
// ============================================================================

/// Browser configuration sent with a new-session request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserOptions {
    /// Browser family.
    pub browser: Browser,

    /// Run without a GUI (headless mode).
    pub headless: bool,

    /// Window dimensions in pixels (width, height).
    pub window_size: Option<(u32, u32)>,

    /// Accept self-signed TLS certificates.
    pub accept_insecure_certs: bool,

    /// Additional custom command-line arguments.
    pub extra_args: Vec<String>,
}

// ============================================================================
// Constructors
// ============================================================================

impl BrowserOptions {
    /// Creates options for `browser` with default settings.
    #[inline]
    #[must_use]
    pub fn new(browser: Browser) -> Self {
        Self {
            browser,
            ..Self::default()
        }
    }

    /// Creates headless options for `browser`.
    #[inline]
    #[must_use]
    pub fn headless(browser: Browser) -> Self {
        Self::new(browser).with_headless()
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl BrowserOptions {
    /// Enables headless mode.
    #[inline]
    #[must_use]
    pub fn with_headless(mut self) -> Self {
        self.headless = true;
        self
    }

    /// Sets window size in pixels.
    #[inline]
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = Some((width, height));
        self
    }

    /// Accepts self-signed certificates.
    #[inline]
    #[must_use]
    pub fn with_insecure_certs(mut self) -> Self {
        self.accept_insecure_certs = true;
        self
    }

    /// Adds a custom command-line argument.
    #[inline]
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Adds multiple custom command-line arguments.
    #[inline]
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}

// ============================================================================
// Conversion
// ============================================================================

impl BrowserOptions {
    /// Converts options to browser command-line arguments.
    ///
    /// Headless Chrome also gets `--no-sandbox` and
    /// `--disable-dev-shm-usage` so it starts inside containers.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        match self.browser {
            Browser::Chrome => {
                if self.headless {
                    args.push("--headless".to_string());
                    args.push("--no-sandbox".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }
                if let Some((width, height)) = self.window_size {
                    args.push(format!("--window-size={width},{height}"));
                }
            }
            Browser::Firefox => {
                if self.headless {
                    args.push("-headless".to_string());
                }
                if let Some((width, height)) = self.window_size {
                    args.push(format!("--width={width}"));
                    args.push(format!("--height={height}"));
                }
            }
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Renders the `capabilities` object of a new-session request.
    #[must_use]
    pub fn to_capabilities(&self) -> Value {
        json!({
            "alwaysMatch": {
                "browserName": self.browser.name(),
                "acceptInsecureCerts": self.accept_insecure_certs,
                (self.browser.options_key()): { "args": self.to_args() },
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
