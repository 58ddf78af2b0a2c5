//! HTTP transport to a WebDriver remote end.
//!
//! One [`reqwest::Client`] per session, pooled connections, and a
//! per-request timeout so a hung remote end surfaces as
//! [`Error::Connection`](crate::Error::Connection) instead of hanging the
//! caller. Waits cut slow probes off at their own deadline.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::protocol::{Command, Method, Request, Response};

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for a single command (30s).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// HttpTransport
// ============================================================================

/// Sends [`Command`]s over HTTP and decodes the replies.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Creates a transport for `endpoint`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the endpoint is not an http(s) URL
    /// - [`Error::Http`] if the client cannot be built
    pub fn new(endpoint: Url, request_timeout: Duration) -> Result<Self> {
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "WebDriver endpoint must be http(s): {endpoint}"
            )));
        }

        let mut builder = reqwest::Client::builder().timeout(request_timeout);
        if is_loopback(&endpoint) {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: with_trailing_slash(endpoint),
        })
    }

    /// Returns the endpoint root.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Executes `command` and returns the reply value.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if the remote end is unreachable
    /// - the mapped W3C error for error replies
    /// - [`Error::Protocol`] for replies that are not WebDriver JSON
    pub async fn execute(&self, session: Option<&SessionId>, command: &Command) -> Result<Value> {
        let request = Request::new(session, command)?;
        let url = self.resolve(&request.path)?;
        debug!(command = command.name(), method = %request.method, %url, "Sending command");

        let mut builder = self.client.request(to_reqwest(request.method), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let reply = builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                Error::connection(e.to_string())
            } else {
                Error::Http(e)
            }
        })?;

        let status = reply.status();
        let bytes = reply.bytes().await?;
        trace!(command = command.name(), status = status.as_u16(), len = bytes.len(), "Reply");

        let response: Response = match serde_json::from_slice(&bytes) {
            Ok(response) => response,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                return Err(Error::protocol(format!(
                    "HTTP {status}: {}",
                    String::from_utf8_lossy(&bytes)
                )));
            }
        };

        if !status.is_success() && !response.is_error() {
            return Err(Error::protocol(format!(
                "HTTP {status} without error payload for {}",
                command.name()
            )));
        }

        response.into_result(command)
    }

    /// Joins a command path onto the endpoint.
    fn resolve(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::protocol(format!("Invalid command path {path}: {e}")))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Local drivers are reached directly, whatever the proxy environment says.
fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// `Url::join` replaces the last segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// ============================================================================
// Tests
// ============================================================================
