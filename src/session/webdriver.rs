//! W3C WebDriver session over HTTP.
//!
//! [`WebDriverSession`] speaks to chromedriver, geckodriver, or a Selenium
//! grid. Every [`RemoteSession`] call is one WebDriver command; W3C error
//! codes are mapped by [`Response::into_result`](crate::protocol::Response::into_result)
//! so the wait engine sees "no such element" and "stale element reference"
//! as recoverable absence.
//!
//! # Example
//!
//! ```ignore
//! let transport = HttpTransport::new(Url::parse("http://localhost:9515")?, DEFAULT_REQUEST_TIMEOUT)?;
//! let session = WebDriverSession::open(transport, options.to_capabilities()).await?;
//! session.navigate("https://example.com").await?;
//! session.close().await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::browser::Locator;
use crate::error::{Error, Result};
use crate::identifiers::{ElementId, SessionId};
use crate::protocol::{Command, ElementRef, NewSessionReply};
use crate::transport::HttpTransport;

use super::RemoteSession;

// ============================================================================
// WebDriverSession
// ============================================================================

/// A live WebDriver session.
#[derive(Debug)]
pub struct WebDriverSession {
    transport: HttpTransport,
    id: SessionId,
    capabilities: Value,
    closed: AtomicBool,
}

impl WebDriverSession {
    /// Creates a session on the remote end.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if the remote end is unreachable
    /// - [`Error::WebDriver`] if the capabilities cannot be matched
    pub async fn open(transport: HttpTransport, capabilities: Value) -> Result<Self> {
        let command = Command::NewSession { capabilities };
        let value = transport.execute(None, &command).await?;
        let reply: NewSessionReply = serde_json::from_value(value)?;

        let browser = reply
            .capabilities
            .get("browserName")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(
            session_id = %reply.session_id,
            endpoint = %transport.endpoint(),
            browser,
            "WebDriver session opened"
        );

        Ok(Self {
            transport,
            id: reply.session_id,
            capabilities: reply.capabilities,
            closed: AtomicBool::new(false),
        })
    }

    /// Returns the session ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the capabilities reported by the remote end.
    #[inline]
    #[must_use]
    pub fn capabilities(&self) -> &Value {
        &self.capabilities
    }

    /// Returns `true` once [`close`](RemoteSession::close) succeeded.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn execute(&self, command: Command) -> Result<Value> {
        if self.is_closed() {
            return Err(Error::SessionClosed);
        }
        self.transport.execute(Some(&self.id), &command).await
    }

    async fn execute_unit(&self, command: Command) -> Result<()> {
        self.execute(command).await.map(drop)
    }
}

// ============================================================================
// RemoteSession Implementation
// ============================================================================

#[async_trait]
impl RemoteSession for WebDriverSession {
    async fn find(&self, locator: &Locator) -> Result<ElementId> {
        debug!(%locator, "Finding element");
        let value = self.execute(Command::FindElement(locator.clone())).await?;
        ElementRef::decode(value)
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementId>> {
        debug!(%locator, "Finding elements");
        let value = self.execute(Command::FindElements(locator.clone())).await?;
        ElementRef::decode_all(value)
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        info!(url, "Navigating");
        self.execute_unit(Command::Navigate {
            url: url.to_string(),
        })
        .await
    }

    async fn refresh(&self) -> Result<()> {
        self.execute_unit(Command::Refresh).await
    }

    async fn title(&self) -> Result<String> {
        Ok(serde_json::from_value(self.execute(Command::GetTitle).await?)?)
    }

    async fn current_url(&self) -> Result<String> {
        Ok(serde_json::from_value(self.execute(Command::GetUrl).await?)?)
    }

    async fn element_text(&self, element: &ElementId) -> Result<String> {
        let value = self
            .execute(Command::GetElementText(element.clone()))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// `value` is read as a DOM property so inputs report what was typed;
    /// everything else is an HTML attribute.
    async fn element_attribute(&self, element: &ElementId, name: &str) -> Result<Option<String>> {
        let command = if name == "value" {
            Command::GetElementProperty {
                element: element.clone(),
                name: name.to_string(),
            }
        } else {
            Command::GetElementAttribute {
                element: element.clone(),
                name: name.to_string(),
            }
        };

        Ok(match self.execute(command).await? {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    async fn element_displayed(&self, element: &ElementId) -> Result<bool> {
        let value = self
            .execute(Command::IsElementDisplayed(element.clone()))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn element_enabled(&self, element: &ElementId) -> Result<bool> {
        let value = self
            .execute(Command::IsElementEnabled(element.clone()))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn element_click(&self, element: &ElementId) -> Result<()> {
        self.execute_unit(Command::ElementClick(element.clone()))
            .await
    }

    async fn element_clear(&self, element: &ElementId) -> Result<()> {
        self.execute_unit(Command::ElementClear(element.clone()))
            .await
    }

    async fn element_send_keys(&self, element: &ElementId, text: &str) -> Result<()> {
        self.execute_unit(Command::ElementSendKeys {
            element: element.clone(),
            text: text.to_string(),
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.execute_unit(Command::DeleteSession).await?;
        self.closed.store(true, Ordering::SeqCst);
        info!(session_id = %self.id, "WebDriver session closed");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
