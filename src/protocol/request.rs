//! Request and Response message types.
//!
//! A [`Request`] is a resolved command: method, path and optional JSON body.
//! A [`Response`] is the `{"value": ...}` envelope every W3C endpoint
//! returns, success or failure.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::SessionId;

use super::command::{Command, Method};

// ============================================================================
// Request
// ============================================================================

/// A command resolved against a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the endpoint root.
    pub path: String,
    /// JSON body (POST only).
    pub body: Option<Value>,
}

impl Request {
    /// Resolves `command` for `session`.
    ///
    /// # Errors
    ///
    /// [`Error::Protocol`] if a session-scoped command has no session.
    pub fn new(session: Option<&SessionId>, command: &Command) -> Result<Self> {
        Ok(Self {
            method: command.method(),
            path: command.path(session)?,
            body: command.body(),
        })
    }
}

// ============================================================================
// Response
// ============================================================================

/// Envelope of every WebDriver reply.
///
/// # Format
///
/// Success:
/// ```json
/// { "value": "Contact form" }
/// ```
///
/// Error:
/// ```json
/// {
///   "value": {
///     "error": "no such element",
///     "message": "Unable to locate element",
///     "stacktrace": ""
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Payload, or error details.
    #[serde(default)]
    pub value: Value,
}

impl Response {
    /// Returns the error payload, if this is an error reply.
    #[must_use]
    pub fn error(&self) -> Option<WireError> {
        let code = self.value.get("error")?.as_str()?;
        let message = self
            .value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(code);
        Some(WireError {
            code: code.to_string(),
            message: message.to_string(),
        })
    }

    /// Returns `true` if this is an error reply.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Extracts the value, mapping error replies to [`Error`].
    ///
    /// `command` supplies the locator or element for the error.
    pub fn into_result(self, command: &Command) -> Result<Value> {
        match self.error() {
            Some(wire) => Err(wire.into_error(command)),
            None => Ok(self.value),
        }
    }
}

// ============================================================================
// WireError
// ============================================================================

/// Error details of a failed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireError {
    /// W3C error code, e.g. `no such element`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl WireError {
    /// Maps the W3C error code to the crate error.
    ///
    /// | Code | Error |
    /// |------|-------|
    /// | `no such element` | [`Error::ElementNotFound`] |
    /// | `stale element reference` | [`Error::StaleElement`] |
    /// | `element not interactable`, `element click intercepted` | [`Error::Interaction`] |
    /// | `invalid session id` | [`Error::SessionClosed`] |
    /// | anything else | [`Error::WebDriver`] |
    #[must_use]
    pub fn into_error(self, command: &Command) -> Error {
        let Self { code, message } = self;
        match (code.as_str(), command.element()) {
            ("no such element", _) => {
                let target = match (command.locator(), command.element()) {
                    (Some(locator), _) => locator.to_string(),
                    (None, Some(element)) => element.to_string(),
                    (None, None) => command.name().to_string(),
                };
                Error::element_not_found(target)
            }
            ("stale element reference", Some(element)) => Error::stale_element(element.clone()),
            ("element not interactable" | "element click intercepted", Some(element)) => {
                Error::interaction(element.clone(), message)
            }
            ("invalid session id", _) => Error::SessionClosed,
            _ => Error::webdriver(code.clone(), message),
        }
    }
}

// ============================================================================
// NewSessionReply
// ============================================================================

/// Payload of a successful `NewSession`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionReply {
    /// Assigned session.
    pub session_id: SessionId,
    /// Capabilities the remote end matched.
    #[serde(default)]
    pub capabilities: Value,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::browser::Locator;
    use crate::identifiers::ElementId;

    fn parse(json_str: &str) -> Response {
        serde_json::from_str(json_str).expect("parse")
    }

    #[test]
    fn test_request_resolution() {
        let session = SessionId::new("s1");
        let request = Request::new(
            Some(&session),
            &Command::Navigate {
                url: "https://example.com".into(),
            },
        )
        .expect("request");

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/session/s1/url");
        assert_eq!(request.body, Some(json!({ "url": "https://example.com" })));
    }

    #[test]
    fn test_success_response() {
        let response = parse(r#"{"value": "Contact form"}"#);
        assert!(!response.is_error());
        let value = response.into_result(&Command::GetTitle).expect("ok");
        assert_eq!(value, json!("Contact form"));
    }

    #[test]
    fn test_null_value_is_success() {
        let response = parse(r#"{"value": null}"#);
        assert_eq!(
            response.into_result(&Command::Refresh).expect("ok"),
            Value::Null
        );
    }

    #[test]
    fn test_no_such_element_maps_to_not_found() {
        let response = parse(
            r#"{"value": {"error": "no such element", "message": "Unable to locate", "stacktrace": ""}}"#,
        );
        let err = response
            .into_result(&Command::FindElement(Locator::id("email")))
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("id=email"));
    }

    #[test]
    fn test_stale_reference_maps_to_stale() {
        let response = parse(r#"{"value": {"error": "stale element reference", "message": "gone"}}"#);
        let err = response
            .into_result(&Command::GetElementText(ElementId::new("e1")))
            .unwrap_err();
        assert!(matches!(err, Error::StaleElement { .. }));
    }

    #[test]
    fn test_click_intercepted_maps_to_interaction() {
        let response = parse(
            r#"{"value": {"error": "element click intercepted", "message": "overlay"}}"#,
        );
        let err = response
            .into_result(&Command::ElementClick(ElementId::new("e1")))
            .unwrap_err();
        assert!(matches!(err, Error::Interaction { ref message, .. } if message == "overlay"));
    }

    #[test]
    fn test_invalid_session_maps_to_closed() {
        let response = parse(r#"{"value": {"error": "invalid session id", "message": "x"}}"#);
        let err = response.into_result(&Command::GetTitle).unwrap_err();
        assert!(matches!(err, Error::SessionClosed));
    }

    #[test]
    fn test_unknown_code_keeps_code() {
        let response = parse(r#"{"value": {"error": "javascript error"}}"#);
        let err = response.into_result(&Command::GetUrl).unwrap_err();
        match err {
            Error::WebDriver { code, message } => {
                assert_eq!(code, "javascript error");
                assert_eq!(message, "javascript error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_new_session_reply() {
        let response = parse(
            r#"{"value": {"sessionId": "1234", "capabilities": {"browserName": "chrome"}}}"#,
        );
        let value = response
            .into_result(&Command::NewSession {
                capabilities: json!({}),
            })
            .expect("ok");
        let reply: NewSessionReply = serde_json::from_value(value).expect("decode");
        assert_eq!(reply.session_id.as_str(), "1234");
        assert_eq!(reply.capabilities["browserName"], "chrome");
    }
}
