//! LivePerson consumer messaging protocol definitions.
//!
//! API version 3. All communication uses JSON text frames over WebSocket.
//!
//! Frame kinds:
//! - `req`:          client to service request, carries a numeric `id`
//! - `resp`:         service to client response, echoes it as `reqId`
//! - `notification`: service to client push, no `reqId`

use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

pub const API_VERSION: u32 = 3;

pub mod kinds {
    pub const REQUEST: &str = "req";
    pub const RESPONSE: &str = "resp";
    pub const NOTIFICATION: &str = "notification";
}

pub mod types {
    pub const REQUEST_CONVERSATION: &str = "cm.ConsumerRequestConversation";
    pub const REQUEST_CONVERSATION_RESPONSE: &str = "cm.RequestConversationResponse";
    pub const PUBLISH_EVENT: &str = "ms.PublishEvent";
    pub const PUBLISH_EVENT_RESPONSE: &str = "ms.PublishEventResponse";
}

pub const CONTENT_EVENT: &str = "ContentEvent";
pub const TEXT_PLAIN: &str = "text/plain";

// ── Outbound ─────────────────────────────────────────────────────────────────

/// Client → service request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFrame {
    pub kind: String, // always "req"
    pub id: u64,
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl RequestFrame {
    pub fn new(id: u64, r#type: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            kind: kinds::REQUEST.into(),
            id,
            r#type: r#type.into(),
            body,
        }
    }

    /// Ask the service to open a new conversation for this consumer.
    pub fn request_conversation(id: u64) -> Self {
        Self::new(id, types::REQUEST_CONVERSATION, None)
    }

    /// Publish a plain-text content event into `dialog_id`.
    pub fn publish_text(id: u64, dialog_id: &str, message: &str) -> Self {
        let body = PublishEventBody {
            dialog_id: dialog_id.to_string(),
            event: ContentEvent::text(message),
        };
        Self::new(
            id,
            types::PUBLISH_EVENT,
            // Plain struct of strings; serialization cannot fail.
            serde_json::to_value(body).ok(),
        )
    }

    /// Key used to correlate the eventual response.
    pub fn correlation_key(&self) -> String {
        self.id.to_string()
    }
}

/// Body of an `ms.PublishEvent` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEventBody {
    pub dialog_id: String,
    pub event: ContentEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEvent {
    #[serde(rename = "type")]
    pub r#type: String,
    pub content_type: String,
    pub message: String,
}

impl ContentEvent {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            r#type: CONTENT_EVENT.into(),
            content_type: TEXT_PLAIN.into(),
            message: message.into(),
        }
    }
}

// ── Inbound ──────────────────────────────────────────────────────────────────

/// Request id as echoed by the service. Responses carry it as a string,
/// older deployments as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(u64),
    Text(String),
}

impl RequestId {
    pub fn as_key(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Service → client frame (response or notification).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl ResponseFrame {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Key of the request this frame answers, if any.
    pub fn correlation_key(&self) -> Option<String> {
        self.req_id.as_ref().map(RequestId::as_key)
    }

    /// Non-empty `body.conversationId`.
    pub fn conversation_id(&self) -> Option<&str> {
        self.body
            .get("conversationId")
            .and_then(serde_json::Value::as_str)
            .filter(|id| !id.is_empty())
    }

    /// A missing `code` counts as success.
    pub fn is_success(&self) -> bool {
        self.code.is_none_or(|code| (200..300).contains(&code))
    }

    /// Human-readable failure description for a non-success response.
    pub fn failure_message(&self) -> String {
        let detail = self
            .body
            .get("msg")
            .or_else(|| self.body.get("message"))
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_else(|| self.body.to_string());
        format!(
            "{} failed with code {}: {detail}",
            self.r#type.as_deref().unwrap_or("request"),
            self.code.map_or_else(|| "?".to_string(), |c| c.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn conversation_request_wire_format() {
        let frame = RequestFrame::request_conversation(1);
        assert_eq!(
            serde_json::to_string(&frame).unwrap(),
            r#"{"kind":"req","id":1,"type":"cm.ConsumerRequestConversation"}"#
        );
    }

    #[test]
    fn publish_wire_format() {
        let frame = RequestFrame::publish_text(2, "xyz", "Hello World!");
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "kind": "req",
                "id": 2,
                "type": "ms.PublishEvent",
                "body": {
                    "dialogId": "xyz",
                    "event": {
                        "type": "ContentEvent",
                        "contentType": "text/plain",
                        "message": "Hello World!"
                    }
                }
            })
        );
    }

    #[test]
    fn response_with_string_req_id() {
        let frame = ResponseFrame::parse(
            r#"{"kind":"resp","reqId":"1","code":200,"type":"cm.RequestConversationResponse","body":{"conversationId":"xyz"}}"#,
        )
        .unwrap();
        assert_eq!(frame.correlation_key().as_deref(), Some("1"));
        assert_eq!(frame.conversation_id(), Some("xyz"));
        assert!(frame.is_success());
    }

    #[test]
    fn response_with_numeric_req_id() {
        let frame = ResponseFrame::parse(r#"{"reqId":7,"body":{}}"#).unwrap();
        assert_eq!(frame.correlation_key().as_deref(), Some("7"));
        assert_eq!(frame.conversation_id(), None);
    }

    #[test]
    fn bare_body_frame_has_no_correlation() {
        let frame = ResponseFrame::parse(r#"{"body":{"conversationId":""}}"#).unwrap();
        assert!(frame.correlation_key().is_none());
        assert_eq!(frame.conversation_id(), None);
    }

    #[test]
    fn frame_without_body_parses() {
        let frame = ResponseFrame::parse(r#"{"kind":"notification","type":"cqm.ExConversationChangeNotification"}"#).unwrap();
        assert!(frame.body.is_null());
    }

    #[test]
    fn failure_message_uses_body_msg() {
        let frame = ResponseFrame::parse(
            r#"{"kind":"resp","reqId":"1","code":400,"type":"cm.RequestConversationResponse","body":{"msg":"consumer already has an open conversation"}}"#,
        )
        .unwrap();
        assert!(!frame.is_success());
        assert_eq!(
            frame.failure_message(),
            "cm.RequestConversationResponse failed with code 400: consumer already has an open conversation"
        );
    }
}
