//! JSON-RPC 2.0 frame types shared by every stdio peer in this workspace.
//!
//! A frame is exactly one of a request, a notification, a success response or
//! an error response. `id` and `method` never coexist with `result`/`error`,
//! so the wire representation is untagged and the variant is recovered from
//! which fields are present.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request id. The protocol allows strings too, but every peer in
/// this workspace only ever allocates positive integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub i64);

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        RequestId(value)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JSONRPCRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JSONRPCNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JSONRPCResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JSONRPCErrorDetail {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JSONRPCError {
    pub jsonrpc: String,
    pub id: RequestId,
    pub error: JSONRPCErrorDetail,
}

/// Standard error codes this workspace actually emits.
pub mod error_codes {
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const PARSE_ERROR: i64 = -32700;
}

/// Any single line of the wire protocol, recovered from field presence
/// rather than an explicit `type` tag (matching the reference client's
/// approach of trying each concrete shape during deserialization).
#[derive(Debug, Clone)]
pub enum JSONRPCMessage {
    Request(JSONRPCRequest),
    Notification(JSONRPCNotification),
    Response(JSONRPCResponse),
    Error(JSONRPCError),
}

impl Serialize for JSONRPCMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            JSONRPCMessage::Request(r) => r.serialize(serializer),
            JSONRPCMessage::Notification(n) => n.serialize(serializer),
            JSONRPCMessage::Response(r) => r.serialize(serializer),
            JSONRPCMessage::Error(e) => e.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for JSONRPCMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let object = value.as_object().ok_or_else(|| {
            serde::de::Error::custom("JSON-RPC frame must be a JSON object")
        })?;

        let has_id = object.contains_key("id");
        let has_method = object.contains_key("method");
        let has_error = object.contains_key("error");

        let result = if has_method {
            if has_id {
                serde_json::from_value(value).map(JSONRPCMessage::Request)
            } else {
                serde_json::from_value(value).map(JSONRPCMessage::Notification)
            }
        } else if has_error {
            serde_json::from_value(value).map(JSONRPCMessage::Error)
        } else if has_id {
            serde_json::from_value(value).map(JSONRPCMessage::Response)
        } else {
            return Err(serde::de::Error::custom(
                "JSON-RPC frame is neither a request, notification, response nor error",
            ));
        };

        result.map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_request() {
        let msg = JSONRPCMessage::Request(JSONRPCRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: RequestId(1),
            method: "tools/list".to_string(),
            params: None,
        });
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: JSONRPCMessage = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, JSONRPCMessage::Request(r) if r.method == "tools/list"));
    }

    #[test]
    fn distinguishes_response_from_error() {
        let ok = r#"{"jsonrpc":"2.0","id":1,"result":{"ok":true}}"#;
        let err = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"nope"}}"#;
        assert!(matches!(
            serde_json::from_str::<JSONRPCMessage>(ok).unwrap(),
            JSONRPCMessage::Response(_)
        ));
        assert!(matches!(
            serde_json::from_str::<JSONRPCMessage>(err).unwrap(),
            JSONRPCMessage::Error(_)
        ));
    }

    #[test]
    fn distinguishes_notification_from_request() {
        let notif = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        let req = r#"{"jsonrpc":"2.0","id":7,"method":"initialize"}"#;
        assert!(matches!(
            serde_json::from_str::<JSONRPCMessage>(notif).unwrap(),
            JSONRPCMessage::Notification(_)
        ));
        assert!(matches!(
            serde_json::from_str::<JSONRPCMessage>(req).unwrap(),
            JSONRPCMessage::Request(_)
        ));
    }

    #[test]
    fn rejects_non_object_frame() {
        let bad = r#""just a string""#;
        assert!(serde_json::from_str::<JSONRPCMessage>(bad).is_err());
    }
}
