use serde_json::Value;

use crate::frame::JSONRPCErrorDetail;

/// A JSON-RPC error surfaced to a caller of `send_request`.
///
/// Mirrors the reference ACP client's `RequestError`: carries the raw
/// `{code, message, data}` triple so callers can match on `code` without
/// re-parsing a formatted string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct RequestError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

impl From<JSONRPCErrorDetail> for RequestError {
    fn from(detail: JSONRPCErrorDetail) -> Self {
        RequestError {
            code: detail.code,
            message: detail.message,
            data: detail.data,
        }
    }
}

impl RequestError {
    pub fn method_not_found(method: &str) -> Self {
        RequestError {
            code: crate::frame::error_codes::METHOD_NOT_FOUND,
            message: format!("Method not found: '{method}'"),
            data: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        RequestError {
            code: crate::frame::error_codes::INTERNAL_ERROR,
            message: message.into(),
            data: None,
        }
    }
}
