use mcp_types::JSONRPCError;
use mcp_types::JSONRPCErrorDetail;
use mcp_types::JSONRPCMessage;
use mcp_types::JSONRPCResponse;
use mcp_types::RequestId;
use mcp_types::JSONRPC_VERSION;
use serde_json::Value;

use crate::delegate::Delegate;

/// Runs an inbound request through `delegate` and turns the outcome into the
/// reply frame to write back. Shared by the bidirectional `Peer`'s reader
/// task and the Tool-Server Runtime's single-threaded dispatch loop, so both
/// surfaces get the same `-32601`/`-32603` mapping from one place.
pub async fn dispatch_inbound_request(
    delegate: &dyn Delegate,
    id: RequestId,
    method: &str,
    params: Option<Value>,
) -> JSONRPCMessage {
    match delegate.handle_request(method, params).await {
        Ok(result) => JSONRPCMessage::Response(JSONRPCResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }),
        Err(err) => JSONRPCMessage::Error(JSONRPCError {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JSONRPCErrorDetail {
                code: err.code,
                message: err.message,
                data: err.data,
            },
        }),
    }
}
