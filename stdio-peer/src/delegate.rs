use mcp_types::RequestError;
use serde_json::Value;

/// The embedder-supplied object that handles frames the *other* side
/// initiates. Both the Tool-Server Runtime (whose entire inbound surface is
/// `initialize`/`tools/list`/`tools/call`) and the agent client (whose
/// delegate answers workspace/user-input requests from the agent) implement
/// this.
///
/// Dispatch is a method-name match inside the implementation rather than
/// reflection: an unknown method yields `RequestError::method_not_found`,
/// which the peer turns into JSON-RPC `-32601` uniformly.
#[async_trait::async_trait]
pub trait Delegate: Send + Sync {
    async fn handle_request(&self, method: &str, params: Option<Value>) -> Result<Value, RequestError>;

    /// Default: notifications are acknowledged silently. Override to react to
    /// them (e.g. `notifications/initialized`).
    async fn handle_notification(&self, _method: &str, _params: Option<Value>) {}
}

/// A delegate with a closed, empty inbound surface: every request is
/// `-32601`. Used by peers that only ever send outbound requests and never
/// expect the other side to call back (none of the current embedders need
/// this, but it keeps `Peer::spawn` usable without a delegate in tests).
pub struct NullDelegate;

#[async_trait::async_trait]
impl Delegate for NullDelegate {
    async fn handle_request(&self, method: &str, _params: Option<Value>) -> Result<Value, RequestError> {
        Err(RequestError::method_not_found(method))
    }
}
