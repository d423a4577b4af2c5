use mcp_types::RequestError;

/// Errors raised by the transport itself, as opposed to `RequestError`s that
/// travel inside a JSON-RPC error frame.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    #[error("peer is shutting down")]
    Shutdown,
    #[error("request '{method}' timed out after {timeout_secs}s")]
    Timeout { method: String, timeout_secs: u64 },
    #[error("malformed JSON-RPC frame: {0}")]
    Format(String),
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("peer returned a JSON-RPC error")]
    Request(#[from] RequestError),
}
