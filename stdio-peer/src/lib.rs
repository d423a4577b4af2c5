//! The C1+C2 transport core shared by every JSON-RPC stdio peer in this
//! workspace: line-delimited framing over a child's piped stdio or the
//! process's own stdio, a `Delegate` trait for answering inbound requests,
//! and graceful child termination.
//!
//! `mcp-client` layers the Agent-Coordinator Protocol client on top of
//! [`Peer`]; `mcp-server` layers the Tool-Server Runtime's single-threaded
//! dispatch loop on top of [`dispatch::dispatch_inbound_request`] directly,
//! since it never sends outbound requests of its own and has no need for the
//! pending-call machinery.

mod child;
mod delegate;
mod dispatch;
mod error;
mod peer;

#[cfg(feature = "test-util")]
pub mod testing;

pub use child::ChildProcess;
pub use delegate::Delegate;
pub use delegate::NullDelegate;
pub use dispatch::dispatch_inbound_request;
pub use error::PeerError;
pub use peer::BoxedReader;
pub use peer::BoxedWriter;
pub use peer::Peer;
pub use peer::DEFAULT_CALL_TIMEOUT;
