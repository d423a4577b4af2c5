//! Wire types shared by every JSON-RPC stdio peer in this workspace:
//! the raw frame shapes (`JSONRPCMessage` and friends), the typed
//! request/result pairs built on top of them, and the tool-declaration
//! schema returned by `tools/list`.

mod error;
mod frame;
mod protocol;
mod tool;

pub use error::RequestError;
pub use frame::error_codes;
pub use frame::JSONRPCError;
pub use frame::JSONRPCErrorDetail;
pub use frame::JSONRPCMessage;
pub use frame::JSONRPCNotification;
pub use frame::JSONRPCRequest;
pub use frame::JSONRPCResponse;
pub use frame::RequestId;
pub use frame::JSONRPC_VERSION;
pub use protocol::AcpInitializeParams;
pub use protocol::AcpInitializeRequest;
pub use protocol::AcpInitializeResult;
pub use protocol::CancelSendMessageRequest;
pub use protocol::ClientCapabilities;
pub use protocol::Implementation;
pub use protocol::InitializeParams;
pub use protocol::InitializeRequest;
pub use protocol::InitializeResult;
pub use protocol::ListToolsRequest;
pub use protocol::ModelContextProtocolRequest;
pub use protocol::SendUserMessageParams;
pub use protocol::SendUserMessageRequest;
pub use protocol::ServerCapabilities;
pub use protocol::ToolsCapability;
pub use protocol::NOTIFICATION_INITIALIZED;
pub use tool::CallToolParams;
pub use tool::CallToolRequest;
pub use tool::CallToolResult;
pub use tool::ContentBlock;
pub use tool::ListToolsResult;
pub use tool::ToolDeclaration;
pub use tool::ToolInputSchema;
