use serde::Deserialize;
use serde::Serialize;

use crate::tool::CallToolParams;
use crate::tool::CallToolResult;
use crate::tool::ListToolsResult;

/// A strongly-typed JSON-RPC request, in the same spirit as the reference
/// client's `ModelContextProtocolRequest`: a method name plus a params/result
/// pair, so callers never hand-assemble `serde_json::Value` for well-known
/// calls.
pub trait ModelContextProtocolRequest {
    const METHOD: &'static str;
    type Params;
    type Result;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientCapabilities {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsCapability {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ClientCapabilities,
    #[serde(rename = "clientInfo")]
    pub client_info: Implementation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(rename = "serverInfo")]
    pub server_info: Implementation,
    pub capabilities: ServerCapabilities,
}

pub struct InitializeRequest;
impl ModelContextProtocolRequest for InitializeRequest {
    const METHOD: &'static str = "initialize";
    type Params = InitializeParams;
    type Result = InitializeResult;
}

pub struct ListToolsRequest;
impl ModelContextProtocolRequest for ListToolsRequest {
    const METHOD: &'static str = "tools/list";
    type Params = Option<()>;
    type Result = ListToolsResult;
}

pub struct CallToolRequest;
impl ModelContextProtocolRequest for CallToolRequest {
    const METHOD: &'static str = "tools/call";
    type Params = CallToolParams;
    type Result = CallToolResult;
}

pub const NOTIFICATION_INITIALIZED: &str = "notifications/initialized";

/// Agent-Coordinator Protocol params — these travel over the *same* framing
/// and the *same* shared transport crate as the tool-server's MCP surface,
/// but are a distinct, smaller method set driven by `mcp-client`'s
/// `AgentClient`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcpInitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcpInitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: serde_json::Value,
}

pub struct AcpInitializeRequest;
impl ModelContextProtocolRequest for AcpInitializeRequest {
    const METHOD: &'static str = "initialize";
    type Params = AcpInitializeParams;
    type Result = AcpInitializeResult;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendUserMessageParams {
    pub message: String,
}

pub struct SendUserMessageRequest;
impl ModelContextProtocolRequest for SendUserMessageRequest {
    const METHOD: &'static str = "sendUserMessage";
    type Params = SendUserMessageParams;
    type Result = ();
}

pub struct CancelSendMessageRequest;
impl ModelContextProtocolRequest for CancelSendMessageRequest {
    const METHOD: &'static str = "cancelSendMessage";
    type Params = Option<()>;
    type Result = ();
}
