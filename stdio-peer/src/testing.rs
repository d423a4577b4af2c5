//! A synchronous peer variant for integration tests against canned scripts:
//! `send_request` writes the frame and then reads the very next line off the
//! same stream itself, with no background reader task and no pending-call
//! table. This mirrors the reference ACP client's test-mode code path, which
//! skips the `threading.Event` wait and reads the reply inline because the
//! test double writes its response synchronously and in order.
//!
//! Only suitable for tests: a real peer may interleave notifications or
//! out-of-order replies, which `ScriptedPeer` does not attempt to handle.

use mcp_types::JSONRPCMessage;
use mcp_types::JSONRPCRequest;
use mcp_types::ModelContextProtocolRequest;
use mcp_types::RequestId;
use mcp_types::JSONRPC_VERSION;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;

use crate::error::PeerError;
use crate::peer::BoxedReader;
use crate::peer::BoxedWriter;

pub struct ScriptedPeer {
    reader: BufReader<BoxedReader>,
    writer: BoxedWriter,
    next_id: i64,
}

impl ScriptedPeer {
    pub fn new(reader: BoxedReader, writer: BoxedWriter) -> Self {
        ScriptedPeer {
            reader: BufReader::new(reader),
            writer,
            next_id: 1,
        }
    }

    pub async fn send_request<R>(&mut self, params: R::Params) -> Result<R::Result, PeerError>
    where
        R: ModelContextProtocolRequest,
        R::Params: serde::Serialize,
        R::Result: serde::de::DeserializeOwned,
    {
        let id = self.next_id;
        self.next_id += 1;

        let params_value = serde_json::to_value(params).map_err(|e| PeerError::Format(e.to_string()))?;
        let params_value = if params_value.is_null() { None } else { Some(params_value) };

        let request = JSONRPCRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: RequestId(id),
            method: R::METHOD.to_string(),
            params: params_value,
        };
        let line = serde_json::to_string(&JSONRPCMessage::Request(request))
            .map_err(|e| PeerError::Format(e.to_string()))?;
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        let mut reply_line = String::new();
        let bytes_read = self.reader.read_line(&mut reply_line).await?;
        if bytes_read == 0 {
            return Err(PeerError::Shutdown);
        }

        let reply: JSONRPCMessage =
            serde_json::from_str(reply_line.trim_end()).map_err(|e| PeerError::Format(e.to_string()))?;

        match reply {
            JSONRPCMessage::Response(response) => {
                serde_json::from_value(response.result).map_err(|e| PeerError::Format(e.to_string()))
            }
            JSONRPCMessage::Error(error) => Err(PeerError::Request(error.error.into())),
            other => Err(PeerError::Format(format!("unexpected reply frame: {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use mcp_types::CallToolParams;
    use mcp_types::CallToolRequest;
    use mcp_types::CallToolResult;

    use super::*;

    #[tokio::test]
    async fn round_trips_a_scripted_call() {
        let canned_reply = serde_json::to_vec(&JSONRPCMessage::Response(mcp_types::JSONRPCResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: RequestId(1),
            result: serde_json::to_value(CallToolResult::text("ok")).unwrap(),
        }))
        .unwrap();
        let mut reply_with_newline = canned_reply;
        reply_with_newline.push(b'\n');

        let reader: BoxedReader = Box::new(std::io::Cursor::new(reply_with_newline));
        let writer: BoxedWriter = Box::new(Vec::new());
        let mut peer = ScriptedPeer::new(reader, writer);

        let result = peer
            .send_request::<CallToolRequest>(CallToolParams {
                name: "read_from_file".to_string(),
                arguments: serde_json::Map::new(),
            })
            .await
            .unwrap();

        assert_eq!(result.content.len(), 1);
    }
}
