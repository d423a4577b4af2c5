//! The Tool-Server Runtime: a JSON-RPC stdio peer exposing a closed set of
//! sandboxed file-manipulation tools over the process's own stdin/stdout.

pub mod args;
pub mod content;
pub mod declarations;
pub mod delegate;
pub mod diff;
pub mod error;
pub mod logging;
pub mod sandbox;
pub mod tools;
pub mod validator;

use std::sync::Arc;

use mcp_types::JSONRPCMessage;
use stdio_peer::dispatch_inbound_request;
use stdio_peer::Delegate;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;

use crate::delegate::ToolServerDelegate;

/// Reads one newline-delimited frame at a time from stdin, dispatches it
/// synchronously against `delegate`, writes the reply to stdout and flushes,
/// then repeats. There is deliberately no background reader task here - the
/// component's concurrency model is single-threaded cooperative, unlike the
/// bidirectional `Peer` used by the agent client.
pub async fn run(delegate: Arc<ToolServerDelegate>) -> std::io::Result<()> {
    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let message: JSONRPCMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("malformed inbound frame, shutting down reader: {e}");
                break;
            }
        };

        match message {
            JSONRPCMessage::Request(request) => {
                let reply =
                    dispatch_inbound_request(delegate.as_ref(), request.id, &request.method, request.params).await;
                let mut serialized = serde_json::to_string(&reply).expect("JSONRPCMessage always serializes");
                serialized.push('\n');
                stdout.write_all(serialized.as_bytes()).await?;
                stdout.flush().await?;
            }
            JSONRPCMessage::Notification(notification) => {
                delegate
                    .handle_notification(&notification.method, notification.params)
                    .await;
            }
            other => {
                tracing::warn!("ignoring unexpected inbound frame: {other:?}");
            }
        }
    }

    Ok(())
}
