use std::sync::Arc;
use std::time::Duration;

use mcp_types::AcpInitializeParams;
use mcp_types::AcpInitializeRequest;
use mcp_types::AcpInitializeResult;
use mcp_types::CancelSendMessageRequest;
use mcp_types::SendUserMessageParams;
use mcp_types::SendUserMessageRequest;
use stdio_peer::ChildProcess;
use stdio_peer::Delegate;
use stdio_peer::Peer;
use stdio_peer::PeerError;

/// Lifecycle-manages an external agent process and speaks the
/// Agent-Coordinator Protocol to it: a small, fixed outbound surface
/// (`initialize`, `sendUserMessage`, `cancelSendMessage`) plus an inbound
/// surface answered by the embedder's `delegate` (workspace queries,
/// user-input prompts the agent asks back of us).
///
/// Built the same way the reference MCP client spawns and owns its child,
/// generalized onto the shared `Peer` transport so this crate carries none
/// of its own reader/writer/pending-table logic.
pub struct AgentClient {
    peer: Peer,
    child: ChildProcess,
}

impl AgentClient {
    /// Spawns `args[0]` (the agent executable) with the rest as arguments,
    /// wires a `Peer` over its stdio, and starts the reader. `delegate`
    /// answers whatever the agent calls back with.
    pub async fn start(args: &[String], delegate: Arc<dyn Delegate>) -> std::io::Result<Self> {
        let (child, stdin, stdout) = ChildProcess::spawn(args)?;
        let peer = Peer::new(Box::new(stdout), Box::new(stdin), delegate);
        peer.start().await;
        Ok(AgentClient { peer, child })
    }

    /// Same as `start`, but with a non-default outbound call timeout -
    /// useful for tests that want a tighter timeout than the protocol
    /// default of 5 seconds.
    pub async fn start_with_timeout(
        args: &[String],
        delegate: Arc<dyn Delegate>,
        call_timeout: Duration,
    ) -> std::io::Result<Self> {
        let (child, stdin, stdout) = ChildProcess::spawn(args)?;
        let peer = Peer::with_call_timeout(Box::new(stdout), Box::new(stdin), delegate, call_timeout);
        peer.start().await;
        Ok(AgentClient { peer, child })
    }

    pub async fn initialize(&self, protocol_version: impl Into<String>) -> Result<AcpInitializeResult, PeerError> {
        self.peer
            .send_request::<AcpInitializeRequest>(AcpInitializeParams {
                protocol_version: protocol_version.into(),
            })
            .await
    }

    pub async fn send_user_message(&self, message: impl Into<String>) -> Result<(), PeerError> {
        self.peer
            .send_request::<SendUserMessageRequest>(SendUserMessageParams { message: message.into() })
            .await
    }

    pub async fn cancel_send_message(&self) -> Result<(), PeerError> {
        self.peer.send_request::<CancelSendMessageRequest>(None).await
    }

    /// Stops the peer, terminates the agent child (SIGTERM then SIGKILL on
    /// timeout), and waits for it to exit.
    pub async fn stop(&mut self) {
        self.peer.stop().await;
        self.child.terminate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stdio_peer::NullDelegate;

    /// Spawns a real child process (a tiny shell script standing in for an
    /// agent) rather than mocking the transport, matching the reference
    /// client's own preference for exercising the actual stdio plumbing.
    fn scripted_agent_args() -> Vec<String> {
        let script = r#"
read -r line
id=$(printf '%s' "$line" | sed -n 's/.*"id":\([0-9]*\).*/\1/p')
printf '{"jsonrpc":"2.0","id":%s,"result":{"protocolVersion":"2024-11-05","capabilities":{}}}\n' "$id"
"#;
        vec!["/bin/sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn initializes_against_a_real_child_process() {
        let args = scripted_agent_args();
        let mut client = AgentClient::start_with_timeout(
            &args,
            Arc::new(NullDelegate),
            Duration::from_secs(2),
        )
        .await
        .expect("spawn scripted agent");

        let result = client.initialize("2024-11-05").await.expect("initialize");
        assert_eq!(result.protocol_version, "2024-11-05");

        client.stop().await;
    }

    #[tokio::test]
    async fn times_out_when_the_child_never_replies() {
        let args = vec!["/bin/sh".to_string(), "-c".to_string(), "sleep 5".to_string()];
        let mut client = AgentClient::start_with_timeout(
            &args,
            Arc::new(NullDelegate),
            Duration::from_millis(100),
        )
        .await
        .expect("spawn silent agent");

        let err = client.initialize("2024-11-05").await.unwrap_err();
        assert!(matches!(err, PeerError::Timeout { .. }));

        client.stop().await;
    }
}
