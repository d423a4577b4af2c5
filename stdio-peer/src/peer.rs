use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use mcp_types::error_codes;
use mcp_types::JSONRPCError;
use mcp_types::JSONRPCErrorDetail;
use mcp_types::JSONRPCMessage;
use mcp_types::JSONRPCNotification;
use mcp_types::JSONRPCRequest;
use mcp_types::JSONRPCResponse;
use mcp_types::ModelContextProtocolRequest;
use mcp_types::RequestError;
use mcp_types::RequestId;
use mcp_types::JSONRPC_VERSION;
use serde_json::Value;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::delegate::Delegate;
use crate::error::PeerError;

/// Default deadline for `send_request`, matching the reference ACP client's
/// `threading.Event` wait.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

pub type BoxedReader = Box<dyn AsyncRead + Unpin + Send>;
pub type BoxedWriter = Box<dyn AsyncWrite + Unpin + Send>;

type PendingTable = Arc<Mutex<HashMap<i64, oneshot::Sender<JSONRPCMessage>>>>;

/// The shared bidirectional transport core (C1+C2): one writer task draining
/// an outgoing queue, one reader task demultiplexing inbound frames to either
/// the pending-call table (responses/errors) or the supplied `Delegate`
/// (requests/notifications from the other side).
///
/// Constructed over a pair of already-open streams rather than spawning its
/// own child process - the embedder (e.g. the agent client) owns the child
/// and its lifecycle, and hands this peer the child's stdin/stdout, exactly
/// as `McpClient` does with its own private reader/writer tasks in the
/// reference client, generalized here into a standalone, reusable core.
pub struct Peer {
    pending: PendingTable,
    id_counter: AtomicI64,
    call_timeout: Duration,
    started: AtomicBool,
    outgoing_tx: mpsc::Sender<JSONRPCMessage>,
    outgoing_rx: Mutex<Option<mpsc::Receiver<JSONRPCMessage>>>,
    reader: Mutex<Option<BoxedReader>>,
    writer: Mutex<Option<BoxedWriter>>,
    delegate: Arc<dyn Delegate>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Peer {
    pub fn new(reader: BoxedReader, writer: BoxedWriter, delegate: Arc<dyn Delegate>) -> Self {
        Self::with_call_timeout(reader, writer, delegate, DEFAULT_CALL_TIMEOUT)
    }

    pub fn with_call_timeout(
        reader: BoxedReader,
        writer: BoxedWriter,
        delegate: Arc<dyn Delegate>,
        call_timeout: Duration,
    ) -> Self {
        let (outgoing_tx, outgoing_rx) = mpsc::channel(128);
        Peer {
            pending: Arc::new(Mutex::new(HashMap::new())),
            id_counter: AtomicI64::new(1),
            call_timeout,
            started: AtomicBool::new(false),
            outgoing_tx,
            outgoing_rx: Mutex::new(Some(outgoing_rx)),
            reader: Mutex::new(Some(reader)),
            writer: Mutex::new(Some(writer)),
            delegate,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Launches the reader and writer tasks. Idempotent: a second call is a
    /// no-op, so embedders don't need to track whether they've already
    /// started the peer.
    pub async fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        let writer = self
            .writer
            .lock()
            .await
            .take()
            .expect("start() called twice despite the `started` guard");
        let reader = self
            .reader
            .lock()
            .await
            .take()
            .expect("start() called twice despite the `started` guard");
        let outgoing_rx = self
            .outgoing_rx
            .lock()
            .await
            .take()
            .expect("start() called twice despite the `started` guard");

        let writer_task = tokio::spawn(run_writer(writer, outgoing_rx));
        let reader_task = tokio::spawn(run_reader(
            reader,
            Arc::clone(&self.pending),
            Arc::clone(&self.delegate),
            self.outgoing_tx.clone(),
        ));

        let mut tasks = self.tasks.lock().await;
        tasks.push(writer_task);
        tasks.push(reader_task);
    }

    /// Aborts the reader/writer tasks and fails every still-pending call with
    /// `PeerError::Shutdown`. Idempotent.
    pub async fn stop(&self) {
        let mut tasks = self.tasks.lock().await;
        for task in tasks.drain(..) {
            task.abort();
        }
        let mut pending = self.pending.lock().await;
        for (_, tx) in pending.drain() {
            let _ = tx.send(JSONRPCMessage::Error(JSONRPCError {
                jsonrpc: JSONRPC_VERSION.to_string(),
                id: RequestId(0),
                error: JSONRPCErrorDetail {
                    code: error_codes::INTERNAL_ERROR,
                    message: "peer stopped".to_string(),
                    data: None,
                },
            }));
        }
    }

    fn next_id(&self) -> i64 {
        self.id_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Sends a typed request and awaits its reply, failing with
    /// `PeerError::Timeout` after `call_timeout` elapses. The pending-call
    /// entry is registered *before* the frame is handed to the writer task,
    /// so a reply that races ahead of this call returning can never be
    /// dropped on the floor.
    pub async fn send_request<R>(&self, params: R::Params) -> Result<R::Result, PeerError>
    where
        R: ModelContextProtocolRequest,
        R::Params: serde::Serialize,
        R::Result: serde::de::DeserializeOwned,
    {
        if !self.started.load(Ordering::SeqCst) {
            return Err(PeerError::Shutdown);
        }

        let id = self.next_id();
        let params_value = serde_json::to_value(params).map_err(|e| PeerError::Format(e.to_string()))?;
        let params_value = if params_value.is_null() { None } else { Some(params_value) };

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        let request = JSONRPCMessage::Request(JSONRPCRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: RequestId(id),
            method: R::METHOD.to_string(),
            params: params_value,
        });

        if self.outgoing_tx.send(request).await.is_err() {
            self.pending.lock().await.remove(&id);
            return Err(PeerError::Shutdown);
        }

        let reply = match tokio::time::timeout(self.call_timeout, rx).await {
            Ok(reply) => reply.map_err(|_| PeerError::Shutdown)?,
            Err(_) => {
                // The deadline elapsed: drop the pending-call entry now so a
                // reply that arrives later finds no waiter (per the
                // "removed on deadline" pending-call lifecycle) rather than
                // lingering in the table until some later arrival reaps it.
                self.pending.lock().await.remove(&id);
                return Err(PeerError::Timeout {
                    method: R::METHOD.to_string(),
                    timeout_secs: self.call_timeout.as_secs(),
                });
            }
        };

        match reply {
            JSONRPCMessage::Response(response) => {
                serde_json::from_value(response.result).map_err(|e| PeerError::Format(e.to_string()))
            }
            JSONRPCMessage::Error(error) => Err(PeerError::Request(RequestError::from(error.error))),
            other => Err(PeerError::Format(format!("unexpected reply frame: {other:?}"))),
        }
    }

    pub async fn send_notification(&self, method: &str, params: Option<Value>) -> Result<(), PeerError> {
        if !self.started.load(Ordering::SeqCst) {
            return Err(PeerError::Shutdown);
        }
        let notification = JSONRPCMessage::Notification(JSONRPCNotification {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params,
        });
        self.outgoing_tx
            .send(notification)
            .await
            .map_err(|_| PeerError::Shutdown)
    }
}

async fn run_writer(mut writer: BoxedWriter, mut outgoing_rx: mpsc::Receiver<JSONRPCMessage>) {
    while let Some(message) = outgoing_rx.recv().await {
        let line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("failed to serialize outgoing frame: {e}");
                continue;
            }
        };
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            tracing::error!("failed to write outgoing frame: {e}");
            return;
        }
        if let Err(e) = writer.write_all(b"\n").await {
            tracing::error!("failed to write outgoing frame newline: {e}");
            return;
        }
        if let Err(e) = writer.flush().await {
            tracing::error!("failed to flush outgoing frame: {e}");
            return;
        }
    }
}

async fn run_reader(
    reader: BoxedReader,
    pending: PendingTable,
    delegate: Arc<dyn Delegate>,
    outgoing_tx: mpsc::Sender<JSONRPCMessage>,
) {
    let mut lines = BufReader::new(reader).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                tracing::error!("failed to read inbound line: {e}");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let message: JSONRPCMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("dropping malformed inbound frame: {e}");
                continue;
            }
        };

        match message {
            JSONRPCMessage::Response(response) => {
                dispatch_reply(&pending, response.id, JSONRPCMessage::Response(response)).await;
            }
            JSONRPCMessage::Error(error) => {
                let id = error.id;
                dispatch_reply(&pending, id, JSONRPCMessage::Error(error)).await;
            }
            JSONRPCMessage::Notification(notification) => {
                delegate
                    .handle_notification(&notification.method, notification.params)
                    .await;
            }
            JSONRPCMessage::Request(request) => {
                let reply = crate::dispatch::dispatch_inbound_request(
                    delegate.as_ref(),
                    request.id,
                    &request.method,
                    request.params,
                )
                .await;
                if outgoing_tx.send(reply).await.is_err() {
                    return;
                }
            }
        }
    }
}

async fn dispatch_reply(pending: &PendingTable, id: RequestId, message: JSONRPCMessage) {
    let sender = pending.lock().await.remove(&id.0);
    match sender {
        Some(tx) => {
            let _ = tx.send(message);
        }
        None => tracing::warn!("reply for unknown or already-resolved request id {id}"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mcp_types::ListToolsRequest;
    use mcp_types::ListToolsResult;
    use mcp_types::ToolDeclaration;
    use mcp_types::ToolInputSchema;
    use tokio::io::split;
    use tokio::io::AsyncBufReadExt;
    use tokio::io::AsyncWriteExt;
    use tokio::io::BufReader;

    use super::*;
    use crate::delegate::NullDelegate;

    /// Wires a `Peer` to one end of an in-process duplex pipe; the returned
    /// `(driver_lines, driver_write)` lets the test act as the peer on the
    /// other end, reading the frames the `Peer` sends and writing back
    /// scripted replies - the same role a real child process plays.
    fn wire_peer_with_driver() -> (
        Peer,
        tokio::io::Lines<BufReader<tokio::io::ReadHalf<tokio::io::DuplexStream>>>,
        tokio::io::WriteHalf<tokio::io::DuplexStream>,
    ) {
        wire_peer_with_driver_and_timeout(DEFAULT_CALL_TIMEOUT)
    }

    fn wire_peer_with_driver_and_timeout(
        call_timeout: Duration,
    ) -> (
        Peer,
        tokio::io::Lines<BufReader<tokio::io::ReadHalf<tokio::io::DuplexStream>>>,
        tokio::io::WriteHalf<tokio::io::DuplexStream>,
    ) {
        let (a, b) = tokio::io::duplex(64 * 1024);
        let (a_read, a_write) = split(a);
        let (b_read, b_write) = split(b);

        let peer = Peer::with_call_timeout(Box::new(a_read), Box::new(a_write), Arc::new(NullDelegate), call_timeout);
        let driver_lines = BufReader::new(b_read).lines();
        (peer, driver_lines, b_write)
    }

    fn sample_result() -> ListToolsResult {
        ListToolsResult {
            tools: vec![ToolDeclaration {
                name: "noop".to_string(),
                description: "does nothing".to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties: Default::default(),
                    required: vec![],
                },
            }],
        }
    }

    #[tokio::test]
    async fn round_trips_a_request_and_allocates_increasing_ids() {
        let (peer, mut driver_lines, mut driver_write) = wire_peer_with_driver();
        peer.start().await;

        let driver = tokio::spawn(async move {
            for _ in 0..2 {
                let line = driver_lines.next_line().await.unwrap().unwrap();
                let request: JSONRPCMessage = serde_json::from_str(&line).unwrap();
                let JSONRPCMessage::Request(request) = request else {
                    panic!("expected a request frame");
                };
                let reply = JSONRPCMessage::Response(JSONRPCResponse {
                    jsonrpc: JSONRPC_VERSION.to_string(),
                    id: request.id,
                    result: serde_json::to_value(sample_result()).unwrap(),
                });
                let mut line = serde_json::to_string(&reply).unwrap();
                line.push('\n');
                driver_write.write_all(line.as_bytes()).await.unwrap();
            }
        });

        let first = peer.send_request::<ListToolsRequest>(None).await.unwrap();
        let second = peer.send_request::<ListToolsRequest>(None).await.unwrap();
        assert_eq!(first.tools.len(), 1);
        assert_eq!(second.tools.len(), 1);
        assert_eq!(peer.id_counter.load(Ordering::SeqCst), 3);

        driver.await.unwrap();
    }

    #[tokio::test]
    async fn times_out_when_no_reply_arrives() {
        let (peer, _driver_lines, _driver_write) = wire_peer_with_driver_and_timeout(Duration::from_millis(50));
        peer.start().await;

        let err = peer.send_request::<ListToolsRequest>(None).await.unwrap_err();
        assert!(matches!(err, PeerError::Timeout { .. }));
    }

    #[tokio::test]
    async fn removes_the_pending_entry_once_the_deadline_elapses() {
        let (peer, _driver_lines, _driver_write) = wire_peer_with_driver_and_timeout(Duration::from_millis(50));
        peer.start().await;

        let err = peer.send_request::<ListToolsRequest>(None).await.unwrap_err();
        assert!(matches!(err, PeerError::Timeout { .. }));
        assert!(peer.pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn delivers_out_of_order_responses_to_the_right_caller() {
        let (peer, mut driver_lines, mut driver_write) = wire_peer_with_driver();
        peer.start().await;
        let peer = Arc::new(peer);

        let driver = tokio::spawn(async move {
            let mut requests = Vec::new();
            for _ in 0..3 {
                let line = driver_lines.next_line().await.unwrap().unwrap();
                let JSONRPCMessage::Request(request) = serde_json::from_str(&line).unwrap() else {
                    panic!("expected a request frame");
                };
                requests.push(request.id);
            }
            // Reply out of order: third request first.
            for id in [requests[2], requests[0], requests[1]] {
                let reply = JSONRPCMessage::Response(JSONRPCResponse {
                    jsonrpc: JSONRPC_VERSION.to_string(),
                    id,
                    result: serde_json::to_value(sample_result()).unwrap(),
                });
                let mut line = serde_json::to_string(&reply).unwrap();
                line.push('\n');
                driver_write.write_all(line.as_bytes()).await.unwrap();
            }
        });

        let (r1, r2, r3) = tokio::join!(
            peer.send_request::<ListToolsRequest>(None),
            peer.send_request::<ListToolsRequest>(None),
            peer.send_request::<ListToolsRequest>(None),
        );
        assert!(r1.is_ok());
        assert!(r2.is_ok());
        assert!(r3.is_ok());

        driver.await.unwrap();
    }
}
