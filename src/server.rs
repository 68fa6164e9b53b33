use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

use crate::error::NodeError;
use crate::node::{handle_line, NodeState};

/// Binds `host:port` and accepts connections forever, spawning one
/// independent worker per client (§4.B). The bind step is the only fatal
/// failure in the node (§7).
pub async fn run(state: Arc<NodeState>) -> Result<(), NodeError> {
    let listener = TcpListener::bind((state.host.as_str(), state.node_id))
        .await
        .map_err(|source| NodeError::Bind {
            host: state.host.clone(),
            port: state.node_id,
            source,
        })?;

    info!(node_id = state.node_id, host = %state.host, "listening");

    loop {
        let (socket, peer_addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                debug!(error = %err, "accept failed, continuing");
                continue;
            }
        };
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            debug!(%peer_addr, "client connected");
            serve_client(&state, socket).await;
            debug!(%peer_addr, "client disconnected");
        });
    }
}

/// One worker's loop (§4.B): reads a single OS-delivered chunk (up to 1024
/// bytes) as a textual command, strips trailing whitespace, dispatches it,
/// and writes back the response. EOF or any I/O error ends the worker.
async fn serve_client(state: &NodeState, mut socket: TcpStream) {
    let mut buf = [0u8; 1024];
    loop {
        let n = match socket.read(&mut buf).await {
            Ok(0) => return, // EOF
            Ok(n) => n,
            Err(_) => return,
        };

        let line = String::from_utf8_lossy(&buf[..n]);
        let line = line.trim_end();

        let response = handle_line(state, line).await;

        if socket.write_all(response.as_bytes()).await.is_err() {
            return;
        }
    }
}
