use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::command::{parse_command, Command, ConsistencyMode};
use crate::peer::{PeerAddr, PeerTable};
use crate::replicator::replicate;
use crate::store::Store;

/// Network round-trip budget for outbound heartbeat, replication, and
/// leader-forward sockets (§4.D, §4.E). Not applied to inbound client reads
/// (§5: "No client read is given a timeout").
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(2);

/// The owner struct for all shared node state (§9): the store needs
/// exclusive access; `leader_id` and `consistency_mode` are word-sized and
/// use lock-free atomics; the peer table owns its own per-entry atomics.
pub struct NodeState {
    pub node_id: u16,
    pub host: String,
    pub store: Store,
    pub peers: PeerTable,
    leader_id: AtomicI32,
    consistency_mode: AtomicU8,
}

const NO_LEADER: i32 = -1;

impl NodeState {
    pub fn new(host: impl Into<String>, node_id: u16, peer_addrs: Vec<PeerAddr>) -> Self {
        Self {
            node_id,
            host: host.into(),
            store: Store::new(),
            peers: PeerTable::new(peer_addrs),
            leader_id: AtomicI32::new(NO_LEADER),
            consistency_mode: AtomicU8::new(ConsistencyMode::Eventual.to_u8()),
        }
    }

    pub fn leader_id(&self) -> Option<u16> {
        match self.leader_id.load(Ordering::Relaxed) {
            NO_LEADER => None,
            id => Some(id as u16),
        }
    }

    pub fn set_leader_id(&self, leader: u16) {
        self.leader_id.store(leader as i32, Ordering::Relaxed);
    }

    pub fn consistency_mode(&self) -> ConsistencyMode {
        ConsistencyMode::from_u8(self.consistency_mode.load(Ordering::Relaxed))
    }

    pub fn set_consistency_mode(&self, mode: ConsistencyMode) {
        self.consistency_mode.store(mode.to_u8(), Ordering::Relaxed);
    }

    pub fn is_leader(&self) -> bool {
        self.leader_id() == Some(self.node_id)
    }
}

/// Interprets one already-parsed command line against the current node
/// state (§4.C) and returns the response string, always ending in `\n`.
pub async fn handle_line(state: &NodeState, line: &str) -> String {
    match parse_command(line) {
        Command::Ping => "PONG\n".to_string(),
        Command::Leader => match state.leader_id() {
            Some(id) => format!("LEADER {id}\n"),
            None => "LEADER None\n".to_string(),
        },
        Command::Consistency(raw_mode) => match ConsistencyMode::parse(&raw_mode) {
            Some(mode) => {
                state.set_consistency_mode(mode);
                format!("OK: consistency set to {}\n", mode.as_str())
            }
            None => "ERROR: invalid consistency mode\n".to_string(),
        },
        Command::Get(key) => match state.store.get(&key) {
            Some(value) => format!("VALUE: {value}\n"),
            None => "ERROR: Key not found\n".to_string(),
        },
        Command::Set(key, value) => handle_set(state, line, key, value).await,
        Command::ReplSet(key, value) => {
            state.store.put(key, value);
            "ACK\n".to_string()
        }
        Command::InvalidSet => "ERROR: Invalid SET\n".to_string(),
        Command::Unknown => "ERROR: Invalid command\n".to_string(),
    }
}

/// The write path (§4.C "Write path (SET)"). Non-leaders always forward,
/// never serve locally, so there is a single write ordering point (§4.C
/// "Design choices").
async fn handle_set(state: &NodeState, raw_line: &str, key: String, value: String) -> String {
    if !state.is_leader() {
        return forward_to_leader(state, raw_line).await;
    }

    // The leader applies locally *before* checking quorum (§9 Open
    // Questions): under `strong` mode this can leave the leader holding a
    // value the cluster rejected. Preserved deliberately, not fixed.
    state.store.put(key.clone(), value.clone());

    let mode = state.consistency_mode();
    let outcome = replicate(state, &key, &value, mode).await;

    if mode == ConsistencyMode::Strong && !outcome.quorum_ok() {
        "FAIL: quorum not reached\n".to_string()
    } else {
        format!("OK: {key} set by leader {}\n", state.node_id)
    }
}

async fn forward_to_leader(state: &NodeState, raw_line: &str) -> String {
    let leader_id = match state.leader_id() {
        Some(id) => id,
        None => return "ERROR: Leader unavailable\n".to_string(),
    };

    let leader_addr = if leader_id == state.node_id {
        (state.host.clone(), state.node_id)
    } else {
        match state.peers.find_by_node_id(leader_id) {
            Some(peer) => peer.addr.socket_addr(),
            None => return "ERROR: Leader unavailable\n".to_string(),
        }
    };

    match send_and_read(&leader_addr.0, leader_addr.1, raw_line).await {
        Ok(response) => response,
        Err(err) => {
            warn!(leader_id, error = %err, "failed to forward SET to leader");
            "ERROR: Leader unavailable\n".to_string()
        }
    }
}

/// Opens one outbound connection, sends `payload`, reads one response, and
/// closes the socket on every exit path (§5 "Resource policy").
pub async fn send_and_read(host: &str, port: u16, payload: &str) -> std::io::Result<String> {
    let mut stream = TcpStream::connect((host, port)).await?;
    stream.write_all(payload.as_bytes()).await?;

    let mut buf = [0u8; 1024];
    let n = stream.read(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf[..n]).to_string())
}

/// Same as [`send_and_read`] but bounded by [`NETWORK_TIMEOUT`], for the
/// replicator and membership heartbeats (§4.D, §4.E).
pub async fn send_and_read_with_timeout(
    host: &str,
    port: u16,
    payload: &str,
) -> std::io::Result<String> {
    match timeout(NETWORK_TIMEOUT, send_and_read(host, port, payload)).await {
        Ok(result) => result,
        Err(_) => {
            debug!(host, port, "network timeout");
            Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"))
        }
    }
}
