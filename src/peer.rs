use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::NodeError;

/// A sibling address known at startup, parsed from a `host:port` CLI token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAddr {
    pub host: String,
    pub port: u16,
}

impl PeerAddr {
    /// `node_id` is a peer's port, per §3.
    pub fn node_id(&self) -> u16 {
        self.port
    }

    pub fn socket_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    /// Parses a single `host:port` spec, e.g. `127.0.0.1:5001`.
    pub fn parse(spec: &str) -> Result<Self, NodeError> {
        let (host, port) = spec.rsplit_once(':').ok_or_else(|| NodeError::MalformedPeerSpec {
            spec: spec.to_string(),
        })?;
        if host.is_empty() {
            return Err(NodeError::MalformedPeerSpec {
                spec: spec.to_string(),
            });
        }
        let port: u16 = port
            .parse()
            .map_err(|source| NodeError::MalformedPeerPort {
                spec: spec.to_string(),
                source,
            })?;
        Ok(PeerAddr {
            host: host.to_string(),
            port,
        })
    }
}

/// One entry in the peer table: a fixed address plus a mutable liveness flag.
///
/// The flag is written only by the membership task (§4.E) and read by the
/// replicator and command handler; a plain atomic is enough synchronization
/// since no cross-peer consistency is required (§5).
pub struct PeerEntry {
    pub addr: PeerAddr,
    alive: AtomicBool,
}

impl PeerEntry {
    fn new(addr: PeerAddr) -> Self {
        Self {
            addr,
            alive: AtomicBool::new(true),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    pub fn set_alive(&self, alive: bool) -> bool {
        self.alive.swap(alive, Ordering::Relaxed)
    }
}

/// The node's startup peer set. Immutable membership: entries are never
/// added or removed after construction (§3 invariant on `peer_status`).
pub struct PeerTable {
    entries: Vec<PeerEntry>,
}

impl PeerTable {
    pub fn new(addrs: Vec<PeerAddr>) -> Self {
        Self {
            entries: addrs.into_iter().map(PeerEntry::new).collect(),
        }
    }

    pub fn entries(&self) -> &[PeerEntry] {
        &self.entries
    }

    pub fn find_by_node_id(&self, node_id: u16) -> Option<&PeerEntry> {
        self.entries.iter().find(|p| p.addr.node_id() == node_id)
    }
}
