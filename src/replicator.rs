use tracing::debug;

use crate::command::ConsistencyMode;
use crate::node::{send_and_read_with_timeout, NodeState};

/// Result of one replication round for a single `(key, value)` write.
pub struct ReplicationOutcome {
    pub acks: usize,
    pub required: usize,
    mode: ConsistencyMode,
}

impl ReplicationOutcome {
    /// `strong` mode requires a strict majority; `eventual` mode is always
    /// considered satisfied regardless of ack count (§4.D).
    pub fn quorum_ok(&self) -> bool {
        match self.mode {
            ConsistencyMode::Strong => self.acks >= self.required,
            ConsistencyMode::Eventual => true,
        }
    }
}

/// Strict-majority quorum size including the leader's own self-ack.
pub fn required_acks(total_nodes: usize) -> usize {
    total_nodes / 2 + 1
}

/// Fans a write out to every peer currently marked *up* (§4.D). Fan-out is
/// sequential, matching the minimal design; a parallel fan-out is a
/// permitted optimization as long as ack counting and the per-peer 2s bound
/// are preserved.
///
/// Peers marked down are skipped entirely and this never mutates liveness —
/// heartbeats alone own `peer_status` (§4.D "Peers marked down...").
pub async fn replicate(
    state: &NodeState,
    key: &str,
    value: &str,
    mode: ConsistencyMode,
) -> ReplicationOutcome {
    let total_nodes = state.peers.entries().len() + 1;
    let required = required_acks(total_nodes);
    let mut acks = 1; // the leader's own local apply

    let payload = format!("REPL_SET {key} {value}");
    for peer in state.peers.entries() {
        if !peer.is_alive() {
            continue;
        }
        match send_and_read_with_timeout(&peer.addr.host, peer.addr.port, &payload).await {
            Ok(response) if response.starts_with("ACK") => acks += 1,
            Ok(response) => debug!(peer = peer.addr.port, response, "peer replied without ACK"),
            Err(err) => debug!(peer = peer.addr.port, error = %err, "replication to peer failed"),
        }
    }

    ReplicationOutcome {
        acks,
        required,
        mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_acks_matches_strict_majority_formula() {
        assert_eq!(required_acks(1), 1);
        assert_eq!(required_acks(2), 2);
        assert_eq!(required_acks(3), 2);
        assert_eq!(required_acks(5), 3);
    }

    #[test]
    fn eventual_mode_is_always_ok_regardless_of_acks() {
        let outcome = ReplicationOutcome {
            acks: 0,
            required: 2,
            mode: ConsistencyMode::Eventual,
        };
        assert!(outcome.quorum_ok());
    }

    #[test]
    fn strong_mode_requires_acks_to_meet_required() {
        let short = ReplicationOutcome {
            acks: 1,
            required: 2,
            mode: ConsistencyMode::Strong,
        };
        assert!(!short.quorum_ok());

        let met = ReplicationOutcome {
            acks: 2,
            required: 2,
            mode: ConsistencyMode::Strong,
        };
        assert!(met.quorum_ok());
    }
}
