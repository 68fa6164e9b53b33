use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::node::{send_and_read_with_timeout, NodeState};

/// Heartbeat cycle interval (§4.E).
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Runs the membership task forever: every [`HEARTBEAT_INTERVAL`], pings
/// every configured peer, updates its liveness flag, and recomputes the
/// leader (§4.E). Intended to be spawned once per node as a background
/// `tokio` task.
pub async fn run(state: Arc<NodeState>) {
    loop {
        run_one_cycle(&state).await;
        tokio::time::sleep(HEARTBEAT_INTERVAL).await;
    }
}

async fn run_one_cycle(state: &NodeState) {
    for peer in state.peers.entries() {
        let reachable = send_and_read_with_timeout(&peer.addr.host, peer.addr.port, "PING")
            .await
            .is_ok();
        let was_alive = peer.set_alive(reachable);

        if reachable && !was_alive {
            info!(node_id = state.node_id, peer = peer.addr.port, "RECOVERED");
        } else if !reachable && was_alive {
            info!(node_id = state.node_id, peer = peer.addr.port, "FAILURE");
        }
    }

    elect_leader(state);
}

/// Deterministic election (§4.E, §9): the new leader is the maximum node id
/// among the local alive view (self included). No terms, no voting.
fn elect_leader(state: &NodeState) {
    let new_leader = state
        .peers
        .entries()
        .iter()
        .filter(|p| p.is_alive())
        .map(|p| p.addr.node_id())
        .chain(std::iter::once(state.node_id))
        .max()
        .unwrap_or(state.node_id);

    if state.leader_id() != Some(new_leader) {
        info!(node_id = state.node_id, leader = new_leader, "ELECTION");
    }
    state.set_leader_id(new_leader);
}
