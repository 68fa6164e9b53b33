//! A small replicated in-memory key-value store forming a symmetric cluster
//! of peer nodes (see `SPEC_FULL.md`). Clients connect to any node over a
//! line-oriented TCP protocol; writes are routed to a single elected leader
//! and replicated to followers under a selectable consistency mode.

pub mod command;
pub mod error;
pub mod membership;
pub mod node;
pub mod peer;
pub mod replicator;
pub mod server;
pub mod store;

pub use command::ConsistencyMode;
pub use error::NodeError;
pub use node::NodeState;
pub use peer::PeerAddr;
