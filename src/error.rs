use std::num::ParseIntError;

/// Domain errors surfaced to the binary entry point at startup.
///
/// Everything past startup is handled locally (§7 of the design: nothing in
/// the node is fatal at runtime) so this enum only needs to cover the one
/// fatal phase.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("malformed peer spec {spec:?}: expected host:port")]
    MalformedPeerSpec { spec: String },

    #[error("malformed peer port in {spec:?}")]
    MalformedPeerPort {
        spec: String,
        #[source]
        source: ParseIntError,
    },

    #[error("failed to bind {host}:{port}")]
    Bind {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
}
