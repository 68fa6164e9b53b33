use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use peerkv::node::NodeState;
use peerkv::{server, PeerAddr};

const BIND_HOST: &str = "127.0.0.1";

/// A peer in a symmetric replicated key-value cluster.
#[derive(Parser, Debug)]
struct Opts {
    /// Port this node listens on; also this node's id.
    port: u16,

    /// Sibling peers as `host:port`, known at startup and fixed for the
    /// node's lifetime.
    peers: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();

    let peers = opts
        .peers
        .iter()
        .map(|spec| PeerAddr::parse(spec))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to parse peer list")?;

    let state = Arc::new(NodeState::new(BIND_HOST, opts.port, peers));

    tokio::spawn(peerkv::membership::run(Arc::clone(&state)));

    server::run(state).await.context("connection server exited")?;
    Ok(())
}
