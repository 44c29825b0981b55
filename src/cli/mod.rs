// CLI - Command Line Interface for the rendezvous tools
// Principle: each subcommand does one thing against the local registry

pub mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// KratOs Rendezvous - topic peer registry and RPC routing
#[derive(Parser, Debug)]
#[command(name = "kratos-rendezvous")]
#[command(author = "KratOs Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect the topic peer registry and RPC routing of a KratOs light node")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "rendezvous.toml")]
    pub config: PathBuf,

    /// Data directory holding the peer registry
    #[arg(short, long, global = true, default_value = "./data", env = "KRATOS_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Upstream JSON-RPC endpoint (enables upstream mode)
    #[arg(long, global = true, env = "KRATOS_UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", env = "KRATOS_LOG")]
    pub log_level: String,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage stored peers
    #[command(subcommand)]
    Peers(PeersCmd),

    /// Show where each method would execute
    Route(RouteCmd),

    /// Send a JSON-RPC call through the router
    Call(CallCmd),

    /// Write the effective configuration to a file
    InitConfig(InitConfigCmd),
}

/// Peer registry commands
#[derive(Subcommand, Debug)]
pub enum PeersCmd {
    /// Store a peer under a topic
    Add {
        /// Advertisement topic
        #[arg(short, long)]
        topic: String,

        /// Peer enode URL
        enode: String,
    },

    /// Delete a peer from a topic
    Remove {
        /// Advertisement topic
        #[arg(short, long)]
        topic: String,

        /// Hex node id
        node_id: String,
    },

    /// List peers of a topic
    List {
        /// Advertisement topic
        #[arg(short, long)]
        topic: String,

        /// Maximum peers to return (defaults to registry.default_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Route classification
#[derive(Parser, Debug)]
pub struct RouteCmd {
    /// Method names to classify
    #[arg(required = true)]
    pub methods: Vec<String>,
}

/// Single JSON-RPC call
#[derive(Parser, Debug)]
pub struct CallCmd {
    /// Method name
    pub method: String,

    /// Parameters as a JSON array
    #[arg(default_value = "[]")]
    pub params: String,
}

/// Configuration export
#[derive(Parser, Debug)]
pub struct InitConfigCmd {
    /// Output path
    #[arg(default_value = "rendezvous.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
