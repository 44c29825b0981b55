// Runner - executes CLI commands

use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use kratos_rendezvous::codec::parse_enode;
use kratos_rendezvous::rpc::{
    Dispatcher, HttpUpstream, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    LocalHandler, Route,
};
use kratos_rendezvous::{NodeId, PeerRegistry, RendezvousConfig, RocksStore, Topic};

use super::{CallCmd, Cli, Commands, InitConfigCmd, PeersCmd, RouteCmd};

/// Load the config file (if any) and apply CLI overrides
pub fn load_config(cli: &Cli) -> anyhow::Result<RendezvousConfig> {
    let config = if cli.config.exists() {
        RendezvousConfig::load(&cli.config)
            .with_context(|| format!("failed to load config {:?}", cli.config))?
    } else {
        warn!("Config file {:?} not found, using defaults", cli.config);
        RendezvousConfig::default()
    };

    let config = config.with_upstream_url(cli.upstream_url.clone());
    config.validate()?;
    Ok(config)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Peers(cmd) => run_peers(cmd, &config, &cli.data_dir),
        Commands::Route(cmd) => {
            run_route(cmd, &config);
            Ok(())
        }
        Commands::Call(cmd) => run_call(cmd, &config).await,
        Commands::InitConfig(cmd) => run_init_config(cmd, &config),
    }
}

fn open_registry(config: &RendezvousConfig, data_dir: &Path) -> anyhow::Result<PeerRegistry<RocksStore>> {
    let path = config.registry_path(data_dir);
    std::fs::create_dir_all(&path)?;
    Ok(PeerRegistry::open(&path, config.registry.options)?)
}

fn run_peers(cmd: &PeersCmd, config: &RendezvousConfig, data_dir: &Path) -> anyhow::Result<()> {
    let registry = open_registry(config, data_dir)?;

    match cmd {
        PeersCmd::Add { topic, enode } => {
            let node = parse_enode(enode).context("invalid enode URL")?;
            registry.add_peer(&node, &Topic::from(topic.as_str()))?;
            info!("Added peer {} to topic {}", node.id.short(), topic);
        }
        PeersCmd::Remove { topic, node_id } => {
            let id: NodeId = node_id.parse().context("invalid node id")?;
            registry.remove_peer(&id, &Topic::from(topic.as_str()))?;
            info!("Removed peer {} from topic {}", id.short(), topic);
        }
        PeersCmd::List { topic, limit } => {
            let limit = limit.unwrap_or(config.registry.default_limit);
            let peers = registry.get_peers_range(&Topic::from(topic.as_str()), limit)?;
            for peer in &peers {
                match kratos_rendezvous::codec::to_enode(peer) {
                    Ok(url) => println!("{}", url),
                    Err(e) => warn!("Skipping peer {}: {}", peer.id.short(), e),
                }
            }
            info!("{} peer(s) for topic {}", peers.len(), topic);
        }
    }

    registry.flush()?;
    Ok(())
}

fn run_route(cmd: &RouteCmd, config: &RendezvousConfig) {
    let router = config.router();
    for method in &cmd.methods {
        let target = match router.route(method) {
            Route::Upstream => "upstream",
            Route::Local => "local",
        };
        println!("{}\t{}", method, target);
    }
}

/// Stand-in for the local node when running from the command line
struct NoLocalNode;

#[async_trait]
impl LocalHandler for NoLocalNode {
    async fn handle(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method))
    }
}

async fn run_call(cmd: &CallCmd, config: &RendezvousConfig) -> anyhow::Result<()> {
    let params: serde_json::Value =
        serde_json::from_str(&cmd.params).context("params must be valid JSON")?;
    let request = JsonRpcRequest::new(JsonRpcId::Number(1), cmd.method.clone(), params);

    let response = match config.upstream.url.as_deref() {
        Some(url) if config.upstream.enabled => {
            let upstream = HttpUpstream::new(url, config.upstream.timeout())?;
            Dispatcher::with_upstream(NoLocalNode, upstream, Arc::new(config.router()))
                .dispatch(request)
                .await
        }
        _ => {
            Dispatcher::<_, HttpUpstream>::local_only(NoLocalNode)
                .dispatch(request)
                .await
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn run_init_config(cmd: &InitConfigCmd, config: &RendezvousConfig) -> anyhow::Result<()> {
    if cmd.output.exists() && !cmd.force {
        anyhow::bail!("{:?} already exists (use --force to overwrite)", cmd.output);
    }
    config.save(&cmd.output)?;
    info!("Configuration written to {:?}", cmd.output);
    Ok(())
}
