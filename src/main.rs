mod config;
mod error;
mod node;
mod server;
mod store;

use crate::config::Config;
use crate::node::Node;
use crate::server::ServerConfig;
use crate::store::Registry;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting....");

    let config = Config::from_env();

    match &config.pod_ip {
        Some(ip) => info!("Reporting internal IP {ip}"),
        None => info!("No pod IP set, reporting no node addresses"),
    }

    let registry = Registry::new();
    let node = Node::new(config.pod_ip);

    info!("Binding to {}", config.bind_addr);

    let config = ServerConfig {
        bind_addr: config.bind_addr,
    };

    server::run(config, registry, node).await
}
