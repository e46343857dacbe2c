use edge_path_bundling::web::server::{start_server_with_config, ServerConfig};
use log::info;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Usage: web_server [port] [static_dir]
    let args: Vec<String> = env::args().collect();
    let defaults = ServerConfig::default();
    let port = args
        .get(1)
        .and_then(|port| port.parse().ok())
        .unwrap_or(defaults.port);
    let static_dir = args.get(2).cloned().unwrap_or(defaults.static_dir.clone());

    let config = ServerConfig {
        port,
        static_dir,
        ..defaults
    };

    info!("Configuration:");
    info!("  Port: {}", config.port);
    info!("  Static files: {}", config.static_dir);
    info!("  CORS enabled: {}", config.enable_cors);
    info!("  Max sessions: {}", config.max_sessions);
    info!("  Max generated nodes: {}", config.max_generated_nodes);

    start_server_with_config(config).await
}
