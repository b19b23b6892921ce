//! Multi-room Chat Server - Entry Point
//!
//! Parses the config, seeds the room registry and accepts connections.

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use multiroom_chat::{ChatServer, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=multiroom_chat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("multiroom_chat=info")),
        )
        .init();

    let config = Config::parse();

    // Start TCP listener
    let listener = TcpListener::bind(config.addr()).await?;
    info!("Chat Server listening on {}", config.addr());

    let server = ChatServer::from_config(&config);
    info!("Rooms: {}", server.registry().names().join(", "));

    server.run(listener).await;

    Ok(())
}
