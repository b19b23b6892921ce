//! Chat server
//!
//! Owns the room registry and runs the accept loop, handing every
//! connection its own handler task.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::{Config, ConnectionLimits};
use crate::handler::handle_connection;
use crate::registry::RoomRegistry;

/// The accept loop plus the state it injects into each connection
pub struct ChatServer {
    registry: Arc<RoomRegistry>,
    limits: ConnectionLimits,
}

impl ChatServer {
    /// Create a server around an existing registry
    pub fn new(registry: Arc<RoomRegistry>, limits: ConnectionLimits) -> Self {
        Self { registry, limits }
    }

    /// Seed the registry from the config and start its room workers
    pub fn from_config(config: &Config) -> Self {
        let registry = RoomRegistry::new(&config.default_room, config.rooms.iter().cloned());
        Self::new(Arc::new(registry), config.limits())
    }

    /// Shared room registry
    pub fn registry(&self) -> Arc<RoomRegistry> {
        self.registry.clone()
    }

    /// Accept connections forever
    ///
    /// Accept errors are logged and skipped; there is no shutdown command.
    pub async fn run(self, listener: TcpListener) {
        info!("ChatServer accepting connections");

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    info!("New connection from {}", addr);
                    let registry = self.registry.clone();
                    let limits = self.limits;

                    // Spawn handler task for each connection
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(stream, addr.to_string(), registry, limits).await
                        {
                            error!("Connection handler error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                }
            }
        }
    }
}
