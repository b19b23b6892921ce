//! Multi-room Line Chat Server Library
//!
//! A tokio TCP chat server where clients join named rooms and exchange
//! newline-delimited text.
//!
//! # Features
//! - Default room plus configurable seed rooms
//! - `/create`, `/join`, `/leave`, `/switch` room commands
//! - `/members`, `/rooms`, `/current`, `/joinRooms` listings
//! - `/login` display names
//! - Membership in several rooms with one active room
//! - Departure from every room on disconnect
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - Each `Room` is an actor task that owns its membership
//! - `RoomRegistry` is the only shared structure (one mutex)
//! - Each connection has a `handler` task and a writer task
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use multiroom_chat::{ChatServer, ConnectionLimits, RoomRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8888").await.unwrap();
//!     let registry = Arc::new(RoomRegistry::new("default_room", ["room2", "room1"]));
//!
//!     ChatServer::new(registry, ConnectionLimits::default())
//!         .run(listener)
//!         .await;
//! }
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod registry;
pub mod room;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use client::{Client, Member};
pub use command::Command;
pub use config::{Config, ConnectionLimits};
pub use error::{AppError, CommandError, SendError};
pub use handler::{handle_connection, Session, SessionState};
pub use registry::RoomRegistry;
pub use room::{Room, RoomEvent};
pub use server::ChatServer;
pub use types::{ClientId, DEFAULT_ROOM};
