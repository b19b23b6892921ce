//! Server configuration
//!
//! Parsed from the command line with clap.

use clap::builder::RangedU64ValueParser;
use clap::Parser;

use crate::types::DEFAULT_ROOM;

/// Multi-room line chat server
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = 8888)]
    pub port: u16,

    /// Room that `/join` falls back to for unknown names
    #[arg(long, default_value = DEFAULT_ROOM)]
    pub default_room: String,

    /// Rooms registered at startup after the default room (repeatable)
    #[arg(long = "room", default_values_t = [String::from("room2"), String::from("room1")])]
    pub rooms: Vec<String>,

    /// Longest accepted input line in bytes
    #[arg(long, default_value_t = 4096, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_line_length: usize,

    /// Lines buffered per connection before room deliveries are dropped
    #[arg(long, default_value_t = 64, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub outbox_capacity: usize,
}

impl Config {
    /// Address to bind the listener to
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Per-connection limits derived from this config
    pub fn limits(&self) -> ConnectionLimits {
        ConnectionLimits {
            max_line_length: self.max_line_length,
            outbox_capacity: self.outbox_capacity,
        }
    }
}

/// Per-connection resource limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionLimits {
    pub max_line_length: usize,
    pub outbox_capacity: usize,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            max_line_length: 4096,
            outbox_capacity: 64,
        }
    }
}
