//! Basic type definitions for the chat server
//!
//! Provides the `ClientId` newtype and the server-wide defaults.

use uuid::Uuid;

/// Name of the room clients fall back to when `/join` names an unknown room
pub const DEFAULT_ROOM: &str = "default_room";

/// Unique client identifier (newtype pattern)
///
/// Wraps a UUID v4. Stays the same for the whole connection, even when the
/// client changes its display name, so room membership keys on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Create a new random client ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
