//! Room registry
//!
//! The one structure shared by every connection handler. Append-only: rooms
//! are created but never removed, and duplicate names are allowed (lookups
//! return the first match).

use parking_lot::Mutex;
use tracing::info;

use crate::error::AppError;
use crate::room::Room;
use crate::types::ClientId;

/// Directory of all rooms in registration order
#[derive(Debug)]
pub struct RoomRegistry {
    default_room: Room,
    rooms: Mutex<Vec<Room>>,
}

impl RoomRegistry {
    /// Create a registry seeded with the default room followed by `seeds`
    ///
    /// Starts one worker per room, so it must be called inside a runtime.
    pub fn new<I, S>(default_room: &str, seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let default_room = Room::spawn(default_room);
        let mut rooms = vec![default_room.clone()];
        rooms.extend(seeds.into_iter().map(Room::spawn));

        info!("Room registry seeded with {} rooms", rooms.len());

        Self {
            default_room,
            rooms: Mutex::new(rooms),
        }
    }

    /// First room with the given name
    pub fn lookup(&self, name: &str) -> Option<Room> {
        self.rooms.lock().iter().find(|r| r.name() == name).cloned()
    }

    /// Start a new room and append it; never rejects a duplicate name
    pub fn create(&self, name: &str) -> Room {
        let room = Room::spawn(name);
        self.rooms.lock().push(room.clone());
        info!("Room {} created", name);
        room
    }

    /// Room used when `/join` names an unknown room
    pub fn default_room(&self) -> Room {
        self.default_room.clone()
    }

    /// Snapshot of all room names in registry order
    pub fn names(&self) -> Vec<String> {
        self.rooms
            .lock()
            .iter()
            .map(|r| r.name().to_string())
            .collect()
    }

    /// Check if the client is a member of a room called `name`
    ///
    /// Best effort: a concurrent Arrive/Depart from another producer may land
    /// either side of the check.
    pub async fn already_joined(&self, name: &str, client_id: ClientId) -> Result<bool, AppError> {
        // Clone out of the lock before awaiting on the rooms
        let candidates: Vec<Room> = self
            .rooms
            .lock()
            .iter()
            .filter(|r| r.name() == name)
            .cloned()
            .collect();

        for room in candidates {
            if room.contains(client_id).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::client::Client;
    use crate::types::DEFAULT_ROOM;

    fn registry() -> RoomRegistry {
        RoomRegistry::new(DEFAULT_ROOM, ["room2", "room1"])
    }

    #[tokio::test]
    async fn test_seeded_names_in_order() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["default_room", "room2", "room1"]);
        assert_eq!(registry.default_room().name(), "default_room");
    }

    #[tokio::test]
    async fn test_create_then_lookup() {
        let registry = registry();
        assert!(registry.lookup("foo").is_none());

        registry.create("foo");

        assert_eq!(registry.lookup("foo").map(|r| r.name().to_string()).as_deref(), Some("foo"));
        assert_eq!(registry.names().last().map(String::as_str), Some("foo"));
    }

    #[tokio::test]
    async fn test_duplicate_names_lookup_first() {
        let registry = registry();
        let (tx, _rx) = mpsc::channel(8);
        let alice = Client::new(ClientId::new(), "alice", tx);

        let first = registry.lookup("room1").unwrap();
        let duplicate = registry.create("room1");
        duplicate.arrive(alice.member()).await.unwrap();

        assert_eq!(registry.names().iter().filter(|n| *n == "room1").count(), 2);
        // lookup still resolves to the seeded room
        assert!(!registry.lookup("room1").unwrap().contains(alice.id).await.unwrap());
        assert!(!first.contains(alice.id).await.unwrap());
        // but membership in any same-named room counts as joined
        assert!(registry.already_joined("room1", alice.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_already_joined_survives_rename() {
        let registry = registry();
        let (tx, _rx) = mpsc::channel(8);
        let alice = Client::new(ClientId::new(), "user1", tx);

        registry.lookup("room1").unwrap().arrive(alice.member()).await.unwrap();

        assert!(registry.already_joined("room1", alice.id).await.unwrap());
        assert!(!registry.already_joined("room2", alice.id).await.unwrap());

        alice.rename("user11");

        assert!(registry.already_joined("room1", alice.id).await.unwrap());
        assert!(!registry.already_joined("room2", alice.id).await.unwrap());
        assert!(!registry.already_joined("missing", alice.id).await.unwrap());
    }
}
