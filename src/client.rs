//! Client struct definition
//!
//! Represents a connected client with its identity, joined rooms and outbox,
//! plus the `Member` record rooms keep for each participant.

use std::collections::BTreeSet;

use tokio::sync::{mpsc, watch};

use crate::error::SendError;
use crate::types::ClientId;

/// Connected client information
///
/// Owned by the connection handler; nothing else mutates it. Rooms only see
/// the `Member` handles produced by [`Client::member`].
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this client
    pub id: ClientId,
    /// Display name, shared with every `Member` handed to a room
    name: watch::Sender<String>,
    /// Names of the rooms this client is a member of
    joined_rooms: BTreeSet<String>,
    /// Server → Client line channel
    outbox: mpsc::Sender<String>,
}

impl Client {
    /// Create a new client with the given ID, initial name and outbox
    pub fn new(id: ClientId, name: impl Into<String>, outbox: mpsc::Sender<String>) -> Self {
        let (name, _) = watch::channel(name.into());
        Self {
            id,
            name,
            joined_rooms: BTreeSet::new(),
            outbox,
        }
    }

    /// Current display name
    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    /// Replace the display name
    ///
    /// Rooms holding a `Member` for this client see the new name immediately.
    pub fn rename(&self, name: impl Into<String>) {
        self.name.send_replace(name.into());
    }

    /// Build the membership record a room stores for this client
    pub fn member(&self) -> Member {
        Member {
            id: self.id,
            name: self.name.subscribe(),
            outbox: self.outbox.clone(),
        }
    }

    /// Send a line to this client, waiting for outbox capacity
    ///
    /// Returns an error if the channel is closed (writer ended).
    pub async fn send(&self, line: impl Into<String>) -> Result<(), SendError> {
        self.outbox
            .send(line.into())
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Record a joined room
    pub fn join_room(&mut self, room: &str) {
        self.joined_rooms.insert(room.to_string());
    }

    /// Forget a joined room
    pub fn leave_room(&mut self, room: &str) {
        self.joined_rooms.remove(room);
    }

    /// Check if the client has joined the named room
    pub fn has_joined(&self, room: &str) -> bool {
        self.joined_rooms.contains(room)
    }

    /// Joined room names in sorted order
    pub fn joined_rooms(&self) -> impl Iterator<Item = &str> {
        self.joined_rooms.iter().map(String::as_str)
    }

    /// Drain the joined room set (used on disconnect)
    pub fn take_joined_rooms(&mut self) -> BTreeSet<String> {
        std::mem::take(&mut self.joined_rooms)
    }
}

/// A client as seen by a room
///
/// Keyed by `id`; the outbox is reached through this record rather than being
/// the identity itself.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: ClientId,
    name: watch::Receiver<String>,
    outbox: mpsc::Sender<String>,
}

impl Member {
    /// Current display name of the client
    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    /// Non-blocking delivery used by room fan-out
    pub fn deliver(&self, line: &str) -> Result<(), SendError> {
        self.outbox.try_send(line.to_string()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::Full,
            mpsc::error::TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let (tx, _rx) = mpsc::channel(32);
        let client = Client::new(ClientId::new(), "127.0.0.1:5000", tx);

        assert_eq!(client.name(), "127.0.0.1:5000");
        assert_eq!(client.joined_rooms().count(), 0);
    }

    #[tokio::test]
    async fn test_rename_visible_through_member() {
        let (tx, _rx) = mpsc::channel(32);
        let client = Client::new(ClientId::new(), "peer", tx);
        let member = client.member();

        client.rename("alice");

        assert_eq!(client.name(), "alice");
        assert_eq!(member.name(), "alice");
        assert_eq!(member.id, client.id);
    }

    #[tokio::test]
    async fn test_joined_rooms_sorted() {
        let (tx, _rx) = mpsc::channel(32);
        let mut client = Client::new(ClientId::new(), "peer", tx);

        client.join_room("room2");
        client.join_room("room1");
        client.join_room("room2");

        assert!(client.has_joined("room1"));
        assert_eq!(client.joined_rooms().collect::<Vec<_>>(), vec!["room1", "room2"]);

        client.leave_room("room1");
        assert!(!client.has_joined("room1"));
    }

    #[tokio::test]
    async fn test_send_reaches_outbox() {
        let (tx, mut rx) = mpsc::channel(32);
        let client = Client::new(ClientId::new(), "peer", tx);

        client.send("hello").await.unwrap();

        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_deliver_reports_closed_and_full() {
        let (tx, rx) = mpsc::channel(1);
        let client = Client::new(ClientId::new(), "peer", tx);
        let member = client.member();

        assert_eq!(member.deliver("one"), Ok(()));
        assert_eq!(member.deliver("two"), Err(SendError::Full));

        drop(rx);
        assert_eq!(member.deliver("three"), Err(SendError::ChannelClosed));
        assert_eq!(client.send("four").await, Err(SendError::ChannelClosed));
    }
}
