//! Room actor
//!
//! Each room runs as its own task. The task owns the membership map; everyone
//! else talks to it through the cloneable [`Room`] handle, which only enqueues
//! events.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::client::Member;
use crate::error::{AppError, SendError};
use crate::types::ClientId;

/// Event queue depth; 1 keeps producers in step with the worker
const ROOM_EVENT_BUFFER: usize = 1;

/// Events sent from connection handlers to a room worker
#[derive(Debug)]
pub enum RoomEvent {
    /// Deliver a line to every current member
    Broadcast(String),
    /// Add a member (no-op if present)
    Arrive(Member),
    /// Remove a member (no-op if absent)
    Depart(ClientId),
    /// Reply with a copy of the current members
    Snapshot(oneshot::Sender<Vec<Member>>),
}

/// Handle to a running room
#[derive(Debug, Clone)]
pub struct Room {
    name: Arc<str>,
    events: mpsc::Sender<RoomEvent>,
}

impl Room {
    /// Create a room and start its worker on the current runtime
    pub fn spawn(name: impl Into<String>) -> Self {
        let name: Arc<str> = Arc::from(name.into());
        let (events, receiver) = mpsc::channel(ROOM_EVENT_BUFFER);
        tokio::spawn(RoomWorker::new(name.clone(), receiver).run());
        Self { name, events }
    }

    /// Room name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue a line for every member
    pub async fn broadcast(&self, line: impl Into<String>) -> Result<(), AppError> {
        self.send(RoomEvent::Broadcast(line.into())).await
    }

    /// Queue a member arrival
    pub async fn arrive(&self, member: Member) -> Result<(), AppError> {
        self.send(RoomEvent::Arrive(member)).await
    }

    /// Queue a member departure
    pub async fn depart(&self, id: ClientId) -> Result<(), AppError> {
        self.send(RoomEvent::Depart(id)).await
    }

    /// Current members, as of every event queued before this call
    pub async fn members(&self) -> Result<Vec<Member>, AppError> {
        let (reply, response) = oneshot::channel();
        self.send(RoomEvent::Snapshot(reply)).await?;
        response
            .await
            .map_err(|_| AppError::RoomClosed(self.name.to_string()))
    }

    /// Check if a client is currently a member
    pub async fn contains(&self, id: ClientId) -> Result<bool, AppError> {
        Ok(self.members().await?.iter().any(|m| m.id == id))
    }

    async fn send(&self, event: RoomEvent) -> Result<(), AppError> {
        self.events
            .send(event)
            .await
            .map_err(|_| AppError::RoomClosed(self.name.to_string()))
    }
}

/// The room worker
///
/// Applies events one at a time in queue order. Runs until every `Room`
/// handle is dropped, which the registry never does.
pub(crate) struct RoomWorker {
    name: Arc<str>,
    members: HashMap<ClientId, Member>,
    events: mpsc::Receiver<RoomEvent>,
}

impl RoomWorker {
    pub(crate) fn new(name: Arc<str>, events: mpsc::Receiver<RoomEvent>) -> Self {
        Self {
            name,
            members: HashMap::new(),
            events,
        }
    }

    /// Run the room event loop
    pub(crate) async fn run(mut self) {
        info!("Room {} started", self.name);

        while let Some(event) = self.events.recv().await {
            self.handle_event(event);
        }

        info!("Room {} stopped", self.name);
    }

    /// Process a single event
    pub(crate) fn handle_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Broadcast(line) => self.handle_broadcast(&line),
            RoomEvent::Arrive(member) => {
                debug!("Client {} arrived in {}", member.id, self.name);
                self.members.entry(member.id).or_insert(member);
            }
            RoomEvent::Depart(id) => {
                if self.members.remove(&id).is_some() {
                    debug!("Client {} departed from {}", id, self.name);
                }
            }
            RoomEvent::Snapshot(reply) => {
                let _ = reply.send(self.members.values().cloned().collect());
            }
        }
    }

    fn handle_broadcast(&self, line: &str) {
        for member in self.members.values() {
            match member.deliver(line) {
                Ok(()) => {}
                Err(SendError::ChannelClosed) => {
                    debug!("Skipping closed outbox of {} in {}", member.id, self.name);
                }
                Err(SendError::Full) => {
                    warn!("Outbox of {} is full, dropping line in {}", member.id, self.name);
                }
            }
        }
    }

    #[cfg(test)]
    fn member_ids(&self) -> std::collections::HashSet<ClientId> {
        self.members.keys().copied().collect()
    }
}
