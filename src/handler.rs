//! Connection handler
//!
//! Handles individual client connections: line framing, command dispatch
//! and the writer task that drains the client's outbox.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, info, warn};

use crate::client::{Client, Member};
use crate::command::Command;
use crate::config::ConnectionLimits;
use crate::error::{AppError, CommandError};
use crate::registry::RoomRegistry;
use crate::room::Room;
use crate::types::ClientId;

/// Handle a new connection
///
/// `peer` becomes the client's initial display name. Runs until the input
/// stream ends or fails, then departs every joined room and waits for the
/// writer to flush.
pub async fn handle_connection<S>(
    stream: S,
    peer: String,
    registry: Arc<RoomRegistry>,
    limits: ConnectionLimits,
) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (reader, writer) = tokio::io::split(stream);
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(limits.max_line_length));
    let sink = FramedWrite::new(writer, LinesCodec::new());

    // Create channel for room/handler -> client lines
    let (outbox_tx, outbox_rx) = mpsc::channel::<String>(limits.outbox_capacity);
    let write_task = tokio::spawn(write_outbox(sink, outbox_rx));

    let client = Client::new(ClientId::new(), peer.as_str(), outbox_tx);
    let client_id = client.id;
    info!("Client {} connected from {}", client_id, peer);

    let mut session = Session::new(client, registry);

    let result = loop {
        match lines.next().await {
            Some(Ok(line)) => {
                if let Err(e) = session.handle_line(&line).await {
                    break Err(e);
                }
            }
            Some(Err(e)) => {
                warn!("Read error for {}: {}", client_id, e);
                break Err(e.into());
            }
            None => break Ok(()),
        }
    };

    session.disconnect().await;
    // Dropping the session releases the client's outbox sender; the writer
    // ends once every room has processed the departure.
    drop(session);
    let _ = write_task.await;

    info!("Client {} disconnected", client_id);

    result
}

/// Drain the outbox into the transport, one line per item
async fn write_outbox<W>(mut sink: FramedWrite<W, LinesCodec>, mut outbox: mpsc::Receiver<String>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = outbox.recv().await {
        if let Err(e) = sink.send(line).await {
            debug!("Write failed, ending write task: {}", e);
            break;
        }
    }
    debug!("Write task ended");
}

/// Which room plain text goes to
#[derive(Debug)]
pub enum SessionState {
    NoRoom,
    InRoom(Room),
}

/// Per-connection command interpreter
#[derive(Debug)]
pub struct Session {
    client: Client,
    state: SessionState,
    registry: Arc<RoomRegistry>,
}

impl Session {
    pub fn new(client: Client, registry: Arc<RoomRegistry>) -> Self {
        Self {
            client,
            state: SessionState::NoRoom,
            registry,
        }
    }

    /// Interpret one input line
    ///
    /// User input errors are answered on the client's outbox; only fatal
    /// errors are returned.
    pub async fn handle_line(&mut self, line: &str) -> Result<(), AppError> {
        match self.execute(Command::parse(line)).await {
            Err(AppError::Command(e)) => {
                debug!("Client {} command rejected: {}", self.client.id, e);
                self.client.send(e.to_string()).await?;
                Ok(())
            }
            other => other,
        }
    }

    async fn execute(&mut self, command: Command) -> Result<(), AppError> {
        match command {
            Command::Login(name) => self.login(name),
            Command::Create(name) => self.create(name),
            Command::Join(name) => self.join(name).await,
            Command::Leave => self.leave().await,
            Command::Switch(name) => self.switch(name).await,
            Command::Members => self.members().await,
            Command::Rooms => {
                let names = self.registry.names().join(",");
                Ok(self.client.send(names).await?)
            }
            Command::Current => {
                let name = self.active_room()?.name().to_string();
                Ok(self.client.send(name).await?)
            }
            Command::JoinedRooms => {
                let joined = self.client.joined_rooms().collect::<Vec<_>>().join(",");
                Ok(self.client.send(joined).await?)
            }
            Command::Chat(text) => {
                let room = self.active_room()?;
                let line = format!("[{}] {} : {}", room.name(), self.client.name(), text);
                room.broadcast(line).await
            }
        }
    }

    fn login(&mut self, name: String) -> Result<(), AppError> {
        if name.is_empty() {
            debug!("Client {} sent /login without a name, ignoring", self.client.id);
            return Ok(());
        }
        info!("Client {} logged in as {}", self.client.id, name);
        self.client.rename(name);
        Ok(())
    }

    fn create(&mut self, name: String) -> Result<(), AppError> {
        if name.is_empty() {
            debug!("Client {} sent /create without a name, ignoring", self.client.id);
            return Ok(());
        }
        self.registry.create(&name);
        Ok(())
    }

    async fn join(&mut self, name: String) -> Result<(), AppError> {
        // Checked against the typed name, so an unknown name never counts as joined
        if self.registry.already_joined(&name, self.client.id).await? {
            return Err(CommandError::AlreadyJoined(name).into());
        }

        let room = match self.registry.lookup(&name) {
            Some(room) => room,
            None => {
                debug!("Room {} not found, using default room", name);
                self.registry.default_room()
            }
        };

        let me = self.client.name();
        self.client.join_room(room.name());
        self.client
            .send(format!("[{}] You are {}", room.name(), me))
            .await?;
        room.arrive(self.client.member()).await?;
        room.broadcast(format!("[{}] {} has arrived", room.name(), me))
            .await?;

        info!("Client {} joined room {}", self.client.id, room.name());
        self.state = SessionState::InRoom(room);
        Ok(())
    }

    async fn leave(&mut self) -> Result<(), AppError> {
        let SessionState::InRoom(room) = std::mem::replace(&mut self.state, SessionState::NoRoom)
        else {
            return Err(CommandError::NotInRoom.into());
        };

        self.client.leave_room(room.name());
        self.depart(&room).await?;

        info!("Client {} left room {}", self.client.id, room.name());
        Ok(())
    }

    async fn switch(&mut self, name: String) -> Result<(), AppError> {
        let room = self
            .client
            .has_joined(&name)
            .then(|| self.registry.lookup(&name))
            .flatten()
            .ok_or_else(|| CommandError::NotJoined(name.clone()))?;

        self.state = SessionState::InRoom(room);
        Ok(self.client.send(format!("switch {}", name)).await?)
    }

    async fn members(&mut self) -> Result<(), AppError> {
        let mut names: Vec<String> = self
            .active_room()?
            .members()
            .await?
            .iter()
            .map(Member::name)
            .collect();
        names.sort();
        Ok(self.client.send(names.join(",")).await?)
    }

    /// Leave every joined room; used when the connection ends
    pub async fn disconnect(&mut self) {
        self.state = SessionState::NoRoom;

        for name in self.client.take_joined_rooms() {
            let Some(room) = self.registry.lookup(&name) else {
                continue;
            };
            if let Err(e) = self.depart(&room).await {
                warn!("Failed to depart {} from {}: {}", self.client.id, name, e);
            }
        }
    }

    async fn depart(&self, room: &Room) -> Result<(), AppError> {
        room.depart(self.client.id).await?;
        room.broadcast(format!("[{}] {} has left", room.name(), self.client.name()))
            .await
    }

    fn active_room(&self) -> Result<&Room, CommandError> {
        match &self.state {
            SessionState::InRoom(room) => Ok(room),
            SessionState::NoRoom => Err(CommandError::NotInRoom),
        }
    }
}
