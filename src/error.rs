//! Error types for the chat server
//!
//! Defines connection-fatal errors, outbox send errors, and the user input
//! errors that are answered with a reply line.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// Application-level errors
///
/// Covers both fatal errors (connection termination) and user input
/// errors (reply sent to the client, connection continues).
/// Fatal errors never reach other connections or the room workers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad command from the client (not fatal)
    #[error(transparent)]
    Command(#[from] CommandError),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Line framing error: over-long line or invalid UTF-8 (fatal)
    #[error("Line codec error: {0}")]
    Codec(#[from] LinesCodecError),

    /// The connection's own outbox is gone (writer ended)
    #[error("Outbox send error: {0}")]
    Send(#[from] SendError),

    /// A room worker stopped accepting events (fatal)
    #[error("Room closed: {0}")]
    RoomClosed(String),
}

/// Message send errors
///
/// Occurs when pushing a line into a client's outbox.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The outbox is at capacity (non-blocking delivery only)
    #[error("Channel full")]
    Full,
}

/// User input errors
///
/// Recovered locally: the `Display` text is sent back to the offending client
/// as a plain reply and the connection keeps running.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Command needs an active room
    #[error("Please join room")]
    NotInRoom,

    /// `/switch` to a room that was never joined
    #[error("Please join room {0}")]
    NotJoined(String),

    /// `/join` to a room the client is already a member of
    #[error("You are already joined {0}")]
    AlreadyJoined(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_replies() {
        assert_eq!(CommandError::NotInRoom.to_string(), "Please join room");
        assert_eq!(
            CommandError::NotJoined("room1".to_string()).to_string(),
            "Please join room room1"
        );
        assert_eq!(
            CommandError::AlreadyJoined("room2".to_string()).to_string(),
            "You are already joined room2"
        );
    }

    #[test]
    fn test_command_error_is_transparent() {
        let err: AppError = CommandError::NotInRoom.into();
        assert_eq!(err.to_string(), "Please join room");
    }

    #[test]
    fn test_send_error_converts_to_app_error() {
        let err: AppError = SendError::ChannelClosed.into();
        assert!(matches!(err, AppError::Send(SendError::ChannelClosed)));
    }
}
