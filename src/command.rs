//! Line protocol definitions
//!
//! Every inbound line is either a slash command or chat text. Commands are
//! recognized by prefix, first match wins, so `/joinRooms` is checked before
//! `/join`.

/// Client → Server command parsed from one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/login <name>`: replace the display name
    Login(String),
    /// `/create <name>`: register a new room
    Create(String),
    /// `/join <name>`: join a room and make it active
    Join(String),
    /// `/leave`: leave the active room
    Leave,
    /// `/switch <name>`: make an already joined room active
    Switch(String),
    /// `/members`: list members of the active room
    Members,
    /// `/rooms`: list every registered room
    Rooms,
    /// `/current`: name of the active room
    Current,
    /// `/joinRooms`: list every joined room
    JoinedRooms,
    /// Anything else: chat text for the active room
    Chat(String),
}

const JOIN_ROOMS: &str = "/joinRooms";
const JOIN: &str = "/join";
const LEAVE: &str = "/leave";
const CREATE: &str = "/create";
const MEMBERS: &str = "/members";
const ROOMS: &str = "/rooms";
const SWITCH: &str = "/switch";
const CURRENT: &str = "/current";
const LOGIN: &str = "/login";

impl Command {
    /// Parse a single line (without its terminator)
    pub fn parse(line: &str) -> Self {
        if line.starts_with(JOIN_ROOMS) {
            Command::JoinedRooms
        } else if let Some(name) = argument(line, JOIN) {
            Command::Join(name)
        } else if line.starts_with(LEAVE) {
            Command::Leave
        } else if let Some(name) = argument(line, CREATE) {
            Command::Create(name)
        } else if line.starts_with(MEMBERS) {
            Command::Members
        } else if line.starts_with(ROOMS) {
            Command::Rooms
        } else if let Some(name) = argument(line, SWITCH) {
            Command::Switch(name)
        } else if line.starts_with(CURRENT) {
            Command::Current
        } else if let Some(name) = argument(line, LOGIN) {
            Command::Login(name)
        } else {
            Command::Chat(line.to_string())
        }
    }
}

/// Strip `command` and the surrounding spaces of its argument
fn argument(line: &str, command: &str) -> Option<String> {
    line.strip_prefix(command)
        .map(|rest| rest.trim_matches(' ').to_string())
}
