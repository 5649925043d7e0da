use serde::{Deserialize, Serialize};

/// Extent of the server's square coordinate space. Snapshot positions live in
/// `[0, WORLD_SIZE)` on both axes; this constant is the only coupling between
/// the server's coordinates and the client grid.
pub const WORLD_SIZE: f32 = 500.0;

/// Message type tags the client understands. Anything else on the wire is
/// reported as [`ProtocolError::UnknownType`] and skipped by the transport.
const KNOWN_TYPES: [&str; 8] = [
    "joined",
    "waiting_ready",
    "ready_ack",
    "game_start",
    "game_tick",
    "game_over",
    "room_closed",
    "reconnected",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub y: f32,
    pub height: f32,
}

/// One authoritative, complete description of the game world at an instant.
/// Each snapshot fully replaces the previous one; the client never simulates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub ball_x: f32,
    pub ball_y: f32,
    pub paddle1: Paddle,
    pub paddle2: Paddle,
    pub player1_score: u32,
    pub player2_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    pub name: String,
}

/// Messages the server pushes over the socket, discriminated by the JSON
/// `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Joined {
        #[serde(rename = "paddleNumber")]
        paddle_number: u8,
        #[serde(rename = "roomId")]
        room_id: String,
    },
    WaitingReady {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    ReadyAck,
    GameStart,
    GameTick {
        state: GameSnapshot,
    },
    GameOver {
        winner: Winner,
    },
    RoomClosed {
        reason: String,
    },
    Reconnected {
        #[serde(rename = "paddleNumber")]
        paddle_number: u8,
        #[serde(rename = "roomId")]
        room_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Commands the client sends, mirrored on the wire as `{"type": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    AutoJoin,
    Ready {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    Move {
        direction: Direction,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("unknown message type `{0}`")]
    UnknownType(String),
    #[error("malformed server message: {0}")]
    Decode(serde_json::Error),
    #[error("failed to encode command: {0}")]
    Encode(serde_json::Error),
}

impl ServerMessage {
    /// Decode one inbound frame.
    ///
    /// A valid JSON object whose `type` tag the client does not know yields
    /// [`ProtocolError::UnknownType`] so callers can tolerate protocol
    /// additions without treating them as corruption.
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(ProtocolError::Decode)?;
        let tag = value
            .get("type")
            .and_then(|t| t.as_str())
            .map(str::to_owned);
        match serde_json::from_value(value) {
            Ok(msg) => Ok(msg),
            Err(err) => match tag {
                Some(tag) if !KNOWN_TYPES.contains(&tag.as_str()) => {
                    Err(ProtocolError::UnknownType(tag))
                }
                _ => Err(ProtocolError::Decode(err)),
            },
        }
    }
}

impl ClientCommand {
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}
