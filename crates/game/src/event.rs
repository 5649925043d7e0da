use crate::net::{GameSnapshot, ServerMessage};

/// Everything that can happen on a session, in arrival order: the synthetic
/// `Connected` marker when the socket opens, one variant per server message,
/// and the terminal `Closed`.
///
/// `Closed` is the sole termination signal. The transport emits it exactly
/// once whether the server closed the socket, the network dropped, or the
/// client shut down.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Connected,
    Joined { paddle_number: u8, room_id: String },
    WaitingReady { room_id: String },
    ReadyAck,
    GameStart,
    GameTick(GameSnapshot),
    GameOver { winner: String },
    RoomClosed { reason: String },
    Reconnected { paddle_number: u8, room_id: String },
    Closed { reason: Option<String> },
}

impl From<ServerMessage> for GameEvent {
    fn from(msg: ServerMessage) -> Self {
        match msg {
            ServerMessage::Joined {
                paddle_number,
                room_id,
            } => GameEvent::Joined {
                paddle_number,
                room_id,
            },
            ServerMessage::WaitingReady { room_id } => GameEvent::WaitingReady { room_id },
            ServerMessage::ReadyAck => GameEvent::ReadyAck,
            ServerMessage::GameStart => GameEvent::GameStart,
            ServerMessage::GameTick { state } => GameEvent::GameTick(state),
            ServerMessage::GameOver { winner } => GameEvent::GameOver {
                winner: winner.name,
            },
            ServerMessage::RoomClosed { reason } => GameEvent::RoomClosed { reason },
            ServerMessage::Reconnected {
                paddle_number,
                room_id,
            } => GameEvent::Reconnected {
                paddle_number,
                room_id,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_message_to_event() {
        let msg = ServerMessage::decode(r#"{"type":"joined","paddleNumber":1,"roomId":"r1"}"#)
            .unwrap();
        assert_eq!(
            GameEvent::from(msg),
            GameEvent::Joined {
                paddle_number: 1,
                room_id: "r1".to_owned()
            }
        );

        let msg = ServerMessage::decode(r#"{"type":"game_over","winner":{"name":"ella"}}"#)
            .unwrap();
        assert_eq!(
            GameEvent::from(msg),
            GameEvent::GameOver {
                winner: "ella".to_owned()
            }
        );
    }
}
