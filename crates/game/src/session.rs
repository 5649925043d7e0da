use crate::event::GameEvent;
use crate::net::{ClientCommand, GameSnapshot};

/// The client's current stage in the match lifecycle. Exactly one phase is
/// active at a time; transitions happen only in [`MatchState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unauthenticated,
    Connecting,
    WaitingForOpponent,
    ReadyPending,
    Playing,
    GameOver,
    Disconnected,
}

/// Side effect the driver must perform in response to an event.
///
/// The state machine itself never touches the socket, the terminal, or a
/// timer; it only decides.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Queue a command on the transport.
    Send(ClientCommand),
    /// Ensure the render surface and the input tick are running. Must be
    /// idempotent at the driver: a reconnect while both already exist
    /// creates nothing new.
    StartMatch,
    /// Render this snapshot.
    Draw(GameSnapshot),
    /// Stop sampling input immediately, even if keys are still held.
    StopInput,
    /// The session is over; leave the event loop after this batch.
    EndSession,
}

/// Session lifecycle state machine.
///
/// Consumes every inbound [`GameEvent`] in arrival order and returns the
/// side effects to perform. Events that do not fit the current phase are
/// dropped rather than treated as fatal (the server may replay or duplicate
/// messages across reconnects), but they are counted so a real desync stays
/// visible.
#[derive(Debug)]
pub struct MatchState {
    phase: SessionPhase,
    player_slot: Option<u8>,
    room_id: Option<String>,
    winner: Option<String>,
    close_reason: Option<String>,
    ignored_events: u64,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            player_slot: None,
            room_id: None,
            winner: None,
            close_reason: None,
            ignored_events: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Paddle slot (1 or 2) the server assigned at join time.
    pub fn player_slot(&self) -> Option<u8> {
        self.player_slot
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn close_reason(&self) -> Option<&str> {
        self.close_reason.as_deref()
    }

    /// True exactly while movement commands may be sent.
    pub fn input_active(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    /// Events dropped because they did not match the current phase.
    pub fn ignored_events(&self) -> u64 {
        self.ignored_events
    }

    pub fn apply(&mut self, event: GameEvent) -> Vec<Action> {
        match (self.phase, event) {
            (SessionPhase::Unauthenticated, GameEvent::Connected) => {
                log::info!("connected, joining game");
                self.phase = SessionPhase::Connecting;
                vec![Action::Send(ClientCommand::AutoJoin)]
            }
            (
                SessionPhase::Connecting,
                GameEvent::Joined {
                    paddle_number,
                    room_id,
                },
            ) => {
                log::info!("joined room {room_id} as player {paddle_number}");
                self.player_slot = Some(paddle_number);
                self.room_id = Some(room_id);
                self.phase = SessionPhase::WaitingForOpponent;
                vec![]
            }
            (SessionPhase::WaitingForOpponent, GameEvent::WaitingReady { room_id }) => {
                self.phase = SessionPhase::ReadyPending;
                vec![Action::Send(ClientCommand::Ready { room_id })]
            }
            (SessionPhase::ReadyPending, GameEvent::ReadyAck) => {
                log::info!("ready acknowledged, waiting for game start");
                vec![]
            }
            (SessionPhase::ReadyPending, GameEvent::GameStart) => {
                self.phase = SessionPhase::Playing;
                vec![Action::StartMatch]
            }
            (SessionPhase::Playing, GameEvent::GameTick(snapshot)) => {
                vec![Action::Draw(snapshot)]
            }
            (SessionPhase::Playing, GameEvent::GameOver { winner }) => {
                self.phase = SessionPhase::GameOver;
                self.winner = Some(winner);
                // The transport stays open: the server may still send
                // room_closed before closing the socket.
                vec![Action::StopInput]
            }
            (_, GameEvent::RoomClosed { reason }) => {
                log::info!("room closed: {reason}");
                self.phase = SessionPhase::Disconnected;
                self.close_reason = Some(reason);
                vec![Action::StopInput]
            }
            (
                _,
                GameEvent::Reconnected {
                    paddle_number,
                    room_id,
                },
            ) => {
                log::info!("reconnected to room {room_id} as player {paddle_number}");
                self.player_slot = Some(paddle_number);
                self.room_id = Some(room_id);
                self.phase = SessionPhase::Playing;
                vec![Action::StartMatch]
            }
            (_, GameEvent::Closed { reason }) => {
                self.phase = SessionPhase::Disconnected;
                if self.close_reason.is_none() {
                    self.close_reason = reason;
                }
                vec![Action::StopInput, Action::EndSession]
            }
            (phase, event) => {
                self.ignored_events += 1;
                log::debug!("ignoring {event:?} in phase {phase:?}");
                vec![]
            }
        }
    }
}
