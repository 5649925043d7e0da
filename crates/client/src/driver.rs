use std::time::Instant;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use tokio::time::MissedTickBehavior;

use pong::{
    render, tick_interval, Action, ClientCommand, Direction, GameEvent, InputSampler, MatchState,
};

use crate::config::ClientConfig;
use crate::net;
use crate::tui::Surface;

/// How one session ended, for the restart prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    GameOver { winner: String },
    RoomClosed { reason: String },
    Disconnected,
}

impl SessionOutcome {
    pub fn message(&self) -> String {
        match self {
            SessionOutcome::GameOver { winner } => format!("Game Over! Winner: {winner}"),
            SessionOutcome::RoomClosed { reason } => format!("Room closed: {reason}"),
            SessionOutcome::Disconnected => "Disconnected.".to_owned(),
        }
    }
}

/// Play one session to completion: connect, join, ready up, relay snapshots
/// to the surface and sampled input to the server, until the transport
/// reports `Closed`.
///
/// A single select loop serializes server events, the input tick, and raw
/// key events, so `MatchState` and `InputSampler` have exactly one writer.
pub async fn run_session(config: &ClientConfig, cookie: &str) -> Result<SessionOutcome> {
    let (mut server, mut events) =
        net::connect(&config.ws_url, cookie, config.event_channel_capacity).await?;

    let mut state = MatchState::new();
    let mut sampler = InputSampler::new();
    let mut surface: Option<Surface> = None;
    let mut keys = EventStream::new();

    let mut tick = tokio::time::interval(tick_interval());
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    // Transport task died without a Closed event; treat the
                    // session as lost.
                    log::warn!("event stream ended without Closed");
                    break;
                };
                let done = matches!(event, GameEvent::Closed { .. });
                for action in state.apply(event) {
                    match action {
                        Action::Send(command) => server.send(command),
                        Action::StartMatch => {
                            // Presence check: a reconnect while the surface
                            // already exists must not stack a second one.
                            if surface.is_none() {
                                surface = Some(Surface::new()?);
                            }
                            sampler.clear();
                        }
                        Action::Draw(snapshot) => {
                            if let Some(surface) = surface.as_mut() {
                                let frame = render(&snapshot, state.player_slot().unwrap_or(0));
                                surface.draw(&frame)?;
                            }
                        }
                        Action::StopInput => sampler.clear(),
                        Action::EndSession => {}
                    }
                }
                if done {
                    break;
                }
            }

            _ = tick.tick(), if state.input_active() => {
                let now = Instant::now();
                for direction in sampler.sample(now) {
                    server.send(ClientCommand::Move { direction });
                }
            }

            key = keys.next() => {
                if let Some(Ok(Event::Key(key))) = key {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        server.close();
                    } else if state.input_active() {
                        let now = Instant::now();
                        match key.code {
                            KeyCode::Up | KeyCode::Char('w') => {
                                sampler.press(Direction::Up, now);
                            }
                            KeyCode::Down | KeyCode::Char('s') => {
                                sampler.press(Direction::Down, now);
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
    }

    if state.ignored_events() > 0 {
        log::info!("{} out-of-phase events ignored this session", state.ignored_events());
    }

    // Restore the terminal before anyone prints to it.
    drop(surface);

    Ok(session_outcome(&state))
}

fn session_outcome(state: &MatchState) -> SessionOutcome {
    if let Some(winner) = state.winner() {
        SessionOutcome::GameOver {
            winner: winner.to_owned(),
        }
    } else if let Some(reason) = state.close_reason() {
        SessionOutcome::RoomClosed {
            reason: reason.to_owned(),
        }
    } else {
        SessionOutcome::Disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_prefers_winner_over_close_reason() {
        let mut state = MatchState::new();
        state.apply(GameEvent::Connected);
        state.apply(GameEvent::Joined {
            paddle_number: 1,
            room_id: "r1".to_owned(),
        });
        state.apply(GameEvent::WaitingReady {
            room_id: "r1".to_owned(),
        });
        state.apply(GameEvent::GameStart);
        state.apply(GameEvent::GameOver {
            winner: "ella".to_owned(),
        });
        state.apply(GameEvent::RoomClosed {
            reason: "match finished".to_owned(),
        });
        state.apply(GameEvent::Closed { reason: None });

        assert_eq!(
            session_outcome(&state),
            SessionOutcome::GameOver {
                winner: "ella".to_owned()
            }
        );
    }

    #[test]
    fn test_outcome_falls_back_to_disconnected() {
        let mut state = MatchState::new();
        state.apply(GameEvent::Connected);
        state.apply(GameEvent::Closed { reason: None });
        assert_eq!(session_outcome(&state), SessionOutcome::Disconnected);
    }
}
