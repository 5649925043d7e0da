use std::time::{Duration, Instant};

use pong::{
    render, Action, ClientCommand, Direction, GameEvent, InputSampler, MatchState, ServerMessage,
    SessionPhase, HOLD_DECAY,
};

/// Feed a raw wire frame through decode -> event -> state machine.
fn feed(state: &mut MatchState, raw: &str) -> Vec<Action> {
    let msg = ServerMessage::decode(raw).expect("wire frame should decode");
    state.apply(GameEvent::from(msg))
}

const TICK_FRAME: &str = r#"{
    "type": "game_tick",
    "state": {
        "ballX": 250.0,
        "ballY": 250.0,
        "paddle1": {"y": 100.0, "height": 100.0},
        "paddle2": {"y": 300.0, "height": 100.0},
        "player1Score": 0,
        "player2Score": 0
    }
}"#;

#[test]
fn test_full_session_drives_phases_in_order() {
    let mut state = MatchState::new();
    assert_eq!(state.phase(), SessionPhase::Unauthenticated);

    let actions = state.apply(GameEvent::Connected);
    assert_eq!(actions, vec![Action::Send(ClientCommand::AutoJoin)]);
    assert_eq!(state.phase(), SessionPhase::Connecting);

    feed(
        &mut state,
        r#"{"type":"joined","paddleNumber":1,"roomId":"r1"}"#,
    );
    assert_eq!(state.phase(), SessionPhase::WaitingForOpponent);
    assert!(!state.input_active());

    let actions = feed(&mut state, r#"{"type":"waiting_ready","roomId":"r1"}"#);
    assert_eq!(
        actions,
        vec![Action::Send(ClientCommand::Ready {
            room_id: "r1".to_owned()
        })]
    );
    assert_eq!(state.phase(), SessionPhase::ReadyPending);

    feed(&mut state, r#"{"type":"ready_ack"}"#);
    assert_eq!(state.phase(), SessionPhase::ReadyPending);
    assert!(!state.input_active());

    let actions = feed(&mut state, r#"{"type":"game_start"}"#);
    assert_eq!(actions, vec![Action::StartMatch]);
    assert_eq!(state.phase(), SessionPhase::Playing);
    assert!(state.input_active());

    let actions = feed(&mut state, TICK_FRAME);
    assert_eq!(actions.len(), 1);
    let Action::Draw(snapshot) = &actions[0] else {
        panic!("expected a draw action, got {actions:?}");
    };
    let frame = render(snapshot, 1);
    assert_eq!(frame.status[0], "Score: 0 - 0");
    assert!(state.input_active());

    let actions = feed(
        &mut state,
        r#"{"type":"room_closed","reason":"opponent left"}"#,
    );
    assert_eq!(actions, vec![Action::StopInput]);
    assert_eq!(state.phase(), SessionPhase::Disconnected);
    assert!(!state.input_active());
    assert_eq!(state.close_reason(), Some("opponent left"));
    assert_eq!(state.ignored_events(), 0);
}

#[test]
fn test_input_is_sampled_only_while_playing() {
    let mut state = MatchState::new();
    let mut sampler = InputSampler::new();
    let now = Instant::now();

    state.apply(GameEvent::Connected);
    feed(
        &mut state,
        r#"{"type":"joined","paddleNumber":1,"roomId":"r1"}"#,
    );
    feed(&mut state, r#"{"type":"waiting_ready","roomId":"r1"}"#);

    // Not playing yet: the driver must not run the tick at all.
    assert!(!state.input_active());

    feed(&mut state, r#"{"type":"game_start"}"#);
    sampler.press(Direction::Up, now);
    assert!(state.input_active());
    assert_eq!(
        sampler.sample(now + Duration::from_millis(10)),
        vec![Direction::Up]
    );

    // Key still physically held across the game_over transition.
    sampler.press(Direction::Up, now + Duration::from_millis(20));
    for action in feed(
        &mut state,
        r#"{"type":"game_over","winner":{"name":"ella"}}"#,
    ) {
        if action == Action::StopInput {
            sampler.clear();
        }
    }
    assert!(!state.input_active());
    assert!(sampler
        .sample(now + Duration::from_millis(30))
        .is_empty());
    assert_eq!(state.winner(), Some("ella"));
}

#[test]
fn test_reconnect_requests_exactly_one_restart() {
    let mut state = MatchState::new();
    state.apply(GameEvent::Connected);
    feed(
        &mut state,
        r#"{"type":"joined","paddleNumber":1,"roomId":"r1"}"#,
    );
    feed(&mut state, r#"{"type":"waiting_ready","roomId":"r1"}"#);
    feed(&mut state, r#"{"type":"game_start"}"#);

    // A reconnect mid-game re-attaches the slot and asks for a (guarded)
    // match start; it is the driver's presence check that makes this a
    // no-op when the surface and tick already run.
    let actions = feed(
        &mut state,
        r#"{"type":"reconnected","paddleNumber":2,"roomId":"r1"}"#,
    );
    assert_eq!(actions, vec![Action::StartMatch]);
    assert_eq!(state.player_slot(), Some(2));
    assert_eq!(state.phase(), SessionPhase::Playing);
}

#[test]
fn test_duplicated_lifecycle_events_are_tolerated() {
    let mut state = MatchState::new();
    state.apply(GameEvent::Connected);
    feed(
        &mut state,
        r#"{"type":"joined","paddleNumber":1,"roomId":"r1"}"#,
    );

    // A replayed join does not move the machine or crash it.
    let actions = feed(
        &mut state,
        r#"{"type":"joined","paddleNumber":1,"roomId":"r1"}"#,
    );
    assert!(actions.is_empty());
    assert_eq!(state.phase(), SessionPhase::WaitingForOpponent);
    assert_eq!(state.ignored_events(), 1);
}

#[test]
fn test_decay_window_matches_hold_decay() {
    let mut sampler = InputSampler::new();
    let start = Instant::now();

    sampler.press(Direction::Down, start);
    assert_eq!(sampler.sample(start + HOLD_DECAY), vec![Direction::Down]);
    assert!(sampler
        .sample(start + HOLD_DECAY + Duration::from_millis(1))
        .is_empty());
}
