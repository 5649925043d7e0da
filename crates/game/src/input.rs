use std::time::{Duration, Instant};

use crate::net::Direction;

/// Fixed input sampling rate while a match is live.
pub const TICK_RATE: u32 = 30;

/// A held direction auto-releases this long after its most recent press.
pub const HOLD_DECAY: Duration = Duration::from_millis(100);

pub fn tick_interval() -> Duration {
    Duration::from_secs_f64(1.0 / TICK_RATE as f64)
}

#[derive(Debug, Clone, Copy, Default)]
struct Held {
    held: bool,
    deadline: Option<Instant>,
}

/// Tracks which logical directions are currently held, with per-direction
/// decay deadlines instead of per-keystroke timers so the behavior is
/// testable with injected instants.
///
/// The sampler only reports intent; it never moves anything itself and it
/// never talks to the transport.
#[derive(Debug, Default)]
pub struct InputSampler {
    up: Held,
    down: Held,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down for `direction`: mark it held and push its decay
    /// deadline out to `now + HOLD_DECAY`.
    pub fn press(&mut self, direction: Direction, now: Instant) {
        let slot = self.slot(direction);
        slot.held = true;
        slot.deadline = Some(now + HOLD_DECAY);
    }

    /// One sampler tick: decay expired holds, then report every direction
    /// still held. Both directions may be reported in the same tick.
    pub fn sample(&mut self, now: Instant) -> Vec<Direction> {
        let mut held = Vec::with_capacity(2);
        if Self::decay_and_check(&mut self.up, now) {
            held.push(Direction::Up);
        }
        if Self::decay_and_check(&mut self.down, now) {
            held.push(Direction::Down);
        }
        held
    }

    /// Release everything. Called when a match ends so a key still physically
    /// held cannot generate further commands.
    pub fn clear(&mut self) {
        self.up = Held::default();
        self.down = Held::default();
    }

    fn slot(&mut self, direction: Direction) -> &mut Held {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        }
    }

    fn decay_and_check(slot: &mut Held, now: Instant) -> bool {
        if slot.held && slot.deadline.is_some_and(|deadline| now > deadline) {
            slot.held = false;
            slot.deadline = None;
        }
        slot.held
    }
}
