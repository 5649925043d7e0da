pub mod event;
pub mod input;
pub mod net;
pub mod render;
pub mod session;

pub use event::GameEvent;
pub use input::{tick_interval, InputSampler, HOLD_DECAY, TICK_RATE};
pub use net::{
    ClientCommand, Direction, GameSnapshot, Paddle, ProtocolError, ServerMessage, Winner,
    WORLD_SIZE,
};
pub use render::{render, scale, RenderFrame, GRID_HEIGHT, GRID_WIDTH};
pub use session::{Action, MatchState, SessionPhase};
