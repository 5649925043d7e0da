mod protocol;

pub use protocol::{
    ClientCommand, Direction, GameSnapshot, Paddle, ProtocolError, ServerMessage, Winner,
    WORLD_SIZE,
};
