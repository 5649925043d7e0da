mod transport;

pub use transport::{connect, ServerHandle, TransportError};
