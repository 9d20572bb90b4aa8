pub mod protocol;

pub use protocol::{Command, ProtocolError, SOCKET_PATH};
