pub mod connection;
pub mod messages;

#[cfg(target_arch = "wasm32")]
pub mod ws_client;

pub use connection::{ConnectionManager, LinkCommand, SocketEvent, SocketStatus};
pub use messages::{decode, DecodeError, WorkflowEvent};
