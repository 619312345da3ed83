//! Bridge transport: JSON Lines over a Unix socket.

pub mod client;
pub mod codec;
pub mod errors;
pub mod messages;
pub mod server;

pub use client::BridgeClient;
pub use errors::IpcError;
pub use messages::{ClientMessage, HostMessage};
pub use server::IpcServer;
