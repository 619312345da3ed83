//! Typed request/response bridge between the UI and the host.
//!
//! A command arrives as a name plus positional JSON arguments. The routing
//! table turns the name into a [`CommandKind`], [`parse`] decodes the
//! arguments into a [`BridgeCommand`], and the result comes back wrapped in
//! a [`ResponseEnvelope`].

pub mod envelope;
pub mod errors;
pub mod handlers;
pub mod parse;
pub mod routing;
pub mod types;

pub use envelope::ResponseEnvelope;
pub use errors::HandlerError;
pub use handlers::HandlerResult;
pub use routing::{CommandBridge, respond};
pub use types::{
    AppCommand, BridgeCommand, CommandKind, FileCommand, InlineCommand, Route, WindowCommand,
};
