//! Application orchestration: startup sequencing, the host event loop and
//! shutdown policy.

pub mod context;
pub mod errors;
pub mod events;
pub mod orchestrator;
pub mod state;

pub use context::HostContext;
pub use errors::AppError;
pub use events::{HostEvent, HostReceiver, HostSender, QuitReason, host_channel};
pub use orchestrator::{Orchestrator, RunOutcome};
pub use state::{AppPhase, ApplicationState};
