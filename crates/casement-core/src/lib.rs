//! casement-core: window lifecycle registry and command bridge for desktop
//! hosts
//!
//! The host owns a set of native windows and exposes a fixed set of
//! capabilities (window control, files, dialogs, app info) to the UI through
//! a typed request/response bridge.
//!
//! # Main Entry Points
//!
//! - [`app`] - Orchestrator: startup, event loop, shutdown policy
//! - [`window`] - Registry, lifecycle controller and platform backends
//! - [`bridge`] - Command table, dispatch and response envelopes
//! - [`instance`] - Single-instance lock and activation forwarding
//! - [`ipc`] - Bridge socket server and client
//! - [`config`] - Configuration management

pub mod app;
pub mod bridge;
pub mod config;
pub mod errors;
pub mod events;
pub mod files;
pub mod instance;
pub mod ipc;
pub mod logging;
pub mod window;

// Re-export commonly used types at crate root for convenience
pub use app::{AppError, HostContext, Orchestrator, RunOutcome};
pub use bridge::{CommandBridge, ResponseEnvelope};
pub use config::CasementConfig;
pub use instance::{Activation, SingleInstanceGuard};
pub use ipc::{BridgeClient, IpcError};
pub use window::{
    HeadlessBackend, WindowBackend, WindowLifecycleController, WindowRegistry, WindowSummary,
};

pub use logging::init_logging;
