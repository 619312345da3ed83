//! Native window management: registry, lifecycle controller and backends.

pub mod backend;
pub mod errors;
pub mod headless;
pub mod lifecycle;
pub mod registry;
pub mod types;

pub use backend::{
    ObservedState, PlatformEvent, PlatformReceiver, PlatformSender, Subscription, WindowBackend,
    WindowEvent, WindowEvents, platform_channel,
};
pub use errors::{BackendError, WindowError};
pub use headless::HeadlessBackend;
pub use lifecycle::WindowLifecycleController;
pub use registry::WindowRegistry;
pub use types::{
    APP_PROTOCOL, ContentSource, LifecycleNotice, MAIN_WINDOW_ID, Outcome, Window,
    WindowDefaults, WindowHandle, WindowKind, WindowOptions, WindowPhase, WindowSpec,
    WindowSummary,
};
