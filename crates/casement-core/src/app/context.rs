use std::sync::Arc;

use super::state::ApplicationState;
use crate::config::CasementConfig;
use crate::files::{DialogProvider, HeadlessDialogs};
use crate::window::{
    HeadlessBackend, PlatformReceiver, PlatformSender, WindowBackend, WindowLifecycleController,
    platform_channel,
};

/// Everything the host loop owns. Built once per process and passed
/// explicitly to whatever needs it.
pub struct HostContext {
    pub config: CasementConfig,
    pub state: ApplicationState,
    pub windows: WindowLifecycleController,
    pub dialogs: Arc<dyn DialogProvider>,
}

impl HostContext {
    pub fn new(
        config: CasementConfig,
        backend: Box<dyn WindowBackend>,
        platform_tx: PlatformSender,
        dialogs: Arc<dyn DialogProvider>,
    ) -> Self {
        let windows = WindowLifecycleController::new(&config, backend, platform_tx);
        Self {
            config,
            state: ApplicationState::new(),
            windows,
            dialogs,
        }
    }

    /// Context on the headless backend with headless dialogs. The returned
    /// backend handle shares state with the one inside the context.
    pub fn headless(config: CasementConfig) -> (Self, HeadlessBackend, PlatformReceiver) {
        let (tx, rx) = platform_channel();
        let backend = HeadlessBackend::new(tx.clone());
        let ctx = Self::new(
            config,
            Box::new(backend.clone()),
            tx,
            Arc::new(HeadlessDialogs),
        );
        (ctx, backend, rx)
    }
}
