//! Host lifecycle log events.

use tracing::{error, info, warn};

use crate::config::CasementConfig;
use crate::errors::CasementError;

pub fn log_app_startup(config: &CasementConfig) {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        title = config.app.title(),
        environment = %config.app.environment(),
        bridge_socket = %config.paths.bridge_socket_path().display()
    );
}

pub fn log_app_shutdown(open_windows: usize) {
    info!(event = "core.app.shutdown_started", open_windows = open_windows);
}

/// Errors on a running host are logged and never end the process. User
/// errors (a bad id, a missing file) are logged as warnings.
pub fn log_app_error(error: &dyn CasementError) {
    if error.is_user_error() {
        warn!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code()
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code()
        );
    }
}
