use crate::errors::{CasementError, ConfigError};
use crate::instance::InstanceError;
use crate::ipc::IpcError;
use crate::window::{BackendError, WindowError};

/// Errors that abort a launch. Once the host is running, failures are
/// logged instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Ipc(#[from] IpcError),
}

impl CasementError for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.error_code(),
            AppError::Instance(e) => e.error_code(),
            AppError::Window(e) => e.error_code(),
            AppError::Backend(e) => e.error_code(),
            AppError::Ipc(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            AppError::Config(e) => e.is_user_error(),
            AppError::Instance(e) => e.is_user_error(),
            AppError::Window(e) => e.is_user_error(),
            AppError::Backend(e) => e.is_user_error(),
            AppError::Ipc(e) => e.is_user_error(),
        }
    }
}
