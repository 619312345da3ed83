use crate::errors::CasementError;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Window '{id}' already exists")]
    DuplicateId { id: String },

    #[error("Main window already exists")]
    AlreadyExists,

    #[error("Window '{id}' not found")]
    NotFound { id: String },

    #[error("Window id '{id}' is reserved")]
    ReservedId { id: String },

    #[error("Invalid window id: cannot be empty")]
    InvalidId,

    #[error("Host is shutting down; window creation refused")]
    ShuttingDown,

    #[error("Window backend failed: {source}")]
    Backend {
        #[from]
        source: BackendError,
    },
}

impl CasementError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::DuplicateId { .. } => "WINDOW_DUPLICATE_ID",
            WindowError::AlreadyExists => "WINDOW_MAIN_ALREADY_EXISTS",
            WindowError::NotFound { .. } => "WINDOW_NOT_FOUND",
            WindowError::ReservedId { .. } => "WINDOW_RESERVED_ID",
            WindowError::InvalidId => "WINDOW_INVALID_ID",
            WindowError::ShuttingDown => "WINDOW_SHUTTING_DOWN",
            WindowError::Backend { .. } => "WINDOW_BACKEND_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            WindowError::DuplicateId { .. }
                | WindowError::ReservedId { .. }
                | WindowError::InvalidId
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to launch platform: {message}")]
    LaunchFailed { message: String },

    #[error("failed to create window '{id}': {message}")]
    CreateFailed { id: String, message: String },

    #[error("failed to register protocol '{scheme}': {message}")]
    ProtocolFailed { scheme: String, message: String },
}

impl CasementError for BackendError {
    fn error_code(&self) -> &'static str {
        match self {
            BackendError::LaunchFailed { .. } => "BACKEND_LAUNCH_FAILED",
            BackendError::CreateFailed { .. } => "BACKEND_CREATE_FAILED",
            BackendError::ProtocolFailed { .. } => "BACKEND_PROTOCOL_FAILED",
        }
    }
}
