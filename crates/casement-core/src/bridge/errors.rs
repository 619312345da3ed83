use crate::errors::CasementError;
use crate::files::FileError;
use crate::window::WindowError;

/// Failure of a single bridge command. Always converted into a failed
/// envelope; never escapes the bridge.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("unknown command: {name}")]
    UnknownCommand { name: String },

    #[error("{command}: missing argument '{name}'")]
    MissingArgument {
        command: &'static str,
        name: &'static str,
    },

    #[error("{command}: invalid argument '{name}': {message}")]
    InvalidArgument {
        command: &'static str,
        name: &'static str,
        message: String,
    },

    #[error("Failed to encode result: {message}")]
    Encode { message: String },

    #[error("Handler task failed: {message}")]
    TaskFailed { message: String },

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    File(#[from] FileError),
}

impl CasementError for HandlerError {
    fn error_code(&self) -> &'static str {
        match self {
            HandlerError::UnknownCommand { .. } => "BRIDGE_UNKNOWN_COMMAND",
            HandlerError::MissingArgument { .. } => "BRIDGE_MISSING_ARGUMENT",
            HandlerError::InvalidArgument { .. } => "BRIDGE_INVALID_ARGUMENT",
            HandlerError::Encode { .. } => "BRIDGE_ENCODE_FAILED",
            HandlerError::TaskFailed { .. } => "BRIDGE_TASK_FAILED",
            HandlerError::Window(e) => e.error_code(),
            HandlerError::File(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            HandlerError::UnknownCommand { .. }
            | HandlerError::MissingArgument { .. }
            | HandlerError::InvalidArgument { .. } => true,
            HandlerError::Encode { .. } | HandlerError::TaskFailed { .. } => false,
            HandlerError::Window(e) => e.is_user_error(),
            HandlerError::File(e) => e.is_user_error(),
        }
    }
}
