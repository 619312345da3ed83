use crate::errors::CasementError;

#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("Failed to open lock file '{path}': {source}")]
    LockFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to lock '{path}': {message}")]
    LockFailed { path: String, message: String },

    #[error("Activation socket error at '{path}': {source}")]
    Socket {
        path: String,
        source: std::io::Error,
    },
}

impl CasementError for InstanceError {
    fn error_code(&self) -> &'static str {
        match self {
            InstanceError::LockFile { .. } => "INSTANCE_LOCK_FILE_ERROR",
            InstanceError::LockFailed { .. } => "INSTANCE_LOCK_FAILED",
            InstanceError::Socket { .. } => "INSTANCE_SOCKET_ERROR",
        }
    }
}
