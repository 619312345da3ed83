use crate::errors::CasementError;

#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Casement host is not running (no socket at '{path}')")]
    NotRunning { path: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Malformed message: {message}")]
    Decode { message: String },

    #[error("Failed to encode message: {message}")]
    Encode { message: String },

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Host error [{code}]: {message}")]
    Remote { code: String, message: String },

    #[error("Failed to bind '{path}': {source}")]
    BindFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl CasementError for IpcError {
    fn error_code(&self) -> &'static str {
        match self {
            IpcError::NotRunning { .. } => "IPC_NOT_RUNNING",
            IpcError::ConnectionFailed(_) => "IPC_CONNECTION_FAILED",
            IpcError::Decode { .. } => "IPC_DECODE_ERROR",
            IpcError::Encode { .. } => "IPC_ENCODE_ERROR",
            IpcError::ProtocolError(_) => "IPC_PROTOCOL_ERROR",
            IpcError::Remote { .. } => "IPC_REMOTE_ERROR",
            IpcError::BindFailed { .. } => "IPC_BIND_FAILED",
            IpcError::Io { .. } => "IPC_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, IpcError::NotRunning { .. })
    }
}
