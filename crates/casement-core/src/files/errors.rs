use crate::errors::CasementError;

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("File not found: '{path}'")]
    NotFound { path: String },

    #[error("Permission denied accessing '{path}'")]
    PermissionDenied { path: String },

    #[error("Failed to read '{path}': {message}")]
    ReadFailed { path: String, message: String },

    #[error("Failed to write '{path}': {message}")]
    WriteFailed { path: String, message: String },

    #[error("Unsupported encoding '{encoding}'. Supported encodings: utf8")]
    UnsupportedEncoding { encoding: String },

    #[error("Invalid JSON in '{path}': {message}")]
    InvalidJson { path: String, message: String },

    #[error("Unknown system path '{kind}'")]
    UnknownSystemPath { kind: String },

    #[error("System path '{kind}' is not available on this platform")]
    SystemPathUnavailable { kind: String },

    #[error("Dialog failed: {message}")]
    DialogFailed { message: String },
}

impl FileError {
    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::from_io(path, source, |path, message| FileError::ReadFailed { path, message })
    }

    pub(crate) fn write(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::from_io(path, source, |path, message| FileError::WriteFailed { path, message })
    }

    fn from_io(
        path: &std::path::Path,
        source: std::io::Error,
        other: impl FnOnce(String, String) -> FileError,
    ) -> Self {
        let path = path.display().to_string();
        match source.kind() {
            std::io::ErrorKind::NotFound => FileError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            _ => other(path, source.to_string()),
        }
    }
}

impl CasementError for FileError {
    fn error_code(&self) -> &'static str {
        match self {
            FileError::NotFound { .. } => "FILE_NOT_FOUND",
            FileError::PermissionDenied { .. } => "FILE_PERMISSION_DENIED",
            FileError::ReadFailed { .. } => "FILE_READ_FAILED",
            FileError::WriteFailed { .. } => "FILE_WRITE_FAILED",
            FileError::UnsupportedEncoding { .. } => "FILE_UNSUPPORTED_ENCODING",
            FileError::InvalidJson { .. } => "FILE_INVALID_JSON",
            FileError::UnknownSystemPath { .. } => "FILE_UNKNOWN_SYSTEM_PATH",
            FileError::SystemPathUnavailable { .. } => "FILE_SYSTEM_PATH_UNAVAILABLE",
            FileError::DialogFailed { .. } => "FILE_DIALOG_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            FileError::NotFound { .. }
                | FileError::UnsupportedEncoding { .. }
                | FileError::InvalidJson { .. }
                | FileError::UnknownSystemPath { .. }
        )
    }
}
