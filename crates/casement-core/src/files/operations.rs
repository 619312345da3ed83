//! Filesystem operations backing the `file:*` bridge commands.
//!
//! Everything here is stateless and async. Paths come from the UI as-is.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::FileError;
use super::types::{FileInfo, SystemPathKind};

const USER_DATA_DIR: &str = "casement";

fn is_utf8(encoding: &str) -> bool {
    matches!(encoding.to_ascii_lowercase().as_str(), "utf8" | "utf-8")
}

pub async fn read_file(path: &Path, encoding: Option<&str>) -> Result<String, FileError> {
    if let Some(encoding) = encoding
        && !is_utf8(encoding)
    {
        return Err(FileError::UnsupportedEncoding {
            encoding: encoding.to_string(),
        });
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FileError::read(path, e))?;

    debug!(
        event = "core.files.read_completed",
        path = %path.display(),
        bytes = content.len()
    );
    Ok(content)
}

/// Write `content`, creating missing parent directories first.
pub async fn write_file(path: &Path, content: &str) -> Result<(), FileError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FileError::write(parent, e))?;
    }

    tokio::fs::write(path, content)
        .await
        .map_err(|e| FileError::write(path, e))?;

    debug!(
        event = "core.files.write_completed",
        path = %path.display(),
        bytes = content.len()
    );
    Ok(())
}

/// Unreadable paths count as missing.
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

pub async fn file_info(path: &Path) -> Result<FileInfo, FileError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| FileError::read(path, e))?;
    let modified = metadata.modified().map_err(|e| FileError::read(path, e))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = if metadata.is_file() {
        path.extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
    } else {
        None
    };

    Ok(FileInfo {
        name,
        path: path.display().to_string(),
        size: metadata.len(),
        is_directory: metadata.is_dir(),
        is_file: metadata.is_file(),
        extension,
        modified: DateTime::<Utc>::from(modified),
    })
}

/// List a directory: directories first, then by name.
///
/// Entries that cannot be inspected are skipped.
pub async fn list_directory(path: &Path) -> Result<Vec<FileInfo>, FileError> {
    let mut entries = tokio::fs::read_dir(path)
        .await
        .map_err(|e| FileError::read(path, e))?;

    let mut infos = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FileError::read(path, e))?
    {
        let entry_path = entry.path();
        match file_info(&entry_path).await {
            Ok(info) => infos.push(info),
            Err(e) => warn!(
                event = "core.files.list_entry_skipped",
                path = %entry_path.display(),
                error = %e
            ),
        }
    }

    infos.sort_by(compare_entries);
    Ok(infos)
}

fn compare_entries(a: &FileInfo, b: &FileInfo) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| a.name.cmp(&b.name))
}

pub async fn read_json(path: &Path) -> Result<Value, FileError> {
    let content = read_file(path, None).await?;
    serde_json::from_str(&content).map_err(|e| FileError::InvalidJson {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Write `value` pretty-printed with two-space indentation.
pub async fn write_json(path: &Path, value: &Value) -> Result<(), FileError> {
    let content = serde_json::to_string_pretty(value).map_err(|e| FileError::WriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    write_file(path, &content).await
}

pub fn system_path(kind: SystemPathKind) -> Result<PathBuf, FileError> {
    let resolved = match kind {
        SystemPathKind::UserData => dirs::data_dir().map(|d| d.join(USER_DATA_DIR)),
        SystemPathKind::Temp => Some(std::env::temp_dir()),
        SystemPathKind::Desktop => dirs::desktop_dir(),
        SystemPathKind::Documents => dirs::document_dir(),
        SystemPathKind::Downloads => dirs::download_dir(),
    };

    resolved.ok_or_else(|| FileError::SystemPathUnavailable {
        kind: kind.to_string(),
    })
}
