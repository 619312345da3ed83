//! Native file dialogs.
//!
//! Dialogs block until the user answers, so callers run them off the host
//! loop (see `bridge::handlers`).

use tracing::debug;

use super::errors::FileError;
use super::types::{OpenDialogOptions, OpenDialogResult, SaveDialogOptions, SaveDialogResult};

pub trait DialogProvider: Send + Sync {
    fn show_open(&self, options: &OpenDialogOptions) -> Result<OpenDialogResult, FileError>;

    fn show_save(&self, options: &SaveDialogOptions) -> Result<SaveDialogResult, FileError>;
}

/// Provider for hosts without a display. Every dialog reports `canceled`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDialogs;

impl DialogProvider for HeadlessDialogs {
    fn show_open(&self, options: &OpenDialogOptions) -> Result<OpenDialogResult, FileError> {
        debug!(
            event = "core.dialog.open_canceled",
            title = ?options.title,
            reason = "headless"
        );
        Ok(OpenDialogResult {
            canceled: true,
            file_paths: Vec::new(),
        })
    }

    fn show_save(&self, options: &SaveDialogOptions) -> Result<SaveDialogResult, FileError> {
        debug!(
            event = "core.dialog.save_canceled",
            title = ?options.title,
            reason = "headless"
        );
        Ok(SaveDialogResult {
            canceled: true,
            file_path: None,
        })
    }
}
