pub mod dialog;
pub mod errors;
pub mod operations;
pub mod types;

pub use dialog::{DialogProvider, HeadlessDialogs};
pub use errors::FileError;
pub use types::{
    FileFilter, FileInfo, OpenDialogOptions, OpenDialogResult, SaveDialogOptions,
    SaveDialogResult, SystemPathKind,
};
