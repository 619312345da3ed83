use std::path::PathBuf;

use serde_json::Value;

use crate::files::{OpenDialogOptions, SaveDialogOptions, SystemPathKind};
use crate::window::WindowOptions;

/// Every command the bridge knows. Names exist only at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    WindowMinimize,
    WindowMaximize,
    WindowClose,
    WindowIsMaximized,
    WindowCreateChild,
    WindowCloseChild,
    WindowGetAllWindows,
    FileRead,
    FileWrite,
    FileExists,
    FileGetInfo,
    FileListDirectory,
    FileReadJson,
    FileWriteJson,
    FileGetSystemPath,
    FileShowOpenDialog,
    FileShowSaveDialog,
    AppGetVersion,
    AppGetPlatform,
    AppGetEnvironment,
    AppGetTitle,
}

impl CommandKind {
    pub const ALL: [CommandKind; 21] = [
        CommandKind::WindowMinimize,
        CommandKind::WindowMaximize,
        CommandKind::WindowClose,
        CommandKind::WindowIsMaximized,
        CommandKind::WindowCreateChild,
        CommandKind::WindowCloseChild,
        CommandKind::WindowGetAllWindows,
        CommandKind::FileRead,
        CommandKind::FileWrite,
        CommandKind::FileExists,
        CommandKind::FileGetInfo,
        CommandKind::FileListDirectory,
        CommandKind::FileReadJson,
        CommandKind::FileWriteJson,
        CommandKind::FileGetSystemPath,
        CommandKind::FileShowOpenDialog,
        CommandKind::FileShowSaveDialog,
        CommandKind::AppGetVersion,
        CommandKind::AppGetPlatform,
        CommandKind::AppGetEnvironment,
        CommandKind::AppGetTitle,
    ];

    /// Wire name, e.g. `window:minimize`.
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::WindowMinimize => "window:minimize",
            CommandKind::WindowMaximize => "window:maximize",
            CommandKind::WindowClose => "window:close",
            CommandKind::WindowIsMaximized => "window:isMaximized",
            CommandKind::WindowCreateChild => "window:createChild",
            CommandKind::WindowCloseChild => "window:closeChild",
            CommandKind::WindowGetAllWindows => "window:getAllWindows",
            CommandKind::FileRead => "file:read",
            CommandKind::FileWrite => "file:write",
            CommandKind::FileExists => "file:exists",
            CommandKind::FileGetInfo => "file:getInfo",
            CommandKind::FileListDirectory => "file:listDirectory",
            CommandKind::FileReadJson => "file:readJson",
            CommandKind::FileWriteJson => "file:writeJson",
            CommandKind::FileGetSystemPath => "file:getSystemPath",
            CommandKind::FileShowOpenDialog => "file:showOpenDialog",
            CommandKind::FileShowSaveDialog => "file:showSaveDialog",
            CommandKind::AppGetVersion => "app:getVersion",
            CommandKind::AppGetPlatform => "app:getPlatform",
            CommandKind::AppGetEnvironment => "app:getEnvironment",
            CommandKind::AppGetTitle => "app:getTitle",
        }
    }
}

/// A fully decoded command, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCommand {
    Window(WindowCommand),
    File(FileCommand),
    App(AppCommand),
}

/// Window commands. A missing id targets the main window.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowCommand {
    Minimize { id: Option<String> },
    Maximize { id: Option<String> },
    Close { id: Option<String> },
    IsMaximized { id: Option<String> },
    CreateChild {
        id: Option<String>,
        options: WindowOptions,
    },
    CloseChild { id: String },
    GetAllWindows,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileCommand {
    Read {
        path: PathBuf,
        encoding: Option<String>,
    },
    Write {
        path: PathBuf,
        content: String,
    },
    Exists { path: PathBuf },
    GetInfo { path: PathBuf },
    ListDirectory { path: PathBuf },
    ReadJson { path: PathBuf },
    WriteJson { path: PathBuf, value: Value },
    GetSystemPath { kind: SystemPathKind },
    ShowOpenDialog { options: OpenDialogOptions },
    ShowSaveDialog { options: SaveDialogOptions },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    GetVersion,
    GetPlatform,
    GetEnvironment,
    GetTitle,
}

/// Where a command executes.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// On the host loop, against window state and config.
    Inline(InlineCommand),
    /// On a spawned task. Never touches window state.
    Background(FileCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InlineCommand {
    Window(WindowCommand),
    App(AppCommand),
}

impl BridgeCommand {
    pub fn route(self) -> Route {
        match self {
            BridgeCommand::Window(cmd) => Route::Inline(InlineCommand::Window(cmd)),
            BridgeCommand::App(cmd) => Route::Inline(InlineCommand::App(cmd)),
            BridgeCommand::File(cmd) => Route::Background(cmd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_command_names_are_unique_and_namespaced() {
        let names: HashSet<&str> = CommandKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), CommandKind::ALL.len());
        assert!(names.iter().all(|n| n.starts_with("window:")
            || n.starts_with("file:")
            || n.starts_with("app:")));
    }

    #[test]
    fn test_file_commands_route_to_background() {
        let command = BridgeCommand::File(FileCommand::Exists {
            path: PathBuf::from("/tmp"),
        });
        assert!(matches!(command.route(), Route::Background(_)));

        let command = BridgeCommand::Window(WindowCommand::GetAllWindows);
        assert!(matches!(
            command.route(),
            Route::Inline(InlineCommand::Window(_))
        ));
    }
}
