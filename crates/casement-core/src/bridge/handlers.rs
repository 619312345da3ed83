//! Command execution.
//!
//! Window and app commands run inline on the host loop. File commands are
//! async and are awaited by whoever holds the reply channel.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::errors::HandlerError;
use super::types::{AppCommand, FileCommand, InlineCommand, WindowCommand};
use crate::app::HostContext;
use crate::config::CasementConfig;
use crate::files::{DialogProvider, operations};
use crate::window::{MAIN_WINDOW_ID, WindowLifecycleController};

/// `None` is a success without payload.
pub type HandlerResult = Result<Option<Value>, HandlerError>;

fn encode<T: Serialize>(value: T) -> HandlerResult {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| HandlerError::Encode {
            message: e.to_string(),
        })
}

fn target(id: &Option<String>) -> &str {
    id.as_deref().unwrap_or(MAIN_WINDOW_ID)
}

pub fn run_inline(ctx: &mut HostContext, command: InlineCommand) -> HandlerResult {
    match command {
        InlineCommand::Window(cmd) => run_window(&mut ctx.windows, cmd),
        InlineCommand::App(cmd) => run_app(&ctx.config, cmd),
    }
}

pub fn run_window(windows: &mut WindowLifecycleController, command: WindowCommand) -> HandlerResult {
    match command {
        WindowCommand::Minimize { id } => {
            windows.minimize(target(&id));
            Ok(None)
        }
        WindowCommand::Maximize { id } => {
            windows.toggle_maximize(target(&id));
            Ok(None)
        }
        WindowCommand::Close { id } => {
            windows.close(target(&id));
            Ok(None)
        }
        WindowCommand::IsMaximized { id } => Ok(Some(Value::Bool(
            windows.is_maximized(target(&id)),
        ))),
        WindowCommand::CreateChild { id, options } => {
            let handle = windows.create_child(id.as_deref(), &options)?;
            Ok(Some(Value::String(handle.id)))
        }
        WindowCommand::CloseChild { id } => {
            windows.close(&id);
            Ok(None)
        }
        WindowCommand::GetAllWindows => encode(windows.summaries()),
    }
}

pub fn run_app(config: &CasementConfig, command: AppCommand) -> HandlerResult {
    let value = match command {
        AppCommand::GetVersion => env!("CARGO_PKG_VERSION").to_string(),
        AppCommand::GetPlatform => platform_name().to_string(),
        AppCommand::GetEnvironment => config.app.environment().as_str().to_string(),
        AppCommand::GetTitle => config.app.title().to_string(),
    };
    Ok(Some(Value::String(value)))
}

/// Platform identifier in the form UI code expects (`darwin`, `win32`,
/// `linux`, ...).
pub fn platform_name() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

pub async fn run_file(command: FileCommand, dialogs: Arc<dyn DialogProvider>) -> HandlerResult {
    match command {
        FileCommand::Read { path, encoding } => {
            let content = operations::read_file(&path, encoding.as_deref()).await?;
            Ok(Some(Value::String(content)))
        }
        FileCommand::Write { path, content } => {
            operations::write_file(&path, &content).await?;
            Ok(None)
        }
        FileCommand::Exists { path } => Ok(Some(Value::Bool(operations::exists(&path).await))),
        FileCommand::GetInfo { path } => encode(operations::file_info(&path).await?),
        FileCommand::ListDirectory { path } => encode(operations::list_directory(&path).await?),
        FileCommand::ReadJson { path } => Ok(Some(operations::read_json(&path).await?)),
        FileCommand::WriteJson { path, value } => {
            operations::write_json(&path, &value).await?;
            Ok(None)
        }
        FileCommand::GetSystemPath { kind } => {
            let path = operations::system_path(kind)?;
            Ok(Some(Value::String(path.display().to_string())))
        }
        FileCommand::ShowOpenDialog { options } => {
            debug!(event = "core.dialog.open_started", title = ?options.title);
            let result =
                tokio::task::spawn_blocking(move || dialogs.show_open(&options))
                    .await
                    .map_err(|e| HandlerError::TaskFailed {
                        message: e.to_string(),
                    })??;
            encode(result)
        }
        FileCommand::ShowSaveDialog { options } => {
            debug!(event = "core.dialog.save_started", title = ?options.title);
            let result =
                tokio::task::spawn_blocking(move || dialogs.show_save(&options))
                    .await
                    .map_err(|e| HandlerError::TaskFailed {
                        message: e.to_string(),
                    })??;
            encode(result)
        }
    }
}
