//! Decoding positional JSON arguments into typed commands.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::HandlerError;
use super::types::{AppCommand, BridgeCommand, CommandKind, FileCommand, WindowCommand};
use crate::files::SystemPathKind;
use crate::window::WindowOptions;

/// Positional arguments of one invocation. JSON `null` counts as absent.
struct Args<'a> {
    command: &'static str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn get(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index).filter(|v| !v.is_null())
    }

    fn invalid(&self, name: &'static str, message: impl Into<String>) -> HandlerError {
        HandlerError::InvalidArgument {
            command: self.command,
            name,
            message: message.into(),
        }
    }

    fn optional_string(
        &self,
        index: usize,
        name: &'static str,
    ) -> Result<Option<String>, HandlerError> {
        match self.get(index) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.invalid(
                name,
                format!("expected a string, got {}", json_type(other)),
            )),
        }
    }

    fn required_string(&self, index: usize, name: &'static str) -> Result<String, HandlerError> {
        self.optional_string(index, name)?
            .ok_or(HandlerError::MissingArgument {
                command: self.command,
                name,
            })
    }

    fn required_path(&self, index: usize) -> Result<PathBuf, HandlerError> {
        let path = self.required_string(index, "path")?;
        if path.is_empty() {
            return Err(self.invalid("path", "must not be empty"));
        }
        Ok(PathBuf::from(path))
    }

    fn optional<T: DeserializeOwned>(
        &self,
        index: usize,
        name: &'static str,
    ) -> Result<Option<T>, HandlerError> {
        match self.get(index) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| self.invalid(name, e.to_string())),
        }
    }

    /// Any JSON value, `null` included.
    fn required_value(&self, index: usize, name: &'static str) -> Result<Value, HandlerError> {
        self.values
            .get(index)
            .cloned()
            .ok_or(HandlerError::MissingArgument {
                command: self.command,
                name,
            })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Build the typed command for `kind` from its positional arguments.
pub fn parse_command(kind: CommandKind, values: &[Value]) -> Result<BridgeCommand, HandlerError> {
    let args = Args {
        command: kind.name(),
        values,
    };

    let command = match kind {
        CommandKind::WindowMinimize => BridgeCommand::Window(WindowCommand::Minimize {
            id: args.optional_string(0, "id")?,
        }),
        CommandKind::WindowMaximize => BridgeCommand::Window(WindowCommand::Maximize {
            id: args.optional_string(0, "id")?,
        }),
        CommandKind::WindowClose => BridgeCommand::Window(WindowCommand::Close {
            id: args.optional_string(0, "id")?,
        }),
        CommandKind::WindowIsMaximized => BridgeCommand::Window(WindowCommand::IsMaximized {
            id: args.optional_string(0, "id")?,
        }),
        CommandKind::WindowCreateChild => {
            let (id, options) = parse_create_child(&args)?;
            BridgeCommand::Window(WindowCommand::CreateChild { id, options })
        }
        CommandKind::WindowCloseChild => BridgeCommand::Window(WindowCommand::CloseChild {
            id: args.required_string(0, "id")?,
        }),
        CommandKind::WindowGetAllWindows => BridgeCommand::Window(WindowCommand::GetAllWindows),

        CommandKind::FileRead => BridgeCommand::File(FileCommand::Read {
            path: args.required_path(0)?,
            encoding: args.optional_string(1, "encoding")?,
        }),
        CommandKind::FileWrite => BridgeCommand::File(FileCommand::Write {
            path: args.required_path(0)?,
            content: args.required_string(1, "content")?,
        }),
        CommandKind::FileExists => BridgeCommand::File(FileCommand::Exists {
            path: args.required_path(0)?,
        }),
        CommandKind::FileGetInfo => BridgeCommand::File(FileCommand::GetInfo {
            path: args.required_path(0)?,
        }),
        CommandKind::FileListDirectory => BridgeCommand::File(FileCommand::ListDirectory {
            path: args.required_path(0)?,
        }),
        CommandKind::FileReadJson => BridgeCommand::File(FileCommand::ReadJson {
            path: args.required_path(0)?,
        }),
        CommandKind::FileWriteJson => BridgeCommand::File(FileCommand::WriteJson {
            path: args.required_path(0)?,
            value: args.required_value(1, "data")?,
        }),
        CommandKind::FileGetSystemPath => {
            let kind: SystemPathKind = args.required_string(0, "kind")?.parse()?;
            BridgeCommand::File(FileCommand::GetSystemPath { kind })
        }
        CommandKind::FileShowOpenDialog => BridgeCommand::File(FileCommand::ShowOpenDialog {
            options: args.optional(0, "options")?.unwrap_or_default(),
        }),
        CommandKind::FileShowSaveDialog => BridgeCommand::File(FileCommand::ShowSaveDialog {
            options: args.optional(0, "options")?.unwrap_or_default(),
        }),

        CommandKind::AppGetVersion => BridgeCommand::App(AppCommand::GetVersion),
        CommandKind::AppGetPlatform => BridgeCommand::App(AppCommand::GetPlatform),
        CommandKind::AppGetEnvironment => BridgeCommand::App(AppCommand::GetEnvironment),
        CommandKind::AppGetTitle => BridgeCommand::App(AppCommand::GetTitle),
    };

    Ok(command)
}

/// `createChild` takes either `(id?, config?)` or a single config object
/// that may carry its own `id`.
fn parse_create_child(args: &Args<'_>) -> Result<(Option<String>, WindowOptions), HandlerError> {
    if let Some(Value::Object(map)) = args.get(0) {
        let id = match map.get("id") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id.clone()),
            Some(other) => {
                return Err(args.invalid(
                    "id",
                    format!("expected a string, got {}", json_type(other)),
                ));
            }
        };
        let options = args.optional(0, "config")?.unwrap_or_default();
        return Ok((id, options));
    }

    let id = args.optional_string(0, "id")?;
    let options = args.optional(1, "config")?.unwrap_or_default();
    Ok((id, options))
}
