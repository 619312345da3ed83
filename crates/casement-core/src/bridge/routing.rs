use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, error, warn};

use super::envelope::ResponseEnvelope;
use super::errors::HandlerError;
use super::handlers::{self, HandlerResult};
use super::parse::parse_command;
use super::types::{BridgeCommand, CommandKind, Route};
use crate::app::HostContext;
use crate::errors::{CasementError, ConfigError};

/// Name → command table. Populated once at startup, then read-only.
#[derive(Debug, Default)]
pub struct CommandBridge {
    table: HashMap<String, CommandKind>,
}

impl CommandBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_commands() -> Result<Self, ConfigError> {
        let mut bridge = Self::new();
        bridge.register_defaults()?;
        Ok(bridge)
    }

    pub fn register_defaults(&mut self) -> Result<(), ConfigError> {
        for kind in CommandKind::ALL {
            self.register(kind.name(), kind)?;
        }
        debug!(event = "core.bridge.register_completed", commands = self.len());
        Ok(())
    }

    /// Fails if `name` is already taken.
    pub fn register(&mut self, name: &str, kind: CommandKind) -> Result<(), ConfigError> {
        if self.table.contains_key(name) {
            return Err(ConfigError::DuplicateCommand {
                name: name.to_string(),
            });
        }
        self.table.insert(name.to_string(), kind);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<CommandKind> {
        self.table.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.table.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn parse(&self, name: &str, args: &[Value]) -> Result<BridgeCommand, HandlerError> {
        let kind = self
            .lookup(name)
            .ok_or_else(|| HandlerError::UnknownCommand {
                name: name.to_string(),
            })?;
        parse_command(kind, args)
    }

    pub fn route(&self, name: &str, args: &[Value]) -> Result<Route, HandlerError> {
        Ok(self.parse(name, args)?.route())
    }

    /// Decode, execute and wrap one command. Always yields exactly one
    /// envelope.
    pub async fn dispatch(
        &self,
        ctx: &mut HostContext,
        name: &str,
        args: &[Value],
    ) -> ResponseEnvelope<Value> {
        debug!(event = "core.bridge.dispatch_started", command = name);

        let result = match self.route(name, args) {
            Ok(Route::Inline(command)) => handlers::run_inline(ctx, command),
            Ok(Route::Background(command)) => {
                handlers::run_file(command, ctx.dialogs.clone()).await
            }
            Err(e) => Err(e),
        };

        respond(name, result)
    }
}

/// Wrap a handler result in an envelope, logging failures.
pub fn respond(name: &str, result: HandlerResult) -> ResponseEnvelope<Value> {
    match result {
        Ok(Some(data)) => {
            debug!(event = "core.bridge.dispatch_completed", command = name);
            ResponseEnvelope::ok(data)
        }
        Ok(None) => {
            debug!(event = "core.bridge.dispatch_completed", command = name);
            ResponseEnvelope::ok_empty()
        }
        Err(e) => {
            if e.is_user_error() {
                warn!(
                    event = "core.bridge.dispatch_failed",
                    command = name,
                    error = %e,
                    error_code = e.error_code()
                );
            } else {
                error!(
                    event = "core.bridge.dispatch_failed",
                    command = name,
                    error = %e,
                    error_code = e.error_code()
                );
            }
            ResponseEnvelope::err(e.to_string())
        }
    }
}
