use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::CasementConfig;

/// Id reserved for the primary window.
pub const MAIN_WINDOW_ID: &str = "main";

/// Scheme the bundled UI is served from in production.
pub const APP_PROTOCOL: &str = "app";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Main,
    Child,
}

/// Per-window lifecycle phase.
///
/// `Created → Ready → {Normal, Minimized, Maximized} ⇄ … → Closed`.
/// The three display phases together make up "shown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPhase {
    /// Platform object exists, surface has not reported ready-to-show yet.
    Created,
    /// Surface is ready but the window was created hidden.
    Ready,
    Normal,
    Minimized,
    Maximized,
    Closed,
}

impl WindowPhase {
    pub fn is_shown(&self) -> bool {
        matches!(
            self,
            WindowPhase::Normal | WindowPhase::Minimized | WindowPhase::Maximized
        )
    }
}

/// Registry record for one native window.
///
/// Holds identity and last observed display state, never the platform
/// object itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub id: String,
    pub kind: WindowKind,
    /// Id of the parent window. A relation, not ownership.
    pub parent: Option<String>,
    pub title: String,
    pub visible: bool,
    pub maximized: bool,
    pub minimized: bool,
    pub destroyed: bool,
    pub phase: WindowPhase,
}

impl Window {
    pub fn new(id: impl Into<String>, kind: WindowKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            parent: None,
            title: title.into(),
            visible: false,
            maximized: false,
            minimized: false,
            destroyed: false,
            phase: WindowPhase::Created,
        }
    }

    pub fn with_parent(mut self, parent: Option<String>) -> Self {
        self.parent = parent;
        self
    }

    pub fn is_main(&self) -> bool {
        self.kind == WindowKind::Main
    }
}

/// Opaque reference handed back to callers after creation.
///
/// Carries only the identity; platform handles never leave the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowHandle {
    pub id: String,
    pub kind: WindowKind,
}

/// Window options as supplied by the UI side (camelCase on the wire).
///
/// Every field is optional; unset fields fall back to [`WindowDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `false` keeps the window hidden after it reports ready-to-show.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
}

/// Fallback geometry and chrome applied to [`WindowOptions`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDefaults {
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub resizable: bool,
    pub frame: bool,
    pub title: String,
    pub preload: String,
}

impl WindowDefaults {
    /// Defaults for the main window, taken from `[window]` and `[app]`.
    pub fn main_from_config(config: &CasementConfig) -> Self {
        let section = &config.window;
        Self {
            width: section.width(),
            height: section.height(),
            min_width: section.min_width(),
            min_height: section.min_height(),
            resizable: section.resizable(),
            frame: section.frame(),
            title: config.app.title().to_string(),
            preload: section.preload().to_string(),
        }
    }

    /// Defaults for child windows: a framed 800x600 window sharing the
    /// app title and preload script.
    pub fn child_from_config(config: &CasementConfig) -> Self {
        Self {
            width: 800,
            height: 600,
            min_width: 0,
            min_height: 0,
            resizable: true,
            frame: true,
            title: config.app.title().to_string(),
            preload: config.window.preload().to_string(),
        }
    }
}

/// Where a window's UI surface loads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentSource {
    DevServer { url: String },
    Bundled { root: PathBuf },
}

impl ContentSource {
    /// Resolve once from the environment classification.
    pub fn from_config(config: &CasementConfig) -> Self {
        if config.app.environment().is_development() {
            ContentSource::DevServer {
                url: config.app.dev_server_url().to_string(),
            }
        } else {
            ContentSource::Bundled {
                root: config.app.bundle_dir(),
            }
        }
    }

    /// Location string handed to the platform surface.
    pub fn location(&self) -> String {
        match self {
            ContentSource::DevServer { url } => url.clone(),
            ContentSource::Bundled { .. } => format!("{}://./index.html", APP_PROTOCOL),
        }
    }
}

/// Fully resolved build parameters passed to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub id: String,
    pub kind: WindowKind,
    pub parent: Option<String>,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub resizable: bool,
    pub frame: bool,
    /// Always false at build time; visibility waits for ready-to-show.
    pub show: bool,
    pub show_when_ready: bool,
    pub preload: String,
    pub context_isolation: bool,
    pub node_integration: bool,
}

impl WindowSpec {
    pub fn resolve(
        id: &str,
        kind: WindowKind,
        parent: Option<String>,
        options: &WindowOptions,
        defaults: &WindowDefaults,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            parent,
            title: options
                .title
                .clone()
                .unwrap_or_else(|| defaults.title.clone()),
            width: options.width.unwrap_or(defaults.width),
            height: options.height.unwrap_or(defaults.height),
            min_width: options.min_width.unwrap_or(defaults.min_width),
            min_height: options.min_height.unwrap_or(defaults.min_height),
            resizable: options.resizable.unwrap_or(defaults.resizable),
            frame: options.frame.unwrap_or(defaults.frame),
            show: false,
            show_when_ready: options.show.unwrap_or(true),
            preload: defaults.preload.clone(),
            context_isolation: true,
            node_integration: false,
        }
    }
}

/// Entry returned by `window:getAllWindows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub id: String,
    pub title: String,
    pub visible: bool,
    pub maximized: bool,
    pub minimized: bool,
}

impl From<&Window> for WindowSummary {
    fn from(window: &Window) -> Self {
        Self {
            id: window.id.clone(),
            title: window.title.clone(),
            visible: window.visible,
            maximized: window.maximized,
            minimized: window.minimized,
        }
    }
}

/// Whether a lifecycle operation touched a live window.
///
/// Operations on unknown ids are not errors: UI and host race on close, so
/// the id may already be gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped,
}

/// Notices the controller queues for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleNotice {
    WindowClosed { id: String },
    MainWindowClosed,
    AllWindowsClosed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn test_window_options_deserialize_camel_case() {
        let json = r#"{"width":640,"minWidth":320,"title":"Settings","show":false}"#;
        let options: WindowOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.width, Some(640));
        assert_eq!(options.min_width, Some(320));
        assert_eq!(options.title.as_deref(), Some("Settings"));
        assert_eq!(options.show, Some(false));
        assert_eq!(options.height, None);
    }

    #[test]
    fn test_spec_resolve_uses_defaults_for_unset_fields() {
        let defaults = WindowDefaults::main_from_config(&CasementConfig::default());
        let options = WindowOptions {
            width: Some(1000),
            ..Default::default()
        };
        let spec = WindowSpec::resolve(MAIN_WINDOW_ID, WindowKind::Main, None, &options, &defaults);
        assert_eq!(spec.width, 1000);
        assert_eq!(spec.height, 800);
        assert_eq!(spec.min_width, 800);
        assert!(!spec.frame);
        assert!(!spec.show);
        assert!(spec.show_when_ready);
        assert!(spec.context_isolation);
        assert!(!spec.node_integration);
    }

    #[test]
    fn test_content_source_follows_environment() {
        let mut config = CasementConfig::default();
        let source = ContentSource::from_config(&config);
        assert_eq!(source.location(), "app://./index.html");

        config.app.environment = Some(Environment::Development);
        let source = ContentSource::from_config(&config);
        assert_eq!(source.location(), "http://localhost:8080");
    }

    #[test]
    fn test_phase_is_shown() {
        assert!(!WindowPhase::Created.is_shown());
        assert!(!WindowPhase::Ready.is_shown());
        assert!(WindowPhase::Normal.is_shown());
        assert!(WindowPhase::Maximized.is_shown());
        assert!(!WindowPhase::Closed.is_shown());
    }
}
