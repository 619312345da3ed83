//! Configuration type definitions for the Casement host.
//!
//! # Example Configuration
//!
//! ```toml
//! [app]
//! title = "Notes"
//! environment = "production"
//! bundle_dir = "dist"
//! keep_alive_without_windows = false
//! shutdown_timeout_ms = 3000
//!
//! [window]
//! width = 1200
//! height = 800
//! min_width = 800
//! min_height = 600
//! frame = false
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::ConfigError;

/// Main configuration loaded from TOML config files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CasementConfig {
    /// Application-wide settings
    #[serde(default)]
    pub app: AppConfig,

    /// Defaults for the main window
    #[serde(default)]
    pub window: WindowSection,

    /// Filesystem locations used at runtime
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Build/run classification of the host.
///
/// Decides where the main window loads its content from and whether
/// devtools are opened. Read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::InvalidEnvironment {
                value: other.to_string(),
            }),
        }
    }
}

/// `[app]` section.
///
/// Optional fields distinguish "not set in this file" from an explicit value,
/// so a project config only overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub environment: Option<Environment>,

    /// Development server the main window loads in development.
    #[serde(default)]
    pub dev_server_url: Option<String>,

    /// Directory holding the bundled `index.html` for production.
    #[serde(default)]
    pub bundle_dir: Option<PathBuf>,

    /// Keep running after the last window closes. Defaults to the platform
    /// convention (true on macOS, false elsewhere).
    #[serde(default)]
    pub keep_alive_without_windows: Option<bool>,

    /// Upper bound for the before-quit cleanup step.
    #[serde(default)]
    pub shutdown_timeout_ms: Option<u64>,
}

/// `[window]` section: geometry and chrome of the main window.
///
/// Every field is optional so a later config file only overrides what it
/// names. Resolved values come from the accessors in `defaults.rs`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WindowSection {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub min_width: Option<u32>,
    #[serde(default)]
    pub min_height: Option<u32>,
    #[serde(default)]
    pub resizable: Option<bool>,
    #[serde(default)]
    pub frame: Option<bool>,
    #[serde(default)]
    pub preload: Option<String>,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathsConfig {
    /// Directory for the instance lock and IPC sockets.
    #[serde(default)]
    pub runtime_dir: Option<PathBuf>,
}
