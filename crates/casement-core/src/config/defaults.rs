//! Default implementations for configuration types.
//!
//! This module contains all `Default` implementations, serde default
//! helpers and the resolved accessors that fall back to built-in values.

use crate::config::types::{AppConfig, Environment, PathsConfig, WindowSection};
use std::path::PathBuf;

pub const DEFAULT_TITLE: &str = "Casement Desktop App";
pub const DEFAULT_DEV_SERVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_BUNDLE_DIR: &str = "bundled";
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 3000;

pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 800;
pub const DEFAULT_MIN_WIDTH: u32 = 800;
pub const DEFAULT_MIN_HEIGHT: u32 = 600;
pub const DEFAULT_PRELOAD: &str = "preload.js";

/// Whether the platform convention is to keep the process alive once the
/// last window is gone.
pub fn platform_keeps_alive() -> bool {
    cfg!(target_os = "macos")
}

impl WindowSection {
    pub fn width(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    pub fn height(&self) -> u32 {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }

    pub fn min_width(&self) -> u32 {
        self.min_width.unwrap_or(DEFAULT_MIN_WIDTH)
    }

    pub fn min_height(&self) -> u32 {
        self.min_height.unwrap_or(DEFAULT_MIN_HEIGHT)
    }

    pub fn resizable(&self) -> bool {
        self.resizable.unwrap_or(true)
    }

    /// Frameless unless configured otherwise.
    pub fn frame(&self) -> bool {
        self.frame.unwrap_or(false)
    }

    pub fn preload(&self) -> &str {
        self.preload.as_deref().unwrap_or(DEFAULT_PRELOAD)
    }
}

impl AppConfig {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_default()
    }

    pub fn dev_server_url(&self) -> &str {
        self.dev_server_url
            .as_deref()
            .unwrap_or(DEFAULT_DEV_SERVER_URL)
    }

    pub fn bundle_dir(&self) -> PathBuf {
        self.bundle_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BUNDLE_DIR))
    }

    pub fn keep_alive_without_windows(&self) -> bool {
        self.keep_alive_without_windows
            .unwrap_or_else(platform_keeps_alive)
    }

    pub fn shutdown_timeout_ms(&self) -> u64 {
        self.shutdown_timeout_ms
            .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_MS)
    }
}

impl PathsConfig {
    /// Resolve the runtime directory, defaulting to `~/.casement/run`.
    ///
    /// Falls back to the system temp directory when no home directory is
    /// available (e.g. minimal CI containers).
    pub fn runtime_dir(&self) -> PathBuf {
        if let Some(dir) = &self.runtime_dir {
            return dir.clone();
        }
        match dirs::home_dir() {
            Some(home) => home.join(".casement").join("run"),
            None => std::env::temp_dir().join("casement"),
        }
    }

    pub fn lock_path(&self) -> PathBuf {
        self.runtime_dir().join("casement.lock")
    }

    pub fn instance_socket_path(&self) -> PathBuf {
        self.runtime_dir().join("instance.sock")
    }

    pub fn bridge_socket_path(&self) -> PathBuf {
        self.runtime_dir().join("bridge.sock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_section_defaults_match_main_window() {
        let section = WindowSection::default();
        assert_eq!(section.width(), 1200);
        assert_eq!(section.height(), 800);
        assert_eq!(section.min_width(), 800);
        assert_eq!(section.min_height(), 600);
        assert!(section.resizable());
        assert!(!section.frame());
        assert_eq!(section.preload(), "preload.js");
    }

    #[test]
    fn test_app_config_resolved_defaults() {
        let app = AppConfig::default();
        assert_eq!(app.title(), DEFAULT_TITLE);
        assert_eq!(app.environment(), Environment::Production);
        assert_eq!(app.dev_server_url(), "http://localhost:8080");
        assert_eq!(app.bundle_dir(), PathBuf::from("bundled"));
        assert_eq!(app.shutdown_timeout_ms(), 3000);
        assert_eq!(app.keep_alive_without_windows(), platform_keeps_alive());
    }

    #[test]
    fn test_runtime_paths_share_directory() {
        let paths = PathsConfig {
            runtime_dir: Some(PathBuf::from("/tmp/casement-test")),
        };
        assert_eq!(
            paths.lock_path(),
            PathBuf::from("/tmp/casement-test/casement.lock")
        );
        assert_eq!(
            paths.instance_socket_path(),
            PathBuf::from("/tmp/casement-test/instance.sock")
        );
        assert_eq!(
            paths.bridge_socket_path(),
            PathBuf::from("/tmp/casement-test/bridge.sock")
        );
    }
}
