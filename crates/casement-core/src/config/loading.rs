//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.casement/config.toml`
//! 3. **Project config** - `./.casement/config.toml`
//! 4. **Environment** - `CASEMENT_ENV`

use crate::config::types::{AppConfig, CasementConfig, PathsConfig, WindowSection};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Environment variable that selects development or production.
pub const ENVIRONMENT_VAR: &str = "CASEMENT_ENV";

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be parsed, or if the
/// merged result fails validation. Missing config files are not errors.
pub fn load_hierarchy() -> Result<CasementConfig, ConfigError> {
    let mut config = CasementConfig::default();

    match load_user_config() {
        Ok(user_config) => config = merge_configs(config, user_config),
        Err(ConfigError::ConfigNotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    match load_project_config() {
        Ok(project_config) => config = merge_configs(config, project_config),
        Err(ConfigError::ConfigNotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    apply_env_overrides(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

/// Load defaults merged with a single explicit config file (`--config`).
pub fn load_with_file(path: &Path) -> Result<CasementConfig, ConfigError> {
    let mut config = merge_configs(CasementConfig::default(), load_config_file(path)?);
    apply_env_overrides(&mut config)?;
    validate_config(&config)?;
    Ok(config)
}

fn load_user_config() -> Result<CasementConfig, ConfigError> {
    let Some(home_dir) = dirs::home_dir() else {
        return Err(ConfigError::ConfigNotFound {
            path: "~/.casement/config.toml".to_string(),
        });
    };
    load_config_file(&home_dir.join(".casement").join("config.toml"))
}

fn load_project_config() -> Result<CasementConfig, ConfigError> {
    let cwd = std::env::current_dir().map_err(|source| ConfigError::IoError {
        path: ".".to_string(),
        source,
    })?;
    load_config_file(&cwd.join(".casement").join("config.toml"))
}

/// Load a configuration file from the given path.
///
/// A missing file is `ConfigNotFound`, which the hierarchy skips.
pub fn load_config_file(path: &Path) -> Result<CasementConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            ConfigError::IoError {
                path: path.display().to_string(),
                source,
            }
        }
    })?;
    let config: CasementConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            message: format!("'{}': {}", path.display(), e),
        })?;
    debug!(event = "core.config.file_loaded", path = %path.display());
    Ok(config)
}

/// Apply `CASEMENT_ENV` on top of file configuration.
fn apply_env_overrides(config: &mut CasementConfig) -> Result<(), ConfigError> {
    if let Ok(value) = std::env::var(ENVIRONMENT_VAR)
        && !value.trim().is_empty()
    {
        config.app.environment = Some(value.parse()?);
    }
    Ok(())
}

/// Merge two configurations, with override_config taking precedence.
///
/// Fields are replaced only when the override sets them.
pub fn merge_configs(base: CasementConfig, override_config: CasementConfig) -> CasementConfig {
    CasementConfig {
        app: AppConfig {
            title: override_config.app.title.or(base.app.title),
            environment: override_config.app.environment.or(base.app.environment),
            dev_server_url: override_config
                .app
                .dev_server_url
                .or(base.app.dev_server_url),
            bundle_dir: override_config.app.bundle_dir.or(base.app.bundle_dir),
            keep_alive_without_windows: override_config
                .app
                .keep_alive_without_windows
                .or(base.app.keep_alive_without_windows),
            shutdown_timeout_ms: override_config
                .app
                .shutdown_timeout_ms
                .or(base.app.shutdown_timeout_ms),
        },
        window: WindowSection {
            width: override_config.window.width.or(base.window.width),
            height: override_config.window.height.or(base.window.height),
            min_width: override_config.window.min_width.or(base.window.min_width),
            min_height: override_config.window.min_height.or(base.window.min_height),
            resizable: override_config.window.resizable.or(base.window.resizable),
            frame: override_config.window.frame.or(base.window.frame),
            preload: override_config.window.preload.or(base.window.preload),
        },
        paths: PathsConfig {
            runtime_dir: override_config.paths.runtime_dir.or(base.paths.runtime_dir),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Environment;
    use crate::errors::CasementError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_merge_prefers_override_when_set() {
        let mut base = CasementConfig::default();
        base.app.title = Some("Base".to_string());
        base.app.dev_server_url = Some("http://localhost:3000".to_string());

        let mut over = CasementConfig::default();
        over.app.title = Some("Override".to_string());

        let merged = merge_configs(base, over);
        assert_eq!(merged.app.title(), "Override");
        assert_eq!(merged.app.dev_server_url(), "http://localhost:3000");
    }

    #[test]
    fn test_merge_keeps_base_runtime_dir() {
        let mut base = CasementConfig::default();
        base.paths.runtime_dir = Some(PathBuf::from("/tmp/base"));

        let merged = merge_configs(base, CasementConfig::default());
        assert_eq!(merged.paths.runtime_dir(), PathBuf::from("/tmp/base"));
    }

    #[test]
    fn test_project_app_section_keeps_user_window_size() {
        let dir = TempDir::new().unwrap();
        let user_path = dir.path().join("user.toml");
        let project_path = dir.path().join("project.toml");
        fs::write(&user_path, "[window]\nwidth = 1440\nheight = 900\n").unwrap();
        fs::write(&project_path, "[app]\ntitle = \"Notes\"\n").unwrap();

        let user = load_config_file(&user_path).unwrap();
        let project = load_config_file(&project_path).unwrap();
        let merged = merge_configs(merge_configs(CasementConfig::default(), user), project);

        assert_eq!(merged.app.title(), "Notes");
        assert_eq!((merged.window.width(), merged.window.height()), (1440, 900));
        assert_eq!(merged.window.min_width(), 800);
    }

    #[test]
    fn test_merge_window_fields_individually() {
        let mut base = CasementConfig::default();
        base.window.frame = Some(true);
        base.window.width = Some(1000);

        let mut over = CasementConfig::default();
        over.window.width = Some(1600);

        let merged = merge_configs(base, over);
        assert_eq!(merged.window.width(), 1600);
        assert!(merged.window.frame());
        assert_eq!(merged.window.preload(), "preload.js");
    }

    #[test]
    fn test_load_config_file_parses_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[app]
title = "Notes"
environment = "development"
keep_alive_without_windows = true

[window]
width = 1440
height = 900
"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.app.title(), "Notes");
        assert_eq!(config.app.environment(), Environment::Development);
        assert!(config.app.keep_alive_without_windows());
        assert_eq!(config.window.width(), 1440);
        assert_eq!(config.window.min_width(), 800);
    }

    #[test]
    fn test_load_config_file_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_config_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigNotFound { .. }));
        assert_eq!(err.error_code(), "CONFIG_NOT_FOUND");
    }

    #[test]
    fn test_load_config_file_unreadable_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config_file(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
        assert_eq!(err.error_code(), "CONFIG_IO_ERROR");
    }

    #[test]
    fn test_load_config_file_rejects_bad_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[app\ntitle = ").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }
}
