use std::error::Error;

/// Base trait for all application errors
pub trait CasementError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found at '{path}'")]
    ConfigNotFound { path: String },

    #[error("Failed to parse config file: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid environment '{value}'. Supported environments: development, production")]
    InvalidEnvironment { value: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Command '{name}' is registered more than once")]
    DuplicateCommand { name: String },

    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },
}

impl CasementError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidEnvironment { .. } => "INVALID_ENVIRONMENT",
            ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            ConfigError::DuplicateCommand { .. } => "DUPLICATE_COMMAND",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigParseError { .. }
                | ConfigError::InvalidEnvironment { .. }
                | ConfigError::InvalidConfiguration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_not_a_user_error() {
        let error = ConfigError::ConfigNotFound {
            path: "/tmp/none.toml".to_string(),
        };
        assert_eq!(error.to_string(), "Config file not found at '/tmp/none.toml'");
        assert_eq!(error.error_code(), "CONFIG_NOT_FOUND");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_invalid_environment_display() {
        let error = ConfigError::InvalidEnvironment {
            value: "staging".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid environment 'staging'. Supported environments: development, production"
        );
        assert_eq!(error.error_code(), "INVALID_ENVIRONMENT");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_duplicate_command_is_not_user_error() {
        let error = ConfigError::DuplicateCommand {
            name: "window:minimize".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Command 'window:minimize' is registered more than once"
        );
        assert_eq!(error.error_code(), "DUPLICATE_COMMAND");
        assert!(!error.is_user_error());
    }
}
