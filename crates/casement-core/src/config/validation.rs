//! Configuration validation logic.

use crate::config::types::CasementConfig;
use crate::errors::ConfigError;

/// Validate a CasementConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - Window and minimum dimensions must be positive
/// - Minimum dimensions must not exceed the initial size
/// - The development server URL must be http(s)
pub fn validate_config(config: &CasementConfig) -> Result<(), ConfigError> {
    let window = &config.window;
    let (width, height) = (window.width(), window.height());
    let (min_width, min_height) = (window.min_width(), window.min_height());

    if width == 0 || height == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "Window size must be positive, got {}x{}",
                width, height
            ),
        });
    }

    if min_width == 0 || min_height == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "Minimum window size must be positive, got {}x{}",
                min_width, min_height
            ),
        });
    }

    if min_width > width || min_height > height {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "Minimum window size {}x{} exceeds initial size {}x{}",
                min_width, min_height, width, height
            ),
        });
    }

    let url = config.app.dev_server_url();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("Invalid dev_server_url '{}': must start with http:// or https://", url),
        });
    }

    Ok(())
}
