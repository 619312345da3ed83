//! # Configuration System
//!
//! Hierarchical TOML configuration for the Casement host.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.casement/config.toml` (global user preferences)
//! 3. **Project config** - `./.casement/config.toml` (project-specific overrides)
//! 4. **Environment** - `CASEMENT_ENV` selects development or production
//! 5. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.casement/config.toml
//! [app]
//! title = "My Desktop App"
//! environment = "development"
//! dev_server_url = "http://localhost:5173"
//!
//! [window]
//! width = 1440
//! height = 900
//!
//! [paths]
//! runtime_dir = "/tmp/casement"
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use casement_core::config::CasementConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CasementConfig::load_hierarchy()?;
//!     println!("runtime dir: {}", config.paths.runtime_dir().display());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{AppConfig, CasementConfig, Environment, PathsConfig, WindowSection};
pub use validation::validate_config;

impl CasementConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
