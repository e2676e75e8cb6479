//! Configuration management
//!
//! Settings are layered from TOML files and environment variables.
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base configuration (optional)
//! 2. `local.toml` - Local overrides (optional)
//! 3. Provider config file - replaces the `[providers]` section when present
//! 4. `NOTIFY_*` environment variables
//! 5. Command-line flags (applied by the CLI layer)

pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, HttpSettings, LoggerSettings, RelaySettings, Settings,
};
