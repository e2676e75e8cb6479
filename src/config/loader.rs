//! Configuration loader
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::error::ConfigError;
use crate::config::settings::Settings;
use crate::providers::ProvidersConfig;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "NOTIFY_CONFIG_DIR";

/// Environment variable for a single configuration file
const CONFIG_FILE_ENV: &str = "NOTIFY_CONFIG_FILE";

/// Environment variable for the provider configuration file
pub const PROVIDER_CONFIG_ENV: &str = "NOTIFY_PROVIDER_CONFIG";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Provider config file name under the user configuration directory
const DEFAULT_PROVIDER_CONFIG: &str = "notify-relay/provider-config.toml";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "NOTIFY";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Where the provider table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum ProviderSource {
    /// Given on the command line or through the environment; must exist
    Explicit(PathBuf),
    /// Default location; skipped when missing
    Default(PathBuf),
    None,
}

/// Configuration loader that handles layered configuration loading
///
/// Sources, lowest priority first:
/// 1. `default.toml` (optional)
/// 2. `local.toml` (optional)
/// 3. `NOTIFY_*` environment variables
///
/// A single file given with `--config` or `NOTIFY_CONFIG_FILE` replaces the
/// two directory layers. The provider config file, when found, replaces the
/// `[providers]` section of the result.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    provider_config: ProviderSource,
}

impl ConfigLoader {
    /// Create a loader from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if both `NOTIFY_CONFIG_DIR` and `NOTIFY_CONFIG_FILE`
    /// are set, as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && std::env::var(CONFIG_DIR_ENV).is_ok() {
            return Err(ConfigError::conflict(
                "NOTIFY_CONFIG_DIR and NOTIFY_CONFIG_FILE cannot both be set. \
                 Use NOTIFY_CONFIG_DIR for layered configuration or \
                 NOTIFY_CONFIG_FILE for a single configuration file.",
            ));
        }

        let provider_config = match std::env::var(PROVIDER_CONFIG_ENV) {
            Ok(path) if !path.is_empty() => ProviderSource::Explicit(PathBuf::from(path)),
            _ => default_provider_config()
                .map(ProviderSource::Default)
                .unwrap_or(ProviderSource::None),
        };

        Ok(Self {
            config_dir,
            config_file,
            provider_config,
        })
    }

    /// Load a single configuration file instead of the directory layers
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Read providers from this file; it must exist
    pub fn with_provider_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.provider_config = ProviderSource::Explicit(path.into());
        self
    }

    /// Path of the provider config file that will be consulted, if any
    pub fn provider_config_path(&self) -> Option<&Path> {
        match &self.provider_config {
            ProviderSource::Explicit(path) | ProviderSource::Default(path) => Some(path),
            ProviderSource::None => None,
        }
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicitly requested file is missing
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let mut settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::parse(format!("Failed to deserialize configuration: {}", e))
        })?;

        if let Some(providers) = self.load_providers()? {
            settings.providers = providers;
        }

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = if let Some(ref config_file) = self.config_file {
            Self::add_file_source(builder, config_file, true)?
        } else {
            self.build_layered_config(builder)?
        };

        // NOTIFY_RELAY__CHAR_LIMIT -> relay.char_limit
        let builder = Self::add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    /// Read the provider file into its own table
    fn load_providers(&self) -> Result<Option<ProvidersConfig>, ConfigError> {
        let path = match &self.provider_config {
            ProviderSource::Explicit(path) => {
                if !path.exists() {
                    return Err(ConfigError::missing_file(format!(
                        "Provider configuration file not found: {}",
                        path.display()
                    )));
                }
                path
            }
            ProviderSource::Default(path) if path.exists() => path,
            _ => return Ok(None),
        };

        tracing::debug!(path = %path.display(), "loading provider configuration");

        let providers = Self::add_file_source(Config::builder(), path, true)?
            .build()?
            .try_deserialize::<ProvidersConfig>()
            .map_err(|e| {
                ConfigError::parse(format!(
                    "Failed to parse provider configuration {}: {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Some(providers))
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::missing_file(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(&path.to_string_lossy(), FileFormat::Toml).required(required),
        ))
    }

    /// `NOTIFY_*` variables map onto keys with `__` between sections, and
    /// the relay filters accept comma separated lists.
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .list_separator(",")
                .with_list_parse_key("relay.providers")
                .with_list_parse_key("relay.ids")
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            provider_config: ProviderSource::None,
        })
    }
}

/// `~/.config/notify-relay/provider-config.toml` on Linux
fn default_provider_config() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(DEFAULT_PROVIDER_CONFIG))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests touch process-wide environment variables
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            let path = temp_dir.path().join(name);
            fs::write(&path, content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Restores every touched variable on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self {
                vars_to_restore: Vec::new(),
            }
        }

        fn set(&mut self, key: &str, value: &str) {
            let original = std::env::var(key).ok();
            self.vars_to_restore.push((key.to_string(), original));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            let original = std::env::var(key).ok();
            self.vars_to_restore.push((key.to_string(), original));
            unsafe {
                std::env::remove_var(key);
            }
        }

        /// Start from a clean slate for every variable the loader reads
        fn clean() -> Self {
            let mut env = Self::new();
            for key in [
                CONFIG_DIR_ENV,
                CONFIG_FILE_ENV,
                PROVIDER_CONFIG_ENV,
                "NOTIFY_RELAY__CHAR_LIMIT",
                "NOTIFY_RELAY__IDS",
            ] {
                env.remove(key);
            }
            env
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    /// Loader rooted in `dir` that never looks at the user's real provider file
    fn loader_in(dir: &TempDir) -> ConfigLoader {
        ConfigLoader {
            config_dir: dir.path().to_path_buf(),
            config_file: None,
            provider_config: ProviderSource::None,
        }
    }

    #[test]
    fn test_config_loader_new_default() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file.is_none());
        assert!(!matches!(loader.provider_config, ProviderSource::Explicit(_)));
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::Conflict(msg)) => {
                assert!(msg.contains("NOTIFY_CONFIG_DIR"));
                assert!(msg.contains("NOTIFY_CONFIG_FILE"));
            }
            other => panic!("Expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_provider_config_from_env() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        env.set(PROVIDER_CONFIG_ENV, "/etc/notify/providers.toml");

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(
            loader.provider_config_path(),
            Some(Path::new("/etc/notify/providers.toml"))
        );
    }

    #[test]
    fn test_load_without_any_files_uses_defaults() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[]);
        let settings = loader_in(&temp_dir).load().expect("Should load defaults");

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_with_local_override() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let default_config = r#"
[relay]
bulk = true
char_limit = 2000
marker = "~"

[http]
timeout = 20
"#;
        let local_config = r#"
[relay]
char_limit = 1500
"#;

        let temp_dir = setup_config_dir(&[
            ("default.toml", default_config),
            ("local.toml", local_config),
        ]);
        let settings = loader_in(&temp_dir).load().expect("Should load settings");

        assert_eq!(settings.relay.char_limit, 1500);
        assert!(settings.relay.bulk);
        assert_eq!(settings.relay.marker, "~");
        assert_eq!(settings.http.timeout, 20);
    }

    #[test]
    fn test_load_with_env_var_override() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[("default.toml", "[relay]\nchar_limit = 2000\n")]);

        env.set("NOTIFY_RELAY__CHAR_LIMIT", "900");
        env.set("NOTIFY_RELAY__IDS", "ops,alerts");

        let settings = loader_in(&temp_dir).load().expect("Should load settings");

        assert_eq!(settings.relay.char_limit, 900);
        assert_eq!(settings.relay.ids, vec!["ops", "alerts"]);
    }

    #[test]
    fn test_load_single_file_mode_skips_directory() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[
            ("default.toml", "[relay]\nchar_limit = 2000\n"),
            ("single.toml", "[relay]\nchar_limit = 300\n"),
        ]);
        let single = temp_dir.path().join("single.toml");

        let settings = loader_in(&temp_dir)
            .with_config_file(&single)
            .load()
            .expect("Should load settings");

        assert_eq!(settings.relay.char_limit, 300);
    }

    #[test]
    fn test_single_file_must_exist() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[]);
        let result = loader_in(&temp_dir)
            .with_config_file(temp_dir.path().join("missing.toml"))
            .load();

        assert!(matches!(result, Err(ConfigError::MissingFile(_))));
    }

    #[test]
    fn test_provider_config_replaces_providers_section() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let default_config = r#"
[[providers.teams]]
id = "from-default"
webhook_url = "https://example.webhook.office.com/webhookb2/a"
"#;
        let provider_config = r#"
[[slack]]
id = "ops"
webhook_url = "https://hooks.slack.com/services/T000/B000/XXXX"

[[gotify]]
id = "home"
server_url = "https://gotify.example.com"
token = "secret"
"#;

        let temp_dir = setup_config_dir(&[
            ("default.toml", default_config),
            ("provider-config.toml", provider_config),
        ]);

        let settings = loader_in(&temp_dir)
            .with_provider_config(temp_dir.path().join("provider-config.toml"))
            .load()
            .expect("Should load settings");

        assert!(settings.providers.teams.is_empty());
        assert_eq!(settings.providers.slack.len(), 1);
        assert_eq!(settings.providers.slack[0].id, "ops");
        assert_eq!(settings.providers.gotify[0].token, "secret");
    }

    #[test]
    fn test_explicit_provider_config_must_exist() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[]);
        let result = loader_in(&temp_dir)
            .with_provider_config(temp_dir.path().join("nope.toml"))
            .load();

        match result {
            Err(ConfigError::MissingFile(msg)) => assert!(msg.contains("nope.toml")),
            other => panic!("Expected MissingFile, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_default_provider_config_is_ignored() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[]);
        let mut loader = loader_in(&temp_dir);
        loader.provider_config = ProviderSource::Default(temp_dir.path().join("absent.toml"));

        let settings = loader.load().expect("Should load settings");
        assert!(settings.providers.is_empty());
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[("default.toml", "[relay]\nchar_limit = 0\n")]);
        let result = loader_in(&temp_dir).load();

        assert!(
            matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "relay.char_limit")
        );
    }
}
