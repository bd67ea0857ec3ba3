//! Configuration for applications using the binding
//!
//! A single TOML file describes which application to connect as and how
//! the native library is found and logged:
//!
//! ```toml
//! client_id = 418559331265675294
//! require_discord = false
//! library_path = "./lib/discord_game_sdk.so"
//! log_level = "info"
//! tracing_filter = "info"
//! ```
//!
//! Every key is optional; missing keys take their [`Default`] value.

mod loader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{CreateFlags, LogLevel};

pub use loader::{default_path, CONFIG_FILE_NAME, CONFIG_PATH_ENV};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Application (client) id from the developer portal
    pub client_id: i64,

    /// Fail creation when the Discord client isn't running
    pub require_discord: bool,

    /// Shared library to load, falls back to the loader's default search
    pub library_path: Option<PathBuf>,

    /// Minimum severity of native log messages forwarded to tracing
    pub log_level: LogLevel,

    /// Filter directive for the demo subscriber, `RUST_LOG` takes precedence
    pub tracing_filter: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            client_id: 0,
            require_discord: true,
            library_path: None,
            log_level: LogLevel::Info,
            tracing_filter: "info".to_string(),
        }
    }
}

impl SdkConfig {
    /// Creation flags described by this config
    pub fn create_flags(&self) -> CreateFlags {
        if self.require_discord {
            CreateFlags::DEFAULT
        } else {
            CreateFlags::NO_REQUIRE_DISCORD
        }
    }

    /// Load config from `path`.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load config from file, creating default if missing.
    ///
    /// If the config file doesn't exist, a default config is created and saved.
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            let default = Self::default();
            default.save(path)?;
            tracing::info!("Created default config at {:?}", path);
            Ok(default)
        }
    }

    /// Save config to file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reload config from file.
    ///
    /// Updates self with the current file contents.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> ConfigResult<()> {
        *self = Self::load(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir()
            .join(format!("dgs-config-{}-{}", std::process::id(), n))
            .join(name)
    }

    #[test]
    fn test_default() {
        let config = SdkConfig::default();
        assert_eq!(config.client_id, 0);
        assert!(config.require_discord);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.create_flags(), CreateFlags::DEFAULT);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: SdkConfig =
            toml::from_str("client_id = 123456789012345678\nrequire_discord = false").unwrap();
        assert_eq!(config.client_id, 123456789012345678);
        assert_eq!(config.create_flags(), CreateFlags::NO_REQUIRE_DISCORD);
        assert_eq!(config.tracing_filter, "info");
        assert!(config.library_path.is_none());
    }

    #[test]
    fn test_serialize() {
        let config = SdkConfig {
            client_id: 7,
            log_level: LogLevel::Debug,
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("client_id = 7"));
        assert!(toml_str.contains("log_level = \"debug\""));
    }

    #[test]
    fn test_load_or_default_creates_file() {
        let path = scratch_path("discord_game_sdk.toml");
        let config = SdkConfig::load_or_default(&path).unwrap();
        assert_eq!(config, SdkConfig::default());
        assert!(path.exists());

        let mut changed = config.clone();
        changed.client_id = 99;
        changed.save(&path).unwrap();

        let mut reloaded = config;
        reloaded.reload(&path).unwrap();
        assert_eq!(reloaded.client_id, 99);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let path = scratch_path("broken.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "client_id = \"not a number\"").unwrap();
        assert!(matches!(SdkConfig::load(&path), Err(ConfigError::ParseError(_))));

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
