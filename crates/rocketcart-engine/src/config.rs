//! # Engine Configuration
//!
//! Configuration for the cart engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ROCKETCART_API_URL=http://shop.local:3333                          │
//! │     ROCKETCART_STORAGE_KEY=@RocketShoes:cart                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/rocketcart/rocketcart.toml (Linux)                       │
//! │     ~/Library/Application Support/com.rocketcart.rocketcart/ (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # rocketcart.toml
//! [storage]
//! key = "@RocketShoes:cart"
//! database_path = "/var/lib/rocketcart/cart.db"
//!
//! [inventory]
//! base_url = "http://localhost:3333"
//! timeout_secs = 10
//!
//! [controller]
//! queue_capacity = 64
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use rocketcart_core::validation::validate_storage_key;
use rocketcart_core::DEFAULT_STORAGE_KEY;

use crate::error::{EngineError, EngineResult};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "rocketcart.toml";

/// Database file name inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "cart.db";

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the cart snapshot lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Namespace key the snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// SQLite file. `None` means the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            key: default_storage_key(),
            database_path: None,
        }
    }
}

// =============================================================================
// Inventory Settings
// =============================================================================

/// The stock and catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Base URL; `/stock/{id}` and `/products/{id}` are resolved against it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl InventorySettings {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Controller Settings
// =============================================================================

/// Controller task tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSettings {
    /// Commands that may wait in the queue before callers back off.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for ControllerSettings {
    fn default() -> Self {
        ControllerSettings {
            queue_capacity: default_queue_capacity(),
        }
    }
}

// =============================================================================
// Engine Config
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub controller: ControllerSettings,
}

impl EngineConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (rocketcart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EngineError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        validate_storage_key(&self.storage.key)?;

        let url = url::Url::parse(&self.inventory.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(EngineError::InvalidUrl(format!(
                "Inventory URL must start with http:// or https://, got: {}",
                self.inventory.base_url
            )));
        }

        if self.inventory.timeout_secs == 0 {
            return Err(EngineError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.controller.queue_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "queue_capacity must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("ROCKETCART_STORAGE_KEY") {
            debug!(key = %key, "Overriding storage key from environment");
            self.storage.key = key;
        }

        if let Some(path) = var("ROCKETCART_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(url) = var("ROCKETCART_API_URL") {
            debug!(url = %url, "Overriding inventory URL from environment");
            self.inventory.base_url = url;
        }

        if let Some(timeout) = var("ROCKETCART_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.inventory.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric ROCKETCART_API_TIMEOUT_SECS"),
            }
        }

        if let Some(capacity) = var("ROCKETCART_QUEUE_CAPACITY") {
            match capacity.parse::<usize>() {
                Ok(n) => self.controller.queue_capacity = n,
                Err(_) => warn!(value = %capacity, "Ignoring non-numeric ROCKETCART_QUEUE_CAPACITY"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "rocketcart", "rocketcart")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the storage key.
    pub fn storage_key(&self) -> &str {
        &self.storage.key
    }

    /// Returns the database file to open.
    ///
    /// Falls back to `cart.db` in the working directory when the platform
    /// has no data directory (e.g. no `$HOME`).
    pub fn database_path(&self) -> PathBuf {
        if let Some(ref path) = self.storage.database_path {
            return path.clone();
        }

        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.storage_key(), "@RocketShoes:cart");
        assert_eq!(config.inventory.base_url, "http://localhost:3333");
        assert_eq!(config.inventory.timeout(), Duration::from_secs(10));
        assert_eq!(config.controller.queue_capacity, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        config.storage.key = "  ".to_string();
        assert!(config.validate().unwrap_err().is_config_error());

        config.storage.key = "cart".to_string();
        config.inventory.base_url = "ws://localhost:3333".to_string();
        assert!(matches!(config.validate(), Err(EngineError::InvalidUrl(_))));

        config.inventory.base_url = "localhost".to_string();
        assert!(matches!(config.validate(), Err(EngineError::InvalidUrl(_))));

        config.inventory.base_url = "https://shop.example.com/api".to_string();
        assert!(config.validate().is_ok());

        config.controller.queue_capacity = 0;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        config.controller.queue_capacity = 8;
        config.inventory.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ROCKETCART_STORAGE_KEY", "@Test:cart"),
            ("ROCKETCART_DB_PATH", "/tmp/rocketcart-test.db"),
            ("ROCKETCART_API_URL", "http://127.0.0.1:9000"),
            ("ROCKETCART_API_TIMEOUT_SECS", "3"),
            ("ROCKETCART_QUEUE_CAPACITY", "not-a-number"),
        ]);

        let mut config = EngineConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage_key(), "@Test:cart");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/rocketcart-test.db")
        );
        assert_eq!(config.inventory.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.inventory.timeout_secs, 3);
        // unparsable values are ignored
        assert_eq!(config.controller.queue_capacity, 64);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [inventory]
            base_url = "http://stock.internal:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.inventory.base_url, "http://stock.internal:8080");
        assert_eq!(config.inventory.timeout_secs, 10);
        assert_eq!(config.storage_key(), "@RocketShoes:cart");
    }

    #[test]
    fn test_toml_serialization() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[storage]"));
        assert!(toml_str.contains("[inventory]"));
        assert!(toml_str.contains("[controller]"));

        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "rocketcart-config-test-{}.toml",
            std::process::id()
        ));

        let mut config = EngineConfig::default();
        config.controller.queue_capacity = 16;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: EngineConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.controller.queue_capacity, 16);

        std::fs::remove_file(&path).ok();
    }
}
