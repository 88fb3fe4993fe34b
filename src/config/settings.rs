use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::api::DEFAULT_API_URL;
use crate::report::ErrorPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
}

/// General configuration settings
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Registrations collection endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Built-in theme name
    #[serde(default = "default_theme")]
    pub theme: String,

    /// How failed requests are reported
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Level written to the log file
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Level shown as flash messages in the TUI
    #[serde(default = "default_flash_level")]
    pub flash_level: String,

    /// How long flash messages stay on screen
    #[serde(default = "default_flash_message_duration_ms")]
    pub flash_message_duration_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            api_url: default_api_url(),
            theme: default_theme(),
            error_policy: ErrorPolicy::default(),
            log_level: default_log_level(),
            flash_level: default_flash_level(),
            flash_message_duration_ms: default_flash_message_duration_ms(),
        }
    }
}

// Default value functions for serde
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_flash_level() -> String {
    "off".to_string()
}

fn default_flash_message_duration_ms() -> u64 {
    4000
}

/// Trait for configuration storage
pub trait ConfigStorage: Send + Sync {
    /// Load configuration from file
    fn load(&self) -> Result<Config>;

    /// Create default configuration file if it doesn't exist
    fn create_default(&self) -> Result<()>;
}

/// TOML-based implementation of ConfigStorage
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    /// Create a new TomlConfigStorage with the given path
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        use anyhow::Context;
        use std::fs;

        // If file doesn't exist, create default and return it
        if !self.path.exists() {
            log::info!(
                "Config file not found at {:?}, creating default configuration",
                self.path
            );
            self.create_default()?;
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))?;

        log::info!("Loaded configuration from {:?}", self.path);
        log::debug!(
            "Config: api_url={}, theme={}, error_policy={:?}",
            config.general.api_url,
            config.general.theme,
            config.general.error_policy
        );

        Ok(config)
    }

    fn create_default(&self) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        // Commented example config compiled into the binary
        let example_config = include_str!("../../regdesk.toml.example");

        fs::write(&self.path, example_config)
            .with_context(|| format!("Failed to create default config at {:?}", self.path))?;

        log::info!("Created default configuration at {:?}", self.path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_config_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("regdesk-test-{}-{}", name, std::process::id()))
            .join("regdesk.toml")
    }

    #[test]
    fn test_config_defaults() {
        let config = GeneralConfig::default();
        assert_eq!(config.api_url, "http://localhost:3000/registrations");
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.error_policy, ErrorPolicy::Silent);
        assert_eq!(config.flash_level, "off");
        assert_eq!(config.flash_message_duration_ms, 4000);
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config: Config = toml::from_str(include_str!("../../regdesk.toml.example")).unwrap();
        let defaults = GeneralConfig::default();
        assert_eq!(config.general.api_url, defaults.api_url);
        assert_eq!(config.general.theme, defaults.theme);
        assert_eq!(config.general.error_policy, defaults.error_policy);
        assert_eq!(config.general.log_level, defaults.log_level);
        assert_eq!(config.general.flash_level, defaults.flash_level);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [general]
            api_url = "http://example.test/api/registrations"
            error_policy = "surface"
            "#,
        )
        .unwrap();
        assert_eq!(config.general.api_url, "http://example.test/api/registrations");
        assert_eq!(config.general.error_policy, ErrorPolicy::Surface);
        assert_eq!(config.general.theme, "catppuccin-mocha");
    }

    #[test]
    fn test_load_creates_default_file() {
        let path = temp_config_path("create");
        let _ = fs::remove_file(&path);

        let storage = TomlConfigStorage::new(path.clone());
        let config = storage.load().unwrap();
        assert!(path.exists());
        assert_eq!(config.general.api_url, DEFAULT_API_URL);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_reads_existing_file() {
        let path = temp_config_path("existing");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "[general]\ntheme = \"tokyonight-night\"\nflash_level = \"debug\"\n",
        )
        .unwrap();

        let loaded = TomlConfigStorage::new(path.clone()).load().unwrap();
        assert_eq!(loaded.general.theme, "tokyonight-night");
        assert_eq!(loaded.general.flash_level, "debug");
        assert_eq!(loaded.general.api_url, DEFAULT_API_URL);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
