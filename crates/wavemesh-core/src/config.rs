/*!
 * Configuration management for wavemesh.
 *
 * This module provides functionality to load, validate, and access
 * configuration settings for the bridge and its transport.
 */
use std::path::Path;
use std::sync::Arc;

use config::{Config as ConfigLib, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Core configuration for wavemesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General configuration
    #[serde(default)]
    pub general: GeneralConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Transport configuration
    #[serde(default)]
    pub transport: TransportConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Application environment (development, production, etc.)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to stdout
    #[serde(default = "default_log_stdout")]
    pub stdout: bool,
}

/// Transport configuration
///
/// Bootstrap options for the serial driver. The adapter core never reads
/// these; they are handed verbatim to the transport implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Serial device path for the controller stick
    #[serde(default = "default_device")]
    pub device: String,

    /// Interval between polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Number of driver connection attempts before giving up
    #[serde(default = "default_driver_attempts")]
    pub driver_attempts: u32,

    /// Copy driver logging to the console
    #[serde(default)]
    pub console_output: bool,

    /// Write a network layout file after scanning
    #[serde(default)]
    pub save_config: bool,

    /// Do not send updates if nothing changed
    #[serde(default = "default_suppress_refresh")]
    pub suppress_refresh: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            environment: default_environment(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            stdout: default_log_stdout(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            poll_interval_ms: default_poll_interval_ms(),
            driver_attempts: default_driver_attempts(),
            console_output: false,
            save_config: false,
            suppress_refresh: default_suppress_refresh(),
        }
    }
}

fn default_app_name() -> String {
    "wavemesh".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_stdout() -> bool {
    true
}

fn default_device() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_driver_attempts() -> u32 {
    3
}

fn default_suppress_refresh() -> bool {
    true
}

/// A builder for creating a configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<String>,
    environment_prefix: Option<String>,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the config file path
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Set the environment variable prefix for configuration
    pub fn with_environment_prefix<S: AsRef<str>>(mut self, prefix: S) -> Self {
        self.environment_prefix = Some(prefix.as_ref().to_string());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        let mut config_builder = ConfigLib::builder();

        // Start with default values
        let default_config = Config::default();
        config_builder = config_builder.add_source(
            config::Config::try_from(&default_config)
                .map_err(|e| Error::config(format!("Failed to create default config: {}", e)))?,
        );

        // Add configuration from file if specified
        if let Some(config_file) = self.config_file {
            let path = Path::new(&config_file);
            if path.exists() {
                debug!("Loading configuration from {}", config_file);
                config_builder = config_builder.add_source(File::with_name(&config_file));
            } else {
                debug!(
                    "Configuration file {} does not exist, using defaults",
                    config_file
                );
            }
        }

        // Add configuration from environment variables if prefix is specified
        if let Some(prefix) = self.environment_prefix {
            debug!(
                "Loading configuration from environment variables with prefix {}",
                prefix
            );
            config_builder = config_builder.add_source(
                Environment::with_prefix(&prefix)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        // Build the config
        let config_lib = config_builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build configuration: {}", e)))?;

        // Convert to our config type
        let config: Config = config_lib
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize configuration: {}", e)))?;

        info!("Configuration loaded successfully");
        Ok(config)
    }
}

/// A thread-safe reference to a configuration
#[derive(Debug, Clone)]
pub struct SharedConfig(Arc<Config>);

impl SharedConfig {
    /// Create a new SharedConfig
    pub fn new(config: Config) -> Self {
        Self(Arc::new(config))
    }

    /// Get a reference to the config
    pub fn get(&self) -> &Config {
        &self.0
    }
}

impl From<Config> for SharedConfig {
    fn from(config: Config) -> Self {
        Self::new(config)
    }
}

impl AsRef<Config> for SharedConfig {
    fn as_ref(&self) -> &Config {
        self.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.app_name, "wavemesh");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.transport.poll_interval_ms, 500);
        assert_eq!(config.transport.driver_attempts, 3);
        assert!(config.transport.suppress_refresh);
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.general.app_name, "wavemesh");
        assert_eq!(config.transport.device, "/dev/ttyUSB0");
    }

    #[test]
    fn test_config_builder_with_file() -> Result<()> {
        let dir = tempdir().map_err(|e| Error::other(e.to_string()))?;
        let file_path = dir.path().join("config.toml");

        {
            let mut file = File::create(&file_path).map_err(|e| Error::other(e.to_string()))?;
            file.write_all(
                br#"
                [general]
                app_name = "test-bridge"

                [transport]
                device = "/dev/cu.SLAB_USBtoUART"
                poll_interval_ms = 250
                console_output = true
            "#,
            )
            .map_err(|e| Error::other(e.to_string()))?;
        }

        let config = ConfigBuilder::new().with_config_file(file_path).build()?;

        assert_eq!(config.general.app_name, "test-bridge");
        assert_eq!(config.transport.device, "/dev/cu.SLAB_USBtoUART");
        assert_eq!(config.transport.poll_interval_ms, 250);
        assert!(config.transport.console_output);

        Ok(())
    }

    #[test]
    fn test_config_builder_with_env() -> Result<()> {
        env::set_var("WAVEMESH__TRANSPORT__DEVICE", "/dev/ttyACM0");
        env::set_var("WAVEMESH__LOGGING__LEVEL", "trace");

        let config = ConfigBuilder::new()
            .with_environment_prefix("wavemesh")
            .build()?;

        assert_eq!(config.transport.device, "/dev/ttyACM0");
        assert_eq!(config.logging.level, "trace");

        // Clean up
        env::remove_var("WAVEMESH__TRANSPORT__DEVICE");
        env::remove_var("WAVEMESH__LOGGING__LEVEL");

        Ok(())
    }

    #[test]
    fn test_shared_config() {
        let config = Config::default();
        let shared = SharedConfig::new(config);

        assert_eq!(shared.get().general.app_name, "wavemesh");

        let shared2 = shared.clone();
        assert_eq!(shared2.get().general.app_name, "wavemesh");
    }
}
