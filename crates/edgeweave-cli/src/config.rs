//! CLI configuration management.
//!
//! Values come from environment variables (a `.env` file is honoured), then
//! the config file, then built-in defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use edgeweave_core::BundleConfig;
use serde::{Deserialize, Serialize};

/// Application-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port the API server listens on.
    pub port: u16,

    /// File the editor setup is persisted to.
    pub save_file: PathBuf,

    /// Parameters for every bundling run.
    pub bundle: BundleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            save_file: PathBuf::from("savefile.json"),
            bundle: BundleConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and config file.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config from {}", path.display()))?;
                serde_json::from_str(&contents).with_context(|| "Failed to parse config file")?
            }
            _ => Self::default(),
        };

        // Environment takes precedence over the file
        if let Ok(port) = std::env::var("EW_PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("Invalid EW_PORT: {}", port))?;
        }
        if let Ok(save_file) = std::env::var("EW_SAVE_FILE") {
            config.save_file = PathBuf::from(save_file);
        }

        config
            .bundle
            .validate()
            .with_context(|| "Invalid bundle settings in config file")?;

        Ok(config)
    }

    /// Save current configuration to the config file.
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&config_path, contents)
                .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        }
        Ok(())
    }

    /// Get the path to the config file.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "edgeweave", "ew")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
