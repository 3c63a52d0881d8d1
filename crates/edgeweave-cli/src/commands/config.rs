//! Config command implementation.
//!
//! Manages CLI configuration.

use anyhow::Result;

use crate::config::Config;

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("EdgeWeave CLI Configuration");
    println!("{:-<40}", "");

    println!("Port:                {}", config.port);
    println!("Save File:           {}", config.save_file.display());
    println!("Bundle Settings:");
    println!("{}", serde_json::to_string_pretty(&config.bundle)?);

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Print the config file location.
pub fn path() -> Result<()> {
    match Config::config_file_path() {
        Some(path) => println!("{}", path.display()),
        None => anyhow::bail!("No config directory available on this platform"),
    }
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
