//! Configuration file management for ticklist.
//!
//! Provides a TOML-based config file at `~/.config/ticklist/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ticklist_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the ticklist config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/ticklist` or
/// `~/.config/ticklist`. We intentionally ignore the platform-specific
/// `dirs::config_dir()` (which returns `~/Library/Application Support` on
/// macOS).
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("ticklist");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ticklist")
}

/// Return the path to the ticklist config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Return the ticklist data directory (`$XDG_DATA_HOME/ticklist` or
/// `~/.local/share/ticklist`). The default database lives here.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("ticklist");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("ticklist")
}

/// The database URL used when nothing else is configured.
pub fn default_database_url() -> String {
    format!(
        "sqlite://{}?mode=rwc",
        data_dir().join("tasks.db").display()
    )
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolution
// -----------------------------------------------------------------------

/// Fully-resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct TicklistConfig {
    pub db_config: DbConfig,
}

impl TicklistConfig {
    /// Resolve the database URL: CLI flag > `TICKLIST_DATABASE_URL` env var
    /// > config file > default data-dir location.
    pub fn resolve(cli_database_url: Option<&str>) -> Result<Self> {
        let database_url = if let Some(url) = cli_database_url {
            url.to_owned()
        } else if let Ok(url) = std::env::var("TICKLIST_DATABASE_URL") {
            url
        } else if let Ok(file) = load_config() {
            file.database.url
        } else {
            let dir = data_dir();
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create data directory {}", dir.display()))?;
            default_database_url()
        };

        Ok(Self {
            db_config: DbConfig::new(database_url),
        })
    }
}
