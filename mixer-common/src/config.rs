//! Configuration loading
//!
//! Two files are involved:
//! 1. **TOML bootstrap** (`mixer.toml`): port, database path, location of the
//!    server config file, logging. Read once at startup.
//! 2. **Server config** (`server-config.json`): target channel and controller
//!    role, written by admin commands.
//!
//! Missing files are not fatal; built-in defaults apply.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Key used by server-config.json for the target channel
pub const TARGET_CHANNEL_KEY: &str = "targetChannelID";
/// Key used by server-config.json for the controller role
pub const CONTROLLER_ROLE_KEY: &str = "botControllerRole";

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// HTTP port for the interactions endpoint
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// JSON file holding the target channel id
    #[serde(default = "default_server_config_path")]
    pub server_config_path: PathBuf,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_path: default_database_path(),
            server_config_path: default_server_config_path(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("database.db")
}

fn default_server_config_path() -> PathBuf {
    PathBuf::from("server-config.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load the bootstrap TOML file
///
/// A missing file logs a warning and returns defaults. A file that exists but
/// cannot be parsed is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Contents of server-config.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(rename = "targetChannelID", default, skip_serializing_if = "Option::is_none")]
    pub target_channel_id: Option<String>,

    /// Stored by `setadminrole`; not consulted for authorization
    #[serde(rename = "botControllerRole", default, skip_serializing_if = "Option::is_none")]
    pub bot_controller_role: Option<String>,
}

impl ServerConfig {
    /// Read server-config.json; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Persist the target channel id
pub fn save_channel_id(path: &Path, channel_id: &str) -> Result<()> {
    update_server_config(path, TARGET_CHANNEL_KEY, channel_id)
}

/// Persist the bot controller role id
pub fn save_controller_role(path: &Path, role_id: &str) -> Result<()> {
    update_server_config(path, CONTROLLER_ROLE_KEY, role_id)
}

/// Read-modify-write of a single key; other keys in the file are kept.
///
/// Not safe against two concurrent writers.
fn update_server_config(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config: Map<String, Value> = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => map,
            _ => {
                return Err(Error::Config(format!(
                    "{} does not contain a JSON object",
                    path.display()
                )))
            }
        }
    } else {
        Map::new()
    };

    config.insert(key.to_string(), Value::String(value.to_string()));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&Value::Object(config))?)?;

    Ok(())
}
