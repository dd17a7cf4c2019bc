use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration, stored as TOML under `~/.mockingbird/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Delay before the simulated bot reply resolves, in milliseconds.
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    /// Maximum number of messages kept in the conversation log.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_reply_delay_ms() -> u64 {
    1000
}

fn default_max_history() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reply_delay_ms: default_reply_delay_ms(),
            max_history: default_max_history(),
        }
    }
}

impl Config {
    /// Directory holding the config file and the log file.
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".mockingbird"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("mockingbird.log"))
    }

    /// Load configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let home = Self::home_dir()?;
        fs::create_dir_all(&home).context("Failed to create .mockingbird directory")?;

        let config_path = home.join("config.toml");
        if config_path.exists() {
            let content =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to its default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, content).context("Failed to write config file")?;
        Ok(())
    }

    pub fn reply_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.reply_delay_ms)
    }
}
