use adw::Application;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::console::ClockZone;
use crate::echo::{EchoMode, EchoPolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("config i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub console_url: String,
    pub bot_url: String,
    pub reload_delay_ms: u64,
    pub console_echo: EchoMode,
    pub bot_echo: EchoMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            console_url: String::new(),
            bot_url: "http://localhost:5001".to_string(),
            reload_delay_ms: 500,
            console_echo: EchoMode::Confirmed,
            bot_echo: EchoMode::Optimistic,
            utc_offset_minutes: None,
            request_timeout_secs: 15,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("chatdesk.toml"))
    }

    /// Load from the user config file, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            log::warn!("no config directory, using default settings");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.console_url.trim().is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn console_policy(&self) -> EchoPolicy {
        self.console_echo
            .with_delay(Duration::from_millis(self.reload_delay_ms))
    }

    pub fn bot_policy(&self) -> EchoPolicy {
        self.bot_echo
            .with_delay(Duration::from_millis(self.reload_delay_ms))
    }

    pub fn clock_zone(&self) -> ClockZone {
        ClockZone::from_offset_minutes(self.utc_offset_minutes)
    }
}

pub fn build_ui(app: &Application) {
    let settings = Settings::load();
    if settings.is_configured() {
        crate::ui::main_window::show_main_window(app, settings);
    } else {
        crate::ui::setup::show_setup_window(app, settings);
    }
}
