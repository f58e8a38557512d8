//! This module handles the notification manager's configuration, including
//! loading and saving settings to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use toastline::config::{self, Config, DurationSetting};
//! use toastline::notifications::NotificationStore;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Keep toasts on screen until dismissed
//! config.notifications.default_duration = Some(DurationSetting::infinite());
//! config::save(&config).expect("Failed to save config");
//!
//! let store = NotificationStore::new(config.store_config());
//! assert!(store.is_empty());
//! ```
//!
//! ```toml
//! [notifications]
//! capacity = 5
//! removal_delay_ms = 1000
//! default_duration = 5000        # or "infinite"
//!
//! [diagnostics]
//! buffer_capacity = 1000
//! ```

mod defaults;

pub use defaults::*;

use crate::domain::diagnostics::BufferCapacity;
use crate::domain::notifications::{Capacity, RemovalDelay, ToastDuration};
use crate::error::Result;
use crate::notifications::StoreConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "Toastline";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "TOASTLINE_CONFIG_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub diagnostics: DiagnosticsSettings,
}

/// The `[notifications]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub removal_delay_ms: Option<u64>,
    #[serde(default)]
    pub default_duration: Option<DurationSetting>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            capacity: Some(DEFAULT_CAPACITY),
            removal_delay_ms: Some(DEFAULT_REMOVAL_DELAY_MS),
            default_duration: Some(DurationSetting::Millis(DEFAULT_DURATION_MS)),
        }
    }
}

/// The `[diagnostics]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsSettings {
    #[serde(default)]
    pub buffer_capacity: Option<usize>,
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            buffer_capacity: Some(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY),
        }
    }
}

/// A duration as written in `settings.toml`: milliseconds or `"infinite"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationSetting {
    Millis(u64),
    Keyword(DurationKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationKeyword {
    Infinite,
}

impl DurationSetting {
    #[must_use]
    pub fn infinite() -> Self {
        DurationSetting::Keyword(DurationKeyword::Infinite)
    }
}

impl From<DurationSetting> for ToastDuration {
    fn from(setting: DurationSetting) -> Self {
        match setting {
            DurationSetting::Millis(millis) => ToastDuration::from_millis(millis),
            DurationSetting::Keyword(DurationKeyword::Infinite) => ToastDuration::Infinite,
        }
    }
}

impl From<ToastDuration> for DurationSetting {
    fn from(duration: ToastDuration) -> Self {
        match duration {
            ToastDuration::Finite(ttl) => {
                DurationSetting::Millis(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX))
            }
            ToastDuration::Infinite => DurationSetting::infinite(),
        }
    }
}

impl Config {
    /// Builds the store configuration, clamping every value to its bounds.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        let settings = &self.notifications;
        StoreConfig {
            capacity: Capacity::new(settings.capacity.unwrap_or(DEFAULT_CAPACITY)),
            removal_delay: RemovalDelay::from_millis(
                settings
                    .removal_delay_ms
                    .unwrap_or(DEFAULT_REMOVAL_DELAY_MS),
            ),
            default_duration: settings
                .default_duration
                .map_or(ToastDuration::from_millis(DEFAULT_DURATION_MS), Into::into),
        }
    }

    #[must_use]
    pub fn buffer_capacity(&self) -> BufferCapacity {
        BufferCapacity::new(
            self.diagnostics
                .buffer_capacity
                .unwrap_or(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY),
        )
    }
}

/// Resolves the settings file location.
///
/// `TOASTLINE_CONFIG_DIR` wins when set and non-empty, otherwise the
/// platform config directory is used (`~/.config/Toastline/` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir).join(CONFIG_FILE));
        }
    }
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
