use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub user: UserSettings,
    #[serde(default)]
    pub timing: TimingSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub training: TrainingSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub font_size: f32,
    /// egui key names, e.g. "Space", "Minus", "Enter"
    pub dot_key: String,
    pub dash_key: String,
    pub finalize_key: String,
}

/// Keying and playback timing, all in milliseconds
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub dit_ms: u32,
    pub dah_ms: u32,
    /// Silence between symbols when playing a sequence
    pub symbol_pause_ms: u32,
    /// Idle time after the last symbol before the character is decoded
    pub character_timeout_ms: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub tone_frequency_hz: f32,
    /// Fraction of full scale (0.0 - 1.0)
    pub volume: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    /// Word list file, one target per line. Empty uses the built-in list.
    pub word_list_file: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            dot_key: "Space".to_string(),
            dash_key: "Minus".to_string(),
            finalize_key: "Enter".to_string(),
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            dit_ms: 100,
            dah_ms: 300,
            symbol_pause_ms: 100,
            character_timeout_ms: 1000,
        }
    }
}

impl TimingSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dit_ms == 0 {
            return Err(ConfigError::InvalidTiming("dit_ms"));
        }
        if self.dah_ms == 0 {
            return Err(ConfigError::InvalidTiming("dah_ms"));
        }
        if self.character_timeout_ms == 0 {
            return Err(ConfigError::InvalidTiming("character_timeout_ms"));
        }
        Ok(())
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            tone_frequency_hz: 600.0,
            volume: 0.5,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("settings could not be written: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub struct SettingsLoadResult {
    pub settings: AppSettings,
    pub notice: Option<String>,
}

impl AppSettings {
    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("morse_trainer").join("settings.toml")
        } else {
            PathBuf::from("settings.toml")
        }
    }

    /// Load settings from the default config path, or return defaults if not found
    pub fn load_with_notice() -> SettingsLoadResult {
        Self::load_or_backup(&Self::config_path())
    }

    fn load_or_backup(path: &Path) -> SettingsLoadResult {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                SettingsLoadResult {
                    settings,
                    notice: None,
                }
            }
            Err(err) => {
                let mut notice = None;
                if path.exists() {
                    log::warn!("Unable to read settings at {}: {}", path.display(), err);
                    notice = Some(match backup_settings_file(path) {
                        Some(backup_path) => format!(
                            "Settings file was reset due to an incompatible format. Backup saved to {}",
                            backup_path.display()
                        ),
                        None => {
                            "Settings file was reset due to an incompatible format.".to_string()
                        }
                    });
                } else {
                    log::info!("No settings at {}, using defaults", path.display());
                }

                SettingsLoadResult {
                    settings: Self::default(),
                    notice,
                }
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }
}

fn backup_settings_file(path: &Path) -> Option<PathBuf> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())?;
    let file_name = path.file_name()?.to_string_lossy();
    let backup_name = format!("{}.bak.{}", file_name, timestamp);
    let backup_path = path.with_file_name(backup_name);
    if std::fs::rename(path, &backup_path).is_ok() {
        Some(backup_path)
    } else {
        None
    }
}
