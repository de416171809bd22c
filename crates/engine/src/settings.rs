//! Player settings loaded from TOML.
//!
//! ```toml
//! das = 8
//! arr = 3
//! preset = "wasd"
//! mode = "sprint"
//! seed = 42
//!
//! [bindings]
//! hardDrop = "Space"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{GameMode, SessionConfig};
use crate::input::{BindingPreset, Key, KeyBindings};
use crate::types::{Action, DEFAULT_ARR, DEFAULT_DAS};

/// Seed used when the settings do not pin one.
pub const DEFAULT_SEED: u32 = 1;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unknown action in bindings: {0}")]
    UnknownAction(String),
    #[error("unknown key for {action}: {key}")]
    UnknownKey { action: String, key: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Delayed auto-shift in frames. Values below 1 are raised to 1.
    pub das: i32,
    /// Auto-repeat rate in frames. Values below 1 are raised to 1.
    pub arr: i32,
    pub preset: BindingPreset,
    pub mode: GameMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    /// Per-action overrides on top of the preset: action name -> key name.
    pub bindings: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            das: DEFAULT_DAS as i32,
            arr: DEFAULT_ARR as i32,
            preset: BindingPreset::Default,
            mode: GameMode::Marathon,
            seed: None,
            bindings: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Like [`Settings::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Tunables for a session, with DAS/ARR clamped to at least one frame.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            das: clamp_frames("das", self.das),
            arr: clamp_frames("arr", self.arr),
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            ..SessionConfig::default()
        }
    }

    /// The preset with any per-action overrides applied.
    pub fn key_bindings(&self) -> Result<KeyBindings, SettingsError> {
        let mut bindings = self.preset.bindings();
        for (action_name, key_name) in &self.bindings {
            let action = Action::from_str(action_name)
                .ok_or_else(|| SettingsError::UnknownAction(action_name.clone()))?;
            let key = Key::from_name(key_name).ok_or_else(|| SettingsError::UnknownKey {
                action: action_name.clone(),
                key: key_name.clone(),
            })?;
            bindings.bind(action, key);
        }
        Ok(bindings)
    }
}

fn clamp_frames(name: &str, value: i32) -> u32 {
    if value < 1 {
        warn!("{} = {} is below 1 frame, using 1", name, value);
        return 1;
    }
    value as u32
}
