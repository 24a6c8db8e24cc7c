use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::audio_system::volume::GROUP_COUNT;
use crate::audio_system::AssetId;
use crate::error::ConfigError;

fn default_volume() -> f64 {
    1.0
}

fn default_group_volumes() -> [f64; GROUP_COUNT] {
    [1.0; GROUP_COUNT]
}

/// One sound asset known to the file loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub id: AssetId,

    /// Path to the audio file, relative to the config file
    pub path: String,

    /// Volume group (0-7)
    #[serde(default)]
    pub group: u8,

    /// Base volume of the asset
    #[serde(default = "default_volume")]
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Master volume multiplier
    #[serde(default = "default_volume")]
    pub global_volume: f64,

    /// Volume multiplier per group
    #[serde(default = "default_group_volumes")]
    pub group_volumes: [f64; GROUP_COUNT],

    /// Silence between playlist tracks, in seconds
    #[serde(default)]
    pub silence_seconds: f64,

    /// Sound assets available to the loader
    #[serde(default)]
    pub assets: Vec<AssetEntry>,

    /// Tracks of the startup playlist
    #[serde(default)]
    pub playlist: Vec<AssetId>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            global_volume: 1.0,
            group_volumes: default_group_volumes(),
            silence_seconds: 0.0,
            assets: Vec::new(),
            playlist: Vec::new(),
        }
    }
}

fn check_volume(name: &str, volume: f64) -> Result<(), ConfigError> {
    if !volume.is_finite() || volume < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{name} must be a non-negative number, got {volume}"
        )));
    }
    Ok(())
}

impl AudioConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source,
        };

        let content = fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: AudioConfig = serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;
        config.validate()?;

        tracing::info!("Loaded audio config from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source,
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_failed(Box::new(e)))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))?;
        Ok(())
    }

    /// Check volumes, group ids and asset references
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_volume("global_volume", self.global_volume)?;
        for (group, volume) in self.group_volumes.iter().enumerate() {
            check_volume(&format!("group_volumes[{group}]"), *volume)?;
        }
        check_volume("silence_seconds", self.silence_seconds)?;

        let mut ids = HashSet::new();
        for asset in &self.assets {
            if usize::from(asset.group) >= GROUP_COUNT {
                return Err(ConfigError::Invalid(format!(
                    "asset {} uses group {}, max is {}",
                    asset.id,
                    asset.group,
                    GROUP_COUNT - 1
                )));
            }
            check_volume(&format!("volume of asset {}", asset.id), asset.volume)?;
            if !ids.insert(asset.id) {
                return Err(ConfigError::Invalid(format!("duplicate asset id {}", asset.id)));
            }
        }

        if let Some(missing) = self.playlist.iter().find(|id| !ids.contains(*id)) {
            return Err(ConfigError::Invalid(format!(
                "playlist refers to unknown asset {missing}"
            )));
        }
        Ok(())
    }
}
