pub mod audio_system;
pub mod config;
pub mod error;

pub use audio_system::{AssetId, AudioSystem, PlayOptions, Playlist, SoundQueue};
pub use config::{AssetEntry, AudioConfig};
pub use error::{AudioError, ConfigError};
