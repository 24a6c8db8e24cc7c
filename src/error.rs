use thiserror::Error;

use crate::audio_system::AssetId;

/// Library errors using thiserror for structured error handling.
///
/// The audio system never interprets these: a loader failure is handed back
/// to whoever asked for the sound, unchanged.

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio registered for asset {0}")]
    UnknownAsset(AssetId),

    #[error("Failed to load audio file: {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to decode audio format")]
    DecodeFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to initialize audio output stream")]
    StreamInitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Audio playback failed")]
    PlaybackFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = AudioError::UnknownAsset(AssetId(42));
        assert_eq!(err.to_string(), "No audio registered for asset 42");

        let err = ConfigError::Invalid("group 9".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: group 9");
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let audio_err = AudioError::LoadFailed {
            path: "sfx/hit.wav".to_string(),
            source: Box::new(io_err),
        };

        assert!(audio_err.source().is_some());
        assert_eq!(audio_err.to_string(), "Failed to load audio file: sfx/hit.wav");
    }
}
