/// Player primitives
///
/// The host engine owns the actual players; this module only describes what
/// the audio system is allowed to ask of them, plus the handle it keeps.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::source::DecodedSound;
use crate::error::AudioError;

/// A single playable sound instance owned by the host engine.
pub trait SoundPlayer: Send {
    /// Start or resume from the current position.
    ///
    /// A sound that reached its end stays silent until `set_position` or
    /// `rewind` moves it back.
    fn play(&mut self);

    /// Pause without losing the current position.
    fn pause(&mut self);

    fn rewind(&mut self);

    fn set_volume(&mut self, volume: f64);

    fn set_position(&mut self, position: Duration);

    fn is_playing(&self) -> bool;
}

/// Player shared between the host engine and any handles pointing at it.
pub type SharedPlayer = Arc<Mutex<dyn SoundPlayer>>;

/// Process-wide mixer context: constructs players from decoded bytes.
pub trait AudioContext: Send + Sync {
    fn new_player(&self, data: Arc<Vec<u8>>) -> Result<SharedPlayer, AudioError>;

    /// Force any lazy player-factory setup to happen now instead of on the
    /// first real sound.
    fn warm_up(&self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Handle to a currently (or recently) triggered sound.
///
/// Dropping or replacing a handle never stops or destroys the player.
#[derive(Clone, Default)]
pub struct ActiveSound {
    player: Option<SharedPlayer>,
    group: u8,
    volume: f64,
}

impl ActiveSound {
    /// A handle that points at nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.player.is_none()
    }

    /// Check if the underlying player is playing (false for an empty handle)
    pub fn is_playing(&self) -> bool {
        self.player
            .as_ref()
            .map(|p| p.lock().is_playing())
            .unwrap_or(false)
    }

    /// Pause the underlying player, if any
    pub fn pause(&self) {
        if let Some(player) = &self.player {
            player.lock().pause();
        }
    }

    pub fn group(&self) -> u8 {
        self.group
    }

    /// Base asset volume recorded when the sound was triggered
    pub fn base_volume(&self) -> f64 {
        self.volume
    }

    pub fn player(&self) -> Option<&SharedPlayer> {
        self.player.as_ref()
    }
}

impl From<DecodedSound> for ActiveSound {
    fn from(sound: DecodedSound) -> Self {
        Self {
            player: Some(sound.player),
            group: sound.group,
            volume: sound.volume,
        }
    }
}

impl fmt::Debug for ActiveSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveSound")
            .field("empty", &self.is_empty())
            .field("group", &self.group)
            .field("volume", &self.volume)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::headless::HeadlessPlayer;

    #[test]
    fn test_empty_handle_is_not_playing() {
        let sound = ActiveSound::empty();
        assert!(sound.is_empty());
        assert!(!sound.is_playing());
        // No-op on an empty handle
        sound.pause();
    }

    #[test]
    fn test_handle_follows_player_state() {
        let player = Arc::new(Mutex::new(HeadlessPlayer::new(None)));
        let sound = ActiveSound::from(DecodedSound {
            player: player.clone(),
            group: 2,
            volume: 0.5,
        });

        assert!(!sound.is_playing());
        player.lock().play();
        assert!(sound.is_playing());

        sound.pause();
        assert!(!player.lock().is_playing());
        assert_eq!(sound.group(), 2);
        assert_eq!(sound.base_volume(), 0.5);
    }
}
