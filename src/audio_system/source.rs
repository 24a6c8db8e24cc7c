/// Sound sources
///
/// Identifiers, play options and the loader seam that turns an id into a
/// decoded sound with its player.
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::player::SharedPlayer;
use crate::error::AudioError;

/// Small integer key assigned to a decoded sound by the resource system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub u32);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AssetId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Per-call playback options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    /// Volume multiplier (1.0 = unscaled)
    pub volume: f64,

    /// Where playback starts from
    pub position: Duration,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            position: Duration::ZERO,
        }
    }
}

impl PlayOptions {
    /// Set the volume multiplier
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume.max(0.0);
        self
    }

    /// Set the start offset
    pub fn with_position(mut self, position: Duration) -> Self {
        self.position = position;
        self
    }
}

/// A sound waiting in a queue or sitting in a playlist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundRequest {
    pub id: AssetId,
    pub opts: PlayOptions,
}

impl SoundRequest {
    pub fn new(id: AssetId, opts: PlayOptions) -> Self {
        Self { id, opts }
    }
}

/// A loaded sound: the host player plus the mixing metadata attached to the asset.
#[derive(Clone)]
pub struct DecodedSound {
    pub player: SharedPlayer,

    /// Volume group (0-7)
    pub group: u8,

    /// Base asset volume
    pub volume: f64,
}

impl fmt::Debug for DecodedSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedSound")
            .field("group", &self.group)
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}

/// Resolves asset ids into decoded sounds.
///
/// Loading the same id twice must hand back the same player: implementations
/// cache per id, and have no other side effects.
pub trait ResourceLoader {
    fn load(&mut self, id: AssetId) -> Result<DecodedSound, AudioError>;
}
