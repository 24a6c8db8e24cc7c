/// Audio system manager
///
/// The single mixer facade of a game: owns the per-frame dedup set and the
/// volume tables, and is the only place that drives players on behalf of
/// game code, queues and playlists.

use std::sync::Arc;

use parking_lot::Mutex;

use super::player::{ActiveSound, AudioContext};
use super::sound_map::SoundMap;
use super::source::{AssetId, PlayOptions, ResourceLoader};
use super::volume::VolumeState;
use crate::config::AudioConfig;
use crate::error::AudioError;

struct SystemState {
    loader: Box<dyn ResourceLoader + Send>,

    // Tracks sounds with id < capacity. Each of them is "played" at most
    // once per tick; repeated requests in the same tick return early.
    sound_map: SoundMap,

    volume: VolumeState,
}

/// Audio system manager
///
/// Cloning produces another handle to the same system. Queues and playlists
/// keep such a handle; there is no global instance.
#[derive(Clone)]
pub struct AudioSystem {
    context: Arc<dyn AudioContext>,
    state: Arc<Mutex<SystemState>>,
}

impl AudioSystem {
    /// Bind the system to a mixer context and a resource loader.
    ///
    /// Global and group volumes start at 1.0.
    pub fn new<L>(context: Arc<dyn AudioContext>, loader: L) -> Self
    where
        L: ResourceLoader + Send + 'static,
    {
        Self::with_sound_map(context, loader, SoundMap::default())
    }

    /// Same as [`AudioSystem::new`] with a custom dedup capacity
    pub fn with_sound_map<L>(context: Arc<dyn AudioContext>, loader: L, sound_map: SoundMap) -> Self
    where
        L: ResourceLoader + Send + 'static,
    {
        // Player factories may initialize lazily, delaying the first sound by
        // a noticeable amount. Android backends don't benefit from this.
        if !cfg!(target_os = "android") {
            if let Err(err) = context.warm_up() {
                tracing::warn!("Audio context warm-up failed: {}", err);
            }
        }

        tracing::info!(
            "Audio system initialized (dedup capacity {})",
            sound_map.capacity()
        );

        Self {
            context,
            state: Arc::new(Mutex::new(SystemState {
                loader: Box::new(loader),
                sound_map,
                volume: VolumeState::new(),
            })),
        }
    }

    pub fn context(&self) -> &Arc<dyn AudioContext> {
        &self.context
    }

    /// Prepare the system for the next game tick.
    ///
    /// Call this once per frame, before any sound is played during that frame.
    pub fn tick(&self) {
        self.state.lock().sound_map.reset();
    }

    /// Report the global volume multiplier
    pub fn global_volume(&self) -> f64 {
        self.state.lock().volume.global()
    }

    /// Set the multiplier applied on top of every other volume level.
    ///
    /// This is the "master volume" over separate sfx/music/voice controls.
    pub fn set_global_volume(&self, volume: f64) {
        self.state.lock().volume.set_global(volume);
    }

    /// Report the volume multiplier of a group.
    ///
    /// # Panics
    ///
    /// Panics if `group_id` is not in `0..8`.
    pub fn group_volume(&self, group_id: usize) -> f64 {
        self.state.lock().volume.group(group_id)
    }

    /// Set the volume multiplier of a group. A multiplier of 0 mutes it.
    ///
    /// # Panics
    ///
    /// Panics if `group_id` is not in `0..8`.
    pub fn set_group_volume(&self, group_id: usize, volume: f64) {
        self.state.lock().volume.set_group(group_id, volume);
    }

    /// Apply the volume levels of a configuration
    pub fn apply_config(&self, config: &AudioConfig) {
        let mut state = self.state.lock();
        state.volume.set_global(config.global_volume);
        for (group_id, volume) in config.group_volumes.iter().enumerate() {
            state.volume.set_group(group_id, *volume);
        }
        tracing::debug!(
            "Applied audio config: global={}, groups={:?}",
            config.global_volume,
            config.group_volumes
        );
    }

    /// Effective volume of an already triggered sound for a call-site volume
    pub fn effective_volume_for(&self, sound: &ActiveSound, call_volume: f64) -> f64 {
        self.state
            .lock()
            .volume
            .effective(sound.group(), sound.base_volume(), call_volume)
    }

    /// Play a sound once per tick.
    ///
    /// A second request for the same id within one tick returns the handle
    /// without touching the player. A zero effective volume skips playback,
    /// and the returned handle reports not playing.
    pub fn play_sound_with_options(
        &self,
        id: AssetId,
        opts: PlayOptions,
    ) -> Result<ActiveSound, AudioError> {
        let mut state = self.state.lock();
        let sound = state.loader.load(id)?;

        if state.sound_map.is_set(id) {
            tracing::trace!("Sound {} already played this tick", id);
            return Ok(sound.into());
        }
        state.sound_map.set(id);

        let volume = state.volume.effective(sound.group, sound.volume, opts.volume);
        drop(state);

        if volume != 0.0 {
            let mut player = sound.player.lock();
            player.set_volume(volume);
            player.set_position(opts.position);
            player.play();
            tracing::debug!("Playing sound {} at volume {:.3}", id, volume);
        } else {
            tracing::debug!("Skipping sound {}: effective volume is 0", id);
        }

        Ok(sound.into())
    }

    /// Shorthand for [`AudioSystem::play_sound_with_options`] with default options
    pub fn play_sound(&self, id: AssetId) -> Result<ActiveSound, AudioError> {
        self.play_sound_with_options(id, PlayOptions::default())
    }
}
