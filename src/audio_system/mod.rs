pub mod headless;
pub mod manager;
pub mod player;
pub mod playlist;
pub mod queue;
pub mod rodio_backend;
pub mod sound_map;
pub mod source;
/// Audio system module
///
/// A tick-driven coordinator over a host engine's players:
/// - Per-frame dedup, so one sound requested many times in a frame plays once
/// - Global, group, asset and call volume composition
/// - A queue that plays one-shot sounds back-to-back
/// - A playlist that rotates tracks with silence in between
///
/// ## Architecture
///
/// ```text
/// AudioSystem (one per game)
///   ├── SoundMap      per-frame dedup bitset
///   ├── VolumeState   global + 8 group multipliers
///   └── ResourceLoader ──> DecodedSound { player, group, volume }
///
/// SoundQueue ─┐
/// Playlist   ─┴── hold an AudioSystem handle, play through it
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use game_audio_system::audio_system::{AudioSystem, Playlist, SoundQueue, AssetId};
///
/// let sys = AudioSystem::new(context, loader);
/// let mut music = Playlist::new(&sys);
/// music.add(AssetId(10));
/// music.add(AssetId(11));
/// music.set_silence_duration(3.0);
/// music.set_paused(false);
///
/// // Every frame, in this order:
/// sys.tick();
/// sys.play_sound(AssetId(1))?;
/// music.update(delta)?;
/// ```
pub mod volume;

// Re-export commonly used types
pub use manager::AudioSystem;
pub use player::{ActiveSound, AudioContext, SharedPlayer, SoundPlayer};
pub use playlist::{PingPong, Playlist, Sequential, Shuffle, TrackSelector};
pub use queue::SoundQueue;
pub use sound_map::SoundMap;
pub use source::{AssetId, DecodedSound, PlayOptions, ResourceLoader, SoundRequest};
pub use volume::{effective_volume, VolumeState};
