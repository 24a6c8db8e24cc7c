/// Rodio backend
///
/// Host implementation of the player primitives on top of rodio, plus a
/// loader that reads assets from disk and keeps one player per asset.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::player::{AudioContext, SharedPlayer, SoundPlayer};
use super::source::{AssetId, DecodedSound, ResourceLoader};
use crate::config::AssetEntry;
use crate::error::AudioError;

/// Mixer context bound to an output device
#[derive(Clone)]
pub struct RodioContext {
    handle: OutputStreamHandle,
}

impl RodioContext {
    /// Open the default output device.
    ///
    /// The returned stream must be kept alive for as long as sound should be
    /// heard; dropping it silences every player of this context.
    pub fn try_default() -> Result<(OutputStream, Self), AudioError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::StreamInitFailed(Box::new(e)))?;
        tracing::info!("Opened default audio output");
        Ok((stream, Self { handle }))
    }
}

impl AudioContext for RodioContext {
    fn new_player(&self, data: Arc<Vec<u8>>) -> Result<SharedPlayer, AudioError> {
        Ok(Arc::new(Mutex::new(RodioPlayer::new(self.handle.clone(), data)?)))
    }

    fn warm_up(&self) -> Result<(), AudioError> {
        let sink = Sink::try_new(&self.handle).map_err(|e| AudioError::StreamInitFailed(Box::new(e)))?;
        sink.append(rodio::source::Empty::<i16>::new());
        tracing::debug!("Audio output warmed up");
        Ok(())
    }
}

/// Player for one preloaded sound
pub struct RodioPlayer {
    handle: OutputStreamHandle,
    sink: Sink,
    audio_data: Arc<Vec<u8>>,
    volume: f32,
}

impl RodioPlayer {
    /// Create a paused player positioned at the start of the sound
    pub fn new(handle: OutputStreamHandle, audio_data: Arc<Vec<u8>>) -> Result<Self, AudioError> {
        let sink = paused_sink(&handle, &audio_data, Duration::ZERO, 1.0)?;

        Ok(Self {
            handle,
            sink,
            audio_data,
            volume: 1.0,
        })
    }

    /// Replace the sink with a fresh paused one starting at `position`.
    ///
    /// Rodio sources can't be rewound once consumed, so seeking means decoding
    /// again from the in-memory data.
    fn reload(&mut self, position: Duration) -> Result<(), AudioError> {
        let sink = paused_sink(&self.handle, &self.audio_data, position, self.volume)?;
        self.sink.stop();
        self.sink = sink;
        Ok(())
    }
}

fn paused_sink(
    handle: &OutputStreamHandle,
    data: &Arc<Vec<u8>>,
    position: Duration,
    volume: f32,
) -> Result<Sink, AudioError> {
    let source = decode(data)?.skip_duration(position);

    let sink = Sink::try_new(handle).map_err(|e| AudioError::PlaybackFailed(Box::new(e)))?;
    sink.pause();
    sink.set_volume(volume);
    sink.append(source);
    Ok(sink)
}

fn decode(data: &Arc<Vec<u8>>) -> Result<Decoder<Cursor<Vec<u8>>>, AudioError> {
    // Decoder needs owned 'static data, hence the copy
    let cursor = Cursor::new((**data).clone());
    Decoder::new(cursor).map_err(|e| AudioError::DecodeFailed(Box::new(e)))
}

impl SoundPlayer for RodioPlayer {
    fn play(&mut self) {
        // An ended sink stays empty until set_position reloads it
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn rewind(&mut self) {
        self.set_position(Duration::ZERO);
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume as f32;
        self.sink.set_volume(self.volume);
    }

    fn set_position(&mut self, position: Duration) {
        let was_playing = self.is_playing();
        if let Err(err) = self.reload(position) {
            tracing::warn!("Failed to seek audio to {:?}: {}", position, err);
            return;
        }
        if was_playing {
            self.sink.play();
        }
    }

    fn is_playing(&self) -> bool {
        !self.sink.empty() && !self.sink.is_paused()
    }
}

/// Loads assets listed in the configuration from disk
pub struct FileLoader {
    context: Arc<RodioContext>,
    base_dir: PathBuf,
    catalog: HashMap<AssetId, AssetEntry>,
    cache: HashMap<AssetId, DecodedSound>,
}

impl FileLoader {
    /// Create a loader resolving asset paths relative to `base_dir`
    pub fn new(context: Arc<RodioContext>, base_dir: &Path, assets: &[AssetEntry]) -> Self {
        Self {
            context,
            base_dir: base_dir.to_path_buf(),
            catalog: assets.iter().map(|a| (a.id, a.clone())).collect(),
            cache: HashMap::new(),
        }
    }
}

impl ResourceLoader for FileLoader {
    fn load(&mut self, id: AssetId) -> Result<DecodedSound, AudioError> {
        if let Some(sound) = self.cache.get(&id) {
            return Ok(sound.clone());
        }

        let entry = self.catalog.get(&id).ok_or(AudioError::UnknownAsset(id))?;
        let path = self.base_dir.join(&entry.path);
        let audio_data = std::fs::read(&path).map_err(|e| AudioError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        tracing::info!(
            "Loaded audio {}: {} ({} bytes)",
            id,
            path.display(),
            audio_data.len()
        );

        let sound = DecodedSound {
            player: self.context.new_player(Arc::new(audio_data))?,
            group: entry.group,
            volume: entry.volume,
        };
        self.cache.insert(id, sound.clone());
        Ok(sound)
    }
}
