/// Headless audio backend
///
/// An in-memory mixer context, player and loader that never touch an audio
/// device. Players keep their state and count every call, which makes this
/// backend usable on dedicated servers and in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::player::{AudioContext, SharedPlayer, SoundPlayer};
use super::source::{AssetId, DecodedSound, ResourceLoader};
use crate::error::AudioError;

/// Player that simulates playback without producing sound
#[derive(Debug, Clone, Default)]
pub struct HeadlessPlayer {
    playing: bool,
    volume: f64,
    position: Duration,
    length: Option<Duration>,
    play_calls: usize,
    pause_calls: usize,
}

impl HeadlessPlayer {
    /// Create a player. `length` of `None` plays until told otherwise.
    pub fn new(length: Option<Duration>) -> Self {
        Self {
            volume: 1.0,
            length,
            ..Self::default()
        }
    }

    /// Advance simulated playback, finishing the sound once it passes its length
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.playing {
            return;
        }
        self.position += elapsed;
        if let Some(length) = self.length {
            if self.position >= length {
                self.position = length;
                self.playing = false;
            }
        }
    }

    /// Stop as if the sound reached its end
    pub fn finish(&mut self) {
        self.playing = false;
        if let Some(length) = self.length {
            self.position = length;
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    /// Number of `play` calls received
    pub fn play_calls(&self) -> usize {
        self.play_calls
    }

    /// Number of `pause` calls received
    pub fn pause_calls(&self) -> usize {
        self.pause_calls
    }
}

impl SoundPlayer for HeadlessPlayer {
    fn play(&mut self) {
        self.play_calls += 1;
        if let Some(length) = self.length {
            if self.position >= length {
                return;
            }
        }
        self.playing = true;
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.playing = false;
    }

    fn rewind(&mut self) {
        self.position = Duration::ZERO;
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_position(&mut self, position: Duration) {
        self.position = position;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Mixer context creating headless players
#[derive(Debug, Default)]
pub struct HeadlessContext {
    warm_ups: AtomicUsize,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the context was warmed up
    pub fn warm_ups(&self) -> usize {
        self.warm_ups.load(Ordering::Relaxed)
    }
}

impl AudioContext for HeadlessContext {
    fn new_player(&self, _data: Arc<Vec<u8>>) -> Result<SharedPlayer, AudioError> {
        Ok(Arc::new(Mutex::new(HeadlessPlayer::new(None))))
    }

    fn warm_up(&self) -> Result<(), AudioError> {
        self.warm_ups.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct CatalogEntry {
    group: u8,
    volume: f64,
    length: Option<Duration>,
}

/// Loader backed by an in-memory catalog
///
/// Cloning the loader shares the catalog and the player cache, so a test (or
/// a server's debug console) can keep a clone to inspect players after the
/// original is handed to the audio system.
#[derive(Debug, Clone, Default)]
pub struct HeadlessLoader {
    inner: Arc<Mutex<LoaderState>>,
}

#[derive(Debug, Default)]
struct LoaderState {
    catalog: HashMap<AssetId, CatalogEntry>,
    players: HashMap<AssetId, Arc<Mutex<HeadlessPlayer>>>,
    loads: usize,
}

impl HeadlessLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset that plays until finished explicitly
    pub fn register(&self, id: AssetId, group: u8, volume: f64) {
        self.register_entry(id, group, volume, None);
    }

    /// Register an asset with a fixed length
    pub fn register_with_length(&self, id: AssetId, group: u8, volume: f64, length: Duration) {
        self.register_entry(id, group, volume, Some(length));
    }

    fn register_entry(&self, id: AssetId, group: u8, volume: f64, length: Option<Duration>) {
        self.inner.lock().catalog.insert(
            id,
            CatalogEntry {
                group,
                volume,
                length,
            },
        );
    }

    /// Player for an asset, if it was loaded already
    pub fn player(&self, id: AssetId) -> Option<Arc<Mutex<HeadlessPlayer>>> {
        self.inner.lock().players.get(&id).cloned()
    }

    /// Play calls received by an asset's player (0 if never loaded)
    pub fn play_calls(&self, id: AssetId) -> usize {
        self.player(id).map(|p| p.lock().play_calls()).unwrap_or(0)
    }

    /// Advance every loaded player
    pub fn advance(&self, elapsed: Duration) {
        for player in self.inner.lock().players.values() {
            player.lock().advance(elapsed);
        }
    }

    /// Number of `load` calls served
    pub fn loads(&self) -> usize {
        self.inner.lock().loads
    }
}

impl ResourceLoader for HeadlessLoader {
    fn load(&mut self, id: AssetId) -> Result<DecodedSound, AudioError> {
        let mut state = self.inner.lock();
        state.loads += 1;

        let entry = *state
            .catalog
            .get(&id)
            .ok_or(AudioError::UnknownAsset(id))?;

        let player: SharedPlayer = state
            .players
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(HeadlessPlayer::new(entry.length))))
            .clone();

        Ok(DecodedSound {
            player,
            group: entry.group,
            volume: entry.volume,
        })
    }
}
