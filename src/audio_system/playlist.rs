/// Music playlist
///
/// Rotates over a fixed list of tracks, leaving a configurable stretch of
/// silence between them. Which track comes next is decided by a pluggable
/// [`TrackSelector`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::manager::AudioSystem;
use super::player::ActiveSound;
use super::source::{AssetId, PlayOptions, SoundRequest};
use crate::error::AudioError;

/// Chooses the next track of a playlist.
///
/// `current` is `None` when no track has been selected yet. The returned index
/// must be in `0..len`; `len` is never 0.
pub trait TrackSelector {
    fn select_next(&mut self, current: Option<usize>, len: usize) -> usize;
}

impl<F> TrackSelector for F
where
    F: FnMut(Option<usize>, usize) -> usize,
{
    fn select_next(&mut self, current: Option<usize>, len: usize) -> usize {
        self(current, len)
    }
}

/// Next track, wrapping to the first one past the end
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl TrackSelector for Sequential {
    fn select_next(&mut self, current: Option<usize>, len: usize) -> usize {
        match current {
            Some(index) if index + 1 < len => index + 1,
            _ => 0,
        }
    }
}

/// Walks to the last track and back again: 0, 1, 2, 1, 0, 1, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct PingPong {
    backwards: bool,
}

impl TrackSelector for PingPong {
    fn select_next(&mut self, current: Option<usize>, len: usize) -> usize {
        let Some(index) = current else {
            self.backwards = false;
            return 0;
        };
        if len < 2 {
            return 0;
        }
        if self.backwards && index == 0 {
            self.backwards = false;
        } else if !self.backwards && index + 1 >= len {
            self.backwards = true;
        }
        if self.backwards {
            index - 1
        } else {
            index + 1
        }
    }
}

/// Random track, never the same one twice in a row
#[derive(Debug, Clone)]
pub struct Shuffle {
    rng: StdRng,
}

impl Shuffle {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic shuffle for replays and tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Shuffle {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackSelector for Shuffle {
    fn select_next(&mut self, current: Option<usize>, len: usize) -> usize {
        match current {
            Some(index) if len > 1 && index < len => {
                // Pick among the other len - 1 tracks
                let pick = self.rng.gen_range(0..len - 1);
                if pick >= index {
                    pick + 1
                } else {
                    pick
                }
            }
            _ => self.rng.gen_range(0..len),
        }
    }
}

pub struct Playlist {
    sys: AudioSystem,
    current: ActiveSound,
    current_index: Option<usize>,
    tracks: Vec<SoundRequest>,
    silence: f64,
    next_delay: f64,
    paused: bool,
    held: bool,
    selector: Box<dyn TrackSelector + Send>,
}

impl Playlist {
    /// Create an empty, paused playlist using the [`Sequential`] selector
    pub fn new(sys: &AudioSystem) -> Self {
        Self {
            sys: sys.clone(),
            current: ActiveSound::empty(),
            current_index: None,
            tracks: Vec::with_capacity(4),
            silence: 0.0,
            next_delay: 0.0,
            paused: true,
            held: false,
            selector: Box::new(Sequential),
        }
    }

    /// Replace the track selection policy
    pub fn set_selector<S>(&mut self, selector: S)
    where
        S: TrackSelector + Send + 'static,
    {
        self.selector = Box::new(selector);
    }

    pub fn add_with_options(&mut self, id: AssetId, opts: PlayOptions) {
        self.tracks.push(SoundRequest::new(id, opts));
    }

    pub fn add(&mut self, id: AssetId) {
        self.add_with_options(id, PlayOptions::default());
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Index of the selected track, `None` before the first selection
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume the playlist.
    ///
    /// Pausing keeps the track position. Resuming continues the same track at
    /// its recomputed volume; it does not select a new track or restart the
    /// silence countdown. If that volume is 0 the track stays held and later
    /// updates resume it once it becomes audible.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;

        if self.current.is_empty() {
            return;
        }
        if paused {
            self.current.pause();
            return;
        }
        self.held = !self.resume_current();
    }

    /// Resume the current track at its effective volume. Returns false if the
    /// volume is 0 and the player was left alone.
    fn resume_current(&self) -> bool {
        let (Some(player), Some(index)) = (self.current.player(), self.current_index) else {
            return false;
        };
        let volume = self
            .sys
            .effective_volume_for(&self.current, self.tracks[index].opts.volume);
        if volume == 0.0 {
            return false;
        }
        let mut player = player.lock();
        player.set_volume(volume);
        player.play();
        true
    }

    pub fn silence_duration(&self) -> f64 {
        self.silence
    }

    /// Set the silence, in seconds, left after each track before the next starts
    pub fn set_silence_duration(&mut self, seconds: f64) {
        self.silence = seconds;
    }

    /// Advance the playlist by `delta` seconds. Call once per tick.
    pub fn update(&mut self, delta: f64) -> Result<(), AudioError> {
        if self.tracks.is_empty() || self.paused {
            return Ok(());
        }

        if self.current_index.is_none() {
            self.current_index = Some(self.select(None));
        }

        if self.current.is_playing() {
            return Ok(());
        }

        if self.held {
            // Resumed while muted: pick the same track back up, never advance
            self.held = !self.resume_current();
            return Ok(());
        }

        if !self.current.is_empty() {
            // The previous track finished
            self.current = ActiveSound::empty();
            self.current_index = Some(self.select(self.current_index));
        }

        self.next_delay -= delta;
        if self.next_delay > 0.0 {
            return Ok(());
        }
        self.next_delay = self.silence;

        let Some(index) = self.current_index else {
            return Ok(());
        };
        let track = self.tracks[index];
        tracing::debug!("Playlist starting track {} (asset {})", index, track.id);
        self.current = self.sys.play_sound_with_options(track.id, track.opts)?;
        Ok(())
    }

    fn select(&mut self, current: Option<usize>) -> usize {
        let len = self.tracks.len();
        let index = self.selector.select_next(current, len);
        if index >= len {
            tracing::warn!(
                "Track selector returned {} for a playlist of {} tracks",
                index,
                len
            );
            return len - 1;
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_wraps() {
        let mut sel = Sequential;
        assert_eq!(sel.select_next(None, 3), 0);
        assert_eq!(sel.select_next(Some(0), 3), 1);
        assert_eq!(sel.select_next(Some(1), 3), 2);
        assert_eq!(sel.select_next(Some(2), 3), 0);
        assert_eq!(sel.select_next(Some(0), 1), 0);
    }

    #[test]
    fn test_ping_pong_order() {
        let mut sel = PingPong::default();
        let mut current = None;
        let mut order = Vec::new();
        for _ in 0..7 {
            let next = sel.select_next(current, 3);
            order.push(next);
            current = Some(next);
        }
        assert_eq!(order, vec![0, 1, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn test_ping_pong_single_track() {
        let mut sel = PingPong::default();
        assert_eq!(sel.select_next(None, 1), 0);
        assert_eq!(sel.select_next(Some(0), 1), 0);
    }

    #[test]
    fn test_shuffle_never_repeats() {
        let mut sel = Shuffle::with_seed(7);
        let mut current = sel.select_next(None, 4);
        assert!(current < 4);
        for _ in 0..100 {
            let next = sel.select_next(Some(current), 4);
            assert!(next < 4);
            assert_ne!(next, current);
            current = next;
        }
        assert_eq!(sel.select_next(Some(0), 1), 0);
    }

    #[test]
    fn test_out_of_range_selection_is_clamped() {
        use crate::audio_system::headless::{HeadlessContext, HeadlessLoader};
        use std::sync::Arc;

        let loader = HeadlessLoader::new();
        loader.register(AssetId(1), 0, 1.0);
        loader.register(AssetId(2), 0, 1.0);
        let sys = AudioSystem::new(Arc::new(HeadlessContext::new()), loader.clone());

        let mut playlist = Playlist::new(&sys);
        playlist.add(AssetId(1));
        playlist.add(AssetId(2));
        playlist.set_selector(|_: Option<usize>, _: usize| 99usize);
        playlist.set_paused(false);
        playlist.update(0.0).unwrap();

        assert_eq!(playlist.current_index(), Some(1));
        assert_eq!(loader.play_calls(AssetId(2)), 1);
    }

    #[test]
    fn test_closure_selector() {
        let mut always_last = |_: Option<usize>, len: usize| len - 1;
        assert_eq!(always_last.select_next(None, 5), 4);
    }
}
