/// Sound queue
///
/// Plays one-shot sounds back-to-back: the next request only starts after the
/// current one has finished.

use std::collections::VecDeque;

use super::manager::AudioSystem;
use super::player::ActiveSound;
use super::source::{AssetId, PlayOptions, SoundRequest};
use crate::error::AudioError;

pub struct SoundQueue {
    sys: AudioSystem,
    current: ActiveSound,
    queued: VecDeque<SoundRequest>,
}

impl SoundQueue {
    pub fn new(sys: &AudioSystem) -> Self {
        Self {
            sys: sys.clone(),
            current: ActiveSound::empty(),
            queued: VecDeque::with_capacity(4),
        }
    }

    /// Stop the current sound and drop everything still queued.
    pub fn reset(&mut self) {
        if !self.current.is_empty() {
            self.current.pause();
            self.current = ActiveSound::empty();
        }
        self.queued.clear();
    }

    /// Add a sound to the end of the queue.
    ///
    /// It starts on a later [`SoundQueue::update`], once everything queued
    /// before it has played. The backlog is unbounded.
    pub fn play_sound_with_options(&mut self, id: AssetId, opts: PlayOptions) {
        self.queued.push_back(SoundRequest::new(id, opts));
    }

    /// Shorthand for [`SoundQueue::play_sound_with_options`] with default options
    pub fn play_sound(&mut self, id: AssetId) {
        self.play_sound_with_options(id, PlayOptions::default());
    }

    /// Advance the queue by one step. Call once per tick.
    ///
    /// At most one transition happens per call: a finished sound is cleared
    /// on one update and the next request is started on the following one.
    pub fn update(&mut self) -> Result<(), AudioError> {
        if self.current.is_empty() {
            let Some(next) = self.queued.pop_front() else {
                return Ok(());
            };
            tracing::debug!("Queue starting sound {} ({} left)", next.id, self.queued.len());
            self.current = self.sys.play_sound_with_options(next.id, next.opts)?;
            return Ok(());
        }

        if !self.current.is_playing() {
            self.current = ActiveSound::empty();
        }
        Ok(())
    }

    /// Check if nothing is playing through this queue
    pub fn is_idle(&self) -> bool {
        self.current.is_empty()
    }

    /// Number of requests waiting
    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Handle of the sound currently played by the queue
    pub fn current(&self) -> &ActiveSound {
        &self.current
    }
}
