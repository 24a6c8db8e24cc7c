// Integration tests for the audio system
// These drive the public API through the headless backend, tick by tick

use std::sync::Arc;
use std::time::Duration;

use game_audio_system::audio_system::headless::{HeadlessContext, HeadlessLoader};
use game_audio_system::audio_system::{
    AssetId, AudioSystem, PlayOptions, Playlist, SoundPlayer, SoundQueue,
};

const HIT: AssetId = AssetId(1);
const TRACK_A: AssetId = AssetId(10);
const TRACK_B: AssetId = AssetId(11);
const TRACK_C: AssetId = AssetId(12);
const HIGH_ID: AssetId = AssetId(4000);

/// Helper to build a system over a headless loader with a few assets
fn create_system() -> (AudioSystem, HeadlessLoader) {
    let loader = HeadlessLoader::new();
    loader.register(HIT, 0, 1.0);
    loader.register(AssetId(2), 3, 1.0);
    loader.register(AssetId(3), 3, 1.0);
    loader.register(TRACK_A, 1, 1.0);
    loader.register(TRACK_B, 1, 1.0);
    loader.register(TRACK_C, 1, 1.0);
    loader.register(HIGH_ID, 0, 1.0);

    let sys = AudioSystem::new(Arc::new(HeadlessContext::new()), loader.clone());
    (sys, loader)
}

fn finish(loader: &HeadlessLoader, id: AssetId) {
    loader.player(id).expect("asset was never loaded").lock().finish();
}

fn is_playing(loader: &HeadlessLoader, id: AssetId) -> bool {
    loader
        .player(id)
        .map(|p| p.lock().is_playing())
        .unwrap_or(false)
}

#[test]
fn test_same_sound_plays_once_per_tick() {
    let (sys, loader) = create_system();

    sys.tick();
    for _ in 0..10 {
        sys.play_sound_with_options(HIT, PlayOptions::default()).unwrap();
    }
    assert_eq!(loader.play_calls(HIT), 1);

    sys.tick();
    sys.play_sound_with_options(HIT, PlayOptions::default()).unwrap();
    assert_eq!(loader.play_calls(HIT), 2);
}

// Ids past the dedup capacity bypass dedup on purpose.
#[test]
fn test_high_ids_always_reach_the_player() {
    let (sys, loader) = create_system();

    sys.tick();
    sys.play_sound(HIGH_ID).unwrap();
    sys.play_sound(HIGH_ID).unwrap();
    sys.play_sound(HIGH_ID).unwrap();
    assert_eq!(loader.play_calls(HIGH_ID), 3);
}

#[test]
fn test_muted_group_only_mutes_its_assets() {
    let (sys, loader) = create_system();
    sys.set_group_volume(3, 0.0);

    sys.tick();
    let muted = sys.play_sound(AssetId(2)).unwrap();
    let audible = sys.play_sound(HIT).unwrap();

    assert!(!muted.is_playing());
    assert_eq!(loader.play_calls(AssetId(2)), 0);
    assert!(audible.is_playing());
    assert_eq!(loader.play_calls(HIT), 1);

    // Muted requests still count as played for this tick
    sys.set_group_volume(3, 1.0);
    sys.play_sound(AssetId(2)).unwrap();
    assert_eq!(loader.play_calls(AssetId(2)), 0);
    sys.tick();
    sys.play_sound(AssetId(2)).unwrap();
    assert_eq!(loader.play_calls(AssetId(2)), 1);
}

#[test]
#[should_panic(expected = "invalid group ID")]
fn test_set_group_volume_out_of_range_panics() {
    let (sys, _) = create_system();
    sys.set_group_volume(8, 0.5);
}

#[test]
#[should_panic(expected = "invalid group ID")]
fn test_get_group_volume_out_of_range_panics() {
    let (sys, _) = create_system();
    sys.group_volume(8);
}

#[test]
fn test_queue_plays_in_order_without_overlap() {
    let (sys, loader) = create_system();
    let mut queue = SoundQueue::new(&sys);
    let ids = [HIT, AssetId(2), AssetId(3)];
    for id in ids {
        queue.play_sound(id);
    }

    let mut started = Vec::new();
    for _ in 0..20 {
        sys.tick();
        queue.update().unwrap();

        let playing: Vec<AssetId> = ids
            .iter()
            .copied()
            .filter(|id| is_playing(&loader, *id))
            .collect();
        assert!(playing.len() <= 1, "overlapping sounds: {:?}", playing);

        if let Some(id) = playing.first() {
            if started.last() != Some(id) {
                started.push(*id);
            }
            // The sound ends right after it started; the queue notices next tick
            finish(&loader, *id);
        }
    }

    assert_eq!(started, ids.to_vec());
    assert!(queue.is_idle());
    assert!(queue.is_empty());
}

#[test]
fn test_queue_reset_mid_playback() {
    let (sys, loader) = create_system();
    let mut queue = SoundQueue::new(&sys);
    queue.play_sound(HIT);
    queue.play_sound(AssetId(2));

    sys.tick();
    queue.update().unwrap();
    assert!(is_playing(&loader, HIT));

    queue.reset();
    assert!(!is_playing(&loader, HIT));
    assert!(queue.is_idle());
    assert!(queue.is_empty());

    for _ in 0..5 {
        sys.tick();
        queue.update().unwrap();
    }
    assert_eq!(loader.play_calls(AssetId(2)), 0);

    queue.play_sound(AssetId(2));
    sys.tick();
    queue.update().unwrap();
    assert!(is_playing(&loader, AssetId(2)));
}

fn music_playlist(sys: &AudioSystem) -> Playlist {
    let mut playlist = Playlist::new(sys);
    playlist.add(TRACK_A);
    playlist.add(TRACK_B);
    playlist.add(TRACK_C);
    playlist
}

#[test]
fn test_playlist_starts_paused() {
    let (sys, loader) = create_system();
    let mut playlist = music_playlist(&sys);
    assert!(playlist.is_paused());

    sys.tick();
    playlist.update(0.1).unwrap();
    assert_eq!(playlist.current_index(), None);
    assert_eq!(loader.loads(), 0);
}

#[test]
fn test_playlist_default_order_wraps() {
    let (sys, loader) = create_system();
    let mut playlist = music_playlist(&sys);
    playlist.set_silence_duration(1.0);
    playlist.set_paused(false);

    let mut order = Vec::new();
    for _ in 0..4 {
        // Tick until a track starts
        let mut steps = 0;
        let id = loop {
            sys.tick();
            playlist.update(0.25).unwrap();
            if let Some(id) = [TRACK_A, TRACK_B, TRACK_C]
                .into_iter()
                .find(|id| is_playing(&loader, *id))
            {
                break id;
            }
            steps += 1;
            assert!(steps < 20, "playlist never started the next track");
        };
        order.push(id);
        finish(&loader, id);
    }

    assert_eq!(order, vec![TRACK_A, TRACK_B, TRACK_C, TRACK_A]);
}

#[test]
fn test_playlist_waits_for_silence() {
    let (sys, loader) = create_system();
    let mut playlist = music_playlist(&sys);
    playlist.set_silence_duration(1.0);
    playlist.set_paused(false);

    sys.tick();
    playlist.update(0.5).unwrap();
    assert!(is_playing(&loader, TRACK_A));
    finish(&loader, TRACK_A);

    // Next track waits for the full second of silence
    sys.tick();
    playlist.update(0.5).unwrap();
    assert_eq!(playlist.current_index(), Some(1));
    assert!(!is_playing(&loader, TRACK_B));

    sys.tick();
    playlist.update(0.5).unwrap();
    assert!(is_playing(&loader, TRACK_B));
}

#[test]
fn test_playlist_pause_resumes_same_track() {
    let (sys, loader) = create_system();
    let mut playlist = music_playlist(&sys);

    let selections = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = selections.clone();
    playlist.set_selector(move |current: Option<usize>, len: usize| {
        counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        current.map(|i| (i + 1) % len).unwrap_or(0)
    });
    playlist.set_paused(false);

    sys.tick();
    playlist.update(0.1).unwrap();
    assert!(is_playing(&loader, TRACK_A));
    loader.player(TRACK_A).unwrap().lock().advance(Duration::from_secs(3));

    playlist.set_paused(true);
    assert!(!is_playing(&loader, TRACK_A));
    sys.tick();
    playlist.update(0.1).unwrap();

    playlist.set_paused(false);
    assert!(is_playing(&loader, TRACK_A));
    assert_eq!(
        loader.player(TRACK_A).unwrap().lock().position(),
        Duration::from_secs(3)
    );

    sys.tick();
    playlist.update(0.1).unwrap();
    assert_eq!(playlist.current_index(), Some(0));
    assert_eq!(selections.load(std::sync::atomic::Ordering::Relaxed), 1);
    assert_eq!(loader.play_calls(TRACK_A), 2);
}

#[test]
fn test_playlist_muted_resume_keeps_same_track() {
    let (sys, loader) = create_system();
    let mut playlist = music_playlist(&sys);

    let selections = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = selections.clone();
    playlist.set_selector(move |current: Option<usize>, len: usize| {
        counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        current.map(|i| (i + 1) % len).unwrap_or(0)
    });
    playlist.set_paused(false);

    sys.tick();
    playlist.update(0.1).unwrap();
    loader.player(TRACK_A).unwrap().lock().advance(Duration::from_secs(30));

    playlist.set_paused(true);
    sys.set_group_volume(1, 0.0);
    playlist.set_paused(false);
    assert!(!is_playing(&loader, TRACK_A));

    // Still held on A while muted
    sys.tick();
    playlist.update(0.1).unwrap();
    assert_eq!(playlist.current_index(), Some(0));
    assert!(!is_playing(&loader, TRACK_B));

    sys.set_group_volume(1, 1.0);
    sys.tick();
    playlist.update(0.1).unwrap();

    assert_eq!(selections.load(std::sync::atomic::Ordering::Relaxed), 1);
    assert_eq!(playlist.current_index(), Some(0));
    assert!(is_playing(&loader, TRACK_A));
    assert_eq!(
        loader.player(TRACK_A).unwrap().lock().position(),
        Duration::from_secs(30)
    );
    assert!(!is_playing(&loader, TRACK_B));
}

#[test]
fn test_playlist_pause_keeps_silence_countdown() {
    let (sys, loader) = create_system();
    let mut playlist = music_playlist(&sys);
    playlist.set_silence_duration(1.0);
    playlist.set_paused(false);

    sys.tick();
    playlist.update(0.5).unwrap();
    finish(&loader, TRACK_A);

    // Half of the gap elapses before the pause
    sys.tick();
    playlist.update(0.5).unwrap();
    assert_eq!(playlist.current_index(), Some(1));

    playlist.set_paused(true);
    sys.tick();
    playlist.update(0.5).unwrap();
    playlist.set_paused(false);

    sys.tick();
    playlist.update(0.25).unwrap();
    assert!(!is_playing(&loader, TRACK_B));

    sys.tick();
    playlist.update(0.25).unwrap();
    assert!(is_playing(&loader, TRACK_B));
    assert_eq!(playlist.current_index(), Some(1));
}

#[test]
fn test_playlist_resume_uses_current_volume() {
    let (sys, loader) = create_system();
    let mut playlist = Playlist::new(&sys);
    playlist.add_with_options(TRACK_A, PlayOptions::default().with_volume(0.5));
    playlist.set_paused(false);

    sys.tick();
    playlist.update(0.1).unwrap();
    playlist.set_paused(true);

    sys.set_group_volume(1, 0.5);
    playlist.set_paused(false);
    assert_eq!(loader.player(TRACK_A).unwrap().lock().volume(), 0.25);

    // Muted group: resuming leaves the player paused
    playlist.set_paused(true);
    sys.set_group_volume(1, 0.0);
    playlist.set_paused(false);
    assert!(!is_playing(&loader, TRACK_A));
}

#[test]
fn test_empty_playlist_update_is_noop() {
    let (sys, loader) = create_system();
    let mut playlist = Playlist::new(&sys);
    playlist.set_paused(false);
    playlist.update(1.0).unwrap();
    assert!(playlist.is_empty());
    assert_eq!(playlist.current_index(), None);
    assert_eq!(loader.loads(), 0);
}
