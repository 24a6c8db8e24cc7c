use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use game_audio_system::audio_system::rodio_backend::{FileLoader, RodioContext};
use game_audio_system::audio_system::{AudioSystem, Playlist, SoundQueue};
use game_audio_system::error::AppResult;
use game_audio_system::AudioConfig;

const TICK_RATE: u32 = 60;

/// Initialize tracing with an env-driven filter (info level by default).
///
/// Set `RUST_LOG=game_audio_system=debug` to see every play and skip decision.
fn initialize_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .init();
}

fn main() {
    initialize_tracing();

    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("audio.json"));
    let seconds = match args.get(2).map(|s| s.parse::<u64>()) {
        Some(Ok(seconds)) => seconds,
        Some(Err(e)) => {
            tracing::error!("Invalid duration {:?}: {}", args[2], e);
            std::process::exit(2);
        }
        None => 30,
    };

    if let Err(e) = run(&config_path, Duration::from_secs(seconds)) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Play the configured playlist for `duration`, queueing every other asset once.
fn run(config_path: &Path, duration: Duration) -> AppResult<()> {
    let config = AudioConfig::load(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let (_stream, context) = RodioContext::try_default().context("No audio output available")?;
    let context = Arc::new(context);

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let loader = FileLoader::new(context.clone(), base_dir, &config.assets);
    let sys = AudioSystem::new(context, loader);
    sys.apply_config(&config);

    let mut playlist = Playlist::new(&sys);
    for id in &config.playlist {
        playlist.add(*id);
    }
    playlist.set_silence_duration(config.silence_seconds);
    playlist.set_paused(false);

    let mut queue = SoundQueue::new(&sys);
    for asset in config.assets.iter().filter(|a| !config.playlist.contains(&a.id)) {
        queue.play_sound(asset.id);
    }

    tracing::info!(
        "Playing {} playlist tracks and {} queued sounds for {:?}",
        playlist.len(),
        queue.len(),
        duration
    );

    let frame = Duration::from_secs(1) / TICK_RATE;
    let started = Instant::now();
    let mut last = started;
    while started.elapsed() < duration {
        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f64();
        last = now;

        sys.tick();
        queue.update().context("Queue update failed")?;
        playlist.update(delta).context("Playlist update failed")?;

        thread::sleep(frame.saturating_sub(now.elapsed()));
    }

    playlist.set_paused(true);
    queue.reset();
    tracing::info!("Done");
    Ok(())
}
