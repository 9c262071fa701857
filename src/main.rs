//! MotoTrack - feed replay host
//!
//! Replays a JSON-lines feed log through the tracking core against a
//! simulated platform and writes the resulting GPX tracks.

use anyhow::{anyhow, Context};
use clap::Parser;
use mototrack::platform::{PlatformServices, SimulatedPlatform};
use mototrack::recording::{StopOutcome, TrackRecorder};
use mototrack::replay::{parse_events, Replayer};
use mototrack::storage::config::{get_config_path, load_config};
use mototrack::storage::files::DirectoryStorage;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Replay a recorded location/motion feed and export it as GPX.
#[derive(Debug, Parser)]
#[command(name = "mototrack", version)]
struct Cli {
    /// Feed log, one JSON event per line
    log: PathBuf,

    /// Configuration file (defaults to the platform config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write tracks here instead of the configured export directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Start with the location permission revoked
    #[arg(long)]
    deny_permission: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting MotoTrack v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(get_config_path);
    let mut config = load_config(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(dir) = cli.output_dir {
        config.export.directory = Some(dir);
    }

    let file = File::open(&cli.log).with_context(|| format!("opening {}", cli.log.display()))?;
    let events = parse_events(BufReader::new(file))
        .with_context(|| format!("reading {}", cli.log.display()))?;
    tracing::info!("Loaded {} events", events.len());

    let platform = Arc::new(SimulatedPlatform::new());
    platform.set_permission(!cli.deny_permission);

    let storage = Arc::new(DirectoryStorage::new(config.export_dir()));
    let recorder = Arc::new(TrackRecorder::new(
        &config,
        PlatformServices::from_shared(platform.clone()),
        storage,
    ));

    // Stand-in for the live map: log every point as it arrives
    let mut points = recorder.subscribe();
    let viewer = std::thread::spawn(move || {
        let mut seen = 0usize;
        loop {
            match points.blocking_recv() {
                Ok(point) => {
                    seen += 1;
                    tracing::info!(
                        "Point {}: {:.6}, {:.6} at {}",
                        seen,
                        point.latitude(),
                        point.longitude(),
                        point.timestamp()
                    );
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!("Map view missed {} points", missed);
                }
                Err(RecvError::Closed) => break,
            }
        }
        seen
    });

    let summary = Replayer::new(recorder.clone(), platform).run(&events);

    // Dropping the last handle closes the point channel
    drop(recorder);
    let seen = viewer
        .join()
        .map_err(|_| anyhow!("map view thread panicked"))?;

    for stop in &summary.stops {
        match stop {
            StopOutcome::Exported(path) => println!("Track saved to {}", path.display()),
            StopOutcome::NothingToExport => println!("No points recorded, nothing saved"),
            StopOutcome::NotTracking => {}
        }
    }
    for error in &summary.errors {
        eprintln!("error: {}", error);
    }

    tracing::info!(
        "Replay finished: {} sessions, {} points recorded, {} shown, {} fixes dropped",
        summary.sessions_started,
        summary.points_recorded,
        seen,
        summary.fixes_dropped
    );

    Ok(())
}
