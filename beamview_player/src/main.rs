//! beamview Player CLI
//!
//! Play, pause, and scrub through a precomputed acoustic-source
//! trajectory: a terminal transport drives the playback engine while an
//! optional Rerun view shows the source, beam cone, and fading trail.

mod exporter;
mod transport;
mod visualizer;

use anyhow::Context;
use beamview_core::{Player, Trajectory};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Acoustic trajectory playback transport
#[derive(Parser, Debug)]
#[command(name = "beamview-player")]
#[command(about = "Play back a precomputed acoustic-source trajectory", long_about = None)]
struct Args {
    /// Path to the trajectory JSON document
    trajectory: String,

    /// Render tick rate in frames per second
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Start playing immediately instead of paused
    #[arg(long)]
    autoplay: bool,

    /// Play one loop headlessly and write every frame to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Save the Rerun recording to a file instead of spawning the viewer
    #[arg(long)]
    rerun_save: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if args.fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }

    let file = File::open(&args.trajectory)
        .with_context(|| format!("opening {}", args.trajectory))?;
    let trajectory = Trajectory::from_reader(BufReader::new(file))
        .with_context(|| format!("loading {}", args.trajectory))?;

    info!(
        "Loaded {} samples over {:.1}s, {} microphones, beam half-angle {:.3} rad",
        trajectory.sample_count(),
        trajectory.duration(),
        trajectory.mic_positions().len(),
        trajectory.beam_half_angle(),
    );

    let mut player = Player::new(trajectory);

    if let Some(export_path) = &args.export {
        let export = exporter::export_playback(&mut player, &args.trajectory, args.fps);
        let frame_count = export.frames.len();
        export
            .write_to_file(export_path)
            .with_context(|| format!("writing {}", export_path))?;
        info!("Exported {} frames to {}", frame_count, export_path);
        return Ok(());
    }

    if args.autoplay {
        player.set_playing(true);
    }

    let logger = match &args.rerun_save {
        Some(path) => visualizer::RerunLogger::save("beamview", path),
        None => visualizer::RerunLogger::spawn("beamview"),
    };
    logger.log_scene(player.trajectory());

    let mut transport = transport::Transport::new(player, logger, args.fps);
    transport.run().context("transport loop")?;

    Ok(())
}
