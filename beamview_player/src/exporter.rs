//! Headless JSON frame exporter.
//!
//! `--export` plays the trajectory through exactly one loop at the fixed
//! tick step and writes every derived frame as JSON, for offline
//! inspection or replay tooling.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

use beamview_core::{BeamTransform, Player, PlayerFrame};

/// A single exported playback frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFrame {
    /// Playback time in seconds
    pub time_sec: f64,

    /// Interpolated source position
    pub position: [f64; 3],

    /// Index of the current bracketing sample
    pub frame_index: usize,

    /// Playback progress percentage
    pub progress_percent: f64,

    /// Formatted "elapsed / total" clock string
    pub clock: String,

    /// Beam pose, absent while the source sits in the degenerate zone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beam: Option<ExportBeam>,

    /// Trail positions, oldest first
    pub trail: Vec<[f64; 3]>,

    /// Playback looped back to zero on this frame
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    #[serde(default)]
    pub wrapped: bool,
}

/// Flattened beam transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBeam {
    /// Uniform cone scale (equals source distance)
    pub scale: f64,

    /// Orientation quaternion [w, i, j, k]
    pub rotation: [f64; 4],

    /// Cone center
    pub center: [f64; 3],

    /// Axis line end (source position)
    pub target: [f64; 3],
}

impl ExportBeam {
    fn new(beam: &BeamTransform) -> Self {
        let q = beam.rotation.as_ref();
        Self {
            scale: beam.scale,
            rotation: [q.w, q.i, q.j, q.k],
            center: [beam.center.x, beam.center.y, beam.center.z],
            target: [beam.target.x, beam.target.y, beam.target.z],
        }
    }
}

impl ExportFrame {
    fn new(frame: &PlayerFrame) -> Self {
        Self {
            time_sec: frame.time,
            position: [frame.position.x, frame.position.y, frame.position.z],
            frame_index: frame.frame_index,
            progress_percent: frame.progress_percent,
            clock: frame.clock_display.clone(),
            beam: frame.beam.as_ref().map(ExportBeam::new),
            trail: frame.trail.iter().map(|p| [p.x, p.y, p.z]).collect(),
            wrapped: frame.wrapped,
        }
    }
}

/// Complete playback export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackExport {
    /// Source document path
    pub source: String,

    /// Tick rate the loop was stepped at
    pub fps: u32,

    /// Loop period in seconds
    pub duration_sec: f64,

    /// Total trajectory samples
    pub sample_count: usize,

    /// All frames of one full loop
    pub frames: Vec<ExportFrame>,
}

impl PlaybackExport {
    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

/// Plays exactly one loop at `1/fps` steps and collects every frame.
///
/// The first tick carries delta zero (no prior timestamp), so the export
/// always starts at time zero; the final frame is the wraparound frame.
pub fn export_playback(player: &mut Player, source: &str, fps: u32) -> PlaybackExport {
    let dt = 1.0 / fps as f64;
    player.set_playing(true);

    let mut frames = Vec::new();
    let mut now = 0.0;
    loop {
        let frame = player.advance(now);
        let wrapped = frame.wrapped;
        frames.push(ExportFrame::new(&frame));
        if wrapped {
            break;
        }
        now += dt;
    }

    PlaybackExport {
        source: source.to_string(),
        fps,
        duration_sec: player.trajectory().duration(),
        sample_count: player.trajectory().sample_count(),
        frames,
    }
}
