//! Rerun visualization for trajectory playback.
//!
//! Optional rendering collaborator behind the `visualization` feature.
//! Without the feature every logging call is a no-op, so the transport
//! runs unchanged in a headless build.
//!
//! # What Gets Logged
//!
//! - Microphone array, full source path, and ground grid (static)
//! - Interpolated source position per tick
//! - Beam cone wireframe and apex-to-source axis line
//! - Fading trail strip
//! - Playback progress as a scalar timeline

#[cfg(feature = "visualization")]
use rerun::RecordingStream;

use beamview_core::{BeamGeometry, PlayerFrame, Trajectory};

#[cfg(feature = "visualization")]
const SOURCE_COLOR: [u8; 4] = [167, 139, 250, 255];
#[cfg(feature = "visualization")]
const MIC_COLOR: [u8; 4] = [34, 211, 238, 255];
#[cfg(feature = "visualization")]
const PATH_COLOR: [u8; 4] = [42, 42, 53, 102];
#[cfg(feature = "visualization")]
const TRAIL_COLOR: [u8; 4] = [167, 139, 250, 153];
#[cfg(feature = "visualization")]
const BEAM_COLOR: [u8; 4] = [139, 92, 246, 120];
#[cfg(feature = "visualization")]
const AXIS_COLOR: [u8; 4] = [167, 139, 250, 230];

/// Rerun logger for the playback scene.
pub struct RerunLogger {
    #[cfg(feature = "visualization")]
    rec: Option<RecordingStream>,

    /// Whether visualization is enabled
    enabled: bool,
}

impl RerunLogger {
    /// Creates a logger with visualization disabled.
    pub fn disabled() -> Self {
        Self {
            #[cfg(feature = "visualization")]
            rec: None,
            enabled: false,
        }
    }

    /// Creates a logger that spawns the Rerun viewer.
    #[cfg(feature = "visualization")]
    pub fn spawn(name: &str) -> Self {
        match rerun::RecordingStreamBuilder::new(name).spawn() {
            Ok(rec) => Self::from_stream(rec),
            Err(e) => {
                tracing::warn!("Failed to spawn Rerun viewer: {:?}", e);
                Self::disabled()
            }
        }
    }

    /// Creates a logger - returns disabled if the feature is off.
    #[cfg(not(feature = "visualization"))]
    pub fn spawn(_name: &str) -> Self {
        tracing::info!("Rerun visualization not available (compile with --features visualization)");
        Self::disabled()
    }

    /// Creates a logger that records to an .rrd file.
    #[cfg(feature = "visualization")]
    pub fn save(name: &str, path: &str) -> Self {
        match rerun::RecordingStreamBuilder::new(name).save(path) {
            Ok(rec) => {
                tracing::info!("Recording visualization to {}", path);
                Self::from_stream(rec)
            }
            Err(e) => {
                tracing::warn!("Failed to open Rerun recording {}: {:?}", path, e);
                Self::disabled()
            }
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn save(_name: &str, _path: &str) -> Self {
        tracing::info!("Rerun visualization not available (compile with --features visualization)");
        Self::disabled()
    }

    #[cfg(feature = "visualization")]
    fn from_stream(rec: RecordingStream) -> Self {
        let _ = rec.log_static("world", &rerun::ViewCoordinates::RIGHT_HAND_Z_UP());
        Self {
            rec: Some(rec),
            enabled: true,
        }
    }

    /// Returns whether visualization is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs the static scene: microphone array, full source path, grid.
    #[cfg(feature = "visualization")]
    pub fn log_scene(&self, trajectory: &Trajectory) {
        let rec = match self.rec {
            Some(ref rec) => rec,
            None => return,
        };

        let mics: Vec<[f32; 3]> = trajectory
            .mic_positions()
            .iter()
            .map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect();
        let _ = rec.log_static(
            "world/mics",
            &rerun::Points3D::new(mics)
                .with_colors([MIC_COLOR])
                .with_radii([0.006]),
        );

        let path: Vec<[f32; 3]> = trajectory
            .positions()
            .iter()
            .map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect();
        if path.len() >= 2 {
            let _ = rec.log_static(
                "world/path",
                &rerun::LineStrips3D::new([path]).with_colors([PATH_COLOR]),
            );
        }

        self.log_ground_grid(0.6, 12);
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_scene(&self, _trajectory: &Trajectory) {}

    /// Logs one playback frame at the given tick.
    #[cfg(feature = "visualization")]
    pub fn log_frame(&self, tick: u64, frame: &PlayerFrame, geometry: BeamGeometry) {
        let rec = match self.rec {
            Some(ref rec) => rec,
            None => return,
        };

        rec.set_time_sequence("tick", tick as i64);

        let source = [
            frame.position.x as f32,
            frame.position.y as f32,
            frame.position.z as f32,
        ];
        let _ = rec.log(
            "world/source",
            &rerun::Points3D::new([source])
                .with_colors([SOURCE_COLOR])
                .with_radii([0.018]),
        );

        if frame.trail.len() >= 2 {
            let trail: Vec<[f32; 3]> = frame
                .trail
                .iter()
                .map(|p| [p.x as f32, p.y as f32, p.z as f32])
                .collect();
            let _ = rec.log(
                "world/trail",
                &rerun::LineStrips3D::new([trail]).with_colors([TRAIL_COLOR]),
            );
        }

        if let Some(ref beam) = frame.beam {
            let _ = rec.log(
                "world/beam/axis",
                &rerun::LineStrips3D::new([[
                    [
                        beam.origin.x as f32,
                        beam.origin.y as f32,
                        beam.origin.z as f32,
                    ],
                    [
                        beam.target.x as f32,
                        beam.target.y as f32,
                        beam.target.z as f32,
                    ],
                ]])
                .with_colors([AXIS_COLOR]),
            );

            let _ = rec.log(
                "world/beam/cone",
                &rerun::LineStrips3D::new(cone_wireframe(beam, geometry))
                    .with_colors([BEAM_COLOR]),
            );
        }

        let _ = rec.log(
            "metrics/progress",
            &rerun::Scalars::new([frame.progress_percent]),
        );

        if frame.wrapped {
            let _ = rec.log("logs/playback", &rerun::TextLog::new("loop wrapped"));
        }
    }

    #[cfg(not(feature = "visualization"))]
    pub fn log_frame(&self, _tick: u64, _frame: &PlayerFrame, _geometry: BeamGeometry) {}

    /// Logs a ground plane grid for scene context.
    #[cfg(feature = "visualization")]
    fn log_ground_grid(&self, size: f32, divisions: usize) {
        let rec = match self.rec {
            Some(ref rec) => rec,
            None => return,
        };

        let mut lines: Vec<Vec<[f32; 3]>> = Vec::new();
        let step = size / divisions as f32;
        for i in 0..=divisions {
            let coord = -size / 2.0 + i as f32 * step;
            lines.push(vec![[coord, -size / 2.0, 0.0], [coord, size / 2.0, 0.0]]);
            lines.push(vec![[-size / 2.0, coord, 0.0], [size / 2.0, coord, 0.0]]);
        }

        let _ = rec.log_static(
            "world/ground/grid",
            &rerun::LineStrips3D::new(lines).with_colors([[60, 60, 60, 100]]),
        );
    }
}

/// Builds the beam cone wireframe: circumference rings along the axis
/// plus four generator lines from apex to base, all in world space.
#[cfg(feature = "visualization")]
fn cone_wireframe(
    beam: &beamview_core::BeamTransform,
    geometry: BeamGeometry,
) -> Vec<Vec<[f32; 3]>> {
    use nalgebra::Vector3;
    use std::f64::consts::TAU;

    const RING_SEGMENTS: usize = 32;
    const RING_FRACTIONS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

    // Unit cone model space: apex at (0, 0.5, 0), base ring at y = -0.5
    let model_point = |fraction: f64, angle: f64| {
        let radius = fraction * geometry.radius;
        Vector3::new(
            radius * angle.cos(),
            0.5 - fraction * geometry.height,
            radius * angle.sin(),
        )
    };

    let to_world = |model: Vector3<f64>| {
        let p = beam.model_to_world(model);
        [p.x as f32, p.y as f32, p.z as f32]
    };

    let mut strips = Vec::new();

    for &fraction in &RING_FRACTIONS {
        let ring: Vec<[f32; 3]> = (0..=RING_SEGMENTS)
            .map(|i| {
                let angle = i as f64 / RING_SEGMENTS as f64 * TAU;
                to_world(model_point(fraction, angle))
            })
            .collect();
        strips.push(ring);
    }

    for i in 0..4 {
        let angle = i as f64 / 4.0 * TAU;
        strips.push(vec![
            to_world(model_point(0.0, angle)),
            to_world(model_point(1.0, angle)),
        ]);
    }

    strips
}
