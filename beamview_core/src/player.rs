//! Render loop driver.
//!
//! [`Player`] owns all mutable playback state and, once per host tick,
//! turns a wall-clock timestamp into a read-only [`PlayerFrame`] for the
//! rendering collaborator: tick the clock, resolve the interpolated
//! source position, derive the beam transform, push the trail. It never
//! blocks, and a single-sample trajectory still produces a stable
//! constant frame.

use nalgebra::Vector3;

use crate::beam::{BeamGeometry, BeamTransform};
use crate::clock::PlaybackClock;
use crate::interpolate;
use crate::trail::TrailBuffer;
use crate::trajectory::Trajectory;

/// Read-only per-tick output handed to the rendering collaborator.
#[derive(Debug, Clone)]
pub struct PlayerFrame {
    /// Interpolated source position
    pub position: Vector3<f64>,

    /// Current playback time in seconds
    pub time: f64,

    /// Retained beam transform; `None` only until the source first
    /// leaves the degenerate zone around the origin
    pub beam: Option<BeamTransform>,

    /// Whether the beam transform was recomputed this tick; `false` is
    /// the "unchanged" sentinel for the degenerate near-origin case
    pub beam_updated: bool,

    /// Trail positions in push order, oldest first
    pub trail: Vec<Vector3<f64>>,

    /// Index of the current bracketing sample
    pub frame_index: usize,

    /// Total number of trajectory samples
    pub sample_count: usize,

    /// Timestamps bracketing the playback time
    pub bracket: (f64, f64),

    /// Playback progress, `time / duration * 100`
    pub progress_percent: f64,

    /// Formatted "elapsed / total" clock string
    pub clock_display: String,

    pub playing: bool,

    /// Playback looped back to zero on this tick
    pub wrapped: bool,
}

/// Owns the trajectory and all mutable playback state.
pub struct Player {
    trajectory: Trajectory,
    geometry: BeamGeometry,
    clock: PlaybackClock,
    trail: TrailBuffer,
    beam: Option<BeamTransform>,
}

impl Player {
    /// Creates a paused player at time zero.
    pub fn new(trajectory: Trajectory) -> Self {
        let geometry = BeamGeometry::new(trajectory.beam_half_angle());
        let clock = PlaybackClock::new(trajectory.duration());
        Self {
            trajectory,
            geometry,
            clock,
            trail: TrailBuffer::new(),
            beam: None,
        }
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn geometry(&self) -> BeamGeometry {
        self.geometry
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Flips play/pause; returns the new state.
    pub fn toggle_play(&mut self) -> bool {
        self.clock.toggle()
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.clock.set_playing(playing);
    }

    /// Jumps to `ratio * duration` and clears the trail, in either play
    /// state. Returns the new playback time.
    pub fn seek(&mut self, ratio: f64) -> f64 {
        self.trail.clear();
        self.clock.seek(ratio)
    }

    /// Advances playback to the host timestamp `now` and derives the
    /// frame. Wraparound clears the trail before the new point lands.
    pub fn advance(&mut self, now: f64) -> PlayerFrame {
        let report = self.clock.tick(now);
        if report.wrapped {
            self.trail.clear();
        }
        self.derive_frame(report.wrapped)
    }

    /// Derives a frame at the current playback time without advancing
    /// the clock. Used for the initial frame and right after a seek.
    pub fn refresh(&mut self) -> PlayerFrame {
        self.derive_frame(false)
    }

    fn derive_frame(&mut self, wrapped: bool) -> PlayerFrame {
        let sample = interpolate::resolve(&self.trajectory, self.clock.time());

        let beam_updated = match self.geometry.compute(sample.position) {
            Some(transform) => {
                self.beam = Some(transform);
                true
            }
            None => false,
        };

        self.trail.push(sample.position);

        PlayerFrame {
            position: sample.position,
            time: self.clock.time(),
            beam: self.beam.clone(),
            beam_updated,
            trail: self.trail.snapshot(),
            frame_index: sample.frame,
            sample_count: self.trajectory.sample_count(),
            bracket: sample.bracket,
            progress_percent: self.clock.progress_percent(),
            clock_display: format!(
                "{} / {}",
                format_clock(self.clock.time()),
                format_clock(self.trajectory.duration())
            ),
            playing: self.clock.is_playing(),
            wrapped,
        }
    }
}

/// Formats seconds as `minutes:seconds.tenths`, seconds zero-padded to
/// width 4 including the decimal (65.25 becomes `1:05.2`).
pub fn format_clock(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as u64;
    format!("{}:{:04.1}", minutes, seconds % 60.0)
}
