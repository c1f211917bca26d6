//! Trajectory store - the immutable, loaded-once dataset.
//!
//! A trajectory pairs an ordered sequence of time-stamped 3D source
//! positions with the static scene metadata around it: the microphone
//! array geometry, the beam half-angle, and the loop period. The raw
//! document shape is [`TrajectoryDocument`]; [`Trajectory::from_document`]
//! validates it once at the load boundary, and nothing mutates the result
//! afterwards.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::error::TrajectoryError;

/// Beam half-angle (radians) used when the document omits the field or
/// stores zero.
pub const DEFAULT_BEAM_HALF_ANGLE: f64 = 0.26;

/// Raw on-disk trajectory document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryDocument {
    /// Time-stamped source path
    pub trajectory: SampledPath,

    /// Fixed microphone positions (reference geometry, order irrelevant)
    pub mic_positions: Vec<[f64; 3]>,

    /// Beam half-angle in radians; absent or zero selects the default
    #[serde(default)]
    pub beam_width_rad: f64,

    /// Loop period in seconds (not necessarily the last sample time)
    pub duration: f64,
}

/// Parallel positions/times arrays of the sampled source path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampledPath {
    pub positions: Vec<[f64; 3]>,
    pub times: Vec<f64>,
}

/// Validated, immutable trajectory.
#[derive(Debug, Clone)]
pub struct Trajectory {
    positions: Vec<Vector3<f64>>,
    times: Vec<f64>,
    mic_positions: Vec<Vector3<f64>>,
    beam_half_angle: f64,
    duration: f64,
}

impl Trajectory {
    /// Validates a raw document into a trajectory.
    pub fn from_document(doc: TrajectoryDocument) -> Result<Self, TrajectoryError> {
        Self::from_parts(
            doc.trajectory.positions,
            doc.trajectory.times,
            doc.mic_positions,
            doc.beam_width_rad,
            doc.duration,
        )
    }

    /// Builds a trajectory from its raw parts.
    ///
    /// Rejects empty sample sets, mismatched array lengths, backwards
    /// timestamps, and non-positive durations. A zero `beam_half_angle`
    /// is replaced by [`DEFAULT_BEAM_HALF_ANGLE`].
    pub fn from_parts(
        positions: Vec<[f64; 3]>,
        times: Vec<f64>,
        mic_positions: Vec<[f64; 3]>,
        beam_half_angle: f64,
        duration: f64,
    ) -> Result<Self, TrajectoryError> {
        if positions.is_empty() && times.is_empty() {
            return Err(TrajectoryError::Empty);
        }
        if positions.len() != times.len() {
            return Err(TrajectoryError::LengthMismatch {
                positions: positions.len(),
                times: times.len(),
            });
        }
        for i in 1..times.len() {
            if times[i] < times[i - 1] {
                return Err(TrajectoryError::NonMonotonicTimes { index: i });
            }
        }
        if duration <= 0.0 {
            return Err(TrajectoryError::NonPositiveDuration { duration });
        }

        let beam_half_angle = if beam_half_angle == 0.0 {
            DEFAULT_BEAM_HALF_ANGLE
        } else {
            beam_half_angle
        };

        Ok(Self {
            positions: positions.into_iter().map(Vector3::from).collect(),
            times,
            mic_positions: mic_positions.into_iter().map(Vector3::from).collect(),
            beam_half_angle,
            duration,
        })
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, TrajectoryError> {
        let doc: TrajectoryDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Reads, parses, and validates a JSON document.
    pub fn from_reader(reader: impl Read) -> Result<Self, TrajectoryError> {
        let doc: TrajectoryDocument = serde_json::from_reader(reader)?;
        Self::from_document(doc)
    }

    /// Ordered source positions, parallel to [`times`](Self::times).
    pub fn positions(&self) -> &[Vector3<f64>] {
        &self.positions
    }

    /// Non-decreasing sample timestamps in seconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Fixed microphone positions.
    pub fn mic_positions(&self) -> &[Vector3<f64>] {
        &self.mic_positions
    }

    /// Beam half-angle in radians, always positive.
    pub fn beam_half_angle(&self) -> f64 {
        self.beam_half_angle
    }

    /// Loop period in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Number of samples (equal for positions and times).
    pub fn sample_count(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn doc_json() -> &'static str {
        r#"{
            "trajectory": {
                "positions": [[0.0, 0.0, 0.1], [0.2, 0.0, 0.1], [0.2, 0.2, 0.1]],
                "times": [0.0, 1.0, 2.0]
            },
            "mic_positions": [[0.05, 0.0, 0.0], [-0.05, 0.0, 0.0]],
            "beam_width_rad": 0.3,
            "duration": 4.0
        }"#
    }

    #[test]
    fn test_parse_document() {
        let trajectory = Trajectory::from_json_str(doc_json()).unwrap();

        assert_eq!(trajectory.sample_count(), 3);
        assert_eq!(trajectory.mic_positions().len(), 2);
        assert_relative_eq!(trajectory.beam_half_angle(), 0.3);
        assert_relative_eq!(trajectory.duration(), 4.0);
        assert_relative_eq!(trajectory.positions()[1].x, 0.2);
    }

    #[test]
    fn test_default_beam_half_angle() {
        let json = r#"{
            "trajectory": { "positions": [[0.0, 0.0, 0.0]], "times": [0.0] },
            "mic_positions": [],
            "duration": 1.0
        }"#;
        let trajectory = Trajectory::from_json_str(json).unwrap();
        assert_relative_eq!(trajectory.beam_half_angle(), DEFAULT_BEAM_HALF_ANGLE);

        // An explicit zero also selects the default
        let trajectory =
            Trajectory::from_parts(vec![[0.0; 3]], vec![0.0], vec![], 0.0, 1.0).unwrap();
        assert_relative_eq!(trajectory.beam_half_angle(), DEFAULT_BEAM_HALF_ANGLE);
    }

    #[test]
    fn test_reject_empty() {
        let err = Trajectory::from_parts(vec![], vec![], vec![], 0.26, 1.0).unwrap_err();
        assert!(matches!(err, TrajectoryError::Empty));
    }

    #[test]
    fn test_reject_length_mismatch() {
        let err = Trajectory::from_parts(vec![[0.0; 3], [1.0; 3]], vec![0.0], vec![], 0.26, 1.0)
            .unwrap_err();
        assert!(matches!(
            err,
            TrajectoryError::LengthMismatch { positions: 2, times: 1 }
        ));
    }

    #[test]
    fn test_reject_backwards_times() {
        let err = Trajectory::from_parts(
            vec![[0.0; 3], [1.0; 3], [2.0; 3]],
            vec![0.0, 2.0, 1.0],
            vec![],
            0.26,
            4.0,
        )
        .unwrap_err();
        assert!(matches!(err, TrajectoryError::NonMonotonicTimes { index: 2 }));
    }

    #[test]
    fn test_duplicate_times_allowed() {
        // Non-decreasing, not strictly increasing: duplicates are valid
        let trajectory = Trajectory::from_parts(
            vec![[0.0; 3], [1.0; 3], [2.0; 3]],
            vec![0.0, 1.0, 1.0],
            vec![],
            0.26,
            4.0,
        );
        assert!(trajectory.is_ok());
    }

    #[test]
    fn test_reject_non_positive_duration() {
        let err =
            Trajectory::from_parts(vec![[0.0; 3]], vec![0.0], vec![], 0.26, 0.0).unwrap_err();
        assert!(matches!(err, TrajectoryError::NonPositiveDuration { .. }));
    }

    #[test]
    fn test_reject_malformed_json() {
        let err = Trajectory::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TrajectoryError::Parse(_)));
    }
}
