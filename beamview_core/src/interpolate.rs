//! Piecewise-linear interpolation over the sample sequence.
//!
//! Maps an arbitrary playback time to a source position by scanning for
//! the bracketing sample pair and lerping between its endpoints. Pure:
//! identical `(trajectory, t)` inputs always produce identical output.

use nalgebra::Vector3;

use crate::trajectory::Trajectory;

/// Result of resolving a playback time against the trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedSample {
    /// Interpolated source position
    pub position: Vector3<f64>,

    /// Index of the earlier member of the bracketing sample pair
    pub frame: usize,

    /// Timestamps bracketing the playback time
    pub bracket: (f64, f64),
}

/// Resolves playback time `t` to an interpolated position.
///
/// The caller clamps `t` to `[0, duration)`; this function never wraps.
/// Times at or past the final sample hold that sample exactly, with no
/// extrapolation. A degenerate bracket (duplicate timestamps) collapses
/// to its earlier sample.
pub fn resolve(trajectory: &Trajectory, t: f64) -> InterpolatedSample {
    let times = trajectory.times();
    let positions = trajectory.positions();
    let last = times.len() - 1;

    let mut frame = 0;
    if t >= times[last] {
        frame = last;
    } else {
        for i in 0..last {
            if t >= times[i] && t < times[i + 1] {
                frame = i;
                break;
            }
        }
    }

    let next = (frame + 1).min(last);
    let (t0, t1) = (times[frame], times[next]);
    let alpha = if t1 > t0 {
        ((t - t0) / (t1 - t0)).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let p0 = positions[frame];
    let p1 = positions[next];

    InterpolatedSample {
        position: p0 + (p1 - p0) * alpha,
        frame,
        bracket: (t0, t1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn elbow_trajectory() -> Trajectory {
        Trajectory::from_parts(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
            vec![0.0, 1.0, 2.0],
            vec![],
            0.26,
            2.0,
        )
        .unwrap()
    }

    #[test]
    fn test_elbow_scenario() {
        let trajectory = elbow_trajectory();

        let mid = resolve(&trajectory, 0.5);
        assert_relative_eq!(mid.position, Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(mid.frame, 0);
        assert_eq!(mid.bracket, (0.0, 1.0));

        let late = resolve(&trajectory, 1.5);
        assert_relative_eq!(late.position, Vector3::new(1.0, 0.5, 0.0));
        assert_eq!(late.frame, 1);

        let end = resolve(&trajectory, 2.0);
        assert_relative_eq!(end.position, Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(end.frame, 2);
    }

    #[test]
    fn test_boundary_hold() {
        let trajectory = elbow_trajectory();

        // At and past the final sample the last position is held exactly
        for t in [2.0, 2.5, 100.0] {
            let sample = resolve(&trajectory, t);
            assert_eq!(sample.position, Vector3::new(1.0, 1.0, 0.0));
            assert_eq!(sample.frame, 2);
        }
    }

    #[test]
    fn test_before_first_sample() {
        // times[0] > 0: the first sample is held for earlier times
        let trajectory = Trajectory::from_parts(
            vec![[3.0, 0.0, 0.0], [4.0, 0.0, 0.0]],
            vec![1.0, 2.0],
            vec![],
            0.26,
            2.0,
        )
        .unwrap();

        let sample = resolve(&trajectory, 0.5);
        assert_relative_eq!(sample.position, Vector3::new(3.0, 0.0, 0.0));
        assert_eq!(sample.frame, 0);
    }

    #[test]
    fn test_duplicate_timestamps_collapse() {
        let trajectory = Trajectory::from_parts(
            vec![[0.0, 0.0, 0.0], [5.0, 5.0, 5.0], [9.0, 9.0, 9.0]],
            vec![0.0, 1.0, 1.0],
            vec![],
            0.26,
            2.0,
        )
        .unwrap();

        // Degenerate bracket: alpha forced to 0, earlier sample wins
        let sample = resolve(&trajectory, 1.0);
        assert_relative_eq!(sample.position, Vector3::new(5.0, 5.0, 5.0));
        assert_eq!(sample.frame, 1);
    }

    #[test]
    fn test_single_sample_is_constant() {
        let trajectory =
            Trajectory::from_parts(vec![[0.3, 0.2, 0.1]], vec![0.0], vec![], 0.26, 5.0).unwrap();

        for t in [0.0, 1.0, 4.9] {
            let sample = resolve(&trajectory, t);
            assert_eq!(sample.position, Vector3::new(0.3, 0.2, 0.1));
            assert_eq!(sample.frame, 0);
        }
    }

    #[test]
    fn test_continuity_across_bracket_boundary() {
        let trajectory = elbow_trajectory();
        let eps = 1e-9;

        let before = resolve(&trajectory, 1.0 - eps);
        let at = resolve(&trajectory, 1.0);
        assert_relative_eq!(before.position, at.position, epsilon = 1e-6);
    }

    fn arb_trajectory() -> impl Strategy<Value = Trajectory> {
        (2usize..12)
            .prop_flat_map(|n| {
                (
                    proptest::collection::vec(0.0f64..10.0, n),
                    proptest::collection::vec(
                        (-5.0f64..5.0, -5.0f64..5.0, -5.0f64..5.0),
                        n,
                    ),
                )
            })
            .prop_map(|(mut times, coords)| {
                times.sort_by(|a, b| a.partial_cmp(b).unwrap());
                let positions = coords.into_iter().map(|(x, y, z)| [x, y, z]).collect();
                Trajectory::from_parts(positions, times, vec![], 0.26, 12.0).unwrap()
            })
    }

    proptest! {
        #[test]
        fn prop_resolve_is_idempotent(trajectory in arb_trajectory(), t in 0.0f64..12.0) {
            let a = resolve(&trajectory, t);
            let b = resolve(&trajectory, t);
            // Bit-identical, not merely approximately equal
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_boundary_hold(trajectory in arb_trajectory(), past in 0.0f64..5.0) {
            let last = trajectory.sample_count() - 1;
            let t = trajectory.times()[last] + past;
            let sample = resolve(&trajectory, t);
            prop_assert_eq!(sample.position, trajectory.positions()[last]);
            prop_assert_eq!(sample.frame, last);
        }
    }
}
