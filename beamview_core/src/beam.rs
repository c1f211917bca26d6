//! Beam transform derivation.
//!
//! The source emits a directional cone back toward the microphone array
//! at the origin: apex at the array center, base at the source, so the
//! rendered cone length equals the source distance. The cone primitive is
//! a unit-height cone along +Y whose base radius encodes the half-angle;
//! per-frame output is a uniform scale, an orientation quaternion, and
//! the apex-to-source axis line.

use nalgebra::{UnitQuaternion, Vector3};

/// Minimum source distance for a well-defined beam orientation.
pub const MIN_BEAM_DISTANCE: f64 = 0.05;

/// Static cone configuration, derived once from the beam half-angle.
#[derive(Debug, Clone, Copy)]
pub struct BeamGeometry {
    /// Unit cone height, scaled by source distance per frame
    pub height: f64,

    /// Unit cone base radius, `height * tan(half_angle)`
    pub radius: f64,
}

impl BeamGeometry {
    /// Creates the unit cone for the given half-angle in radians.
    pub fn new(half_angle: f64) -> Self {
        let height = 1.0;
        Self {
            height,
            radius: height * half_angle.tan(),
        }
    }

    /// Derives the beam transform for the current source position.
    ///
    /// Returns `None` when the source sits within [`MIN_BEAM_DISTANCE`]
    /// of the array origin; the orientation is ill-defined there and the
    /// caller keeps its previous transform.
    pub fn compute(&self, position: Vector3<f64>) -> Option<BeamTransform> {
        let distance = position.norm();
        if distance < MIN_BEAM_DISTANCE {
            return None;
        }

        let dir = position / distance;

        // Rotate the canonical +Y cone axis onto -dir, putting the apex
        // at the array origin and the base at the source. The exactly
        // antiparallel case has no unique rotation; a half-turn about X
        // serves.
        let rotation = UnitQuaternion::rotation_between(&Vector3::y(), &(-dir))
            .unwrap_or_else(|| {
                UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI)
            });

        Some(BeamTransform {
            scale: distance,
            rotation,
            center: dir * (distance * 0.5),
            origin: Vector3::zeros(),
            target: position,
        })
    }
}

/// Per-frame cone pose plus the origin-to-source axis line.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamTransform {
    /// Uniform scale applied to the unit cone
    pub scale: f64,

    /// Rotation taking the +Y cone axis to the beam direction
    pub rotation: UnitQuaternion<f64>,

    /// Cone center, the midpoint of the apex-to-base axis
    pub center: Vector3<f64>,

    /// Axis line start (array center)
    pub origin: Vector3<f64>,

    /// Axis line end (source position)
    pub target: Vector3<f64>,
}

impl BeamTransform {
    /// Maps a point from unit-cone model space into the world.
    ///
    /// Model space: apex at `(0, 0.5, 0)`, base ring at `y = -0.5`.
    pub fn model_to_world(&self, model: Vector3<f64>) -> Vector3<f64> {
        self.center + self.rotation * (model * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degenerate_guard() {
        let geometry = BeamGeometry::new(0.26);

        // Magnitude ~0.022 < 0.05: no update
        assert!(geometry.compute(Vector3::new(0.01, 0.0, 0.02)).is_none());
        assert!(geometry.compute(Vector3::zeros()).is_none());
    }

    #[test]
    fn test_cone_spans_origin_to_source() {
        let geometry = BeamGeometry::new(0.26);
        let position = Vector3::new(0.3, 0.4, 0.0);
        let beam = geometry.compute(position).unwrap();

        assert_relative_eq!(beam.scale, 0.5);
        assert_relative_eq!(beam.origin, Vector3::zeros());
        assert_relative_eq!(beam.target, position);

        // Apex lands on the array origin, base center on the source
        let apex = beam.model_to_world(Vector3::new(0.0, 0.5, 0.0));
        let base = beam.model_to_world(Vector3::new(0.0, -0.5, 0.0));
        assert_relative_eq!(apex, Vector3::zeros(), epsilon = 1e-12);
        assert_relative_eq!(base, position, epsilon = 1e-12);
    }

    #[test]
    fn test_orientation_maps_up_axis() {
        let geometry = BeamGeometry::new(0.26);
        let position = Vector3::new(0.0, 0.0, 1.0);
        let beam = geometry.compute(position).unwrap();

        let rotated = beam.rotation * Vector3::y();
        assert_relative_eq!(rotated, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_antiparallel_fallback() {
        // Source straight up the +Y axis: -dir is exactly opposite the
        // cone axis, where rotation_between has no unique answer
        let geometry = BeamGeometry::new(0.26);
        let position = Vector3::new(0.0, 2.0, 0.0);
        let beam = geometry.compute(position).unwrap();

        let rotated = beam.rotation * Vector3::y();
        assert_relative_eq!(rotated, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-12);

        let apex = beam.model_to_world(Vector3::new(0.0, 0.5, 0.0));
        assert_relative_eq!(apex, Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_half_angle_sets_base_radius() {
        let geometry = BeamGeometry::new(0.26);
        assert_relative_eq!(geometry.radius, 0.26f64.tan());
        assert_relative_eq!(geometry.height, 1.0);
    }
}
