//! Planet orientation state.
//!
//! On a spherical world, "walking" is represented by rotating the planet under
//! a stationary character rather than translating the character across the
//! surface. This module owns that rotation plus the character's heading angle:
//! the single source of truth for "where is the character on the sphere and
//! which way is it facing".

use bevy::prelude::*;

/// Minimum squared length for a usable rotation axis. Cross products below
/// this are treated as degenerate (forward parallel to up) and produce no
/// rotation instead of a NaN quaternion.
const AXIS_EPSILON_SQ: f32 = 1e-10;

/// Orientation state for a character walking on a spherical world.
///
/// `rotation` is the planet's orientation relative to the character's fixed
/// world position at the local "north pole". `heading` selects which tangent
/// direction is "forward" and is stored unwrapped; all call sites consume it
/// through [`Quat::from_rotation_y`], which accepts unwrapped angles.
///
/// The rotation is renormalized after every composition so repeated
/// incremental updates cannot drift off the unit sphere.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct PlanetOrientation {
    /// Planet rotation as a unit quaternion.
    rotation: Quat,
    /// Character heading in radians about world +Y.
    heading: f32,
}

impl Default for PlanetOrientation {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            heading: 0.0,
        }
    }
}

impl PlanetOrientation {
    /// Create an orientation from an initial planet rotation and heading.
    ///
    /// The rotation is normalized; callers may pass any well-formed rotation.
    pub fn new(rotation: Quat, heading: f32) -> Self {
        Self {
            rotation: rotation.normalize(),
            heading,
        }
    }

    /// Get the current planet rotation (always unit length).
    #[inline]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Get the current heading in radians.
    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// The forward direction implied by the heading, on the tangent plane at
    /// the character's position (world -Z rotated about +Y).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        Quat::from_rotation_y(self.heading) * Vec3::NEG_Z
    }

    /// The heading as a rotation about world +Y.
    #[inline]
    pub fn heading_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.heading)
    }

    /// Left-multiply the stored rotation by an incremental rotation and
    /// renormalize.
    ///
    /// No validation beyond renormalization; callers are responsible for
    /// passing well-formed rotations.
    pub fn rotate_planet(&mut self, increment: Quat) {
        self.rotation = (increment * self.rotation).normalize();
    }

    /// Overwrite the planet rotation (used by the detached camera, which
    /// repurposes this rotation as a free-look parameter).
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
    }

    /// Set the heading directly.
    pub fn set_heading(&mut self, heading: f32) {
        self.heading = heading;
    }

    /// Adjust the heading by a delta in radians.
    pub fn adjust_heading(&mut self, delta: f32) {
        self.heading += delta;
    }

    /// Capture the current rotation and heading for a later [`restore`].
    ///
    /// [`restore`]: Self::restore
    pub fn snapshot(&self) -> OrientationSnapshot {
        OrientationSnapshot {
            rotation: self.rotation,
            heading: self.heading,
        }
    }

    /// Restore a previously captured snapshot exactly.
    pub fn restore(&mut self, snapshot: &OrientationSnapshot) {
        self.rotation = snapshot.rotation;
        self.heading = snapshot.heading;
    }

    /// Reset to a stored spawn rotation and heading.
    pub fn reset_to(&mut self, rotation: Quat, heading: f32) {
        self.rotation = rotation.normalize();
        self.heading = heading;
    }
}

/// Saved orientation for the detached-camera enter/exit transaction.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct OrientationSnapshot {
    /// Planet rotation at capture time.
    pub rotation: Quat,
    /// Heading at capture time.
    pub heading: f32,
}

/// Rotation axis for surface travel: perpendicular to both `up` and
/// `forward`, normalized.
///
/// Returns `None` when the inputs are near-parallel and the cross product has
/// no usable direction; callers treat that as "no rotation this tick".
pub fn surface_rotation_axis(forward: Vec3, up: Vec3) -> Option<Vec3> {
    let axis = forward.cross(up);
    if axis.length_squared() < AXIS_EPSILON_SQ {
        None
    } else {
        Some(axis.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-6;

    #[test]
    fn default_is_identity() {
        let orientation = PlanetOrientation::default();
        assert_eq!(orientation.rotation(), Quat::IDENTITY);
        assert_eq!(orientation.heading(), 0.0);
    }

    #[test]
    fn new_normalizes_rotation() {
        let raw = Quat::from_xyzw(0.0, 2.0, 0.0, 2.0);
        let orientation = PlanetOrientation::new(raw, 0.0);
        assert!((orientation.rotation().length() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn rotation_stays_unit_length_under_composition() {
        let mut orientation = PlanetOrientation::default();

        // Many small increments around varying axes accumulate drift unless
        // each composition renormalizes.
        for i in 0..10_000 {
            let axis = Vec3::new(1.0, (i % 7) as f32 * 0.1, (i % 3) as f32 * 0.2).normalize();
            orientation.rotate_planet(Quat::from_axis_angle(axis, 0.013));
            assert!(
                (orientation.rotation().length() - 1.0).abs() < TOLERANCE,
                "rotation drifted off unit length at step {i}"
            );
        }
    }

    #[test]
    fn forward_follows_heading() {
        let mut orientation = PlanetOrientation::default();
        assert!((orientation.forward() - Vec3::NEG_Z).length() < TOLERANCE);

        orientation.set_heading(std::f32::consts::FRAC_PI_2);
        assert!((orientation.forward() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn adjust_heading_accumulates_unwrapped() {
        let mut orientation = PlanetOrientation::default();
        for _ in 0..100 {
            orientation.adjust_heading(0.5);
        }
        // Heading is stored unwrapped; trig call sites handle the wrap.
        assert!((orientation.heading() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn snapshot_restore_round_trip_is_exact() {
        let mut orientation = PlanetOrientation::default();
        orientation.rotate_planet(Quat::from_rotation_x(0.7));
        orientation.set_heading(1.3);

        let saved = orientation.snapshot();

        orientation.rotate_planet(Quat::from_rotation_y(2.0));
        orientation.adjust_heading(-4.0);
        orientation.restore(&saved);

        assert_eq!(orientation.rotation(), saved.rotation);
        assert_eq!(orientation.heading(), saved.heading);
    }

    #[test]
    fn reset_to_spawn_state() {
        let spawn_rotation = Quat::from_rotation_z(0.4);
        let mut orientation = PlanetOrientation::new(spawn_rotation, 0.9);
        orientation.rotate_planet(Quat::from_rotation_x(1.1));
        orientation.adjust_heading(2.2);

        orientation.reset_to(spawn_rotation, 0.9);
        assert!((orientation.rotation() - spawn_rotation.normalize()).length() < TOLERANCE);
        assert_eq!(orientation.heading(), 0.9);
    }

    #[test]
    fn surface_axis_perpendicular_to_inputs() {
        let axis = surface_rotation_axis(Vec3::NEG_Z, Vec3::Y).unwrap();
        assert!((axis - Vec3::X).length() < TOLERANCE);
        assert!(axis.dot(Vec3::NEG_Z).abs() < TOLERANCE);
        assert!(axis.dot(Vec3::Y).abs() < TOLERANCE);
    }

    #[test]
    fn surface_axis_degenerate_when_parallel() {
        assert!(surface_rotation_axis(Vec3::Y, Vec3::Y).is_none());
        assert!(surface_rotation_axis(Vec3::NEG_Y, Vec3::Y).is_none());
        assert!(surface_rotation_axis(Vec3::Y * 1e-8, Vec3::Y).is_none());
    }
}
