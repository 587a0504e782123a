//! Surface probe result structures.
//!
//! These structures hold the results of the raycasts the backend performs
//! against the collidable surface set: one long-range downward cast for
//! grounding and tunneling recovery, and two short forward casts for the
//! blocked-step check.

use bevy::prelude::*;

/// Information about a surface raycast hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// World position of the hit point.
    pub point: Vec3,
    /// Normal of the surface at the hit point.
    pub normal: Vec3,
    /// Entity that was hit (if the backend tracks one).
    pub entity: Option<Entity>,
}

impl SurfaceHit {
    /// Create a hit result.
    pub fn new(distance: f32, point: Vec3, normal: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            point,
            normal,
            entity,
        }
    }
}

/// Per-tick probe results for one character, populated by the active
/// [`SurfaceProbeBackend`](crate::backend::SurfaceProbeBackend).
///
/// The ground cast runs in `FixedUpdate` before vertical physics; the forward
/// casts run in `Update` before locomotion. Consumers only read; the backend
/// is the single writer.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct SurfaceProbes {
    /// Downward cast from above the character's head. Covers grounding,
    /// high-speed landing, and the below-surface safety net in one query.
    #[reflect(ignore)]
    pub ground: Option<SurfaceHit>,
    /// Forward cast at toe height along the intended travel direction.
    /// `None` when there is no move intent this tick.
    #[reflect(ignore)]
    pub forward_low: Option<SurfaceHit>,
    /// Forward cast at maximum step height along the intended travel
    /// direction. A hit here means the obstacle is too tall to step over.
    #[reflect(ignore)]
    pub forward_high: Option<SurfaceHit>,
}

impl SurfaceProbes {
    /// Height of the probed surface under the character, if any.
    #[inline]
    pub fn surface_height(&self) -> Option<f32> {
        self.ground.map(|hit| hit.point.y)
    }

    /// Clear the forward casts (no move intent this tick).
    pub fn clear_forward(&mut self) {
        self.forward_low = None;
        self.forward_high = None;
    }
}

/// Marker for geometry that participates in collision.
///
/// The world-loading collaborator tags collidable surfaces with this when the
/// surface set is built and leaves it off cosmetic decals (ground clutter
/// must not ground the character). Backends only report hits on tagged
/// entities. The set is immutable per session; retagging is only needed if
/// world geometry changes.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct CollidableSurface;
