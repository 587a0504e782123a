//! Surface probe backend abstraction.
//!
//! This module defines the trait a collision backend must implement to work
//! with the controller. The controller itself never performs geometric
//! queries; it consumes per-tick probe results from
//! [`SurfaceProbes`](crate::probe::SurfaceProbes), which the backend's own
//! sensor systems populate. This keeps the core independent of any physics
//! engine and lets tests substitute a deterministic world.

use bevy::prelude::*;

/// Trait for surface probe backend implementations.
///
/// A backend supplies a plugin whose systems fill in
/// [`SurfaceProbes`](crate::probe::SurfaceProbes) for every character:
///
/// - the downward ground cast in `FixedUpdate`, in
///   [`PlanetWalkSet::Probes`](crate::PlanetWalkSet::Probes), before vertical
///   physics;
/// - the forward blocked-step casts in `Update`, in the same set, after the
///   turn input is applied and before locomotion.
///
/// Backends must only report hits on entities tagged
/// [`CollidableSurface`](crate::probe::CollidableSurface); cosmetic
/// decoration is excluded by construction. The nearest hit along each ray
/// wins.
///
/// For an example implementation see the `rapier` module's
/// `Rapier3dBackend` (feature `rapier3d`), or the flat-world backend in the
/// integration tests.
pub trait SurfaceProbeBackend: 'static + Send + Sync {
    /// Returns the plugin that registers this backend's probe systems.
    fn plugin() -> impl Plugin;
}

/// Backend that never reports a surface.
///
/// Every probe stays `None`: the character free-falls and nothing blocks
/// movement. Useful as a placeholder while wiring a world up and as a
/// fixture for free-fall behavior in tests.
pub struct NoProbeBackend;

impl SurfaceProbeBackend for NoProbeBackend {
    fn plugin() -> impl Plugin {
        NoProbePlugin
    }
}

/// Empty plugin for [`NoProbeBackend`]; probes keep their default `None`s.
pub struct NoProbePlugin;

impl Plugin for NoProbePlugin {
    fn build(&self, _app: &mut App) {}
}
