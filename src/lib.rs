//! # planetwalk_controller
//!
//! A character controller for walking on small spherical worlds, built as a
//! Bevy plugin. The character stays at a fixed world position and the planet
//! rotates underneath it: surface travel is an incremental rotation of the
//! planet about an axis perpendicular to "up" and the character's heading,
//! while height above the surface is simulated as ordinary one-dimensional
//! vertical physics at a fixed timestep.
//!
//! ## Architecture
//!
//! - [`orientation`]: the planet quaternion plus heading angle, the single
//!   source of truth for position-on-sphere and facing.
//! - [`intent`]: per-tick input intents written by an external input
//!   collaborator; the crate never reads raw devices.
//! - [`locomotion`]: speed envelope, turning, and the incremental planet
//!   rotation, gated by the blocked-step probes.
//! - [`vertical`]: gravity, ground snapping, and the chargeable jump, at a
//!   fixed timestep.
//! - [`probe`] / [`backend`]: raycast results and the backend trait that
//!   populates them. A Rapier implementation ships behind the `rapier3d`
//!   feature; tests use a deterministic flat-world backend.
//! - [`camera`]: the follow rig with speed-scaled distance and walk sway,
//!   and the detached orbit mode with its transactional pose snapshot.
//! - [`systems`]: visual transform sync and the return-to-spawn restore.
//!
//! ## Usage
//!
//! ```no_run
//! use bevy::prelude::*;
//! use planetwalk_controller::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(PlanetWalkPlugin::<NoProbeBackend>::default())
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     let spawn = SpawnPoint::new(Quat::IDENTITY, 0.0, 21.0, Vec3::ZERO);
//!     commands.spawn(PlanetCharacterBundle::from_spawn(spawn));
//!     commands.spawn((
//!         Camera3d::default(),
//!         PlanetCameraBundle::new(CameraConfig::default()),
//!     ));
//! }
//! ```
//!
//! Input mapping stays outside the crate: write
//! [`LocomotionIntent`](intent::LocomotionIntent) from whatever devices you
//! support and send the camera events ([`ToggleDetachedCamera`],
//! [`OrbitDrag`], [`OrbitZoom`], [`ReturnToSpawn`]) from your UI layer.
//!
//! [`ToggleDetachedCamera`]: camera::ToggleDetachedCamera
//! [`OrbitDrag`]: camera::OrbitDrag
//! [`OrbitZoom`]: camera::OrbitZoom
//! [`ReturnToSpawn`]: systems::ReturnToSpawn

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod backend;
pub mod camera;
pub mod config;
pub mod intent;
pub mod locomotion;
pub mod orientation;
pub mod probe;
pub mod systems;
pub mod vertical;

#[cfg(feature = "rapier3d")]
pub mod rapier;

use backend::SurfaceProbeBackend;
use camera::{CameraModeState, CameraRig, OrbitDrag, OrbitZoom, ToggleDetachedCamera};
use config::{CameraConfig, MovementConfig, SpawnPoint};
use intent::LocomotionIntent;
use locomotion::LocomotionState;
use orientation::PlanetOrientation;
use probe::{CollidableSurface, SurfaceProbes};
use systems::{CharacterVisual, PlanetVisual, ReturnToSpawn};
use vertical::VerticalState;

/// System sets for the controller pipeline.
///
/// Per rendered frame (`Update`): `Turn` → `Probes` → `Locomotion` →
/// `Camera` → `VisualSync`, chained. Per fixed tick (`FixedUpdate`):
/// `Probes` → `VerticalPhysics`. Backends put their probe systems in
/// `Probes` on both schedules; external input systems should run before
/// `Turn`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanetWalkSet {
    /// Spawn restore and turn input, so probes cast along the fresh heading.
    Turn,
    /// Backend raycasts into [`SurfaceProbes`].
    Probes,
    /// Speed envelope and incremental planet rotation.
    Locomotion,
    /// Camera mode transitions, orbit input, and rig placement.
    Camera,
    /// Copying controller state onto renderable transforms.
    VisualSync,
    /// Fixed-tick gravity, grounding, and jump.
    VerticalPhysics,
}

/// Everything a walkable character needs, wired to one [`SpawnPoint`].
#[derive(Bundle, Default)]
pub struct PlanetCharacterBundle {
    pub orientation: PlanetOrientation,
    pub intent: LocomotionIntent,
    pub locomotion: LocomotionState,
    pub vertical: VerticalState,
    pub probes: SurfaceProbes,
    pub movement: MovementConfig,
    pub spawn: SpawnPoint,
}

impl PlanetCharacterBundle {
    /// Build a character starting at the given spawn pose with default
    /// movement tuning.
    pub fn from_spawn(spawn: SpawnPoint) -> Self {
        Self {
            orientation: PlanetOrientation::new(spawn.rotation, spawn.heading),
            vertical: VerticalState::at_height(spawn.height),
            spawn,
            ..Default::default()
        }
    }

    /// Replace the movement tuning.
    pub fn with_movement(mut self, movement: MovementConfig) -> Self {
        self.movement = movement;
        self
    }
}

/// Camera-side components: config plus a rig settled at the idle distance.
#[derive(Bundle)]
pub struct PlanetCameraBundle {
    pub config: CameraConfig,
    pub rig: CameraRig,
}

impl PlanetCameraBundle {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            rig: CameraRig::new(&config),
            config,
        }
    }
}

/// The controller plugin, generic over the surface probe backend.
///
/// Registers component types, camera events, the system pipeline, and the
/// backend's probe systems. See the crate docs for the schedule layout.
pub struct PlanetWalkPlugin<B: SurfaceProbeBackend> {
    _backend: PhantomData<B>,
}

impl<B: SurfaceProbeBackend> Default for PlanetWalkPlugin<B> {
    fn default() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B: SurfaceProbeBackend> Plugin for PlanetWalkPlugin<B> {
    fn build(&self, app: &mut App) {
        app.register_type::<PlanetOrientation>()
            .register_type::<LocomotionIntent>()
            .register_type::<LocomotionState>()
            .register_type::<VerticalState>()
            .register_type::<SurfaceProbes>()
            .register_type::<CollidableSurface>()
            .register_type::<MovementConfig>()
            .register_type::<CameraConfig>()
            .register_type::<SpawnPoint>()
            .register_type::<CameraRig>()
            .register_type::<CameraModeState>()
            .register_type::<PlanetVisual>()
            .register_type::<CharacterVisual>();

        app.init_resource::<CameraModeState>()
            .add_event::<ToggleDetachedCamera>()
            .add_event::<OrbitDrag>()
            .add_event::<OrbitZoom>()
            .add_event::<ReturnToSpawn>();

        app.configure_sets(
            Update,
            (
                PlanetWalkSet::Turn,
                PlanetWalkSet::Probes,
                PlanetWalkSet::Locomotion,
                PlanetWalkSet::Camera,
                PlanetWalkSet::VisualSync,
            )
                .chain(),
        )
        .configure_sets(
            FixedUpdate,
            (PlanetWalkSet::Probes, PlanetWalkSet::VerticalPhysics).chain(),
        );

        app.add_systems(
            Update,
            (
                (systems::handle_return_to_spawn, locomotion::apply_turn_input)
                    .chain()
                    .in_set(PlanetWalkSet::Turn),
                locomotion::apply_planet_rotation.in_set(PlanetWalkSet::Locomotion),
                (
                    camera::handle_detached_toggle,
                    camera::handle_orbit_input,
                    camera::update_camera_rig,
                )
                    .chain()
                    .in_set(PlanetWalkSet::Camera),
                (systems::sync_planet_visual, systems::sync_character_visual)
                    .in_set(PlanetWalkSet::VisualSync),
            ),
        );

        app.add_systems(
            FixedUpdate,
            vertical::update_vertical_physics.in_set(PlanetWalkSet::VerticalPhysics),
        );
        // Latch after every consumer of this tick's jump edge.
        app.add_systems(FixedPostUpdate, vertical::latch_jump_inputs);

        app.add_plugins(B::plugin());
    }
}

pub mod prelude {
    //! Common imports for crate users.
    pub use crate::backend::{NoProbeBackend, SurfaceProbeBackend};
    pub use crate::camera::{
        CameraMode, CameraModeState, CameraRig, OrbitDrag, OrbitZoom, ToggleDetachedCamera,
    };
    pub use crate::config::{CameraConfig, MovementConfig, SpawnPoint};
    pub use crate::intent::{LocomotionIntent, MoveIntent, TurnIntent};
    pub use crate::locomotion::LocomotionState;
    pub use crate::orientation::{OrientationSnapshot, PlanetOrientation};
    pub use crate::probe::{CollidableSurface, SurfaceHit, SurfaceProbes};
    pub use crate::systems::{CharacterVisual, PlanetVisual, ReturnToSpawn};
    pub use crate::vertical::VerticalState;
    pub use crate::{PlanetCameraBundle, PlanetCharacterBundle, PlanetWalkPlugin, PlanetWalkSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::Rapier3dBackend;
}
