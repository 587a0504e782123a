//! Rapier-backed surface probes (feature `rapier3d`).
//!
//! Implements [`SurfaceProbeBackend`] with `bevy_rapier3d` raycasts. The app
//! is expected to add `RapierPhysicsPlugin` itself and attach fixed
//! colliders to its world geometry; this module only queries, it never
//! steps the physics world or moves bodies.
//!
//! All casts are restricted to fixed, non-sensor colliders on entities
//! tagged [`CollidableSurface`], so cosmetic decoration never grounds or
//! blocks the character.

use bevy::ecs::entity::EntityHashSet;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::SurfaceProbeBackend;
use crate::config::{MovementConfig, SpawnPoint};
use crate::intent::LocomotionIntent;
use crate::orientation::PlanetOrientation;
use crate::probe::{CollidableSurface, SurfaceHit, SurfaceProbes};
use crate::vertical::VerticalState;
use crate::PlanetWalkSet;

/// Surface probe backend using `bevy_rapier3d` raycasts.
pub struct Rapier3dBackend;

impl SurfaceProbeBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dProbePlugin
    }
}

/// Plugin registering the Rapier probe systems in
/// [`PlanetWalkSet::Probes`] on both schedules.
pub struct Rapier3dProbePlugin;

impl Plugin for Rapier3dProbePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            update_ground_probes.in_set(PlanetWalkSet::Probes),
        )
        .add_systems(Update, update_forward_probes.in_set(PlanetWalkSet::Probes));
    }
}

/// Long-range downward cast for grounding.
///
/// The ray starts above the character's head and extends well below the
/// feet, so a single query covers normal grounding, high-speed landings,
/// and the tunneled-below-surface recovery case.
fn update_ground_probes(
    rapier_context: ReadRapierContext,
    q_collidables: Query<Entity, With<CollidableSurface>>,
    mut q_characters: Query<(
        &MovementConfig,
        &SpawnPoint,
        &VerticalState,
        &mut SurfaceProbes,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };
    let collidables: EntityHashSet = q_collidables.iter().collect();
    let predicate = |entity: Entity| collidables.contains(&entity);
    let filter = QueryFilter::only_fixed()
        .exclude_sensors()
        .predicate(&predicate);

    for (config, spawn, vertical, mut probes) in &mut q_characters {
        let origin = spawn.anchor_at(vertical.height + config.ground_probe_lift);
        let range = config.ground_probe_lift + config.ground_probe_range;

        probes.ground = context
            .cast_ray_and_get_normal(origin, Vec3::NEG_Y, range, true, filter)
            .map(|(entity, hit)| {
                SurfaceHit::new(hit.time_of_impact, hit.point, hit.normal, Some(entity))
            });
    }
}

/// Short forward casts for the blocked-step check.
///
/// Two rays along the intended travel direction: one at toe height, one at
/// the maximum step height. Runs after the turn input so the rays follow
/// the fresh heading; cleared when there is no move intent.
fn update_forward_probes(
    rapier_context: ReadRapierContext,
    q_collidables: Query<Entity, With<CollidableSurface>>,
    mut q_characters: Query<(
        &MovementConfig,
        &SpawnPoint,
        &LocomotionIntent,
        &PlanetOrientation,
        &VerticalState,
        &mut SurfaceProbes,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };
    let collidables: EntityHashSet = q_collidables.iter().collect();
    let predicate = |entity: Entity| collidables.contains(&entity);
    let filter = QueryFilter::only_fixed()
        .exclude_sensors()
        .predicate(&predicate);

    for (config, spawn, intent, orientation, vertical, mut probes) in &mut q_characters {
        if !intent.move_intent.is_active() {
            probes.clear_forward();
            continue;
        }

        let direction = orientation.forward() * intent.move_intent.sign();
        let feet = spawn.anchor_at(vertical.height);

        let cast = |height: f32| {
            context
                .cast_ray_and_get_normal(
                    feet + Vec3::Y * height,
                    direction,
                    config.forward_probe_range,
                    true,
                    filter,
                )
                .map(|(entity, hit)| {
                    SurfaceHit::new(hit.time_of_impact, hit.point, hit.normal, Some(entity))
                })
        };

        probes.forward_low = cast(config.toe_height);
        probes.forward_high = cast(config.max_step_height);
    }
}
