//! Visual synchronization and spawn restore.
//!
//! The controller's state lives in its own components; these systems copy it
//! onto the renderable transforms once per frame, after all state updates.
//! The planet entity receives the orientation quaternion, the character
//! entity receives the heading and the live height at its fixed anchor.

use bevy::prelude::*;

use crate::camera::{CameraMode, CameraModeState, CameraRig};
use crate::config::SpawnPoint;
use crate::locomotion::LocomotionState;
use crate::orientation::PlanetOrientation;
use crate::vertical::VerticalState;

/// Marker for the planet's renderable root. Its transform rotation mirrors
/// the planet orientation every frame.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct PlanetVisual;

/// Marker for the character's renderable root. Its transform follows the
/// heading and height at the fixed world anchor, and it is hidden while the
/// camera is detached.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct CharacterVisual;

/// Restore the character to its spawn pose.
///
/// Emitted by an external UI action, or internally when the character falls
/// below the configured hard floor.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ReturnToSpawn;

/// Copy the planet orientation onto the planet's renderable transform.
pub fn sync_planet_visual(
    q_characters: Query<&PlanetOrientation>,
    mut q_planets: Query<&mut Transform, With<PlanetVisual>>,
) {
    let Ok(orientation) = q_characters.single() else {
        return;
    };
    for mut transform in &mut q_planets {
        transform.rotation = orientation.rotation();
    }
}

/// Place the character's renderable at the anchor with the live height and
/// heading.
pub fn sync_character_visual(
    q_characters: Query<(&SpawnPoint, &PlanetOrientation, &VerticalState)>,
    mut q_visuals: Query<&mut Transform, With<CharacterVisual>>,
) {
    let Ok((spawn, orientation, vertical)) = q_characters.single() else {
        return;
    };
    for mut transform in &mut q_visuals {
        transform.translation = spawn.anchor_at(vertical.height);
        transform.rotation = orientation.heading_rotation();
    }
}

/// Restore the spawn pose on a [`ReturnToSpawn`] event.
///
/// Resets the planet orientation, heading, height, and speed envelope to the
/// stored spawn values, forces the camera back to follow mode, and re-shows
/// the character. Multiple events in one frame collapse into a single
/// restore.
pub fn handle_return_to_spawn(
    mut respawns: EventReader<ReturnToSpawn>,
    mut camera_mode: ResMut<CameraModeState>,
    mut q_characters: Query<(
        &SpawnPoint,
        &mut PlanetOrientation,
        &mut VerticalState,
        &mut LocomotionState,
    )>,
    mut q_rigs: Query<&mut CameraRig>,
    mut q_visuals: Query<&mut Visibility, With<CharacterVisual>>,
) {
    if respawns.is_empty() {
        return;
    }
    respawns.clear();

    let Ok((spawn, mut orientation, mut vertical, mut locomotion)) = q_characters.single_mut()
    else {
        return;
    };

    orientation.reset_to(spawn.rotation, spawn.heading);
    vertical.reset_to(spawn.height);
    locomotion.current_speed = 0.0;

    // A restore always lands in follow mode; a pending detached snapshot is
    // discarded because the pose it saved no longer applies.
    camera_mode.0 = CameraMode::Follow;
    if let Ok(mut rig) = q_rigs.single_mut() {
        rig.saved = None;
        rig.drag_held = false;
    }
    for mut visibility in &mut q_visuals {
        *visibility = Visibility::Inherited;
    }
}
