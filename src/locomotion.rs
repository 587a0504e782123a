//! Surface locomotion.
//!
//! Converts move/turn intent into heading changes and incremental planet
//! rotation. Runs once per rendered frame on the variable frame delta
//! (clamped); vertical motion is handled separately at a fixed timestep in
//! [`vertical`](crate::vertical).

use bevy::prelude::*;

use crate::camera::{CameraMode, CameraModeState};
use crate::config::MovementConfig;
use crate::intent::LocomotionIntent;
use crate::orientation::{surface_rotation_axis, PlanetOrientation};
use crate::probe::SurfaceProbes;

/// Speed envelope state for one character.
///
/// `current_speed` is always within `[0, effective_max]`: it accelerates
/// toward the sprint-adjusted maximum while a move intent is active and
/// decays toward zero otherwise. The asymmetry (separate accel/decel rates)
/// is deliberate game feel, not an artifact.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct LocomotionState {
    /// Current surface speed (radians/second of planet rotation).
    pub current_speed: f32,
}

impl LocomotionState {
    /// Advance the speed envelope by one frame.
    ///
    /// Accelerates toward the effective maximum while moving; decelerates
    /// toward exactly zero otherwise. Sprint raises both the target and the
    /// acceleration, but only while a move intent is active.
    pub fn advance_speed(
        &mut self,
        moving: bool,
        sprinting: bool,
        config: &MovementConfig,
        dt: f32,
    ) {
        if moving {
            let target = config.effective_max_speed(sprinting);
            let accel = config.effective_acceleration(sprinting);
            self.current_speed = (self.current_speed + accel * dt).clamp(0.0, target);
        } else {
            self.current_speed = (self.current_speed - config.deceleration * dt).max(0.0);
        }
    }
}

/// Whether the forward probes report an obstruction that should suppress
/// this tick's planet rotation.
///
/// Blocked when the toe-height cast hits inside the minimum clearance, or
/// when an obstacle ahead extends above the maximum step height (both casts
/// hit). A toe-only hit beyond the clearance is a walkable lip. Binary
/// policy: a blocked step is dropped for this tick and re-evaluated fresh
/// next tick; there is no partial sliding.
pub(crate) fn forward_blocked(probes: &SurfaceProbes, config: &MovementConfig) -> bool {
    match probes.forward_low {
        None => false,
        Some(low) if low.distance < config.forward_clearance => true,
        Some(_) => probes.forward_high.is_some(),
    }
}

/// Apply turn intent to the heading.
///
/// Turning in place needs no collision check. Runs before the backend's
/// forward probes so they cast along the fresh heading.
pub fn apply_turn_input(
    time: Res<Time>,
    mut q_characters: Query<(&MovementConfig, &LocomotionIntent, &mut PlanetOrientation)>,
) {
    for (config, intent, mut orientation) in &mut q_characters {
        let dt = time.delta_secs().min(config.max_frame_delta);
        let sign = intent.turn_intent.sign();
        if sign != 0.0 {
            orientation.adjust_heading(config.turn_speed * sign * dt);
        }
    }
}

/// Advance the speed envelope and rotate the planet under the character.
///
/// The rotation axis is perpendicular to both "up" and the heading-implied
/// forward direction; its magnitude is `sign * current_speed * dt`. The
/// rotation is skipped entirely when the camera is detached (the orbit
/// camera owns the planet rotation then), when the forward probes report a
/// block, or when the axis is degenerate.
pub fn apply_planet_rotation(
    time: Res<Time>,
    camera_mode: Res<CameraModeState>,
    mut q_characters: Query<(
        &MovementConfig,
        &LocomotionIntent,
        &SurfaceProbes,
        &mut LocomotionState,
        &mut PlanetOrientation,
    )>,
) {
    for (config, intent, probes, mut state, mut orientation) in &mut q_characters {
        let dt = time.delta_secs().min(config.max_frame_delta);
        let moving = intent.move_intent.is_active();

        // The envelope advances every frame; sprint without movement still
        // decays. A blocked step drops the rotation but not the speed.
        state.advance_speed(moving, intent.sprint, config, dt);

        if !moving || state.current_speed <= 0.0 {
            continue;
        }
        if camera_mode.0 == CameraMode::Detached {
            continue;
        }
        if forward_blocked(probes, config) {
            continue;
        }

        let Some(axis) = surface_rotation_axis(orientation.forward(), Vec3::Y) else {
            continue;
        };
        let angle = intent.move_intent.sign() * state.current_speed * dt;
        orientation.rotate_planet(Quat::from_axis_angle(axis, angle));
    }
}
