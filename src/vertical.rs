//! Vertical physics.
//!
//! Gravity, grounding, and the chargeable jump, independent of planet
//! rotation. Runs at a fixed timestep (Bevy's `FixedUpdate` accumulator) so
//! collision tolerances and gravity integration are deterministic regardless
//! of frame rate.

use bevy::prelude::*;

use crate::camera::{CameraMode, CameraModeState};
use crate::config::MovementConfig;
use crate::intent::LocomotionIntent;
use crate::probe::SurfaceProbes;
use crate::systems::ReturnToSpawn;

/// Vertical motion state for one character.
///
/// Owned exclusively by the vertical physics system; the camera rig and
/// locomotion read it through its accessors and never mutate it.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct VerticalState {
    /// Height of the character's feet (world Y).
    pub height: f32,
    /// Signed vertical velocity, up positive.
    pub velocity: f32,
    /// Whether vertical motion is currently resolved against a supporting
    /// surface.
    pub grounded: bool,
    /// Whether a jump is charging (wind-up telegraph before launch).
    pub jump_charging: bool,
    /// Time accumulated since the jump request while charging.
    pub charge_elapsed: f32,
}

impl Default for VerticalState {
    fn default() -> Self {
        Self {
            height: 0.0,
            velocity: 0.0,
            grounded: false,
            jump_charging: false,
            charge_elapsed: 0.0,
        }
    }
}

impl VerticalState {
    /// Create a state starting at the given height, airborne.
    pub fn at_height(height: f32) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }

    /// Reset to a spawn height: stationary, airborne, charge cleared. The
    /// next fixed tick re-grounds against the probed surface.
    pub fn reset_to(&mut self, height: f32) {
        self.height = height;
        self.velocity = 0.0;
        self.grounded = false;
        self.jump_charging = false;
        self.charge_elapsed = 0.0;
    }

    /// Advance vertical physics by one fixed tick.
    ///
    /// `surface_height` is the probed surface below (and possibly above, if
    /// the character has tunneled) the character, from the backend's
    /// long-range downward cast. Every branch here is ordinary physics
    /// resolution; none is a fault.
    pub fn step(
        &mut self,
        config: &MovementConfig,
        surface_height: Option<f32>,
        jump_requested: bool,
        dt: f32,
    ) {
        // Jump charge. A request is accepted only while grounded and not
        // already charging; the impulse lands after the charge delay so an
        // animation wind-up can play between input and launch. Leaving the
        // ground mid-charge cancels the charge.
        if jump_requested && self.grounded && !self.jump_charging {
            self.jump_charging = true;
            self.charge_elapsed = 0.0;
        }
        if self.jump_charging {
            if !self.grounded {
                self.jump_charging = false;
                self.charge_elapsed = 0.0;
            } else {
                self.charge_elapsed += dt;
                if self.charge_elapsed >= config.jump_charge_delay {
                    self.velocity = config.jump_impulse;
                    self.grounded = false;
                    self.jump_charging = false;
                    self.charge_elapsed = 0.0;
                }
            }
        }

        self.velocity -= config.gravity * dt;
        let delta = self.velocity * dt;
        let tentative = self.height + delta;

        if delta < 0.0 {
            match surface_height {
                Some(surface) => {
                    let rest = surface + config.ground_snap_offset;
                    let distance_to_ground = self.height - surface;
                    let tolerance = config.ground_tolerance(self.velocity);

                    // Snap when inside the (velocity-widened) tolerance or
                    // when this step would carry the feet through the
                    // surface.
                    if distance_to_ground <= tolerance || tentative <= rest {
                        self.height = rest;
                        self.velocity = 0.0;
                        self.grounded = true;
                    } else {
                        self.height = tentative;
                        self.grounded = false;
                    }
                }
                // Nothing below: legitimate free-fall, not a fault.
                None => {
                    self.height = tentative;
                    self.grounded = false;
                }
            }
        } else if delta > 0.0 {
            // Ascending is unconditional; there is no ceiling collision.
            self.height = tentative;
            self.grounded = false;
        }

        // Safety net: restore the above-surface invariant if accumulated
        // error ever leaves the character under the detected surface.
        if let Some(surface) = surface_height {
            if self.height < surface {
                self.height = surface + config.ground_snap_offset;
                self.velocity = 0.0;
                self.grounded = true;
            }
        }
    }
}

/// Fixed-tick vertical physics for all characters.
///
/// Consumes the jump edge from the intent, steps the state machine against
/// the backend's ground probe, and requests a spawn restore if the character
/// has fallen below the configured hard floor. Skipped entirely while the
/// camera is detached; the character is frozen until the saved pose is
/// restored.
pub fn update_vertical_physics(
    time: Res<Time<Fixed>>,
    camera_mode: Res<CameraModeState>,
    mut respawns: EventWriter<ReturnToSpawn>,
    mut q_characters: Query<(
        &MovementConfig,
        &LocomotionIntent,
        &SurfaceProbes,
        &mut VerticalState,
    )>,
) {
    if camera_mode.0 == CameraMode::Detached {
        return;
    }
    let dt = time.delta_secs();
    for (config, intent, probes, mut state) in &mut q_characters {
        state.step(config, probes.surface_height(), intent.jump_requested(), dt);

        if let Some(floor) = config.respawn_below {
            if state.height < floor {
                respawns.write(ReturnToSpawn);
            }
        }
    }
}

/// Latch jump inputs for next tick's edge detection. Runs in
/// `FixedPostUpdate`, after all consumers of the current edge.
pub fn latch_jump_inputs(mut q_intents: Query<&mut LocomotionIntent>) {
    for mut intent in &mut q_intents {
        intent.latch_jump();
    }
}
