//! Camera rig.
//!
//! One camera entity carries a [`CameraRig`] plus a
//! [`CameraConfig`](crate::config::CameraConfig) and operates in one of two
//! modes:
//!
//! - **Follow** (default): third-person chase position derived from the
//!   character's heading and height, with a speed-scaled follow distance and
//!   procedural walk sway.
//! - **Detached**: free orbit around the planet. The character is hidden and
//!   frozen, pointer drags rotate the planet itself, and leaving the mode
//!   restores the exact pre-detach pose.
//!
//! Mode switching is transactional: entering detached snapshots the planet
//! orientation and character height, and exiting restores them bit-exactly,
//! discarding everything the orbit did.

use bevy::prelude::*;

use crate::config::{CameraConfig, MovementConfig, SpawnPoint};
use crate::intent::LocomotionIntent;
use crate::locomotion::LocomotionState;
use crate::orientation::{OrientationSnapshot, PlanetOrientation};
use crate::systems::CharacterVisual;
use crate::vertical::VerticalState;

/// Which camera mode is active.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Third-person follow behind the character.
    #[default]
    Follow,
    /// Free orbit around the planet; the character is hidden and frozen.
    Detached,
}

/// Resource holding the active camera mode.
///
/// Locomotion and vertical physics read this to freeze the character while
/// the orbit camera owns the planet rotation.
#[derive(Resource, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Resource)]
pub struct CameraModeState(pub CameraMode);

/// Toggle between follow and detached orbit mode.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ToggleDetachedCamera;

/// Pointer drag while orbiting, in pixels.
#[derive(Event, Debug, Clone, Copy)]
pub struct OrbitDrag {
    /// Pointer movement since the last event, in pixels.
    pub delta: Vec2,
}

/// Scroll input while orbiting, in scroll units.
#[derive(Event, Debug, Clone, Copy)]
pub struct OrbitZoom {
    /// Scroll amount; positive zooms out.
    pub delta: f32,
}

/// Pose saved on entering detached mode, restored exactly on exit.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct DetachedSnapshot {
    /// Planet rotation and heading at the moment of detaching.
    pub orientation: OrientationSnapshot,
    /// Character height at the moment of detaching.
    pub height: f32,
}

/// Runtime state of the camera rig. Lives on the camera entity next to its
/// [`CameraConfig`](crate::config::CameraConfig).
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct CameraRig {
    /// Current follow distance, lerped toward the mode-dependent target.
    pub distance: f32,
    /// Sway oscillator phase (radians).
    pub sway_phase: f32,
    /// Current sway offset (camera-right, world-up).
    pub sway_offset: Vec2,
    /// Orbit rotation applied to the planet while detached.
    pub orbit_rotation: Quat,
    /// Orbit camera distance from the planet center.
    pub zoom: f32,
    /// Whether the pointer is held down. Set by the external input
    /// collaborator; drags only rotate while this is true.
    pub drag_held: bool,
    /// Saved pose while detached; `None` in follow mode.
    pub saved: Option<DetachedSnapshot>,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            distance: 0.0,
            sway_phase: 0.0,
            sway_offset: Vec2::ZERO,
            orbit_rotation: Quat::IDENTITY,
            zoom: 0.0,
            drag_held: false,
            saved: None,
        }
    }
}

impl CameraRig {
    /// Create a rig already settled at the idle follow distance.
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            distance: config.idle_distance,
            zoom: config.initial_zoom,
            ..Default::default()
        }
    }

    /// Exponentially approach the target follow distance. Never overshoots
    /// for lerp factors in `(0, 1]`.
    pub fn approach_distance(&mut self, target: f32, factor: f32) {
        self.distance += (target - self.distance) * factor;
    }

    /// Advance the sway oscillator. `speed_ratio` is current speed over the
    /// effective maximum, so sway fades in with the speed envelope. The
    /// vertical axis runs at double frequency (two footfalls per stride).
    pub fn advance_sway(&mut self, config: &CameraConfig, speed_ratio: f32, dt: f32) {
        self.sway_phase += config.sway_speed * dt;
        let amplitude = config.sway_intensity * speed_ratio;
        self.sway_offset = Vec2::new(
            self.sway_phase.sin() * config.sway_axis_weights.x,
            (self.sway_phase * 2.0).sin() * config.sway_axis_weights.y,
        ) * amplitude;
    }

    /// Decay the sway offset toward zero while idle, so the camera settles
    /// instead of snapping.
    pub fn decay_sway(&mut self, config: &CameraConfig) {
        self.sway_offset *= config.sway_decay;
    }

    /// Apply one pointer drag to the orbit rotation.
    pub fn apply_drag(&mut self, config: &CameraConfig, delta: Vec2) {
        let yaw = Quat::from_rotation_y(-delta.x * config.orbit_sensitivity);
        let pitch = Quat::from_rotation_x(-delta.y * config.orbit_sensitivity);
        self.orbit_rotation = (yaw * pitch * self.orbit_rotation).normalize();
    }

    /// Apply one scroll step to the orbit zoom, clamped to the configured
    /// bounds.
    pub fn apply_zoom(&mut self, config: &CameraConfig, delta: f32) {
        self.zoom = (self.zoom + delta * config.zoom_speed).clamp(config.zoom_min, config.zoom_max);
    }

    /// Orbit camera position for the current zoom and the configured tilt.
    pub fn orbit_position(&self, config: &CameraConfig) -> Vec3 {
        Vec3::new(
            0.0,
            self.zoom * config.orbit_tilt.sin(),
            self.zoom * config.orbit_tilt.cos(),
        )
    }
}

/// Toggle between follow and detached orbit mode.
///
/// Entering detached saves the planet orientation and character height on the
/// rig, seeds the orbit from the current planet rotation, and hides the
/// character. Exiting restores the saved pose exactly and re-shows the
/// character; the orbit rotation is discarded.
pub fn handle_detached_toggle(
    mut toggles: EventReader<ToggleDetachedCamera>,
    mut camera_mode: ResMut<CameraModeState>,
    mut q_rigs: Query<(&CameraConfig, &mut CameraRig)>,
    mut q_characters: Query<(&mut PlanetOrientation, &mut VerticalState)>,
    mut q_visuals: Query<&mut Visibility, With<CharacterVisual>>,
) {
    for _ in toggles.read() {
        let Ok((config, mut rig)) = q_rigs.single_mut() else {
            return;
        };
        let Ok((mut orientation, mut vertical)) = q_characters.single_mut() else {
            return;
        };

        match camera_mode.0 {
            CameraMode::Follow => {
                rig.saved = Some(DetachedSnapshot {
                    orientation: orientation.snapshot(),
                    height: vertical.height,
                });
                rig.orbit_rotation = orientation.rotation();
                rig.zoom = config.initial_zoom;
                rig.drag_held = false;
                camera_mode.0 = CameraMode::Detached;

                for mut visibility in &mut q_visuals {
                    *visibility = Visibility::Hidden;
                }
            }
            CameraMode::Detached => {
                if let Some(saved) = rig.saved.take() {
                    orientation.restore(&saved.orientation);
                    vertical.height = saved.height;
                    vertical.velocity = 0.0;
                }
                rig.drag_held = false;
                camera_mode.0 = CameraMode::Follow;

                for mut visibility in &mut q_visuals {
                    *visibility = Visibility::Inherited;
                }
            }
        }
    }
}

/// Consume orbit drag and zoom events.
///
/// Both are ignored outside detached mode, and drags additionally require
/// the pointer to be held; events arriving at the wrong time are drained so
/// they cannot replay later.
pub fn handle_orbit_input(
    camera_mode: Res<CameraModeState>,
    mut drags: EventReader<OrbitDrag>,
    mut zooms: EventReader<OrbitZoom>,
    mut q_rigs: Query<(&CameraConfig, &mut CameraRig)>,
) {
    if camera_mode.0 != CameraMode::Detached {
        drags.clear();
        zooms.clear();
        return;
    }
    let Ok((config, mut rig)) = q_rigs.single_mut() else {
        return;
    };

    for drag in drags.read() {
        if rig.drag_held {
            rig.apply_drag(config, drag.delta);
        }
    }
    for zoom in zooms.read() {
        rig.apply_zoom(config, zoom.delta);
    }
}

/// Position the camera for the active mode.
///
/// Follow mode chases a point behind and above the character, lerping the
/// follow distance toward the idle/walk/sprint target and adding the sway
/// offset. Detached mode writes the orbit rotation into the planet
/// orientation and parks the camera on its fixed tilted orbit, looking at
/// the planet center.
pub fn update_camera_rig(
    time: Res<Time>,
    camera_mode: Res<CameraModeState>,
    mut q_cameras: Query<(&CameraConfig, &mut CameraRig, &mut Transform)>,
    mut q_characters: Query<
        (
            &MovementConfig,
            &SpawnPoint,
            &LocomotionIntent,
            &LocomotionState,
            &VerticalState,
            &mut PlanetOrientation,
        ),
        Without<CameraRig>,
    >,
) {
    let Ok((config, mut rig, mut transform)) = q_cameras.single_mut() else {
        return;
    };
    let Ok((movement, spawn, intent, locomotion, vertical, mut orientation)) =
        q_characters.single_mut()
    else {
        return;
    };

    match camera_mode.0 {
        CameraMode::Follow => {
            let dt = time.delta_secs().min(movement.max_frame_delta);
            let moving = intent.move_intent.is_active();

            rig.approach_distance(
                config.target_distance(moving, intent.sprint),
                config.distance_lerp,
            );

            let speed_ratio =
                locomotion.current_speed / movement.effective_max_speed(intent.sprint);
            if moving && speed_ratio > 0.0 {
                rig.advance_sway(config, speed_ratio, dt);
            } else {
                rig.decay_sway(config);
            }

            let anchor = spawn.anchor_at(vertical.height);
            let heading_rotation = orientation.heading_rotation();
            let right = heading_rotation * Vec3::X;

            let position = anchor
                + heading_rotation * Vec3::new(0.0, config.rig_height, rig.distance)
                + right * rig.sway_offset.x
                + Vec3::Y * rig.sway_offset.y;
            let look_target = anchor
                + Vec3::Y * config.look_height
                + heading_rotation * Vec3::new(0.0, 0.0, -config.look_ahead);

            transform.translation = position;
            transform.look_at(look_target, Vec3::Y);
        }
        CameraMode::Detached => {
            orientation.set_rotation(rig.orbit_rotation);
            transform.translation = rig.orbit_position(config);
            transform.look_at(Vec3::ZERO, Vec3::Y);
        }
    }
}
