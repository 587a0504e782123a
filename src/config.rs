//! Controller configuration components.
//!
//! All tuning for locomotion, vertical physics, probing, and the camera rig
//! lives here as read-only component data. No system mutates these at
//! runtime; they are set once when the character and camera are spawned.

use bevy::prelude::*;

/// Tuning parameters for locomotion and vertical physics.
///
/// Speeds are angular (radians/second of planet rotation) because surface
/// travel is expressed as rotation of the planet, not translation of the
/// character. Heights and distances are world units.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct MovementConfig {
    // === Speed envelope ===
    /// Maximum walking speed (radians/second of planet rotation).
    pub max_speed: f32,
    /// Acceleration toward the target speed (radians/second^2).
    pub acceleration: f32,
    /// Deceleration toward zero when there is no move intent.
    pub deceleration: f32,
    /// Turn rate (radians/second of heading change).
    pub turn_speed: f32,
    /// Multiplier on `max_speed` while sprinting.
    pub sprint_multiplier: f32,
    /// Multiplier on `acceleration` while sprinting.
    pub sprint_accel_multiplier: f32,

    // === Vertical physics ===
    /// Gravity (world units/second^2, applied downward).
    pub gravity: f32,
    /// Upward velocity applied when a charged jump launches.
    pub jump_impulse: f32,
    /// Delay between a jump request and the impulse, for the animation
    /// wind-up telegraph.
    pub jump_charge_delay: f32,
    /// Base distance within which a descending character snaps to the
    /// detected surface.
    pub ground_tolerance_base: f32,
    /// Extra snap tolerance per unit of fall speed. Widens the window at
    /// high fall speed so thin geometry is not tunneled through at low
    /// physics framerates.
    pub ground_tolerance_velocity_scale: f32,
    /// Resting offset above the surface after a snap.
    pub ground_snap_offset: f32,

    // === Probe geometry ===
    /// How far above the character's height the downward ground cast starts.
    /// Casting from above lets the same query detect a surface the character
    /// has tunneled below.
    pub ground_probe_lift: f32,
    /// Downward cast range below the character's height.
    pub ground_probe_range: f32,
    /// Forward cast range for the blocked-step check.
    pub forward_probe_range: f32,
    /// Minimum clearance to an obstacle ahead; closer hits block movement.
    pub forward_clearance: f32,
    /// Height of the low forward cast above the feet.
    pub toe_height: f32,
    /// Obstacles taller than this block movement; lower lips are walked over.
    pub max_step_height: f32,

    // === Timestep hygiene ===
    /// Frame deltas are clamped to this before use, so a stall cannot
    /// produce one enormous tunneling step.
    pub max_frame_delta: f32,
    /// Hard floor for an unbounded fall: dropping below this height triggers
    /// the return-to-spawn restore. `None` reproduces an unbounded fall.
    pub respawn_below: Option<f32>,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            // Speed envelope
            max_speed: 0.6,
            acceleration: 1.2,
            deceleration: 1.8,
            turn_speed: 2.5,
            sprint_multiplier: 1.8,
            sprint_accel_multiplier: 2.0,

            // Vertical physics
            gravity: 20.0,
            jump_impulse: 9.0,
            jump_charge_delay: 0.25,
            ground_tolerance_base: 0.05,
            ground_tolerance_velocity_scale: 0.01,
            ground_snap_offset: 0.05,

            // Probe geometry
            ground_probe_lift: 2.0,
            ground_probe_range: 50.0,
            forward_probe_range: 0.2,
            forward_clearance: 0.12,
            toe_height: 0.03,
            max_step_height: 0.15,

            // Timestep hygiene
            max_frame_delta: 0.1,
            respawn_below: Some(-50.0),
        }
    }
}

impl MovementConfig {
    /// Effective maximum speed for the current sprint state.
    #[inline]
    pub fn effective_max_speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.max_speed * self.sprint_multiplier
        } else {
            self.max_speed
        }
    }

    /// Effective acceleration for the current sprint state.
    #[inline]
    pub fn effective_acceleration(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.acceleration * self.sprint_accel_multiplier
        } else {
            self.acceleration
        }
    }

    /// Snap tolerance for a given (signed) vertical velocity.
    #[inline]
    pub fn ground_tolerance(&self, vertical_velocity: f32) -> f32 {
        self.ground_tolerance_base + vertical_velocity.abs() * self.ground_tolerance_velocity_scale
    }

    /// Builder: set the maximum walking speed.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Builder: set acceleration and deceleration.
    pub fn with_accel(mut self, acceleration: f32, deceleration: f32) -> Self {
        self.acceleration = acceleration;
        self.deceleration = deceleration;
        self
    }

    /// Builder: set the turn rate.
    pub fn with_turn_speed(mut self, turn_speed: f32) -> Self {
        self.turn_speed = turn_speed;
        self
    }

    /// Builder: set the sprint speed and acceleration multipliers.
    pub fn with_sprint(mut self, speed_multiplier: f32, accel_multiplier: f32) -> Self {
        self.sprint_multiplier = speed_multiplier;
        self.sprint_accel_multiplier = accel_multiplier;
        self
    }

    /// Builder: set gravity.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: set the jump impulse and charge delay.
    pub fn with_jump(mut self, impulse: f32, charge_delay: f32) -> Self {
        self.jump_impulse = impulse;
        self.jump_charge_delay = charge_delay;
        self
    }

    /// Builder: set the ground snap tolerance terms.
    pub fn with_ground_tolerance(mut self, base: f32, velocity_scale: f32) -> Self {
        self.ground_tolerance_base = base;
        self.ground_tolerance_velocity_scale = velocity_scale;
        self
    }

    /// Builder: set the hard respawn floor (`None` = unbounded fall).
    pub fn with_respawn_below(mut self, height: Option<f32>) -> Self {
        self.respawn_below = height;
        self
    }
}

/// Tuning parameters for the camera rig.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct CameraConfig {
    // === Follow distances ===
    /// Follow distance while idle.
    pub idle_distance: f32,
    /// Follow distance while walking.
    pub walk_distance: f32,
    /// Follow distance while sprinting.
    pub sprint_distance: f32,
    /// Exponential lerp factor per frame toward the target distance.
    pub distance_lerp: f32,
    /// Height of the rig above the character anchor.
    pub rig_height: f32,
    /// Look-at target offset ahead of the anchor (along heading).
    pub look_ahead: f32,
    /// Look-at target offset above the anchor.
    pub look_height: f32,

    // === Procedural sway ===
    /// Base sway amplitude (world units at full speed).
    pub sway_intensity: f32,
    /// Sway phase speed (radians/second).
    pub sway_speed: f32,
    /// Per-axis amplitude weights (horizontal, vertical).
    pub sway_axis_weights: Vec2,
    /// Multiplicative decay per frame applied to the sway offset while not
    /// moving, so it settles instead of snapping.
    pub sway_decay: f32,

    // === Detached orbit ===
    /// Radians of orbit rotation per pixel of pointer drag.
    pub orbit_sensitivity: f32,
    /// Minimum orbit zoom distance.
    pub zoom_min: f32,
    /// Maximum orbit zoom distance.
    pub zoom_max: f32,
    /// Zoom distance change per scroll unit.
    pub zoom_speed: f32,
    /// Fixed tilt of the orbit camera above the horizontal (radians).
    pub orbit_tilt: f32,
    /// Initial orbit zoom distance on entering detached mode.
    pub initial_zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            // Follow distances
            idle_distance: 3.0,
            walk_distance: 4.0,
            sprint_distance: 5.5,
            distance_lerp: 0.08,
            rig_height: 1.6,
            look_ahead: 1.0,
            look_height: 1.0,

            // Procedural sway
            sway_intensity: 0.12,
            sway_speed: 6.0,
            sway_axis_weights: Vec2::new(1.0, 0.6),
            sway_decay: 0.85,

            // Detached orbit
            orbit_sensitivity: 0.005,
            zoom_min: 8.0,
            zoom_max: 40.0,
            zoom_speed: 0.02,
            orbit_tilt: 0.5,
            initial_zoom: 25.0,
        }
    }
}

impl CameraConfig {
    /// Target follow distance for the current movement state.
    #[inline]
    pub fn target_distance(&self, moving: bool, sprinting: bool) -> f32 {
        if moving && sprinting {
            self.sprint_distance
        } else if moving {
            self.walk_distance
        } else {
            self.idle_distance
        }
    }

    /// Builder: set the idle/walk/sprint follow distances.
    pub fn with_distances(mut self, idle: f32, walk: f32, sprint: f32) -> Self {
        self.idle_distance = idle;
        self.walk_distance = walk;
        self.sprint_distance = sprint;
        self
    }

    /// Builder: set the distance lerp factor.
    pub fn with_distance_lerp(mut self, factor: f32) -> Self {
        self.distance_lerp = factor;
        self
    }

    /// Builder: set the sway amplitude and phase speed.
    pub fn with_sway(mut self, intensity: f32, speed: f32) -> Self {
        self.sway_intensity = intensity;
        self.sway_speed = speed;
        self
    }

    /// Builder: set the orbit zoom bounds.
    pub fn with_zoom_bounds(mut self, min: f32, max: f32) -> Self {
        self.zoom_min = min;
        self.zoom_max = max;
        self
    }

    /// Builder: set the orbit tilt angle.
    pub fn with_orbit_tilt(mut self, tilt: f32) -> Self {
        self.orbit_tilt = tilt;
        self
    }
}

/// Spawn state threaded in from world loading.
///
/// World loading returns the spawn rotation (aligning the designated spawn
/// point with the character's fixed world position), heading, and height;
/// they are stored here explicitly so the return-to-spawn restore does not
/// depend on ambient state.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct SpawnPoint {
    /// Planet rotation aligning the spawn point with the character position.
    pub rotation: Quat,
    /// Spawn heading in radians.
    pub heading: f32,
    /// Spawn height of the character's feet.
    pub height: f32,
    /// Fixed world position of the character on the horizontal plane
    /// (the Y component is replaced by the live height each frame).
    pub anchor: Vec3,
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            heading: 0.0,
            height: 0.0,
            anchor: Vec3::ZERO,
        }
    }
}

impl SpawnPoint {
    /// Create a spawn point from world-load results.
    pub fn new(rotation: Quat, heading: f32, height: f32, anchor: Vec3) -> Self {
        Self {
            rotation: rotation.normalize(),
            heading,
            height,
            anchor,
        }
    }

    /// Character anchor position at a given height.
    #[inline]
    pub fn anchor_at(&self, height: f32) -> Vec3 {
        Vec3::new(self.anchor.x, height, self.anchor.z)
    }
}
