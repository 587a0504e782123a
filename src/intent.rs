//! Movement intent components.
//!
//! Intents are a per-tick snapshot of what the player (or an AI driver) wants
//! the character to do. An external input collaborator writes them every
//! frame; the controller systems only read them. The crate never touches raw
//! device events.

use bevy::prelude::*;

/// Desired travel direction along the heading.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveIntent {
    /// No surface travel requested.
    #[default]
    None,
    /// Travel along the heading.
    Forward,
    /// Travel against the heading.
    Backward,
}

impl MoveIntent {
    /// Signed travel direction: +1 forward, -1 backward, 0 none.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            MoveIntent::None => 0.0,
            MoveIntent::Forward => 1.0,
            MoveIntent::Backward => -1.0,
        }
    }

    /// Whether any travel is requested.
    #[inline]
    pub fn is_active(self) -> bool {
        self != MoveIntent::None
    }
}

/// Desired turn direction.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnIntent {
    /// No turning requested.
    #[default]
    None,
    /// Turn left (counter-clockwise, increasing heading).
    Left,
    /// Turn right (clockwise, decreasing heading).
    Right,
}

impl TurnIntent {
    /// Signed heading change direction: +1 left, -1 right, 0 none.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            TurnIntent::None => 0.0,
            TurnIntent::Left => 1.0,
            TurnIntent::Right => -1.0,
        }
    }
}

/// Per-tick input intent for one character.
///
/// # Example
///
/// ```rust
/// use planetwalk_controller::prelude::*;
///
/// let mut intent = LocomotionIntent::default();
/// intent.set_move(true, false);
/// intent.set_turn(false, true);
/// intent.sprint = true;
/// assert_eq!(intent.move_intent, MoveIntent::Forward);
/// assert_eq!(intent.turn_intent, TurnIntent::Right);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct LocomotionIntent {
    /// Requested surface travel.
    pub move_intent: MoveIntent,
    /// Requested turning.
    pub turn_intent: TurnIntent,
    /// Whether sprint is held. Has no effect unless a move intent is active.
    pub sprint: bool,
    /// Whether the jump action is currently held. The controller detects the
    /// rising edge and turns it into a jump-charge request.
    pub jump_pressed: bool,
    /// Previous fixed tick's `jump_pressed`, for edge detection. Managed by
    /// the controller.
    pub(crate) jump_pressed_prev: bool,
}

impl LocomotionIntent {
    /// Create an empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the move intent from forward/backward key state. Forward wins
    /// when both are held.
    pub fn set_move(&mut self, forward: bool, backward: bool) {
        self.move_intent = if forward {
            MoveIntent::Forward
        } else if backward {
            MoveIntent::Backward
        } else {
            MoveIntent::None
        };
    }

    /// Set the turn intent from left/right key state. Left wins when both
    /// are held.
    pub fn set_turn(&mut self, left: bool, right: bool) {
        self.turn_intent = if left {
            TurnIntent::Left
        } else if right {
            TurnIntent::Right
        } else {
            TurnIntent::None
        };
    }

    /// Set the jump state. Pass the current held state every frame; the
    /// controller handles edge detection and charge timing.
    pub fn set_jump_pressed(&mut self, pressed: bool) {
        self.jump_pressed = pressed;
    }

    /// Whether a jump was requested this fixed tick (rising edge).
    #[inline]
    pub(crate) fn jump_requested(&self) -> bool {
        self.jump_pressed && !self.jump_pressed_prev
    }

    /// Latch the current jump state for the next tick's edge detection.
    pub(crate) fn latch_jump(&mut self) {
        self.jump_pressed_prev = self.jump_pressed;
    }

    /// Clear all intents.
    pub fn clear(&mut self) {
        self.move_intent = MoveIntent::None;
        self.turn_intent = TurnIntent::None;
        self.sprint = false;
        self.jump_pressed = false;
    }
}
