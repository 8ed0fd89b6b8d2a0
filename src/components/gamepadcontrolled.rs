//! Gamepad-driven steering.
//!
//! Entities with [`GamepadControlled`] and a straight-line
//! [`MovementController`](super::movementcontroller::MovementController)
//! have their heading set from the left stick every tick by
//! [`gamepad_controller`](crate::systems::gamepadcontroller::gamepad_controller).
//! When the stick rests inside the dead zone the D-pad is used instead.

use bevy_ecs::prelude::Component;

pub const DEFAULT_DEADZONE: f32 = 0.2;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct GamepadControlled {
    /// Stick deflection below this magnitude counts as centred.
    pub deadzone: f32,
}

impl Default for GamepadControlled {
    fn default() -> Self {
        Self {
            deadzone: DEFAULT_DEADZONE,
        }
    }
}

impl GamepadControlled {
    pub fn with_deadzone(deadzone: f32) -> Self {
        Self {
            deadzone: deadzone.clamp(0.0, 1.0),
        }
    }
}
