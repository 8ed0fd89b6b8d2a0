//! Gamepad-to-heading controller.
//!
//! Reads the shared [`GamepadState`] and points the straight-line steering
//! of every [`GamepadControlled`] entity along the left stick. Inside the
//! dead zone the D-pad takes over; with neither in use the heading becomes
//! zero and the entity holds still. Diagonals are normalized so speed stays
//! constant.
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::gamepadcontrolled::GamepadControlled;
use crate::components::movementcontroller::MovementController;
use crate::components::paused::Paused;
use crate::resources::gamepad::GamepadState;

/// Heading requested by `pad` for a controller with the given dead zone.
pub fn gamepad_heading(pad: &GamepadState, deadzone: f32) -> Vec2 {
    let stick = pad.left_stick();
    let raw = if stick.length() > deadzone {
        stick
    } else {
        pad.dpad()
    };
    raw.normalize_or_zero()
}

/// Update each controlled entity's heading from gamepad input.
pub fn gamepad_controller(world: &mut World) {
    let Some(pad) = world.get_resource::<GamepadState>().cloned() else {
        return;
    };

    let mut query = world.query_filtered::<(&GamepadControlled, &mut MovementController), Without<Paused>>();
    for (controlled, mut controller) in query.iter_mut(world) {
        controller.set_heading(gamepad_heading(&pad, controlled.deadzone));
    }
}
