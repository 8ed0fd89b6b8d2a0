//! Movement controller strategies.
//!
//! Every mobile entity carries exactly one [`MovementController`]. The
//! [`movement_system`](crate::systems::movement::movement_system) reads it
//! each tick together with the entity's
//! [`MobileEntity`](super::mobile::MobileEntity) to produce the next
//! position.
//!
//! - [`MovementController::Straight`] – moves along a fixed heading
//! - [`MovementController::Seek`] – steers toward the move destination and
//!   clears it on arrival
//! - [`MovementController::Accelerating`] – ramps velocity toward a target
//!   using acceleration/deceleration, then applies a [`Steering`]

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Steering applied after velocity ramping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Steering {
    Straight { heading: Vec2 },
    Seek,
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub enum MovementController {
    /// Integrate along `heading`; destination is ignored. A zero heading
    /// keeps the entity still.
    Straight { heading: Vec2 },
    /// Move toward the entity's move destination.
    Seek,
    /// Ramp velocity toward `target_velocity`, then steer.
    Accelerating {
        target_velocity: f32,
        steering: Steering,
    },
}

impl Default for MovementController {
    fn default() -> Self {
        MovementController::Seek
    }
}

impl MovementController {
    pub fn straight(heading: Vec2) -> Self {
        MovementController::Straight { heading }
    }

    pub fn accelerating(target_velocity: f32, steering: Steering) -> Self {
        MovementController::Accelerating {
            target_velocity,
            steering,
        }
    }

    /// The steering this controller applies once velocity is settled.
    pub fn steering(&self) -> Steering {
        match *self {
            MovementController::Straight { heading } => Steering::Straight { heading },
            MovementController::Seek => Steering::Seek,
            MovementController::Accelerating { steering, .. } => steering,
        }
    }

    /// Replace the heading of a straight-line steering. No-op for seeking.
    pub fn set_heading(&mut self, new_heading: Vec2) {
        match self {
            MovementController::Straight { heading } => *heading = new_heading,
            MovementController::Accelerating {
                steering: Steering::Straight { heading },
                ..
            } => *heading = new_heading,
            _ => {}
        }
    }
}

/// Step `velocity` toward `target` over `seconds`.
///
/// Ramps up by `acceleration` and down by `deceleration` units per second
/// and never passes the target. A rate of 0 (or less) jumps straight to the
/// target.
pub fn ramp_velocity(
    velocity: f32,
    target: f32,
    acceleration: i32,
    deceleration: i32,
    seconds: f32,
) -> f32 {
    let target = target.max(0.0);
    if velocity < target {
        if acceleration <= 0 {
            return target;
        }
        (velocity + acceleration as f32 * seconds).min(target)
    } else if velocity > target {
        if deceleration <= 0 {
            return target;
        }
        (velocity - deceleration as f32 * seconds).max(target)
    } else {
        velocity
    }
}
