use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Facing angle in degrees, counter-clockwise from the +X axis.
#[derive(Component, Clone, Debug, Copy, Default)]
pub struct Rotation {
    pub degrees: f32,
}

impl Rotation {
    /// Facing that points along `direction`. A zero vector yields `None`.
    pub fn facing(direction: Vec2) -> Option<Self> {
        if direction == Vec2::ZERO {
            return None;
        }
        Some(Self {
            degrees: direction.y.atan2(direction.x).to_degrees(),
        })
    }
}
