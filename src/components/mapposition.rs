//! World-space position of an entity.
//!
//! `MapPosition` is the generic position storage shared by mobile and static
//! entities. During simulation only
//! [`set_location`](crate::systems::location::set_location) writes it for
//! mobile entities.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }

    pub fn from_vec(pos: Vec2) -> Self {
        Self { pos }
    }

    /// True if `other` lies strictly closer than `tolerance` to this position.
    pub fn is_within(&self, other: Vec2, tolerance: f32) -> bool {
        self.pos.distance(other) < tolerance
    }
}
