//! Movement state of a mobile entity.
//!
//! [`MobileEntity`] stores the per-entity movement parameters read by the
//! movement controller every tick. Position itself lives in
//! [`MapPosition`](super::mapposition::MapPosition) and is written through
//! [`set_location`](crate::systems::location::set_location), which enforces
//! the tolerance suppression.
//!
//! Values are seeded from a
//! [`MovementTemplate`](crate::resources::movementtemplates::MovementTemplate)
//! when the entity is spawned.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::resources::movementtemplates::MovementTemplate;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct MobileEntity {
    velocity: f32,
    acceleration: i32,
    deceleration: i32,
    move_destination: Option<Vec2>,
    turn_on_move: bool,
}

impl Default for MobileEntity {
    fn default() -> Self {
        Self::from_template(&MovementTemplate::default())
    }
}

impl MobileEntity {
    pub fn from_template(template: &MovementTemplate) -> Self {
        let mut mobile = Self {
            velocity: 0.0,
            acceleration: template.acceleration,
            deceleration: template.deceleration,
            move_destination: None,
            turn_on_move: template.turn_on_move,
        };
        mobile.set_velocity(template.velocity);
        mobile
    }

    /// Units per second.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Set velocity. Negative and non-finite values clamp to 0.
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = if velocity.is_finite() {
            velocity.max(0.0)
        } else {
            0.0
        };
    }

    pub fn acceleration(&self) -> i32 {
        self.acceleration
    }

    pub fn set_acceleration(&mut self, acceleration: i32) {
        self.acceleration = acceleration;
    }

    pub fn deceleration(&self) -> i32 {
        self.deceleration
    }

    pub fn set_deceleration(&mut self, deceleration: i32) {
        self.deceleration = deceleration;
    }

    pub fn move_destination(&self) -> Option<Vec2> {
        self.move_destination
    }

    /// Set or clear the destination. Non-finite coordinates clear it.
    pub fn set_move_destination(&mut self, destination: Option<Vec2>) {
        self.move_destination = destination.filter(|d| d.is_finite());
    }

    pub fn clear_move_destination(&mut self) -> Option<Vec2> {
        self.move_destination.take()
    }

    pub fn turn_on_move(&self) -> bool {
        self.turn_on_move
    }

    pub fn set_turn_on_move(&mut self, turn: bool) {
        self.turn_on_move = turn;
    }
}
