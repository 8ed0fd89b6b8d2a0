//! The position write path.
//!
//! [`set_location`] is the single place that moves a mobile entity during
//! simulation. It centralises the rules every controller must respect:
//!
//! 1. a `None` or non-finite target is ignored
//! 2. a target closer than the configured tolerance to the current
//!    position is ignored (no write, no notification)
//! 3. otherwise the position is written, the facing is updated when the
//!    entity turns on move, and [`PositionChangedEvent`] is triggered
//!    before the function returns
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::mapposition::MapPosition;
use crate::components::mobile::MobileEntity;
use crate::components::rotation::Rotation;
use crate::events::position::PositionChangedEvent;
use crate::resources::simconfig::{DEFAULT_POSITION_TOLERANCE, SimConfig};

/// Tolerance below which position writes are suppressed.
pub fn position_tolerance(world: &World) -> f32 {
    world
        .get_resource::<SimConfig>()
        .map(|c| c.position_tolerance)
        .unwrap_or(DEFAULT_POSITION_TOLERANCE)
}

/// Move `entity` to `target`. Returns true if the position changed.
pub fn set_location(world: &mut World, entity: Entity, target: Option<Vec2>) -> bool {
    let Some(target) = target.filter(|t| t.is_finite()) else {
        return false;
    };
    let tolerance = position_tolerance(world);

    let previous = {
        let Some(mut position) = world.get_mut::<MapPosition>(entity) else {
            return false;
        };
        if position.is_within(target, tolerance) {
            return false;
        }
        let previous = position.pos;
        position.pos = target;
        previous
    };

    let turns = world
        .get::<MobileEntity>(entity)
        .is_some_and(|m| m.turn_on_move());
    if turns {
        if let Some(facing) = Rotation::facing(target - previous) {
            if let Some(mut rotation) = world.get_mut::<Rotation>(entity) {
                *rotation = facing;
            }
        }
    }

    world.trigger(PositionChangedEvent {
        entity,
        position: target,
    });
    true
}
