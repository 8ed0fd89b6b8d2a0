//! Movement integration.
//!
//! [`tick_velocity`] converts velocity and the tick's elapsed time into a
//! displacement magnitude; [`movement_system`] runs every entity's
//! [`MovementController`] once per tick and writes the result through
//! [`set_location`].
//!
//! Elapsed time is clamped to the lag window so a stalled frame never
//! teleports an entity across the map.
//!
//! [`advance`] checks [`Paused`] itself, so an entity paused by an observer
//! earlier in the same tick does not move.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::mapposition::MapPosition;
use crate::components::mobile::MobileEntity;
use crate::components::movementcontroller::{MovementController, Steering, ramp_velocity};
use crate::components::paused::{Paused, is_paused};
use crate::events::position::ArrivedEvent;
use crate::resources::simconfig::{DEFAULT_MAX_LAG_MS, SimConfig};
use crate::resources::worldtime::WorldTime;
use crate::systems::location::set_location;

/// Distance an entity with `velocity` (units/s) may travel this tick.
pub fn tick_velocity(elapsed_ms: f32, max_lag_ms: f32, velocity: f32, time_scale: f32) -> f32 {
    elapsed_ms.min(max_lag_ms) * 0.001 * velocity * time_scale
}

/// What a steering step decided for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Stay,
    MoveTo(Vec2),
    Arrive(Vec2),
}

/// Next position for `steering` given this tick's displacement.
///
/// Seeking snaps exactly onto the destination once the remaining distance
/// fits in `displacement`; a zero remaining distance also counts as arrival.
pub fn steer(
    steering: Steering,
    position: Vec2,
    destination: Option<Vec2>,
    displacement: f32,
) -> Step {
    match steering {
        Steering::Straight { heading } => {
            let Some(direction) = heading.try_normalize() else {
                return Step::Stay;
            };
            if displacement <= 0.0 {
                return Step::Stay;
            }
            Step::MoveTo(position + direction * displacement)
        }
        Steering::Seek => {
            let Some(destination) = destination else {
                return Step::Stay;
            };
            let delta = destination - position;
            let remaining = delta.length();
            if remaining <= displacement.max(0.0) {
                return Step::Arrive(destination);
            }
            if displacement <= 0.0 {
                return Step::Stay;
            }
            Step::MoveTo(position + delta / remaining * displacement)
        }
    }
}

/// Advance every active mobile entity by one tick.
///
/// Entities marked [`Paused`] are skipped. Positions are written through
/// [`set_location`], so suppression and notification rules apply.
pub fn movement_system(world: &mut World) {
    let (delta_ms, time_scale) = match world.get_resource::<WorldTime>() {
        Some(wt) => (wt.delta_ms, wt.time_scale),
        None => return,
    };
    let max_lag_ms = world
        .get_resource::<SimConfig>()
        .map(|c| c.max_lag_ms)
        .unwrap_or(DEFAULT_MAX_LAG_MS);

    let mut query = world.query_filtered::<Entity, (
        With<MobileEntity>,
        With<MovementController>,
        With<MapPosition>,
        Without<Paused>,
    )>();
    let entities: Vec<Entity> = query.iter(world).collect();

    for entity in entities {
        advance(world, entity, delta_ms, max_lag_ms, time_scale);
    }
}

/// Run one entity's controller for one tick.
pub fn advance(world: &mut World, entity: Entity, delta_ms: f32, max_lag_ms: f32, time_scale: f32) {
    if is_paused(world, entity) {
        return;
    }
    let Some(controller) = world.get::<MovementController>(entity).copied() else {
        return;
    };
    let Some(position) = world.get::<MapPosition>(entity).map(|p| p.pos) else {
        return;
    };

    let (displacement, destination) = {
        let Some(mut mobile) = world.get_mut::<MobileEntity>(entity) else {
            return;
        };
        if let MovementController::Accelerating {
            target_velocity, ..
        } = controller
        {
            let seconds = tick_velocity(delta_ms, max_lag_ms, 1.0, time_scale);
            let ramped = ramp_velocity(
                mobile.velocity(),
                target_velocity,
                mobile.acceleration(),
                mobile.deceleration(),
                seconds,
            );
            mobile.set_velocity(ramped);
        }
        (
            tick_velocity(delta_ms, max_lag_ms, mobile.velocity(), time_scale),
            mobile.move_destination(),
        )
    };

    match steer(controller.steering(), position, destination, displacement) {
        Step::Stay => {}
        Step::MoveTo(target) => {
            set_location(world, entity, Some(target));
        }
        Step::Arrive(target) => {
            set_location(world, entity, Some(target));
            if let Some(mut mobile) = world.get_mut::<MobileEntity>(entity) {
                mobile.clear_move_destination();
            }
            debug!("{entity} arrived at {target}");
            world.trigger(ArrivedEvent {
                entity,
                destination: target,
            });
        }
    }
}
