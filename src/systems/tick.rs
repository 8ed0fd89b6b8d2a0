//! One simulation step.
//!
//! [`simulation_tick`] is what the external loop calls once per frame. It
//! runs the core systems in a fixed order against the world:
//!
//! 1. [`update_world_time`] records the elapsed milliseconds
//! 2. [`gamepad_controller`] turns the left stick into headings
//! 3. [`movement_system`] integrates and steers every mobile entity
//! 4. [`state_machine_system`] evaluates transitions
//! 5. queued [`PendingRemovals`] are despawned
//!
//! Removals are deferred to the end so nothing despawns while a guard or a
//! position observer may still be looking at it.

use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::pendingremovals::PendingRemovals;
use crate::resources::spatialindex::SpatialIndex;
use crate::systems::gamepadcontroller::gamepad_controller;
use crate::systems::movement::movement_system;
use crate::systems::statemachine::state_machine_system;
use crate::systems::time::update_world_time;

/// Advance the world by one tick of `elapsed_ms` milliseconds.
pub fn simulation_tick(world: &mut World, elapsed_ms: f32) {
    update_world_time(world, elapsed_ms);
    gamepad_controller(world);
    movement_system(world);
    state_machine_system(world);
    apply_pending_removals(world);
}

/// Despawn every entity queued in [`PendingRemovals`].
///
/// Returns how many entities were actually despawned; entities that were
/// already gone are skipped.
pub fn apply_pending_removals(world: &mut World) -> usize {
    let Some(mut pending) = world.get_resource_mut::<PendingRemovals>() else {
        return 0;
    };
    if pending.is_empty() {
        return 0;
    }
    let entities: Vec<Entity> = pending.drain().collect();

    let mut removed = 0;
    for entity in entities {
        if let Some(mut index) = world.get_resource_mut::<SpatialIndex>() {
            index.remove(entity);
        }
        if let Ok(entity_mut) = world.get_entity_mut(entity) {
            entity_mut.despawn();
            debug!("Despawned {entity}");
            removed += 1;
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::pendingremovals::request_removal;
    use crate::resources::worldtime::WorldTime;

    #[test]
    fn test_removal_waits_for_end_of_tick() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let e = world.spawn_empty().id();

        request_removal(&mut world, e);
        assert!(world.get_entity(e).is_ok());

        simulation_tick(&mut world, 16.0);
        assert!(world.get_entity(e).is_err());
        assert!(world.resource::<PendingRemovals>().is_empty());
    }

    #[test]
    fn test_removing_twice_is_harmless() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        request_removal(&mut world, e);
        request_removal(&mut world, e);
        assert_eq!(apply_pending_removals(&mut world), 1);
        request_removal(&mut world, e);
        assert_eq!(apply_pending_removals(&mut world), 0);
    }
}
