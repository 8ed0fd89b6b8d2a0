//! Per-entity simulation pause marker.
//!
//! Entities carrying [`Paused`] are skipped by the movement and state machine
//! systems. Editor tooling pauses an entity before overwriting its movement
//! fields and resumes it afterwards.

use bevy_ecs::prelude::*;

/// Marker: simulation is suspended for this entity.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Paused;

/// Suspend simulation for `entity`. Returns false if the entity is gone.
pub fn pause_entity(world: &mut World, entity: Entity) -> bool {
    match world.get_entity_mut(entity) {
        Ok(mut e) => {
            e.insert(Paused);
            true
        }
        Err(_) => false,
    }
}

/// Resume simulation for `entity`. Returns false if the entity is gone.
pub fn resume_entity(world: &mut World, entity: Entity) -> bool {
    match world.get_entity_mut(entity) {
        Ok(mut e) => {
            e.remove::<Paused>();
            true
        }
        Err(_) => false,
    }
}

pub fn is_paused(world: &World, entity: Entity) -> bool {
    world.get::<Paused>(entity).is_some()
}
