//! Deferred entity removal.
//!
//! Entities must not disappear halfway through a tick: guards and the
//! position notification path may still reference them. Code running inside
//! a tick queues removals here; the tick driver applies them after all
//! systems have run.

use bevy_ecs::prelude::*;

#[derive(Resource, Debug, Default, Clone)]
pub struct PendingRemovals {
    entities: Vec<Entity>,
}

impl PendingRemovals {
    pub fn request(&mut self, entity: Entity) {
        if !self.entities.contains(&entity) {
            self.entities.push(entity);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Entity> {
        self.entities.drain(..)
    }
}

/// Queue `entity` for removal at the end of the current tick.
pub fn request_removal(world: &mut World, entity: Entity) {
    world
        .get_resource_or_insert_with(PendingRemovals::default)
        .request(entity);
}
