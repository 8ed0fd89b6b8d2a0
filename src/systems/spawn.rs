//! Spawning mobile entities.
//!
//! [`spawn_mobile`] resolves the entity type's movement template, seeds the
//! [`MobileEntity`] from it and registers the initial position with the
//! [`SpatialIndex`] when one is installed. Map objects may override the
//! template through their custom properties with
//! [`spawn_mobile_with_properties`].
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::mapposition::MapPosition;
use crate::components::mobile::MobileEntity;
use crate::components::movementcontroller::MovementController;
use crate::components::rotation::Rotation;
use crate::resources::movementtemplates::{MovementTemplate, MovementTemplates};
use crate::resources::spatialindex::SpatialIndex;

fn template_for(world: &World, entity_type: &str) -> MovementTemplate {
    world
        .get_resource::<MovementTemplates>()
        .map(|templates| templates.resolve(entity_type))
        .unwrap_or_default()
}

/// Spawn a mobile entity of `entity_type` at `position`.
pub fn spawn_mobile(
    world: &mut World,
    entity_type: &str,
    position: Vec2,
    controller: MovementController,
) -> Entity {
    let template = template_for(world, entity_type);
    spawn_from_template(world, &template, position, controller)
}

/// Spawn a mobile entity whose template is overridden by map-object
/// custom properties (`velocity`, `acceleration`, `deceleration`,
/// `turnonmove`).
pub fn spawn_mobile_with_properties<'a>(
    world: &mut World,
    entity_type: &str,
    properties: impl IntoIterator<Item = (&'a str, &'a str)>,
    position: Vec2,
    controller: MovementController,
) -> Entity {
    let template = template_for(world, entity_type).with_properties(properties);
    spawn_from_template(world, &template, position, controller)
}

fn spawn_from_template(
    world: &mut World,
    template: &MovementTemplate,
    position: Vec2,
    controller: MovementController,
) -> Entity {
    let entity = world
        .spawn((
            MapPosition::from_vec(position),
            MobileEntity::from_template(template),
            controller,
            Rotation::default(),
        ))
        .id();
    if let Some(mut index) = world.get_resource_mut::<SpatialIndex>() {
        index.update(entity, position);
    }
    debug!("Spawned mobile {entity} at {position}");
    entity
}
