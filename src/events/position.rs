//! Movement notifications.
//!
//! [`set_location`](crate::systems::location::set_location) triggers
//! [`PositionChangedEvent`] synchronously on every non-suppressed position
//! write, before returning to the caller. The seek controller triggers
//! [`ArrivedEvent`] exactly once when an entity reaches its destination.
//!
//! [`observe_position_changed`] keeps the
//! [`SpatialIndex`](crate::resources::spatialindex::SpatialIndex) current and
//! [`observe_position_removed`] drops entries for entities that lose their
//! [`MapPosition`], however they were despawned. [`register_spatial_observers`]
//! installs both.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<ArrivedEvent>| {
//!     log::info!("{:?} reached {:?}", trigger.event().entity, trigger.event().destination);
//! });
//! ```

use bevy_ecs::lifecycle::Remove;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::mapposition::MapPosition;
use crate::resources::spatialindex::SpatialIndex;

/// Fired after an entity's position actually changed.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PositionChangedEvent {
    pub entity: Entity,
    pub position: Vec2,
}

/// Fired on the tick an entity consumes the last of the distance to its
/// destination.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ArrivedEvent {
    pub entity: Entity,
    pub destination: Vec2,
}

/// Global observer feeding position changes into the spatial index.
///
/// Does nothing when no [`SpatialIndex`] resource is installed.
pub fn observe_position_changed(
    trigger: On<PositionChangedEvent>,
    index: Option<ResMut<SpatialIndex>>,
) {
    let event = trigger.event();
    if let Some(mut index) = index {
        index.update(event.entity, event.position);
    }
}

/// Global observer removing entities from the spatial index when their
/// [`MapPosition`] goes away (component removal or despawn).
pub fn observe_position_removed(
    trigger: On<Remove, MapPosition>,
    index: Option<ResMut<SpatialIndex>>,
) {
    if let Some(mut index) = index {
        index.remove(trigger.event().entity);
    }
}

/// Install the observers that keep the spatial index in sync with positions.
pub fn register_spatial_observers(world: &mut World) {
    world.add_observer(observe_position_changed);
    world.add_observer(observe_position_removed);
    world.flush();
}
