//! State transition event.
//!
//! [`StateChangedEvent`] is triggered whenever an entity's
//! [`StateMachine`](crate::components::statemachine::StateMachine) switches
//! state, after the `on_exit` hook of the old state and before the
//! `on_enter` hook of the new one.
//!
//! # Usage
//!
//! ```ignore
//! world.add_observer(|trigger: On<StateChangedEvent>| {
//!     let event = trigger.event();
//!     println!("{:?}: {} -> {}", event.entity, event.from, event.to);
//! });
//! ```

use bevy_ecs::prelude::*;

use crate::components::statemachine::StateId;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct StateChangedEvent {
    /// The entity that owns the state machine.
    pub entity: Entity,
    pub from: StateId,
    pub to: StateId,
    pub priority: i32,
}
