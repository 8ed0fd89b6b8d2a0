//! State machine evaluation system.
//!
//! [`state_machine_system`] runs once per tick for every entity with a
//! [`StateMachine`] component that is not [`Paused`]:
//!
//! 1. Advance `time_in_state` by the tick's scaled delta
//! 2. Walk the current state's outgoing transitions in priority order
//!    (declaration order among equals) and pick the first whose guard
//!    returns `Ok(true)`
//! 3. If one fired: run the old state's `on_exit` hook, switch, trigger
//!    [`StateChangedEvent`], run the new state's `on_enter` hook
//!
//! A guard returning `Err` or panicking is logged and counts as "did not
//! fire"; the remaining transitions and the other machines are still
//! considered. Each machine moves at most one edge per tick.
//!
//! The entity list is collected once per tick, but [`Paused`] is checked
//! again right before each machine is evaluated, so a hook that pauses an
//! entity also stops it later in the same tick.
//!
//! # System Ordering
//!
//! Runs after [`movement_system`](crate::systems::movement::movement_system)
//! within the same tick so guards see this tick's positions.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::paused::{Paused, is_paused};
use crate::components::statemachine::{GuardContext, HookContext, StateId, StateMachine};
use crate::events::statemachine::StateChangedEvent;
use crate::resources::simconfig::{DEFAULT_MAX_LAG_MS, SimConfig};
use crate::resources::worldtime::WorldTime;

/// The transition chosen for one machine this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub from: StateId,
    pub to: StateId,
    pub priority: i32,
}

/// Evaluate and apply transitions for all active state machines.
pub fn state_machine_system(world: &mut World) {
    let delta = match world.get_resource::<WorldTime>() {
        Some(wt) => {
            let max_lag_ms = world
                .get_resource::<SimConfig>()
                .map(|c| c.max_lag_ms)
                .unwrap_or(DEFAULT_MAX_LAG_MS);
            wt.delta_seconds(max_lag_ms)
        }
        None => 0.0,
    };

    let mut query = world.query_filtered::<Entity, (With<StateMachine>, Without<Paused>)>();
    let entities: Vec<Entity> = query.iter(world).collect();

    for entity in entities {
        if is_paused(world, entity) {
            continue;
        }
        if let Some(mut machine) = world.get_mut::<StateMachine>(entity) {
            machine.advance_time(delta);
        }
        if let Some(decision) = evaluate(world, entity) {
            apply(world, entity, decision);
        }
    }
}

/// Pick the transition that fires for `entity` this tick, if any.
pub fn evaluate(world: &World, entity: Entity) -> Option<Decision> {
    if is_paused(world, entity) {
        return None;
    }
    let machine = world.get::<StateMachine>(entity)?;
    let graph = machine.graph();
    let current = machine.current();
    let ctx = GuardContext {
        world,
        entity,
        state: current,
        time_in_state: machine.time_in_state(),
    };

    for transition in graph.outgoing(current) {
        let outcome = match catch_unwind(AssertUnwindSafe(|| transition.fires(&ctx))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                warn!(
                    "Guard {} -> {} on {entity} panicked, treating as not fired: {}",
                    transition.from(),
                    transition.to(),
                    panic_message(payload.as_ref())
                );
                continue;
            }
        };
        match outcome {
            Ok(true) => {
                return Some(Decision {
                    from: transition.from().clone(),
                    to: transition.to().clone(),
                    priority: transition.priority(),
                });
            }
            Ok(false) => {}
            Err(e) => warn!(
                "Guard {} -> {} on {entity} failed, treating as not fired: {e}",
                transition.from(),
                transition.to()
            ),
        }
    }
    None
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Switch `entity` along `decision`, running hooks and notifying observers.
pub fn apply(world: &mut World, entity: Entity, decision: Decision) {
    let Some(graph) = world.get::<StateMachine>(entity).map(|m| m.graph().clone()) else {
        return;
    };

    if let Some(on_exit) = graph.on_exit(&decision.from) {
        on_exit(&mut HookContext {
            world: &mut *world,
            entity,
            from: &decision.from,
            to: &decision.to,
        });
    }

    match world.get_mut::<StateMachine>(entity) {
        Some(mut machine) => {
            machine.switch_to(decision.to.clone());
        }
        // an exit hook removed the machine
        None => return,
    }
    debug!(
        "{entity}: {} -> {} (priority {})",
        decision.from, decision.to, decision.priority
    );

    world.trigger(StateChangedEvent {
        entity,
        from: decision.from.clone(),
        to: decision.to.clone(),
        priority: decision.priority,
    });

    if let Some(on_enter) = graph.on_enter(&decision.to) {
        on_enter(&mut HookContext {
            world: &mut *world,
            entity,
            from: &decision.from,
            to: &decision.to,
        });
    }
}
