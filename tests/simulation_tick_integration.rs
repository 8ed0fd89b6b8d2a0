//! Simulation tick integration tests for movement, arrival, state machines,
//! pausing and deferred removal.

use std::sync::{Arc, Mutex};

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec2;

use mobilecore::components::entitytransition::EntityTransition;
use mobilecore::components::mapposition::MapPosition;
use mobilecore::components::mobile::MobileEntity;
use mobilecore::components::movementcontroller::{MovementController, Steering};
use mobilecore::components::paused::{pause_entity, resume_entity};
use mobilecore::components::statemachine::{StateGraph, StateId, StateMachine, Transition};
use mobilecore::error::{GraphError, GuardError};
use mobilecore::events::position::{
    ArrivedEvent, PositionChangedEvent, register_spatial_observers,
};
use mobilecore::events::statemachine::StateChangedEvent;
use mobilecore::resources::movementtemplates::{MovementTemplate, MovementTemplates};
use mobilecore::resources::pendingremovals::request_removal;
use mobilecore::resources::simconfig::SimConfig;
use mobilecore::resources::spatialindex::SpatialIndex;
use mobilecore::resources::worldtime::WorldTime;
use mobilecore::systems::location::set_location;
use mobilecore::systems::spawn::spawn_mobile;
use mobilecore::systems::tick::simulation_tick;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world() -> World {
    let mut world = World::new();
    let config = SimConfig::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(SpatialIndex::new(config.cell_size));
    world.insert_resource(config);
    let mut templates = MovementTemplates::new();
    templates.insert(
        "runner",
        MovementTemplate {
            velocity: 100.0,
            ..MovementTemplate::default()
        },
    );
    world.insert_resource(templates);
    register_spatial_observers(&mut world);
    world
}

fn record_arrivals(world: &mut World) -> Arc<Mutex<Vec<ArrivedEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    world.add_observer(move |trigger: On<ArrivedEvent>| {
        seen_clone.lock().unwrap().push(*trigger.event());
    });
    world.flush();
    seen
}

fn record_position_changes(world: &mut World) -> Arc<Mutex<Vec<PositionChangedEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    world.add_observer(move |trigger: On<PositionChangedEvent>| {
        seen_clone.lock().unwrap().push(*trigger.event());
    });
    world.flush();
    seen
}

fn record_state_changes(world: &mut World) -> Arc<Mutex<Vec<StateChangedEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    world.add_observer(move |trigger: On<StateChangedEvent>| {
        seen_clone.lock().unwrap().push(trigger.event().clone());
    });
    world.flush();
    seen
}

#[test]
fn seek_moves_five_units_in_fifty_ms() {
    let mut world = make_world();
    let e = spawn_mobile(&mut world, "runner", Vec2::ZERO, MovementController::Seek);
    world
        .get_mut::<MobileEntity>(e)
        .unwrap()
        .set_move_destination(Some(Vec2::new(100.0, 0.0)));

    simulation_tick(&mut world, 50.0);

    let pos = world.get::<MapPosition>(e).unwrap().pos;
    assert!(approx_eq(pos.x, 5.0));
    assert!(approx_eq(pos.y, 0.0));
}

#[test]
fn seek_snaps_onto_destination_and_arrives_once() {
    let mut world = make_world();
    let arrivals = record_arrivals(&mut world);
    let e = spawn_mobile(
        &mut world,
        "runner",
        Vec2::new(1.0, 0.0),
        MovementController::Seek,
    );
    world
        .get_mut::<MobileEntity>(e)
        .unwrap()
        .set_move_destination(Some(Vec2::new(3.0, 0.0)));

    simulation_tick(&mut world, 50.0);
    simulation_tick(&mut world, 50.0);
    simulation_tick(&mut world, 50.0);

    assert_eq!(world.get::<MapPosition>(e).unwrap().pos, Vec2::new(3.0, 0.0));
    assert_eq!(world.get::<MobileEntity>(e).unwrap().move_destination(), None);
    let arrivals = arrivals.lock().unwrap();
    assert_eq!(arrivals.len(), 1);
    assert_eq!(arrivals[0].destination, Vec2::new(3.0, 0.0));
}

#[test]
fn lag_spike_is_clamped() {
    let mut world = make_world();
    let e = spawn_mobile(
        &mut world,
        "runner",
        Vec2::ZERO,
        MovementController::straight(Vec2::X),
    );

    simulation_tick(&mut world, 5000.0);

    // 67 ms lag window at 100 units/s
    assert!(approx_eq(world.get::<MapPosition>(e).unwrap().pos.x, 6.7));
}

#[test]
fn position_changes_reach_the_spatial_index() {
    let mut world = make_world();
    let changes = record_position_changes(&mut world);
    let e = spawn_mobile(
        &mut world,
        "runner",
        Vec2::ZERO,
        MovementController::straight(Vec2::Y),
    );

    simulation_tick(&mut world, 100.0);

    let pos = world.get::<MapPosition>(e).unwrap().pos;
    assert_eq!(world.resource::<SpatialIndex>().position(e), Some(pos));
    assert_eq!(changes.lock().unwrap().len(), 1);
}

#[test]
fn direct_despawn_leaves_no_spatial_entry() {
    let mut world = make_world();
    let e = spawn_mobile(
        &mut world,
        "runner",
        Vec2::new(1.0, 1.0),
        MovementController::Seek,
    );
    simulation_tick(&mut world, 16.0);
    assert_eq!(world.resource::<SpatialIndex>().position(e), Some(Vec2::new(1.0, 1.0)));

    world.despawn(e);
    simulation_tick(&mut world, 16.0);

    let index = world.resource::<SpatialIndex>();
    assert_eq!(index.position(e), None);
    assert!(index.query_radius(Vec2::new(1.0, 1.0), 5.0).is_empty());
    assert!(index.is_empty());
}

#[test]
fn removing_map_position_drops_spatial_entry() {
    let mut world = make_world();
    let e = spawn_mobile(&mut world, "runner", Vec2::ZERO, MovementController::Seek);

    world.entity_mut(e).remove::<MapPosition>();

    assert_eq!(world.resource::<SpatialIndex>().position(e), None);
}

#[test]
fn repeated_identical_writes_notify_once() {
    let mut world = make_world();
    let changes = record_position_changes(&mut world);
    let e = world.spawn(MapPosition::new(0.0, 0.0)).id();

    assert!(set_location(&mut world, e, Some(Vec2::new(4.0, 4.0))));
    assert!(!set_location(&mut world, e, Some(Vec2::new(4.0, 4.0))));
    assert!(!set_location(&mut world, e, Some(Vec2::new(4.0005, 4.0))));

    assert_eq!(changes.lock().unwrap().len(), 1);
}

#[test]
fn paused_entity_does_not_move_until_resumed() {
    let mut world = make_world();
    let e = spawn_mobile(
        &mut world,
        "runner",
        Vec2::ZERO,
        MovementController::straight(Vec2::X),
    );

    assert!(pause_entity(&mut world, e));
    world.get_mut::<MobileEntity>(e).unwrap().set_velocity(200.0);
    simulation_tick(&mut world, 50.0);
    assert_eq!(world.get::<MapPosition>(e).unwrap().pos, Vec2::ZERO);

    assert!(resume_entity(&mut world, e));
    simulation_tick(&mut world, 50.0);
    assert!(approx_eq(world.get::<MapPosition>(e).unwrap().pos.x, 10.0));
}

#[test]
fn accelerating_controller_ramps_up_then_cruises() {
    let mut world = make_world();
    let e = spawn_mobile(
        &mut world,
        "runner",
        Vec2::ZERO,
        MovementController::accelerating(100.0, Steering::Straight { heading: Vec2::X }),
    );
    {
        let mut mobile = world.get_mut::<MobileEntity>(e).unwrap();
        mobile.set_velocity(0.0);
        mobile.set_acceleration(1000);
    }

    simulation_tick(&mut world, 50.0);
    let mobile = world.get::<MobileEntity>(e).unwrap();
    assert!(approx_eq(mobile.velocity(), 50.0));

    simulation_tick(&mut world, 50.0);
    simulation_tick(&mut world, 50.0);
    assert!(approx_eq(world.get::<MobileEntity>(e).unwrap().velocity(), 100.0));
}

#[test]
fn entity_transition_fires_on_arrival() {
    let mut world = make_world();
    let changes = record_state_changes(&mut world);
    let e = spawn_mobile(&mut world, "runner", Vec2::ZERO, MovementController::Seek);
    world
        .get_mut::<MobileEntity>(e)
        .unwrap()
        .set_move_destination(Some(Vec2::new(8.0, 0.0)));

    let arrived = EntityTransition::<MobileEntity>::new(Some(e), "walk", "rest", 1, |m, _| {
        Ok(m.move_destination().is_none())
    })
    .unwrap();
    let graph = StateGraph::builder("walk")
        .state("walk")
        .state("rest")
        .transition(arrived.into())
        .build()
        .unwrap();
    world.entity_mut(e).insert(StateMachine::new(Arc::new(graph)));

    // 5 units, then the remaining 3 with arrival
    simulation_tick(&mut world, 50.0);
    assert_eq!(*world.get::<StateMachine>(e).unwrap().current(), "walk");
    simulation_tick(&mut world, 50.0);
    assert_eq!(*world.get::<StateMachine>(e).unwrap().current(), "rest");

    let changes = changes.lock().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].from, StateId::from("walk"));
    assert_eq!(changes[0].to, StateId::from("rest"));
}

#[test]
fn entity_transition_without_entity_is_rejected() {
    let result = EntityTransition::<MobileEntity>::new(None, "a", "b", 1, |_, _| Ok(true));
    assert!(matches!(result, Err(GraphError::MissingEntity { .. })));
}

#[test]
fn despawned_bound_entity_stops_the_transition() {
    let mut world = make_world();
    let watcher = world.spawn_empty().id();
    let target = spawn_mobile(&mut world, "runner", Vec2::ZERO, MovementController::Seek);

    let watch = EntityTransition::<MobileEntity>::new(Some(target), "watch", "alarm", 1, |_, _| {
        Ok(true)
    })
    .unwrap();
    let graph = Arc::new(
        StateGraph::builder("watch")
            .state("watch")
            .state("alarm")
            .transition(watch.into())
            .build()
            .unwrap(),
    );
    world.entity_mut(watcher).insert(StateMachine::new(graph));

    request_removal(&mut world, target);
    // target still exists while this tick runs
    simulation_tick(&mut world, 16.0);
    assert!(world.get_entity(target).is_err());
    assert_eq!(*world.get::<StateMachine>(watcher).unwrap().current(), "alarm");
    assert_eq!(world.resource::<SpatialIndex>().position(target), None);
}

#[test]
fn guard_reports_vanished_entity_instead_of_firing() {
    let mut world = make_world();
    let watcher = world.spawn_empty().id();
    let target = world.spawn(MobileEntity::default()).id();

    let watch = EntityTransition::<MobileEntity>::new(Some(target), "watch", "alarm", 1, |_, _| {
        Ok(true)
    })
    .unwrap();
    let graph = Arc::new(
        StateGraph::builder("watch")
            .state("watch")
            .state("alarm")
            .transition(watch.into())
            .build()
            .unwrap(),
    );
    world.despawn(target);
    world.entity_mut(watcher).insert(StateMachine::new(graph));

    simulation_tick(&mut world, 16.0);
    assert_eq!(*world.get::<StateMachine>(watcher).unwrap().current(), "watch");
}

#[test]
fn hooks_run_around_the_switch() {
    let mut world = make_world();
    let log = Arc::new(Mutex::new(Vec::<String>::new()));
    let exit_log = log.clone();
    let enter_log = log.clone();
    let event_log = log.clone();
    world.add_observer(move |trigger: On<StateChangedEvent>| {
        event_log
            .lock()
            .unwrap()
            .push(format!("event {}", trigger.event().to));
    });
    world.flush();

    let graph = StateGraph::builder("a")
        .state("a")
        .state("b")
        .transition(Transition::new("a", "b", 1, |_| Ok(true)))
        .on_exit("a", move |hook| {
            exit_log.lock().unwrap().push(format!("exit {}", hook.from));
        })
        .on_enter("b", move |hook| {
            enter_log.lock().unwrap().push(format!("enter {}", hook.to));
        })
        .build()
        .unwrap();
    let e = world.spawn(StateMachine::new(Arc::new(graph))).id();

    simulation_tick(&mut world, 16.0);

    assert_eq!(*log.lock().unwrap(), vec!["exit a", "event b", "enter b"]);
    let machine = world.get::<StateMachine>(e).unwrap();
    assert_eq!(machine.previous(), Some(&StateId::from("a")));
}

#[test]
fn equal_priorities_resolve_in_declaration_order() {
    let mut world = make_world();
    let graph = StateGraph::builder("start")
        .state("start")
        .state("first")
        .state("second")
        .transition(Transition::new("start", "first", 3, |_| Ok(true)))
        .transition(Transition::new("start", "second", 3, |_| Ok(true)))
        .build()
        .unwrap();
    let e = world.spawn(StateMachine::new(Arc::new(graph))).id();

    simulation_tick(&mut world, 16.0);
    assert_eq!(*world.get::<StateMachine>(e).unwrap().current(), "first");
}

#[test]
fn failing_guard_falls_through_to_lower_priority() {
    let mut world = make_world();
    let graph = StateGraph::builder("start")
        .state("start")
        .state("broken")
        .state("fallback")
        .transition(Transition::new("start", "broken", 9, |_| {
            Err(GuardError::Failed("sensor offline".into()))
        }))
        .transition(Transition::new("start", "fallback", 1, |_| Ok(true)))
        .build()
        .unwrap();
    let e = world.spawn(StateMachine::new(Arc::new(graph))).id();

    simulation_tick(&mut world, 16.0);
    assert_eq!(*world.get::<StateMachine>(e).unwrap().current(), "fallback");
}

fn run_patrol(ticks: u32) -> (Vec<(StateId, StateId)>, Vec2) {
    let mut world = make_world();
    let changes = record_state_changes(&mut world);
    let e = spawn_mobile(&mut world, "runner", Vec2::ZERO, MovementController::Seek);

    let out = EntityTransition::<MobileEntity>::new(Some(e), "out", "back", 5, |m, _| {
        Ok(m.move_destination().is_none())
    })
    .unwrap();
    let back = EntityTransition::<MobileEntity>::new(Some(e), "back", "out", 5, |m, _| {
        Ok(m.move_destination().is_none())
    })
    .unwrap();
    let graph = StateGraph::builder("out")
        .state("out")
        .state("back")
        .transition(out.into())
        .transition(back.into())
        .on_enter("out", |hook| {
            if let Some(mut m) = hook.world.get_mut::<MobileEntity>(hook.entity) {
                m.set_move_destination(Some(Vec2::new(20.0, 10.0)));
            }
        })
        .on_enter("back", |hook| {
            if let Some(mut m) = hook.world.get_mut::<MobileEntity>(hook.entity) {
                m.set_move_destination(Some(Vec2::ZERO));
            }
        })
        .build()
        .unwrap();
    world.entity_mut(e).insert(StateMachine::new(Arc::new(graph)));
    world
        .get_mut::<MobileEntity>(e)
        .unwrap()
        .set_move_destination(Some(Vec2::new(20.0, 10.0)));

    for i in 0..ticks {
        simulation_tick(&mut world, 10.0 + (i % 7) as f32);
    }

    let history = changes
        .lock()
        .unwrap()
        .iter()
        .map(|c| (c.from.clone(), c.to.clone()))
        .collect();
    (history, world.get::<MapPosition>(e).unwrap().pos)
}

#[test]
fn identical_runs_produce_identical_histories() {
    let (first_history, first_pos) = run_patrol(200);
    let (second_history, second_pos) = run_patrol(200);

    assert!(!first_history.is_empty());
    assert_eq!(first_history, second_history);
    assert_eq!(first_pos, second_pos);
}
