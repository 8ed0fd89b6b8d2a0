//! Mobilecore demo driver.
//!
//! Runs the simulation core headless for a fixed number of ticks:
//!
//! 1. Load `SimConfig` from an INI file (defaults if missing)
//! 2. Load movement templates from JSON (empty registry if not given)
//! 3. Spawn a guard that idles, patrols to a waypoint and returns, with
//!    every step driven by transitions bound to the guard's own
//!    `MobileEntity`
//! 4. Call `simulation_tick` with a fixed elapsed time and log state
//!    changes and arrivals as they happen
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --ticks 300 --elapsed-ms 16
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec2;
use log::{info, warn};

use mobilecore::components::entitytransition::EntityTransition;
use mobilecore::components::mapposition::MapPosition;
use mobilecore::components::mobile::MobileEntity;
use mobilecore::components::movementcontroller::MovementController;
use mobilecore::components::statemachine::{HookContext, StateGraph, StateMachine, Transition};
use mobilecore::error::GraphError;
use mobilecore::events::position::{ArrivedEvent, register_spatial_observers};
use mobilecore::events::statemachine::StateChangedEvent;
use mobilecore::resources::movementtemplates::MovementTemplates;
use mobilecore::resources::simconfig::SimConfig;
use mobilecore::resources::spatialindex::SpatialIndex;
use mobilecore::resources::worldtime::WorldTime;
use mobilecore::systems::spawn::spawn_mobile;
use mobilecore::systems::tick::simulation_tick;

const HOME: Vec2 = Vec2::new(0.0, 0.0);
const WAYPOINT: Vec2 = Vec2::new(240.0, 120.0);
/// Seconds the guard waits at home before each patrol.
const IDLE_SECONDS: f32 = 0.5;

/// Headless movement and behavior simulation
#[derive(Parser)]
#[command(version, about = "Runs the mobilecore simulation headless with a demo patrol.")]
struct Cli {
    /// INI file with [simulation] and [spatial] settings.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// JSON file with movement templates keyed by entity type.
    #[arg(long, value_name = "PATH")]
    templates: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 300)]
    ticks: u32,

    /// Milliseconds elapsed per tick. Defaults to 1000 / update_rate.
    #[arg(long, value_name = "MS")]
    elapsed_ms: Option<f32>,
}

fn set_destination(hook: &mut HookContext<'_>, destination: Vec2) {
    if let Some(mut mobile) = hook.world.get_mut::<MobileEntity>(hook.entity) {
        mobile.set_move_destination(Some(destination));
    }
}

/// idle -> patrol -> return -> idle, driven by the guard's own movement state.
fn patrol_graph(guard: Entity) -> Result<StateGraph, GraphError> {
    let reached_waypoint = EntityTransition::<MobileEntity>::new(
        Some(guard),
        "patrol",
        "return",
        10,
        |mobile, _| Ok(mobile.move_destination().is_none()),
    )?;
    let reached_home = EntityTransition::<MobileEntity>::new(
        Some(guard),
        "return",
        "idle",
        10,
        |mobile, _| Ok(mobile.move_destination().is_none()),
    )?;

    StateGraph::builder("idle")
        .state("idle")
        .state("patrol")
        .state("return")
        .transition(Transition::new("idle", "patrol", 1, |ctx| {
            Ok(ctx.time_in_state >= IDLE_SECONDS)
        }))
        .transition(reached_waypoint.into())
        .transition(reached_home.into())
        .on_enter("patrol", |hook| set_destination(hook, WAYPOINT))
        .on_enter("return", |hook| set_destination(hook, HOME))
        .build()
}

fn build_world(config: SimConfig, templates: MovementTemplates) -> Result<(World, Entity), GraphError> {
    let mut world = World::new();
    world.insert_resource(
        WorldTime::default()
            .with_time_scale(config.time_scale)
            .with_update_rate(config.update_rate),
    );
    world.insert_resource(SpatialIndex::new(config.cell_size));
    world.insert_resource(config);
    world.insert_resource(templates);

    register_spatial_observers(&mut world);
    world.add_observer(|trigger: On<StateChangedEvent>| {
        let event = trigger.event();
        info!(
            "{}: {} -> {} (priority {})",
            event.entity, event.from, event.to, event.priority
        );
    });
    world.add_observer(|trigger: On<ArrivedEvent>| {
        let event = trigger.event();
        info!("{} arrived at {}", event.entity, event.destination);
    });
    world.flush();

    let guard = spawn_mobile(&mut world, "guard", HOME, MovementController::Seek);
    let graph = patrol_graph(guard)?;
    world.entity_mut(guard).insert(StateMachine::new(Arc::new(graph)));
    Ok((world, guard))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = SimConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        warn!("{e}; using default configuration");
    }

    let templates = match &cli.templates {
        Some(path) => match MovementTemplates::load_from_file(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => MovementTemplates::new(),
    };

    let elapsed_ms = cli
        .elapsed_ms
        .unwrap_or(1000.0 / config.update_rate.max(1) as f32);

    let (mut world, guard) = match build_world(config, templates) {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error building patrol graph: {e}");
            std::process::exit(1);
        }
    };

    info!("Running {} ticks of {elapsed_ms} ms", cli.ticks);
    for _ in 0..cli.ticks {
        simulation_tick(&mut world, elapsed_ms);
    }

    let position = world.get::<MapPosition>(guard).map(|p| p.pos);
    let state = world
        .get::<StateMachine>(guard)
        .map(|m| m.current().to_string());
    let wt = world.resource::<WorldTime>();
    info!(
        "After {} ticks ({:.2}s simulated): guard at {:?}, state {:?}",
        wt.frame_count, wt.elapsed, position, state
    );
}
