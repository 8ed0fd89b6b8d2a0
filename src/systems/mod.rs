//! Simulation systems.
//!
//! Every system here is an exclusive `fn(&mut World)` so notifications can
//! be delivered synchronously, inside the write that caused them.
//!
//! Submodules overview
//! - [`gamepadcontroller`] – translate gamepad input into headings
//! - [`location`] – the position write path with tolerance suppression
//! - [`movement`] – integrate velocity over time and steer toward destinations
//! - [`spawn`] – create mobile entities from movement templates
//! - [`statemachine`] – evaluate transitions and run state hooks
//! - [`tick`] – run one full simulation step in order
//! - [`time`] – update simulation time and delta

pub mod gamepadcontroller;
pub mod location;
pub mod movement;
pub mod spawn;
pub mod statemachine;
pub mod tick;
pub mod time;
