//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during a tick: timing, configuration, templates and
//! the spatial collaborator. Each submodule documents the semantics and
//! intended usage of its resource(s).
//!
//! Overview
//! - `gamepad` – gamepad identifier table and polled values
//! - `movementtemplates` – per-entity-type movement defaults
//! - `pendingremovals` – entities to despawn at the end of the tick
//! - `simconfig` – INI-backed simulation settings
//! - `spatialindex` – uniform grid of entity positions
//! - `worldtime` – simulation time and delta
pub mod gamepad;
pub mod movementtemplates;
pub mod pendingremovals;
pub mod simconfig;
pub mod spatialindex;
pub mod worldtime;
