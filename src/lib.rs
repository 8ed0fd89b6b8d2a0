//! Mobilecore library.
//!
//! Per-tick movement and behavior simulation for mobile entities on a 2D
//! map: velocity integration, seek/straight/accelerating controllers, and a
//! priority-ordered state machine with guarded transitions.
//!
//! This module exposes the ECS components, resources, systems and events
//! for use by a host loop, by integration tests, and by the `mobilecore`
//! demo binary.

pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod systems;
