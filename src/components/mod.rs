//! ECS components for mobile entities.
//!
//! This module groups all component types the simulation core attaches to
//! entities: position and facing, movement parameters, the controller that
//! drives them, and the behavior state machine.
//!
//! Submodules overview:
//! - [`entitytransition`] – transitions whose guard reads a component of a bound entity
//! - [`gamepadcontrolled`] – steer a straight-line controller from the gamepad
//! - [`mapposition`] – world-space position of an entity
//! - [`mobile`] – velocity, acceleration, destination and facing policy
//! - [`movementcontroller`] – straight, seeking and accelerating strategies
//! - [`paused`] – marker that suspends simulation of an entity
//! - [`rotation`] – facing angle in degrees
//! - [`statemachine`] – state graph, transitions and per-entity machine state

pub mod entitytransition;
pub mod gamepadcontrolled;
pub mod mapposition;
pub mod mobile;
pub mod movementcontroller;
pub mod paused;
pub mod rotation;
pub mod statemachine;
