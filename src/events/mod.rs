//! Event types and observers used by the simulation core.
//!
//! Events decouple the core from its collaborators: spatial indexing,
//! behavior logging and gameplay reactions subscribe with observers instead
//! of being called directly.
//!
//! Submodules:
//! - [`position`] – position change and arrival notifications from movement
//! - [`statemachine`] – state transition notifications from behavior
pub mod position;
pub mod statemachine;
