//! Error types shared by the configuration loaders and the state machine.
//!
//! Configuration and graph errors surface at setup time and are returned to
//! the caller. Guard errors never leave the evaluation loop: they are logged
//! and the transition simply does not fire for that tick.

use std::path::PathBuf;

use bevy_ecs::entity::Entity;
use thiserror::Error;

use crate::components::statemachine::StateId;

/// Failure to load or save simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("failed to save config file {path:?}: {reason}")]
    Save { path: PathBuf, reason: String },

    #[error("failed to read movement templates from {path:?}")]
    TemplateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed movement templates")]
    TemplateParse(#[from] serde_json::Error),
}

/// Structural authoring error in a state graph or transition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("entity transition {from} -> {to} has no entity bound")]
    MissingEntity { from: StateId, to: StateId },

    #[error("state {0} declared twice")]
    DuplicateState(StateId),

    #[error("initial state {0} is not part of the graph")]
    UnknownInitialState(StateId),

    #[error("transition {from} -> {to} references an unknown state")]
    UnknownState { from: StateId, to: StateId },

    #[error("hook attached to unknown state {0}")]
    UnknownHookState(StateId),
}

/// Reason a guard could not decide. Treated as "did not fire".
#[derive(Debug, Error, PartialEq)]
pub enum GuardError {
    #[error("bound entity {0} no longer exists")]
    EntityGone(Entity),

    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("{0}")]
    Failed(String),
}
