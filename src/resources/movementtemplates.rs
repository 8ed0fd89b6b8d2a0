//! Movement templates registry.
//!
//! Every mobile entity type declares default movement values (velocity,
//! acceleration, deceleration, turn-on-move). The [`MovementTemplates`]
//! resource maps an entity type name to its [`MovementTemplate`]; spawning
//! code resolves the template once and seeds
//! [`MobileEntity`](crate::components::mobile::MobileEntity) from it.
//!
//! # File Format
//!
//! ```json
//! {
//!   "guard":  { "velocity": 80.0, "acceleration": 200, "deceleration": 400 },
//!   "arrow":  { "velocity": 600.0, "turn_on_move": true }
//! }
//! ```
//!
//! Omitted fields take the defaults of [`MovementTemplate::default`].

use std::path::Path;

use bevy_ecs::prelude::*;
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_VELOCITY: f32 = 100.0;
pub const DEFAULT_ACCELERATION: i32 = 0;
pub const DEFAULT_DECELERATION: i32 = 0;
pub const DEFAULT_TURN_ON_MOVE: bool = true;

/// Default movement values for one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTemplate {
    /// Units per second.
    pub velocity: f32,
    /// Velocity gained per second while ramping up. 0 = instant.
    pub acceleration: i32,
    /// Velocity lost per second while ramping down. 0 = instant.
    pub deceleration: i32,
    pub turn_on_move: bool,
}

impl Default for MovementTemplate {
    fn default() -> Self {
        Self {
            velocity: DEFAULT_VELOCITY,
            acceleration: DEFAULT_ACCELERATION,
            deceleration: DEFAULT_DECELERATION,
            turn_on_move: DEFAULT_TURN_ON_MOVE,
        }
    }
}

impl MovementTemplate {
    /// Apply map-object custom properties on top of this template.
    ///
    /// Recognised keys are `velocity`, `acceleration`, `deceleration` and
    /// `turnonmove` (case-insensitive). Values that fail to parse are
    /// ignored and the template value is kept.
    pub fn with_properties<'a>(
        mut self,
        properties: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        for (key, value) in properties {
            let value = value.trim();
            match key.to_ascii_lowercase().as_str() {
                "velocity" => match value.parse::<f32>() {
                    Ok(v) if v.is_finite() => self.velocity = v.max(0.0),
                    _ => warn!("Ignoring map property velocity={value:?}"),
                },
                "acceleration" => match value.parse::<i32>() {
                    Ok(v) => self.acceleration = v,
                    Err(_) => warn!("Ignoring map property acceleration={value:?}"),
                },
                "deceleration" => match value.parse::<i32>() {
                    Ok(v) => self.deceleration = v,
                    Err(_) => warn!("Ignoring map property deceleration={value:?}"),
                },
                "turnonmove" => match value.parse::<bool>() {
                    Ok(v) => self.turn_on_move = v,
                    Err(_) => warn!("Ignoring map property turnonmove={value:?}"),
                },
                _ => {}
            }
        }
        self
    }
}

/// Registry of movement templates keyed by entity type.
#[derive(Resource, Debug, Clone, Default)]
pub struct MovementTemplates {
    templates: FxHashMap<String, MovementTemplate>,
}

impl MovementTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `type -> template`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let templates: FxHashMap<String, MovementTemplate> = serde_json::from_str(json)?;
        Ok(Self { templates })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::TemplateIo {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json(&json)?;
        info!(
            "Loaded {} movement templates from {:?}",
            registry.len(),
            path
        );
        Ok(registry)
    }

    pub fn insert(&mut self, entity_type: impl Into<String>, template: MovementTemplate) {
        self.templates.insert(entity_type.into(), template);
    }

    pub fn get(&self, entity_type: &str) -> Option<&MovementTemplate> {
        self.templates.get(entity_type)
    }

    /// Template for `entity_type`, falling back to the defaults.
    pub fn resolve(&self, entity_type: &str) -> MovementTemplate {
        match self.templates.get(entity_type) {
            Some(template) => *template,
            None => {
                warn!("No movement template for {entity_type:?}, using defaults");
                MovementTemplate::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
