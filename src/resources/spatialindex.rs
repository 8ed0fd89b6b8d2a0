//! Uniform grid spatial index.
//!
//! The default collision/spatial collaborator. It is kept current by the
//! [`observe_position_changed`](crate::events::position::observe_position_changed)
//! observer, which runs synchronously inside every non-suppressed position
//! write.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::resources::simconfig::DEFAULT_CELL_SIZE;

pub type Cell = (i32, i32);

#[derive(Resource, Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f32,
    cells: FxHashMap<Cell, SmallVec<[Entity; 8]>>,
    locations: FxHashMap<Entity, (Cell, Vec2)>,
    /// Number of position updates received.
    updates: u64,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SpatialIndex {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: if cell_size > 0.0 {
                cell_size
            } else {
                DEFAULT_CELL_SIZE
            },
            cells: FxHashMap::default(),
            locations: FxHashMap::default(),
            updates: 0,
        }
    }

    pub fn cell_of(&self, position: Vec2) -> Cell {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    /// Record `entity` at `position`, moving it between cells if needed.
    pub fn update(&mut self, entity: Entity, position: Vec2) {
        self.updates += 1;
        let cell = self.cell_of(position);
        if let Some((old_cell, _)) = self.locations.insert(entity, (cell, position)) {
            if old_cell == cell {
                return;
            }
            self.detach(entity, old_cell);
        }
        self.cells.entry(cell).or_default().push(entity);
    }

    pub fn remove(&mut self, entity: Entity) {
        if let Some((cell, _)) = self.locations.remove(&entity) {
            self.detach(entity, cell);
        }
    }

    fn detach(&mut self, entity: Entity, cell: Cell) {
        if let Some(bucket) = self.cells.get_mut(&cell) {
            bucket.retain(|e| *e != entity);
            if bucket.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    pub fn position(&self, entity: Entity) -> Option<Vec2> {
        self.locations.get(&entity).map(|(_, pos)| *pos)
    }

    /// Entities whose last known position falls in `cell`.
    pub fn entities_in(&self, cell: Cell) -> &[Entity] {
        self.cells.get(&cell).map(|b| b.as_slice()).unwrap_or(&[])
    }

    /// Entities within `radius` of `center`.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<Entity> {
        let min = self.cell_of(center - Vec2::splat(radius));
        let max = self.cell_of(center + Vec2::splat(radius));
        let mut found = Vec::new();
        for cx in min.0..=max.0 {
            for cy in min.1..=max.1 {
                for &entity in self.entities_in((cx, cy)) {
                    if let Some(pos) = self.position(entity) {
                        if pos.distance(center) <= radius {
                            found.push(entity);
                        }
                    }
                }
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn update_count(&self) -> u64 {
        self.updates
    }
}
