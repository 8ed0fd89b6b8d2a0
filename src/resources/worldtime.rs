//! Simulation clock.
//!
//! The external loop supplies three values per tick: milliseconds elapsed
//! since the previous tick, the global time scale and the configured update
//! rate. [`update_world_time`](crate::systems::time::update_world_time)
//! stores them here; movement math reads `delta_ms` and `time_scale`, the
//! update rate is informational for scroll/UI collaborators.

use bevy_ecs::prelude::Resource;

pub const DEFAULT_UPDATE_RATE: u32 = 60;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    /// Scaled seconds since the simulation started.
    pub elapsed: f32,
    /// Unscaled milliseconds since the previous tick.
    pub delta_ms: f32,
    pub time_scale: f32,
    /// Ticks per second.
    pub update_rate: u32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta_ms: 0.0,
            time_scale: 1.0,
            update_rate: DEFAULT_UPDATE_RATE,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_update_rate(mut self, update_rate: u32) -> Self {
        self.update_rate = update_rate;
        self
    }

    /// Scaled seconds of the last tick, clamped to the lag window.
    pub fn delta_seconds(&self, max_lag_ms: f32) -> f32 {
        self.delta_ms.min(max_lag_ms) * 0.001 * self.time_scale
    }
}
