//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per tick with the values supplied by the external loop.
use bevy_ecs::prelude::*;

use crate::resources::simconfig::SimConfig;
use crate::resources::worldtime::WorldTime;

/// Record the elapsed milliseconds of this tick on the `WorldTime` resource.
///
/// Negative or non-finite inputs are treated as 0. `elapsed` advances by
/// the scaled, lag-clamped delta so it matches what movement integrated.
pub fn update_world_time(world: &mut World, elapsed_ms: f32) {
    let max_lag_ms = world
        .get_resource::<SimConfig>()
        .map(|c| c.max_lag_ms)
        .unwrap_or(crate::resources::simconfig::DEFAULT_MAX_LAG_MS);
    let elapsed_ms = if elapsed_ms.is_finite() {
        elapsed_ms.max(0.0)
    } else {
        0.0
    };

    let mut wt = world.resource_mut::<WorldTime>();
    wt.delta_ms = elapsed_ms;
    let scaled = wt.delta_seconds(max_lag_ms);
    wt.elapsed += scaled;
    wt.frame_count += 1;
}
