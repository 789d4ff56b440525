//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame from the backend's frame time.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Longest frame step fed to the simulation, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is the frame delta in seconds. Window drags and debugger
/// pauses produce huge deltas, so it is capped at [`MAX_FRAME_DELTA`] and
/// negative values are dropped.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let step = dt.clamp(0.0, MAX_FRAME_DELTA);
    wt.elapsed += step;
    wt.delta = step;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_is_capped() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        update_world_time(&mut world, 2.0);
        update_world_time(&mut world, 0.05);
        let wt = world.resource::<WorldTime>();
        assert!((wt.delta - 0.05).abs() < 1e-6);
        assert!((wt.elapsed - 0.15).abs() < 1e-6);
    }
}
