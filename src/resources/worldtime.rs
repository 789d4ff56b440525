use bevy_ecs::prelude::Resource;

/// Simulation clock advanced once per frame by
/// [`update_world_time`](crate::systems::time::update_world_time).
///
/// Frame-driven systems (animation, movement, wander) read `delta`. The
/// Pomodoro timer deliberately ignores it and uses the wall clock.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
        }
    }
}

impl WorldTime {
    pub fn with_delta(mut self, delta: f32) -> Self {
        self.delta = delta;
        self
    }
}
