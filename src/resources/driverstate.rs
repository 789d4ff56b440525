use bevy_ecs::prelude::Resource;

use crate::components::scene::SceneId;

/// Cross-frame state the driver systems compare against.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DriverState {
    /// Scene seen by the last transition-audio check.
    pub previous_scene: SceneId,
    /// Player freeze latch sampled before movement ran this frame.
    pub player_was_frozen: bool,
}
