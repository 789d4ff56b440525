//! Active scene and the single pending return point.
//!
//! The transitions themselves live in [`crate::systems::scene`], they need
//! mutable access to the player's components as well as this resource.

use bevy_ecs::prelude::Resource;

use crate::components::position::Position;
use crate::components::scene::SceneId;

#[derive(Resource, Debug, Clone, Copy)]
pub struct SceneState {
    pub current: SceneId,
    /// Player position captured on the last `enter_building`. Only one slot:
    /// a second enter overwrites it.
    pub return_point: Option<Position>,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            current: SceneId::MAIN,
            return_point: None,
        }
    }

    pub fn is_main(&self) -> bool {
        self.current.is_main()
    }
}
