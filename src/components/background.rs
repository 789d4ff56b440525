use bevy_ecs::prelude::Component;

/// Marks a sprite stretched over the whole screen and painted before any
/// other entity of its scene.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Background;
