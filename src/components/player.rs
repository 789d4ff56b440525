use bevy_ecs::prelude::Component;

/// Tags the single user-controlled entity.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;
