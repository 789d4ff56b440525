use bevy_ecs::prelude::Component;

/// Interior object that returns the player to the main scene.
#[derive(Component, Clone, Debug)]
pub struct ExitDoor {
    pub display_text: String,
    pub is_player_near: bool,
}

impl ExitDoor {
    pub fn new(display_text: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            is_player_near: false,
        }
    }
}
