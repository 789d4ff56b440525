//! "Talk to / use" marker for interior objects.

use bevy_ecs::prelude::Component;

/// Behaviour triggered when the player activates an [`Interactable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionKind {
    /// Barista: the driver starts a study session.
    Pomodoro,
    /// Librarian: opens the library overlay.
    Library,
    /// Desk: opens the to-do overlay.
    TodoList,
}

#[derive(Component, Clone, Debug)]
pub struct Interactable {
    pub display_name: String,
    pub prompt: String,
    pub kind: InteractionKind,
    pub is_player_near: bool,
}

impl Interactable {
    pub fn new(
        display_name: impl Into<String>,
        prompt: impl Into<String>,
        kind: InteractionKind,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            prompt: prompt.into(),
            kind,
            is_player_near: false,
        }
    }
}
