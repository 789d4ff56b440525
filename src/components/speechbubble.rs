use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Offset used for bubbles over entities and building prompts.
pub const DEFAULT_BUBBLE_OFFSET: Vector2 = Vector2 { x: 0.0, y: -40.0 };
/// Exit door prompts sit closer to the player's head.
pub const EXIT_PROMPT_OFFSET: Vector2 = Vector2 { x: 0.0, y: -24.0 };

/// Transient text overlay tied to an entity's position.
///
/// The collision pass clears every bubble at the start of its run, so a
/// bubble is only visible while some check re-asserts it each frame.
#[derive(Component, Clone, Debug)]
pub struct SpeechBubble {
    pub text: String,
    pub active: bool,
    pub offset: Vector2,
}

impl Default for SpeechBubble {
    fn default() -> Self {
        Self {
            text: String::new(),
            active: false,
            offset: DEFAULT_BUBBLE_OFFSET,
        }
    }
}

impl SpeechBubble {
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.active = true;
    }

    pub fn show_at(&mut self, text: impl Into<String>, offset: Vector2) {
        self.show(text);
        self.offset = offset;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.active = false;
    }
}
