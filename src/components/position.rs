use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Authoritative top-left position of an entity.
///
/// In the main scene this is screen space. Inside a building interior it is
/// local to the game area below the GUI band, so `y` may go negative when the
/// character walks up into the band.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn as_vec(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}
