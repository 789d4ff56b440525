use bevy_ecs::prelude::Component;
use raylib::prelude::{Rectangle, Vector2};

/// Non-blocking proximity rectangle, offset from the owner's position.
///
/// Zones never stop movement; the collision pass tests them against the
/// player's hitbox to raise prompts and the interaction system reads them to
/// decide what a key press refers to.
#[derive(Component, Clone, Copy, Debug)]
pub struct InteractionZone {
    pub width: f32,
    pub height: f32,
    pub offset: Vector2,
    pub bounds: Rectangle,
}

impl InteractionZone {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset: Vector2::zero(),
            bounds: Rectangle::new(0.0, 0.0, width, height),
        }
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = Vector2::new(x, y);
        self
    }

    /// Zone grown by `margin` on every side of a `width`×`height` body.
    pub fn around(width: f32, height: f32, margin: f32) -> Self {
        Self::new(width + margin * 2.0, height + margin * 2.0).with_offset(-margin, -margin)
    }

    pub fn sync(&mut self, position: Vector2) {
        self.bounds = Rectangle::new(
            position.x + self.offset.x,
            position.y + self.offset.y,
            self.width,
            self.height,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around_grows_evenly() {
        let mut zone = InteractionZone::around(100.0, 120.0, 10.0);
        zone.sync(Vector2::new(50.0, 60.0));
        assert_eq!(zone.bounds.x, 40.0);
        assert_eq!(zone.bounds.y, 50.0);
        assert_eq!(zone.bounds.width, 120.0);
        assert_eq!(zone.bounds.height, 140.0);
    }
}
