//! Solid collision rectangle.
//!
//! A [`Hitbox`] blocks movement. Its `bounds` are derived from the owning
//! entity's [`Position`](crate::components::position::Position) every frame by
//! the collision pass and by the movement pass right after a displacement;
//! they are never trusted across frames.

use bevy_ecs::prelude::Component;
use raylib::prelude::{Rectangle, Vector2};

/// Strict AABB overlap. Touching edges do not count.
pub fn rects_overlap(a: &Rectangle, b: &Rectangle) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

#[derive(Component, Clone, Copy, Debug)]
pub struct Hitbox {
    pub width: f32,
    pub height: f32,
    pub bounds: Rectangle,
    /// Set when the player's box touches this one in the current frame.
    /// Only the debug overlay reads it.
    pub colliding: bool,
}

impl Hitbox {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            bounds: Rectangle::new(0.0, 0.0, width, height),
            colliding: false,
        }
    }

    /// Rectangle this box would occupy with its origin at `position`.
    pub fn bounds_at(&self, position: Vector2) -> Rectangle {
        Rectangle::new(position.x, position.y, self.width, self.height)
    }

    /// Recompute `bounds` from a position.
    pub fn sync(&mut self, position: Vector2) {
        self.bounds = self.bounds_at(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(10.0, 0.0, 10.0, 10.0);
        assert!(!rects_overlap(&a, &b));
        let c = Rectangle::new(9.5, 9.5, 10.0, 10.0);
        assert!(rects_overlap(&a, &c));
    }

    #[test]
    fn test_sync_follows_position() {
        let mut hb = Hitbox::new(64.0, 32.0);
        hb.sync(Vector2::new(12.0, -40.0));
        assert_eq!(hb.bounds.x, 12.0);
        assert_eq!(hb.bounds.y, -40.0);
        assert_eq!(hb.bounds.width, 64.0);
        assert_eq!(hb.bounds.height, 32.0);
    }
}
