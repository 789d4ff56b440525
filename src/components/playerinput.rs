//! Keyboard-driven movement marker.
//!
//! An entity carrying [`PlayerInput`] may receive directional key input. The
//! movement systems in [`crate::systems::movement`] read it to choose between
//! manual displacement and the autonomous wander pass.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug)]
pub struct PlayerInput {
    /// Pixels per second along each held axis.
    pub speed: f32,
    /// Suppresses all displacement while a Pomodoro session holds the player.
    pub frozen: bool,
    /// `true` for manual control, `false` when the wander pass drives the entity.
    pub controlled: bool,
}

impl PlayerInput {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            frozen: false,
            controlled: true,
        }
    }

    pub fn autonomous(mut self) -> Self {
        self.controlled = false;
        self
    }
}
