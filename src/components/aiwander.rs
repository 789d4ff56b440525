use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

pub const STANDARD_WANDER_SPEED: f32 = 100.0;
pub const STANDARD_WANDER_MIN_TIME: f32 = 0.5;
pub const STANDARD_WANDER_MAX_TIME: f32 = 2.0;

/// Timer-driven random walk.
///
/// The entity alternates between standing and walking; each phase lasts a
/// duration drawn uniformly from `[min_move_time, max_move_time]`.
#[derive(Component, Clone, Copy, Debug)]
pub struct AIWander {
    pub speed: f32,
    pub move_timer: f32,
    pub current_move_time: f32,
    pub min_move_time: f32,
    pub max_move_time: f32,
    pub direction: Vector2,
    pub is_moving: bool,
}

impl AIWander {
    pub fn new(speed: f32, min_move_time: f32, max_move_time: f32) -> Self {
        Self {
            speed,
            move_timer: 0.0,
            current_move_time: min_move_time,
            min_move_time,
            max_move_time,
            direction: Vector2::zero(),
            is_moving: false,
        }
    }

    /// Parameters granted when the player switches to autonomous mode.
    pub fn standard() -> Self {
        Self::new(
            STANDARD_WANDER_SPEED,
            STANDARD_WANDER_MIN_TIME,
            STANDARD_WANDER_MAX_TIME,
        )
    }
}
