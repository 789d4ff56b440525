use bevy_ecs::prelude::Component;

/// Cyclic frame animation over a horizontal sprite sheet.
///
/// `timer` counts down from `frame_time`; every time it runs out the frame
/// index advances and wraps modulo `frame_count`.
#[derive(Component, Clone, Copy, Debug)]
pub struct Animation {
    pub frame_count: usize,
    pub current_frame: usize,
    pub frame_time: f32,
    pub timer: f32,
    pub frame_width: f32,
    pub frame_height: f32,
}

impl Animation {
    pub fn new(frame_count: usize, frame_time: f32, frame_width: f32, frame_height: f32) -> Self {
        Self {
            frame_count,
            current_frame: 0,
            frame_time,
            timer: frame_time,
            frame_width,
            frame_height,
        }
    }

    /// Count the timer down by `dt`. Returns true when the frame changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.frame_count == 0 {
            return false;
        }
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.timer = self.frame_time;
            self.current_frame = (self.current_frame + 1) % self.frame_count;
            return true;
        }
        false
    }

    /// X offset of the current frame inside the sheet.
    pub fn source_x(&self) -> f32 {
        self.current_frame as f32 * self.frame_width
    }
}
