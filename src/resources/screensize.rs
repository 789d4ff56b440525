//! Screen layout resource.
//!
//! The town uses the whole screen. Interiors split it into a GUI band on top
//! and a game area below; interior positions are local to the game area.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug)]
pub struct ScreenSize {
    pub w: f32,
    pub h: f32,
    /// Height of the GUI band painted above the interior game area.
    pub gui_height: f32,
    /// Height of the interior game area.
    pub game_height: f32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            w: 1280.0,
            h: 800.0,
            gui_height: 400.0,
            game_height: 400.0,
        }
    }
}
