//! Buildings and their interiors.
//!
//! - [`Building`] marks a main-scene entity whose interaction zone leads into
//!   another scene.
//! - [`BuildingInterior`] is the per-interior descriptor: it is never drawn as
//!   a sprite, the render pass reads it to paint the split-screen backdrops and
//!   to pick the GUI overlay of the GUI band.

use bevy_ecs::prelude::Component;
use raylib::prelude::Color;

use crate::components::scene::SceneId;

#[derive(Component, Clone, Debug)]
pub struct Building {
    pub display_name: String,
    pub interior: SceneId,
}

impl Building {
    pub fn new(display_name: impl Into<String>, interior: SceneId) -> Self {
        Self {
            display_name: display_name.into(),
            interior,
        }
    }

    /// Prompt shown over the player while standing at the entrance.
    pub fn prompt(&self) -> String {
        format!("Enter\n{}? (X)", self.display_name)
    }
}

/// Overlay painted in the GUI band of an interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuiType {
    None,
    Pomodoro,
    Library,
    TodoList,
}

/// Texture or flat colour filling one half of the interior layout.
#[derive(Clone, Debug)]
pub struct Backdrop {
    pub texture: Option<String>,
    pub color: Color,
}

impl Backdrop {
    pub fn color(color: Color) -> Self {
        Self {
            texture: None,
            color,
        }
    }

    pub fn texture(path: impl Into<String>, fallback: Color) -> Self {
        Self {
            texture: Some(path.into()),
            color: fallback,
        }
    }
}

#[derive(Component, Clone, Debug)]
pub struct BuildingInterior {
    pub gui_type: GuiType,
    pub gui_backdrop: Backdrop,
    pub game_backdrop: Backdrop,
    pub loaded: bool,
}

impl BuildingInterior {
    pub fn new(gui_type: GuiType, gui_backdrop: Backdrop, game_backdrop: Backdrop) -> Self {
        Self {
            gui_type,
            gui_backdrop,
            game_backdrop,
            loaded: false,
        }
    }

    /// Paths of every texture this interior needs.
    pub fn texture_paths(&self) -> impl Iterator<Item = &str> {
        self.gui_backdrop
            .texture
            .as_deref()
            .into_iter()
            .chain(self.game_backdrop.texture.as_deref())
    }
}
