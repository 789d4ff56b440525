//! Scene partitioning.
//!
//! Every entity tagged with [`Scene`] belongs to one logical area. Entities
//! without the tag are global and always visible.

use bevy_ecs::prelude::Component;
use std::fmt;

/// Identifier of a navigable area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SceneId(pub u32);

impl SceneId {
    pub const MAIN: SceneId = SceneId(0);
    pub const POMODORO: SceneId = SceneId(1);
    pub const LIBRARY: SceneId = SceneId(2);
    pub const HOUSE: SceneId = SceneId(3);

    pub fn is_main(self) -> bool {
        self == Self::MAIN
    }

    pub fn is_interior(self) -> bool {
        !self.is_main()
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SceneId::MAIN => write!(f, "main"),
            SceneId::POMODORO => write!(f, "pomodoro"),
            SceneId::LIBRARY => write!(f, "library"),
            SceneId::HOUSE => write!(f, "house"),
            SceneId(other) => write!(f, "scene#{}", other),
        }
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scene(pub SceneId);

impl Scene {
    pub fn id(&self) -> SceneId {
        self.0
    }
}
