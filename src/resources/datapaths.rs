use bevy_ecs::prelude::Resource;
use std::path::{Path, PathBuf};

pub const LIBRARY_FILE: &str = "library.json";
pub const TODO_FILE: &str = "todolist.json";

/// Backing files of the library and to-do overlays.
#[derive(Resource, Debug, Clone)]
pub struct DataPaths {
    pub library: PathBuf,
    pub todo: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::in_dir("data")
    }
}

impl DataPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            library: dir.join(LIBRARY_FILE),
            todo: dir.join(TODO_FILE),
        }
    }
}
