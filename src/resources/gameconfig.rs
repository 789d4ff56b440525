//! Game configuration resource.
//!
//! Settings loaded from an INI configuration file. Defaults are safe to start
//! with; every key is optional and a missing file only costs a log line.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1280
//! height = 800
//! target_fps = 60
//!
//! [layout]
//! gui_height = 400
//! game_height = 400
//!
//! [pomodoro]
//! study_seconds = 1500
//! break_seconds = 300
//! cycles = 1
//!
//! [audio]
//! music_volume = 0.5
//! fx_volume = 0.8
//!
//! [data]
//! library = data/library.json
//! todo = data/todolist.json
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use crate::resources::datapaths::DataPaths;
use crate::resources::pomodoro::{BREAK_DURATION, MIN_CYCLES, PomodoroTimer, STUDY_DURATION};
use crate::resources::screensize::ScreenSize;

const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 800;
const DEFAULT_GUI_HEIGHT: u32 = 400;
const DEFAULT_GAME_HEIGHT: u32 = 400;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_MUSIC_VOLUME: f32 = 0.5;
const DEFAULT_FX_VOLUME: f32 = 0.8;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    /// Height of the GUI band above an interior's game area.
    pub gui_height: u32,
    pub game_height: u32,
    pub study_seconds: u64,
    pub break_seconds: u64,
    pub cycles: u32,
    pub music_volume: f32,
    pub fx_volume: f32,
    pub library_path: PathBuf,
    pub todo_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        let data = DataPaths::default();
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            gui_height: DEFAULT_GUI_HEIGHT,
            game_height: DEFAULT_GAME_HEIGHT,
            study_seconds: STUDY_DURATION.as_secs(),
            break_seconds: BREAK_DURATION.as_secs(),
            cycles: MIN_CYCLES,
            music_volume: DEFAULT_MUSIC_VOLUME,
            fx_volume: DEFAULT_FX_VOLUME,
            library_path: data.library,
            todo_path: data.todo,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }

        // [layout] section
        if let Some(gui) = config.getuint("layout", "gui_height").ok().flatten() {
            self.gui_height = gui as u32;
        }
        if let Some(game) = config.getuint("layout", "game_height").ok().flatten() {
            self.game_height = game as u32;
        }

        // [pomodoro] section
        if let Some(study) = config.getuint("pomodoro", "study_seconds").ok().flatten() {
            self.study_seconds = study;
        }
        if let Some(brk) = config.getuint("pomodoro", "break_seconds").ok().flatten() {
            self.break_seconds = brk;
        }
        if let Some(cycles) = config.getuint("pomodoro", "cycles").ok().flatten() {
            self.cycles = cycles as u32;
        }

        // [audio] section
        if let Some(vol) = config.getfloat("audio", "music_volume").ok().flatten() {
            self.music_volume = (vol as f32).clamp(0.0, 1.0);
        }
        if let Some(vol) = config.getfloat("audio", "fx_volume").ok().flatten() {
            self.fx_volume = (vol as f32).clamp(0.0, 1.0);
        }

        // [data] section
        if let Some(path) = config.get("data", "library") {
            self.library_path = PathBuf::from(path);
        }
        if let Some(path) = config.get("data", "todo") {
            self.todo_path = PathBuf::from(path);
        }

        info!(
            "Loaded config: {}x{} window, fps={}, gui={} game={}, study={}s break={}s cycles={}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.gui_height,
            self.game_height,
            self.study_seconds,
            self.break_seconds,
            self.cycles
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));

        config.set("layout", "gui_height", Some(self.gui_height.to_string()));
        config.set("layout", "game_height", Some(self.game_height.to_string()));

        config.set("pomodoro", "study_seconds", Some(self.study_seconds.to_string()));
        config.set("pomodoro", "break_seconds", Some(self.break_seconds.to_string()));
        config.set("pomodoro", "cycles", Some(self.cycles.to_string()));

        config.set("audio", "music_volume", Some(self.music_volume.to_string()));
        config.set("audio", "fx_volume", Some(self.fx_volume.to_string()));

        config.set(
            "data",
            "library",
            Some(self.library_path.to_string_lossy().into_owned()),
        );
        config.set(
            "data",
            "todo",
            Some(self.todo_path.to_string_lossy().into_owned()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Point both data files at `dir`, keeping their file names.
    pub fn set_data_dir(&mut self, dir: impl Into<PathBuf>) {
        let paths = DataPaths::in_dir(dir.into());
        self.library_path = paths.library;
        self.todo_path = paths.todo;
    }

    pub fn screen_size(&self) -> ScreenSize {
        ScreenSize {
            w: self.window_width as f32,
            h: self.window_height as f32,
            gui_height: self.gui_height as f32,
            game_height: self.game_height as f32,
        }
    }

    pub fn data_paths(&self) -> DataPaths {
        DataPaths {
            library: self.library_path.clone(),
            todo: self.todo_path.clone(),
        }
    }

    pub fn pomodoro_timer(&self) -> PomodoroTimer {
        let mut timer = PomodoroTimer::with_durations(
            Duration::from_secs(self.study_seconds),
            Duration::from_secs(self.break_seconds),
        );
        timer.set_cycle_count(self.cycles);
        timer
    }
}
