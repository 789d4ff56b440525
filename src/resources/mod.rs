//! ECS resources made available to systems.
//!
//! Long-lived data injected into the world and read by systems during a
//! frame: input, timing, scene state, the Pomodoro timer, asset stores and
//! configuration.
//!
//! Overview
//! - `audio` – bridge and channels for the background audio thread, slider volumes
//! - `datapaths` – backing files of the library and to-do lists
//! - `debugmode` – presence toggles the debug overlay
//! - `driverstate` – what the driver compares across frames
//! - `entityregistry` – creation-ordered entity list and the store contract
//! - `gameconfig` – INI configuration
//! - `input` – per-frame keyboard and pointer state
//! - `pomodoro` – study/break timer state machine
//! - `scenestate` – active scene and return point
//! - `screensize` – screen and interior layout in pixels
//! - `texturestore` – loaded textures keyed by asset path
//! - `worldtime` – simulation time and delta
pub mod audio;
pub mod datapaths;
pub mod debugmode;
pub mod driverstate;
pub mod entityregistry;
pub mod gameconfig;
pub mod input;
pub mod pomodoro;
pub mod scenestate;
pub mod screensize;
pub mod texturestore;
pub mod worldtime;
