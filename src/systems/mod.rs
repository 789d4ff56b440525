//! Game systems.
//!
//! Every per-frame step of the town lives here. `main` chains them in a
//! single schedule; the order matters and is documented there.
//!
//! Submodules overview
//! - [`animation`] – advance sprite sheet frames
//! - [`audio`] – bridge with the audio thread (poll/update message queues)
//! - [`collision`] – recompute bounds and raise proximity prompts
//! - [`controlmode`] – manual/wander switching and the unstuck teleport
//! - [`driver`] – study session start, Pomodoro tick, freeze latch, door sounds
//! - [`gui`] – overlay layouts and mouse/keyboard handling of the panels
//! - [`input`] – read hardware input and update [`crate::resources::input::InputState`]
//! - [`interaction`] – activate/exit actions
//! - [`movement`] – manual and wander movement with collision rollback
//! - [`render`] – draw the town, interiors, overlays and debug info using Raylib
//! - [`scene`] – enter/exit transitions and placement repair
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod audio;
pub mod collision;
pub mod controlmode;
pub mod driver;
pub mod gui;
pub mod input;
pub mod interaction;
pub mod movement;
pub mod render;
pub mod scene;
pub mod time;
