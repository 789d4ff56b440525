//! Event types and observers used by the game.
//!
//! Submodules:
//! - [`audio`] – commands and messages for the background audio thread
//! - [`switchdebug`] – toggle debug rendering and diagnostics on/off
pub mod audio;
pub mod switchdebug;
