//! Task Town library.
//!
//! A small top-down town where each building hosts a productivity tool: a
//! Pomodoro timer, an eBook library and a to-do list. This crate exposes the
//! ECS components, resources, systems and events for the executable and the
//! integration tests.

pub mod components;
pub mod events;
pub mod game;
pub mod persistence;
pub mod resources;
pub mod systems;
