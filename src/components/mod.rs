//! ECS components for entities.
//!
//! Components are plain data records; systems in [`crate::systems`] give them
//! behaviour. Most entities carry only a handful of them, so every system
//! treats a missing component as the normal case.
//!
//! Submodules overview:
//! - [`aiwander`] – timer-driven random walk parameters and state
//! - [`animation`] – cyclic frame timer over a sprite sheet
//! - [`background`] – marker for full-screen backdrop sprites
//! - [`building`] – building entrances and interior descriptors
//! - [`exitdoor`] – interior door leading back to the town
//! - [`hitbox`] – solid rectangle that blocks movement
//! - [`interactable`] – interior objects the player can use
//! - [`interactionzone`] – non-blocking proximity rectangle
//! - [`library`] – eBook list state for the library overlay
//! - [`player`] – tag for the user-controlled entity
//! - [`playerinput`] – manual/autonomous control flags and freeze latch
//! - [`position`] – authoritative top-left coordinates
//! - [`scene`] – scene ids and the scene partition tag
//! - [`speechbubble`] – transient text over an entity
//! - [`sprite`] – texture key, size and tint
//! - [`todolist`] – task list state for the desk overlay

pub mod aiwander;
pub mod animation;
pub mod background;
pub mod building;
pub mod exitdoor;
pub mod hitbox;
pub mod interactable;
pub mod interactionzone;
pub mod library;
pub mod player;
pub mod playerinput;
pub mod position;
pub mod scene;
pub mod speechbubble;
pub mod sprite;
pub mod todolist;
