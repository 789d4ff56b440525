//! Debug toggle resource.
//!
//! While present the render pass draws hitbox and zone outlines and the
//! diagnostics panel. F1 flips it through
//! [`SwitchDebugEvent`](crate::events::switchdebug::SwitchDebugEvent).

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy)]
pub struct DebugMode {}
