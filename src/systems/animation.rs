//! Animation system.
//!
//! [`animation`] counts every [`Animation`] timer down by the frame delta and
//! wraps the frame index. The renderer reads
//! [`Animation::source_x`](crate::components::animation::Animation::source_x)
//! to pick the sheet cell.

use bevy_ecs::prelude::*;

use crate::components::animation::Animation;
use crate::resources::worldtime::WorldTime;

/// Advance animation playback.
///
/// Contract
/// - Reads [`WorldTime`] for the frame delta.
/// - At most one frame advance per call, whatever the delta.
pub fn animation(mut query: Query<&mut Animation>, time: Res<WorldTime>) {
    for mut anim in query.iter_mut() {
        anim.advance(time.delta);
    }
}
