//! Scene transitions.
//!
//! The town is the hub of a star: every interior is reachable from
//! [`SceneId::MAIN`] only, and every interior leads back to it.
//!
//! - [`enter_building`] snapshots the player's position, switches scene,
//!   places the player at the spawn point and repairs any overlap with the
//!   interior's hitboxes by nudging right.
//! - [`exit_to_main`] restores the snapshot. It does not nudge: the snapshot
//!   was a valid town position when it was taken.

use bevy_ecs::prelude::*;
use log::{debug, info};
use raylib::prelude::Rectangle;

use crate::components::aiwander::AIWander;
use crate::components::hitbox::{Hitbox, rects_overlap};
use crate::components::playerinput::PlayerInput;
use crate::components::player::Player;
use crate::components::position::Position;
use crate::components::scene::{Scene, SceneId};
use crate::components::sprite::Sprite;
use crate::resources::scenestate::SceneState;
use crate::resources::screensize::ScreenSize;

/// Horizontal step of the placement repair on enter.
pub const ENTER_NUDGE_STEP: f32 = 8.0;
/// Horizontal step of the placement repair at startup.
pub const STARTUP_NUDGE_STEP: f32 = 16.0;
pub const NUDGE_MAX_ATTEMPTS: u32 = 50;

pub fn find_player(world: &mut World) -> Option<Entity> {
    world
        .query_filtered::<Entity, With<Player>>()
        .iter(world)
        .next()
}

/// Fixed spawn point inside any interior: horizontally centered, three
/// quarters down the game area, lifted by half the player's height.
pub fn interior_spawn_point(screen: &ScreenSize, player_height: f32) -> Position {
    Position::new(
        screen.w / 2.0,
        screen.game_height * 0.75 - player_height / 2.0,
    )
}

/// Move `entity` right by `step` until its hitbox clears every hitbox of
/// `scene`, giving up after `max_attempts`. Returns the number of nudges.
pub fn nudge_until_clear(
    world: &mut World,
    entity: Entity,
    scene: SceneId,
    step: f32,
    max_attempts: u32,
) -> u32 {
    let (Some(mut pos), Some(hitbox)) = (
        world.get::<Position>(entity).copied(),
        world.get::<Hitbox>(entity).copied(),
    ) else {
        return 0;
    };

    let obstacles: Vec<Rectangle> = world
        .query::<(Entity, &Position, &Hitbox, &Scene)>()
        .iter(world)
        .filter(|(other, _, _, s)| *other != entity && s.id() == scene)
        .map(|(_, p, hb, _)| hb.bounds_at(p.as_vec()))
        .collect();

    let mut rect = hitbox.bounds_at(pos.as_vec());
    let mut nudges = 0;
    while nudges < max_attempts && obstacles.iter().any(|o| rects_overlap(&rect, o)) {
        pos.x += step;
        rect = hitbox.bounds_at(pos.as_vec());
        nudges += 1;
    }

    if let Some(mut p) = world.get_mut::<Position>(entity) {
        *p = pos;
    }
    if let Some(mut hb) = world.get_mut::<Hitbox>(entity) {
        hb.bounds = rect;
    }
    if nudges > 0 {
        debug!("placement repair moved {:?} by {} px", entity, nudges as f32 * step);
    }
    nudges
}

/// Enter `target` from the town. A no-op outside [`SceneId::MAIN`].
pub fn enter_building(world: &mut World, player: Entity, target: SceneId, spawn: Position) -> bool {
    let current = world.resource::<SceneState>().current;
    if !current.is_main() {
        debug!("enter {} ignored: already inside {}", target, current);
        return false;
    }
    if target.is_main() {
        return false;
    }
    let Some(snapshot) = world.get::<Position>(player).copied() else {
        return false;
    };

    world.resource_scope(|world, mut state: Mut<SceneState>| {
        state.return_point = Some(snapshot);
        state.current = target;
        if let Some(mut pos) = world.get_mut::<Position>(player) {
            *pos = spawn;
        }
        if let Some(mut hb) = world.get_mut::<Hitbox>(player) {
            hb.sync(spawn.as_vec());
        }
    });

    let autonomous = world
        .get::<PlayerInput>(player)
        .is_some_and(|control| !control.controlled);
    if autonomous {
        world.entity_mut(player).insert(AIWander::standard());
    }

    nudge_until_clear(world, player, target, ENTER_NUDGE_STEP, NUDGE_MAX_ATTEMPTS);
    info!("entered {} from ({:.0}, {:.0})", target, snapshot.x, snapshot.y);
    true
}

/// Return to the town, restoring the snapshot taken on enter.
pub fn exit_to_main(world: &mut World, player: Entity) -> bool {
    let restore = world.resource_scope(|_, mut state: Mut<SceneState>| {
        if state.is_main() {
            return None;
        }
        let from = state.current;
        state.current = SceneId::MAIN;
        Some((from, state.return_point.take()))
    });
    let Some((from, return_point)) = restore else {
        return false;
    };

    if let Some(point) = return_point {
        if let Some(mut pos) = world.get_mut::<Position>(player) {
            *pos = point;
        }
        if let Some(mut hb) = world.get_mut::<Hitbox>(player) {
            hb.sync(point.as_vec());
        }
    }
    info!("left {} for the town", from);
    true
}

/// Middle of the walkable area of `scene`, used by the F3 teleport. The spot
/// may sit on furniture; callers repair it with [`nudge_until_clear`].
pub fn safe_spot(scene: SceneId, screen: &ScreenSize) -> Position {
    let y = if scene.is_main() {
        screen.h / 2.0
    } else {
        screen.game_height / 2.0
    };
    Position::new(screen.w / 2.0, y)
}

/// Player height used for the spawn point: sprite first, hitbox otherwise.
pub fn player_height(world: &World, player: Entity) -> f32 {
    world
        .get::<Sprite>(player)
        .map(|s| s.height)
        .or_else(|| world.get::<Hitbox>(player).map(|h| h.height))
        .unwrap_or(0.0)
}
