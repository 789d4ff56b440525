//! Collision and proximity pass.
//!
//! Runs every frame after movement and before interaction, in three strictly
//! ordered phases:
//! 1. recompute every [`Hitbox`] and [`InteractionZone`] from its owner's
//!    [`Position`];
//! 2. reset transient flags: hitbox contact, every [`SpeechBubble`], and the
//!    `is_player_near` flags of doors and interactables;
//! 3. test the player's hitbox against the zones of the active scene and
//!    raise prompts.
//!
//! In the town only [`Building`] zones matter and the last matching building
//! in creation order wins. Inside an interior every [`ExitDoor`] and
//! [`Interactable`] is tested independently.

use bevy_ecs::prelude::*;

use crate::components::building::Building;
use crate::components::exitdoor::ExitDoor;
use crate::components::hitbox::{Hitbox, rects_overlap};
use crate::components::interactable::Interactable;
use crate::components::interactionzone::InteractionZone;
use crate::components::player::Player;
use crate::components::position::Position;
use crate::components::scene::Scene;
use crate::components::speechbubble::{DEFAULT_BUBBLE_OFFSET, EXIT_PROMPT_OFFSET, SpeechBubble};
use crate::resources::scenestate::SceneState;

type BodyQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Position,
        Option<&'static mut Hitbox>,
        Option<&'static mut InteractionZone>,
        Option<&'static Scene>,
        Option<&'static Building>,
    ),
>;

pub fn collision_system(
    scene: Res<SceneState>,
    mut bodies: BodyQuery,
    mut bubbles: Query<&mut SpeechBubble>,
    mut doors: Query<(Entity, &mut ExitDoor)>,
    mut interactables: Query<(Entity, &mut Interactable)>,
    players: Query<Entity, With<Player>>,
) {
    // 1) bounds from positions
    for (_, pos, hitbox, zone, _, _) in bodies.iter_mut() {
        if let Some(mut hb) = hitbox {
            hb.sync(pos.as_vec());
            hb.colliding = false;
        }
        if let Some(mut zone) = zone {
            zone.sync(pos.as_vec());
        }
    }

    // 2) transient flags
    for mut bubble in bubbles.iter_mut() {
        bubble.clear();
    }
    for (_, mut door) in doors.iter_mut() {
        door.is_player_near = false;
    }
    for (_, mut item) in interactables.iter_mut() {
        item.is_player_near = false;
    }

    // 3) proximity
    let Some(player) = players.iter().next() else {
        return;
    };
    let Some(player_bounds) = bodies
        .get(player)
        .ok()
        .and_then(|(_, _, hb, _, _, _)| hb.map(|hb| hb.bounds))
    else {
        return;
    };
    let current = scene.current;

    let zone_hit = |entity: Entity| -> bool {
        bodies
            .get(entity)
            .ok()
            .filter(|(_, _, _, _, s, _)| s.map(|s| s.id()) == Some(current))
            .and_then(|(_, _, _, zone, _, _)| zone.map(|z| rects_overlap(&z.bounds, &player_bounds)))
            .unwrap_or(false)
    };

    if current.is_main() {
        let entered = bodies
            .iter()
            .filter(|(entity, _, _, zone, s, building)| {
                *entity != player
                    && building.is_some()
                    && s.map(|s| s.id()) == Some(current)
                    && zone.is_some_and(|z| rects_overlap(&z.bounds, &player_bounds))
            })
            .max_by_key(|(entity, ..)| *entity)
            .and_then(|(_, _, _, _, _, building)| building.map(Building::prompt));
        if let Some(prompt) = entered {
            if let Ok(mut bubble) = bubbles.get_mut(player) {
                bubble.show_at(prompt, DEFAULT_BUBBLE_OFFSET);
            }
        }
    } else {
        let mut door_prompt = None;
        for (entity, mut door) in doors.iter_mut() {
            if zone_hit(entity) {
                door.is_player_near = true;
                door_prompt = Some(door.display_text.clone());
            }
        }
        if let Some(text) = door_prompt {
            if let Ok(mut bubble) = bubbles.get_mut(player) {
                bubble.show_at(text, EXIT_PROMPT_OFFSET);
            }
        }

        for (entity, mut item) in interactables.iter_mut() {
            if zone_hit(entity) {
                item.is_player_near = true;
                if let Ok(mut bubble) = bubbles.get_mut(entity) {
                    bubble.show(item.prompt.clone());
                }
            }
        }
    }

    // contact flags for the debug overlay
    let touching: Vec<Entity> = bodies
        .iter()
        .filter(|(entity, _, hb, _, s, _)| {
            *entity != player
                && s.map(|s| s.id()) == Some(current)
                && hb.is_some_and(|hb| rects_overlap(&hb.bounds, &player_bounds))
        })
        .map(|(entity, ..)| entity)
        .collect();
    if !touching.is_empty() {
        for entity in touching.into_iter().chain(std::iter::once(player)) {
            if let Ok((_, _, Some(mut hb), _, _, _)) = bodies.get_mut(entity) {
                hb.colliding = true;
            }
        }
    }
}
