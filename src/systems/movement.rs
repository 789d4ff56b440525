//! Movement systems.
//!
//! Two sources feed [`Position`]:
//! - [`player_input_movement`] applies held arrow keys to entities whose
//!   [`PlayerInput`] is in manual mode;
//! - [`ai_wander_movement`] drives [`AIWander`] entities that are not under
//!   manual control.
//!
//! Both test the moved hitbox against every other hitbox of the mover's scene
//! and clamp the result into the scene's envelope. Manual movement rolls back
//! fully on contact; wandering degrades to X-only, then Y-only, before giving
//! up for the current walk.
//!
//! Diagonal manual movement is deliberately not normalized.

use bevy_ecs::prelude::*;
use fastrand::Rng;
use raylib::prelude::{Rectangle, Vector2};

use crate::components::aiwander::AIWander;
use crate::components::hitbox::{Hitbox, rects_overlap};
use crate::components::playerinput::PlayerInput;
use crate::components::position::Position;
use crate::components::scene::{Scene, SceneId};
use crate::components::sprite::Sprite;
use crate::resources::input::InputState;
use crate::resources::scenestate::SceneState;
use crate::resources::screensize::ScreenSize;
use crate::resources::worldtime::WorldTime;

/// Per-axis component below which a random wander sample counts as "near zero".
const WANDER_MIN_COMPONENT: f32 = 0.2;
const WANDER_SNAP_COMPONENT: f32 = 0.5;

/// A blocking rectangle captured at the start of a movement pass.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub entity: Entity,
    pub scene: SceneId,
    pub rect: Rectangle,
}

/// Valid coordinate range for an entity's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Envelope {
    /// In the town the whole screen is walkable. In an interior `y` may go
    /// up to `-gui_height` so the character can walk into the GUI half.
    pub fn for_scene(scene: SceneId, screen: &ScreenSize, width: f32, height: f32) -> Self {
        let max_x = (screen.w - width).max(0.0);
        if scene.is_main() {
            Self {
                min_x: 0.0,
                max_x,
                min_y: 0.0,
                max_y: (screen.h - height).max(0.0),
            }
        } else {
            let min_y = -screen.gui_height;
            Self {
                min_x: 0.0,
                max_x,
                min_y,
                max_y: (screen.game_height - height).max(min_y),
            }
        }
    }

    pub fn clamp(&self, pos: &mut Position) {
        pos.x = pos.x.clamp(self.min_x, self.max_x);
        pos.y = pos.y.clamp(self.min_y, self.max_y);
    }
}

/// Snapshot every hitbox that belongs to a scene.
pub fn collect_obstacles(query: &Query<(Entity, &Position, &Hitbox, &Scene)>) -> Vec<Obstacle> {
    query
        .iter()
        .map(|(entity, pos, hitbox, scene)| Obstacle {
            entity,
            scene: scene.id(),
            rect: hitbox.bounds_at(pos.as_vec()),
        })
        .collect()
}

/// True when `rect` overlaps any obstacle of `scene` other than `entity`.
pub fn is_blocked(rect: &Rectangle, entity: Entity, scene: SceneId, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|o| o.entity != entity && o.scene == scene && rects_overlap(rect, &o.rect))
}

fn refresh_obstacle(obstacles: &mut [Obstacle], entity: Entity, rect: Rectangle) {
    if let Some(o) = obstacles.iter_mut().find(|o| o.entity == entity) {
        o.rect = rect;
    }
}

fn body_size(sprite: Option<&Sprite>, hitbox: Option<&Hitbox>) -> (f32, f32) {
    match (sprite, hitbox) {
        (Some(s), _) => (s.width, s.height),
        (None, Some(h)) => (h.width, h.height),
        (None, None) => (0.0, 0.0),
    }
}

/// Unit wander direction from two samples in `[-1, 1]`.
///
/// Samples too close to the origin snap to the diagonal of their quadrant
/// before normalizing, so the result is never degenerate.
pub fn wander_direction(mut rx: f32, mut ry: f32) -> Vector2 {
    if rx.abs() < WANDER_MIN_COMPONENT && ry.abs() < WANDER_MIN_COMPONENT {
        rx = if rx < 0.0 { -WANDER_SNAP_COMPONENT } else { WANDER_SNAP_COMPONENT };
        ry = if ry < 0.0 { -WANDER_SNAP_COMPONENT } else { WANDER_SNAP_COMPONENT };
    }
    let len = (rx * rx + ry * ry).sqrt();
    Vector2::new(rx / len, ry / len)
}

/// Apply held direction keys to manually controlled entities.
///
/// A frozen entity gets no displacement. Holding a direction while frozen
/// releases the latch, and the entity walks again from the next frame on.
pub fn player_input_movement(
    input: Res<InputState>,
    time: Res<WorldTime>,
    scene: Res<SceneState>,
    screen: Res<ScreenSize>,
    mut set: ParamSet<(
        Query<(Entity, &Position, &Hitbox, &Scene)>,
        Query<(
            Entity,
            &mut Position,
            &mut PlayerInput,
            Option<&mut Hitbox>,
            Option<&Sprite>,
            Option<&Scene>,
        )>,
    )>,
) {
    let mut obstacles = collect_obstacles(&set.p0());
    let (dir_x, dir_y) = input.direction();
    let wants_move = dir_x != 0.0 || dir_y != 0.0;

    for (entity, mut pos, mut control, mut hitbox, sprite, own_scene) in set.p1().iter_mut() {
        if !control.controlled {
            continue;
        }
        let scene_id = own_scene.map(Scene::id).unwrap_or(scene.current);
        let before = *pos;

        if control.frozen {
            if wants_move {
                control.frozen = false;
                log::info!("movement released the study freeze");
            }
        } else if wants_move {
            pos.x += dir_x * control.speed * time.delta;
            pos.y += dir_y * control.speed * time.delta;
            if let Some(hb) = hitbox.as_deref_mut() {
                let before_bounds = hb.bounds;
                hb.sync(pos.as_vec());
                if is_blocked(&hb.bounds, entity, scene_id, &obstacles) {
                    *pos = before;
                    hb.bounds = before_bounds;
                }
            }
        }

        let (w, h) = body_size(sprite, hitbox.as_deref());
        Envelope::for_scene(scene_id, &screen, w, h).clamp(&mut pos);
        if let Some(hb) = hitbox.as_deref_mut() {
            if *pos != before {
                hb.sync(pos.as_vec());
            }
            refresh_obstacle(&mut obstacles, entity, hb.bounds);
        }
    }
}

/// Drive wandering entities that are not under manual control.
pub fn ai_wander_movement(
    time: Res<WorldTime>,
    scene: Res<SceneState>,
    screen: Res<ScreenSize>,
    mut rng: Local<Rng>,
    mut set: ParamSet<(
        Query<(Entity, &Position, &Hitbox, &Scene)>,
        Query<(
            Entity,
            &mut Position,
            &mut AIWander,
            Option<&PlayerInput>,
            Option<&mut Hitbox>,
            Option<&Sprite>,
            Option<&Scene>,
        )>,
    )>,
) {
    let mut obstacles = collect_obstacles(&set.p0());

    for (entity, mut pos, mut wander, control, mut hitbox, sprite, own_scene) in
        set.p1().iter_mut()
    {
        if let Some(control) = control {
            if control.controlled || control.frozen {
                continue;
            }
        }
        let scene_id = own_scene.map(Scene::id).unwrap_or(scene.current);

        wander.move_timer += time.delta;
        if wander.move_timer >= wander.current_move_time {
            wander.move_timer = 0.0;
            wander.is_moving = !wander.is_moving;
            let range = (wander.max_move_time - wander.min_move_time).max(0.0);
            wander.current_move_time = wander.min_move_time + rng.f32() * range;
            wander.direction = if wander.is_moving {
                wander_direction(rng.f32() * 2.0 - 1.0, rng.f32() * 2.0 - 1.0)
            } else {
                Vector2::zero()
            };
        }

        if !wander.is_moving {
            continue;
        }

        let step = Vector2::new(
            wander.direction.x * wander.speed * time.delta,
            wander.direction.y * wander.speed * time.delta,
        );
        let origin = *pos;
        if let Some(hb) = hitbox.as_deref_mut() {
            let attempts = [
                Position::new(origin.x + step.x, origin.y + step.y),
                Position::new(origin.x + step.x, origin.y),
                Position::new(origin.x, origin.y + step.y),
            ];
            let free = attempts.into_iter().find(|candidate| {
                !is_blocked(&hb.bounds_at(candidate.as_vec()), entity, scene_id, &obstacles)
            });
            match free {
                Some(target) => *pos = target,
                None => {
                    *pos = origin;
                    wander.is_moving = false;
                }
            }
        } else {
            pos.x += step.x;
            pos.y += step.y;
        }

        let (w, h) = body_size(sprite, hitbox.as_deref());
        Envelope::for_scene(scene_id, &screen, w, h).clamp(&mut pos);
        if let Some(hb) = hitbox.as_deref_mut() {
            hb.sync(pos.as_vec());
            refresh_obstacle(&mut obstacles, entity, hb.bounds);
        }
    }
}
