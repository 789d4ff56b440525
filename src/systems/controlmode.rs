//! Control mode and developer shortcuts.
//!
//! - M or the "Manual" button hands the player to the keyboard.
//! - W or the "Wander" button makes the player autonomous, granting an
//!   [`AIWander`] when it has none.
//! - T toggles between the two. Switching to manual this way also releases
//!   the study freeze, which the driver's latch turns into a session reset.
//! - F3 drops the player in the middle of the current scene, then nudges it
//!   right until it clears every hitbox there.
//!
//! Letter shortcuts are ignored while an overlay captures typed text.

use bevy_ecs::prelude::*;
use log::info;
use raylib::prelude::Vector2;

use crate::components::aiwander::AIWander;
use crate::components::hitbox::Hitbox;
use crate::components::library::LibraryData;
use crate::components::player::Player;
use crate::components::playerinput::PlayerInput;
use crate::components::position::Position;
use crate::components::todolist::TodoListData;
use crate::resources::input::InputState;
use crate::resources::scenestate::SceneState;
use crate::resources::screensize::ScreenSize;
use crate::systems::gui::{captures_text, control_panel_buttons, point_in_rect};
use crate::systems::scene::{ENTER_NUDGE_STEP, NUDGE_MAX_ATTEMPTS, nudge_until_clear, safe_spot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeRequest {
    Manual,
    Wander,
    Toggle,
}

pub fn control_mode_system(
    input: Res<InputState>,
    scene: Res<SceneState>,
    screen: Res<ScreenSize>,
    mut commands: Commands,
    mut players: Query<(Entity, &mut PlayerInput, Has<AIWander>), With<Player>>,
    mut bodies: Query<(Entity, &mut Position, Option<&mut Hitbox>), With<Player>>,
    libraries: Query<&LibraryData>,
    lists: Query<&TodoListData>,
) {
    let typing = captures_text(&libraries, &lists);

    let click = |target: raylib::prelude::Rectangle| {
        input.pointer.left_pressed && point_in_rect(input.pointer.position, &target)
    };
    let (manual_btn, wander_btn) = control_panel_buttons(&screen);

    let request = if click(manual_btn) || (!typing && input.manual_mode.just_pressed) {
        Some(ModeRequest::Manual)
    } else if click(wander_btn) || (!typing && input.wander_mode.just_pressed) {
        Some(ModeRequest::Wander)
    } else if !typing && input.toggle_mode.just_pressed {
        Some(ModeRequest::Toggle)
    } else {
        None
    };

    if let Some(request) = request {
        for (entity, mut control, has_wander) in players.iter_mut() {
            let manual = match request {
                ModeRequest::Manual => true,
                ModeRequest::Wander => false,
                ModeRequest::Toggle => !control.controlled,
            };
            control.controlled = manual;
            if manual {
                if request == ModeRequest::Toggle {
                    control.frozen = false;
                }
            } else if !has_wander {
                commands.entity(entity).insert(AIWander::standard());
            }
            info!(
                "player control: {}",
                if manual { "manual" } else { "wander" }
            );
        }
    }

    if input.teleport.just_pressed {
        let target = safe_spot(scene.current, &screen);
        let current = scene.current;
        for (entity, mut pos, hitbox) in bodies.iter_mut() {
            *pos = target;
            if let Some(mut hb) = hitbox {
                hb.sync(Vector2::new(target.x, target.y));
            }
            // the middle of an interior can sit on its furniture
            commands.queue(move |world: &mut World| {
                nudge_until_clear(world, entity, current, ENTER_NUDGE_STEP, NUDGE_MAX_ATTEMPTS);
            });
        }
    }
}
