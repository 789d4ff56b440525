//! Interaction system.
//!
//! Edge-triggered on key-down: the exit action (Z) leaves an interior when
//! the player stands in an exit door's zone; the activate action (X) enters
//! the building whose zone the player stands in, or uses the interior objects
//! flagged by this frame's proximity pass.
//!
//! Both are letter keys, so neither fires while an overlay takes typed text.
//!
//! Starting a study session is not handled here: the driver owns it because
//! it also freezes the player and plays a sound.

use bevy_ecs::prelude::*;
use log::debug;
use raylib::prelude::Rectangle;

use crate::components::building::Building;
use crate::components::exitdoor::ExitDoor;
use crate::components::hitbox::{Hitbox, rects_overlap};
use crate::components::interactable::{Interactable, InteractionKind};
use crate::components::interactionzone::InteractionZone;
use crate::components::library::LibraryData;
use crate::components::scene::{Scene, SceneId};
use crate::components::speechbubble::SpeechBubble;
use crate::components::todolist::TodoListData;
use crate::resources::input::InputState;
use crate::resources::scenestate::SceneState;
use crate::resources::screensize::ScreenSize;
use crate::systems::gui::captures_text;
use crate::systems::scene::{
    enter_building, exit_to_main, find_player, interior_spawn_point, player_height,
};

/// Building entered by the activate action, last in creation order when
/// several zones overlap, matching the prompt the collision pass shows.
fn building_under_player(world: &mut World, player_bounds: &Rectangle) -> Option<SceneId> {
    world
        .query::<(Entity, &Building, &InteractionZone, &Scene)>()
        .iter(world)
        .filter(|(_, _, zone, scene)| {
            scene.id().is_main() && rects_overlap(&zone.bounds, player_bounds)
        })
        .max_by_key(|(entity, ..)| *entity)
        .map(|(_, building, _, _)| building.interior)
}

fn door_under_player(world: &mut World, current: SceneId, player_bounds: &Rectangle) -> bool {
    world
        .query::<(&ExitDoor, &InteractionZone, &Scene)>()
        .iter(world)
        .any(|(_, zone, scene)| scene.id() == current && rects_overlap(&zone.bounds, player_bounds))
}

pub fn interaction_system(world: &mut World) {
    let (activate, exit) = {
        let input = world.resource::<InputState>();
        (input.activate.just_pressed, input.exit.just_pressed)
    };
    if !activate && !exit {
        return;
    }
    let typing = {
        let libraries: Vec<&LibraryData> = world.query::<&LibraryData>().iter(world).collect();
        let lists: Vec<&TodoListData> = world.query::<&TodoListData>().iter(world).collect();
        captures_text(libraries, lists)
    };
    if typing {
        return;
    }
    let Some(player) = find_player(world) else {
        return;
    };
    let Some(player_bounds) = world.get::<Hitbox>(player).map(|hb| hb.bounds) else {
        return;
    };
    let current = world.resource::<SceneState>().current;

    if exit && current.is_interior() && door_under_player(world, current, &player_bounds) {
        exit_to_main(world, player);
        return;
    }

    if !activate {
        return;
    }

    if current.is_main() {
        if let Some(target) = building_under_player(world, &player_bounds) {
            let screen = *world.resource::<ScreenSize>();
            let spawn = interior_spawn_point(&screen, player_height(world, player));
            enter_building(world, player, target, spawn);
        }
        return;
    }

    let near: Vec<(InteractionKind, String)> = world
        .query::<(&Interactable, &Scene)>()
        .iter(world)
        .filter(|(item, scene)| item.is_player_near && scene.id() == current)
        .map(|(item, _)| (item.kind, item.prompt.clone()))
        .collect();

    for (kind, prompt) in near {
        match kind {
            InteractionKind::Library => {
                let mut libraries = world.query::<&mut LibraryData>();
                if let Some(mut library) = libraries.iter_mut(world).next() {
                    library.is_showing_ui = true;
                    debug!("library overlay opened");
                }
            }
            InteractionKind::TodoList => {
                let mut lists = world.query::<&mut TodoListData>();
                if let Some(mut todo) = lists.iter_mut(world).next() {
                    todo.is_showing_ui = true;
                    debug!("todo overlay opened");
                }
            }
            InteractionKind::Pomodoro => {
                if let Some(mut bubble) = world.get_mut::<SpeechBubble>(player) {
                    bubble.show(prompt);
                }
            }
        }
    }
}
