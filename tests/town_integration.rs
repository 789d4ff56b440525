//! Town tick integration tests: collision bounds, movement, scene transitions
//! and interaction.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use tasktown::components::aiwander::AIWander;
use tasktown::components::animation::Animation;
use tasktown::components::building::Building;
use tasktown::components::exitdoor::ExitDoor;
use tasktown::components::hitbox::Hitbox;
use tasktown::components::interactable::{Interactable, InteractionKind};
use tasktown::components::interactionzone::InteractionZone;
use tasktown::components::library::LibraryData;
use tasktown::components::player::Player;
use tasktown::components::playerinput::PlayerInput;
use tasktown::components::position::Position;
use tasktown::components::scene::{Scene, SceneId};
use tasktown::components::speechbubble::{DEFAULT_BUBBLE_OFFSET, EXIT_PROMPT_OFFSET, SpeechBubble};
use tasktown::game::init_world;
use tasktown::resources::entityregistry::TownWorld;
use tasktown::resources::gameconfig::GameConfig;
use tasktown::resources::input::{BoolState, InputState};
use tasktown::resources::scenestate::SceneState;
use tasktown::resources::screensize::ScreenSize;
use tasktown::resources::worldtime::WorldTime;
use tasktown::systems::animation::animation;
use tasktown::systems::collision::collision_system;
use tasktown::systems::interaction::interaction_system;
use tasktown::systems::movement::{ai_wander_movement, player_input_movement};
use tasktown::systems::scene::{
    ENTER_NUDGE_STEP, enter_building, exit_to_main, interior_spawn_point,
};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world(delta: f32) -> World {
    let mut world = init_world(&GameConfig::new());
    world.insert_resource(WorldTime::default().with_delta(delta));
    world
}

fn tick_collision(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(collision_system);
    schedule.run(world);
}

fn tick_interaction(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(interaction_system);
    schedule.run(world);
}

fn tick_manual(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(player_input_movement);
    schedule.run(world);
}

fn tick_wander(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(ai_wander_movement);
    schedule.run(world);
}

fn tick_animation(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(animation);
    schedule.run(world);
}

fn press(world: &mut World, key: impl Fn(&mut InputState) -> &mut BoolState) {
    let mut input = world.resource_mut::<InputState>();
    key(&mut *input).press();
}

fn release_all(world: &mut World) {
    let mut input = world.resource_mut::<InputState>();
    for key in input.keys_mut() {
        key.active = false;
        key.settle();
    }
}

/// Player with a 64x64 hitbox and a speech bubble, under keyboard control.
fn spawn_player(world: &mut World, x: f32, y: f32) -> Entity {
    let e = world.create_entity();
    world.add(e, Position::new(x, y));
    let mut hitbox = Hitbox::new(64.0, 64.0);
    hitbox.sync(Vector2::new(x, y));
    world.add(e, hitbox);
    world.add(e, PlayerInput::new(200.0));
    world.add(e, SpeechBubble::default());
    world.add(e, Player);
    e
}

fn spawn_block(world: &mut World, scene: SceneId, x: f32, y: f32, w: f32, h: f32) -> Entity {
    let e = world.create_entity();
    world.add(e, Position::new(x, y));
    world.add(e, Hitbox::new(w, h));
    world.add(e, Scene(scene));
    e
}

fn spawn_building(world: &mut World, name: &str, interior: SceneId, x: f32, margin: f32) -> Entity {
    let e = spawn_block(world, SceneId::MAIN, x, 150.0, 100.0, 120.0);
    world.add(e, InteractionZone::around(100.0, 120.0, margin));
    world.add(e, Building::new(name, interior));
    world.add(e, SpeechBubble::default());
    e
}

fn position(world: &World, e: Entity) -> Position {
    *world.get::<Position>(e).expect("position")
}

#[test]
fn bounds_follow_positions_after_collision_pass() {
    let mut world = make_world(0.0);
    let player = spawn_player(&mut world, 10.0, 20.0);
    let block = spawn_block(&mut world, SceneId::MAIN, 300.0, 310.0, 40.0, 40.0);
    world.add(block, InteractionZone::around(40.0, 40.0, 15.0));
    world.get_mut::<Position>(player).expect("position").x = 77.0;

    tick_collision(&mut world);

    for (pos, hb) in world.query::<(&Position, &Hitbox)>().iter(&world) {
        assert_eq!(hb.bounds.x, pos.x);
        assert_eq!(hb.bounds.y, pos.y);
    }
    let zone = world.get::<InteractionZone>(block).expect("zone");
    assert_eq!(zone.bounds.x, 285.0);
    assert_eq!(zone.bounds.y, 295.0);
}

fn spawn_door(world: &mut World, scene: SceneId, x: f32, y: f32) -> Entity {
    let door = world.create_entity();
    world.add(door, Position::new(x, y));
    world.add(door, InteractionZone::around(30.0, 40.0, 10.0));
    world.add(door, ExitDoor::new("Exit (Z)"));
    world.add(door, Scene(scene));
    door
}

fn bubble(world: &World, e: Entity) -> SpeechBubble {
    world.get::<SpeechBubble>(e).expect("bubble").clone()
}

#[test]
fn building_prompt_clears_once_player_walks_away() {
    let mut world = make_world(0.0);
    let player = spawn_player(&mut world, 250.0, 150.0);
    spawn_building(&mut world, "Shop", SceneId::POMODORO, 300.0, 20.0);

    tick_collision(&mut world);
    let prompt = bubble(&world, player);
    assert!(prompt.active);
    assert_eq!(prompt.text, "Enter\nShop? (X)");
    assert_eq!(prompt.offset, DEFAULT_BUBBLE_OFFSET);

    world.get_mut::<Position>(player).expect("position").y = 500.0;
    tick_collision(&mut world);
    let prompt = bubble(&world, player);
    assert!(!prompt.active);
    assert!(prompt.text.is_empty());
}

#[test]
fn interior_prompts_go_to_their_owners() {
    let mut world = make_world(0.0);
    world.resource_mut::<SceneState>().current = SceneId::LIBRARY;
    let player = spawn_player(&mut world, 600.0, 300.0);
    let door = spawn_door(&mut world, SceneId::LIBRARY, 610.0, 340.0);
    let clerk = spawn_block(&mut world, SceneId::LIBRARY, 680.0, 300.0, 40.0, 40.0);
    world.add(clerk, InteractionZone::around(40.0, 40.0, 20.0));
    world.add(clerk, Interactable::new("Librarian", "Browse books (X)", InteractionKind::Library));
    world.add(clerk, SpeechBubble::default());

    tick_collision(&mut world);

    assert!(world.get::<ExitDoor>(door).expect("door").is_player_near);
    assert!(world.get::<Interactable>(clerk).expect("clerk").is_player_near);
    let own = bubble(&world, clerk);
    assert!(own.active);
    assert_eq!(own.text, "Browse books (X)");
    let exit = bubble(&world, player);
    assert!(exit.active);
    assert_eq!(exit.text, "Exit (Z)");
    assert_eq!(exit.offset, EXIT_PROMPT_OFFSET);
    assert_ne!(EXIT_PROMPT_OFFSET, DEFAULT_BUBBLE_OFFSET);

    world.get_mut::<Position>(player).expect("position").x = 50.0;
    tick_collision(&mut world);
    assert!(!world.get::<ExitDoor>(door).expect("door").is_player_near);
    assert!(!world.get::<Interactable>(clerk).expect("clerk").is_player_near);
    assert!(!bubble(&world, clerk).active);
    assert!(!bubble(&world, player).active);
}

#[test]
fn letter_actions_wait_while_search_box_is_open() {
    let mut world = make_world(0.0);
    let player = spawn_player(&mut world, 150.0, 150.0);
    world.resource_mut::<SceneState>().current = SceneId::LIBRARY;
    world.resource_mut::<SceneState>().return_point = Some(Position::new(20.0, 20.0));
    world.get_mut::<Position>(player).expect("position").x = 600.0;
    world.get_mut::<Position>(player).expect("position").y = 300.0;
    spawn_door(&mut world, SceneId::LIBRARY, 610.0, 340.0);
    let shelf = world.create_entity();
    let mut library = LibraryData::new(LibraryData::default_ebooks());
    library.is_showing_ui = true;
    world.add(shelf, library);

    tick_collision(&mut world);
    press(&mut world, |i| &mut i.exit);
    tick_interaction(&mut world);
    assert_eq!(world.resource::<SceneState>().current, SceneId::LIBRARY);

    world.get_mut::<LibraryData>(shelf).expect("library").is_showing_ui = false;
    tick_interaction(&mut world);
    assert_eq!(world.resource::<SceneState>().current, SceneId::MAIN);
    assert_eq!(position(&world, player), Position::new(20.0, 20.0));
}

#[test]
fn animation_returns_to_start_after_frame_count_wraps() {
    let mut world = make_world(0.25);
    let e = world.create_entity();
    world.add(e, Animation::new(4, 0.2, 32.0, 32.0));

    let mut seen = Vec::new();
    for _ in 0..4 {
        tick_animation(&mut world);
        let frame = world.get::<Animation>(e).expect("animation").current_frame;
        assert!(frame < 4);
        seen.push(frame);
    }
    assert_eq!(seen, vec![1, 2, 3, 0]);
}

#[test]
fn blocked_manual_move_rolls_back_exactly() {
    let mut world = make_world(0.1);
    let player = spawn_player(&mut world, 100.3, 100.7);
    spawn_block(&mut world, SceneId::MAIN, 170.0, 100.0, 20.0, 20.0);
    let before = position(&world, player);

    press(&mut world, |i| &mut i.move_right);
    tick_manual(&mut world);

    let after = position(&world, player);
    assert_eq!(after.x.to_bits(), before.x.to_bits());
    assert_eq!(after.y.to_bits(), before.y.to_bits());
}

#[test]
fn free_manual_move_is_not_normalized() {
    let mut world = make_world(0.1);
    let player = spawn_player(&mut world, 100.0, 100.0);
    press(&mut world, |i| &mut i.move_right);
    press(&mut world, |i| &mut i.move_down);
    tick_manual(&mut world);
    let after = position(&world, player);
    assert!(approx_eq(after.x, 120.0));
    assert!(approx_eq(after.y, 120.0));
}

#[test]
fn interior_clamp_allows_gui_band() {
    let mut world = make_world(1.0);
    world.resource_mut::<SceneState>().current = SceneId::LIBRARY;
    let player = spawn_player(&mut world, 100.0, -390.0);

    press(&mut world, |i| &mut i.move_up);
    tick_manual(&mut world);
    assert!(approx_eq(position(&world, player).y, -400.0));

    release_all(&mut world);
    world.get_mut::<Position>(player).expect("position").y = 330.0;
    press(&mut world, |i| &mut i.move_down);
    tick_manual(&mut world);
    let pos = position(&world, player);
    assert!(approx_eq(pos.y, 336.0));
    assert_eq!(world.get::<Hitbox>(player).expect("hitbox").bounds.y, pos.y);
}

fn spawn_walker(world: &mut World) -> Entity {
    let e = world.create_entity();
    world.add(e, Position::new(0.0, 0.0));
    world.add(e, Hitbox::new(10.0, 10.0));
    let mut wander = AIWander::new(100.0, 50.0, 100.0);
    wander.current_move_time = 100.0;
    wander.is_moving = true;
    wander.direction = Vector2::new(std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2);
    world.add(e, wander);
    e
}

#[test]
fn wander_slides_along_x_then_y_then_stops() {
    let step = 100.0 * 0.1 * std::f32::consts::FRAC_1_SQRT_2;

    // floor below: diagonal blocked, X-only free
    let mut world = make_world(0.1);
    let walker = spawn_walker(&mut world);
    spawn_block(&mut world, SceneId::MAIN, 0.0, 12.0, 50.0, 10.0);
    tick_wander(&mut world);
    let pos = position(&world, walker);
    assert!(approx_eq(pos.x, step) && approx_eq(pos.y, 0.0));

    // wall on the right: diagonal and X-only blocked, Y-only free
    let mut world = make_world(0.1);
    let walker = spawn_walker(&mut world);
    spawn_block(&mut world, SceneId::MAIN, 12.0, 0.0, 10.0, 50.0);
    tick_wander(&mut world);
    let pos = position(&world, walker);
    assert!(approx_eq(pos.x, 0.0) && approx_eq(pos.y, step));

    // corner: everything blocked, the walk ends
    let mut world = make_world(0.1);
    let walker = spawn_walker(&mut world);
    spawn_block(&mut world, SceneId::MAIN, 0.0, 12.0, 50.0, 10.0);
    spawn_block(&mut world, SceneId::MAIN, 12.0, 0.0, 10.0, 50.0);
    tick_wander(&mut world);
    let pos = position(&world, walker);
    assert_eq!((pos.x, pos.y), (0.0, 0.0));
    assert!(!world.get::<AIWander>(walker).expect("wander").is_moving);
}

#[test]
fn wander_ignores_other_scenes_hitboxes() {
    let mut world = make_world(0.1);
    let walker = spawn_walker(&mut world);
    spawn_block(&mut world, SceneId::HOUSE, 0.0, 0.0, 50.0, 50.0);
    tick_wander(&mut world);
    let pos = position(&world, walker);
    assert!(pos.x > 0.0 && pos.y > 0.0);
}

#[test]
fn enter_then_exit_round_trip() {
    let mut world = make_world(0.0);
    let player = spawn_player(&mut world, 150.0, 150.0);
    // zone reaches the player, hitbox does not
    spawn_building(&mut world, "Pomodoro", SceneId::POMODORO, 230.0, 20.0);
    let spawn = interior_spawn_point(world.resource::<ScreenSize>(), 64.0);
    let door = world.create_entity();
    world.add(door, Position::new(spawn.x - 40.0, spawn.y));
    world.add(door, InteractionZone::new(60.0, 60.0));
    world.add(door, ExitDoor::new("Exit (Z)"));
    world.add(door, Scene(SceneId::POMODORO));

    tick_collision(&mut world);
    let bubble = world.get::<SpeechBubble>(player).expect("bubble");
    assert!(bubble.active);
    assert_eq!(bubble.text, "Enter\nPomodoro? (X)");

    press(&mut world, |i| &mut i.activate);
    tick_interaction(&mut world);
    assert_eq!(world.resource::<SceneState>().current, SceneId::POMODORO);
    assert_eq!(position(&world, player), Position::new(640.0, 268.0));

    release_all(&mut world);
    tick_collision(&mut world);
    assert!(world.get::<ExitDoor>(door).expect("door").is_player_near);
    press(&mut world, |i| &mut i.exit);
    tick_interaction(&mut world);
    assert_eq!(world.resource::<SceneState>().current, SceneId::MAIN);
    assert_eq!(position(&world, player), Position::new(150.0, 150.0));
}

#[test]
fn enter_nudges_but_exit_restores_snapshot_verbatim() {
    let mut world = make_world(0.0);
    let player = spawn_player(&mut world, 150.0, 150.0);
    spawn_block(&mut world, SceneId::POMODORO, 620.0, 260.0, 30.0, 40.0);
    let spawn = Position::new(640.0, 268.0);

    assert!(enter_building(&mut world, player, SceneId::POMODORO, spawn));
    let inside = position(&world, player);
    assert_eq!(inside.x, 640.0 + 2.0 * ENTER_NUDGE_STEP);
    assert_eq!(inside.y, 268.0);

    // something now stands on the snapshot; exit still lands there
    spawn_block(&mut world, SceneId::MAIN, 150.0, 150.0, 64.0, 64.0);
    assert!(exit_to_main(&mut world, player));
    assert_eq!(position(&world, player), Position::new(150.0, 150.0));
    assert!(world.resource::<SceneState>().return_point.is_none());
}

#[test]
fn enter_is_ignored_outside_the_town() {
    let mut world = make_world(0.0);
    let player = spawn_player(&mut world, 150.0, 150.0);
    world.resource_mut::<SceneState>().current = SceneId::LIBRARY;

    assert!(!enter_building(&mut world, player, SceneId::HOUSE, Position::new(1.0, 1.0)));
    let state = *world.resource::<SceneState>();
    assert_eq!(state.current, SceneId::LIBRARY);
    assert!(state.return_point.is_none());
    assert_eq!(position(&world, player), Position::new(150.0, 150.0));
}

#[test]
fn last_created_building_wins_overlapping_zones() {
    let mut world = make_world(0.0);
    let player = spawn_player(&mut world, 150.0, 150.0);
    spawn_building(&mut world, "Library", SceneId::LIBRARY, 230.0, 30.0);
    spawn_building(&mut world, "My House", SceneId::HOUSE, 230.0, 20.0);

    tick_collision(&mut world);
    assert_eq!(
        world.get::<SpeechBubble>(player).expect("bubble").text,
        "Enter\nMy House? (X)"
    );

    press(&mut world, |i| &mut i.activate);
    tick_interaction(&mut world);
    assert_eq!(world.resource::<SceneState>().current, SceneId::HOUSE);
}

#[test]
fn autonomous_player_gets_wander_on_enter() {
    let mut world = make_world(0.0);
    let player = spawn_player(&mut world, 150.0, 150.0);
    world.add(player, PlayerInput::new(200.0).autonomous());
    assert!(!world.has::<AIWander>(player));

    enter_building(&mut world, player, SceneId::HOUSE, Position::new(640.0, 268.0));
    assert!(world.has::<AIWander>(player));
}
