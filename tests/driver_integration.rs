//! Driver integration tests: the Pomodoro cycle law, study sessions started
//! at the barista, the freeze latch and control-mode switching.

use std::time::{Duration, Instant};

use bevy_ecs::prelude::*;

use tasktown::components::aiwander::AIWander;
use tasktown::components::hitbox::{Hitbox, rects_overlap};
use tasktown::components::interactable::Interactable;
use tasktown::components::player::Player;
use tasktown::components::playerinput::PlayerInput;
use tasktown::components::position::Position;
use tasktown::components::scene::{Scene, SceneId};
use tasktown::components::speechbubble::SpeechBubble;
use tasktown::events::audio::{AudioCmd, FX_DOOR_CLOSE, FX_DOOR_OPEN, FX_SESSION_COMPLETE, FX_STUDY_AMBIENCE};
use tasktown::game::{init_world, setup_town};
use tasktown::resources::gameconfig::GameConfig;
use tasktown::resources::input::InputState;
use tasktown::resources::pomodoro::{
    BREAK_DURATION, PomodoroPhase, PomodoroTimer, PomodoroTransition, STUDY_DURATION,
};
use tasktown::resources::scenestate::SceneState;
use tasktown::resources::worldtime::WorldTime;
use tasktown::systems::collision::collision_system;
use tasktown::systems::controlmode::control_mode_system;
use tasktown::systems::driver::{
    STUDYING_TEXT, pomodoro_freeze_latch, pomodoro_session_start, scene_transition_audio,
    snapshot_player_frozen, update_pomodoro,
};
use tasktown::systems::movement::player_input_movement;
use tasktown::systems::scene::find_player;

fn make_world() -> (World, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = GameConfig::new();
    config.set_data_dir(dir.path());
    let mut world = init_world(&config);
    setup_town(&mut world);
    world.insert_resource(WorldTime::default().with_delta(1.0 / 60.0));
    (world, dir)
}

fn drain_audio(world: &mut World) -> Vec<AudioCmd> {
    world.resource_mut::<Messages<AudioCmd>>().drain().collect()
}

fn player(world: &mut World) -> Entity {
    find_player(world).expect("player")
}

fn settle_input(world: &mut World) {
    let mut input = world.resource_mut::<InputState>();
    for key in input.keys_mut() {
        key.active = false;
        key.settle();
    }
}

/// Put the player on the barista inside the Pomodoro shop, keyboard controlled.
fn stand_at_barista(world: &mut World) -> Entity {
    let player = player(world);
    world.resource_mut::<SceneState>().current = SceneId::POMODORO;
    let barista = world
        .query::<(&Position, &Interactable)>()
        .iter(world)
        .find(|(_, item)| item.display_name == "Barista")
        .map(|(p, _)| *p)
        .expect("barista");
    *world.get_mut::<Position>(player).expect("position") =
        Position::new(barista.x, barista.y + 50.0);
    let mut control = world.get_mut::<PlayerInput>(player).expect("input");
    control.controlled = true;
    player
}

#[test]
fn two_cycles_run_exactly_two_study_break_pairs() {
    let mut timer = PomodoroTimer::new();
    timer.set_cycle_count(2);
    let t0 = Instant::now();
    assert!(timer.start(t0));
    timer.update(t0);
    assert_eq!(timer.total_elapsed(), Duration::ZERO);

    let t1 = t0 + STUDY_DURATION;
    assert_eq!(
        timer.update(t1).as_slice(),
        &[PomodoroTransition::StudyToBreak { cycle: 1 }]
    );
    assert_eq!(timer.state(), PomodoroPhase::Break);
    assert!(timer.total_elapsed() >= STUDY_DURATION);

    let t2 = t1 + BREAK_DURATION;
    assert_eq!(
        timer.update(t2).as_slice(),
        &[PomodoroTransition::BreakToStudy { cycle: 2 }]
    );
    assert_eq!(timer.state(), PomodoroPhase::Study);
    assert_eq!(timer.current_cycle(), 2);

    let t3 = t2 + STUDY_DURATION;
    timer.update(t3);
    assert_eq!(timer.state(), PomodoroPhase::Break);
    let t4 = t3 + BREAK_DURATION;
    assert_eq!(
        timer.update(t4).as_slice(),
        &[PomodoroTransition::Completed]
    );
    assert!(!timer.is_running());
    assert_eq!(timer.state(), PomodoroPhase::Idle);
}

#[test]
fn barista_starts_a_frozen_study_session() {
    let (mut world, _dir) = make_world();
    let player = stand_at_barista(&mut world);
    world.resource_mut::<InputState>().activate.press();

    let mut schedule = Schedule::default();
    schedule.add_systems((collision_system, pomodoro_session_start).chain());
    schedule.run(&mut world);

    assert!(world.resource::<PomodoroTimer>().is_running());
    assert!(world.get::<PlayerInput>(player).expect("input").frozen);
    let bubble = world.get::<SpeechBubble>(player).expect("bubble");
    assert!(bubble.active);
    assert_eq!(bubble.text, STUDYING_TEXT);
    assert!(drain_audio(&mut world).contains(&AudioCmd::play_fx(FX_STUDY_AMBIENCE)));
}

#[test]
fn barista_is_ignored_while_a_session_runs() {
    let (mut world, _dir) = make_world();
    stand_at_barista(&mut world);
    world.resource_mut::<PomodoroTimer>().start(Instant::now());
    world.resource_mut::<InputState>().activate.press();

    let mut schedule = Schedule::default();
    schedule.add_systems((collision_system, pomodoro_session_start).chain());
    schedule.run(&mut world);

    assert!(!drain_audio(&mut world).contains(&AudioCmd::play_fx(FX_STUDY_AMBIENCE)));
}

#[test]
fn arrow_key_releases_freeze_and_resets_timer() {
    let (mut world, _dir) = make_world();
    let player = stand_at_barista(&mut world);
    world.resource_mut::<PomodoroTimer>().start(Instant::now());
    world.get_mut::<PlayerInput>(player).expect("input").frozen = true;
    world
        .get_mut::<SpeechBubble>(player)
        .expect("bubble")
        .show(STUDYING_TEXT);
    let before = *world.get::<Position>(player).expect("position");

    let mut frame = Schedule::default();
    frame.add_systems(
        (
            snapshot_player_frozen,
            player_input_movement,
            update_pomodoro,
            pomodoro_freeze_latch,
        )
            .chain(),
    );

    // still frozen: the latch keeps the bubble up
    frame.run(&mut world);
    assert!(world.get::<SpeechBubble>(player).expect("bubble").active);
    assert!(world.resource::<PomodoroTimer>().is_running());

    world.resource_mut::<InputState>().move_left.press();
    frame.run(&mut world);

    assert_eq!(*world.get::<Position>(player).expect("position"), before);
    assert!(!world.get::<PlayerInput>(player).expect("input").frozen);
    let timer = world.resource::<PomodoroTimer>();
    assert!(!timer.is_running());
    assert_eq!(timer.state(), PomodoroPhase::Idle);
    assert!(!world.get::<SpeechBubble>(player).expect("bubble").active);
    let sounds = drain_audio(&mut world);
    assert_eq!(
        sounds
            .iter()
            .filter(|c| **c == AudioCmd::play_fx(FX_SESSION_COMPLETE))
            .count(),
        1
    );

    // next frame walks normally and plays nothing
    settle_input(&mut world);
    world.resource_mut::<InputState>().move_left.press();
    frame.run(&mut world);
    assert!(world.get::<Position>(player).expect("position").x < before.x);
    assert!(drain_audio(&mut world).is_empty());
}

#[test]
fn door_sounds_follow_scene_changes() {
    let (mut world, _dir) = make_world();
    let mut schedule = Schedule::default();
    schedule.add_systems(scene_transition_audio);

    schedule.run(&mut world);
    assert!(drain_audio(&mut world).is_empty());

    world.resource_mut::<SceneState>().current = SceneId::LIBRARY;
    schedule.run(&mut world);
    assert_eq!(drain_audio(&mut world), vec![AudioCmd::play_fx(FX_DOOR_OPEN)]);

    schedule.run(&mut world);
    assert!(drain_audio(&mut world).is_empty());

    world.resource_mut::<SceneState>().current = SceneId::MAIN;
    schedule.run(&mut world);
    assert_eq!(drain_audio(&mut world), vec![AudioCmd::play_fx(FX_DOOR_CLOSE)]);
}

#[test]
fn control_keys_switch_modes_and_toggle_unfreezes() {
    let (mut world, _dir) = make_world();
    let player = player(&mut world);
    world.entity_mut(player).remove::<AIWander>();

    let mut schedule = Schedule::default();
    schedule.add_systems(control_mode_system);

    world.resource_mut::<InputState>().manual_mode.press();
    schedule.run(&mut world);
    assert!(world.get::<PlayerInput>(player).expect("input").controlled);

    settle_input(&mut world);
    world.resource_mut::<InputState>().wander_mode.press();
    schedule.run(&mut world);
    assert!(!world.get::<PlayerInput>(player).expect("input").controlled);
    assert!(world.get::<AIWander>(player).is_some());

    settle_input(&mut world);
    world.get_mut::<PlayerInput>(player).expect("input").frozen = true;
    world.resource_mut::<InputState>().toggle_mode.press();
    schedule.run(&mut world);
    let control = world.get::<PlayerInput>(player).expect("input");
    assert!(control.controlled);
    assert!(!control.frozen);
}

fn teleport(world: &mut World, scene: SceneId) -> Entity {
    let player = player(world);
    world.resource_mut::<SceneState>().current = scene;
    settle_input(world);
    world.resource_mut::<InputState>().teleport.press();

    let mut schedule = Schedule::default();
    schedule.add_systems(control_mode_system);
    schedule.run(world);
    player
}

fn overlapping_hitboxes(world: &mut World, player: Entity, scene: SceneId) -> usize {
    let body = world.get::<Hitbox>(player).expect("hitbox").bounds;
    world
        .query::<(Entity, &Position, &Hitbox, &Scene)>()
        .iter(world)
        .filter(|(e, pos, hb, s)| {
            *e != player && s.id() == scene && rects_overlap(&hb.bounds_at(pos.as_vec()), &body)
        })
        .count()
}

#[test]
fn teleport_drops_player_mid_scene() {
    let (mut world, _dir) = make_world();
    let player = teleport(&mut world, SceneId::LIBRARY);

    assert_eq!(
        *world.get::<Position>(player).expect("position"),
        Position::new(640.0, 200.0)
    );
    let hb = world.get::<Hitbox>(player).expect("hitbox");
    assert_eq!((hb.bounds.x, hb.bounds.y), (640.0, 200.0));
}

#[test]
fn teleport_never_lands_on_furniture() {
    let (mut world, _dir) = make_world();
    for scene in [SceneId::POMODORO, SceneId::HOUSE, SceneId::LIBRARY, SceneId::MAIN] {
        let player = teleport(&mut world, scene);
        assert_eq!(overlapping_hitboxes(&mut world, player, scene), 0, "stuck in {scene}");

        let pos = *world.get::<Position>(player).expect("position");
        let hb = world.get::<Hitbox>(player).expect("hitbox");
        assert_eq!((hb.bounds.x, hb.bounds.y), (pos.x, pos.y));
        assert!(pos.x >= 640.0);
    }
}

#[test]
fn player_can_walk_after_teleport_onto_the_barista() {
    let (mut world, _dir) = make_world();
    let player = teleport(&mut world, SceneId::POMODORO);
    world.get_mut::<PlayerInput>(player).expect("input").controlled = true;
    let start = *world.get::<Position>(player).expect("position");
    assert!(start.x > 640.0);

    settle_input(&mut world);
    world.resource_mut::<InputState>().move_down.press();
    let mut schedule = Schedule::default();
    schedule.add_systems(player_input_movement);
    schedule.run(&mut world);

    assert!(world.get::<Position>(player).expect("position").y > start.y);
}

#[test]
fn town_has_one_player() {
    let (mut world, _dir) = make_world();
    let players = world.query_filtered::<Entity, With<Player>>().iter(&world).count();
    assert_eq!(players, 1);
}
