//! Persistence and overlay integration tests: JSON round trips, the tolerant
//! fallback reader, and overlay clicks that save through the data paths.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use tasktown::components::library::{Ebook, LibraryData};
use tasktown::components::scene::SceneId;
use tasktown::components::todolist::{TodoListData, TodoTask};
use tasktown::game::{init_world, setup_town};
use tasktown::persistence::{
    PersistenceError, load_library, load_todo_list, save_library, save_todo_list,
};
use tasktown::resources::gameconfig::GameConfig;
use tasktown::resources::input::InputState;
use tasktown::resources::scenestate::SceneState;
use tasktown::resources::screensize::ScreenSize;
use tasktown::systems::gui::{ListOverlay, overlay_input_system};

fn make_world() -> (World, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = GameConfig::new();
    config.set_data_dir(dir.path());
    let mut world = init_world(&config);
    setup_town(&mut world);
    (world, dir)
}

fn tick_overlays(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(overlay_input_system);
    schedule.run(world);
}

fn click_at(world: &mut World, x: f32, y: f32) {
    let mut input = world.resource_mut::<InputState>();
    input.pointer.position = Vector2::new(x, y);
    input.pointer.left_pressed = true;
    input.pointer.left_down = true;
}

fn todo(world: &mut World) -> TodoListData {
    world
        .query::<&TodoListData>()
        .single(world)
        .expect("todo list")
        .clone()
}

#[test]
fn toggled_task_survives_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("todolist.json");
    let mut list = TodoListData::new(vec![TodoTask::new("A"), TodoTask::new("B")]);

    list.toggle(0);
    save_todo_list(&path, &list.tasks).expect("save");
    let loaded = load_todo_list(&path).expect("load");

    let names: Vec<&str> = loaded.iter().map(|t| t.task.as_str()).collect();
    let done: Vec<bool> = loaded.iter().map(|t| t.completed).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(done, vec![true, false]);
}

#[test]
fn library_round_trip_keeps_order_and_escapes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested/library.json");
    let books = vec![
        Ebook::new("books/a \"quoted\".pdf", "Tabs\tand\\slashes"),
        Ebook::new("books/b.pdf", "B"),
    ];
    save_library(&path, &books).expect("save");
    assert_eq!(load_library(&path).expect("load"), books);
}

#[test]
fn hand_edited_file_is_read_line_by_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("todolist.json");
    // trailing commas make this invalid JSON
    std::fs::write(
        &path,
        "{\n  \"tasks\": [\n    {\n      \"task\": \"Water \\\"plants\\\"\",\n      \"completed\": true,\n    },\n    {\n      \"completed\": false\n    },\n    {\n      \"task\": \"Call mom\",\n      \"completed\": false,\n    },\n  ]\n}\n",
    )
    .expect("write");

    let tasks = load_todo_list(&path).expect("load");
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].task, "Water \"plants\"");
    assert!(tasks[0].completed);
    assert_eq!(tasks[1].task, "Call mom");
    assert!(!tasks[1].completed);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_library(dir.path().join("nope.json")).expect_err("missing");
    assert!(matches!(err, PersistenceError::Io { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn checkbox_click_saves_to_data_dir() {
    let (mut world, dir) = make_world();
    world.resource_mut::<SceneState>().current = SceneId::HOUSE;
    {
        let mut q = world.query::<&mut TodoListData>();
        let mut list = q.single_mut(&mut world).expect("todo list");
        list.is_showing_ui = true;
    }

    let screen = *world.resource::<ScreenSize>();
    let check = ListOverlay::todo(&screen).checkbox(1);
    click_at(&mut world, check.x + check.width / 2.0, check.y + check.height / 2.0);
    tick_overlays(&mut world);

    assert!(todo(&mut world).tasks[1].completed);
    let saved = load_todo_list(dir.path().join("todolist.json")).expect("saved");
    assert_eq!(saved.len(), 3);
    assert!(saved[1].completed);
    assert!(!saved[0].completed);
}

#[test]
fn overlay_ignores_clicks_from_other_scenes() {
    let (mut world, dir) = make_world();
    {
        let mut q = world.query::<&mut TodoListData>();
        q.single_mut(&mut world).expect("todo list").is_showing_ui = true;
    }
    let screen = *world.resource::<ScreenSize>();
    let check = ListOverlay::todo(&screen).checkbox(0);
    click_at(&mut world, check.x + 5.0, check.y + 5.0);
    tick_overlays(&mut world);

    assert!(!todo(&mut world).tasks[0].completed);
    assert!(!dir.path().join("todolist.json").exists());
}

#[test]
fn wheel_scroll_clamps_to_last_window() {
    let (mut world, _dir) = make_world();
    world.resource_mut::<SceneState>().current = SceneId::HOUSE;
    {
        let mut q = world.query::<&mut TodoListData>();
        let mut list = q.single_mut(&mut world).expect("todo list");
        list.tasks = (0..7).map(|i| TodoTask::new(format!("task {i}"))).collect();
        list.is_showing_ui = true;
    }

    world.resource_mut::<InputState>().pointer.wheel = -10.0;
    tick_overlays(&mut world);
    assert_eq!(todo(&mut world).scroll_offset, 2);

    world.resource_mut::<InputState>().pointer.wheel = 10.0;
    tick_overlays(&mut world);
    assert_eq!(todo(&mut world).scroll_offset, 0);
}

#[test]
fn library_defaults_are_used_when_nothing_is_saved() {
    let (mut world, _dir) = make_world();
    let library = world
        .query::<&LibraryData>()
        .single(&world)
        .expect("library")
        .clone();
    assert_eq!(library.ebooks, LibraryData::default_ebooks());
}
