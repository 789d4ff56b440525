//! Town setup.
//!
//! [`setup_town`] builds the whole game world once: the town backdrop, the
//! player, three buildings, and for each building its interior descriptor,
//! exit door and interactable. Nothing is ever despawned afterwards, so
//! creation order here is the order systems see when "last wins" matters.

use bevy_ecs::prelude::*;
use log::{info, warn};
use raylib::prelude::Color;

use crate::components::aiwander::AIWander;
use crate::components::animation::Animation;
use crate::components::background::Background;
use crate::components::building::{Backdrop, Building, BuildingInterior, GuiType};
use crate::components::exitdoor::ExitDoor;
use crate::components::hitbox::Hitbox;
use crate::components::interactable::{Interactable, InteractionKind};
use crate::components::interactionzone::InteractionZone;
use crate::components::library::LibraryData;
use crate::components::player::Player;
use crate::components::playerinput::PlayerInput;
use crate::components::position::Position;
use crate::components::scene::{Scene, SceneId};
use crate::components::speechbubble::SpeechBubble;
use crate::components::sprite::Sprite;
use crate::components::todolist::TodoListData;
use crate::events::audio::{AudioCmd, FX_ASSETS, MUSIC_BACKGROUND, MUSIC_BACKGROUND_PATH};
use crate::persistence::{load_library, load_todo_list};
use crate::resources::audio::{AudioVolumes, init_audio_messages};
use crate::resources::datapaths::DataPaths;
use crate::resources::driverstate::DriverState;
use crate::resources::entityregistry::{EntityRegistry, TownWorld};
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::scenestate::SceneState;
use crate::resources::screensize::ScreenSize;
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::scene::{NUDGE_MAX_ATTEMPTS, STARTUP_NUDGE_STEP, find_player, nudge_until_clear};

pub mod assets {
    pub const PLAYER_IDLE: &str = "assets/Idle.png";
    pub const MAIN_BACKGROUND: &str = "assets/map.png";
    pub const SHOP_BACKGROUND: &str = "assets/shop-800x449.png";
    pub const LIBRARY_BACKGROUND: &str = "assets/library-bg.png";
    pub const HOUSE_BACKGROUND: &str = "assets/house-bg.png";
    pub const POMODORO_SPRITE: &str = "assets/house3.png";
    pub const LIBRARY_SPRITE: &str = "assets/house4.png";
    pub const HOUSE_SPRITE: &str = "assets/house1.png";
    pub const NPC_SPRITE: &str = "assets/librarian-idle.png";
    pub const DESK_SPRITE: &str = "assets/desk.png";
}

pub const PLAYER_START: Position = Position { x: 150.0, y: 150.0 };
pub const PLAYER_SIZE: f32 = 64.0;
pub const PLAYER_SPEED: f32 = 200.0;
pub const PLAYER_FRAMES: usize = 10;
pub const PLAYER_FRAME_TIME: f32 = 0.2;
pub const PLAYER_FRAME_SIZE: f32 = 32.0;
pub const NPC_SIZE: f32 = 48.0;
pub const DOOR_WIDTH: f32 = 30.0;
pub const DOOR_HEIGHT: f32 = 40.0;
pub const EXIT_TEXT: &str = "Exit (Z)";
const BUILDING_ZONE_MARGIN: f32 = 10.0;

/// A world with every resource the frame systems read, and no entities.
pub fn init_world(config: &GameConfig) -> World {
    let mut world = World::new();
    world.insert_resource(EntityRegistry::new());
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(SceneState::new());
    world.insert_resource(DriverState::default());
    world.insert_resource(config.screen_size());
    world.insert_resource(config.data_paths());
    world.insert_resource(config.pomodoro_timer());
    world.insert_resource(AudioVolumes {
        music: config.music_volume,
        fx: config.fx_volume,
    });
    world.insert_resource(TextureStore::new());
    world.insert_resource(config.clone());
    init_audio_messages(&mut world);
    world
}

fn spawn_building(
    world: &mut World,
    name: &str,
    interior: SceneId,
    sprite: &str,
    at: Position,
    width: f32,
    height: f32,
) -> Entity {
    let e = world.create_entity();
    world.add(e, at);
    world.add(e, Sprite::new(sprite, width, height));
    world.add(e, Hitbox::new(width, height));
    world.add(e, InteractionZone::around(width, height, BUILDING_ZONE_MARGIN));
    world.add(e, Building::new(name, interior));
    world.add(e, Scene(SceneId::MAIN));
    e
}

fn spawn_interior(world: &mut World, scene: SceneId, interior: BuildingInterior) -> Entity {
    let e = world.create_entity();
    world.add(e, interior);
    world.add(e, Scene(scene));
    e
}

fn spawn_exit_door(world: &mut World, scene: SceneId, screen: &ScreenSize) -> Entity {
    let e = world.create_entity();
    world.add(
        e,
        Position::new(screen.w / 2.0 - DOOR_WIDTH / 2.0, screen.game_height - DOOR_HEIGHT - 10.0),
    );
    world.add(e, Sprite::solid(DOOR_WIDTH, DOOR_HEIGHT, Color::DARKBROWN));
    world.add(e, Hitbox::new(DOOR_WIDTH, DOOR_HEIGHT));
    world.add(e, InteractionZone::around(DOOR_WIDTH, DOOR_HEIGHT, 10.0));
    world.add(e, ExitDoor::new(EXIT_TEXT));
    world.add(e, Scene(scene));
    e
}

struct InteractableSpec<'a> {
    scene: SceneId,
    name: &'a str,
    prompt: &'a str,
    kind: InteractionKind,
    sprite: &'a str,
    at: Position,
    width: f32,
    height: f32,
    zone_margin: f32,
}

fn spawn_interactable(world: &mut World, item: InteractableSpec) -> Entity {
    let e = world.create_entity();
    world.add(e, item.at);
    world.add(e, Sprite::new(item.sprite, item.width, item.height));
    world.add(e, Hitbox::new(item.width, item.height));
    world.add(e, InteractionZone::around(item.width, item.height, item.zone_margin));
    world.add(e, Interactable::new(item.name, item.prompt, item.kind));
    world.add(e, SpeechBubble::default());
    world.add(e, Scene(item.scene));
    e
}

fn library_from_disk(paths: &DataPaths) -> LibraryData {
    match load_library(&paths.library) {
        Ok(ebooks) => {
            info!("library: {} books from {}", ebooks.len(), paths.library.display());
            LibraryData::new(ebooks)
        }
        Err(e) => {
            warn!("library: {}, using defaults", e);
            LibraryData::new(LibraryData::default_ebooks())
        }
    }
}

fn todo_list_from_disk(paths: &DataPaths) -> TodoListData {
    match load_todo_list(&paths.todo) {
        Ok(tasks) => {
            info!("todo list: {} tasks from {}", tasks.len(), paths.todo.display());
            TodoListData::new(tasks)
        }
        Err(e) => {
            warn!("todo list: {}, using defaults", e);
            TodoListData::new(TodoListData::default_tasks())
        }
    }
}

/// Create every town entity. Expects the resources of [`init_world`].
pub fn setup_town(world: &mut World) {
    let screen = *world.resource::<ScreenSize>();
    let paths = world.resource::<DataPaths>().clone();

    // town backdrop
    let bg = world.create_entity();
    world.add(bg, Position::new(0.0, 0.0));
    world.add(bg, Sprite::new(assets::MAIN_BACKGROUND, screen.w, screen.h));
    world.add(bg, Background);
    world.add(bg, Scene(SceneId::MAIN));

    let player = world.create_entity();
    world.add(player, PLAYER_START);
    world.add(player, Sprite::new(assets::PLAYER_IDLE, PLAYER_SIZE, PLAYER_SIZE));
    world.add(player, Hitbox::new(PLAYER_SIZE, PLAYER_SIZE));
    world.add(
        player,
        Animation::new(PLAYER_FRAMES, PLAYER_FRAME_TIME, PLAYER_FRAME_SIZE, PLAYER_FRAME_SIZE),
    );
    world.add(player, PlayerInput::new(PLAYER_SPEED).autonomous());
    world.add(player, AIWander::new(40.0, 1.0, 3.0));
    world.add(player, Player);
    world.add(player, SpeechBubble::default());

    // pomodoro shop
    spawn_building(
        world,
        "Pomodoro",
        SceneId::POMODORO,
        assets::POMODORO_SPRITE,
        Position::new(screen.w - 250.0, 100.0),
        100.0,
        120.0,
    );
    spawn_interior(
        world,
        SceneId::POMODORO,
        BuildingInterior::new(
            GuiType::Pomodoro,
            Backdrop::color(Color::LIGHTGRAY),
            Backdrop::texture(assets::SHOP_BACKGROUND, Color::WHITE),
        ),
    );
    spawn_exit_door(world, SceneId::POMODORO, &screen);
    spawn_interactable(
        world,
        InteractableSpec {
            scene: SceneId::POMODORO,
            name: "Barista",
            prompt: "Start Pomodoro (X)",
            kind: InteractionKind::Pomodoro,
            sprite: assets::NPC_SPRITE,
            at: Position::new(screen.w / 2.0 - NPC_SIZE / 2.0, 200.0),
            width: NPC_SIZE,
            height: NPC_SIZE,
            zone_margin: 20.0,
        },
    );

    // library
    spawn_building(
        world,
        "Library",
        SceneId::LIBRARY,
        assets::LIBRARY_SPRITE,
        Position::new(50.0, 150.0),
        140.0,
        160.0,
    );
    let library = spawn_interior(
        world,
        SceneId::LIBRARY,
        BuildingInterior::new(
            GuiType::Library,
            Backdrop::color(Color::RAYWHITE),
            Backdrop::texture(assets::LIBRARY_BACKGROUND, Color::BEIGE),
        ),
    );
    world.add(library, library_from_disk(&paths));
    spawn_exit_door(world, SceneId::LIBRARY, &screen);
    let librarian = spawn_interactable(
        world,
        InteractableSpec {
            scene: SceneId::LIBRARY,
            name: "Librarian",
            prompt: "Browse Library (X)",
            kind: InteractionKind::Library,
            sprite: assets::NPC_SPRITE,
            at: Position::new(screen.w / 2.0 - NPC_SIZE / 2.0, 80.0),
            width: NPC_SIZE,
            height: NPC_SIZE,
            zone_margin: 15.0,
        },
    );
    world.add(
        librarian,
        Animation::new(PLAYER_FRAMES, PLAYER_FRAME_TIME, PLAYER_FRAME_SIZE, PLAYER_FRAME_SIZE),
    );

    // house
    spawn_building(
        world,
        "My House",
        SceneId::HOUSE,
        assets::HOUSE_SPRITE,
        Position::new(screen.w - 400.0, 300.0),
        120.0,
        140.0,
    );
    let house = spawn_interior(
        world,
        SceneId::HOUSE,
        BuildingInterior::new(
            GuiType::TodoList,
            Backdrop::color(Color::SKYBLUE),
            Backdrop::texture(assets::HOUSE_BACKGROUND, Color::LIGHTGRAY),
        ),
    );
    world.add(house, todo_list_from_disk(&paths));
    spawn_exit_door(world, SceneId::HOUSE, &screen);
    spawn_interactable(
        world,
        InteractableSpec {
            scene: SceneId::HOUSE,
            name: "Desk",
            prompt: "Use Desk (X)",
            kind: InteractionKind::TodoList,
            sprite: assets::DESK_SPRITE,
            at: Position::new(screen.w / 2.0 - 40.0, 150.0),
            width: 80.0,
            height: 60.0,
            zone_margin: 15.0,
        },
    );

    let nudges = nudge_until_clear(
        world,
        player,
        SceneId::MAIN,
        STARTUP_NUDGE_STEP,
        NUDGE_MAX_ATTEMPTS,
    );
    if nudges > 0 {
        info!("player start moved {} px right to clear the town", nudges as f32 * STARTUP_NUDGE_STEP);
    }
    info!("town ready: {} entities", world.entities_in_order().len());
}

/// Queue loading of every sound and start the looped town music at the
/// configured volumes. The audio thread picks these up on the first frame.
pub fn queue_startup_audio(world: &mut World) {
    let volumes = *world.resource::<AudioVolumes>();
    for (id, path) in FX_ASSETS {
        world.write_message(AudioCmd::LoadFx {
            id: id.to_string(),
            path: path.to_string(),
        });
    }
    world.write_message(AudioCmd::VolumeFx { vol: volumes.fx });
    world.write_message(AudioCmd::LoadMusic {
        id: MUSIC_BACKGROUND.to_string(),
        path: MUSIC_BACKGROUND_PATH.to_string(),
    });
    world.write_message(AudioCmd::VolumeMusic {
        id: MUSIC_BACKGROUND.to_string(),
        vol: volumes.music,
    });
    world.write_message(AudioCmd::PlayMusic {
        id: MUSIC_BACKGROUND.to_string(),
        looped: true,
    });
}

/// Hand the player to the keyboard from the first frame.
pub fn start_in_manual_control(world: &mut World) {
    let Some(player) = find_player(world) else {
        return;
    };
    if let Some(mut control) = world.get_mut::<PlayerInput>(player) {
        control.controlled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::hitbox::rects_overlap;

    fn make_world() -> (World, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = GameConfig::new();
        config.set_data_dir(dir.path());
        let mut world = init_world(&config);
        setup_town(&mut world);
        (world, dir)
    }

    #[test]
    fn test_creation_order_and_counts() {
        let (mut world, _dir) = make_world();
        let order = world.entities_in_order();
        assert_eq!(order.len(), 14);
        assert!(world.has::<Background>(order[0]));
        assert!(world.has::<Player>(order[1]));
        let buildings = world.query::<&Building>().iter(&world).count();
        let doors = world.query::<&ExitDoor>().iter(&world).count();
        let interiors = world.query::<&BuildingInterior>().iter(&world).count();
        assert_eq!((buildings, doors, interiors), (3, 3, 3));
    }

    #[test]
    fn test_missing_data_falls_back_to_defaults() {
        let (mut world, _dir) = make_world();
        let library = world.query::<&LibraryData>().single(&world).expect("library");
        assert_eq!(library.ebooks, LibraryData::default_ebooks());
        let todo = world.query::<&TodoListData>().single(&world).expect("todo");
        assert_eq!(todo.tasks.len(), 3);
        assert!(todo.tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_player_starts_clear_of_town_hitboxes() {
        let (mut world, _dir) = make_world();
        let player = find_player(&mut world).expect("player");
        let pos = *world.get::<Position>(player).expect("position");
        let hb = *world.get::<Hitbox>(player).expect("hitbox");
        let me = hb.bounds_at(pos.as_vec());
        let blocked = world
            .query::<(Entity, &Position, &Hitbox, &Scene)>()
            .iter(&world)
            .filter(|(e, _, _, s)| *e != player && s.id().is_main())
            .any(|(_, p, h, _)| rects_overlap(&me, &h.bounds_at(p.as_vec())));
        assert!(!blocked);
        assert!(!world.get::<PlayerInput>(player).expect("input").controlled);
    }

    #[test]
    fn test_startup_audio_is_queued() {
        let (mut world, _dir) = make_world();
        queue_startup_audio(&mut world);
        let queued: Vec<AudioCmd> = world
            .resource_mut::<Messages<AudioCmd>>()
            .drain()
            .collect();
        assert_eq!(queued.len(), FX_ASSETS.len() + 4);
        assert!(queued.contains(&AudioCmd::PlayMusic {
            id: MUSIC_BACKGROUND.to_string(),
            looped: true,
        }));
    }

    #[test]
    fn test_manual_flag_takes_control() {
        let (mut world, _dir) = make_world();
        start_in_manual_control(&mut world);
        let player = find_player(&mut world).expect("player");
        assert!(world.get::<PlayerInput>(player).expect("input").controlled);
    }
}
