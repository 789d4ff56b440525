//! Task Town main entry point.
//!
//! A top-down productivity town written in Rust using:
//! - **raylib** for windowing, graphics, and audio
//! - **bevy_ecs** for entity-component-system architecture
//!
//! Walk the cat between three buildings: the Pomodoro shop runs a study/break
//! timer, the library lists eBooks, and the house desk keeps a to-do list.
//!
//! # Main Loop
//!
//! 1. Load configuration, open the window, start the audio thread
//! 2. Build the town and load its textures
//! 3. Run the frame schedule until the window closes:
//!    - input, control mode, animation, movement, collision, interaction
//!    - GUI overlays, Pomodoro driver, scene audio
//!    - audio plumbing, render
//! 4. Clean up the audio thread on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --manual --data-dir ./data
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

use tasktown::events::switchdebug::switch_debug_observer;
use tasktown::game;
use tasktown::resources::audio::{setup_audio, shutdown_audio};
use tasktown::resources::gameconfig::GameConfig;
use tasktown::systems::animation::animation;
use tasktown::systems::audio::{
    forward_audio_cmds, log_audio_messages, poll_audio_messages, update_bevy_audio_cmds,
    update_bevy_audio_messages,
};
use tasktown::systems::collision::collision_system;
use tasktown::systems::controlmode::control_mode_system;
use tasktown::systems::driver::{
    pomodoro_freeze_latch, pomodoro_session_start, scene_transition_audio,
    snapshot_player_frozen, update_pomodoro,
};
use tasktown::systems::gui::overlay_input_system;
use tasktown::systems::input::update_input_state;
use tasktown::systems::interaction::interaction_system;
use tasktown::systems::movement::{ai_wander_movement, player_input_movement};
use tasktown::systems::render::{load_textures, render_frame};
use tasktown::systems::time::update_world_time;

/// Task Town
#[derive(Parser)]
#[command(version, about = "A tiny town of study tools: Pomodoro, library and to-do list.")]
struct Cli {
    /// Configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding library.json and todolist.json.
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Start with keyboard control instead of the wandering cat.
    #[arg(long)]
    manual: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}, using defaults", e);
    }
    if let Some(dir) = cli.data_dir {
        config.set_data_dir(dir);
    }

    info!("Welcome to Task Town!");
    // --------------- Raylib window ---------------
    let (mut rl, thread) = raylib::init()
        .size(config.window_width as i32, config.window_height as i32)
        .title("Task Town")
        .build();
    rl.set_target_fps(config.target_fps);
    // Disable ESC to exit
    rl.set_exit_key(None);

    // --------------- ECS world + resources ---------------
    let mut world = game::init_world(&config);
    setup_audio(&mut world);
    game::setup_town(&mut world);
    if cli.manual {
        game::start_in_manual_control(&mut world);
    }
    game::queue_startup_audio(&mut world);

    if let Err(e) = load_textures(&mut world, &mut rl, &thread) {
        warn!("{}; drawing flat colours instead", e);
    }
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    world.spawn(Observer::new(switch_debug_observer));
    // Ensure the observer is registered before we run any systems that may trigger events.
    world.flush();

    let mut update = Schedule::default();
    update.add_systems(
        (
            update_input_state,
            snapshot_player_frozen,
            control_mode_system,
            animation,
            player_input_movement,
            ai_wander_movement,
            collision_system,
            interaction_system,
            overlay_input_system,
            pomodoro_session_start,
            update_pomodoro,
            pomodoro_freeze_latch,
            scene_transition_audio,
        )
            .chain(),
    );
    update.add_systems(
        // audio systems must be together
        (
            // First, advance AudioCmd messages and forward them to the audio thread
            update_bevy_audio_cmds,
            forward_audio_cmds,
            // Then, pull audio thread messages and advance them
            poll_audio_messages,
            update_bevy_audio_messages,
            log_audio_messages,
        )
            .chain()
            .after(scene_transition_audio),
    );
    update.add_systems(render_frame.after(log_audio_messages));

    if let Err(e) = update.initialize(&mut world) {
        error!("schedule failed to initialize: {}", e);
        shutdown_audio(&mut world);
        return;
    }

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
    {
        let dt = world
            .non_send_resource::<raylib::RaylibHandle>()
            .get_frame_time();
        update_world_time(&mut world, dt);

        update.run(&mut world);

        world.clear_trackers(); // Clear changed components for next frame
    }
    shutdown_audio(&mut world);
}
