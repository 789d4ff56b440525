//! Per-frame driver glue.
//!
//! These systems hold the only cross-system logic of the game: the study
//! session started from the barista, the freeze latch that ends it, and the
//! door sounds of scene changes. [`DriverState`] carries what they compare
//! across frames.

use bevy_ecs::prelude::*;
use log::info;
use std::time::Instant;

use crate::components::interactable::{Interactable, InteractionKind};
use crate::components::player::Player;
use crate::components::playerinput::PlayerInput;
use crate::components::scene::Scene;
use crate::components::speechbubble::SpeechBubble;
use crate::events::audio::{
    AudioCmd, FX_DOOR_CLOSE, FX_DOOR_OPEN, FX_SESSION_COMPLETE, FX_STUDY_AMBIENCE,
};
use crate::resources::driverstate::DriverState;
use crate::resources::input::InputState;
use crate::resources::pomodoro::{PomodoroTimer, PomodoroTransition};
use crate::resources::scenestate::SceneState;

pub const STUDYING_TEXT: &str = "I'm studying...";

/// Sample the player's freeze latch before movement can release it.
pub fn snapshot_player_frozen(
    mut driver: ResMut<DriverState>,
    players: Query<&PlayerInput, With<Player>>,
) {
    driver.player_was_frozen = players.iter().next().is_some_and(|c| c.frozen);
}

/// Start a study session when the player activates the barista.
pub fn pomodoro_session_start(
    input: Res<InputState>,
    scene: Res<SceneState>,
    mut timer: ResMut<PomodoroTimer>,
    mut players: Query<(&mut PlayerInput, Option<&mut SpeechBubble>), With<Player>>,
    interactables: Query<(&Interactable, &Scene)>,
    mut audio: MessageWriter<AudioCmd>,
) {
    if !input.activate.just_pressed || scene.is_main() || timer.is_running() {
        return;
    }
    let at_barista = interactables.iter().any(|(item, s)| {
        item.kind == InteractionKind::Pomodoro && item.is_player_near && s.id() == scene.current
    });
    if !at_barista {
        return;
    }
    if !timer.start(Instant::now()) {
        return;
    }
    for (mut control, bubble) in players.iter_mut() {
        control.frozen = true;
        if let Some(mut bubble) = bubble {
            bubble.show(STUDYING_TEXT);
        }
    }
    audio.write(AudioCmd::play_fx(FX_STUDY_AMBIENCE));
    info!(
        "study session started: {} cycle(s)",
        timer.cycle_count()
    );
}

/// Tick the timer against the wall clock. Finishing the last cycle releases
/// the player.
pub fn update_pomodoro(
    mut timer: ResMut<PomodoroTimer>,
    mut players: Query<&mut PlayerInput, With<Player>>,
) {
    for transition in timer.update(Instant::now()) {
        match transition {
            PomodoroTransition::StudyToBreak { cycle } => info!("cycle {} study done, break", cycle),
            PomodoroTransition::BreakToStudy { cycle } => info!("cycle {} study begins", cycle),
            PomodoroTransition::Completed => {
                info!("all study cycles complete");
                for mut control in players.iter_mut() {
                    control.frozen = false;
                }
            }
        }
    }
}

/// Edge-detect the freeze latch: a frozen player that got released this
/// frame ends the session.
pub fn pomodoro_freeze_latch(
    driver: Res<DriverState>,
    mut timer: ResMut<PomodoroTimer>,
    mut players: Query<(&PlayerInput, Option<&mut SpeechBubble>), With<Player>>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let Some((control, bubble)) = players.iter_mut().next() else {
        return;
    };
    if driver.player_was_frozen && !control.frozen {
        timer.reset();
        if let Some(mut bubble) = bubble {
            bubble.clear();
        }
        audio.write(AudioCmd::play_fx(FX_SESSION_COMPLETE));
        info!("study session ended");
    } else if control.frozen && timer.is_running() {
        if let Some(mut bubble) = bubble {
            bubble.show(STUDYING_TEXT);
        }
    }
}

/// Door sounds on scene changes.
pub fn scene_transition_audio(
    mut driver: ResMut<DriverState>,
    scene: Res<SceneState>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let current = scene.current;
    if current == driver.previous_scene {
        return;
    }
    if driver.previous_scene.is_main() && current.is_interior() {
        audio.write(AudioCmd::play_fx(FX_DOOR_OPEN));
    } else if driver.previous_scene.is_interior() && current.is_main() {
        audio.write(AudioCmd::play_fx(FX_DOOR_CLOSE));
    }
    driver.previous_scene = current;
}
