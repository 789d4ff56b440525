//! Messages exchanged with the audio thread.
//!
//! Systems write [`AudioCmd`] messages; the audio systems forward them over a
//! channel to the thread that owns the raylib audio device, and relay its
//! [`AudioMessage`] replies back into the ECS.

use bevy_ecs::message::Message;

pub const MUSIC_BACKGROUND: &str = "background";
pub const FX_DOOR_OPEN: &str = "door_open";
pub const FX_DOOR_CLOSE: &str = "door_close";
pub const FX_STUDY_AMBIENCE: &str = "study_ambience";
pub const FX_SESSION_COMPLETE: &str = "session_complete";

/// Sound effects loaded at startup, as `(id, path)`.
pub const FX_ASSETS: [(&str, &str); 4] = [
    (FX_DOOR_OPEN, "assets/opening-door-411632.mp3"),
    (FX_DOOR_CLOSE, "assets/close-door-382723.mp3"),
    (FX_STUDY_AMBIENCE, "assets/white-noise-358382.mp3"),
    (FX_SESSION_COMPLETE, "assets/game-level-complete-143022.mp3"),
];
pub const MUSIC_BACKGROUND_PATH: &str = "assets/background.mp3";

/// Commands sent *to* the audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioCmd {
    LoadMusic { id: String, path: String },
    PlayMusic { id: String, looped: bool },
    StopMusic { id: String },
    VolumeMusic { id: String, vol: f32 },
    LoadFx { id: String, path: String },
    PlayFx { id: String },
    /// Volume applied to every loaded and future sound effect.
    VolumeFx { vol: f32 },
    Shutdown,
}

impl AudioCmd {
    pub fn play_fx(id: &str) -> Self {
        AudioCmd::PlayFx { id: id.to_string() }
    }
}

/// Events sent *back* from the audio thread
#[derive(Message, Debug, Clone)]
pub enum AudioMessage {
    MusicLoaded { id: String },
    MusicLoadFailed { id: String, error: String },
    MusicPlayStarted { id: String },
    MusicStopped { id: String },
    MusicFinished { id: String },
    FxLoaded { id: String },
    FxLoadFailed { id: String, error: String },
}
