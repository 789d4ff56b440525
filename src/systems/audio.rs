//! Audio system implementation backed by a dedicated thread and Raylib.
//!
//! - [`audio_thread`] runs on its own OS thread, owns the Raylib audio device,
//!   and processes [`AudioCmd`] messages, replying with [`AudioMessage`]s.
//! - [`forward_audio_cmds`] and [`update_bevy_audio_cmds`] move commands
//!   written by gameplay systems onto the channel.
//! - [`poll_audio_messages`] and [`update_bevy_audio_messages`] drain the
//!   thread's replies into the ECS message queue.
//! - [`log_audio_messages`] reports load failures.
//!
//! Raylib audio calls stay on one thread; the game thread only talks to it
//! through `crossbeam_channel`.

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::{MessageReader, MessageWriter, Messages, Res, ResMut};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use raylib::core::audio::{Music, RaylibAudio, Sound};
use rustc_hash::{FxHashMap, FxHashSet};

/// Drain any pending replies from the audio thread into the ECS mailbox.
pub fn poll_audio_messages(bridge: Res<AudioBridge>, mut writer: MessageWriter<AudioMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

/// Advance the ECS message queue for [`AudioMessage`].
pub fn update_bevy_audio_messages(mut events: ResMut<Messages<AudioMessage>>) {
    events.update();
}

/// Forward ECS AudioCmd messages to the audio thread via the AudioBridge sender.
pub fn forward_audio_cmds(bridge: Res<AudioBridge>, mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        // ignore send error on shutdown
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for AudioCmd so same-frame readers can observe writes.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

pub fn log_audio_messages(mut reader: MessageReader<AudioMessage>) {
    for msg in reader.read() {
        match msg {
            AudioMessage::MusicLoadFailed { id, error } | AudioMessage::FxLoadFailed { id, error } => {
                warn!("audio asset '{}' unavailable: {}", id, error);
            }
            other => debug!("audio: {:?}", other),
        }
    }
}

/// Music and sound handles owned by the audio thread.
struct Mixer<'a> {
    audio: &'a RaylibAudio,
    tx_evt: Sender<AudioMessage>,
    musics: FxHashMap<String, Music<'a>>,
    sounds: FxHashMap<String, Sound<'a>>,
    playing: FxHashSet<String>,
    looped: FxHashSet<String>,
    fx_volume: f32,
}

impl<'a> Mixer<'a> {
    fn new(audio: &'a RaylibAudio, tx_evt: Sender<AudioMessage>) -> Self {
        Self {
            audio,
            tx_evt,
            musics: FxHashMap::default(),
            sounds: FxHashMap::default(),
            playing: FxHashSet::default(),
            looped: FxHashSet::default(),
            fx_volume: 1.0,
        }
    }

    fn reply(&self, msg: AudioMessage) {
        // the game may already be gone during shutdown
        let _ = self.tx_evt.send(msg);
    }

    /// Apply one command. Returns `false` once shutdown was requested.
    fn handle(&mut self, cmd: AudioCmd) -> bool {
        match cmd {
            AudioCmd::LoadMusic { id, path } => match self.audio.new_music(&path) {
                Ok(music) => {
                    debug!("music '{}' <- {}", id, path);
                    self.musics.insert(id.clone(), music);
                    self.reply(AudioMessage::MusicLoaded { id });
                }
                Err(e) => self.reply(AudioMessage::MusicLoadFailed {
                    id,
                    error: e.to_string(),
                }),
            },
            AudioCmd::PlayMusic { id, looped } => {
                let Some(music) = self.musics.get(&id) else {
                    return true;
                };
                music.seek_stream(0.0);
                music.play_stream();
                if looped {
                    self.looped.insert(id.clone());
                } else {
                    self.looped.remove(&id);
                }
                self.playing.insert(id.clone());
                self.reply(AudioMessage::MusicPlayStarted { id });
            }
            AudioCmd::StopMusic { id } => {
                let Some(music) = self.musics.get(&id) else {
                    return true;
                };
                music.stop_stream();
                self.playing.remove(&id);
                self.looped.remove(&id);
                self.reply(AudioMessage::MusicStopped { id });
            }
            AudioCmd::VolumeMusic { id, vol } => {
                if let Some(music) = self.musics.get(&id) {
                    music.set_volume(vol);
                }
            }
            AudioCmd::LoadFx { id, path } => match self.audio.new_sound(&path) {
                Ok(sound) => {
                    debug!("fx '{}' <- {}", id, path);
                    sound.set_volume(self.fx_volume);
                    self.sounds.insert(id.clone(), sound);
                    self.reply(AudioMessage::FxLoaded { id });
                }
                Err(e) => self.reply(AudioMessage::FxLoadFailed {
                    id,
                    error: e.to_string(),
                }),
            },
            AudioCmd::PlayFx { id } => match self.sounds.get(&id) {
                Some(sound) => sound.play(),
                None => debug!("fx '{}' not loaded, skipping", id),
            },
            AudioCmd::VolumeFx { vol } => {
                self.fx_volume = vol;
                self.sounds.values().for_each(|s| s.set_volume(vol));
            }
            AudioCmd::Shutdown => {
                info!("audio shutdown requested");
                return false;
            }
        }
        true
    }

    /// Feed playing streams; restart looped tracks that reached their end.
    fn pump(&mut self) {
        let mut finished: Vec<String> = Vec::new();
        for id in &self.playing {
            let Some(music) = self.musics.get(id) else {
                continue;
            };
            if music.is_stream_playing() {
                music.update_stream();
            } else if music.get_time_played() >= music.get_time_length() - 0.01 {
                finished.push(id.clone());
            }
        }
        for id in finished {
            match self.musics.get(&id) {
                Some(music) if self.looped.contains(&id) => {
                    music.seek_stream(0.0);
                    music.play_stream();
                }
                _ => {
                    self.playing.remove(&id);
                    self.reply(AudioMessage::MusicFinished { id });
                }
            }
        }
    }
}

/// Entry point of the dedicated audio thread.
///
/// Without an audio device the thread keeps draining commands so senders
/// never block, and exits on [`AudioCmd::Shutdown`].
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_evt: Sender<AudioMessage>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            error!("audio device unavailable, running silent: {}", e);
            let _ = rx_cmd.iter().find(|cmd| matches!(cmd, AudioCmd::Shutdown));
            return;
        }
    };
    info!("audio thread starting (id={:?})", std::thread::current().id());

    let mut mixer = Mixer::new(&audio, tx_evt);
    'run: loop {
        for cmd in rx_cmd.try_iter() {
            if !mixer.handle(cmd) {
                break 'run;
            }
        }
        mixer.pump();
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
    // handles must drop before the device
    drop(mixer);
    info!("audio thread exiting");
}
