//! This module handles the audio playback for the game.
use anyhow::{anyhow, Result};
use sdl2::{
    mixer::{self, Chunk, InitFlag, LoaderRWops, AUDIO_S16LSB},
    rwops::RWops,
};

use crate::asset::{self, Asset};
use crate::constants::audio::MUSIC_VOLUME_PERCENT;

const AUDIO_FREQUENCY: i32 = 16_000;
const AUDIO_CHANNELS: i32 = 1;
/// The looping background track owns this channel for the whole session.
const MUSIC_CHANNEL: mixer::Channel = mixer::Channel(0);

fn music_volume() -> i32 {
    mixer::MAX_VOLUME * MUSIC_VOLUME_PERCENT as i32 / 100
}

/// The audio system for the game.
///
/// This struct is responsible for initializing the audio device, loading the
/// music track, and playing it. If audio fails to initialize, it will be
/// disabled and all functions will silently do nothing.
pub struct Audio {
    _mixer_context: Option<mixer::Sdl2MixerContext>,
    music: Option<Chunk>,
    state: AudioState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AudioState {
    Enabled { volume: u8 },
    Muted { previous_volume: u8 },
    Disabled,
}

impl Default for Audio {
    fn default() -> Self {
        Self::new()
    }
}

impl Audio {
    /// Creates a new `Audio` instance.
    ///
    /// If audio fails to initialize, the audio system will be disabled and
    /// all functions will silently do nothing.
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!("Failed to initialize audio: {}. Audio will be disabled.", e);
                Self {
                    _mixer_context: None,
                    music: None,
                    state: AudioState::Disabled,
                }
            }
        }
    }

    fn try_new() -> Result<Self> {
        let format = AUDIO_S16LSB;
        let chunk_size = {
            // 256 is the minimum for Emscripten, but in practice 1024 is much more reliable
            #[cfg(target_os = "emscripten")]
            {
                1024
            }

            // Otherwise, 256 is plenty safe.
            #[cfg(not(target_os = "emscripten"))]
            {
                256
            }
        };

        // Try to open audio, but don't panic if it fails
        mixer::open_audio(AUDIO_FREQUENCY, format, AUDIO_CHANNELS, chunk_size)
            .map_err(|e| anyhow!("Failed to open audio: {}", e))?;

        mixer::allocate_channels(AUDIO_CHANNELS);

        let volume = music_volume();
        for i in 0..AUDIO_CHANNELS {
            mixer::Channel(i).set_volume(volume);
        }

        // The track ships as plain WAV, so no decoder plugins are requested here
        let mixer_context =
            mixer::init(InitFlag::empty()).map_err(|e| anyhow!("Failed to initialize SDL2_mixer: {}", e))?;

        let music = Self::load_music()?;

        Ok(Audio {
            _mixer_context: Some(mixer_context),
            music: Some(music),
            state: AudioState::Enabled { volume: volume as u8 },
        })
    }

    fn load_music() -> Result<Chunk> {
        let data = asset::get_asset_bytes(Asset::Music).map_err(|e| anyhow!("Failed to get music bytes: {}", e))?;
        let rwops = RWops::from_bytes(&data).map_err(|e| anyhow!("Failed to create RWops for music: {}", e))?;
        rwops.load_wav().map_err(|e| anyhow!("Failed to load music wav: {}", e))
    }

    /// Starts the looping background track from the beginning.
    ///
    /// Best-effort: browsers may refuse playback outside a user gesture, and
    /// that refusal is logged and otherwise ignored. Playing while muted is
    /// allowed; the track runs silently until unmute restores the volume.
    pub fn play_music(&mut self) {
        if matches!(self.state, AudioState::Disabled) {
            return;
        }

        if let Some(chunk) = &self.music {
            match MUSIC_CHANNEL.play(chunk, -1) {
                Ok(channel) => {
                    tracing::trace!("Playing music on channel {:?}", channel);
                }
                Err(e) => {
                    tracing::warn!("Could not play music: {}", e);
                }
            }
        }
    }

    /// Halts the music channel. The next `play_music` starts over from the
    /// beginning of the track, so this doubles as a rewind.
    pub fn stop_music(&mut self) {
        if self.state != AudioState::Disabled {
            MUSIC_CHANNEL.halt();
        }
    }

    /// Instantly mutes or unmutes all audio channels by adjusting their volume.
    ///
    /// Sets the mixer channels to zero volume when muting, or restores them to
    /// the configured music volume when unmuting. No-op while the audio system
    /// is disabled; the player's preference is kept outside this wrapper.
    pub fn set_mute(&mut self, mute: bool) {
        match (mute, self.state) {
            // Mute
            (true, AudioState::Enabled { volume }) => {
                self.state = AudioState::Muted { previous_volume: volume };
                for i in 0..AUDIO_CHANNELS {
                    mixer::Channel(i).set_volume(0);
                }
            }
            // Unmute
            (false, AudioState::Muted { previous_volume }) => {
                self.state = AudioState::Enabled { volume: previous_volume };
                for i in 0..AUDIO_CHANNELS {
                    mixer::Channel(i).set_volume(previous_volume as i32);
                }
            }
            _ => {}
        }
    }

    /// Returns whether the device channels are currently muted. Always `false`
    /// while the audio system is disabled.
    pub fn is_muted(&self) -> bool {
        matches!(self.state, AudioState::Muted { .. })
    }

    /// Returns whether the audio system failed to initialize and is non-functional.
    ///
    /// Audio can be disabled due to SDL2_mixer initialization failures, a
    /// missing audio device, or failure to load the music asset. When disabled,
    /// all audio operations become no-ops.
    pub fn is_disabled(&self) -> bool {
        matches!(self.state, AudioState::Disabled)
    }
}
