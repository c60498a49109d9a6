//! Bridges game events to the SDL mixer.

use bevy_ecs::event::{Event, EventReader};
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{NonSendMut, ResMut};
use tracing::debug;

use crate::audio::Audio;
use crate::events::{GameCommand, GameEvent};

/// Playback requests from the stage machine.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    /// Start the looping background track from the beginning.
    PlayMusic,
    /// Halt the track and rewind it.
    StopMusic,
}

/// The SDL audio device wrapper. Not thread-safe, so it lives as a
/// non-send resource.
pub struct AudioResource(pub Audio);

/// The player's mute preference. The device is kept in step with this
/// flag, so music keeps looping silently while muted and comes back at
/// full volume on unmute.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AudioState {
    pub muted: bool,
}

pub fn audio_system(
    mut audio: NonSendMut<AudioResource>,
    mut state: ResMut<AudioState>,
    mut game_events: EventReader<GameEvent>,
    mut events: EventReader<AudioEvent>,
) {
    for event in game_events.read() {
        if matches!(event, GameEvent::Command(GameCommand::MuteAudio)) {
            state.muted = !state.muted;
            debug!(muted = state.muted, "Mute toggled");
        }
    }

    // Sync the device before acting on playback requests.
    if audio.0.is_muted() != state.muted {
        audio.0.set_mute(state.muted);
    }

    for event in events.read() {
        match event {
            AudioEvent::PlayMusic => audio.0.play_music(),
            AudioEvent::StopMusic => audio.0.stop_music(),
        }
    }
}
