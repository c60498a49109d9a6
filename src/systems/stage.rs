//! The stage machine that drives the game from the start screen through a
//! round and back again.

use std::mem::discriminant;

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{EventReader, EventWriter};
use bevy_ecs::prelude::{Or, With};
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Commands, Query, Res, ResMut};
use tracing::{debug, info};

use crate::constants::{timing, TICKS_PER_SECOND};
use crate::events::{GameCommand, GameEvent, PointerAction, StageTransition};
use crate::systems::audio::AudioEvent;
use crate::systems::board::{self, PhotoCatalog};
use crate::systems::components::{
    BackdropBlur, DragState, GameRng, GlobalState, Piece, PieceLift, Session, Slot,
};
use crate::systems::menu;
use crate::texture::photos::PhotoId;
use rand::Rng;

/// Where the game currently is. The countdown stages carry the ticks left
/// until they expire on their own.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStage {
    /// Start screen, waiting for the player.
    Idle,
    /// The round was requested and the transition screen is up.
    Previewing { remaining_ticks: u32 },
    /// The unscrambled photo is shown over the board before play begins.
    ImageReveal { remaining_ticks: u32 },
    /// Pieces are live and the countdown is running.
    Playing,
    /// All pieces snapped. A short beat before the win screen appears.
    WinDelay { remaining_ticks: u32 },
    Won,
    Lost,
}

/// Which of the five screens a stage presents. Every stage maps to exactly
/// one screen, so none can go missing and none can overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Transition,
    Playing,
    Lose,
    Win,
}

impl GameStage {
    pub fn screen(&self) -> Screen {
        match self {
            GameStage::Idle => Screen::Start,
            GameStage::Previewing { .. } => Screen::Transition,
            GameStage::ImageReveal { .. } | GameStage::Playing | GameStage::WinDelay { .. } => {
                Screen::Playing
            }
            GameStage::Won => Screen::Win,
            GameStage::Lost => Screen::Lose,
        }
    }
}

/// The round countdown. Decrements once per second of ticks while running
/// and reports expiry through a [`StageTransition`].
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTimer {
    Stopped {
        remaining_seconds: u32,
    },
    Running {
        remaining_seconds: u32,
        ticks_until_decrement: u32,
    },
}

impl CountdownTimer {
    pub fn start() -> Self {
        CountdownTimer::Running {
            remaining_seconds: timing::ROUND_SECONDS,
            ticks_until_decrement: TICKS_PER_SECOND,
        }
    }

    /// The seconds shown on the HUD, regardless of whether the timer runs.
    pub fn remaining_seconds(&self) -> u32 {
        match *self {
            CountdownTimer::Stopped { remaining_seconds }
            | CountdownTimer::Running {
                remaining_seconds, ..
            } => remaining_seconds,
        }
    }

    /// Freezes the timer at its current reading.
    pub fn stopped(&self) -> Self {
        CountdownTimer::Stopped {
            remaining_seconds: self.remaining_seconds(),
        }
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        CountdownTimer::Stopped {
            remaining_seconds: timing::ROUND_SECONDS,
        }
    }
}

/// Stages which only differ in their countdown field transition into each
/// other every tick, which would flood the log.
trait TooSimilar {
    fn too_similar(&self, other: &Self) -> bool;
}

impl TooSimilar for GameStage {
    fn too_similar(&self, other: &Self) -> bool {
        discriminant(self) == discriminant(other)
    }
}

/// Ticks the countdown while it runs and reports the moment it hits zero.
pub fn timer_system(
    mut timer: ResMut<CountdownTimer>,
    mut transitions: EventWriter<StageTransition>,
) {
    if let CountdownTimer::Running {
        remaining_seconds,
        ticks_until_decrement,
    } = *timer
    {
        if ticks_until_decrement > 1 {
            *timer = CountdownTimer::Running {
                remaining_seconds,
                ticks_until_decrement: ticks_until_decrement - 1,
            };
        } else if remaining_seconds > 1 {
            *timer = CountdownTimer::Running {
                remaining_seconds: remaining_seconds - 1,
                ticks_until_decrement: TICKS_PER_SECOND,
            };
        } else {
            *timer = CountdownTimer::Stopped {
                remaining_seconds: 0,
            };
            transitions.write(StageTransition::TimerExpired);
        }
    }
}

/// Advances the stage machine. Commands and reported transitions take
/// priority; otherwise the countdown stages tick down on their own. All
/// side effects of a stage change happen here, keyed on the exact
/// (old, new) pair.
#[allow(clippy::too_many_arguments)]
pub fn stage_system(
    mut commands: Commands,
    mut stage: ResMut<GameStage>,
    mut events: EventReader<GameEvent>,
    mut transitions: EventReader<StageTransition>,
    mut session: ResMut<Session>,
    mut timer: ResMut<CountdownTimer>,
    mut drag: ResMut<DragState>,
    mut lift: ResMut<PieceLift>,
    mut blur: ResMut<BackdropBlur>,
    mut global: ResMut<GlobalState>,
    mut rng: ResMut<GameRng>,
    catalog: Res<PhotoCatalog>,
    mut audio_events: EventWriter<AudioEvent>,
    board_entities: Query<Entity, Or<(With<Piece>, With<Slot>)>>,
) {
    let old_stage = *stage;
    let mut new_stage_opt: Option<GameStage> = None;

    for event in events.read() {
        // Screen buttons resolve to the same commands the keyboard sends.
        let command = match event {
            GameEvent::Command(command) => Some(*command),
            GameEvent::Pointer(pointer) if pointer.action == PointerAction::Down => {
                menu::hit_button(old_stage.screen(), pointer.position)
            }
            GameEvent::Pointer(_) => None,
        };
        let Some(command) = command else {
            continue;
        };

        match command {
            GameCommand::Play if matches!(old_stage, GameStage::Idle) => {
                new_stage_opt = Some(GameStage::Previewing {
                    remaining_ticks: timing::PREVIEW_WAIT_TICKS,
                });
            }
            GameCommand::Restart
                if matches!(
                    old_stage,
                    GameStage::Playing | GameStage::Won | GameStage::Lost
                ) =>
            {
                new_stage_opt = Some(GameStage::ImageReveal {
                    remaining_ticks: timing::IMAGE_REVEAL_TICKS,
                });
            }
            GameCommand::Exit => {
                new_stage_opt = Some(GameStage::Idle);
            }
            GameCommand::Quit => {
                info!("Quit requested");
                global.exit = true;
            }
            // Muting belongs to the audio system.
            GameCommand::MuteAudio => {}
            GameCommand::Play | GameCommand::Restart => {
                debug!(?command, stage = ?old_stage, "Command has no effect on this stage");
            }
        }
    }

    for transition in transitions.read() {
        match transition {
            StageTransition::TimerExpired if matches!(old_stage, GameStage::Playing) => {
                new_stage_opt = Some(GameStage::Lost);
            }
            StageTransition::PuzzleSolved if matches!(old_stage, GameStage::Playing) => {
                new_stage_opt = Some(GameStage::WinDelay {
                    remaining_ticks: timing::WIN_DELAY_TICKS,
                });
            }
            _ => {
                debug!(?transition, stage = ?old_stage, "Stale transition ignored");
            }
        }
    }

    let new_stage = new_stage_opt.unwrap_or_else(|| match old_stage {
        GameStage::Previewing { remaining_ticks } => {
            if remaining_ticks == 0 {
                GameStage::ImageReveal {
                    remaining_ticks: timing::IMAGE_REVEAL_TICKS,
                }
            } else {
                GameStage::Previewing {
                    remaining_ticks: remaining_ticks.saturating_sub(1),
                }
            }
        }
        GameStage::ImageReveal { remaining_ticks } => {
            if remaining_ticks == 0 {
                GameStage::Playing
            } else {
                GameStage::ImageReveal {
                    remaining_ticks: remaining_ticks.saturating_sub(1),
                }
            }
        }
        GameStage::WinDelay { remaining_ticks } => {
            if remaining_ticks == 0 {
                GameStage::Won
            } else {
                GameStage::WinDelay {
                    remaining_ticks: remaining_ticks.saturating_sub(1),
                }
            }
        }
        stage => stage,
    });

    if old_stage == new_stage {
        return;
    }

    if !old_stage.too_similar(&new_stage) {
        debug!("Stage transition: {:?} -> {:?}", old_stage, new_stage);
    }

    match (old_stage, new_stage) {
        (GameStage::Idle, GameStage::Previewing { .. }) => {
            blur.0 = true;
            audio_events.write(AudioEvent::PlayMusic);
            info!("Round requested, giving the player a moment");
        }
        (
            GameStage::Previewing { .. } | GameStage::Playing | GameStage::Won | GameStage::Lost,
            GameStage::ImageReveal { .. },
        ) => {
            board::clear_board(&mut commands, &board_entities);
            drag.0 = None;
            lift.0 = 0;
            let photo = PhotoId(rng.0.random_range(0..catalog.count()));
            *session = Session {
                photo,
                moves: 0,
                solved: 0,
            };
            *timer = CountdownTimer::default();
            debug!(photo = photo.0, "Fresh round, revealing its photo");
        }
        (GameStage::ImageReveal { .. }, GameStage::Playing) => {
            board::spawn_board(&mut commands, &catalog, &mut rng.0, session.photo);
            lift.0 = board::TOP_SCATTER_LAYER;
            *timer = CountdownTimer::start();
            info!("Board scattered, countdown running");
        }
        (GameStage::Playing, GameStage::WinDelay { .. }) => {
            *timer = timer.stopped();
            debug!("Last piece snapped, holding before the win screen");
        }
        (GameStage::WinDelay { .. }, GameStage::Won) => {
            info!(moves = session.moves, "Puzzle solved");
        }
        (GameStage::Playing, GameStage::Lost) => {
            board::clear_board(&mut commands, &board_entities);
            drag.0 = None;
            *timer = CountdownTimer::Stopped {
                remaining_seconds: 0,
            };
            info!(moves = session.moves, "Time ran out");
        }
        (_, GameStage::Idle) => {
            board::clear_board(&mut commands, &board_entities);
            drag.0 = None;
            blur.0 = false;
            *timer = CountdownTimer::default();
            audio_events.write(AudioEvent::StopMusic);
            info!("Returning to the start screen");
        }
        _ => {}
    }

    *stage = new_stage;
}
