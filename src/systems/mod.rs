//! The game's systems and the components and resources they share.

use bevy_ecs::event::EventReader;
use tracing::error;

use crate::error::GameError;

pub mod audio;
pub mod board;
pub mod components;
pub mod drag;
pub mod hud;
pub mod input;
pub mod menu;
pub mod render;
pub mod stage;

pub use audio::{audio_system, AudioEvent, AudioResource, AudioState};
pub use board::PhotoCatalog;
pub use components::{
    ActiveDrag, BackdropBlur, DragState, GameRng, GlobalState, Piece, PieceLift, Position,
    Renderable, Session, Slot, Snapped,
};
pub use drag::drag_system;
pub use hud::hud_render_system;
pub use input::{input_system, Bindings};
pub use render::{
    dirty_render_system, present_system, render_system, BackbufferResource, BlurTargetResource,
    RenderDirty,
};
pub use stage::{stage_system, timer_system, CountdownTimer, GameStage, Screen};

/// Drains and logs errors reported by the other systems. Rendering hiccups
/// are worth a log line, not a crash.
pub fn error_system(mut errors: EventReader<GameError>) {
    for error in errors.read() {
        error!("{error}");
    }
}
