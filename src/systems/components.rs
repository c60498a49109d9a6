//! Components and resources shared across the game's systems.

use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;
use glam::Vec2;
use rand::rngs::SmallRng;

use crate::events::PointerId;
use crate::texture::photos::{PhotoId, PhotoTile};

/// Top-left corner of an entity on the logical canvas.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// A puzzle piece, identified by the slot it belongs in.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// Index of the board cell this piece completes, row-major from the top left.
    pub slot: usize,
}

/// A board cell that accepts exactly one piece.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Row-major cell index from the top left.
    pub index: usize,
}

/// Marker for a piece that has locked into its slot. Snapped pieces no longer
/// respond to the pointer.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapped;

/// What a piece looks like: the photo region it crops and its stacking order.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderable {
    pub tile: PhotoTile,
    /// Stacking order. Higher layers draw later and therefore on top.
    pub layer: u32,
}

/// Per-round bookkeeping. Reset whenever a fresh round begins.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Photo the current round was cut from.
    pub photo: PhotoId,
    /// Completed drag gestures. Every release counts, even one that moves
    /// a piece nowhere.
    pub moves: u32,
    /// Pieces locked into their slots so far.
    pub solved: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            photo: PhotoId(0),
            moves: 0,
            solved: 0,
        }
    }
}

/// The drag gesture currently in progress, if any. Only one pointer may hold
/// a piece at a time; other pointers are ignored until release.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState(pub Option<ActiveDrag>);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    /// Pointer that grabbed the piece. Move and release events from any
    /// other pointer leave the gesture untouched.
    pub pointer: PointerId,
    pub piece: Entity,
    /// Offset from the piece's top-left corner to the grab point, so the
    /// piece does not jump under the cursor.
    pub grab_offset: Vec2,
}

/// Monotonic layer counter. Grabbing a piece bumps this and assigns the new
/// value to the piece, which keeps the most recently touched piece on top.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PieceLift(pub u32);

/// Whether the full-canvas photo backdrop is drawn blurred. On while a round
/// is underway, off on the start screen.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackdropBlur(pub bool);

/// Process-level flags that outlive any single round.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct GlobalState {
    /// Set when the player asks to quit. The main loop exits at the end of
    /// the current tick.
    pub exit: bool,
}

/// The game's random number generator, seeded at startup and injectable in
/// tests for reproducible rounds.
#[derive(Resource)]
pub struct GameRng(pub SmallRng);
