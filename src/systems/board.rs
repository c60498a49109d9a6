//! Board construction: slot layout, piece scattering and teardown.

use bevy_ecs::entity::Entity;
use bevy_ecs::prelude::{Or, With};
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Commands, Query};
use glam::{UVec2, Vec2};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::constants::board::{GRID_SIZE, PIECE_COUNT, PIECE_SIZE};
use crate::constants::{scatter, scatter_base};
use crate::systems::components::{Piece, Position, Renderable, Slot};
use crate::texture::photos::{piece_tile, PhotoId, PhotoTile};

/// Layer assigned to the piece scattered last. The lift counter starts here
/// so the first grab already draws above the whole pile.
pub const TOP_SCATTER_LAYER: u32 = (PIECE_COUNT - 1) as u32;

/// Pixel sizes of the loaded photos, captured at startup. Keeping the sizes
/// apart from the textures lets board construction run without a canvas.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct PhotoCatalog {
    sizes: Vec<UVec2>,
}

impl PhotoCatalog {
    pub fn new(sizes: Vec<UVec2>) -> Self {
        Self { sizes }
    }

    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Source region of one piece on the given photo.
    pub fn tile(&self, photo: PhotoId, row: u32, col: u32) -> PhotoTile {
        piece_tile(self.sizes[photo.0], row, col)
    }
}

/// Top-left corner of a board cell, row-major from the top left.
pub fn slot_position(index: usize) -> Vec2 {
    let row = (index / GRID_SIZE as usize) as f32;
    let col = (index % GRID_SIZE as usize) as f32;
    crate::constants::board::BOARD_ORIGIN + Vec2::new(col * PIECE_SIZE, row * PIECE_SIZE)
}

/// Where the piece occupying the given scatter rank lands. The base point
/// walks down the left edge and the jitter spreads the pile out without
/// ever reaching the board.
pub fn scatter_position(rank: usize, rng: &mut SmallRng) -> Vec2 {
    let jitter = Vec2::new(
        rng.random_range(0.0..scatter::MAX_OFFSET_X),
        rng.random_range(0.0..scatter::MAX_OFFSET_Y),
    );
    scatter_base(rank) + jitter
}

/// Spawns the nine slots and nine pieces for a round. Piece order is
/// shuffled before scattering, so which piece sits where in the pile (and
/// on top of it) changes every round.
pub fn spawn_board(
    commands: &mut Commands,
    catalog: &PhotoCatalog,
    rng: &mut SmallRng,
    photo: PhotoId,
) {
    for index in 0..PIECE_COUNT {
        commands.spawn((Slot { index }, Position(slot_position(index))));
    }

    let mut order: Vec<usize> = (0..PIECE_COUNT).collect();
    order.shuffle(rng);

    for (rank, &slot) in order.iter().enumerate() {
        let row = (slot / GRID_SIZE as usize) as u32;
        let col = (slot % GRID_SIZE as usize) as u32;
        let position = scatter_position(rank, rng);
        trace!(slot, rank, ?position, "Scattering piece");
        commands.spawn((
            Piece { slot },
            Position(position),
            Renderable {
                tile: catalog.tile(photo, row, col),
                layer: rank as u32,
            },
        ));
    }
}

/// Despawns every slot and piece. Used on restart, loss and exit.
pub fn clear_board(
    commands: &mut Commands,
    board_entities: &Query<Entity, Or<(With<Piece>, With<Slot>)>>,
) {
    for entity in board_entities.iter() {
        commands.entity(entity).despawn();
    }
}
