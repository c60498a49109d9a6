use std::collections::HashSet;

use bevy_ecs::{
    entity::Entity,
    prelude::{Or, With},
    system::{Commands, Query, RunSystemOnce},
};
use glam::Vec2;
use rand::{rngs::SmallRng, SeedableRng};
use rompecabezas::{
    constants::{
        board::{BOARD_ORIGIN, GRID_SIZE, PIECE_COUNT, PIECE_SIZE},
        scatter, CANVAS_SIZE,
    },
    systems::{
        board::{clear_board, scatter_position, slot_position, spawn_board, TOP_SCATTER_LAYER},
        GameRng, Piece, PhotoCatalog, Position, Renderable, Slot,
    },
    texture::photos::PhotoId,
};
use speculoos::prelude::*;

mod common;

fn spawn_via_system(world: &mut bevy_ecs::world::World, photo: PhotoId) {
    world
        .run_system_once(
            move |mut commands: Commands,
                  catalog: bevy_ecs::system::Res<PhotoCatalog>,
                  mut rng: bevy_ecs::system::ResMut<GameRng>| {
                spawn_board(&mut commands, &catalog, &mut rng.0, photo);
            },
        )
        .expect("spawn should run");
}

#[test]
fn test_slot_positions_form_a_row_major_grid() {
    assert_that(&slot_position(0)).is_equal_to(BOARD_ORIGIN);
    assert_that(&slot_position(1)).is_equal_to(BOARD_ORIGIN + Vec2::new(PIECE_SIZE, 0.0));
    assert_that(&slot_position(3)).is_equal_to(BOARD_ORIGIN + Vec2::new(0.0, PIECE_SIZE));
    assert_that(&slot_position(4)).is_equal_to(BOARD_ORIGIN + Vec2::splat(PIECE_SIZE));
    assert_that(&slot_position(8)).is_equal_to(BOARD_ORIGIN + Vec2::splat(2.0 * PIECE_SIZE));
}

#[test]
fn test_scatter_positions_stay_clear_of_the_board() {
    let mut rng = SmallRng::seed_from_u64(99);

    for _ in 0..50 {
        for rank in 0..PIECE_COUNT {
            let position = scatter_position(rank, &mut rng);

            assert!(
                position.x >= scatter::ORIGIN.x,
                "piece at rank {rank} left the canvas: {position:?}"
            );
            assert!(
                position.x + PIECE_SIZE < BOARD_ORIGIN.x,
                "piece at rank {rank} reached the board: {position:?}"
            );
            assert!(
                position.y >= scatter::ORIGIN.y,
                "piece at rank {rank} rose above the pile: {position:?}"
            );
            assert!(
                position.y + PIECE_SIZE <= CANVAS_SIZE.y as f32,
                "piece at rank {rank} fell off the canvas: {position:?}"
            );
        }
    }
}

#[test]
fn test_spawn_board_builds_a_complete_round() {
    let mut world = common::create_test_world();
    let photo = PhotoId(1);
    spawn_via_system(&mut world, photo);

    let mut slots = world.query::<(&Slot, &Position)>();
    let slot_indices: HashSet<usize> = slots.iter(&world).map(|(slot, _)| slot.index).collect();
    assert_eq!(slot_indices.len(), PIECE_COUNT, "every cell gets one slot");
    for (slot, position) in slots.iter(&world) {
        assert_that(&position.0).is_equal_to(slot_position(slot.index));
    }

    let mut pieces = world.query::<(&Piece, &Position, &Renderable)>();
    let piece_slots: HashSet<usize> = pieces.iter(&world).map(|(piece, _, _)| piece.slot).collect();
    let layers: HashSet<u32> = pieces.iter(&world).map(|(_, _, r)| r.layer).collect();
    assert_eq!(piece_slots.len(), PIECE_COUNT, "every slot gets one piece");
    assert_eq!(layers.len(), PIECE_COUNT, "every piece gets its own layer");
    assert_that(&layers.iter().max()).is_equal_to(Some(&TOP_SCATTER_LAYER));

    let catalog = common::test_catalog();
    for (piece, position, renderable) in pieces.iter(&world) {
        // Each piece crops the cell of the photo its slot shows
        let row = (piece.slot / GRID_SIZE as usize) as u32;
        let col = (piece.slot % GRID_SIZE as usize) as u32;
        assert_that(&renderable.tile).is_equal_to(catalog.tile(photo, row, col));

        // And starts scattered left of the board
        assert_that(&(position.0.x + PIECE_SIZE < BOARD_ORIGIN.x)).is_true();
    }
}

#[test]
fn test_spawn_board_is_deterministic_per_seed() {
    let layout = |seed: u64| {
        let mut world = common::create_test_world();
        world.insert_resource(GameRng(SmallRng::seed_from_u64(seed)));
        spawn_via_system(&mut world, PhotoId(0));

        let mut pieces = world.query::<(&Piece, &Position, &Renderable)>();
        let mut list: Vec<(usize, Vec2, u32)> = pieces
            .iter(&world)
            .map(|(piece, position, renderable)| (piece.slot, position.0, renderable.layer))
            .collect();
        list.sort_by_key(|(slot, _, _)| *slot);
        list
    };

    assert_that(&layout(7)).is_equal_to(layout(7));
}

#[test]
fn test_clear_board_despawns_every_slot_and_piece() {
    let mut world = common::create_test_world();
    spawn_via_system(&mut world, PhotoId(0));
    assert_eq!(common::count_pieces(&mut world), PIECE_COUNT);

    world
        .run_system_once(
            |mut commands: Commands, entities: Query<Entity, Or<(With<Piece>, With<Slot>)>>| {
                clear_board(&mut commands, &entities);
            },
        )
        .expect("clear should run");

    assert_eq!(common::count_pieces(&mut world), 0);
    assert_eq!(common::count_slots(&mut world), 0);
}

#[test]
fn test_catalog_reports_pool_size_and_tiles() {
    let catalog = common::test_catalog();

    assert_that(&catalog.count()).is_equal_to(4);

    // A 450x450 photo cuts into 150x150 cells
    let tile = catalog.tile(PhotoId(0), 2, 1);
    assert_that(&tile.pos).is_equal_to(glam::UVec2::new(150, 300));
    assert_that(&tile.size).is_equal_to(glam::UVec2::new(150, 150));
}
