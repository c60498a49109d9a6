use bevy_ecs::{event::Events, system::RunSystemOnce};
use glam::Vec2;
use rompecabezas::{
    constants::board::{BOARD_ORIGIN, SNAP_DISTANCE},
    events::{PointerAction, PointerId, StageTransition},
    systems::{
        board::slot_position,
        drag::{drag_system, point_on_piece, should_snap},
        DragState, GameStage, PieceLift, Position, Renderable, Session, Snapped,
    },
};
use speculoos::prelude::*;

mod common;

fn playing_world() -> bevy_ecs::world::World {
    let mut world = common::create_test_world();
    world.insert_resource(GameStage::Playing);
    world
}

fn run_drag(world: &mut bevy_ecs::world::World) {
    world
        .run_system_once(drag_system)
        .expect("drag system should run");
    world.resource_mut::<Events<rompecabezas::events::GameEvent>>().clear();
}

#[test]
fn test_point_on_piece_interior_and_edges() {
    let top_left = Vec2::new(100.0, 100.0);

    assert_that(&point_on_piece(top_left, Vec2::new(100.0, 100.0))).is_true();
    assert_that(&point_on_piece(top_left, Vec2::new(175.0, 175.0))).is_true();

    // The far edges belong to the neighbour.
    assert_that(&point_on_piece(top_left, Vec2::new(250.0, 100.0))).is_false();
    assert_that(&point_on_piece(top_left, Vec2::new(100.0, 250.0))).is_false();
    assert_that(&point_on_piece(top_left, Vec2::new(99.9, 100.0))).is_false();
}

#[test]
fn test_should_snap_is_strictly_less_than() {
    let home = Vec2::new(400.0, 110.0);

    assert_that(&should_snap(home, home)).is_true();
    assert_that(&should_snap(home + Vec2::new(SNAP_DISTANCE - 0.1, 0.0), home)).is_true();

    // Exactly at the snap distance the piece stays loose.
    assert_that(&should_snap(home + Vec2::new(SNAP_DISTANCE, 0.0), home)).is_false();
    assert_that(&should_snap(home + Vec2::new(0.0, -SNAP_DISTANCE), home)).is_false();
}

#[test]
fn test_grab_follows_pointer_and_releases_loose() {
    let mut world = playing_world();
    let piece = common::spawn_test_piece(&mut world, 0, Vec2::new(100.0, 100.0));

    // Grab 20 pixels right and 30 down from the corner
    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Down, 120.0, 130.0),
    );
    run_drag(&mut world);

    let drag = world.resource::<DragState>();
    let active = drag.0.expect("press on a piece should start a drag");
    assert_that(&active.piece).is_equal_to(piece);
    assert_that(&active.grab_offset).is_equal_to(Vec2::new(20.0, 30.0));

    // Drag across the canvas; the grab point stays under the pointer
    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Move, 300.0, 300.0),
    );
    run_drag(&mut world);
    assert_that(&world.get::<Position>(piece).unwrap().0).is_equal_to(Vec2::new(280.0, 270.0));

    // Release far from the piece's slot
    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Up, 300.0, 300.0),
    );
    run_drag(&mut world);

    assert_that(&world.resource::<DragState>().0).is_equal_to(None);
    assert_that(&world.resource::<Session>().moves).is_equal_to(1);
    assert_that(&world.resource::<Session>().solved).is_equal_to(0);
    assert_that(&world.get::<Snapped>(piece).is_none()).is_true();
}

#[test]
fn test_release_inside_snap_radius_locks_piece() {
    let mut world = playing_world();
    let home = slot_position(0);
    let piece = common::spawn_test_piece(&mut world, 0, Vec2::new(100.0, 100.0));

    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Down, 100.0, 100.0),
    );
    run_drag(&mut world);

    // Drop with the corner 50 pixels from home, inside the snap radius
    common::send_game_event(
        &mut world,
        common::pointer(
            PointerId::Mouse,
            PointerAction::Up,
            home.x + 30.0,
            home.y + 40.0,
        ),
    );
    run_drag(&mut world);

    // The piece lands exactly on its slot, not where it was dropped
    assert_that(&world.get::<Position>(piece).unwrap().0).is_equal_to(home);
    assert_that(&world.get::<Snapped>(piece).is_some()).is_true();
    assert_that(&world.resource::<Session>().solved).is_equal_to(1);
    assert_that(&world.resource::<Session>().moves).is_equal_to(1);
}

#[test]
fn test_release_at_exactly_snap_distance_stays_loose() {
    let mut world = playing_world();
    let home = slot_position(0);
    let piece = common::spawn_test_piece(&mut world, 0, Vec2::new(100.0, 100.0));

    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Down, 100.0, 100.0),
    );
    run_drag(&mut world);
    common::send_game_event(
        &mut world,
        common::pointer(
            PointerId::Mouse,
            PointerAction::Up,
            home.x + SNAP_DISTANCE,
            home.y,
        ),
    );
    run_drag(&mut world);

    assert_that(&world.get::<Snapped>(piece).is_none()).is_true();
    assert_that(&world.get::<Position>(piece).unwrap().0)
        .is_equal_to(home + Vec2::new(SNAP_DISTANCE, 0.0));
    assert_that(&world.resource::<Session>().solved).is_equal_to(0);
}

#[test]
fn test_release_in_place_still_counts_a_move() {
    let mut world = playing_world();
    common::spawn_test_piece(&mut world, 8, Vec2::new(100.0, 100.0));

    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Down, 110.0, 110.0),
    );
    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Up, 110.0, 110.0),
    );
    run_drag(&mut world);

    assert_that(&world.resource::<Session>().moves).is_equal_to(1);
    assert_that(&world.resource::<Session>().solved).is_equal_to(0);
}

#[test]
fn test_snapped_piece_ignores_the_pointer() {
    let mut world = playing_world();
    let home = slot_position(4);
    let piece = common::spawn_snapped_piece(&mut world, 4);

    common::send_game_event(
        &mut world,
        common::pointer(
            PointerId::Mouse,
            PointerAction::Down,
            home.x + 10.0,
            home.y + 10.0,
        ),
    );
    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Up, 500.0, 500.0),
    );
    run_drag(&mut world);

    // No grab happened, so the release is no gesture and no move
    assert_that(&world.resource::<DragState>().0).is_equal_to(None);
    assert_that(&world.resource::<Session>().moves).is_equal_to(0);
    assert_that(&world.get::<Position>(piece).unwrap().0).is_equal_to(home);
}

#[test]
fn test_second_pointer_cannot_steal_a_drag() {
    let mut world = playing_world();
    let piece = common::spawn_test_piece(&mut world, 0, Vec2::new(100.0, 100.0));

    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Down, 110.0, 110.0),
    );
    run_drag(&mut world);

    // A finger lands on the same piece mid-drag and lets go elsewhere
    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Finger(1), PointerAction::Down, 110.0, 110.0),
    );
    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Finger(1), PointerAction::Move, 600.0, 600.0),
    );
    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Finger(1), PointerAction::Up, 600.0, 600.0),
    );
    run_drag(&mut world);

    // The mouse still owns the gesture and the piece never moved
    let active = world.resource::<DragState>().0.expect("drag should survive");
    assert_that(&active.pointer).is_equal_to(PointerId::Mouse);
    assert_that(&world.resource::<Session>().moves).is_equal_to(0);
    assert_that(&world.get::<Position>(piece).unwrap().0).is_equal_to(Vec2::new(100.0, 100.0));

    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Up, 110.0, 110.0),
    );
    run_drag(&mut world);
    assert_that(&world.resource::<DragState>().0).is_equal_to(None);
    assert_that(&world.resource::<Session>().moves).is_equal_to(1);
}

#[test]
fn test_topmost_piece_wins_an_overlapped_press() {
    let mut world = playing_world();
    let below = common::spawn_test_piece(&mut world, 0, Vec2::new(100.0, 100.0));
    let above = common::spawn_test_piece(&mut world, 1, Vec2::new(120.0, 120.0));
    world.get_mut::<Renderable>(below).unwrap().layer = 2;
    world.get_mut::<Renderable>(above).unwrap().layer = 5;

    // Press where the two pieces overlap
    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Down, 130.0, 130.0),
    );
    run_drag(&mut world);

    let active = world.resource::<DragState>().0.expect("press should grab");
    assert_that(&active.piece).is_equal_to(above);
}

#[test]
fn test_grab_raises_piece_above_the_pile() {
    let mut world = playing_world();
    world.insert_resource(PieceLift(8));
    let piece = common::spawn_test_piece(&mut world, 0, Vec2::new(100.0, 100.0));

    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Down, 110.0, 110.0),
    );
    run_drag(&mut world);

    assert_that(&world.resource::<PieceLift>().0).is_equal_to(9);
    assert_that(&world.get::<Renderable>(piece).unwrap().layer).is_equal_to(9);
}

#[test]
fn test_pointer_ignored_while_round_not_live() {
    for stage in [
        GameStage::Idle,
        GameStage::ImageReveal { remaining_ticks: 60 },
        GameStage::WinDelay { remaining_ticks: 10 },
        GameStage::Won,
    ] {
        let mut world = common::create_test_world();
        world.insert_resource(stage);
        common::spawn_test_piece(&mut world, 0, Vec2::new(100.0, 100.0));

        common::send_game_event(
            &mut world,
            common::pointer(PointerId::Mouse, PointerAction::Down, 110.0, 110.0),
        );
        run_drag(&mut world);

        assert_that(&world.resource::<DragState>().0).is_equal_to(None);
        assert_that(&world.resource::<Session>().moves).is_equal_to(0);
    }
}

#[test]
fn test_ninth_snap_reports_the_puzzle_solved() {
    let mut world = playing_world();
    for slot in 0..8 {
        common::spawn_snapped_piece(&mut world, slot);
    }
    world.insert_resource(Session {
        photo: rompecabezas::texture::photos::PhotoId(0),
        moves: 14,
        solved: 8,
    });
    let home = slot_position(8);
    common::spawn_test_piece(&mut world, 8, Vec2::new(100.0, 100.0));

    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Down, 100.0, 100.0),
    );
    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Up, home.x + 5.0, home.y),
    );
    run_drag(&mut world);

    assert_that(&world.resource::<Session>().solved).is_equal_to(9);
    let transitions: Vec<StageTransition> = world
        .resource_mut::<Events<StageTransition>>()
        .drain()
        .collect();
    assert_that(&transitions).is_equal_to(vec![StageTransition::PuzzleSolved]);
}

#[test]
fn test_eighth_snap_does_not_end_the_round() {
    let mut world = playing_world();
    for slot in 0..7 {
        common::spawn_snapped_piece(&mut world, slot);
    }
    world.insert_resource(Session {
        photo: rompecabezas::texture::photos::PhotoId(0),
        moves: 10,
        solved: 7,
    });
    let home = slot_position(7);
    common::spawn_test_piece(&mut world, 7, Vec2::new(100.0, 100.0));
    common::spawn_test_piece(&mut world, 8, Vec2::new(100.0, 300.0));

    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Down, 100.0, 100.0),
    );
    common::send_game_event(
        &mut world,
        common::pointer(PointerId::Mouse, PointerAction::Up, home.x, home.y),
    );
    run_drag(&mut world);

    assert_that(&world.resource::<Session>().solved).is_equal_to(8);
    let transitions: Vec<StageTransition> = world
        .resource_mut::<Events<StageTransition>>()
        .drain()
        .collect();
    assert_that(&transitions.is_empty()).is_true();
}

#[test]
fn test_board_origin_is_on_canvas() {
    // Guards the geometry the drag tests lean on: slot 0 sits at the board
    // origin and the whole grid fits the canvas.
    assert_that(&slot_position(0)).is_equal_to(BOARD_ORIGIN);
}
