//! Pointer-driven piece dragging and the snap magnet.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{EventReader, EventWriter};
use bevy_ecs::prelude::Without;
use bevy_ecs::system::{Commands, Query, Res, ResMut};
use glam::Vec2;
use tracing::{debug, trace};

use crate::constants::board::{PIECE_COUNT, PIECE_SIZE, SNAP_DISTANCE};
use crate::events::{GameEvent, PointerAction, StageTransition};
use crate::systems::board::slot_position;
use crate::systems::components::{
    ActiveDrag, DragState, Piece, PieceLift, Position, Renderable, Session, Snapped,
};
use crate::systems::stage::GameStage;

/// Whether a canvas point lands on a piece whose top-left corner is given.
/// Half-open on the far edges so neighbouring pieces never both claim a
/// boundary pixel.
pub fn point_on_piece(top_left: Vec2, point: Vec2) -> bool {
    point.x >= top_left.x
        && point.x < top_left.x + PIECE_SIZE
        && point.y >= top_left.y
        && point.y < top_left.y + PIECE_SIZE
}

/// The snap magnet: a released piece locks in when its top-left corner is
/// strictly closer than [`SNAP_DISTANCE`] to its slot's. At exactly the
/// snap distance the piece stays loose.
pub fn should_snap(piece_top_left: Vec2, slot_top_left: Vec2) -> bool {
    piece_top_left.distance(slot_top_left) < SNAP_DISTANCE
}

/// Runs the drag gesture: grab on press, follow on move, drop on release.
/// A release always counts as a move, and a drop close enough to the
/// piece's own slot snaps it in for good.
pub fn drag_system(
    mut commands: Commands,
    stage: Res<GameStage>,
    mut events: EventReader<GameEvent>,
    mut drag: ResMut<DragState>,
    mut lift: ResMut<PieceLift>,
    mut session: ResMut<Session>,
    mut transitions: EventWriter<StageTransition>,
    mut pieces: Query<(Entity, &Piece, &mut Position, &mut Renderable), Without<Snapped>>,
) {
    for event in events.read() {
        let GameEvent::Pointer(pointer) = event else {
            continue;
        };
        // Pieces only respond while the round is live. The reveal overlay
        // and the win delay both leave the board inert.
        if !matches!(*stage, GameStage::Playing) {
            continue;
        }

        match pointer.action {
            PointerAction::Down => {
                if drag.0.is_some() {
                    continue;
                }
                let point = pointer.position;
                let mut grabbed: Option<(Entity, Vec2, u32)> = None;
                for (entity, _, position, renderable) in pieces.iter() {
                    if !point_on_piece(position.0, point) {
                        continue;
                    }
                    let on_top = grabbed
                        .map(|(_, _, layer)| renderable.layer > layer)
                        .unwrap_or(true);
                    if on_top {
                        grabbed = Some((entity, position.0, renderable.layer));
                    }
                }
                let Some((entity, top_left, _)) = grabbed else {
                    continue;
                };
                lift.0 += 1;
                if let Ok((_, piece, _, mut renderable)) = pieces.get_mut(entity) {
                    renderable.layer = lift.0;
                    drag.0 = Some(ActiveDrag {
                        pointer: pointer.id,
                        piece: entity,
                        grab_offset: point - top_left,
                    });
                    debug!(slot = piece.slot, layer = lift.0, "Piece grabbed");
                }
            }
            PointerAction::Move => {
                let Some(active) = drag.0 else {
                    continue;
                };
                if active.pointer != pointer.id {
                    continue;
                }
                if let Ok((_, _, mut position, _)) = pieces.get_mut(active.piece) {
                    position.0 = pointer.position - active.grab_offset;
                }
            }
            PointerAction::Up => {
                let Some(active) = drag.0 else {
                    continue;
                };
                if active.pointer != pointer.id {
                    continue;
                }
                drag.0 = None;
                session.moves += 1;
                let Ok((entity, piece, mut position, _)) = pieces.get_mut(active.piece) else {
                    continue;
                };
                position.0 = pointer.position - active.grab_offset;

                let home = slot_position(piece.slot);
                if should_snap(position.0, home) {
                    position.0 = home;
                    commands.entity(entity).insert(Snapped);
                    session.solved += 1;
                    debug!(
                        slot = piece.slot,
                        solved = session.solved,
                        "Piece snapped home"
                    );
                    if session.solved as usize == PIECE_COUNT {
                        transitions.write(StageTransition::PuzzleSolved);
                    }
                } else {
                    trace!(slot = piece.slot, "Piece released loose");
                }
            }
        }
    }
}
