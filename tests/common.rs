#![allow(dead_code)]

use bevy_ecs::{entity::Entity, event::Events, system::RunSystemOnce, world::World};
use glam::{UVec2, Vec2};
use rand::{rngs::SmallRng, SeedableRng};
use rompecabezas::{
    error::GameError,
    events::{GameEvent, PointerAction, PointerId, PointerInput, StageTransition},
    systems::{
        stage_system, timer_system, AudioEvent, AudioState, BackdropBlur, CountdownTimer,
        DragState, GameRng, GameStage, GlobalState, Piece, PieceLift, PhotoCatalog, Position,
        Renderable, Session, Slot, Snapped,
    },
    texture::photos::PhotoTile,
};

/// A four-photo pool of square 450x450 textures, the shape the bundled
/// assets have.
pub fn test_catalog() -> PhotoCatalog {
    PhotoCatalog::new(vec![UVec2::new(450, 450); 4])
}

/// Creates a test world with every resource the gameplay systems expect.
pub fn create_test_world() -> World {
    let mut world = World::new();

    // Add required resources
    world.insert_resource(Events::<GameEvent>::default());
    world.insert_resource(Events::<StageTransition>::default());
    world.insert_resource(Events::<AudioEvent>::default());
    world.insert_resource(Events::<GameError>::default());
    world.insert_resource(GameStage::Idle);
    world.insert_resource(CountdownTimer::default());
    world.insert_resource(Session::default());
    world.insert_resource(DragState::default());
    world.insert_resource(PieceLift::default());
    world.insert_resource(BackdropBlur::default());
    world.insert_resource(GlobalState::default());
    world.insert_resource(AudioState::default());
    world.insert_resource(GameRng(SmallRng::seed_from_u64(0x5EED)));
    world.insert_resource(test_catalog());

    world
}

/// Sends a game event to the world
pub fn send_game_event(world: &mut World, event: GameEvent) {
    let mut events = world.resource_mut::<Events<GameEvent>>();
    events.send(event);
}

/// A pointer event at the given canvas point.
pub fn pointer(id: PointerId, action: PointerAction, x: f32, y: f32) -> GameEvent {
    GameEvent::Pointer(PointerInput {
        id,
        action,
        position: Vec2::new(x, y),
    })
}

/// Runs one scheduler tick of the stage machinery: the countdown first, then
/// the stage machine, matching their chained order in the real schedule.
///
/// Event buffers are cleared afterwards. `run_system_once` builds a fresh
/// reader every call, so anything left in a buffer would be read again on
/// the next tick.
pub fn tick_stage(world: &mut World) {
    world
        .run_system_once(timer_system)
        .expect("timer system should run");
    world
        .run_system_once(stage_system)
        .expect("stage system should run");
    world.resource_mut::<Events<GameEvent>>().clear();
    world.resource_mut::<Events<StageTransition>>().clear();
}

/// Ticks the stage machinery until the predicate holds, returning how many
/// ticks it took. Panics instead of spinning forever.
pub fn ticks_until(world: &mut World, limit: u32, done: impl Fn(GameStage) -> bool) -> u32 {
    for tick in 1..=limit {
        tick_stage(world);
        if done(*world.resource::<GameStage>()) {
            return tick;
        }
    }
    panic!("stage never arrived within {limit} ticks");
}

/// Spawns a loose test piece with its top-left corner at the given point.
pub fn spawn_test_piece(world: &mut World, slot: usize, top_left: Vec2) -> Entity {
    world
        .spawn((
            Piece { slot },
            Position(top_left),
            Renderable {
                tile: PhotoTile::default(),
                layer: slot as u32,
            },
        ))
        .id()
}

/// Spawns a piece already locked into its slot.
pub fn spawn_snapped_piece(world: &mut World, slot: usize) -> Entity {
    let entity = spawn_test_piece(world, slot, rompecabezas::systems::board::slot_position(slot));
    world.entity_mut(entity).insert(Snapped);
    entity
}

/// Spawns the nine slot entities without any pieces.
pub fn spawn_test_slots(world: &mut World) {
    for index in 0..rompecabezas::constants::board::PIECE_COUNT {
        world.spawn((
            Slot { index },
            Position(rompecabezas::systems::board::slot_position(index)),
        ));
    }
}

/// Counts the entities carrying the given component.
pub fn count_pieces(world: &mut World) -> usize {
    let mut query = world.query::<&Piece>();
    query.iter(world).count()
}

pub fn count_slots(world: &mut World) -> usize {
    let mut query = world.query::<&Slot>();
    query.iter(world).count()
}

/// Drains the audio event buffer for assertions.
pub fn drain_audio_events(world: &mut World) -> Vec<AudioEvent> {
    world.resource_mut::<Events<AudioEvent>>().drain().collect()
}
