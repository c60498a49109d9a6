//! Translates SDL input into game events.

use std::collections::HashMap;

use bevy_ecs::event::EventWriter;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{NonSendMut, Res};
use glam::Vec2;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::EventPump;
use tracing::trace;

use crate::constants::CANVAS_SIZE;
use crate::events::{GameCommand, GameEvent, PointerAction, PointerId, PointerInput};

/// Mouse instance id SDL uses for mouse events it synthesizes from touch.
/// Those are dropped so a finger never acts as two pointers at once.
const TOUCH_MOUSE_ID: u32 = u32::MAX;

/// Keyboard bindings. Swappable as a resource, though nothing rebinds at
/// runtime today.
#[derive(Resource, Debug, Clone)]
pub struct Bindings(pub HashMap<Keycode, GameCommand>);

impl Default for Bindings {
    fn default() -> Self {
        Bindings(HashMap::from([
            (Keycode::Return, GameCommand::Play),
            (Keycode::Space, GameCommand::Play),
            (Keycode::R, GameCommand::Restart),
            (Keycode::Escape, GameCommand::Exit),
            (Keycode::M, GameCommand::MuteAudio),
            (Keycode::Q, GameCommand::Quit),
        ]))
    }
}

/// Mouse coordinates arrive already mapped onto the logical canvas, since
/// the renderer runs with a fixed logical size.
pub fn mouse_to_canvas(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32, y as f32)
}

/// Maps SDL's normalized touch coordinates onto the logical canvas.
pub fn normalized_to_canvas(x: f32, y: f32) -> Vec2 {
    Vec2::new(x * CANVAS_SIZE.x as f32, y * CANVAS_SIZE.y as f32)
}

/// Turns one SDL event into a game event, if it maps to one.
pub fn translate_sdl_event(event: &Event, bindings: &Bindings) -> Option<GameEvent> {
    match event {
        Event::Quit { .. } => Some(GameCommand::Quit.into()),
        Event::KeyDown {
            keycode: Some(keycode),
            repeat: false,
            ..
        } => bindings.0.get(keycode).copied().map(GameEvent::from),
        Event::MouseButtonDown {
            mouse_btn: MouseButton::Left,
            which,
            x,
            y,
            ..
        } if *which != TOUCH_MOUSE_ID => Some(
            PointerInput {
                id: PointerId::Mouse,
                action: PointerAction::Down,
                position: mouse_to_canvas(*x, *y),
            }
            .into(),
        ),
        Event::MouseMotion { which, x, y, .. } if *which != TOUCH_MOUSE_ID => Some(
            PointerInput {
                id: PointerId::Mouse,
                action: PointerAction::Move,
                position: mouse_to_canvas(*x, *y),
            }
            .into(),
        ),
        Event::MouseButtonUp {
            mouse_btn: MouseButton::Left,
            which,
            x,
            y,
            ..
        } if *which != TOUCH_MOUSE_ID => Some(
            PointerInput {
                id: PointerId::Mouse,
                action: PointerAction::Up,
                position: mouse_to_canvas(*x, *y),
            }
            .into(),
        ),
        Event::FingerDown {
            finger_id, x, y, ..
        } => Some(
            PointerInput {
                id: PointerId::Finger(*finger_id),
                action: PointerAction::Down,
                position: normalized_to_canvas(*x, *y),
            }
            .into(),
        ),
        Event::FingerMotion {
            finger_id, x, y, ..
        } => Some(
            PointerInput {
                id: PointerId::Finger(*finger_id),
                action: PointerAction::Move,
                position: normalized_to_canvas(*x, *y),
            }
            .into(),
        ),
        Event::FingerUp {
            finger_id, x, y, ..
        } => Some(
            PointerInput {
                id: PointerId::Finger(*finger_id),
                action: PointerAction::Up,
                position: normalized_to_canvas(*x, *y),
            }
            .into(),
        ),
        _ => None,
    }
}

/// Drains the SDL event queue and forwards whatever maps to a game event.
pub fn input_system(
    mut event_pump: NonSendMut<EventPump>,
    bindings: Res<Bindings>,
    mut events: EventWriter<GameEvent>,
) {
    for sdl_event in event_pump.poll_iter() {
        if let Some(game_event) = translate_sdl_event(&sdl_event, &bindings) {
            trace!(?game_event, "Input event");
            events.write(game_event);
        }
    }
}
