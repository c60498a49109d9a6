//! Screen buttons and their hit-testing.
//!
//! Buttons are plain rectangles on the logical canvas. Pressing one issues
//! the same [`GameCommand`] the keyboard would, so the stage machine never
//! cares where a command came from.

use glam::Vec2;

use crate::events::GameCommand;
use crate::systems::stage::Screen;

pub const BUTTON_SIZE: Vec2 = Vec2::new(180.0, 56.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub label: &'static str,
    pub top_left: Vec2,
    pub command: GameCommand,
}

impl Button {
    const fn new(label: &'static str, top_left: Vec2, command: GameCommand) -> Self {
        Self {
            label,
            top_left,
            command,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.top_left.x
            && point.x < self.top_left.x + BUTTON_SIZE.x
            && point.y >= self.top_left.y
            && point.y < self.top_left.y + BUTTON_SIZE.y
    }

    pub fn center(&self) -> Vec2 {
        self.top_left + BUTTON_SIZE / 2.0
    }
}

const PLAY_BUTTON: Button = Button::new("JUGAR", Vec2::new(350.0, 380.0), GameCommand::Play);
const RETRY_BUTTON: Button = Button::new("REINTENTAR", Vec2::new(250.0, 400.0), GameCommand::Restart);
const EXIT_BUTTON: Button = Button::new("SALIR", Vec2::new(450.0, 400.0), GameCommand::Exit);

static START_BUTTONS: [Button; 1] = [PLAY_BUTTON];
static END_BUTTONS: [Button; 2] = [RETRY_BUTTON, EXIT_BUTTON];

/// The buttons a screen presents. The transition and playing screens have
/// none; their input is the keyboard and the pieces themselves.
pub fn screen_buttons(screen: Screen) -> &'static [Button] {
    match screen {
        Screen::Start => &START_BUTTONS,
        Screen::Win | Screen::Lose => &END_BUTTONS,
        Screen::Transition | Screen::Playing => &[],
    }
}

/// Resolves a pointer press against the current screen's buttons.
pub fn hit_button(screen: Screen, point: Vec2) -> Option<GameCommand> {
    screen_buttons(screen)
        .iter()
        .find(|button| button.contains(point))
        .map(|button| button.command)
}
