use bevy_ecs::prelude::*;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    /// Start a round from the start screen.
    Play,
    /// Start a fresh round from the win/lose screens.
    Restart,
    /// Abandon the session and return to the start screen.
    Exit,
    MuteAudio,
    /// Shut the application down.
    Quit,
}

/// Which physical pointer produced an input. A drag belongs to exactly one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerId {
    Mouse,
    Finger(i64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Move,
    Up,
}

/// A mouse or touch input, already mapped into canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub id: PointerId,
    pub action: PointerAction,
    pub position: Vec2,
}

#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    Command(GameCommand),
    Pointer(PointerInput),
}

/// Requests for the stage machine, raised by gameplay systems.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageTransition {
    /// The round countdown reached zero.
    TimerExpired,
    /// The ninth piece snapped into its slot.
    PuzzleSolved,
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

impl From<PointerInput> for GameEvent {
    fn from(pointer: PointerInput) -> Self {
        GameEvent::Pointer(pointer)
    }
}
