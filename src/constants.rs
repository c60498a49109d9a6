//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::{UVec2, Vec2};

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Schedule runs per second; time-based stage delays are expressed in ticks of this rate.
pub const TICKS_PER_SECOND: u32 = 60;

/// The size of the logical canvas, in layout units (pixels at 1x scale).
pub const CANVAS_SIZE: UVec2 = UVec2::new(880, 620);

/// Initial window size relative to the logical canvas.
pub const SCALE: f32 = 1.0;

/// Board geometry: a 3x3 grid of square cells the pieces snap into.
pub mod board {
    use glam::Vec2;

    /// Cells per side of the puzzle grid.
    pub const GRID_SIZE: u32 = 3;
    /// Number of slots (and pieces) on the board.
    pub const PIECE_COUNT: usize = (GRID_SIZE * GRID_SIZE) as usize;
    /// Side length of a single piece/slot, in layout units.
    pub const PIECE_SIZE: f32 = 150.0;
    /// Side length of the assembled board, in layout units.
    pub const BOARD_SIZE: f32 = PIECE_SIZE * GRID_SIZE as f32;
    /// Top-left corner of the slot grid on the canvas.
    pub const BOARD_ORIGIN: Vec2 = Vec2::new(400.0, 110.0);
    /// A release closer than this to the piece's own slot snaps into place.
    /// The comparison is strict: a distance of exactly this value does not snap.
    pub const SNAP_DISTANCE: f32 = 60.0;
}

/// Scatter geometry: where unsolved pieces land before the player touches them.
pub mod scatter {
    use glam::Vec2;

    /// Top-left corner of the scatter pile.
    pub const ORIGIN: Vec2 = Vec2::new(30.0, 110.0);
    /// Vertical step between consecutive pieces' base positions.
    pub const STACK_STEP: f32 = 38.0;
    /// Random horizontal offset added to each piece's base position, `[0, x)`.
    pub const MAX_OFFSET_X: f32 = 200.0;
    /// Random vertical offset added to each piece's base position, `[0, y)`.
    pub const MAX_OFFSET_Y: f32 = 30.0;
}

/// Stage and countdown timings.
pub mod timing {
    use super::TICKS_PER_SECOND;

    /// Wait on the transition screen between the play action and the reveal.
    pub const PREVIEW_WAIT_TICKS: u32 = 5 * TICKS_PER_SECOND;
    /// How long the full-size photo stays up before the pieces appear.
    pub const IMAGE_REVEAL_TICKS: u32 = 3 * TICKS_PER_SECOND;
    /// Beat between the ninth snap and the win screen.
    pub const WIN_DELAY_TICKS: u32 = TICKS_PER_SECOND / 2;
    /// Countdown length for a round, in seconds.
    pub const ROUND_SECONDS: u32 = 30;
}

pub mod ui {
    use glam::Vec2;

    /// Point size the HUD/menu font is rasterized at.
    pub const FONT_SIZE: u16 = 22;
    /// Baseline position of the moves counter.
    pub const MOVES_POSITION: Vec2 = Vec2::new(30.0, 40.0);
    /// Right edge the time display is aligned against.
    pub const TIME_RIGHT_EDGE: f32 = 850.0;
    /// Baseline y of the time display.
    pub const TIME_Y: f32 = 40.0;
    /// Downscale factor of the blur scratch target; larger means blurrier.
    pub const BLUR_FACTOR: u32 = 8;
}

pub mod audio {
    /// Music playback volume as a fraction of `sdl2::mixer::MAX_VOLUME`.
    pub const MUSIC_VOLUME_PERCENT: u32 = 60;
}

/// Base position of piece `index` in the scatter pile, before its random offset.
pub fn scatter_base(index: usize) -> Vec2 {
    Vec2::new(scatter::ORIGIN.x, scatter::ORIGIN.y + index as f32 * scatter::STACK_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_time() {
        // 60 FPS = 16.67ms per frame
        let expected_nanos = (1_000_000_000.0 / 60.0) as u64;
        assert_eq!(LOOP_TIME.as_nanos() as u64, expected_nanos);
    }

    #[test]
    fn test_board_fits_canvas() {
        assert!(board::BOARD_ORIGIN.x + board::BOARD_SIZE <= CANVAS_SIZE.x as f32);
        assert!(board::BOARD_ORIGIN.y + board::BOARD_SIZE <= CANVAS_SIZE.y as f32);
    }

    #[test]
    fn test_scatter_never_reaches_board() {
        // The widest possible scattered piece must still end left of the slot grid.
        let max_right_edge = scatter::ORIGIN.x + scatter::MAX_OFFSET_X + board::PIECE_SIZE;
        assert!(max_right_edge <= board::BOARD_ORIGIN.x);
    }

    #[test]
    fn test_scatter_pile_fits_canvas() {
        let last_base = scatter_base(board::PIECE_COUNT - 1);
        assert!(last_base.y + scatter::MAX_OFFSET_Y + board::PIECE_SIZE <= CANVAS_SIZE.y as f32);
    }

    #[test]
    fn test_timing_tick_counts() {
        assert_eq!(timing::PREVIEW_WAIT_TICKS, 300);
        assert_eq!(timing::IMAGE_REVEAL_TICKS, 180);
        assert_eq!(timing::WIN_DELAY_TICKS, 30);
        assert_eq!(timing::ROUND_SECONDS, 30);
    }
}
