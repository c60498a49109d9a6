//! The in-round HUD: move counter on the left, countdown on the right.

use bevy_ecs::event::EventWriter;
use bevy_ecs::system::{NonSendMut, Res};
use glam::Vec2;
use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::constants::ui;
use crate::error::{GameError, TextureError};
use crate::systems::render::{palette, BackbufferResource};
use crate::systems::stage::{CountdownTimer, GameStage, Screen};
use crate::systems::components::Session;
use crate::texture::ttf::{TtfAtlas, TtfRenderer};

pub fn format_moves(moves: u32) -> String {
    format!("Movimientos: {moves}")
}

/// Rounds last half a minute, so the display never rolls into minutes and
/// always prints a literal `00:` prefix.
pub fn format_time(seconds: u32) -> String {
    format!("Tiempo: 00:{seconds:02}")
}

/// Draws the HUD over the finished frame while a round is on screen.
pub fn hud_render_system(
    mut canvas: NonSendMut<&'static mut Canvas<Window>>,
    mut backbuffer: NonSendMut<BackbufferResource>,
    mut ttf_atlas: NonSendMut<TtfAtlas>,
    stage: Res<GameStage>,
    session: Res<Session>,
    timer: Res<CountdownTimer>,
    mut errors: EventWriter<GameError>,
) {
    if stage.screen() != Screen::Playing {
        return;
    }

    let moves_text = format_moves(session.moves);
    let time_text = format_time(timer.remaining_seconds());
    let renderer = TtfRenderer::new(1.0);
    let time_x = ui::TIME_RIGHT_EDGE - renderer.text_width(&ttf_atlas, &time_text) as f32;

    let atlas = &mut *ttf_atlas;
    let _ = canvas.with_texture_canvas(&mut backbuffer.0, |canvas| {
        if let Err(error) = renderer.render_text(
            canvas,
            atlas,
            &moves_text,
            ui::MOVES_POSITION,
            palette::HUD_TEXT,
        ) {
            errors.write(
                TextureError::RenderFailed(format!("HUD move counter: {error}")).into(),
            );
        }
        if let Err(error) = renderer.render_text(
            canvas,
            atlas,
            &time_text,
            Vec2::new(time_x, ui::TIME_Y),
            palette::HUD_TEXT,
        ) {
            errors.write(TextureError::RenderFailed(format!("HUD countdown: {error}")).into());
        }
    });
}
