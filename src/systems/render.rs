//! Frame drawing: backdrop, screens, board and the present step.
//!
//! Everything draws into an off-screen backbuffer at the logical canvas size,
//! which the present system blits to the window once per tick. The blurred
//! backdrop goes through a small scratch target first, so the upscale's linear
//! filtering does the smearing.

use bevy_ecs::change_detection::DetectChanges;
use bevy_ecs::event::EventWriter;
use bevy_ecs::prelude::{Changed, Or, With, Without};
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{NonSend, NonSendMut, Query, Res, ResMut};
use glam::Vec2;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas, Texture};
use sdl2::video::Window;

use crate::constants::board::{BOARD_ORIGIN, BOARD_SIZE, PIECE_SIZE};
use crate::constants::CANVAS_SIZE;
use crate::error::{GameError, GameResult, TextureError};
use crate::systems::components::{
    BackdropBlur, Piece, Position, Renderable, Session, Slot,
};
use crate::systems::hud;
use crate::systems::menu;
use crate::systems::stage::{CountdownTimer, GameStage, Screen};
use crate::texture::photos::{PhotoId, PhotoSet, PhotoTile};
use crate::texture::ttf::{TtfAtlas, TtfRenderer};

pub(crate) mod palette {
    use sdl2::pixels::Color;

    pub const BACKGROUND: Color = Color::RGB(14, 16, 26);
    pub const SCRIM: Color = Color::RGBA(8, 10, 18, 180);
    pub const BOARD_PANEL: Color = Color::RGBA(10, 12, 20, 140);
    pub const SLOT_OUTLINE: Color = Color::RGBA(235, 235, 245, 90);
    pub const PREVIEW_FRAME: Color = Color::RGB(245, 245, 250);
    pub const HEADLINE: Color = Color::RGB(250, 250, 255);
    pub const BODY: Color = Color::RGB(215, 218, 230);
    pub const HUD_TEXT: Color = Color::RGB(245, 245, 250);
    pub const BUTTON_FILL: Color = Color::RGBA(30, 120, 190, 230);
    pub const BUTTON_BORDER: Color = Color::RGB(240, 245, 255);
    pub const BUTTON_LABEL: Color = Color::RGB(255, 255, 255);
}

/// Off-screen target every draw system renders into.
pub struct BackbufferResource(pub Texture);

/// Small scratch target for the backdrop blur. Drawing the photo into it
/// throws away detail; stretching it back out smears what is left.
pub struct BlurTargetResource(pub Texture);

/// Set when something visible changed this tick. Draw systems are skipped
/// entirely on clean frames.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderDirty(pub bool);

impl Default for RenderDirty {
    fn default() -> Self {
        // The first frame always draws.
        RenderDirty(true)
    }
}

/// Marks the frame dirty when any visible state moved since the last draw.
pub fn dirty_render_system(
    mut dirty: ResMut<RenderDirty>,
    changed_entities: Query<(), Or<(Changed<Position>, Changed<Renderable>)>>,
    stage: Res<GameStage>,
    session: Res<Session>,
    timer: Res<CountdownTimer>,
    blur: Res<BackdropBlur>,
) {
    if dirty.0 {
        return;
    }
    dirty.0 = !changed_entities.is_empty()
        || stage.is_changed()
        || session.is_changed()
        || timer.is_changed()
        || blur.is_changed();
}

fn full_canvas() -> Rect {
    Rect::new(0, 0, CANVAS_SIZE.x, CANVAS_SIZE.y)
}

fn board_rect() -> Rect {
    Rect::new(
        BOARD_ORIGIN.x as i32,
        BOARD_ORIGIN.y as i32,
        BOARD_SIZE as u32,
        BOARD_SIZE as u32,
    )
}

fn piece_rect(top_left: Vec2) -> Rect {
    Rect::new(
        top_left.x.round() as i32,
        top_left.y.round() as i32,
        PIECE_SIZE as u32,
        PIECE_SIZE as u32,
    )
}

/// Draws the whole frame for the current screen into the backbuffer.
#[allow(clippy::too_many_arguments)]
pub fn render_system(
    mut canvas: NonSendMut<&'static mut Canvas<Window>>,
    mut backbuffer: NonSendMut<BackbufferResource>,
    mut blur_target: NonSendMut<BlurTargetResource>,
    photos: NonSend<PhotoSet>,
    mut ttf_atlas: NonSendMut<TtfAtlas>,
    stage: Res<GameStage>,
    session: Res<Session>,
    blur: Res<BackdropBlur>,
    pieces: Query<(&Position, &Renderable), With<Piece>>,
    slots: Query<&Position, (With<Slot>, Without<Piece>)>,
    mut errors: EventWriter<GameError>,
) {
    let stage = *stage;
    let session = *session;

    // The scratch pass has to finish before the backbuffer borrows the canvas.
    if blur.0 {
        let small = Rect::new(
            0,
            0,
            blur_target.0.query().width,
            blur_target.0.query().height,
        );
        let photos = &*photos;
        let mut scratch_error: Option<TextureError> = None;
        let _ = canvas.with_texture_canvas(&mut blur_target.0, |canvas| {
            if let Err(error) = photos.render_full(canvas, session.photo, small) {
                scratch_error = Some(error);
            }
        });
        if let Some(error) = scratch_error {
            errors.write(error.into());
        }
    }

    let mut draw_list: Vec<(Vec2, PhotoTile, u32)> = pieces
        .iter()
        .map(|(position, renderable)| (position.0, renderable.tile, renderable.layer))
        .collect();
    draw_list.sort_unstable_by_key(|(_, _, layer)| *layer);
    let slot_positions: Vec<Vec2> = slots.iter().map(|position| position.0).collect();

    let atlas = &mut *ttf_atlas;
    let photos = &*photos;
    let blur_texture = blur.0.then_some(&blur_target.0);

    let mut frame_error: Option<GameError> = None;
    let _ = canvas.with_texture_canvas(&mut backbuffer.0, |canvas| {
        if let Err(error) = draw_frame(
            canvas,
            atlas,
            photos,
            blur_texture,
            stage,
            session,
            &draw_list,
            &slot_positions,
        ) {
            frame_error = Some(error);
        }
    });
    if let Some(error) = frame_error {
        errors.write(error);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_frame(
    canvas: &mut Canvas<Window>,
    atlas: &mut TtfAtlas,
    photos: &PhotoSet,
    blur_texture: Option<&Texture>,
    stage: GameStage,
    session: Session,
    draw_list: &[(Vec2, PhotoTile, u32)],
    slot_positions: &[Vec2],
) -> GameResult<()> {
    canvas.set_blend_mode(BlendMode::Blend);
    canvas.set_draw_color(palette::BACKGROUND);
    canvas.clear();

    draw_backdrop(canvas, photos, blur_texture, session.photo)?;

    match stage.screen() {
        Screen::Start => {
            draw_scrim(canvas)?;
            draw_centered_text(canvas, atlas, "ROMPECABEZAS", 2.0, 170.0, palette::HEADLINE)?;
            draw_centered_text(
                canvas,
                atlas,
                "Arma la foto antes de que acabe el tiempo",
                1.0,
                252.0,
                palette::BODY,
            )?;
            draw_buttons(canvas, atlas, Screen::Start)?;
        }
        Screen::Transition => {
            draw_scrim(canvas)?;
            draw_centered_text(canvas, atlas, "¡PREPÁRATE!", 2.0, 280.0, palette::HEADLINE)?;
        }
        Screen::Playing => {
            draw_board(canvas, photos, session.photo, slot_positions, draw_list)?;
            if matches!(stage, GameStage::ImageReveal { .. }) {
                draw_preview(canvas, photos, session.photo)?;
            }
        }
        Screen::Win => {
            // The finished board stays visible behind the win screen.
            draw_board(canvas, photos, session.photo, slot_positions, draw_list)?;
            draw_scrim(canvas)?;
            draw_centered_text(canvas, atlas, "¡GANASTE!", 2.0, 200.0, palette::HEADLINE)?;
            draw_centered_text(
                canvas,
                atlas,
                &hud::format_moves(session.moves),
                1.0,
                282.0,
                palette::BODY,
            )?;
            draw_buttons(canvas, atlas, Screen::Win)?;
        }
        Screen::Lose => {
            draw_scrim(canvas)?;
            draw_centered_text(canvas, atlas, "¡PERDISTE!", 2.0, 200.0, palette::HEADLINE)?;
            draw_centered_text(
                canvas,
                atlas,
                "Se acabó el tiempo",
                1.0,
                282.0,
                palette::BODY,
            )?;
            draw_buttons(canvas, atlas, Screen::Lose)?;
        }
    }

    Ok(())
}

fn draw_backdrop(
    canvas: &mut Canvas<Window>,
    photos: &PhotoSet,
    blur_texture: Option<&Texture>,
    photo: PhotoId,
) -> GameResult<()> {
    match blur_texture {
        Some(texture) => {
            canvas
                .copy(texture, None, full_canvas())
                .map_err(TextureError::RenderFailed)?;
        }
        None => photos.render_full(canvas, photo, full_canvas())?,
    }
    Ok(())
}

fn draw_scrim(canvas: &mut Canvas<Window>) -> GameResult<()> {
    canvas.set_draw_color(palette::SCRIM);
    canvas
        .fill_rect(full_canvas())
        .map_err(TextureError::RenderFailed)?;
    Ok(())
}

fn draw_board(
    canvas: &mut Canvas<Window>,
    photos: &PhotoSet,
    photo: PhotoId,
    slot_positions: &[Vec2],
    draw_list: &[(Vec2, PhotoTile, u32)],
) -> GameResult<()> {
    canvas.set_draw_color(palette::BOARD_PANEL);
    canvas
        .fill_rect(board_rect())
        .map_err(TextureError::RenderFailed)?;

    canvas.set_draw_color(palette::SLOT_OUTLINE);
    for position in slot_positions {
        canvas
            .draw_rect(piece_rect(*position))
            .map_err(TextureError::RenderFailed)?;
    }

    for (position, tile, _) in draw_list {
        photos.render_tile(canvas, photo, *tile, piece_rect(*position))?;
    }

    Ok(())
}

fn draw_preview(canvas: &mut Canvas<Window>, photos: &PhotoSet, photo: PhotoId) -> GameResult<()> {
    photos.render_full(canvas, photo, board_rect())?;
    canvas.set_draw_color(palette::PREVIEW_FRAME);
    canvas
        .draw_rect(board_rect())
        .map_err(TextureError::RenderFailed)?;
    Ok(())
}

fn draw_centered_text(
    canvas: &mut Canvas<Window>,
    atlas: &mut TtfAtlas,
    text: &str,
    scale: f32,
    y: f32,
    color: Color,
) -> GameResult<()> {
    let renderer = TtfRenderer::new(scale);
    let x = (CANVAS_SIZE.x as f32 - renderer.text_width(atlas, text) as f32) / 2.0;
    renderer.render_text(canvas, atlas, text, Vec2::new(x, y), color)?;
    Ok(())
}

fn draw_buttons(canvas: &mut Canvas<Window>, atlas: &mut TtfAtlas, screen: Screen) -> GameResult<()> {
    let renderer = TtfRenderer::new(1.0);
    for button in menu::screen_buttons(screen) {
        let rect = Rect::new(
            button.top_left.x as i32,
            button.top_left.y as i32,
            menu::BUTTON_SIZE.x as u32,
            menu::BUTTON_SIZE.y as u32,
        );
        canvas.set_draw_color(palette::BUTTON_FILL);
        canvas.fill_rect(rect).map_err(TextureError::RenderFailed)?;
        canvas.set_draw_color(palette::BUTTON_BORDER);
        canvas.draw_rect(rect).map_err(TextureError::RenderFailed)?;

        let center = button.center();
        let label_position = Vec2::new(
            center.x - renderer.text_width(atlas, button.label) as f32 / 2.0,
            center.y - renderer.text_height(atlas) as f32 / 2.0,
        );
        renderer.render_text(canvas, atlas, button.label, label_position, palette::BUTTON_LABEL)?;
    }
    Ok(())
}

/// Blits the finished backbuffer to the window and flips it.
pub fn present_system(
    mut canvas: NonSendMut<&'static mut Canvas<Window>>,
    backbuffer: NonSend<BackbufferResource>,
    mut dirty: ResMut<RenderDirty>,
    mut errors: EventWriter<GameError>,
) {
    if let Err(error) = canvas.copy(&backbuffer.0, None, None) {
        errors.write(TextureError::RenderFailed(error).into());
    }
    canvas.present();
    dirty.0 = false;
}
