//! Photo textures and the 3x3 crop grid pieces are cut from.
//!
//! Each puzzle piece renders a source-rect crop of the round's photo. Crops are
//! computed from the texture's queried size, so photo resolution is independent
//! of the board geometry.

use glam::UVec2;
use sdl2::image::LoadTexture;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, RenderTarget, Texture, TextureCreator};
use sdl2::video::WindowContext;
use tracing::debug;

use crate::asset::{self, PHOTOS};
use crate::constants::board::GRID_SIZE;
use crate::error::{GameError, TextureError};

/// Index into the loaded photo pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhotoId(pub usize);

/// A single crop within a photo, defined by its position and size in texture pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PhotoTile {
    pub pos: UVec2,
    pub size: UVec2,
}

/// The source rect of cell `(row, col)` within a photo of the given size.
///
/// The photo is divided into a uniform grid; remainder pixels from the integer
/// division are dropped off the right/bottom edges.
pub fn piece_tile(texture_size: UVec2, row: u32, col: u32) -> PhotoTile {
    let cell = texture_size / GRID_SIZE;
    PhotoTile {
        pos: UVec2::new(col * cell.x, row * cell.y),
        size: cell,
    }
}

struct Photo {
    texture: Texture,
    size: UVec2,
}

/// The loaded photo pool, one texture per bundled photo.
pub struct PhotoSet {
    photos: Vec<Photo>,
}

impl PhotoSet {
    /// Loads every bundled photo into a texture. Any failure is a startup
    /// configuration error; the game cannot run without its photo pool.
    pub fn load(texture_creator: &TextureCreator<WindowContext>) -> Result<Self, GameError> {
        let mut photos = Vec::with_capacity(PHOTOS.len());
        for asset in PHOTOS {
            let bytes = asset::get_asset_bytes(asset)?;
            let texture = texture_creator
                .load_texture_bytes(&bytes)
                .map_err(|e| GameError::Config(format!("failed to load {asset:?}: {e}")))?;
            let query = texture.query();
            let size = UVec2::new(query.width, query.height);
            photos.push(Photo { texture, size });
        }

        debug!(photo_count = photos.len(), "Loaded photo pool");
        Ok(Self { photos })
    }

    pub fn count(&self) -> usize {
        self.photos.len()
    }

    /// Texture sizes of every photo, in pool order.
    pub fn sizes(&self) -> Vec<UVec2> {
        self.photos.iter().map(|photo| photo.size).collect()
    }

    /// Pixel dimensions of a photo's texture.
    pub fn size_of(&self, id: PhotoId) -> UVec2 {
        self.photos[id.0].size
    }

    /// The source rect of cell `(row, col)` within the given photo.
    pub fn tile(&self, id: PhotoId, row: u32, col: u32) -> PhotoTile {
        piece_tile(self.size_of(id), row, col)
    }

    /// Draws one crop of a photo into `dest`.
    pub fn render_tile<C: RenderTarget>(
        &self,
        canvas: &mut Canvas<C>,
        id: PhotoId,
        tile: PhotoTile,
        dest: Rect,
    ) -> Result<(), TextureError> {
        let src = Rect::new(tile.pos.x as i32, tile.pos.y as i32, tile.size.x, tile.size.y);
        canvas
            .copy(&self.photos[id.0].texture, src, dest)
            .map_err(TextureError::RenderFailed)
    }

    /// Draws a whole photo into `dest`.
    pub fn render_full<C: RenderTarget>(
        &self,
        canvas: &mut Canvas<C>,
        id: PhotoId,
        dest: Rect,
    ) -> Result<(), TextureError> {
        canvas
            .copy(&self.photos[id.0].texture, None, dest)
            .map_err(TextureError::RenderFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_tile_divides_evenly() {
        let tile = piece_tile(UVec2::new(450, 450), 1, 2);
        assert_eq!(tile.pos, UVec2::new(300, 150));
        assert_eq!(tile.size, UVec2::new(150, 150));
    }

    #[test]
    fn test_piece_tile_resolution_independent() {
        // A 900x600 photo still yields a full 3x3 grid of equal crops.
        let size = UVec2::new(900, 600);
        let tile = piece_tile(size, 2, 0);
        assert_eq!(tile.pos, UVec2::new(0, 400));
        assert_eq!(tile.size, UVec2::new(300, 200));
    }

    #[test]
    fn test_piece_tile_drops_remainder() {
        let tile = piece_tile(UVec2::new(451, 452), 2, 2);
        assert_eq!(tile.size, UVec2::new(150, 150));
        assert!(tile.pos.x + tile.size.x <= 451);
        assert!(tile.pos.y + tile.size.y <= 452);
    }
}
