//! Cross-platform asset loading abstraction.
//! On desktop, assets are embedded using include_bytes!; on Emscripten, assets are loaded from the filesystem.

use std::borrow::Cow;

use crate::error::AssetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Photo1,
    Photo2,
    Photo3,
    Photo4,
    Music,
    FontSans,
}

/// The photo pool a round's puzzle image is drawn from.
pub const PHOTOS: [Asset; 4] = [Asset::Photo1, Asset::Photo2, Asset::Photo3, Asset::Photo4];

impl Asset {
    #[cfg(target_os = "emscripten")]
    fn path(self) -> &'static str {
        match self {
            Asset::Photo1 => "photos/photo_1.bmp",
            Asset::Photo2 => "photos/photo_2.bmp",
            Asset::Photo3 => "photos/photo_3.bmp",
            Asset::Photo4 => "photos/photo_4.bmp",
            Asset::Music => "music/theme.wav",
            Asset::FontSans => "font/DejaVuSans.ttf",
        }
    }
}

#[cfg(not(target_os = "emscripten"))]
mod imp {
    use super::*;

    macro_rules! asset_bytes_enum {
        ( $asset:expr ) => {
            match $asset {
                Asset::Photo1 => Cow::Borrowed(include_bytes!("../assets/photos/photo_1.bmp") as &[u8]),
                Asset::Photo2 => Cow::Borrowed(include_bytes!("../assets/photos/photo_2.bmp") as &[u8]),
                Asset::Photo3 => Cow::Borrowed(include_bytes!("../assets/photos/photo_3.bmp") as &[u8]),
                Asset::Photo4 => Cow::Borrowed(include_bytes!("../assets/photos/photo_4.bmp") as &[u8]),
                Asset::Music => Cow::Borrowed(include_bytes!("../assets/music/theme.wav") as &[u8]),
                Asset::FontSans => Cow::Borrowed(include_bytes!("../assets/font/DejaVuSans.ttf") as &[u8]),
            }
        };
    }

    pub fn get_asset_bytes(asset: Asset) -> Result<Cow<'static, [u8]>, AssetError> {
        Ok(asset_bytes_enum!(asset))
    }
}

#[cfg(target_os = "emscripten")]
mod imp {
    use super::*;
    use std::fs;
    use std::io;
    use std::path::Path;

    pub fn get_asset_bytes(asset: Asset) -> Result<Cow<'static, [u8]>, AssetError> {
        let path = Path::new("assets").join(asset.path());
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AssetError::NotFound(path.display().to_string()),
            _ => AssetError::Io(e),
        })?;
        Ok(Cow::Owned(bytes))
    }
}

pub use imp::get_asset_bytes;
