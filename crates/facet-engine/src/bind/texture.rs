use std::path::Path;

use crate::error::{Error, Result};
use crate::gfx::{Graphics, ImageData, TextureId};

use super::{Bindable, BindableKind, DrawContext};

/// Decodes an image file into RGBA8 pixels.
pub fn load_image(path: &Path) -> Result<ImageData> {
    let image = image::open(path)
        .map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = image.dimensions();
    log::debug!("loaded image {} ({width}x{height})", path.display());
    Ok(ImageData {
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// Shader resource bound to a pixel-stage texture slot.
pub struct Texture {
    id: TextureId,
    slot: u32,
}

impl Texture {
    pub fn new(gfx: &mut Graphics, image: &ImageData, slot: u32) -> Result<Self> {
        let id = gfx.backend_mut().create_texture(image)?;
        Ok(Self { id, slot })
    }

    pub fn from_file(gfx: &mut Graphics, path: &Path, slot: u32) -> Result<Self> {
        let image = load_image(path)?;
        Self::new(gfx, &image, slot)
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }
}

impl Bindable for Texture {
    fn bind(&self, gfx: &mut Graphics, _ctx: &DrawContext) {
        gfx.backend_mut().set_texture(self.slot, self.id);
    }

    fn kind(&self) -> BindableKind {
        BindableKind::Texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_image_error() {
        let err = load_image(Path::new("/nonexistent/cube.png")).unwrap_err();
        assert!(matches!(err, Error::Image { .. }));
        assert!(err.to_string().contains("cube.png"));
    }

    #[test]
    fn decodes_png_to_rgba() {
        let path = std::env::temp_dir().join(format!("facet-texture-{}.png", std::process::id()));
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let data = load_image(&path).unwrap();
        assert_eq!((data.width, data.height), (2, 3));
        assert_eq!(data.rgba.len(), 2 * 3 * 4);
        assert_eq!(&data.rgba[..4], &[10, 20, 30, 255]);
        let _ = std::fs::remove_file(&path);
    }
}
