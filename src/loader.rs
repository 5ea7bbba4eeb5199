// Opens a sprite sheet from disk and converts it into a PixelBuffer.
// Visual expectation: what you get back is the sheet exactly as an image
// viewer shows it, alpha included, ready for island scanning.

use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::PixelBuffer;

/// Decode any format the `image` crate understands (PNG, GIF, WebP, ...).
/// Zero-sized images are rejected with `EmptyInput`.
pub fn load_sheet(path: &Path) -> Result<PixelBuffer> {
    let rgba = image::open(path)
        .map_err(|e| Error::ImageDecode(format!("{}: {e}", path.display())))?
        .to_rgba8();
    debug!(path = %path.display(), width = rgba.width(), height = rgba.height(), "sheet decoded");
    from_rgba_image(&rgba)
}

/// Same as `load_sheet` for bytes already in memory (drag-drop, clipboard).
pub fn decode_sheet(bytes: &[u8]) -> Result<PixelBuffer> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| Error::ImageDecode(e.to_string()))?
        .to_rgba8();
    from_rgba_image(&rgba)
}

pub fn from_rgba_image(img: &RgbaImage) -> Result<PixelBuffer> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    if w == 0 || h == 0 {
        return Err(Error::EmptyInput { width: w, height: h });
    }
    PixelBuffer::from_rgba(w, h, img.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Cursor;

    #[test]
    fn decodes_png_bytes_with_alpha() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, Rgba([10, 20, 30, 200]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();

        let buf = decode_sheet(&bytes).unwrap();
        assert_eq!((buf.width(), buf.height()), (3, 2));
        assert_eq!(buf.get(2, 1), 0xC8_0A_14_1E);
        assert_eq!(buf.get(0, 0), 0);
    }

    #[test]
    fn empty_image_is_empty_input() {
        let img = RgbaImage::new(0, 4);
        assert!(matches!(from_rgba_image(&img), Err(Error::EmptyInput { width: 0, height: 4 })));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(decode_sheet(b"not an image"), Err(Error::ImageDecode(_))));
    }
}
