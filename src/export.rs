// Cuts sprites out of the sheet and saves them as PNG files (loose or zipped).
// Visual expectation: each file is exactly the box you see in the viewer;
// any part of a box hanging off the sheet comes out transparent.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::{ImageBuffer, ImageFormat, Rgba, RgbaImage};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{check_index, Error, Result};
use crate::sequence::Sequence;
use crate::types::{unpack_argb, PixelBuffer, Rect, Sprite};

/// Copy one box out of the sheet into a new RGBA image of the box's size.
pub fn crop(sheet: &PixelBuffer, rect: Rect) -> RgbaImage {
    let (w, h) = (rect.w.max(1) as u32, rect.h.max(1) as u32);
    let mut out: RgbaImage = ImageBuffer::new(w, h);
    for oy in 0..h {
        let sy = rect.y + oy as i32;
        if sy < 0 || sy as usize >= sheet.height() {
            continue;
        }
        for ox in 0..w {
            let sx = rect.x + ox as i32;
            if sx < 0 || sx as usize >= sheet.width() {
                continue;
            }
            let (r, g, b, a) = unpack_argb(sheet.get(sx as usize, sy as usize));
            out.put_pixel(ox, oy, Rgba([r, g, b, a]));
        }
    }
    out
}

fn save(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save(path)
        .map_err(|e| Error::Export(format!("failed to save {}: {e}", path.display())))
}

/// Every playlist entry must name an existing sprite before anything is written.
fn check_frames(sprites: &[Sprite], sequence: &Sequence) -> Result<()> {
    for &idx in sequence.frames() {
        check_index(idx, sprites.len())?;
    }
    Ok(())
}

fn png_bytes(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::Export(format!("png encode error: {e}")))?;
    Ok(bytes)
}

/// Write `frame_{i}.png` for every playlist entry, in playback order.
pub fn export_sequence(
    sheet: &PixelBuffer,
    sprites: &[Sprite],
    sequence: &Sequence,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    // Validate first so a bad entry never leaves a half-written folder.
    check_frames(sprites, sequence)?;
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(sequence.len());
    for (i, &idx) in sequence.frames().iter().enumerate() {
        let path = out_dir.join(format!("frame_{i}.png"));
        save(&crop(sheet, sprites[idx].rect), &path)?;
        written.push(path);
    }
    info!(frames = written.len(), dir = %out_dir.display(), "sequence exported");
    Ok(written)
}

/// Pack the sequence into one archive: entry `frame_{i}.png` per playlist step.
/// Missing parent folders are created. Returns the archive path.
pub fn export_zip(
    sheet: &PixelBuffer,
    sprites: &[Sprite],
    sequence: &Sequence,
    path: &Path,
) -> Result<PathBuf> {
    check_frames(sprites, sequence)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = fs::File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (i, &idx) in sequence.frames().iter().enumerate() {
        let png = png_bytes(&crop(sheet, sprites[idx].rect))?;
        zip.start_file(format!("frame_{i}.png"), options)
            .map_err(|e| Error::Export(format!("zip error: {e}")))?;
        zip.write_all(&png)?;
    }
    zip.finish()
        .map_err(|e| Error::Export(format!("zip finish error: {e}")))?;

    info!(frames = sequence.len(), zip = %path.display(), "sequence archived");
    Ok(path.to_path_buf())
}

/// Write `sprite_{i}.png` for every sprite, in detection order.
pub fn export_sprites(sheet: &PixelBuffer, sprites: &[Sprite], out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(sprites.len());
    for (i, s) in sprites.iter().enumerate() {
        let path = out_dir.join(format!("sprite_{i}.png"));
        save(&crop(sheet, s.rect), &path)?;
        written.push(path);
    }
    info!(sprites = written.len(), dir = %out_dir.display(), "sprites exported");
    Ok(written)
}
