// Core types shared by detection, geometry, export and the viewer.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Decoded sheet pixels, read-only input to detection.
/// Each entry is 0xAARRGGBB so alpha survives next to the color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>, // length = width * height, row-major
}

/// width * height, or `TooLarge` when that does not fit in memory indexing.
fn pixel_count(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .filter(|n| n.checked_mul(4).is_some())
        .ok_or(Error::TooLarge { width, height })
}

impl PixelBuffer {
    /// Wrap packed ARGB pixels, checking the length against the dimensions.
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(Error::BufferSize { expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    /// Pack raw RGBA bytes (4 per pixel, as decoders hand them out).
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if rgba.len() != expected * 4 {
            return Err(Error::BufferSize { expected, actual: rgba.len() / 4 });
        }
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| pack_argb(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Self { width, height, pixels })
    }

    /// Fully transparent buffer; handy as a blank canvas in tests.
    pub fn transparent(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major packed pixels; always exactly width * height long.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, argb: u32) {
        self.pixels[y * self.width + x] = argb;
    }

    /// Fill an axis-aligned block (clipped to the buffer).
    pub fn fill_rect(&mut self, rect: Rect, argb: u32) {
        let x0 = rect.x.max(0) as usize;
        let y0 = rect.y.max(0) as usize;
        let x1 = (rect.right().max(0) as usize).min(self.width);
        let y1 = (rect.bottom().max(0) as usize).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x, y, argb);
            }
        }
    }
}

#[inline]
pub fn pack_argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split 0xAARRGGBB into (r, g, b, a).
#[inline]
pub fn unpack_argb(px: u32) -> (u8, u8, u8, u8) {
    (
        ((px >> 16) & 0xFF) as u8,
        ((px >> 8) & 0xFF) as u8,
        (px & 0xFF) as u8,
        (px >> 24) as u8,
    )
}

/// What the window shows each frame.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

/// Axis-aligned box in sheet pixels. `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Detector output: the bounding box of one 4-connected foreground region.
pub type Island = Rect;

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// One past the last column.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// One past the last row.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} @ ({}, {})", self.w, self.h, self.x, self.y)
    }
}

/// Which horizontal line stays put when a sprite is resized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAnchor {
    Top,
    Bottom,
    #[default]
    Center,
}

/// Which vertical line stays put when a sprite is resized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAnchor {
    Left,
    Right,
    #[default]
    Center,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Anchor {
    pub vertical: VAnchor,
    pub horizontal: HAnchor,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor { vertical: VAnchor::Center, horizontal: HAnchor::Center };

    pub const fn new(vertical: VAnchor, horizontal: HAnchor) -> Self {
        Self { vertical, horizontal }
    }
}

/// The nine one-click anchor combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorPreset {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl AnchorPreset {
    pub const ALL: [AnchorPreset; 9] = [
        AnchorPreset::Top,
        AnchorPreset::Bottom,
        AnchorPreset::Left,
        AnchorPreset::Right,
        AnchorPreset::TopLeft,
        AnchorPreset::TopRight,
        AnchorPreset::BottomLeft,
        AnchorPreset::BottomRight,
        AnchorPreset::Center,
    ];

    /// Both axes for this preset; an axis the preset does not name is centered.
    pub const fn anchor(self) -> Anchor {
        use HAnchor as H;
        use VAnchor as V;
        match self {
            AnchorPreset::Top => Anchor::new(V::Top, H::Center),
            AnchorPreset::Bottom => Anchor::new(V::Bottom, H::Center),
            AnchorPreset::Left => Anchor::new(V::Center, H::Left),
            AnchorPreset::Right => Anchor::new(V::Center, H::Right),
            AnchorPreset::TopLeft => Anchor::new(V::Top, H::Left),
            AnchorPreset::TopRight => Anchor::new(V::Top, H::Right),
            AnchorPreset::BottomLeft => Anchor::new(V::Bottom, H::Left),
            AnchorPreset::BottomRight => Anchor::new(V::Bottom, H::Right),
            AnchorPreset::Center => Anchor::CENTER,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AnchorPreset::Top => "top",
            AnchorPreset::Bottom => "bottom",
            AnchorPreset::Left => "left",
            AnchorPreset::Right => "right",
            AnchorPreset::TopLeft => "top-left",
            AnchorPreset::TopRight => "top-right",
            AnchorPreset::BottomLeft => "bottom-left",
            AnchorPreset::BottomRight => "bottom-right",
            AnchorPreset::Center => "center",
        }
    }
}

impl fmt::Display for AnchorPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnchorPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        AnchorPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown anchor preset `{s}`"))
    }
}

/// A detected box plus editor state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub rect: Rect,
    /// Untouched detector result, so resets are lossless.
    pub origin: Rect,
    pub anchor: Anchor,
}

impl Sprite {
    /// Fresh sprite straight from an island: box == origin, centered anchor.
    pub fn from_island(island: Island) -> Self {
        Self { rect: island, origin: island, anchor: Anchor::CENTER }
    }
}

/// Which part of a box the pointer grabbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEdge {
    Left,
    Right,
    Top,
    Bottom,
    Move,
}
