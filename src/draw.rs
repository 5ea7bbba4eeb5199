// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the sprite sheet over a checkerboard.
// 2) Box outlines per sprite: cyan box, red bar on each anchored edge,
//    dashed white frame around the selected one, index + size labels.
// 3) A crosshair that follows your mouse.
// 4) A tiny 5x7 bitmap font for labels and the HUD line.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::{Error, Result};
use crate::types::{unpack_argb, FrameBuffer, HAnchor, PixelBuffer, Rect, Sprite, VAnchor};

pub const BOX_COLOR: u32 = 0x00_00_BC_D4;
pub const ANCHOR_COLOR: u32 = 0x00_FF_00_00;
pub const SELECT_COLOR: u32 = 0x00_FF_FF_FF;
pub const LABEL_COLOR: u32 = 0x00_CC_CC_CC;

const CHECKER_CELL: usize = 8;
const CHECKER_DARK: u32 = 0x00_30_30_30;
const CHECKER_LIGHT: u32 = 0x00_40_40_40;

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window of the given size.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Cap the redraw rate; the editor does not need more than ~60 FPS.
    pub fn limit_fps(&mut self, fps: usize) {
        self.window.set_target_fps(fps);
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// True on the frame a key goes down (no auto-repeat).
    pub fn pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// Same, but repeats while held (for stepping through values).
    pub fn pressed_repeat(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::Yes)
    }

    pub fn shift_down(&self) -> bool {
        self.window.is_key_down(Key::LeftShift) || self.window.is_key_down(Key::RightShift)
    }

    /// Current mouse position in window pixel coordinates (clamped to the window).
    pub fn mouse_pos(&self) -> Option<(i32, i32)> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x.max(0.0) as i32, y.max(0.0) as i32))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }
}

/* ---------- Sheet background ---------- */

/// Paint the sheet over a checkerboard so transparent areas stay visible.
/// The sheet sits at the top-left; anything outside it is left as checker.
pub fn render_sheet(fb: &mut FrameBuffer, sheet: &PixelBuffer) {
    for y in 0..fb.height {
        for x in 0..fb.width {
            let checker = if ((x / CHECKER_CELL) + (y / CHECKER_CELL)) % 2 == 0 {
                CHECKER_DARK
            } else {
                CHECKER_LIGHT
            };
            let px = if x < sheet.width() && y < sheet.height() {
                blend_over(sheet.get(x, y), checker)
            } else {
                checker
            };
            fb.pixels[y * fb.width + x] = px;
        }
    }
}

/// Straight-alpha "over" of an ARGB pixel on an opaque 0x00RRGGBB one.
#[inline]
fn blend_over(src: u32, dst: u32) -> u32 {
    let (sr, sg, sb, a) = unpack_argb(src);
    if a == 255 {
        return src & 0x00FF_FFFF;
    }
    if a == 0 {
        return dst;
    }
    let (dr, dg, db, _) = unpack_argb(dst);
    let a = a as u32;
    let mix = |s: u8, d: u8| (s as u32 * a + d as u32 * (255 - a) + 127) / 255;
    (mix(sr, dr) << 16) | (mix(sg, dg) << 8) | mix(sb, db)
}

/* ---------- Box overlay ---------- */

/// Draw every sprite's outline, anchors and labels.
pub fn render_overlay(fb: &mut FrameBuffer, sprites: &[Sprite], selected: Option<usize>) {
    for (i, s) in sprites.iter().enumerate() {
        let r = s.rect;
        if selected == Some(i) {
            draw_dashed_rect(fb, Rect::new(r.x - 2, r.y - 2, r.w + 4, r.h + 4), 4, SELECT_COLOR);
        }
        draw_rect(fb, r, BOX_COLOR);
        draw_anchor_bars(fb, s);

        draw_text_5x7(fb, r.x, r.y - 9, &i.to_string(), BOX_COLOR);
        let size = format!("{}X{}", r.w, r.h);
        let text_w = size.len() as i32 * 6;
        draw_text_5x7(fb, r.right() - text_w, r.bottom() + 3, &size, LABEL_COLOR);
    }
}

/// Red 2px bar along each anchored edge; centered axes get none.
fn draw_anchor_bars(fb: &mut FrameBuffer, s: &Sprite) {
    let r = s.rect;
    match s.anchor.vertical {
        VAnchor::Top => fill_rect(fb, Rect::new(r.x, r.y - 1, r.w, 2), ANCHOR_COLOR),
        VAnchor::Bottom => fill_rect(fb, Rect::new(r.x, r.bottom() - 1, r.w, 2), ANCHOR_COLOR),
        VAnchor::Center => {}
    }
    match s.anchor.horizontal {
        HAnchor::Left => fill_rect(fb, Rect::new(r.x - 1, r.y, 2, r.h), ANCHOR_COLOR),
        HAnchor::Right => fill_rect(fb, Rect::new(r.right() - 1, r.y, 2, r.h), ANCHOR_COLOR),
        HAnchor::Center => {}
    }
}

/* ---------- Software drawing: pixels, lines, boxes, crosshair ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// 1px outline hugging the box: first/last row and column are inside it.
pub fn draw_rect(fb: &mut FrameBuffer, r: Rect, color: u32) {
    if r.w <= 0 || r.h <= 0 {
        return;
    }
    let (x1, y1) = (r.right() - 1, r.bottom() - 1);
    draw_line(fb, r.x, r.y, x1, r.y, color);
    draw_line(fb, r.x, y1, x1, y1, color);
    draw_line(fb, r.x, r.y, r.x, y1, color);
    draw_line(fb, x1, r.y, x1, y1, color);
}

/// Outline drawn in `dash`-pixel on/off segments.
fn draw_dashed_rect(fb: &mut FrameBuffer, r: Rect, dash: i32, color: u32) {
    if r.w <= 0 || r.h <= 0 || dash <= 0 {
        return;
    }
    let (x1, y1) = (r.right() - 1, r.bottom() - 1);
    for x in r.x..=x1 {
        if ((x - r.x) / dash) % 2 == 0 {
            put_pixel(fb, x, r.y, color);
            put_pixel(fb, x, y1, color);
        }
    }
    for y in r.y..=y1 {
        if ((y - r.y) / dash) % 2 == 0 {
            put_pixel(fb, r.x, y, color);
            put_pixel(fb, x1, y, color);
        }
    }
}

pub fn fill_rect(fb: &mut FrameBuffer, r: Rect, color: u32) {
    for y in r.y..r.bottom() {
        for x in r.x..r.right() {
            put_pixel(fb, x, y, color);
        }
    }
}

/// Draw a small crosshair centered at (cx,cy).
/// Visual: a "+" shape (with a tiny gap at the center) follows your mouse.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/* ---------- 5x7 bitmap font (uppercase ASCII, digits, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Lowercase maps onto uppercase.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b10001,0b01010,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '/' => g!(0b00000,0b00001,0b00010,0b00100,0b01000,0b10000,0b00000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), with a 1-pixel black shadow.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    let Some(rows) = glyph5x7(ch) else { return };
    for (shadow, c) in [(1, 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx + shadow, y + ry as i32 + shadow, c);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs, 6 pixels per character.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnchorPreset, Sprite};

    fn blank(w: usize, h: usize) -> FrameBuffer {
        FrameBuffer { width: w, height: h, pixels: vec![0; w * h] }
    }

    #[test]
    fn rect_outline_stays_inside_box() {
        let mut fb = blank(10, 10);
        draw_rect(&mut fb, Rect::new(2, 2, 4, 3), BOX_COLOR);
        assert_eq!(fb.pixels[2 * 10 + 2], BOX_COLOR);
        assert_eq!(fb.pixels[4 * 10 + 5], BOX_COLOR);
        assert_eq!(fb.pixels[3 * 10 + 3], 0); // interior untouched
        assert_eq!(fb.pixels[5 * 10 + 6], 0); // one past the corner
    }

    #[test]
    fn drawing_off_screen_is_clipped() {
        let mut fb = blank(4, 4);
        draw_rect(&mut fb, Rect::new(-10, -10, 30, 30), BOX_COLOR);
        draw_text_5x7(&mut fb, -3, 2, "HELLO", LABEL_COLOR);
        fill_rect(&mut fb, Rect::new(3, 3, 10, 10), ANCHOR_COLOR);
        assert_eq!(fb.pixels[15], ANCHOR_COLOR);
    }

    #[test]
    fn bottom_anchor_bar_is_red() {
        let mut fb = blank(20, 20);
        let mut s = Sprite::from_island(Rect::new(2, 2, 10, 10));
        s.anchor = AnchorPreset::Bottom.anchor();
        render_overlay(&mut fb, &[s], None);
        assert_eq!(fb.pixels[12 * 20 + 6], ANCHOR_COLOR);
        assert_ne!(fb.pixels[20 + 6], ANCHOR_COLOR);
    }

    #[test]
    fn sheet_alpha_is_blended_over_checker() {
        let mut fb = blank(2, 1);
        let sheet = PixelBuffer::new(2, 1, vec![0xFF_12_34_56, 0x00_FF_FF_FF]).unwrap();
        render_sheet(&mut fb, &sheet);
        assert_eq!(fb.pixels[0], 0x00_12_34_56);
        assert_eq!(fb.pixels[1], CHECKER_DARK);
    }

    #[test]
    fn half_alpha_mixes_channels() {
        assert_eq!(blend_over(0x80_FF_00_00, 0x00_00_00_00) >> 16, 0x80);
    }

    #[test]
    fn every_hud_character_has_a_glyph() {
        for ch in "VAR 20 (3) | SEQ: 12 FRAMES | ANCHOR=BOTTOM-LEFT 10x12 /".chars() {
            assert!(glyph5x7(ch).is_some(), "missing glyph {ch:?}");
        }
    }
}
