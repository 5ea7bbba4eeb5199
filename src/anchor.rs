// Anchor-aware geometry: anchors, presets, template propagation, drag edits.
// Visual expectation: lock the "feet" (bottom) of every frame, apply one
// frame's size to all, and every character keeps standing on the same line.
use tracing::debug;

use crate::error::{check_index, Error, Result};
use crate::types::{AnchorPreset, DragEdge, HAnchor, Rect, Sprite, VAnchor};

/// Default grab distance (sheet pixels) around a box edge.
pub const HIT_PADDING: i32 = 12;

/// Overwrite the given axes of one sprite's anchor; `None` leaves an axis alone.
pub fn set_anchor(
    sprites: &mut [Sprite],
    index: usize,
    vertical: Option<VAnchor>,
    horizontal: Option<HAnchor>,
) -> Result<()> {
    check_index(index, sprites.len())?;
    let anchor = &mut sprites[index].anchor;
    if let Some(v) = vertical {
        anchor.vertical = v;
    }
    if let Some(h) = horizontal {
        anchor.horizontal = h;
    }
    Ok(())
}

/// Set both axes of every sprite given from a preset.
/// Pass the whole slice for "all", or a one-element slice for "selected".
pub fn apply_preset(sprites: &mut [Sprite], preset: AnchorPreset) {
    let anchor = preset.anchor();
    for s in sprites.iter_mut() {
        s.anchor = anchor;
    }
}

/// Preset for a single sprite by index.
pub fn apply_preset_at(sprites: &mut [Sprite], index: usize, preset: AnchorPreset) -> Result<()> {
    check_index(index, sprites.len())?;
    apply_preset(&mut sprites[index..=index], preset);
    Ok(())
}

/// Back to center/center everywhere.
pub fn reset_anchors(sprites: &mut [Sprite]) {
    apply_preset(sprites, AnchorPreset::Center);
}

/// New start coordinate for one axis: keep the anchored line fixed while the
/// length changes from `len` to `target`. `None` when the math leaves i32.
#[inline]
fn anchored_start(start: i32, len: i32, target: i32, fixed: Fixed) -> Option<i32> {
    match fixed {
        Fixed::Start => Some(start),
        Fixed::End => start.checked_add(len)?.checked_sub(target),
        Fixed::Middle => start.checked_add(len.checked_sub(target)?.div_euclid(2)),
    }
}

#[derive(Clone, Copy)]
enum Fixed {
    Start,
    End,
    Middle,
}

impl From<VAnchor> for Fixed {
    fn from(v: VAnchor) -> Self {
        match v {
            VAnchor::Top => Fixed::Start,
            VAnchor::Bottom => Fixed::End,
            VAnchor::Center => Fixed::Middle,
        }
    }
}

impl From<HAnchor> for Fixed {
    fn from(h: HAnchor) -> Self {
        match h {
            HAnchor::Left => Fixed::Start,
            HAnchor::Right => Fixed::End,
            HAnchor::Center => Fixed::Middle,
        }
    }
}

/// Resize one box to (target_w, target_h) around its anchor.
/// Positions that would leave the sheet's top/left are pulled back to 0.
/// A size whose far edge would not fit in i32 is `InvalidTargetSize`.
pub fn resize_anchored(sprite: &Sprite, target_w: i32, target_h: i32) -> Result<Rect> {
    let invalid = || Error::InvalidTargetSize { w: target_w, h: target_h };
    let r = sprite.rect;
    let x = anchored_start(r.x, r.w, target_w, sprite.anchor.horizontal.into()).ok_or_else(invalid)?;
    let y = anchored_start(r.y, r.h, target_h, sprite.anchor.vertical.into()).ok_or_else(invalid)?;

    let resized = Rect::new(x.max(0), y.max(0), target_w, target_h);
    if resized.x.checked_add(target_w).is_none() || resized.y.checked_add(target_h).is_none() {
        return Err(invalid());
    }
    if resized.x != x || resized.y != y {
        debug!(x, y, rect = %resized, "resized box clamped to the sheet's top-left");
    }
    Ok(resized)
}

/// Give every sprite the same size, each one keeping its own anchored edge.
/// Fails without touching anything if either dimension is not positive or
/// any resized box would overflow.
pub fn apply_template(sprites: &mut [Sprite], target_w: i32, target_h: i32) -> Result<()> {
    if target_w <= 0 || target_h <= 0 {
        return Err(Error::InvalidTargetSize { w: target_w, h: target_h });
    }
    let resized = sprites
        .iter()
        .map(|s| resize_anchored(s, target_w, target_h))
        .collect::<Result<Vec<_>>>()?;
    for (s, rect) in sprites.iter_mut().zip(resized) {
        s.rect = rect;
    }
    debug!(count = sprites.len(), target_w, target_h, "template applied");
    Ok(())
}

/// Template propagation using one sprite's current size as the target.
pub fn apply_template_from(sprites: &mut [Sprite], source: usize) -> Result<()> {
    check_index(source, sprites.len())?;
    let Rect { w, h, .. } = sprites[source].rect;
    apply_template(sprites, w, h)
}

/// Put a sprite's box back to what the detector found. The anchor is kept.
pub fn reset_to_origin(sprites: &mut [Sprite], index: usize) -> Result<()> {
    check_index(index, sprites.len())?;
    let s = &mut sprites[index];
    s.rect = s.origin;
    Ok(())
}

/// Apply one pointer drag step at (px, py) to a sprite box.
/// Edges follow the pointer; `Move` centers the box on it. The result always
/// keeps x, y >= 0 and w, h >= 1.
pub fn drag_edit(sprites: &mut [Sprite], index: usize, edge: DragEdge, px: i32, py: i32) -> Result<()> {
    check_index(index, sprites.len())?;
    let r = &mut sprites[index].rect;
    match edge {
        DragEdge::Left => {
            let right = r.right();
            let x = px.min(right - 1).max(0);
            r.w = right - x;
            r.x = x;
        }
        DragEdge::Right => r.w = px.saturating_sub(r.x).max(1),
        DragEdge::Top => {
            let bottom = r.bottom();
            let y = py.min(bottom - 1).max(0);
            r.h = bottom - y;
            r.y = y;
        }
        DragEdge::Bottom => r.h = py.saturating_sub(r.y).max(1),
        DragEdge::Move => {
            r.x = px.saturating_sub(r.w / 2).max(0);
            r.y = py.saturating_sub(r.h / 2).max(0);
        }
    }
    Ok(())
}

/// First sprite whose box, grown by `pad`, contains the point, plus the part
/// grabbed: left, right, top, bottom edge in that order, otherwise `Move`.
pub fn hit_test(sprites: &[Sprite], px: i32, py: i32, pad: i32) -> Option<(usize, DragEdge)> {
    let index = sprites.iter().position(|s| {
        let r = s.rect;
        px > r.x.saturating_sub(pad)
            && px < r.right().saturating_add(pad)
            && py > r.y.saturating_sub(pad)
            && py < r.bottom().saturating_add(pad)
    })?;

    let r = sprites[index].rect;
    let near = |a: i32, b: i32| a.abs_diff(b) < pad.unsigned_abs();
    let edge = if near(px, r.x) {
        DragEdge::Left
    } else if near(px, r.right()) {
        DragEdge::Right
    } else if near(py, r.y) {
        DragEdge::Top
    } else if near(py, r.bottom()) {
        DragEdge::Bottom
    } else {
        DragEdge::Move
    };
    Some((index, edge))
}

/// First sprite whose box strictly contains the point (no padding).
pub fn sprite_at(sprites: &[Sprite], px: i32, py: i32) -> Option<usize> {
    sprites.iter().position(|s| {
        let r = s.rect;
        px > r.x && px < r.right() && py > r.y && py < r.bottom()
    })
}
