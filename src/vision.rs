// Island detection + variation filtering.
// Visual expectation: every separate blob of paint on the sheet ends up with
// exactly one box around it, and raising the sensitivity drops the tiny ones.
use tracing::{debug, warn};

use crate::types::{unpack_argb, Island, PixelBuffer, Sprite};

/// Sensitivity range offered by the variation control.
pub const SENSITIVITY_MIN: u32 = 1;
pub const SENSITIVITY_MAX: u32 = 20;

/// How a pixel is told apart from the sheet background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Background {
    /// Foreground = any pixel with alpha > 0.
    #[default]
    Alpha,
    /// Foreground = RGB distance (sum of |diff| per channel) from the
    /// top-left pixel greater than `tolerance`.
    ColorKey { tolerance: u32 },
}

impl Background {
    /// Build the per-pixel test for one buffer (samples the key once).
    fn classifier(self, buf: &PixelBuffer) -> impl Fn(u32) -> bool {
        let key = buf.pixels().first().copied().unwrap_or(0);
        move |px| match self {
            Background::Alpha => (px >> 24) != 0,
            Background::ColorKey { tolerance } => color_distance(px, key) > tolerance,
        }
    }
}

/// Sum of absolute R, G, B differences.
#[inline]
fn color_distance(a: u32, b: u32) -> u32 {
    let (ar, ag, ab, _) = unpack_argb(a);
    let (br, bg, bb, _) = unpack_argb(b);
    (ar as i32 - br as i32).unsigned_abs()
        + (ag as i32 - bg as i32).unsigned_abs()
        + (ab as i32 - bb as i32).unsigned_abs()
}

/// Find every 4-connected foreground region and return its bounding box,
/// in row-major discovery order. Regions one pixel thin in either direction
/// are treated as noise and dropped.
pub fn detect_islands(buf: &PixelBuffer, background: Background) -> Vec<Island> {
    // 1) Nothing to scan: "no sprites" is a valid answer, not a failure.
    if buf.is_empty() {
        warn!(width = buf.width(), height = buf.height(), "empty input, no islands");
        return Vec::new();
    }

    let w = buf.width();
    let h = buf.height();
    let is_fg = background.classifier(buf);

    // 2) One visited flag per pixel; shared across all fills so no pixel is
    //    ever expanded twice.
    let mut visited = vec![false; w * h];
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut islands = Vec::new();
    let mut noise = 0usize;

    // 3) Scan row-major; each unvisited foreground pixel seeds a new fill.
    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if visited[idx] || !is_fg(buf.pixels()[idx]) {
                continue;
            }

            let island = flood_fill(buf, &is_fg, &mut visited, &mut stack, x, y);
            if island.w > 1 && island.h > 1 {
                islands.push(island);
            } else {
                noise += 1;
            }
        }
    }

    debug!(islands = islands.len(), noise, "island scan finished");
    islands
}

/// Explicit-stack flood fill from (sx, sy); returns the region's bounding box.
/// Pixels are flagged when pushed, so each one enters the stack at most once.
fn flood_fill(
    buf: &PixelBuffer,
    is_fg: &impl Fn(u32) -> bool,
    visited: &mut [bool],
    stack: &mut Vec<(usize, usize)>,
    sx: usize,
    sy: usize,
) -> Island {
    let w = buf.width();
    let h = buf.height();
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (sx, sx, sy, sy);

    stack.clear();
    visited[sy * w + sx] = true;
    stack.push((sx, sy));

    while let Some((x, y)) = stack.pop() {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);

        // Up/down/left/right only; diagonals do not connect.
        let mut visit = |nx: usize, ny: usize| {
            let nidx = ny * w + nx;
            if !visited[nidx] && is_fg(buf.pixels()[nidx]) {
                visited[nidx] = true;
                stack.push((nx, ny));
            }
        };
        if x + 1 < w { visit(x + 1, y); }
        if x > 0     { visit(x - 1, y); }
        if y + 1 < h { visit(x, y + 1); }
        if y > 0     { visit(x, y - 1); }
    }

    Island::new(
        min_x as i32,
        min_y as i32,
        (max_x - min_x + 1) as i32,
        (max_y - min_y + 1) as i32,
    )
}

/// Clamp a requested sensitivity into the supported range.
pub fn clamp_sensitivity(sensitivity: u32) -> u32 {
    sensitivity.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX)
}

#[inline]
fn survives(island: &Island, sensitivity: u32) -> bool {
    let s = sensitivity as i32;
    island.w >= s && island.h >= s
}

/// Keep islands at least `sensitivity` pixels wide *and* tall, turning each
/// survivor into a fresh sprite. Always reads the raw island set, never a
/// previous result.
pub fn filter_islands(islands: &[Island], sensitivity: u32) -> Vec<Sprite> {
    let s = clamp_sensitivity(sensitivity);
    islands
        .iter()
        .filter(|i| survives(i, s))
        .map(|&i| Sprite::from_island(i))
        .collect()
}

/// How many islands survive at each sensitivity, lowest first.
pub fn variation_counts(islands: &[Island]) -> Vec<(u32, usize)> {
    (SENSITIVITY_MIN..=SENSITIVITY_MAX)
        .map(|s| (s, islands.iter().filter(|i| survives(i, s)).count()))
        .collect()
}
