// Editing session: everything the viewer keeps between core calls.
// One sheet, its raw islands, the working sprites and the playlist. The core
// functions stay stateless; this struct is just where their inputs live.
use tracing::info;

use crate::anchor;
use crate::error::{check_index, Result};
use crate::sequence::Sequence;
use crate::types::{AnchorPreset, DragEdge, HAnchor, Island, PixelBuffer, Sprite, VAnchor};
use crate::vision::{self, Background};

/// Sensitivity applied right after a sheet is loaded (strictest).
pub const DEFAULT_SENSITIVITY: u32 = vision::SENSITIVITY_MAX;

pub struct Session {
    sheet: PixelBuffer,
    background: Background,
    islands: Vec<Island>,
    sprites: Vec<Sprite>,
    sequence: Sequence,
    selected: Option<usize>,
    sensitivity: u32,
}

impl Session {
    /// Scan a sheet and apply the default variation.
    pub fn new(sheet: PixelBuffer, background: Background) -> Self {
        let islands = vision::detect_islands(&sheet, background);
        info!(
            width = sheet.width(),
            height = sheet.height(),
            islands = islands.len(),
            "sheet scanned"
        );
        let mut session = Self {
            sheet,
            background,
            islands,
            sprites: Vec::new(),
            sequence: Sequence::default(),
            selected: None,
            sensitivity: DEFAULT_SENSITIVITY,
        };
        session.apply_variation(DEFAULT_SENSITIVITY);
        session
    }

    /// Swap in a new sheet; every previous sprite and frame is discarded.
    pub fn load(&mut self, sheet: PixelBuffer) {
        *self = Self::new(sheet, self.background);
    }

    pub fn sheet(&self) -> &PixelBuffer {
        &self.sheet
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn sensitivity(&self) -> u32 {
        self.sensitivity
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn variation_counts(&self) -> Vec<(u32, usize)> {
        vision::variation_counts(&self.islands)
    }

    /// Rebuild the sprite set from the raw islands at `sensitivity`.
    /// Sprites, selection and sequence all start over.
    pub fn apply_variation(&mut self, sensitivity: u32) {
        self.sensitivity = vision::clamp_sensitivity(sensitivity);
        self.sprites = vision::filter_islands(&self.islands, self.sensitivity);
        self.sequence = Sequence::identity(self.sprites.len());
        self.selected = None;
        info!(sensitivity = self.sensitivity, sprites = self.sprites.len(), "variation applied");
    }

    /// Throw away all edits by re-applying the active variation.
    pub fn reset_variation(&mut self) {
        self.apply_variation(self.sensitivity);
    }

    pub fn select(&mut self, index: Option<usize>) -> Result<()> {
        if let Some(i) = index {
            check_index(i, self.sprites.len())?;
        }
        self.selected = index;
        Ok(())
    }

    /// Cycle the selection forward (wraps; `None` starts at 0).
    pub fn select_next(&mut self) {
        if self.sprites.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| (i + 1) % self.sprites.len()));
    }

    /// Cycle the selection backward.
    pub fn select_prev(&mut self) {
        let n = self.sprites.len();
        if n == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(self.selected.map_or(n - 1, |i| (i + n - 1) % n));
    }

    /// Preset on every sprite, or only the selected one.
    /// Returns how many sprites changed (0 when nothing is selected).
    pub fn apply_preset(&mut self, preset: AnchorPreset, all: bool) -> usize {
        if all {
            anchor::apply_preset(&mut self.sprites, preset);
            return self.sprites.len();
        }
        match self.selected {
            Some(i) => anchor::apply_preset(&mut self.sprites[i..=i], preset),
            None => return 0,
        }
        1
    }

    pub fn set_anchor(
        &mut self,
        index: usize,
        vertical: Option<VAnchor>,
        horizontal: Option<HAnchor>,
    ) -> Result<()> {
        anchor::set_anchor(&mut self.sprites, index, vertical, horizontal)
    }

    pub fn reset_anchors(&mut self) {
        anchor::reset_anchors(&mut self.sprites);
    }

    /// Propagate sprite `source`'s size to every sprite.
    pub fn apply_template_from(&mut self, source: usize) -> Result<()> {
        anchor::apply_template_from(&mut self.sprites, source)?;
        info!(source, sprites = self.sprites.len(), "template propagated");
        Ok(())
    }

    pub fn apply_template(&mut self, w: i32, h: i32) -> Result<()> {
        anchor::apply_template(&mut self.sprites, w, h)
    }

    pub fn reset_to_origin(&mut self, index: usize) -> Result<()> {
        anchor::reset_to_origin(&mut self.sprites, index)
    }

    pub fn drag(&mut self, index: usize, edge: DragEdge, px: i32, py: i32) -> Result<()> {
        anchor::drag_edit(&mut self.sprites, index, edge, px, py)
    }

    /// Pointer press: select whatever is under (px, py) and report the grabbed
    /// part. Clicking empty sheet clears the selection.
    pub fn press(&mut self, px: i32, py: i32) -> Option<(usize, DragEdge)> {
        let hit = anchor::hit_test(&self.sprites, px, py, anchor::HIT_PADDING);
        self.selected = hit.map(|(i, _)| i);
        hit
    }

    pub fn push_frame(&mut self, sprite: usize) -> Result<()> {
        self.sequence.push(sprite, self.sprites.len())
    }

    pub fn remove_frame(&mut self, order: usize) -> Result<usize> {
        self.sequence.remove(order)
    }

    pub fn move_frame(&mut self, from: usize, to: usize) -> Result<()> {
        self.sequence.move_item(from, to)
    }

    pub fn reset_sequence(&mut self) {
        self.sequence.reset(self.sprites.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Anchor, Rect};

    fn sheet() -> PixelBuffer {
        let mut buf = PixelBuffer::transparent(80, 40);
        buf.fill_rect(Rect::new(0, 0, 24, 24), 0xFF_00_FF_00);
        buf.fill_rect(Rect::new(30, 4, 20, 30), 0xFF_00_FF_00);
        buf.fill_rect(Rect::new(60, 0, 5, 5), 0xFF_00_FF_00);
        buf
    }

    #[test]
    fn new_session_applies_strictest_variation() {
        let s = Session::new(sheet(), Background::Alpha);
        assert_eq!(s.islands().len(), 3);
        assert_eq!(s.sensitivity(), 20);
        assert_eq!(s.sprites().len(), 2);
        assert_eq!(s.sequence().frames(), &[0, 1]);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn variation_change_resets_everything_from_raw_islands() {
        let mut s = Session::new(sheet(), Background::Alpha);
        s.select(Some(1)).unwrap();
        s.push_frame(1).unwrap();
        s.apply_variation(5);
        assert_eq!(s.sprites().len(), 3);
        assert_eq!(s.sequence().frames(), &[0, 1, 2]);
        assert_eq!(s.selected(), None);

        // back up: same sprites as the first pass, not a filtered-of-filtered set
        s.apply_variation(20);
        assert_eq!(s.sprites().len(), 2);
    }

    #[test]
    fn reset_variation_discards_edits() {
        let mut s = Session::new(sheet(), Background::Alpha);
        s.drag(0, DragEdge::Right, 60, 0).unwrap();
        s.apply_preset(AnchorPreset::Bottom, true);
        s.reset_variation();
        assert!(s.sprites().iter().all(|sp| sp.rect == sp.origin && sp.anchor == Anchor::CENTER));
    }

    #[test]
    fn preset_needs_a_selection_unless_all() {
        let mut s = Session::new(sheet(), Background::Alpha);
        assert_eq!(s.apply_preset(AnchorPreset::Left, false), 0);
        s.select_next();
        assert_eq!(s.selected(), Some(0));
        assert_eq!(s.apply_preset(AnchorPreset::Left, false), 1);
        assert_eq!(s.sprites()[0].anchor, AnchorPreset::Left.anchor());
        assert_eq!(s.sprites()[1].anchor, Anchor::CENTER);
    }

    #[test]
    fn selection_cycles_both_ways() {
        let mut s = Session::new(sheet(), Background::Alpha);
        s.select_prev();
        assert_eq!(s.selected(), Some(1));
        s.select_next();
        assert_eq!(s.selected(), Some(0));
        assert!(s.select(Some(9)).is_err());
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn press_selects_and_clears() {
        let mut s = Session::new(sheet(), Background::Alpha);
        assert_eq!(s.press(40, 20), Some((1, DragEdge::Left)));
        assert_eq!(s.press(12, 12), Some((0, DragEdge::Move)));
        assert_eq!(s.selected(), Some(1));
        assert_eq!(s.press(75, 38), None);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn load_replaces_sheet_and_state() {
        let mut s = Session::new(sheet(), Background::Alpha);
        s.push_frame(0).unwrap();
        s.load(PixelBuffer::transparent(10, 10));
        assert!(s.islands().is_empty());
        assert!(s.sprites().is_empty());
        assert!(s.sequence().is_empty());
    }
}
