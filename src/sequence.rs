// Playback order: a playlist of sprite indices (repeats allowed).

use crate::error::{check_index, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sequence {
    frames: Vec<usize>,
}

impl Sequence {
    /// Every sprite once, in detection order.
    pub fn identity(count: usize) -> Self {
        Self { frames: (0..count).collect() }
    }

    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Append a frame. `sprite_count` bounds the index.
    pub fn push(&mut self, sprite: usize, sprite_count: usize) -> Result<()> {
        check_index(sprite, sprite_count)?;
        self.frames.push(sprite);
        Ok(())
    }

    /// Drop the entry at playlist position `order`, returning its sprite index.
    pub fn remove(&mut self, order: usize) -> Result<usize> {
        check_index(order, self.frames.len())?;
        Ok(self.frames.remove(order))
    }

    /// Take the entry at `from` out and reinsert it at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.frames.len();
        check_index(from, len)?;
        check_index(to, len)?;
        let item = self.frames.remove(from);
        self.frames.insert(to, item);
        Ok(())
    }

    pub fn reset(&mut self, sprite_count: usize) {
        *self = Self::identity(sprite_count);
    }

    /// Sprite shown at playback step `step` (wraps both ways).
    pub fn frame_at(&self, step: i64) -> Option<usize> {
        if self.frames.is_empty() {
            return None;
        }
        let pos = step.unsigned_abs() % self.frames.len() as u64;
        Some(self.frames[pos as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn identity_lists_every_sprite() {
        assert_eq!(Sequence::identity(4).frames(), &[0, 1, 2, 3]);
        assert!(Sequence::identity(0).is_empty());
    }

    #[test]
    fn push_allows_duplicates_but_checks_bounds() {
        let mut seq = Sequence::identity(2);
        seq.push(1, 2).unwrap();
        assert_eq!(seq.frames(), &[0, 1, 1]);
        assert!(matches!(seq.push(2, 2), Err(Error::IndexOutOfRange { index: 2, len: 2 })));
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn remove_and_move() {
        let mut seq = Sequence::identity(5);
        assert_eq!(seq.remove(1).unwrap(), 1);
        assert_eq!(seq.frames(), &[0, 2, 3, 4]);
        seq.move_item(3, 0).unwrap();
        assert_eq!(seq.frames(), &[4, 0, 2, 3]);
        seq.move_item(0, 2).unwrap();
        assert_eq!(seq.frames(), &[0, 2, 4, 3]);
    }

    #[test]
    fn bad_positions_leave_sequence_alone() {
        let mut seq = Sequence::identity(3);
        assert!(seq.remove(3).is_err());
        assert!(seq.move_item(0, 3).is_err());
        assert!(seq.move_item(7, 0).is_err());
        assert_eq!(seq.frames(), &[0, 1, 2]);
    }

    #[test]
    fn reset_rebuilds_identity_for_new_count() {
        let mut seq = Sequence::identity(3);
        seq.push(0, 3).unwrap();
        seq.reset(2);
        assert_eq!(seq.frames(), &[0, 1]);
        seq.reset(0);
        assert!(seq.is_empty());
    }

    #[test]
    fn frame_at_wraps() {
        let seq = Sequence { frames: vec![3, 1, 4] };
        assert_eq!(seq.frame_at(0), Some(3));
        assert_eq!(seq.frame_at(4), Some(1));
        assert_eq!(seq.frame_at(-2), Some(4));
        assert_eq!(Sequence::default().frame_at(5), None);
    }
}
