//! Sprite-sheet splitter: finds the sprites packed on a sheet, lets you line
//! them up with anchors and a shared template size, and exports the frames.
//!
//! The core is [`vision`] (island detection + variation filter) and
//! [`anchor`] (anchor-aware geometry). [`session`] holds editing state for a
//! front end; [`loader`] and [`export`] are the file-facing edges; [`draw`]
//! is the minifb viewer's software renderer.

pub mod anchor;
pub mod draw;
pub mod error;
pub mod export;
pub mod loader;
pub mod sequence;
pub mod session;
pub mod types;
pub mod vision;

pub use error::{Error, Result};
pub use sequence::Sequence;
pub use session::Session;
pub use types::{Anchor, AnchorPreset, DragEdge, HAnchor, Island, PixelBuffer, Rect, Sprite, VAnchor};
pub use vision::Background;
