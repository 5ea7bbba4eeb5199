// Error type for the splitter.
// Every variant states *where* things went wrong; all of them are recoverable,
// the caller decides what the user sees.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The image has zero width or height.
    #[error("empty input: image is {width}x{height}")]
    EmptyInput { width: usize, height: usize },

    /// Pixel data length does not match width * height.
    #[error("pixel buffer size mismatch: expected {expected} pixels, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Dimensions whose pixel count overflows.
    #[error("image too large: {width}x{height}")]
    TooLarge { width: usize, height: usize },

    /// Template dimensions must be strictly positive.
    #[error("invalid template size {w}x{h}")]
    InvalidTargetSize { w: i32, h: i32 },

    /// A sprite or sequence index past the end of its collection.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Decoding the sheet failed.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// Encoding/writing an exported frame failed.
    #[error("export error: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Creating the window failed
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("window update error: {0}")]
    WindowUpdate(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Range check shared by every index-taking operation.
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(Error::IndexOutOfRange { index, len });
    }
    Ok(())
}
