use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColorError {
    #[error("Invalid color format: {0}")]
    InvalidFormat(String),

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} surface")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("Surface dimensions do not match: expected {expected} bytes, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decoding error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encoding error: {0}")]
    PngEncode(#[from] png::EncodingError),
}

impl ColorError {
    pub(crate) fn invalid(input: impl Into<String>) -> Self {
        ColorError::InvalidFormat(input.into())
    }
}

pub type Result<T> = std::result::Result<T, ColorError>;
