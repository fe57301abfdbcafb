//! Parse errors for the binary formats

use thiserror::Error;

/// Error returned when parsing a mesh or animation file fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("unexpected end of data while reading {what} at offset {offset}")]
    UnexpectedEof { what: &'static str, offset: usize },

    #[error("bad magic: expected {expected:02X?}, found {found:02X?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },

    #[error("unsupported format version {0}")]
    UnsupportedVersion(i32),

    #[error("invalid {what} value {value}")]
    InvalidValue { what: &'static str, value: u32 },

    #[error("string at offset {0} is not valid UTF-8")]
    InvalidString(usize),

    #[error("cannot sample {length}s at {frame_rate} fps")]
    InvalidTiming { length: f32, frame_rate: f32 },

    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
}
