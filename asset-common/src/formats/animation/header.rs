//! Animation header structure and operations

use std::io::{self, Write};

use super::ANIMATION_MAGIC;
use crate::formats::{BinaryWrite, ByteReader, FormatError};

/// Animation file header: magic, clip name, clip length
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationHeader {
    pub name: String,
    /// Clip length in seconds
    pub length: f32,
}

impl AnimationHeader {
    pub fn new(name: impl Into<String>, length: f32) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }

    /// Serialized size in bytes
    pub fn size(&self) -> usize {
        ANIMATION_MAGIC.len() + self.name.len() + 1 + 4
    }

    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&ANIMATION_MAGIC)?;
        w.write_cstr(&self.name)?;
        w.write_f32(self.length)
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let magic = r.read_array::<4>("magic")?;
        if magic != ANIMATION_MAGIC {
            return Err(FormatError::BadMagic {
                expected: ANIMATION_MAGIC,
                found: magic,
            });
        }
        Ok(Self {
            name: r.read_cstr("clip name")?,
            length: r.read_f32("clip length")?,
        })
    }
}
