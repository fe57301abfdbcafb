//! Little-endian primitive I/O shared by the mesh and animation formats.
//!
//! Writing goes through the [`BinaryWrite`] extension trait, implemented for
//! every [`std::io::Write`]. Reading goes through [`ByteReader`], a cursor
//! over an in-memory byte slice.
//!
//! Composite types use the engine's conventions:
//! - strings are UTF-8 followed by a single zero byte
//! - quaternions are stored as `w, x, y, z`
//! - affine matrices are stored as the first three rows of the 4×4 (12 floats)

use glam::{Mat4, Quat, Vec3, Vec4};
use std::io::{self, Write};

use super::FormatError;

/// Extension trait with the primitive writers used by every format.
pub trait BinaryWrite: Write {
    fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.write_all(&[value])
    }

    fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_u32(&mut self, value: u32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_i32(&mut self, value: i32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_f32(&mut self, value: f32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    /// Write a zero-terminated UTF-8 string.
    ///
    /// Anything after an embedded NUL is dropped, since readers stop there.
    fn write_cstr(&mut self, value: &str) -> io::Result<()> {
        let value = value.split('\0').next().unwrap_or_default();
        self.write_all(value.as_bytes())?;
        self.write_u8(0)
    }

    fn write_vec3(&mut self, value: Vec3) -> io::Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)
    }

    /// Write a quaternion as `w, x, y, z`.
    fn write_quat(&mut self, value: Quat) -> io::Result<()> {
        self.write_f32(value.w)?;
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)
    }

    /// Write rows 0..3 of a 4×4 matrix (12 floats, row-major).
    fn write_mat3x4(&mut self, value: &Mat4) -> io::Result<()> {
        for row in 0..3 {
            let row = value.row(row);
            self.write_f32(row.x)?;
            self.write_f32(row.y)?;
            self.write_f32(row.z)?;
            self.write_f32(row.w)?;
        }
        Ok(())
    }
}

impl<W: Write + ?Sized> BinaryWrite for W {}

/// Cursor over an in-memory file for parsing.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Fail with [`FormatError::TrailingBytes`] if anything is left unread.
    pub fn finish(&self) -> Result<(), FormatError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(FormatError::TrailingBytes(n)),
        }
    }

    pub fn read_bytes(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], FormatError> {
        if self.remaining() < len {
            return Err(FormatError::UnexpectedEof {
                what,
                offset: self.pos,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, what)?);
        Ok(out)
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8, FormatError> {
        Ok(self.read_array::<1>(what)?[0])
    }

    pub fn read_u16(&mut self, what: &'static str) -> Result<u16, FormatError> {
        Ok(u16::from_le_bytes(self.read_array(what)?))
    }

    pub fn read_u32(&mut self, what: &'static str) -> Result<u32, FormatError> {
        Ok(u32::from_le_bytes(self.read_array(what)?))
    }

    pub fn read_i32(&mut self, what: &'static str) -> Result<i32, FormatError> {
        Ok(i32::from_le_bytes(self.read_array(what)?))
    }

    pub fn read_f32(&mut self, what: &'static str) -> Result<f32, FormatError> {
        Ok(f32::from_le_bytes(self.read_array(what)?))
    }

    /// Read a zero-terminated UTF-8 string.
    pub fn read_cstr(&mut self, what: &'static str) -> Result<String, FormatError> {
        let start = self.pos;
        let len = self.bytes[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(FormatError::UnexpectedEof {
                what,
                offset: start,
            })?;
        let raw = self.read_bytes(len, what)?;
        self.pos += 1; // terminator
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| FormatError::InvalidString(start))
    }

    pub fn read_vec3(&mut self, what: &'static str) -> Result<Vec3, FormatError> {
        Ok(Vec3::new(
            self.read_f32(what)?,
            self.read_f32(what)?,
            self.read_f32(what)?,
        ))
    }

    /// Read a quaternion stored as `w, x, y, z`.
    pub fn read_quat(&mut self, what: &'static str) -> Result<Quat, FormatError> {
        let w = self.read_f32(what)?;
        let x = self.read_f32(what)?;
        let y = self.read_f32(what)?;
        let z = self.read_f32(what)?;
        Ok(Quat::from_xyzw(x, y, z, w))
    }

    /// Read a 3×4 row-major matrix; the missing last row is `0, 0, 0, 1`.
    pub fn read_mat3x4(&mut self, what: &'static str) -> Result<Mat4, FormatError> {
        let mut rows = [Vec4::W; 4];
        for row in rows.iter_mut().take(3) {
            *row = Vec4::new(
                self.read_f32(what)?,
                self.read_f32(what)?,
                self.read_f32(what)?,
                self.read_f32(what)?,
            );
        }
        Ok(Mat4::from_cols(rows[0], rows[1], rows[2], rows[3]).transpose())
    }
}
