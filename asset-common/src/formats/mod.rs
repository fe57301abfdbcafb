//! Engine binary asset formats
//!
//! Two little-endian formats are defined here:
//! - mesh files (`.mdl`, magic `UMD2`) - see [`mesh`]
//! - animation clips (`.ani`, magic `UANI`) - see [`animation`]
//!
//! Both are built on the primitive writers in [`BinaryWrite`] and parsed back
//! with [`ByteReader`].

pub mod animation;
mod error;
pub mod mesh;
mod serialization;

pub use animation::*;
pub use error::FormatError;
pub use mesh::*;
pub use serialization::{BinaryWrite, ByteReader};
