//! Shared formats for the engine asset pipeline
//!
//! This crate provides the on-disk layouts shared between:
//! - `asset-export` (writes `.mdl` / `.ani` files)
//! - tooling that inspects exported assets
//!
//! # Modules
//!
//! - [`formats`] - Mesh and animation binary formats plus primitive I/O
//! - [`asset_format`] - File extensions, magic numbers and folder names

pub mod asset_format;
pub mod formats;

pub use asset_format::{AssetFormat, ENGINE_ASSET_FORMAT};

// Re-export commonly used format items
pub use formats::{
    // Animation types
    ANIMATION_MAGIC,
    AnimationFile,
    AnimationTrack,
    // Mesh types
    BONE_BOUNDS_TAG,
    BinaryWrite,
    BoneBounds,
    BoneRecord,
    BoundingBox,
    ByteReader,
    ChannelMask,
    FormatError,
    FrameTiming,
    IndexFormat,
    MESH_MAGIC,
    MAX_FRAME_COUNT,
    MESH_VERSION,
    MeshFile,
    PrimitiveType,
    SubmeshRecord,
    TrackKeyframe,
    VertexElement,
    VertexElementType,
    VertexSemantic,
    vertex_stride,
};
