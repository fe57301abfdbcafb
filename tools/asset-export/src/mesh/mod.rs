//! Mesh export (host mesh -> .mdl)

mod bounds;
mod packing;
mod skeleton;
mod types;
mod writer;

// Re-export public API
pub use bounds::{FALLBACK_EXTENT, WEIGHT_THRESHOLD, bone_bounds};
pub use packing::{StreamData, VertexStream, build_streams, interleave, truncate_to_byte};
pub use skeleton::build_bones;
pub use types::{BoneWeight, MAX_UV_CHANNELS, MeshData, SkinBinding, Submesh};
pub use writer::{build_mesh_file, export_mesh};
