//! Asset format specification for the engine exporter.
//!
//! `AssetFormat` is the single source of truth for file-level constants
//! (magic numbers, file extensions, content sub-folders).
//!
//! # Example
//!
//! ```
//! use asset_common::ENGINE_ASSET_FORMAT;
//!
//! assert_eq!(ENGINE_ASSET_FORMAT.mesh_ext, "mdl");
//! assert_eq!(ENGINE_ASSET_FORMAT.animation_magic, b"UANI");
//! assert_eq!(ENGINE_ASSET_FORMAT.mesh_magic.to_le_bytes(), *b"UMD2");
//! ```

/// File-level constants for one engine target.
#[derive(Debug, Clone, Copy)]
pub struct AssetFormat {
    /// Mesh file magic, written as a little-endian u32
    pub mesh_magic: u32,

    /// Animation file magic (4 raw bytes)
    pub animation_magic: &'static [u8; 4],

    /// Mesh file extension without dot
    pub mesh_ext: &'static str,

    /// Animation file extension without dot
    pub animation_ext: &'static str,

    /// Sub-folder of a content folder holding meshes
    pub models_dir: &'static str,

    /// Sub-folder of a content folder holding animation clips
    pub animations_dir: &'static str,
}

impl AssetFormat {
    /// Create a new asset format specification.
    pub const fn new(
        mesh_magic: u32,
        animation_magic: &'static [u8; 4],
        mesh_ext: &'static str,
        animation_ext: &'static str,
        models_dir: &'static str,
        animations_dir: &'static str,
    ) -> Self {
        Self {
            mesh_magic,
            animation_magic,
            mesh_ext,
            animation_ext,
            models_dir,
            animations_dir,
        }
    }
}

/// Engine asset format used by every exporter in this workspace.
pub const ENGINE_ASSET_FORMAT: AssetFormat = AssetFormat::new(
    crate::formats::MESH_MAGIC,
    &crate::formats::ANIMATION_MAGIC,
    "mdl",
    "ani",
    "Models",
    "Animations",
);
