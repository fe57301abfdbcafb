//! asset-export library
//!
//! Turns host scene data (meshes with skins, curve-based animation clips)
//! into the engine's `.mdl` and `.ani` binaries. The glTF importer in
//! [`gltf_import`] is a reference host; anything that can fill in a
//! [`SceneGraph`] and implement [`AnimationHost`] can drive the exporter.

pub mod animation;
pub mod error;
pub mod export;
pub mod gltf_import;
pub mod manifest;
pub mod mesh;
pub mod naming;
pub mod output;
pub mod scene;
pub mod session;

// Re-export the format crate so callers can parse what they wrote
pub use asset_common::{AnimationFile, ENGINE_ASSET_FORMAT, MeshFile};

pub use animation::{
    AnimationClip, AnimationHost, Curve, CurveAnimationHost, CurveBinding, Keyframe,
    PlaybackGraphId, PoseSampler, TransformProperty, export_animation,
};
pub use error::{ExportError, Result};
pub use export::{ExportReport, export_scene};
pub use gltf_import::{ImportOptions, ImportedScene, import_gltf};
pub use mesh::{BoneWeight, MeshData, SkinBinding, Submesh, export_mesh};
pub use output::WriteOutcome;
pub use scene::{NodeId, SceneGraph, SceneNode, Transform};
pub use session::{AssetId, ExportOptions, ExportSession};
