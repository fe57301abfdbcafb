//! Export session state
//!
//! One session per export run. It owns the output location, the behavior
//! switches, and the registries that make sure each mesh and clip is written
//! at most once.

use std::fmt;
use std::path::{Path, PathBuf};

use asset_common::ENGINE_ASSET_FORMAT;
use hashbrown::HashMap;

use crate::naming::sanitize_file_name;
use crate::scene::NodeId;

/// Host identity of an asset, used for de-duplication
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Behavior switches for legacy-compatible output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Build UV channels 1..3 all from the second source channel
    pub uv_channel_aliasing: bool,
    /// Write each submesh's real offset into the index buffer instead of 0
    pub submesh_index_offsets: bool,
    /// Try pose sampling (direct evaluation) for legacy clips too
    pub sample_legacy_clips: bool,
}

#[derive(Debug)]
pub struct ExportSession {
    content_dir: PathBuf,
    options: ExportOptions,
    meshes: HashMap<AssetId, PathBuf>,
    animations: HashMap<AssetId, PathBuf>,
    /// Skeleton roots seen on exported meshes, in registration order
    skeleton_roots: Vec<NodeId>,
}

impl ExportSession {
    pub fn new(content_dir: impl Into<PathBuf>, options: ExportOptions) -> Self {
        Self {
            content_dir: content_dir.into(),
            options,
            meshes: HashMap::new(),
            animations: HashMap::new(),
            skeleton_roots: Vec::new(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// `<content>/Models/<name>.mdl`
    pub fn mesh_path(&self, name: &str) -> PathBuf {
        self.content_dir
            .join(ENGINE_ASSET_FORMAT.models_dir)
            .join(format!(
                "{}.{}",
                sanitize_file_name(name),
                ENGINE_ASSET_FORMAT.mesh_ext
            ))
    }

    /// `<content>/Animations/<name>.ani`
    pub fn animation_path(&self, name: &str) -> PathBuf {
        self.content_dir
            .join(ENGINE_ASSET_FORMAT.animations_dir)
            .join(format!(
                "{}.{}",
                sanitize_file_name(name),
                ENGINE_ASSET_FORMAT.animation_ext
            ))
    }

    /// Where a mesh was written (or found already present) this session
    pub fn exported_mesh(&self, id: &AssetId) -> Option<&Path> {
        self.meshes.get(id).map(PathBuf::as_path)
    }

    pub fn exported_animation(&self, id: &AssetId) -> Option<&Path> {
        self.animations.get(id).map(PathBuf::as_path)
    }

    pub(crate) fn record_mesh(&mut self, id: AssetId, path: PathBuf) {
        self.meshes.insert(id, path);
    }

    pub(crate) fn record_animation(&mut self, id: AssetId, path: PathBuf) {
        self.animations.insert(id, path);
    }

    /// Remember a skeleton root so clips can be matched against it later.
    pub fn register_skeleton_root(&mut self, root: NodeId) {
        if !self.skeleton_roots.contains(&root) {
            self.skeleton_roots.push(root);
        }
    }

    pub fn skeleton_roots(&self) -> &[NodeId] {
        &self.skeleton_roots
    }
}
