//! Host-side mesh data

use asset_common::PrimitiveType;
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::scene::NodeId;
use crate::session::AssetId;

/// Number of UV channels a mesh can carry
pub const MAX_UV_CHANNELS: usize = 4;

/// Up to four bone influences of one vertex
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoneWeight {
    /// Bone indices into the mesh's skin
    pub indices: [u32; 4],
    pub weights: [f32; 4],
}

impl BoneWeight {
    /// Whether any slot references `bone` with at least `threshold` weight
    pub fn influences(&self, bone: u32, threshold: f32) -> bool {
        self.indices
            .iter()
            .zip(self.weights.iter())
            .any(|(&i, &w)| i == bone && w >= threshold)
    }
}

/// One index range of a mesh, drawn with a single topology
#[derive(Debug, Clone, PartialEq)]
pub struct Submesh {
    pub topology: PrimitiveType,
    pub indices: Vec<u32>,
}

/// Skin of a mesh: bones in skin order plus their inverse bind poses
#[derive(Debug, Clone, PartialEq)]
pub struct SkinBinding {
    pub bones: Vec<NodeId>,
    /// Inverse bind pose per bone, same order as `bones`
    pub bind_poses: Vec<Mat4>,
    /// Top of the rig the bones belong to, if known
    pub skeleton_root: Option<NodeId>,
}

/// A mesh as the host hands it over
///
/// Every present vertex attribute should have `positions.len()` entries;
/// attributes that don't are dropped on export.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub id: AssetId,
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub tangents: Option<Vec<Vec4>>,
    pub uvs: [Option<Vec<Vec2>>; MAX_UV_CHANNELS],
    pub bone_weights: Option<Vec<BoneWeight>>,
    pub submeshes: Vec<Submesh>,
    pub skin: Option<SkinBinding>,
}

impl MeshData {
    /// A mesh with positions only and no submeshes
    pub fn new(id: impl Into<AssetId>, name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            positions,
            normals: None,
            tangents: None,
            uvs: [None, None, None, None],
            bone_weights: None,
            submeshes: Vec::new(),
            skin: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.indices.len()).sum()
    }
}
