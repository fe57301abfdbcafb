//! Bone table construction
//!
//! Turns a mesh's skin into the engine's flat bone table. Parents are
//! resolved by looking the scene-graph parent up in the skin's own bone
//! list; a bone whose parent is not part of the skin hangs off bone 0.

use asset_common::BoneRecord;

use super::bounds::bone_bounds;
use super::types::{BoneWeight, MeshData};
use crate::error::{ExportError, Result};
use crate::scene::SceneGraph;

/// Build the bone table of `mesh`, empty if it has no skin.
pub fn build_bones(graph: &SceneGraph, mesh: &MeshData) -> Result<Vec<BoneRecord>> {
    let Some(skin) = &mesh.skin else {
        return Ok(Vec::new());
    };

    if skin.bones.len() != skin.bind_poses.len() {
        return Err(ExportError::BindPoseMismatch {
            mesh: mesh.name.clone(),
            bones: skin.bones.len(),
            bind_poses: skin.bind_poses.len(),
        });
    }

    // Partial weights are dropped from the vertex buffer too
    let weights: &[BoneWeight] = match &mesh.bone_weights {
        Some(w) if w.len() == mesh.vertex_count() => w,
        _ => &[],
    };

    skin.bones
        .iter()
        .zip(skin.bind_poses.iter())
        .enumerate()
        .map(|(index, (&bone, bind_matrix))| {
            let node = graph.get(bone)?;
            let parent_index = node
                .parent
                .and_then(|parent| skin.bones.iter().position(|&b| b == parent))
                .unwrap_or(0);

            Ok(BoneRecord {
                name: node.name.clone(),
                parent_index: parent_index as u32,
                translation: node.local.translation,
                rotation: node.local.rotation,
                scale: node.local.scale,
                bind_matrix: *bind_matrix,
                bounds: bone_bounds(index as u32, bind_matrix, &mesh.positions, weights),
            })
        })
        .collect()
}
