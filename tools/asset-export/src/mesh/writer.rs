//! Mesh export (MeshData -> .mdl)

use asset_common::{BoundingBox, IndexFormat, MeshFile, SubmeshRecord};

use super::packing::{build_streams, interleave};
use super::skeleton::build_bones;
use super::types::MeshData;
use crate::error::{ExportError, Result};
use crate::output::{WriteOutcome, write_new_file};
use crate::scene::SceneGraph;
use crate::session::ExportSession;

/// Assemble the in-memory mesh file for `mesh`.
pub fn build_mesh_file(
    session: &ExportSession,
    graph: &SceneGraph,
    mesh: &MeshData,
) -> Result<MeshFile> {
    let vertex_count = mesh.vertex_count();
    validate_indices(mesh)?;

    let streams = build_streams(mesh, session.options());
    let elements = streams.iter().map(|s| s.element()).collect();
    let vertex_data = interleave(&streams, vertex_count);

    let mut indices = Vec::with_capacity(mesh.index_count());
    let mut submeshes = Vec::with_capacity(mesh.submeshes.len());
    for submesh in &mesh.submeshes {
        let index_start = if session.options().submesh_index_offsets {
            indices.len() as u32
        } else {
            0
        };
        submeshes.push(SubmeshRecord {
            primitive_type: submesh.topology,
            index_start,
            vertex_start: 0,
            index_count: submesh.indices.len() as u32,
        });
        indices.extend_from_slice(&submesh.indices);
    }

    Ok(MeshFile {
        vertex_count: vertex_count as u32,
        elements,
        vertex_data,
        indices,
        submeshes,
        bones: build_bones(graph, mesh)?,
        bounds: BoundingBox::from_points(mesh.positions.iter().copied())
            .unwrap_or(BoundingBox::ZERO),
    })
}

fn validate_indices(mesh: &MeshData) -> Result<()> {
    let vertex_count = mesh.vertex_count();
    let format = IndexFormat::for_vertex_count(vertex_count as u32);
    for &index in mesh.submeshes.iter().flat_map(|s| s.indices.iter()) {
        if format == IndexFormat::U16 && index > u16::MAX as u32 {
            return Err(ExportError::IndexOverflow {
                mesh: mesh.name.clone(),
                index,
            });
        }
        if index as usize >= vertex_count {
            return Err(ExportError::IndexOutOfRange {
                mesh: mesh.name.clone(),
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}

/// Write `mesh` into the session's `Models` folder.
///
/// A mesh already handled this session, or whose file already exists on
/// disk, is skipped. The mesh's skeleton root is registered either way so
/// clips can still be matched against it.
pub fn export_mesh(
    session: &mut ExportSession,
    graph: &SceneGraph,
    mesh: &MeshData,
) -> Result<WriteOutcome> {
    if session.exported_mesh(&mesh.id).is_some() {
        tracing::debug!("Mesh '{}' already exported this session", mesh.name);
        return Ok(WriteOutcome::AlreadyExists);
    }

    if let Some(root) = mesh.skin.as_ref().and_then(|s| s.skeleton_root) {
        session.register_skeleton_root(root);
    }

    let path = session.mesh_path(&mesh.name);
    if path.exists() {
        tracing::debug!("Skipping mesh '{}': {:?} already exists", mesh.name, path);
        session.record_mesh(mesh.id.clone(), path);
        return Ok(WriteOutcome::AlreadyExists);
    }

    let file = build_mesh_file(session, graph, mesh)?;
    let outcome = write_new_file(&path, |w| file.write(w))?;

    if outcome == WriteOutcome::Written {
        tracing::info!(
            "Exported mesh '{}': {} vertices, {} indices, {} submeshes, {} bones -> {:?}",
            mesh.name,
            file.vertex_count,
            file.indices.len(),
            file.submeshes.len(),
            file.bones.len(),
            path
        );
    }
    session.record_mesh(mesh.id.clone(), path);
    Ok(outcome)
}
