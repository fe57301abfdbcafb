//! glTF/GLB reference host
//!
//! Loads a glTF file into the exporter's host data model: one scene-graph
//! node per glTF node (same index), one [`MeshData`] per mesh/skin pair, and
//! one curve-based [`AnimationClip`] per animation.

use std::path::Path;

use anyhow::{Context, Result};
use asset_common::PrimitiveType;
use gltf::animation::Interpolation;
use gltf::animation::util::ReadOutputs;
use gltf::mesh::Mode;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use hashbrown::HashSet;

use crate::animation::{AnimationClip, Curve, CurveBinding, Keyframe, TransformProperty};
use crate::mesh::{BoneWeight, MeshData, SkinBinding, Submesh};
use crate::scene::{NodeId, SceneGraph, Transform};
use crate::session::AssetId;

/// Default sample rate for clips (frames per second)
pub const DEFAULT_FRAME_RATE: f32 = 30.0;

/// How imported clips are flagged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportOptions {
    pub frame_rate: f32,
    /// Mark every clip as legacy (direct evaluation only)
    pub legacy_clips: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            legacy_clips: true,
        }
    }
}

/// Everything the exporter needs from one glTF file
#[derive(Debug, Clone)]
pub struct ImportedScene {
    pub graph: SceneGraph,
    pub meshes: Vec<MeshData>,
    pub clips: Vec<AnimationClip>,
}

/// Load `input` and convert it into host data.
pub fn import_gltf(input: &Path, options: &ImportOptions) -> Result<ImportedScene> {
    let (document, buffers, _images) =
        gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;
    let source = input.display().to_string();

    let graph = build_graph(&document)?;

    let mut meshes = Vec::new();
    let mut seen = HashSet::new();
    for node in document.nodes() {
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let skin = node.skin();
        let id = match &skin {
            Some(skin) => format!("{}#mesh{}#skin{}", source, mesh.index(), skin.index()),
            None => format!("{}#mesh{}", source, mesh.index()),
        };
        if !seen.insert(id.clone()) {
            continue;
        }

        let name = mesh
            .name()
            .or(node.name())
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh{}", mesh.index()));
        let mut data = read_mesh(AssetId::new(id), name, &mesh, &buffers)?;
        if let Some(skin) = skin {
            data.skin = Some(read_skin(&graph, &skin, &buffers)?);
        }
        meshes.push(data);
    }

    let clips = document
        .animations()
        .map(|animation| read_animation(&source, &graph, &animation, &buffers, options))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "Imported {:?}: {} nodes, {} meshes, {} clips",
        input,
        graph.len(),
        meshes.len(),
        clips.len()
    );

    Ok(ImportedScene {
        graph,
        meshes,
        clips,
    })
}

// ============================================================================
// Nodes
// ============================================================================

fn build_graph(document: &gltf::Document) -> Result<SceneGraph> {
    let mut graph = SceneGraph::new();
    for node in document.nodes() {
        let (t, r, s) = node.transform().decomposed();
        let name = node
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("node{}", node.index()));
        graph.push_node(
            name,
            Transform {
                translation: Vec3::from_array(t),
                rotation: Quat::from_array(r),
                scale: Vec3::from_array(s),
            },
        );
    }
    for node in document.nodes() {
        for child in node.children() {
            graph.attach(NodeId(child.index()), NodeId(node.index()))?;
        }
    }
    Ok(graph)
}

// ============================================================================
// Meshes
// ============================================================================

fn topology(mode: Mode) -> PrimitiveType {
    match mode {
        Mode::Points => PrimitiveType::PointList,
        Mode::Lines => PrimitiveType::LineList,
        Mode::LineLoop | Mode::LineStrip => PrimitiveType::LineStrip,
        Mode::Triangles => PrimitiveType::TriangleList,
        Mode::TriangleStrip => PrimitiveType::TriangleStrip,
        Mode::TriangleFan => PrimitiveType::TriangleFan,
    }
}

/// Append a primitive's attribute, or drop the attribute for the whole mesh
/// once any primitive lacks it.
fn merge<T>(merged: &mut Option<Vec<T>>, part: Option<Vec<T>>) {
    match (merged.as_mut(), part) {
        (Some(all), Some(part)) => all.extend(part),
        _ => *merged = None,
    }
}

fn read_mesh(
    id: AssetId,
    name: String,
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
) -> Result<MeshData> {
    let mut data = MeshData::new(id, name, Vec::new());
    data.normals = Some(Vec::new());
    data.tangents = Some(Vec::new());
    data.uvs = [
        Some(Vec::new()),
        Some(Vec::new()),
        Some(Vec::new()),
        Some(Vec::new()),
    ];
    data.bone_weights = Some(Vec::new());

    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
        let base = data.positions.len() as u32;

        let positions: Vec<Vec3> = reader
            .read_positions()
            .with_context(|| format!("Mesh '{}' has a primitive without positions", data.name))?
            .map(Vec3::from_array)
            .collect();
        let count = positions.len() as u32;
        data.positions.extend(positions);

        merge(
            &mut data.normals,
            reader
                .read_normals()
                .map(|iter| iter.map(Vec3::from_array).collect()),
        );
        merge(
            &mut data.tangents,
            reader
                .read_tangents()
                .map(|iter| iter.map(Vec4::from_array).collect()),
        );
        for (set, uvs) in data.uvs.iter_mut().enumerate() {
            merge(
                uvs,
                reader
                    .read_tex_coords(set as u32)
                    .map(|iter| iter.into_f32().map(Vec2::from_array).collect()),
            );
        }

        let weights = match (reader.read_joints(0), reader.read_weights(0)) {
            (Some(joints), Some(weights)) => Some(
                joints
                    .into_u16()
                    .zip(weights.into_f32())
                    .map(|(j, w)| BoneWeight {
                        indices: j.map(u32::from),
                        weights: w,
                    })
                    .collect(),
            ),
            _ => None,
        };
        merge(&mut data.bone_weights, weights);

        let mut indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().map(|i| base + i).collect(),
            None => (base..base + count).collect(),
        };
        if matches!(primitive.mode(), Mode::LineLoop) {
            if let Some(&first) = indices.first() {
                indices.push(first);
            }
        }

        data.submeshes.push(Submesh {
            topology: topology(primitive.mode()),
            indices,
        });
    }

    Ok(data)
}

fn read_skin(
    graph: &SceneGraph,
    skin: &gltf::Skin,
    buffers: &[gltf::buffer::Data],
) -> Result<SkinBinding> {
    let bones: Vec<NodeId> = skin.joints().map(|j| NodeId(j.index())).collect();

    let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
    let bind_poses: Vec<Mat4> = match reader.read_inverse_bind_matrices() {
        Some(iter) => iter.map(|m| Mat4::from_cols_array_2d(&m)).collect(),
        None => vec![Mat4::IDENTITY; bones.len()],
    };

    let skeleton_root = match bones.first() {
        Some(&first) => Some(graph.top_ancestor(first)?),
        None => None,
    };

    Ok(SkinBinding {
        bones,
        bind_poses,
        skeleton_root,
    })
}

// ============================================================================
// Animations
// ============================================================================

const POSITION_COMPONENTS: &[TransformProperty] = &[
    TransformProperty::PositionX,
    TransformProperty::PositionY,
    TransformProperty::PositionZ,
];

/// glTF stores rotations as x, y, z, w
const ROTATION_COMPONENTS: &[TransformProperty] = &[
    TransformProperty::RotationX,
    TransformProperty::RotationY,
    TransformProperty::RotationZ,
    TransformProperty::RotationW,
];

const SCALE_COMPONENTS: &[TransformProperty] = &[
    TransformProperty::ScaleX,
    TransformProperty::ScaleY,
    TransformProperty::ScaleZ,
];

/// One component curve per key, cubic-spline outputs come as
/// `(in_tangent, value, out_tangent)` triples.
fn component_curve(times: &[f32], values: &[f32], interpolation: &Interpolation) -> Curve {
    let points: Vec<(f32, f32)> = times.iter().copied().zip(values.iter().copied()).collect();
    match interpolation {
        Interpolation::Linear => Curve::linear(&points),
        Interpolation::Step => Curve::stepped(&points),
        Interpolation::CubicSpline => Curve::new(
            times
                .iter()
                .zip(values.chunks_exact(3))
                .map(|(&t, c)| Keyframe::new(t, c[1], c[0], c[2]))
                .collect(),
        ),
    }
}

fn read_animation(
    source: &str,
    graph: &SceneGraph,
    animation: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
    options: &ImportOptions,
) -> Result<AnimationClip> {
    let name = animation
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("animation{}", animation.index()));

    let mut length = 0.0f32;
    let mut bindings = Vec::new();
    for channel in animation.channels() {
        let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
        let times: Vec<f32> = reader
            .read_inputs()
            .with_context(|| format!("Animation '{}' has a channel without inputs", name))?
            .collect();
        if let Some(&last) = times.last() {
            length = length.max(last);
        }

        let (properties, outputs): (&[TransformProperty], Vec<Vec<f32>>) =
            match reader.read_outputs() {
                Some(ReadOutputs::Translations(iter)) => {
                    (POSITION_COMPONENTS, iter.map(|v| v.to_vec()).collect())
                }
                Some(ReadOutputs::Rotations(rotations)) => (
                    ROTATION_COMPONENTS,
                    rotations.into_f32().map(|v| v.to_vec()).collect(),
                ),
                Some(ReadOutputs::Scales(iter)) => {
                    (SCALE_COMPONENTS, iter.map(|v| v.to_vec()).collect())
                }
                // Morph weights have no transform counterpart
                _ => continue,
            };

        let path = graph.path(NodeId(channel.target().node().index()))?;
        let interpolation = channel.sampler().interpolation();
        for (component, &property) in properties.iter().enumerate() {
            let values: Vec<f32> = outputs.iter().map(|v| v[component]).collect();
            bindings.push(CurveBinding::new(
                path.clone(),
                property,
                component_curve(&times, &values, &interpolation),
            ));
        }
    }

    Ok(AnimationClip {
        id: AssetId::new(format!("{}#anim{}", source, animation.index())),
        name,
        length,
        frame_rate: options.frame_rate,
        legacy: options.legacy_clips,
        bindings,
    })
}
