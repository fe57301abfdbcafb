//! Programmatic GLB generation for integration tests.
//!
//! Two scenes:
//! - a skinned rig (Armature → Hips → Spine → Head, plus a skinned "Body"
//!   mesh) with a one second "Wave" clip
//! - a lone non-indexed triangle with positions only

mod buffer_packing;
mod glb_assembly;

use buffer_packing::BufferPacker;
use serde_json::json;

/// Bones of the rig's skin, in joint order
pub const BONE_NAMES: [&str; 3] = ["Hips", "Spine", "Head"];
/// Vertices of the skinned mesh
pub const BODY_VERTEX_COUNT: usize = 6;
/// Length of the "Wave" clip in seconds
pub const WAVE_LENGTH: f32 = 1.0;

/// Skinned mesh vertices: three weighted to Hips, three to Spine, none to
/// Head.
const BODY_POSITIONS: [[f32; 3]; BODY_VERTEX_COUNT] = [
    [-0.5, 1.0, 0.0],
    [0.5, 1.0, 0.0],
    [0.0, 1.5, 0.0],
    [-0.5, 2.0, 0.0],
    [0.5, 2.0, 0.0],
    [0.0, 2.5, 0.0],
];

pub const BODY_UVS: [[f32; 2]; BODY_VERTEX_COUNT] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [0.5, 0.25],
    [0.0, 0.5],
    [1.0, 0.5],
    [0.5, 0.75],
];

const BODY_JOINTS: [u16; BODY_VERTEX_COUNT] = [0, 0, 0, 1, 1, 1];

/// Generate the skinned rig GLB.
pub fn generate_skinned_glb() -> Vec<u8> {
    let mut packer = BufferPacker::default();

    // --- Mesh ---
    let positions = packer.floats(BODY_POSITIONS.as_flattened(), "VEC3");
    let normals = packer.floats(&[0.0, 0.0, 1.0].repeat(BODY_VERTEX_COUNT), "VEC3");
    let uvs = packer.floats(BODY_UVS.as_flattened(), "VEC2");
    let joints: Vec<u16> = BODY_JOINTS.iter().flat_map(|&j| [j, 0, 0, 0]).collect();
    let joints = packer.u16s(&joints, "VEC4");
    let weights = packer.floats(&[1.0, 0.0, 0.0, 0.0].repeat(BODY_VERTEX_COUNT), "VEC4");
    let indices = packer.u16s(&[0, 1, 2, 3, 4, 5], "SCALAR");

    // --- Skin: bone n sits at height n + 1 ---
    let inverse_binds: Vec<f32> = (1..=BONE_NAMES.len())
        .flat_map(|height| {
            let mut m = [0.0f32; 16];
            m[0] = 1.0;
            m[5] = 1.0;
            m[10] = 1.0;
            m[15] = 1.0;
            m[13] = -(height as f32);
            m
        })
        .collect();
    let inverse_binds = packer.floats(&inverse_binds, "MAT4");

    // --- Animation ---
    let rotation_times = packer.floats(&[0.0, 0.5, WAVE_LENGTH], "SCALAR");
    let half = std::f32::consts::FRAC_1_SQRT_2;
    let rotations = packer.floats(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, half, half, 0.0, 0.0, 0.0, 1.0],
        "VEC4",
    );
    let translation_times = packer.floats(&[0.0, WAVE_LENGTH], "SCALAR");
    let translations = packer.floats(&[0.0, 1.0, 0.0, 0.0, 1.5, 0.0], "VEC3");

    let root = json!({
        "asset": { "version": "2.0", "generator": "asset-export tests" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "Armature", "children": [1, 4] },
            { "name": "Hips", "translation": [0.0, 1.0, 0.0], "children": [2] },
            { "name": "Spine", "translation": [0.0, 1.0, 0.0], "children": [3] },
            { "name": "Head", "translation": [0.0, 1.0, 0.0] },
            { "name": "Body", "mesh": 0, "skin": 0 },
        ],
        "meshes": [{
            "name": "Body",
            "primitives": [{
                "attributes": {
                    "POSITION": positions,
                    "NORMAL": normals,
                    "TEXCOORD_0": uvs,
                    "JOINTS_0": joints,
                    "WEIGHTS_0": weights,
                },
                "indices": indices,
                "mode": 4,
            }],
        }],
        "skins": [{ "joints": [1, 2, 3], "inverseBindMatrices": inverse_binds }],
        "animations": [{
            "name": "Wave",
            "samplers": [
                { "input": rotation_times, "output": rotations, "interpolation": "LINEAR" },
                { "input": translation_times, "output": translations, "interpolation": "LINEAR" },
            ],
            "channels": [
                { "sampler": 0, "target": { "node": 1, "path": "rotation" } },
                { "sampler": 1, "target": { "node": 2, "path": "translation" } },
            ],
        }],
        "accessors": packer.accessors,
        "bufferViews": packer.views,
    });

    glb_assembly::assemble_glb(root, &packer.data)
}

/// Generate a GLB holding one non-indexed, positions-only triangle.
pub fn generate_triangle_glb() -> Vec<u8> {
    let mut packer = BufferPacker::default();
    let positions = packer.floats(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        "VEC3",
    );

    let root = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "Tri", "mesh": 0 }],
        "meshes": [{
            "name": "Triangle",
            "primitives": [{ "attributes": { "POSITION": positions } }],
        }],
        "accessors": packer.accessors,
        "bufferViews": packer.views,
    });

    glb_assembly::assemble_glb(root, &packer.data)
}
