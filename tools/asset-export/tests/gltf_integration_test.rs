//! Integration tests for the glTF export pipeline.
//!
//! Tests the complete flow:
//! 1. Generate GLB programmatically
//! 2. Import and export through asset-export
//! 3. Parse the written .mdl/.ani files back and validate them

mod gltf_generator;

use std::path::{Path, PathBuf};

use asset_common::{
    AnimationFile, ChannelMask, IndexFormat, MeshFile, PrimitiveType, VertexElementType,
    VertexSemantic,
};
use asset_export::{
    CurveAnimationHost, ExportOptions, ExportSession, ImportOptions, ImportedScene, export_scene,
    import_gltf, manifest,
};
use glam::{Quat, Vec3};
use tempfile::{TempDir, tempdir};

use gltf_generator::{BODY_UVS, BODY_VERTEX_COUNT, BONE_NAMES, WAVE_LENGTH};

fn write_glb(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("Failed to write GLB");
    path
}

/// Import the skinned rig and export it into `<tempdir>/content`.
fn export_rig(legacy_clips: bool) -> (TempDir, ImportedScene) {
    let dir = tempdir().expect("Failed to create temp dir");
    let glb = write_glb(dir.path(), "rig.glb", &gltf_generator::generate_skinned_glb());
    let options = ImportOptions {
        legacy_clips,
        ..ImportOptions::default()
    };
    let scene = import_gltf(&glb, &options).expect("Failed to import GLB");

    let mut session = ExportSession::new(dir.path().join("content"), ExportOptions::default());
    let mut host = CurveAnimationHost::new();
    let report = export_scene(
        &mut session,
        &mut host,
        &scene.graph,
        &scene.meshes,
        &scene.clips,
    );
    assert!(report.is_success(), "failures: {:?}", report.failures);
    assert_eq!(report.written, 2);
    assert_eq!(host.live_graph_count(), 0, "playback graph leaked");

    (dir, scene)
}

fn read_mesh(path: &Path) -> MeshFile {
    let bytes = std::fs::read(path).expect("Failed to read mesh");
    MeshFile::parse(&bytes).expect("Failed to parse mesh")
}

fn read_animation(path: &Path) -> AnimationFile {
    let bytes = std::fs::read(path).expect("Failed to read animation");
    AnimationFile::parse(&bytes).expect("Failed to parse animation")
}

/// Byte offset of an element inside one vertex
fn element_offset(mesh: &MeshFile, semantic: VertexSemantic, index: u8) -> usize {
    let mut offset = 0;
    for element in &mesh.elements {
        if element.semantic == semantic && element.index == index {
            return offset;
        }
        offset += element.element_type.size();
    }
    panic!("mesh has no {:?}{} element", semantic, index);
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn assert_vec3_near(actual: Vec3, expected: Vec3) {
    assert!(
        actual.abs_diff_eq(expected, 1e-4),
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_generated_glb_is_valid() {
    let glb_data = gltf_generator::generate_skinned_glb();
    assert_eq!(&glb_data[0..4], b"glTF", "Invalid GLB magic");
    assert_eq!(u32::from_le_bytes(glb_data[4..8].try_into().unwrap()), 2);

    let dir = tempdir().unwrap();
    let path = write_glb(dir.path(), "rig.glb", &glb_data);
    let (document, _buffers, _) = gltf::import(&path).expect("Failed to import GLB");
    assert_eq!(document.nodes().count(), 5);
    assert_eq!(document.skins().count(), 1);
    assert_eq!(document.animations().count(), 1);
}

#[test]
fn test_import_builds_host_data() {
    let dir = tempdir().unwrap();
    let glb = write_glb(dir.path(), "rig.glb", &gltf_generator::generate_skinned_glb());
    let scene = import_gltf(&glb, &ImportOptions::default()).unwrap();

    assert_eq!(scene.graph.len(), 5);
    assert_eq!(scene.meshes.len(), 1);
    let mesh = &scene.meshes[0];
    assert_eq!(mesh.name, "Body");
    assert_eq!(mesh.vertex_count(), BODY_VERTEX_COUNT);
    assert!(mesh.normals.is_some());
    assert!(mesh.uvs[0].is_some());
    assert!(mesh.uvs[1].is_none());
    assert!(mesh.tangents.is_none());

    let skin = mesh.skin.as_ref().expect("mesh should be skinned");
    let bone_names: Vec<&str> = skin
        .bones
        .iter()
        .map(|&b| scene.graph.get(b).unwrap().name.as_str())
        .collect();
    assert_eq!(bone_names, BONE_NAMES);
    let root = skin.skeleton_root.expect("skin should have a root");
    assert_eq!(scene.graph.get(root).unwrap().name, "Armature");

    assert_eq!(scene.clips.len(), 1);
    let clip = &scene.clips[0];
    assert_eq!(clip.name, "Wave");
    assert_eq!(clip.length, WAVE_LENGTH);
    assert!(clip.legacy);
    // 4 rotation components + 3 translation components
    assert_eq!(clip.bindings.len(), 7);
    assert_eq!(clip.bindings[0].path, "Armature/Hips");
    assert_eq!(clip.bindings[6].path, "Armature/Hips/Spine");
}

#[test]
fn test_skinned_mesh_round_trip() {
    let (dir, _scene) = export_rig(true);
    let mesh = read_mesh(&dir.path().join("content/Models/Body.mdl"));

    assert_eq!(mesh.vertex_count, BODY_VERTEX_COUNT as u32);
    let semantics: Vec<(VertexSemantic, VertexElementType)> = mesh
        .elements
        .iter()
        .map(|e| (e.semantic, e.element_type))
        .collect();
    assert_eq!(
        semantics,
        vec![
            (VertexSemantic::Position, VertexElementType::Vector3),
            (VertexSemantic::Normal, VertexElementType::Vector3),
            (VertexSemantic::TexCoord, VertexElementType::Vector2),
            (VertexSemantic::BlendWeights, VertexElementType::Vector4),
            (VertexSemantic::BlendIndices, VertexElementType::UByte4),
        ]
    );

    assert_eq!(mesh.index_format(), IndexFormat::U16);
    assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(mesh.submeshes.len(), 1);
    assert_eq!(mesh.submeshes[0].primitive_type, PrimitiveType::TriangleList);
    assert_eq!(mesh.submeshes[0].index_count, 6);

    let names: Vec<&str> = mesh.bones.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, BONE_NAMES);
    // Hips' parent (Armature) is not a bone, so it falls back to 0
    let parents: Vec<u32> = mesh.bones.iter().map(|b| b.parent_index).collect();
    assert_eq!(parents, vec![0, 0, 1]);
    assert_eq!(mesh.bones[1].translation, Vec3::Y);

    assert_eq!(mesh.bounds.min, Vec3::new(-0.5, 1.0, 0.0));
    assert_eq!(mesh.bounds.max, Vec3::new(0.5, 2.5, 0.0));
}

#[test]
fn test_uvs_are_flipped() {
    let (dir, _scene) = export_rig(true);
    let mesh = read_mesh(&dir.path().join("content/Models/Body.mdl"));
    let stride = asset_common::vertex_stride(&mesh.elements);
    let uv_offset = element_offset(&mesh, VertexSemantic::TexCoord, 0);

    for (i, uv) in BODY_UVS.iter().enumerate() {
        let base = i * stride + uv_offset;
        assert_eq!(read_f32(&mesh.vertex_data, base), uv[0]);
        assert_eq!(read_f32(&mesh.vertex_data, base + 4), 1.0 - uv[1]);
    }
}

#[test]
fn test_blend_indices_are_bytes() {
    let (dir, _scene) = export_rig(true);
    let mesh = read_mesh(&dir.path().join("content/Models/Body.mdl"));
    let stride = asset_common::vertex_stride(&mesh.elements);
    let offset = element_offset(&mesh, VertexSemantic::BlendIndices, 0);

    let first = &mesh.vertex_data[offset..offset + 4];
    assert_eq!(first, &[0, 0, 0, 0]);
    let fourth = &mesh.vertex_data[3 * stride + offset..3 * stride + offset + 4];
    assert_eq!(fourth, &[1, 0, 0, 0]);
}

#[test]
fn test_bone_bounds() {
    let (dir, _scene) = export_rig(true);
    let mesh = read_mesh(&dir.path().join("content/Models/Body.mdl"));

    // Hips' vertices, moved into bind space (one unit down)
    let hips = &mesh.bones[0].bounds;
    assert_eq!(hips.bbox.min, Vec3::new(-0.5, 0.0, 0.0));
    assert_eq!(hips.bbox.max, Vec3::new(0.5, 0.5, 0.0));

    // Nothing is weighted to Head
    let head = &mesh.bones[2].bounds;
    assert_eq!(head.radius, 0.1);
    assert_eq!(head.bbox.min, Vec3::splat(-0.1));
    assert_eq!(head.bbox.max, Vec3::splat(0.1));
}

#[test]
fn test_legacy_clip_uses_curve_tracks() {
    let (dir, _scene) = export_rig(true);
    let clip = read_animation(&dir.path().join("content/Animations/Wave.ani"));

    assert_eq!(clip.header.name, "Wave");
    assert_eq!(clip.header.length, WAVE_LENGTH);

    let names: Vec<&str> = clip.tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Hips", "Spine"]);
    assert_eq!(clip.tracks[0].mask, ChannelMask::ROTATION);
    assert_eq!(clip.tracks[1].mask, ChannelMask::POSITION);

    for track in &clip.tracks {
        assert_eq!(track.keyframes.len(), 31);
    }

    let halfway = &clip.tracks[0].keyframes[15];
    let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
    assert!(
        halfway.rotation.abs_diff_eq(expected, 1e-4),
        "got {}",
        halfway.rotation
    );

    let end = clip.tracks[1].keyframes.last().unwrap();
    assert_vec3_near(end.translation, Vec3::new(0.0, 1.5, 0.0));
}

#[test]
fn test_non_legacy_clip_samples_skeleton() {
    let (dir, _scene) = export_rig(false);
    let clip = read_animation(&dir.path().join("content/Animations/Wave.ani"));

    let names: Vec<&str> = clip.tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Armature", "Hips", "Spine", "Head", "Body"]);

    for track in &clip.tracks {
        assert_eq!(track.mask, ChannelMask::ALL);
        assert_eq!(track.keyframes.len(), 31);
    }

    // Unanimated bones hold their rest pose
    let head = &clip.tracks[3];
    for key in &head.keyframes {
        assert_vec3_near(key.translation, Vec3::Y);
        assert_vec3_near(key.scale, Vec3::ONE);
    }

    let spine = &clip.tracks[2];
    assert_vec3_near(spine.keyframes[0].translation, Vec3::Y);
    assert_vec3_near(
        spine.keyframes.last().unwrap().translation,
        Vec3::new(0.0, 1.5, 0.0),
    );
}

#[test]
fn test_positions_only_triangle() {
    let dir = tempdir().unwrap();
    let glb = write_glb(dir.path(), "tri.glb", &gltf_generator::generate_triangle_glb());
    let scene = import_gltf(&glb, &ImportOptions::default()).unwrap();

    let mut session = ExportSession::new(dir.path().join("content"), ExportOptions::default());
    let mut host = CurveAnimationHost::new();
    let report = export_scene(&mut session, &mut host, &scene.graph, &scene.meshes, &[]);
    assert_eq!(report.written, 1);

    let mesh = read_mesh(&dir.path().join("content/Models/Triangle.mdl"));
    assert_eq!(mesh.elements.len(), 1);
    assert_eq!(mesh.elements[0].semantic, VertexSemantic::Position);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.index_format(), IndexFormat::U16);
    assert!(mesh.bones.is_empty());
}

#[test]
fn test_second_export_keeps_existing_files() {
    let (dir, scene) = export_rig(true);
    let mesh_path = dir.path().join("content/Models/Body.mdl");
    let before = std::fs::read(&mesh_path).unwrap();

    // A fresh session sees the files on disk and leaves them alone
    let mut session = ExportSession::new(dir.path().join("content"), ExportOptions::default());
    let mut host = CurveAnimationHost::new();
    let report = export_scene(
        &mut session,
        &mut host,
        &scene.graph,
        &scene.meshes,
        &scene.clips,
    );
    assert_eq!(report.written, 0);
    assert_eq!(report.skipped, 2);
    assert_eq!(std::fs::read(&mesh_path).unwrap(), before);
}

#[test]
fn test_manifest_build() {
    let dir = tempdir().unwrap();
    let rig = write_glb(dir.path(), "rig.glb", &gltf_generator::generate_skinned_glb());
    let tri = write_glb(dir.path(), "tri.glb", &gltf_generator::generate_triangle_glb());
    let out = dir.path().join("out");

    let manifest_path = dir.path().join("assets.toml");
    std::fs::write(
        &manifest_path,
        format!(
            "[scenes]\nrig = {{ path = '{}', legacy = false }}\ntri = '{}'\n",
            rig.display(),
            tri.display()
        ),
    )
    .unwrap();

    let config = manifest::load_manifest(&manifest_path).unwrap();
    manifest::validate(&config).unwrap();
    let report = manifest::build_all(&config, Some(&out)).unwrap();
    assert_eq!(report.written, 3);

    assert!(out.join("rig/Models/Body.mdl").exists());
    assert!(out.join("tri/Models/Triangle.mdl").exists());
    let clip = read_animation(&out.join("rig/Animations/Wave.ani"));
    assert_eq!(clip.tracks.len(), 5);
}

#[test]
fn test_manifest_build_reports_broken_scene() {
    let dir = tempdir().unwrap();
    let tri = write_glb(dir.path(), "tri.glb", &gltf_generator::generate_triangle_glb());
    let broken = write_glb(dir.path(), "broken.glb", b"not a glb");
    let out = dir.path().join("out");

    let config: manifest::Manifest = toml::from_str(&format!(
        "[scenes]\nbroken = '{}'\ntri = '{}'\n",
        broken.display(),
        tri.display()
    ))
    .unwrap();

    let err = manifest::build_all(&config, Some(&out)).unwrap_err();
    assert!(err.to_string().contains("1 scenes failed"), "{}", err);
    // The healthy scene is still exported
    assert!(out.join("tri/Models/Triangle.mdl").exists());
}
