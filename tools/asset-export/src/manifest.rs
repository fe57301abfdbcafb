//! Manifest parsing and build orchestration
//!
//! Parses assets.toml and exports every listed scene into its own content
//! folder under the output directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::animation::CurveAnimationHost;
use crate::export::{ExportReport, export_scene};
use crate::gltf_import::{DEFAULT_FRAME_RATE, ImportOptions, import_gltf};
use crate::session::{ExportOptions, ExportSession};

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Content folder name -> source scene
    #[serde(default)]
    pub scenes: BTreeMap<String, SceneEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/")
}

#[derive(Debug, Deserialize, Default)]
pub struct MeshConfig {
    #[serde(default)]
    pub uv_channel_aliasing: bool,
    #[serde(default)]
    pub submesh_index_offsets: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    #[serde(default = "default_legacy")]
    pub legacy: bool,
    #[serde(default)]
    pub sample_legacy_clips: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            legacy: default_legacy(),
            sample_legacy_clips: false,
        }
    }
}

fn default_frame_rate() -> f32 {
    DEFAULT_FRAME_RATE
}

fn default_legacy() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SceneEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        legacy: Option<bool>,
        #[serde(default)]
        frame_rate: Option<f32>,
    },
}

impl SceneEntry {
    pub fn path(&self) -> &Path {
        match self {
            SceneEntry::Simple(p) => p,
            SceneEntry::Detailed { path, .. } => path,
        }
    }

    /// Import settings, falling back to the manifest-wide animation config
    pub fn import_options(&self, defaults: &AnimationConfig) -> ImportOptions {
        let (legacy, frame_rate) = match self {
            SceneEntry::Simple(_) => (None, None),
            SceneEntry::Detailed {
                legacy, frame_rate, ..
            } => (*legacy, *frame_rate),
        };
        ImportOptions {
            frame_rate: frame_rate.unwrap_or(defaults.frame_rate),
            legacy_clips: legacy.unwrap_or(defaults.legacy),
        }
    }
}

impl Manifest {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            uv_channel_aliasing: self.mesh.uv_channel_aliasing,
            submesh_index_offsets: self.mesh.submesh_index_offsets,
            sample_legacy_clips: self.animation.sample_legacy_clips,
        }
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    Ok(manifest)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    // Check that all source files exist
    for (name, entry) in &manifest.scenes {
        if !entry.path().exists() {
            anyhow::bail!("Scene '{}' source not found: {:?}", name, entry.path());
        }
    }
    Ok(())
}

/// Export every scene in the manifest.
///
/// A scene that fails to import, or an asset that fails to export, is
/// logged and the build continues. The returned error reports how many
/// failed.
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<ExportReport> {
    let output_dir = output_override.unwrap_or(&manifest.output.dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut total = ExportReport::default();
    let mut failed_scenes = 0usize;

    for (name, entry) in &manifest.scenes {
        tracing::info!("Exporting scene: {} -> {:?}", name, output_dir.join(name));

        let scene = match import_gltf(entry.path(), &entry.import_options(&manifest.animation)) {
            Ok(scene) => scene,
            Err(e) => {
                tracing::error!("Failed to import scene '{}': {:#}", name, e);
                failed_scenes += 1;
                continue;
            }
        };

        let mut session = ExportSession::new(output_dir.join(name), manifest.export_options());
        let mut host = CurveAnimationHost::new();
        let report = export_scene(
            &mut session,
            &mut host,
            &scene.graph,
            &scene.meshes,
            &scene.clips,
        );

        total.written += report.written;
        total.skipped += report.skipped;
        total.failures.extend(report.failures);
    }

    tracing::info!(
        "{} written, {} skipped, {} failed",
        total.written,
        total.skipped,
        total.failures.len()
    );

    if failed_scenes > 0 || !total.is_success() {
        anyhow::bail!(
            "{} scenes failed to import, {} assets failed to export",
            failed_scenes,
            total.failures.len()
        );
    }
    Ok(total)
}
