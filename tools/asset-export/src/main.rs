//! asset-export - engine asset export tool
//!
//! Converts glTF scenes into engine meshes (.mdl) and animation clips (.ani)

use anyhow::{Context, Result};
use asset_common::{AnimationFile, ENGINE_ASSET_FORMAT, MeshFile};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

// Use modules from library
use asset_export::gltf_import::{DEFAULT_FRAME_RATE, ImportOptions, import_gltf};
use asset_export::{CurveAnimationHost, ExportOptions, ExportSession, export_scene, manifest};

#[derive(Parser)]
#[command(name = "asset-export")]
#[command(about = "Engine mesh and animation export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build assets from a manifest file
    Build {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,
    },

    /// Export every mesh and clip of a single glTF/GLB file
    Scene {
        /// Input glTF/GLB file
        input: PathBuf,

        /// Content folder to export into (default: assets/<file stem>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Import clips as non-legacy so they are pose-sampled
        #[arg(long)]
        no_legacy: bool,

        /// Frame rate for sampling (default: 30)
        #[arg(short, long)]
        frame_rate: Option<f32>,

        /// List meshes and animations instead of exporting
        #[arg(long)]
        list: bool,

        /// Build UV channels 1..3 all from the second source channel
        #[arg(long)]
        uv_channel_aliasing: bool,

        /// Write real submesh index offsets instead of 0
        #[arg(long)]
        submesh_index_offsets: bool,

        /// Pose-sample legacy clips when they match a skeleton
        #[arg(long)]
        sample_legacy_clips: bool,
    },

    /// Print a summary of an exported .mdl or .ani file
    Inspect {
        /// Exported file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building assets from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Scene {
            input,
            output,
            no_legacy,
            frame_rate,
            list,
            uv_channel_aliasing,
            submesh_index_offsets,
            sample_legacy_clips,
        } => {
            let options = ImportOptions {
                frame_rate: frame_rate.unwrap_or(DEFAULT_FRAME_RATE),
                legacy_clips: !no_legacy,
            };
            let scene = import_gltf(&input, &options)?;

            if list {
                list_scene(&input, &scene);
            } else {
                let output = output.unwrap_or_else(|| default_content_dir(&input));
                tracing::info!("Exporting {:?} -> {:?}", input, output);

                let export_options = ExportOptions {
                    uv_channel_aliasing,
                    submesh_index_offsets,
                    sample_legacy_clips,
                };
                let mut session = ExportSession::new(output, export_options);
                let mut host = CurveAnimationHost::new();
                let report = export_scene(
                    &mut session,
                    &mut host,
                    &scene.graph,
                    &scene.meshes,
                    &scene.clips,
                );
                if !report.is_success() {
                    anyhow::bail!("{} assets failed to export", report.failures.len());
                }
                tracing::info!(
                    "Done! {} written, {} skipped in {:?}",
                    report.written,
                    report.skipped,
                    session.content_dir()
                );
            }
        }

        Commands::Inspect { file } => inspect(&file)?,
    }

    Ok(())
}

fn default_content_dir(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string());
    PathBuf::from("assets").join(stem)
}

fn list_scene(input: &Path, scene: &asset_export::ImportedScene) {
    tracing::info!("Meshes in {:?}:", input);
    for (i, mesh) in scene.meshes.iter().enumerate() {
        tracing::info!(
            "  [{}] '{}': {} vertices, {} submeshes, {} bones",
            i,
            mesh.name,
            mesh.vertex_count(),
            mesh.submeshes.len(),
            mesh.skin.as_ref().map_or(0, |s| s.bones.len())
        );
    }

    tracing::info!("Animations in {:?}:", input);
    for (i, clip) in scene.clips.iter().enumerate() {
        tracing::info!(
            "  [{}] '{}': {} curves, {:.2}s",
            i,
            clip.name,
            clip.bindings.len(),
            clip.length
        );
    }
}

fn inspect(file: &Path) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;

    if bytes.starts_with(&ENGINE_ASSET_FORMAT.mesh_magic.to_le_bytes()) {
        let mesh =
            MeshFile::parse(&bytes).with_context(|| format!("Failed to parse mesh: {:?}", file))?;
        tracing::info!(
            "Mesh {:?}: {} vertices, {} elements, {:?} indices x {}, {} submeshes, {} bones",
            file,
            mesh.vertex_count,
            mesh.elements.len(),
            mesh.index_format(),
            mesh.indices.len(),
            mesh.submeshes.len(),
            mesh.bones.len()
        );
        for bone in &mesh.bones {
            tracing::info!(
                "  bone '{}' parent={} radius={:.3}",
                bone.name,
                bone.parent_index,
                bone.bounds.radius
            );
        }
        tracing::info!("  bounds {} .. {}", mesh.bounds.min, mesh.bounds.max);
    } else if bytes.starts_with(ENGINE_ASSET_FORMAT.animation_magic) {
        let clip = AnimationFile::parse(&bytes)
            .with_context(|| format!("Failed to parse animation: {:?}", file))?;
        tracing::info!(
            "Animation {:?}: '{}', {:.2}s, {} tracks",
            file,
            clip.header.name,
            clip.header.length,
            clip.tracks.len()
        );
        for track in &clip.tracks {
            tracing::info!(
                "  track '{}' mask={:#05b} keyframes={}",
                track.name,
                track.mask.bits(),
                track.keyframes.len()
            );
        }
    } else {
        anyhow::bail!("{:?} is neither a mesh nor an animation file", file);
    }

    Ok(())
}
