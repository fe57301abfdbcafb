//! Batch export with per-asset failure isolation

use crate::animation::{AnimationClip, AnimationHost, export_animation};
use crate::error::ExportError;
use crate::mesh::{MeshData, export_mesh};
use crate::output::WriteOutcome;
use crate::scene::SceneGraph;
use crate::session::ExportSession;

/// An asset that could not be exported
#[derive(Debug)]
pub struct ExportFailure {
    pub asset: String,
    pub error: ExportError,
}

/// Outcome counts of one batch
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: usize,
    /// Duplicates and files already on disk
    pub skipped: usize,
    pub failures: Vec<ExportFailure>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, asset: &str, result: Result<WriteOutcome, ExportError>) {
        match result {
            Ok(WriteOutcome::Written) => self.written += 1,
            Ok(WriteOutcome::AlreadyExists) => self.skipped += 1,
            Err(error) => {
                tracing::error!("Failed to export '{}': {}", asset, error);
                self.failures.push(ExportFailure {
                    asset: asset.to_string(),
                    error,
                });
            }
        }
    }
}

/// Export every mesh, then every clip.
///
/// Meshes go first so their skeleton roots are known when clips are matched
/// against skeletons. A failing asset is logged and skipped; the rest of the
/// batch still runs.
pub fn export_scene<H: AnimationHost + ?Sized>(
    session: &mut ExportSession,
    host: &mut H,
    graph: &SceneGraph,
    meshes: &[MeshData],
    clips: &[AnimationClip],
) -> ExportReport {
    let mut report = ExportReport::default();

    for mesh in meshes {
        report.record(&mesh.name, export_mesh(session, graph, mesh));
    }
    for clip in clips {
        report.record(&clip.name, export_animation(session, host, graph, clip));
    }

    report
}
