//! Per-asset export errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::scene::NodeId;

/// Failure exporting a single asset.
///
/// None of these abort a batch: the caller logs them and moves on to the
/// next asset.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("mesh '{mesh}': index {index} does not fit a 16-bit index buffer")]
    IndexOverflow { mesh: String, index: u32 },

    #[error("mesh '{mesh}': index {index} references vertex past the end ({vertex_count} vertices)")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },

    #[error("mesh '{mesh}' has {bones} bones but {bind_poses} bind poses")]
    BindPoseMismatch {
        mesh: String,
        bones: usize,
        bind_poses: usize,
    },

    #[error("clip '{clip}' has invalid frame rate {frame_rate}")]
    InvalidFrameRate { clip: String, frame_rate: f32 },

    #[error("clip '{clip}' has invalid length {length}")]
    InvalidLength { clip: String, length: f32 },

    #[error("pose sampling failed for clip '{clip}': {reason}")]
    Sampling { clip: String, reason: String },

    #[error("attaching node {child:?} under {parent:?} would form a cycle")]
    NodeCycle { child: NodeId, parent: NodeId },
    #[error("unknown scene node {0:?}")]
    UnknownNode(NodeId),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;
