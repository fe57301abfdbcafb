//! Pose sampling
//!
//! The host owns clip evaluation. The exporter only asks it, through
//! [`AnimationHost`], to pose a scratch hierarchy at a given time.

use super::clip::AnimationClip;
use super::scratch::ScratchHierarchy;
use crate::error::{ExportError, Result};

/// Lower bound on the clip length when converting time to a playback fraction
pub const MIN_CLIP_LENGTH: f32 = 1e-6;

/// Handle to a temporary playback graph created by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackGraphId(pub u64);

/// Clip evaluation supplied by the host
pub trait AnimationHost {
    /// Pose `target` with `clip` at absolute `time` in seconds.
    fn evaluate_clip(
        &mut self,
        clip: &AnimationClip,
        target: &mut ScratchHierarchy,
        time: f32,
    ) -> Result<()>;

    /// Create a single-clip playback graph for `clip`.
    fn create_playback_graph(&mut self, clip: &AnimationClip) -> Result<PlaybackGraphId>;

    /// Pose `target` with `graph` at `fraction` of the clip (0 = start, 1 = end).
    fn evaluate_playback_graph(
        &mut self,
        graph: PlaybackGraphId,
        target: &mut ScratchHierarchy,
        fraction: f32,
    ) -> Result<()>;

    fn delete_playback_graph(&mut self, graph: PlaybackGraphId);
}

/// Strategy used to pose the scratch hierarchy each frame
///
/// A playback graph is released on [`PoseSampler::dispose`] or on drop,
/// whichever comes first.
pub enum PoseSampler<'a, H: AnimationHost + ?Sized> {
    /// Evaluate the clip at absolute time
    Direct {
        host: &'a mut H,
        clip: &'a AnimationClip,
    },
    /// Drive a temporary playback graph by normalized time
    Playback {
        host: &'a mut H,
        clip: &'a AnimationClip,
        graph: Option<PlaybackGraphId>,
    },
}

impl<'a, H: AnimationHost + ?Sized> PoseSampler<'a, H> {
    pub fn direct(host: &'a mut H, clip: &'a AnimationClip) -> Self {
        Self::Direct { host, clip }
    }

    pub fn playback(host: &'a mut H, clip: &'a AnimationClip) -> Result<Self> {
        let graph = host.create_playback_graph(clip)?;
        Ok(Self::Playback {
            host,
            clip,
            graph: Some(graph),
        })
    }

    /// Pose `target` at `time` seconds into the clip.
    pub fn sample(&mut self, target: &mut ScratchHierarchy, time: f32) -> Result<()> {
        match self {
            Self::Direct { host, clip } => host.evaluate_clip(clip, target, time),
            Self::Playback { host, clip, graph } => {
                let graph = graph.ok_or_else(|| ExportError::Sampling {
                    clip: clip.name.clone(),
                    reason: "playback graph already released".to_string(),
                })?;
                let fraction = time / clip.length.max(MIN_CLIP_LENGTH);
                host.evaluate_playback_graph(graph, target, fraction)
            }
        }
    }

    /// Release host resources. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Self::Playback { host, graph, .. } = self {
            if let Some(graph) = graph.take() {
                host.delete_playback_graph(graph);
            }
        }
    }
}

impl<H: AnimationHost + ?Sized> Drop for PoseSampler<'_, H> {
    fn drop(&mut self) {
        self.dispose();
    }
}
