//! Skeletal track encoding
//!
//! Ties a clip to one known skeleton, then samples full poses of a scratch
//! copy of that skeleton: one track per node, every channel stored.

use asset_common::{AnimationTrack, ChannelMask, FrameTiming, TrackKeyframe};

use super::clip::AnimationClip;
use super::pose::{AnimationHost, PoseSampler};
use super::scratch::ScratchHierarchy;
use crate::error::Result;
use crate::scene::{NodeId, SceneGraph};

/// Top-level path segments of a clip's bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootName<'a> {
    Unique(&'a str),
    /// More than one distinct first segment, in first-seen order
    Ambiguous(Vec<&'a str>),
    /// No binding has a path
    Missing,
}

pub fn root_bone_name(clip: &AnimationClip) -> RootName<'_> {
    let mut names: Vec<&str> = Vec::new();
    for binding in &clip.bindings {
        let Some(first) = binding.path.split('/').next().filter(|s| !s.is_empty()) else {
            continue;
        };
        if !names.contains(&first) {
            names.push(first);
        }
    }
    match names.len() {
        0 => RootName::Missing,
        1 => RootName::Unique(names[0]),
        _ => RootName::Ambiguous(names),
    }
}

/// The node to clone for pose sampling, if the clip maps onto exactly one
/// of `skeleton_roots`.
///
/// Logs a warning naming the clip whenever it does not.
pub fn find_skeleton_node(
    graph: &SceneGraph,
    skeleton_roots: &[NodeId],
    clip: &AnimationClip,
) -> Option<NodeId> {
    let name = match root_bone_name(clip) {
        RootName::Unique(name) => name,
        RootName::Ambiguous(names) => {
            tracing::warn!(
                "Clip '{}' ({}) animates several root bones {:?}, falling back to curve encoding",
                clip.name,
                clip.id,
                names
            );
            return None;
        }
        RootName::Missing => {
            tracing::warn!(
                "Clip '{}' ({}) has no bound root bone, falling back to curve encoding",
                clip.name,
                clip.id
            );
            return None;
        }
    };

    let matches: Vec<NodeId> = skeleton_roots
        .iter()
        .filter_map(|&root| graph.find_in_subtree(root, name))
        .collect();

    match matches.as_slice() {
        [node] => Some(*node),
        [] => {
            tracing::warn!(
                "Clip '{}' ({}): no known skeleton contains root bone '{}', falling back to curve encoding",
                clip.name,
                clip.id,
                name
            );
            None
        }
        _ => {
            tracing::warn!(
                "Clip '{}' ({}): root bone '{}' found in {} skeletons, falling back to curve encoding",
                clip.name,
                clip.id,
                name,
                matches.len()
            );
            None
        }
    }
}

/// Sample every frame of `timing` into one full-mask track per scratch node.
///
/// Tracks follow the scratch hierarchy's pre-order.
pub fn sample_skeletal_tracks<H: AnimationHost + ?Sized>(
    sampler: &mut PoseSampler<'_, H>,
    scratch: &mut ScratchHierarchy,
    timing: &FrameTiming,
) -> Result<Vec<AnimationTrack>> {
    let mut tracks: Vec<AnimationTrack> = scratch
        .nodes()
        .iter()
        .map(|node| AnimationTrack {
            name: node.name.clone(),
            mask: ChannelMask::ALL,
            keyframes: Vec::with_capacity(timing.frame_count as usize),
        })
        .collect();

    for time in timing.times() {
        sampler.sample(scratch, time)?;
        for (track, node) in tracks.iter_mut().zip(scratch.nodes()) {
            track.keyframes.push(TrackKeyframe {
                time,
                translation: node.local.translation,
                rotation: node.local.rotation,
                scale: node.local.scale,
            });
        }
    }

    Ok(tracks)
}
