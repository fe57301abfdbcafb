//! Animation export (AnimationClip -> .ani)

use asset_common::{AnimationFile, AnimationTrack, FrameTiming};

use super::clip::AnimationClip;
use super::curve::encode_curve_tracks;
use super::pose::{AnimationHost, PoseSampler};
use super::scratch::ScratchHierarchy;
use super::skeletal::{find_skeleton_node, sample_skeletal_tracks};
use crate::error::{ExportError, Result};
use crate::output::{WriteOutcome, write_new_file};
use crate::scene::SceneGraph;
use crate::session::ExportSession;

/// How a clip's tracks were produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEncoding {
    /// One track per bound path, curves evaluated directly
    Curve,
    /// One full-mask track per skeleton node, poses sampled through the host
    Skeletal,
}

/// Build the tracks of `clip`, choosing the encoding.
///
/// Non-legacy clips, and legacy clips when `sample_legacy_clips` is set, are
/// pose-sampled if they map onto exactly one known skeleton. Everything else
/// uses curve encoding.
pub fn encode_tracks<H: AnimationHost + ?Sized>(
    session: &ExportSession,
    host: &mut H,
    graph: &SceneGraph,
    clip: &AnimationClip,
    timing: &FrameTiming,
) -> Result<(TrackEncoding, Vec<AnimationTrack>)> {
    let try_skeletal = !clip.legacy || session.options().sample_legacy_clips;
    if try_skeletal {
        if let Some(node) = find_skeleton_node(graph, session.skeleton_roots(), clip) {
            let mut scratch = ScratchHierarchy::clone_subtree(graph, node)?;
            tracing::debug!(
                "Sampling clip '{}' on skeleton '{}' ({} nodes)",
                clip.name,
                scratch.root_name(),
                scratch.len()
            );
            let mut sampler = if clip.legacy {
                PoseSampler::direct(host, clip)
            } else {
                PoseSampler::playback(host, clip)?
            };
            let tracks = sample_skeletal_tracks(&mut sampler, &mut scratch, timing);
            sampler.dispose();
            return Ok((TrackEncoding::Skeletal, tracks?));
        }
    }

    Ok((TrackEncoding::Curve, encode_curve_tracks(clip, timing)))
}

/// Write `clip` into the session's `Animations` folder.
///
/// A clip already handled this session, or whose file already exists on
/// disk, is skipped.
pub fn export_animation<H: AnimationHost + ?Sized>(
    session: &mut ExportSession,
    host: &mut H,
    graph: &SceneGraph,
    clip: &AnimationClip,
) -> Result<WriteOutcome> {
    if !(clip.frame_rate.is_finite() && clip.frame_rate > 0.0) {
        return Err(ExportError::InvalidFrameRate {
            clip: clip.name.clone(),
            frame_rate: clip.frame_rate,
        });
    }
    let timing =
        FrameTiming::new(clip.length, clip.frame_rate).map_err(|_| ExportError::InvalidLength {
            clip: clip.name.clone(),
            length: clip.length,
        })?;

    if session.exported_animation(&clip.id).is_some() {
        tracing::debug!("Clip '{}' already exported this session", clip.name);
        return Ok(WriteOutcome::AlreadyExists);
    }

    let path = session.animation_path(&clip.name);
    if path.exists() {
        tracing::debug!("Skipping clip '{}': {:?} already exists", clip.name, path);
        session.record_animation(clip.id.clone(), path);
        return Ok(WriteOutcome::AlreadyExists);
    }

    let length = clip.length.max(0.0);
    let (encoding, tracks) = encode_tracks(session, host, graph, clip, &timing)?;
    let file = AnimationFile::new(clip.name.clone(), length, tracks);

    let outcome = write_new_file(&path, |w| file.write(w))?;
    if outcome == WriteOutcome::Written {
        tracing::info!(
            "Exported animation '{}' ({:?}): {} tracks, {} frames at {} fps ({:.2}s) -> {:?}",
            clip.name,
            encoding,
            file.tracks.len(),
            timing.frame_count,
            clip.frame_rate,
            length,
            path
        );
    }
    session.record_animation(clip.id.clone(), path);
    Ok(outcome)
}
