//! Animation export (host clip -> .ani)
//!
//! Two encodings exist. Curve encoding evaluates each bound path's curves
//! directly. Skeletal encoding clones the clip's skeleton into a scratch
//! hierarchy and records full poses sampled through the [`AnimationHost`].

mod clip;
mod curve;
mod host;
mod pose;
mod scratch;
mod skeletal;
mod writer;

// Re-export public API
pub use clip::{AnimationClip, Curve, CurveBinding, Keyframe, TransformProperty};
pub use curve::encode_curve_tracks;
pub use host::CurveAnimationHost;
pub use pose::{AnimationHost, MIN_CLIP_LENGTH, PlaybackGraphId, PoseSampler};
pub use scratch::{ScratchHierarchy, ScratchNode};
pub use skeletal::{RootName, find_skeleton_node, root_bone_name, sample_skeletal_tracks};
pub use writer::{TrackEncoding, encode_tracks, export_animation};
