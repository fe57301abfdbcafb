//! Curve-based track encoding
//!
//! Evaluates the clip's curves directly, one track per bound path. Used for
//! legacy clips and whenever the clip cannot be tied to a single skeleton.

use asset_common::{AnimationTrack, ChannelMask, FrameTiming, TrackKeyframe};
use glam::{Quat, Vec3};

use super::clip::{AnimationClip, Curve, TransformProperty};

/// Component curves bound to one path
struct PathCurves<'a> {
    path: &'a str,
    mask: ChannelMask,
    curves: Vec<(TransformProperty, &'a Curve)>,
}

impl PathCurves<'_> {
    fn component(&self, property: TransformProperty, time: f32, default: f32) -> f32 {
        self.curves
            .iter()
            .find(|(p, _)| *p == property)
            .and_then(|(_, curve)| curve.evaluate(time))
            .unwrap_or(default)
    }

    fn sample(&self, time: f32) -> TrackKeyframe {
        use TransformProperty::*;

        let translation = Vec3::new(
            self.component(PositionX, time, 0.0),
            self.component(PositionY, time, 0.0),
            self.component(PositionZ, time, 0.0),
        );
        let rotation = Quat::from_xyzw(
            self.component(RotationX, time, 0.0),
            self.component(RotationY, time, 0.0),
            self.component(RotationZ, time, 0.0),
            self.component(RotationW, time, 1.0),
        );
        let scale = Vec3::new(
            self.component(ScaleX, time, 1.0),
            self.component(ScaleY, time, 1.0),
            self.component(ScaleZ, time, 1.0),
        );

        TrackKeyframe {
            time,
            translation,
            rotation: normalize_or_identity(rotation),
            scale,
        }
    }
}

/// Per-component evaluation does not keep the quaternion on the unit sphere
pub(crate) fn normalize_or_identity(q: Quat) -> Quat {
    let length_squared = q.length_squared();
    if length_squared > 0.0 && length_squared.is_finite() {
        q / length_squared.sqrt()
    } else {
        Quat::IDENTITY
    }
}

/// Last path segment, the name the engine looks the node up by
pub(crate) fn track_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Group the clip's recognized bindings by path.
///
/// Groups come out ordered by path length, shorter (closer to the root)
/// first; equal lengths keep first-appearance order.
fn group_by_path(clip: &AnimationClip) -> Vec<PathCurves<'_>> {
    let mut groups: Vec<PathCurves<'_>> = Vec::new();
    for binding in &clip.bindings {
        let Some(property) = binding.transform_property() else {
            continue;
        };
        let index = match groups.iter().position(|g| g.path == binding.path) {
            Some(index) => index,
            None => {
                groups.push(PathCurves {
                    path: &binding.path,
                    mask: ChannelMask::NONE,
                    curves: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        group.mask.insert(property.channel());
        group.curves.push((property, &binding.curve));
    }

    groups.sort_by_key(|g| g.path.chars().count());
    groups
}

/// Encode `clip` as one track per bound path, sampled on `timing`.
pub fn encode_curve_tracks(clip: &AnimationClip, timing: &FrameTiming) -> Vec<AnimationTrack> {
    group_by_path(clip)
        .into_iter()
        .map(|group| AnimationTrack {
            name: track_name(group.path).to_string(),
            mask: group.mask,
            keyframes: timing.times().map(|t| group.sample(t)).collect(),
        })
        .collect()
}
