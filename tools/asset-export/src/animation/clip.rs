//! Host-side animation clips
//!
//! A clip is a bag of float curves, each bound to one transform component of
//! a node addressed by its slash-separated path from the rig root.

use asset_common::ChannelMask;

use crate::session::AssetId;

/// One key of a cubic Hermite curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    /// Slope arriving at this key. Infinite means the previous segment holds.
    pub in_tangent: f32,
    /// Slope leaving this key. Infinite means the next segment holds.
    pub out_tangent: f32,
}

impl Keyframe {
    pub const fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }

    /// Key with flat tangents
    pub const fn flat(time: f32, value: f32) -> Self {
        Self::new(time, value, 0.0, 0.0)
    }
}

/// Scalar curve with keys sorted by time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    pub keys: Vec<Keyframe>,
}

impl Curve {
    pub fn new(keys: Vec<Keyframe>) -> Self {
        Self { keys }
    }

    /// Straight segments between `(time, value)` points
    pub fn linear(points: &[(f32, f32)]) -> Self {
        let slope = |a: (f32, f32), b: (f32, f32)| {
            let dt = b.0 - a.0;
            if dt > 0.0 { (b.1 - a.1) / dt } else { 0.0 }
        };
        let keys = points
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let in_tangent = if i > 0 { slope(points[i - 1], p) } else { 0.0 };
                let out_tangent = points.get(i + 1).map_or(0.0, |&next| slope(p, next));
                Keyframe::new(p.0, p.1, in_tangent, out_tangent)
            })
            .collect();
        Self { keys }
    }

    /// Value held until the next point
    pub fn stepped(points: &[(f32, f32)]) -> Self {
        Self {
            keys: points
                .iter()
                .map(|&(t, v)| Keyframe::new(t, v, f32::INFINITY, f32::INFINITY))
                .collect(),
        }
    }

    pub fn constant(value: f32) -> Self {
        Self::new(vec![Keyframe::flat(0.0, value)])
    }

    /// Value at `time`, clamped to the first/last key outside the key range.
    ///
    /// `None` for a curve without keys.
    pub fn evaluate(&self, time: f32) -> Option<f32> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if time <= first.time {
            return Some(first.value);
        }
        if time >= last.time {
            return Some(last.value);
        }

        // First key strictly after `time`; always in 1..len here
        let next = self.keys.partition_point(|k| k.time <= time);
        let k0 = &self.keys[next - 1];
        let k1 = &self.keys[next];
        Some(hermite(k0, k1, time))
    }
}

fn hermite(k0: &Keyframe, k1: &Keyframe, time: f32) -> f32 {
    if k0.out_tangent.is_infinite() || k1.in_tangent.is_infinite() {
        return k0.value;
    }
    let dt = k1.time - k0.time;
    if dt <= 0.0 {
        return k1.value;
    }

    let s = (time - k0.time) / dt;
    let s2 = s * s;
    let s3 = s2 * s;
    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    h00 * k0.value + h10 * dt * k0.out_tangent + h01 * k1.value + h11 * dt * k1.in_tangent
}

/// The transform components a curve can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformProperty {
    PositionX,
    PositionY,
    PositionZ,
    RotationW,
    RotationX,
    RotationY,
    RotationZ,
    ScaleX,
    ScaleY,
    ScaleZ,
}

impl TransformProperty {
    pub const ALL: [Self; 10] = [
        Self::PositionX,
        Self::PositionY,
        Self::PositionZ,
        Self::RotationW,
        Self::RotationX,
        Self::RotationY,
        Self::RotationZ,
        Self::ScaleX,
        Self::ScaleY,
        Self::ScaleZ,
    ];

    /// Property name as stored in clip bindings
    pub const fn name(self) -> &'static str {
        match self {
            Self::PositionX => "m_LocalPosition.x",
            Self::PositionY => "m_LocalPosition.y",
            Self::PositionZ => "m_LocalPosition.z",
            Self::RotationW => "m_LocalRotation.w",
            Self::RotationX => "m_LocalRotation.x",
            Self::RotationY => "m_LocalRotation.y",
            Self::RotationZ => "m_LocalRotation.z",
            Self::ScaleX => "m_LocalScale.x",
            Self::ScaleY => "m_LocalScale.y",
            Self::ScaleZ => "m_LocalScale.z",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Channel this component belongs to
    pub const fn channel(self) -> ChannelMask {
        match self {
            Self::PositionX | Self::PositionY | Self::PositionZ => ChannelMask::POSITION,
            Self::RotationW | Self::RotationX | Self::RotationY | Self::RotationZ => {
                ChannelMask::ROTATION
            }
            Self::ScaleX | Self::ScaleY | Self::ScaleZ => ChannelMask::SCALE,
        }
    }
}

/// One curve driving one property of the node at `path`
#[derive(Debug, Clone, PartialEq)]
pub struct CurveBinding {
    /// Slash-separated node names, starting at the rig root
    pub path: String,
    /// Property name, e.g. `m_LocalPosition.x`. Unknown names are ignored.
    pub property: String,
    pub curve: Curve,
}

impl CurveBinding {
    pub fn new(path: impl Into<String>, property: TransformProperty, curve: Curve) -> Self {
        Self {
            path: path.into(),
            property: property.name().to_string(),
            curve,
        }
    }

    pub fn transform_property(&self) -> Option<TransformProperty> {
        TransformProperty::parse(&self.property)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub id: AssetId,
    pub name: String,
    /// Length in seconds
    pub length: f32,
    pub frame_rate: f32,
    /// Clip authored for the old animation system (direct evaluation only)
    pub legacy: bool,
    pub bindings: Vec<CurveBinding>,
}
