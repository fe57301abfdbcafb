//! Animation data types

use glam::{Quat, Vec3};

use crate::formats::FormatError;

/// Animation file magic
pub const ANIMATION_MAGIC: [u8; 4] = *b"UANI";

/// Which transform channels a track stores per keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelMask(u8);

impl ChannelMask {
    pub const NONE: Self = Self(0);
    pub const POSITION: Self = Self(1);
    pub const ROTATION: Self = Self(2);
    pub const SCALE: Self = Self(4);
    /// All three channels (skeletal tracks always use this)
    pub const ALL: Self = Self(7);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for ChannelMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One sampled keyframe of a track
///
/// Channels not present in the track's mask are ignored on write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackKeyframe {
    pub time: f32,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl TrackKeyframe {
    /// Identity transform at `time`
    pub const fn identity(time: f32) -> Self {
        Self {
            time,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// One named track of an animation clip
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTrack {
    pub name: String,
    pub mask: ChannelMask,
    pub keyframes: Vec<TrackKeyframe>,
}

/// Upper bound on the frames of one clip (about 6.5 days at 30 fps)
pub const MAX_FRAME_COUNT: u32 = 1 << 24;

/// Fixed-step sampling grid of a clip
///
/// `step = 1 / frame_rate` and `frame_count = 1 + floor(length × frame_rate)`,
/// so both ends of the clip are sampled when the length is a whole number
/// of frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    pub step: f32,
    pub frame_count: u32,
}

impl FrameTiming {
    /// Build the grid for a clip. Negative lengths are treated as zero.
    ///
    /// Fails with [`FormatError::InvalidTiming`] for a non-finite length, a
    /// frame rate that is not positive and finite, or a grid longer than
    /// [`MAX_FRAME_COUNT`] frames.
    pub fn new(length: f32, frame_rate: f32) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidTiming { length, frame_rate };
        if !length.is_finite() || !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(invalid());
        }

        let steps = (length.max(0.0) * frame_rate).floor();
        if steps >= MAX_FRAME_COUNT as f32 {
            return Err(invalid());
        }
        Ok(Self {
            step: 1.0 / frame_rate,
            frame_count: 1 + steps as u32,
        })
    }

    /// Time of frame `index`
    #[inline]
    pub fn time(&self, index: u32) -> f32 {
        index as f32 * self.step
    }

    /// Times of every frame, in order
    pub fn times(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.frame_count).map(|i| self.time(i))
    }
}
