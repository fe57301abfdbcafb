//! Engine animation clip format (.ani)
//!
//! A clip is a list of named tracks. Each track carries a channel mask and a
//! dense list of keyframes; only the channels named by the mask are stored.
//!
//! # Layout
//! ```text
//! [u8; 4]  magic "UANI"
//! cstr     clip name
//! f32      clip length (seconds)
//! u32      track_count
//!          per track:
//!            cstr name
//!            u8   channel mask (1 = position, 2 = rotation, 4 = scale)
//!            u32  keyframe_count
//!            per keyframe:
//!              f32  time
//!              vec3 position        (mask & 1)
//!              quat rotation w,x,y,z (mask & 2)
//!              vec3 scale           (mask & 4)
//! ```

mod header;
mod types;


use std::io::{self, Write};

use super::{BinaryWrite, ByteReader, FormatError};

// Re-export public API
pub use header::AnimationHeader;
pub use types::{
    ANIMATION_MAGIC, AnimationTrack, ChannelMask, FrameTiming, MAX_FRAME_COUNT, TrackKeyframe,
};

/// A complete animation file in memory
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFile {
    pub header: AnimationHeader,
    pub tracks: Vec<AnimationTrack>,
}

impl AnimationFile {
    pub fn new(name: impl Into<String>, length: f32, tracks: Vec<AnimationTrack>) -> Self {
        Self {
            header: AnimationHeader::new(name, length),
            tracks,
        }
    }

    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        self.header.write(w)?;
        w.write_u32(self.tracks.len() as u32)?;
        for track in &self.tracks {
            write_track(w, track)?;
        }
        Ok(())
    }

    /// Serialize into a new byte vector.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.header.size());
        self.write(&mut bytes)?;
        Ok(bytes)
    }

    /// Parse a complete animation file.
    ///
    /// Channels absent from a track's mask come back as identity values.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut r = ByteReader::new(bytes);
        let header = AnimationHeader::read(&mut r)?;

        let track_count = r.read_u32("track count")?;
        let tracks = (0..track_count)
            .map(|_| read_track(&mut r))
            .collect::<Result<Vec<_>, _>>()?;
        r.finish()?;

        Ok(Self { header, tracks })
    }
}

fn write_track<W: Write + ?Sized>(w: &mut W, track: &AnimationTrack) -> io::Result<()> {
    w.write_cstr(&track.name)?;
    w.write_u8(track.mask.bits())?;
    w.write_u32(track.keyframes.len() as u32)?;

    for key in &track.keyframes {
        w.write_f32(key.time)?;
        if track.mask.contains(ChannelMask::POSITION) {
            w.write_vec3(key.translation)?;
        }
        if track.mask.contains(ChannelMask::ROTATION) {
            w.write_quat(key.rotation)?;
        }
        if track.mask.contains(ChannelMask::SCALE) {
            w.write_vec3(key.scale)?;
        }
    }
    Ok(())
}

fn read_track(r: &mut ByteReader<'_>) -> Result<AnimationTrack, FormatError> {
    let name = r.read_cstr("track name")?;
    let raw_mask = r.read_u8("channel mask")?;
    if raw_mask & !ChannelMask::ALL.bits() != 0 {
        return Err(FormatError::InvalidValue {
            what: "channel mask",
            value: raw_mask as u32,
        });
    }
    let mask = ChannelMask::from_bits(raw_mask);

    let keyframe_count = r.read_u32("keyframe count")?;
    let mut keyframes = Vec::with_capacity((keyframe_count as usize).min(r.remaining() / 4));
    for _ in 0..keyframe_count {
        let mut key = TrackKeyframe::identity(r.read_f32("keyframe time")?);
        if mask.contains(ChannelMask::POSITION) {
            key.translation = r.read_vec3("keyframe position")?;
        }
        if mask.contains(ChannelMask::ROTATION) {
            key.rotation = r.read_quat("keyframe rotation")?;
        }
        if mask.contains(ChannelMask::SCALE) {
            key.scale = r.read_vec3("keyframe scale")?;
        }
        keyframes.push(key);
    }

    Ok(AnimationTrack {
        name,
        mask,
        keyframes,
    })
}
