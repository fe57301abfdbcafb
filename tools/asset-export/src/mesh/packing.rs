//! Vertex stream packing
//!
//! Each present attribute becomes one [`VertexStream`]: a vertex element
//! descriptor plus the source array it reads from. The interleaved buffer is
//! written vertex-major, every stream for vertex 0, then vertex 1, and so on.

use std::borrow::Cow;

use asset_common::{VertexElement, VertexElementType, VertexSemantic};
use glam::{Vec2, Vec3, Vec4};

use super::types::{MAX_UV_CHANNELS, MeshData};
use crate::session::ExportOptions;

/// Source array of one stream
#[derive(Debug, Clone)]
pub enum StreamData<'a> {
    /// Texture coordinates, written as `(u, 1 - v)`
    Vector2(Cow<'a, [Vec2]>),
    Vector3(Cow<'a, [Vec3]>),
    Vector4(Cow<'a, [Vec4]>),
    /// Four floats truncated to bytes
    UByte4(Cow<'a, [[f32; 4]]>),
}

impl StreamData<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Vector2(d) => d.len(),
            Self::Vector3(d) => d.len(),
            Self::Vector4(d) => d.len(),
            Self::UByte4(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element_type(&self) -> VertexElementType {
        match self {
            Self::Vector2(_) => VertexElementType::Vector2,
            Self::Vector3(_) => VertexElementType::Vector3,
            Self::Vector4(_) => VertexElementType::Vector4,
            Self::UByte4(_) => VertexElementType::UByte4,
        }
    }
}

/// One attribute channel of the vertex buffer
#[derive(Debug, Clone)]
pub struct VertexStream<'a> {
    pub semantic: VertexSemantic,
    pub index: u8,
    pub data: StreamData<'a>,
}

impl<'a> VertexStream<'a> {
    pub fn new(semantic: VertexSemantic, index: u8, data: StreamData<'a>) -> Self {
        Self {
            semantic,
            index,
            data,
        }
    }

    pub fn element(&self) -> VertexElement {
        VertexElement::new(self.data.element_type(), self.semantic, self.index)
    }

    /// Append vertex `i` of this stream to `out`.
    pub fn write_vertex(&self, out: &mut Vec<u8>, i: usize) {
        match &self.data {
            StreamData::Vector2(d) => {
                let uv = d[i];
                push_floats(out, &[uv.x, 1.0 - uv.y]);
            }
            StreamData::Vector3(d) => push_floats(out, &d[i].to_array()),
            StreamData::Vector4(d) => push_floats(out, &d[i].to_array()),
            StreamData::UByte4(d) => out.extend(d[i].map(truncate_to_byte)),
        }
    }
}

/// Float to byte by truncation, saturating outside `0..=255`
#[inline]
pub fn truncate_to_byte(value: f32) -> u8 {
    value as u8
}

fn push_floats(out: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

/// Collect the streams of `mesh` in declaration order.
///
/// Position, normal, UV 0..3, tangent, blend weights, blend indices. An
/// optional attribute whose length differs from the vertex count is dropped
/// with a warning.
pub fn build_streams<'a>(mesh: &'a MeshData, options: &ExportOptions) -> Vec<VertexStream<'a>> {
    let vertex_count = mesh.vertex_count();
    let mut streams = vec![VertexStream::new(
        VertexSemantic::Position,
        0,
        StreamData::Vector3(Cow::Borrowed(&mesh.positions)),
    )];

    let complete = |what: &str, len: usize| {
        if len == vertex_count {
            true
        } else {
            tracing::warn!(
                "Mesh '{}': dropping {} ({} entries for {} vertices)",
                mesh.name,
                what,
                len,
                vertex_count
            );
            false
        }
    };

    if let Some(normals) = &mesh.normals {
        if complete("normals", normals.len()) {
            streams.push(VertexStream::new(
                VertexSemantic::Normal,
                0,
                StreamData::Vector3(Cow::Borrowed(normals)),
            ));
        }
    }

    for channel in 0..MAX_UV_CHANNELS {
        if mesh.uvs[channel].is_none() {
            continue;
        }
        // Legacy output built every extra channel from the second one
        let source = if options.uv_channel_aliasing && channel > 1 {
            1
        } else {
            channel
        };
        let Some(uvs) = &mesh.uvs[source] else {
            continue;
        };
        if complete(&format!("uv channel {}", channel), uvs.len()) {
            streams.push(VertexStream::new(
                VertexSemantic::TexCoord,
                channel as u8,
                StreamData::Vector2(Cow::Borrowed(uvs)),
            ));
        }
    }

    if let Some(tangents) = &mesh.tangents {
        if complete("tangents", tangents.len()) {
            streams.push(VertexStream::new(
                VertexSemantic::Tangent,
                0,
                StreamData::Vector4(Cow::Borrowed(tangents)),
            ));
        }
    }

    if let Some(bone_weights) = &mesh.bone_weights {
        if complete("bone weights", bone_weights.len()) {
            let weights = bone_weights
                .iter()
                .map(|bw| Vec4::from_array(bw.weights))
                .collect::<Vec<_>>();
            let indices = bone_weights
                .iter()
                .map(|bw| bw.indices.map(|i| i as f32))
                .collect::<Vec<_>>();
            streams.push(VertexStream::new(
                VertexSemantic::BlendWeights,
                0,
                StreamData::Vector4(Cow::Owned(weights)),
            ));
            streams.push(VertexStream::new(
                VertexSemantic::BlendIndices,
                0,
                StreamData::UByte4(Cow::Owned(indices)),
            ));
        }
    }

    streams
}

/// Interleave `streams` into one vertex-major buffer.
pub fn interleave(streams: &[VertexStream<'_>], vertex_count: usize) -> Vec<u8> {
    let stride: usize = streams.iter().map(|s| s.element().size()).sum();
    let mut data = Vec::with_capacity(vertex_count * stride);
    for i in 0..vertex_count {
        for stream in streams {
            stream.write_vertex(&mut data, i);
        }
    }
    data
}
