//! Engine mesh binary format (.mdl)
//!
//! One interleaved vertex buffer, one index buffer shared by all submeshes,
//! a bone table and the overall bounding box. All values little-endian.
//!
//! # Layout
//! ```text
//! u32  magic 0x32444D55 ("UMD2")
//! i32  version (1)
//! u32  vertex_count
//! u32  element_count
//! u32  element descriptor × element_count   (type | semantic << 8 | index << 16)
//! u32  morph_range_start (0)
//! u32  morph_range_count (0)
//! ...  vertex data, vertex-major (vertex_count × stride)
//! u32  index_format (2 = u16, 4 = u32)
//! u32  index_count
//! ...  index data (index_count × index_format bytes)
//! u32  submesh_count
//!      per submesh:
//!        u32 bone_mapping_count (0)
//!        u32 lod_count (1)
//!        per lod: f32 distance, u32 primitive_type, u32 index_start,
//!                 u32 vertex_start, u32 index_count
//! u32  morph_target_count (0)
//! u32  bone_count
//!      per bone:
//!        cstr name, u32 parent_index, vec3 position, quat rotation (w,x,y,z),
//!        vec3 scale, 12 × f32 bind matrix (rows 0..2), u8 bounds tag (3),
//!        f32 radius, vec3 box min, vec3 box max
//! vec3 bounding box min
//! vec3 bounding box max
//! ```

use glam::{Mat4, Quat, Vec3};
use std::io::{self, Write};

use super::{BinaryWrite, ByteReader, FormatError};

/// Mesh file magic ("UMD2" as little-endian u32)
pub const MESH_MAGIC: u32 = 0x3244_4D55;

/// The only mesh layout version written by this crate
pub const MESH_VERSION: i32 = 1;

/// Bone bounds tag: bit 0 = sphere radius present, bit 1 = box present
pub const BONE_BOUNDS_TAG: u8 = 3;

const BOUNDS_HAS_RADIUS: u8 = 1;
const BOUNDS_HAS_BOX: u8 = 2;

// ============================================================================
// Vertex elements
// ============================================================================

/// Scalar layout of one vertex element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VertexElementType {
    Int = 0,
    Float = 1,
    Vector2 = 2,
    Vector3 = 3,
    Vector4 = 4,
    UByte4 = 5,
    UByte4Norm = 6,
}

impl VertexElementType {
    /// Size of one element in bytes
    pub const fn size(self) -> usize {
        match self {
            Self::Int | Self::Float | Self::UByte4 | Self::UByte4Norm => 4,
            Self::Vector2 => 8,
            Self::Vector3 => 12,
            Self::Vector4 => 16,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Int,
            1 => Self::Float,
            2 => Self::Vector2,
            3 => Self::Vector3,
            4 => Self::Vector4,
            5 => Self::UByte4,
            6 => Self::UByte4Norm,
            _ => return None,
        })
    }
}

/// Meaning of one vertex element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VertexSemantic {
    Position = 0,
    Normal = 1,
    Binormal = 2,
    Tangent = 3,
    TexCoord = 4,
    Color = 5,
    BlendWeights = 6,
    BlendIndices = 7,
}

impl VertexSemantic {
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Position,
            1 => Self::Normal,
            2 => Self::Binormal,
            3 => Self::Tangent,
            4 => Self::TexCoord,
            5 => Self::Color,
            6 => Self::BlendWeights,
            7 => Self::BlendIndices,
            _ => return None,
        })
    }
}

/// One entry of the vertex declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexElement {
    pub element_type: VertexElementType,
    pub semantic: VertexSemantic,
    /// Semantic index (e.g. 1 for the second UV channel)
    pub index: u8,
}

impl VertexElement {
    pub const fn new(element_type: VertexElementType, semantic: VertexSemantic, index: u8) -> Self {
        Self {
            element_type,
            semantic,
            index,
        }
    }

    /// Packed 32-bit descriptor: type in the low byte, then semantic, then index.
    pub const fn descriptor(&self) -> u32 {
        (self.element_type as u32) | ((self.semantic as u32) << 8) | ((self.index as u32) << 16)
    }

    pub fn from_descriptor(descriptor: u32) -> Result<Self, FormatError> {
        let invalid = FormatError::InvalidValue {
            what: "vertex element descriptor",
            value: descriptor,
        };
        let element_type = VertexElementType::from_u8(descriptor as u8).ok_or(invalid.clone())?;
        let semantic = VertexSemantic::from_u8((descriptor >> 8) as u8).ok_or(invalid)?;
        Ok(Self::new(element_type, semantic, (descriptor >> 16) as u8))
    }

    pub const fn size(&self) -> usize {
        self.element_type.size()
    }
}

/// Bytes per vertex for a declaration
pub fn vertex_stride(elements: &[VertexElement]) -> usize {
    elements.iter().map(VertexElement::size).sum()
}

// ============================================================================
// Indices and primitives
// ============================================================================

/// Index buffer width, stored as the index size in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum IndexFormat {
    U16 = 2,
    U32 = 4,
}

impl IndexFormat {
    /// 16-bit indices below 65536 vertices, 32-bit otherwise
    pub fn for_vertex_count(vertex_count: u32) -> Self {
        if vertex_count < 65536 {
            Self::U16
        } else {
            Self::U32
        }
    }

    pub const fn size(self) -> usize {
        self as usize
    }

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            2 => Some(Self::U16),
            4 => Some(Self::U32),
            _ => None,
        }
    }
}

/// Primitive topology tag of a submesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum PrimitiveType {
    #[default]
    TriangleList = 0,
    LineList = 1,
    PointList = 2,
    TriangleStrip = 3,
    LineStrip = 4,
    TriangleFan = 5,
}

impl PrimitiveType {
    pub fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::TriangleList,
            1 => Self::LineList,
            2 => Self::PointList,
            3 => Self::TriangleStrip,
            4 => Self::LineStrip,
            5 => Self::TriangleFan,
            _ => return None,
        })
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Component-wise min/max over `points`, `None` when empty.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |b, p| {
            Self::new(b.min.min(p), b.max.max(p))
        }))
    }

    fn write<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_vec3(self.min)?;
        w.write_vec3(self.max)
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        Ok(Self::new(r.read_vec3("bounds min")?, r.read_vec3("bounds max")?))
    }
}

/// Per-bone bounding sphere and box, in the bone's bind space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneBounds {
    pub radius: f32,
    pub bbox: BoundingBox,
}

// ============================================================================
// Records
// ============================================================================

/// One row of the bone table
#[derive(Debug, Clone, PartialEq)]
pub struct BoneRecord {
    pub name: String,
    pub parent_index: u32,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Inverse bind matrix; only rows 0..2 are stored
    pub bind_matrix: Mat4,
    pub bounds: BoneBounds,
}

impl BoneRecord {
    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_cstr(&self.name)?;
        w.write_u32(self.parent_index)?;
        w.write_vec3(self.translation)?;
        w.write_quat(self.rotation)?;
        w.write_vec3(self.scale)?;
        w.write_mat3x4(&self.bind_matrix)?;
        w.write_u8(BONE_BOUNDS_TAG)?;
        w.write_f32(self.bounds.radius)?;
        self.bounds.bbox.write(w)
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let name = r.read_cstr("bone name")?;
        let parent_index = r.read_u32("bone parent")?;
        let translation = r.read_vec3("bone position")?;
        let rotation = r.read_quat("bone rotation")?;
        let scale = r.read_vec3("bone scale")?;
        let bind_matrix = r.read_mat3x4("bone bind matrix")?;

        let tag = r.read_u8("bone bounds tag")?;
        let radius = if tag & BOUNDS_HAS_RADIUS != 0 {
            r.read_f32("bone radius")?
        } else {
            0.0
        };
        let bbox = if tag & BOUNDS_HAS_BOX != 0 {
            BoundingBox::read(r)?
        } else {
            BoundingBox::ZERO
        };

        Ok(Self {
            name,
            parent_index,
            translation,
            rotation,
            scale,
            bind_matrix,
            bounds: BoneBounds { radius, bbox },
        })
    }
}

/// One submesh: a range of the shared index buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmeshRecord {
    pub primitive_type: PrimitiveType,
    pub index_start: u32,
    pub vertex_start: u32,
    pub index_count: u32,
}

impl SubmeshRecord {
    fn write<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32(0)?; // bone mapping entries
        w.write_u32(1)?; // lod count
        w.write_f32(0.0)?; // lod distance
        w.write_u32(self.primitive_type as u32)?;
        w.write_u32(self.index_start)?;
        w.write_u32(self.vertex_start)?;
        w.write_u32(self.index_count)
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let mapping_count = r.read_u32("bone mapping count")?;
        r.read_bytes(mapping_count as usize * 4, "bone mapping")?;

        let lod_count = r.read_u32("lod count")?;
        if lod_count == 0 {
            return Err(FormatError::InvalidValue {
                what: "lod count",
                value: 0,
            });
        }

        let mut first = None;
        for _ in 0..lod_count {
            let _distance = r.read_f32("lod distance")?;
            let raw_type = r.read_u32("primitive type")?;
            let primitive_type =
                PrimitiveType::from_u32(raw_type).ok_or(FormatError::InvalidValue {
                    what: "primitive type",
                    value: raw_type,
                })?;
            let record = Self {
                primitive_type,
                index_start: r.read_u32("index start")?,
                vertex_start: r.read_u32("vertex start")?,
                index_count: r.read_u32("index count")?,
            };
            if first.is_none() {
                first = Some(record);
            }
        }
        first.ok_or(FormatError::InvalidValue {
            what: "lod count",
            value: lod_count,
        })
    }
}

// ============================================================================
// Whole file
// ============================================================================

/// A complete mesh file in memory
#[derive(Debug, Clone, PartialEq)]
pub struct MeshFile {
    pub vertex_count: u32,
    pub elements: Vec<VertexElement>,
    /// Interleaved vertex bytes (`vertex_count × vertex_stride(elements)`)
    pub vertex_data: Vec<u8>,
    /// Every submesh's indices, concatenated
    pub indices: Vec<u32>,
    pub submeshes: Vec<SubmeshRecord>,
    pub bones: Vec<BoneRecord>,
    pub bounds: BoundingBox,
}

impl MeshFile {
    /// Index width implied by the vertex count
    pub fn index_format(&self) -> IndexFormat {
        IndexFormat::for_vertex_count(self.vertex_count)
    }

    /// Serialize the whole file.
    ///
    /// Fails with `InvalidData` if an index does not fit the 16-bit format.
    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32(MESH_MAGIC)?;
        w.write_i32(MESH_VERSION)?;

        // Vertex buffer
        w.write_u32(self.vertex_count)?;
        w.write_u32(self.elements.len() as u32)?;
        for element in &self.elements {
            w.write_u32(element.descriptor())?;
        }
        w.write_u32(0)?; // morph range start
        w.write_u32(0)?; // morph range count
        w.write_all(&self.vertex_data)?;

        // Index buffer
        let index_format = self.index_format();
        w.write_u32(index_format as u32)?;
        w.write_u32(self.indices.len() as u32)?;
        match index_format {
            IndexFormat::U16 => {
                for &index in &self.indices {
                    let index = u16::try_from(index).map_err(|_| {
                        io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("index {} does not fit a 16-bit index buffer", index),
                        )
                    })?;
                    w.write_u16(index)?;
                }
            }
            IndexFormat::U32 => {
                for &index in &self.indices {
                    w.write_u32(index)?;
                }
            }
        }

        // Submeshes
        w.write_u32(self.submeshes.len() as u32)?;
        for submesh in &self.submeshes {
            submesh.write(w)?;
        }

        w.write_u32(0)?; // morph targets

        // Bones
        w.write_u32(self.bones.len() as u32)?;
        for bone in &self.bones {
            bone.write(w)?;
        }

        self.bounds.write(w)
    }

    /// Serialize into a new byte vector.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write(&mut bytes)?;
        Ok(bytes)
    }

    /// Parse a complete mesh file.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut r = ByteReader::new(bytes);

        let magic = r.read_array::<4>("magic")?;
        if magic != MESH_MAGIC.to_le_bytes() {
            return Err(FormatError::BadMagic {
                expected: MESH_MAGIC.to_le_bytes(),
                found: magic,
            });
        }
        let version = r.read_i32("version")?;
        if version != MESH_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        let vertex_count = r.read_u32("vertex count")?;
        let element_count = r.read_u32("element count")?;
        let elements = (0..element_count)
            .map(|_| VertexElement::from_descriptor(r.read_u32("element descriptor")?))
            .collect::<Result<Vec<_>, _>>()?;
        let _morph_start = r.read_u32("morph range start")?;
        let _morph_count = r.read_u32("morph range count")?;
        let vertex_data = r
            .read_bytes(vertex_count as usize * vertex_stride(&elements), "vertex data")?
            .to_vec();

        let raw_format = r.read_u32("index format")?;
        let index_format = IndexFormat::from_u32(raw_format).ok_or(FormatError::InvalidValue {
            what: "index format",
            value: raw_format,
        })?;
        let index_count = r.read_u32("index count")?;
        let indices = (0..index_count)
            .map(|_| match index_format {
                IndexFormat::U16 => r.read_u16("index").map(u32::from),
                IndexFormat::U32 => r.read_u32("index"),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let submesh_count = r.read_u32("submesh count")?;
        let submeshes = (0..submesh_count)
            .map(|_| SubmeshRecord::read(&mut r))
            .collect::<Result<Vec<_>, _>>()?;

        let morph_count = r.read_u32("morph target count")?;
        if morph_count != 0 {
            return Err(FormatError::InvalidValue {
                what: "morph target count",
                value: morph_count,
            });
        }

        let bone_count = r.read_u32("bone count")?;
        let bones = (0..bone_count)
            .map(|_| BoneRecord::read(&mut r))
            .collect::<Result<Vec<_>, _>>()?;

        let bounds = BoundingBox::read(&mut r)?;
        r.finish()?;

        Ok(Self {
            vertex_count,
            elements,
            vertex_data,
            indices,
            submeshes,
            bones,
            bounds,
        })
    }
}
