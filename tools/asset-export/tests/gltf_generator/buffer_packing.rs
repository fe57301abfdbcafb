//! Binary buffer packing for generated glTF files.

use serde_json::{Value, json};

const COMPONENT_U16: u32 = 5123;
const COMPONENT_F32: u32 = 5126;

/// One binary buffer plus the views and accessors describing it
#[derive(Default)]
pub(crate) struct BufferPacker {
    pub data: Vec<u8>,
    pub views: Vec<Value>,
    pub accessors: Vec<Value>,
}

impl BufferPacker {
    /// Append a float accessor of `type_` ("SCALAR", "VEC3", "MAT4", ...).
    ///
    /// Min and max are always written; the importer rejects POSITION
    /// accessors without them.
    pub fn floats(&mut self, values: &[f32], type_: &str) -> usize {
        let components = component_count(type_);
        assert_eq!(values.len() % components, 0, "ragged {} data", type_);

        let mut min = vec![f32::INFINITY; components];
        let mut max = vec![f32::NEG_INFINITY; components];
        for chunk in values.chunks_exact(components) {
            for (i, &v) in chunk.iter().enumerate() {
                min[i] = min[i].min(v);
                max[i] = max[i].max(v);
            }
        }

        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let view = self.push_view(&bytes);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": COMPONENT_F32,
            "count": values.len() / components,
            "type": type_,
            "min": min,
            "max": max,
        }))
    }

    /// Append an unsigned short accessor (indices or joints).
    pub fn u16s(&mut self, values: &[u16], type_: &str) -> usize {
        let components = component_count(type_);
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let view = self.push_view(&bytes);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": COMPONENT_U16,
            "count": values.len() / components,
            "type": type_,
        }))
    }

    fn push_view(&mut self, bytes: &[u8]) -> usize {
        // Accessor offsets must be aligned to the component size
        while !self.data.len().is_multiple_of(4) {
            self.data.push(0);
        }
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len(),
        }));
        self.views.len() - 1
    }

    fn push_accessor(&mut self, accessor: Value) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }
}

fn component_count(type_: &str) -> usize {
    match type_ {
        "SCALAR" => 1,
        "VEC2" => 2,
        "VEC3" => 3,
        "VEC4" => 4,
        "MAT4" => 16,
        other => panic!("unsupported accessor type {}", other),
    }
}
