//! Shared helpers: synthetic GLB assembly for decoder tests.
//!
//! Chunks are padded to 4-byte boundaries the way real exporters pad them
//! (spaces for JSON, zeros for BIN); buffer views never reference the pad.

use serde_json::{json, Value};

mod image_test;

/// Assemble a GLB byte stream from a JSON document and a binary payload.
pub(crate) fn build_glb(document: &Value, bin: &[u8]) -> Vec<u8> {
    let json_bytes = serde_json::to_vec(document).unwrap();
    let json_padding = (4 - json_bytes.len() % 4) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;

    let bin_padding = (4 - bin.len() % 4) % 4;
    let bin_chunk_length = bin.len() + bin_padding;

    let total_length = 12 + 8 + json_chunk_length + 8 + bin_chunk_length;
    let mut glb = Vec::with_capacity(total_length);

    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json_bytes);
    glb.extend(std::iter::repeat(b' ').take(json_padding));

    glb.extend_from_slice(&(bin_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(b"BIN\0");
    glb.extend_from_slice(bin);
    glb.extend(std::iter::repeat(0u8).take(bin_padding));

    glb
}

pub(crate) fn push_f32s(bin: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        bin.extend_from_slice(&v.to_le_bytes());
    }
}

pub(crate) fn push_u16s(bin: &mut Vec<u8>, values: &[u16]) {
    for v in values {
        bin.extend_from_slice(&v.to_le_bytes());
    }
}

pub(crate) fn push_u32s(bin: &mut Vec<u8>, values: &[u32]) {
    for v in values {
        bin.extend_from_slice(&v.to_le_bytes());
    }
}

pub(crate) const TRIANGLE_POSITIONS: [[f32; 3]; 3] =
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
pub(crate) const TRIANGLE_NORMALS: [[f32; 3]; 3] =
    [[0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0]];
pub(crate) const TRIANGLE_UVS: [[f32; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

/// A complete single-triangle GLB with POSITION, NORMAL, TEXCOORD_0 and a
/// u16 index buffer. No material.
pub(crate) fn triangle_glb() -> Vec<u8> {
    let mut bin = Vec::new();
    for p in &TRIANGLE_POSITIONS {
        push_f32s(&mut bin, p);
    }
    for n in &TRIANGLE_NORMALS {
        push_f32s(&mut bin, n);
    }
    for uv in &TRIANGLE_UVS {
        push_f32s(&mut bin, uv);
    }
    push_u16s(&mut bin, &[0, 1, 2]);

    let document = json!({
        "asset": {"version": "2.0"},
        "meshes": [{
            "primitives": [{
                "attributes": {"POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2},
                "indices": 3
            }]
        }],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC2"},
            {"bufferView": 3, "componentType": 5123, "count": 3, "type": "SCALAR"}
        ],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 36},
            {"buffer": 0, "byteOffset": 72, "byteLength": 24},
            {"buffer": 0, "byteOffset": 96, "byteLength": 6}
        ],
        "buffers": [{"byteLength": 102}]
    });

    build_glb(&document, &bin)
}
