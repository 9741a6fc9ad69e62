//! Base-color image resolution tests.

use base64::engine::general_purpose;
use base64::Engine as _;
use serde_json::json;

use super::*;
use crate::glb::{load_glb, resolve_base_color_image, GlbError, GlbFile, ImageBytes};

/// A one-vertex primitive wired to `materials[0]`, with positions at
/// bufferView 0 and room for image data in later views.
fn document_with_material(material: Value, extra: Value) -> Value {
    let mut document = json!({
        "meshes": [{"primitives": [{
            "attributes": {"POSITION": 0},
            "material": 0
        }]}],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 1, "type": "VEC3"}
        ],
        "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 12}],
        "materials": [material]
    });
    if let (Some(doc), Some(extra)) = (document.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            doc.insert(key.clone(), value.clone());
        }
    }
    document
}

fn first_primitive(file: &GlbFile) -> &Value {
    &file.json["meshes"][0]["primitives"][0]
}

#[test]
fn test_no_material_is_none() {
    let file = GlbFile::parse(&triangle_glb()).unwrap();
    let resolved = resolve_base_color_image(&file, first_primitive(&file)).unwrap();
    assert!(resolved.is_none());
}

#[test]
fn test_material_without_base_color_texture_is_none() {
    let document = document_with_material(
        json!({"pbrMetallicRoughness": {"baseColorFactor": [1.0, 0.0, 0.0, 1.0]}}),
        json!({}),
    );
    let file = GlbFile::parse(&build_glb(&document, &[0u8; 12])).unwrap();
    let resolved = resolve_base_color_image(&file, first_primitive(&file)).unwrap();
    assert!(resolved.is_none());
}

#[test]
fn test_buffer_embedded_image_is_byte_exact() {
    let image_bytes: Vec<u8> = (0u8..64).collect();
    let mut bin = vec![0u8; 12]; // positions
    bin.extend_from_slice(&image_bytes);

    let document = document_with_material(
        json!({"pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}}),
        json!({
            "textures": [{"source": 0}],
            "images": [{"bufferView": 1, "mimeType": "image/png"}],
            "bufferViews": [
                {"buffer": 0, "byteOffset": 0, "byteLength": 12},
                {"buffer": 0, "byteOffset": 12, "byteLength": 64}
            ]
        }),
    );

    let file = GlbFile::parse(&build_glb(&document, &bin)).unwrap();
    let resolved = resolve_base_color_image(&file, first_primitive(&file))
        .unwrap()
        .unwrap();
    assert_eq!(resolved, ImageBytes::Embedded(image_bytes.clone()));
    assert_eq!(resolved, ImageBytes::Embedded(file.bin[12..76].to_vec()));
}

#[test]
fn test_data_uri_image() {
    let payload = b"not really a png";
    let uri = format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(payload)
    );
    let document = document_with_material(
        json!({"pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}}),
        json!({
            "textures": [{"source": 0}],
            "images": [{"uri": uri}]
        }),
    );

    let file = GlbFile::parse(&build_glb(&document, &[0u8; 12])).unwrap();
    let resolved = resolve_base_color_image(&file, first_primitive(&file))
        .unwrap()
        .unwrap();
    assert_eq!(resolved, ImageBytes::Embedded(payload.to_vec()));
}

#[test]
fn test_external_uri_is_returned_as_path() {
    let document = document_with_material(
        json!({"pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}}),
        json!({
            "textures": [{"source": 0}],
            "images": [{"uri": "textures/monkey.png"}]
        }),
    );

    let file = GlbFile::parse(&build_glb(&document, &[0u8; 12])).unwrap();
    let resolved = resolve_base_color_image(&file, first_primitive(&file))
        .unwrap()
        .unwrap();
    assert_eq!(
        resolved,
        ImageBytes::External("textures/monkey.png".into())
    );
}

#[test]
fn test_dangling_material_index_fails() {
    // Primitive references materials[0], but the array is empty.
    let mut document = document_with_material(json!({}), json!({}));
    document["materials"] = json!([]);

    let file = GlbFile::parse(&build_glb(&document, &[0u8; 12])).unwrap();
    assert!(matches!(
        resolve_base_color_image(&file, first_primitive(&file)),
        Err(GlbError::Image(_))
    ));
}

#[test]
fn test_image_view_outside_blob_fails() {
    let document = document_with_material(
        json!({"pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}}),
        json!({
            "textures": [{"source": 0}],
            "images": [{"bufferView": 1}],
            "bufferViews": [
                {"buffer": 0, "byteOffset": 0, "byteLength": 12},
                {"buffer": 0, "byteOffset": 12, "byteLength": 1024}
            ]
        }),
    );

    let file = GlbFile::parse(&build_glb(&document, &[0u8; 12])).unwrap();
    assert!(matches!(
        resolve_base_color_image(&file, first_primitive(&file)),
        Err(GlbError::Image(_))
    ));
}

#[test]
fn test_image_view_offset_overflow_fails() {
    // byteOffset + byteLength would wrap around usize; must fail typed.
    let document = document_with_material(
        json!({"pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}}),
        json!({
            "textures": [{"source": 0}],
            "images": [{"bufferView": 1}],
            "bufferViews": [
                {"buffer": 0, "byteOffset": 0, "byteLength": 12},
                {"buffer": 0, "byteOffset": u64::MAX, "byteLength": 16}
            ]
        }),
    );

    let file = GlbFile::parse(&build_glb(&document, &[0u8; 12])).unwrap();
    assert!(matches!(
        resolve_base_color_image(&file, first_primitive(&file)),
        Err(GlbError::Image(_))
    ));
}

#[test]
fn test_load_glb_carries_embedded_image() {
    let image_bytes = vec![0xDE, 0xAD, 0xBE, 0xEF];
    let mut bin = vec![0u8; 12];
    bin.extend_from_slice(&image_bytes);

    let document = document_with_material(
        json!({"pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}}),
        json!({
            "textures": [{"source": 0}],
            "images": [{"bufferView": 1}],
            "bufferViews": [
                {"buffer": 0, "byteOffset": 0, "byteLength": 12},
                {"buffer": 0, "byteOffset": 12, "byteLength": 4}
            ]
        }),
    );

    let mesh = load_glb(&build_glb(&document, &bin)).unwrap();
    assert_eq!(mesh.image, Some(image_bytes));
}

#[test]
fn test_load_glb_external_image_without_directory_fails() {
    let document = document_with_material(
        json!({"pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}}),
        json!({
            "textures": [{"source": 0}],
            "images": [{"uri": "side_car.png"}]
        }),
    );

    assert!(matches!(
        load_glb(&build_glb(&document, &[0u8; 12])),
        Err(GlbError::Image(_))
    ));
}
