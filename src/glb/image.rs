//! Base-color image resolution.
//!
//! Walks primitive → material → `pbrMetallicRoughness.baseColorTexture` →
//! texture → image and returns the image bytes, wherever they live: a
//! base64 `data:` URI, a path next to the GLB file, or a byte range of the
//! BIN chunk. Only the first primitive's base-color image is consulted;
//! multi-material meshes are out of scope.

use std::path::PathBuf;

use base64::engine::general_purpose;
use base64::Engine as _;
use serde_json::Value;

use super::accessor::get_usize;
use super::container::GlbFile;
use super::error::GlbError;

/// Where a resolved image's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageBytes {
    /// Bytes embedded in the file: a BIN-chunk slice or a decoded data URI.
    Embedded(Vec<u8>),
    /// A URI relative to the GLB's directory; the caller reads the file.
    External(PathBuf),
}

/// Resolve the base-color image of a primitive.
///
/// Returns `Ok(None)` when the primitive has no material or the material
/// has no base-color texture — absence is not an error. Dangling material,
/// texture, image or buffer-view references are.
pub fn resolve_base_color_image(
    file: &GlbFile,
    primitive: &Value,
) -> Result<Option<ImageBytes>, GlbError> {
    let Some(material_index) = get_usize(primitive, "material") else {
        return Ok(None);
    };
    let material = file
        .json
        .get("materials")
        .and_then(|m| m.get(material_index))
        .ok_or_else(|| GlbError::Image(format!("material {material_index} out of range")))?;

    let Some(texture_info) = material
        .get("pbrMetallicRoughness")
        .and_then(|pbr| pbr.get("baseColorTexture"))
    else {
        return Ok(None);
    };

    let texture_index = get_usize(texture_info, "index").ok_or_else(|| {
        GlbError::Image(format!("material {material_index}: baseColorTexture has no index"))
    })?;
    let texture = file
        .json
        .get("textures")
        .and_then(|t| t.get(texture_index))
        .ok_or_else(|| GlbError::Image(format!("texture {texture_index} out of range")))?;

    let image_index = get_usize(texture, "source").ok_or_else(|| {
        GlbError::Image(format!("texture {texture_index} has no source"))
    })?;
    let info = file
        .json
        .get("images")
        .and_then(|i| i.get(image_index))
        .ok_or_else(|| GlbError::Image(format!("image {image_index} out of range")))?;

    if let Some(uri) = info.get("uri").and_then(Value::as_str) {
        if let Some(payload) = uri.strip_prefix("data:") {
            let (_, encoded) = payload.split_once(',').ok_or_else(|| {
                GlbError::Image(format!("image {image_index}: data URI has no payload"))
            })?;
            let bytes = general_purpose::STANDARD.decode(encoded).map_err(|e| {
                GlbError::Image(format!("image {image_index}: base64 decode failed: {e}"))
            })?;
            return Ok(Some(ImageBytes::Embedded(bytes)));
        }
        return Ok(Some(ImageBytes::External(PathBuf::from(uri))));
    }

    if let Some(view_index) = get_usize(info, "bufferView") {
        let view = file
            .json
            .get("bufferViews")
            .and_then(|v| v.get(view_index))
            .ok_or_else(|| {
                GlbError::Image(format!(
                    "image {image_index}: buffer view {view_index} out of range"
                ))
            })?;
        let offset = get_usize(view, "byteOffset").unwrap_or(0);
        let length = get_usize(view, "byteLength").ok_or_else(|| {
            GlbError::Image(format!("buffer view {view_index} has no byteLength"))
        })?;
        let end = offset.checked_add(length).ok_or_else(|| {
            GlbError::Image(format!(
                "image {image_index}: byte range {offset}+{length} overflows"
            ))
        })?;
        let bytes = file.bin.get(offset..end).ok_or_else(|| {
            GlbError::Image(format!(
                "image {image_index}: range {offset}..{end} outside {}-byte blob",
                file.bin.len()
            ))
        })?;
        return Ok(Some(ImageBytes::Embedded(bytes.to_vec())));
    }

    Err(GlbError::Image(format!(
        "image {image_index} has neither uri nor bufferView"
    )))
}

/// An image decoded to tightly-packed RGBA8.
#[cfg(feature = "image-decode")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Pixel data, `width * height * 4` bytes.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Decode resolved image bytes (PNG, JPEG, ...) to RGBA8.
#[cfg(feature = "image-decode")]
pub fn decode_rgba8(bytes: &[u8]) -> Result<ImageData, GlbError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| GlbError::Image(format!("image decode failed: {e}")))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ImageData {
        data: rgba.into_raw(),
        width,
        height,
    })
}
