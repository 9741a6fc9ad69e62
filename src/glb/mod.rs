//! Binary glTF (`.glb`) mesh loading.
//!
//! Loads a GLB file into a CPU-side [`DecodedMesh`]: positions, indices,
//! optional normals and UVs, and the optional base-color image bytes. Only
//! the first mesh's first primitive is consulted; multi-primitive and
//! multi-material models are out of scope.
//!
//! # Example
//!
//! ```ignore
//! use raycast_core::glb::load_glb_file;
//! use raycast_core::scene::{aggregate, PadPolicy};
//!
//! let mesh = load_glb_file("meshes/monkey.glb")?;
//! let scene = aggregate(&[mesh], PadPolicy::Zero)?;
//! // scene.vertex_bytes() / scene.index_bytes() go straight to the GPU.
//! ```

mod accessor;
mod container;
mod error;
mod image;
#[cfg(test)]
mod tests;

pub use accessor::{decode_attribute, decode_indices, AttributeKind};
pub use container::GlbFile;
pub use error::GlbError;
#[cfg(feature = "image-decode")]
pub use image::{decode_rgba8, ImageData};
pub use image::{resolve_base_color_image, ImageBytes};

use std::path::Path;

use serde_json::Value;

use crate::mesh::DecodedMesh;

/// Load a GLB from in-memory bytes.
///
/// External image URIs cannot be resolved without a file location; use
/// [`load_glb_file`] for models with side-car textures.
pub fn load_glb(data: &[u8]) -> Result<DecodedMesh, GlbError> {
    load_impl(data, None)
}

/// Load a GLB from disk, resolving external image URIs relative to the
/// file's directory.
pub fn load_glb_file(path: impl AsRef<Path>) -> Result<DecodedMesh, GlbError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    load_impl(&data, path.parent())
}

fn load_impl(data: &[u8], base_dir: Option<&Path>) -> Result<DecodedMesh, GlbError> {
    let file = GlbFile::parse(data)?;
    let primitive = first_primitive(&file)?;

    let vertices = decode_attribute::<3>(&file, primitive, AttributeKind::Position)?
        .ok_or(GlbError::MissingPositions)?;
    let normals = decode_attribute::<3>(&file, primitive, AttributeKind::Normal)?;
    let uvs = decode_attribute::<2>(&file, primitive, AttributeKind::TexCoord0)?;

    // A primitive without an index buffer draws its vertices in order.
    let indices = match decode_indices(&file, primitive)? {
        Some(indices) => indices,
        None => (0..vertices.len() as u32).collect(),
    };

    let image = match resolve_base_color_image(&file, primitive)? {
        Some(ImageBytes::Embedded(bytes)) => Some(bytes),
        Some(ImageBytes::External(relative)) => {
            let dir = base_dir.ok_or_else(|| {
                GlbError::Image(format!(
                    "external image {:?} needs a file location; use load_glb_file",
                    relative
                ))
            })?;
            Some(std::fs::read(dir.join(&relative))?)
        }
        None => None,
    };

    let mut mesh = DecodedMesh::new(vertices, indices);
    if let Some(normals) = normals {
        mesh = mesh.with_normals(normals);
    }
    if let Some(uvs) = uvs {
        mesh = mesh.with_uvs(uvs);
    }
    if let Some(image) = image {
        mesh = mesh.with_image(image);
    }
    Ok(mesh)
}

/// The first primitive of the first mesh, the only one this loader reads.
fn first_primitive(file: &GlbFile) -> Result<&Value, GlbError> {
    file.json
        .get("meshes")
        .and_then(|m| m.get(0))
        .ok_or_else(|| GlbError::Document("document has no meshes".into()))?
        .get("primitives")
        .and_then(|p| p.get(0))
        .ok_or_else(|| GlbError::Document("mesh 0 has no primitives".into()))
}
