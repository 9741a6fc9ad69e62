//! # Raycast Core
//!
//! CPU-side decode core for a storage-buffer raycasting renderer.
//!
//! The crate turns binary glTF (`.glb`) files into flat, GPU-consumable
//! arrays: [`glb`] parses the container and decodes attributes, indices and
//! the base-color image into a [`mesh::DecodedMesh`]; [`scene`] flattens any
//! number of decoded meshes into storage-buffer-aligned arrays with
//! renumbered indices. Everything downstream of those arrays (buffer upload,
//! texture upload, the render loop itself) lives outside this crate.

pub mod glb;
pub mod mesh;
pub mod scene;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
