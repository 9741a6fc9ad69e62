//! Mesh aggregation into storage-buffer-aligned arrays.
//!
//! [`aggregate`] flattens an ordered sequence of decoded meshes into single
//! arrays ready for upload: every 3-component attribute is widened to four
//! components so each element lands on a 16-byte boundary, and each mesh's
//! indices are shifted by the running vertex count of the meshes before it.
//! The input order is the draw order; callers decide it.

use crate::mesh::DecodedMesh;

/// The fourth component appended to 3-component attributes.
///
/// Purely a caller policy: `Zero` for attributes consumed as aligned
/// vectors, `One` when the shader reads w as a homogeneous-coordinate flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadPolicy {
    /// Pad with `0.0`.
    #[default]
    Zero,
    /// Pad with `1.0`.
    One,
}

impl PadPolicy {
    fn w(self) -> f32 {
        match self {
            Self::Zero => 0.0,
            Self::One => 1.0,
        }
    }
}

/// The texture binding a scene resolves to, decided once at aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextureSet {
    /// No mesh carried an image.
    #[default]
    None,
    /// Exactly one image; bind as a single texture.
    Single(Vec<u8>),
    /// Several images; bind as a texture array, one layer per mesh.
    Array(Vec<Vec<u8>>),
}

/// Errors from mesh aggregation.
#[derive(Debug)]
pub enum AggregateError {
    /// A mesh carried an index outside its own vertex range.
    IndexOutOfRange {
        /// Position of the mesh in the input sequence.
        mesh: usize,
        /// The offending index value.
        index: u32,
        /// The mesh's vertex count.
        vertex_count: usize,
    },
}

impl std::fmt::Display for AggregateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange {
                mesh,
                index,
                vertex_count,
            } => write!(
                f,
                "mesh {mesh}: index {index} out of range for {vertex_count} vertices"
            ),
        }
    }
}

impl std::error::Error for AggregateError {}

/// Flattened arrays for the whole scene, plus the per-mesh index offsets.
///
/// `index_offsets[k]` is the sum of the vertex counts of meshes `0..k`;
/// every index produced for mesh `k` lies in
/// `[index_offsets[k], index_offsets[k] + vertex_count_k)`.
#[derive(Debug, Clone, Default)]
pub struct AggregatedScene {
    /// All vertex positions, padded to four components.
    pub vertices: Vec<[f32; 4]>,
    /// All indices, renumbered into the flattened vertex array.
    pub indices: Vec<u32>,
    /// All normals, padded to four components. Parallel to `vertices` when
    /// any input mesh carried normals (meshes without them contribute zero
    /// vectors); empty when none did.
    pub normals: Vec<[f32; 4]>,
    /// All texture coordinates. Parallel to `vertices` when any input mesh
    /// carried UVs (meshes without them contribute `[0, 0]`); empty when
    /// none did.
    pub uvs: Vec<[f32; 2]>,
    /// Per-mesh index offset table (monotone partial sums of vertex counts).
    pub index_offsets: Vec<u32>,
    /// The resolved texture binding.
    pub textures: TextureSet,
}

impl AggregatedScene {
    /// Vertex array as raw bytes for buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index array as raw bytes for buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Normal array as raw bytes for buffer upload.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// UV array as raw bytes for buffer upload.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Number of triangles described by the index array.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Merge an ordered sequence of meshes into one flattened scene.
///
/// Deterministic and order-preserving: mesh order is draw order, and the
/// index offset of each mesh is the total vertex count of the meshes before
/// it. Every index is validated against its own mesh's vertex count; a mesh
/// with no vertices contributes nothing and is not an error.
///
/// When only some meshes carry normals or UVs, the meshes without them get
/// zero-filled entries so the attribute arrays stay parallel to the vertex
/// array.
pub fn aggregate(
    meshes: &[DecodedMesh],
    padding: PadPolicy,
) -> Result<AggregatedScene, AggregateError> {
    let w = padding.w();
    let mut scene = AggregatedScene::default();
    let mut images = Vec::new();
    let mut index_offset: u32 = 0;

    // The shader indexes normals and UVs by vertex, so once any mesh
    // carries an attribute the array must stay parallel to `vertices`.
    let any_normals = meshes.iter().any(|m| m.normals.is_some());
    let any_uvs = meshes.iter().any(|m| m.uvs.is_some());

    for (mesh_pos, mesh) in meshes.iter().enumerate() {
        scene.index_offsets.push(index_offset);

        let vertex_count = mesh.vertices.len();
        for &[x, y, z] in &mesh.vertices {
            scene.vertices.push([x, y, z, w]);
        }
        for &index in &mesh.indices {
            if index as usize >= vertex_count {
                return Err(AggregateError::IndexOutOfRange {
                    mesh: mesh_pos,
                    index,
                    vertex_count,
                });
            }
            scene.indices.push(index + index_offset);
        }
        if any_normals {
            match &mesh.normals {
                Some(normals) => {
                    for &[x, y, z] in normals {
                        scene.normals.push([x, y, z, w]);
                    }
                }
                None => scene
                    .normals
                    .extend(std::iter::repeat([0.0, 0.0, 0.0, w]).take(vertex_count)),
            }
        }
        if any_uvs {
            match &mesh.uvs {
                Some(uvs) => scene.uvs.extend_from_slice(uvs),
                None => scene.uvs.extend(std::iter::repeat([0.0, 0.0]).take(vertex_count)),
            }
        }
        if let Some(image) = &mesh.image {
            images.push(image.clone());
        }

        index_offset += vertex_count as u32;
    }

    scene.textures = match images.len() {
        0 => TextureSet::None,
        1 => TextureSet::Single(images.remove(0)),
        _ => TextureSet::Array(images),
    };
    Ok(scene)
}
