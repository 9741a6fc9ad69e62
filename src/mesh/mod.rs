//! CPU-side decoded mesh data.

/// One decoded mesh: the output of [`crate::glb::load_glb`] and the input
/// of [`crate::scene::aggregate`].
///
/// A plain value type — every field is freshly allocated by the decode and
/// never shared or mutated afterwards. Indices reference `vertices` and are
/// validated against it at aggregation time.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMesh {
    /// Vertex positions.
    pub vertices: Vec<[f32; 3]>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
    /// Per-vertex normals, if the primitive had a `NORMAL` attribute.
    pub normals: Option<Vec<[f32; 3]>>,
    /// Per-vertex texture coordinates, if the primitive had `TEXCOORD_0`.
    pub uvs: Option<Vec<[f32; 2]>>,
    /// Encoded base-color image bytes (PNG, JPEG, ...), if any.
    pub image: Option<Vec<u8>>,
}

impl DecodedMesh {
    /// Create a mesh from positions and indices.
    pub fn new(vertices: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            normals: None,
            uvs: None,
            image: None,
        }
    }

    /// Attach per-vertex normals.
    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Attach per-vertex texture coordinates.
    pub fn with_uvs(mut self, uvs: Vec<[f32; 2]>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Attach encoded base-color image bytes.
    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Bake a uniform scale into the vertex positions.
    ///
    /// Normals and UVs are unaffected; a uniform scale preserves normal
    /// directions.
    pub fn bake_scale(mut self, factor: f32) -> Self {
        for vertex in &mut self.vertices {
            for component in vertex.iter_mut() {
                *component *= factor;
            }
        }
        self
    }
}
