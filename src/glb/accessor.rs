//! Accessor and index decoding.
//!
//! An accessor describes how to read `count` tuples of a fixed component
//! type and arity from a byte range of the BIN chunk. Both lookup tables
//! (component type code → width, element shape → arity) are total: any
//! unmapped key is a typed failure, so new glTF component types fail loudly
//! instead of silently truncating.
//!
//! All reads are little-endian and tightly packed; byte ranges are validated
//! once against the buffer view and the blob before any value is read.

use serde_json::Value;

use super::container::GlbFile;
use super::error::GlbError;

/// Vertex attribute kinds the decoder understands.
///
/// A closed set resolved once at decode time; the glTF semantic name and
/// the expected tuple arity hang off the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// `POSITION`, three components.
    Position,
    /// `NORMAL`, three components.
    Normal,
    /// `TEXCOORD_0`, two components.
    TexCoord0,
}

impl AttributeKind {
    /// The glTF attribute name this kind maps to.
    pub fn semantic(self) -> &'static str {
        match self {
            Self::Position => "POSITION",
            Self::Normal => "NORMAL",
            Self::TexCoord0 => "TEXCOORD_0",
        }
    }

    /// Number of components per tuple.
    pub fn components(self) -> usize {
        match self {
            Self::Position | Self::Normal => 3,
            Self::TexCoord0 => 2,
        }
    }
}

/// Component types from the fixed GLB table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComponentType {
    /// 5126 — 32-bit float.
    F32,
    /// 5123 — 16-bit unsigned integer.
    U16,
    /// 5125 — 32-bit unsigned integer.
    U32,
}

impl ComponentType {
    fn from_code(code: i64, accessor: usize) -> Result<Self, GlbError> {
        match code {
            5126 => Ok(Self::F32),
            5123 => Ok(Self::U16),
            5125 => Ok(Self::U32),
            _ => Err(GlbError::UnsupportedComponentType { accessor, code }),
        }
    }

    fn size(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::F32 | Self::U32 => 4,
        }
    }
}

/// Components per element for the fixed shape table.
fn shape_components(shape: &str, accessor: usize) -> Result<usize, GlbError> {
    match shape {
        "SCALAR" => Ok(1),
        "VEC2" => Ok(2),
        "VEC3" => Ok(3),
        "VEC4" => Ok(4),
        other => Err(GlbError::UnsupportedElementShape {
            accessor,
            shape: other.to_string(),
        }),
    }
}

/// An accessor resolved against its buffer view: typed, sized, and
/// bounds-checked, with `data` starting at the absolute byte offset.
struct ResolvedAccessor<'a> {
    index: usize,
    code: i64,
    component_type: ComponentType,
    components: usize,
    count: usize,
    data: &'a [u8],
}

/// Resolve accessor `accessor_index` down to a validated byte slice.
///
/// Checks, in order: the accessor and buffer view exist, the buffer view
/// lies inside the BIN blob, and the accessor's element range lies inside
/// the buffer view. Nothing is read until all three hold.
fn resolve_accessor(file: &GlbFile, accessor_index: usize) -> Result<ResolvedAccessor<'_>, GlbError> {
    let accessor = file
        .json
        .get("accessors")
        .and_then(|a| a.get(accessor_index))
        .ok_or_else(|| GlbError::Accessor(format!("accessor {accessor_index} out of range")))?;

    let view_index = get_usize(accessor, "bufferView").ok_or_else(|| {
        GlbError::Accessor(format!("accessor {accessor_index} has no buffer view"))
    })?;
    let view = file
        .json
        .get("bufferViews")
        .and_then(|v| v.get(view_index))
        .ok_or_else(|| {
            GlbError::Accessor(format!(
                "accessor {accessor_index}: buffer view {view_index} out of range"
            ))
        })?;

    let view_offset = get_usize(view, "byteOffset").unwrap_or(0);
    let view_length = get_usize(view, "byteLength").ok_or_else(|| {
        GlbError::Accessor(format!("buffer view {view_index} has no byteLength"))
    })?;
    // Offsets come straight from the document; arithmetic must not wrap.
    let view_end = view_offset.checked_add(view_length).ok_or_else(|| {
        GlbError::Accessor(format!(
            "buffer view {view_index}: byte range {view_offset}+{view_length} overflows"
        ))
    })?;
    if view_end > file.bin.len() {
        return Err(GlbError::Accessor(format!(
            "buffer view {view_index}: range {view_offset}..{view_end} outside {}-byte blob",
            file.bin.len()
        )));
    }

    let code = accessor
        .get("componentType")
        .and_then(Value::as_i64)
        .ok_or_else(|| {
            GlbError::Accessor(format!("accessor {accessor_index} has no componentType"))
        })?;
    let component_type = ComponentType::from_code(code, accessor_index)?;
    let shape = accessor.get("type").and_then(Value::as_str).ok_or_else(|| {
        GlbError::Accessor(format!("accessor {accessor_index} has no type"))
    })?;
    let components = shape_components(shape, accessor_index)?;
    let count = get_usize(accessor, "count").ok_or_else(|| {
        GlbError::Accessor(format!("accessor {accessor_index} has no count"))
    })?;

    let accessor_offset = get_usize(accessor, "byteOffset").unwrap_or(0);
    let needed = count
        .checked_mul(components)
        .and_then(|elements| elements.checked_mul(component_type.size()))
        .and_then(|bytes| bytes.checked_add(accessor_offset))
        .ok_or_else(|| {
            GlbError::Accessor(format!(
                "accessor {accessor_index}: declared byte range overflows"
            ))
        })?;
    if needed > view_length {
        return Err(GlbError::Accessor(format!(
            "accessor {accessor_index}: needs {needed} bytes, buffer view {view_index} has {view_length}"
        )));
    }

    Ok(ResolvedAccessor {
        index: accessor_index,
        code,
        component_type,
        components,
        count,
        data: &file.bin[view_offset + accessor_offset..view_end],
    })
}

/// Decode one vertex attribute of the first-primitive into `count` tuples.
///
/// Returns `Ok(None)` when the primitive has no such attribute — optional
/// attributes are not an error. The declared element shape must match the
/// kind's arity (`N`). Integer components are widened to `f32`.
pub fn decode_attribute<const N: usize>(
    file: &GlbFile,
    primitive: &Value,
    kind: AttributeKind,
) -> Result<Option<Vec<[f32; N]>>, GlbError> {
    debug_assert_eq!(N, kind.components());

    let Some(accessor_index) = primitive
        .get("attributes")
        .and_then(|a| get_usize(a, kind.semantic()))
    else {
        return Ok(None);
    };

    let resolved = resolve_accessor(file, accessor_index)?;
    if resolved.components != N {
        return Err(GlbError::Accessor(format!(
            "accessor {}: {} declares {} components, expected {N}",
            resolved.index,
            kind.semantic(),
            resolved.components
        )));
    }

    let component_size = resolved.component_type.size();
    let mut values = Vec::with_capacity(resolved.count);
    for i in 0..resolved.count {
        let base = i * N * component_size;
        let mut tuple = [0f32; N];
        for (c, slot) in tuple.iter_mut().enumerate() {
            *slot = read_component(resolved.data, base + c * component_size, resolved.component_type);
        }
        values.push(tuple);
    }
    Ok(Some(values))
}

/// Decode the first-primitive's index buffer.
///
/// Returns `Ok(None)` when the primitive has no `indices` field. Restricted
/// to `SCALAR` accessors of component type 5123 or 5125; values are not
/// range-checked here (that happens at aggregation).
pub fn decode_indices(file: &GlbFile, primitive: &Value) -> Result<Option<Vec<u32>>, GlbError> {
    let Some(accessor_index) = get_usize(primitive, "indices") else {
        return Ok(None);
    };

    let resolved = resolve_accessor(file, accessor_index)?;
    if resolved.components != 1 {
        return Err(GlbError::Accessor(format!(
            "accessor {}: index accessor must be SCALAR",
            resolved.index
        )));
    }
    if resolved.component_type == ComponentType::F32 {
        return Err(GlbError::UnsupportedComponentType {
            accessor: resolved.index,
            code: resolved.code,
        });
    }

    let component_size = resolved.component_type.size();
    let mut indices = Vec::with_capacity(resolved.count);
    for i in 0..resolved.count {
        let offset = i * component_size;
        let value = match resolved.component_type {
            ComponentType::U16 => {
                u16::from_le_bytes([resolved.data[offset], resolved.data[offset + 1]]) as u32
            }
            ComponentType::U32 => u32::from_le_bytes([
                resolved.data[offset],
                resolved.data[offset + 1],
                resolved.data[offset + 2],
                resolved.data[offset + 3],
            ]),
            ComponentType::F32 => unreachable!(),
        };
        indices.push(value);
    }
    Ok(Some(indices))
}

/// Read one little-endian component at `offset`, widened to f32.
fn read_component(data: &[u8], offset: usize, component_type: ComponentType) -> f32 {
    match component_type {
        ComponentType::F32 => f32::from_le_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]),
        ComponentType::U16 => u16::from_le_bytes([data[offset], data[offset + 1]]) as f32,
        ComponentType::U32 => u32::from_le_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]) as f32,
    }
}

/// Read `key` from a JSON object as usize.
pub(super) fn get_usize(value: &Value, key: &str) -> Option<usize> {
    value.get(key)?.as_u64().map(|v| v as usize)
}
