//! GLB container parsing.
//!
//! A GLB file is a 12-byte header (`glTF` magic, version, total length)
//! followed by length-prefixed chunks: first a `JSON` chunk holding the
//! scene description, then a `BIN` chunk holding the raw binary payload.
//! All integers are little-endian; declared chunk lengths drive every
//! offset, so chunk padding needs no special handling.

use serde_json::Value;

use super::error::GlbError;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const FILE_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// A parsed GLB container: the JSON document and the binary blob.
///
/// Immutable once parsed; every accessor and image lookup borrows from it.
#[derive(Debug)]
pub struct GlbFile {
    /// The JSON chunk, parsed into a generic document.
    pub json: Value,
    /// The BIN chunk payload.
    pub bin: Vec<u8>,
}

impl GlbFile {
    /// Parse a GLB byte stream.
    ///
    /// Fails with a format-class error on a bad magic, an unexpected chunk
    /// tag, or a declared range that runs past the end of the input. A
    /// declared total length that disagrees with the actual byte count is
    /// tolerated (and logged), matching common exporter sloppiness.
    pub fn parse(data: &[u8]) -> Result<Self, GlbError> {
        let magic = read_tag(data, 0)?;
        if &magic != GLB_MAGIC {
            return Err(GlbError::BadMagic(magic));
        }
        let _version = read_u32(data, 4)?;
        let total_length = read_u32(data, 8)? as usize;
        if total_length != data.len() {
            log::warn!(
                "GLB declares {total_length} bytes but input is {} bytes",
                data.len()
            );
        }

        // JSON chunk
        let json_length = read_u32(data, FILE_HEADER_LEN)? as usize;
        let json_tag = read_tag(data, FILE_HEADER_LEN + 4)?;
        if &json_tag != b"JSON" {
            return Err(GlbError::ChunkTag {
                expected: "JSON",
                found: json_tag,
            });
        }
        let json_start = FILE_HEADER_LEN + CHUNK_HEADER_LEN;
        let json_end = json_start + json_length;
        let json_bytes = data.get(json_start..json_end).ok_or(GlbError::Truncated {
            end: json_end,
            len: data.len(),
        })?;
        let json: Value = serde_json::from_slice(json_bytes)?;

        // BIN chunk, immediately after the JSON payload
        let bin_length = read_u32(data, json_end)? as usize;
        let bin_tag = read_tag(data, json_end + 4)?;
        if &bin_tag[..3] != b"BIN" {
            return Err(GlbError::ChunkTag {
                expected: "BIN",
                found: bin_tag,
            });
        }
        let bin_start = json_end + CHUNK_HEADER_LEN;
        let bin_end = bin_start + bin_length;
        let bin = data
            .get(bin_start..bin_end)
            .ok_or(GlbError::Truncated {
                end: bin_end,
                len: data.len(),
            })?
            .to_vec();

        Ok(Self { json, bin })
    }
}

/// Read a little-endian u32 at `offset`.
fn read_u32(data: &[u8], offset: usize) -> Result<u32, GlbError> {
    let end = offset + 4;
    let slice = data.get(offset..end).ok_or(GlbError::Truncated {
        end,
        len: data.len(),
    })?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(slice);
    Ok(u32::from_le_bytes(bytes))
}

/// Read a 4-byte tag at `offset`.
fn read_tag(data: &[u8], offset: usize) -> Result<[u8; 4], GlbError> {
    let end = offset + 4;
    let slice = data.get(offset..end).ok_or(GlbError::Truncated {
        end,
        len: data.len(),
    })?;
    let mut tag = [0u8; 4];
    tag.copy_from_slice(slice);
    Ok(tag)
}
