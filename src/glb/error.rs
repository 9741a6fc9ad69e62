//! Error types for GLB loading.

/// Errors that can occur while decoding a GLB file.
#[derive(Debug)]
pub enum GlbError {
    /// The first four bytes are not the `glTF` magic.
    BadMagic([u8; 4]),
    /// A chunk header declared an unexpected type tag.
    ChunkTag {
        /// The tag required at this position (`JSON` or `BIN`).
        expected: &'static str,
        /// The four tag bytes actually found.
        found: [u8; 4],
    },
    /// The byte stream ends before a declared range.
    Truncated {
        /// End of the range that was about to be read.
        end: usize,
        /// Actual length of the input.
        len: usize,
    },
    /// The JSON chunk is not valid UTF-8 / JSON.
    Json(serde_json::Error),
    /// Malformed document structure (missing or mistyped fields).
    Document(String),
    /// Component type outside the fixed 5126/5123/5125 table.
    UnsupportedComponentType {
        /// Accessor index in the document.
        accessor: usize,
        /// The raw `componentType` code.
        code: i64,
    },
    /// Element shape outside the SCALAR/VEC2/VEC3/VEC4 table.
    UnsupportedElementShape {
        /// Accessor index in the document.
        accessor: usize,
        /// The raw `type` string.
        shape: String,
    },
    /// Error resolving an accessor or its buffer view.
    Accessor(String),
    /// Error resolving the base-color image.
    Image(String),
    /// The first primitive has no POSITION attribute.
    MissingPositions,
    /// I/O failure reading the GLB or an external image file.
    Io(std::io::Error),
}

impl std::fmt::Display for GlbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadMagic(found) => {
                write!(f, "bad GLB magic: {:?}", String::from_utf8_lossy(found))
            }
            Self::ChunkTag { expected, found } => {
                write!(
                    f,
                    "expected {expected} chunk, found tag {:?}",
                    String::from_utf8_lossy(found)
                )
            }
            Self::Truncated { end, len } => {
                write!(f, "input truncated: need {end} bytes, have {len}")
            }
            Self::Json(e) => write!(f, "JSON chunk parse error: {e}"),
            Self::Document(msg) => write!(f, "malformed document: {msg}"),
            Self::UnsupportedComponentType { accessor, code } => {
                write!(f, "accessor {accessor}: unsupported component type {code}")
            }
            Self::UnsupportedElementShape { accessor, shape } => {
                write!(f, "accessor {accessor}: unsupported element shape {shape:?}")
            }
            Self::Accessor(msg) => write!(f, "accessor error: {msg}"),
            Self::Image(msg) => write!(f, "image resolution error: {msg}"),
            Self::MissingPositions => {
                write!(f, "first primitive has no POSITION attribute")
            }
            Self::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for GlbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GlbError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<std::io::Error> for GlbError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
