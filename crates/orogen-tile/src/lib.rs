//! Quantized terrain tile buffers, quadrant flags, and validation.
#![forbid(unsafe_code)]

/// Largest quantized texture coordinate; vertex u/v/height live in
/// `[0, MAX_QUANTIZED_COORD]`.
pub const MAX_QUANTIZED_COORD: u16 = 32767;

/// Integer midpoint of the quantized range, the threshold both clip axes use.
pub const HALF_QUANTIZED_COORD: u16 = MAX_QUANTIZED_COORD / 2;

/// Vertices closer than this (in quantized units) to a tile edge are snapped
/// onto it; prevents hairline cracks between neighboring tiles.
pub const EDGE_SNAP_TOLERANCE: f64 = 20.0;

/// One of the four children produced by LOD subdivision of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    Southwest,
    Southeast,
    Northwest,
    Northeast,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Southwest,
        Quadrant::Southeast,
        Quadrant::Northwest,
        Quadrant::Northeast,
    ];

    #[inline]
    pub fn from_flags(east: bool, north: bool) -> Quadrant {
        match (east, north) {
            (false, false) => Quadrant::Southwest,
            (true, false) => Quadrant::Southeast,
            (false, true) => Quadrant::Northwest,
            (true, true) => Quadrant::Northeast,
        }
    }

    /// True when this child keeps the eastern (high-u) half of the parent.
    #[inline]
    pub fn is_east(self) -> bool {
        matches!(self, Quadrant::Southeast | Quadrant::Northeast)
    }

    /// True when this child keeps the northern (high-v) half of the parent.
    #[inline]
    pub fn is_north(self) -> bool {
        matches!(self, Quadrant::Northwest | Quadrant::Northeast)
    }
}

/// A terrain tile mesh with per-axis 16-bit quantized vertex attributes.
///
/// `u` runs west to east, `v` south to north, both quantized over the tile's
/// geographic rectangle; `height` is quantized over
/// `[minimum_height, maximum_height]`. Indices form a triangle list; only the
/// first `surface_index_count` entries are real surface, the rest being skirt
/// geometry appended by an earlier pipeline stage.
#[derive(Clone, Debug, Default)]
pub struct QuantizedMesh {
    pub u: Vec<u16>,
    pub v: Vec<u16>,
    pub height: Vec<u16>,
    /// Oct-encoded normals, 2 bytes per vertex, when present.
    pub normals: Option<Vec<u8>>,
    pub indices: Vec<u32>,
    pub surface_index_count: usize,
    pub minimum_height: f32,
    pub maximum_height: f32,
}

impl QuantizedMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.u.len()
    }

    /// The non-skirt portion of the index buffer.
    #[inline]
    pub fn surface_indices(&self) -> &[u32] {
        &self.indices[..self.surface_index_count]
    }

    /// Dequantizes a stored height value to meters.
    #[inline]
    pub fn decode_height(&self, quantized: u16) -> f32 {
        let t = quantized as f32 / MAX_QUANTIZED_COORD as f32;
        self.minimum_height + (self.maximum_height - self.minimum_height) * t
    }

    /// Structural validation; any failure is fatal for the tile.
    pub fn validate(&self) -> Result<(), MeshError> {
        let count = self.vertex_count();
        if self.v.len() != count {
            return Err(MeshError::BufferLengthMismatch {
                buffer: "v",
                expected: count,
                actual: self.v.len(),
            });
        }
        if self.height.len() != count {
            return Err(MeshError::BufferLengthMismatch {
                buffer: "height",
                expected: count,
                actual: self.height.len(),
            });
        }
        if let Some(normals) = &self.normals {
            if normals.len() != count * 2 {
                return Err(MeshError::BufferLengthMismatch {
                    buffer: "normals",
                    expected: count * 2,
                    actual: normals.len(),
                });
            }
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangles {
                count: self.indices.len(),
            });
        }
        if self.surface_index_count > self.indices.len() || self.surface_index_count % 3 != 0 {
            return Err(MeshError::InvalidSurfaceCount {
                surface: self.surface_index_count,
                total: self.indices.len(),
            });
        }
        for &index in &self.indices {
            if index as usize >= count {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    vertex_count: count,
                });
            }
        }
        if !(self.minimum_height <= self.maximum_height) {
            return Err(MeshError::InvalidHeightRange {
                minimum: self.minimum_height,
                maximum: self.maximum_height,
            });
        }
        Ok(())
    }
}

/// Malformed-input failures; never retried internally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshError {
    BufferLengthMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },
    IndexCountNotTriangles {
        count: usize,
    },
    InvalidSurfaceCount {
        surface: usize,
        total: usize,
    },
    IndexOutOfRange {
        index: u32,
        vertex_count: usize,
    },
    InvalidHeightRange {
        minimum: f32,
        maximum: f32,
    },
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::BufferLengthMismatch {
                buffer,
                expected,
                actual,
            } => write!(
                f,
                "{} buffer length {} does not match vertex count {}",
                buffer, actual, expected
            ),
            MeshError::IndexCountNotTriangles { count } => {
                write!(f, "index count {} is not a multiple of 3", count)
            }
            MeshError::InvalidSurfaceCount { surface, total } => write!(
                f,
                "surface index count {} invalid for index buffer of {}",
                surface, total
            ),
            MeshError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "index {} references past vertex count {}",
                index, vertex_count
            ),
            MeshError::InvalidHeightRange { minimum, maximum } => {
                write!(f, "minimum height {} exceeds maximum {}", minimum, maximum)
            }
        }
    }
}

impl std::error::Error for MeshError {}
