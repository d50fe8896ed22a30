//! Clipped-vertex references and their deduplication keys.

use orogen_geom::{Vec3, oct_decode};

/// Read-only view of the decoded parent vertex attributes, after edge
/// pre-snapping. Heights are the raw quantized values as f64.
#[derive(Clone, Copy, Debug)]
pub struct ParentVertices<'a> {
    pub u: &'a [f64],
    pub v: &'a [f64],
    pub h: &'a [f64],
    /// Oct-encoded normals, 2 bytes per vertex, when the parent carries them.
    pub normals: Option<&'a [u8]>,
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// A vertex of a clipped triangle: either an original parent vertex or a
/// point interpolated between two other clip vertices.
///
/// The first clip pass interpolates between `Indexed` endpoints only; the
/// second pass may interpolate between first-pass results, so nesting depth
/// never exceeds two.
#[derive(Clone, Debug)]
pub enum ClipVertex {
    Indexed(u32),
    Interpolated {
        first: Box<ClipVertex>,
        second: Box<ClipVertex>,
        ratio: f64,
    },
}

impl ClipVertex {
    pub fn u(&self, src: &ParentVertices) -> f64 {
        match self {
            ClipVertex::Indexed(i) => src.u[*i as usize],
            ClipVertex::Interpolated {
                first,
                second,
                ratio,
            } => lerp(first.u(src), second.u(src), *ratio),
        }
    }

    pub fn v(&self, src: &ParentVertices) -> f64 {
        match self {
            ClipVertex::Indexed(i) => src.v[*i as usize],
            ClipVertex::Interpolated {
                first,
                second,
                ratio,
            } => lerp(first.v(src), second.v(src), *ratio),
        }
    }

    pub fn h(&self, src: &ParentVertices) -> f64 {
        match self {
            ClipVertex::Indexed(i) => src.h[*i as usize],
            ClipVertex::Interpolated {
                first,
                second,
                ratio,
            } => lerp(first.h(src), second.h(src), *ratio),
        }
    }

    /// Resolves the decoded unit normal, lerping and renormalizing through
    /// interpolation levels. `None` when the parent has no normals.
    pub fn normal(&self, src: &ParentVertices) -> Option<Vec3> {
        match self {
            ClipVertex::Indexed(i) => {
                let normals = src.normals?;
                let at = *i as usize * 2;
                Some(oct_decode(normals[at], normals[at + 1]))
            }
            ClipVertex::Interpolated {
                first,
                second,
                ratio,
            } => {
                let a = first.normal(src)?;
                let b = second.normal(src)?;
                Some(a.lerp(b, *ratio).normalized())
            }
        }
    }

    /// Identity for deduplication only; never used for geometry.
    pub fn key(&self) -> VertexKey {
        match self {
            ClipVertex::Indexed(i) => VertexKey::Indexed(*i),
            ClipVertex::Interpolated {
                first,
                second,
                ratio,
            } => VertexKey::Interpolated {
                first: Box::new(first.key()),
                second: Box::new(second.key()),
                ratio_bits: ratio.to_bits(),
            },
        }
    }
}

/// Hashable vertex identity. The interpolation ratio is keyed by its f64 bit
/// pattern; adjacent triangles compute the ratio from the same endpoint
/// values in the same order, so equal points produce equal bits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum VertexKey {
    Indexed(u32),
    Interpolated {
        first: Box<VertexKey>,
        second: Box<VertexKey>,
        ratio_bits: u64,
    },
}
