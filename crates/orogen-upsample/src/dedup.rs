//! Per-run vertex deduplication: clip-vertex identity -> output index.

use hashbrown::HashMap;
use orogen_geom::oct_encode;

use crate::vertex::{ClipVertex, ParentVertices, VertexKey};

/// Maps clipped-vertex identities to output indices while growing the output
/// attribute buffers. Scoped to a single tile assembly; two triangles clipped
/// along the same edge always resolve their shared vertex to the same index,
/// which is what keeps the child mesh free of T-junctions.
pub struct VertexDeduplicator {
    map: HashMap<VertexKey, u32>,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
    pub h: Vec<f64>,
    pub normals: Option<Vec<u8>>,
}

impl VertexDeduplicator {
    pub fn new(has_normals: bool, capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
            u: Vec::with_capacity(capacity),
            v: Vec::with_capacity(capacity),
            h: Vec::with_capacity(capacity),
            normals: has_normals.then(|| Vec::with_capacity(capacity * 2)),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.u.len()
    }

    /// Fast path: copies a parent vertex known to lie inside the kept half.
    /// Keyed identically to the clipper's pass-through case, so later
    /// triangle processing reuses the same slot.
    pub fn insert_parent(&mut self, index: u32, src: &ParentVertices) -> u32 {
        if let Some(&existing) = self.map.get(&VertexKey::Indexed(index)) {
            return existing;
        }
        let next = self.u.len() as u32;
        let i = index as usize;
        self.u.push(src.u[i]);
        self.v.push(src.v[i]);
        self.h.push(src.h[i]);
        if let (Some(out), Some(parent)) = (self.normals.as_mut(), src.normals) {
            out.push(parent[i * 2]);
            out.push(parent[i * 2 + 1]);
        }
        self.map.insert(VertexKey::Indexed(index), next);
        next
    }

    /// Resolves a clip vertex to its output index, materializing it on first
    /// sight. Interpolated vertices lerp their attributes; their normals are
    /// decoded, lerped, renormalized, and re-encoded.
    pub fn emit(&mut self, vertex: &ClipVertex, src: &ParentVertices) -> u32 {
        let key = vertex.key();
        if let Some(&existing) = self.map.get(&key) {
            return existing;
        }
        let next = self.u.len() as u32;
        match vertex {
            ClipVertex::Indexed(index) => {
                let i = *index as usize;
                self.u.push(src.u[i]);
                self.v.push(src.v[i]);
                self.h.push(src.h[i]);
                if let (Some(out), Some(parent)) = (self.normals.as_mut(), src.normals) {
                    out.push(parent[i * 2]);
                    out.push(parent[i * 2 + 1]);
                }
            }
            ClipVertex::Interpolated { .. } => {
                self.u.push(vertex.u(src));
                self.v.push(vertex.v(src));
                self.h.push(vertex.h(src));
                if let Some(out) = self.normals.as_mut() {
                    let encoded = vertex.normal(src).map(oct_encode).unwrap_or([0, 0]);
                    out.push(encoded[0]);
                    out.push(encoded[1]);
                }
            }
        }
        self.map.insert(key, next);
        next
    }
}
