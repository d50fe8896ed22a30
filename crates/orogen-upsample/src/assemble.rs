//! Tile assembly: decode, clip, dedup, requantize, derive volumes, pack.

use orogen_geom::{
    BoundingSphere, Ellipsoid, OrientedBoundingBox, Rectangle, Vec3, horizon_culling_point,
};
use orogen_tile::{
    EDGE_SNAP_TOLERANCE, HALF_QUANTIZED_COORD, MAX_QUANTIZED_COORD, MeshError, Quadrant,
    QuantizedMesh,
};

use crate::clip::{ClipStep, clip_axis};
use crate::dedup::VertexDeduplicator;
use crate::vertex::{ClipVertex, ParentVertices};

const MAX_COORD: f64 = MAX_QUANTIZED_COORD as f64;
const HALF_COORD: f64 = HALF_QUANTIZED_COORD as f64;

/// Inputs for one upsample call. The parent tile is read-only; the four
/// children of one parent may be produced concurrently from the same buffers.
#[derive(Clone, Copy, Debug)]
pub struct UpsampleRequest<'a> {
    pub parent: &'a QuantizedMesh,
    /// Geographic bounds of the child being produced.
    pub child_rectangle: Rectangle,
    pub ellipsoid: Ellipsoid,
    pub quadrant: Quadrant,
}

/// A synthesized child tile plus everything the renderer needs to cull and
/// stitch it.
#[derive(Clone, Debug)]
pub struct UpsampledTile {
    pub mesh: QuantizedMesh,
    /// Output indices of vertices lying exactly on each child edge, consumed
    /// downstream for skirt/seam stitching.
    pub west_indices: Vec<u32>,
    pub south_indices: Vec<u32>,
    pub east_indices: Vec<u32>,
    pub north_indices: Vec<u32>,
    pub bounding_sphere: BoundingSphere,
    pub oriented_bounding_box: OrientedBoundingBox,
    /// `None` when no valid point exists for the vertex set.
    pub horizon_occlusion_point: Option<Vec3>,
}

#[derive(Debug)]
pub enum UpsampleError {
    MalformedParent(MeshError),
}

impl std::fmt::Display for UpsampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpsampleError::MalformedParent(e) => write!(f, "malformed parent tile: {}", e),
        }
    }
}

impl std::error::Error for UpsampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpsampleError::MalformedParent(e) => Some(e),
        }
    }
}

impl From<MeshError> for UpsampleError {
    fn from(e: MeshError) -> Self {
        UpsampleError::MalformedParent(e)
    }
}

/// Snaps a parent-domain coordinate onto the tile edge it nearly touches.
#[inline]
fn snap_to_tile_edges(value: f64) -> f64 {
    if value < EDGE_SNAP_TOLERANCE {
        0.0
    } else if value > MAX_COORD - EDGE_SNAP_TOLERANCE {
        MAX_COORD
    } else {
        value
    }
}

/// Rescales a kept-half coordinate into the child's full quantized domain.
/// Values at or past the kept half's bounds clamp onto the child edges, and
/// values remapping into the snap band are pulled onto them.
#[inline]
fn remap_axis(value: f64, kept_low: f64, kept_high: f64, offset: f64) -> f64 {
    if value <= kept_low {
        return 0.0;
    }
    if value >= kept_high {
        return MAX_COORD;
    }
    let remapped = value * 2.0 + offset;
    if remapped < EDGE_SNAP_TOLERANCE {
        0.0
    } else if remapped > MAX_COORD - EDGE_SNAP_TOLERANCE {
        MAX_COORD
    } else {
        remapped
    }
}

fn polygon_from_steps(steps: &[ClipStep], corners: &[ClipVertex; 3], out: &mut Vec<ClipVertex>) {
    out.clear();
    for step in steps {
        match *step {
            ClipStep::Keep(corner) => out.push(corners[corner].clone()),
            ClipStep::Split { from, to, ratio } => out.push(ClipVertex::Interpolated {
                first: Box::new(corners[from].clone()),
                second: Box::new(corners[to].clone()),
                ratio,
            }),
        }
    }
}

/// Synthesizes one child quadrant of `request.parent` without new source
/// data. Pure and synchronous; a malformed parent fails the single call.
pub fn upsample(request: &UpsampleRequest<'_>) -> Result<UpsampledTile, UpsampleError> {
    let parent = request.parent;
    parent.validate()?;

    let keep_east = request.quadrant.is_east();
    let keep_north = request.quadrant.is_north();
    let parent_vertex_count = parent.vertex_count();

    // Stage 1: decode, snapping onto the parent's own edges before any clip
    // decision sees the values.
    let mut pu = Vec::with_capacity(parent_vertex_count);
    let mut pv = Vec::with_capacity(parent_vertex_count);
    let mut ph = Vec::with_capacity(parent_vertex_count);
    for i in 0..parent_vertex_count {
        pu.push(snap_to_tile_edges(parent.u[i] as f64));
        pv.push(snap_to_tile_edges(parent.v[i] as f64));
        ph.push(parent.height[i] as f64);
    }
    let src = ParentVertices {
        u: &pu,
        v: &pv,
        h: &ph,
        normals: parent.normals.as_deref(),
    };

    let mut dedup = VertexDeduplicator::new(src.normals.is_some(), parent_vertex_count);

    // Stage 2: vertices already inside the kept half bypass the clipper.
    // Keyed by original index, so triangle processing below reuses them.
    for i in 0..parent_vertex_count {
        let u_inside = if keep_east {
            pu[i] >= HALF_COORD
        } else {
            pu[i] <= HALF_COORD
        };
        let v_inside = if keep_north {
            pv[i] >= HALF_COORD
        } else {
            pv[i] <= HALF_COORD
        };
        if u_inside && v_inside {
            dedup.insert_parent(i as u32, &src);
        }
    }

    // Stage 3: clip every non-skirt triangle on U, fan, clip on V, emit.
    let mut indices: Vec<u32> = Vec::with_capacity(parent.surface_index_count * 2);
    let mut u_steps: Vec<ClipStep> = Vec::new();
    let mut v_steps: Vec<ClipStep> = Vec::new();
    let mut u_polygon: Vec<ClipVertex> = Vec::new();
    let mut v_polygon: Vec<ClipVertex> = Vec::new();

    for tri in parent.surface_indices().chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        clip_axis(
            HALF_COORD,
            keep_east,
            [pu[i0], pu[i1], pu[i2]],
            &mut u_steps,
        );
        let corners = [
            ClipVertex::Indexed(tri[0]),
            ClipVertex::Indexed(tri[1]),
            ClipVertex::Indexed(tri[2]),
        ];
        polygon_from_steps(&u_steps, &corners, &mut u_polygon);
        if u_polygon.len() < 3 {
            continue;
        }

        for fan in 0..u_polygon.len() - 2 {
            let sub = [
                u_polygon[0].clone(),
                u_polygon[fan + 1].clone(),
                u_polygon[fan + 2].clone(),
            ];
            let v_values = [sub[0].v(&src), sub[1].v(&src), sub[2].v(&src)];
            clip_axis(HALF_COORD, keep_north, v_values, &mut v_steps);
            polygon_from_steps(&v_steps, &sub, &mut v_polygon);
            if v_polygon.len() < 3 {
                continue;
            }

            let anchor = dedup.emit(&v_polygon[0], &src);
            for fan_v in 0..v_polygon.len() - 2 {
                let second = dedup.emit(&v_polygon[fan_v + 1], &src);
                let third = dedup.emit(&v_polygon[fan_v + 2], &src);
                indices.push(anchor);
                indices.push(second);
                indices.push(third);
            }
        }
    }

    let out_normals = dedup.normals.take();
    let count = dedup.vertex_count();

    // Stage 4: remap the kept half into the child's full domain, classify
    // edge vertices, and renormalize heights to meters.
    let u_offset = if keep_east { -MAX_COORD } else { 0.0 };
    let v_offset = if keep_north { -MAX_COORD } else { 0.0 };
    let u_low = if keep_east { HALF_COORD } else { 0.0 };
    let u_high = if keep_east { MAX_COORD } else { HALF_COORD };
    let v_low = if keep_north { HALF_COORD } else { 0.0 };
    let v_high = if keep_north { MAX_COORD } else { HALF_COORD };

    let mut west_indices = Vec::new();
    let mut south_indices = Vec::new();
    let mut east_indices = Vec::new();
    let mut north_indices = Vec::new();
    let mut new_u = Vec::with_capacity(count);
    let mut new_v = Vec::with_capacity(count);
    let mut heights = Vec::with_capacity(count);
    let mut minimum_height = f64::INFINITY;
    let mut maximum_height = f64::NEG_INFINITY;
    let parent_minimum = parent.minimum_height as f64;
    let parent_range = parent.maximum_height as f64 - parent_minimum;

    for i in 0..count {
        // Coordinates round to integers before the doubling, so interpolated
        // crossings requantize from whole parent coordinates.
        let u = remap_axis(dedup.u[i].round(), u_low, u_high, u_offset);
        let v = remap_axis(dedup.v[i].round(), v_low, v_high, v_offset);
        if u == 0.0 {
            west_indices.push(i as u32);
        } else if u == MAX_COORD {
            east_indices.push(i as u32);
        }
        if v == 0.0 {
            south_indices.push(i as u32);
        } else if v == MAX_COORD {
            north_indices.push(i as u32);
        }
        new_u.push(u);
        new_v.push(v);

        let height = parent_minimum + parent_range * (dedup.h[i] / MAX_COORD);
        minimum_height = minimum_height.min(height);
        maximum_height = maximum_height.max(height);
        heights.push(height);
    }
    if count == 0 {
        minimum_height = parent_minimum;
        maximum_height = parent_minimum;
    }

    // Stage 5: real-world positions exist only to feed the bounding volumes.
    let mut positions = Vec::with_capacity(count);
    for i in 0..count {
        let carto =
            request
                .child_rectangle
                .lerp(new_u[i] / MAX_COORD, new_v[i] / MAX_COORD, heights[i]);
        positions.push(request.ellipsoid.cartographic_to_cartesian(&carto));
    }
    let bounding_sphere = BoundingSphere::from_points(&positions);
    let oriented_bounding_box = OrientedBoundingBox::from_rectangle(
        &request.child_rectangle,
        minimum_height,
        maximum_height,
        &request.ellipsoid,
    );
    let occlusion_ellipsoid = if minimum_height < 0.0 {
        request.ellipsoid.shrunk_by(-minimum_height)
    } else {
        request.ellipsoid
    };
    let horizon_occlusion_point = if positions.is_empty() {
        None
    } else {
        horizon_culling_point(&occlusion_ellipsoid, bounding_sphere.center, &positions)
    };

    // Stage 6: requantize into the child domain and pack.
    let height_range = maximum_height - minimum_height;
    let mut out_u = Vec::with_capacity(count);
    let mut out_v = Vec::with_capacity(count);
    let mut out_height = Vec::with_capacity(count);
    for i in 0..count {
        out_u.push(new_u[i].round() as u16);
        out_v.push(new_v[i].round() as u16);
        let quantized = if height_range > 0.0 {
            ((heights[i] - minimum_height) / height_range * MAX_COORD).round() as u16
        } else {
            // Flat tile: every height is the minimum.
            0
        };
        out_height.push(quantized);
    }

    log::trace!(
        "upsampled {:?}: {} -> {} vertices, {} -> {} triangles",
        request.quadrant,
        parent_vertex_count,
        count,
        parent.surface_index_count / 3,
        indices.len() / 3,
    );

    let surface_index_count = indices.len();
    Ok(UpsampledTile {
        mesh: QuantizedMesh {
            u: out_u,
            v: out_v,
            height: out_height,
            normals: out_normals,
            indices,
            surface_index_count,
            minimum_height: minimum_height as f32,
            maximum_height: maximum_height as f32,
        },
        west_indices,
        south_indices,
        east_indices,
        north_indices,
        bounding_sphere,
        oriented_bounding_box,
        horizon_occlusion_point,
    })
}
