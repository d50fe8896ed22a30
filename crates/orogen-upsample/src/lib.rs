//! Synthesizes one child quadrant of a quantized terrain tile from its parent
//! mesh, bridging the gap until the real higher-LOD tile arrives.
//!
//! The pipeline clips every surface triangle against the quantized midline on
//! both axes, deduplicates vertices created along shared clipped edges so the
//! child mesh stays watertight, requantizes the kept half into the child's own
//! coordinate domain, and derives the bounding volumes the renderer needs.
#![forbid(unsafe_code)]

mod assemble;
mod clip;
mod dedup;
mod vertex;

pub use assemble::{UpsampleError, UpsampleRequest, UpsampledTile, upsample};
pub use clip::{ClipStep, clip_axis};
pub use dedup::VertexDeduplicator;
pub use vertex::{ClipVertex, ParentVertices, VertexKey};
