//! Demo driver: synthesizes a parent tile and upsamples all four children
//! through the worker runtime.

mod synth;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use orogen_geom::{Ellipsoid, Rectangle};
use orogen_runtime::{Runtime, UpsampleJob};
use orogen_tile::Quadrant;

#[derive(Parser, Debug)]
#[command(name = "orogen", about = "Quantized terrain tile upsampling demo")]
struct Args {
    /// Vertices per side of the synthetic parent grid.
    #[arg(long, default_value_t = 65)]
    grid: usize,
    /// Noise seed for the synthetic heightfield.
    #[arg(long, default_value_t = 7)]
    seed: i32,
    /// Worker threads; defaults to available parallelism minus one.
    #[arg(long)]
    workers: Option<usize>,
    /// Generate per-vertex oct-encoded normals on the parent.
    #[arg(long, default_value_t = false)]
    normals: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let parent = Arc::new(synth::noise_tile(
        args.grid,
        args.seed,
        800.0,
        400.0,
        args.normals,
    ));
    log::info!(
        "parent tile: {} vertices, {} triangles, heights {:.1}..{:.1} m",
        parent.vertex_count(),
        parent.surface_index_count / 3,
        parent.minimum_height,
        parent.maximum_height,
    );

    // One degree of longitude/latitude starting at the origin.
    let parent_rectangle = Rectangle::new(0.0, 0.0, 1f64.to_radians(), 1f64.to_radians());
    let ellipsoid = Ellipsoid::wgs84();

    let runtime = Runtime::new(args.workers);
    for (job_id, quadrant) in Quadrant::ALL.into_iter().enumerate() {
        runtime.submit(UpsampleJob {
            job_id: job_id as u64,
            parent: parent.clone(),
            child_rectangle: parent_rectangle.subdivide(quadrant.is_east(), quadrant.is_north()),
            ellipsoid,
            quadrant,
        });
    }

    let mut completed = 0;
    while completed < Quadrant::ALL.len() {
        let Some(out) = runtime.recv_timeout(Duration::from_secs(30)) else {
            log::error!("upsample runtime stalled");
            std::process::exit(1);
        };
        completed += 1;
        match out.result {
            Ok(tile) => log::info!(
                "{:?}: {} vertices, {} triangles, heights {:.1}..{:.1} m, \
                 sphere radius {:.0} m, edges w/s/e/n {}/{}/{}/{}, {} ms",
                out.quadrant,
                tile.mesh.vertex_count(),
                tile.mesh.surface_index_count / 3,
                tile.mesh.minimum_height,
                tile.mesh.maximum_height,
                tile.bounding_sphere.radius,
                tile.west_indices.len(),
                tile.south_indices.len(),
                tile.east_indices.len(),
                tile.north_indices.len(),
                out.t_total_ms,
            ),
            Err(e) => {
                log::error!("{:?}: {}", out.quadrant, e);
                std::process::exit(1);
            }
        }
    }
}
