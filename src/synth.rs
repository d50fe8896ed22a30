//! Synthetic parent tiles for the demo driver.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use orogen_geom::{Vec3, oct_encode};
use orogen_tile::{MAX_QUANTIZED_COORD, QuantizedMesh};

/// Builds a `grid` x `grid` regular parent tile with FBm noise heights and,
/// optionally, finite-difference normals.
pub fn noise_tile(
    grid: usize,
    seed: i32,
    base_height: f32,
    relief: f32,
    with_normals: bool,
) -> QuantizedMesh {
    assert!(grid >= 2, "grid needs at least 2 vertices per side");

    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_fractal_type(Some(FractalType::FBm));
    noise.set_fractal_octaves(Some(5));
    noise.set_frequency(Some(0.05));

    let mut heights = vec![0.0f32; grid * grid];
    let mut minimum_height = f32::INFINITY;
    let mut maximum_height = f32::NEG_INFINITY;
    for row in 0..grid {
        for col in 0..grid {
            let h = base_height + relief * noise.get_noise_2d(col as f32, row as f32);
            minimum_height = minimum_height.min(h);
            maximum_height = maximum_height.max(h);
            heights[row * grid + col] = h;
        }
    }

    let max_coord = MAX_QUANTIZED_COORD as f64;
    let step = max_coord / (grid - 1) as f64;
    let height_range = maximum_height - minimum_height;

    let mut u = Vec::with_capacity(grid * grid);
    let mut v = Vec::with_capacity(grid * grid);
    let mut height = Vec::with_capacity(grid * grid);
    for row in 0..grid {
        for col in 0..grid {
            u.push((col as f64 * step).round() as u16);
            v.push((row as f64 * step).round() as u16);
            let q = if height_range > 0.0 {
                ((heights[row * grid + col] - minimum_height) / height_range
                    * MAX_QUANTIZED_COORD as f32)
                    .round() as u16
            } else {
                0
            };
            height.push(q);
        }
    }

    let normals = with_normals.then(|| {
        let mut out = Vec::with_capacity(grid * grid * 2);
        let sample = |row: usize, col: usize| heights[row * grid + col] as f64;
        for row in 0..grid {
            for col in 0..grid {
                let left = sample(row, col.saturating_sub(1));
                let right = sample(row, (col + 1).min(grid - 1));
                let south = sample(row.saturating_sub(1), col);
                let north = sample((row + 1).min(grid - 1), col);
                let n = Vec3::new(left - right, south - north, 2.0 * step).normalized();
                let encoded = oct_encode(n);
                out.push(encoded[0]);
                out.push(encoded[1]);
            }
        }
        out
    });

    let mut indices = Vec::with_capacity((grid - 1) * (grid - 1) * 6);
    for row in 0..grid - 1 {
        for col in 0..grid - 1 {
            let i00 = (row * grid + col) as u32;
            let i10 = i00 + 1;
            let i01 = i00 + grid as u32;
            let i11 = i01 + 1;
            indices.extend_from_slice(&[i00, i10, i11, i00, i11, i01]);
        }
    }

    let surface_index_count = indices.len();
    QuantizedMesh {
        u,
        v,
        height,
        normals,
        indices,
        surface_index_count,
        minimum_height,
        maximum_height,
    }
}
