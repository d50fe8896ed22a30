use criterion::{Criterion, black_box, criterion_group, criterion_main};

use orogen_geom::{Ellipsoid, Rectangle};
use orogen_tile::{MAX_QUANTIZED_COORD, Quadrant, QuantizedMesh};
use orogen_upsample::{UpsampleRequest, upsample};

/// Regular terrain-style parent: `grid` vertices per side, rolling heights.
fn make_parent(grid: usize, with_normals: bool) -> QuantizedMesh {
    let step = MAX_QUANTIZED_COORD as f64 / (grid - 1) as f64;
    let mut u = Vec::with_capacity(grid * grid);
    let mut v = Vec::with_capacity(grid * grid);
    let mut h = Vec::with_capacity(grid * grid);
    for row in 0..grid {
        for col in 0..grid {
            u.push((col as f64 * step).round() as u16);
            v.push((row as f64 * step).round() as u16);
            let wave = ((col as f64 * 0.23).sin() + (row as f64 * 0.17).cos() + 2.0) / 4.0;
            h.push((wave * MAX_QUANTIZED_COORD as f64) as u16);
        }
    }
    let normals = with_normals.then(|| {
        let mut out = Vec::with_capacity(grid * grid * 2);
        for i in 0..grid * grid {
            let n = orogen_geom::Vec3::new((i as f64 * 0.05).sin() * 0.3, 0.2, 1.0).normalized();
            out.extend_from_slice(&orogen_geom::oct_encode(n));
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
        height: h,
        normals,
        indices,
        surface_index_count,
        minimum_height: 200.0,
        maximum_height: 1400.0,
    }
}

fn bench_upsample_quadrant(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsample_quadrant");
    let rectangle = Rectangle::new(0.0, 0.0, 1f64.to_radians(), 1f64.to_radians());
    let ellipsoid = Ellipsoid::wgs84();
    for grid in [65usize, 129] {
        let parent = make_parent(grid, false);
        group.bench_function(format!("southeast_{grid}x{grid}"), |b| {
            b.iter(|| {
                let request = UpsampleRequest {
                    parent: black_box(&parent),
                    child_rectangle: rectangle.subdivide(true, false),
                    ellipsoid,
                    quadrant: Quadrant::Southeast,
                };
                black_box(upsample(&request).unwrap());
            })
        });
    }
    group.finish();
}

fn bench_upsample_with_normals(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsample_quadrant_normals");
    let rectangle = Rectangle::new(0.0, 0.0, 1f64.to_radians(), 1f64.to_radians());
    let ellipsoid = Ellipsoid::wgs84();
    let parent = make_parent(65, true);
    group.bench_function("southeast_65x65_oct_normals", |b| {
        b.iter(|| {
            let request = UpsampleRequest {
                parent: black_box(&parent),
                child_rectangle: rectangle.subdivide(true, false),
                ellipsoid,
                quadrant: Quadrant::Southeast,
            };
            black_box(upsample(&request).unwrap());
        })
    });
    group.finish();
}

fn bench_all_four_children(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsample_all_children");
    let rectangle = Rectangle::new(0.0, 0.0, 1f64.to_radians(), 1f64.to_radians());
    let ellipsoid = Ellipsoid::wgs84();
    let parent = make_parent(65, false);
    group.bench_function("four_quadrants_65x65", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for quadrant in Quadrant::ALL {
                let request = UpsampleRequest {
                    parent: &parent,
                    child_rectangle: rectangle.subdivide(quadrant.is_east(), quadrant.is_north()),
                    ellipsoid,
                    quadrant,
                };
                total += upsample(&request).unwrap().mesh.vertex_count();
            }
            black_box(total);
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_upsample_quadrant,
    bench_upsample_with_normals,
    bench_all_four_children
);
criterion_main!(benches);
