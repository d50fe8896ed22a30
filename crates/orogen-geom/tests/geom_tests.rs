use orogen_geom::{
    BoundingSphere, Cartographic, Ellipsoid, OrientedBoundingBox, Rectangle, Vec3,
    horizon_culling_point, oct_decode, oct_encode,
};

fn approx(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

fn vapprox(a: Vec3, b: Vec3, eps: f64) -> bool {
    approx(a.x, b.x, eps) && approx(a.y, b.y, eps) && approx(a.z, b.z, eps)
}

#[test]
fn rectangle_subdivide_covers_parent() {
    let rect = Rectangle::new(-0.2, 0.1, 0.4, 0.5);
    let sw = rect.subdivide(false, false);
    let ne = rect.subdivide(true, true);
    assert!(approx(sw.west, rect.west, 1e-12));
    assert!(approx(sw.east, ne.west, 1e-12));
    assert!(approx(sw.north, ne.south, 1e-12));
    assert!(approx(ne.east, rect.east, 1e-12));
    assert!(approx(sw.width() + ne.width(), rect.width(), 1e-12));
}

#[test]
fn rectangle_lerp_endpoints() {
    let rect = Rectangle::new(0.0, -0.5, 1.0, 0.5);
    let sw = rect.lerp(0.0, 0.0, 10.0);
    let ne = rect.lerp(1.0, 1.0, 20.0);
    assert!(approx(sw.longitude, 0.0, 1e-12));
    assert!(approx(sw.latitude, -0.5, 1e-12));
    assert!(approx(sw.height, 10.0, 1e-12));
    assert!(approx(ne.longitude, 1.0, 1e-12));
    assert!(approx(ne.latitude, 0.5, 1e-12));
}

#[test]
fn wgs84_cartesian_at_equator_and_pole() {
    let e = Ellipsoid::wgs84();
    let equator = e.cartographic_to_cartesian(&Cartographic::new(0.0, 0.0, 0.0));
    assert!(vapprox(equator, Vec3::new(6378137.0, 0.0, 0.0), 1e-6));

    let pole = e.cartographic_to_cartesian(&Cartographic::new(0.0, std::f64::consts::FRAC_PI_2, 0.0));
    assert!(vapprox(pole, Vec3::new(0.0, 0.0, 6356752.3142451793), 1e-6));

    // Height offsets move along the surface normal.
    let raised = e.cartographic_to_cartesian(&Cartographic::new(0.0, 0.0, 100.0));
    assert!(vapprox(raised, Vec3::new(6378237.0, 0.0, 0.0), 1e-6));
}

#[test]
fn scaled_space_round_trip() {
    let e = Ellipsoid::wgs84();
    let p = Vec3::new(4510731.0, 4510731.0, 0.0);
    let back = e.from_scaled_space(e.to_scaled_space(p));
    assert!(vapprox(back, p, 1e-6));
}

#[test]
fn oct_codec_axis_vectors() {
    for v in [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, -1.0),
    ] {
        let [x, y] = oct_encode(v);
        let decoded = oct_decode(x, y);
        assert!(
            decoded.dot(v) > 0.999,
            "axis {:?} decoded to {:?}",
            v,
            decoded
        );
    }
}

#[test]
fn oct_codec_tolerates_lower_hemisphere() {
    let v = Vec3::new(0.3, -0.4, -0.866).normalized();
    let [x, y] = oct_encode(v);
    let decoded = oct_decode(x, y);
    assert!(approx(decoded.length(), 1.0, 1e-9));
    assert!(decoded.dot(v) > 0.99);
}

#[test]
fn bounding_sphere_contains_inputs() {
    let points = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(0.0, 6.0, 0.0),
        Vec3::new(3.0, 3.0, -8.0),
        Vec3::new(-2.0, 5.0, 4.0),
    ];
    let sphere = BoundingSphere::from_points(&points);
    for p in points {
        assert!(sphere.contains(p, 1e-9), "{:?} escapes {:?}", p, sphere);
    }
}

#[test]
fn bounding_sphere_of_empty_set_is_default() {
    assert_eq!(BoundingSphere::from_points(&[]), BoundingSphere::default());
}

#[test]
fn horizon_point_on_unit_sphere() {
    let unit = Ellipsoid::new(1.0, 1.0, 1.0);
    let positions = [Vec3::new(2.0, 0.0, 0.0)];
    let point = horizon_culling_point(&unit, Vec3::new(1.0, 0.0, 0.0), &positions)
        .expect("valid horizon point");
    assert!(vapprox(point, Vec3::new(2.0, 0.0, 0.0), 1e-9));

    // A surface point needs no offset at all.
    let on_surface = [Vec3::new(1.0, 0.0, 0.0)];
    let point = horizon_culling_point(&unit, Vec3::new(1.0, 0.0, 0.0), &on_surface)
        .expect("valid horizon point");
    assert!(vapprox(point, Vec3::new(1.0, 0.0, 0.0), 1e-9));
}

#[test]
fn horizon_point_rejects_center() {
    let unit = Ellipsoid::new(1.0, 1.0, 1.0);
    assert!(horizon_culling_point(&unit, Vec3::new(1.0, 0.0, 0.0), &[Vec3::ZERO]).is_none());
}

#[test]
fn oriented_box_covers_rectangle_corners() {
    let e = Ellipsoid::wgs84();
    let rect = Rectangle::new(0.0, 0.0, 0.01, 0.01);
    let obb = OrientedBoundingBox::from_rectangle(&rect, -50.0, 400.0, &e);

    let axes: Vec<(Vec3, f64)> = obb
        .half_axes
        .iter()
        .map(|a| (a.normalized(), a.length()))
        .collect();
    for (fu, fv) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
        for h in [-50.0, 400.0] {
            let p = e.cartographic_to_cartesian(&rect.lerp(fu, fv, h));
            let d = p - obb.center;
            for &(axis, half_len) in &axes {
                assert!(
                    d.dot(axis).abs() <= half_len + 1e-3,
                    "corner ({fu},{fv},{h}) escapes box"
                );
            }
        }
    }
}
