//! Bounding volumes and horizon culling for terrain tiles.

use crate::{Ellipsoid, Rectangle, Vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f64,
}

impl BoundingSphere {
    /// Ritter-style sphere: seed from the most separated axis extrema, then
    /// grow to cover stragglers.
    pub fn from_points(points: &[Vec3]) -> BoundingSphere {
        let Some(&first) = points.first() else {
            return BoundingSphere::default();
        };

        let mut min_x = first;
        let mut min_y = first;
        let mut min_z = first;
        let mut max_x = first;
        let mut max_y = first;
        let mut max_z = first;
        for &p in points {
            if p.x < min_x.x {
                min_x = p;
            }
            if p.y < min_y.y {
                min_y = p;
            }
            if p.z < min_z.z {
                min_z = p;
            }
            if p.x > max_x.x {
                max_x = p;
            }
            if p.y > max_y.y {
                max_y = p;
            }
            if p.z > max_z.z {
                max_z = p;
            }
        }

        let span_x = (max_x - min_x).length_squared();
        let span_y = (max_y - min_y).length_squared();
        let span_z = (max_z - min_z).length_squared();
        let (mut a, mut b) = (min_x, max_x);
        if span_y > span_x && span_y > span_z {
            (a, b) = (min_y, max_y);
        } else if span_z > span_x && span_z > span_y {
            (a, b) = (min_z, max_z);
        }

        let mut center = (a + b) * 0.5;
        let mut radius_sq = (b - center).length_squared();
        let mut radius = radius_sq.sqrt();

        for &p in points {
            let d_sq = (p - center).length_squared();
            if d_sq > radius_sq {
                let d = d_sq.sqrt();
                radius = (radius + d) * 0.5;
                radius_sq = radius * radius;
                // Shift the center toward the outlier just enough to cover it.
                center = center + (p - center) * ((d - radius) / d);
            }
        }

        BoundingSphere { center, radius }
    }

    #[inline]
    pub fn contains(&self, p: Vec3, slack: f64) -> bool {
        (p - self.center).length() <= self.radius + slack
    }
}

/// Box given by a center and three half-axis vectors (columns of a scaled
/// rotation).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientedBoundingBox {
    pub center: Vec3,
    pub half_axes: [Vec3; 3],
}

impl OrientedBoundingBox {
    /// Fits a box around the portion of the ellipsoid surface covered by
    /// `rectangle` between `minimum_height` and `maximum_height`, oriented
    /// along the east-north-up frame at the rectangle center.
    pub fn from_rectangle(
        rectangle: &Rectangle,
        minimum_height: f64,
        maximum_height: f64,
        ellipsoid: &Ellipsoid,
    ) -> OrientedBoundingBox {
        let center_carto = rectangle.center();
        let origin = ellipsoid.cartographic_to_cartesian(&center_carto);
        let up = ellipsoid.geodetic_surface_normal(&center_carto);
        let east = Vec3::new(-origin.y, origin.x, 0.0).normalized();
        let north = up.cross(east);

        // Corner and edge-midpoint samples at both height bounds bound the
        // surface well for tile-sized rectangles.
        let fractions: [(f64, f64); 9] = [
            (0.0, 0.0),
            (0.5, 0.0),
            (1.0, 0.0),
            (0.0, 0.5),
            (0.5, 0.5),
            (1.0, 0.5),
            (0.0, 1.0),
            (0.5, 1.0),
            (1.0, 1.0),
        ];

        let mut min = Vec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = -min;
        for &(fu, fv) in &fractions {
            for &h in &[minimum_height, maximum_height] {
                let p = ellipsoid.cartographic_to_cartesian(&rectangle.lerp(fu, fv, h));
                let d = p - origin;
                let local = Vec3::new(d.dot(east), d.dot(north), d.dot(up));
                min.x = min.x.min(local.x);
                min.y = min.y.min(local.y);
                min.z = min.z.min(local.z);
                max.x = max.x.max(local.x);
                max.y = max.y.max(local.y);
                max.z = max.z.max(local.z);
            }
        }

        let mid = (min + max) * 0.5;
        let half = (max - min) * 0.5;
        OrientedBoundingBox {
            center: origin + east * mid.x + north * mid.y + up * mid.z,
            half_axes: [east * half.x, north * half.y, up * half.z],
        }
    }
}

/// Computes the point whose visibility implies visibility of every input
/// position: a viewer below the horizon of this point sees none of them.
///
/// Works in the scaled space where the ellipsoid is the unit sphere. Returns
/// `None` when a position is too close to the center for a valid point.
pub fn horizon_culling_point(
    ellipsoid: &Ellipsoid,
    direction_to_point: Vec3,
    positions: &[Vec3],
) -> Option<Vec3> {
    let scaled_direction = ellipsoid.to_scaled_space(direction_to_point).normalized();
    if scaled_direction.length_squared() == 0.0 {
        return None;
    }

    let mut result_magnitude = 0.0f64;
    for &position in positions {
        let magnitude = position_magnitude(ellipsoid, position, scaled_direction)?;
        result_magnitude = result_magnitude.max(magnitude);
    }

    if !result_magnitude.is_finite() || result_magnitude <= 0.0 {
        return None;
    }
    Some(ellipsoid.from_scaled_space(scaled_direction * result_magnitude))
}

fn position_magnitude(
    ellipsoid: &Ellipsoid,
    position: Vec3,
    scaled_space_direction: Vec3,
) -> Option<f64> {
    let scaled = ellipsoid.to_scaled_space(position);
    let mut magnitude_squared = scaled.length_squared();
    let mut magnitude = magnitude_squared.sqrt();
    if magnitude == 0.0 {
        return None;
    }
    let direction = scaled / magnitude;

    // Positions inside the unit sphere behave as if on its surface.
    magnitude_squared = magnitude_squared.max(1.0);
    magnitude = magnitude.max(1.0);

    let cos_alpha = direction.dot(scaled_space_direction);
    let sin_alpha = direction.cross(scaled_space_direction).length();
    let cos_beta = 1.0 / magnitude;
    let sin_beta = (magnitude_squared - 1.0).sqrt() * cos_beta;

    let denominator = cos_alpha * cos_beta - sin_alpha * sin_beta;
    if denominator <= 0.0 {
        return None;
    }
    Some(1.0 / denominator)
}
