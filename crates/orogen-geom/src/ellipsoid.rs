use crate::{Cartographic, Vec3};

/// Reference ellipsoid with precomputed reciprocal radii.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    radii: Vec3,
    radii_squared: Vec3,
    one_over_radii: Vec3,
    one_over_radii_squared: Vec3,
}

impl Ellipsoid {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        let radii = Vec3::new(x, y, z);
        Self {
            radii,
            radii_squared: Vec3::new(x * x, y * y, z * z),
            one_over_radii: Vec3::new(
                if x == 0.0 { 0.0 } else { 1.0 / x },
                if y == 0.0 { 0.0 } else { 1.0 / y },
                if z == 0.0 { 0.0 } else { 1.0 / z },
            ),
            one_over_radii_squared: Vec3::new(
                if x == 0.0 { 0.0 } else { 1.0 / (x * x) },
                if y == 0.0 { 0.0 } else { 1.0 / (y * y) },
                if z == 0.0 { 0.0 } else { 1.0 / (z * z) },
            ),
        }
    }

    pub fn wgs84() -> Self {
        Self::new(6378137.0, 6378137.0, 6356752.3142451793)
    }

    #[inline]
    pub fn radii(&self) -> Vec3 {
        self.radii
    }

    #[inline]
    pub fn minimum_radius(&self) -> f64 {
        self.radii.x.min(self.radii.y).min(self.radii.z)
    }

    /// Surface normal of the geodetic (not geocentric) latitude/longitude.
    #[inline]
    pub fn geodetic_surface_normal(&self, c: &Cartographic) -> Vec3 {
        let cos_lat = c.latitude.cos();
        Vec3::new(
            cos_lat * c.longitude.cos(),
            cos_lat * c.longitude.sin(),
            c.latitude.sin(),
        )
    }

    pub fn cartographic_to_cartesian(&self, c: &Cartographic) -> Vec3 {
        let n = self.geodetic_surface_normal(c);
        let k = self.radii_squared.mul_components(n);
        let gamma = n.dot(k).sqrt();
        k / gamma + n * c.height
    }

    /// Scales a cartesian position so the ellipsoid becomes the unit sphere.
    #[inline]
    pub fn to_scaled_space(&self, p: Vec3) -> Vec3 {
        p.mul_components(self.one_over_radii)
    }

    /// Inverse of [`Ellipsoid::to_scaled_space`].
    #[inline]
    pub fn from_scaled_space(&self, p: Vec3) -> Vec3 {
        p.mul_components(self.radii)
    }

    /// Returns an ellipsoid uniformly shrunk toward the center by `offset`
    /// meters along each axis. Used to keep horizon culling conservative for
    /// geometry below the reference surface.
    pub fn shrunk_by(&self, offset: f64) -> Ellipsoid {
        Ellipsoid::new(
            (self.radii.x - offset).max(0.0),
            (self.radii.y - offset).max(0.0),
            (self.radii.z - offset).max(0.0),
        )
    }
}
