//! Geodetic and ellipsoid math for terrain crates (no renderer dependency).
#![forbid(unsafe_code)]

mod ellipsoid;
mod normal;
mod volumes;

pub use ellipsoid::Ellipsoid;
pub use normal::{oct_decode, oct_encode};
pub use volumes::{BoundingSphere, OrientedBoundingBox, horizon_culling_point};

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }

    #[inline]
    pub fn lerp(self, rhs: Vec3, t: f64) -> Vec3 {
        self + (rhs - self) * t
    }

    /// Component-wise multiplication.
    #[inline]
    pub fn mul_components(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Geodetic position: longitude/latitude in radians, height in meters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cartographic {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl Cartographic {
    #[inline]
    pub const fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }
}

/// Geographic rectangle in radians. East > west, north > south.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Rectangle {
    #[inline]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    #[inline]
    pub fn center(&self) -> Cartographic {
        Cartographic::new(
            (self.west + self.east) * 0.5,
            (self.south + self.north) * 0.5,
            0.0,
        )
    }

    /// Maps normalized coordinates (u west→east, v south→north, both in [0,1])
    /// into this rectangle at the given height.
    #[inline]
    pub fn lerp(&self, u: f64, v: f64, height: f64) -> Cartographic {
        Cartographic::new(
            self.west + u * self.width(),
            self.south + v * self.height(),
            height,
        )
    }

    /// Returns one of the four child quadrants of this rectangle.
    pub fn subdivide(&self, east: bool, north: bool) -> Rectangle {
        let mid_lon = (self.west + self.east) * 0.5;
        let mid_lat = (self.south + self.north) * 0.5;
        Rectangle {
            west: if east { mid_lon } else { self.west },
            east: if east { self.east } else { mid_lon },
            south: if north { mid_lat } else { self.south },
            north: if north { self.north } else { mid_lat },
        }
    }
}
