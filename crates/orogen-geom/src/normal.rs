//! Oct-encoded unit normals: 3D unit vector <-> 2 bytes.

use crate::Vec3;

#[inline]
fn sign_not_zero(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

#[inline]
fn to_snorm8(v: f64) -> u8 {
    ((v.clamp(-1.0, 1.0) * 0.5 + 0.5) * 255.0).round() as u8
}

#[inline]
fn from_snorm8(v: u8) -> f64 {
    (v as f64) / 255.0 * 2.0 - 1.0
}

/// Encodes a unit vector into the 16-bit octahedral representation.
pub fn oct_encode(n: Vec3) -> [u8; 2] {
    let inv_l1 = 1.0 / (n.x.abs() + n.y.abs() + n.z.abs());
    let mut px = n.x * inv_l1;
    let mut py = n.y * inv_l1;
    if n.z < 0.0 {
        let (ox, oy) = (px, py);
        px = (1.0 - oy.abs()) * sign_not_zero(ox);
        py = (1.0 - ox.abs()) * sign_not_zero(oy);
    }
    [to_snorm8(px), to_snorm8(py)]
}

/// Decodes two oct-encoded bytes back to a unit vector.
pub fn oct_decode(x: u8, y: u8) -> Vec3 {
    let mut px = from_snorm8(x);
    let mut py = from_snorm8(y);
    let pz = 1.0 - px.abs() - py.abs();
    if pz < 0.0 {
        let ox = px;
        px = (1.0 - py.abs()) * sign_not_zero(ox);
        py = (1.0 - ox.abs()) * sign_not_zero(py);
    }
    Vec3::new(px, py, pz).normalized()
}
