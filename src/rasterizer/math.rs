//! 2D math for the rasterizer
//! Points, homogeneous 3x3 affine transforms and barycentric weights

use std::ops::{Add, Mul, Sub};
use serde::{Deserialize, Serialize};

/// 2D point / vector in device coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 2D cross product (z component of the 3D cross product)
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }
}

/// Homogeneous 2D affine transform (3x3, row-major)
///
/// The bottom row stays `(0, 0, 1)` for every transform built from
/// [`Transform2::scale`], [`Transform2::translate`] and [`Transform2::rotate`].
/// Those operations right-multiply: `self = self * incremental`, so the
/// newest operation is applied to the point first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2 {
    pub m: [[f32; 3]; 3],
}

impl Transform2 {
    pub const IDENTITY: Transform2 = Transform2 {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn from_scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub fn from_translation(tx: f32, ty: f32) -> Self {
        Self {
            m: [[1.0, 0.0, tx], [0.0, 1.0, ty], [0.0, 0.0, 1.0]],
        }
    }

    /// Counter-clockwise rotation, angle in degrees
    pub fn from_rotation(angle_degrees: f32) -> Self {
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        Self {
            m: [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Reset to identity
    pub fn load_identity(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        *self = *self * Self::from_scale(sx, sy);
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        *self = *self * Self::from_translation(tx, ty);
    }

    pub fn rotate(&mut self, angle_degrees: f32) {
        *self = *self * Self::from_rotation(angle_degrees);
    }

    /// Matrix product `self * other`
    pub fn multiply(&self, other: &Transform2) -> Transform2 {
        let mut out = [[0.0f32; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j];
            }
        }
        Transform2 { m: out }
    }

    /// Transform a point (homogeneous w = 1)
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2 {
            x: self.m[0][0] * p.x + self.m[0][1] * p.y + self.m[0][2],
            y: self.m[1][0] * p.x + self.m[1][1] * p.y + self.m[1][2],
        }
    }

    /// Element-wise comparison within `eps`
    pub fn approx_eq(&self, other: &Transform2, eps: f32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform2 {
    type Output = Transform2;
    fn mul(self, other: Transform2) -> Transform2 {
        self.multiply(&other)
    }
}

impl Mul<Vec2> for Transform2 {
    type Output = Vec2;
    fn mul(self, p: Vec2) -> Vec2 {
        self.apply(p)
    }
}

/// Barycentric weights of `p` with respect to triangle (a, b, c)
///
/// Returns `(wa, wb, wc)` with `wa + wb + wc == 1`, or `None` for a
/// zero-area or non-finite triangle.
pub fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<(f32, f32, f32)> {
    Barycentric::new(a, b, c).map(|bc| bc.weights(p))
}

/// Precomputed inverse of the 2x2 system `[a - c, b - c] * (wa, wb) = p - c`
///
/// Built once per triangle and evaluated per pixel.
#[derive(Debug, Clone, Copy)]
pub struct Barycentric {
    c: Vec2,
    // Rows of the inverse matrix, already divided by the determinant
    inv: [[f32; 2]; 2],
}

impl Barycentric {
    /// `None` when the matrix is singular or not finite
    pub fn new(a: Vec2, b: Vec2, c: Vec2) -> Option<Self> {
        let ac = a - c;
        let bc = b - c;
        let det = ac.cross(bc);
        if !det.is_finite() || det.abs() <= f32::EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Self {
            c,
            inv: [
                [bc.y * inv_det, -bc.x * inv_det],
                [-ac.y * inv_det, ac.x * inv_det],
            ],
        })
    }

    pub fn weights(&self, p: Vec2) -> (f32, f32, f32) {
        let d = p - self.c;
        let wa = self.inv[0][0] * d.x + self.inv[0][1] * d.y;
        let wb = self.inv[1][0] * d.x + self.inv[1][1] * d.y;
        (wa, wb, 1.0 - wa - wb)
    }
}
