use math::{Mat4, Radian, Vec3};
use std::fmt;
use std::ops::Mul;

use crate::plane::Plane;
use crate::polygon::Polygon;
use crate::ray::Ray;

/// An invertible affine transform, stored together with its inverse so that neither direction
/// ever needs a matrix inversion at use time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    forward: Mat4,
    inverse: Mat4,
}

pub trait Transform<T> {
    fn apply(&self, x: T) -> T;
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            forward: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
        }
    }

    /// Wraps an arbitrary matrix. Returns `None` if it is singular.
    pub fn from_matrix(forward: Mat4) -> Option<Self> {
        let inverse = forward.try_inverse()?;
        Some(Self { forward, inverse })
    }

    pub fn translater(t: Vec3) -> Self {
        Self {
            forward: Mat4::translater(t),
            inverse: Mat4::translater(-t),
        }
    }
    pub fn rotater(axis: Vec3, angle: impl Into<Radian>) -> Self {
        let forward = Mat4::rotater(axis, angle);
        Self {
            forward,
            inverse: forward.transpose(),
        }
    }
    pub fn rotater_x(angle: impl Into<Radian>) -> Self {
        let forward = Mat4::rotater_x(angle);
        Self {
            forward,
            inverse: forward.transpose(),
        }
    }
    pub fn rotater_y(angle: impl Into<Radian>) -> Self {
        let forward = Mat4::rotater_y(angle);
        Self {
            forward,
            inverse: forward.transpose(),
        }
    }
    pub fn rotater_z(angle: impl Into<Radian>) -> Self {
        let forward = Mat4::rotater_z(angle);
        Self {
            forward,
            inverse: forward.transpose(),
        }
    }
    /// Non-uniform scale. Every component of `scale` must be nonzero.
    pub fn scaler(scale: Vec3) -> Self {
        Self {
            forward: Mat4::nonuniform_scale(scale),
            inverse: Mat4::nonuniform_scale(scale.map(f32::recip)),
        }
    }

    pub fn inverse(&self) -> Self {
        Self {
            forward: self.inverse,
            inverse: self.forward,
        }
    }
    pub fn forward_matrix(&self) -> &Mat4 {
        &self.forward
    }
    pub fn inverse_matrix(&self) -> &Mat4 {
        &self.inverse
    }

    /// Applies Translate(t) onto the transform, and returns Translate(t) * self.
    pub fn translate(self, t: Vec3) -> Self {
        Self::translater(t) * self
    }

    /// Applies rotation onto the transform, and returns Rotate(angle) * self.
    pub fn rotate_x(self, angle: impl Into<Radian>) -> Self {
        Self::rotater_x(angle) * self
    }
    pub fn rotate_y(self, angle: impl Into<Radian>) -> Self {
        Self::rotater_y(angle) * self
    }
    pub fn rotate_z(self, angle: impl Into<Radian>) -> Self {
        Self::rotater_z(angle) * self
    }

    /// Transforms a position; `Transform<Vec3>::apply()` treats its argument as a direction.
    pub fn apply_point(&self, p: Vec3) -> Vec3 {
        self.forward.transform_point(p)
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for AffineTransform {
    type Output = AffineTransform;
    fn mul(self, rhs: Self) -> Self::Output {
        // self * rhs -> self.forward * rhs.forward, rhs.inverse * self.inverse.
        Self {
            forward: self.forward * rhs.forward,
            inverse: rhs.inverse * self.inverse,
        }
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.forward)
    }
}

// Transforms on:
// - Vec3 (as a direction)
// - Ray
// - Plane
// - Polygon
// -------------------------------------------------------------------------------------------------

impl Transform<Vec3> for AffineTransform {
    fn apply(&self, v: Vec3) -> Vec3 {
        self.forward.transform_vector(v)
    }
}
impl Transform<Ray> for AffineTransform {
    fn apply(&self, r: Ray) -> Ray {
        Ray::new(self.apply_point(r.origin), self.apply(r.dir)).with_extent(r.t_max)
    }
}
impl Transform<Plane> for AffineTransform {
    /// Planes transform by the inverse transpose; the result is renormalized.
    fn apply(&self, plane: Plane) -> Plane {
        let coefficients = self.inverse.transpose() * plane.normal.extend(plane.d);
        let transformed = Plane::new(coefficients.truncate(), coefficients[3]);
        transformed.normalized().unwrap_or(transformed)
    }
}
impl Transform<Polygon> for AffineTransform {
    fn apply(&self, polygon: Polygon) -> Polygon {
        polygon
            .points
            .into_iter()
            .map(|p| self.apply_point(p))
            .collect::<Vec<_>>()
            .into()
    }
}
