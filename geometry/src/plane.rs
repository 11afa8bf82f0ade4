use std::fmt;

use math::hcm::make_coord_system;
use math::{MathResult, Vec3};

use crate::polygon::Polygon;

/// Infinite plane `normal . p + d = 0`.
///
/// The normal is expected to be unit-length but this is not enforced; `signed_distance()` is a
/// true distance only for unit normals. The side the normal points to is the positive half-space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    pub fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Plane through `point` with the given `normal`.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self::new(normal, -normal.dot(point))
    }

    /// Plane through three points, with a unit normal following the right-hand rule
    /// (counter-clockwise `a, b, c` seen from the positive side). Fails with `DegenerateVector`
    /// if the points are collinear.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> MathResult<Self> {
        let normal = (b - a).cross(c - a).normalized()?;
        Ok(Self::from_point_normal(a, normal))
    }

    /// `normal . p + d`: positive on the side the normal points to, zero on the plane.
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }

    /// Same plane, facing the other way.
    pub fn flipped(self) -> Self {
        Self::new(-self.normal, -self.d)
    }

    /// Rescales the equation so the normal is unit-length.
    pub fn normalized(self) -> MathResult<Self> {
        let length = self.normal.length();
        let normal = self.normal.normalized()?;
        Ok(Self::new(normal, self.d / length))
    }

    /// Orthogonal projection of `p` onto the plane. The normal must be non-zero.
    pub fn project(&self, p: Vec3) -> Vec3 {
        p - self.normal * (self.signed_distance(p) / self.normal.length_squared())
    }

    /// Square of side `2 * half_extent` lying in the plane, centered on the projection of
    /// `center` and wound counter-clockwise around the normal. The normal must be unit-length.
    pub fn quad(&self, center: Vec3, half_extent: f32) -> Polygon {
        let (u, v) = make_coord_system(self.normal);
        let (u, v) = (u * half_extent, v * half_extent);
        let c = self.project(center);
        Polygon::new(vec![c - u - v, c + u - v, c + u + v, c - u + v])
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write!(
            f,
            "{:.p$} . p + {:.p$} = 0",
            self.normal,
            self.d,
            p = precision
        )
    }
}
