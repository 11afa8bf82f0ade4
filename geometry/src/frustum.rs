use math::{Mat4, MathResult, Vec3, Vec4};

use crate::clip::clip;
use crate::collision::{categorize_halfspace, Halfspace};
use crate::plane::Plane;
use crate::polygon::Polygon;

/// The six planes bounding a view volume, normals pointing inwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    pub const LEFT: usize = 0;
    pub const RIGHT: usize = 1;
    pub const BOTTOM: usize = 2;
    pub const TOP: usize = 3;
    pub const NEAR: usize = 4;
    pub const FAR: usize = 5;

    /// Extracts the planes from a projection or view-projection matrix mapping the view volume
    /// into the `[-1, 1]^3` clip cube (Gribb-Hartmann). Planes are expressed in the input space of
    /// `m`: world space for a view-projection matrix, eye space for a bare projection.
    ///
    /// Fails with `DegenerateVector` if a plane collapses, which happens when `m` is singular.
    pub fn from_matrix(m: &Mat4) -> MathResult<Self> {
        let w = m.row(3);
        let plane = |v: Vec4| Plane::new(v.truncate(), v[3]).normalized();
        Ok(Self {
            planes: [
                plane(w + m.row(0))?,
                plane(w - m.row(0))?,
                plane(w + m.row(1))?,
                plane(w - m.row(1))?,
                plane(w + m.row(2))?,
                plane(w - m.row(2))?,
            ],
        })
    }

    /// Whether `p` is inside the volume or on its boundary.
    pub fn contains(&self, p: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| categorize_halfspace(p, plane) != Halfspace::Negative)
    }

    /// Part of `polygon` inside the volume.
    pub fn clip(&self, polygon: &Polygon) -> Polygon {
        clip(polygon, &self.planes)
    }
}
