use itertools::Itertools;
use std::fmt;

use math::{Vec3, Vector};

/// Ordered, open sequence of points. The closing edge from the last point back to the first is
/// implied, not stored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub points: Vec<Vec3>,
}

impl Polygon {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Iterates over all edges `(start, end)`, including the closing one.
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.points
            .iter()
            .copied()
            .circular_tuple_windows::<(_, _)>()
    }

    /// Newell's method: a vector normal to the polygon whose length is twice the enclosed area.
    fn area_vector(&self) -> Vec3 {
        self.edges()
            .map(|(a, b)| a.cross(b))
            .fold(Vec3::ZERO, |sum, v| sum + v)
    }

    /// Area of a planar polygon; the polygon must not self-intersect.
    pub fn area(&self) -> f32 {
        0.5 * self.area_vector().length()
    }

    /// Unit normal following the winding order (counter-clockwise seen from the front).
    /// `None` for degenerate polygons with zero area.
    pub fn normal(&self) -> Option<Vec3> {
        self.area_vector().normalized().ok()
    }

    /// Average of the vertices.
    pub fn centroid(&self) -> Option<Vec3> {
        if self.is_empty() {
            None
        } else {
            let sum = self.points.iter().fold(Vector::ZERO, |sum, p| sum + *p);
            Some(sum / self.len() as f32)
        }
    }

    pub fn perimeter(&self) -> f32 {
        self.edges().map(|(a, b)| a.distance_to(b)).sum()
    }
}

impl From<Vec<Vec3>> for Polygon {
    fn from(points: Vec<Vec3>) -> Self {
        Self::new(points)
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write!(f, "[")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.p$}", p, p = precision)?;
        }
        write!(f, "]")
    }
}
