/// Camera with an explicit basis, orbit/dolly controls and a choice of projection.
pub mod camera;
/// Sutherland-Hodgman clipping of polygons against planes.
pub mod clip;
/// Half-space classification and segment/ray-plane intersection.
pub mod collision;
/// View-volume planes extracted from a projection matrix.
pub mod frustum;
pub mod plane;
pub mod polygon;
pub mod ray;
pub mod transform;

pub use camera::{Camera, Projection};
pub use clip::clip;
pub use collision::{
    categorize_halfspace, line_segment_plane_intersection, ray_plane_intersection, Halfspace,
    Intersection,
};
pub use frustum::Frustum;
pub use plane::Plane;
pub use polygon::Polygon;
pub use ray::Ray;
pub use transform::{AffineTransform, Transform};
