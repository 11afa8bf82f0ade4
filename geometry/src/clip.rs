use log::trace;

use crate::collision::{categorize_halfspace, line_segment_plane_intersection, Halfspace};
use crate::plane::Plane;
use crate::polygon::Polygon;

/// Clips `subject` against each of the `clippers` in turn (Sutherland-Hodgman) and returns the
/// part lying in the positive half-space of all of them.
///
/// Vertices coincident with a clipping plane are kept; an intersection vertex is inserted only
/// where an edge goes strictly from one side to the other. The result may be empty.
/// ```
/// use geometry::{clip, Plane, Polygon};
/// use math::{vec3, Vec3};
/// let triangle = Polygon::new(vec![
///     vec3(-1.0, 0.0, 0.0),
///     vec3(1.0, 0.0, 0.0),
///     vec3(1.0, 2.0, 0.0),
/// ]);
/// let clipped = clip(&triangle, &[Plane::new(Vec3::X, 0.0)]);
/// assert_eq!(clipped.len(), 4);
/// ```
pub fn clip(subject: &Polygon, clippers: &[Plane]) -> Polygon {
    let mut polygon = subject.clone();
    for (i, plane) in clippers.iter().enumerate() {
        if polygon.is_empty() {
            break;
        }
        polygon = clip_by_plane(&polygon, plane);
        trace!("clip plane #{} ({}): {} vertices left", i, plane, polygon.len());
    }
    polygon
}

fn clip_by_plane(subject: &Polygon, plane: &Plane) -> Polygon {
    let mut output = Vec::with_capacity(subject.len() + 1);
    for (start, end) in subject.edges() {
        let from = categorize_halfspace(start, plane);
        let to = categorize_halfspace(end, plane);
        let crosses = matches!(
            (from, to),
            (Halfspace::Positive, Halfspace::Negative) | (Halfspace::Negative, Halfspace::Positive)
        );
        if crosses {
            if let Some(hit) = line_segment_plane_intersection(start, end, plane) {
                output.push(hit.point);
            }
        }
        if to != Halfspace::Negative {
            output.push(end);
        }
    }
    Polygon::new(output)
}
