use math::float::{lerp, Float, EPSILON};
use math::Vec3;

use crate::plane::Plane;
use crate::ray::Ray;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halfspace {
    /// The side the plane normal points to.
    Positive,
    Negative,
    /// Within `EPSILON` of the plane.
    Coincident,
}

/// Location of a hit, with the parameter `t` along the segment or ray that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Vec3,
    pub t: f32,
}

/// Classifies `point` against `plane`.
/// ```
/// use geometry::{categorize_halfspace, Halfspace, Plane};
/// use math::{vec3, Vec3};
/// let ground = Plane::new(Vec3::Y, 0.0);
/// assert_eq!(categorize_halfspace(vec3(0.0, 2.0, 0.0), &ground), Halfspace::Positive);
/// assert_eq!(categorize_halfspace(vec3(4.0, 0.0, 1.0), &ground), Halfspace::Coincident);
/// ```
pub fn categorize_halfspace(point: Vec3, plane: &Plane) -> Halfspace {
    let projection = plane.normal.dot(point);
    if (projection + plane.d).abs() < EPSILON {
        Halfspace::Coincident
    } else if projection > -plane.d {
        Halfspace::Positive
    } else {
        Halfspace::Negative
    }
}

/// Parameter along `origin + t * dir` at which the line meets the plane; `None` if parallel.
fn plane_crossing_t(origin: Vec3, dir: Vec3, plane: &Plane) -> Option<f32> {
    (-plane.signed_distance(origin)).try_divide(plane.normal.dot(dir))
}

/// Intersects the segment from `start` to `end` with `plane`.
///
/// `t` is the fraction of the way from `start` to `end`; a hit requires `0 < t <= 1`, so a segment
/// starting exactly on the plane does not count as crossing it. Segments parallel to the plane
/// never hit, even when they lie inside it.
pub fn line_segment_plane_intersection(
    start: Vec3,
    end: Vec3,
    plane: &Plane,
) -> Option<Intersection> {
    let t = plane_crossing_t(start, end - start, plane)?;
    if t > 0.0 && t <= 1.0 {
        Some(Intersection {
            point: lerp(start, end, t),
            t,
        })
    } else {
        None
    }
}

/// Intersects `ray` with `plane`, within the ray's extent `(0, t_max)`.
pub fn ray_plane_intersection(ray: &Ray, plane: &Plane) -> Option<Intersection> {
    let t = plane_crossing_t(ray.origin, ray.dir, plane)?;
    let t = ray.truncated_t(t)?;
    Some(Intersection {
        point: ray.position_at(t),
        t,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use math::{assert_close, vec3};

    fn ground() -> Plane {
        Plane::new(Vec3::Z, 0.0)
    }

    #[test]
    fn test_halfspace() {
        let plane = Plane::new(Vec3::X, -1.0);
        assert_eq!(
            categorize_halfspace(vec3(3.0, 0.0, 0.0), &plane),
            Halfspace::Positive
        );
        assert_eq!(
            categorize_halfspace(vec3(0.5, 9.0, 0.0), &plane),
            Halfspace::Negative
        );
        assert_eq!(
            categorize_halfspace(vec3(1.0 + 1e-7, -4.0, 2.0), &plane),
            Halfspace::Coincident
        );
        assert_eq!(
            categorize_halfspace(vec3(0.5, 9.0, 0.0), &plane.flipped()),
            Halfspace::Positive
        );
    }

    #[test]
    fn test_segment_crossing() {
        let hit =
            line_segment_plane_intersection(vec3(0.0, 0.0, -1.0), vec3(0.0, 0.0, 1.0), &ground())
                .unwrap();
        assert_close!(hit.point, Vec3::ZERO);
        assert_close!(hit.t, 0.5f32);

        let hit =
            line_segment_plane_intersection(vec3(2.0, 0.0, 3.0), vec3(2.0, 4.0, -1.0), &ground())
                .unwrap();
        assert_close!(hit.point, vec3(2.0, 3.0, 0.0));
    }

    #[test]
    fn test_segment_misses() {
        // Both ends above the plane.
        assert_eq!(
            line_segment_plane_intersection(vec3(0.0, 0.0, 1.0), vec3(0.0, 0.0, 3.0), &ground()),
            None
        );
        // Parallel.
        assert_eq!(
            line_segment_plane_intersection(vec3(0.0, 0.0, 1.0), vec3(5.0, 0.0, 1.0), &ground()),
            None
        );
        // Starts on the plane: t = 0 is excluded, t = 1 is included.
        let plane = ground();
        assert_eq!(
            line_segment_plane_intersection(Vec3::ZERO, Vec3::Z, &plane),
            None
        );
        let end_hit = line_segment_plane_intersection(Vec3::Z, Vec3::ZERO, &plane).unwrap();
        assert_eq!(end_hit.t, 1.0);
    }

    #[test]
    fn test_ray_plane() {
        let ray = Ray::new(vec3(1.0, 1.0, 4.0), vec3(0.0, 0.0, -2.0));
        let hit = ray_plane_intersection(&ray, &ground()).unwrap();
        assert_close!(hit.t, 2.0f32);
        assert_close!(hit.point, vec3(1.0, 1.0, 0.0));

        // Pointing away, parallel, or too short.
        let away = Ray::new(vec3(1.0, 1.0, 4.0), Vec3::Z);
        assert_eq!(ray_plane_intersection(&away, &ground()), None);
        let parallel = Ray::new(vec3(1.0, 1.0, 4.0), Vec3::X);
        assert_eq!(ray_plane_intersection(&parallel, &ground()), None);
        assert_eq!(ray_plane_intersection(&ray.with_extent(1.5), &ground()), None);
    }
}
