use log::warn;

use math::{
    make_look_at, make_orthographic, make_perspective, Degree, Mat3, Mat4, MathError, MathResult,
    Radian, Vec3,
};

use crate::frustum::Frustum;
use crate::ray::Ray;

/// How a camera maps eye space to clip space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        fov_y: Degree,
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// Sized like the perspective frustum at the near plane.
    Orthographic {
        fov_y: Degree,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => make_perspective(fov_y, aspect, near, far),
            Projection::Orthographic {
                fov_y,
                aspect,
                near,
                far,
            } => make_orthographic(fov_y, aspect, near, far),
        }
    }

    pub fn with_aspect(self, aspect: f32) -> Self {
        match self {
            Projection::Perspective {
                fov_y, near, far, ..
            } => Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            },
            Projection::Orthographic {
                fov_y, near, far, ..
            } => Projection::Orthographic {
                fov_y,
                aspect,
                near,
                far,
            },
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            fov_y: Degree(60.0),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Right-handed camera: `right` is x, `up` is y and the camera looks along `aim`, which is -z in
/// view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    aim: Vec3,
    up: Vec3,
    right: Vec3,
    projection: Projection,
}

impl Camera {
    /// Builds a camera from an explicit basis. The vectors are normalized, not orthogonalized.
    pub fn new(position: Vec3, aim: Vec3, up: Vec3, right: Vec3) -> MathResult<Self> {
        let basis = (aim.normalized(), up.normalized(), right.normalized());
        match basis {
            (Ok(aim), Ok(up), Ok(right)) => Ok(Camera {
                position,
                aim,
                up,
                right,
                projection: Projection::default(),
            }),
            _ => {
                warn!(
                    "rejected camera basis aim = {}, up = {}, right = {}",
                    aim, up, right
                );
                Err(MathError::DegenerateVector)
            }
        }
    }

    /// Places the camera at `from`, looking at `target`, with `up` as the approximate upward
    /// direction. Fails if `target` coincides with `from` or `up` is parallel to the view
    /// direction.
    pub fn looking_at(from: Vec3, target: Vec3, up: Vec3) -> MathResult<Self> {
        let basis = (target - from).normalized().and_then(|aim| {
            let right = aim.cross(up).normalized()?; // new x-axis
            let up = right.cross(aim); // adjusted y-axis
            Ok((aim, up, right))
        });
        match basis {
            Ok((aim, up, right)) => Self::new(from, aim, up, right),
            Err(e) => {
                warn!(
                    "rejected camera looking from {} at {} with up = {}",
                    from, target, up
                );
                Err(e)
            }
        }
    }

    pub fn with_projection(self, projection: Projection) -> Self {
        Self { projection, ..self }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
    pub fn aim(&self) -> Vec3 {
        self.aim
    }
    pub fn up(&self) -> Vec3 {
        self.up
    }
    pub fn right(&self) -> Vec3 {
        self.right
    }
    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn view_matrix(&self) -> MathResult<Mat4> {
        make_look_at(self.position, self.aim, self.up, self.right)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// Projection * view: maps world space to clip space.
    pub fn view_projection(&self) -> MathResult<Mat4> {
        Ok(self.projection_matrix() * self.view_matrix()?)
    }

    /// View volume in world space.
    pub fn frustum(&self) -> MathResult<Frustum> {
        Frustum::from_matrix(&self.view_projection()?)
    }

    /// Ray from the camera through the center of its view.
    pub fn center_ray(&self) -> Ray {
        Ray::new(self.position, self.aim)
    }

    /// Turns the camera around `pivot`: first by `yaw` about its `up` axis, then by `pitch` about
    /// its (turned) `right` axis. The distance to `pivot` is preserved, and the basis is
    /// re-orthonormalized so repeated orbits do not drift.
    ///
    /// An orbit producing a non-finite basis (e.g., from a NaN angle) is rejected and leaves the
    /// camera unchanged.
    pub fn orbit(self, yaw: impl Into<Radian>, pitch: impl Into<Radian>, pivot: Vec3) -> Self {
        let turn = Mat3::rotater(self.up, yaw);
        let right = turn * self.right;
        let rotation = Mat3::rotater(right, pitch) * turn;

        let position = pivot + rotation * (self.position - pivot);
        let basis = (rotation * self.aim).normalized().and_then(|aim| {
            let right = aim.cross(rotation * self.up).normalized()?;
            Ok((aim, right.cross(aim), right))
        });
        match basis {
            Ok((aim, up, right)) if position.is_finite() => Self {
                position,
                aim,
                up,
                right,
                ..self
            },
            _ => {
                warn!("rejected orbit of camera at {} around {}", self.position, pivot);
                self
            }
        }
    }

    /// Moves the camera along its aim; negative distances move it backwards.
    pub fn dolly(self, distance: f32) -> Self {
        Self {
            position: self.position + self.aim * distance,
            ..self
        }
    }

    pub fn translate(self, v: Vec3) -> Self {
        Self {
            position: self.position + v,
            ..self
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::{assert_close, new_rad, vec3};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn assert_orthonormal(camera: &Camera) {
        for v in [camera.aim(), camera.up(), camera.right()].iter() {
            assert_close!(v.length(), 1.0f32);
        }
        assert_close!(camera.aim().dot(camera.up()), 0.0f32);
        assert_close!(camera.aim().dot(camera.right()), 0.0f32);
        assert_close!(camera.up().dot(camera.right()), 0.0f32);
    }

    #[test]
    fn test_looking_at() {
        let camera = Camera::looking_at(vec3(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y).unwrap();
        assert_close!(camera.aim(), -Vec3::Z);
        assert_close!(camera.right(), Vec3::X);
        assert_close!(camera.up(), Vec3::Y);

        let tilted = Camera::looking_at(vec3(3.0, 4.0, 5.0), vec3(0.0, 1.0, 0.0), Vec3::Y).unwrap();
        assert_orthonormal(&tilted);
        let view = tilted.view_matrix().unwrap();
        // The target lands on the view axis.
        let target = view.transform_point(vec3(0.0, 1.0, 0.0));
        assert_close!(target, vec3(0.0, 0.0, -(43.0f32).sqrt()));

        assert_eq!(
            Camera::looking_at(Vec3::Y, Vec3::Y, Vec3::Y),
            Err(MathError::DegenerateVector)
        );
        assert_eq!(
            Camera::looking_at(Vec3::ZERO, Vec3::Y * 3.0, Vec3::Y),
            Err(MathError::DegenerateVector)
        );
    }

    #[test]
    fn test_orbit_preserves_distance() {
        let pivot = vec3(1.0, 0.0, -2.0);
        let mut camera = Camera::looking_at(vec3(1.0, 2.0, 6.0), pivot, Vec3::Y).unwrap();
        let distance = camera.position().distance_to(pivot);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let yaw = Degree(rng.gen_range(-20.0..20.0));
            let pitch = Degree(rng.gen_range(-20.0..20.0));
            camera = camera.orbit(yaw, pitch, pivot);
            assert_close!(camera.position().distance_to(pivot), distance, 1e-6);
        }
        assert_orthonormal(&camera);
        // Still looking at the pivot.
        let to_pivot = (pivot - camera.position()).normalized().unwrap();
        assert_close!(to_pivot, camera.aim(), 1e-6);
    }

    #[test]
    fn test_orbit_keeps_basis_orthonormal() {
        let pivot = vec3(0.5, -1.0, 2.0);
        let mut camera = Camera::looking_at(vec3(4.0, 3.0, -6.0), pivot, Vec3::Y).unwrap();
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..5000 {
            let yaw = Degree(rng.gen_range(-30.0..30.0));
            let pitch = Degree(rng.gen_range(-30.0..30.0));
            camera = camera.orbit(yaw, pitch, pivot);
        }
        for v in [camera.aim(), camera.up(), camera.right()].iter() {
            assert_close!(v.length(), 1.0f32, 1e-10);
        }
        assert_close!(camera.aim().dot(camera.up()), 0.0f32, 1e-10);
        assert_close!(camera.aim().dot(camera.right()), 0.0f32, 1e-10);
        assert_close!(camera.up().dot(camera.right()), 0.0f32, 1e-10);
        assert_close!(camera.right().cross(camera.up()), -camera.aim(), 1e-10);
    }

    #[test]
    fn test_orbit_yaw() {
        let camera = Camera::looking_at(vec3(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y).unwrap();
        let turned = camera.orbit(Degree(90.0), Degree(0.0), Vec3::ZERO);
        assert_close!(turned.position(), vec3(4.0, 0.0, 0.0));
        assert_close!(turned.aim(), -Vec3::X);
        assert_close!(turned.up(), Vec3::Y);

        let rejected = camera.orbit(new_rad(f32::NAN), Degree(0.0), Vec3::ZERO);
        assert_eq!(rejected, camera);
    }

    #[test]
    fn test_dolly_and_view_projection() {
        let camera = Camera::looking_at(vec3(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y)
            .unwrap()
            .dolly(4.0);
        assert_close!(camera.position(), vec3(0.0, 0.0, 6.0));
        assert_close!(camera.center_ray().position_at(6.0), Vec3::ZERO);

        let ndc = camera
            .view_projection()
            .unwrap()
            .project_point(Vec3::ZERO)
            .unwrap();
        assert_close!(ndc.truncate(), math::Vec2::ZERO);

        let frustum = camera.frustum().unwrap();
        assert!(frustum.contains(Vec3::ZERO));
        assert!(!frustum.contains(vec3(0.0, 0.0, 7.0)));
    }

    #[test]
    fn test_projection_kinds() {
        let ortho = Projection::Orthographic {
            fov_y: Degree(90.0),
            aspect: 1.0,
            near: 1.0,
            far: 10.0,
        };
        assert_eq!(
            ortho.matrix(),
            make_orthographic(Degree(90.0), 1.0, 1.0, 10.0)
        );
        match Projection::default().with_aspect(2.0) {
            Projection::Perspective { aspect, .. } => assert_eq!(aspect, 2.0),
            p => panic!("unexpected projection {:?}", p),
        }
    }
}
