//! Builders for view and projection matrices. All of them follow the OpenGL conventions: the eye
//! looks down its -z axis, and projections map the view volume into the `[-1, 1]^3` NDC cube with
//! the near plane at z = -1.

use crate::angle::Radian;
use crate::error::MathResult;
use crate::hcm::Mat4;
use crate::vector::Vec3;

/// Builds the view matrix of an eye at `pos` with the given basis.
///
/// The rows of the rotation part are the normalized `right`, `up` and `-aim`; the translation is
/// `-pos` projected onto each of them. The caller must supply mutually orthogonal `aim`, `up` and
/// `right`: they are normalized but not orthogonalized. Fails with `DegenerateVector` if any of
/// them is zero.
/// ```
/// use math::{make_look_at, vec3, assert_close};
/// let view = make_look_at(
///     vec3(0.0, 0.0, 5.0),
///     vec3(0.0, 0.0, -1.0),
///     vec3(0.0, 1.0, 0.0),
///     vec3(1.0, 0.0, 0.0),
/// ).unwrap();
/// assert_close!(view.transform_point(vec3(0.0, 0.0, 0.0)), vec3(0.0, 0.0, -5.0));
/// ```
pub fn make_look_at(pos: Vec3, aim: Vec3, up: Vec3, right: Vec3) -> MathResult<Mat4> {
    let basis = [right.normalized()?, up.normalized()?, (-aim).normalized()?];
    let mut view = Mat4::IDENTITY;
    for (r, axis) in basis.iter().enumerate() {
        for c in 0..3 {
            view.rows[r][c] = axis[c];
        }
        view.rows[r][3] = -pos.dot(*axis);
    }
    Ok(view)
}

/// Symmetric-frustum perspective projection with vertical field of view `fov_y`.
///
/// The output w equals -z of the eye-space input, so after the perspective division the center
/// of the near plane lands on NDC z = -1 and the center of the far plane on NDC z = 1.
pub fn make_perspective(fov_y: impl Into<Radian>, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y.into() * 0.5).tan();
    let range_reciprocal = 1.0 / (near - far);
    Mat4::from_rows([
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [
            0.0,
            0.0,
            (far + near) * range_reciprocal,
            2.0 * far * near * range_reciprocal,
        ],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

/// Orthographic projection sized like [`make_perspective`]'s frustum at the near plane: the
/// half-height is `near * tan(fov_y / 2)` and the half-width is that times `aspect`.
pub fn make_orthographic(fov_y: impl Into<Radian>, aspect: f32, near: f32, far: f32) -> Mat4 {
    let top = near * (fov_y.into() * 0.5).tan();
    let right = top * aspect;
    make_orthographic_bounds(-right, right, -top, top, near, far)
}

/// Orthographic projection of the box `[left, right] x [bottom, top] x [-far, -near]` in eye
/// space onto the NDC cube.
pub fn make_orthographic_bounds(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> Mat4 {
    Mat4::from_rows([
        [2.0 / (right - left), 0.0, 0.0, (right + left) / (left - right)],
        [0.0, 2.0 / (top - bottom), 0.0, (top + bottom) / (bottom - top)],
        [0.0, 0.0, 2.0 / (near - far), (far + near) / (near - far)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}
