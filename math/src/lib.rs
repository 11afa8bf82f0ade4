/// `Degree` and `Radian` newtypes to represent angles unambiguously.
/// - Conversion between the two is explicit.
/// - `reduce_to_one_turn()` wraps any angle, including negative ones, into a single turn.
pub mod angle;

/// Error type shared by vector and matrix operations.
pub mod error;

/// Defines useful functions for common math operations, tools and constants:
/// - `EPSILON`, the tolerance of all near-zero and coincidence tests,
/// - Linear interpolation on not only primitive types,
/// - Macros to check if two math quantities are close, less than / greater than (or equal to) each other.
pub mod float;

/// Homogeneous-coordinate maths module.
/// - Types: 3x3 and 4x4 matrices with closed-form determinants and inverses.
/// - Rotation (per-axis and Rodrigues), translation and scale construction.
/// - Function `make_coord_system()` to build an orthogonal base from a `Vec3`.
pub mod hcm;

/// Runtime-sized matrix with LU decomposition.
pub mod matrix;

/// View and projection matrix builders.
pub mod transform;

/// Fixed-size vectors: `Vec2`, `Vec3`, `Vec4`.
pub mod vector;

pub use angle::{Degree, Radian};
pub use error::{MathError, MathResult};
pub use hcm::{Mat3, Mat4};
pub use matrix::{LuDecomposition, Matrix};
pub use transform::{make_look_at, make_orthographic, make_orthographic_bounds, make_perspective};
pub use vector::{vec2, vec3, vec4, Vec2, Vec3, Vec4, Vector};

pub fn new_rad(rad: f32) -> Radian {
    Radian(rad)
}
pub fn new_deg(deg: f32) -> Degree {
    Degree(deg)
}
