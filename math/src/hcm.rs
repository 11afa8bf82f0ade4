use crate::angle::Radian;
use crate::error::{MathError, MathResult};
use crate::float::Magnitude;
use crate::matrix::Matrix;
use crate::vector::{vec3, Vec3, Vector};
use itertools::Itertools;
use std::convert::TryFrom;
use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// 3x3 matrix, stored row-major. Implements m * m, m * v, m * s, m + m, m - m.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub rows: [[f32; 3]; 3],
}

/// 4x4 homogeneous transform matrix, stored row-major. Translation lives in the last column, so
/// it applies to column vectors: `m * v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub rows: [[f32; 4]; 4],
}

// Functionality shared by both fixed-size matrices.
macro_rules! square_matrix {
    ($mat:ident, $n:literal) => {
        impl $mat {
            pub const ZERO: Self = Self {
                rows: [[0.0; $n]; $n],
            };
            pub const IDENTITY: Self = Self::identity();

            const fn identity() -> Self {
                let mut rows = [[0.0; $n]; $n];
                let mut i = 0;
                while i < $n {
                    rows[i][i] = 1.0;
                    i += 1;
                }
                Self { rows }
            }

            pub const fn from_rows(rows: [[f32; $n]; $n]) -> Self {
                Self { rows }
            }

            pub fn from_row_vectors(rows: [Vector<$n>; $n]) -> Self {
                let mut mat = Self::ZERO;
                for (r, v) in rows.iter().enumerate() {
                    mat.rows[r] = v.data;
                }
                mat
            }

            pub fn from_cols(cols: [Vector<$n>; $n]) -> Self {
                Self::from_row_vectors(cols).transpose()
            }

            pub fn get(&self, row: usize, col: usize) -> MathResult<f32> {
                if row >= $n || col >= $n {
                    return Err(MathError::IndexOutOfBounds {
                        row,
                        col,
                        rows: $n,
                        cols: $n,
                    });
                }
                Ok(self.rows[row][col])
            }

            pub fn set(&mut self, row: usize, col: usize, value: f32) -> MathResult<()> {
                self.get(row, col)?;
                self.rows[row][col] = value;
                Ok(())
            }

            /// Returns a copy of row `r`. Panics if `r` is out of range.
            pub fn row(&self, r: usize) -> Vector<$n> {
                Vector::new(self.rows[r])
            }

            /// Returns a copy of column `c`. Panics if `c` is out of range.
            pub fn column(&self, c: usize) -> Vector<$n> {
                let mut v = Vector::ZERO;
                for r in 0..$n {
                    v[r] = self.rows[r][c];
                }
                v
            }

            pub fn swap_rows(&mut self, a: usize, b: usize) {
                self.rows.swap(a, b);
            }

            pub fn transpose(&self) -> Self {
                let mut mat = Self::ZERO;
                for (r, c) in (0..$n).cartesian_product(0..$n) {
                    mat.rows[c][r] = self.rows[r][c];
                }
                mat
            }

            pub fn trace(&self) -> f32 {
                (0..$n).map(|i| self.rows[i][i]).sum()
            }

            pub fn frobenius_norm_squared(&self) -> f32 {
                self.rows.iter().flatten().map(|x| x * x).sum()
            }

            /// Returns the inverse, or `None` if the matrix is singular.
            pub fn try_inverse(&self) -> Option<Self> {
                let det = self.determinant();
                let inv_det = 1.0 / det;
                if det == 0.0 || !inv_det.is_finite() {
                    return None;
                }
                Some(self.adjugate() * inv_det)
            }

            /// Returns the inverse matrix. A singular matrix yields the IDENTITY instead of a
            /// matrix full of NaN/Inf; use `determinant()` or `try_inverse()` to tell the two
            /// cases apart.
            pub fn inverse(&self) -> Self {
                self.try_inverse().unwrap_or_else(|| {
                    log::debug!(
                        "{}::inverse of a singular matrix, using identity",
                        stringify!($mat)
                    );
                    Self::IDENTITY
                })
            }

            /// Flattens column by column, the layout GPU uniform uploads expect.
            pub fn to_cols_array(&self) -> [f32; $n * $n] {
                let mut res = [0.0; $n * $n];
                for (r, c) in (0..$n).cartesian_product(0..$n) {
                    res[c * $n + r] = self.rows[r][c];
                }
                res
            }

            pub fn from_cols_array(values: &[f32; $n * $n]) -> Self {
                let mut mat = Self::ZERO;
                for (r, c) in (0..$n).cartesian_product(0..$n) {
                    mat.rows[r][c] = values[c * $n + r];
                }
                mat
            }
        }

        impl Default for $mat {
            fn default() -> Self {
                Self::IDENTITY
            }
        }

        impl Index<(usize, usize)> for $mat {
            type Output = f32;
            fn index(&self, (r, c): (usize, usize)) -> &f32 {
                &self.rows[r][c]
            }
        }
        impl IndexMut<(usize, usize)> for $mat {
            fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f32 {
                &mut self.rows[r][c]
            }
        }

        impl Mul for $mat {
            type Output = $mat;
            fn mul(self, m: Self) -> $mat {
                let mut mat = $mat::ZERO;
                for (r, c) in (0..$n).cartesian_product(0..$n) {
                    mat.rows[r][c] = (0..$n).map(|k| self.rows[r][k] * m.rows[k][c]).sum();
                }
                mat
            }
        }

        impl Mul<Vector<$n>> for $mat {
            type Output = Vector<$n>;
            fn mul(self, v: Vector<$n>) -> Vector<$n> {
                let mut res = Vector::ZERO;
                for r in 0..$n {
                    res[r] = self.row(r).dot(v);
                }
                res
            }
        }

        impl Mul<f32> for $mat {
            type Output = $mat;
            fn mul(self, s: f32) -> $mat {
                let mut mat = self;
                mat.rows.iter_mut().flatten().for_each(|x| *x *= s);
                mat
            }
        }

        impl Add for $mat {
            type Output = $mat;
            fn add(self, rhs: $mat) -> $mat {
                let mut mat = self;
                for (r, c) in (0..$n).cartesian_product(0..$n) {
                    mat.rows[r][c] += rhs.rows[r][c];
                }
                mat
            }
        }

        impl Sub for $mat {
            type Output = $mat;
            fn sub(self, rhs: $mat) -> $mat {
                self + rhs * -1.0
            }
        }

        impl Magnitude for $mat {
            fn magnitude_squared(&self) -> f32 {
                self.frobenius_norm_squared()
            }
        }

        impl From<$mat> for Matrix {
            fn from(m: $mat) -> Matrix {
                Matrix::from_square_rows($n, m.rows.iter().flatten().copied().collect())
            }
        }

        impl TryFrom<&Matrix> for $mat {
            type Error = MathError;
            fn try_from(m: &Matrix) -> MathResult<$mat> {
                for actual in [m.rows(), m.cols()].iter().copied() {
                    if actual != $n {
                        return Err(MathError::DimensionMismatch {
                            expected: $n,
                            actual,
                        });
                    }
                }
                let mut mat = $mat::ZERO;
                for (r, c) in (0..$n).cartesian_product(0..$n) {
                    mat.rows[r][c] = m.get(r, c)?;
                }
                Ok(mat)
            }
        }

        impl fmt::Display for $mat {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let precision = f.precision().unwrap_or(2);
                for row in self.rows.iter() {
                    write!(f, "\n|")?;
                    for x in row.iter() {
                        write!(f, "{:5.p$} ", x, p = precision)?;
                    }
                    write!(f, "|")?;
                }
                writeln!(f)
            }
        }
    };
}

// Named element accessors: `m12()` reads row 1, column 2; `set_m12()` writes it.
macro_rules! element_accessors {
    ($mat:ident { $($get:ident, $set:ident => ($r:literal, $c:literal));* $(;)? }) => {
        impl $mat {
            $(
                pub fn $get(&self) -> f32 {
                    self.rows[$r][$c]
                }
                pub fn $set(&mut self, value: f32) {
                    self.rows[$r][$c] = value;
                }
            )*
        }
    };
}

square_matrix!(Mat3, 3);
square_matrix!(Mat4, 4);

element_accessors!(Mat3 {
    m00, set_m00 => (0, 0); m01, set_m01 => (0, 1); m02, set_m02 => (0, 2);
    m10, set_m10 => (1, 0); m11, set_m11 => (1, 1); m12, set_m12 => (1, 2);
    m20, set_m20 => (2, 0); m21, set_m21 => (2, 1); m22, set_m22 => (2, 2);
});

element_accessors!(Mat4 {
    m00, set_m00 => (0, 0); m01, set_m01 => (0, 1); m02, set_m02 => (0, 2); m03, set_m03 => (0, 3);
    m10, set_m10 => (1, 0); m11, set_m11 => (1, 1); m12, set_m12 => (1, 2); m13, set_m13 => (1, 3);
    m20, set_m20 => (2, 0); m21, set_m21 => (2, 1); m22, set_m22 => (2, 2); m23, set_m23 => (2, 3);
    m30, set_m30 => (3, 0); m31, set_m31 => (3, 1); m32, set_m32 => (3, 2); m33, set_m33 => (3, 3);
});

impl Mat3 {
    pub fn nonuniform_scale(s: Vec3) -> Self {
        let mut mat = Self::IDENTITY;
        for i in 0..3 {
            mat.rows[i][i] = s[i];
        }
        mat
    }
    pub fn scaler(s: f32) -> Self {
        Self::IDENTITY * s
    }

    // Positive angles rotate counter-clockwise when looking from the positive axis toward the
    // origin.
    pub fn rotater_x(angle: impl Into<Radian>) -> Self {
        let (sin_t, cos_t) = angle.into().sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0],
            [0.0, cos_t, -sin_t],
            [0.0, sin_t, cos_t],
        ])
    }

    pub fn rotater_y(angle: impl Into<Radian>) -> Self {
        let (sin_t, cos_t) = angle.into().sin_cos();
        Self::from_rows([
            [cos_t, 0.0, sin_t],
            [0.0, 1.0, 0.0],
            [-sin_t, 0.0, cos_t],
        ])
    }

    pub fn rotater_z(angle: impl Into<Radian>) -> Self {
        let (sin_t, cos_t) = angle.into().sin_cos();
        Self::from_rows([
            [cos_t, -sin_t, 0.0],
            [sin_t, cos_t, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    /// Skew-symmetric matrix `K` such that `K * v == axis.cross(v)`.
    pub fn cross_product_matrix(axis: Vec3) -> Self {
        let (x, y, z) = (axis[0], axis[1], axis[2]);
        Self::from_rows([[0.0, -z, y], [z, 0.0, -x], [-y, x, 0.0]])
    }

    /// Rotation around an arbitrary `axis` by Rodrigues' formula,
    /// `R = I + sin(t) K + (1 - cos(t)) K^2`. The axis is expected to be unit-length.
    /// ```
    /// use math::{Mat3, Degree, vec3, assert_close};
    /// let rot = Mat3::rotater(vec3(0.0, 0.0, 1.0), Degree(90.0));
    /// assert_close!(rot * vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
    /// ```
    pub fn rotater(axis: Vec3, angle: impl Into<Radian>) -> Self {
        let (sin_t, cos_t) = angle.into().sin_cos();
        let k = Self::cross_product_matrix(axis);
        Self::IDENTITY + k * sin_t + (k * k) * (1.0 - cos_t)
    }

    /// Cofactor expansion along the first row.
    pub fn determinant(&self) -> f32 {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.rows;
        a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
    }

    fn adjugate(&self) -> Self {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.rows;
        Self::from_rows([
            [e * i - f * h, c * h - b * i, b * f - c * e],
            [f * g - d * i, a * i - c * g, c * d - a * f],
            [d * h - e * g, b * g - a * h, a * e - b * d],
        ])
    }
}

impl Mat4 {
    pub fn translater(t: Vec3) -> Mat4 {
        let mut mat = Self::IDENTITY;
        for i in 0..3 {
            mat.rows[i][3] = t[i];
        }
        mat
    }
    pub fn nonuniform_scale(s: Vec3) -> Mat4 {
        Mat3::nonuniform_scale(s).into()
    }
    pub fn scaler(s: f32) -> Mat4 {
        Mat3::scaler(s).into()
    }
    pub fn rotater_x(angle: impl Into<Radian>) -> Mat4 {
        Mat3::rotater_x(angle).into()
    }
    pub fn rotater_y(angle: impl Into<Radian>) -> Mat4 {
        Mat3::rotater_y(angle).into()
    }
    pub fn rotater_z(angle: impl Into<Radian>) -> Mat4 {
        Mat3::rotater_z(angle).into()
    }
    pub fn rotater(axis: Vec3, angle: impl Into<Radian>) -> Mat4 {
        Mat3::rotater(axis, angle).into()
    }

    /// Upper-left 3x3 block: rotation and scale, no translation.
    pub fn orientation(&self) -> Mat3 {
        let mut mat = Mat3::ZERO;
        for (r, c) in (0..3).cartesian_product(0..3) {
            mat.rows[r][c] = self.rows[r][c];
        }
        mat
    }

    pub fn translation(&self) -> Vec3 {
        vec3(self.rows[0][3], self.rows[1][3], self.rows[2][3])
    }

    /// Per-axis scale: the length of each of the first 3 columns. Unlike the diagonal, this stays
    /// correct when rotation and scale are composed.
    pub fn scale(&self) -> Vec3 {
        let orientation = self.orientation();
        vec3(
            orientation.column(0).length(),
            orientation.column(1).length(),
            orientation.column(2).length(),
        )
    }

    /// Applies the transform to a direction (w = 0); translation is ignored.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        (*self * v.extend(0.0)).truncate()
    }

    /// Applies the transform to a position (w = 1) of an affine transform. The resulting w is
    /// not divided out; use `project_point()` for projective matrices.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * p.extend(1.0)).truncate()
    }

    /// Applies the transform to a position and performs the perspective division.
    /// Returns `None` if the resulting w is zero.
    pub fn project_point(&self, p: Vec3) -> Option<Vec3> {
        let v4 = *self * p.extend(1.0);
        let w = v4[3];
        if w == 0.0 {
            None
        } else if w == 1.0 {
            Some(v4.truncate())
        } else {
            Some(v4.truncate() / w)
        }
    }

    // 2x2 sub-determinants of the top two rows (b00..b05) and the bottom two rows (b06..b11).
    // Both the determinant and the adjugate are assembled from these twelve terms.
    #[rustfmt::skip]
    fn sub_determinants(&self) -> [f32; 12] {
        let [[a00, a01, a02, a03], [a10, a11, a12, a13], [a20, a21, a22, a23], [a30, a31, a32, a33]] =
            self.rows;
        [
            a00 * a11 - a01 * a10,
            a00 * a12 - a02 * a10,
            a00 * a13 - a03 * a10,
            a01 * a12 - a02 * a11,
            a01 * a13 - a03 * a11,
            a02 * a13 - a03 * a12,
            a20 * a31 - a21 * a30,
            a20 * a32 - a22 * a30,
            a20 * a33 - a23 * a30,
            a21 * a32 - a22 * a31,
            a21 * a33 - a23 * a31,
            a22 * a33 - a23 * a32,
        ]
    }

    pub fn determinant(&self) -> f32 {
        let [b00, b01, b02, b03, b04, b05, b06, b07, b08, b09, b10, b11] = self.sub_determinants();
        b00 * b11 - b01 * b10 + b02 * b09 + b03 * b08 - b04 * b07 + b05 * b06
    }

    #[rustfmt::skip]
    fn adjugate(&self) -> Self {
        let [[a00, a01, a02, a03], [a10, a11, a12, a13], [a20, a21, a22, a23], [a30, a31, a32, a33]] =
            self.rows;
        let [b00, b01, b02, b03, b04, b05, b06, b07, b08, b09, b10, b11] = self.sub_determinants();
        Self::from_rows([
            [
                a11 * b11 - a12 * b10 + a13 * b09,
                a02 * b10 - a01 * b11 - a03 * b09,
                a31 * b05 - a32 * b04 + a33 * b03,
                a22 * b04 - a21 * b05 - a23 * b03,
            ],
            [
                a12 * b08 - a10 * b11 - a13 * b07,
                a00 * b11 - a02 * b08 + a03 * b07,
                a32 * b02 - a30 * b05 - a33 * b01,
                a20 * b05 - a22 * b02 + a23 * b01,
            ],
            [
                a10 * b10 - a11 * b08 + a13 * b06,
                a01 * b08 - a00 * b10 - a03 * b06,
                a30 * b04 - a31 * b02 + a33 * b00,
                a21 * b02 - a20 * b04 - a23 * b00,
            ],
            [
                a11 * b07 - a10 * b09 - a12 * b06,
                a00 * b09 - a01 * b07 + a02 * b06,
                a31 * b01 - a30 * b03 - a32 * b00,
                a20 * b03 - a21 * b01 + a22 * b00,
            ],
        ])
    }
}

/// Embeds a 3x3 linear map into the upper-left block of a homogeneous transform.
impl From<Mat3> for Mat4 {
    fn from(m: Mat3) -> Mat4 {
        let mut mat = Mat4::IDENTITY;
        for (r, c) in (0..3).cartesian_product(0..3) {
            mat.rows[r][c] = m.rows[r][c];
        }
        mat
    }
}

impl Mul<Vec3> for Mat4 {
    type Output = Vec3;
    /// Same as `transform_vector()`.
    fn mul(self, v: Vec3) -> Vec3 {
        self.transform_vector(v)
    }
}

impl From<Mat4> for glam::Mat4 {
    fn from(m: Mat4) -> Self {
        glam::Mat4::from_cols_array(&m.to_cols_array())
    }
}
impl From<glam::Mat4> for Mat4 {
    fn from(m: glam::Mat4) -> Self {
        Mat4::from_cols_array(&m.to_cols_array())
    }
}

/// Computes a pair of unit-vectors that forms an orthonormal basis with `v`.
/// `v` must be unit-length.
/// ```
/// use math::hcm::{Mat3, make_coord_system};
/// let v0 = math::vec3(0.3, 0.4, -0.6).normalized().unwrap();
/// let (v1, v2) = make_coord_system(v0);
///
/// let basis = Mat3::from_cols([v0, v1, v2]);
/// // basis * basis^T should be identity.
/// let diff_to_eye = basis * basis.transpose() - Mat3::IDENTITY;
/// assert!(diff_to_eye.frobenius_norm_squared() < 1e-6);
/// ```
pub fn make_coord_system(v: Vec3) -> (Vec3, Vec3) {
    let abs = v.map(f32::abs);
    let i0 = (0..3)
        .min_by(|&a, &b| abs[a].total_cmp(&abs[b]))
        .unwrap_or(0);
    let (i1, i2) = ((i0 + 1) % 3, (i0 + 2) % 3);
    let mut v1 = Vec3::ZERO;
    // v = [x, y, z] -> [x, 0, z], v1 = [-z, 0, x]
    v1[i1] = v[i2];
    v1[i2] = -v[i1];
    let v1 = v1 / v1.length();
    (v1, v.cross(v1))
}
