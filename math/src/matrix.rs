use crate::error::{MathError, MathResult};
use crate::float::Magnitude;
use crate::vector::Vector;
use itertools::Itertools;
use std::convert::TryFrom;
use std::fmt;
use std::ops::Mul;

/// Runtime-sized `rows x cols` matrix, stored row-major.
///
/// This is the general-purpose path (LU decomposition, determinants and inverses of arbitrary
/// square matrices). Fixed-size 3x3 and 4x4 work should use [`crate::Mat3`] and [`crate::Mat4`],
/// which convert to and from `Matrix`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

/// Result of a Doolittle LU decomposition with row pivoting: `P * A = L * U`, where `P` is the
/// row permutation described by `permutation` (row `i` of `P * A` is row `permutation[i]` of `A`).
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    pub lower: Matrix,
    pub upper: Matrix,
    pub permutation: Vec<usize>,
    /// Number of row swaps performed; determines the sign of the determinant.
    pub swaps: usize,
}

impl Matrix {
    /// Creates a zero-filled matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Builds a matrix from `rows * cols` values given in row-major order.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f32>) -> MathResult<Self> {
        if data.len() != rows * cols {
            return Err(MathError::DimensionMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub(crate) fn from_square_rows(n: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), n * n);
        Self {
            rows: n,
            cols: n,
            data,
        }
    }

    /// Builds a matrix from a list of rows, which must all have the same length.
    /// ```
    /// use math::Matrix;
    /// let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// assert_eq!(m.get(1, 0), Ok(3.0));
    /// assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    /// ```
    pub fn from_rows(rows: &[Vec<f32>]) -> MathResult<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(MathError::DimensionMismatch {
                expected: cols,
                actual: bad.len(),
            });
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.concat(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }
    pub fn as_row_major(&self) -> &[f32] {
        &self.data
    }

    fn check_bounds(&self, row: usize, col: usize) -> MathResult<usize> {
        if row >= self.rows || col >= self.cols {
            Err(MathError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        } else {
            Ok(row * self.cols + col)
        }
    }

    fn check_square(&self) -> MathResult<usize> {
        if self.is_square() {
            Ok(self.rows)
        } else {
            Err(MathError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    // Unchecked element access for internal loops whose bounds are already known.
    fn at(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }
    fn at_mut(&mut self, row: usize, col: usize) -> &mut f32 {
        &mut self.data[row * self.cols + col]
    }

    pub fn get(&self, row: usize, col: usize) -> MathResult<f32> {
        self.check_bounds(row, col).map(|i| self.data[i])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) -> MathResult<()> {
        let i = self.check_bounds(row, col)?;
        self.data[i] = value;
        Ok(())
    }

    /// Returns a copy of row `r`.
    pub fn row(&self, r: usize) -> MathResult<Vec<f32>> {
        self.check_bounds(r, 0)?;
        Ok(self.data[r * self.cols..(r + 1) * self.cols].to_vec())
    }

    /// Returns a copy of column `c`.
    pub fn column(&self, c: usize) -> MathResult<Vec<f32>> {
        self.check_bounds(0, c)?;
        Ok((0..self.rows).map(|r| self.at(r, c)).collect())
    }

    /// Returns row `r` as a fixed-size vector; `N` must equal the column count.
    pub fn row_vector<const N: usize>(&self, r: usize) -> MathResult<Vector<N>> {
        Vector::try_from(&self.row(r)?[..])
    }

    /// Returns column `c` as a fixed-size vector; `N` must equal the row count.
    pub fn column_vector<const N: usize>(&self, c: usize) -> MathResult<Vector<N>> {
        Vector::try_from(&self.column(c)?[..])
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) -> MathResult<()> {
        self.check_bounds(a, 0)?;
        self.check_bounds(b, 0)?;
        if a != b {
            for c in 0..self.cols {
                self.data.swap(a * self.cols + c, b * self.cols + c);
            }
        }
        Ok(())
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::new(self.cols, self.rows);
        for (r, c) in (0..self.rows).cartesian_product(0..self.cols) {
            *res.at_mut(c, r) = self.at(r, c);
        }
        res
    }

    /// Flattens the matrix column by column, the layout GPU uniform uploads expect.
    pub fn to_cols_array(&self) -> Vec<f32> {
        self.transpose().data
    }

    /// Matrix product `self * rhs`; requires `self.cols() == rhs.rows()`.
    pub fn multiply(&self, rhs: &Matrix) -> MathResult<Matrix> {
        if self.cols != rhs.rows {
            return Err(MathError::DimensionMismatch {
                expected: self.cols,
                actual: rhs.rows,
            });
        }
        let mut res = Matrix::new(self.rows, rhs.cols);
        for (r, c) in (0..self.rows).cartesian_product(0..rhs.cols) {
            *res.at_mut(r, c) = (0..self.cols).map(|k| self.at(r, k) * rhs.at(k, c)).sum();
        }
        Ok(res)
    }

    pub fn scale(&self, s: f32) -> Matrix {
        Matrix {
            data: self.data.iter().map(|x| x * s).collect(),
            ..self.clone()
        }
    }

    fn zip_with(&self, rhs: &Matrix, f: impl Fn(f32, f32) -> f32) -> MathResult<Matrix> {
        if self.rows != rhs.rows {
            return Err(MathError::DimensionMismatch {
                expected: self.rows,
                actual: rhs.rows,
            });
        }
        if self.cols != rhs.cols {
            return Err(MathError::DimensionMismatch {
                expected: self.cols,
                actual: rhs.cols,
            });
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(a, b)| f(*a, *b))
                .collect(),
        })
    }

    pub fn add(&self, rhs: &Matrix) -> MathResult<Matrix> {
        self.zip_with(rhs, |a, b| a + b)
    }

    pub fn subtract(&self, rhs: &Matrix) -> MathResult<Matrix> {
        self.zip_with(rhs, |a, b| a - b)
    }

    pub fn trace(&self) -> MathResult<f32> {
        let n = self.check_square()?;
        Ok((0..n).map(|i| self.at(i, i)).sum())
    }

    pub fn frobenius_norm_squared(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// Doolittle LU decomposition with partial pivoting.
    ///
    /// Column by column, the row at or below the diagonal with the largest magnitude in that
    /// column is swapped into the pivot position, and the swap is recorded in the permutation.
    /// If every candidate is exactly zero the matrix is singular; small but nonzero pivots are
    /// accepted whatever the scale of the matrix.
    pub fn lu_decompose(&self) -> MathResult<LuDecomposition> {
        let n = self.check_square()?;
        let mut lower = Matrix::identity(n);
        let mut upper = self.clone();
        let mut permutation = (0..n).collect::<Vec<_>>();
        let mut swaps = 0;

        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&a, &b| upper.at(a, col).abs().total_cmp(&upper.at(b, col).abs()))
                .unwrap_or(col);
            let pivot = upper.at(pivot_row, col);
            if pivot == 0.0 || !pivot.is_finite() {
                log::debug!("LU decomposition: no pivot in column {}", col);
                return Err(MathError::SingularMatrix);
            }
            if pivot_row != col {
                upper.swap_rows(col, pivot_row)?;
                // Multipliers computed so far move with their rows.
                for k in 0..col {
                    let tmp = lower.at(col, k);
                    *lower.at_mut(col, k) = lower.at(pivot_row, k);
                    *lower.at_mut(pivot_row, k) = tmp;
                }
                permutation.swap(col, pivot_row);
                swaps += 1;
            }

            let pivot = upper.at(col, col);
            for r in col + 1..n {
                let factor = upper.at(r, col) / pivot;
                *lower.at_mut(r, col) = factor;
                for c in col..n {
                    let delta = factor * upper.at(col, c);
                    *upper.at_mut(r, c) -= delta;
                }
            }
        }

        Ok(LuDecomposition {
            lower,
            upper,
            permutation,
            swaps,
        })
    }

    /// Determinant via LU decomposition. Returns 0.0 for non-square or singular matrices.
    /// ```
    /// use math::Matrix;
    /// let swap = Matrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
    /// assert_eq!(swap.determinant(), -1.0);
    /// assert_eq!(Matrix::new(2, 3).determinant(), 0.0);
    /// ```
    pub fn determinant(&self) -> f32 {
        self.lu_decompose().map_or(0.0, |lu| lu.determinant())
    }

    /// Inverse via LU decomposition.
    pub fn inverse(&self) -> MathResult<Matrix> {
        let lu = self.lu_decompose()?;
        let n = self.rows;
        let mut inv = Matrix::new(n, n);
        for c in 0..n {
            let x = lu.solve(&Matrix::identity(n).column(c)?)?;
            for (r, value) in x.into_iter().enumerate() {
                *inv.at_mut(r, c) = value;
            }
        }
        Ok(inv)
    }
}

impl LuDecomposition {
    pub fn determinant(&self) -> f32 {
        let sign = if self.swaps % 2 == 0 { 1.0 } else { -1.0 };
        let n = self.upper.rows();
        sign * (0..n).map(|i| self.upper.at(i, i)).product::<f32>()
    }

    /// Returns the permutation matrix `P` with `P * A = L * U`.
    pub fn permutation_matrix(&self) -> Matrix {
        let n = self.permutation.len();
        let mut p = Matrix::new(n, n);
        for (r, &source) in self.permutation.iter().enumerate() {
            *p.at_mut(r, source) = 1.0;
        }
        p
    }

    /// Solves `A * x = b` by forward substitution on `L` and back substitution on `U`.
    pub fn solve(&self, b: &[f32]) -> MathResult<Vec<f32>> {
        let n = self.permutation.len();
        if b.len() != n {
            return Err(MathError::DimensionMismatch {
                expected: n,
                actual: b.len(),
            });
        }
        // L * y = P * b
        let mut y = vec![0.0f32; n];
        for r in 0..n {
            let sum: f32 = (0..r).map(|k| self.lower.at(r, k) * y[k]).sum();
            y[r] = b[self.permutation[r]] - sum;
        }
        // U * x = y
        let mut x = vec![0.0f32; n];
        for r in (0..n).rev() {
            let sum: f32 = (r + 1..n).map(|k| self.upper.at(r, k) * x[k]).sum();
            let diag = self.upper.at(r, r);
            if diag == 0.0 {
                return Err(MathError::SingularMatrix);
            }
            x[r] = (y[r] - sum) / diag;
        }
        Ok(x)
    }
}

impl Mul<f32> for &Matrix {
    type Output = Matrix;
    fn mul(self, s: f32) -> Matrix {
        self.scale(s)
    }
}

impl Magnitude for Matrix {
    fn magnitude_squared(&self) -> f32 {
        self.frobenius_norm_squared()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        for r in 0..self.rows {
            write!(f, "\n|")?;
            for c in 0..self.cols {
                write!(f, "{:5.p$} ", self.at(r, c), p = precision)?;
            }
            write!(f, "|")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{assert_gt, assert_le};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    // Diagonally dominant, so well conditioned and never needs a pivot swap.
    // `general_matrix()` covers the pivoting paths.
    fn random_matrix(rng: &mut StdRng, n: usize) -> Matrix {
        let mut m = Matrix::new(n, n);
        for (r, c) in (0..n).cartesian_product(0..n) {
            let diag = if r == c { 5.0 * n as f32 } else { 0.0 };
            m.set(r, c, rng.gen_range(-5.0..5.0) + diag).unwrap();
        }
        m
    }

    fn general_matrix(rng: &mut StdRng, n: usize) -> Matrix {
        let data = (0..n * n).map(|_| rng.gen_range(-1.0..1.0)).collect();
        Matrix::from_row_major(n, n, data).unwrap()
    }

    #[test]
    fn test_bounds_checks() {
        let mut m = Matrix::new(2, 3);
        assert!(m.set(1, 2, 4.0).is_ok());
        assert_eq!(m.get(1, 2), Ok(4.0));
        assert_eq!(
            m.get(2, 0),
            Err(MathError::IndexOutOfBounds {
                row: 2,
                col: 0,
                rows: 2,
                cols: 3
            })
        );
        assert!(m.set(0, 3, 1.0).is_err());
        assert!(m.row(2).is_err());
        assert!(m.column(3).is_err());
    }

    #[test]
    fn test_rows_and_columns_are_copies() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let mut row = m.row(1).unwrap();
        row[0] = 100.0;
        assert_eq!(m.get(1, 0), Ok(4.0));
        assert_eq!(m.column(2), Ok(vec![3.0, 6.0]));
        assert_eq!(m.row_vector::<3>(0), Ok(crate::vec3(1.0, 2.0, 3.0)));
        assert_eq!(
            m.column_vector::<3>(0),
            Err(MathError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_transpose_and_cols_array() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let t = m.transpose();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t.get(2, 1), Ok(6.0));
        assert_eq!(m.to_cols_array(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_multiply() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![1.0, 0.0, -1.0], vec![2.0, 1.0, 0.0]]).unwrap();
        let ab = a.multiply(&b).unwrap();
        assert_eq!((ab.rows(), ab.cols()), (3, 3));
        assert_eq!(ab.row(0), Ok(vec![5.0, 2.0, -1.0]));
        assert_eq!(ab.row(2), Ok(vec![17.0, 6.0, -5.0]));
        assert_eq!(
            a.multiply(&a),
            Err(MathError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Matrix::identity(2);
        let b = &a * 3.0;
        assert_eq!(b.add(&a).unwrap().trace(), Ok(8.0));
        assert_eq!(b.subtract(&a).unwrap().get(0, 0), Ok(2.0));
        assert!(a.add(&Matrix::new(2, 3)).is_err());
        assert_eq!(
            Matrix::new(2, 3).trace(),
            Err(MathError::NotSquare { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn test_lu_reconstructs_permuted_input() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in 1..7 {
            let a = random_matrix(&mut rng, n);
            let lu = a.lu_decompose().unwrap();
            let pa = lu.permutation_matrix().multiply(&a).unwrap();
            let product = lu.lower.multiply(&lu.upper).unwrap();
            assert_le!(pa.subtract(&product).unwrap().frobenius_norm_squared(), 1e-6);
            for r in 0..n {
                assert_eq!(lu.lower.get(r, r), Ok(1.0));
                for c in r + 1..n {
                    assert_eq!(lu.lower.get(r, c), Ok(0.0));
                }
            }
        }
    }

    #[test]
    fn test_lu_pivots_on_largest_entry() {
        let a = Matrix::from_rows(&[
            vec![0.0, 2.0, 1.0],
            vec![1.0, 1.0, 0.0],
            vec![2.0, 0.0, 3.0],
        ])
        .unwrap();
        let lu = a.lu_decompose().unwrap();
        // Column 0 pivots on row 2, column 1 on the original row 0.
        assert_eq!(lu.swaps, 2);
        assert_eq!(lu.permutation, vec![2, 0, 1]);
        let pa = lu.permutation_matrix().multiply(&a).unwrap();
        let product = lu.lower.multiply(&lu.upper).unwrap();
        assert_le!(pa.subtract(&product).unwrap().frobenius_norm_squared(), 1e-10);
    }

    #[test]
    fn test_determinant_sign_after_swap() {
        // One pivot swap flips the sign; the product of U's diagonal alone would give +1.
        let swap = Matrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        assert_eq!(swap.determinant(), -1.0);

        let a = Matrix::from_rows(&[
            vec![0.0, 2.0, 1.0],
            vec![1.0, 1.0, 0.0],
            vec![2.0, 0.0, 3.0],
        ])
        .unwrap();
        // 0*(3-0) - 2*(3-0) + 1*(0-2) = -8
        assert_le!((a.determinant() + 8.0).abs(), 1e-5);
    }

    #[test]
    fn test_singular() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        assert_eq!(a.determinant(), 0.0);
        assert_eq!(a.lu_decompose().err(), Some(MathError::SingularMatrix));
        assert_eq!(a.inverse(), Err(MathError::SingularMatrix));
        assert_eq!(Matrix::new(3, 3).determinant(), 0.0);
        assert_eq!(
            Matrix::new(2, 3).inverse(),
            Err(MathError::NotSquare { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn test_inverse_product_is_identity() {
        let mut rng = StdRng::seed_from_u64(5);
        for n in 1..7 {
            let a = random_matrix(&mut rng, n);
            let inv = a.inverse().unwrap();
            let eye = a.multiply(&inv).unwrap();
            assert_le!(
                eye.subtract(&Matrix::identity(n)).unwrap().frobenius_norm_squared(),
                1e-6
            );
        }
    }

    #[test]
    fn test_small_entries_are_not_singular() {
        let a = Matrix::from_rows(&[
            vec![1e-7, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        let closed_form = crate::Mat3::try_from(&a).unwrap().determinant();
        assert_le!((a.determinant() - closed_form).abs(), 1e-12);
        let inv = a.inverse().unwrap();
        assert_le!((inv.get(0, 0).unwrap() - 1e7).abs(), 1.0);
        assert_le!(
            a.multiply(&inv)
                .unwrap()
                .subtract(&Matrix::identity(3))
                .unwrap()
                .frobenius_norm_squared(),
            1e-10
        );

        let tiny = Matrix::identity(3).scale(5e-7);
        assert!(tiny.determinant() > 0.0);
        let inv = tiny.inverse().unwrap();
        assert_le!((inv.get(2, 2).unwrap() - 2e6).abs(), 1.0);
    }

    #[test]
    fn test_pivoting_on_general_matrices() {
        let mut rng = StdRng::seed_from_u64(11);
        let (mut tested, mut swapped) = (0, 0);
        for i in 0..300 {
            let n = 2 + i % 5;
            let a = general_matrix(&mut rng, n);
            let lu = match a.lu_decompose() {
                Ok(lu) => lu,
                Err(_) => continue,
            };
            // Skip ill-conditioned draws.
            if (0..n).any(|k| lu.upper.at(k, k).abs() < 0.05) {
                continue;
            }
            let inv = a.inverse().unwrap();
            if inv.frobenius_norm_squared() > 1e4 {
                continue;
            }
            tested += 1;
            if lu.swaps > 0 {
                swapped += 1;
            }

            let pa = lu.permutation_matrix().multiply(&a).unwrap();
            let product = lu.lower.multiply(&lu.upper).unwrap();
            assert_le!(pa.subtract(&product).unwrap().frobenius_norm_squared(), 1e-8);
            for r in 0..n {
                for c in 0..r {
                    assert_le!(lu.lower.at(r, c).abs(), 1.0);
                }
            }

            let (d, dt) = (a.determinant(), a.transpose().determinant());
            assert_le!((d - dt).abs(), 1e-4 * d.abs().max(1.0));
            assert_le!((d - lu.determinant()).abs(), 1e-6);

            let eye = a.multiply(&inv).unwrap();
            assert_le!(
                eye.subtract(&Matrix::identity(n)).unwrap().frobenius_norm_squared(),
                1e-6
            );
        }
        assert_gt!(tested, 100);
        assert_gt!(swapped, tested / 2);
    }

    #[test]
    fn test_determinant_of_transpose() {
        let mut rng = StdRng::seed_from_u64(9);
        for n in 1..6 {
            let a = random_matrix(&mut rng, n);
            let (d, dt) = (a.determinant(), a.transpose().determinant());
            assert_le!((d - dt).abs(), 1e-3 * d.abs().max(1.0));
        }
    }
}
