use thiserror::Error;

/// Errors raised by vector and matrix operations. All of them indicate a caller bug; geometric
/// "no intersection" outcomes are never reported through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    /// Operands have incompatible sizes.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// LU decomposition or inverse can't proceed: no non-zero pivot in some column.
    #[error("matrix is singular")]
    SingularMatrix,

    /// Normalization of a zero-length (or non-finite) vector.
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Operation is only defined for square matrices.
    #[error("expected a square matrix, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
}

/// Result type for math operations.
pub type MathResult<T> = Result<T, MathError>;
