use thiserror::Error;

/// The error type reported by fallible vector and matrix operations.
///
/// Every variant is a precondition violation that is detected eagerly, before
/// any computation runs: an operation either fully succeeds or returns one of
/// these without having produced a partial result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Two vectors of differing lengths were combined elementwise.
    #[error("vector lengths differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// Two matrices of incompatible shapes were combined, or a matrix that is
    /// not a single row or column was converted to a vector.
    #[error("matrix shapes are incompatible: {left_rows}x{left_cols} vs {right_rows}x{right_cols}")]
    ShapeMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// A row or column index outside the matrix, or an operation that needs
    /// two distinct indices was handed the same one twice.
    #[error("index {index} is not a usable row/column index here (bound {bound})")]
    IndexOutOfRange { index: usize, bound: usize },

    /// A scalar argument outside the operation's domain, e.g. scaling a row
    /// by zero.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The cross product was requested in a dimension where it does not
    /// exist.
    #[error("the cross product is only defined in 3 and 7 dimensions, not {0}")]
    UnsupportedDimension(usize),

    /// A rotation simplex whose point count does not match its dimension.
    #[error("a rotation simplex in {dims} dimensions needs one point fewer than that, got {points}")]
    InvalidSimplex { points: usize, dims: usize },

    /// Elimination found no usable pivot; the matrix has no inverse.
    #[error("matrix is singular")]
    SingularMatrix,

    /// A flat buffer whose length does not fit the requested shape.
    #[error("a buffer of {len} bytes does not fit the requested shape")]
    InvalidBufferShape { len: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
