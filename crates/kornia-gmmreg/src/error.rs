use thiserror::Error;

use crate::parallel::ParallelError;

/// An error type for the registration kernels.
#[derive(Error, Debug, PartialEq)]
pub enum GmmRegError {
    /// The two point sets do not share the same point dimension.
    #[error("Dimension mismatch: expected points of equal dimension, got {0} and {1}")]
    DimensionMismatch(usize, usize),

    /// The operation requires at least one point.
    #[error("Point set is empty")]
    EmptyPointSet,

    /// A buffer or matrix does not have the expected number of elements.
    #[error("Invalid shape: expected {0} elements, got {1}")]
    InvalidShape(usize, usize),

    /// An index is out of bounds for the number of points.
    #[error("Index out of bounds: index {0} for a point set of {1} points")]
    IndexOutOfBounds(usize, usize),

    /// The kernel is only defined for 2D and 3D points.
    #[error("Unsupported point dimension {0}. Only 2 and 3 are supported")]
    UnsupportedDimension(usize),

    /// A scalar parameter is outside of its valid range.
    #[error("Invalid parameter `{0}`: {1}")]
    InvalidParameter(&'static str, f64),

    /// All points coincide, so the point set has no spatial extent.
    #[error("Point set is degenerate: all points coincide")]
    DegeneratePointSet,

    /// Error while running a parallel loop.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
