use crate::{
    error::GmmRegError,
    matrix::Matrix,
    parallel::{self, ExecutionStrategy},
    pointset::{check_same_dim, PointSet},
};

/// Compute the squared Euclidean distance between two points.
///
/// PRECONDITION: `a` and `b` have the same length.
///
/// Example:
/// ```
/// use kornia_gmmreg::distance::squared_euclidean;
///
/// let dist = squared_euclidean(&[1.0, 2.0], &[4.0, 6.0]);
/// assert_eq!(dist, 25.0);
/// ```
#[inline]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .fold(0.0, |acc, (a, b)| acc + (a - b) * (a - b))
}

/// Compute the pairwise squared Euclidean distances between two point sets.
///
/// # Arguments
///
/// * `a` - The first point set with `m` points.
/// * `b` - The second point set with `n` points.
/// * `strategy` - The execution strategy of the row loop.
///
/// # Returns
///
/// A `m x n` matrix where the entry `(i, j)` is the squared distance between the
/// point `i` of `a` and the point `j` of `b`.
///
/// # Errors
///
/// Returns [`GmmRegError::DimensionMismatch`] if the point sets have different dimensions.
///
/// Example:
/// ```
/// use kornia_gmmreg::distance::squared_distance_matrix;
/// use kornia_gmmreg::parallel::ExecutionStrategy;
/// use kornia_gmmreg::pointset::PointSet;
///
/// let a = PointSet::from_points(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
/// let b = PointSet::from_points(&[[1.0, 0.0]]).unwrap();
/// let dist = squared_distance_matrix(&a, &b, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(dist.as_slice(), &[1.0, 1.0]);
/// ```
pub fn squared_distance_matrix(
    a: &PointSet,
    b: &PointSet,
    strategy: ExecutionStrategy,
) -> Result<Matrix, GmmRegError> {
    check_same_dim(a, b)?;

    let mut dist = Matrix::zeros(a.len(), b.len());

    parallel::for_each_row(strategy, dist.as_slice_mut(), b.len(), |i, dist_row| {
        let a_i = a.point(i);
        dist_row
            .iter_mut()
            .zip(b.iter())
            .for_each(|(d, b_j)| *d = squared_euclidean(a_i, b_j));
    })?;

    Ok(dist)
}
