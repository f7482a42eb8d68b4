use crate::{
    distance::squared_distance_matrix,
    error::GmmRegError,
    matrix::Matrix,
    parallel::ExecutionStrategy,
    pointset::PointSet,
};

/// The points taking part in an optimization round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrespondenceIndices {
    /// Indices of the selected rows, in the order they were first seen.
    pub rows: Vec<usize>,
    /// Indices of the selected columns, in the order they were first seen.
    pub cols: Vec<usize>,
}

impl CorrespondenceIndices {
    /// Check if no correspondence was selected.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

/// Select the rows and columns of a distance matrix with an entry under a threshold.
///
/// The matrix is scanned row by row. When `dist[i, j] < threshold` the row `i` and
/// the column `j` are recorded the first time they are seen, so each index appears
/// at most once and the order is deterministic.
///
/// # Arguments
///
/// * `dist` - The `m x n` distance matrix.
/// * `threshold` - The distance under which a pair is kept, non-negative.
///
/// # Errors
///
/// Returns [`GmmRegError::InvalidParameter`] if the threshold is negative or NaN.
///
/// Example:
/// ```
/// use kornia_gmmreg::matrix::Matrix;
/// use kornia_gmmreg::pruning::pick_indices;
///
/// let dist = Matrix::from_rows(&[[0.5, 2.0], [3.0, 0.1]]);
/// let indices = pick_indices(&dist, 1.0).unwrap();
/// assert_eq!(indices.rows, vec![0, 1]);
/// assert_eq!(indices.cols, vec![0, 1]);
/// ```
pub fn pick_indices(dist: &Matrix, threshold: f64) -> Result<CorrespondenceIndices, GmmRegError> {
    if threshold.is_nan() || threshold < 0.0 {
        return Err(GmmRegError::InvalidParameter("threshold", threshold));
    }

    let mut row_seen = vec![false; dist.rows()];
    let mut col_seen = vec![false; dist.cols()];
    let mut indices = CorrespondenceIndices::default();

    for (i, row) in dist.iter_rows().enumerate() {
        for (j, &d) in row.iter().enumerate() {
            if d >= threshold {
                continue;
            }
            if !row_seen[i] {
                row_seen[i] = true;
                indices.rows.push(i);
            }
            if !col_seen[j] {
                col_seen[j] = true;
                indices.cols.push(j);
            }
        }
    }

    Ok(indices)
}

/// Gather the points at the given indices.
///
/// # Arguments
///
/// * `points` - The point set to select from.
/// * `indices` - The indices of the points to select, in output order.
///
/// # Returns
///
/// A new point set with one point per index. Empty indices give an empty point set.
///
/// # Errors
///
/// Returns [`GmmRegError::IndexOutOfBounds`] if any index is out of bounds.
pub fn select_points(points: &PointSet, indices: &[usize]) -> Result<PointSet, GmmRegError> {
    if let Some(&index) = indices.iter().find(|&&index| index >= points.len()) {
        return Err(GmmRegError::IndexOutOfBounds(index, points.len()));
    }

    let mut data = Vec::with_capacity(indices.len() * points.dim());
    for &index in indices {
        data.extend_from_slice(points.point(index));
    }

    PointSet::new(data, points.dim())
}

/// Find the working subsets of the model and the scene for the next optimization round.
///
/// The distances between the transformed model and the scene are pruned with
/// [`pick_indices`]; the model points whose transformed version has a scene point
/// within the threshold, and those scene points, are returned. When no pair is
/// under the threshold both subsets are empty.
///
/// # Arguments
///
/// * `model` - The model point set.
/// * `scene` - The scene point set.
/// * `transformed_model` - The model point set under the current transformation.
/// * `threshold` - The squared distance under which a pair is kept.
/// * `strategy` - The execution strategy of the distance computation.
///
/// # Returns
///
/// The working model and the working scene.
///
/// # Errors
///
/// * [`GmmRegError::InvalidShape`] if the model and the transformed model have a different
///   number of points.
/// * [`GmmRegError::DimensionMismatch`] if the transformed model and the scene have different
///   dimensions.
/// * [`GmmRegError::InvalidParameter`] if the threshold is negative or NaN.
pub fn find_working_pair(
    model: &PointSet,
    scene: &PointSet,
    transformed_model: &PointSet,
    threshold: f64,
    strategy: ExecutionStrategy,
) -> Result<(PointSet, PointSet), GmmRegError> {
    if model.len() != transformed_model.len() {
        return Err(GmmRegError::InvalidShape(
            model.len(),
            transformed_model.len(),
        ));
    }

    let dist = squared_distance_matrix(transformed_model, scene, strategy)?;
    let indices = pick_indices(&dist, threshold)?;

    log::debug!("selected rows: {}", indices.rows.len());
    log::debug!("selected cols: {}", indices.cols.len());

    let working_model = select_points(model, &indices.rows)?;
    let working_scene = select_points(scene, &indices.cols)?;

    Ok((working_model, working_scene))
}
