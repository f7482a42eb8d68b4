use crate::{error::GmmRegError, matrix::Matrix};

/// An ordered set of points sharing the same dimension.
///
/// The points are stored as a dense row-major `n x d` matrix where row `i` is the
/// point `i`. The dimension is at least one; a set without points is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    // The row-major coordinates of the points.
    data: Vec<f64>,
    // The number of coordinates per point.
    dim: usize,
}

impl PointSet {
    /// Create a new point set from row-major coordinates.
    ///
    /// # Arguments
    ///
    /// * `data` - The coordinates, point after point.
    /// * `dim` - The number of coordinates of each point.
    ///
    /// # Errors
    ///
    /// Returns [`GmmRegError::InvalidShape`] if `dim` is zero or the length of
    /// `data` is not a multiple of `dim`.
    ///
    /// Example:
    ///
    /// ```
    /// use kornia_gmmreg::pointset::PointSet;
    ///
    /// let points = PointSet::new(vec![0.0, 0.0, 1.0, 1.0], 2).unwrap();
    /// assert_eq!(points.len(), 2);
    /// assert_eq!(points.point(1), &[1.0, 1.0]);
    /// ```
    pub fn new(data: Vec<f64>, dim: usize) -> Result<Self, GmmRegError> {
        if dim == 0 {
            return Err(GmmRegError::InvalidShape(1, 0));
        }
        if data.len() % dim != 0 {
            let expected = (data.len() / dim + 1) * dim;
            return Err(GmmRegError::InvalidShape(expected, data.len()));
        }
        Ok(Self { data, dim })
    }

    /// Create a new point set from fixed size points.
    pub fn from_points<const D: usize>(points: &[[f64; D]]) -> Result<Self, GmmRegError> {
        Self::new(points.iter().flatten().copied().collect(), D)
    }

    /// Create a point set without points.
    pub fn empty(dim: usize) -> Result<Self, GmmRegError> {
        Self::new(Vec::new(), dim)
    }

    /// Get the number of points in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Check if the point set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of coordinates of each point.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get the coordinates of a point.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn point(&self, index: usize) -> &[f64] {
        &self.data[index * self.dim..(index + 1) * self.dim]
    }

    /// Iterate over the points.
    pub fn iter(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.dim)
    }

    /// Iterate mutably over the points.
    pub fn iter_mut(&mut self) -> std::slice::ChunksExactMut<'_, f64> {
        self.data.chunks_exact_mut(self.dim)
    }

    /// Get as reference the row-major coordinates.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get as mutable reference the row-major coordinates.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the point set and return its row-major coordinates.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Create a `faer` view of the points as an `n x d` matrix.
    pub fn as_faer(&self) -> faer::MatRef<'_, f64> {
        faer::mat::from_row_major_slice(self.data.as_slice(), self.len(), self.dim)
    }
}

impl From<PointSet> for Matrix {
    fn from(points: PointSet) -> Self {
        Matrix {
            rows: points.len(),
            cols: points.dim,
            data: points.data,
        }
    }
}

impl TryFrom<Matrix> for PointSet {
    type Error = GmmRegError;

    fn try_from(matrix: Matrix) -> Result<Self, Self::Error> {
        let dim = matrix.cols();
        PointSet::new(matrix.into_vec(), dim)
    }
}

/// Check that two point sets have the same dimension.
pub(crate) fn check_same_dim(a: &PointSet, b: &PointSet) -> Result<(), GmmRegError> {
    if a.dim() != b.dim() {
        return Err(GmmRegError::DimensionMismatch(a.dim(), b.dim()));
    }
    Ok(())
}

/// Check that a point set has at least one point.
pub(crate) fn check_non_empty(points: &PointSet) -> Result<(), GmmRegError> {
    if points.is_empty() {
        return Err(GmmRegError::EmptyPointSet);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointset() -> Result<(), GmmRegError> {
        let points = PointSet::from_points(&[[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]])?;

        assert_eq!(points.len(), 2);
        assert_eq!(points.dim(), 3);
        assert!(!points.is_empty());
        assert_eq!(points.point(1), &[1.0, 2.0, 3.0]);

        if let Some(p0) = points.iter().next() {
            assert_eq!(p0, &[0.0, 0.0, 0.0]);
        }

        let view = points.as_faer();
        assert_eq!(view.nrows(), 2);
        assert_eq!(view.ncols(), 3);
        assert_eq!(view.read(1, 2), 3.0);

        Ok(())
    }

    #[test]
    fn test_pointset_invalid_shape() {
        assert_eq!(
            PointSet::new(vec![1.0, 2.0, 3.0], 2),
            Err(GmmRegError::InvalidShape(4, 3))
        );
        assert_eq!(
            PointSet::new(vec![1.0], 0),
            Err(GmmRegError::InvalidShape(1, 0))
        );
    }

    #[test]
    fn test_pointset_empty() -> Result<(), GmmRegError> {
        let points = PointSet::empty(2)?;
        assert_eq!(points.len(), 0);
        assert_eq!(points.dim(), 2);
        assert!(points.is_empty());
        assert_eq!(points.iter().count(), 0);
        Ok(())
    }

    #[test]
    fn test_pointset_matrix_conversion() -> Result<(), GmmRegError> {
        let points = PointSet::from_points(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])?;
        let matrix = Matrix::from(points.clone());
        assert_eq!(matrix.shape(), [3, 2]);
        assert_eq!(matrix[(2, 1)], 6.0);
        assert_eq!(PointSet::try_from(matrix)?, points);
        Ok(())
    }

    #[test]
    fn test_check_same_dim() -> Result<(), GmmRegError> {
        let a = PointSet::from_points(&[[0.0, 0.0]])?;
        let b = PointSet::from_points(&[[0.0, 0.0, 0.0]])?;
        assert_eq!(check_same_dim(&a, &b), Err(GmmRegError::DimensionMismatch(2, 3)));
        assert_eq!(check_non_empty(&PointSet::empty(2)?), Err(GmmRegError::EmptyPointSet));
        Ok(())
    }
}
