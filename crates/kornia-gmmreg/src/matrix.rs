use std::ops::{Index, IndexMut};

use crate::error::GmmRegError;

/// A dense row-major matrix of `f64` values.
///
/// Holds the results of the pairwise operations: distance, affinity and kernel
/// matrices, and gradients with respect to a point set.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    // The row-major data of the matrix.
    pub(crate) data: Vec<f64>,
    // The number of rows.
    pub(crate) rows: usize,
    // The number of columns.
    pub(crate) cols: usize,
}

impl Matrix {
    /// Create a new matrix from row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`GmmRegError::InvalidShape`] if `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self, GmmRegError> {
        if data.len() != rows * cols {
            return Err(GmmRegError::InvalidShape(rows * cols, data.len()));
        }
        Ok(Self { data, rows, cols })
    }

    /// Create a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create a matrix from its rows.
    pub fn from_rows<const N: usize>(rows: &[[f64; N]]) -> Self {
        Self {
            data: rows.iter().flatten().copied().collect(),
            rows: rows.len(),
            cols: N,
        }
    }

    /// Get the number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the shape of the matrix as `[rows, cols]`.
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Get the element at `(row, col)` or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[row * self.cols + col])
    }

    /// Get a row of the matrix.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate over the rows of the matrix.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Get the row-major data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get the row-major data as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the matrix and return its row-major data.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Create a `faer` view of the matrix.
    pub fn as_faer(&self) -> faer::MatRef<'_, f64> {
        faer::mat::from_row_major_slice(self.data.as_slice(), self.rows, self.cols)
    }

    /// Copy a `faer` matrix into a new row-major matrix.
    pub fn from_faer(mat: faer::MatRef<'_, f64>) -> Self {
        let (rows, cols) = (mat.nrows(), mat.ncols());
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(mat.read(i, j));
            }
        }
        Self { data, rows, cols }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        &mut self.data[row * self.cols + col]
    }
}
