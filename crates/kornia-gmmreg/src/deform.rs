use crate::{
    error::GmmRegError,
    matrix::Matrix,
    parallel::{self, ExecutionStrategy},
    pointset::PointSet,
};

// compute lhs * rhs into a new row-major matrix
fn matmul(lhs: &Matrix, rhs: &Matrix, strategy: ExecutionStrategy) -> Result<Matrix, GmmRegError> {
    let parallelism = parallel::faer_parallelism(strategy)?;

    let (rows, cols) = (lhs.rows(), rhs.cols());
    let mut dst = Matrix::zeros(rows, cols);

    {
        let mut dst_mat = faer::mat::from_row_major_slice_mut(dst.as_slice_mut(), rows, cols);

        faer::linalg::matmul::matmul(
            &mut dst_mat,
            lhs.as_faer(),
            rhs.as_faer(),
            None,
            1.0,
            parallelism,
        );
    }

    Ok(dst)
}

/// Warp a point set with a kernel-parameterized deformation.
///
/// With an affine block the points are mapped as `[1 | x] * affine + basis * weights`,
/// the thin-plate spline model. Without it the kernel defines a displacement field
/// and the points are mapped as `x + basis * weights`, the Gaussian radial basis model.
///
/// # Arguments
///
/// * `model` - The model point set with `m` points of dimension `d`.
/// * `basis` - The `m x n` kernel between the model and the `n` control points.
/// * `affine` - Optional `(d + 1) x d` affine block. The first row is the translation.
/// * `weights` - The `n x d` non-rigid weights of the control points.
/// * `strategy` - The execution strategy of the matrix product.
///
/// # Returns
///
/// The deformed point set with `m` points.
///
/// # Errors
///
/// * [`GmmRegError::InvalidShape`] if the basis, the affine block or the weights do not
///   have the expected shape.
/// * [`GmmRegError::DimensionMismatch`] if the weights and the model have different dimensions.
pub fn deform(
    model: &PointSet,
    basis: &Matrix,
    affine: Option<&Matrix>,
    weights: &Matrix,
    strategy: ExecutionStrategy,
) -> Result<PointSet, GmmRegError> {
    let dim = model.dim();

    if basis.rows() != model.len() {
        return Err(GmmRegError::InvalidShape(model.len(), basis.rows()));
    }
    if weights.rows() != basis.cols() {
        return Err(GmmRegError::InvalidShape(basis.cols(), weights.rows()));
    }
    if weights.cols() != dim {
        return Err(GmmRegError::DimensionMismatch(dim, weights.cols()));
    }
    if let Some(affine) = affine {
        if affine.shape() != [dim + 1, dim] {
            return Err(GmmRegError::InvalidShape(
                (dim + 1) * dim,
                affine.rows() * affine.cols(),
            ));
        }
    }

    let mut deformed = matmul(basis, weights, strategy)?;

    for (out, x) in deformed
        .as_slice_mut()
        .chunks_exact_mut(dim)
        .zip(model.iter())
    {
        match affine {
            Some(affine) => {
                for (k, o) in out.iter_mut().enumerate() {
                    *o += affine[(0, k)]
                        + x.iter()
                            .enumerate()
                            .fold(0.0, |acc, (l, x_l)| acc + x_l * affine[(l + 1, k)]);
                }
            }
            None => out.iter_mut().zip(x.iter()).for_each(|(o, x_k)| *o += x_k),
        }
    }

    PointSet::new(deformed.into_vec(), dim)
}

/// Compute the bending energy of the non-rigid weights.
///
/// The energy is `trace(weights^T * gram * weights)`, the smoothness regularizer of the
/// thin-plate spline and Gaussian radial basis deformations.
///
/// # Arguments
///
/// * `gram` - The `n x n` kernel between the control points.
/// * `weights` - The `n x d` non-rigid weights of the control points.
/// * `strategy` - The execution strategy of the matrix product.
///
/// # Errors
///
/// Returns [`GmmRegError::InvalidShape`] if the gram is not square or does not match
/// the number of weights.
pub fn bending_energy(
    gram: &Matrix,
    weights: &Matrix,
    strategy: ExecutionStrategy,
) -> Result<f64, GmmRegError> {
    let n = weights.rows();
    if gram.shape() != [n, n] {
        return Err(GmmRegError::InvalidShape(n * n, gram.rows() * gram.cols()));
    }

    let gram_weights = matmul(gram, weights, strategy)?;

    let energy = weights
        .as_slice()
        .iter()
        .zip(gram_weights.as_slice().iter())
        .fold(0.0, |acc, (w, kw)| acc + w * kw);

    Ok(energy)
}
