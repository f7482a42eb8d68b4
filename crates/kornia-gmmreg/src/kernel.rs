use serde::{Deserialize, Serialize};

use crate::{
    distance::squared_euclidean,
    error::GmmRegError,
    matrix::Matrix,
    parallel::{self, ExecutionStrategy},
    pointset::{check_same_dim, PointSet},
};

/// The kernel used to parameterize a non-rigid deformation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistrationKernel {
    /// Thin-plate spline radial basis. Only defined for 2D and 3D points.
    Tps,
    /// Gaussian radial basis with the given bandwidth.
    Gaussian {
        /// The bandwidth of the Gaussian, strictly positive.
        bandwidth: f64,
    },
}

/// The kernel matrices of a deformation model.
///
/// The `basis` evaluates the kernel between the model points and the control
/// points (`m x n`) and the `gram` evaluates it between the control points
/// themselves (`n x n`). When both are the same value the gram is not stored
/// twice and [`KernelPair::gram`] returns the basis.
#[derive(Debug, Clone)]
pub struct KernelPair {
    basis: Matrix,
    gram: Option<Matrix>,
}

impl KernelPair {
    /// Get the kernel matrix between the model and the control points.
    pub fn basis(&self) -> &Matrix {
        &self.basis
    }

    /// Get the kernel matrix between the control points.
    pub fn gram(&self) -> &Matrix {
        self.gram.as_ref().unwrap_or(&self.basis)
    }

    /// Check if the gram matrix is shared with the basis.
    pub fn is_shared(&self) -> bool {
        self.gram.is_none()
    }

    /// Consume the pair and return the owned `(basis, gram)` matrices.
    pub fn into_parts(self) -> (Matrix, Matrix) {
        match self.gram {
            Some(gram) => (self.basis, gram),
            None => (self.basis.clone(), self.basis),
        }
    }
}

impl PartialEq for KernelPair {
    fn eq(&self, other: &Self) -> bool {
        self.basis() == other.basis() && self.gram() == other.gram()
    }
}

fn check_bandwidth(bandwidth: f64) -> Result<(), GmmRegError> {
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return Err(GmmRegError::InvalidParameter("bandwidth", bandwidth));
    }
    Ok(())
}

// evaluate a radial function over all the pairs of points
fn kernel_matrix<F>(
    a: &PointSet,
    b: &PointSet,
    strategy: ExecutionStrategy,
    radial_fn: F,
) -> Result<Matrix, GmmRegError>
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
{
    let mut kernel = Matrix::zeros(a.len(), b.len());

    parallel::for_each_row(strategy, kernel.as_slice_mut(), b.len(), |i, row| {
        let a_i = a.point(i);
        row.iter_mut()
            .zip(b.iter())
            .for_each(|(k, b_j)| *k = radial_fn(a_i, b_j));
    })?;

    Ok(kernel)
}

/// Compute the Gaussian affinity matrix between two point sets.
///
/// The entry `(i, j)` is `exp(-|a_i - b_j|^2 / (2 * bandwidth^2))`.
///
/// # Arguments
///
/// * `a` - The first point set with `m` points.
/// * `b` - The second point set with `n` points.
/// * `bandwidth` - The bandwidth of the Gaussian, strictly positive.
/// * `strategy` - The execution strategy of the row loop.
///
/// # Returns
///
/// The `m x n` affinity matrix.
///
/// # Errors
///
/// * [`GmmRegError::InvalidParameter`] if the bandwidth is not a positive number.
/// * [`GmmRegError::DimensionMismatch`] if the point sets have different dimensions.
pub fn gaussian_affinity(
    a: &PointSet,
    b: &PointSet,
    bandwidth: f64,
    strategy: ExecutionStrategy,
) -> Result<Matrix, GmmRegError> {
    check_bandwidth(bandwidth)?;
    check_same_dim(a, b)?;

    let denom = -2.0 * bandwidth * bandwidth;

    kernel_matrix(a, b, strategy, |a_i, b_j| {
        (squared_euclidean(a_i, b_j) / denom).exp()
    })
}

/// Thin-plate spline radial basis in 2D: `r * ln(r) / 2` with `r` the squared distance.
fn tps_radial_basis_2d(a: &[f64], b: &[f64]) -> f64 {
    let r = squared_euclidean(a, b);
    if r > 0.0 {
        r * r.ln() / 2.0
    } else {
        0.0
    }
}

/// Thin-plate spline radial basis in 3D: `-r` with `r` the Euclidean distance.
fn tps_radial_basis_3d(a: &[f64], b: &[f64]) -> f64 {
    -squared_euclidean(a, b).sqrt()
}

/// Compute the thin-plate spline kernel matrices.
///
/// For 2D points the radial basis is `r * ln(r) / 2` where `r` is the squared
/// distance, which equals `|x|^2 * ln(|x|)`; it is zero when `r` is zero. For 3D
/// points the radial basis is `-|x|`.
///
/// Reference: Rohr, K. "Landmark-Based Image Analysis", p. 195.
///
/// # Arguments
///
/// * `model` - The model point set with `m` points.
/// * `ctrl_pts` - The control points with `n` points.
/// * `strategy` - The execution strategy of the row loops.
///
/// # Returns
///
/// A [`KernelPair`] holding `U` (`m x n`) as basis and `K` (`n x n`) as gram.
///
/// # Errors
///
/// * [`GmmRegError::DimensionMismatch`] if the point sets have different dimensions.
/// * [`GmmRegError::UnsupportedDimension`] if the points are not 2D or 3D.
///
/// Example:
/// ```
/// use kornia_gmmreg::kernel::tps_kernel;
/// use kornia_gmmreg::parallel::ExecutionStrategy;
/// use kornia_gmmreg::pointset::PointSet;
///
/// let ctrl_pts = PointSet::from_points(&[[0.0, 0.0], [0.0, 2.0]]).unwrap();
/// let kernel = tps_kernel(&ctrl_pts, &ctrl_pts, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(kernel.gram()[(0, 0)], 0.0);
/// assert_eq!(kernel.gram()[(0, 1)], 2.0 * 4.0f64.ln());
/// ```
pub fn tps_kernel(
    model: &PointSet,
    ctrl_pts: &PointSet,
    strategy: ExecutionStrategy,
) -> Result<KernelPair, GmmRegError> {
    check_same_dim(model, ctrl_pts)?;

    let radial_fn: fn(&[f64], &[f64]) -> f64 = match ctrl_pts.dim() {
        2 => tps_radial_basis_2d,
        3 => tps_radial_basis_3d,
        dim => return Err(GmmRegError::UnsupportedDimension(dim)),
    };

    let basis = kernel_matrix(model, ctrl_pts, strategy, radial_fn)?;
    let gram = kernel_matrix(ctrl_pts, ctrl_pts, strategy, radial_fn)?;

    Ok(KernelPair {
        basis,
        gram: Some(gram),
    })
}

/// Compute the Gaussian radial basis kernel matrices.
///
/// The basis is `G = gaussian_affinity(model, ctrl_pts)` and the gram is
/// `K = gaussian_affinity(ctrl_pts, ctrl_pts)`. When the model and the control
/// points are equal, `K` is the same value as `G` and is not recomputed.
///
/// # Arguments
///
/// * `model` - The model point set with `m` points.
/// * `ctrl_pts` - The control points with `n` points.
/// * `bandwidth` - The bandwidth of the Gaussian, strictly positive.
/// * `strategy` - The execution strategy of the row loops.
///
/// # Errors
///
/// * [`GmmRegError::InvalidParameter`] if the bandwidth is not a positive number.
/// * [`GmmRegError::DimensionMismatch`] if the point sets have different dimensions.
pub fn gaussian_kernel_pair(
    model: &PointSet,
    ctrl_pts: &PointSet,
    bandwidth: f64,
    strategy: ExecutionStrategy,
) -> Result<KernelPair, GmmRegError> {
    let basis = gaussian_affinity(model, ctrl_pts, bandwidth, strategy)?;

    if model == ctrl_pts {
        log::debug!("model equals control points, sharing the gaussian gram matrix");
        return Ok(KernelPair { basis, gram: None });
    }

    let gram = gaussian_affinity(ctrl_pts, ctrl_pts, bandwidth, strategy)?;

    Ok(KernelPair {
        basis,
        gram: Some(gram),
    })
}

/// Compute the kernel matrices of the given deformation kernel.
///
/// # Arguments
///
/// * `model` - The model point set with `m` points.
/// * `ctrl_pts` - The control points with `n` points.
/// * `kernel` - The kernel to evaluate.
/// * `strategy` - The execution strategy of the row loops.
pub fn compute_kernel(
    model: &PointSet,
    ctrl_pts: &PointSet,
    kernel: &RegistrationKernel,
    strategy: ExecutionStrategy,
) -> Result<KernelPair, GmmRegError> {
    match kernel {
        RegistrationKernel::Tps => tps_kernel(model, ctrl_pts, strategy),
        RegistrationKernel::Gaussian { bandwidth } => {
            gaussian_kernel_pair(model, ctrl_pts, *bandwidth, strategy)
        }
    }
}
