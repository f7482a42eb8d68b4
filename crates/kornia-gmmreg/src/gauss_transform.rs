use crate::{
    distance::squared_euclidean,
    error::GmmRegError,
    matrix::Matrix,
    parallel::{self, ExecutionStrategy},
    pointset::{check_non_empty, check_same_dim, PointSet},
};

fn check_inputs(a: &PointSet, b: &PointSet, scale: f64) -> Result<(), GmmRegError> {
    check_non_empty(a)?;
    check_non_empty(b)?;
    check_same_dim(a, b)?;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(GmmRegError::InvalidParameter("scale", scale));
    }
    Ok(())
}

/// Compute the Gauss transform between two point sets.
///
/// The Gauss transform is the cross affinity between the two sets, the average of
/// `exp(-|a_i - b_j|^2 / scale^2)` over all the pairs of points. It is maximized
/// when the two point sets are aligned and lies in `(0, 1]`.
///
/// Every row `i` accumulates its own partial sum over `j` and the partial sums are
/// added in row order, so the result is the same for every execution strategy.
///
/// # Arguments
///
/// * `a` - The first point set with `m` points.
/// * `b` - The second point set with `n` points.
/// * `scale` - The scale of the Gaussian, strictly positive.
/// * `strategy` - The execution strategy of the row loop.
///
/// # Returns
///
/// The cost `1 / (m * n) * sum_ij exp(-|a_i - b_j|^2 / scale^2)`.
///
/// # Errors
///
/// * [`GmmRegError::EmptyPointSet`] if any of the point sets is empty.
/// * [`GmmRegError::DimensionMismatch`] if the point sets have different dimensions.
/// * [`GmmRegError::InvalidParameter`] if the scale is not a positive number.
///
/// Example:
/// ```
/// use kornia_gmmreg::gauss_transform::gauss_transform;
/// use kornia_gmmreg::parallel::ExecutionStrategy;
/// use kornia_gmmreg::pointset::PointSet;
///
/// let a = PointSet::from_points(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
/// let cost = gauss_transform(&a, &a, 1.0, ExecutionStrategy::Serial).unwrap();
/// assert!((cost - (2.0 + 2.0 * (-2.0f64).exp()) / 4.0).abs() < 1e-12);
/// ```
pub fn gauss_transform(
    a: &PointSet,
    b: &PointSet,
    scale: f64,
    strategy: ExecutionStrategy,
) -> Result<f64, GmmRegError> {
    check_inputs(a, b, scale)?;

    let scale2 = scale * scale;

    let mut row_costs = vec![0.0; a.len()];
    parallel::for_each_row(strategy, &mut row_costs, 1, |i, cost_i| {
        let a_i = a.point(i);
        cost_i[0] = b.iter().fold(0.0, |acc, b_j| {
            acc + (-squared_euclidean(a_i, b_j) / scale2).exp()
        });
    })?;

    let cross_term = row_costs.iter().fold(0.0, |acc, c| acc + c);

    Ok(cross_term / (a.len() * b.len()) as f64)
}

/// Compute the Gauss transform between two point sets and its gradient.
///
/// The gradient is taken with respect to the points of `a` only; `b` is a fixed
/// target and receives no gradient. The row `i` of the gradient is
/// `-2 / (m * n * scale^2) * sum_j exp(-|a_i - b_j|^2 / scale^2) * (a_i - b_j)`.
///
/// # Arguments
///
/// * `a` - The first point set with `m` points.
/// * `b` - The second point set with `n` points.
/// * `scale` - The scale of the Gaussian, strictly positive.
/// * `strategy` - The execution strategy of the row loop.
///
/// # Returns
///
/// The cost, identical to [`gauss_transform`], and the `m x d` gradient.
///
/// # Errors
///
/// * [`GmmRegError::EmptyPointSet`] if any of the point sets is empty.
/// * [`GmmRegError::DimensionMismatch`] if the point sets have different dimensions.
/// * [`GmmRegError::InvalidParameter`] if the scale is not a positive number.
pub fn gauss_transform_with_gradient(
    a: &PointSet,
    b: &PointSet,
    scale: f64,
    strategy: ExecutionStrategy,
) -> Result<(f64, Matrix), GmmRegError> {
    check_inputs(a, b, scale)?;

    let scale2 = scale * scale;
    let dim = a.dim();

    // each row holds the gradient of the point followed by its partial cost
    let stride = dim + 1;
    let mut rows = vec![0.0; a.len() * stride];

    parallel::for_each_row(strategy, &mut rows, stride, |i, row| {
        let a_i = a.point(i);
        let (grad_i, cost_i) = row.split_at_mut(dim);
        for b_j in b.iter() {
            let cost_ij = (-squared_euclidean(a_i, b_j) / scale2).exp();
            grad_i
                .iter_mut()
                .zip(a_i.iter().zip(b_j.iter()))
                .for_each(|(g, (a_id, b_jd))| *g -= cost_ij * 2.0 * (a_id - b_jd));
            cost_i[0] += cost_ij;
        }
    })?;

    let num_pairs = (a.len() * b.len()) as f64;
    let grad_denom = scale2 * num_pairs;

    let mut gradient = Matrix::zeros(a.len(), dim);
    let mut cross_term = 0.0;
    for (row, grad_row) in rows
        .chunks_exact(stride)
        .zip(gradient.as_slice_mut().chunks_exact_mut(dim))
    {
        grad_row
            .iter_mut()
            .zip(row[..dim].iter())
            .for_each(|(g, v)| *g = v / grad_denom);
        cross_term += row[dim];
    }

    Ok((cross_term / num_pairs, gradient))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn create_random_points(rng: &mut StdRng, num_points: usize, dim: usize) -> PointSet {
        let data = (0..num_points * dim)
            .map(|_| rng.random_range(-1.0..1.0))
            .collect::<Vec<f64>>();
        PointSet::new(data, dim).expect("valid shape")
    }

    #[test]
    fn test_gauss_transform_known_value() -> Result<(), GmmRegError> {
        let a = PointSet::from_points(&[[0.0, 0.0], [1.0, 1.0]])?;
        let b = PointSet::from_points(&[[0.0, 0.0], [1.0, 1.0]])?;

        let cost = gauss_transform(&a, &b, 1.0, ExecutionStrategy::Serial)?;

        let expected = (2.0 + 2.0 * (-2.0f64).exp()) / 4.0;
        assert_relative_eq!(cost, expected, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn test_gauss_transform_range() -> Result<(), GmmRegError> {
        let mut rng = StdRng::seed_from_u64(42);
        for scale in [0.1, 0.5, 1.0, 4.0] {
            let a = create_random_points(&mut rng, 20, 3);
            let b = create_random_points(&mut rng, 15, 3);
            let cost = gauss_transform(&a, &b, scale, ExecutionStrategy::Serial)?;
            assert!(cost > 0.0 && cost <= 1.0, "cost {cost} out of range");
        }

        // a single pair of coincident points reaches the maximum
        let a = PointSet::from_points(&[[0.5, -0.5]])?;
        assert_eq!(gauss_transform(&a, &a, 0.3, ExecutionStrategy::Serial)?, 1.0);

        Ok(())
    }

    #[test]
    fn test_gauss_transform_symmetric() -> Result<(), GmmRegError> {
        let mut rng = StdRng::seed_from_u64(7);
        let a = create_random_points(&mut rng, 12, 2);
        let b = create_random_points(&mut rng, 12, 2);

        let ab = gauss_transform(&a, &b, 0.8, ExecutionStrategy::Serial)?;
        let ba = gauss_transform(&b, &a, 0.8, ExecutionStrategy::Serial)?;

        assert_relative_eq!(ab, ba, max_relative = 1e-12);

        Ok(())
    }

    #[test]
    fn test_gauss_transform_gradient_finite_differences() -> Result<(), GmmRegError> {
        let mut rng = StdRng::seed_from_u64(3);
        let a = create_random_points(&mut rng, 8, 3);
        let b = create_random_points(&mut rng, 10, 3);
        let scale = 0.7;
        let eps = 1e-6;

        let (_, gradient) =
            gauss_transform_with_gradient(&a, &b, scale, ExecutionStrategy::Serial)?;
        assert_eq!(gradient.shape(), [a.len(), a.dim()]);

        for k in 0..a.as_slice().len() {
            let mut a_plus = a.clone();
            a_plus.as_slice_mut()[k] += eps;
            let mut a_minus = a.clone();
            a_minus.as_slice_mut()[k] -= eps;

            let cost_plus = gauss_transform(&a_plus, &b, scale, ExecutionStrategy::Serial)?;
            let cost_minus = gauss_transform(&a_minus, &b, scale, ExecutionStrategy::Serial)?;
            let finite_diff = (cost_plus - cost_minus) / (2.0 * eps);

            assert_relative_eq!(
                finite_diff,
                gradient.as_slice()[k],
                epsilon = 1e-8,
                max_relative = 1e-4
            );
        }

        Ok(())
    }

    #[test]
    fn test_gauss_transform_with_gradient_same_cost() -> Result<(), GmmRegError> {
        let mut rng = StdRng::seed_from_u64(11);
        let a = create_random_points(&mut rng, 9, 2);
        let b = create_random_points(&mut rng, 5, 2);

        let cost = gauss_transform(&a, &b, 0.5, ExecutionStrategy::Serial)?;
        let (cost_grad, _) = gauss_transform_with_gradient(&a, &b, 0.5, ExecutionStrategy::Serial)?;

        assert_eq!(cost, cost_grad);

        Ok(())
    }

    #[test]
    fn test_gauss_transform_gradient_at_coincident_points() -> Result<(), GmmRegError> {
        let a = PointSet::from_points(&[[1.0, 2.0, 3.0]])?;
        let (cost, gradient) =
            gauss_transform_with_gradient(&a, &a, 1.0, ExecutionStrategy::Serial)?;
        assert_eq!(cost, 1.0);
        assert_eq!(gradient.as_slice(), &[0.0, 0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_gauss_transform_gradient_points_towards_target() -> Result<(), GmmRegError> {
        let a = PointSet::from_points(&[[0.0, 0.0]])?;
        let b = PointSet::from_points(&[[1.0, 0.0]])?;

        let (_, gradient) = gauss_transform_with_gradient(&a, &b, 1.0, ExecutionStrategy::Serial)?;

        // d/da exp(-(a - b)^2) = -2 (a - b) exp(-(a - b)^2)
        assert_relative_eq!(gradient[(0, 0)], 2.0 * (-1.0f64).exp(), epsilon = 1e-12);
        assert_eq!(gradient[(0, 1)], 0.0);

        Ok(())
    }

    #[test]
    fn test_gauss_transform_strategies_agree() -> Result<(), GmmRegError> {
        let mut rng = StdRng::seed_from_u64(5);
        let a = create_random_points(&mut rng, 64, 3);
        let b = create_random_points(&mut rng, 33, 3);

        let serial = gauss_transform_with_gradient(&a, &b, 0.4, ExecutionStrategy::Serial)?;
        let rows = gauss_transform_with_gradient(&a, &b, 0.4, ExecutionStrategy::ParallelRows)?;
        let fixed = gauss_transform_with_gradient(&a, &b, 0.4, ExecutionStrategy::Fixed(3))?;

        assert_eq!(serial, rows);
        assert_eq!(serial, fixed);
        assert_eq!(
            gauss_transform(&a, &b, 0.4, ExecutionStrategy::Serial)?,
            gauss_transform(&a, &b, 0.4, ExecutionStrategy::ParallelRows)?
        );

        Ok(())
    }

    #[test]
    fn test_gauss_transform_invalid_inputs() -> Result<(), GmmRegError> {
        let a = PointSet::from_points(&[[0.0, 0.0]])?;
        let b = PointSet::from_points(&[[0.0, 0.0, 0.0]])?;
        let empty = PointSet::empty(2)?;

        assert_eq!(
            gauss_transform(&a, &b, 1.0, ExecutionStrategy::Serial),
            Err(GmmRegError::DimensionMismatch(2, 3))
        );
        assert_eq!(
            gauss_transform(&empty, &a, 1.0, ExecutionStrategy::Serial),
            Err(GmmRegError::EmptyPointSet)
        );
        assert_eq!(
            gauss_transform_with_gradient(&a, &empty, 1.0, ExecutionStrategy::Serial),
            Err(GmmRegError::EmptyPointSet)
        );
        assert_eq!(
            gauss_transform(&a, &a, 0.0, ExecutionStrategy::Serial),
            Err(GmmRegError::InvalidParameter("scale", 0.0))
        );
        assert_eq!(
            gauss_transform_with_gradient(&a, &a, -1.0, ExecutionStrategy::Serial),
            Err(GmmRegError::InvalidParameter("scale", -1.0))
        );

        Ok(())
    }
}
