//! Centroid and scale normalization of point sets.
//!
//! Registration is run on normalized point sets so that the kernel scales are
//! comparable across inputs: every point set is centered at the origin and
//! rescaled to a unit root mean square distance to its centroid. The returned
//! [`Normalization`] maps the registered points back to the original frame.
//!
//! # Example
//!
//! ```
//! use kornia_gmmreg::normalize::{denormalize, normalize};
//! use kornia_gmmreg::pointset::PointSet;
//!
//! let original =
//!     PointSet::from_points(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0], [2.0, 2.0]]).unwrap();
//!
//! let mut points = original.clone();
//! let normalization = normalize(&mut points).unwrap();
//! assert_eq!(normalization.centroid, vec![1.0, 1.0]);
//!
//! denormalize(&mut points, &normalization).unwrap();
//! for (p, q) in points.as_slice().iter().zip(original.as_slice()) {
//!     assert!((p - q).abs() < 1e-12);
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    distance::squared_euclidean,
    error::GmmRegError,
    pointset::{check_non_empty, PointSet},
};

/// The affine map between a point set and its normalized version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    /// The mean of every coordinate of the original points.
    pub centroid: Vec<f64>,
    /// The root mean square distance of the original points to the centroid.
    pub scale: f64,
}

/// Normalize a point set in place.
///
/// The points are centered at their centroid and divided by
/// `scale = |X - centroid|_F / sqrt(n)`.
///
/// # Arguments
///
/// * `points` - The point set to normalize in place.
///
/// # Returns
///
/// The [`Normalization`] to pass to [`denormalize`] to recover the original points.
///
/// # Errors
///
/// * [`GmmRegError::EmptyPointSet`] if the point set is empty.
/// * [`GmmRegError::DegeneratePointSet`] if all the points coincide. The points are
///   left untouched.
pub fn normalize(points: &mut PointSet) -> Result<Normalization, GmmRegError> {
    check_non_empty(points)?;

    let num_points = points.len() as f64;

    let mut centroid = vec![0.0; points.dim()];
    for point in points.iter() {
        centroid
            .iter_mut()
            .zip(point.iter())
            .for_each(|(c, x)| *c += x);
    }
    centroid.iter_mut().for_each(|c| *c /= num_points);

    // frobenius norm of the centered points
    let norm = points
        .iter()
        .fold(0.0, |acc, point| acc + squared_euclidean(point, &centroid))
        .sqrt();
    let scale = norm / num_points.sqrt();

    if !scale.is_finite() || scale <= 0.0 {
        return Err(GmmRegError::DegeneratePointSet);
    }

    for point in points.iter_mut() {
        point
            .iter_mut()
            .zip(centroid.iter())
            .for_each(|(x, c)| *x = (*x - c) / scale);
    }

    log::debug!("normalized point set: centroid {:?} scale {}", centroid, scale);

    Ok(Normalization { centroid, scale })
}

/// Map a normalized point set back to the original frame in place.
///
/// Applies `X = X * scale + centroid`, the inverse of [`normalize`].
///
/// # Arguments
///
/// * `points` - The normalized point set.
/// * `normalization` - The normalization returned by [`normalize`].
///
/// # Errors
///
/// * [`GmmRegError::DimensionMismatch`] if the centroid and the points have different dimensions.
/// * [`GmmRegError::InvalidParameter`] if the scale is not a positive number.
pub fn denormalize(
    points: &mut PointSet,
    normalization: &Normalization,
) -> Result<(), GmmRegError> {
    if normalization.centroid.len() != points.dim() {
        return Err(GmmRegError::DimensionMismatch(
            points.dim(),
            normalization.centroid.len(),
        ));
    }

    let scale = normalization.scale;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(GmmRegError::InvalidParameter("scale", scale));
    }

    for point in points.iter_mut() {
        point
            .iter_mut()
            .zip(normalization.centroid.iter())
            .for_each(|(x, c)| *x = *x * scale + c);
    }

    Ok(())
}
