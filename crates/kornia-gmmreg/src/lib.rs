#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kornia GMM Registration Kernels
//!
//! Building blocks of probabilistic point-set registration: the objective and
//! its gradient, the deformation kernels and the pruning of correspondences.
//! The optimization loop that drives them lives outside of this crate.
//!
//! ## Example: one gradient step
//!
//! ```
//! use kornia_gmmreg::{
//!     gauss_transform, normalize, parallel::ExecutionStrategy, pointset::PointSet,
//! };
//!
//! let mut model = PointSet::from_points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
//! let mut scene = PointSet::from_points(&[[0.1, 0.0], [1.1, 0.0], [0.1, 1.0]]).unwrap();
//!
//! normalize::normalize(&mut model).unwrap();
//! let scene_normalization = normalize::normalize(&mut scene).unwrap();
//!
//! let (cost, gradient) = gauss_transform::gauss_transform_with_gradient(
//!     &model,
//!     &scene,
//!     0.5,
//!     ExecutionStrategy::Serial,
//! )
//! .unwrap();
//!
//! assert!(cost > 0.0 && cost <= 1.0);
//! assert_eq!(gradient.shape(), [model.len(), model.dim()]);
//!
//! normalize::denormalize(&mut model, &scene_normalization).unwrap();
//! ```

/// Non-rigid deformation of point sets.
pub mod deform;

/// Pairwise squared distances.
pub mod distance;

/// Error types for the registration kernels.
pub mod error;

/// Gauss transform objective and its gradient.
pub mod gauss_transform;

/// Thin-plate spline and Gaussian radial basis kernels.
pub mod kernel;

/// Dense row-major matrix.
pub mod matrix;

/// Centroid and scale normalization.
pub mod normalize;

/// Execution strategies of the pairwise row loops.
pub mod parallel;

/// Point set container.
pub mod pointset;

/// Distance-based pruning of correspondences.
pub mod pruning;

pub use error::GmmRegError;
pub use matrix::Matrix;
pub use pointset::PointSet;
