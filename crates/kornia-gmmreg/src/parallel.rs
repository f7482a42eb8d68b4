use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The destination buffer is not a whole number of rows.
    #[error("destination of length {0} is not divisible by the row length {1}")]
    SizeMismatch(usize, usize),
}

/// Controls how the pairwise row loops are executed.
///
/// The pairwise loops are independent over the outer point index, so every row of
/// the output can be computed on its own. The result of an operation never depends
/// on the strategy used to compute it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small point sets, debugging, or when the overhead of
    /// parallelization outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Map an execution strategy to the parallelism of the `faer` kernels.
pub fn faer_parallelism(
    strategy: ExecutionStrategy,
) -> Result<faer::Parallelism<'static>, ParallelError> {
    match strategy {
        ExecutionStrategy::Serial => Ok(faer::Parallelism::None),
        // zero lets faer use all the threads of the global pool
        ExecutionStrategy::ParallelRows => Ok(faer::Parallelism::Rayon(0)),
        ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
        ExecutionStrategy::Fixed(n) => Ok(faer::Parallelism::Rayon(n)),
    }
}

/// Apply a function to every row of a row-major destination buffer.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `dst` - The destination buffer, made of rows of `row_len` elements.
/// * `row_len` - The number of elements in a row.
/// * `op` - The operation receiving the row index and the mutable row.
///
/// A zero `row_len` means there is nothing to write and the call is a no-op.
pub fn for_each_row<F>(
    strategy: ExecutionStrategy,
    dst: &mut [f64],
    row_len: usize,
    op: F,
) -> Result<(), ParallelError>
where
    F: Fn(usize, &mut [f64]) + Send + Sync,
{
    if row_len == 0 {
        return Ok(());
    }

    if dst.len() % row_len != 0 {
        return Err(ParallelError::SizeMismatch(dst.len(), row_len));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(i, row)| op(i, row));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(i, row)| op(i, row));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(row_len)
                    .enumerate()
                    .for_each(|(i, row)| op(i, row));
            });
        }
    }

    Ok(())
}
