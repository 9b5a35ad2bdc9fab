//! Batched probability distributions and the output heads that build them.
//!
//! A [`Distribution`] is a batch of independent distributions whose
//! parameters are tensors of shape `batch_shape`; every query returns a
//! tensor over that batch. A [`DistributionOutput`] is the matching model
//! head: it declares how many raw values the network must emit per
//! parameter and maps those unconstrained values into the family's domain.
//!
//! | Family | Parameters | Support | Output head |
//! |---|---|---|---|
//! | [`Beta`] | shape α > 0, shape β > 0 | (0, 1) | [`BetaOutput`] |
//!
//! # Example
//!
//! ```
//! use distrix::backend::CpuBackend;
//! use distrix::distribution::{BetaOutput, Distribution, DistributionOutput};
//! use ndarray::array;
//!
//! // raw network outputs, shape (batch, 1)
//! let alpha_raw = array![[0.3_f64], [-1.2]].into_dyn();
//! let beta_raw = array![[1.5_f64], [0.0]].into_dyn();
//!
//! let head = BetaOutput::new();
//! let args = head.domain_map(&CpuBackend, &[alpha_raw, beta_raw]).unwrap();
//! let distr = head.distribution(CpuBackend, args).unwrap();
//!
//! assert_eq!(distr.batch_shape(), vec![2]);
//! let mean = distr.mean().unwrap();
//! assert!(mean.iter().all(|&m| m > 0.0 && m < 1.0));
//! ```

mod beta;
mod beta_output;

#[cfg(test)]
mod tests;

pub use beta::Beta;
pub use beta_output::{BetaOutput, DOMAIN_EPSILON};

use alloc::vec::Vec;
use core::fmt;

use rand::Rng;

use crate::backend::{Backend, TensorError};
use crate::traits::FloatScalar;

/// Errors from distribution construction and evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributionError {
    /// A backend tensor operation failed.
    Tensor(TensorError),
    /// Parameter tensors that must share a shape do not.
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    /// `num_samples` was `Some(0)`.
    InvalidSampleCount,
    /// Wrong number of parameter tensors for the family.
    ArgumentCount { expected: usize, got: usize },
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tensor(e) => write!(f, "tensor operation failed: {e}"),
            Self::ShapeMismatch { expected, got } => {
                write!(f, "parameter shape mismatch: expected {expected:?}, got {got:?}")
            }
            Self::InvalidSampleCount => write!(f, "number of samples must be positive"),
            Self::ArgumentCount { expected, got } => {
                write!(f, "expected {expected} parameter tensors, got {got}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DistributionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tensor(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TensorError> for DistributionError {
    fn from(e: TensorError) -> Self {
        Self::Tensor(e)
    }
}

/// A batch of independent distributions evaluated through a [`Backend`].
///
/// All tensor-valued queries return one value per batch element (or, for
/// inputs that broadcast against the batch, per broadcast element).
pub trait Distribution<T: FloatScalar, B: Backend<T>> {
    /// Whether samples are differentiable with respect to the parameters.
    const IS_REPARAMETERIZABLE: bool;

    /// Backend the parameters live on.
    fn backend(&self) -> &B;

    /// Shape over which parameters vary.
    fn batch_shape(&self) -> Vec<usize>;

    /// Shape of a single draw; empty for scalar families.
    fn event_shape(&self) -> Vec<usize>;

    fn event_dim(&self) -> usize {
        self.event_shape().len()
    }

    fn batch_dim(&self) -> usize {
        self.batch_shape().len()
    }

    fn all_dim(&self) -> usize {
        self.batch_dim() + self.event_dim()
    }

    /// Log-density of `x`.
    fn log_prob(&self, x: &B::Tensor) -> Result<B::Tensor, DistributionError>;

    /// Density of `x`.
    fn prob(&self, x: &B::Tensor) -> Result<B::Tensor, DistributionError> {
        Ok(self.backend().exp(&self.log_prob(x)?))
    }

    /// Negative log-likelihood of `x`, the training loss.
    fn loss(&self, x: &B::Tensor) -> Result<B::Tensor, DistributionError> {
        Ok(self.backend().mul_scalar(&self.log_prob(x)?, -T::one()))
    }

    fn mean(&self) -> Result<B::Tensor, DistributionError>;

    fn variance(&self) -> Result<B::Tensor, DistributionError>;

    fn stddev(&self) -> Result<B::Tensor, DistributionError> {
        Ok(self.backend().sqrt(&self.variance()?))
    }

    /// Draw samples.
    ///
    /// With `None` the result has shape `batch_shape`; with `Some(n)` the
    /// `n` independent draws are stacked along a new leading axis, giving
    /// `(n, *batch_shape)`.
    fn sample<R: Rng + ?Sized>(
        &self,
        num_samples: Option<usize>,
        rng: &mut R,
    ) -> Result<B::Tensor, DistributionError>;

    /// Parameter tensors in constructor order.
    fn args(&self) -> Vec<B::Tensor>;
}

/// Model head producing a distribution family from raw network outputs.
pub trait DistributionOutput<T: FloatScalar, B: Backend<T>> {
    /// Family this head instantiates.
    type Distr: Distribution<T, B>;

    /// Raw width per parameter, in constructor order.
    fn args_dim(&self) -> Vec<(&'static str, usize)>;

    /// Total raw width, i.e. the output size of the projection layer.
    fn total_args_dim(&self) -> usize {
        self.args_dim().iter().map(|&(_, dim)| dim).sum()
    }

    /// Map raw tensors, given in [`args_dim`](Self::args_dim) order, into
    /// valid constructor arguments for [`Self::Distr`].
    fn domain_map(&self, backend: &B, raw: &[B::Tensor])
        -> Result<Vec<B::Tensor>, DistributionError>;

    /// Build the distribution from [`domain_map`](Self::domain_map) output.
    fn distribution(&self, backend: B, args: Vec<B::Tensor>)
        -> Result<Self::Distr, DistributionError>;

    fn event_shape(&self) -> Vec<usize>;

    fn event_dim(&self) -> usize {
        self.event_shape().len()
    }
}

/// Run `draw` once, or `n` times stacked along a new leading axis.
pub fn sample_multiple<T, B, F>(
    backend: &B,
    num_samples: Option<usize>,
    mut draw: F,
) -> Result<B::Tensor, DistributionError>
where
    T: FloatScalar,
    B: Backend<T>,
    F: FnMut() -> Result<B::Tensor, DistributionError>,
{
    match num_samples {
        None => draw(),
        Some(0) => Err(DistributionError::InvalidSampleCount),
        Some(n) => {
            let draws = (0..n).map(|_| draw()).collect::<Result<Vec<_>, _>>()?;
            Ok(backend.stack(&draws)?)
        }
    }
}
