use alloc::vec;
use alloc::vec::Vec;

use super::{Beta, DistributionError, DistributionOutput};
use crate::backend::Backend;
use crate::special::cst;
use crate::traits::FloatScalar;

/// Floor added after softplus so mapped parameters stay strictly positive
/// even when softplus underflows to zero.
pub const DOMAIN_EPSILON: f64 = 1e-8;

/// Output head for [`Beta`]: one raw value each for α and β.
///
/// Raw tensors of shape `(*batch_shape, 1)` are mapped through
/// `softplus(x) + 1e-8` and the trailing axis is squeezed, yielding
/// `(alpha, beta)` of shape `batch_shape`.
///
/// ```
/// use distrix::backend::CpuBackend;
/// use distrix::distribution::BetaOutput;
/// use ndarray::array;
///
/// let raw = array![[-1000.0_f64], [0.0], [5.0]].into_dyn();
/// let (alpha, beta) = BetaOutput::new().map_args(&CpuBackend, &raw, &raw).unwrap();
/// assert_eq!(alpha.shape(), &[3]);
/// assert!(beta.iter().all(|&v| v >= 1e-8));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BetaOutput;

impl BetaOutput {
    pub fn new() -> Self {
        Self
    }

    /// Typed form of [`DistributionOutput::domain_map`].
    pub fn map_args<T, B>(
        &self,
        backend: &B,
        alpha_raw: &B::Tensor,
        beta_raw: &B::Tensor,
    ) -> Result<(B::Tensor, B::Tensor), DistributionError>
    where
        T: FloatScalar,
        B: Backend<T>,
    {
        let eps = cst::<T>(DOMAIN_EPSILON);
        let alpha = backend.add_scalar(&backend.softplus(alpha_raw), eps);
        let beta = backend.add_scalar(&backend.softplus(beta_raw), eps);
        Ok((backend.squeeze(alpha, -1)?, backend.squeeze(beta, -1)?))
    }
}

impl<T: FloatScalar, B: Backend<T>> DistributionOutput<T, B> for BetaOutput {
    type Distr = Beta<T, B>;

    fn args_dim(&self) -> Vec<(&'static str, usize)> {
        vec![("alpha", 1), ("beta", 1)]
    }

    fn domain_map(&self, backend: &B, raw: &[B::Tensor]) -> Result<Vec<B::Tensor>, DistributionError> {
        match raw {
            [alpha_raw, beta_raw] => {
                let (alpha, beta) = self.map_args::<T, B>(backend, alpha_raw, beta_raw)?;
                Ok(vec![alpha, beta])
            }
            _ => Err(DistributionError::ArgumentCount {
                expected: 2,
                got: raw.len(),
            }),
        }
    }

    fn distribution(&self, backend: B, args: Vec<B::Tensor>) -> Result<Beta<T, B>, DistributionError> {
        let [alpha, beta]: [B::Tensor; 2] =
            args.try_into()
                .map_err(|args: Vec<B::Tensor>| DistributionError::ArgumentCount {
                    expected: 2,
                    got: args.len(),
                })?;
        Beta::new(backend, alpha, beta)
    }

    fn event_shape(&self) -> Vec<usize> {
        Vec::new()
    }
}
