use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use rand::Rng;

use super::{sample_multiple, Distribution, DistributionError};
use crate::backend::Backend;
use crate::traits::FloatScalar;

/// Batch of Beta distributions with shape parameters α and β on (0, 1).
///
/// f(x) = x^{α−1} (1−x)^{β−1} Γ(α+β) / (Γ(α) Γ(β)).
///
/// `alpha` and `beta` have the same shape, which is the batch shape; the
/// event shape is empty. Positivity of the parameters is not checked here,
/// use [`BetaOutput`](super::BetaOutput) to produce valid ones from raw
/// network outputs.
///
/// # Example
///
/// ```
/// use distrix::backend::CpuBackend;
/// use distrix::distribution::{Beta, Distribution};
/// use ndarray::array;
///
/// let b = Beta::new(CpuBackend, array![2.0_f64].into_dyn(), array![5.0_f64].into_dyn()).unwrap();
/// assert!((b.mean().unwrap()[[0]] - 2.0 / 7.0).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct Beta<T: FloatScalar, B: Backend<T>> {
    alpha: B::Tensor,
    beta: B::Tensor,
    backend: B,
    _scalar: PhantomData<T>,
}

impl<T: FloatScalar, B: Backend<T>> Beta<T, B> {
    /// Create a batch of Beta distributions.
    ///
    /// Fails with [`DistributionError::ShapeMismatch`] if `alpha` and `beta`
    /// differ in shape.
    pub fn new(backend: B, alpha: B::Tensor, beta: B::Tensor) -> Result<Self, DistributionError> {
        let alpha_shape = backend.shape(&alpha);
        let beta_shape = backend.shape(&beta);
        if alpha_shape != beta_shape {
            return Err(DistributionError::ShapeMismatch {
                expected: alpha_shape,
                got: beta_shape,
            });
        }
        log::trace!("Beta::new batch_shape={alpha_shape:?}");
        Ok(Self {
            alpha,
            beta,
            backend,
            _scalar: PhantomData,
        })
    }

    #[inline]
    pub fn alpha(&self) -> &B::Tensor {
        &self.alpha
    }

    #[inline]
    pub fn beta(&self) -> &B::Tensor {
        &self.beta
    }

    /// α + β
    fn concentration(&self) -> Result<B::Tensor, DistributionError> {
        Ok(self.backend.add(&self.alpha, &self.beta)?)
    }
}

impl<T: FloatScalar, B: Backend<T>> Distribution<T, B> for Beta<T, B> {
    // Gamma-ratio draws carry no gradient path to α, β.
    const IS_REPARAMETERIZABLE: bool = false;

    fn backend(&self) -> &B {
        &self.backend
    }

    fn batch_shape(&self) -> Vec<usize> {
        self.backend.shape(&self.alpha)
    }

    fn event_shape(&self) -> Vec<usize> {
        Vec::new()
    }

    fn event_dim(&self) -> usize {
        0
    }

    /// (α−1) ln x + (β−1) ln(1−x) − ln Γ(α) − ln Γ(β) + ln Γ(α+β)
    ///
    /// `x` is not clipped: values outside (0, 1) give NaN or ±∞.
    fn log_prob(&self, x: &B::Tensor) -> Result<B::Tensor, DistributionError> {
        let f = &self.backend;
        let one = T::one();

        let alpha_m1 = f.add_scalar(&self.alpha, -one);
        let beta_m1 = f.add_scalar(&self.beta, -one);
        let log_x = f.log(x);
        let log_1mx = f.log(&f.rsub_scalar(one, x));

        let kernel = f.add(&f.mul(&alpha_m1, &log_x)?, &f.mul(&beta_m1, &log_1mx)?)?;
        let log_norm = f.sub(
            &f.gammaln(&self.concentration()?),
            &f.add(&f.gammaln(&self.alpha), &f.gammaln(&self.beta))?,
        )?;
        Ok(f.add(&kernel, &log_norm)?)
    }

    /// α / (α+β)
    fn mean(&self) -> Result<B::Tensor, DistributionError> {
        Ok(self.backend.div(&self.alpha, &self.concentration()?)?)
    }

    /// αβ / ((α+β)² (α+β+1))
    fn variance(&self) -> Result<B::Tensor, DistributionError> {
        let f = &self.backend;
        let ab = self.concentration()?;
        let denom = f.mul(&f.square(&ab), &f.add_scalar(&ab, T::one()))?;
        Ok(f.div(&f.mul(&self.alpha, &self.beta)?, &denom)?)
    }

    /// X / (X+Y) with X ~ Gamma(α, 1), Y ~ Gamma(β, 1).
    ///
    /// For very small α and β both Gamma variates can underflow to zero,
    /// and the ratio is then 0/0 = NaN. This is common in `f32` below
    /// α, β ≈ 0.01 and near certain at the `BetaOutput` floor of 1e-8.
    fn sample<R: Rng + ?Sized>(
        &self,
        num_samples: Option<usize>,
        rng: &mut R,
    ) -> Result<B::Tensor, DistributionError> {
        let f = &self.backend;
        let unit_alpha = f.ones_like(&self.alpha);
        let unit_beta = f.ones_like(&self.beta);
        log::trace!(
            "Beta::sample num_samples={num_samples:?} batch_shape={:?}",
            self.batch_shape()
        );

        sample_multiple::<T, B, _>(f, num_samples, || {
            let x = f.sample_gamma(&self.alpha, &unit_alpha, &mut *rng)?;
            let y = f.sample_gamma(&self.beta, &unit_beta, &mut *rng)?;
            Ok(f.div(&x, &f.add(&x, &y)?)?)
        })
    }

    fn args(&self) -> Vec<B::Tensor> {
        vec![self.alpha.clone(), self.beta.clone()]
    }
}
