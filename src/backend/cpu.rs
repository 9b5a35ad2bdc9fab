use alloc::vec::Vec;

use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn, Zip};
use rand::Rng;

use super::{Backend, TensorError};
use crate::special::{lgamma, softplus};
use crate::traits::FloatScalar;

/// Single-threaded reference backend over [`ndarray::ArrayD`].
///
/// Stateless; copy it freely. Unary kernels are `mapv` passes, binary
/// kernels broadcast both operands to a common shape and zip them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuBackend;

/// Common shape of two broadcast-compatible shapes, aligned from the
/// trailing axis. `None` if some axis pair differs and neither is 1.
pub(super) fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Option<Vec<usize>> {
    let ndim = lhs.len().max(rhs.len());
    let dim = |s: &[usize], i: usize| {
        let lead = ndim - s.len();
        if i < lead {
            1
        } else {
            s[i - lead]
        }
    };
    (0..ndim)
        .map(|i| match (dim(lhs, i), dim(rhs, i)) {
            (a, b) if a == b => Some(a),
            (1, b) => Some(b),
            (a, 1) => Some(a),
            _ => None,
        })
        .collect()
}

fn zip_broadcast<T: FloatScalar>(
    a: &ArrayD<T>,
    b: &ArrayD<T>,
    op: impl Fn(T, T) -> T,
) -> Result<ArrayD<T>, TensorError> {
    let incompatible = || TensorError::IncompatibleShapes {
        lhs: a.shape().to_vec(),
        rhs: b.shape().to_vec(),
    };
    let shape = broadcast_shape(a.shape(), b.shape()).ok_or_else(incompatible)?;
    let lhs = a.broadcast(IxDyn(&shape)).ok_or_else(incompatible)?;
    let rhs = b.broadcast(IxDyn(&shape)).ok_or_else(incompatible)?;
    Ok(Zip::from(&lhs).and(&rhs).map_collect(|&x, &y| op(x, y)))
}

impl<T: FloatScalar> Backend<T> for CpuBackend {
    type Tensor = ArrayD<T>;

    fn shape(&self, x: &ArrayD<T>) -> Vec<usize> {
        x.shape().to_vec()
    }

    fn full_like(&self, x: &ArrayD<T>, value: T) -> ArrayD<T> {
        ArrayD::from_elem(x.raw_dim(), value)
    }

    fn add(&self, a: &ArrayD<T>, b: &ArrayD<T>) -> Result<ArrayD<T>, TensorError> {
        zip_broadcast(a, b, |x, y| x + y)
    }

    fn sub(&self, a: &ArrayD<T>, b: &ArrayD<T>) -> Result<ArrayD<T>, TensorError> {
        zip_broadcast(a, b, |x, y| x - y)
    }

    fn mul(&self, a: &ArrayD<T>, b: &ArrayD<T>) -> Result<ArrayD<T>, TensorError> {
        zip_broadcast(a, b, |x, y| x * y)
    }

    fn div(&self, a: &ArrayD<T>, b: &ArrayD<T>) -> Result<ArrayD<T>, TensorError> {
        zip_broadcast(a, b, |x, y| x / y)
    }

    fn add_scalar(&self, x: &ArrayD<T>, s: T) -> ArrayD<T> {
        x.mapv(|v| v + s)
    }

    fn mul_scalar(&self, x: &ArrayD<T>, s: T) -> ArrayD<T> {
        x.mapv(|v| v * s)
    }

    fn rsub_scalar(&self, s: T, x: &ArrayD<T>) -> ArrayD<T> {
        x.mapv(|v| s - v)
    }

    fn log(&self, x: &ArrayD<T>) -> ArrayD<T> {
        x.mapv(T::ln)
    }

    fn exp(&self, x: &ArrayD<T>) -> ArrayD<T> {
        x.mapv(T::exp)
    }

    fn sqrt(&self, x: &ArrayD<T>) -> ArrayD<T> {
        x.mapv(T::sqrt)
    }

    fn square(&self, x: &ArrayD<T>) -> ArrayD<T> {
        x.mapv(|v| v * v)
    }

    fn gammaln(&self, x: &ArrayD<T>) -> ArrayD<T> {
        x.mapv(lgamma)
    }

    fn softplus(&self, x: &ArrayD<T>) -> ArrayD<T> {
        x.mapv(softplus)
    }

    fn squeeze(&self, x: ArrayD<T>, axis: isize) -> Result<ArrayD<T>, TensorError> {
        let ndim = x.ndim();
        let resolved = if axis < 0 { axis + ndim as isize } else { axis };
        if resolved < 0 || resolved >= ndim as isize {
            return Err(TensorError::AxisOutOfRange { axis, ndim });
        }
        let axis = resolved as usize;
        let size = x.len_of(Axis(axis));
        if size != 1 {
            return Err(TensorError::NotSqueezable { axis, size });
        }
        Ok(x.index_axis_move(Axis(axis), 0))
    }

    fn stack(&self, xs: &[ArrayD<T>]) -> Result<ArrayD<T>, TensorError> {
        let first = xs.first().ok_or(TensorError::EmptyStack)?;
        if let Some(odd) = xs.iter().find(|x| x.shape() != first.shape()) {
            return Err(TensorError::ShapeMismatch {
                expected: first.shape().to_vec(),
                got: odd.shape().to_vec(),
            });
        }
        let views: Vec<ArrayViewD<'_, T>> = xs.iter().map(|x| x.view()).collect();
        ndarray::stack(Axis(0), &views).map_err(|_| TensorError::ShapeMismatch {
            expected: first.shape().to_vec(),
            got: first.shape().to_vec(),
        })
    }

    fn sample_gamma<R: Rng + ?Sized>(
        &self,
        shape: &ArrayD<T>,
        scale: &ArrayD<T>,
        rng: &mut R,
    ) -> Result<ArrayD<T>, TensorError> {
        if shape.shape() != scale.shape() {
            return Err(TensorError::ShapeMismatch {
                expected: shape.shape().to_vec(),
                got: scale.shape().to_vec(),
            });
        }

        let mut rejected = 0usize;
        let draws = Zip::from(shape).and(scale).map_collect(|&k, &theta| {
            match T::gamma_variate(k, theta, &mut *rng) {
                Ok(v) => v,
                Err(_) => {
                    rejected += 1;
                    T::nan()
                }
            }
        });

        if rejected > 0 {
            log::debug!(
                "sample_gamma: {rejected} of {} elements had invalid parameters, drew NaN",
                draws.len()
            );
        }
        Ok(draws)
    }
}

