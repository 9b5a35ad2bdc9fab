//! Tensor backends: the elementwise, broadcasting and sampling kernels that
//! distributions are evaluated with.
//!
//! A distribution never touches tensor storage directly. It holds a
//! [`Backend`] value and calls through it, so the same formulas run on any
//! implementation that supplies the operations below. [`CpuBackend`] is the
//! reference implementation over [`ndarray::ArrayD`].
//!
//! # Example
//!
//! ```
//! use distrix::backend::{Backend, CpuBackend};
//! use ndarray::array;
//!
//! let f = CpuBackend;
//! let x = array![1.0_f64, 4.0].into_dyn();
//! let y = f.add(&f.sqrt(&x), &f.ones_like(&x)).unwrap();
//! assert_eq!(y, array![2.0, 3.0].into_dyn());
//! ```

mod cpu;


pub use cpu::CpuBackend;

use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;

use rand::Rng;

use crate::traits::FloatScalar;

/// Shape errors raised by backend operations.
///
/// # Example
///
/// ```
/// use distrix::backend::{Backend, CpuBackend, TensorError};
/// use ndarray::array;
///
/// let x = array![[1.0_f64, 2.0]].into_dyn();
/// let err = CpuBackend.squeeze(x, -1).unwrap_err();
/// assert_eq!(err, TensorError::NotSqueezable { axis: 1, size: 2 });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    /// Two shapes cannot be broadcast against each other.
    IncompatibleShapes { lhs: Vec<usize>, rhs: Vec<usize> },
    /// Axis index outside `-ndim..ndim`.
    AxisOutOfRange { axis: isize, ndim: usize },
    /// Squeezed axis does not have size 1.
    NotSqueezable { axis: usize, size: usize },
    /// Tensors that must share a shape do not.
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    /// `stack` called with no tensors.
    EmptyStack,
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompatibleShapes { lhs, rhs } => {
                write!(f, "shapes {lhs:?} and {rhs:?} cannot be broadcast together")
            }
            Self::AxisOutOfRange { axis, ndim } => {
                write!(f, "axis {axis} out of range for tensor of rank {ndim}")
            }
            Self::NotSqueezable { axis, size } => {
                write!(f, "cannot squeeze axis {axis} of size {size}")
            }
            Self::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected:?}, got {got:?}")
            }
            Self::EmptyStack => write!(f, "cannot stack an empty list of tensors"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TensorError {}

/// Operations a tensor engine must provide to evaluate distributions.
///
/// Binary operations broadcast their operands NumPy-style and fail with
/// [`TensorError::IncompatibleShapes`] when they cannot. Unary and scalar
/// operations are infallible and preserve shape.
pub trait Backend<T: FloatScalar>: Clone + Debug {
    /// Tensor type the backend operates on.
    type Tensor: Clone + Debug;

    fn shape(&self, x: &Self::Tensor) -> Vec<usize>;

    /// Tensor of ones with the shape of `x`.
    fn ones_like(&self, x: &Self::Tensor) -> Self::Tensor {
        self.full_like(x, T::one())
    }

    fn full_like(&self, x: &Self::Tensor, value: T) -> Self::Tensor;

    fn add(&self, a: &Self::Tensor, b: &Self::Tensor) -> Result<Self::Tensor, TensorError>;
    fn sub(&self, a: &Self::Tensor, b: &Self::Tensor) -> Result<Self::Tensor, TensorError>;
    fn mul(&self, a: &Self::Tensor, b: &Self::Tensor) -> Result<Self::Tensor, TensorError>;
    fn div(&self, a: &Self::Tensor, b: &Self::Tensor) -> Result<Self::Tensor, TensorError>;

    /// `x + s`
    fn add_scalar(&self, x: &Self::Tensor, s: T) -> Self::Tensor;
    /// `x * s`
    fn mul_scalar(&self, x: &Self::Tensor, s: T) -> Self::Tensor;
    /// `s - x`
    fn rsub_scalar(&self, s: T, x: &Self::Tensor) -> Self::Tensor;

    fn log(&self, x: &Self::Tensor) -> Self::Tensor;
    fn exp(&self, x: &Self::Tensor) -> Self::Tensor;
    fn sqrt(&self, x: &Self::Tensor) -> Self::Tensor;
    fn square(&self, x: &Self::Tensor) -> Self::Tensor;
    /// Elementwise ln Γ(x).
    fn gammaln(&self, x: &Self::Tensor) -> Self::Tensor;
    /// Elementwise ln(1 + eˣ).
    fn softplus(&self, x: &Self::Tensor) -> Self::Tensor;

    /// Remove a size-1 axis; negative `axis` counts from the end.
    fn squeeze(&self, x: Self::Tensor, axis: isize) -> Result<Self::Tensor, TensorError>;

    /// Stack equally shaped tensors along a new leading axis.
    fn stack(&self, xs: &[Self::Tensor]) -> Result<Self::Tensor, TensorError>;

    /// Independent elementwise draws from Gamma(`shape`, `scale`).
    ///
    /// `shape` and `scale` must have identical shapes. Elements whose
    /// parameters are not strictly positive yield NaN instead of failing
    /// the whole draw.
    fn sample_gamma<R: Rng + ?Sized>(
        &self,
        shape: &Self::Tensor,
        scale: &Self::Tensor,
        rng: &mut R,
    ) -> Result<Self::Tensor, TensorError>;
}
