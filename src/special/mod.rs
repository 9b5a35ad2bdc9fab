//! Scalar special functions backing the elementwise tensor kernels.
//!
//! All functions are generic over [`FloatScalar`] (f32/f64) and no-std
//! compatible.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`lgamma`] | Log-gamma ln Γ(x) |
//! | [`softplus`] | ln(1 + eˣ), evaluated without overflow |
//!
//! # Example
//!
//! ```
//! use distrix::special::{lgamma, softplus};
//!
//! // ln Γ(1) = 0
//! assert!(lgamma(1.0_f64).abs() < 1e-14);
//!
//! // softplus(0) = ln 2
//! assert!((softplus(0.0_f64) - 2.0_f64.ln()).abs() < 1e-15);
//! ```

use crate::FloatScalar;

mod lgamma;
mod softplus;


pub use lgamma::lgamma;
pub use softplus::softplus;

/// Convert an `f64` literal into `T`.
///
/// Every `FloatScalar` can represent (or round) any finite `f64`, so the
/// conversion never fails for the constants used in this crate.
#[inline]
pub(crate) fn cst<T: FloatScalar>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}
