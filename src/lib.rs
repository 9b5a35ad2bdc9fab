//! # distrix
//!
//! Probabilistic output heads for neural forecasting models. A network emits
//! raw, unconstrained tensors; an output head maps them into a distribution
//! family's parameter domain; the resulting batched distribution provides
//! the training loss (`log_prob`), point forecasts and uncertainty bands
//! (`mean`, `variance`, `stddev`) and Monte Carlo forecast paths (`sample`).
//!
//! All tensor math goes through an injected [`Backend`], so the same
//! distribution code runs on any tensor engine that implements it.
//!
//! ## Quick start
//!
//! ```
//! use distrix::backend::CpuBackend;
//! use distrix::distribution::{BetaOutput, Distribution, DistributionOutput};
//! use ndarray::array;
//! use rand::SeedableRng;
//!
//! let head = BetaOutput::new();
//! let raw = [
//!     array![[0.5_f64], [1.0], [-2.0]].into_dyn(),
//!     array![[2.0_f64], [0.0], [1.0]].into_dyn(),
//! ];
//! let args = head.domain_map(&CpuBackend, &raw).unwrap();
//! let distr = head.distribution(CpuBackend, args).unwrap();
//!
//! let target = array![0.2, 0.5, 0.1].into_dyn();
//! let nll = distr.loss(&target).unwrap();
//! assert!(nll.iter().all(|v| v.is_finite()));
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let paths = distr.sample(Some(100), &mut rng).unwrap();
//! assert_eq!(paths.shape(), &[100, 3]);
//! ```
//!
//! ## Modules
//!
//! - [`distribution`] — [`Distribution`] / [`DistributionOutput`] traits and
//!   the [`Beta`] family with its [`BetaOutput`] head.
//!
//! - [`backend`] — [`Backend`] trait: elementwise math (`log`, `gammaln`,
//!   `softplus`, …), broadcasting arithmetic, `squeeze`/`stack`, and
//!   Gamma variate sampling. [`CpuBackend`] is the reference implementation
//!   over [`ndarray::ArrayD`].
//!
//! - [`special`] — Scalar `lgamma` and `softplus`.
//!
//! - [`traits`] — [`FloatScalar`], the element trait for `f32` / `f64`.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | Hardware FPU via system libm, `std::error::Error` impls |
//!
//! Without `std` the crate is `no_std` + `alloc` and uses the pure-Rust
//! `libm` float fallback.
//!
//! ## Logging
//!
//! Emits `trace`/`debug` records through the [`log`] facade; install any
//! logger to see them.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod backend;
pub mod distribution;
pub mod special;
pub mod traits;

pub use backend::{Backend, CpuBackend, TensorError};
pub use distribution::{Beta, BetaOutput, Distribution, DistributionError, DistributionOutput};
pub use traits::FloatScalar;

pub use ndarray;
