use alloc::vec;
use alloc::vec::Vec;

use ndarray::{arr1, ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::backend::CpuBackend;

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!(
        (a - b).abs() < tol,
        "approx_eq failed: {a} vs {b}, diff = {}, tol = {tol}",
        (a - b).abs()
    );
}

fn tensor<T: Clone>(v: &[T]) -> ArrayD<T> {
    arr1(v).into_dyn()
}

fn full<T: Clone>(shape: &[usize], v: T) -> ArrayD<T> {
    ArrayD::from_elem(IxDyn(shape), v)
}

fn vals<T: Copy>(x: &ArrayD<T>) -> Vec<T> {
    x.iter().copied().collect()
}

fn beta(alpha: &[f64], beta: &[f64]) -> Beta<f64, CpuBackend> {
    Beta::new(CpuBackend, tensor(alpha), tensor(beta)).unwrap()
}

/// Closed-form ln f(x) for one (α, β) pair.
fn ln_pdf_reference(a: f64, b: f64, x: f64) -> f64 {
    use crate::special::lgamma;
    (a - 1.0) * x.ln() + (b - 1.0) * (1.0 - x).ln() - lgamma(a) - lgamma(b) + lgamma(a + b)
}

// ======================== Beta: shape metadata ========================

#[test]
fn beta_shapes() {
    let a = full(&[4, 3], 2.0_f64);
    let b = full(&[4, 3], 3.0_f64);
    let d = Beta::new(CpuBackend, a, b).unwrap();
    assert_eq!(d.batch_shape(), vec![4, 3]);
    assert!(d.event_shape().is_empty());
    assert_eq!(d.event_dim(), 0);
    assert_eq!(d.batch_dim(), 2);
    assert_eq!(d.all_dim(), 2);
    assert!(!<Beta<f64, CpuBackend> as Distribution<f64, CpuBackend>>::IS_REPARAMETERIZABLE);
}

#[test]
fn beta_rejects_mismatched_shapes() {
    let err = Beta::new(
        CpuBackend,
        full(&[3], 1.0_f64),
        full(&[3, 1], 1.0_f64),
    )
    .unwrap_err();
    assert_eq!(
        err,
        DistributionError::ShapeMismatch {
            expected: vec![3],
            got: vec![3, 1]
        }
    );
}

#[test]
fn beta_args_order() {
    let d = beta(&[2.0, 0.5], &[5.0, 0.25]);
    let args = d.args();
    assert_eq!(args.len(), 2);
    assert_eq!(&args[0], d.alpha());
    assert_eq!(&args[1], d.beta());
    assert_eq!(vals(&args[0]), vec![2.0, 0.5]);
    assert_eq!(vals(&args[1]), vec![5.0, 0.25]);
}

// ======================== Beta: statistics ========================

#[test]
fn beta_uniform_special_case() {
    let d = beta(&[1.0], &[1.0]);
    approx_eq(d.mean().unwrap()[[0]], 0.5, 1e-15);
    approx_eq(d.variance().unwrap()[[0]], 1.0 / 12.0, 1e-15);
    for &x in &[1e-6, 0.1, 0.5, 0.9, 1.0 - 1e-6] {
        let lp = d.log_prob(&tensor(&[x])).unwrap();
        approx_eq(lp[[0]], 0.0, 1e-13);
    }
}

#[test]
fn beta_mean_variance_stddev() {
    let d = beta(&[2.0, 0.5, 10.0], &[5.0, 0.5, 1.0]);
    let mean = d.mean().unwrap();
    let var = d.variance().unwrap();
    let sd = d.stddev().unwrap();

    approx_eq(mean[[0]], 2.0 / 7.0, 1e-15);
    approx_eq(var[[0]], 10.0 / 392.0, 1e-15);
    approx_eq(mean[[1]], 0.5, 1e-15);
    approx_eq(var[[1]], 0.125, 1e-15);
    approx_eq(mean[[2]], 10.0 / 11.0, 1e-15);
    for i in 0..3 {
        approx_eq(sd[[i]], var[[i]].sqrt(), 1e-15);
    }
}

#[test]
fn beta_moments_bounded() {
    let params = [0.01, 0.3, 1.0, 2.5, 40.0, 1e4];
    for &a in &params {
        for &b in &params {
            let d = beta(&[a], &[b]);
            let m = d.mean().unwrap()[[0]];
            let v = d.variance().unwrap()[[0]];
            assert!(m > 0.0 && m < 1.0, "mean {m} for ({a}, {b})");
            assert!(v > 0.0 && v < m * (1.0 - m), "variance {v} for ({a}, {b})");
        }
    }
}

#[test]
fn beta_log_prob_closed_form() {
    let d = beta(&[2.0, 0.7, 30.0], &[5.0, 0.4, 12.0]);
    let x = tensor(&[0.3, 0.01, 0.7]);
    let lp = d.log_prob(&x).unwrap();
    assert_eq!(lp.shape(), &[3]);
    approx_eq(lp[[0]], ln_pdf_reference(2.0, 5.0, 0.3), 1e-12);
    approx_eq(lp[[1]], ln_pdf_reference(0.7, 0.4, 0.01), 1e-12);
    approx_eq(lp[[2]], ln_pdf_reference(30.0, 12.0, 0.7), 1e-10);
    // Beta(2, 5) at 0.3: 30 · 0.3 · 0.7⁴
    approx_eq(lp[[0]], (30.0 * 0.3 * 0.7_f64.powi(4)).ln(), 1e-12);
}

#[test]
fn beta_prob_and_loss() {
    let d = beta(&[2.0], &[2.0]);
    let x = tensor(&[0.5]);
    // f(0.5) = 6 · 0.25 = 1.5
    approx_eq(d.prob(&x).unwrap()[[0]], 1.5, 1e-13);
    approx_eq(d.loss(&x).unwrap()[[0]], -(1.5_f64.ln()), 1e-13);
}

#[test]
fn beta_log_prob_outside_support_is_not_finite() {
    let d = beta(&[2.0, 2.0, 2.0], &[3.0, 3.0, 3.0]);
    let x = tensor(&[0.0, -0.5, 1.5]);
    let lp = d.log_prob(&x).unwrap();
    assert!(lp[[0]].is_infinite() && lp[[0]] < 0.0);
    assert!(lp[[1]].is_nan());
    assert!(lp[[2]].is_nan());
}

#[test]
fn beta_log_prob_broadcasts_over_leading_axis() {
    let d = beta(&[2.0, 3.0], &[2.0, 1.0]);
    let x = ndarray::array![[0.1, 0.2], [0.3, 0.4], [0.5, 0.6]].into_dyn();
    let lp = d.log_prob(&x).unwrap();
    assert_eq!(lp.shape(), &[3, 2]);
    approx_eq(lp[[2, 1]], ln_pdf_reference(3.0, 1.0, 0.6), 1e-12);
}

#[test]
fn beta_log_prob_incompatible_shape() {
    let d = beta(&[2.0, 3.0], &[2.0, 1.0]);
    let x = tensor(&[0.1, 0.2, 0.3]);
    assert!(matches!(
        d.log_prob(&x),
        Err(DistributionError::Tensor(TensorError::IncompatibleShapes { .. }))
    ));
}

#[test]
fn beta_f32() {
    let d = Beta::new(
        CpuBackend,
        tensor(&[2.0_f32]),
        tensor(&[5.0_f32]),
    )
    .unwrap();
    assert!((d.mean().unwrap()[[0]] - 2.0 / 7.0).abs() < 1e-6);
    let lp = d.log_prob(&tensor(&[0.3_f32])).unwrap();
    assert!((lp[[0]] - (30.0_f32 * 0.3 * 0.7_f32.powi(4)).ln()).abs() < 1e-4);
}

// ======================== Beta: sampling ========================

#[test]
fn beta_sample_shapes() {
    let mut rng = StdRng::seed_from_u64(42);
    let d = Beta::new(
        CpuBackend,
        full(&[2, 3], 2.0_f64),
        full(&[2, 3], 4.0_f64),
    )
    .unwrap();

    let one = d.sample(None, &mut rng).unwrap();
    assert_eq!(one.shape(), &[2, 3]);

    let many = d.sample(Some(5), &mut rng).unwrap();
    assert_eq!(many.shape(), &[5, 2, 3]);
    assert!(many.iter().all(|&v| v > 0.0 && v < 1.0));
}

#[test]
fn beta_sample_zero_count_rejected() {
    let mut rng = StdRng::seed_from_u64(1);
    let d = beta(&[1.0], &[1.0]);
    assert_eq!(
        d.sample(Some(0), &mut rng).unwrap_err(),
        DistributionError::InvalidSampleCount
    );
}

#[test]
fn beta_sample_reproducible_with_seed() {
    let d = beta(&[0.5, 3.0], &[0.5, 2.0]);
    let a = d.sample(Some(10), &mut StdRng::seed_from_u64(9)).unwrap();
    let b = d.sample(Some(10), &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn beta_sample_invalid_parameters_yield_nan() {
    let mut rng = StdRng::seed_from_u64(2);
    let d = beta(&[-1.0, 2.0], &[1.0, 2.0]);
    let s = d.sample(None, &mut rng).unwrap();
    assert!(s[[0]].is_nan());
    assert!(s[[1]] > 0.0 && s[[1]] < 1.0);
}

#[test]
fn beta_sample_tiny_concentration_underflows_to_nan() {
    // Both Gamma(1e-8, 1) draws underflow to 0, so X / (X + Y) is 0/0.
    let mut rng = StdRng::seed_from_u64(17);
    let d = beta(&[DOMAIN_EPSILON], &[DOMAIN_EPSILON]);
    let s = vals(&d.sample(Some(200), &mut rng).unwrap());
    let nan = s.iter().filter(|v| v.is_nan()).count();
    assert!(nan > 150, "only {nan} of 200 draws were NaN");
    assert!(s.iter().filter(|v| !v.is_nan()).all(|&v| (0.0..=1.0).contains(&v)));
}

// ======================== BetaOutput ========================

#[test]
fn beta_output_metadata() {
    let head = BetaOutput::new();
    let dims = <BetaOutput as DistributionOutput<f64, CpuBackend>>::args_dim(&head);
    assert_eq!(dims, vec![("alpha", 1), ("beta", 1)]);
    assert_eq!(
        <BetaOutput as DistributionOutput<f64, CpuBackend>>::total_args_dim(&head),
        2
    );
    assert!(<BetaOutput as DistributionOutput<f64, CpuBackend>>::event_shape(&head).is_empty());
    assert_eq!(<BetaOutput as DistributionOutput<f64, CpuBackend>>::event_dim(&head), 0);
}

#[test]
fn beta_output_domain_map_positive_and_squeezed() {
    let raw = ndarray::array![[-1000.0_f64], [-20.0], [0.0], [50.0]].into_dyn();
    let mapped = BetaOutput::new().domain_map(&CpuBackend, &[raw.clone(), raw]).unwrap();
    assert_eq!(mapped.len(), 2);
    for t in &mapped {
        assert_eq!(t.shape(), &[4]);
        assert!(t.iter().all(|&v| v >= DOMAIN_EPSILON));
    }
    approx_eq(mapped[0][[0]], DOMAIN_EPSILON, 1e-20);
    approx_eq(mapped[0][[2]], 2.0_f64.ln() + DOMAIN_EPSILON, 1e-15);
    approx_eq(mapped[1][[3]], 50.0 + DOMAIN_EPSILON, 1e-12);
}

#[test]
fn beta_output_preserves_order() {
    let a_raw = full(&[1, 1], 3.0_f64);
    let b_raw = full(&[1, 1], -3.0_f64);
    let (alpha, beta) = BetaOutput::new().map_args(&CpuBackend, &a_raw, &b_raw).unwrap();
    assert!(alpha[[0]] > beta[[0]]);
}

#[test]
fn beta_output_requires_trailing_singleton() {
    let raw = full(&[4, 2], 0.0_f64);
    let err = BetaOutput::new()
        .domain_map(&CpuBackend, &[raw.clone(), raw])
        .unwrap_err();
    assert_eq!(
        err,
        DistributionError::Tensor(TensorError::NotSqueezable { axis: 1, size: 2 })
    );
}

#[test]
fn beta_output_argument_count() {
    let raw = full(&[4, 1], 0.0_f64);
    let head = BetaOutput::new();
    assert_eq!(
        head.domain_map(&CpuBackend, &[raw.clone()]).unwrap_err(),
        DistributionError::ArgumentCount { expected: 2, got: 1 }
    );
    let three: Vec<ArrayD<f64>> = vec![raw.clone(), raw.clone(), raw];
    assert!(matches!(
        head.distribution(CpuBackend, three),
        Err(DistributionError::ArgumentCount { expected: 2, got: 3 })
    ));
}

#[test]
fn beta_output_builds_distribution() {
    let alpha_raw = full(&[2, 3, 1], 0.0_f64);
    let beta_raw = full(&[2, 3, 1], 1.0_f64);
    let head = BetaOutput::new();
    let args = head.domain_map(&CpuBackend, &[alpha_raw, beta_raw]).unwrap();
    let d = head.distribution(CpuBackend, args).unwrap();
    assert_eq!(d.batch_shape(), vec![2, 3]);
    let expected_alpha = 2.0_f64.ln() + DOMAIN_EPSILON;
    approx_eq(d.alpha()[[1, 2]], expected_alpha, 1e-15);
}

// ======================== Errors ========================

#[test]
fn error_display() {
    let e = DistributionError::from(TensorError::EmptyStack);
    assert_eq!(
        alloc::format!("{e}"),
        "tensor operation failed: cannot stack an empty list of tensors"
    );
    assert_eq!(
        alloc::format!("{}", DistributionError::InvalidSampleCount),
        "number of samples must be positive"
    );
}
