//! Distributional properties of the processes and their marginals.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use qf_core::{Error, Real};
use qf_math::Complex64;
use qf_processes::{
    DoubleIndependentPoisson, DoublyStochasticPoisson, Marginal1D, MarginalTransforms,
    PoissonProcess, Process1D, SkellamProcess, StochasticProcess1D, StochasticProcess2D,
    WeinerProcess, CIR,
};

fn zero() -> Complex64 {
    Complex64::new(0.0, 0.0)
}

fn all_processes() -> Vec<Process1D> {
    vec![
        PoissonProcess::new(1.0).unwrap().into(),
        SkellamProcess::new(0.7, 1.9).unwrap().into(),
        DoublyStochasticPoisson::new(CIR::new(0.5, 1.0, 0.8, 0.6).unwrap()).into(),
        WeinerProcess::new(0.8).unwrap().into(),
        CIR::new(0.2, 0.9, 0.4, 0.3).unwrap().into(),
    ]
}

// ─── Normalisation ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn characteristic_is_one_at_zero(t in 0.0..5.0f64) {
        for process in all_processes() {
            let c = process.characteristic(t, zero());
            prop_assert!((c.re - 1.0).abs() < 1e-12, "{}: {c}", process.name());
            prop_assert!(c.im.abs() < 1e-12, "{}: {c}", process.name());
        }
    }

    #[test]
    fn characteristic_is_bounded(t in 0.01..5.0f64, u in -10.0..10.0f64) {
        for process in all_processes() {
            let c = process.characteristic(t, Complex64::new(u, 0.0));
            prop_assert!(c.norm() <= 1.0 + 1e-10, "{}: |φ({u})| = {}", process.name(), c.norm());
        }
    }
}

// ─── Moments ──────────────────────────────────────────────────────────────────

#[test]
fn poisson_mean_from_characteristic() {
    let m = PoissonProcess::new(1.0).unwrap().marginal(1.0).unwrap();
    assert_abs_diff_eq!(m.mean_from_characteristic(), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(m.variance_from_characteristic(), 1.0, epsilon = 1e-5);
}

#[test]
fn closed_form_and_numerical_moments_agree() {
    for process in all_processes() {
        let m = process.marginal(1.2).unwrap();
        assert_abs_diff_eq!(m.mean(), m.mean_from_characteristic(), epsilon = 1e-4);
        assert_abs_diff_eq!(m.variance(), m.variance_from_characteristic(), epsilon = 1e-4);
    }
}

// ─── Counting distributions ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn poisson_pmf_is_cdf_difference(rate in 0.1..5.0f64, t in 0.0..3.0f64, n in 0u32..30) {
        let p = PoissonProcess::new(rate).unwrap();
        let n = n as Real;
        let diff = p.cdf(t, n).unwrap() - p.cdf(t, n - 1.0).unwrap();
        prop_assert!((diff - p.pdf(t, n).unwrap()).abs() < 1e-10);
    }

    #[test]
    fn double_poisson_factorises(
        l1 in 0.1..4.0f64,
        l2 in 0.1..4.0f64,
        n1 in 0u32..15,
        n2 in 0u32..15,
    ) {
        let d = DoubleIndependentPoisson::new(l1, l2).unwrap();
        let (a, b) = (n1 as Real, n2 as Real);
        let joint = d.pdf(1.0, a, b).unwrap();
        let product = PoissonProcess::new(l1).unwrap().pdf(1.0, a).unwrap()
            * PoissonProcess::new(l2).unwrap().pdf(1.0, b).unwrap();
        prop_assert!((joint - product).abs() < 1e-15);
        let joint_cdf = d.cdf(1.0, a, b).unwrap();
        let (left, right) = d.marginals();
        prop_assert!((joint_cdf - left.cdf(1.0, a).unwrap() * right.cdf(1.0, b).unwrap()).abs() < 1e-15);
    }
}

#[test]
fn sum_process_rate() {
    let d = DoubleIndependentPoisson::new(1.25, 2.5).unwrap();
    assert_eq!(d.sum_process().unwrap().rate(), 3.75);
    let diff = d.difference_process().unwrap();
    assert_eq!(diff.rate_left(), 1.25);
    assert_eq!(diff.rate_right(), 2.5);
}

#[test]
fn skellam_pmf_matches_bessel_form() {
    // λ₁ = λ₂ = 1, t = 1: P(K = 0) = e^{-2} I₀(2)
    let s = SkellamProcess::new(1.0, 1.0).unwrap();
    assert_abs_diff_eq!(
        s.pdf(1.0, 0.0).unwrap(),
        (-2.0f64).exp() * 2.279_585_302_336_067,
        epsilon = 1e-12
    );
    // symmetric rates: P(K ≤ -1) = (1 - P(K = 0)) / 2
    assert_abs_diff_eq!(
        s.cdf(1.0, -1.0).unwrap(),
        0.5 * (1.0 - s.pdf(1.0, 0.0).unwrap()),
        epsilon = 1e-12
    );
}

#[test]
fn jacobians_without_closed_form_are_not_implemented() {
    let s = SkellamProcess::new(1.0, 2.0).unwrap();
    assert!(matches!(s.cdf_jacobian(1.0, 0.0), Err(Error::NotImplemented(_))));
    assert!(matches!(s.pdf_jacobian(1.0, 0.0), Err(Error::NotImplemented(_))));
    let p = PoissonProcess::new(1.0).unwrap();
    assert_eq!(p.cdf_jacobian(1.0, 2.0).unwrap().len(), 1);
}

#[test]
fn parameters_are_exposed_in_declaration_order() {
    let names: Vec<Vec<&str>> = all_processes()
        .iter()
        .map(|p| p.parameters().names())
        .collect();
    assert_eq!(names[0], vec!["rate"]);
    assert_eq!(names[1], vec!["rate_left", "rate_right"]);
    assert_eq!(names[2], vec!["rate", "kappa", "theta", "sigma"]);
    assert_eq!(names[3], vec!["sigma"]);
    let d = DoubleIndependentPoisson::new(1.0, 2.0).unwrap();
    assert_eq!(d.parameters().values(), vec![1.0, 2.0]);
}
