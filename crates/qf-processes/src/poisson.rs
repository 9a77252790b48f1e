//! Poisson counting processes.
//!
//! ```text
//! P(N_t = n) = (λt)ⁿ e^{−λt} / n!        φ(t, u) = exp(λt (e^{iu} − 1))
//! ```
//!
//! [`SkellamProcess`] is the difference of two independent Poisson processes
//! and [`DoubleIndependentPoisson`] is the pair itself, which decomposes into
//! its marginals, their sum and their difference.

use crate::marginal::{Marginal1D, ProcessMarginal};
use crate::paths::Paths;
use crate::process::{sampling_grid, StochasticProcess1D, StochasticProcess2D};
use nalgebra::DMatrix;
use num_complex::Complex64;
use qf_core::errors::{Error, Result};
use qf_core::{not_implemented, Bounds, Parameter, Parameters, Rate, Real, Time};
use qf_math::distributions::{PoissonDistribution, SkellamDistribution};
use qf_math::transforms::DomainRange;
use qf_math::I;
use rand::Rng;
use rand_distr::Exp;
use std::f64::consts::PI;
use tracing::debug;

fn rate_parameter(name: &'static str, rate: Rate, description: &'static str) -> Result<Parameter> {
    Parameter::new(name, rate, Bounds::positive(), description)
}

// ── Poisson ───────────────────────────────────────────────────────────────────

/// Poisson process with constant intensity `λ > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonProcess {
    rate: Parameter,
}

impl PoissonProcess {
    /// Create a Poisson process; fails with a validation error unless
    /// `rate > 0`.
    pub fn new(rate: Rate) -> Result<Self> {
        Ok(Self {
            rate: rate_parameter("rate", rate, "intensity rate of the Poisson process")?,
        })
    }

    /// Intensity `λ`.
    pub fn rate(&self) -> Rate {
        self.rate.value()
    }

    /// Characteristic exponent `λ(e^{iu} − 1)`, so that `φ(t, u) = exp(t·ψ(u))`.
    pub fn characteristic_exponent(&self, u: Complex64) -> Complex64 {
        self.rate() * ((I * u).exp() - 1.0)
    }

    /// Arrival times in `(0, t]`, drawn from exponential inter-arrival gaps
    /// with mean `1/λ`.
    pub fn arrivals<R: Rng + ?Sized>(&self, t: Time, rng: &mut R) -> Result<Vec<Time>> {
        let gaps = Exp::new(self.rate()).map_err(|e| Error::InvalidArgument(e.to_string()))?;
        let mut arrivals = Vec::new();
        let mut clock = 0.0;
        loop {
            clock += rng.sample(gaps);
            if clock > t {
                return Ok(arrivals);
            }
            arrivals.push(clock);
        }
    }

    /// Jump sizes for `n` arrivals; always one.
    pub fn jumps(&self, n: usize) -> Vec<Real> {
        vec![1.0; n]
    }

    fn distribution(&self, t: Time) -> Result<PoissonDistribution> {
        PoissonDistribution::new(self.rate() * t)
    }
}

/// Right-continuous step paths on `steps + 1` grid points: the value at
/// `tᵢ` is the number of arrivals at or before `tᵢ`.
pub(crate) fn counting_paths(t: Time, steps: usize, arrivals: &[Vec<Time>]) -> Result<Paths> {
    let dt = t / steps as Real;
    let mut data = DMatrix::zeros(steps + 1, arrivals.len());
    for (c, times) in arrivals.iter().enumerate() {
        let mut count = 0usize;
        for r in 0..=steps {
            let now = r as Real * dt;
            while count < times.len() && times[count] <= now {
                count += 1;
            }
            data[(r, c)] = count as Real;
        }
    }
    Paths::new(t, data)
}

impl StochasticProcess1D for PoissonProcess {
    type Marginal = ProcessMarginal<PoissonProcess>;

    fn parameters(&self) -> Parameters {
        Parameters::from_unique([self.rate])
    }

    fn characteristic(&self, t: Time, u: Complex64) -> Complex64 {
        (t * self.characteristic_exponent(u)).exp()
    }

    fn marginal(&self, t: Time) -> Result<Self::Marginal> {
        ProcessMarginal::new(*self, t)
    }

    fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        t: Time,
        steps: usize,
        rng: &mut R,
    ) -> Result<Paths> {
        let (t, steps) = sampling_grid(t, steps)?;
        debug!(process = "poisson", samples = n, steps, t, "sampling paths");
        let arrivals = (0..n)
            .map(|_| self.arrivals(t, rng))
            .collect::<Result<Vec<_>>>()?;
        counting_paths(t, steps, &arrivals)
    }
}

impl Marginal1D for ProcessMarginal<PoissonProcess> {
    fn characteristic(&self, u: Complex64) -> Complex64 {
        self.process().characteristic(self.t(), u)
    }

    fn mean(&self) -> Real {
        self.process().rate() * self.t()
    }

    fn variance(&self) -> Real {
        self.process().rate() * self.t()
    }

    fn pdf(&self, x: Real) -> Result<Real> {
        Ok(self.process().distribution(self.t())?.pmf_at(x))
    }

    fn cdf(&self, x: Real) -> Result<Real> {
        Ok(self.process().distribution(self.t())?.cdf_at(x))
    }

    fn max_frequency(&self) -> Real {
        PI
    }

    fn domain_range(&self) -> DomainRange {
        DomainRange::non_negative()
    }

    /// `∂F/∂λ = −t · P(N_t = ⌊x⌋)`.
    fn cdf_jacobian(&self, x: Real) -> Result<Vec<Real>> {
        let d = self.process().distribution(self.t())?;
        if x < 0.0 {
            return Ok(vec![0.0]);
        }
        Ok(vec![-self.t() * d.pmf_at(x.floor())])
    }

    /// `∂p/∂λ = t · (P(N_t = x − 1) − P(N_t = x))`.
    fn pdf_jacobian(&self, x: Real) -> Result<Vec<Real>> {
        let d = self.process().distribution(self.t())?;
        Ok(vec![self.t() * (d.pmf_at(x - 1.0) - d.pmf_at(x))])
    }
}

// ── Skellam ───────────────────────────────────────────────────────────────────

/// Difference `N¹_t − N²_t` of two independent Poisson processes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkellamProcess {
    rate_left: Parameter,
    rate_right: Parameter,
}

impl SkellamProcess {
    /// Create a Skellam process from the rates of the added and subtracted
    /// counts.
    pub fn new(rate_left: Rate, rate_right: Rate) -> Result<Self> {
        Ok(Self {
            rate_left: rate_parameter("rate_left", rate_left, "intensity of the added counts")?,
            rate_right: rate_parameter(
                "rate_right",
                rate_right,
                "intensity of the subtracted counts",
            )?,
        })
    }

    /// Rate of the added counts.
    pub fn rate_left(&self) -> Rate {
        self.rate_left.value()
    }

    /// Rate of the subtracted counts.
    pub fn rate_right(&self) -> Rate {
        self.rate_right.value()
    }

    /// Characteristic exponent `λ₁(e^{iu} − 1) + λ₂(e^{−iu} − 1)`.
    pub fn characteristic_exponent(&self, u: Complex64) -> Complex64 {
        self.rate_left() * ((I * u).exp() - 1.0) + self.rate_right() * ((-I * u).exp() - 1.0)
    }

    fn distribution(&self, t: Time) -> Result<SkellamDistribution> {
        SkellamDistribution::new(self.rate_left() * t, self.rate_right() * t)
    }
}

impl StochasticProcess1D for SkellamProcess {
    type Marginal = ProcessMarginal<SkellamProcess>;

    fn parameters(&self) -> Parameters {
        Parameters::from_unique([self.rate_left, self.rate_right])
    }

    fn characteristic(&self, t: Time, u: Complex64) -> Complex64 {
        (t * self.characteristic_exponent(u)).exp()
    }

    fn marginal(&self, t: Time) -> Result<Self::Marginal> {
        ProcessMarginal::new(*self, t)
    }

    fn sample<R: Rng + ?Sized>(
        &self,
        _n: usize,
        _t: Time,
        _steps: usize,
        _rng: &mut R,
    ) -> Result<Paths> {
        not_implemented!("sampling is not available for the Skellam process")
    }
}

impl Marginal1D for ProcessMarginal<SkellamProcess> {
    fn characteristic(&self, u: Complex64) -> Complex64 {
        self.process().characteristic(self.t(), u)
    }

    fn mean(&self) -> Real {
        (self.process().rate_left() - self.process().rate_right()) * self.t()
    }

    fn variance(&self) -> Real {
        (self.process().rate_left() + self.process().rate_right()) * self.t()
    }

    fn pdf(&self, x: Real) -> Result<Real> {
        Ok(self.process().distribution(self.t())?.pmf_at(x))
    }

    fn cdf(&self, x: Real) -> Result<Real> {
        Ok(self.process().distribution(self.t())?.cdf_at(x))
    }

    fn max_frequency(&self) -> Real {
        PI
    }
}

// ── Double independent Poisson ────────────────────────────────────────────────

/// Two independent Poisson processes observed jointly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleIndependentPoisson {
    left: PoissonProcess,
    right: PoissonProcess,
}

impl DoubleIndependentPoisson {
    /// Create the pair from the two intensities.
    pub fn new(rate_left: Rate, rate_right: Rate) -> Result<Self> {
        Ok(Self {
            left: PoissonProcess::new(rate_left)?,
            right: PoissonProcess::new(rate_right)?,
        })
    }

    /// The two component processes.
    pub fn marginals(&self) -> (PoissonProcess, PoissonProcess) {
        (self.left, self.right)
    }

    /// `N¹ + N²`, a Poisson process with rate `λ₁ + λ₂`.
    pub fn sum_process(&self) -> Result<PoissonProcess> {
        PoissonProcess::new(self.left.rate() + self.right.rate())
    }

    /// `N¹ − N²`, a Skellam process.
    pub fn difference_process(&self) -> Result<SkellamProcess> {
        SkellamProcess::new(self.left.rate(), self.right.rate())
    }
}

impl StochasticProcess2D for DoubleIndependentPoisson {
    fn parameters(&self) -> Parameters {
        Parameters::from_unique([
            self.left
                .rate
                .renamed("rate_left", "intensity of the first component"),
            self.right
                .rate
                .renamed("rate_right", "intensity of the second component"),
        ])
    }

    fn characteristic(&self, t: Time, u1: Complex64, u2: Complex64) -> Complex64 {
        self.left.characteristic(t, u1) * self.right.characteristic(t, u2)
    }

    fn pdf(&self, t: Time, x1: Real, x2: Real) -> Result<Real> {
        Ok(self.left.pdf(t, x1)? * self.right.pdf(t, x2)?)
    }

    fn cdf(&self, t: Time, x1: Real, x2: Real) -> Result<Real> {
        Ok(self.left.cdf(t, x1)? * self.right.cdf(t, x2)?)
    }

    fn sample<R: Rng + ?Sized>(
        &self,
        _n: usize,
        _t: Time,
        _steps: usize,
        _rng: &mut R,
    ) -> Result<(Paths, Paths)> {
        not_implemented!("joint sampling is not available for double independent Poisson")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qf_math::random_numbers::MersenneTwisterRng;

    #[test]
    fn rate_must_be_positive() {
        assert!(matches!(PoissonProcess::new(0.0), Err(Error::Validation(_))));
        assert!(matches!(PoissonProcess::new(-1.0), Err(Error::Validation(_))));
        assert!(matches!(SkellamProcess::new(1.0, 0.0), Err(Error::Validation(_))));
    }

    #[test]
    fn closed_form_pmf() {
        let p = PoissonProcess::new(2.0).unwrap();
        // λt = 3: P(N = 2) = 9/2 e^{-3}
        assert_abs_diff_eq!(p.pdf(1.5, 2.0).unwrap(), 4.5 * (-3.0f64).exp(), epsilon = 1e-14);
        assert_eq!(p.pdf(1.5, 2.5).unwrap(), 0.0);
        assert_eq!(p.cdf(1.5, -0.5).unwrap(), 0.0);
    }

    #[test]
    fn jacobians_match_finite_differences() {
        let t = 1.3;
        let h = 1e-6;
        let p = PoissonProcess::new(1.7).unwrap();
        let up = PoissonProcess::new(1.7 + h).unwrap();
        let down = PoissonProcess::new(1.7 - h).unwrap();
        for n in [0.0, 1.0, 2.0, 5.0] {
            let cdf_fd = (up.cdf(t, n).unwrap() - down.cdf(t, n).unwrap()) / (2.0 * h);
            assert_abs_diff_eq!(p.cdf_jacobian(t, n).unwrap()[0], cdf_fd, epsilon = 1e-7);
            let pdf_fd = (up.pdf(t, n).unwrap() - down.pdf(t, n).unwrap()) / (2.0 * h);
            assert_abs_diff_eq!(p.pdf_jacobian(t, n).unwrap()[0], pdf_fd, epsilon = 1e-7);
        }
    }

    #[test]
    fn unit_horizon_cdf_jacobian_is_the_negative_pmf() {
        // at t = 1, ∂F/∂λ = −λᵏ e^{−λ} / k! with k = ⌊x⌋
        let lambda: Real = 2.5;
        let p = PoissonProcess::new(lambda).unwrap();
        for (x, k) in [(0.0, 0), (1.0, 1), (3.7, 3), (6.0, 6)] {
            let expected = -lambda.powi(k as i32) * (-lambda).exp() / qf_math::factorial(k);
            assert_abs_diff_eq!(p.cdf_jacobian(1.0, x).unwrap()[0], expected, epsilon = 1e-14);
        }
        // away from t = 1 the horizon scales the derivative
        let pmf = p.pdf(2.0, 3.0).unwrap();
        assert_abs_diff_eq!(p.cdf_jacobian(2.0, 3.0).unwrap()[0], -2.0 * pmf, epsilon = 1e-14);
    }

    #[test]
    fn skellam_far_tails() {
        let s = SkellamProcess::new(1.0, 1.0).unwrap();
        assert_eq!(s.pdf(1.0, 1e19).unwrap(), 0.0);
        assert_eq!(s.pdf(1.0, -1e19).unwrap(), 0.0);
        assert_eq!(s.cdf(1.0, 1e19).unwrap(), 1.0);
        assert_eq!(s.cdf(1.0, -1e19).unwrap(), 0.0);
    }

    #[test]
    fn arrivals_stay_within_horizon() {
        let mut rng = MersenneTwisterRng::new(42);
        let p = PoissonProcess::new(5.0).unwrap();
        let arrivals = p.arrivals(2.0, &mut rng).unwrap();
        assert!(arrivals.windows(2).all(|w| w[0] < w[1]));
        assert!(arrivals.iter().all(|a| *a > 0.0 && *a <= 2.0));
        assert_eq!(p.jumps(arrivals.len()).len(), arrivals.len());
    }

    #[test]
    fn counting_paths_are_cadlag() {
        let paths = counting_paths(1.0, 4, &[vec![0.25, 0.3, 0.9]]).unwrap();
        // grid 0, 0.25, 0.5, 0.75, 1: the arrival at 0.25 is counted at 0.25
        assert_eq!(paths.path(0).unwrap(), vec![0.0, 1.0, 2.0, 2.0, 3.0]);
    }

    #[test]
    fn skellam_moments() {
        let s = SkellamProcess::new(2.0, 0.5).unwrap();
        let m = s.marginal(2.0).unwrap();
        assert_abs_diff_eq!(m.mean(), 3.0);
        assert_abs_diff_eq!(m.variance(), 5.0);
        let total: Real = (-30..=40).map(|k| m.pdf(k as Real).unwrap()).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn double_poisson_decomposition() {
        let d = DoubleIndependentPoisson::new(1.5, 0.5).unwrap();
        assert_eq!(d.sum_process().unwrap().rate(), 2.0);
        let diff = d.difference_process().unwrap();
        assert_eq!((diff.rate_left(), diff.rate_right()), (1.5, 0.5));
        assert_eq!(d.parameters().names(), vec!["rate_left", "rate_right"]);
        let u = Complex64::new(0.4, 0.0);
        let joint = d.characteristic(1.0, u, u);
        let sum = d.sum_process().unwrap().characteristic(1.0, u);
        assert_abs_diff_eq!(joint.re, sum.re, epsilon = 1e-14);
        assert_abs_diff_eq!(joint.im, sum.im, epsilon = 1e-14);
    }
}
