//! Cox-Ingersoll-Ross square-root process.
//!
//! ```text
//! dX = κ(θ − X) dt + σ √X dW,    X₀ = x₀ ≥ 0
//! ```
//!
//! Given `X₀`, `2c·X_t` is non-central chi-square with `4κθ/σ²` degrees of
//! freedom and non-centrality `2c·x₀e^{−κt}`, where
//! `c = 2κ / (σ²(1 − e^{−κt}))`. Used as the intensity of the doubly
//! stochastic Poisson process, whose characteristic function needs the
//! Laplace transform of `∫₀ᵗ X_s ds`.

use crate::marginal::{Marginal1D, ProcessMarginal};
use crate::paths::Paths;
use crate::process::{sampling_grid, StochasticProcess1D};
use nalgebra::DMatrix;
use num_complex::Complex64;
use qf_core::errors::Result;
use qf_core::{ensure, Bounds, Parameter, Parameters, Rate, Real, Time};
use qf_math::distributions::NonCentralChiSquareDistribution;
use qf_math::transforms::DomainRange;
use qf_math::I;
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::debug;

/// Square-root diffusion with mean reversion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
pub struct CIR {
    rate: Parameter,
    kappa: Parameter,
    theta: Parameter,
    sigma: Parameter,
}

impl CIR {
    /// Create a CIR process with initial value `rate ≥ 0`, mean-reversion
    /// speed `kappa > 0`, long-run level `theta > 0` and volatility
    /// `sigma > 0`.
    pub fn new(rate: Rate, kappa: Real, theta: Real, sigma: Real) -> Result<Self> {
        Ok(Self {
            rate: Parameter::new("rate", rate, Bounds::non_negative(), "initial value")?,
            kappa: Parameter::new("kappa", kappa, Bounds::positive(), "mean reversion speed")?,
            theta: Parameter::new("theta", theta, Bounds::positive(), "long-run level")?,
            sigma: Parameter::new("sigma", sigma, Bounds::positive(), "volatility")?,
        })
    }

    /// Initial value `x₀`.
    pub fn rate(&self) -> Rate {
        self.rate.value()
    }

    /// Mean-reversion speed `κ`.
    pub fn kappa(&self) -> Real {
        self.kappa.value()
    }

    /// Long-run level `θ`.
    pub fn theta(&self) -> Real {
        self.theta.value()
    }

    /// Volatility `σ`.
    pub fn sigma(&self) -> Real {
        self.sigma.value()
    }

    /// Whether `2κθ ≥ σ²`, in which case the process never reaches zero.
    pub fn is_positive(&self) -> bool {
        2.0 * self.kappa() * self.theta() >= self.sigma() * self.sigma()
    }

    /// `E[X_t]`
    pub fn mean_at(&self, t: Time) -> Real {
        let ekt = (-self.kappa() * t).exp();
        self.rate() * ekt + self.theta() * (1.0 - ekt)
    }

    /// `Var[X_t]`
    pub fn variance_at(&self, t: Time) -> Real {
        let (k, s2) = (self.kappa(), self.sigma() * self.sigma());
        let ekt = (-k * t).exp();
        self.rate() * s2 / k * (ekt - ekt * ekt)
            + self.theta() * s2 / (2.0 * k) * (1.0 - ekt) * (1.0 - ekt)
    }

    /// `E[∫₀ᵗ X_s ds]`
    pub fn integrated_mean(&self, t: Time) -> Real {
        let k = self.kappa();
        self.theta() * t + (self.rate() - self.theta()) * (1.0 - (-k * t).exp()) / k
    }

    /// Laplace transform of the integrated process, `E[exp(−s ∫₀ᵗ X_r dr)]`,
    /// for `Re s ≥ 0`.
    pub fn integrated_laplace(&self, t: Time, s: Complex64) -> Complex64 {
        let (k, s2) = (self.kappa(), self.sigma() * self.sigma());
        let gamma = (k * k + 2.0 * s2 * s).sqrt();
        let decay = (-gamma * t).exp();
        let denom = (gamma + k) + (gamma - k) * decay;
        let b = 2.0 * s * (1.0 - decay) / denom;
        let log_a =
            (2.0 * k * self.theta() / s2) * ((2.0 * gamma).ln() + 0.5 * (k - gamma) * t - denom.ln());
        (log_a - b * self.rate()).exp()
    }

    /// `2c`, the scale turning `X_t` into a non-central chi-square variate.
    fn chi_square_scale(&self, t: Time) -> Real {
        let k = self.kappa();
        4.0 * k / (self.sigma() * self.sigma() * (1.0 - (-k * t).exp()))
    }

    fn transition(&self, t: Time) -> Result<(Real, NonCentralChiSquareDistribution)> {
        ensure!(t > 0.0, "CIR transition density needs t > 0, got {t}");
        let scale = self.chi_square_scale(t);
        let df = 4.0 * self.kappa() * self.theta() / (self.sigma() * self.sigma());
        let lambda = scale * self.rate() * (-self.kappa() * t).exp();
        Ok((scale, NonCentralChiSquareDistribution::new(df, lambda)?))
    }
}

impl StochasticProcess1D for CIR {
    type Marginal = ProcessMarginal<CIR>;

    fn parameters(&self) -> Parameters {
        Parameters::from_unique([self.rate, self.kappa, self.theta, self.sigma])
    }

    fn characteristic(&self, t: Time, u: Complex64) -> Complex64 {
        let iu = I * u;
        if t <= 0.0 {
            return (iu * self.rate()).exp();
        }
        let k = self.kappa();
        let c = 0.5 * self.chi_square_scale(t);
        let shrink = 1.0 - iu / c;
        let power = -2.0 * k * self.theta() / (self.sigma() * self.sigma());
        shrink.powf(power) * (iu * self.rate() * (-k * t).exp() / shrink).exp()
    }

    fn marginal(&self, t: Time) -> Result<Self::Marginal> {
        ProcessMarginal::new(*self, t)
    }

    /// Full-truncation Euler scheme: drift and diffusion see `max(X, 0)`,
    /// and the reported path is the truncated value.
    fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        t: Time,
        steps: usize,
        rng: &mut R,
    ) -> Result<Paths> {
        let (t, steps) = sampling_grid(t, steps)?;
        debug!(process = "cir", samples = n, steps, t, "sampling paths");
        let dt = t / steps as Real;
        let sdt = self.sigma() * dt.sqrt();
        let (k, theta) = (self.kappa(), self.theta());
        let mut data = DMatrix::zeros(steps + 1, n);
        for c in 0..n {
            let mut x = self.rate();
            data[(0, c)] = x;
            for r in 1..=steps {
                let xp = x.max(0.0);
                let z: Real = rng.sample(StandardNormal);
                x += k * (theta - xp) * dt + sdt * xp.sqrt() * z;
                data[(r, c)] = x.max(0.0);
            }
        }
        Paths::new(t, data)
    }
}

impl Marginal1D for ProcessMarginal<CIR> {
    fn characteristic(&self, u: Complex64) -> Complex64 {
        self.process().characteristic(self.t(), u)
    }

    fn mean(&self) -> Real {
        self.process().mean_at(self.t())
    }

    fn variance(&self) -> Real {
        self.process().variance_at(self.t())
    }

    fn pdf(&self, x: Real) -> Result<Real> {
        let (scale, dist) = self.process().transition(self.t())?;
        Ok(scale * dist.pdf(scale * x))
    }

    fn cdf(&self, x: Real) -> Result<Real> {
        let (scale, dist) = self.process().transition(self.t())?;
        Ok(dist.cdf(scale * x))
    }

    fn domain_range(&self) -> DomainRange {
        DomainRange::non_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marginal::MarginalTransforms;
    use approx::assert_abs_diff_eq;
    use qf_core::Error;
    use qf_math::integrals::discrete_simpson_fn;
    use qf_math::random_numbers::MersenneTwisterRng;

    fn cir() -> CIR {
        CIR::new(0.8, 1.5, 1.0, 0.5).unwrap()
    }

    #[test]
    fn parameter_bounds() {
        assert!(matches!(CIR::new(-0.1, 1.0, 1.0, 0.5), Err(Error::Validation(_))));
        assert!(matches!(CIR::new(0.1, 0.0, 1.0, 0.5), Err(Error::Validation(_))));
        assert_eq!(
            cir().parameters().names(),
            vec!["rate", "kappa", "theta", "sigma"]
        );
        assert!(cir().is_positive());
    }

    #[test]
    fn characteristic_moments_match_closed_form() {
        let m = cir().marginal(0.7).unwrap();
        assert_abs_diff_eq!(m.mean_from_characteristic(), m.mean(), epsilon = 1e-6);
        assert_abs_diff_eq!(m.variance_from_characteristic(), m.variance(), epsilon = 1e-5);
    }

    #[test]
    fn density_integrates_to_cdf() {
        let m = cir().marginal(1.0).unwrap();
        let mass = discrete_simpson_fn(|x| m.pdf(x).unwrap(), 0.0, 2.0, 401).unwrap();
        assert_abs_diff_eq!(mass, m.cdf(2.0).unwrap(), epsilon = 1e-6);
        let first = discrete_simpson_fn(|x| x * m.pdf(x).unwrap(), 0.0, 12.0, 1201).unwrap();
        assert_abs_diff_eq!(first, m.mean(), epsilon = 1e-6);
    }

    #[test]
    fn zero_horizon() {
        let m = cir().marginal(0.0).unwrap();
        let c = m.characteristic(Complex64::new(1.0, 0.0));
        assert_abs_diff_eq!(c.re, 0.8f64.cos(), epsilon = 1e-15);
        assert!(matches!(m.pdf(0.5), Err(Error::Precondition(_))));
    }

    #[test]
    fn integrated_laplace_slope_is_integrated_mean() {
        let p = cir();
        let t = 2.0;
        let h = 1e-5;
        let up = p.integrated_laplace(t, Complex64::new(h, 0.0));
        let down = p.integrated_laplace(t, Complex64::new(-h, 0.0));
        assert_abs_diff_eq!(p.integrated_laplace(t, Complex64::new(0.0, 0.0)).re, 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(-(up - down).re / (2.0 * h), p.integrated_mean(t), epsilon = 1e-6);
    }

    #[test]
    fn euler_paths_track_the_mean() {
        let mut rng = MersenneTwisterRng::new(1234);
        let p = cir();
        let paths = p.sample(4000, 1.0, 100, &mut rng).unwrap();
        assert!(paths.data().iter().all(|v| *v >= 0.0));
        let last = *paths.mean().last().unwrap();
        assert_abs_diff_eq!(last, p.mean_at(1.0), epsilon = 0.03);
    }
}
