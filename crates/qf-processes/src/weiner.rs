//! Wiener process `dX = σ dW`, `X₀ = 0`.

use crate::marginal::{Marginal1D, ProcessMarginal};
use crate::paths::Paths;
use crate::process::{sampling_grid, StochasticProcess1D};
use nalgebra::DMatrix;
use num_complex::Complex64;
use qf_core::errors::Result;
use qf_core::{Bounds, Parameter, Parameters, Real, Time, Volatility};
use qf_math::distributions::{normal_pdf, NormalDistribution};
use rand::Rng;
use tracing::debug;

/// Driftless Brownian motion with volatility `σ ≥ 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeinerProcess {
    sigma: Parameter,
}

impl WeinerProcess {
    /// Create a Wiener process; fails with a validation error if `sigma < 0`.
    pub fn new(sigma: Volatility) -> Result<Self> {
        Ok(Self {
            sigma: Parameter::new("sigma", sigma, Bounds::non_negative(), "volatility")?,
        })
    }

    /// Volatility `σ`.
    pub fn sigma(&self) -> Volatility {
        self.sigma.value()
    }

    /// Brownian paths built from standard-normal `draws`: row 0 is zero and
    /// row `i` is `σ√dt` times the sum of the first `i` draws.
    pub fn sample_from_draws(&self, draws: &Paths) -> Result<Paths> {
        let scale = self.sigma() * draws.dt().sqrt();
        let source = draws.data();
        let mut data = DMatrix::zeros(source.nrows(), source.ncols());
        for c in 0..source.ncols() {
            let mut level = 0.0;
            for r in 1..source.nrows() {
                level += scale * source[(r - 1, c)];
                data[(r, c)] = level;
            }
        }
        Paths::new(draws.t(), data)
    }
}

impl StochasticProcess1D for WeinerProcess {
    type Marginal = ProcessMarginal<WeinerProcess>;

    fn parameters(&self) -> Parameters {
        Parameters::from_unique([self.sigma])
    }

    fn characteristic(&self, t: Time, u: Complex64) -> Complex64 {
        let s = self.sigma();
        (-0.5 * s * s * t * u * u).exp()
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
        debug!(process = "weiner", samples = n, steps, t, "sampling paths");
        let draws = Paths::normal_draws(n, t, steps, rng)?;
        self.sample_from_draws(&draws)
    }
}

impl ProcessMarginal<WeinerProcess> {
    fn normal(&self) -> Result<NormalDistribution> {
        NormalDistribution::new(0.0, self.std())
    }

    /// `(z, σ√t)` at `x`.
    fn standardise(&self, x: Real) -> Result<(Real, Real)> {
        let std = self.normal()?.std();
        Ok((x / std, std))
    }
}

impl Marginal1D for ProcessMarginal<WeinerProcess> {
    fn characteristic(&self, u: Complex64) -> Complex64 {
        self.process().characteristic(self.t(), u)
    }

    fn mean(&self) -> Real {
        0.0
    }

    fn variance(&self) -> Real {
        let s = self.process().sigma();
        s * s * self.t()
    }

    fn pdf(&self, x: Real) -> Result<Real> {
        Ok(self.normal()?.pdf(x))
    }

    fn cdf(&self, x: Real) -> Result<Real> {
        Ok(self.normal()?.cdf(x))
    }

    /// `∂F/∂σ = −φ(z) · z / σ`
    fn cdf_jacobian(&self, x: Real) -> Result<Vec<Real>> {
        let (z, _) = self.standardise(x)?;
        Ok(vec![-normal_pdf(z) * z / self.process().sigma()])
    }

    /// `∂f/∂σ = φ(z) (z² − 1) / (σ · σ√t)`
    fn pdf_jacobian(&self, x: Real) -> Result<Vec<Real>> {
        let (z, std) = self.standardise(x)?;
        let sigma = self.process().sigma();
        Ok(vec![normal_pdf(z) * (z * z - 1.0) / (sigma * std)])
    }
}
