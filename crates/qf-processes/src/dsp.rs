//! Doubly stochastic Poisson (Cox) process.
//!
//! `N_t = p(Λ_t)` where `p` is a unit-rate Poisson process and
//! `Λ_t = ∫₀ᵗ λ_s ds` integrates a CIR intensity. Conditional on the
//! intensity path `N_t` is Poisson with mean `Λ_t`, hence
//!
//! ```text
//! φ(t, u) = E[exp(Λ_t (e^{iu} − 1))] = L_t(1 − e^{iu})
//! ```
//!
//! with `L_t` the Laplace transform of the integrated intensity.

use crate::cir::CIR;
use crate::marginal::{Marginal1D, ProcessMarginal};
use crate::paths::Paths;
use crate::poisson::counting_paths;
use crate::process::{sampling_grid, StochasticProcess1D};
use num_complex::Complex64;
use qf_core::errors::{Error, Result};
use qf_core::{Parameters, Real, Time};
use qf_math::integrals::discrete_simpson_fn;
use qf_math::transforms::DomainRange;
use qf_math::I;
use rand::Rng;
use rand_distr::Exp1;
use std::f64::consts::PI;
use tracing::debug;

/// Quadrature points over `[0, π]` for the lattice inversion of the pmf.
const PMF_QUADRATURE_POINTS: usize = 257;

/// Poisson process whose intensity follows a CIR diffusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoublyStochasticPoisson {
    intensity: CIR,
}

impl DoublyStochasticPoisson {
    /// Create the process from its intensity.
    pub fn new(intensity: CIR) -> Self {
        Self { intensity }
    }

    /// The intensity process.
    pub fn intensity(&self) -> &CIR {
        &self.intensity
    }

    /// Unit-rate arrivals counted in the integrated-intensity clock of each
    /// sample path.
    fn arrivals<R: Rng + ?Sized>(&self, clock: &Paths, rng: &mut R) -> Vec<Vec<Time>> {
        let time = clock.time();
        clock
            .ys()
            .into_iter()
            .map(|lambda| {
                let total = lambda.last().copied().unwrap_or(0.0);
                let mut arrivals = Vec::new();
                let mut level: Real = rng.sample(Exp1);
                let mut r = 0;
                while level <= total {
                    // first grid time at which the cumulative intensity reaches the arrival
                    while lambda[r] < level {
                        r += 1;
                    }
                    arrivals.push(time[r]);
                    level += rng.sample::<Real, _>(Exp1);
                }
                arrivals
            })
            .collect()
    }
}

impl StochasticProcess1D for DoublyStochasticPoisson {
    type Marginal = ProcessMarginal<DoublyStochasticPoisson>;

    fn parameters(&self) -> Parameters {
        self.intensity.parameters()
    }

    fn characteristic(&self, t: Time, u: Complex64) -> Complex64 {
        self.intensity.integrated_laplace(t, 1.0 - (I * u).exp())
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
        debug!(process = "dsp", samples = n, steps, t, "sampling paths");
        let clock = self.intensity.sample(n, t, steps, rng)?.integrate();
        let arrivals = self.arrivals(&clock, rng);
        counting_paths(t, steps, &arrivals)
    }
}

impl ProcessMarginal<DoublyStochasticPoisson> {
    /// `P(N_t = n) = (1/π) ∫₀^π Re[φ(u) e^{−iun}] du`
    fn pmf(&self, n: Real) -> Result<Real> {
        if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
            return Ok(0.0);
        }
        let p = discrete_simpson_fn(
            |u| (self.characteristic(Complex64::new(u, 0.0)) * (-I * u * n).exp()).re,
            0.0,
            PI,
            PMF_QUADRATURE_POINTS,
        )? / PI;
        Ok(p.max(0.0))
    }
}

impl Marginal1D for ProcessMarginal<DoublyStochasticPoisson> {
    fn characteristic(&self, u: Complex64) -> Complex64 {
        self.process().characteristic(self.t(), u)
    }

    fn mean(&self) -> Real {
        self.process().intensity().integrated_mean(self.t())
    }

    fn pdf(&self, x: Real) -> Result<Real> {
        self.pmf(x)
    }

    fn cdf(&self, x: Real) -> Result<Real> {
        if x.is_nan() {
            return Err(Error::InvalidArgument("cdf evaluated at NaN".into()));
        }
        if x < 0.0 {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for k in 0..=(x.floor() as u64) {
            total += self.pmf(k as Real)?;
            if total >= 1.0 {
                return Ok(1.0);
            }
        }
        Ok(total)
    }

    fn max_frequency(&self) -> Real {
        PI
    }

    fn domain_range(&self) -> DomainRange {
        DomainRange::non_negative()
    }
}
