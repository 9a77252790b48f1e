//! Process traits and the closed set of 1-D processes.

use crate::cir::CIR;
use crate::dsp::DoublyStochasticPoisson;
use crate::marginal::{Marginal1D, ProcessMarginal};
use crate::paths::Paths;
use crate::poisson::{PoissonProcess, SkellamProcess};
use crate::weiner::WeinerProcess;
use num_complex::Complex64;
use qf_core::errors::Result;
use qf_core::{ensure, Parameters, Real, Time};
use qf_math::transforms::DomainRange;
use rand::Rng;

/// Number of time steps used when a sampling call passes `steps = 0`.
pub const DEFAULT_TIME_STEPS: usize = 100;

/// A one-dimensional process with a closed-form characteristic function.
pub trait StochasticProcess1D: std::fmt::Debug + Clone {
    /// Marginal distribution type.
    type Marginal: Marginal1D;

    /// Model parameters in declaration order.
    fn parameters(&self) -> Parameters;

    /// Characteristic function `E[exp(iu X_t)]`.
    fn characteristic(&self, t: Time, u: Complex64) -> Complex64;

    /// The marginal distribution at horizon `t ≥ 0`.
    fn marginal(&self, t: Time) -> Result<Self::Marginal>;

    /// Density (or mass) of `X_t` at `x`.
    fn pdf(&self, t: Time, x: Real) -> Result<Real> {
        self.marginal(t)?.pdf(x)
    }

    /// `P(X_t ≤ x)`.
    fn cdf(&self, t: Time, x: Real) -> Result<Real> {
        self.marginal(t)?.cdf(x)
    }

    /// Sensitivity of `cdf(t, x)` to each parameter.
    fn cdf_jacobian(&self, t: Time, x: Real) -> Result<Vec<Real>> {
        self.marginal(t)?.cdf_jacobian(x)
    }

    /// Sensitivity of `pdf(t, x)` to each parameter.
    fn pdf_jacobian(&self, t: Time, x: Real) -> Result<Vec<Real>> {
        self.marginal(t)?.pdf_jacobian(x)
    }

    /// Simulate `n` paths over `[0, t]` with `steps` uniform time steps
    /// (`0` selects [`DEFAULT_TIME_STEPS`]).
    fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        t: Time,
        steps: usize,
        rng: &mut R,
    ) -> Result<Paths>;
}

/// A two-dimensional process.
pub trait StochasticProcess2D: std::fmt::Debug + Clone {
    /// Model parameters in declaration order.
    fn parameters(&self) -> Parameters;

    /// Joint characteristic function `E[exp(i(u₁X₁ + u₂X₂))]`.
    fn characteristic(&self, t: Time, u1: Complex64, u2: Complex64) -> Complex64;

    /// Joint density (or mass) at `(x1, x2)`.
    fn pdf(&self, t: Time, x1: Real, x2: Real) -> Result<Real>;

    /// Joint `P(X₁ ≤ x1, X₂ ≤ x2)`.
    fn cdf(&self, t: Time, x1: Real, x2: Real) -> Result<Real>;

    /// Simulate `n` joint paths; returns one [`Paths`] per component.
    fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        t: Time,
        steps: usize,
        rng: &mut R,
    ) -> Result<(Paths, Paths)>;
}

/// Validated `(t, steps)` for a sampling call.
pub(crate) fn sampling_grid(t: Time, steps: usize) -> Result<(Time, usize)> {
    ensure!(
        t.is_finite() && t > 0.0,
        "sampling horizon must be positive, got {t}"
    );
    let steps = if steps == 0 { DEFAULT_TIME_STEPS } else { steps };
    Ok((t, steps))
}

/// The closed set of 1-D processes, dispatched by pattern matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Process1D {
    /// Poisson counting process.
    Poisson(PoissonProcess),
    /// Difference of two Poisson processes.
    Skellam(SkellamProcess),
    /// Poisson process with CIR intensity.
    Dsp(DoublyStochasticPoisson),
    /// Brownian motion.
    Weiner(WeinerProcess),
    /// Square-root diffusion.
    Cir(CIR),
}

/// Marginal of a [`Process1D`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Process1DMarginal {
    /// Poisson marginal.
    Poisson(ProcessMarginal<PoissonProcess>),
    /// Skellam marginal.
    Skellam(ProcessMarginal<SkellamProcess>),
    /// Doubly stochastic Poisson marginal.
    Dsp(ProcessMarginal<DoublyStochasticPoisson>),
    /// Gaussian marginal.
    Weiner(ProcessMarginal<WeinerProcess>),
    /// Scaled non-central chi-square marginal.
    Cir(ProcessMarginal<CIR>),
}

macro_rules! dispatch {
    ($ty:ident, $value:expr, $inner:ident => $body:expr) => {
        match $value {
            $ty::Poisson($inner) => $body,
            $ty::Skellam($inner) => $body,
            $ty::Dsp($inner) => $body,
            $ty::Weiner($inner) => $body,
            $ty::Cir($inner) => $body,
        }
    };
}

macro_rules! from_process {
    ($($variant:ident($process:ty)),* $(,)?) => {
        $(
            impl From<$process> for Process1D {
                fn from(process: $process) -> Self {
                    Process1D::$variant(process)
                }
            }

            impl From<ProcessMarginal<$process>> for Process1DMarginal {
                fn from(marginal: ProcessMarginal<$process>) -> Self {
                    Process1DMarginal::$variant(marginal)
                }
            }
        )*
    };
}

from_process!(
    Poisson(PoissonProcess),
    Skellam(SkellamProcess),
    Dsp(DoublyStochasticPoisson),
    Weiner(WeinerProcess),
    Cir(CIR),
);

impl Process1D {
    /// Short name of the process kind.
    pub fn name(&self) -> &'static str {
        match self {
            Process1D::Poisson(_) => "poisson",
            Process1D::Skellam(_) => "skellam",
            Process1D::Dsp(_) => "dsp",
            Process1D::Weiner(_) => "weiner",
            Process1D::Cir(_) => "cir",
        }
    }
}

impl StochasticProcess1D for Process1D {
    type Marginal = Process1DMarginal;

    fn parameters(&self) -> Parameters {
        dispatch!(Process1D, self, p => p.parameters())
    }

    fn characteristic(&self, t: Time, u: Complex64) -> Complex64 {
        dispatch!(Process1D, self, p => p.characteristic(t, u))
    }

    fn marginal(&self, t: Time) -> Result<Process1DMarginal> {
        dispatch!(Process1D, self, p => p.marginal(t).map(Process1DMarginal::from))
    }

    fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        t: Time,
        steps: usize,
        rng: &mut R,
    ) -> Result<Paths> {
        dispatch!(Process1D, self, p => p.sample(n, t, steps, rng))
    }
}

impl Marginal1D for Process1DMarginal {
    fn characteristic(&self, u: Complex64) -> Complex64 {
        dispatch!(Process1DMarginal, self, m => m.characteristic(u))
    }

    fn mean(&self) -> Real {
        dispatch!(Process1DMarginal, self, m => m.mean())
    }

    fn variance(&self) -> Real {
        dispatch!(Process1DMarginal, self, m => m.variance())
    }

    fn std(&self) -> Real {
        dispatch!(Process1DMarginal, self, m => m.std())
    }

    fn pdf(&self, x: Real) -> Result<Real> {
        dispatch!(Process1DMarginal, self, m => m.pdf(x))
    }

    fn cdf(&self, x: Real) -> Result<Real> {
        dispatch!(Process1DMarginal, self, m => m.cdf(x))
    }

    fn max_frequency(&self) -> Real {
        dispatch!(Process1DMarginal, self, m => m.max_frequency())
    }

    fn domain_range(&self) -> DomainRange {
        dispatch!(Process1DMarginal, self, m => m.domain_range())
    }

    fn cdf_jacobian(&self, x: Real) -> Result<Vec<Real>> {
        dispatch!(Process1DMarginal, self, m => m.cdf_jacobian(x))
    }

    fn pdf_jacobian(&self, x: Real) -> Result<Vec<Real>> {
        dispatch!(Process1DMarginal, self, m => m.pdf_jacobian(x))
    }
}
