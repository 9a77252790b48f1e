//! # qf-processes
//!
//! Counting and diffusion processes for quantflow-rs.
//!
//! Every process exposes its bounded [`Parameters`](qf_core::Parameters), a
//! characteristic function `φ(t, u)` and a marginal distribution at a fixed
//! horizon. Marginals derive moments, densities and call prices either in
//! closed form or by inverting the characteristic function through the
//! transform engine in `qf-math`. Independently, each process can simulate
//! sample [`Paths`] from an injected random source.
//!
//! | Process | Kind | Sampling |
//! |---------|------|----------|
//! | [`PoissonProcess`] | counting | exponential inter-arrivals |
//! | [`SkellamProcess`] | counting (difference) | not implemented |
//! | [`DoublyStochasticPoisson`] | counting, CIR intensity | time-changed arrivals |
//! | [`DoubleIndependentPoisson`] | 2-D counting | not implemented |
//! | [`WeinerProcess`] | diffusion | Gaussian increments |
//! | [`CIR`] | square-root diffusion | full-truncation Euler |

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Cox-Ingersoll-Ross square-root process.
pub mod cir;

/// Doubly stochastic Poisson process with CIR intensity.
pub mod dsp;

/// Marginal distributions and their characteristic-function transforms.
pub mod marginal;

/// Simulated sample paths.
pub mod paths;

/// Poisson, Skellam and double independent Poisson processes.
pub mod poisson;

/// Process traits and the closed `Process1D` sum type.
pub mod process;

/// Wiener (Brownian) process.
pub mod weiner;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cir::CIR;
pub use dsp::DoublyStochasticPoisson;
pub use marginal::{
    CharacteristicSamples, Marginal1D, MarginalTransforms, ProcessMarginal, DEFAULT_DAMPING,
    FINITE_DIFFERENCE_STEP,
};
pub use paths::Paths;
pub use poisson::{DoubleIndependentPoisson, PoissonProcess, SkellamProcess};
pub use process::{
    Process1D, Process1DMarginal, StochasticProcess1D, StochasticProcess2D, DEFAULT_TIME_STEPS,
};
pub use weiner::WeinerProcess;
