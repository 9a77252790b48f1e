//! # qf-math
//!
//! Mathematical utilities for quantflow-rs: probability distributions (via
//! statrs), discrete quadrature, a seeded random number generator, and the
//! transform engine that turns sampled characteristic functions into
//! densities and option prices.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// Small special functions and constants.
pub mod functions;

/// Discrete quadrature rules.
pub mod integrals;

/// Random number generators.
pub mod random_numbers;

/// Characteristic-function inversion.
pub mod transforms;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_pdf};
pub use functions::{factorial, factorials, I};
pub use num_complex::Complex64;
pub use transforms::{
    DomainRange, FrequencyGrid, OutputGrid, Transform, TransformConfig, TransformResult,
};
