//! # quantflow
//!
//! Point processes, diffusions and the characteristic-function transform
//! engine used to price options and recover densities from them.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `qf-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use quantflow::processes::{PoissonProcess, StochasticProcess1D};
//!
//! let process = PoissonProcess::new(2.0).unwrap();
//! let p = process.pdf(1.0, 1.0).unwrap();
//! assert!((p - 2.0 * (-2.0f64).exp()).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, errors and bounded parameters.
pub use qf_core as core;

/// Distributions, quadrature, random numbers and the transform engine.
pub use qf_math as math;

/// Processes, marginals and sample paths.
pub use qf_processes as processes;

/// Commonly used items.
pub mod prelude {
    pub use qf_core::{Error, Parameter, Parameters, Real, Result, Time};
    pub use qf_math::{Complex64, OutputGrid, TransformConfig, TransformResult};
    pub use qf_processes::{
        DoubleIndependentPoisson, DoublyStochasticPoisson, Marginal1D, MarginalTransforms, Paths,
        PoissonProcess, Process1D, SkellamProcess, StochasticProcess1D, StochasticProcess2D,
        WeinerProcess, CIR,
    };
}
