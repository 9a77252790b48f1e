//! Probability distributions.
//!
//! Provides the Normal, Poisson, Skellam, and non-central chi-square
//! distributions used by the closed-form marginals of the processes,
//! delegating to the `statrs` crate where it has an implementation.

pub mod noncentral_chi_square;
pub mod normal;
pub mod poisson;
pub mod skellam;

pub use noncentral_chi_square::NonCentralChiSquareDistribution;
pub use normal::{normal_cdf, normal_pdf, NormalDistribution};
pub use poisson::PoissonDistribution;
pub use skellam::SkellamDistribution;
