//! Normal (Gaussian) distribution.

use qf_core::errors::{Error, Result};
use qf_core::Real;
use statrs::function::erf::erfc;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// The standard normal probability density function.
///
/// `φ(x) = exp(-x²/2) / √(2π)`
#[inline]
pub fn normal_pdf(x: Real) -> Real {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// The standard normal cumulative distribution function Φ(x).
///
/// Computed from the complementary error function, accurate in both tails.
pub fn normal_cdf(x: Real) -> Real {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Normal distribution with mean `mean` and standard deviation `std`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalDistribution {
    mean: Real,
    std: Real,
}

impl NormalDistribution {
    /// Create a normal distribution. `std` must be strictly positive.
    pub fn new(mean: Real, std: Real) -> Result<Self> {
        if !(std > 0.0 && std.is_finite() && mean.is_finite()) {
            return Err(Error::Precondition(format!(
                "normal distribution needs finite mean and positive std, got mean={mean} std={std}"
            )));
        }
        Ok(Self { mean, std })
    }

    /// Mean.
    pub fn mean(&self) -> Real {
        self.mean
    }

    /// Standard deviation.
    pub fn std(&self) -> Real {
        self.std
    }

    /// Probability density at `x`.
    pub fn pdf(&self, x: Real) -> Real {
        normal_pdf((x - self.mean) / self.std) / self.std
    }

    /// Cumulative probability `P(X ≤ x)`.
    pub fn cdf(&self, x: Real) -> Real {
        normal_cdf((x - self.mean) / self.std)
    }
}
