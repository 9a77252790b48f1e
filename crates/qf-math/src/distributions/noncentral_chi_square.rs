//! Non-central chi-square distribution.
//!
//! Evaluated as a Poisson mixture of central chi-square distributions,
//!
//! ```text
//! f(x; k, λ) = Σᵢ e^{−λ/2} (λ/2)ⁱ / i! · χ²_{k+2i}(x)
//! ```
//!
//! with the central terms delegated to `statrs`. This is the transition law
//! of the square-root (CIR) diffusion.

use super::poisson::PoissonDistribution;
use qf_core::errors::{Error, Result};
use qf_core::Real;
use statrs::distribution::{ChiSquared, Continuous, ContinuousCDF};

const TAIL_STDS: Real = 12.0;

/// Non-central chi-square distribution with `df` degrees of freedom and
/// non-centrality `lambda`.
#[derive(Debug, Clone)]
pub struct NonCentralChiSquareDistribution {
    df: Real,
    lambda: Real,
    weights: Vec<Real>,
    terms: Vec<ChiSquared>,
}

impl NonCentralChiSquareDistribution {
    /// Create the distribution; `df > 0`, `lambda ≥ 0`.
    pub fn new(df: Real, lambda: Real) -> Result<Self> {
        if !(df > 0.0 && df.is_finite()) {
            return Err(Error::Precondition(format!(
                "degrees of freedom must be positive, got {df}"
            )));
        }
        let mixing = PoissonDistribution::new(0.5 * lambda)?;
        let half = 0.5 * lambda;
        let last = (half + TAIL_STDS * half.sqrt()).ceil() as u64 + 16;
        let mut weights = Vec::with_capacity(last as usize + 1);
        let mut terms = Vec::with_capacity(last as usize + 1);
        for i in 0..=last {
            let w = mixing.pmf(i);
            if w == 0.0 && i as Real > half {
                break;
            }
            let term = ChiSquared::new(df + 2.0 * i as Real)
                .map_err(|e| Error::InvalidArgument(e.to_string()))?;
            weights.push(w);
            terms.push(term);
        }
        Ok(Self {
            df,
            lambda,
            weights,
            terms,
        })
    }

    /// Degrees of freedom.
    pub fn df(&self) -> Real {
        self.df
    }

    /// Non-centrality parameter.
    pub fn lambda(&self) -> Real {
        self.lambda
    }

    /// Mean `k + λ`.
    pub fn mean(&self) -> Real {
        self.df + self.lambda
    }

    /// Variance `2(k + 2λ)`.
    pub fn variance(&self) -> Real {
        2.0 * (self.df + 2.0 * self.lambda)
    }

    /// Probability density function.
    pub fn pdf(&self, x: Real) -> Real {
        if x < 0.0 {
            return 0.0;
        }
        self.weights
            .iter()
            .zip(&self.terms)
            .map(|(w, d)| w * d.pdf(x))
            .sum()
    }

    /// Cumulative distribution function P(X ≤ x).
    pub fn cdf(&self, x: Real) -> Real {
        if x <= 0.0 {
            return 0.0;
        }
        self.weights
            .iter()
            .zip(&self.terms)
            .map(|(w, d)| w * d.cdf(x))
            .sum::<Real>()
            .min(1.0)
    }
}
