//! Skellam distribution: the difference `N₁ − N₂` of two independent
//! Poisson counts.
//!
//! The pmf is usually written with a modified Bessel function,
//!
//! ```text
//! P(K = k) = e^{−(μ₁+μ₂)} (μ₁/μ₂)^{k/2} I_{|k|}(2√(μ₁μ₂))
//! ```
//!
//! but here it is evaluated as the convolution of the two Poisson pmfs,
//! which stays accurate when either mean is zero and yields the cdf from
//! the same sum.

use super::poisson::PoissonDistribution;
use qf_core::errors::Result;
use qf_core::Real;

/// Number of standard deviations past the mean after which Poisson mass is
/// treated as zero.
const TAIL_STDS: Real = 12.0;

/// Skellam distribution with means `mu_left` (added counts) and `mu_right`
/// (subtracted counts).
#[derive(Debug, Clone)]
pub struct SkellamDistribution {
    left: PoissonDistribution,
    right: PoissonDistribution,
}

impl SkellamDistribution {
    /// Create a Skellam distribution. Both means must be non-negative.
    pub fn new(mu_left: Real, mu_right: Real) -> Result<Self> {
        Ok(Self {
            left: PoissonDistribution::new(mu_left)?,
            right: PoissonDistribution::new(mu_right)?,
        })
    }

    /// Mean `μ₁ − μ₂`.
    pub fn mean(&self) -> Real {
        self.left.mean() - self.right.mean()
    }

    /// Variance `μ₁ + μ₂`.
    pub fn variance(&self) -> Real {
        self.left.mean() + self.right.mean()
    }

    /// Largest count of a Poisson variate with mean `mu` kept in the sums.
    fn tail(mu: Real) -> Real {
        (mu + TAIL_STDS * mu.sqrt()).ceil() + 32.0
    }

    /// Truncated support `[−tail(μ₂), tail(μ₁)]` of the difference.
    fn bounds(&self) -> (Real, Real) {
        (-Self::tail(self.right.mean()), Self::tail(self.left.mean()))
    }

    /// Range of subtracted counts `n` carrying the convolution for `k`.
    fn support(&self, k: i64) -> std::ops::RangeInclusive<u64> {
        let start = if k < 0 { k.unsigned_abs() } else { 0 };
        let tail = Self::tail(self.right.mean()) as u64;
        start..=start.max(tail)
    }

    /// `n + k` as a count of the left variate, if it is one.
    fn left_count(n: u64, k: i64) -> Option<u64> {
        i64::try_from(n)
            .ok()
            .and_then(|n| n.checked_add(k))
            .and_then(|m| u64::try_from(m).ok())
    }

    /// Probability mass function `P(K = k) = Σₙ P(N₁ = n + k) P(N₂ = n)`.
    pub fn pmf(&self, k: i64) -> Real {
        let (lower, upper) = self.bounds();
        if (k as Real) < lower || (k as Real) > upper {
            return 0.0;
        }
        self.support(k)
            .filter_map(|n| Some(self.left.pmf(Self::left_count(n, k)?) * self.right.pmf(n)))
            .sum()
    }

    /// Cumulative distribution `P(K ≤ k) = Σₙ P(N₁ ≤ n + k) P(N₂ = n)`.
    pub fn cdf(&self, k: i64) -> Real {
        let (lower, upper) = self.bounds();
        if (k as Real) < lower {
            return 0.0;
        }
        if (k as Real) > upper {
            return 1.0;
        }
        self.support(k)
            .filter_map(|n| Some(self.left.cdf(Self::left_count(n, k)?) * self.right.pmf(n)))
            .sum::<Real>()
            .min(1.0)
    }

    /// Probability mass at a real-valued point: zero off the integers and
    /// past the truncated support.
    pub fn pmf_at(&self, x: Real) -> Real {
        let (lower, upper) = self.bounds();
        if x.fract() != 0.0 || !x.is_finite() || x < lower || x > upper {
            return 0.0;
        }
        self.pmf(x as i64)
    }

    /// Cumulative probability at a real-valued point, `P(K ≤ ⌊x⌋)`.
    pub fn cdf_at(&self, x: Real) -> Real {
        let (lower, upper) = self.bounds();
        if x.is_nan() || x < lower {
            return 0.0;
        }
        if x > upper {
            return 1.0;
        }
        self.cdf(x.floor() as i64)
    }
}
