//! Poisson distribution.
//!
//! Wraps the `statrs` crate's Poisson implementation, adding the degenerate
//! zero-mean case (a process observed at `t = 0`) and real-valued
//! evaluation points.

use qf_core::errors::{Error, Result};
use qf_core::Real;
use statrs::distribution::{Discrete, DiscreteCDF, Poisson};

/// Poisson distribution with mean `lambda ≥ 0`.
#[derive(Debug, Clone)]
pub struct PoissonDistribution {
    dist: Option<Poisson>,
    lambda: Real,
}

impl PoissonDistribution {
    /// Create a Poisson distribution with the given mean `lambda`.
    ///
    /// `lambda = 0` is the point mass at zero.
    pub fn new(lambda: Real) -> Result<Self> {
        if !(lambda >= 0.0 && lambda.is_finite()) {
            return Err(Error::Precondition(format!(
                "poisson mean must be finite and non-negative, got {lambda}"
            )));
        }
        let dist = if lambda > 0.0 {
            Some(Poisson::new(lambda).map_err(|e| Error::InvalidArgument(e.to_string()))?)
        } else {
            None
        };
        Ok(Self { dist, lambda })
    }

    /// Mean parameter λ.
    pub fn lambda(&self) -> Real {
        self.lambda
    }

    /// Probability mass function P(X = k).
    pub fn pmf(&self, k: u64) -> Real {
        match &self.dist {
            Some(d) => d.pmf(k),
            None => {
                if k == 0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Cumulative distribution function P(X ≤ k).
    pub fn cdf(&self, k: u64) -> Real {
        match &self.dist {
            Some(d) => d.cdf(k),
            None => 1.0,
        }
    }

    /// Probability mass at a real-valued point: zero off the non-negative
    /// integers.
    pub fn pmf_at(&self, x: Real) -> Real {
        if x < 0.0 || x.fract() != 0.0 || !x.is_finite() {
            return 0.0;
        }
        self.pmf(x as u64)
    }

    /// Cumulative probability at a real-valued point, `P(X ≤ ⌊x⌋)`.
    pub fn cdf_at(&self, x: Real) -> Real {
        if x < 0.0 || x.is_nan() {
            return 0.0;
        }
        if x.is_infinite() {
            return 1.0;
        }
        self.cdf(x.floor() as u64)
    }

    /// Mean of the distribution (= λ).
    pub fn mean(&self) -> Real {
        self.lambda
    }

    /// Variance of the distribution (= λ).
    pub fn variance(&self) -> Real {
        self.lambda
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poisson_pmf() {
        let d = PoissonDistribution::new(3.0).unwrap();
        // P(X=0) = e^{-3}
        let expected = (-3.0_f64).exp();
        assert!(
            (d.pmf(0) - expected).abs() < 1e-10,
            "got {}, expected {}",
            d.pmf(0),
            expected
        );
        // P(X=3) = e^{-3} * 3^3 / 3! = e^{-3} * 27 / 6
        let expected3 = expected * 27.0 / 6.0;
        assert!(
            (d.pmf(3) - expected3).abs() < 1e-10,
            "got {}, expected {}",
            d.pmf(3),
            expected3
        );
    }

    #[test]
    fn poisson_cdf_sums_to_one() {
        let d = PoissonDistribution::new(5.0).unwrap();
        // For large k, CDF should approach 1
        assert!((d.cdf(50) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn poisson_cdf_monotone() {
        let d = PoissonDistribution::new(2.0).unwrap();
        let mut prev = 0.0;
        for k in 0..20 {
            let c = d.cdf(k);
            assert!(c >= prev, "CDF not monotone at k={k}");
            prev = c;
        }
    }

    #[test]
    fn zero_mean_is_point_mass() {
        let d = PoissonDistribution::new(0.0).unwrap();
        assert_eq!(d.pmf(0), 1.0);
        assert_eq!(d.pmf(1), 0.0);
        assert_eq!(d.cdf(0), 1.0);
    }

    #[test]
    fn real_valued_points() {
        let d = PoissonDistribution::new(1.5).unwrap();
        assert_eq!(d.pmf_at(1.5), 0.0);
        assert_eq!(d.pmf_at(-1.0), 0.0);
        assert_eq!(d.cdf_at(-0.5), 0.0);
        assert!((d.cdf_at(2.7) - d.cdf(2)).abs() < 1e-15);
    }

    #[test]
    fn negative_mean_rejected() {
        assert!(PoissonDistribution::new(-1.0).is_err());
    }
}
