//! Characteristic-function inversion.
//!
//! A [`Transform`] owns a frequency grid `uⱼ = u₀ + j·Δu` and the quadrature
//! weights `wⱼ` for it. Given the characteristic function `ψ` sampled on that
//! grid it recovers a real function on an evenly spaced spatial grid
//! `xₖ = x₀ + k·Δx`:
//!
//! ```text
//! y(xₖ) = c · Re Σⱼ wⱼ ψ(uⱼ) e^{−i uⱼ xₖ}
//! ```
//!
//! with `c = Δu/π` on a one-sided grid `[0, U)` and `c = Δu/2π` on a
//! symmetric grid `[−U, U)`. When `Δx·Δu·N = 2π` (the Nyquist spacing) the sum
//! is a plain DFT; any other spacing goes through a fractional FFT.
//!
//! Quadrature is either rectangular (unit weights, with the origin sample
//! of a one-sided grid shared with the mirrored half-line and so halved) or
//! Simpson's 1/3 rule, which needs an odd number of samples.

mod fft;

use num_complex::Complex64;
use qf_core::errors::{Error, Result};
use qf_core::{ensure_config, ensure_post, Real};
use std::f64::consts::PI;
use tracing::{debug, warn};

use crate::integrals::simpson_weights;

/// Number of frequency samples used when none is configured.
pub const DEFAULT_SAMPLES: usize = 128;

/// Maximum frequency used when a marginal does not override it.
pub const DEFAULT_MAX_FREQUENCY: Real = 20.0;

const NYQUIST_TOLERANCE: Real = 1e-12;

/// Support of the spatial variable, used to place the output grid.
///
/// A finite lower bound anchors the grid there; otherwise a finite upper
/// bound ends the grid there; otherwise the grid is centred on zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DomainRange {
    /// Lower end of the support, if any.
    pub lower: Option<Real>,
    /// Upper end of the support, if any.
    pub upper: Option<Real>,
}

impl DomainRange {
    /// Support with optional ends.
    pub const fn new(lower: Option<Real>, upper: Option<Real>) -> Self {
        Self { lower, upper }
    }

    /// The whole real line.
    pub const fn unbounded() -> Self {
        Self::new(None, None)
    }

    /// `[0, ∞)`, the support of counting processes and positive diffusions.
    pub const fn non_negative() -> Self {
        Self::new(Some(0.0), None)
    }
}

/// Shape of the frequency grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FrequencyGrid {
    /// `[0, U)` with spacing `U/N`; relies on `ψ(−u) = conj ψ(u)`.
    #[default]
    OneSided,
    /// `[−U, U)` with spacing `2U/N`.
    Symmetric,
}

/// Requested output resolution for a transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputGrid<'a> {
    /// Use the configured (or default) sample count.
    #[default]
    Default,
    /// Fix the sample count `N`.
    Samples(usize),
    /// Evaluate on an evenly spaced set of target coordinates: `N` is their
    /// count, the spacing is inferred from their range and the grid starts
    /// at their minimum.
    Coordinates(&'a [Real]),
}

impl From<usize> for OutputGrid<'_> {
    fn from(n: usize) -> Self {
        OutputGrid::Samples(n)
    }
}

impl<'a> From<&'a [Real]> for OutputGrid<'a> {
    fn from(x: &'a [Real]) -> Self {
        OutputGrid::Coordinates(x)
    }
}

impl<'a> From<&'a Vec<Real>> for OutputGrid<'a> {
    fn from(x: &'a Vec<Real>) -> Self {
        OutputGrid::Coordinates(x.as_slice())
    }
}

/// Transform configuration. Validated once by [`Transform::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformConfig {
    /// Number of frequency samples `N`; `None` selects [`DEFAULT_SAMPLES`]
    /// (plus one under the Simpson rule).
    pub samples: Option<usize>,
    /// Maximum frequency `U`.
    pub max_frequency: Real,
    /// Support used to place the spatial grid.
    pub domain_range: DomainRange,
    /// Simpson 1/3 weights instead of rectangular summation.
    pub simpson_rule: bool,
    /// One-sided or symmetric frequency grid.
    pub grid: FrequencyGrid,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            samples: None,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            domain_range: DomainRange::unbounded(),
            simpson_rule: false,
            grid: FrequencyGrid::OneSided,
        }
    }
}

impl TransformConfig {
    /// Set the number of frequency samples.
    pub fn with_samples(mut self, n: usize) -> Self {
        self.samples = Some(n);
        self
    }

    /// Set the maximum frequency.
    pub fn with_max_frequency(mut self, max_frequency: Real) -> Self {
        self.max_frequency = max_frequency;
        self
    }

    /// Set the spatial support.
    pub fn with_domain_range(mut self, domain_range: DomainRange) -> Self {
        self.domain_range = domain_range;
        self
    }

    /// Toggle Simpson quadrature.
    pub fn with_simpson_rule(mut self, simpson_rule: bool) -> Self {
        self.simpson_rule = simpson_rule;
        self
    }

    /// Set the frequency grid shape.
    pub fn with_grid(mut self, grid: FrequencyGrid) -> Self {
        self.grid = grid;
        self
    }
}

/// Spatial samples produced by an inversion.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransformResult {
    /// Evenly spaced spatial coordinates.
    pub x: Vec<Real>,
    /// Function values at `x`.
    pub y: Vec<Real>,
}

impl TransformResult {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the result is empty.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Spacing of the spatial grid (zero for a single sample).
    pub fn delta_x(&self) -> Real {
        match self.x.as_slice() {
            [a, b, ..] => b - a,
            _ => 0.0,
        }
    }

    /// Iterate over `(x, y)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Real, Real)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Apply `f(x, y)` to every value, keeping the grid.
    pub fn map_y<F: Fn(Real, Real) -> Real>(self, f: F) -> Self {
        let y = self.x.iter().zip(&self.y).map(|(&x, &y)| f(x, y)).collect();
        Self { x: self.x, y }
    }
}

/// A validated frequency grid with its quadrature weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    n: usize,
    max_frequency: Real,
    domain_range: DomainRange,
    simpson_rule: bool,
    grid: FrequencyGrid,
    weights: Vec<Real>,
}

impl Transform {
    /// Build a transform, failing with [`Error::Configuration`] when the
    /// maximum frequency is not positive, the sample count is zero, or the
    /// Simpson rule is requested with an odd number of subintervals.
    pub fn new(config: TransformConfig) -> Result<Self> {
        Self::build(config).map_err(|e| {
            warn!(error = %e, "rejected transform configuration");
            e
        })
    }

    fn build(config: TransformConfig) -> Result<Self> {
        let n = config.samples.unwrap_or(if config.simpson_rule {
            DEFAULT_SAMPLES + 1
        } else {
            DEFAULT_SAMPLES
        });
        ensure_config!(n >= 1, "transform needs at least one sample");
        ensure_config!(
            config.max_frequency.is_finite() && config.max_frequency > 0.0,
            "max_frequency must be positive, got {}",
            config.max_frequency
        );
        let weights = if config.simpson_rule {
            simpson_weights(n)?
        } else {
            let mut w = vec![1.0; n];
            if config.grid == FrequencyGrid::OneSided {
                w[0] = 0.5;
            }
            w
        };
        debug!(
            samples = n,
            max_frequency = config.max_frequency,
            simpson_rule = config.simpson_rule,
            grid = ?config.grid,
            "transform grid"
        );
        Ok(Self {
            n,
            max_frequency: config.max_frequency,
            domain_range: config.domain_range,
            simpson_rule: config.simpson_rule,
            grid: config.grid,
            weights,
        })
    }

    /// Number of samples `N`.
    pub fn samples(&self) -> usize {
        self.n
    }

    /// Maximum frequency `U`.
    pub fn max_frequency(&self) -> Real {
        self.max_frequency
    }

    /// Whether Simpson weights are in use.
    pub fn simpson_rule(&self) -> bool {
        self.simpson_rule
    }

    /// Spatial support.
    pub fn domain_range(&self) -> DomainRange {
        self.domain_range
    }

    /// Quadrature weights, one per frequency.
    pub fn weights(&self) -> &[Real] {
        &self.weights
    }

    /// Frequency spacing `Δu`.
    pub fn frequency_spacing(&self) -> Real {
        match self.grid {
            FrequencyGrid::OneSided => self.max_frequency / self.n as Real,
            FrequencyGrid::Symmetric => 2.0 * self.max_frequency / self.n as Real,
        }
    }

    fn first_frequency(&self) -> Real {
        match self.grid {
            FrequencyGrid::OneSided => 0.0,
            FrequencyGrid::Symmetric => -self.max_frequency,
        }
    }

    /// The frequency grid `uⱼ`.
    pub fn frequency_domain(&self) -> Vec<Real> {
        let u0 = self.first_frequency();
        let du = self.frequency_spacing();
        (0..self.n).map(|j| u0 + j as Real * du).collect()
    }

    /// Spatial spacing `2π / (N·Δu)` for which the sum is a plain DFT.
    pub fn nyquist_spacing(&self) -> Real {
        2.0 * PI / (self.n as Real * self.frequency_spacing())
    }

    /// First spatial coordinate for spacing `delta_x`, placed according to
    /// the domain range.
    pub fn space_origin(&self, delta_x: Real) -> Real {
        match (self.domain_range.lower, self.domain_range.upper) {
            (Some(lower), _) if lower.is_finite() => lower,
            (_, Some(upper)) if upper.is_finite() => upper - (self.n - 1) as Real * delta_x,
            _ => -((self.n / 2) as Real) * delta_x,
        }
    }

    /// Invert `psi`, sampled on [`Transform::frequency_domain`].
    ///
    /// `delta_x` defaults to the Nyquist spacing; the grid origin follows the
    /// domain range.
    pub fn invert(&self, psi: &[Complex64], delta_x: Option<Real>) -> Result<TransformResult> {
        let dx = delta_x.unwrap_or_else(|| self.nyquist_spacing());
        self.invert_at(psi, self.space_origin(dx), dx)
    }

    /// Invert `psi` onto the grid `x₀ + k·Δx`, `k = 0..N`.
    pub fn invert_at(&self, psi: &[Complex64], x0: Real, delta_x: Real) -> Result<TransformResult> {
        ensure_config!(
            psi.len() == self.n,
            "expected {} characteristic samples, got {}",
            self.n,
            psi.len()
        );
        ensure_config!(
            delta_x.is_finite() && delta_x > 0.0,
            "delta_x must be positive, got {delta_x}"
        );
        if !x0.is_finite() {
            return Err(Error::Configuration(format!(
                "grid origin must be finite, got {x0}"
            )));
        }

        let du = self.frequency_spacing();
        let u0 = self.first_frequency();
        let mut a: Vec<Complex64> = psi
            .iter()
            .zip(&self.weights)
            .enumerate()
            .map(|(j, (p, w))| p * Complex64::from_polar(*w, -(j as Real) * du * x0))
            .collect();

        let beta = du * delta_x * self.n as Real / (2.0 * PI);
        let fast = (beta - 1.0).abs() < NYQUIST_TOLERANCE;
        debug!(delta_x, x0, beta, fast, "inverting characteristic function");
        let sums = if fast {
            fft::dft(&mut a);
            a
        } else {
            fft::frft(&a, beta)
        };

        let scale = match self.grid {
            FrequencyGrid::OneSided => du / PI,
            FrequencyGrid::Symmetric => du / (2.0 * PI),
        };
        let x: Vec<Real> = (0..self.n).map(|k| x0 + k as Real * delta_x).collect();
        let y: Vec<Real> = sums
            .iter()
            .zip(&x)
            .map(|(s, &xk)| scale * (s * Complex64::from_polar(1.0, -u0 * xk)).re)
            .collect();
        ensure_post!(y.len() == self.n, "inversion produced {} samples", y.len());
        Ok(TransformResult { x, y })
    }

    /// Invert onto explicit, evenly spaced target coordinates.
    ///
    /// `x` must have exactly [`Transform::samples`] entries.
    pub fn invert_onto(&self, psi: &[Complex64], x: &[Real]) -> Result<TransformResult> {
        let (x0, dx) = coordinate_spacing(x)?;
        ensure_config!(
            x.len() == self.n,
            "expected {} coordinates, got {}",
            self.n,
            x.len()
        );
        self.invert_at(psi, x0, dx)
    }
}

/// Origin and spacing inferred from evenly spaced coordinates: their minimum
/// and `(max − min)/(len − 1)`.
pub fn coordinate_spacing(x: &[Real]) -> Result<(Real, Real)> {
    ensure_config!(
        x.len() >= 2,
        "need at least two target coordinates, got {}",
        x.len()
    );
    let (min, max) = x
        .iter()
        .fold((Real::INFINITY, Real::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let dx = (max - min) / (x.len() - 1) as Real;
    ensure_config!(
        dx.is_finite() && dx > 0.0,
        "target coordinates must span a positive finite range"
    );
    Ok((min, dx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::normal_pdf;
    use approx::assert_abs_diff_eq;

    fn gaussian(u: Real) -> Complex64 {
        Complex64::new((-0.5 * u * u).exp(), 0.0)
    }

    fn gaussian_samples(t: &Transform) -> Vec<Complex64> {
        t.frequency_domain().into_iter().map(gaussian).collect()
    }

    fn max_error(result: &TransformResult) -> Real {
        result
            .iter()
            .map(|(x, y)| (y - normal_pdf(x)).abs())
            .fold(0.0, Real::max)
    }

    #[test]
    fn default_grid() {
        let t = Transform::new(TransformConfig::default()).unwrap();
        assert_eq!(t.samples(), DEFAULT_SAMPLES);
        let u = t.frequency_domain();
        assert_eq!(u.len(), DEFAULT_SAMPLES);
        assert_eq!(u[0], 0.0);
        assert_abs_diff_eq!(u[1], 20.0 / 128.0, epsilon = 1e-15);
        assert!(*u.last().unwrap() < 20.0);
    }

    #[test]
    fn symmetric_grid_spans_both_sides() {
        let t = Transform::new(
            TransformConfig::default()
                .with_samples(64)
                .with_max_frequency(10.0)
                .with_grid(FrequencyGrid::Symmetric),
        )
        .unwrap();
        let u = t.frequency_domain();
        assert_eq!(u[0], -10.0);
        assert_abs_diff_eq!(u[32], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t.frequency_spacing(), 20.0 / 64.0, epsilon = 1e-15);
    }

    #[test]
    fn gaussian_round_trip() {
        let t = Transform::new(TransformConfig::default().with_samples(256)).unwrap();
        let result = t.invert(&gaussian_samples(&t), None).unwrap();
        assert_eq!(result.len(), 256);
        assert_abs_diff_eq!(result.delta_x(), 2.0 * PI / 20.0, epsilon = 1e-12);
        assert!(max_error(&result) < 1e-3);
    }

    #[test]
    fn gaussian_round_trip_symmetric() {
        let t = Transform::new(
            TransformConfig::default()
                .with_samples(256)
                .with_grid(FrequencyGrid::Symmetric),
        )
        .unwrap();
        let result = t.invert(&gaussian_samples(&t), None).unwrap();
        assert!(max_error(&result) < 1e-6);
    }

    #[test]
    fn gaussian_round_trip_simpson() {
        let t = Transform::new(
            TransformConfig::default()
                .with_samples(257)
                .with_simpson_rule(true),
        )
        .unwrap();
        let result = t.invert(&gaussian_samples(&t), None).unwrap();
        assert!(max_error(&result) < 1e-3);
    }

    #[test]
    fn explicit_spacing_uses_fractional_fft() {
        let t = Transform::new(TransformConfig::default().with_samples(128)).unwrap();
        let result = t.invert(&gaussian_samples(&t), Some(0.05)).unwrap();
        assert_abs_diff_eq!(result.delta_x(), 0.05, epsilon = 1e-15);
        assert_abs_diff_eq!(result.x[0], -64.0 * 0.05, epsilon = 1e-12);
        assert!(max_error(&result) < 1e-3);
    }

    #[test]
    fn onto_coordinates() {
        let t = Transform::new(TransformConfig::default().with_samples(101)).unwrap();
        let x: Vec<Real> = (0..101).map(|k| -2.0 + 0.04 * k as Real).collect();
        let result = t.invert_onto(&gaussian_samples(&t), &x).unwrap();
        for (xa, xb) in result.x.iter().zip(&x) {
            assert_abs_diff_eq!(xa, xb, epsilon = 1e-12);
        }
        assert!(max_error(&result) < 1e-3);
    }

    #[test]
    fn lower_bound_anchors_grid() {
        let t = Transform::new(
            TransformConfig::default()
                .with_samples(16)
                .with_domain_range(DomainRange::non_negative()),
        )
        .unwrap();
        assert_eq!(t.space_origin(0.5), 0.0);
        let upper = Transform::new(
            TransformConfig::default()
                .with_samples(16)
                .with_domain_range(DomainRange::new(None, Some(3.0))),
        )
        .unwrap();
        assert_abs_diff_eq!(upper.space_origin(0.5), 3.0 - 7.5, epsilon = 1e-15);
    }

    #[test]
    fn simpson_requires_even_intervals() {
        let err = Transform::new(
            TransformConfig::default()
                .with_samples(256)
                .with_simpson_rule(true),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        // default sample count is adjusted for the Simpson rule
        let t = Transform::new(TransformConfig::default().with_simpson_rule(true)).unwrap();
        assert_eq!(t.samples() % 2, 1);
    }

    #[test]
    fn non_positive_max_frequency_rejected() {
        for max_frequency in [0.0, -1.0, Real::NAN] {
            let err = Transform::new(TransformConfig::default().with_max_frequency(max_frequency))
                .unwrap_err();
            assert!(matches!(err, Error::Configuration(_)));
        }
    }

    #[test]
    fn wrong_sample_count_rejected() {
        let t = Transform::new(TransformConfig::default().with_samples(8)).unwrap();
        let psi = vec![Complex64::new(1.0, 0.0); 4];
        assert!(matches!(t.invert(&psi, None), Err(Error::Configuration(_))));
        assert!(matches!(
            t.invert(&vec![Complex64::new(1.0, 0.0); 8], Some(-1.0)),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn single_sample_is_point_evaluation() {
        let t = Transform::new(TransformConfig::default().with_samples(1)).unwrap();
        let result = t.invert(&[Complex64::new(1.0, 0.0)], None).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.x[0], 0.0);
        assert_abs_diff_eq!(result.y[0], 0.5 * 20.0 / PI, epsilon = 1e-12);
    }
}
