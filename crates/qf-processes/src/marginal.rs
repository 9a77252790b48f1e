//! Marginal distributions of a process at a fixed horizon.
//!
//! [`Marginal1D`] is the overridable part: a marginal must supply its
//! characteristic function and may override moments, pdf, cdf, the maximum
//! frequency and the parameter jacobians with closed forms. Everything that
//! is derived from the characteristic function alone lives in the blanket
//! [`MarginalTransforms`] extension, which no marginal re-implements.

use num_complex::Complex64;
use qf_core::errors::Result;
use qf_core::{ensure, ensure_config, not_implemented, Real, Time};
use qf_math::transforms::{
    coordinate_spacing, DomainRange, OutputGrid, Transform, TransformConfig, TransformResult,
    DEFAULT_MAX_FREQUENCY,
};
use qf_math::I;
use tracing::{debug, trace};

/// Exponential damping applied to the call-option transform by default.
pub const DEFAULT_DAMPING: Real = 0.5;

/// Step of the symmetric finite differences taken on the characteristic
/// function.
pub const FINITE_DIFFERENCE_STEP: Real = 0.001;

const CONVEXITY_IMAG_TOLERANCE: Real = 1e-10;

/// Distribution of a 1-D process at a fixed time horizon.
pub trait Marginal1D {
    /// Characteristic function `E[exp(iuX)]`, defined for complex `u` where
    /// the expectation is finite.
    fn characteristic(&self, u: Complex64) -> Complex64;

    /// Mean. Defaults to the finite-difference estimate from the
    /// characteristic function.
    fn mean(&self) -> Real {
        mean_from_characteristic(self)
    }

    /// Variance. Defaults to the finite-difference estimate from the
    /// characteristic function.
    fn variance(&self) -> Real {
        variance_from_characteristic(self)
    }

    /// Standard deviation.
    fn std(&self) -> Real {
        self.variance().sqrt()
    }

    /// Probability density (or mass) at `x`.
    ///
    /// Defaults to `cdf(x) − cdf(x − 1)`, which is only meaningful on an
    /// integer lattice; continuous marginals override it.
    fn pdf(&self, x: Real) -> Result<Real> {
        Ok(self.cdf(x)? - self.cdf(x - 1.0)?)
    }

    /// Cumulative distribution `P(X ≤ x)`. No generic fallback.
    fn cdf(&self, _x: Real) -> Result<Real> {
        not_implemented!("analytical cdf is not available for this marginal")
    }

    /// Frequency up to which the characteristic function carries mass.
    fn max_frequency(&self) -> Real {
        DEFAULT_MAX_FREQUENCY
    }

    /// Support of the marginal, used to place transform grids.
    fn domain_range(&self) -> DomainRange {
        DomainRange::unbounded()
    }

    /// Derivative of `cdf(x)` with respect to each process parameter, in
    /// declaration order.
    fn cdf_jacobian(&self, _x: Real) -> Result<Vec<Real>> {
        not_implemented!("cdf jacobian is not available for this marginal")
    }

    /// Derivative of `pdf(x)` with respect to each process parameter.
    ///
    /// Defaults to `cdf_jacobian(x) − cdf_jacobian(x − 1)`.
    fn pdf_jacobian(&self, x: Real) -> Result<Vec<Real>> {
        let upper = self.cdf_jacobian(x)?;
        let lower = self.cdf_jacobian(x - 1.0)?;
        Ok(upper.iter().zip(&lower).map(|(a, b)| a - b).collect())
    }
}

/// `Re[−i (φ(d) − φ(−d)) / 2d]`
pub fn mean_from_characteristic<M: Marginal1D + ?Sized>(marginal: &M) -> Real {
    let d = FINITE_DIFFERENCE_STEP;
    let up = marginal.characteristic(Complex64::new(d, 0.0));
    let down = marginal.characteristic(Complex64::new(-d, 0.0));
    let mean = (-I * (up - down) / (2.0 * d)).re;
    trace!(mean, "mean from characteristic function");
    mean
}

/// `Re[−(φ(d) − 2φ(0) + φ(−d)) / d²] − mean²`
pub fn variance_from_characteristic<M: Marginal1D + ?Sized>(marginal: &M) -> Real {
    let d = FINITE_DIFFERENCE_STEP;
    let up = marginal.characteristic(Complex64::new(d, 0.0));
    let zero = marginal.characteristic(Complex64::new(0.0, 0.0));
    let down = marginal.characteristic(Complex64::new(-d, 0.0));
    let m = mean_from_characteristic(marginal);
    let variance = (-(up - 2.0 * zero + down) / (d * d)).re - m * m;
    trace!(variance, "variance from characteristic function");
    variance
}

/// Characteristic function sampled on a one-sided frequency grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CharacteristicSamples {
    /// Frequencies `u`.
    pub frequency: Vec<Real>,
    /// `Re φ(u)`.
    pub real: Vec<Real>,
    /// `Im φ(u)`.
    pub imag: Vec<Real>,
}

/// Transform-based operations available on every [`Marginal1D`].
pub trait MarginalTransforms: Marginal1D {
    /// Finite-difference mean, regardless of any closed form.
    fn mean_from_characteristic(&self) -> Real {
        mean_from_characteristic(self)
    }

    /// Finite-difference variance, regardless of any closed form.
    fn variance_from_characteristic(&self) -> Real {
        variance_from_characteristic(self)
    }

    /// `max_frequency` if given, else the marginal's own.
    fn get_max_frequency(&self, max_frequency: Option<Real>) -> Real {
        max_frequency.unwrap_or_else(|| self.max_frequency())
    }

    /// Transform configuration derived from this marginal: its maximum
    /// frequency and domain range, rectangular quadrature.
    fn transform_config(&self) -> TransformConfig {
        TransformConfig::default()
            .with_max_frequency(self.max_frequency())
            .with_domain_range(self.domain_range())
    }

    /// `φ` sampled at `n` frequencies evenly spaced on `[0, max_frequency)`.
    fn characteristic_samples(
        &self,
        n: usize,
        max_frequency: Option<Real>,
    ) -> Result<CharacteristicSamples> {
        let config = self
            .transform_config()
            .with_samples(n)
            .with_max_frequency(self.get_max_frequency(max_frequency));
        let frequency = Transform::new(config)?.frequency_domain();
        let (real, imag) = frequency
            .iter()
            .map(|&u| {
                let c = self.characteristic(Complex64::new(u, 0.0));
                (c.re, c.im)
            })
            .unzip();
        Ok(CharacteristicSamples {
            frequency,
            real,
            imag,
        })
    }

    /// Characteristic function with the convexity term removed,
    /// `φ(u) · exp(−iu · ln φ(−i))`, so that `E[e^X] = 1`.
    ///
    /// Fails with a precondition error unless `φ(−i)` is finite and
    /// real-positive.
    fn characteristic_corrected(&self, u: Complex64) -> Result<Complex64> {
        let convexity = convexity(self)?;
        Ok(self.characteristic(u) * (-I * u * convexity).exp())
    }

    /// Fourier transform of the call price in log-strike,
    /// `φ_c(u − i) / ((iu)² + iu)`.
    fn call_option_transform(&self, u: Complex64) -> Result<Complex64> {
        let convexity = convexity(self)?;
        Ok(corrected_call_transform(self, convexity, u))
    }

    /// Density recovered from the characteristic function, using this
    /// marginal's transform configuration.
    fn pdf_from_characteristic(
        &self,
        grid: OutputGrid<'_>,
        delta_x: Option<Real>,
    ) -> Result<TransformResult> {
        self.pdf_from_characteristic_with(self.transform_config(), grid, delta_x)
    }

    /// Density recovered from the characteristic function under an explicit
    /// configuration.
    ///
    /// `grid` decides the sample count: [`OutputGrid::Coordinates`] also
    /// fixes the spatial grid, and combining it with `delta_x` is a
    /// configuration error.
    fn pdf_from_characteristic_with(
        &self,
        config: TransformConfig,
        grid: OutputGrid<'_>,
        delta_x: Option<Real>,
    ) -> Result<TransformResult> {
        let target = SpatialTarget::resolve(config, grid, delta_x)?;
        let psi: Vec<Complex64> = target
            .transform
            .frequency_domain()
            .into_iter()
            .map(|u| self.characteristic(Complex64::new(u, 0.0)))
            .collect();
        target.invert(&psi)
    }

    /// Call prices `E[(e^X − e^x)⁺]` as a function of log-strike `x` for the
    /// convexity-corrected marginal, using this marginal's transform
    /// configuration. `alpha` defaults to [`DEFAULT_DAMPING`].
    fn call_option(
        &self,
        grid: OutputGrid<'_>,
        delta_x: Option<Real>,
        alpha: Option<Real>,
    ) -> Result<TransformResult> {
        self.call_option_with(self.transform_config(), grid, delta_x, alpha)
    }

    /// [`MarginalTransforms::call_option`] under an explicit configuration.
    fn call_option_with(
        &self,
        config: TransformConfig,
        grid: OutputGrid<'_>,
        delta_x: Option<Real>,
        alpha: Option<Real>,
    ) -> Result<TransformResult> {
        let alpha = alpha.unwrap_or(DEFAULT_DAMPING);
        ensure_config!(
            alpha.is_finite() && alpha > 0.0,
            "damping factor must be positive, got {alpha}"
        );
        let target = SpatialTarget::resolve(config, grid, delta_x)?;
        let convexity = convexity(self)?;
        debug!(alpha, convexity = convexity.re, "call option transform");
        let psi: Vec<Complex64> = target
            .transform
            .frequency_domain()
            .into_iter()
            .map(|u| corrected_call_transform(self, convexity, Complex64::new(u, -alpha)))
            .collect();
        Ok(target.invert(&psi)?.map_y(|x, y| y * (-alpha * x).exp()))
    }
}

impl<M: Marginal1D + ?Sized> MarginalTransforms for M {}

/// `ln φ(−i)`, the log of `E[e^X]`.
fn convexity<M: Marginal1D + ?Sized>(marginal: &M) -> Result<Complex64> {
    let phi = marginal.characteristic(-I);
    ensure!(
        phi.re.is_finite()
            && phi.im.is_finite()
            && phi.re > 0.0
            && phi.im.abs() <= CONVEXITY_IMAG_TOLERANCE * phi.re.max(1.0),
        "convexity correction needs a finite, real-positive φ(-i), got {phi}"
    );
    Ok(Complex64::new(phi.re.ln(), 0.0))
}

fn corrected_call_transform<M: Marginal1D + ?Sized>(
    marginal: &M,
    convexity: Complex64,
    u: Complex64,
) -> Complex64 {
    let shifted = u - I;
    let phi = marginal.characteristic(shifted) * (-I * shifted * convexity).exp();
    let iu = I * u;
    phi / (iu * iu + iu)
}

/// A transform together with the spatial grid it inverts onto.
struct SpatialTarget {
    transform: Transform,
    placement: Placement,
}

enum Placement {
    Spacing(Option<Real>),
    Anchored { x0: Real, delta_x: Real },
}

impl SpatialTarget {
    fn resolve(config: TransformConfig, grid: OutputGrid<'_>, delta_x: Option<Real>) -> Result<Self> {
        let (config, placement) = match grid {
            OutputGrid::Default => (config, Placement::Spacing(delta_x)),
            OutputGrid::Samples(n) => (config.with_samples(n), Placement::Spacing(delta_x)),
            OutputGrid::Coordinates(x) => {
                ensure_config!(
                    delta_x.is_none(),
                    "delta_x cannot be combined with explicit target coordinates"
                );
                let (x0, delta_x) = coordinate_spacing(x)?;
                (
                    config.with_samples(x.len()),
                    Placement::Anchored { x0, delta_x },
                )
            }
        };
        Ok(Self {
            transform: Transform::new(config)?,
            placement,
        })
    }

    fn invert(&self, psi: &[Complex64]) -> Result<TransformResult> {
        match self.placement {
            Placement::Spacing(delta_x) => self.transform.invert(psi, delta_x),
            Placement::Anchored { x0, delta_x } => self.transform.invert_at(psi, x0, delta_x),
        }
    }
}

/// A process frozen at horizon `t`.
///
/// Each process implements [`Marginal1D`] for its own `ProcessMarginal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessMarginal<P> {
    process: P,
    t: Time,
}

impl<P> ProcessMarginal<P> {
    /// Freeze `process` at `t ≥ 0`.
    pub fn new(process: P, t: Time) -> Result<Self> {
        ensure!(
            t.is_finite() && t >= 0.0,
            "time horizon must be finite and non-negative, got {t}"
        );
        Ok(Self { process, t })
    }

    /// The underlying process.
    pub fn process(&self) -> &P {
        &self.process
    }

    /// The time horizon.
    pub fn t(&self) -> Time {
        self.t
    }
}
