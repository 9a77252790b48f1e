//! Discrete quadrature rules.
//!
//! Simpson's rule on a function, the Simpson weight vector shared with the
//! transform engine, and the cumulative trapezoid used to integrate sample
//! paths along the time axis.

use qf_core::errors::Result;
use qf_core::{ensure_config, Real};

/// Running trapezoidal integral of uniformly spaced samples, starting at 0.
///
/// The output has the same length as `f`; element `i` approximates
/// `∫₀^{i·dx} f`.
pub fn cumulative_trapezoid(f: &[Real], dx: Real) -> Vec<Real> {
    let mut out = Vec::with_capacity(f.len());
    if f.is_empty() {
        return out;
    }
    let mut acc = 0.0;
    out.push(acc);
    for w in f.windows(2) {
        acc += 0.5 * dx * (w[0] + w[1]);
        out.push(acc);
    }
    out
}

/// Simpson 1/3 weights `(1, 4, 2, 4, …, 4, 1) / 3` for `n` uniformly spaced
/// samples.
///
/// `n` must be odd (an even number of subintervals). A single sample
/// degenerates to a point evaluation with weight 1.
pub fn simpson_weights(n: usize) -> Result<Vec<Real>> {
    ensure_config!(
        n % 2 == 1,
        "Simpson rule needs an even number of subintervals, got {n} samples ({} intervals)",
        n.saturating_sub(1)
    );
    if n == 1 {
        return Ok(vec![1.0]);
    }
    Ok((0..n)
        .map(|i| {
            if i == 0 || i == n - 1 {
                1.0 / 3.0
            } else if i % 2 == 1 {
                4.0 / 3.0
            } else {
                2.0 / 3.0
            }
        })
        .collect())
}

/// Composite Simpson's rule on a function, using a uniform grid of `n`
/// evaluation points (`n` odd, at least 3).
pub fn discrete_simpson_fn<F: Fn(Real) -> Real>(f: F, a: Real, b: Real, n: usize) -> Result<Real> {
    ensure_config!(n >= 3, "need at least 3 evaluation points, got {n}");
    let weights = simpson_weights(n)?;
    let h = (b - a) / (n - 1) as Real;
    Ok(h * weights
        .iter()
        .enumerate()
        .map(|(i, w)| w * f(a + i as Real * h))
        .sum::<Real>())
}
