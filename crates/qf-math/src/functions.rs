//! Small special functions and constants shared by the distributions and
//! the characteristic functions of the processes.

use num_complex::Complex64;
use qf_core::Real;

/// The imaginary unit `i`.
pub const I: Complex64 = Complex64::new(0.0, 1.0);

/// `n!` as a floating-point number.
///
/// Exact up to `170!`, `+∞` beyond (the largest factorial representable in
/// an `f64`).
pub fn factorial(n: u64) -> Real {
    statrs::function::factorial::factorial(n)
}

/// `ln(n!)`, finite for every `n`.
pub fn ln_factorial(n: u64) -> Real {
    statrs::function::factorial::ln_factorial(n)
}

/// Elementwise [`factorial`] over a slice of counts.
pub fn factorials(n: &[u64]) -> Vec<Real> {
    n.iter().map(|&k| factorial(k)).collect()
}
