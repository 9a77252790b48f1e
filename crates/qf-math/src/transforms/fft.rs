//! FFT kernels for the transform engine.
//!
//! [`dft`] evaluates `Σⱼ aⱼ e^{−2πi·jk/N}` with a plain forward FFT (rustfft
//! handles every length, not only powers of two). [`frft`] evaluates the
//! fractional transform `Σⱼ aⱼ e^{−2πi·β·jk/N}` through a chirp-z
//! convolution of power-of-two length, which lets the spatial spacing be
//! chosen independently of the frequency spacing.

use num_complex::Complex64;
use rustfft::FftPlanner;
use std::f64::consts::PI;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Forward discrete Fourier transform of `values`, in place.
pub(crate) fn dft(values: &mut [Complex64]) {
    if values.is_empty() {
        return;
    }
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(values.len()).process(values);
}

fn convolve(a: &mut [Complex64], b: &mut [Complex64]) {
    let n = a.len();
    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(n);
    forward.process(a);
    forward.process(b);
    for (x, y) in a.iter_mut().zip(b.iter()) {
        *x *= y;
    }
    planner.plan_fft_inverse(n).process(a);
    let scale = 1.0 / n as f64;
    for x in a.iter_mut() {
        *x *= scale;
    }
}

/// Fractional FFT: `y[m] = Σₙ x[n] · exp(−2πi · β · n · m / N)` for
/// `m = 0..N-1`.
pub(crate) fn frft(input: &[Complex64], beta: f64) -> Vec<Complex64> {
    let n = input.len();
    if n == 0 {
        return Vec::new();
    }

    let conv_len = (2 * n).next_power_of_two();
    let mut a = vec![ZERO; conv_len];
    let mut b = vec![ZERO; conv_len];

    for (idx, x) in input.iter().enumerate() {
        let idx_f = idx as f64;
        let angle = PI * beta * idx_f * idx_f / n as f64;
        let chirp = Complex64::from_polar(1.0, angle);
        a[idx] = x * chirp.conj();
        b[idx] = chirp;
        if idx != 0 {
            b[conv_len - idx] = chirp;
        }
    }

    convolve(&mut a, &mut b);

    a.iter()
        .take(n)
        .enumerate()
        .map(|(m, a_m)| {
            let m_f = m as f64;
            a_m * Complex64::from_polar(1.0, -PI * beta * m_f * m_f / n as f64)
        })
        .collect()
}
