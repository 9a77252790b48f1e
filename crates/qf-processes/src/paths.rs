//! Simulated trajectories on a uniform time grid.
//!
//! The buffer is an `nalgebra` matrix with one row per time point
//! (`steps + 1` rows, the first at `t = 0`) and one column per sample path.

use nalgebra::DMatrix;
use qf_core::errors::Result;
use qf_core::{ensure, Real, Time};
use qf_math::integrals::cumulative_trapezoid;
use rand::Rng;
use rand_distr::StandardNormal;

/// Simulated paths over `[0, t]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    t: Time,
    data: DMatrix<Real>,
}

impl Paths {
    /// Wrap a `(steps + 1) × samples` buffer.
    ///
    /// The horizon must be positive and the buffer must hold at least two
    /// time points so that `dt` is well defined.
    pub fn new(t: Time, data: DMatrix<Real>) -> Result<Self> {
        ensure!(
            t.is_finite() && t > 0.0,
            "path horizon must be positive, got {t}"
        );
        ensure!(
            data.nrows() >= 2,
            "paths need at least two time points, got {}",
            data.nrows()
        );
        Ok(Self { t, data })
    }

    /// Build from one `Vec` per sample path, all of the same length.
    pub fn from_columns(t: Time, columns: &[Vec<Real>]) -> Result<Self> {
        let rows = columns.first().map_or(0, Vec::len);
        ensure!(
            columns.iter().all(|c| c.len() == rows),
            "sample paths must share the same length"
        );
        Self::new(t, DMatrix::from_fn(rows, columns.len(), |r, c| columns[c][r]))
    }

    /// Standard-normal draws shaped like `samples` paths of `steps` steps.
    pub fn normal_draws<R: Rng + ?Sized>(
        samples: usize,
        t: Time,
        steps: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let data = DMatrix::from_fn(steps + 1, samples, |_, _| {
            rng.sample::<Real, _>(StandardNormal)
        });
        Self::new(t, data)
    }

    /// Time horizon.
    pub fn t(&self) -> Time {
        self.t
    }

    /// Number of time steps.
    pub fn steps(&self) -> usize {
        self.data.nrows() - 1
    }

    /// Number of sample paths.
    pub fn samples(&self) -> usize {
        self.data.ncols()
    }

    /// Time step `t / steps`.
    pub fn dt(&self) -> Time {
        self.t / self.steps() as Real
    }

    /// Time grid `0, dt, …, t`.
    pub fn time(&self) -> Vec<Time> {
        let dt = self.dt();
        (0..=self.steps()).map(|i| i as Real * dt).collect()
    }

    /// Underlying buffer.
    pub fn data(&self) -> &DMatrix<Real> {
        &self.data
    }

    /// Values of sample path `i`, if it exists.
    pub fn path(&self, i: usize) -> Option<Vec<Real>> {
        (i < self.samples()).then(|| self.data.column(i).iter().copied().collect())
    }

    /// Time grid repeated once per sample path, for plotting.
    pub fn xs(&self) -> Vec<Vec<Time>> {
        let time = self.time();
        vec![time; self.samples()]
    }

    /// Values of every sample path, for plotting.
    pub fn ys(&self) -> Vec<Vec<Real>> {
        self.data
            .column_iter()
            .map(|c| c.iter().copied().collect())
            .collect()
    }

    /// Cross-sectional mean at each time point.
    pub fn mean(&self) -> Vec<Real> {
        let n = self.samples() as Real;
        self.data.row_iter().map(|row| row.sum() / n).collect()
    }

    /// Cross-sectional (population) variance at each time point.
    pub fn var(&self) -> Vec<Real> {
        let n = self.samples() as Real;
        self.data
            .row_iter()
            .map(|row| {
                let m = row.sum() / n;
                row.iter().map(|v| (v - m) * (v - m)).sum::<Real>() / n
            })
            .collect()
    }

    /// Running time integral of each path, `∫₀ˢ X(r) dr`, by the trapezoid
    /// rule. The first row of the result is zero.
    pub fn integrate(&self) -> Self {
        let dt = self.dt();
        let mut data = DMatrix::zeros(self.data.nrows(), self.data.ncols());
        for (c, column) in self.data.column_iter().enumerate() {
            let values: Vec<Real> = column.iter().copied().collect();
            for (r, v) in cumulative_trapezoid(&values, dt).into_iter().enumerate() {
                data[(r, c)] = v;
            }
        }
        Self { t: self.t, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn time_grid() {
        let p = Paths::new(1.0, DMatrix::zeros(101, 3)).unwrap();
        assert_eq!(p.steps(), 100);
        assert_eq!(p.samples(), 3);
        assert_abs_diff_eq!(p.dt(), 0.01, epsilon = 1e-15);
        let time = p.time();
        assert_eq!(time.len(), 101);
        assert_eq!(time[0], 0.0);
        assert_abs_diff_eq!(time[100], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_degenerate_buffers() {
        assert!(Paths::new(0.0, DMatrix::zeros(3, 1)).is_err());
        assert!(Paths::new(1.0, DMatrix::zeros(1, 1)).is_err());
        assert!(Paths::from_columns(1.0, &[vec![0.0, 1.0], vec![0.0]]).is_err());
    }

    #[test]
    fn integrate_linear_path() {
        // X(s) = s on [0, 2] integrates to s²/2 exactly under the trapezoid rule
        let column: Vec<Real> = (0..=20).map(|i| i as Real * 0.1).collect();
        let p = Paths::from_columns(2.0, &[column]).unwrap();
        let integral = p.integrate();
        assert_eq!(integral.t(), 2.0);
        let values = integral.path(0).unwrap();
        assert_eq!(values[0], 0.0);
        for (i, v) in values.iter().enumerate() {
            let s = i as Real * 0.1;
            assert_abs_diff_eq!(*v, 0.5 * s * s, epsilon = 1e-12);
        }
    }

    #[test]
    fn cross_sectional_moments() {
        let p = Paths::from_columns(1.0, &[vec![0.0, 1.0], vec![0.0, 3.0]]).unwrap();
        assert_eq!(p.mean(), vec![0.0, 2.0]);
        assert_eq!(p.var(), vec![0.0, 1.0]);
        assert_eq!(p.ys(), vec![vec![0.0, 1.0], vec![0.0, 3.0]]);
        assert_eq!(p.xs()[1], vec![0.0, 1.0]);
        assert!(p.path(2).is_none());
    }

    #[test]
    fn normal_draws_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws = Paths::normal_draws(500, 1.0, 10, &mut rng).unwrap();
        assert_eq!(draws.samples(), 500);
        assert_eq!(draws.steps(), 10);
        let mean = draws.mean();
        assert!(mean.iter().all(|m| m.abs() < 0.2));
    }
}
