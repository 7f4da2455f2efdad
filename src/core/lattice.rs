use num::complex::Complex64;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::core::error::{NewtonFractalError, Result};

/// Upper bound on the number of samples along one axis.
pub const MAX_SAMPLES_PER_AXIS: f64 = u32::MAX as f64;

/**
 * One axis of the sample lattice: the half-open range `[min, max)` visited
 * in increments of `step`, as in `min, min + step, min + 2 step, ...`.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LatticeAxis {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl LatticeAxis {
    pub fn new(min: f64, max: f64, step: f64) -> LatticeAxis {
        LatticeAxis { min, max, step }
    }

    pub fn validate(&self, axis: char) -> Result<()> {
        // Written as a negation so that a NaN step is rejected too.
        if !(self.step > 0.0) {
            return Err(NewtonFractalError::NonPositiveStep {
                axis,
                step: self.step,
            });
        }
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(NewtonFractalError::NonFiniteBounds {
                axis,
                min: self.min,
                max: self.max,
            });
        }
        if self.max > self.min {
            // Also catches `max - min` overflowing to infinity.
            let samples = ((self.max - self.min) / self.step).ceil();
            if !(samples.is_finite() && samples <= MAX_SAMPLES_PER_AXIS) {
                return Err(NewtonFractalError::TooManySamples {
                    axis,
                    min: self.min,
                    max: self.max,
                    step: self.step,
                });
            }
        }
        Ok(())
    }

    /// Number of samples: `ceil((max - min) / step)`, or zero for an empty range.
    pub fn count(&self) -> usize {
        if self.max <= self.min {
            return 0;
        }
        ((self.max - self.min) / self.step).ceil() as usize
    }

    // Map from sample index to coordinate.
    #[inline]
    pub fn map(&self, index: usize) -> f64 {
        self.min + self.step * (index as f64)
    }
}

/**
 * Regular sampling of the complex plane. Cell `(i, j)` holds the sample
 * `x.map(i) + y.map(j) i`, so the outer (row) index walks the real axis and
 * the inner (column) index walks the imaginary axis.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SampleLattice {
    pub x: LatticeAxis,
    pub y: LatticeAxis,
}

impl SampleLattice {
    pub fn new(x: LatticeAxis, y: LatticeAxis) -> Result<SampleLattice> {
        let lattice = SampleLattice { x, y };
        lattice.validate()?;
        Ok(lattice)
    }

    pub fn validate(&self) -> Result<()> {
        self.x.validate('x')?;
        self.y.validate('y')
    }

    /// `(rows, columns)` = `(x.count(), y.count())`
    pub fn shape(&self) -> (usize, usize) {
        (self.x.count(), self.y.count())
    }

    #[inline]
    pub fn sample(&self, i: usize, j: usize) -> Complex64 {
        Complex64::new(self.x.map(i), self.y.map(j))
    }
}

pub fn create_buffer<T: Clone>(value: T, shape: (usize, usize)) -> Vec<Vec<T>> {
    vec![vec![value; shape.1]; shape.0]
}

/**
 * Evaluates `query` at every sample of the lattice, returning a buffer indexed
 * as `buffer[i][j]`. Rows are computed in parallel; every cell is written
 * exactly once and the result does not depend on scheduling.
 */
pub fn evaluate_lattice<T, F>(lattice: &SampleLattice, query: F) -> Vec<Vec<T>>
where
    T: Send,
    F: Fn(Complex64) -> T + Sync,
{
    let (rows, cols) = lattice.shape();
    (0..rows)
        .into_par_iter()
        .map(|i| (0..cols).map(|j| query(lattice.sample(i, j))).collect::<Vec<T>>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_count_is_ceiling_of_span_over_step() {
        assert_eq!(LatticeAxis::new(-2.0, 2.0, 1.0).count(), 4);
        assert_eq!(LatticeAxis::new(0.0, 1.0, 1.0).count(), 1);
        assert_eq!(LatticeAxis::new(0.0, 1.0, 0.3).count(), 4);
        assert_eq!(LatticeAxis::new(0.0, 0.0, 0.5).count(), 0);
        assert_eq!(LatticeAxis::new(1.0, -1.0, 0.5).count(), 0);
    }

    #[test]
    fn test_axis_map_is_half_open() {
        let axis = LatticeAxis::new(-2.0, 2.0, 1.0);
        let values: Vec<f64> = (0..axis.count()).map(|i| axis.map(i)).collect();
        assert_eq!(values, vec![-2.0, -1.0, 0.0, 1.0]);

        let axis = LatticeAxis::new(0.0, 1.0, 0.3);
        assert_relative_eq!(axis.map(3), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_lattice_rejects_bad_steps() {
        let good = LatticeAxis::new(0.0, 1.0, 0.5);
        assert_eq!(
            SampleLattice::new(LatticeAxis::new(0.0, 1.0, 0.0), good),
            Err(NewtonFractalError::NonPositiveStep { axis: 'x', step: 0.0 })
        );
        assert_eq!(
            SampleLattice::new(good, LatticeAxis::new(0.0, 1.0, -0.1)),
            Err(NewtonFractalError::NonPositiveStep {
                axis: 'y',
                step: -0.1
            })
        );
        assert!(SampleLattice::new(LatticeAxis::new(0.0, 1.0, f64::NAN), good).is_err());
        assert!(SampleLattice::new(good, LatticeAxis::new(f64::NEG_INFINITY, 1.0, 0.5)).is_err());
        assert!(SampleLattice::new(good, good).is_ok());
    }

    #[test]
    fn test_lattice_rejects_unbounded_sample_counts() {
        let good = LatticeAxis::new(0.0, 1.0, 1.0);
        assert_eq!(
            SampleLattice::new(LatticeAxis::new(-1e308, 1e308, 1.0), good),
            Err(NewtonFractalError::TooManySamples {
                axis: 'x',
                min: -1e308,
                max: 1e308,
                step: 1.0
            })
        );
        assert!(matches!(
            SampleLattice::new(good, LatticeAxis::new(0.0, 1.0, 1e-300)),
            Err(NewtonFractalError::TooManySamples { axis: 'y', .. })
        ));
        assert!(SampleLattice::new(LatticeAxis::new(0.0, 1e6, 1e-3), good).is_ok());
    }

    #[test]
    fn test_lattice_samples_follow_row_equals_x_convention() {
        let lattice = SampleLattice::new(
            LatticeAxis::new(-2.0, 2.0, 1.0),
            LatticeAxis::new(0.0, 1.5, 0.5),
        )
        .unwrap();
        assert_eq!(lattice.shape(), (4, 3));
        assert_eq!(lattice.sample(0, 0), Complex64::new(-2.0, 0.0));
        assert_eq!(lattice.sample(3, 2), Complex64::new(1.0, 1.0));
    }

    #[test]
    fn test_evaluate_lattice_fills_every_cell_once() {
        let lattice = SampleLattice::new(
            LatticeAxis::new(0.0, 3.0, 1.0),
            LatticeAxis::new(0.0, 2.0, 1.0),
        )
        .unwrap();
        let buffer = evaluate_lattice(&lattice, |z| z);
        assert_eq!(buffer.len(), 3);
        for (i, row) in buffer.iter().enumerate() {
            assert_eq!(row.len(), 2);
            for (j, value) in row.iter().enumerate() {
                assert_eq!(*value, lattice.sample(i, j));
            }
        }
    }

    #[test]
    fn test_create_buffer_shape() {
        let buffer = create_buffer(None::<f32>, (2, 5));
        assert_eq!(buffer.len(), 2);
        assert!(buffer.iter().all(|row| row.len() == 5 && row.iter().all(Option::is_none)));
    }
}
