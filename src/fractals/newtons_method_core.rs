// Newton's method for a single starting point: iterate to a root of a complex
// function, then classify the result against a known set of roots.

#[cfg(test)]
use nalgebra::Matrix2;
use num::{complex::Complex64, Zero};
use serde::{Deserialize, Serialize};

use crate::core::{
    error::{NewtonFractalError, Result},
    polynomial::PolynomialModel,
};

/// A complex-valued function with its derivative (slope).
pub trait ComplexFunctionWithSlope {
    /// f(z)
    fn value(&self, z: Complex64) -> Complex64;

    /// f'(z)
    fn slope(&self, z: Complex64) -> Complex64;
}

impl ComplexFunctionWithSlope for PolynomialModel {
    #[inline]
    fn value(&self, z: Complex64) -> Complex64 {
        self.evaluate(z)
    }

    #[inline]
    fn slope(&self, z: Complex64) -> Complex64 {
        self.evaluate_derivative(z)
    }
}

fn default_max_iterations() -> u32 {
    250
}

fn default_convergence_threshold() -> f64 {
    1e-5
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceParams {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Largest |f(z)| accepted as converged.
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: f64,
}

impl Default for ConvergenceParams {
    fn default() -> Self {
        ConvergenceParams {
            max_iterations: default_max_iterations(),
            convergence_threshold: default_convergence_threshold(),
        }
    }
}

impl ConvergenceParams {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(NewtonFractalError::InvalidIterationLimit(
                self.max_iterations,
            ));
        }
        if !(self.convergence_threshold.is_finite() && self.convergence_threshold > 0.0) {
            return Err(NewtonFractalError::InvalidConvergenceThreshold(
                self.convergence_threshold,
            ));
        }
        Ok(())
    }
}

/// Which root a starting point was attracted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootClassification {
    /// Index into the root set.
    Root(usize),
    /// No convergence within the iteration limit, or the iteration hit a
    /// zero slope or a non-finite guess.
    Diverged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewtonIterationResult {
    pub classification: RootClassification,
    /// On [1, max_iterations]. Diverged points always report `max_iterations`.
    pub iteration_count: u32,
}

impl NewtonIterationResult {
    pub fn root_index(&self) -> Option<usize> {
        match self.classification {
            RootClassification::Root(index) => Some(index),
            RootClassification::Diverged => None,
        }
    }
}

/// Perform one Newton–Raphson step:
/// y = z - f(z) / f'(z)
///
/// Returns `None` rather than a NaN or infinite guess when the slope is zero
/// or the update overflows.
#[inline]
pub fn newton_raphson_step(z: Complex64, value: Complex64, slope: Complex64) -> Option<Complex64> {
    if slope.is_zero() {
        return None;
    }
    let next = z - value / slope;
    if next.is_finite() {
        Some(next)
    } else {
        None
    }
}

/**
 * Runs Newton's method from `start`. The convergence test is applied before
 * every step, so a start point that already satisfies it converges with an
 * iteration count of one.
 *
 * Returns the converged guess and the iteration count, or `None` when the
 * iteration limit is exhausted or a step fails (see `newton_raphson_step`).
 */
pub fn newton_iterate<F>(
    function: &F,
    start: Complex64,
    params: &ConvergenceParams,
) -> Option<(Complex64, u32)>
where
    F: ComplexFunctionWithSlope + ?Sized,
{
    let mut guess = start;
    for iteration in 1..=params.max_iterations {
        let value = function.value(guess);
        if value.norm() < params.convergence_threshold {
            return Some((guess, iteration));
        }
        guess = newton_raphson_step(guess, value, function.slope(guess))?;
    }
    None
}

/// Index of the root closest to `z`. Ties go to the lowest index. `None` only
/// for an empty root set.
pub fn nearest_root_index(roots: &[Complex64], z: Complex64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, root) in roots.iter().enumerate() {
        let distance = (z - root).norm();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

/**
 * Classifies a single starting point by the root that Newton's method
 * converges to. Expects validated `params` and a non-empty root set; an empty
 * root set classifies every point as diverged.
 */
pub fn classify_start_point<F>(
    function: &F,
    roots: &[Complex64],
    start: Complex64,
    params: &ConvergenceParams,
) -> NewtonIterationResult
where
    F: ComplexFunctionWithSlope + ?Sized,
{
    debug_assert!(params.validate().is_ok());
    let diverged = NewtonIterationResult {
        classification: RootClassification::Diverged,
        iteration_count: params.max_iterations,
    };

    match newton_iterate(function, start, params) {
        Some((guess, iteration_count)) => match nearest_root_index(roots, guess) {
            Some(index) => NewtonIterationResult {
                classification: RootClassification::Root(index),
                iteration_count,
            },
            None => diverged,
        },
        None => diverged,
    }
}

/// Real (left-regular) representation of a complex scalar as a 2×2 real matrix.
///
/// Maps s = a + i b to the real-linear map x ↦ s·x on C ≅ R^2:
///     [ a  -b ]
///     [ b   a ]
#[inline]
#[cfg(test)]
fn left_multiply_matrix(s: Complex64) -> Matrix2<f64> {
    Matrix2::new(s.re, -s.im, s.im, s.re)
}

#[cfg(test)]
pub fn assert_consistent_value_and_slope<F: ComplexFunctionWithSlope>(
    function: &F,
    z0: Complex64,
    abs_tol: f64,
    rel_tol: f64,
) {
    let scale = (z0.norm() + 1.0).sqrt();
    let h = 1e-7 / scale;

    let central_difference = |dz: Complex64| {
        (function.value(z0 + dz) - function.value(z0 - dz)) * (0.5 / h)
    };
    let dfdx = central_difference(Complex64::new(h, 0.0));
    let dfdy = central_difference(Complex64::new(0.0, h));

    // J_num = [[∂u/∂x, ∂u/∂y],
    //          [∂v/∂x, ∂v/∂y]]
    let finite_difference_slope = Matrix2::new(dfdx.re, dfdy.re, dfdx.im, dfdy.im);
    let analytic_slope = left_multiply_matrix(function.slope(z0));

    // Frobenius norm
    let error_norm = (finite_difference_slope - analytic_slope).norm();
    let reference_scale = analytic_slope.norm().max(1.0);

    assert!(
        error_norm <= abs_tol + rel_tol * reference_scale,
        "Derivative check failed at z0={z0:?}\n\
         numerical J = {finite_difference_slope}\n\
         analytic  J = {analytic_slope}\n\
         err_frob   = {error_norm:e},  bound = {}",
        abs_tol + rel_tol * reference_scale
    );
}
