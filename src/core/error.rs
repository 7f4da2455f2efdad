//! Error type shared by the polynomial model, the lattice and the grid evaluator.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NewtonFractalError>;

/// Malformed global inputs. These are the only failures that abort a whole
/// computation; per-sample outcomes (divergence, zero slope) are results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NewtonFractalError {
    #[error("invalid input: the root set must contain at least one root")]
    EmptyRootSet,

    #[error("invalid input: the {axis} step must be positive, got {step}")]
    NonPositiveStep { axis: char, step: f64 },

    #[error("invalid input: a polynomial needs at least one coefficient")]
    EmptyCoefficients,

    #[error("invalid input: the {axis} range [{min}, {max}) with step {step} has too many samples")]
    TooManySamples {
        axis: char,
        min: f64,
        max: f64,
        step: f64,
    },

    #[error("invalid input: the {axis} bounds must be finite, got [{min}, {max})")]
    NonFiniteBounds { axis: char, min: f64, max: f64 },

    #[error("invalid input: max_iterations must be at least one, got {0}")]
    InvalidIterationLimit(u32),

    #[error("invalid input: convergence_threshold must be finite and positive, got {0}")]
    InvalidConvergenceThreshold(f64),

    #[error("invalid input: {required} color maps are required (one per root), got {provided}")]
    NotEnoughColorMaps { required: usize, provided: usize },
}
