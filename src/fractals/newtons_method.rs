// Newton's method basin fractal: classify every sample of a lattice by the
// root it converges to, and collect per-root iteration-count matrices for an
// external renderer.

use std::time::Instant;

use num::complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::core::{
    error::{NewtonFractalError, Result},
    lattice::{create_buffer, evaluate_lattice, SampleLattice},
    polynomial::PolynomialModel,
};

use super::newtons_method_core::{
    classify_start_point, ComplexFunctionWithSlope, ConvergenceParams, NewtonIterationResult,
    RootClassification,
};

/// Maps an iteration count to the value stored in the output matrices.
/// This only affects the contrast of the rendered image.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterationTransform {
    /// ln(count)
    #[default]
    Log,
    /// ln(count + 1)
    LogPlusOne,
    /// count
    Identity,
}

impl IterationTransform {
    pub fn apply(&self, iteration_count: u32) -> f32 {
        let count = iteration_count as f64;
        let value = match self {
            IterationTransform::Log => count.ln(),
            IterationTransform::LogPlusOne => (count + 1.0).ln(),
            IterationTransform::Identity => count,
        };
        value as f32
    }
}

fn default_color_maps() -> Vec<String> {
    ["Blues_r", "Oranges_r", "Greens_r", "Purples_r", "Greys_r"]
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Everything needed to evaluate one basin fractal, as read from a JSON file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewtonsMethodParams {
    pub roots: Vec<Complex64>,
    pub lattice: SampleLattice,
    #[serde(default)]
    pub convergence: ConvergenceParams,
    #[serde(default)]
    pub iteration_transform: IterationTransform,
    /// Colormap identifiers handed to the renderer, one per root, in root order.
    #[serde(default = "default_color_maps")]
    pub color_maps: Vec<String>,
}

impl NewtonsMethodParams {
    pub fn fractal(&self) -> Result<NewtonsMethodFractal> {
        NewtonsMethodFractal::new(self.roots.clone(), self.convergence)
    }

    pub fn evaluate(&self) -> Result<BasinIterationGrids> {
        self.fractal()?
            .plot(&self.lattice, self.iteration_transform)
    }
}

/**
 * A validated root set (through its polynomial model) together with the
 * convergence settings used for every sample.
 */
#[derive(Debug, Clone)]
pub struct NewtonsMethodFractal {
    model: PolynomialModel,
    convergence: ConvergenceParams,
}

impl NewtonsMethodFractal {
    pub fn new(roots: Vec<Complex64>, convergence: ConvergenceParams) -> Result<Self> {
        convergence.validate()?;
        Ok(NewtonsMethodFractal {
            model: PolynomialModel::new(roots)?,
            convergence,
        })
    }

    pub fn model(&self) -> &PolynomialModel {
        &self.model
    }

    pub fn convergence(&self) -> &ConvergenceParams {
        &self.convergence
    }

    pub fn classify(&self, start: Complex64) -> NewtonIterationResult {
        classify_start_point(&self.model, self.model.roots(), start, &self.convergence)
    }

    pub fn plot(
        &self,
        lattice: &SampleLattice,
        transform: IterationTransform,
    ) -> Result<BasinIterationGrids> {
        plot_basins(
            &self.model,
            self.model.roots(),
            lattice,
            &self.convergence,
            transform,
        )
    }
}

/// Outer index is the x (real) sample, inner index the y (imaginary) sample.
/// `None` marks a masked cell.
pub type IterationMatrix = Vec<Vec<Option<f32>>>;

/**
 * One iteration matrix per root, in root order. A cell holds a value in the
 * matrix of the root it converged to and is masked in all others; a diverged
 * cell is masked everywhere.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct BasinIterationGrids {
    shape: (usize, usize),
    matrices: Vec<IterationMatrix>,
    converged_counts: Vec<usize>,
    diverged_count: usize,
}

impl BasinIterationGrids {
    pub(crate) fn from_results(
        results: &[Vec<NewtonIterationResult>],
        shape: (usize, usize),
        root_count: usize,
        transform: IterationTransform,
    ) -> BasinIterationGrids {
        assert_eq!(results.len(), shape.0, "Outer dimension mismatch");
        let mut matrices = vec![create_buffer(None, shape); root_count];
        let mut converged_counts = vec![0; root_count];
        let mut diverged_count = 0;

        for (i, row) in results.iter().enumerate() {
            assert_eq!(row.len(), shape.1, "Inner dimension mismatch");
            for (j, result) in row.iter().enumerate() {
                match result.classification {
                    RootClassification::Root(index) => {
                        matrices[index][i][j] = Some(transform.apply(result.iteration_count));
                        converged_counts[index] += 1;
                    }
                    RootClassification::Diverged => diverged_count += 1,
                }
            }
        }

        BasinIterationGrids {
            shape,
            matrices,
            converged_counts,
            diverged_count,
        }
    }

    /// `(rows, columns)`, shared by every matrix.
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn root_count(&self) -> usize {
        self.matrices.len()
    }

    pub fn matrices(&self) -> &[IterationMatrix] {
        &self.matrices
    }

    pub fn matrix(&self, root_index: usize) -> Option<&IterationMatrix> {
        self.matrices.get(root_index)
    }

    pub fn value(&self, root_index: usize, i: usize, j: usize) -> Option<f32> {
        self.matrices.get(root_index)?.get(i)?.get(j).copied().flatten()
    }

    pub fn converged_count(&self, root_index: usize) -> usize {
        self.converged_counts.get(root_index).copied().unwrap_or(0)
    }

    pub fn diverged_count(&self) -> usize {
        self.diverged_count
    }
}

/**
 * Runs Newton's method from every lattice sample and collects one iteration
 * matrix per root. Fails only on malformed global input; divergence at a
 * sample is local to that cell.
 */
pub fn plot_basins<F>(
    function: &F,
    roots: &[Complex64],
    lattice: &SampleLattice,
    params: &ConvergenceParams,
    transform: IterationTransform,
) -> Result<BasinIterationGrids>
where
    F: ComplexFunctionWithSlope + Sync + ?Sized,
{
    if roots.is_empty() {
        return Err(NewtonFractalError::EmptyRootSet);
    }
    lattice.validate()?;
    params.validate()?;

    let shape = lattice.shape();
    log::debug!(
        "Evaluating {} x {} lattice for {} roots",
        shape.0,
        shape.1,
        roots.len()
    );
    let start_time = Instant::now();
    let results = evaluate_lattice(lattice, |z| {
        classify_start_point(function, roots, z, params)
    });
    let grids = BasinIterationGrids::from_results(&results, shape, roots.len(), transform);
    log::debug!(
        "Lattice evaluated in {:?}: {} diverged samples",
        start_time.elapsed(),
        grids.diverged_count()
    );
    Ok(grids)
}

/// A matrix paired with the colormap the renderer should draw it with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderLayer<'a> {
    pub matrix: &'a IterationMatrix,
    pub color_map: &'a str,
}

/**
 * Pairs every root's matrix with its colormap identifier, in root order.
 * Identifiers beyond the number of roots are ignored.
 */
pub fn render_layers<'a>(
    grids: &'a BasinIterationGrids,
    color_maps: &'a [String],
) -> Result<Vec<RenderLayer<'a>>> {
    if color_maps.len() < grids.root_count() {
        return Err(NewtonFractalError::NotEnoughColorMaps {
            required: grids.root_count(),
            provided: color_maps.len(),
        });
    }
    Ok(grids
        .matrices()
        .iter()
        .zip(color_maps.iter())
        .map(|(matrix, color_map)| RenderLayer {
            matrix,
            color_map: color_map.as_str(),
        })
        .collect())
}

/// Draws pseudocolor rasters. Masked cells are expected to come out transparent.
pub trait LayerRenderer {
    type Error;

    fn draw(&mut self, layer: &RenderLayer<'_>) -> std::result::Result<(), Self::Error>;
}

/// Draws the layers in order, stopping at the first renderer error.
pub fn draw_layers<R: LayerRenderer>(
    renderer: &mut R,
    layers: &[RenderLayer<'_>],
) -> std::result::Result<(), R::Error> {
    for layer in layers {
        renderer.draw(layer)?;
    }
    Ok(())
}
