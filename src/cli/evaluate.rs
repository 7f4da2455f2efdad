use std::io::{self, Write};
use std::time::Instant;

use num::complex::Complex64;

use crate::fractals::{
    newtons_method::{draw_layers, render_layers, LayerRenderer, NewtonsMethodParams, RenderLayer},
    newtons_method_core::RootClassification,
};

/**
 * Stand-in for a raster renderer: writes one line per layer with its
 * colormap and the number of unmasked cells.
 */
pub struct LayerSummaryWriter<W: Write> {
    writer: W,
    layer_index: usize,
}

impl<W: Write> LayerSummaryWriter<W> {
    pub fn new(writer: W) -> Self {
        LayerSummaryWriter {
            writer,
            layer_index: 0,
        }
    }
}

impl<W: Write> LayerRenderer for LayerSummaryWriter<W> {
    type Error = io::Error;

    fn draw(&mut self, layer: &RenderLayer<'_>) -> io::Result<()> {
        let filled = layer
            .matrix
            .iter()
            .flatten()
            .filter(|value| value.is_some())
            .count();
        writeln!(
            self.writer,
            "root {}: colormap {}, {} converged cells",
            self.layer_index, layer.color_map, filled
        )?;
        self.layer_index += 1;
        Ok(())
    }
}

pub fn evaluate_fractal<W: Write>(
    params: &NewtonsMethodParams,
    writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let grids = params.evaluate()?;
    let (rows, cols) = grids.shape();
    log::info!(
        "Evaluated {} x {} lattice in {:?}",
        rows,
        cols,
        start_time.elapsed()
    );
    for (index, root) in params.roots.iter().enumerate() {
        log::info!(
            "Root {} ({}): {} converged samples",
            index,
            root,
            grids.converged_count(index)
        );
    }
    log::info!("Diverged samples: {}", grids.diverged_count());

    let layers = render_layers(&grids, &params.color_maps)?;
    let mut summary = LayerSummaryWriter::new(writer);
    draw_layers(&mut summary, &layers)?;
    writeln!(summary.writer, "diverged: {} cells", grids.diverged_count())?;
    Ok(())
}

pub fn classify_point<W: Write>(
    params: &NewtonsMethodParams,
    start: Complex64,
    mut writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let fractal = params.fractal()?;
    let result = fractal.classify(start);
    match result.classification {
        RootClassification::Root(index) => writeln!(
            writer,
            "{} -> root {} ({}) after {} iterations",
            start,
            index,
            fractal.model().roots()[index],
            result.iteration_count
        )?,
        RootClassification::Diverged => writeln!(
            writer,
            "{} -> diverged after {} iterations",
            start, result.iteration_count
        )?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lattice::{LatticeAxis, SampleLattice};
    use crate::fractals::{
        newtons_method::IterationTransform, newtons_method_core::ConvergenceParams,
    };

    fn params() -> NewtonsMethodParams {
        NewtonsMethodParams {
            roots: vec![Complex64::new(1.0, 0.0), Complex64::new(-1.0, 0.0)],
            lattice: SampleLattice {
                x: LatticeAxis::new(-2.0, 2.0, 1.0),
                y: LatticeAxis::new(0.0, 1.0, 1.0),
            },
            convergence: ConvergenceParams::default(),
            iteration_transform: IterationTransform::Log,
            color_maps: vec!["Blues_r".to_owned(), "Oranges_r".to_owned()],
        }
    }

    #[test]
    fn test_evaluate_writes_layer_summary() {
        let mut out = Vec::new();
        evaluate_fractal(&params(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "root 0: colormap Blues_r, 1 converged cells\n\
             root 1: colormap Oranges_r, 2 converged cells\n\
             diverged: 1 cells\n"
        );
    }

    #[test]
    fn test_evaluate_requires_a_colormap_per_root() {
        let mut params = params();
        params.color_maps.truncate(1);
        assert!(evaluate_fractal(&params, io::sink()).is_err());
    }

    #[test]
    fn test_classify_point_output() {
        let mut out = Vec::new();
        classify_point(&params(), Complex64::new(1.0, 0.0), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1+0i -> root 0 (1+0i) after 1 iterations\n"
        );

        let mut out = Vec::new();
        classify_point(&params(), Complex64::new(0.0, 0.0), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0+0i -> diverged after 250 iterations\n"
        );
    }
}
