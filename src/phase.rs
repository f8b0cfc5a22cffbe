use log::warn;

use crate::error::{AnalysisError, Result};
use crate::field::Field2;
use crate::grid::Grid;

/// Measured gas/fluid interface: one or more traces, each an ordered list of
/// `(x, y)` samples indexed by grid column.
#[derive(Clone, Debug, Default)]
pub struct InterfaceCurve {
    xs: Vec<Vec<f64>>,
    ys: Vec<Vec<f64>>,
}

impl InterfaceCurve {
    /// `xit` / `yit` rows are traces; row `k` of both must have equal length.
    pub fn new(xit: &Field2, yit: &Field2) -> Result<Self> {
        if xit.shape() != yit.shape() {
            return Err(AnalysisError::ShapeMismatch {
                name: "yit",
                expected: xit.shape(),
                found: yit.shape(),
            });
        }
        let xs = (0..xit.ny()).map(|k| xit.row(k).to_vec()).collect();
        let ys = (0..yit.ny()).map(|k| yit.row(k).to_vec()).collect();
        Ok(Self { xs, ys })
    }

    pub fn from_trace(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Self { xs: vec![xs], ys: vec![ys] }
    }

    pub fn trace_count(&self) -> usize {
        self.ys.len()
    }

    /// Interface heights of trace `k`, one per column.
    pub fn heights(&self, k: usize) -> Result<&[f64]> {
        self.ys
            .get(k)
            .map(Vec::as_slice)
            .ok_or(AnalysisError::InterfaceTrace { index: k, count: self.ys.len() })
    }

    /// `(x, y)` points of trace `k`, for drawing.
    pub fn points(&self, k: usize) -> Result<Vec<(f64, f64)>> {
        let ys = self.heights(k)?;
        Ok(self.xs[k].iter().copied().zip(ys.iter().copied()).collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Gas,
    Fluid,
    /// Outside the rows/columns the interface measurement covers.
    Uncovered,
}

/// Per-point phase labels, shape `(ny, nx)`.
#[derive(Clone, Debug)]
pub struct PhaseMask {
    ny: usize,
    nx: usize,
    labels: Vec<Phase>,
}

impl PhaseMask {
    pub fn at(&self, row: usize, col: usize) -> Phase {
        self.labels[row * self.nx + col]
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    pub fn count(&self, phase: Phase) -> usize {
        self.labels.iter().filter(|&&p| p == phase).count()
    }
}

/// A field split into its gas and fluid parts. Missing entries are `NaN`.
#[derive(Clone, Debug)]
pub struct PhaseSplit {
    pub gas: Field2,
    pub fluid: Field2,
}

/// Routes grid points to gas (above the interface) or fluid (on or below it).
pub struct PhaseClassifier<'a> {
    grid: &'a Grid,
    heights: &'a [f64],
}

impl<'a> PhaseClassifier<'a> {
    pub fn new(grid: &'a Grid, curve: &'a InterfaceCurve, trace: usize) -> Result<Self> {
        let heights = curve.heights(trace)?;
        if heights.len() < grid.nx() {
            warn!(
                "interface trace {} covers {} of {} columns; the rest stays unclassified",
                trace,
                heights.len(),
                grid.nx()
            );
        }
        Ok(Self { grid, heights })
    }

    /// Rows and columns of `shape` that both the grid and the interface cover.
    fn coverage(&self, shape: (usize, usize)) -> (usize, usize) {
        let rows = shape.0.min(self.grid.ny());
        let cols = shape.1.min(self.grid.nx()).min(self.heights.len());
        (rows, cols)
    }

    #[inline]
    fn phase_at(&self, row: usize, col: usize) -> Phase {
        // Ties resolve to fluid.
        if self.grid.y().at(row, col) > self.heights[col] { Phase::Gas } else { Phase::Fluid }
    }

    pub fn mask(&self) -> PhaseMask {
        let (ny, nx) = self.grid.shape();
        let (rows, cols) = self.coverage((ny, nx));
        let mut labels = vec![Phase::Uncovered; ny * nx];
        for row in 0..rows {
            for col in 0..cols {
                labels[row * nx + col] = self.phase_at(row, col);
            }
        }
        PhaseMask { ny, nx, labels }
    }

    /// Split any grid-shaped scalar field. Outputs keep `field`'s shape.
    pub fn split(&self, field: &Field2) -> PhaseSplit {
        let (ny, nx) = field.shape();
        let mut gas = Field2::nan(ny, nx);
        let mut fluid = Field2::nan(ny, nx);
        let (rows, cols) = self.coverage((ny, nx));
        for row in 0..rows {
            for col in 0..cols {
                let value = field.at(row, col);
                match self.phase_at(row, col) {
                    Phase::Gas => gas.set(row, col, value),
                    _ => fluid.set(row, col, value),
                }
            }
        }
        PhaseSplit { gas, fluid }
    }
}
