use rayon::prelude::*;
use serde::Serialize;

use crate::field::Field2;
use crate::quadrature::Quadrature;
use crate::region::ControlRegion;

/// Contributions of the four sides of a region loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Sides {
    pub ab: f64,
    pub bc: f64,
    pub cd: f64,
    pub da: f64,
}

impl Sides {
    /// Left-to-right sum `ab + bc + cd + da`.
    pub fn total(&self) -> f64 {
        self.ab + self.bc + self.cd + self.da
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.ab, self.bc, self.cd, self.da]
    }
}

/// Closed-loop integral over one region: total plus side breakdown.
/// `total` is always exactly `sides.total()`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LoopIntegral {
    pub region: ControlRegion,
    pub total: f64,
    pub sides: Sides,
}

impl LoopIntegral {
    pub fn from_sides(region: ControlRegion, sides: Sides) -> Self {
        Self { region, total: sides.total(), sides }
    }
}

/// Boundary integral set against the matching area integral for one region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Agreement {
    pub region: ControlRegion,
    pub boundary: f64,
    pub area: f64,
    /// `boundary - area`
    pub difference: f64,
}

impl Agreement {
    pub fn new(region: ControlRegion, boundary: f64, area: f64) -> Self {
        Self { region, boundary, area, difference: boundary - area }
    }

    pub fn holds(&self, tolerance: f64) -> bool {
        self.difference.abs() <= tolerance
    }

    /// `|difference|` relative to the larger magnitude of the two results.
    pub fn relative(&self) -> f64 {
        let scale = self.boundary.abs().max(self.area.abs());
        if scale > 0.0 { self.difference.abs() / scale } else { 0.0 }
    }
}

/// Weighted sum of `f[row, c0..=c1]`.
pub fn along_row(f: &Field2, row: usize, c0: usize, c1: usize, q: Quadrature) -> f64 {
    q.sum(f.row(row)[c0..c1 + 1].iter().copied())
}

/// Weighted sum of `f[r0..=r1, col]`.
pub fn along_col(f: &Field2, col: usize, r0: usize, r1: usize, q: Quadrature) -> f64 {
    q.sum((r0..r1 + 1).map(|row| f.at(row, col)))
}

/// Weighted sum of `f` over every point of the region, boundary rows and
/// columns included. Weights are the tensor product of the 1-D rule.
pub fn over_region(f: &Field2, region: &ControlRegion, q: Quadrature) -> f64 {
    let (ax, ay) = region.a();
    let (cx, cy) = region.c();
    let (nx, ny) = (region.span_x(), region.span_y());
    let mut sum = 0.0;
    for (k, row) in (ay..=cy).enumerate() {
        let wy = q.weight(k, ny);
        let mut line = 0.0;
        for (m, col) in (ax..=cx).enumerate() {
            line += q.weight(m, nx) * f.at(row, col);
        }
        sum += wy * line;
    }
    sum
}

/// Map `f` over regions, optionally on the rayon pool, collecting into `C`
/// (a `Vec`, or a `Result<Vec<_>>` that stops at the first error). Output
/// order always matches input order.
pub fn map_regions<T, C, F>(regions: &[ControlRegion], parallel: bool, f: F) -> C
where
    T: Send,
    C: FromIterator<T> + FromParallelIterator<T>,
    F: Fn(&ControlRegion) -> T + Sync + Send,
{
    if parallel {
        regions.par_iter().map(f).collect()
    } else {
        regions.iter().map(f).collect()
    }
}
