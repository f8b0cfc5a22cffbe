use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::grid::Grid;

/// Grid-index point, `(col, row)` = `(x index, y index)`.
pub type IndexPoint = (usize, usize);

/// Axis-aligned rectangle in index space spanned by diagonal corners A and C.
/// The loop runs A=(Ax,Ay) → B=(Cx,Ay) → C=(Cx,Cy) → D=(Ax,Cy) → A.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ControlRegion {
    a: IndexPoint,
    c: IndexPoint,
}

/// Straight piece of a region outline in physical coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

impl ControlRegion {
    /// Checks `Ax < Cx`, `Ay < Cy` and that both corners lie on a grid of
    /// shape `(ny, nx)`. Nothing is clamped.
    pub fn new(a: IndexPoint, c: IndexPoint, shape: (usize, usize)) -> Result<Self> {
        let (ny, nx) = shape;
        let fail = |reason: &'static str| AnalysisError::RegionBounds { a, c, ny, nx, reason };
        if a.0 >= c.0 {
            return Err(fail("Ax must be less than Cx"));
        }
        if a.1 >= c.1 {
            return Err(fail("Ay must be less than Cy"));
        }
        let region = Self { a, c };
        region.check_within(shape)?;
        Ok(region)
    }

    /// Both corners must lie on a grid of shape `(ny, nx)`. Engines call this
    /// before indexing, since a region may have been built for another grid.
    pub fn check_within(&self, shape: (usize, usize)) -> Result<()> {
        let (ny, nx) = shape;
        if self.c.0 >= nx || self.c.1 >= ny {
            return Err(AnalysisError::RegionBounds {
                a: self.a,
                c: self.c,
                ny,
                nx,
                reason: "corner outside grid",
            });
        }
        Ok(())
    }

    pub fn for_grid(a: IndexPoint, c: IndexPoint, grid: &Grid) -> Result<Self> {
        Self::new(a, c, grid.shape())
    }

    pub fn a(&self) -> IndexPoint {
        self.a
    }

    pub fn b(&self) -> IndexPoint {
        (self.c.0, self.a.1)
    }

    pub fn c(&self) -> IndexPoint {
        self.c
    }

    pub fn d(&self) -> IndexPoint {
        (self.a.0, self.c.1)
    }

    /// Column indices Ax..=Cx.
    pub fn cols(&self) -> RangeInclusive<usize> {
        self.a.0..=self.c.0
    }

    /// Row indices Ay..=Cy.
    pub fn rows(&self) -> RangeInclusive<usize> {
        self.a.1..=self.c.1
    }

    /// Number of cell widths along x.
    pub fn span_x(&self) -> usize {
        self.c.0 - self.a.0
    }

    /// Number of cell heights along y.
    pub fn span_y(&self) -> usize {
        self.c.1 - self.a.1
    }

    /// Enclosed physical area, always non-negative.
    pub fn area(&self, grid: &Grid) -> f64 {
        (self.span_x() as f64 * grid.dx()).abs() * (self.span_y() as f64 * grid.dy()).abs()
    }

    fn coord(grid: &Grid, p: IndexPoint) -> (f64, f64) {
        (grid.x().at(p.1, p.0), grid.y().at(p.1, p.0))
    }

    /// Sides AB, BC, CD, DA in physical coordinates, for overlay drawing.
    pub fn outline(&self, grid: &Grid) -> [Segment; 4] {
        let a = Self::coord(grid, self.a());
        let b = Self::coord(grid, self.b());
        let c = Self::coord(grid, self.c());
        let d = Self::coord(grid, self.d());
        [
            Segment { from: a, to: b },
            Segment { from: b, to: c },
            Segment { from: c, to: d },
            Segment { from: d, to: a },
        ]
    }
}

/// Validate a batch of `[A, C]` corner pairs against one grid.
/// The first invalid region aborts the batch.
pub fn regions_for_grid(corners: &[[IndexPoint; 2]], grid: &Grid) -> Result<Vec<ControlRegion>> {
    corners
        .iter()
        .map(|[a, c]| ControlRegion::for_grid(*a, *c, grid))
        .collect()
}
