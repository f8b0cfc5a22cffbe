use std::fmt;

use crate::error::{AnalysisError, Axis, Result};
use crate::field::Field2;

/// Input velocities are mm/s; dividing by this gives m/s.
pub const MM_PER_M: f64 = 1000.0;

/// Default absolute tolerance for spacing checks.
pub const SPACING_TOLERANCE: f64 = 1e-9;

/// How grid indices map onto physical axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Orientation {
    /// x grows with column index.
    pub x_increasing: bool,
    /// y grows with row index.
    pub y_increasing: bool,
}

impl Orientation {
    /// +1 when an index-space A→B→C→D loop is counter-clockwise in physical
    /// space, -1 when exactly one axis is mirrored.
    pub fn sign(&self) -> f64 {
        if self.x_increasing == self.y_increasing { 1.0 } else { -1.0 }
    }
}

/// Structured PIV grid: coordinates and velocity components, all `(ny, nx)`.
/// Row index follows y, column index follows x.
#[derive(Clone, Debug)]
pub struct Grid {
    x: Field2,
    y: Field2,
    u: Field2,
    v: Field2,
    dx: f64,
    dy: f64,
    speed_scale: f64,
}

impl Grid {
    pub fn new(x: Field2, y: Field2, u: Field2, v: Field2) -> Result<Self> {
        let shape = x.shape();
        for (name, f) in [("y", &y), ("u", &u), ("v", &v)] {
            if f.shape() != shape {
                return Err(AnalysisError::ShapeMismatch {
                    name,
                    expected: shape,
                    found: f.shape(),
                });
            }
        }
        let (ny, nx) = shape;
        if ny < 2 || nx < 2 {
            return Err(AnalysisError::TooSmall { ny, nx });
        }
        let dx = x.at(0, 1) - x.at(0, 0);
        let dy = y.at(1, 0) - y.at(0, 0);
        for (axis, step) in [(Axis::X, dx), (Axis::Y, dy)] {
            if step == 0.0 || !step.is_finite() {
                return Err(AnalysisError::DegenerateSpacing { axis, step });
            }
        }
        Ok(Self { x, y, u, v, dx, dy, speed_scale: MM_PER_M })
    }

    /// Construct and check uniform spacing in one step.
    /// With `expected = None` the grid's own `dx`/`dy` are the reference.
    pub fn validated(
        x: Field2,
        y: Field2,
        u: Field2,
        v: Field2,
        expected: Option<f64>,
        tolerance: f64,
    ) -> Result<Self> {
        let grid = Self::new(x, y, u, v)?;
        match expected {
            Some(step) => grid.test_spacing(step, tolerance)?,
            None => grid.validate_spacing(tolerance)?,
        }
        Ok(grid)
    }

    pub fn with_speed_scale(mut self, scale: f64) -> Self {
        self.speed_scale = scale;
        self
    }

    /// Every neighbouring step along x and y must equal `expected` within
    /// `tolerance`. Stops at the first offending pair.
    pub fn test_spacing(&self, expected: f64, tolerance: f64) -> Result<()> {
        self.check_steps(expected, expected, tolerance)
    }

    /// Uniformity check against the grid's own `dx` and `dy`.
    pub fn validate_spacing(&self, tolerance: f64) -> Result<()> {
        self.check_steps(self.dx, self.dy, tolerance)
    }

    fn check_steps(&self, step_x: f64, step_y: f64, tolerance: f64) -> Result<()> {
        let (ny, nx) = self.shape();
        for i in 0..ny {
            for j in 0..nx {
                if j + 1 < nx {
                    let found = self.x.at(i, j + 1) - self.x.at(i, j);
                    if off_step(found, step_x, tolerance) {
                        return Err(AnalysisError::GridSpacing {
                            axis: Axis::X,
                            from: (i, j),
                            to: (i, j + 1),
                            found,
                            expected: step_x,
                            tolerance,
                        });
                    }
                }
                if i + 1 < ny {
                    let found = self.y.at(i + 1, j) - self.y.at(i, j);
                    if off_step(found, step_y, tolerance) {
                        return Err(AnalysisError::GridSpacing {
                            axis: Axis::Y,
                            from: (i, j),
                            to: (i + 1, j),
                            found,
                            expected: step_y,
                            tolerance,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }

    pub fn ny(&self) -> usize {
        self.x.ny()
    }

    pub fn nx(&self) -> usize {
        self.x.nx()
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn x(&self) -> &Field2 {
        &self.x
    }

    pub fn y(&self) -> &Field2 {
        &self.y
    }

    pub fn u(&self) -> &Field2 {
        &self.u
    }

    pub fn v(&self) -> &Field2 {
        &self.v
    }

    pub fn x_start(&self) -> f64 {
        self.x.at(0, 0)
    }

    pub fn x_stop(&self) -> f64 {
        self.x.at(0, self.nx() - 1)
    }

    pub fn y_start(&self) -> f64 {
        self.y.at(0, 0)
    }

    pub fn y_stop(&self) -> f64 {
        self.y.at(self.ny() - 1, 0)
    }

    pub fn speed_scale(&self) -> f64 {
        self.speed_scale
    }

    pub fn orientation(&self) -> Orientation {
        Orientation { x_increasing: self.dx > 0.0, y_increasing: self.dy > 0.0 }
    }

    /// |(u, v)| divided by the speed scale (m/s for mm/s input by default).
    pub fn speed(&self) -> Field2 {
        let scale = self.speed_scale;
        self.u.zip_map(&self.v, |u, v| (u * u + v * v).sqrt() / scale)
    }
}

/// NaN steps count as off.
fn off_step(found: f64, expected: f64, tolerance: f64) -> bool {
    found.is_nan() || (found - expected).abs() > tolerance
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ny, nx) = self.shape();
        writeln!(f, "grid shape (ny, nx): ({}, {})", ny, nx)?;
        writeln!(f, "x: [{:.3}, {:.3}] dx={}", self.x_start(), self.x_stop(), self.dx)?;
        write!(f, "y: [{:.3}, {:.3}] dy={}", self.y_start(), self.y_stop(), self.dy)
    }
}
