//! Render-ready views of a grid. Nothing here draws; the output feeds an
//! external plotting front end.

use serde::Serialize;

use crate::grid::Grid;

/// One arrow of a quiver plot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct QuiverSample {
    pub x: f64,
    pub y: f64,
    /// Unit direction; `(0, 0)` where the flow is at rest.
    pub dir: (f64, f64),
    /// Speed in the grid's speed unit.
    pub magnitude: f64,
}

/// Every `skip`-th point along both axes, starting at index 0.
pub fn quiver(grid: &Grid, skip: usize) -> Vec<QuiverSample> {
    let skip = skip.max(1);
    let (ny, nx) = grid.shape();
    let scale = grid.speed_scale();
    let mut out = Vec::with_capacity(ny.div_ceil(skip) * nx.div_ceil(skip));
    for row in (0..ny).step_by(skip) {
        for col in (0..nx).step_by(skip) {
            let u = grid.u().at(row, col);
            let v = grid.v().at(row, col);
            let norm = (u * u + v * v).sqrt();
            let dir = if norm > 0.0 { (u / norm, v / norm) } else { (0.0, 0.0) };
            out.push(QuiverSample {
                x: grid.x().at(row, col),
                y: grid.y().at(row, col),
                dir,
                magnitude: norm / scale,
            });
        }
    }
    out
}

/// Axis limits `[x_start, x_stop, y_start, y_stop]`.
pub fn extent(grid: &Grid) -> [f64; 4] {
    [grid.x_start(), grid.x_stop(), grid.y_start(), grid.y_stop()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::make_grid;

    #[test]
    fn test_quiver_decimates() {
        let g = make_grid(10, 7, 0.5, |_, _| (3000.0, 4000.0));
        let q = quiver(&g, 3);
        // rows 0,3,6,9 x cols 0,3,6
        assert_eq!(q.len(), 12);
        assert_eq!((q[1].x, q[1].y), (1.5, 0.0));
        assert!((q[0].dir.0 - 0.6).abs() < 1e-12 && (q[0].dir.1 - 0.8).abs() < 1e-12);
        assert!((q[0].magnitude - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_quiver_rest_has_zero_direction() {
        let g = make_grid(3, 3, 1.0, |_, _| (0.0, 0.0));
        assert!(quiver(&g, 0).iter().all(|s| s.dir == (0.0, 0.0) && s.magnitude == 0.0));
    }

    #[test]
    fn test_extent() {
        let g = make_grid(3, 5, 0.5, |_, _| (0.0, 0.0));
        assert_eq!(extent(&g), [0.0, 2.0, 0.0, 1.0]);
    }
}
