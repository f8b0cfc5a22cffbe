//! Property tests for the circulation and flux engines over random regions
//! and random smooth fields.

use pivflow::{
    AnalysisError, CirculationEngine, ControlRegion, Field2, FluxEngine, Grid, Quadrature,
};
use proptest::prelude::*;

const NY: usize = 24;
const NX: usize = 30;
const H: f64 = 0.5;

fn grid_with(a: f64, b: f64, c: f64, flip_rows: bool) -> Grid {
    let y_of = |row: usize| if flip_rows { (NY - 1 - row) as f64 * H } else { row as f64 * H };
    let x = Field2::from_fn(NY, NX, |_, col| col as f64 * H);
    let y = Field2::from_fn(NY, NX, |row, _| y_of(row));
    // Linear part: rotation a, source b, shear c
    let u = Field2::from_fn(NY, NX, |row, col| {
        let (x, y) = (col as f64 * H, y_of(row));
        -a * y + b * x + c * y
    });
    let v = Field2::from_fn(NY, NX, |row, col| {
        let (x, y) = (col as f64 * H, y_of(row));
        a * x + b * y
    });
    Grid::new(x, y, u, v).unwrap()
}

fn region_strategy() -> impl Strategy<Value = ControlRegion> {
    (0..NX - 1, 0..NY - 1)
        .prop_flat_map(|(ax, ay)| (Just(ax), Just(ay), ax + 1..NX, ay + 1..NY))
        .prop_map(|(ax, ay, cx, cy)| ControlRegion::new((ax, ay), (cx, cy), (NY, NX)).unwrap())
}

proptest! {
    #[test]
    fn linear_field_circulation_is_exact(
        a in -3.0f64..3.0,
        b in -3.0f64..3.0,
        c in -3.0f64..3.0,
        flip in any::<bool>(),
        region in region_strategy(),
    ) {
        let g = grid_with(a, b, c, flip);
        // curl = 2a - c, div = 2b
        let area = region.area(&g);
        let engine = CirculationEngine::new(&g);
        let check = engine.stokes_check(&[region]).unwrap()[0];
        let expected = (2.0 * a - c) * area;
        let tol = 1e-9 * (1.0 + expected.abs());
        prop_assert!(
            (check.boundary - expected).abs() < tol,
            "direct {} vs {}",
            check.boundary,
            expected
        );
        prop_assert!((check.area - expected).abs() < tol, "area {} vs {}", check.area, expected);

        let flux = FluxEngine::new(&g).gauss_check(&[region]).unwrap()[0];
        let expected = 2.0 * b * area;
        let tol = 1e-9 * (1.0 + expected.abs());
        prop_assert!(
            (flux.boundary - expected).abs() < tol,
            "flux {} vs {}",
            flux.boundary,
            expected
        );
        prop_assert!((flux.area - expected).abs() < tol, "div {} vs {}", flux.area, expected);
    }

    #[test]
    fn sides_always_sum_to_total(
        a in -3.0f64..3.0,
        b in -3.0f64..3.0,
        rect in any::<bool>(),
        region in region_strategy(),
    ) {
        let g = grid_with(a, b, 0.5, false);
        let q = if rect { Quadrature::Rectangle } else { Quadrature::Trapezoid };
        let circ = CirculationEngine::new(&g).quadrature(q).direct_one(&region).unwrap();
        let s = circ.sides;
        prop_assert_eq!(circ.total, s.ab + s.bc + s.cd + s.da);
        let flux = FluxEngine::new(&g).quadrature(q).direct_one(&region).unwrap();
        let s = flux.sides;
        prop_assert_eq!(flux.total, s.ab + s.bc + s.cd + s.da);
    }

    #[test]
    fn mirrored_rows_do_not_change_results(
        a in -3.0f64..3.0,
        b in -3.0f64..3.0,
        region in region_strategy(),
    ) {
        let up = grid_with(a, b, 0.0, false);
        let down = grid_with(a, b, 0.0, true);
        // Same physical rectangle in the mirrored index space
        let (ax, ay) = region.a();
        let (cx, cy) = region.c();
        let mirrored = ControlRegion::new((ax, NY - 1 - cy), (cx, NY - 1 - ay), (NY, NX)).unwrap();
        let c_up = CirculationEngine::new(&up).direct_one(&region).unwrap().total;
        let c_down = CirculationEngine::new(&down).direct_one(&mirrored).unwrap().total;
        prop_assert!((c_up - c_down).abs() < 1e-9 * (1.0 + c_up.abs()), "{} vs {}", c_up, c_down);
        let f_up = FluxEngine::new(&up).direct_one(&region).unwrap().total;
        let f_down = FluxEngine::new(&down).direct_one(&mirrored).unwrap().total;
        prop_assert!((f_up - f_down).abs() < 1e-9 * (1.0 + f_up.abs()), "{} vs {}", f_up, f_down);
    }
}

#[test]
fn out_of_range_region_is_rejected() {
    assert!(ControlRegion::new((0, 0), (NX, 3), (NY, NX)).is_err());
    assert!(ControlRegion::new((4, 4), (4, 9), (NY, NX)).is_err());
}

#[test]
fn region_built_for_larger_grid_is_an_error() {
    let region = ControlRegion::new((2, 2), (NX + 5, NY + 5), (NY + 10, NX + 10)).unwrap();
    let g = grid_with(1.0, 0.5, 0.0, false);
    let err = CirculationEngine::new(&g).direct_one(&region).unwrap_err();
    assert!(matches!(err, AnalysisError::RegionBounds { .. }), "{err:?}");
    let err = FluxEngine::new(&g).parallel(true).gauss_check(&[region]).unwrap_err();
    assert!(matches!(err, AnalysisError::RegionBounds { .. }), "{err:?}");
}
