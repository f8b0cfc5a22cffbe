use log::debug;

use crate::derived;
use crate::error::Result;
use crate::field::Field2;
use crate::grid::Grid;
use crate::integrate::{
    along_col, along_row, map_regions, over_region, Agreement, LoopIntegral, Sides,
};
use crate::quadrature::Quadrature;
use crate::region::ControlRegion;

/// Circulation of one region [mm²/s], positive counter-clockwise.
pub type CirculationResult = LoopIntegral;

/// Circulation around control regions, by boundary line integral and by
/// area integral of the curl.
pub struct CirculationEngine<'a> {
    grid: &'a Grid,
    quadrature: Quadrature,
    parallel: bool,
}

impl<'a> CirculationEngine<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid, quadrature: Quadrature::default(), parallel: false }
    }

    pub fn quadrature(mut self, quadrature: Quadrature) -> Self {
        self.quadrature = quadrature;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Tangential velocity summed along A→B→C→D→A.
    pub fn direct_one(&self, region: &ControlRegion) -> Result<CirculationResult> {
        let g = self.grid;
        region.check_within(g.shape())?;
        let q = self.quadrature;
        let (dx, dy) = (g.dx(), g.dy());
        let s = g.orientation().sign();
        let (ax, ay) = region.a();
        let (cx, cy) = region.c();

        let sides = Sides {
            ab: s * along_row(g.u(), ay, ax, cx, q) * dx,
            bc: s * along_col(g.v(), cx, ay, cy, q) * dy,
            cd: s * along_row(g.u(), cy, ax, cx, q) * (-dx),
            da: s * along_col(g.v(), ax, ay, cy, q) * (-dy),
        };
        let result = LoopIntegral::from_sides(*region, sides);
        debug!("circulation direct A={:?} C={:?}: {:.6}", region.a(), region.c(), result.total);
        Ok(result)
    }

    pub fn direct(&self, regions: &[ControlRegion]) -> Result<Vec<CirculationResult>> {
        map_regions(regions, self.parallel, |r| self.direct_one(r))
    }

    /// ∬ curl_z dA over the region using a precomputed curl field.
    pub fn area_with(&self, curl: &Field2, region: &ControlRegion) -> Result<f64> {
        let g = self.grid;
        region.check_within(curl.shape())?;
        let s = g.orientation().sign();
        let total = s * over_region(curl, region, self.quadrature) * g.dx() * g.dy();
        debug!("circulation area A={:?} C={:?}: {:.6}", region.a(), region.c(), total);
        Ok(total)
    }

    /// Stokes form: area integral of the curl field, one value per region.
    pub fn area(&self, regions: &[ControlRegion]) -> Result<Vec<f64>> {
        let curl = derived::curl(self.grid);
        map_regions(regions, self.parallel, |r| self.area_with(&curl, r))
    }

    /// Both methods side by side per region.
    pub fn stokes_check(&self, regions: &[ControlRegion]) -> Result<Vec<Agreement>> {
        let curl = derived::curl(self.grid);
        map_regions(regions, self.parallel, |r| -> Result<Agreement> {
            Ok(Agreement::new(*r, self.direct_one(r)?.total, self.area_with(&curl, r)?))
        })
    }

    /// True when every region's two estimates lie within `tolerance`.
    pub fn stokes_holds(&self, regions: &[ControlRegion], tolerance: f64) -> Result<bool> {
        Ok(self.stokes_check(regions)?.iter().all(|a| a.holds(tolerance)))
    }
}
