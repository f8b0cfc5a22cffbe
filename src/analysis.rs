use log::{info, warn};

use crate::circulation::CirculationEngine;
use crate::config::Config;
use crate::error::Result;
use crate::flux::FluxEngine;
use crate::grid::Grid;
use crate::phase::{InterfaceCurve, PhaseClassifier, PhaseMask, PhaseSplit};
use crate::record::PivRecord;
use crate::region::ControlRegion;
use crate::report::{disagreements, Report, Units};

/// A validated grid, its interface curve and the regions to analyse.
pub struct Analysis {
    pub grid: Grid,
    pub curve: InterfaceCurve,
    pub regions: Vec<ControlRegion>,
}

impl Analysis {
    /// Spacing and region bounds are checked here, before any numerics run.
    pub fn from_record(record: PivRecord, cfg: &Config) -> Result<Self> {
        let (grid, curve) = record.into_parts()?;
        match cfg.expected_spacing {
            Some(step) => grid.test_spacing(step, cfg.spacing_tolerance)?,
            None => grid.validate_spacing(cfg.spacing_tolerance)?,
        }
        let grid = grid.with_speed_scale(cfg.speed_scale);
        let regions = cfg.regions(&grid)?;
        info!("grid {:?} validated, {} regions", grid.shape(), regions.len());
        Ok(Self { grid, curve, regions })
    }

    /// Phase labels and the speed field split by phase.
    pub fn phases(&self, trace: usize) -> Result<(PhaseMask, PhaseSplit)> {
        let cls = PhaseClassifier::new(&self.grid, &self.curve, trace)?;
        Ok((cls.mask(), cls.split(&self.grid.speed())))
    }

    /// Fails with `RegionBounds` when a region does not fit the grid.
    pub fn run(&self, cfg: &Config) -> Result<Report> {
        let circ = CirculationEngine::new(&self.grid)
            .quadrature(cfg.quadrature)
            .parallel(cfg.parallel);
        let flux = FluxEngine::new(&self.grid)
            .quadrature(cfg.quadrature)
            .parallel(cfg.parallel);

        let report = Report {
            units: Units::default(),
            circulation: circ.direct(&self.regions)?,
            stokes: circ.stokes_check(&self.regions)?,
            flux: flux.direct(&self.regions)?,
            gauss: flux.gauss_check(&self.regions)?,
        };

        let tol = cfg.agreement_tolerance;
        if !circ.stokes_holds(&self.regions, tol)? {
            let bad = disagreements(&report.stokes, tol);
            warn!("{} region(s) exceed Stokes tolerance {}", bad, tol);
        }
        if !flux.gauss_holds(&self.regions, tol)? {
            let bad = disagreements(&report.gauss, tol);
            warn!("{} region(s) exceed Gauss tolerance {}", bad, tol);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::synthetic;

    fn cfg(regions: Vec<[(usize, usize); 2]>) -> Config {
        Config { regions, expected_spacing: Some(0.5), ..Config::default() }
    }

    #[test]
    fn test_pipeline_on_rotation() {
        let record = synthetic::solid_body_record(20, 24, 0.5, 1.0, 4.0);
        let cfg = cfg(vec![[(2, 2), (10, 12)], [(5, 1), (20, 18)]]);
        let analysis = Analysis::from_record(record, &cfg).unwrap();
        let report = analysis.run(&cfg).unwrap();
        assert_eq!(report.circulation.len(), 2);
        for (res, region) in report.circulation.iter().zip(&analysis.regions) {
            let expected = 2.0 * region.area(&analysis.grid);
            assert!((res.total - expected).abs() < 1e-9, "got {} expected {}", res.total, expected);
        }
        assert!(report.flux.iter().all(|f| f.total.abs() < 1e-9));
        assert_eq!(disagreements(&report.stokes, 1e-9), 0);
    }

    #[test]
    fn test_spacing_failure_stops_before_numerics() {
        let mut record = synthetic::solid_body_record(6, 6, 0.5, 1.0, 1.0);
        let mut x = record.get("x").unwrap().clone();
        x.set(2, 3, x.at(2, 3) + 0.1);
        record.insert("x", x);
        let err = Analysis::from_record(record, &cfg(vec![[(0, 0), (2, 2)]])).err().unwrap();
        assert!(matches!(err, AnalysisError::GridSpacing { from: (2, 2), to: (2, 3), .. }));
    }

    #[test]
    fn test_bad_region_rejected() {
        let record = synthetic::solid_body_record(6, 6, 0.5, 1.0, 1.0);
        let err = Analysis::from_record(record, &cfg(vec![[(0, 0), (6, 2)]])).err().unwrap();
        assert!(matches!(err, AnalysisError::RegionBounds { .. }));
    }

    #[test]
    fn test_run_rejects_region_outside_grid() {
        let record = synthetic::solid_body_record(6, 6, 0.5, 1.0, 1.0);
        let cfg = cfg(vec![[(0, 0), (2, 2)]]);
        let mut analysis = Analysis::from_record(record, &cfg).unwrap();
        analysis.regions.push(ControlRegion::new((1, 1), (10, 10), (20, 20)).unwrap());
        let err = analysis.run(&cfg).err().unwrap();
        assert!(matches!(err, AnalysisError::RegionBounds { ny: 6, nx: 6, .. }), "{err:?}");
    }

    #[test]
    fn test_phases_from_record_interface() {
        let record = synthetic::solid_body_record(8, 5, 0.5, 1.0, 1.6);
        let analysis = Analysis::from_record(record, &cfg(vec![[(0, 0), (2, 2)]])).unwrap();
        let (mask, split) = analysis.phases(0).unwrap();
        // rows with y = 2.0 .. 3.5 lie above 1.6
        assert_eq!(mask.count(crate::phase::Phase::Gas), 4 * 5);
        assert_eq!(split.gas.valid_count() + split.fluid.valid_count(), 40);
        assert!(analysis.phases(1).is_err());
    }
}
