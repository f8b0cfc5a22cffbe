use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::grid::{Grid, MM_PER_M, SPACING_TOLERANCE};
use crate::quadrature::Quadrature;
use crate::region::{regions_for_grid, ControlRegion, IndexPoint};

pub const DEFAULT_CONFIG_FILE: &str = "pivflow.yaml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Measurement record to analyse.
    pub data: PathBuf,
    /// Required grid step; `None` checks uniformity against the grid's own step.
    pub expected_spacing: Option<f64>,
    pub spacing_tolerance: f64,
    /// Velocity magnitude is divided by this to report speed.
    pub speed_scale: f64,
    /// Which interface trace classifies the phases.
    pub interface_trace: usize,
    pub quadrature: Quadrature,
    pub parallel: bool,
    /// Stokes/Gauss agreement below this is reported as OK.
    pub agreement_tolerance: f64,
    /// `[[Ax, Ay], [Cx, Cy]]` corner pairs in grid indices.
    pub regions: Vec<[IndexPoint; 2]>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data.piv"),
            expected_spacing: Some(0.5),
            spacing_tolerance: SPACING_TOLERANCE,
            speed_scale: MM_PER_M,
            interface_trace: 0,
            quadrature: Quadrature::default(),
            parallel: false,
            agreement_tolerance: 1e-6,
            regions: vec![
                [(35, 160), (70, 170)],
                [(35, 85), (70, 100)],
                [(35, 50), (70, 60)],
            ],
        }
    }
}

impl Config {
    /// Validated control regions for `grid`.
    pub fn regions(&self, grid: &Grid) -> Result<Vec<ControlRegion>> {
        regions_for_grid(&self.regions, grid)
    }
}

/// Missing file means defaults; a file that exists must parse.
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::info!("{} not found; using defaults", path.display());
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

pub fn load() -> Result<Config> {
    load_from(Path::new(DEFAULT_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::grid::tests::make_grid;

    #[test]
    fn test_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.data, PathBuf::from("data.piv"));
        assert_eq!(cfg.expected_spacing, Some(0.5));
        assert_eq!(cfg.speed_scale, 1000.0);
        assert_eq!(cfg.interface_trace, 0);
        assert_eq!(cfg.quadrature, Quadrature::Trapezoid);
        assert!(!cfg.parallel);
        assert_eq!(cfg.regions.len(), 3);
        assert_eq!(cfg.regions[0], [(35, 160), (70, 170)]);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "data: run7.piv\nquadrature: rectangle\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.data, PathBuf::from("run7.piv"));
        assert_eq!(cfg.quadrature, Quadrature::Rectangle);
        assert_eq!(cfg.speed_scale, 1000.0); // default
        assert_eq!(cfg.regions.len(), 3); // default
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
data: /tmp/tube.piv
expected_spacing: ~
spacing_tolerance: 1.0e-6
speed_scale: 1.0
interface_trace: 2
quadrature: trapezoid
parallel: true
agreement_tolerance: 0.01
regions:
  - [[1, 2], [5, 6]]
  - [[0, 0], [3, 3]]
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.expected_spacing, None);
        assert_eq!(cfg.spacing_tolerance, 1e-6);
        assert_eq!(cfg.speed_scale, 1.0);
        assert_eq!(cfg.interface_trace, 2);
        assert!(cfg.parallel);
        assert_eq!(cfg.agreement_tolerance, 0.01);
        assert_eq!(cfg.regions, vec![[(1, 2), (5, 6)], [(0, 0), (3, 3)]]);
    }

    #[test]
    fn test_regions_validated_against_grid() {
        let g = make_grid(8, 8, 0.5, |_, _| (0.0, 0.0));
        let cfg = Config { regions: vec![[(1, 1), (6, 6)]], ..Config::default() };
        assert_eq!(cfg.regions(&g).unwrap().len(), 1);
        // default regions do not fit an 8x8 grid
        let err = Config::default().regions(&g).unwrap_err();
        assert!(matches!(err, AnalysisError::RegionBounds { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let cfg = load_from(Path::new("definitely/not/here.yaml")).unwrap();
        assert_eq!(cfg.speed_scale, 1000.0);
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let err = serde_yaml::from_str::<Config>("regions: [[[1, 2]]").unwrap_err();
        let err: AnalysisError = err.into();
        assert!(matches!(err, AnalysisError::Config(_)));
    }
}
