use std::fmt::Write;

use serde::Serialize;

use crate::circulation::CirculationResult;
use crate::flux::FluxResult;
use crate::integrate::Agreement;
use crate::phase::{Phase, PhaseMask, PhaseSplit};

/// Unit convention for everything in a [`Report`].
#[derive(Clone, Debug, Serialize)]
pub struct Units {
    pub length: &'static str,
    pub speed: &'static str,
    pub circulation: &'static str,
    pub flux: &'static str,
}

impl Default for Units {
    fn default() -> Self {
        Self { length: "mm", speed: "m/s", circulation: "mm^2/s", flux: "mm^3/s" }
    }
}

/// Machine-readable analysis results, one entry per region in input order.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub units: Units,
    pub circulation: Vec<CirculationResult>,
    pub stokes: Vec<Agreement>,
    pub flux: Vec<FluxResult>,
    pub gauss: Vec<Agreement>,
}

/// One block per region: direct total with side breakdown, then the area form.
pub fn circulation_table(
    direct: &[CirculationResult],
    stokes: &[Agreement],
    units: &Units,
) -> String {
    let mut out = String::new();
    for (k, (res, check)) in direct.iter().zip(stokes).enumerate() {
        let s = res.sides;
        let _ = writeln!(out, "\nRegion {} circulation [{}]:", k + 1, units.circulation);
        let _ = writeln!(
            out,
            "   Direct: {:.3}\t(AB:{:.3}, BC:{:.3}, CD:{:.3}, DA:{:.3})",
            res.total, s.ab, s.bc, s.cd, s.da
        );
        let _ = writeln!(out, "   Stokes: {:.3}\t(diff {:.3e})", check.area, check.difference);
    }
    out
}

pub fn flux_table(direct: &[FluxResult], gauss: &[Agreement], units: &Units) -> String {
    let mut out = String::new();
    for (k, (res, check)) in direct.iter().zip(gauss).enumerate() {
        let s = res.sides;
        let _ = writeln!(out, "\nRegion {} flux [{}]:", k + 1, units.flux);
        let _ = writeln!(
            out,
            "   Direct: {:.3}\t(AB={:.3}, BC={:.3}, CD={:.3}, DA={:.3})",
            res.total, s.ab, s.bc, s.cd, s.da
        );
        let _ = writeln!(out, "   Gauss:  {:.3}\t(diff {:.3e})", check.area, check.difference);
    }
    out
}

/// Point counts per phase and mean speed of each part.
pub fn phase_summary(mask: &PhaseMask, speed: &PhaseSplit, units: &Units) -> String {
    let fmt_mean = |m: Option<f64>| m.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "gas:   {:>7} points, mean speed {} {}",
        mask.count(Phase::Gas),
        fmt_mean(speed.gas.nan_mean()),
        units.speed
    );
    let _ = writeln!(
        out,
        "fluid: {:>7} points, mean speed {} {}",
        mask.count(Phase::Fluid),
        fmt_mean(speed.fluid.nan_mean()),
        units.speed
    );
    let _ = write!(out, "uncovered: {} points", mask.count(Phase::Uncovered));
    out
}

/// Count of regions whose boundary and area forms disagree beyond `tolerance`.
pub fn disagreements(checks: &[Agreement], tolerance: f64) -> usize {
    checks.iter().filter(|c| !c.holds(tolerance)).count()
}
