//! Vector-calculus analysis of 2D PIV velocity fields over a gas/fluid flow:
//! derived fields, phase splitting along a measured interface, and
//! circulation/flux through rectangular control regions by boundary and
//! area integrals.

pub mod analysis;
pub mod circulation;
pub mod config;
pub mod derived;
pub mod error;
pub mod field;
pub mod flux;
pub mod grid;
pub mod integrate;
pub mod phase;
pub mod quadrature;
pub mod record;
pub mod region;
pub mod report;
pub mod synthetic;
pub mod views;

pub use analysis::Analysis;
pub use circulation::{CirculationEngine, CirculationResult};
pub use error::{AnalysisError, Result};
pub use field::Field2;
pub use flux::{FluxEngine, FluxResult};
pub use grid::Grid;
pub use integrate::{Agreement, LoopIntegral, Sides};
pub use phase::{InterfaceCurve, Phase, PhaseClassifier, PhaseSplit};
pub use quadrature::Quadrature;
pub use region::ControlRegion;
