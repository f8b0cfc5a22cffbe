use std::io;

use thiserror::Error;

/// Axis along which a grid check was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("shape mismatch: `{name}` is {found:?}, expected {expected:?}")]
    ShapeMismatch {
        name: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{len} values cannot fill a {ny}x{nx} field")]
    DataLength { ny: usize, nx: usize, len: usize },

    #[error("grid too small: {ny}x{nx}, need at least 2 points along each axis")]
    TooSmall { ny: usize, nx: usize },

    /// First pair of neighbouring points whose coordinate step is off.
    #[error(
        "uneven {axis} spacing between {from:?} and {to:?}: step {found}, expected {expected} (tol {tolerance})"
    )]
    GridSpacing {
        axis: Axis,
        from: (usize, usize),
        to: (usize, usize),
        found: f64,
        expected: f64,
        tolerance: f64,
    },

    /// Coordinates along one axis do not advance, or the step is not finite.
    #[error("degenerate {axis} spacing: step {step}")]
    DegenerateSpacing { axis: Axis, step: f64 },

    #[error("control region A={a:?} C={c:?} invalid for a {ny}x{nx} grid: {reason}")]
    RegionBounds {
        a: (usize, usize),
        c: (usize, usize),
        ny: usize,
        nx: usize,
        reason: &'static str,
    },

    #[error("interface trace {index} requested, curve has {count}")]
    InterfaceTrace { index: usize, count: usize },

    #[error("record field `{0}` missing")]
    MissingField(&'static str),

    #[error("malformed record: {0}")]
    Format(String),

    #[error("config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
