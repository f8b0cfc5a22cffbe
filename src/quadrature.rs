use serde::{Deserialize, Serialize};

/// Weighting of the samples along a rectangle side (and, as a tensor product,
/// of the cells inside it).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrature {
    /// Every sample counts fully, corners included on both sides they touch.
    Rectangle,
    /// End samples count half. Exact for fields linear along the side.
    #[default]
    Trapezoid,
}

impl Quadrature {
    /// Weight of sample `k` out of the `n + 1` samples `0..=n`.
    #[inline]
    pub fn weight(self, k: usize, n: usize) -> f64 {
        match self {
            Quadrature::Rectangle => 1.0,
            Quadrature::Trapezoid if k == 0 || k == n => 0.5,
            Quadrature::Trapezoid => 1.0,
        }
    }

    /// Weighted sum of `samples`, the first and last being the endpoints.
    pub fn sum(self, samples: impl ExactSizeIterator<Item = f64>) -> f64 {
        let n = samples.len().saturating_sub(1);
        samples.enumerate().map(|(k, s)| self.weight(k, n) * s).sum()
    }
}
