use crate::error::{AnalysisError, Result};

/// Row-major flat index. `col` runs along x, `row` along y.
/// Caller guarantees 0 <= col < nx and 0 <= row < ny.
#[inline(always)]
pub const fn idx_inner(col: usize, row: usize, nx: usize) -> usize {
    row * nx + col
}

/// Dense 2D scalar field of shape `(ny, nx)`, stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Field2 {
    ny: usize,
    nx: usize,
    data: Vec<f64>,
}

impl Field2 {
    pub fn new(ny: usize, nx: usize, data: Vec<f64>) -> Result<Self> {
        if ny.checked_mul(nx) != Some(data.len()) {
            return Err(AnalysisError::DataLength { ny, nx, len: data.len() });
        }
        Ok(Self { ny, nx, data })
    }

    pub fn filled(ny: usize, nx: usize, value: f64) -> Self {
        Self { ny, nx, data: vec![value; ny * nx] }
    }

    /// Field with `NaN` everywhere, the "no data" marker.
    pub fn nan(ny: usize, nx: usize) -> Self {
        Self::filled(ny, nx, f64::NAN)
    }

    pub fn from_fn(ny: usize, nx: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(ny * nx);
        for row in 0..ny {
            for col in 0..nx {
                data.push(f(row, col));
            }
        }
        Self { ny, nx, data }
    }

    /// Build from nested rows; every row must have the first row's length.
    pub fn from_rows(name: &'static str, rows: &[Vec<f64>]) -> Result<Self> {
        let ny = rows.len();
        let nx = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(ny * nx);
        for row in rows {
            if row.len() != nx {
                return Err(AnalysisError::ShapeMismatch {
                    name,
                    expected: (ny, nx),
                    found: (ny, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { ny, nx, data })
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    /// `(ny, nx)`, matrix convention.
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[idx_inner(col, row, self.nx)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[idx_inner(col, row, self.nx)] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = idx_inner(0, row, self.nx);
        &self.data[start..start + self.nx]
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self { ny: self.ny, nx: self.nx, data: self.data.iter().map(|&v| f(v)).collect() }
    }

    /// Pointwise combination of two same-shaped fields.
    pub fn zip_map(&self, other: &Field2, f: impl Fn(f64, f64) -> f64) -> Self {
        debug_assert_eq!(self.shape(), other.shape());
        let data = self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect();
        Self { ny: self.ny, nx: self.nx, data }
    }

    /// Number of points holding real data (not `NaN`).
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// Mean over points holding real data, `None` when there are none.
    pub fn nan_mean(&self) -> Option<f64> {
        let (sum, count) = self
            .data
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
        if count > 0 { Some(sum / count as f64) } else { None }
    }

    /// Largest absolute value over rows `rows` and columns `cols`.
    pub fn max_abs_in(&self, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) -> f64 {
        let mut max = 0.0_f64;
        for row in rows {
            for col in cols.clone() {
                max = max.max(self.at(row, col).abs());
            }
        }
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let f = Field2::from_fn(2, 3, |row, col| (row * 10 + col) as f64);
        assert_eq!(f.data(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(f.at(1, 2), 12.0);
        assert_eq!(f.row(1), &[10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = Field2::from_rows("u", &rows).unwrap_err();
        assert!(matches!(err, AnalysisError::ShapeMismatch { name: "u", .. }));
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = Field2::new(2, 3, vec![0.0; 7]).unwrap_err();
        assert!(matches!(err, AnalysisError::DataLength { ny: 2, nx: 3, len: 7 }), "{err:?}");
        assert!(Field2::new(usize::MAX, 2, vec![0.0; 4]).is_err());
        assert!(Field2::new(2, 2, vec![0.0; 4]).is_ok());
    }

    #[test]
    fn test_nan_mean_skips_missing() {
        let f = Field2::new(1, 4, vec![1.0, f64::NAN, 3.0, f64::NAN]).unwrap();
        assert_eq!(f.valid_count(), 2);
        assert_eq!(f.nan_mean(), Some(2.0));
        assert_eq!(Field2::nan(2, 2).nan_mean(), None);
    }
}
