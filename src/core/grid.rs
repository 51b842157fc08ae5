//! Two-parameter grids built from long-format (row, col, value) tables.

use crate::core::stats::sorted_unique;
use crate::error::FigureError;

/// Dense grid indexed by sorted row/column parameter values.
/// Missing cells hold `NaN`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamGrid {
    pub rows: Vec<f64>,
    pub cols: Vec<f64>,
    values: Vec<f64>,
}

impl ParamGrid {
    pub fn filled(rows: Vec<f64>, cols: Vec<f64>, fill: f64) -> Self {
        let values = vec![fill; rows.len() * cols.len()];
        Self { rows, cols, values }
    }

    /// Pivot with the mean of duplicate (row, col) pairs; rows with a `NaN`
    /// in any of the three inputs are skipped.
    pub fn pivot_mean(row_keys: &[f64], col_keys: &[f64], values: &[f64]) -> Self {
        let rows = sorted_unique(row_keys);
        let cols = sorted_unique(col_keys);
        let mut sums = vec![0.0f64; rows.len() * cols.len()];
        let mut counts = vec![0usize; rows.len() * cols.len()];
        let n = row_keys.len().min(col_keys.len()).min(values.len());
        for k in 0..n {
            let (r, c, v) = (row_keys[k], col_keys[k], values[k]);
            if r.is_nan() || c.is_nan() || v.is_nan() {
                continue;
            }
            let (Some(i), Some(j)) = (position(&rows, r), position(&cols, c)) else {
                continue;
            };
            sums[i * cols.len() + j] += v;
            counts[i * cols.len() + j] += 1;
        }
        let values = sums
            .iter()
            .zip(counts.iter())
            .map(|(&s, &c)| if c == 0 { f64::NAN } else { s / c as f64 })
            .collect();
        Self { rows, cols, values }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.cols.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.cols.len() + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let n_cols = self.cols.len();
        self.values[i * n_cols + j] = value;
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Min and max over finite cells.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

fn position(sorted: &[f64], value: f64) -> Option<usize> {
    sorted.iter().position(|&v| v == value)
}

/// Long-format samples of a scalar over two parameters, looked up by exact
/// parameter value.
pub struct Samples<'a> {
    pub file: &'a str,
    pub alpha: &'a [f64],
    pub beta: &'a [f64],
    pub value: &'a [f64],
}

impl Samples<'_> {
    /// Value of the first row with exactly this (alpha, beta).
    pub fn lookup(&self, alpha: f64, beta: f64) -> Result<f64, FigureError> {
        self.alpha
            .iter()
            .zip(self.beta.iter())
            .zip(self.value.iter())
            .find(|((a, b), _)| **a == alpha && **b == beta)
            .map(|(_, v)| *v)
            .ok_or_else(|| FigureError::MissingGridPoint {
                file: self.file.to_string(),
                alpha,
                beta,
            })
    }

    /// Grid over the sorted distinct alphas (rows) and betas (columns).
    pub fn grid(&self) -> Result<ParamGrid, FigureError> {
        let mut grid = ParamGrid::filled(sorted_unique(self.alpha), sorted_unique(self.beta), 0.0);
        for i in 0..grid.n_rows() {
            for j in 0..grid.n_cols() {
                let v = self.lookup(grid.rows[i], grid.cols[j])?;
                grid.set(i, j, v);
            }
        }
        Ok(grid)
    }

    /// Discrete mixed second difference against the `(base, base)` reference:
    /// `V(a,b) - V(a,base) - V(base,b) + V(base,base)`. Zero everywhere when
    /// the two parameters act additively.
    pub fn interaction_residual(&self, values: &ParamGrid, base: f64) -> Result<ParamGrid, FigureError> {
        let reference = self.lookup(base, base)?;
        let mut residual = ParamGrid::filled(values.rows.clone(), values.cols.clone(), 0.0);
        for (i, &a) in values.rows.iter().enumerate() {
            let v_a = self.lookup(a, base)?;
            for (j, &b) in values.cols.iter().enumerate() {
                let v_b = self.lookup(base, b)?;
                residual.set(i, j, values.get(i, j) - v_a - v_b + reference);
            }
        }
        Ok(residual)
    }
}
