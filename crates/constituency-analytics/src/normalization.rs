//! Column-wise standardisation ahead of clustering
//!
//! Each column is shifted to zero mean and scaled to unit population standard
//! deviation. Parameters are fitted on the cohort being analysed and thrown
//! away with it, so a segment computed for one filter lives in a different
//! space than a segment computed for another.
//!
//! Only the clustering input is standardised. Vote shares, margins and
//! demographic percentages are always computed from raw values.

use constituency_model::Column;
use constituency_stats::descriptive::mean_and_std_dev;

use crate::feature_table::FeatureMatrix;

/// Fitted location and scale for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnScale {
    pub column: Column,
    pub mean: f64,
    pub std_dev: f64,
}

impl ColumnScale {
    /// A column whose values are all (numerically) equal.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.std_dev <= f64::EPSILON * self.mean.abs().max(1.0)
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        if self.is_constant() {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }
}

/// Zero-mean, unit-variance scaler fitted to one matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    scales: Vec<ColumnScale>,
}

impl Standardizer {
    /// Fits one [`ColumnScale`] per matrix column.
    #[must_use]
    pub fn fit(matrix: &FeatureMatrix) -> Self {
        let scales = matrix
            .columns
            .iter()
            .enumerate()
            .map(|(index, &column)| {
                let (mean, std_dev) =
                    mean_and_std_dev(&matrix.column_values(index)).unwrap_or((0.0, 0.0));
                let scale = ColumnScale {
                    column,
                    mean,
                    std_dev,
                };
                if scale.is_constant() && !matrix.rows.is_empty() {
                    log::warn!("column '{column}' is constant in this cohort; standardised to 0");
                }
                scale
            })
            .collect();
        Self { scales }
    }

    #[must_use]
    pub fn scales(&self) -> &[ColumnScale] {
        &self.scales
    }

    /// Applies the fitted scales. The matrix must have the fitted column layout.
    ///
    /// # Panics
    ///
    /// Panics if the matrix columns differ from the fitted ones.
    #[must_use]
    pub fn transform(&self, matrix: &FeatureMatrix) -> FeatureMatrix {
        assert!(
            self.scales
                .iter()
                .map(|s| s.column)
                .eq(matrix.columns.iter().copied()),
            "matrix columns do not match the fitted columns"
        );
        let rows = matrix
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.scales)
                    .map(|(&value, scale)| scale.apply(value))
                    .collect()
            })
            .collect();
        FeatureMatrix {
            columns: matrix.columns.clone(),
            rows,
        }
    }

    /// Fits on `matrix` and returns the standardised copy alongside the scaler.
    #[must_use]
    pub fn fit_transform(matrix: &FeatureMatrix) -> (Self, FeatureMatrix) {
        let scaler = Self::fit(matrix);
        let transformed = scaler.transform(matrix);
        (scaler, transformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn matrix(rows: Vec<Vec<f64>>) -> FeatureMatrix {
        FeatureMatrix {
            columns: vec![Column::PopulationDensity, Column::Retired, Column::Married],
            rows,
        }
    }

    #[test]
    fn test_columns_have_zero_mean_and_unit_std_dev() {
        let input = matrix(vec![
            vec![1.0, 30.0, 40.0],
            vec![55.0, 12.0, 41.0],
            vec![9.0, 25.5, 60.0],
            vec![120.0, 8.0, 38.5],
        ]);
        let (_, output) = Standardizer::fit_transform(&input);
        for index in 0..output.columns.len() {
            let (mean, std_dev) = mean_and_std_dev(&output.column_values(index)).unwrap();
            assert!(mean.abs() < TOLERANCE, "column {index} mean {mean}");
            assert!((std_dev - 1.0).abs() < TOLERANCE, "column {index} std {std_dev}");
        }
    }

    #[test]
    fn test_constant_column_becomes_zero() {
        let input = matrix(vec![
            vec![1.0, 0.1, 40.0],
            vec![2.0, 0.1, 41.0],
            vec![3.0, 0.1, 42.0],
        ]);
        let (scaler, output) = Standardizer::fit_transform(&input);
        assert!(scaler.scales()[1].is_constant());
        assert!(output.column_values(1).iter().all(|v| *v == 0.0));
        assert!(output.rows.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_single_row_is_all_zero() {
        let (_, output) = Standardizer::fit_transform(&matrix(vec![vec![5.0, 6.0, 7.0]]));
        assert_eq!(output.rows, vec![vec![0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_empty_matrix() {
        let (_, output) = Standardizer::fit_transform(&matrix(vec![]));
        assert!(output.rows.is_empty());
        assert_eq!(output.columns.len(), 3);
    }
}
