//! Missing-value imputation
//!
//! Numeric columns are filled with the median of their non-missing values,
//! categorical columns with their mode (ties go to the value seen first).
//! Each column is handled independently and non-missing cells are never touched.

use constituency_stats::{descriptive, mode::mode};

use crate::{
    error::AnalyticsError,
    feature_table::{ColumnValues, FeatureColumn, FeatureTable},
};

/// Returns a table of the same shape with every missing cell filled.
///
/// A zero-row table is returned unchanged. A column without a single
/// non-missing value fails with [`AnalyticsError::DataQuality`], since its
/// median or mode does not exist.
///
/// # Example
///
/// ```
/// use constituency_analytics::{feature_table::{ColumnManifest, FeatureTable}, imputer};
/// use constituency_model::{Column, ConstituencyRecord};
///
/// let mut records = vec![
///     ConstituencyRecord::new("A", "England", "London"),
///     ConstituencyRecord::new("B", "England", "London"),
///     ConstituencyRecord::new("C", "England", "London"),
/// ];
/// records[0].retired_pct = Some(10.0);
/// records[2].retired_pct = Some(20.0);
///
/// let cohort: Vec<_> = records.iter().collect();
/// let manifest = ColumnManifest { numeric: vec![Column::Retired], categorical: vec![] };
/// let table = imputer::impute(&FeatureTable::build(&cohort, &manifest))?;
/// assert_eq!(table.numeric(Column::Retired).unwrap(), &[Some(10.0), Some(15.0), Some(20.0)]);
/// # Ok::<(), constituency_analytics::AnalyticsError>(())
/// ```
pub fn impute(table: &FeatureTable) -> Result<FeatureTable, AnalyticsError> {
    if table.is_empty() {
        return Ok(table.clone());
    }

    let columns = table
        .columns()
        .iter()
        .map(impute_column)
        .collect::<Result<Vec<_>, _>>()?;
    let imputed = table.with_columns(columns);
    debug_assert_eq!(imputed.missing_count(), 0);
    Ok(imputed)
}

fn impute_column(column: &FeatureColumn) -> Result<FeatureColumn, AnalyticsError> {
    let missing = column.values.missing_count();
    if missing == 0 {
        return Ok(column.clone());
    }
    let data_quality = || AnalyticsError::DataQuality {
        column: column.key.id().to_owned(),
    };

    let values = match &column.values {
        ColumnValues::Numeric(values) => {
            let fill =
                descriptive::median(values.iter().flatten().copied()).ok_or_else(data_quality)?;
            log::debug!(
                "imputing {missing} missing cells of '{}' with median {fill}",
                column.key.id()
            );
            ColumnValues::Numeric(values.iter().map(|v| Some(v.unwrap_or(fill))).collect())
        }
        ColumnValues::Categorical(values) => {
            let fill = mode(values.iter().flatten()).ok_or_else(data_quality)?.clone();
            log::debug!(
                "imputing {missing} missing cells of '{}' with mode '{fill}'",
                column.key.id()
            );
            ColumnValues::Categorical(
                values
                    .iter()
                    .map(|v| Some(v.clone().unwrap_or_else(|| fill.clone())))
                    .collect(),
            )
        }
    };

    Ok(FeatureColumn {
        key: column.key,
        values,
    })
}

#[cfg(test)]
mod tests {
    use constituency_model::{CategoricalColumn, Column, ConstituencyRecord};

    use super::*;
    use crate::feature_table::ColumnManifest;

    fn record(name: &str, region: Option<&str>, density: Option<f64>) -> ConstituencyRecord {
        let mut record = ConstituencyRecord::new(name, "England", "");
        record.region = region.map(str::to_owned);
        record.population_density = density;
        record
    }

    fn manifest() -> ColumnManifest {
        ColumnManifest {
            numeric: vec![Column::PopulationDensity],
            categorical: vec![CategoricalColumn::Region],
        }
    }

    #[test]
    fn test_fills_every_missing_cell_and_keeps_present_ones() {
        let records = vec![
            record("A", Some("London"), Some(4.0)),
            record("B", None, None),
            record("C", Some("Wales"), Some(1.0)),
            record("D", Some("Wales"), Some(3.0)),
            record("E", Some("London"), Some(2.0)),
        ];
        let cohort: Vec<_> = records.iter().collect();
        let table = FeatureTable::build(&cohort, &manifest());
        let imputed = impute(&table).unwrap();

        assert_eq!(imputed.missing_count(), 0);
        assert_eq!(imputed.len(), table.len());
        // even count of present values -> average of the middle two
        assert_eq!(
            imputed.numeric(Column::PopulationDensity).unwrap(),
            &[Some(4.0), Some(2.5), Some(1.0), Some(3.0), Some(2.0)]
        );
        // London and Wales tie; London is seen first
        let regions: Vec<_> = (0..5)
            .map(|row| imputed.get(row, "region"))
            .collect();
        assert_eq!(
            regions[1],
            Some(crate::feature_table::FeatureValue::Categorical(Some("London")))
        );
        assert_eq!(
            regions[2],
            Some(crate::feature_table::FeatureValue::Categorical(Some("Wales")))
        );
    }

    #[test]
    fn test_all_missing_numeric_column_is_data_quality_error() {
        let records = vec![record("A", Some("London"), None), record("B", Some("London"), None)];
        let cohort: Vec<_> = records.iter().collect();
        let table = FeatureTable::build(&cohort, &manifest());
        assert_eq!(
            impute(&table),
            Err(AnalyticsError::DataQuality {
                column: "population_density".into()
            })
        );
    }

    #[test]
    fn test_empty_table_is_not_an_error() {
        let table = FeatureTable::build(&[], &manifest());
        let imputed = impute(&table).unwrap();
        assert!(imputed.is_empty());
    }

    #[test]
    fn test_identities_are_untouched() {
        let records = vec![record("A", None, Some(1.0)), record("B", Some("Wales"), None)];
        let cohort: Vec<_> = records.iter().collect();
        let table = FeatureTable::build(&cohort, &manifest());
        let imputed = impute(&table).unwrap();
        assert_eq!(imputed.identities(), table.identities());
        assert_eq!(imputed.identities()[0].region, None);
    }
}
