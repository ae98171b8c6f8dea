//! Record-to-table conversion
//!
//! [`FeatureTable`] is the shared representation between the pipeline stages:
//! one row per cohort record, a fixed set of columns chosen by a
//! [`ColumnManifest`], and explicit missing markers (`None`) wherever the
//! source record has no value. Nothing is coerced to zero here; consumers
//! decide how to treat absence.
//!
//! # Example
//!
//! ```
//! use constituency_analytics::feature_table::{ColumnManifest, FeatureTable};
//! use constituency_model::{Column, ConstituencyRecord, Party};
//!
//! let records = vec![
//!     ConstituencyRecord::new("A", "England", "London").with_vote(Party::Labour, 10),
//!     ConstituencyRecord::new("B", "England", "London"),
//! ];
//! let cohort: Vec<_> = records.iter().collect();
//! let table = FeatureTable::build(&cohort, &ColumnManifest::contestation());
//!
//! assert_eq!(table.len(), 2);
//! let labour = table.numeric(Column::PartyVote(Party::Labour)).unwrap();
//! assert_eq!(labour, &[Some(10.0), None]);
//! ```

use constituency_model::{CategoricalColumn, Column, ConstituencyRecord, Party};

use crate::error::AnalyticsError;

/// The columns an analysis needs, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnManifest {
    pub numeric: Vec<Column>,
    pub categorical: Vec<CategoricalColumn>,
}

impl ColumnManifest {
    /// Demographic and electoral columns used to segment constituencies.
    ///
    /// Numeric only: the clusterer reads nothing else.
    #[must_use]
    pub fn clustering() -> Self {
        let mut numeric = vec![Column::PopulationDensity];
        numeric.extend(Column::DEMOGRAPHIC_PERCENTAGES);
        numeric.push(Column::Turnout);
        numeric.extend(Party::ALL.map(Column::PartyVote));
        Self {
            numeric,
            categorical: vec![],
        }
    }

    /// Party vote columns plus the reported total.
    #[must_use]
    pub fn contestation() -> Self {
        let mut numeric = Party::ALL.map(Column::PartyVote).to_vec();
        numeric.push(Column::TotalVotes);
        Self {
            numeric,
            categorical: vec![],
        }
    }
}

/// Identity of the record behind a table row. Never imputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIdentity {
    pub name: String,
    pub country: String,
    pub region: Option<String>,
}

/// Values of one column, one entry per row. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnValues {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(values) => values.len(),
            ColumnValues::Categorical(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn missing_count(&self) -> usize {
        match self {
            ColumnValues::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnValues::Categorical(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    Numeric(Column),
    Categorical(CategoricalColumn),
}

impl ColumnKey {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            ColumnKey::Numeric(column) => column.id(),
            ColumnKey::Categorical(column) => column.id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    pub key: ColumnKey,
    pub values: ColumnValues,
}

/// A single cell, borrowed from a [`FeatureTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Numeric(Option<f64>),
    Categorical(Option<&'a str>),
}

/// Row-aligned columns built from a cohort.
///
/// Every column holds exactly one value per row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    identities: Vec<RowIdentity>,
    columns: Vec<FeatureColumn>,
}

impl FeatureTable {
    /// Builds a table with one row per record and the manifest's columns.
    #[must_use]
    pub fn build(records: &[&ConstituencyRecord], manifest: &ColumnManifest) -> Self {
        let identities = records
            .iter()
            .map(|record| RowIdentity {
                name: record.name.clone(),
                country: record.country.clone(),
                region: record.region.clone(),
            })
            .collect();

        let numeric = manifest.numeric.iter().map(|&column| FeatureColumn {
            key: ColumnKey::Numeric(column),
            values: ColumnValues::Numeric(records.iter().map(|r| column.value(r)).collect()),
        });
        let categorical = manifest.categorical.iter().map(|&column| FeatureColumn {
            key: ColumnKey::Categorical(column),
            values: ColumnValues::Categorical(
                records
                    .iter()
                    .map(|r| column.value(r).map(str::to_owned))
                    .collect(),
            ),
        });
        let columns = numeric.chain(categorical).collect();

        let table = Self {
            identities,
            columns,
        };
        log::debug!(
            "built feature table: {} rows x {} columns, {} missing cells",
            table.len(),
            table.columns.len(),
            table.missing_count()
        );
        table
    }

    /// Replaces the columns while keeping the row identities.
    ///
    /// # Panics
    ///
    /// Panics if a column does not have exactly one value per row.
    #[must_use]
    pub(crate) fn with_columns(&self, columns: Vec<FeatureColumn>) -> Self {
        for column in &columns {
            assert_eq!(
                column.values.len(),
                self.identities.len(),
                "column '{}' does not match row count",
                column.key.id()
            );
        }
        Self {
            identities: self.identities.clone(),
            columns,
        }
    }

    /// Copy of the table with every missing party vote read as zero votes.
    ///
    /// At the source a missing vote count means the party did not stand, so
    /// this is a derived input rather than imputation. Other columns keep
    /// their missing markers.
    #[must_use]
    pub fn with_missing_votes_as_zero(&self) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|column| match (&column.key, &column.values) {
                (ColumnKey::Numeric(Column::PartyVote(_)), ColumnValues::Numeric(values)) => {
                    FeatureColumn {
                        key: column.key,
                        values: ColumnValues::Numeric(
                            values.iter().map(|v| Some(v.unwrap_or(0.0))).collect(),
                        ),
                    }
                }
                _ => column.clone(),
            })
            .collect();
        self.with_columns(columns)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    #[must_use]
    pub fn identities(&self) -> &[RowIdentity] {
        &self.identities
    }

    #[must_use]
    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Total number of missing cells across all columns.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.missing_count()).sum()
    }

    /// Values of a numeric column, `None` if the column is not in the table.
    #[must_use]
    pub fn numeric(&self, column: Column) -> Option<&[Option<f64>]> {
        self.columns.iter().find_map(|c| match (&c.key, &c.values) {
            (ColumnKey::Numeric(key), ColumnValues::Numeric(values)) if *key == column => {
                Some(values.as_slice())
            }
            _ => None,
        })
    }

    /// Looks up one cell by row index and column id.
    #[must_use]
    pub fn get(&self, row: usize, column_id: &str) -> Option<FeatureValue<'_>> {
        let column = self.columns.iter().find(|c| c.key.id() == column_id)?;
        match &column.values {
            ColumnValues::Numeric(values) => values.get(row).map(|v| FeatureValue::Numeric(*v)),
            ColumnValues::Categorical(values) => values
                .get(row)
                .map(|v| FeatureValue::Categorical(v.as_deref())),
        }
    }

    /// Dense numeric view of the table, in manifest order.
    ///
    /// Categorical columns are left out. Fails if any numeric cell is still
    /// missing, so callers impute first.
    pub fn numeric_matrix(&self) -> Result<FeatureMatrix, AnalyticsError> {
        let mut columns = vec![];
        let mut column_values = vec![];
        for column in &self.columns {
            if let (ColumnKey::Numeric(key), ColumnValues::Numeric(values)) =
                (&column.key, &column.values)
            {
                let dense = values
                    .iter()
                    .copied()
                    .collect::<Option<Vec<f64>>>()
                    .ok_or_else(|| AnalyticsError::DataQuality {
                        column: key.id().to_owned(),
                    })?;
                columns.push(*key);
                column_values.push(dense);
            }
        }
        let rows = (0..self.len())
            .map(|row| column_values.iter().map(|values| values[row]).collect())
            .collect();
        Ok(FeatureMatrix { columns, rows })
    }
}

/// Dense row-major numeric matrix with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    #[must_use]
    pub fn column_index(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    /// Copies out one column.
    #[must_use]
    pub fn column_values(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[index]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<ConstituencyRecord> {
        let mut a = ConstituencyRecord::new("A", "England", "London").with_vote(Party::Labour, 30);
        a.population_density = Some(80.0);
        a.retired_pct = Some(10.0);
        let mut b = ConstituencyRecord::new("B", "England", "South East");
        b.region = None;
        b.population_density = Some(2.5);
        vec![a, b]
    }

    #[test]
    fn test_every_record_contributes_one_row_with_every_column() {
        let records = sample_records();
        let cohort: Vec<_> = records.iter().collect();
        let manifest = ColumnManifest::clustering();
        let table = FeatureTable::build(&cohort, &manifest);

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns().len(),
            manifest.numeric.len() + manifest.categorical.len()
        );
        for column in table.columns() {
            assert_eq!(column.values.len(), 2, "column {}", column.key.id());
        }
    }

    #[test]
    fn test_absent_values_stay_missing() {
        let records = sample_records();
        let cohort: Vec<_> = records.iter().collect();
        let mut manifest = ColumnManifest::clustering();
        manifest.categorical.push(CategoricalColumn::Region);
        let table = FeatureTable::build(&cohort, &manifest);

        assert_eq!(table.numeric(Column::Retired).unwrap(), &[Some(10.0), None]);
        assert_eq!(
            table.numeric(Column::PartyVote(Party::Conservative)).unwrap(),
            &[None, None]
        );
        assert_eq!(table.get(1, "region"), Some(FeatureValue::Categorical(None)));
        assert_eq!(table.get(0, "region"), Some(FeatureValue::Categorical(Some("London"))));
        assert_eq!(table.get(0, "population_density"), Some(FeatureValue::Numeric(Some(80.0))));
        assert_eq!(table.get(0, "no_such_column"), None);
    }

    #[test]
    fn test_numeric_matrix_requires_complete_columns() {
        let records = sample_records();
        let cohort: Vec<_> = records.iter().collect();
        let manifest = ColumnManifest {
            numeric: vec![Column::PopulationDensity, Column::Retired],
            categorical: vec![],
        };
        let table = FeatureTable::build(&cohort, &manifest);
        assert_eq!(
            table.numeric_matrix(),
            Err(AnalyticsError::DataQuality {
                column: "retired_pct".into()
            })
        );

        let manifest = ColumnManifest {
            numeric: vec![Column::PopulationDensity],
            categorical: vec![CategoricalColumn::Region],
        };
        let matrix = FeatureTable::build(&cohort, &manifest).numeric_matrix().unwrap();
        assert_eq!(matrix.columns, vec![Column::PopulationDensity]);
        assert_eq!(matrix.rows, vec![vec![80.0], vec![2.5]]);
    }

    #[test]
    fn test_missing_votes_read_as_zero_only_for_party_columns() {
        let records = sample_records();
        let cohort: Vec<_> = records.iter().collect();
        let table = FeatureTable::build(&cohort, &ColumnManifest::clustering())
            .with_missing_votes_as_zero();

        assert_eq!(
            table.numeric(Column::PartyVote(Party::Labour)).unwrap(),
            &[Some(30.0), Some(0.0)]
        );
        assert_eq!(
            table.numeric(Column::PartyVote(Party::ScottishNationalParty)).unwrap(),
            &[Some(0.0), Some(0.0)]
        );
        assert_eq!(table.numeric(Column::Retired).unwrap(), &[Some(10.0), None]);
        assert_eq!(table.identities()[1].name, "B");
    }

    #[test]
    fn test_empty_cohort_builds_empty_table() {
        let table = FeatureTable::build(&[], &ColumnManifest::clustering());
        assert!(table.is_empty());
        assert_eq!(table.missing_count(), 0);
        assert!(table.numeric_matrix().unwrap().rows.is_empty());
    }
}
