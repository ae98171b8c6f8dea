use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::{ConstituencyRecord, Party};

/// A numeric attribute of a [`ConstituencyRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Turnout,
    PartyVote(Party),
    TotalVotes,
    PopulationDensity,
    Female,
    FullTimeStudent,
    Retired,
    HomeOwned,
    Married,
}

/// A categorical attribute of a [`ConstituencyRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalColumn {
    Region,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown column '{name}'")]
pub struct UnknownColumnError {
    pub name: String,
}

impl Column {
    /// The five census percentage columns, in reporting order.
    pub const DEMOGRAPHIC_PERCENTAGES: [Column; 5] = [
        Column::Female,
        Column::FullTimeStudent,
        Column::Retired,
        Column::HomeOwned,
        Column::Married,
    ];

    /// Every numeric column: electoral first, then demographic.
    #[must_use]
    pub fn all() -> Vec<Column> {
        let mut columns = vec![Column::Turnout];
        columns.extend(Party::ALL.map(Column::PartyVote));
        columns.push(Column::TotalVotes);
        columns.push(Column::PopulationDensity);
        columns.extend(Self::DEMOGRAPHIC_PERCENTAGES);
        columns
    }

    /// Stable identifier used in requests and output tables.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Column::Turnout => "turnout",
            Column::PartyVote(party) => party.vote_column_id(),
            Column::TotalVotes => "total_votes",
            Column::PopulationDensity => "population_density",
            Column::Female => "female_pct",
            Column::FullTimeStudent => "full_time_student_pct",
            Column::Retired => "retired_pct",
            Column::HomeOwned => "home_owned_pct",
            Column::Married => "married_pct",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Column::Turnout => "Turnout (%)".to_owned(),
            Column::PartyVote(party) => format!("{party} votes"),
            Column::TotalVotes => "Total votes".to_owned(),
            Column::PopulationDensity => "Population density".to_owned(),
            Column::Female => "Female (%)".to_owned(),
            Column::FullTimeStudent => "Full-time student (%)".to_owned(),
            Column::Retired => "Retired (%)".to_owned(),
            Column::HomeOwned => "Home owned (%)".to_owned(),
            Column::Married => "Married (%)".to_owned(),
        }
    }

    /// Reads this attribute from a record without any coercion.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn value(self, record: &ConstituencyRecord) -> Option<f64> {
        match self {
            Column::Turnout => record.turnout,
            Column::PartyVote(party) => record.vote(party).map(|v| v as f64),
            Column::TotalVotes => record.total_votes.map(|v| v as f64),
            Column::PopulationDensity => record.population_density,
            Column::Female => record.female_pct,
            Column::FullTimeStudent => record.full_time_student_pct,
            Column::Retired => record.retired_pct,
            Column::HomeOwned => record.home_owned_pct,
            Column::Married => record.married_pct,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Column {
    type Err = UnknownColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Column::all()
            .into_iter()
            .find(|column| column.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownColumnError { name: s.to_owned() })
    }
}

impl Serialize for Column {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.id())
    }
}

impl CategoricalColumn {
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            CategoricalColumn::Region => "region",
        }
    }

    #[must_use]
    pub fn value(self, record: &ConstituencyRecord) -> Option<&str> {
        match self {
            CategoricalColumn::Region => record.region.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_ids_are_unique_and_parse_back() {
        let columns = Column::all();
        assert_eq!(columns.len(), 1 + Party::LEN + 1 + 1 + 5);
        for column in &columns {
            assert_eq!(column.id().parse::<Column>(), Ok(*column));
            let same_id = columns.iter().filter(|c| c.id() == column.id()).count();
            assert_eq!(same_id, 1, "duplicate column id {column}");
        }
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let err = "shoe_size".parse::<Column>().unwrap_err();
        assert_eq!(err.name, "shoe_size");
    }

    #[test]
    fn test_value_reads_without_coercion() {
        let mut record = ConstituencyRecord::new("Z", "England", "North East").with_vote(Party::Labour, 12);
        record.married_pct = Some(44.5);
        assert_eq!(Column::PartyVote(Party::Labour).value(&record), Some(12.0));
        assert_eq!(Column::PartyVote(Party::Brexit).value(&record), None);
        assert_eq!(Column::Married.value(&record), Some(44.5));
        assert_eq!(Column::Turnout.value(&record), None);
        assert_eq!(CategoricalColumn::Region.value(&record), Some("North East"));
    }
}
