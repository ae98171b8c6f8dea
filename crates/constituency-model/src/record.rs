use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Party;

/// One electoral constituency as supplied by the data-access layer.
///
/// Every numeric attribute may be absent. A party missing from `votes` means
/// the source had no figure for that party.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstituencyRecord {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,

    /// Turnout in percent.
    #[serde(default)]
    pub turnout: Option<f64>,
    /// Vote counts per party.
    #[serde(default)]
    pub votes: BTreeMap<Party, u64>,
    /// Total votes cast, as reported by the source.
    #[serde(default)]
    pub total_votes: Option<u64>,

    /// Residents per hectare.
    #[serde(default)]
    pub population_density: Option<f64>,
    #[serde(default)]
    pub female_pct: Option<f64>,
    #[serde(default)]
    pub full_time_student_pct: Option<f64>,
    #[serde(default)]
    pub retired_pct: Option<f64>,
    #[serde(default)]
    pub home_owned_pct: Option<f64>,
    #[serde(default)]
    pub married_pct: Option<f64>,
}

impl ConstituencyRecord {
    /// Creates a record with identity only; every numeric attribute is absent.
    #[must_use]
    pub fn new(name: impl Into<String>, country: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            region: Some(region.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_vote(mut self, party: Party, votes: u64) -> Self {
        self.votes.insert(party, votes);
        self
    }

    /// Vote count for `party`, `None` when the source has no figure.
    #[must_use]
    pub fn vote(&self, party: Party) -> Option<u64> {
        self.votes.get(&party).copied()
    }

    /// Vote counts in enumeration order with missing figures read as zero votes.
    #[must_use]
    pub fn votes_or_zero(&self) -> [u64; Party::LEN] {
        Party::ALL.map(|party| self.vote(party).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_record() {
        let json = r#"{
            "name": "Ceredigion",
            "country": "Wales",
            "votes": { "Plaid Cymru": 15208, "Liberal Democrats": 8882 },
            "retired_pct": 18.5
        }"#;
        let record: ConstituencyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Ceredigion");
        assert_eq!(record.region, None);
        assert_eq!(record.vote(Party::PlaidCymru), Some(15208));
        assert_eq!(record.vote(Party::Conservative), None);
        assert_eq!(record.retired_pct, Some(18.5));
        assert_eq!(record.turnout, None);
    }

    #[test]
    fn test_votes_or_zero_follows_enumeration_order() {
        let record = ConstituencyRecord::new("X", "England", "London")
            .with_vote(Party::Green, 7)
            .with_vote(Party::Conservative, 3);
        let votes = record.votes_or_zero();
        assert_eq!(votes[Party::Conservative.index()], 3);
        assert_eq!(votes[Party::Green.index()], 7);
        assert_eq!(votes.iter().sum::<u64>(), 10);
    }

    #[test]
    fn test_serialize_round_trips_party_keys() {
        let record = ConstituencyRecord::new("Y", "Scotland", "Highlands")
            .with_vote(Party::ScottishNationalParty, 100);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"Scottish National Party\":100"), "{json}");
        let back: ConstituencyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
