//! Dominant party, runner-up and margin of victory per constituency
//!
//! Works on raw vote counts only. A party without a recorded figure counts as
//! zero votes: at the source, "no data" and "no votes" look the same.

use constituency_model::{Column, Party};
use serde::Serialize;

use crate::{error::AnalyticsError, feature_table::FeatureTable};

/// How closely one constituency was contested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContestationResult {
    /// Party with the most votes (first in enumeration order on ties).
    pub dominant: Party,
    /// Party with the most votes once the dominant party is set aside.
    pub runner_up: Party,
    /// Dominant votes minus runner-up votes.
    pub absolute_margin: u64,
    /// Sum of the votes of every enumerated party, saturating at `u64::MAX`.
    pub total_votes: u64,
    /// `absolute_margin / total_votes * 100`, rounded to 3 decimals; 0 when no votes were recorded.
    pub percentage_margin: f64,
}

impl ContestationResult {
    /// Computes the contestation of one constituency from votes in enumeration order.
    ///
    /// # Example
    ///
    /// ```
    /// use constituency_analytics::contestation::ContestationResult;
    /// use constituency_model::Party;
    ///
    /// let mut votes = [0; Party::LEN];
    /// votes[Party::Conservative.index()] = 100;
    /// votes[Party::Labour.index()] = 100;
    /// votes[Party::LiberalDemocrats.index()] = 100;
    ///
    /// let result = ContestationResult::from_votes(&votes);
    /// assert_eq!(result.dominant, Party::Conservative);
    /// assert_eq!(result.runner_up, Party::Labour);
    /// assert_eq!(result.absolute_margin, 0);
    /// assert_eq!(result.percentage_margin, 0.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_votes(votes: &[u64; Party::LEN]) -> Self {
        let dominant = leading_party(votes, None);
        let runner_up = leading_party(votes, Some(dominant));
        let dominant_votes = votes[dominant.index()];
        let runner_up_votes = votes[runner_up.index()];
        let absolute_margin = dominant_votes - runner_up_votes;
        let total_votes = votes.iter().copied().fold(0, u64::saturating_add);
        let percentage_margin = if total_votes > 0 {
            round_to_3_decimals(absolute_margin as f64 / total_votes as f64 * 100.0)
        } else {
            0.0
        };
        Self {
            dominant,
            runner_up,
            absolute_margin,
            total_votes,
            percentage_margin,
        }
    }
}

/// Party with the most votes, skipping `excluded`. Earlier parties win ties.
fn leading_party(votes: &[u64; Party::LEN], excluded: Option<Party>) -> Party {
    let mut candidates = Party::ALL.into_iter().filter(|p| Some(*p) != excluded);
    // Party::LEN >= 2, so there is always at least one candidate left
    let mut best = candidates.next().unwrap_or(Party::Conservative);
    for party in candidates {
        if votes[party.index()] > votes[best.index()] {
            best = party;
        }
    }
    best
}

fn round_to_3_decimals(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Computes a [`ContestationResult`] for every row of a table holding the
/// party vote columns (see [`ColumnManifest::contestation`]).
///
/// Fails with [`AnalyticsError::InvalidColumn`] if a party column is absent
/// from the table.
///
/// [`ColumnManifest::contestation`]: crate::feature_table::ColumnManifest::contestation
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn analyze(table: &FeatureTable) -> Result<Vec<ContestationResult>, AnalyticsError> {
    let columns = Party::ALL
        .iter()
        .map(|&party| {
            let column = Column::PartyVote(party);
            table.numeric(column).ok_or_else(|| AnalyticsError::InvalidColumn {
                name: column.id().to_owned(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let results = (0..table.len())
        .map(|row| {
            let votes: [u64; Party::LEN] =
                std::array::from_fn(|i| columns[i][row].map_or(0, |v| v.max(0.0).round() as u64));
            ContestationResult::from_votes(&votes)
        })
        .collect::<Vec<_>>();

    let without_votes = results.iter().filter(|r| r.total_votes == 0).count();
    if without_votes > 0 {
        log::warn!("{without_votes} constituencies have no recorded party votes; margin set to 0");
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use constituency_model::ConstituencyRecord;

    use super::*;
    use crate::feature_table::ColumnManifest;

    fn votes(pairs: &[(Party, u64)]) -> [u64; Party::LEN] {
        let mut votes = [0; Party::LEN];
        for (party, count) in pairs {
            votes[party.index()] = *count;
        }
        votes
    }

    #[test]
    fn test_clear_winner() {
        let result = ContestationResult::from_votes(&votes(&[
            (Party::Labour, 20_000),
            (Party::Conservative, 15_000),
            (Party::Green, 5_000),
        ]));
        assert_eq!(result.dominant, Party::Labour);
        assert_eq!(result.runner_up, Party::Conservative);
        assert_eq!(result.absolute_margin, 5_000);
        assert_eq!(result.total_votes, 40_000);
        assert_eq!(result.percentage_margin, 12.5);
    }

    #[test]
    fn test_rounds_to_three_decimals() {
        let result = ContestationResult::from_votes(&votes(&[
            (Party::ScottishNationalParty, 2),
            (Party::Labour, 1),
        ]));
        assert_eq!(result.percentage_margin, 33.333);
    }

    #[test]
    fn test_no_votes_has_zero_margin() {
        let result = ContestationResult::from_votes(&[0; Party::LEN]);
        assert_eq!(result.total_votes, 0);
        assert_eq!(result.percentage_margin, 0.0);
        assert_eq!(result.dominant, Party::Conservative);
        assert_eq!(result.runner_up, Party::Labour);
    }

    #[test]
    fn test_extreme_counts_saturate_the_total() {
        let result = ContestationResult::from_votes(&votes(&[
            (Party::Labour, u64::MAX),
            (Party::Conservative, u64::MAX - 10),
            (Party::Green, 5),
        ]));
        assert_eq!(result.dominant, Party::Labour);
        assert_eq!(result.absolute_margin, 10);
        assert_eq!(result.total_votes, u64::MAX);
        assert!((0.0..=100.0).contains(&result.percentage_margin));
    }

    #[test]
    fn test_tie_for_second_place_goes_to_earlier_party() {
        let result = ContestationResult::from_votes(&votes(&[
            (Party::PlaidCymru, 50),
            (Party::Green, 10),
            (Party::LiberalDemocrats, 10),
        ]));
        assert_eq!(result.dominant, Party::PlaidCymru);
        assert_eq!(result.runner_up, Party::LiberalDemocrats);
    }

    #[test]
    fn test_invariants_hold_for_varied_inputs() {
        let mut state = 17_u64;
        for _ in 0..200 {
            let v: [u64; Party::LEN] = std::array::from_fn(|_| {
                state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                (state >> 33) % 1_000
            });
            let r = ContestationResult::from_votes(&v);
            assert!(v[r.dominant.index()] >= v[r.runner_up.index()]);
            assert!(r.absolute_margin <= r.total_votes);
            assert!((0.0..=100.0).contains(&r.percentage_margin));
            assert_ne!(r.dominant, r.runner_up);
        }
    }

    #[test]
    fn test_analyze_treats_missing_votes_as_zero() {
        let records = vec![
            ConstituencyRecord::new("A", "Wales", "Wales")
                .with_vote(Party::PlaidCymru, 300)
                .with_vote(Party::Labour, 100),
            ConstituencyRecord::new("B", "Wales", "Wales"),
        ];
        let cohort: Vec<_> = records.iter().collect();
        let table = FeatureTable::build(&cohort, &ColumnManifest::contestation());
        let results = analyze(&table).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].dominant, Party::PlaidCymru);
        assert_eq!(results[0].runner_up, Party::Labour);
        assert_eq!(results[0].percentage_margin, 50.0);
        assert_eq!(results[1].total_votes, 0);
        assert_eq!(results[1].percentage_margin, 0.0);
    }

    #[test]
    fn test_analyze_requires_party_columns() {
        let records = vec![ConstituencyRecord::new("A", "Wales", "Wales")];
        let cohort: Vec<_> = records.iter().collect();
        let manifest = ColumnManifest {
            numeric: vec![Column::TotalVotes],
            categorical: vec![],
        };
        let table = FeatureTable::build(&cohort, &manifest);
        assert_eq!(
            analyze(&table),
            Err(AnalyticsError::InvalidColumn {
                name: "con_vote".into()
            })
        );
    }
}
