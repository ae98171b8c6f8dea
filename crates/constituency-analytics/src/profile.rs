//! Cohort-level aggregates: vote tallies by region and the demographic profile.

use constituency_model::{Column, ConstituencyRecord, Party};
use serde::Serialize;

/// Region name used for records that carry none.
pub const UNKNOWN_REGION: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyTally {
    pub party: Party,
    pub votes: u64,
}

/// Summed votes of one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionalTally {
    pub region: String,
    pub constituencies: usize,
    /// One entry per selected party, in enumeration order. Missing figures count as 0.
    pub parties: Vec<PartyTally>,
    /// Sum of the reported totals. Missing totals count as 0.
    pub total_votes: u64,
}

/// Sums party votes per region, regions in first-seen order.
///
/// `parties` selects which parties to tally; pass [`Party::ALL`] for all of them.
#[must_use]
pub fn regional_tallies(cohort: &[&ConstituencyRecord], parties: &[Party]) -> Vec<RegionalTally> {
    let mut tallies: Vec<RegionalTally> = vec![];
    for record in cohort {
        let region = record.region.as_deref().unwrap_or(UNKNOWN_REGION);
        let index = if let Some(index) = tallies.iter().position(|t| t.region == region) {
            index
        } else {
            tallies.push(RegionalTally {
                region: region.to_owned(),
                constituencies: 0,
                parties: parties
                    .iter()
                    .map(|&party| PartyTally { party, votes: 0 })
                    .collect(),
                total_votes: 0,
            });
            tallies.len() - 1
        };
        let tally = &mut tallies[index];
        tally.constituencies += 1;
        for party_tally in &mut tally.parties {
            party_tally.votes = party_tally
                .votes
                .saturating_add(record.vote(party_tally.party).unwrap_or(0));
        }
        tally.total_votes = tally
            .total_votes
            .saturating_add(record.total_votes.unwrap_or(0));
    }
    tallies
}

/// Share of the cohort reporting one census attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicShare {
    pub column: Column,
    pub label: String,
    /// Cohort mean of the reported percentage, 1 decimal. `None` if nobody reported it.
    pub reported: Option<f64>,
    /// `100 - reported`, 1 decimal.
    pub complement: Option<f64>,
}

/// Mean of each census percentage over the cohort and its complement.
///
/// # Example
///
/// ```
/// use constituency_analytics::profile::demographic_profile;
/// use constituency_model::{Column, ConstituencyRecord};
///
/// let mut a = ConstituencyRecord::new("A", "Wales", "Wales");
/// a.retired_pct = Some(20.0);
/// let mut b = ConstituencyRecord::new("B", "Wales", "Wales");
/// b.retired_pct = Some(25.0);
///
/// let profile = demographic_profile(&[&a, &b]);
/// let retired = profile.iter().find(|s| s.column == Column::Retired).unwrap();
/// assert_eq!(retired.reported, Some(22.5));
/// assert_eq!(retired.complement, Some(77.5));
/// ```
#[must_use]
pub fn demographic_profile(cohort: &[&ConstituencyRecord]) -> Vec<DemographicShare> {
    Column::DEMOGRAPHIC_PERCENTAGES
        .iter()
        .map(|&column| {
            let values = cohort
                .iter()
                .filter_map(|record| column.value(record))
                .collect::<Vec<_>>();
            let reported = constituency_stats::descriptive::mean_and_std_dev(&values)
                .map(|(mean, _)| round_to_1_decimal(mean));
            DemographicShare {
                column,
                label: column.label(),
                reported,
                complement: reported.map(|value| round_to_1_decimal(100.0 - value)),
            }
        })
        .collect()
}

fn round_to_1_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
