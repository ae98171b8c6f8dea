use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A party with its own vote column in the source records.
///
/// The declaration order is the enumeration order. It is significant: ties
/// between parties are always broken in favour of the party declared first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Party {
    #[serde(rename = "Conservative")]
    Conservative = 0,
    #[serde(rename = "Labour")]
    Labour = 1,
    #[serde(rename = "Liberal Democrats")]
    LiberalDemocrats = 2,
    #[serde(rename = "Scottish National Party")]
    ScottishNationalParty = 3,
    #[serde(rename = "Plaid Cymru")]
    PlaidCymru = 4,
    #[serde(rename = "UKIP")]
    Ukip = 5,
    #[serde(rename = "Green")]
    Green = 6,
    #[serde(rename = "Brexit")]
    Brexit = 7,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown party '{name}'")]
pub struct UnknownPartyError {
    pub name: String,
}

impl Party {
    /// Number of parties (8).
    pub const LEN: usize = 8;

    /// All parties in enumeration order.
    pub const ALL: [Party; Party::LEN] = [
        Party::Conservative,
        Party::Labour,
        Party::LiberalDemocrats,
        Party::ScottishNationalParty,
        Party::PlaidCymru,
        Party::Ukip,
        Party::Green,
        Party::Brexit,
    ];

    /// Position of this party in [`Party::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable party name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Party::Conservative => "Conservative",
            Party::Labour => "Labour",
            Party::LiberalDemocrats => "Liberal Democrats",
            Party::ScottishNationalParty => "Scottish National Party",
            Party::PlaidCymru => "Plaid Cymru",
            Party::Ukip => "UKIP",
            Party::Green => "Green",
            Party::Brexit => "Brexit",
        }
    }

    /// Short code, also used as the prefix of the vote column id.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Party::Conservative => "con",
            Party::Labour => "lab",
            Party::LiberalDemocrats => "ld",
            Party::ScottishNationalParty => "snp",
            Party::PlaidCymru => "pc",
            Party::Ukip => "ukip",
            Party::Green => "green",
            Party::Brexit => "brexit",
        }
    }

    /// Id of the vote-count column for this party (e.g. `con_vote`).
    #[must_use]
    pub const fn vote_column_id(self) -> &'static str {
        match self {
            Party::Conservative => "con_vote",
            Party::Labour => "lab_vote",
            Party::LiberalDemocrats => "ld_vote",
            Party::ScottishNationalParty => "snp_vote",
            Party::PlaidCymru => "pc_vote",
            Party::Ukip => "ukip_vote",
            Party::Green => "green_vote",
            Party::Brexit => "brexit_vote",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the display name, the short code or the vote column id, ignoring ASCII case.
impl FromStr for Party {
    type Err = UnknownPartyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Party::ALL
            .into_iter()
            .find(|party| {
                [party.name(), party.code(), party.vote_column_id()]
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| UnknownPartyError { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_order_matches_index() {
        for (i, party) in Party::ALL.iter().enumerate() {
            assert_eq!(party.index(), i, "{party} is out of order");
        }
        assert!(Party::Conservative < Party::Labour);
        assert!(Party::Labour < Party::LiberalDemocrats);
    }

    #[test]
    fn test_parse_accepts_names_codes_and_column_ids() {
        assert_eq!("Liberal Democrats".parse::<Party>(), Ok(Party::LiberalDemocrats));
        assert_eq!("liberal democrats".parse::<Party>(), Ok(Party::LiberalDemocrats));
        assert_eq!("SNP".parse::<Party>(), Ok(Party::ScottishNationalParty));
        assert_eq!("green_vote".parse::<Party>(), Ok(Party::Green));
        assert_eq!(" Labour ".parse::<Party>(), Ok(Party::Labour));
    }

    #[test]
    fn test_parse_rejects_unknown_party() {
        let err = "Monster Raving Loony".parse::<Party>().unwrap_err();
        assert_eq!(err.name, "Monster Raving Loony");
        assert_eq!(err.to_string(), "unknown party 'Monster Raving Loony'");
    }
}
