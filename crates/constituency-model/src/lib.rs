//! Constituency records and the fixed vocabularies used to describe them.
//!
//! - [`Party`] - The fixed, ordered enumeration of parties with vote columns
//! - [`ConstituencyRecord`] - One electoral constituency with census attributes
//! - [`Column`] / [`CategoricalColumn`] - Named attributes that analyses can select
//!
//! Records are read-only inputs: they come from an external data-access layer
//! (usually as JSON) and are never mutated by analysis code.
//!
//! # Example
//!
//! ```
//! use constituency_model::{Column, ConstituencyRecord, Party};
//!
//! let record = ConstituencyRecord::new("Bath", "England", "South West")
//!     .with_vote(Party::LiberalDemocrats, 28_419)
//!     .with_vote(Party::Conservative, 16_097);
//!
//! assert_eq!(record.vote(Party::LiberalDemocrats), Some(28_419));
//! assert_eq!(record.vote(Party::Labour), None);
//! assert_eq!(Column::PartyVote(Party::Conservative).value(&record), Some(16_097.0));
//! ```

pub use self::{column::*, party::*, record::*};

mod column;
mod party;
mod record;
