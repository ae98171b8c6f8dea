//! Named analytic views over a record collection
//!
//! [`Analytics::compute_view`] is the single entry point used by presentation
//! code. Every call filters the records, recomputes whatever the requested
//! [`AnalysisKind`] needs from scratch, and returns a [`ResultBundle`] of
//! plain data. Nothing is cached between calls.
//!
//! # Example
//!
//! ```
//! use constituency_analytics::{
//!     config::AnalyticsConfig,
//!     view::{AnalysisKind, Analytics, PartyFilter, RowLimit, ViewFilter, ViewParams},
//! };
//! use constituency_model::{ConstituencyRecord, Party};
//!
//! let records = vec![
//!     ConstituencyRecord::new("A", "England", "London")
//!         .with_vote(Party::Labour, 300)
//!         .with_vote(Party::Conservative, 280),
//!     ConstituencyRecord::new("B", "England", "London")
//!         .with_vote(Party::Labour, 500)
//!         .with_vote(Party::Conservative, 100),
//! ];
//! let config = AnalyticsConfig::default();
//! let analytics = Analytics::new(&records, &config);
//!
//! let filter = ViewFilter {
//!     country: Some("England".into()),
//!     party: "Labour".parse()?,
//!     row_limit: RowLimit::All,
//!     ..ViewFilter::default()
//! };
//! let bundle =
//!     analytics.compute_view(&filter, AnalysisKind::ContestationTable, &ViewParams::default())?;
//!
//! assert_eq!(bundle.rows.len(), 2);
//! assert_eq!(bundle.rows[0].name, "A"); // closest contest first
//! # Ok::<(), constituency_analytics::AnalyticsError>(())
//! ```

use std::{fmt, num::NonZeroUsize, str::FromStr};

use constituency_model::{Column, ConstituencyRecord, Party};
use constituency_stats::{descriptive::DescriptiveStats, percentiles::Quartiles};
use serde::Serialize;

use crate::{
    config::{AnalyticsConfig, LabelingMode},
    contestation::{self, ContestationResult},
    error::AnalyticsError,
    feature_table::{ColumnManifest, FeatureTable},
    filter::RecordFilter,
    profile::{self, DemographicShare, RegionalTally},
    segment::{self, ClusterAssignment, SegmentLabel},
};

/// The views the facade can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Segment label per constituency and constituencies per segment.
    ClusterDistribution,
    /// Segments plus the distribution of a target variable within each.
    ClusterByVariable,
    /// Dominant/runner-up party and margins, closest contests first.
    ContestationTable,
    /// Party votes summed by region.
    RegionalVotes,
    /// Cohort mean of each census percentage.
    DemographicProfile,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 5] = [
        AnalysisKind::ClusterDistribution,
        AnalysisKind::ClusterByVariable,
        AnalysisKind::ContestationTable,
        AnalysisKind::RegionalVotes,
        AnalysisKind::DemographicProfile,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            AnalysisKind::ClusterDistribution => "cluster_distribution",
            AnalysisKind::ClusterByVariable => "cluster_by_variable",
            AnalysisKind::ContestationTable => "contestation_table",
            AnalysisKind::RegionalVotes => "regional_votes",
            AnalysisKind::DemographicProfile => "demographic_profile",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Accepts snake case, kebab case or camel case (`clusterByVariable`).
impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed = |s: &str| {
            s.chars()
                .filter(|c| *c != '_' && *c != '-')
                .collect::<String>()
                .to_ascii_lowercase()
        };
        let wanted = squashed(s.trim());
        AnalysisKind::ALL
            .into_iter()
            .find(|kind| squashed(kind.id()) == wanted)
            .ok_or_else(|| format!("unknown analysis kind '{s}'"))
    }
}

/// Restricts a contestation table to seats a party won or came second in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartyFilter {
    #[default]
    All,
    Party(Party),
}

impl PartyFilter {
    #[must_use]
    pub fn accepts(self, result: &ContestationResult) -> bool {
        match self {
            PartyFilter::All => true,
            PartyFilter::Party(party) => result.dominant == party || result.runner_up == party,
        }
    }
}

/// `All` or any party name, code or vote column id.
impl FromStr for PartyFilter {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(PartyFilter::All);
        }
        Ok(PartyFilter::Party(s.parse()?))
    }
}

/// Maximum number of rows returned in a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowLimit {
    #[default]
    All,
    First(NonZeroUsize),
}

impl RowLimit {
    fn truncate<T>(self, rows: &mut Vec<T>) {
        if let RowLimit::First(limit) = self {
            rows.truncate(limit.get());
        }
    }
}

/// `All` or a positive integer.
impl FromStr for RowLimit {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(RowLimit::All);
        }
        s.parse::<NonZeroUsize>()
            .map(RowLimit::First)
            .map_err(|_| AnalyticsError::InvalidFilter {
                value: s.to_owned(),
            })
    }
}

/// Which records and rows a view covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub country: Option<String>,
    pub region: Option<String>,
    pub party: PartyFilter,
    pub row_limit: RowLimit,
}

/// Presentation hints that do not change the cohort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    /// Column to expose as a per-row value for chart axes. Required by
    /// [`AnalysisKind::ClusterByVariable`].
    pub target_variable: Option<String>,
}

/// One constituency in a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    pub name: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<SegmentLabel>,
    /// Raw value of the target variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contestation: Option<ContestationResult>,
}

impl ViewRow {
    fn from_record(record: &ConstituencyRecord, target: Option<Column>) -> Self {
        Self {
            name: record.name.clone(),
            country: record.country.clone(),
            region: record.region.clone(),
            cluster_id: None,
            segment: None,
            target_value: target.and_then(|column| column.value(record)),
            contestation: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentCount {
    pub segment: SegmentLabel,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartyCount {
    pub party: Party,
    pub count: usize,
}

/// Distribution of the target variable inside one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentVariableStats {
    pub segment: SegmentLabel,
    pub count: usize,
    /// `None` when no constituency in the segment reports the variable.
    pub stats: Option<VariableStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub interquartile_range: f64,
}

impl VariableStats {
    fn new(values: &[f64]) -> Option<Self> {
        let stats = DescriptiveStats::new(values.iter().copied())?;
        let quartiles = Quartiles::new(values.iter().copied())?;
        Some(Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            p25: quartiles.p25,
            p50: quartiles.p50,
            p75: quartiles.p75,
            interquartile_range: quartiles.interquartile_range(),
        })
    }
}

/// How the segments of a view were obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterDiagnostics {
    pub labeling: LabelingMode,
    pub feature_columns: Vec<Column>,
    pub centroids: Vec<CentroidSummary>,
    pub inertia: f64,
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentroidSummary {
    pub cluster_id: usize,
    pub segment: SegmentLabel,
    /// Standardised coordinates, in `feature_columns` order.
    pub coordinates: Vec<f64>,
}

impl ClusterDiagnostics {
    fn new(assignment: &ClusterAssignment) -> Self {
        let centroids = assignment
            .fit
            .centroids
            .iter()
            .enumerate()
            .map(|(cluster_id, coordinates)| CentroidSummary {
                cluster_id,
                segment: assignment.cluster_labels[cluster_id],
                coordinates: coordinates.clone(),
            })
            .collect();
        Self {
            labeling: assignment.labeling,
            feature_columns: assignment.feature_columns.clone(),
            centroids,
            inertia: assignment.fit.inertia,
            iterations: assignment.fit.iterations,
        }
    }
}

/// Aggregates accompanying the rows of a view, computed before row truncation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewSummary {
    ClusterDistribution {
        segment_counts: Vec<SegmentCount>,
        diagnostics: Option<ClusterDiagnostics>,
    },
    ClusterByVariable {
        variable: Column,
        segments: Vec<SegmentVariableStats>,
        diagnostics: Option<ClusterDiagnostics>,
    },
    ContestationTable {
        dominant_party_counts: Vec<PartyCount>,
        runner_up_party_counts: Vec<PartyCount>,
    },
    RegionalVotes {
        regions: Vec<RegionalTally>,
    },
    DemographicProfile {
        shares: Vec<DemographicShare>,
    },
}

/// Everything a renderer needs for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBundle {
    pub kind: AnalysisKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_variable: Option<Column>,
    /// Records in the cohort the summary describes, before row truncation.
    pub cohort_size: usize,
    pub rows: Vec<ViewRow>,
    pub summary: ViewSummary,
}

impl ResultBundle {
    /// The filters matched nothing. This is a valid, empty result.
    #[must_use]
    pub fn is_empty_cohort(&self) -> bool {
        self.cohort_size == 0
    }
}

/// Computes views over a borrowed, read-only record collection.
#[derive(Debug, Clone, Copy)]
pub struct Analytics<'a> {
    records: &'a [ConstituencyRecord],
    config: &'a AnalyticsConfig,
}

impl<'a> Analytics<'a> {
    #[must_use]
    pub fn new(records: &'a [ConstituencyRecord], config: &'a AnalyticsConfig) -> Self {
        Self { records, config }
    }

    /// Computes one view.
    ///
    /// Fails with [`AnalyticsError::InvalidColumn`] for an unknown target
    /// variable (or a missing one for [`AnalysisKind::ClusterByVariable`]) and
    /// with [`AnalyticsError::DataQuality`] when a clustering column has no
    /// value anywhere in the cohort. A filter matching nothing is not an
    /// error: see [`ResultBundle::is_empty_cohort`].
    pub fn compute_view(
        &self,
        filter: &ViewFilter,
        kind: AnalysisKind,
        params: &ViewParams,
    ) -> Result<ResultBundle, AnalyticsError> {
        let target = params
            .target_variable
            .as_deref()
            .map(str::parse::<Column>)
            .transpose()?;
        if kind == AnalysisKind::ClusterByVariable && target.is_none() {
            return Err(AnalyticsError::InvalidColumn {
                name: String::new(),
            });
        }

        let record_filter = RecordFilter {
            country: filter.country.clone(),
            region: filter.region.clone(),
        };
        let cohort = record_filter.apply(self.records);

        let mut bundle = match kind {
            AnalysisKind::ClusterDistribution | AnalysisKind::ClusterByVariable => {
                self.segment_view(&cohort, kind, target)?
            }
            AnalysisKind::ContestationTable => contestation_view(&cohort, filter.party, target)?,
            AnalysisKind::RegionalVotes => regional_view(&cohort, filter.party, target),
            AnalysisKind::DemographicProfile => demographic_view(&cohort, target),
        };
        filter.row_limit.truncate(&mut bundle.rows);

        if bundle.is_empty_cohort() {
            log::info!("{kind} view: empty cohort for {filter:?}");
        } else {
            log::info!(
                "{kind} view: {} constituencies, {} rows returned",
                bundle.cohort_size,
                bundle.rows.len()
            );
        }
        Ok(bundle)
    }

    fn segment_view(
        &self,
        cohort: &[&ConstituencyRecord],
        kind: AnalysisKind,
        target: Option<Column>,
    ) -> Result<ResultBundle, AnalyticsError> {
        let assignment = if cohort.is_empty() {
            None
        } else {
            Some(segment::segment_cohort(cohort, self.config)?)
        };

        let mut rows = contested_rows(cohort, target)?;
        if let Some(assignment) = &assignment {
            for ((row, &cluster_id), &segment) in rows
                .iter_mut()
                .zip(&assignment.cluster_ids)
                .zip(&assignment.labels)
            {
                row.cluster_id = Some(cluster_id);
                row.segment = Some(segment);
            }
        }

        let diagnostics = assignment.as_ref().map(ClusterDiagnostics::new);
        let summary = match (kind, target) {
            (AnalysisKind::ClusterByVariable, Some(variable)) => ViewSummary::ClusterByVariable {
                variable,
                segments: segment_variable_stats(&rows),
                diagnostics,
            },
            _ => ViewSummary::ClusterDistribution {
                segment_counts: assignment
                    .as_ref()
                    .map_or_else(
                        || SegmentLabel::ALL.map(|segment| (segment, 0)),
                        ClusterAssignment::counts,
                    )
                    .into_iter()
                    .map(|(segment, count)| SegmentCount { segment, count })
                    .collect(),
                diagnostics,
            },
        };

        Ok(ResultBundle {
            kind,
            target_variable: target,
            cohort_size: cohort.len(),
            rows,
            summary,
        })
    }
}

fn segment_variable_stats(rows: &[ViewRow]) -> Vec<SegmentVariableStats> {
    SegmentLabel::ALL
        .iter()
        .map(|&segment| {
            let members = rows
                .iter()
                .filter(|r| r.segment == Some(segment))
                .collect::<Vec<_>>();
            let values = members
                .iter()
                .filter_map(|r| r.target_value)
                .collect::<Vec<_>>();
            SegmentVariableStats {
                segment,
                count: members.len(),
                stats: VariableStats::new(&values),
            }
        })
        .collect()
}

fn contestation_view(
    cohort: &[&ConstituencyRecord],
    party: PartyFilter,
    target: Option<Column>,
) -> Result<ResultBundle, AnalyticsError> {
    let mut rows = contested_rows(cohort, target)?;

    // counts cover the whole cohort, before the party filter
    let count_by = |pick: fn(&ContestationResult) -> Party| {
        Party::ALL
            .iter()
            .map(|&party| PartyCount {
                party,
                count: rows
                    .iter()
                    .filter_map(|r| r.contestation.as_ref())
                    .filter(|c| pick(c) == party)
                    .count(),
            })
            .collect::<Vec<_>>()
    };
    let summary = ViewSummary::ContestationTable {
        dominant_party_counts: count_by(|c| c.dominant),
        runner_up_party_counts: count_by(|c| c.runner_up),
    };

    rows.retain(|row| row.contestation.as_ref().is_some_and(|c| party.accepts(c)));
    // stable: equal margins keep source order
    rows.sort_by(|a, b| margin_of(a).total_cmp(&margin_of(b)));

    Ok(ResultBundle {
        kind: AnalysisKind::ContestationTable,
        target_variable: target,
        cohort_size: cohort.len(),
        rows,
        summary,
    })
}

/// One row per cohort record, in cohort order, with its contestation attached.
fn contested_rows(
    cohort: &[&ConstituencyRecord],
    target: Option<Column>,
) -> Result<Vec<ViewRow>, AnalyticsError> {
    let table = FeatureTable::build(cohort, &ColumnManifest::contestation());
    let results = contestation::analyze(&table)?;
    Ok(cohort
        .iter()
        .zip(results)
        .map(|(record, result)| ViewRow {
            contestation: Some(result),
            ..ViewRow::from_record(record, target)
        })
        .collect())
}

fn margin_of(row: &ViewRow) -> f64 {
    row.contestation
        .as_ref()
        .map_or(f64::INFINITY, |c| c.percentage_margin)
}

fn regional_view(
    cohort: &[&ConstituencyRecord],
    party: PartyFilter,
    target: Option<Column>,
) -> ResultBundle {
    let parties = match party {
        PartyFilter::All => Party::ALL.to_vec(),
        PartyFilter::Party(party) => vec![party],
    };
    ResultBundle {
        kind: AnalysisKind::RegionalVotes,
        target_variable: target,
        cohort_size: cohort.len(),
        rows: cohort
            .iter()
            .map(|record| ViewRow::from_record(record, target))
            .collect(),
        summary: ViewSummary::RegionalVotes {
            regions: profile::regional_tallies(cohort, &parties),
        },
    }
}

fn demographic_view(cohort: &[&ConstituencyRecord], target: Option<Column>) -> ResultBundle {
    ResultBundle {
        kind: AnalysisKind::DemographicProfile,
        target_variable: target,
        cohort_size: cohort.len(),
        rows: cohort
            .iter()
            .map(|record| ViewRow::from_record(record, target))
            .collect(),
        summary: ViewSummary::DemographicProfile {
            shares: profile::demographic_profile(cohort),
        },
    }
}
