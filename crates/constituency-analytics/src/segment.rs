//! Demographic segments
//!
//! Turns a standardised cohort matrix into a [`ClusterAssignment`]: a k-means
//! fit with exactly [`SegmentLabel::LEN`] clusters and one human-readable
//! [`SegmentLabel`] per row.
//!
//! # Labelling
//!
//! With [`LabelingMode::ClusterId`] the label is a fixed lookup on the numeric
//! cluster id (`0 => Older, rural`, `1 => Urban, young`, ...). Cluster ids are
//! not anchored to any demographic meaning, so the same label can describe a
//! different kind of constituency in a different cohort.
//!
//! With [`LabelingMode::DensityRank`] clusters are ranked by the population
//! density of their centroid and labelled by rank, lowest density first:
//! `Older, rural`, `Suburban families`, `Mixed with distinct features`,
//! `Specialised (uni/industrial)`, `Urban, young`.

use std::fmt;

use constituency_model::{Column, ConstituencyRecord};
use serde::{Deserialize, Serialize};

use crate::{
    clustering::{ClusterFit, KMeans},
    config::{AnalyticsConfig, LabelingMode},
    error::AnalyticsError,
    feature_table::{ColumnManifest, FeatureMatrix, FeatureTable},
    imputer,
    normalization::Standardizer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SegmentLabel {
    #[serde(rename = "Older, rural")]
    OlderRural = 0,
    #[serde(rename = "Urban, young")]
    UrbanYoung = 1,
    #[serde(rename = "Suburban families")]
    SuburbanFamilies = 2,
    #[serde(rename = "Specialised (uni/industrial)")]
    Specialised = 3,
    #[serde(rename = "Mixed with distinct features")]
    MixedWithDistinctFeatures = 4,
}

impl SegmentLabel {
    pub const LEN: usize = 5;

    /// Labels in cluster-id order.
    pub const ALL: [SegmentLabel; SegmentLabel::LEN] = [
        SegmentLabel::OlderRural,
        SegmentLabel::UrbanYoung,
        SegmentLabel::SuburbanFamilies,
        SegmentLabel::Specialised,
        SegmentLabel::MixedWithDistinctFeatures,
    ];

    /// Labels by ascending centroid population density.
    pub const BY_DENSITY_RANK: [SegmentLabel; SegmentLabel::LEN] = [
        SegmentLabel::OlderRural,
        SegmentLabel::SuburbanFamilies,
        SegmentLabel::MixedWithDistinctFeatures,
        SegmentLabel::Specialised,
        SegmentLabel::UrbanYoung,
    ];

    #[must_use]
    pub fn from_cluster_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SegmentLabel::OlderRural => "Older, rural",
            SegmentLabel::UrbanYoung => "Urban, young",
            SegmentLabel::SuburbanFamilies => "Suburban families",
            SegmentLabel::Specialised => "Specialised (uni/industrial)",
            SegmentLabel::MixedWithDistinctFeatures => "Mixed with distinct features",
        }
    }
}

impl fmt::Display for SegmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row-to-segment mapping for one cohort, with the fit behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    /// Numeric cluster id per row.
    pub cluster_ids: Vec<usize>,
    /// Segment label per row.
    pub labels: Vec<SegmentLabel>,
    /// Segment label per cluster id.
    pub cluster_labels: Vec<SegmentLabel>,
    /// Columns of the (standardised) space the centroids live in.
    pub feature_columns: Vec<Column>,
    pub fit: ClusterFit,
    /// Mode actually used; may differ from the requested one when density is not a feature.
    pub labeling: LabelingMode,
}

impl ClusterAssignment {
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Rows per segment, in [`SegmentLabel::ALL`] order, zero counts included.
    #[must_use]
    pub fn counts(&self) -> [(SegmentLabel, usize); SegmentLabel::LEN] {
        SegmentLabel::ALL.map(|segment| {
            let count = self.labels.iter().filter(|l| **l == segment).count();
            (segment, count)
        })
    }
}

/// Clusters a standardised matrix into segments.
#[must_use]
pub fn assign_segments(normalized: &FeatureMatrix, config: &AnalyticsConfig) -> ClusterAssignment {
    let fit = KMeans::new(SegmentLabel::LEN, config.clustering.clone()).fit(&normalized.rows);
    let (cluster_labels, labeling) = label_clusters(&fit, normalized, config.labeling);
    let labels = fit
        .assignments
        .iter()
        .map(|&cluster| cluster_labels[cluster])
        .collect();
    ClusterAssignment {
        cluster_ids: fit.assignments.clone(),
        labels,
        cluster_labels,
        feature_columns: normalized.columns.clone(),
        fit,
        labeling,
    }
}

fn label_clusters(
    fit: &ClusterFit,
    normalized: &FeatureMatrix,
    mode: LabelingMode,
) -> (Vec<SegmentLabel>, LabelingMode) {
    let by_id = || {
        (0..fit.centroids.len())
            .map(|id| SegmentLabel::ALL[id % SegmentLabel::LEN])
            .collect::<Vec<_>>()
    };
    match mode {
        LabelingMode::ClusterId => (by_id(), LabelingMode::ClusterId),
        LabelingMode::DensityRank => {
            let Some(density) = normalized.column_index(Column::PopulationDensity) else {
                log::warn!("population density is not a clustering feature; labelling by cluster id");
                return (by_id(), LabelingMode::ClusterId);
            };
            let mut order = (0..fit.centroids.len()).collect::<Vec<_>>();
            // stable sort: equal densities keep cluster-id order
            order.sort_by(|&a, &b| fit.centroids[a][density].total_cmp(&fit.centroids[b][density]));
            let mut labels = vec![SegmentLabel::OlderRural; fit.centroids.len()];
            for (rank, cluster) in order.into_iter().enumerate() {
                labels[cluster] = SegmentLabel::BY_DENSITY_RANK[rank % SegmentLabel::LEN];
            }
            (labels, LabelingMode::DensityRank)
        }
    }
}

/// Full segmentation pipeline for a cohort: build the clustering table,
/// impute, standardise and cluster.
///
/// Missing party votes count as zero votes, so a party that stands nowhere in
/// the cohort is a constant column. Census columns are median-imputed and fail
/// with [`AnalyticsError::DataQuality`] when no record reports them.
pub fn segment_cohort(
    cohort: &[&ConstituencyRecord],
    config: &AnalyticsConfig,
) -> Result<ClusterAssignment, AnalyticsError> {
    let table = FeatureTable::build(cohort, &ColumnManifest::clustering())
        .with_missing_votes_as_zero();
    let imputed = imputer::impute(&table)?;
    let matrix = imputed.numeric_matrix()?;
    let (_, normalized) = Standardizer::fit_transform(&matrix);
    let assignment = assign_segments(&normalized, config);
    log::debug!(
        "segmented {} constituencies into {} clusters (inertia {})",
        assignment.len(),
        assignment.fit.centroids.len(),
        assignment.fit.inertia
    );
    Ok(assignment)
}
