//! Per-request analysis settings.
//!
//! A configuration only holds parameters. Fitted state (column means, standard
//! deviations, centroids) is recomputed for every request and never stored here.

use serde::{Deserialize, Serialize};

/// Settings shared by every view computed through [`Analytics`](crate::view::Analytics).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub clustering: ClusteringConfig,
    pub labeling: LabelingMode,
}

/// Parameters of the k-means run behind the segment views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Seed for centroid initialisation. Same seed and same input give the same assignment.
    pub seed: u64,
    /// Upper bound on assignment/update rounds per initialisation.
    pub max_iterations: usize,
    /// A run stops once the summed squared centroid movement falls to this value.
    pub tolerance: f64,
    /// Number of seeded initialisations; the lowest-inertia run wins.
    pub n_init: usize,
}

impl ClusteringConfig {
    pub const DEFAULT: ClusteringConfig = ClusteringConfig {
        seed: 42,
        max_iterations: 300,
        tolerance: 1e-4,
        n_init: 10,
    };
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How numeric cluster ids are turned into segment labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelingMode {
    /// Fixed id -> label lookup table. Labels are relative to the cohort the
    /// clusters were fitted on.
    #[default]
    ClusterId,
    /// Rank clusters by the population density of their centroid and label by rank.
    DensityRank,
}

impl std::str::FromStr for LabelingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cluster_id" => Ok(LabelingMode::ClusterId),
            "density_rank" => Ok(LabelingMode::DensityRank),
            other => Err(format!("unknown labeling mode '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.clustering.seed, 42);
        assert_eq!(config.clustering.n_init, 10);
        assert_eq!(config.labeling, LabelingMode::ClusterId);
    }

    #[test]
    fn test_labeling_mode_parse() {
        assert_eq!("density-rank".parse::<LabelingMode>(), Ok(LabelingMode::DensityRank));
        assert_eq!("Cluster_Id".parse::<LabelingMode>(), Ok(LabelingMode::ClusterId));
        assert!("alphabetical".parse::<LabelingMode>().is_err());
    }
}
