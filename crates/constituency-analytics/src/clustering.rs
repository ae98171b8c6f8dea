//! Seeded k-means clustering
//!
//! Centroids are seeded with k-means++ from a [`Pcg64`] generator, then refined
//! by Lloyd iterations: assign every row to its nearest centroid (Euclidean
//! distance, ties to the lower cluster id), move each centroid to the mean of
//! its rows, repeat until the assignment is stable, the centroids stop moving,
//! or the iteration cap is reached. Several seeded initialisations are run and
//! the one with the lowest inertia is kept.
//!
//! All arithmetic is sequential, so the same seed and the same input matrix
//! always give bit-identical assignments.

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;

use crate::config::ClusteringConfig;

/// Result of one k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterFit {
    /// Cluster id of each input row.
    pub assignments: Vec<usize>,
    /// One centroid per cluster id, in input space.
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances from each row to its centroid.
    pub inertia: f64,
    /// Lloyd iterations used by the winning initialisation.
    pub iterations: usize,
}

impl ClusterFit {
    fn empty() -> Self {
        Self {
            assignments: vec![],
            centroids: vec![],
            inertia: 0.0,
            iterations: 0,
        }
    }
}

/// k-means with a fixed cluster count and deterministic seeding.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    pub cluster_count: usize,
    pub config: ClusteringConfig,
}

impl KMeans {
    #[must_use]
    pub fn new(cluster_count: usize, config: ClusteringConfig) -> Self {
        Self {
            cluster_count,
            config,
        }
    }

    /// Partitions `rows` into at most `cluster_count` clusters.
    ///
    /// Fewer clusters are produced when the input has fewer distinct rows than
    /// `cluster_count`. An empty input gives an empty fit.
    ///
    /// # Example
    ///
    /// ```
    /// use constituency_analytics::{clustering::KMeans, config::ClusteringConfig};
    ///
    /// let rows = vec![vec![0.0], vec![0.1], vec![10.0], vec![10.1]];
    /// let fit = KMeans::new(2, ClusteringConfig::default()).fit(&rows);
    ///
    /// assert_eq!(fit.assignments[0], fit.assignments[1]);
    /// assert_eq!(fit.assignments[2], fit.assignments[3]);
    /// assert_ne!(fit.assignments[0], fit.assignments[2]);
    /// ```
    #[must_use]
    pub fn fit(&self, rows: &[Vec<f64>]) -> ClusterFit {
        if rows.is_empty() || self.cluster_count == 0 {
            return ClusterFit::empty();
        }

        let mut rng = Pcg64::seed_from_u64(self.config.seed);
        let mut best: Option<ClusterFit> = None;
        for run in 0..self.config.n_init.max(1) {
            let centroids = init_plus_plus(rows, self.cluster_count, &mut rng);
            let fit = self.lloyd(rows, centroids);
            log::debug!(
                "k-means run {run}: {} clusters, inertia {}, {} iterations",
                fit.centroids.len(),
                fit.inertia,
                fit.iterations
            );
            if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }
        let best = best.unwrap_or_else(ClusterFit::empty);
        if best.centroids.len() < self.cluster_count {
            log::warn!(
                "only {} distinct rows; produced {} of {} clusters",
                best.centroids.len(),
                best.centroids.len(),
                self.cluster_count
            );
        }
        best
    }

    fn lloyd(&self, rows: &[Vec<f64>], mut centroids: Vec<Vec<f64>>) -> ClusterFit {
        let mut assignments = vec![usize::MAX; rows.len()];
        let mut iterations = 0;
        while iterations < self.config.max_iterations.max(1) {
            iterations += 1;
            let changed = assign(rows, &centroids, &mut assignments);
            let updated = update_centroids(rows, &assignments, &centroids);
            let shift = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| squared_distance(old, new))
                .sum::<f64>();
            centroids = updated;
            if !changed || shift <= self.config.tolerance {
                break;
            }
        }
        // keep the reported assignment consistent with the final centroids
        assign(rows, &centroids, &mut assignments);
        let inertia = rows
            .iter()
            .zip(&assignments)
            .map(|(row, &cluster)| squared_distance(row, &centroids[cluster]))
            .sum();
        ClusterFit {
            assignments,
            centroids,
            inertia,
            iterations,
        }
    }
}

/// k-means++ seeding: the first centroid is a uniformly chosen row, each next
/// one is drawn with probability proportional to its squared distance from the
/// closest centroid chosen so far. Stops early once every row coincides with a
/// centroid.
fn init_plus_plus(rows: &[Vec<f64>], cluster_count: usize, rng: &mut Pcg64) -> Vec<Vec<f64>> {
    let first = rng.random_range(0..rows.len());
    let mut centroids = vec![rows[first].clone()];
    let mut distances = rows
        .iter()
        .map(|row| squared_distance(row, &centroids[0]))
        .collect::<Vec<_>>();

    while centroids.len() < cluster_count {
        let total = distances.iter().sum::<f64>();
        if total <= 0.0 {
            break;
        }
        let target = rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        let mut chosen = None;
        for (index, &d) in distances.iter().enumerate() {
            if d <= 0.0 {
                continue;
            }
            cumulative += d;
            chosen = Some(index);
            if cumulative > target {
                break;
            }
        }
        let Some(chosen) = chosen else { break };
        let centroid = rows[chosen].clone();
        for (d, row) in distances.iter_mut().zip(rows) {
            *d = d.min(squared_distance(row, &centroid));
        }
        centroids.push(centroid);
    }
    centroids
}

/// Assigns each row to its nearest centroid. Returns whether anything changed.
fn assign(rows: &[Vec<f64>], centroids: &[Vec<f64>], assignments: &mut [usize]) -> bool {
    let mut changed = false;
    for (row, assignment) in rows.iter().zip(assignments.iter_mut()) {
        let nearest = nearest_centroid(row, centroids);
        if *assignment != nearest {
            *assignment = nearest;
            changed = true;
        }
    }
    changed
}

/// Index of the closest centroid; ties go to the lowest index.
#[must_use]
pub fn nearest_centroid(row: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(row, centroid);
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

/// Mean of the rows assigned to each cluster. A cluster that lost all of its
/// rows keeps its previous centroid.
#[expect(clippy::cast_precision_loss)]
fn update_centroids(
    rows: &[Vec<f64>],
    assignments: &[usize],
    centroids: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let dims = centroids.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dims]; centroids.len()];
    let mut counts = vec![0_usize; centroids.len()];
    for (row, &cluster) in rows.iter().zip(assignments) {
        counts[cluster] += 1;
        for (sum, value) in sums[cluster].iter_mut().zip(row) {
            *sum += value;
        }
    }
    sums.into_iter()
        .zip(counts)
        .zip(centroids)
        .map(|((sum, count), previous)| {
            if count == 0 {
                previous.clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect()
}

#[must_use]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
