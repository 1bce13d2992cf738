//! K-Means clustering restricted to a feature subset, and silhouette scoring.
//!
//! [`KMeans`] borrows a normalized feature matrix and fits `k` centroids using
//! only the coordinates selected by a [`FeatureSubset`]. A fit is always
//! driven by an explicitly passed generator: initial centroids are sampled
//! from it and, under [`TieBreak::CoinFlip`], exact distance ties are settled
//! by it as well.
//!
//! ```
//! use silhouette_select::{FeatureSubset, KMeans};
//! use rand::SeedableRng;
//!
//! let instances = vec![vec![0.0], vec![1.0], vec![0.0], vec![1.0]];
//! let kmeans = KMeans::new(&instances, 2).unwrap();
//! let subset = FeatureSubset::full(1);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(3);
//! let seeds = vec![instances[0].clone(), instances[1].clone()];
//! let clustering = kmeans.fit_from(&subset, seeds, &mut rng).unwrap();
//! assert_eq!(clustering.clusters(), &[vec![0, 2], vec![1, 3]]);
//! assert_eq!(kmeans.silhouette(&subset, &clustering).unwrap(), 1.0);
//! ```

use crate::core::{FeatureSubset, SubsetError};
use rand::{Rng, RngCore};
use std::fmt::{self, Display, Formatter};

/// What a cluster's centroid becomes after a round in which it received no
/// members.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// Coordinate-wise mean, over the active columns, of the centroids
    /// computed for the non-empty clusters in the same round.
    #[default]
    MeanOfCentroids,
    /// Keep the centroid used for the round's assignment.
    KeepPrevious,
}

/// How an instance is assigned when two centroids are exactly equidistant.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// A fair coin decides, per instance and per round, whether the newly
    /// examined cluster replaces the current nearest one.
    #[default]
    CoinFlip,
    /// The lowest-indexed cluster keeps the instance.
    FirstWins,
}

impl TieBreak {
    fn switch(self, rng: &mut dyn RngCore) -> bool {
        match self {
            Self::CoinFlip => rng.gen_bool(0.5),
            Self::FirstWins => false,
        }
    }
}

/// Result of one [`KMeans::fit`] call.
///
/// Clusters hold instance indices into the matrix the engine was built on.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    clusters: Vec<Vec<usize>>,
    means: Vec<Vec<f64>>,
    iterations: usize,
}

impl Clustering {
    /// Member indices per cluster. Exactly `k` entries, some possibly empty.
    #[must_use]
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Centroid per cluster, spanning every feature column.
    #[must_use]
    pub fn means(&self) -> &[Vec<f64>] {
        &self.means
    }

    /// Number of assignment rounds run before convergence.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of clusters.
    #[must_use]
    pub fn k(&self) -> usize {
        self.clusters.len()
    }
}

/// Errors produced while clustering or scoring.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusteringError {
    /// The feature matrix has no instances.
    EmptyDataset,
    /// `k` must lie in `1..=instances`.
    InvalidClusterCount {
        /// Requested number of clusters.
        clusters: usize,
        /// Number of instances available.
        instances: usize,
    },
    /// An instance has a different number of columns than the first one.
    RaggedInstances {
        /// Position of the offending instance.
        index: usize,
        /// Width of the first instance.
        expected: usize,
        /// Width of the offending instance.
        found: usize,
    },
    /// A clustering refers to an instance the engine does not know.
    UnknownInstance {
        /// Offending instance index.
        index: usize,
        /// Number of instances available.
        instances: usize,
    },
    /// Initial centroids must be `k` rows spanning every column.
    InitialCentroids {
        /// Number of clusters configured.
        expected: usize,
        /// Number of centroids provided.
        found: usize,
    },
    /// Wrapper around [`SubsetError`].
    Subset(SubsetError),
}

impl Display for ClusteringError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDataset => f.write_str("cannot cluster an empty dataset"),
            Self::InvalidClusterCount {
                clusters,
                instances,
            } => write!(
                f,
                "cluster count must be within 1..={instances} (received {clusters})"
            ),
            Self::RaggedInstances {
                index,
                expected,
                found,
            } => write!(
                f,
                "instance {index} has {found} columns but {expected} were expected"
            ),
            Self::UnknownInstance { index, instances } => write!(
                f,
                "clustering refers to instance {index} but only {instances} exist"
            ),
            Self::InitialCentroids { expected, found } => write!(
                f,
                "expected {expected} initial centroids spanning every column (received {found})"
            ),
            Self::Subset(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ClusteringError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Subset(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SubsetError> for ClusteringError {
    fn from(err: SubsetError) -> Self {
        Self::Subset(err)
    }
}

/// Euclidean distance between two rows over the selected columns only.
///
/// # Examples
/// ```
/// use silhouette_select::{kmeans::distance, FeatureSubset};
/// let subset = FeatureSubset::new(vec![true, false, true]);
/// assert_eq!(distance(&subset, &[0.0, 9.0, 0.0], &[3.0, -9.0, 4.0]), 5.0);
/// ```
#[must_use]
pub fn distance(subset: &FeatureSubset, lhs: &[f64], rhs: &[f64]) -> f64 {
    let active: Vec<usize> = subset.indices().collect();
    distance_over(&active, lhs, rhs)
}

fn distance_over(active: &[usize], lhs: &[f64], rhs: &[f64]) -> f64 {
    active
        .iter()
        .map(|&column| {
            let diff = lhs[column] - rhs[column];
            diff * diff
        })
        .sum::<f64>()
        .sqrt()
}

/// K-Means engine over a borrowed, normalized feature matrix.
///
/// The engine holds no per-fit state, so one instance can serve any number
/// of independent fits, including concurrent ones.
#[derive(Debug, Clone)]
pub struct KMeans<'a> {
    instances: &'a [Vec<f64>],
    clusters: usize,
    width: usize,
    empty_cluster: EmptyClusterPolicy,
    tie_break: TieBreak,
    max_iterations: Option<usize>,
}

impl<'a> KMeans<'a> {
    /// Creates an engine fitting `clusters` centroids to `instances`.
    ///
    /// # Errors
    /// Returns [`ClusteringError`] when the matrix is empty or ragged, or
    /// when `clusters` is zero or exceeds the number of instances.
    pub fn new(instances: &'a [Vec<f64>], clusters: usize) -> Result<Self, ClusteringError> {
        let first = instances.first().ok_or(ClusteringError::EmptyDataset)?;
        if clusters == 0 || clusters > instances.len() {
            return Err(ClusteringError::InvalidClusterCount {
                clusters,
                instances: instances.len(),
            });
        }
        let width = first.len();
        if let Some((index, row)) = instances
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != width)
        {
            return Err(ClusteringError::RaggedInstances {
                index,
                expected: width,
                found: row.len(),
            });
        }
        Ok(Self {
            instances,
            clusters,
            width,
            empty_cluster: EmptyClusterPolicy::default(),
            tie_break: TieBreak::default(),
            max_iterations: None,
        })
    }

    /// Replaces the empty-cluster policy.
    #[must_use]
    pub fn empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster = policy;
        self
    }

    /// Replaces the tie-breaking rule.
    #[must_use]
    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Caps the number of assignment rounds per fit. `None` runs until the
    /// centroids stop changing.
    #[must_use]
    pub fn max_iterations(mut self, limit: Option<usize>) -> Self {
        self.max_iterations = limit;
        self
    }

    /// Number of feature columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of clusters fitted.
    #[must_use]
    pub fn k(&self) -> usize {
        self.clusters
    }

    /// Borrowed feature matrix.
    #[must_use]
    pub fn instances(&self) -> &'a [Vec<f64>] {
        self.instances
    }

    /// Fits `k` centroids using only the columns selected by `subset`.
    ///
    /// Initial centroids are `k` distinct instances drawn uniformly without
    /// replacement. Rounds repeat until no coordinate of any centroid
    /// changes, compared exactly over every column, or until the optional
    /// iteration cap is reached.
    ///
    /// # Errors
    /// Returns [`ClusteringError::Subset`] when `subset` does not span the
    /// matrix width.
    pub fn fit(
        &self,
        subset: &FeatureSubset,
        rng: &mut dyn RngCore,
    ) -> Result<Clustering, ClusteringError> {
        subset.validate_width(self.width)?;
        let initial = rand::seq::index::sample(&mut *rng, self.instances.len(), self.clusters)
            .into_iter()
            .map(|index| self.instances[index].clone())
            .collect();
        self.fit_from(subset, initial, rng)
    }

    /// Same as [`Self::fit`], starting from caller-provided centroids.
    ///
    /// # Errors
    /// Returns [`ClusteringError`] when `subset` does not span the matrix
    /// width, or when `initial` does not hold `k` centroids of that width.
    pub fn fit_from(
        &self,
        subset: &FeatureSubset,
        initial: Vec<Vec<f64>>,
        rng: &mut dyn RngCore,
    ) -> Result<Clustering, ClusteringError> {
        subset.validate_width(self.width)?;
        if initial.len() != self.clusters || initial.iter().any(|mean| mean.len() != self.width) {
            return Err(ClusteringError::InitialCentroids {
                expected: self.clusters,
                found: initial.len(),
            });
        }
        let active: Vec<usize> = subset.indices().collect();
        let mut means = initial;
        let mut iterations = 0_usize;
        loop {
            iterations += 1;
            let clusters = self.assign(&active, &means, rng);
            let next = self.next_means(&active, &clusters, &means);
            let converged = centroids_equal(&means, &next);
            means = next;
            if converged {
                log::trace!("kmeans converged after {iterations} rounds on {subset}");
                return Ok(Clustering {
                    clusters,
                    means,
                    iterations,
                });
            }
            if self.max_iterations.is_some_and(|limit| iterations >= limit) {
                log::warn!(
                    "kmeans stopped at the {iterations} round cap on {subset} before converging"
                );
                return Ok(Clustering {
                    clusters,
                    means,
                    iterations,
                });
            }
        }
    }

    /// Mean silhouette coefficient of `clustering` over the `subset` columns.
    ///
    /// Cohesion of a lone member is zero. An instance with no other
    /// non-empty cluster to compare against scores zero. The sum is divided
    /// by the total number of instances.
    ///
    /// # Errors
    /// Returns [`ClusteringError`] when `subset` does not span the matrix
    /// width or `clustering` refers to unknown instances.
    pub fn silhouette(
        &self,
        subset: &FeatureSubset,
        clustering: &Clustering,
    ) -> Result<f64, ClusteringError> {
        subset.validate_width(self.width)?;
        let instances = self.instances.len();
        if let Some(&index) = clustering
            .clusters
            .iter()
            .flatten()
            .find(|&&index| index >= instances)
        {
            return Err(ClusteringError::UnknownInstance { index, instances });
        }
        let active: Vec<usize> = subset.indices().collect();
        let mut total = 0.0;
        for (home, members) in clustering.clusters.iter().enumerate() {
            for (position, &index) in members.iter().enumerate() {
                let point = &self.instances[index];
                let cohesion = members
                    .iter()
                    .enumerate()
                    .filter(|&(other, _)| other != position)
                    .map(|(_, &member)| distance_over(&active, point, &self.instances[member]))
                    .sum::<f64>()
                    / Self::count_as_f64(members.len().saturating_sub(1).max(1));
                let separation = clustering
                    .clusters
                    .iter()
                    .enumerate()
                    .filter(|(other, cluster)| *other != home && !cluster.is_empty())
                    .map(|(_, cluster)| self.mean_distance(&active, point, cluster))
                    .min_by(f64::total_cmp);
                total += match separation {
                    Some(separation) => silhouette_of(cohesion, separation),
                    None => 0.0,
                };
            }
        }
        Ok(total / Self::count_as_f64(instances))
    }

    #[allow(clippy::float_cmp)]
    fn assign(
        &self,
        active: &[usize],
        means: &[Vec<f64>],
        rng: &mut dyn RngCore,
    ) -> Vec<Vec<usize>> {
        let mut clusters = vec![Vec::new(); means.len()];
        for (index, instance) in self.instances.iter().enumerate() {
            let mut nearest = 0;
            let mut nearest_distance = f64::MAX;
            for (cluster, mean) in means.iter().enumerate() {
                let distance = distance_over(active, instance, mean);
                if distance == nearest_distance {
                    if self.tie_break.switch(rng) {
                        nearest = cluster;
                    }
                } else if distance < nearest_distance {
                    nearest_distance = distance;
                    nearest = cluster;
                }
            }
            clusters[nearest].push(index);
        }
        clusters
    }

    fn next_means(
        &self,
        active: &[usize],
        clusters: &[Vec<usize>],
        previous: &[Vec<f64>],
    ) -> Vec<Vec<f64>> {
        let computed: Vec<Option<Vec<f64>>> = clusters
            .iter()
            .map(|members| {
                (!members.is_empty()).then(|| {
                    self.centroid(active, members.iter().map(|&index| &self.instances[index]))
                })
            })
            .collect();
        let fallback = match self.empty_cluster {
            EmptyClusterPolicy::MeanOfCentroids => {
                Some(self.centroid(active, computed.iter().flatten()))
            }
            EmptyClusterPolicy::KeepPrevious => None,
        };
        computed
            .into_iter()
            .zip(previous)
            .map(|(mean, prior)| {
                mean.or_else(|| fallback.clone())
                    .unwrap_or_else(|| prior.clone())
            })
            .collect()
    }

    fn centroid<'r>(&self, active: &[usize], rows: impl Iterator<Item = &'r Vec<f64>>) -> Vec<f64> {
        let mut centroid = vec![0.0; self.width];
        let mut count = 0_usize;
        for row in rows {
            count += 1;
            for &column in active {
                centroid[column] += row[column];
            }
        }
        if count > 0 {
            for &column in active {
                centroid[column] /= Self::count_as_f64(count);
            }
        }
        centroid
    }

    fn mean_distance(&self, active: &[usize], point: &[f64], members: &[usize]) -> f64 {
        members
            .iter()
            .map(|&member| distance_over(active, point, &self.instances[member]))
            .sum::<f64>()
            / Self::count_as_f64(members.len())
    }

    fn count_as_f64(count: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        {
            count as f64
        }
    }
}

/// Exact comparison over every coordinate, including inactive columns.
#[allow(clippy::float_cmp)]
fn centroids_equal(lhs: &[Vec<f64>], rhs: &[Vec<f64>]) -> bool {
    lhs.len() == rhs.len()
        && lhs
            .iter()
            .zip(rhs)
            .all(|(a, b)| a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y))
}

fn silhouette_of(cohesion: f64, separation: f64) -> f64 {
    let scale = cohesion.max(separation);
    if scale == 0.0 {
        0.0
    } else {
        (separation - cohesion) / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn column(values: &[f64]) -> Vec<Vec<f64>> {
        values.iter().map(|&value| vec![value]).collect()
    }

    #[test]
    fn two_point_groups_converge_to_perfect_split() {
        let instances = column(&[0.0, 1.0, 0.0, 1.0]);
        let kmeans = KMeans::new(&instances, 2).unwrap();
        let subset = FeatureSubset::full(1);
        let mut rng = StdRng::seed_from_u64(0);
        let clustering = kmeans
            .fit_from(&subset, vec![vec![1.0], vec![0.0]], &mut rng)
            .unwrap();
        assert_eq!(clustering.clusters(), &[vec![1, 3], vec![0, 2]]);
        assert_eq!(clustering.means(), &[vec![1.0], vec![0.0]]);
        assert_eq!(clustering.iterations(), 1);
        assert_eq!(kmeans.silhouette(&subset, &clustering).unwrap(), 1.0);
    }

    #[test]
    fn random_starts_always_yield_k_clusters() {
        let instances = column(&[0.0, 1.0, 0.0, 1.0]);
        let kmeans = KMeans::new(&instances, 2).unwrap();
        let subset = FeatureSubset::full(1);
        let mut perfect = 0;
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let clustering = kmeans.fit(&subset, &mut rng).unwrap();
            assert_eq!(clustering.k(), 2);
            assert_eq!(clustering.clusters().iter().map(Vec::len).sum::<usize>(), 4);
            let score = kmeans.silhouette(&subset, &clustering).unwrap();
            assert!((-1.0..=1.0).contains(&score));
            if score == 1.0 {
                perfect += 1;
            }
        }
        assert!(perfect > 0);
    }

    #[test]
    fn rejects_malformed_initial_centroids() {
        let instances = column(&[0.0, 1.0]);
        let kmeans = KMeans::new(&instances, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            kmeans.fit_from(&FeatureSubset::full(1), vec![vec![0.0]], &mut rng),
            Err(ClusteringError::InitialCentroids { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn empty_cluster_takes_mean_of_other_centroids() {
        let instances = column(&[0.0, 1.0]);
        let kmeans = KMeans::new(&instances, 2).unwrap();
        let previous = vec![vec![0.0], vec![7.0], vec![1.0]];
        let clusters = vec![vec![0], vec![], vec![1]];
        let means = kmeans.next_means(&[0], &clusters, &previous);
        assert_eq!(means, vec![vec![0.0], vec![0.5], vec![1.0]]);
    }

    #[test]
    fn keep_previous_policy_retains_centroid() {
        let instances = column(&[0.0, 1.0]);
        let kmeans = KMeans::new(&instances, 2)
            .unwrap()
            .empty_cluster_policy(EmptyClusterPolicy::KeepPrevious);
        let previous = vec![vec![0.0], vec![7.0]];
        let means = kmeans.next_means(&[0], &[vec![0, 1], vec![]], &previous);
        assert_eq!(means, vec![vec![0.5], vec![7.0]]);
    }

    #[test]
    fn first_wins_sends_ties_to_lowest_cluster() {
        let instances = column(&[0.5, 0.5, 0.5]);
        let kmeans = KMeans::new(&instances, 2)
            .unwrap()
            .tie_break(TieBreak::FirstWins);
        let mut rng = StdRng::seed_from_u64(1);
        let clusters = kmeans.assign(&[0], &[vec![0.0], vec![1.0]], &mut rng);
        assert_eq!(clusters, vec![vec![0, 1, 2], vec![]]);
    }

    #[test]
    fn coin_flip_spreads_ties_over_both_clusters() {
        let instances = column(&[0.5; 64]);
        let kmeans = KMeans::new(&instances, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let clusters = kmeans.assign(&[0], &[vec![0.0], vec![1.0]], &mut rng);
        assert_eq!(clusters[0].len() + clusters[1].len(), 64);
        assert!(!clusters[0].is_empty());
        assert!(!clusters[1].is_empty());
    }

    #[test]
    fn inactive_coordinates_stay_zero_after_fit() {
        let instances = vec![
            vec![0.1, 0.9, 0.3],
            vec![0.2, 0.8, 0.5],
            vec![0.9, 0.1, 0.7],
            vec![0.8, 0.2, 0.6],
        ];
        let kmeans = KMeans::new(&instances, 2).unwrap();
        let subset = FeatureSubset::new(vec![true, false, false]);
        let mut rng = StdRng::seed_from_u64(11);
        let clustering = kmeans.fit(&subset, &mut rng).unwrap();
        assert_eq!(clustering.k(), 2);
        for mean in clustering.means() {
            assert_eq!(mean[1], 0.0);
            assert_eq!(mean[2], 0.0);
        }
    }

    #[test]
    fn convergence_compares_every_coordinate() {
        let old = vec![vec![0.5, 0.3]];
        let new = vec![vec![0.5, 0.0]];
        assert!(!centroids_equal(&old, &new));
        assert!(centroids_equal(&new, &new.clone()));
    }

    #[test]
    fn silhouette_is_idempotent_and_bounded() {
        let instances: Vec<Vec<f64>> = (0..30)
            .map(|idx| {
                let x = f64::from(idx) / 29.0;
                vec![x, (x * 7.3).fract()]
            })
            .collect();
        let kmeans = KMeans::new(&instances, 3).unwrap();
        let subset = FeatureSubset::full(2);
        let mut rng = StdRng::seed_from_u64(5);
        let clustering = kmeans.fit(&subset, &mut rng).unwrap();
        let first = kmeans.silhouette(&subset, &clustering).unwrap();
        let second = kmeans.silhouette(&subset, &clustering).unwrap();
        assert_eq!(first, second);
        assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(&first));
    }

    #[test]
    fn single_non_empty_cluster_scores_zero() {
        let instances = column(&[0.0, 1.0, 2.0]);
        let kmeans = KMeans::new(&instances, 2).unwrap();
        let clustering = Clustering {
            clusters: vec![vec![0, 1, 2], vec![]],
            means: vec![vec![1.0], vec![1.0]],
            iterations: 1,
        };
        let score = kmeans.silhouette(&FeatureSubset::full(1), &clustering).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn lone_member_has_zero_cohesion() {
        let instances = column(&[0.0, 0.9, 1.0]);
        let kmeans = KMeans::new(&instances, 2).unwrap();
        let clustering = Clustering {
            clusters: vec![vec![0], vec![1, 2]],
            means: vec![vec![0.0], vec![0.95]],
            iterations: 1,
        };
        let score = kmeans.silhouette(&FeatureSubset::full(1), &clustering).unwrap();
        // s0 = 1, s1 = (0.9 - 0.1) / 0.9, s2 = (1.0 - 0.1) / 1.0
        let expected = (1.0 + 0.8 / 0.9 + 0.9) / 3.0;
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let instances = column(&[0.0, 1.0]);
        assert!(matches!(
            KMeans::new(&instances, 3),
            Err(ClusteringError::InvalidClusterCount { clusters: 3, instances: 2 })
        ));
        assert!(matches!(
            KMeans::new(&instances, 0),
            Err(ClusteringError::InvalidClusterCount { .. })
        ));
        assert_eq!(KMeans::new(&[], 1).unwrap_err(), ClusteringError::EmptyDataset);
        let ragged = vec![vec![0.0, 1.0], vec![0.0]];
        assert!(matches!(
            KMeans::new(&ragged, 1),
            Err(ClusteringError::RaggedInstances { index: 1, .. })
        ));
        let kmeans = KMeans::new(&instances, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            kmeans.fit(&FeatureSubset::full(2), &mut rng),
            Err(ClusteringError::Subset(SubsetError::WidthMismatch { .. }))
        ));
    }

    #[test]
    fn iteration_cap_bounds_rounds() {
        let instances: Vec<Vec<f64>> = (0..40).map(|idx| vec![f64::from(idx) / 39.0]).collect();
        let kmeans = KMeans::new(&instances, 4).unwrap().max_iterations(Some(1));
        let mut rng = StdRng::seed_from_u64(9);
        let clustering = kmeans.fit(&FeatureSubset::full(1), &mut rng).unwrap();
        assert_eq!(clustering.iterations(), 1);
        assert_eq!(clustering.clusters().iter().map(Vec::len).sum::<usize>(), 40);
    }
}
