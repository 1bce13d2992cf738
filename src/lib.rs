#![warn(missing_docs)]

/*! This is a crate for unsupervised feature selection. Given a numeric dataset and the number of
clusters it should split into, it searches for the subset of columns under which K-Means finds
the best separated clustering, as measured by the mean silhouette coefficient.

Two searches share the same scoring oracle: a greedy [`Sfs`] (stepwise forward selection) and a
population based [`Gas`] (genetic algorithm selection). Most users start from [`Settings`] and
a [`Selector`]:
```
use silhouette_select::{Dataset, Selector, Settings};

let rows = vec![
    vec![0.0, 0.3], vec![0.1, 0.9], vec![0.0, 0.5],
    vec![5.0, 0.2], vec![5.1, 0.8], vec![5.0, 0.4],
];
let data = Dataset::from_rows("demo", rows, 2).unwrap();
let mut settings = Settings::default();
settings.seed = Some(3);
let report = Selector::new(settings).select_sfs(&data).unwrap();
assert!(report.score <= 1.0);
```
!*/

pub mod core;
pub mod data;
pub mod evaluator;
pub mod gas;
pub mod kmeans;
pub mod ops;
pub mod report;
pub mod sfs;

pub use crate::core::{
    ExperimentMetadata, FeatureSubset, Individual, Population, RunStats, SubsetError,
};
pub use data::{ColumnRange, DataError, Dataset, DatasetLayout};
pub use evaluator::SilhouetteFitness;
pub use gas::{Gas, GasBuilder, GasError, GasReport};
pub use kmeans::{Clustering, ClusteringError, EmptyClusterPolicy, KMeans, TieBreak};
pub use report::{Comparison, Method, SelectionReport};
pub use sfs::{SearchState, Sfs, SfsError, SfsReport, SfsRound};

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::{self, Display, Formatter};

/// A settings object for storing everything a selection run might care about.
///
/// You should usually instantiate this using the default method. All member variables of this
/// struct are public, so in most cases simply reassign them:
/// ```
/// let mut set = silhouette_select::Settings::default();
/// set.population_size = 100;
/// set.generations = 50;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// The number of individuals per generation of the genetic search
    pub population_size: usize,
    /// The number of generations of the genetic search
    pub generations: usize,
    /// The per-gene flip probability
    pub mutation_probability: f64,
    /// The percentage of each generation carried forward unchanged
    pub elite_percent: usize,
    /// The percentage of each generation eligible as parents
    pub mating_percent: usize,
    /// An optional cap on K-Means rounds; `None` runs to convergence
    pub max_iterations: Option<usize>,
    /// How K-Means resolves exact distance ties
    pub tie_break: TieBreak,
    /// How K-Means re-centers a cluster that lost all members
    pub empty_cluster: EmptyClusterPolicy,
    /// Seed for a reproducible run; `None` seeds from entropy
    pub seed: Option<u64>,
}

/// Default values for all settings
impl Default for Settings {
    fn default() -> Self {
        Self {
            population_size: 25,
            generations: 10,
            mutation_probability: 0.05,
            elite_percent: 10,
            mating_percent: 50,
            max_iterations: None,
            tie_break: TieBreak::CoinFlip,
            empty_cluster: EmptyClusterPolicy::MeanOfCentroids,
            seed: None,
        }
    }
}

impl Settings {
    /// Builds a clustering engine over `data` configured by these settings.
    ///
    /// # Errors
    /// Propagates [`ClusteringError`] when the dataset cannot be clustered.
    pub fn kmeans<'a>(&self, data: &'a Dataset) -> Result<KMeans<'a>, ClusteringError> {
        Ok(data
            .kmeans()?
            .empty_cluster_policy(self.empty_cluster)
            .tie_break(self.tie_break)
            .max_iterations(self.max_iterations))
    }

    /// Builds the silhouette oracle over `data`.
    ///
    /// # Errors
    /// See [`Settings::kmeans`].
    pub fn fitness<'a>(&self, data: &'a Dataset) -> Result<SilhouetteFitness<'a>, ClusteringError> {
        Ok(SilhouetteFitness::new(self.kmeans(data)?))
    }

    /// Builds a genetic search over `fitness`.
    ///
    /// # Errors
    /// Returns [`GasError`] when the genetic parameters are invalid.
    pub fn gas<F: ops::Fitness>(&self, fitness: F) -> Result<Gas<F>, GasError> {
        Gas::builder(fitness)
            .population_size(self.population_size)
            .generations(self.generations)
            .mutation_probability(self.mutation_probability)
            .elite_percent(self.elite_percent)
            .mating_percent(self.mating_percent)
            .build()
    }

    /// A generator seeded from [`Self::seed`], or from entropy when unset.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Errors produced by [`Selector`].
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// The dataset could not be clustered.
    Clustering(ClusteringError),
    /// Wrapper around [`SfsError`].
    Sfs(SfsError),
    /// Wrapper around [`GasError`].
    Gas(GasError),
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clustering(err) => write!(f, "{err}"),
            Self::Sfs(err) => write!(f, "stepwise forward selection failed: {err}"),
            Self::Gas(err) => write!(f, "genetic algorithm selection failed: {err}"),
        }
    }
}

impl std::error::Error for SelectionError {}

impl From<ClusteringError> for SelectionError {
    fn from(err: ClusteringError) -> Self {
        Self::Clustering(err)
    }
}

impl From<SfsError> for SelectionError {
    fn from(err: SfsError) -> Self {
        Self::Sfs(err)
    }
}

impl From<GasError> for SelectionError {
    fn from(err: GasError) -> Self {
        Self::Gas(err)
    }
}

/// This is a selector object. It runs either search over a dataset.
///
/// In order to use the selector you first need to create a [`Settings`] struct. That can then be
/// passed to a `Selector`, and the `select_*` methods run the searches:
/// ```
/// use silhouette_select::{Dataset, Selector, Settings};
///
/// let rows = (0..12_u8).map(|i| vec![f64::from(i % 2), f64::from(i % 3)]).collect();
/// let data = Dataset::from_rows("demo", rows, 2).unwrap();
/// let mut set = Settings::default();
/// set.population_size = 6;
/// set.generations = 2;
/// set.seed = Some(1);
/// let report = Selector::new(set).select_gas(&data).unwrap();
/// assert_eq!(report.population.len(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Selector {
    settings: Settings,
}

impl Selector {
    /// This method creates a new selector from the given settings
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// The settings driving both searches.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs stepwise forward selection over `data`.
    ///
    /// # Errors
    /// Returns [`SelectionError`] when the dataset cannot be clustered or the search fails.
    pub fn select_sfs(&self, data: &Dataset) -> Result<SfsReport, SelectionError> {
        let fitness = self.settings.fitness(data)?;
        log::info!(
            "stepwise forward selection on {} ({} features, k = {})",
            data.name(),
            data.num_features(),
            data.clusters()
        );
        Ok(Sfs::new(fitness).run(&mut self.settings.rng())?)
    }

    /// Runs genetic algorithm selection over `data`.
    ///
    /// # Errors
    /// Returns [`SelectionError`] when the dataset cannot be clustered, the genetic parameters
    /// are invalid, or the search fails.
    pub fn select_gas(&self, data: &Dataset) -> Result<GasReport, SelectionError> {
        let gas = self.settings.gas(self.settings.fitness(data)?)?;
        log::info!(
            "genetic algorithm selection on {} (population {}, {} generations)",
            data.name(),
            gas.population_size(),
            gas.generations()
        );
        let report = match self.settings.seed {
            Some(seed) => gas.run_seeded(seed)?,
            None => gas.run(&mut self.settings.rng())?,
        };
        Ok(report)
    }
}
