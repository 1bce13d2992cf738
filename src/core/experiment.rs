//! Run statistics and metadata recorded by the genetic search.

use super::Population;

/// Time-series metrics captured once per scoring pass.
///
/// Entry zero describes the initial population; entry `g` the population
/// produced by generation `g`.
///
/// # Examples
/// ```
/// use silhouette_select::RunStats;
/// let stats = RunStats::new();
/// assert_eq!(stats.generations(), 0);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Fitness of the top individual.
    pub best_fitness: Vec<f64>,
    /// Mean fitness over the population.
    pub mean_fitness: Vec<f64>,
    /// Mean per-gene standard deviation of the population's gene vectors.
    pub population_diversity: Vec<f64>,
}

impl RunStats {
    /// Creates an empty set of run statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of generations recorded, not counting the initial population.
    #[must_use]
    pub fn generations(&self) -> usize {
        self.best_fitness.len().saturating_sub(1)
    }

    pub(crate) fn record(&mut self, population: &Population) {
        self.best_fitness.push(population.get_best());
        self.mean_fitness.push(population.get_mean());
        self.population_diversity.push(population_diversity(population));
    }
}

/// Metadata describing an executed search.
///
/// # Examples
/// ```
/// use silhouette_select::ExperimentMetadata;
/// let metadata = ExperimentMetadata::new(10, Some(7), "StdRng");
/// assert_eq!(metadata.generations, 10);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentMetadata {
    /// Number of generations executed.
    pub generations: usize,
    /// Seed recorded by the caller, if the generator was seeded.
    pub rng_seed: Option<u64>,
    /// Human readable description of the generator used for the run.
    pub rng_description: String,
}

impl ExperimentMetadata {
    /// Creates a new metadata record.
    #[must_use]
    pub fn new(
        generations: usize,
        rng_seed: Option<u64>,
        rng_description: impl Into<String>,
    ) -> Self {
        Self {
            generations,
            rng_seed,
            rng_description: rng_description.into(),
        }
    }
}

pub(crate) fn population_diversity(population: &Population) -> f64 {
    let individuals = population.individuals();
    let Some(first) = individuals.first() else {
        return 0.0;
    };
    let width = first.features().width();
    if width == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let size = individuals.len() as f64;
    let mut total = 0.0;
    for column in 0..width {
        let ones = individuals
            .iter()
            .filter(|individual| individual.features().contains(column))
            .count();
        #[allow(clippy::cast_precision_loss)]
        let share = ones as f64 / size;
        total += (share * (1.0 - share)).sqrt();
    }
    #[allow(clippy::cast_precision_loss)]
    {
        total / width as f64
    }
}
