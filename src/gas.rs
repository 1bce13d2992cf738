//! Genetic algorithm selection over boolean gene vectors.
//!
//! The [`Gas`] builder wires the operators defined in [`crate::ops`] together.
//! Users construct the engine through [`Gas::builder`], optionally replace the
//! default operators or tune the rates, and then call [`Gas::run`] with a
//! random number generator.
//!
//! Each generation copies the elite unchanged, fills the remainder with
//! single-point offspring of parents drawn from the mating pool, mutates the
//! whole new generation (elites included), and re-scores everyone.

use crate::core::{ExperimentMetadata, FeatureSubset, Individual, Population, RunStats};
use crate::kmeans::Clustering;
use crate::ops::{
    BitFlipMutation, CrossoverOperator, Fitness, FitnessError, FitnessResult, MutationOperator,
    OperatorError, SelectionOperator, SinglePointCrossover, TruncationSelection,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::{self, Display, Formatter};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const DEFAULT_POPULATION_SIZE: usize = 25;
const DEFAULT_GENERATIONS: usize = 10;
const DEFAULT_MUTATION_PROBABILITY: f64 = 0.05;
const DEFAULT_ELITE_PERCENT: usize = 10;
const DEFAULT_MATING_PERCENT: usize = 50;

/// Report produced by [`Gas::run`].
///
/// # Examples
/// ```
/// use silhouette_select::ops::{Evaluation, Fitness, FitnessResult};
/// use silhouette_select::{FeatureSubset, Gas};
/// use rand::SeedableRng;
///
/// struct Count;
///
/// impl Fitness for Count {
///     fn width(&self) -> usize { 5 }
///
///     fn evaluate(&self, subset: &FeatureSubset, _rng: &mut dyn rand::RngCore) -> FitnessResult<Evaluation> {
///         Ok(Evaluation::unclustered(subset.len() as f64))
///     }
/// }
///
/// let gas = Gas::builder(Count).population_size(12).generations(3).build().unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let report = gas.run(&mut rng).unwrap();
/// assert_eq!(report.population.len(), 12);
/// assert_eq!(report.score, report.selected.len() as f64);
/// assert_eq!(report.stats.generations(), 3);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GasReport {
    /// Gene vector of the top individual after the final scoring pass.
    pub selected: FeatureSubset,
    /// Fitness associated with [`Self::selected`].
    pub score: f64,
    /// Clustering behind [`Self::score`].
    pub clustering: Option<Clustering>,
    /// Final population, sorted best first.
    pub population: Population,
    /// Best, mean and diversity per scoring pass.
    pub stats: RunStats,
    /// Generator and generation count used for the run.
    pub metadata: ExperimentMetadata,
}

/// Errors produced by the [`Gas`] engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GasError {
    /// Fewer than two individuals per generation.
    InvalidPopulationSize(usize),
    /// Elite percentage above 100.
    InvalidElitePercent(usize),
    /// The default mating pool would hold no individuals.
    EmptyMatingPool {
        /// Configured population size.
        population_size: usize,
        /// Configured mating percentage.
        mating_percent: usize,
    },
    /// Selection operator failed to return parents for reproduction.
    SelectionFailed,
    /// The fitness spans zero columns.
    NoFeatures,
    /// Wrapper around [`OperatorError`].
    Operator(OperatorError),
    /// Wrapper around [`FitnessError`].
    Fitness(FitnessError),
}

impl Display for GasError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPopulationSize(size) => {
                write!(f, "population size must be at least two (received {size})")
            }
            Self::InvalidElitePercent(percent) => {
                write!(f, "elite percentage must be within [0, 100] (received {percent})")
            }
            Self::EmptyMatingPool {
                population_size,
                mating_percent,
            } => write!(
                f,
                "mating pool of {mating_percent}% of {population_size} individuals is empty"
            ),
            Self::SelectionFailed => f.write_str("selection operator failed to provide parents"),
            Self::NoFeatures => f.write_str("genetic selection needs at least one feature"),
            Self::Operator(err) => write!(f, "{err}"),
            Self::Fitness(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for GasError {}

impl From<OperatorError> for GasError {
    fn from(err: OperatorError) -> Self {
        Self::Operator(err)
    }
}

impl From<FitnessError> for GasError {
    fn from(err: FitnessError) -> Self {
        Self::Fitness(err)
    }
}

/// Builder returned by [`Gas::builder`].
pub struct GasBuilder<F> {
    fitness: F,
    population_size: usize,
    generations: usize,
    elite_percent: usize,
    mating_percent: usize,
    mutation_probability: f64,
    crossover: Option<Box<dyn CrossoverOperator>>,
    mutation: Option<Box<dyn MutationOperator>>,
    selection: Option<Box<dyn SelectionOperator>>,
}

impl<F> GasBuilder<F>
where
    F: Fitness,
{
    /// Configures the number of individuals per generation.
    #[must_use]
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Configures the number of generations after the initial population.
    #[must_use]
    pub fn generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Share of each generation, in percent, copied unchanged into the next.
    #[must_use]
    pub fn elite_percent(mut self, percent: usize) -> Self {
        self.elite_percent = percent;
        self
    }

    /// Share of each generation, in percent, eligible as parents. Ignored
    /// when a custom selection operator is set.
    #[must_use]
    pub fn mating_percent(mut self, percent: usize) -> Self {
        self.mating_percent = percent;
        self
    }

    /// Per-gene flip probability. Ignored when a custom mutation operator is
    /// set.
    #[must_use]
    pub fn mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability;
        self
    }

    /// Replaces the crossover operator.
    #[must_use]
    pub fn crossover(mut self, operator: impl CrossoverOperator + 'static) -> Self {
        self.crossover = Some(Box::new(operator));
        self
    }

    /// Replaces the mutation operator.
    #[must_use]
    pub fn mutation(mut self, operator: impl MutationOperator + 'static) -> Self {
        self.mutation = Some(Box::new(operator));
        self
    }

    /// Replaces the selection operator.
    #[must_use]
    pub fn selection(mut self, operator: impl SelectionOperator + 'static) -> Self {
        self.selection = Some(Box::new(operator));
        self
    }

    /// Finalizes the builder into a [`Gas`] engine.
    ///
    /// # Errors
    /// Returns [`GasError`] when the population is smaller than two, a
    /// percentage exceeds 100, the mating pool would be empty, or default
    /// operator construction fails.
    pub fn build(self) -> Result<Gas<F>, GasError> {
        if self.population_size < 2 {
            return Err(GasError::InvalidPopulationSize(self.population_size));
        }
        if self.elite_percent > 100 {
            return Err(GasError::InvalidElitePercent(self.elite_percent));
        }
        let crossover: Box<dyn CrossoverOperator> = match self.crossover {
            Some(operator) => operator,
            None => Box::new(SinglePointCrossover),
        };
        let mutation: Box<dyn MutationOperator> = match self.mutation {
            Some(operator) => operator,
            None => Box::new(BitFlipMutation::new(self.mutation_probability)?),
        };
        let selection: Box<dyn SelectionOperator> = if let Some(operator) = self.selection {
            operator
        } else {
            let truncation = TruncationSelection::new(self.mating_percent)?;
            if truncation.pool_size(self.population_size) == 0 {
                return Err(GasError::EmptyMatingPool {
                    population_size: self.population_size,
                    mating_percent: self.mating_percent,
                });
            }
            Box::new(truncation)
        };
        Ok(Gas {
            fitness: self.fitness,
            population_size: self.population_size,
            generations: self.generations,
            elite_percent: self.elite_percent,
            crossover,
            mutation,
            selection,
        })
    }
}

/// Genetic algorithm engine that searches feature subsets of a [`Fitness`].
pub struct Gas<F> {
    fitness: F,
    population_size: usize,
    generations: usize,
    elite_percent: usize,
    crossover: Box<dyn CrossoverOperator>,
    mutation: Box<dyn MutationOperator>,
    selection: Box<dyn SelectionOperator>,
}

impl<F> Gas<F>
where
    F: Fitness,
{
    /// Creates a builder used to configure the engine.
    #[must_use]
    pub fn builder(fitness: F) -> GasBuilder<F> {
        GasBuilder {
            fitness,
            population_size: DEFAULT_POPULATION_SIZE,
            generations: DEFAULT_GENERATIONS,
            elite_percent: DEFAULT_ELITE_PERCENT,
            mating_percent: DEFAULT_MATING_PERCENT,
            mutation_probability: DEFAULT_MUTATION_PROBABILITY,
            crossover: None,
            mutation: None,
            selection: None,
        }
    }

    /// Individuals per generation.
    #[must_use]
    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// Generations run after the initial population.
    #[must_use]
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Number of individuals copied unchanged into each new generation.
    #[must_use]
    pub fn elite_count(&self) -> usize {
        self.population_size * self.elite_percent / 100
    }

    /// Runs the search with a generator seeded from `seed`.
    ///
    /// The seed is recorded in the report metadata.
    ///
    /// # Errors
    /// See [`Gas::run`].
    pub fn run_seeded(&self, seed: u64) -> Result<GasReport, GasError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.search(&mut rng, Some(seed))
    }

    /// Runs the genetic algorithm using the provided random number generator.
    ///
    /// # Errors
    /// Returns [`GasError::NoFeatures`] for a zero-width fitness and
    /// propagates any error emitted by evaluation or the configured
    /// operators.
    pub fn run<R: Rng>(&self, rng: &mut R) -> Result<GasReport, GasError> {
        self.search(rng, None)
    }

    fn search<R: Rng>(&self, rng: &mut R, seed: Option<u64>) -> Result<GasReport, GasError> {
        let width = self.fitness.width();
        if width == 0 {
            return Err(GasError::NoFeatures);
        }
        let genomes = (0..self.population_size)
            .map(|_| FeatureSubset::new((0..width).map(|_| rng.gen_bool(0.5)).collect()))
            .collect();
        let mut population = self.score(genomes, rng)?;
        let mut stats = RunStats::new();
        stats.record(&population);
        log::info!(
            "{:<32}{:<32}",
            "initial population",
            format!("best {:.5} mean {:.5}", population.get_best(), population.get_mean())
        );
        for generation in 1..=self.generations {
            let mut offspring = self.breed(&population, rng)?;
            for genes in &mut offspring {
                self.mutation.mutate(genes, rng);
            }
            population = self.score(offspring, rng)?;
            stats.record(&population);
            log::info!(
                "{:<32}{:<32}",
                format!("generation {generation}"),
                format!("best {:.5} mean {:.5}", population.get_best(), population.get_mean())
            );
        }
        let (selected, score, clustering) = population
            .best_individual()
            .cloned()
            .map(Individual::into_parts)
            .ok_or(GasError::InvalidPopulationSize(0))?;
        log::info!("best individual {selected} scored {score:.5}");
        Ok(GasReport {
            selected,
            score,
            clustering,
            population,
            stats,
            metadata: ExperimentMetadata::new(
                self.generations,
                seed,
                std::any::type_name::<R>(),
            ),
        })
    }

    /// Elites first, then crossover offspring, before mutation.
    fn breed<R: Rng>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Result<Vec<FeatureSubset>, GasError> {
        let individuals = population.individuals();
        let fitness: Vec<f64> = individuals.iter().map(Individual::fitness).collect();
        let mut offspring: Vec<FeatureSubset> = individuals
            .iter()
            .take(self.elite_count())
            .map(|individual| individual.features().clone())
            .collect();
        while offspring.len() < self.population_size {
            let (first, second) = self
                .selection
                .select_pair(&fitness, rng)
                .ok_or(GasError::SelectionFailed)?;
            let (parent_a, parent_b) = individuals
                .get(first)
                .zip(individuals.get(second))
                .ok_or(GasError::SelectionFailed)?;
            offspring.push(
                self.crossover
                    .crossover(parent_a.features(), parent_b.features(), rng),
            );
        }
        Ok(offspring)
    }

    /// Scores every genome with its own child generator, then sorts.
    fn score<R: Rng>(
        &self,
        genomes: Vec<FeatureSubset>,
        rng: &mut R,
    ) -> Result<Population, GasError> {
        let seeds: Vec<u64> = genomes.iter().map(|_| rng.gen()).collect();
        #[cfg(feature = "parallel")]
        let scored: FitnessResult<Vec<Individual>> = genomes
            .into_par_iter()
            .zip(seeds.into_par_iter())
            .map(|(genes, seed)| self.score_one(genes, seed))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let scored: FitnessResult<Vec<Individual>> = genomes
            .into_iter()
            .zip(seeds)
            .map(|(genes, seed)| self.score_one(genes, seed))
            .collect();
        let mut population = Population::from_individuals(scored?);
        population.sort();
        Ok(population)
    }

    fn score_one(&self, genes: FeatureSubset, seed: u64) -> FitnessResult<Individual> {
        let mut rng = StdRng::seed_from_u64(seed);
        let evaluation = self.fitness.evaluate(&genes, &mut rng)?;
        log::debug!("individual {genes} scored {:.5}", evaluation.score);
        Ok(Individual::from_parts(
            genes,
            evaluation.score,
            evaluation.clustering,
        ))
    }
}
