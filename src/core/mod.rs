//! Core selection primitives.
//!
//! [`FeatureSubset`] is the single representation of "which columns take part
//! in a distance computation" shared by the clustering engine, the stepwise
//! search and the genetic search. [`Individual`] and [`Population`] are the
//! genetic search's view of scored subsets.

pub mod experiment;

pub use experiment::{ExperimentMetadata, RunStats};

use crate::kmeans::Clustering;
use std::fmt::{self, Display, Formatter};

/// Fixed-width membership vector over the feature columns of a dataset.
///
/// The width is the total number of features; a column participates in
/// distance computations when its flag is set. Membership tests are O(1) and
/// iteration over selected indices is always ascending.
///
/// # Examples
/// ```
/// use silhouette_select::FeatureSubset;
/// let subset = FeatureSubset::from_indices(4, [2, 0]).unwrap();
/// assert_eq!(subset.width(), 4);
/// assert_eq!(subset.len(), 2);
/// assert_eq!(subset.indices().collect::<Vec<_>>(), vec![0, 2]);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureSubset {
    genes: Vec<bool>,
}

impl FeatureSubset {
    /// Creates a subset with no columns selected.
    ///
    /// # Examples
    /// ```
    /// use silhouette_select::FeatureSubset;
    /// let subset = FeatureSubset::empty(3);
    /// assert!(subset.is_empty());
    /// assert_eq!(subset.width(), 3);
    /// ```
    #[must_use]
    pub fn empty(width: usize) -> Self {
        Self {
            genes: vec![false; width],
        }
    }

    /// Creates a subset with every column selected.
    ///
    /// # Examples
    /// ```
    /// use silhouette_select::FeatureSubset;
    /// let subset = FeatureSubset::full(3);
    /// assert_eq!(subset.len(), 3);
    /// ```
    #[must_use]
    pub fn full(width: usize) -> Self {
        Self {
            genes: vec![true; width],
        }
    }

    /// Wraps a raw gene vector.
    ///
    /// # Examples
    /// ```
    /// use silhouette_select::FeatureSubset;
    /// let subset = FeatureSubset::new(vec![true, false, true]);
    /// assert_eq!(subset.to_string(), "[ 0 2 ]");
    /// ```
    #[must_use]
    pub fn new(genes: Vec<bool>) -> Self {
        Self { genes }
    }

    /// Builds a subset of the given width from column indices.
    ///
    /// Duplicate indices are collapsed.
    ///
    /// # Errors
    /// Returns [`SubsetError::IndexOutOfRange`] when an index is not below
    /// `width`.
    pub fn from_indices(
        width: usize,
        indices: impl IntoIterator<Item = usize>,
    ) -> Result<Self, SubsetError> {
        let mut subset = Self::empty(width);
        for index in indices {
            subset.insert(index)?;
        }
        Ok(subset)
    }

    /// Total number of feature columns, selected or not.
    #[must_use]
    pub fn width(&self) -> usize {
        self.genes.len()
    }

    /// Number of selected columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.iter().filter(|&&gene| gene).count()
    }

    /// Indicates whether no column is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.genes.iter().any(|&gene| gene)
    }

    /// Indicates whether `index` is selected. Out-of-range indices are not.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.genes.get(index).copied().unwrap_or(false)
    }

    /// Selects `index`.
    ///
    /// # Errors
    /// Returns [`SubsetError::IndexOutOfRange`] when `index` is not below the
    /// width.
    pub fn insert(&mut self, index: usize) -> Result<(), SubsetError> {
        let width = self.width();
        let gene = self
            .genes
            .get_mut(index)
            .ok_or(SubsetError::IndexOutOfRange { index, width })?;
        *gene = true;
        Ok(())
    }

    /// Deselects `index`. Returns whether it was selected.
    pub fn remove(&mut self, index: usize) -> bool {
        match self.genes.get_mut(index) {
            Some(gene) => std::mem::replace(gene, false),
            None => false,
        }
    }

    /// Flips the flag of `index`; out-of-range indices are ignored.
    pub fn flip(&mut self, index: usize) {
        if let Some(gene) = self.genes.get_mut(index) {
            *gene = !*gene;
        }
    }

    /// Returns a copy with `index` additionally selected.
    ///
    /// # Errors
    /// Returns [`SubsetError::IndexOutOfRange`] when `index` is not below the
    /// width.
    pub fn with(&self, index: usize) -> Result<Self, SubsetError> {
        let mut next = self.clone();
        next.insert(index)?;
        Ok(next)
    }

    /// Selected column indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.genes
            .iter()
            .enumerate()
            .filter_map(|(index, &gene)| gene.then_some(index))
    }

    /// Raw membership flags.
    #[must_use]
    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    /// Checks that the subset spans exactly `width` columns.
    ///
    /// # Errors
    /// Returns [`SubsetError::WidthMismatch`] otherwise.
    pub fn validate_width(&self, width: usize) -> Result<(), SubsetError> {
        if self.width() != width {
            return Err(SubsetError::WidthMismatch {
                expected: width,
                found: self.width(),
            });
        }
        Ok(())
    }
}

impl Display for FeatureSubset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[ ")?;
        for index in self.indices() {
            write!(f, "{index} ")?;
        }
        f.write_str("]")
    }
}

/// A scored feature subset inside the genetic search.
///
/// # Examples
/// ```
/// use silhouette_select::{FeatureSubset, Individual};
/// let individual = Individual::unscored(FeatureSubset::full(2));
/// assert_eq!(individual.fitness(), 0.0);
/// assert!(individual.clustering().is_none());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    features: FeatureSubset,
    fitness: f64,
    clustering: Option<Clustering>,
}

impl Individual {
    /// Creates an individual that has not been scored yet.
    #[must_use]
    pub fn unscored(features: FeatureSubset) -> Self {
        Self {
            features,
            fitness: 0.0,
            clustering: None,
        }
    }

    /// Creates an individual from its parts.
    #[must_use]
    pub fn from_parts(features: FeatureSubset, fitness: f64, clustering: Option<Clustering>) -> Self {
        Self {
            features,
            fitness,
            clustering,
        }
    }

    /// Returns the gene vector.
    #[must_use]
    pub fn features(&self) -> &FeatureSubset {
        &self.features
    }

    /// Silhouette score of the last scoring pass.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Clustering from the last scoring pass; `None` for empty subsets.
    #[must_use]
    pub fn clustering(&self) -> Option<&Clustering> {
        self.clustering.as_ref()
    }

    /// Consumes the individual and returns its parts.
    #[must_use]
    pub fn into_parts(self) -> (FeatureSubset, f64, Option<Clustering>) {
        (self.features, self.fitness, self.clustering)
    }
}

/// Ordered collection of [`Individual`] values forming one generation.
///
/// A population is built once per generation and replaced wholesale by the
/// next one.
///
/// # Examples
/// ```
/// use silhouette_select::{FeatureSubset, Individual, Population};
/// let mut population = Population::from_individuals(vec![
///     Individual::from_parts(FeatureSubset::new(vec![true, false]), 0.2, None),
///     Individual::from_parts(FeatureSubset::new(vec![false, true]), 0.7, None),
/// ]);
/// population.sort();
/// assert_eq!(population.get_best(), 0.7);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Wraps the provided individuals, keeping their order.
    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// Returns the number of individuals in the population.
    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Indicates whether the population is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Returns the first individual, which is the fittest once sorted.
    #[must_use]
    pub fn best_individual(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Returns the fitness of the first individual, or negative infinity.
    #[must_use]
    pub fn get_best(&self) -> f64 {
        self.best_individual()
            .map_or(f64::NEG_INFINITY, Individual::fitness)
    }

    /// Returns the mean fitness of the population.
    #[must_use]
    pub fn get_mean(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.individuals.iter().map(Individual::fitness).sum();
        sum / Self::len_as_f64(self.individuals.len())
    }

    /// Returns the population standard deviation of the fitness values.
    #[must_use]
    pub fn get_std(&self) -> f64 {
        if self.individuals.len() <= 1 {
            return 0.0;
        }
        let mean = self.get_mean();
        let variance: f64 = self
            .individuals
            .iter()
            .map(|individual| {
                let diff = individual.fitness() - mean;
                diff * diff
            })
            .sum::<f64>()
            / Self::len_as_f64(self.individuals.len());
        variance.sqrt()
    }

    /// Sorts by fitness, highest first. Equal fitness keeps insertion order.
    pub fn sort(&mut self) {
        self.individuals
            .sort_by(|lhs, rhs| rhs.fitness().total_cmp(&lhs.fitness()));
    }

    /// Returns the underlying individuals.
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    fn len_as_f64(len: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        {
            len as f64
        }
    }
}

/// Error returned when a subset does not fit the dataset it is used with.
///
/// # Examples
/// ```
/// use silhouette_select::FeatureSubset;
/// let err = FeatureSubset::from_indices(2, [5]).unwrap_err();
/// assert!(err.to_string().contains("out of range"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsetError {
    /// A column index is not below the subset width.
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Width of the subset.
        width: usize,
    },
    /// The subset width does not match the number of dataset features.
    WidthMismatch {
        /// Number of features in the dataset.
        expected: usize,
        /// Width of the provided subset.
        found: usize,
    },
}

impl Display for SubsetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, width } => {
                write!(f, "feature index {index} is out of range for width {width}")
            }
            Self::WidthMismatch { expected, found } => write!(
                f,
                "feature subset spans {found} columns but the dataset has {expected}"
            ),
        }
    }
}

impl std::error::Error for SubsetError {}
