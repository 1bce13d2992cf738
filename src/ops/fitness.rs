//! Fitness abstraction queried by both search strategies.

use crate::core::{FeatureSubset, SubsetError};
use crate::kmeans::{Clustering, ClusteringError};
use rand::RngCore;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Convenience alias used by the fitness trait.
pub type FitnessResult<T> = Result<T, FitnessError>;

/// Errors produced while scoring a feature subset.
#[derive(Debug, Clone, PartialEq)]
pub enum FitnessError {
    /// The subset does not span the dataset's columns.
    Subset(SubsetError),
    /// The clustering engine rejected the request.
    Clustering(ClusteringError),
}

impl Display for FitnessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subset(err) => write!(f, "{err}"),
            Self::Clustering(err) => write!(f, "clustering failed: {err}"),
        }
    }
}

impl Error for FitnessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Subset(err) => Some(err),
            Self::Clustering(err) => Some(err),
        }
    }
}

impl From<SubsetError> for FitnessError {
    fn from(err: SubsetError) -> Self {
        Self::Subset(err)
    }
}

impl From<ClusteringError> for FitnessError {
    fn from(err: ClusteringError) -> Self {
        Self::Clustering(err)
    }
}

/// Score of one subset, with the clustering it was computed from.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Silhouette coefficient, or `0.0` for an empty subset.
    pub score: f64,
    /// Clustering behind [`Self::score`]; `None` when nothing was clustered.
    pub clustering: Option<Clustering>,
}

impl Evaluation {
    /// A score that involved no clustering.
    #[must_use]
    pub fn unclustered(score: f64) -> Self {
        Self {
            score,
            clustering: None,
        }
    }

    /// A score backed by a clustering.
    #[must_use]
    pub fn clustered(score: f64, clustering: Clustering) -> Self {
        Self {
            score,
            clustering: Some(clustering),
        }
    }
}

/// Scoring oracle for feature subsets.
///
/// Implementations receive the generator explicitly so that repeated
/// evaluations can be made reproducible by seeding it.
///
/// # Examples
/// ```
/// use silhouette_select::ops::{Evaluation, Fitness, FitnessResult};
/// use silhouette_select::FeatureSubset;
///
/// struct CountSelected;
///
/// impl Fitness for CountSelected {
///     fn width(&self) -> usize { 3 }
///
///     fn evaluate(&self, subset: &FeatureSubset, _rng: &mut dyn rand::RngCore) -> FitnessResult<Evaluation> {
///         Ok(Evaluation::unclustered(subset.len() as f64))
///     }
/// }
///
/// let fitness = CountSelected;
/// let mut rng = rand::thread_rng();
/// let subset = FeatureSubset::from_indices(3, [0, 2]).unwrap();
/// assert_eq!(fitness.evaluate(&subset, &mut rng).unwrap().score, 2.0);
/// ```
pub trait Fitness: Send + Sync {
    /// Number of feature columns subsets must span.
    fn width(&self) -> usize;

    /// Scores `subset`.
    ///
    /// # Errors
    /// Implementations may return [`FitnessError`] to describe domain issues.
    fn evaluate(&self, subset: &FeatureSubset, rng: &mut dyn RngCore)
        -> FitnessResult<Evaluation>;
}

impl<T: Fitness + ?Sized> Fitness for &T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn evaluate(
        &self,
        subset: &FeatureSubset,
        rng: &mut dyn RngCore,
    ) -> FitnessResult<Evaluation> {
        (**self).evaluate(subset, rng)
    }
}

impl<T: Fitness + ?Sized> Fitness for Box<T> {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn evaluate(
        &self,
        subset: &FeatureSubset,
        rng: &mut dyn RngCore,
    ) -> FitnessResult<Evaluation> {
        (**self).evaluate(subset, rng)
    }
}

impl<T: Fitness + ?Sized> Fitness for Arc<T> {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn evaluate(
        &self,
        subset: &FeatureSubset,
        rng: &mut dyn RngCore,
    ) -> FitnessResult<Evaluation> {
        (**self).evaluate(subset, rng)
    }
}
