//! Parent selection operators.

use crate::ops::OperatorError;
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Selects parents from a population sorted by descending fitness.
pub trait SelectionOperator: Send + Sync {
    /// Returns the index of the individual to use as a parent.
    fn select_index(&self, fitness_values: &[f64], rng: &mut dyn RngCore) -> Option<usize>;

    /// Samples two parents independently.
    fn select_pair(&self, fitness_values: &[f64], rng: &mut dyn RngCore) -> Option<(usize, usize)> {
        let first = self.select_index(fitness_values, rng)?;
        let second = self.select_index(fitness_values, rng)?;
        Some((first, second))
    }
}

impl<T: SelectionOperator + ?Sized> SelectionOperator for Box<T> {
    fn select_index(&self, fitness_values: &[f64], rng: &mut dyn RngCore) -> Option<usize> {
        (**self).select_index(fitness_values, rng)
    }
}

impl<T: SelectionOperator + ?Sized> SelectionOperator for Arc<T> {
    fn select_index(&self, fitness_values: &[f64], rng: &mut dyn RngCore) -> Option<usize> {
        (**self).select_index(fitness_values, rng)
    }
}

/// Uniform draw, with replacement, from the top `percent` of a population
/// already sorted best first.
///
/// The pool size is `floor(len * percent / 100)`.
///
/// # Examples
/// ```
/// use silhouette_select::ops::{SelectionOperator, TruncationSelection};
///
/// let top_half = TruncationSelection::new(50).unwrap();
/// assert_eq!(top_half.pool_size(10), 5);
/// let fitness = [0.9, 0.8, 0.1, 0.0];
/// let index = top_half.select_index(&fitness, &mut rand::thread_rng()).unwrap();
/// assert!(index < 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TruncationSelection {
    percent: usize,
}

impl TruncationSelection {
    /// Creates a selector over the top `percent` of the population.
    ///
    /// # Errors
    /// Returns [`OperatorError::InvalidPercent`] when `percent` exceeds 100.
    pub fn new(percent: usize) -> Result<Self, OperatorError> {
        if percent > 100 {
            return Err(OperatorError::InvalidPercent {
                operator: "truncation selection",
                value: percent,
            });
        }
        Ok(Self { percent })
    }

    /// Number of individuals eligible for selection out of `len`.
    #[must_use]
    pub fn pool_size(&self, len: usize) -> usize {
        len * self.percent / 100
    }
}

impl SelectionOperator for TruncationSelection {
    fn select_index(&self, fitness_values: &[f64], rng: &mut dyn RngCore) -> Option<usize> {
        let pool = self.pool_size(fitness_values.len());
        if pool == 0 {
            return None;
        }
        Some(rng.gen_range(0..pool))
    }
}
