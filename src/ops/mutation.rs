//! Mutation operators for perturbing gene vectors in place.

use crate::core::FeatureSubset;
use crate::ops::OperatorError;
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Perturbs a gene vector in place.
pub trait MutationOperator: Send + Sync {
    /// Mutates `genes`.
    fn mutate(&self, genes: &mut FeatureSubset, rng: &mut dyn RngCore);
}

impl<T: MutationOperator + ?Sized> MutationOperator for Box<T> {
    fn mutate(&self, genes: &mut FeatureSubset, rng: &mut dyn RngCore) {
        (**self).mutate(genes, rng);
    }
}

impl<T: MutationOperator + ?Sized> MutationOperator for Arc<T> {
    fn mutate(&self, genes: &mut FeatureSubset, rng: &mut dyn RngCore) {
        (**self).mutate(genes, rng);
    }
}

/// Flips every gene independently with a fixed probability.
///
/// # Examples
/// ```
/// use silhouette_select::ops::{BitFlipMutation, MutationOperator};
/// use silhouette_select::FeatureSubset;
///
/// let always = BitFlipMutation::new(1.0).unwrap();
/// let mut genes = FeatureSubset::new(vec![true, false]);
/// always.mutate(&mut genes, &mut rand::thread_rng());
/// assert_eq!(genes.genes(), &[false, true]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BitFlipMutation {
    probability: f64,
}

impl BitFlipMutation {
    /// Creates a new bit-flip operator.
    ///
    /// # Errors
    /// Returns [`OperatorError::InvalidProbability`] when `probability` is not
    /// a finite value in `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self, OperatorError> {
        if !(probability.is_finite() && (0.0..=1.0).contains(&probability)) {
            return Err(OperatorError::InvalidProbability {
                operator: "bit-flip mutation",
                value: probability,
            });
        }
        Ok(Self { probability })
    }

    /// Per-gene flip probability.
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl MutationOperator for BitFlipMutation {
    fn mutate(&self, genes: &mut FeatureSubset, rng: &mut dyn RngCore) {
        for index in 0..genes.width() {
            if rng.gen::<f64>() < self.probability {
                genes.flip(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_probability_never_flips() {
        let operator = BitFlipMutation::new(0.0).unwrap();
        let mut genes = FeatureSubset::new(vec![true, false, true]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            operator.mutate(&mut genes, &mut rng);
        }
        assert_eq!(genes.genes(), &[true, false, true]);
    }

    #[test]
    fn flip_rate_tracks_probability() {
        let operator = BitFlipMutation::new(0.05).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let mut flips = 0;
        for _ in 0..200 {
            let mut genes = FeatureSubset::empty(100);
            operator.mutate(&mut genes, &mut rng);
            flips += genes.len();
        }
        // 20_000 trials at p = 0.05
        assert!((800..1200).contains(&flips), "unexpected flip count {flips}");
    }

    #[test]
    fn rejects_invalid_probability() {
        assert!(BitFlipMutation::new(1.5).is_err());
        assert!(BitFlipMutation::new(f64::NAN).is_err());
    }
}
