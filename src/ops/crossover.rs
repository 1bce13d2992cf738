//! Crossover operators for recombining gene vectors.

use crate::core::FeatureSubset;
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Produces one offspring by mixing the genes of two parents.
///
/// # Examples
/// ```
/// use silhouette_select::ops::CrossoverOperator;
/// use silhouette_select::FeatureSubset;
///
/// struct TakeSecond;
///
/// impl CrossoverOperator for TakeSecond {
///     fn crossover(&self, _a: &FeatureSubset, b: &FeatureSubset, _rng: &mut dyn rand::RngCore) -> FeatureSubset {
///         b.clone()
///     }
/// }
///
/// let a = FeatureSubset::new(vec![true, true]);
/// let b = FeatureSubset::new(vec![false, true]);
/// let child = TakeSecond.crossover(&a, &b, &mut rand::thread_rng());
/// assert_eq!(child, b);
/// ```
pub trait CrossoverOperator: Send + Sync {
    /// Recombines two parents of equal width into an offspring.
    fn crossover(
        &self,
        parent_a: &FeatureSubset,
        parent_b: &FeatureSubset,
        rng: &mut dyn RngCore,
    ) -> FeatureSubset;
}

impl<T: CrossoverOperator + ?Sized> CrossoverOperator for Box<T> {
    fn crossover(
        &self,
        parent_a: &FeatureSubset,
        parent_b: &FeatureSubset,
        rng: &mut dyn RngCore,
    ) -> FeatureSubset {
        (**self).crossover(parent_a, parent_b, rng)
    }
}

impl<T: CrossoverOperator + ?Sized> CrossoverOperator for Arc<T> {
    fn crossover(
        &self,
        parent_a: &FeatureSubset,
        parent_b: &FeatureSubset,
        rng: &mut dyn RngCore,
    ) -> FeatureSubset {
        (**self).crossover(parent_a, parent_b, rng)
    }
}

/// Single-point crossover with a cut drawn uniformly from `[0, width)`.
///
/// Genes at indices up to and including the cut come from the first parent,
/// the rest from the second.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePointCrossover;

impl SinglePointCrossover {
    /// Builds the offspring for a known cut point.
    #[must_use]
    pub fn splice(parent_a: &FeatureSubset, parent_b: &FeatureSubset, cut: usize) -> FeatureSubset {
        FeatureSubset::new(
            parent_a
                .genes()
                .iter()
                .zip(parent_b.genes())
                .enumerate()
                .map(|(index, (&gene_a, &gene_b))| if index <= cut { gene_a } else { gene_b })
                .collect(),
        )
    }
}

impl CrossoverOperator for SinglePointCrossover {
    fn crossover(
        &self,
        parent_a: &FeatureSubset,
        parent_b: &FeatureSubset,
        rng: &mut dyn RngCore,
    ) -> FeatureSubset {
        let width = parent_a.width().min(parent_b.width());
        if width == 0 {
            return FeatureSubset::empty(0);
        }
        let cut = rng.gen_range(0..width);
        Self::splice(parent_a, parent_b, cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn splice_takes_prefix_through_cut_from_first_parent() {
        let a = FeatureSubset::full(5);
        let b = FeatureSubset::empty(5);
        let child = SinglePointCrossover::splice(&a, &b, 1);
        assert_eq!(child.genes(), &[true, true, false, false, false]);
        let last = SinglePointCrossover::splice(&a, &b, 4);
        assert_eq!(last, a);
    }

    #[test]
    fn offspring_is_a_prefix_suffix_mix() {
        let a = FeatureSubset::full(6);
        let b = FeatureSubset::empty(6);
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let child = SinglePointCrossover.crossover(&a, &b, &mut rng);
            assert_eq!(child.width(), 6);
            let ones = child.len();
            assert!((1..=6).contains(&ones));
            assert!(child.genes()[..ones].iter().all(|&gene| gene));
        }
    }

    #[test]
    fn zero_width_parents_yield_zero_width_child() {
        let empty = FeatureSubset::empty(0);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(SinglePointCrossover.crossover(&empty, &empty, &mut rng).width(), 0);
    }
}
