//! Silhouette-based fitness over a clustering engine.

use crate::core::FeatureSubset;
use crate::data::Dataset;
use crate::kmeans::{ClusteringError, KMeans};
use crate::ops::{Evaluation, Fitness, FitnessResult};
use rand::RngCore;

/// Scores a subset by fitting K-Means on it and taking the mean silhouette.
///
/// Every call runs a fresh fit: nothing is cached between calls, so scoring
/// the same subset twice can give different results unless the generator is
/// seeded identically. The empty subset scores `0.0` without clustering.
///
/// # Examples
/// ```
/// use silhouette_select::{Dataset, FeatureSubset, SilhouetteFitness};
/// use silhouette_select::ops::Fitness;
/// use rand::SeedableRng;
///
/// let data = Dataset::from_rows("toy", vec![vec![0.0], vec![1.0], vec![0.0], vec![1.0]], 2).unwrap();
/// let fitness = SilhouetteFitness::from_dataset(&data).unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let empty = fitness.evaluate(&FeatureSubset::empty(1), &mut rng).unwrap();
/// assert_eq!(empty.score, 0.0);
/// assert!(empty.clustering.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct SilhouetteFitness<'a> {
    kmeans: KMeans<'a>,
}

impl<'a> SilhouetteFitness<'a> {
    /// Wraps a configured engine.
    #[must_use]
    pub fn new(kmeans: KMeans<'a>) -> Self {
        Self { kmeans }
    }

    /// Wraps a default engine over `data`.
    ///
    /// # Errors
    /// Propagates [`ClusteringError`] from [`Dataset::kmeans`].
    pub fn from_dataset(data: &'a Dataset) -> Result<Self, ClusteringError> {
        Ok(Self::new(data.kmeans()?))
    }

    /// The underlying engine.
    #[must_use]
    pub fn kmeans(&self) -> &KMeans<'a> {
        &self.kmeans
    }
}

impl Fitness for SilhouetteFitness<'_> {
    fn width(&self) -> usize {
        self.kmeans.width()
    }

    fn evaluate(
        &self,
        subset: &FeatureSubset,
        rng: &mut dyn RngCore,
    ) -> FitnessResult<Evaluation> {
        subset.validate_width(self.width())?;
        if subset.is_empty() {
            return Ok(Evaluation::unclustered(0.0));
        }
        let clustering = self.kmeans.fit(subset, rng)?;
        let score = self.kmeans.silhouette(subset, &clustering)?;
        log::debug!(
            "{subset} scored {score:.5} after {} rounds",
            clustering.iterations()
        );
        Ok(Evaluation::clustered(score, clustering))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::FitnessError;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn noisy(rows: usize, width: usize, seed: u64) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let rows = (0..rows)
            .map(|_| (0..width).map(|_| rng.gen::<f64>()).collect())
            .collect();
        Dataset::from_rows("noise", rows, 3).unwrap()
    }

    #[test]
    fn scores_stay_within_silhouette_bounds() {
        let data = noisy(40, 4, 17);
        let fitness = SilhouetteFitness::from_dataset(&data).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        for mask in 1..16_usize {
            let subset = FeatureSubset::new((0..4).map(|bit| mask & (1 << bit) != 0).collect());
            let evaluation = fitness.evaluate(&subset, &mut rng).unwrap();
            assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&evaluation.score));
            assert_eq!(evaluation.clustering.unwrap().k(), 3);
        }
    }

    #[test]
    fn identical_seeds_reproduce_scores() {
        let data = noisy(30, 3, 5);
        let fitness = SilhouetteFitness::from_dataset(&data).unwrap();
        let subset = FeatureSubset::full(3);
        let first = fitness
            .evaluate(&subset, &mut StdRng::seed_from_u64(99))
            .unwrap();
        let second = fitness
            .evaluate(&subset, &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_subset_of_wrong_width() {
        let data = noisy(10, 2, 1);
        let fitness = SilhouetteFitness::from_dataset(&data).unwrap();
        let err = fitness
            .evaluate(&FeatureSubset::empty(3), &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, FitnessError::Subset(_)));
    }
}
