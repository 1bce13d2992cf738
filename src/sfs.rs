//! Stepwise forward selection.
//!
//! The search grows a feature set one column at a time. Each round scores
//! every remaining column added to the current selection, keeps the best
//! candidate, and stops as soon as the best candidate fails to beat the score
//! of the previous round.

use crate::core::{FeatureSubset, SubsetError};
use crate::kmeans::Clustering;
use crate::ops::{Fitness, FitnessError};
use rand::Rng;
use std::fmt::{self, Display, Formatter};

/// Selected and remaining columns plus the best score accepted so far.
///
/// `selected` and `remaining` always partition the column range, and
/// `global_best` never decreases.
///
/// # Examples
/// ```
/// use silhouette_select::sfs::SearchState;
///
/// let mut state = SearchState::new(3);
/// assert_eq!(state.global_best(), f64::NEG_INFINITY);
/// state.accept(1, 0.4).unwrap();
/// assert_eq!(state.selected().indices().collect::<Vec<_>>(), vec![1]);
/// assert_eq!(state.remaining().indices().collect::<Vec<_>>(), vec![0, 2]);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    selected: FeatureSubset,
    remaining: FeatureSubset,
    global_best: f64,
}

impl SearchState {
    /// Starts with nothing selected and every column remaining.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            selected: FeatureSubset::empty(width),
            remaining: FeatureSubset::full(width),
            global_best: f64::NEG_INFINITY,
        }
    }

    /// Columns accepted so far.
    #[must_use]
    pub fn selected(&self) -> &FeatureSubset {
        &self.selected
    }

    /// Columns not yet tried as accepted additions.
    #[must_use]
    pub fn remaining(&self) -> &FeatureSubset {
        &self.remaining
    }

    /// Best accepted score, `-inf` before the first acceptance.
    #[must_use]
    pub fn global_best(&self) -> f64 {
        self.global_best
    }

    /// Moves `index` from the remaining to the selected columns.
    ///
    /// # Errors
    /// Returns [`SubsetError::IndexOutOfRange`] when `index` is not a
    /// remaining column.
    pub fn accept(&mut self, index: usize, score: f64) -> Result<(), SubsetError> {
        if !self.remaining.remove(index) {
            return Err(SubsetError::IndexOutOfRange {
                index,
                width: self.remaining.width(),
            });
        }
        self.selected.insert(index)?;
        self.global_best = self.global_best.max(score);
        Ok(())
    }
}

/// Candidates scored in one round and the column accepted, if any.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SfsRound {
    /// `(column, score)` for every column tried this round, ascending by column.
    pub candidates: Vec<(usize, f64)>,
    /// Column added to the selection; `None` on the final, rejected round.
    pub accepted: Option<usize>,
}

/// Outcome of [`Sfs::run`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SfsReport {
    /// Final selection.
    pub selected: FeatureSubset,
    /// Score of the last accepted round.
    pub score: f64,
    /// Clustering from the last accepted evaluation.
    pub clustering: Option<Clustering>,
    /// Every round in order, including the terminating one.
    pub rounds: Vec<SfsRound>,
}

/// Errors produced by [`Sfs::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum SfsError {
    /// The fitness spans zero columns.
    NoFeatures,
    /// Bookkeeping on the search state failed.
    Subset(SubsetError),
    /// Wrapper around [`FitnessError`].
    Fitness(FitnessError),
}

impl Display for SfsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFeatures => f.write_str("forward selection needs at least one feature"),
            Self::Subset(err) => write!(f, "{err}"),
            Self::Fitness(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SfsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoFeatures => None,
            Self::Subset(err) => Some(err),
            Self::Fitness(err) => Some(err),
        }
    }
}

impl From<SubsetError> for SfsError {
    fn from(err: SubsetError) -> Self {
        Self::Subset(err)
    }
}

impl From<FitnessError> for SfsError {
    fn from(err: FitnessError) -> Self {
        Self::Fitness(err)
    }
}

/// Greedy forward search over a [`Fitness`].
///
/// # Examples
/// ```
/// use silhouette_select::ops::{Evaluation, Fitness, FitnessResult};
/// use silhouette_select::{FeatureSubset, Sfs};
/// use rand::SeedableRng;
///
/// // Column 2 helps, every other column hurts.
/// struct OnlyTwo;
///
/// impl Fitness for OnlyTwo {
///     fn width(&self) -> usize { 4 }
///
///     fn evaluate(&self, subset: &FeatureSubset, _rng: &mut dyn rand::RngCore) -> FitnessResult<Evaluation> {
///         let bonus = if subset.contains(2) { 1.0 } else { 0.0 };
///         Ok(Evaluation::unclustered(bonus - 0.1 * subset.len() as f64))
///     }
/// }
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let report = Sfs::new(OnlyTwo).run(&mut rng).unwrap();
/// assert_eq!(report.selected.indices().collect::<Vec<_>>(), vec![2]);
/// assert_eq!(report.rounds.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Sfs<F> {
    fitness: F,
}

impl<F> Sfs<F>
where
    F: Fitness,
{
    /// Creates a search over `fitness`.
    #[must_use]
    pub fn new(fitness: F) -> Self {
        Self { fitness }
    }

    /// The scoring oracle.
    #[must_use]
    pub fn fitness(&self) -> &F {
        &self.fitness
    }

    /// Runs the search until no remaining column improves the score.
    ///
    /// # Errors
    /// Returns [`SfsError::NoFeatures`] for a zero-width fitness and
    /// propagates evaluation failures.
    pub fn run<R: Rng>(&self, rng: &mut R) -> Result<SfsReport, SfsError> {
        let width = self.fitness.width();
        if width == 0 {
            return Err(SfsError::NoFeatures);
        }
        let mut state = SearchState::new(width);
        let mut clustering = None;
        let mut rounds = Vec::new();
        while !state.remaining().is_empty() {
            let mut candidates = Vec::with_capacity(state.remaining().len());
            let mut local_best = f64::NEG_INFINITY;
            let mut best = None;
            for index in state.remaining().indices() {
                let candidate = state.selected().with(index)?;
                let evaluation = self.fitness.evaluate(&candidate, rng)?;
                log::debug!("candidate {candidate} scored {:.5}", evaluation.score);
                candidates.push((index, evaluation.score));
                if evaluation.score > local_best {
                    local_best = evaluation.score;
                    best = Some((index, evaluation.clustering));
                }
            }
            match best {
                Some((index, winner)) if local_best > state.global_best() => {
                    state.accept(index, local_best)?;
                    clustering = winner;
                    log::info!(
                        "{:<32}{:<32}",
                        format!("accepted feature {index}"),
                        format!("score {local_best:.5}")
                    );
                    rounds.push(SfsRound {
                        candidates,
                        accepted: Some(index),
                    });
                }
                _ => {
                    log::info!(
                        "no candidate beats {:.5}, stopping with {}",
                        state.global_best(),
                        state.selected()
                    );
                    rounds.push(SfsRound {
                        candidates,
                        accepted: None,
                    });
                    break;
                }
            }
        }
        let SearchState {
            selected,
            global_best,
            ..
        } = state;
        Ok(SfsReport {
            selected,
            score: global_best,
            clustering,
            rounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{Evaluation, FitnessResult};
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Additive per-column gains; the score is their sum.
    struct Gains {
        gains: Vec<f64>,
        calls: AtomicUsize,
    }

    impl Gains {
        fn new(gains: Vec<f64>) -> Self {
            Self {
                gains,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Fitness for Gains {
        fn width(&self) -> usize {
            self.gains.len()
        }

        fn evaluate(
            &self,
            subset: &FeatureSubset,
            _rng: &mut dyn RngCore,
        ) -> FitnessResult<Evaluation> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(Evaluation::unclustered(
                subset.indices().map(|index| self.gains[index]).sum(),
            ))
        }
    }

    #[test]
    fn adds_every_positive_column_in_order_of_gain() {
        let fitness = Gains::new(vec![0.1, -0.5, 0.3, 0.2]);
        let report = Sfs::new(fitness).run(&mut StdRng::seed_from_u64(0)).unwrap();
        let accepted: Vec<_> = report.rounds.iter().filter_map(|round| round.accepted).collect();
        assert_eq!(accepted, vec![2, 3, 0]);
        assert_eq!(report.selected.indices().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert!((report.score - 0.6).abs() < 1e-12);
        assert_eq!(report.rounds.last().unwrap().accepted, None);
    }

    #[test]
    fn scores_never_decrease_and_rounds_shrink() {
        let fitness = Gains::new(vec![0.4, 0.3, 0.2, 0.1, 0.05]);
        let report = Sfs::new(fitness).run(&mut StdRng::seed_from_u64(0)).unwrap();
        let mut previous = f64::NEG_INFINITY;
        for (round, expected) in report.rounds.iter().zip((1..=5).rev()) {
            assert_eq!(round.candidates.len(), expected);
            let best = round
                .candidates
                .iter()
                .map(|&(_, score)| score)
                .fold(f64::NEG_INFINITY, f64::max);
            assert!(best >= previous);
            previous = best;
        }
        assert_eq!(report.selected.len(), 5);
    }

    #[test]
    fn exhausting_columns_ends_without_rejected_round() {
        let fitness = Gains::new(vec![1.0, 1.0]);
        let report = Sfs::new(fitness).run(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(report.rounds.len(), 2);
        assert!(report.rounds.iter().all(|round| round.accepted.is_some()));
    }

    #[test]
    fn first_column_wins_ties() {
        let fitness = Gains::new(vec![0.0, 0.5, 0.5, -1.0]);
        let report = Sfs::new(fitness).run(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(report.rounds[0].accepted, Some(1));
        // {1, 2} scores 1.0 in round two.
        assert_eq!(report.rounds[1].accepted, Some(2));
        assert_eq!(report.selected.indices().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn equal_score_does_not_extend_selection() {
        let fitness = Gains::new(vec![0.5, 0.0]);
        let sfs = Sfs::new(fitness);
        let report = sfs.run(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(report.selected.indices().collect::<Vec<_>>(), vec![0]);
        assert_eq!(sfs.fitness().calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn zero_width_is_an_error() {
        let fitness = Gains::new(Vec::new());
        let err = Sfs::new(fitness)
            .run(&mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert_eq!(err, SfsError::NoFeatures);
    }

    #[test]
    fn accept_rejects_unknown_column() {
        let mut state = SearchState::new(2);
        state.accept(0, 0.2).unwrap();
        assert!(state.accept(0, 0.3).is_err());
        assert!(state.accept(5, 0.3).is_err());
        assert_eq!(state.global_best(), 0.2);
    }
}
