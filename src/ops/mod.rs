//! Search operators and the fitness abstraction.
//!
//! The stepwise and genetic searches only talk to the clustering engine
//! through [`Fitness`]. The genetic search additionally composes a
//! [`SelectionOperator`], a [`CrossoverOperator`] and a [`MutationOperator`];
//! each sub-module provides the trait together with its default
//! implementation.

pub mod crossover;
pub mod fitness;
pub mod mutation;
pub mod selection;

pub use crossover::{CrossoverOperator, SinglePointCrossover};
pub use fitness::{Evaluation, Fitness, FitnessError, FitnessResult};
pub use mutation::{BitFlipMutation, MutationOperator};
pub use selection::{SelectionOperator, TruncationSelection};

use std::fmt::{self, Display, Formatter};

/// Errors raised while constructing operators.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorError {
    /// A probability fell outside `[0, 1]` or was not finite.
    InvalidProbability {
        /// Operator reporting the error.
        operator: &'static str,
        /// Offending probability.
        value: f64,
    },
    /// A percentage fell outside `0..=100`.
    InvalidPercent {
        /// Operator reporting the error.
        operator: &'static str,
        /// Offending percentage.
        value: usize,
    },
}

impl Display for OperatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidProbability { operator, value } => write!(
                f,
                "{operator} probability must be within [0, 1] (received {value})"
            ),
            Self::InvalidPercent { operator, value } => write!(
                f,
                "{operator} percentage must be within 0..=100 (received {value})"
            ),
        }
    }
}

impl std::error::Error for OperatorError {}
