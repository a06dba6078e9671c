use super::OrganismID;

use std::error::Error;
use std::fmt;

/// An error type indicating an invalid configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A probability was outside of `[0.0, 1.0]`.
    ProbabilityOutOfRange { field: &'static str, value: f32 },
    /// A quantity that must be non-negative and finite was not.
    Negative { field: &'static str, value: f32 },
    /// A value is inconsistent with the rest of the configuration.
    Inconsistent {
        field: &'static str,
        reason: &'static str,
    },
}

/// An error type indicating a failure to create
/// or evolve a population.
#[derive(Debug, Clone, PartialEq)]
pub enum PopulationError {
    /// The population or genetic configuration is invalid.
    InvalidConfig(ConfigError),
    /// More seed genomes were given than fit in the population.
    TooManySeeds { seeds: usize, size: usize },
    /// The seed genome at the given index doesn't match
    /// the genetic configuration.
    NonconformingSeed(usize),
    /// Every species was removed, leaving nothing to reproduce.
    DegeneratePopulation,
}

/// An error type indicating a failure during
/// fitness evaluation. No fitness values are
/// written when this is returned.
#[derive(Debug)]
pub enum EvaluationError {
    /// The evaluator itself failed on an organism.
    Evaluator {
        organism: OrganismID,
        source: Box<dyn Error + Send + Sync>,
    },
    /// The evaluator returned a negative or non-finite fitness.
    InvalidFitness { organism: OrganismID, fitness: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProbabilityOutOfRange { field, value } => {
                write!(f, "{} must be in [0, 1], got {}", field, value)
            }
            Self::Negative { field, value } => {
                write!(f, "{} must be finite and non-negative, got {}", field, value)
            }
            Self::Inconsistent { field, reason } => write!(f, "invalid {}: {}", field, reason),
        }
    }
}

impl fmt::Display for PopulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(e) => write!(f, "invalid configuration: {}", e),
            Self::TooManySeeds { seeds, size } => write!(
                f,
                "{} seed genomes given for a population of size {}",
                seeds, size
            ),
            Self::NonconformingSeed(i) => {
                write!(f, "seed genome {} does not match the genetic configuration", i)
            }
            Self::DegeneratePopulation => {
                write!(f, "attempted evolution on degenerate population")
            }
        }
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evaluator { organism, source } => {
                write!(f, "evaluation of organism {} failed: {}", organism, source)
            }
            Self::InvalidFitness { organism, fitness } => write!(
                f,
                "evaluator returned invalid fitness {} for organism {}",
                fitness, organism
            ),
        }
    }
}

impl Error for ConfigError {}

impl Error for PopulationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            _ => None,
        }
    }
}

impl Error for EvaluationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Evaluator { source, .. } => Some(source.as_ref()),
            Self::InvalidFitness { .. } => None,
        }
    }
}

impl From<ConfigError> for PopulationError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}
