use super::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. This is
/// checked when a [`Population`] is created.
///
/// [`Population`]: crate::Population
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population. Constant across a run.
    pub size: NonZeroUsize,
    /// Genetic distance threshold, at or beyond which
    /// genomes are considered as belonging to
    /// different species.
    pub distance_threshold: f32,
    /// Chance that an offspring (other than the champion's
    /// clone) is produced by crossover instead of by
    /// mutating a clone of a single parent.
    pub crossover_chance: f32,
    /// Chance that the child of a crossover is also mutated.
    pub post_crossover_mutation_chance: f32,
    /// Fraction of each species' worst members which are
    /// discarded before reproduction.
    pub cull_fraction: f32,
    /// Informational only: every species allotted offspring
    /// keeps an unmutated clone of its champion, whatever its
    /// size. Species with at least this many members have it
    /// traced as canonical elitism, smaller ones as their
    /// guaranteed slot.
    pub elitism_threshold: usize,
    /// Number of generations without improvement after which
    /// a species is removed.
    pub staleness_limit: usize,
    /// Whether the species holding the population champion
    /// is exempt from staleness removal.
    pub protect_champion_species: bool,
    /// Number of best species (by maximum fitness) which are
    /// exempt from staleness removal.
    pub protected_species: usize,
    /// Seed of the population's random number generator.
    pub seed: u64,
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, false, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use evoneat::PopulationConfig;
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     staleness_limit: 15,
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::MIN,
            distance_threshold: 0.0,
            crossover_chance: 0.0,
            post_crossover_mutation_chance: 0.0,
            cull_fraction: 0.0,
            elitism_threshold: 0,
            staleness_limit: 0,
            protect_champion_species: false,
            protected_species: 0,
            seed: 0,
        }
    }

    /// Checks that all probabilities and fractions are
    /// within range.
    ///
    /// # Errors
    /// Returns the first invalid value found.
    ///
    /// # Examples
    /// ```
    /// use evoneat::PopulationConfig;
    ///
    /// let config = PopulationConfig {
    ///     distance_threshold: 3.0,
    ///     cull_fraction: 1.5,
    ///     ..PopulationConfig::zero()
    /// };
    ///
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("crossover_chance", self.crossover_chance)?;
        check_probability(
            "post_crossover_mutation_chance",
            self.post_crossover_mutation_chance,
        )?;
        check_probability("cull_fraction", self.cull_fraction)?;
        check_non_negative("distance_threshold", self.distance_threshold)
    }
}

/// Returns an error if `value` is not a valid probability.
pub fn check_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}

/// Returns an error if `value` is negative, infinite or NaN.
pub fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
