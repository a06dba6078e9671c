use crate::ConfigError;

use rand::Rng;

/// An interface for genomes that can be evolved by a [`Population`].
///
/// All stochastic operations receive the random number generator
/// explicitly, so that a population seeded with the same value
/// always evolves in the same way.
///
/// [`Population`]: crate::Population
pub trait Genome: Sized {
    type Config;
    type InnovationHistory: InnovationHistory<Config = Self::Config>;

    /// Returns a randomized, minimal genome.
    fn new<R: Rng + ?Sized>(config: &Self::Config, rng: &mut R) -> Self;

    /// Checks the genetic configuration for values that
    /// would make evolution impossible or meaningless.
    fn validate_config(config: &Self::Config) -> Result<(), ConfigError>;

    /// Returns whether the genome has the interface
    /// (inputs, outputs, etc.) described by `config`.
    fn conforms_to(&self, config: &Self::Config) -> bool;

    /// Returns the genetic distance between two genomes.
    /// Must be symmetric, and zero for identical genomes.
    fn genetic_distance(first: &Self, second: &Self, config: &Self::Config) -> f32;

    /// Combines two genomes and returns a "child" genome.
    ///
    /// `fitter` is the parent with the higher fitness. If
    /// `equal_fitness` is set, neither parent is preferred
    /// when inheriting non-matching structure.
    fn mate<R: Rng + ?Sized>(
        fitter: &Self,
        other: &Self,
        equal_fitness: bool,
        config: &Self::Config,
        rng: &mut R,
    ) -> Self;

    /// Applies every configured mutation to the genome.
    /// Mutations that cannot be performed are skipped.
    fn mutate<R: Rng + ?Sized>(
        &mut self,
        history: &mut Self::InnovationHistory,
        config: &Self::Config,
        rng: &mut R,
    );

    /// Returns the number of genes in the genome, used
    /// to prefer smaller genomes when fitness is tied.
    fn size(&self) -> usize;
}

/// An Innovation History is used to keep track
/// of genetic innovations throught successive
/// generations of genomes.
///
/// The exact bookkeeping is left to the implementor,
/// but it is notified whenever a new generation starts.
pub trait InnovationHistory {
    type Config;

    fn new(config: &Self::Config) -> Self;

    /// Called once at the end of every generation step.
    fn begin_generation(&mut self);
}
