use crate::genomics::ActivationType;

use evoneat::{check_non_negative, check_probability, ConfigError};
use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for genome generation
/// and inter-genome operations.
///
/// All quantities expressing probabilities
/// must be in the range [0.0, 1.0], and all
/// factors and bounds must be non-negative;
/// [`validate`] checks both.
///
/// [`validate`]: GeneticConfig::validate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of inputs in a genome.
    pub input_count: NonZeroUsize,
    /// Number of outputs in a genome.
    pub output_count: NonZeroUsize,
    /// Whether genomes carry a bias node, which
    /// is always fed 1.0 by networks.
    pub bias: bool,
    /// Possible activation types for hidden nodes.
    /// If an empty vector is given, nodes will default
    /// to [`Sigmoid`].
    ///
    /// [`Sigmoid`]: crate::genomics::ActivationType
    pub activation_types: Vec<ActivationType>,
    /// Activation types of output nodes in a genome.
    /// If fewer than [`output_count`] are specified,
    /// the default is [`Sigmoid`].
    ///
    /// [`output_count`]: GeneticConfig::output_count
    /// [`Sigmoid`]: crate::genomics::ActivationType
    pub output_activation_types: Vec<ActivationType>,
    /// Weight of excess genes in genetic distance.
    pub excess_gene_factor: f32,
    /// Weight of disjoint genes in genetic distance.
    pub disjoint_gene_factor: f32,
    /// Weight of the common gene weight average in genetic distance.
    pub common_weight_factor: f32,
    /// Genomes with fewer genes than this are not
    /// size-normalized in genetic distance.
    pub small_genome_threshold: usize,
    /// Chance of the weight mutation taking place.
    pub weight_mutation_chance: f32,
    /// Chance of a single weight being perturbed during
    /// weight mutation, instead of being reset.
    pub weight_perturb_chance: f32,
    /// Standard deviation of weight perturbations.
    pub weight_perturb_sigma: f32,
    /// Maximum magnitude of a gene's weight.
    pub weight_bound: f32,
    /// Maximum magnitude of the weights in a fresh genome.
    /// Must not exceed [`weight_bound`].
    ///
    /// [`weight_bound`]: GeneticConfig::weight_bound
    pub initial_weight_bound: f32,
    /// Chance of a gene addition mutation taking place.
    pub gene_addition_mutation_chance: f32,
    /// Chance of a node addition mutation taking place.
    pub node_addition_mutation_chance: f32,
    /// Chance of a random gene being toggled.
    pub toggle_enabled_chance: f32,
    /// Chance of a random disabled gene being re-enabled.
    pub reenable_chance: f32,
    /// Maximum number of gene mutation attempts before
    /// mutation returns with failure.
    pub max_gene_addition_mutation_attempts: usize,
    /// Chance that a gene disabled in either parent
    /// is inherited disabled.
    pub inherit_disabled_chance: f32,
    /// Whether genes may form cycles, self-loops,
    /// or leave output nodes.
    pub allow_recurrence: bool,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, empty, false, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::GeneticConfig;
    ///
    /// let cfg1 = GeneticConfig::zero();
    ///
    /// let cfg2 = GeneticConfig {
    ///     // Specify some values here...
    ///     allow_recurrence: true,
    ///     weight_bound: 5.0,
    ///     // Default the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// # assert!(cfg1.validate().is_ok() && cfg2.validate().is_ok());
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::MIN,
            output_count: NonZeroUsize::MIN,
            bias: false,
            activation_types: Vec::new(),
            output_activation_types: Vec::new(),
            excess_gene_factor: 0.0,
            disjoint_gene_factor: 0.0,
            common_weight_factor: 0.0,
            small_genome_threshold: 0,
            weight_mutation_chance: 0.0,
            weight_perturb_chance: 0.0,
            weight_perturb_sigma: 0.0,
            weight_bound: 0.0,
            initial_weight_bound: 0.0,
            gene_addition_mutation_chance: 0.0,
            node_addition_mutation_chance: 0.0,
            toggle_enabled_chance: 0.0,
            reenable_chance: 0.0,
            max_gene_addition_mutation_attempts: 0,
            inherit_disabled_chance: 0.0,
            allow_recurrence: false,
        }
    }

    /// Checks that all probabilities lie in [0.0, 1.0],
    /// that factors and bounds are non-negative, and that
    /// initial weights fit within the weight bound.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::GeneticConfig;
    ///
    /// let config = GeneticConfig {
    ///     reenable_chance: 1.5,
    ///     ..GeneticConfig::zero()
    /// };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("weight_mutation_chance", self.weight_mutation_chance)?;
        check_probability("weight_perturb_chance", self.weight_perturb_chance)?;
        check_probability(
            "gene_addition_mutation_chance",
            self.gene_addition_mutation_chance,
        )?;
        check_probability(
            "node_addition_mutation_chance",
            self.node_addition_mutation_chance,
        )?;
        check_probability("toggle_enabled_chance", self.toggle_enabled_chance)?;
        check_probability("reenable_chance", self.reenable_chance)?;
        check_probability("inherit_disabled_chance", self.inherit_disabled_chance)?;

        check_non_negative("excess_gene_factor", self.excess_gene_factor)?;
        check_non_negative("disjoint_gene_factor", self.disjoint_gene_factor)?;
        check_non_negative("common_weight_factor", self.common_weight_factor)?;
        check_non_negative("weight_perturb_sigma", self.weight_perturb_sigma)?;
        check_non_negative("weight_bound", self.weight_bound)?;
        check_non_negative("initial_weight_bound", self.initial_weight_bound)?;

        if self.initial_weight_bound > self.weight_bound {
            return Err(ConfigError::Inconsistent {
                field: "initial_weight_bound",
                reason: "exceeds weight_bound",
            });
        }
        Ok(())
    }

    /// Number of nodes every genome is connected
    /// from at creation: inputs, then the bias.
    pub(crate) fn interface_count(&self) -> usize {
        self.input_count.get() + self.bias as usize
    }
}
