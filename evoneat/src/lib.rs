//! An implementation of NeuroEvolution of Augmenting Topologies,
//! following the 2002 paper: <http://nn.cs.utexas.edu/keyword?stanley:ec02>
//!
//! The population engine is generic over the genome representation
//! through the [`Genome`] trait: speciation, fitness sharing, staleness
//! removal, offspring allotment and reproduction are handled here, while
//! distance, crossover and mutation belong to the genome. A neural
//! network-based genome representation, as described in the paper,
//! is supplied by the `evoneat-nn` crate.
//!
//! Every population owns a single seedable random number generator, so
//! runs are reproducible from their configurations, and populations can
//! be snapshotted and restored through Serde. Generational snapshots for
//! later inspection are available through the [`logging`] module.
//!
//! # Example usage: Evolution of XOR function approximator, using `evoneat-nn`
//! ```
//! use evoneat::{Population, PopulationConfig};
//! use evoneat_nn::{
//!     genomics::{GeneticConfig, NNGenome},
//!     networks::FunctionApproximatorNetwork,
//! };
//! use std::num::NonZeroUsize;
//!
//! fn evaluate_xor(genome: &NNGenome) -> f32 {
//!     let mut network = FunctionApproximatorNetwork::<1>::from(genome);
//!
//!     let values = [
//!         ([0.0, 0.0], 0.0),
//!         ([0.0, 1.0], 1.0),
//!         ([1.0, 0.0], 1.0),
//!         ([1.0, 1.0], 0.0),
//!     ];
//!
//!     4.0 - values
//!         .iter()
//!         .map(|(input, output)| (network.evaluate_at(input)[0] - output).abs())
//!         .sum::<f32>()
//! }
//!
//! let genetic_config = GeneticConfig {
//!     input_count: NonZeroUsize::new(2).unwrap(),
//!     bias: true,
//!     excess_gene_factor: 1.0,
//!     disjoint_gene_factor: 1.0,
//!     common_weight_factor: 0.4,
//!     weight_mutation_chance: 0.8,
//!     weight_perturb_chance: 0.9,
//!     weight_perturb_sigma: 0.5,
//!     weight_bound: 8.0,
//!     initial_weight_bound: 1.0,
//!     gene_addition_mutation_chance: 0.05,
//!     node_addition_mutation_chance: 0.03,
//!     max_gene_addition_mutation_attempts: 20,
//!     ..GeneticConfig::zero()
//! };
//!
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(30).unwrap(),
//!     distance_threshold: 3.0,
//!     crossover_chance: 0.75,
//!     cull_fraction: 0.8,
//!     staleness_limit: 15,
//!     protect_champion_species: true,
//!     seed: 7,
//!     ..PopulationConfig::zero()
//! };
//!
//! let mut population =
//!     Population::<_, _, NNGenome>::new(population_config, genetic_config).unwrap();
//! for _ in 0..5 {
//!     population.evaluate_fitness(evaluate_xor).unwrap();
//!     if let Err(e) = population.evolve() {
//!         eprintln!("{}", e);
//!         population.reset();
//!     }
//! }
//! assert_eq!(population.len(), 30);
//! ```

mod genome;
mod populations;

pub use genome::*;
pub use populations::*;
