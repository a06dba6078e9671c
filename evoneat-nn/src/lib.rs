//! # evoneat-nn
//! A neural network-based implementation of the [`evoneat`] crate's `Genome` trait.
//!
//! Provides an [`NNGenome`] type usable in `evoneat` `Population`s, its
//! innovation [`History`], and two neural network implementations which
//! can be generated from an [`NNGenome`]:
//! - [`RealTimeNetwork`]: best suited for real-time control tasks, with new inputs set for each activation, and multiple time-steps involved.
//! - [`FunctionApproximatorNetwork`]: best suited for more instantaneous single-output-per-input function approximation tasks.
//!
//! [`NNGenome`]: crate::genomics::NNGenome
//! [`History`]: crate::genomics::History
//! [`RealTimeNetwork`]: crate::networks::RealTimeNetwork
//! [`FunctionApproximatorNetwork`]: crate::networks::FunctionApproximatorNetwork
//!
//! # Example usage: Evolution of XOR function approximator
//! ```
//! use evoneat::{Population, PopulationConfig};
//! use evoneat_nn::{
//!     genomics::{ActivationType, GeneticConfig, NNGenome},
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
//!     let error: f32 = values
//!         .iter()
//!         .map(|(input, output)| (network.evaluate_at(input)[0] - output).abs())
//!         .sum();
//!     4.0 - error
//! }
//!
//! let genetic_config = GeneticConfig {
//!     input_count: NonZeroUsize::new(2).unwrap(),
//!     output_count: NonZeroUsize::new(1).unwrap(),
//!     bias: true,
//!     activation_types: vec![ActivationType::Sigmoid],
//!     excess_gene_factor: 1.0,
//!     disjoint_gene_factor: 1.0,
//!     common_weight_factor: 0.4,
//!     small_genome_threshold: 20,
//!     weight_mutation_chance: 0.8,
//!     weight_perturb_chance: 0.9,
//!     weight_perturb_sigma: 0.5,
//!     weight_bound: 8.0,
//!     initial_weight_bound: 1.0,
//!     gene_addition_mutation_chance: 0.05,
//!     node_addition_mutation_chance: 0.03,
//!     max_gene_addition_mutation_attempts: 20,
//!     inherit_disabled_chance: 0.75,
//!     ..GeneticConfig::zero()
//! };
//!
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(50).unwrap(),
//!     distance_threshold: 3.0,
//!     crossover_chance: 0.75,
//!     cull_fraction: 0.8,
//!     elitism_threshold: 5,
//!     staleness_limit: 15,
//!     protected_species: 2,
//!     seed: 42,
//!     ..PopulationConfig::zero()
//! };
//!
//! let mut population =
//!     Population::<_, _, NNGenome>::new(population_config, genetic_config).unwrap();
//! for _ in 0..10 {
//!     population.evaluate_fitness(evaluate_xor).unwrap();
//!     if let Err(e) = population.evolve() {
//!         eprintln!("{}", e);
//!         population.reset();
//!     }
//! }
//! population.evaluate_fitness(evaluate_xor).unwrap();
//! println!("Best: {}", population.best().unwrap());
//! ```

pub mod genomics;
pub mod networks;

/// Identifier type used to designate historically
/// identical mutations for the purposes of
/// genome comparison and genetic tracking.
pub type Innovation = usize;
