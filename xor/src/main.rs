use evoneat::{logging::Stats, Population, PopulationConfig};
use evoneat_nn::genomics::{ActivationType, GeneticConfig, History, NNGenome};
use evoneat_nn::networks::FunctionApproximatorNetwork;

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use std::error::Error;
use std::num::NonZeroUsize;
use std::{env, fs};

type XorPopulation = Population<GeneticConfig, History, NNGenome>;

/// Everything needed to run a batch of XOR experiments.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Experiment {
    population: PopulationConfig,
    genetics: GeneticConfig,
    /// Independent runs, each seeded with `population.seed + run`.
    runs: usize,
    /// Generation limit of each run.
    generations: usize,
    /// Fitness at which XOR counts as solved.
    target_fitness: f32,
}

impl Default for Experiment {
    fn default() -> Self {
        Experiment {
            population: PopulationConfig {
                size: NonZeroUsize::new(150).unwrap_or(NonZeroUsize::MIN),
                distance_threshold: 3.0,
                crossover_chance: 0.75,
                post_crossover_mutation_chance: 0.25,
                cull_fraction: 0.8,
                elitism_threshold: 5,
                staleness_limit: 15,
                protect_champion_species: true,
                protected_species: 2,
                seed: 42,
            },
            genetics: GeneticConfig {
                input_count: NonZeroUsize::new(2).unwrap_or(NonZeroUsize::MIN),
                output_count: NonZeroUsize::MIN,
                bias: true,
                activation_types: vec![ActivationType::Sigmoid],
                output_activation_types: vec![ActivationType::Sigmoid],
                excess_gene_factor: 1.0,
                disjoint_gene_factor: 1.0,
                common_weight_factor: 0.4,
                small_genome_threshold: 20,
                weight_mutation_chance: 0.8,
                weight_perturb_chance: 0.9,
                weight_perturb_sigma: 2.5,
                weight_bound: 8.0,
                initial_weight_bound: 1.0,
                gene_addition_mutation_chance: 0.05,
                node_addition_mutation_chance: 0.03,
                toggle_enabled_chance: 0.0,
                reenable_chance: 0.01,
                max_gene_addition_mutation_attempts: 20,
                inherit_disabled_chance: 0.75,
                allow_recurrence: false,
            },
            runs: 20,
            generations: 200,
            target_fitness: 3.9,
        }
    }
}

fn evaluate_xor(genome: &NNGenome) -> f32 {
    let mut network = FunctionApproximatorNetwork::<1>::from(genome);

    let values = [
        ([0.0, 0.0], 0.0),
        ([0.0, 1.0], 1.0),
        ([1.0, 0.0], 1.0),
        ([1.0, 1.0], 0.0),
    ];

    let error: f32 = values
        .iter()
        .map(|(input, output)| (network.evaluate_at(input)[0] - output).abs())
        .sum();
    4.0 - error
}

/// Evolves a population until it solves XOR or runs out of
/// generations. Returns the solving generation and champion.
fn run(
    experiment: &Experiment,
    seed: u64,
) -> Result<Option<(usize, NNGenome)>, Box<dyn Error + Send + Sync>> {
    let population_config = PopulationConfig {
        seed,
        ..experiment.population.clone()
    };
    let mut population = XorPopulation::new(population_config, experiment.genetics.clone())?;
    for _ in 0..experiment.generations {
        population.par_evaluate_fitness(evaluate_xor)?;
        if let Some(best) = population.best() {
            if best.fitness() >= experiment.target_fitness {
                return Ok(Some((population.generation(), best.genome().clone())));
            }
        }
        if let Err(e) = population.evolve() {
            warn!("run with seed {}: {}, resetting", seed, e);
            population.reset();
        }
    }
    Ok(None)
}

fn load_experiment() -> Result<Experiment, Box<dyn Error>> {
    match env::args().nth(1) {
        Some(path) => {
            let contents = fs::read_to_string(&path)?;
            info!("loading experiment from {}", path);
            Ok(ron::from_str(&contents)?)
        }
        None => Ok(Experiment::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let experiment = load_experiment()?;
    let base_seed = experiment.population.seed;
    let results = (0..experiment.runs as u64)
        .into_par_iter()
        .map(|run_index| run(&experiment, base_seed + run_index))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e as Box<dyn Error>)?;

    let solved: Vec<&(usize, NNGenome)> = results.iter().flatten().collect();
    println!(
        "Solving generation: {}, {:.1}% failure rate over {} runs",
        Stats::from(solved.iter().map(|(generation, _)| *generation as f32))
            .map_or_else(|| "-".to_string(), |s| s.to_string()),
        (results.len() - solved.len()) as f32 * 100.0 / results.len().max(1) as f32,
        results.len(),
    );
    if let Some((generation, champion)) = solved.first() {
        println!("First solution, found in generation {}:", generation);
        println!(
            "{}",
            ron::ser::to_string_pretty(champion, ron::ser::PrettyConfig::new())?
        );
    }
    Ok(())
}
