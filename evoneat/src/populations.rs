//! A Population is a collection of organisms.
//! These are grouped into species, which can
//! be evolved using a genome evaluation function
//! as the source of selective pressure.
mod config;
mod errors;
pub mod logging;
mod organism;
mod reproduction;
mod species;

use crate::{Genome, InnovationHistory};
pub use config::{check_non_negative, check_probability, PopulationConfig};
pub use errors::{ConfigError, EvaluationError, PopulationError};
pub use organism::{Organism, OrganismID};
use reproduction::Reproducer;
use species::compare_members;
pub use species::{Species, SpeciesID};

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use std::convert::Infallible;
use std::error::Error;

/// A population of organisms.
///
/// All randomness used during evolution is drawn from a
/// single generator seeded with [`PopulationConfig::seed`],
/// so that two populations created from the same configurations
/// and evaluated in the same way evolve identically. The
/// generator's state is part of the serialized population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Population<C, H, G> {
    species: Vec<Species<G>>,
    champion: Option<Organism<G>>,
    history: H,
    rng: ChaCha8Rng,
    generation: usize,
    next_organism_id: usize,
    population_config: PopulationConfig,
    genetic_config: C,
}

impl<C, H, G> Population<C, H, G>
where
    H: InnovationHistory<Config = C>,
    G: Genome<InnovationHistory = H, Config = C> + Clone,
{
    /// Creates a new population using the passed configurations.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to the population.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid.
    ///
    /// [`Genome`]: crate::Genome
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let pop_config = PopulationConfig {
    ///     size: NonZeroUsize::new(10).unwrap(),
    ///     // Set desired configuration
    ///     ..PopulationConfig::zero()
    /// };
    /// # let genetic_config = GeneticConfig::zero();
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(pop_config, genetic_config).unwrap();
    /// assert_eq!(population.len(), 10);
    /// ```
    pub fn new(
        population_config: PopulationConfig,
        genetic_config: C,
    ) -> Result<Population<C, H, G>, PopulationError> {
        Self::new_seeded(vec![], population_config, genetic_config)
    }

    /// Creates a new population using the passed configurations,
    /// and seeds it with the specified genomes. Seed genomes are
    /// speciated like any other organism, and the remaining space
    /// is filled with randomized genomes.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid, if
    /// there are more seed genomes than fit in the population, or if
    /// any of them is incompatible with the genetic config, as
    /// established by [`Genome::conforms_to`].
    ///
    /// [`Genome::conforms_to`]: crate::Genome::conforms_to
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome};
    /// use evoneat::{Population, PopulationConfig};
    /// use rand::SeedableRng;
    /// use std::num::NonZeroUsize;
    ///
    /// let pop_config = PopulationConfig {
    ///     size: NonZeroUsize::new(100).unwrap(),
    ///     distance_threshold: 1.0,
    ///     ..PopulationConfig::zero()
    /// };
    /// # let genetic_config = GeneticConfig {
    /// #     initial_weight_bound: 1.0,
    /// #     weight_bound: 1.0,
    /// #     ..GeneticConfig::zero()
    /// # };
    /// # let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
    /// # let g1 = NNGenome::new(&genetic_config, &mut rng);
    /// # let g2 = NNGenome::new(&genetic_config, &mut rng);
    ///
    /// // With `g1` and `g2` of a suitable type implementing `Genome`...
    /// let population = Population::new_seeded(vec![g1, g2], pop_config, genetic_config).unwrap();
    ///
    /// assert_eq!(population.len(), 100);
    /// ```
    pub fn new_seeded(
        genomes: Vec<G>,
        population_config: PopulationConfig,
        genetic_config: C,
    ) -> Result<Population<C, H, G>, PopulationError> {
        population_config.validate()?;
        G::validate_config(&genetic_config)?;

        let size = population_config.size.get();
        if genomes.len() > size {
            return Err(PopulationError::TooManySeeds {
                seeds: genomes.len(),
                size,
            });
        }
        if let Some(i) = genomes.iter().position(|g| !g.conforms_to(&genetic_config)) {
            return Err(PopulationError::NonconformingSeed(i));
        }

        Ok(Self::bootstrap(genomes, population_config, genetic_config))
    }

    /// Builds the initial population from already validated parts.
    fn bootstrap(
        mut genomes: Vec<G>,
        population_config: PopulationConfig,
        genetic_config: C,
    ) -> Population<C, H, G> {
        let mut rng = ChaCha8Rng::seed_from_u64(population_config.seed);
        let size = population_config.size.get();
        while genomes.len() < size {
            genomes.push(G::new(&genetic_config, &mut rng));
        }

        let mut population = Population {
            species: vec![],
            champion: None,
            history: H::new(&genetic_config),
            rng,
            generation: 0,
            next_organism_id: size,
            population_config,
            genetic_config,
        };
        for (i, genome) in genomes.into_iter().enumerate() {
            population.speciate(Organism::new(OrganismID(i), 0, genome));
        }
        population
    }

    /// Evaluates the fitness of each organism in the
    /// population using the passed evaluator.
    ///
    /// # Errors
    /// Returns an error, without modifying any organism,
    /// if the evaluator returns a negative, infinite or NaN
    /// fitness for any genome.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// # use evoneat_nn::networks::FunctionApproximatorNetwork;
    /// use evoneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig::zero(),
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// population.evaluate_fitness(|g| {
    ///     # let mut network = FunctionApproximatorNetwork::<1>::from(g);
    ///     # // Networks with outputs closer to 0 are given higher scores.
    ///     # let fitness = (1.0 - network.evaluate_at(&[1.0])[0]).powf(2.0);
    ///     // Compute genome's fitness...
    ///     return fitness;
    /// }).unwrap();
    /// ```
    pub fn evaluate_fitness<F>(&mut self, mut evaluator: F) -> Result<(), EvaluationError>
    where
        F: FnMut(&G) -> f32,
    {
        self.try_evaluate_fitness(|g| Ok::<f32, Infallible>(evaluator(g)))
    }

    /// Evaluates the fitness of each organism in the
    /// population using a fallible evaluator.
    ///
    /// # Errors
    /// Returns the first evaluator error, or the first invalid
    /// fitness value. In either case no organism's fitness
    /// is modified.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{EvaluationError, Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig::zero(),
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// let result = population.try_evaluate_fitness(|_| "not a number".parse::<f32>());
    /// assert!(matches!(result, Err(EvaluationError::Evaluator { .. })));
    /// ```
    pub fn try_evaluate_fitness<F, E>(&mut self, mut evaluator: F) -> Result<(), EvaluationError>
    where
        F: FnMut(&G) -> Result<f32, E>,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let fitnesses = self
            .organisms()
            .map(|o| match evaluator(o.genome()) {
                Ok(fitness) => check_fitness(o.id(), fitness),
                Err(e) => Err(EvaluationError::Evaluator {
                    organism: o.id(),
                    source: e.into(),
                }),
            })
            .collect::<Result<Vec<f32>, _>>()?;
        self.write_fitnesses(fitnesses);
        Ok(())
    }

    /// Evaluates the fitness of each organism in parallel.
    ///
    /// # Errors
    /// Same as [`evaluate_fitness`](Population::evaluate_fitness).
    #[cfg(feature = "parallel")]
    pub fn par_evaluate_fitness<F>(&mut self, evaluator: F) -> Result<(), EvaluationError>
    where
        F: Fn(&G) -> f32 + Sync,
        G: Sync,
    {
        use rayon::prelude::*;

        let fitnesses = {
            let organisms: Vec<&Organism<G>> = self.organisms().collect();
            organisms
                .par_iter()
                .map(|o| check_fitness(o.id(), evaluator(o.genome())))
                .collect::<Result<Vec<f32>, _>>()?
        };
        self.write_fitnesses(fitnesses);
        Ok(())
    }

    fn write_fitnesses(&mut self, fitnesses: Vec<f32>) {
        let organisms = self.species.iter_mut().flat_map(Species::members_mut);
        for (organism, fitness) in organisms.zip(fitnesses) {
            organism.set_fitness(fitness);
        }
    }

    /// Evolves the population by one generation: species
    /// share their fitness, stale species are removed,
    /// offspring are allotted in proportion to each species'
    /// shared fitness and bred from the best members of each
    /// species, and the new generation is re-speciated.
    ///
    /// # Errors
    /// Returns an error, without modifying the population, if
    /// the population is empty or every species would be
    /// removed for staleness. The population should then be
    /// [reset](Population::reset).
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(20).unwrap(),
    ///         distance_threshold: 3.0,
    ///         staleness_limit: 15,
    ///         protect_champion_species: true,
    ///         ..PopulationConfig::zero()
    ///     },
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// population.evaluate_fitness(|_| 1.0).unwrap();
    ///
    /// if let Err(e) = population.evolve() {
    ///     eprintln!("{}", e);
    /// }
    /// assert_eq!(population.generation(), 1);
    /// assert_eq!(population.len(), 20);
    /// ```
    pub fn evolve(&mut self) -> Result<(), PopulationError> {
        if self.is_empty() {
            return Err(PopulationError::DegeneratePopulation);
        }
        let survivors = self.staleness_survivors();
        if !survivors.contains(&true) {
            return Err(PopulationError::DegeneratePopulation);
        }

        for species in &mut self.species {
            species.sort_descending();
            species.share_fitness();
            species.update_champion();
        }
        self.update_champion();
        self.remove_stale_species(&survivors);
        self.allot_offspring();
        for species in &mut self.species {
            species.cull(self.population_config.cull_fraction);
        }
        let offspring = self.generate_offspring();
        self.respeciate_all(offspring);

        self.generation += 1;
        self.history.begin_generation();
        info!(
            "generation {}: {} organisms in {} species, champion fitness {:.4}",
            self.generation,
            self.len(),
            self.species.len(),
            self.champion.as_ref().map_or(0.0, Organism::fitness),
        );
        Ok(())
    }

    /// Determines which species will survive staleness removal
    /// in this generation step, without modifying any of them.
    fn staleness_survivors(&self) -> Vec<bool> {
        let config = &self.population_config;
        let best = self.organisms().min_by(|a, b| compare_members(a, b));
        let champion_species = match (&self.champion, best) {
            (Some(champion), Some(best)) if best.fitness() <= champion.fitness() => {
                champion.species()
            }
            (_, Some(best)) => best.species(),
            (champion, None) => champion.as_ref().and_then(Organism::species),
        };

        let mut by_max_fitness: Vec<usize> = (0..self.species.len()).collect();
        by_max_fitness.sort_by(|&a, &b| {
            let (a, b) = (&self.species[a], &self.species[b]);
            b.max_fitness()
                .total_cmp(&a.max_fitness())
                .then_with(|| a.id().cmp(&b.id()))
        });
        let mut protected = vec![false; self.species.len()];
        for &i in by_max_fitness.iter().take(config.protected_species) {
            protected[i] = true;
        }

        self.species
            .iter()
            .zip(protected)
            .map(|(species, protected)| {
                let improved = species.max_fitness() > species.champion().fitness();
                let staleness = if improved { 0 } else { species.staleness() + 1 };
                staleness <= config.staleness_limit
                    || protected
                    || (config.protect_champion_species
                        && champion_species == Some(species.id()))
            })
            .collect()
    }

    /// Replaces the population champion if any species'
    /// champion surpasses it.
    fn update_champion(&mut self) {
        let best = self
            .species
            .iter()
            .filter_map(|s| s.members().next())
            .min_by(|a, b| compare_members(a, b));
        if let Some(best) = best {
            let improved = self
                .champion
                .as_ref()
                .map_or(true, |c| best.fitness() > c.fitness());
            if improved {
                self.champion = Some(best.clone());
            }
        }
    }

    fn remove_stale_species(&mut self, survivors: &[bool]) {
        let mut survivors = survivors.iter();
        self.species.retain(|s| {
            let survives = survivors.next().copied().unwrap_or(true);
            if !survives {
                debug!(
                    "removing species {:?}, stale for {} generations",
                    s.id(),
                    s.staleness()
                );
            }
            survives
        });
    }

    /// Allots the number of offspring for each species,
    /// based on its share of the population's adjusted
    /// fitness, and removes species allotted none.
    fn allot_offspring(&mut self) {
        let totals: Vec<f32> = self
            .species
            .iter()
            .map(Species::adjusted_fitness_total)
            .collect();
        let allotted = allocate_offspring(&totals, self.population_config.size.get());
        for (species, allotted) in self.species.iter_mut().zip(allotted) {
            species.set_allotted_offspring(allotted);
        }
        self.species.retain(|s| {
            if s.allotted_offspring() == 0 {
                debug!("removing species {:?}, allotted no offspring", s.id());
            }
            s.allotted_offspring() > 0
        });
    }

    /// Generates each species' allotted offspring,
    /// in species order.
    fn generate_offspring(&mut self) -> Vec<Organism<G>> {
        let mut reproducer = Reproducer::<G, _>::new(
            &mut self.history,
            &self.genetic_config,
            &self.population_config,
            &mut self.rng,
            &mut self.next_organism_id,
            self.generation + 1,
        );
        self.species
            .iter()
            .flat_map(|s| reproducer.reproduce(s))
            .collect()
    }

    /// Picks new species representatives from the surviving
    /// parents, and reassigns every offspring to a species.
    fn respeciate_all(&mut self, offspring: Vec<Organism<G>>) {
        for species in &mut self.species {
            species.choose_representative(&mut self.rng);
            species.clear_members();
        }
        for organism in offspring {
            self.speciate(organism);
        }
        self.species.retain(|s| {
            if s.is_empty() {
                debug!("removing species {:?}, no offspring joined it", s.id());
            }
            !s.is_empty()
        });
    }

    /// Assigns an organism to the first species whose representative
    /// is within the distance threshold, or founds a new species.
    fn speciate(&mut self, organism: Organism<G>) {
        let threshold = self.population_config.distance_threshold;
        let genetic_config = &self.genetic_config;
        let compatible = self
            .species
            .iter_mut()
            .find(|s| s.genetic_distance(organism.genome(), genetic_config) < threshold);
        match compatible {
            Some(species) => species.add_member(organism),
            None => {
                let generation = organism.generation();
                let index = self
                    .species
                    .iter()
                    .filter(|s| s.id().0 == generation)
                    .count();
                self.species
                    .push(Species::new(SpeciesID(generation, index), organism));
            }
        }
    }

    /// Resets the population to an initial randomized state,
    /// as if newly created from its configurations.
    /// Used primarily in case of population degeneration,
    /// e.g. when every species has become stale.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig::zero(),
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// // Evolve the population on some task, until
    /// // population.evolve() returns an Err.
    /// population.reset();
    /// assert_eq!(population.generation(), 0);
    /// ```
    pub fn reset(&mut self)
    where
        C: Clone,
    {
        *self = Self::bootstrap(
            vec![],
            self.population_config.clone(),
            self.genetic_config.clone(),
        );
    }
}

impl<C, H, G> Population<C, H, G> {
    /// Returns the best organism ever evaluated, as of
    /// the last call to [`evolve`](Population::evolve).
    pub fn champion(&self) -> Option<&Organism<G>> {
        self.champion.as_ref()
    }

    /// Returns the current best-performing organism,
    /// according to the last evaluation.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(20).unwrap(),
    ///         ..PopulationConfig::zero()
    ///     },
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// let mut fitness = 0.0;
    /// population.evaluate_fitness(move |_| {
    ///     fitness += 10.0;
    ///     fitness
    /// }).unwrap();
    ///
    /// assert_eq!(population.best().unwrap().fitness(), 20.0 * 10.0);
    /// ```
    pub fn best(&self) -> Option<&Organism<G>> {
        self.organisms().min_by(|a, b| compare_members(a, b))
    }

    /// Returns an iterator over all current organisms,
    /// grouped by species.
    pub fn organisms(&self) -> impl Iterator<Item = &Organism<G>> {
        self.species.iter().flat_map(Species::members)
    }

    /// Returns an iterator over all current species,
    /// in order of creation.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(PopulationConfig::zero(), genetic_config).unwrap();
    ///
    /// for species in population.species() {
    ///     println!(
    ///         "Species {:?} has {} members",
    ///         species.id(),
    ///         species.len(),
    ///     );
    /// }
    /// ```
    pub fn species(&self) -> impl Iterator<Item = &Species<G>> {
        self.species.iter()
    }

    /// Returns the number of organisms in the population.
    pub fn len(&self) -> usize {
        self.species.iter().map(Species::len).sum()
    }

    /// Returns `true` if the population has no organisms.
    pub fn is_empty(&self) -> bool {
        self.species.iter().all(Species::is_empty)
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population's innovation history.
    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    pub fn genetic_config(&self) -> &C {
        &self.genetic_config
    }
}

fn check_fitness(organism: OrganismID, fitness: f32) -> Result<f32, EvaluationError> {
    if fitness.is_finite() && fitness >= 0.0 {
        Ok(fitness)
    } else {
        Err(EvaluationError::InvalidFitness { organism, fitness })
    }
}

/// Splits `size` offspring among species in proportion
/// to their adjusted fitness totals. The largest share
/// absorbs rounding errors, so the result always sums
/// to `size`. If the totals can't be compared, the
/// offspring are split equally, with any remainder going
/// to the earliest species.
fn allocate_offspring(totals: &[f32], size: usize) -> Vec<usize> {
    if totals.is_empty() {
        return vec![];
    }
    let sum: f32 = totals.iter().sum();
    if !(sum > 0.0 && sum.is_finite()) {
        warn!(
            "total adjusted fitness is {}, allotting offspring equally",
            sum
        );
        let (share, remainder) = (size / totals.len(), size % totals.len());
        return (0..totals.len())
            .map(|i| share + usize::from(i < remainder))
            .collect();
    }

    let mut allotted: Vec<usize> = totals
        .iter()
        .map(|t| (t / sum * size as f32).round() as usize)
        .collect();
    let mut allotted_sum: usize = allotted.iter().sum();
    while allotted_sum != size {
        let largest = largest_share(&allotted);
        if allotted_sum > size {
            allotted[largest] -= 1;
            allotted_sum -= 1;
        } else {
            allotted[largest] += 1;
            allotted_sum += 1;
        }
    }
    allotted
}

/// Index of the largest value, the earliest on ties.
fn largest_share(allotted: &[usize]) -> usize {
    let mut largest = 0;
    for (i, a) in allotted.iter().enumerate() {
        if *a > allotted[largest] {
            largest = i;
        }
    }
    largest
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use rand::Rng;

    use std::num::NonZeroUsize;

    /// Minimal genome for exercising the population engine.
    /// Genetic distance is the difference in size, which
    /// mutation never changes.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub(crate) struct TestGenome {
        pub(crate) size: usize,
        pub(crate) value: f32,
        pub(crate) mutations: usize,
        pub(crate) mated: bool,
    }

    impl TestGenome {
        pub(crate) fn of_size(size: usize) -> TestGenome {
            TestGenome {
                size,
                value: 0.0,
                mutations: 0,
                mated: false,
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub(crate) struct TestHistory {
        pub(crate) generations: usize,
        pub(crate) mutations: usize,
    }

    impl InnovationHistory for TestHistory {
        type Config = ();

        fn new(_: &()) -> Self {
            TestHistory {
                generations: 0,
                mutations: 0,
            }
        }

        fn begin_generation(&mut self) {
            self.generations += 1;
        }
    }

    impl Genome for TestGenome {
        type Config = ();
        type InnovationHistory = TestHistory;

        fn new<R: Rng + ?Sized>(_: &(), rng: &mut R) -> Self {
            TestGenome {
                value: rng.gen(),
                ..TestGenome::of_size(1)
            }
        }

        fn validate_config(_: &()) -> Result<(), ConfigError> {
            Ok(())
        }

        fn conforms_to(&self, _: &()) -> bool {
            self.size > 0
        }

        fn genetic_distance(first: &Self, second: &Self, _: &()) -> f32 {
            (first.size as f32 - second.size as f32).abs()
        }

        fn mate<R: Rng + ?Sized>(
            fitter: &Self,
            other: &Self,
            _: bool,
            _: &(),
            _: &mut R,
        ) -> Self {
            TestGenome {
                value: (fitter.value + other.value) / 2.0,
                mated: true,
                ..TestGenome::of_size(fitter.size)
            }
        }

        fn mutate<R: Rng + ?Sized>(&mut self, history: &mut TestHistory, _: &(), rng: &mut R) {
            self.mutations += 1;
            self.value = rng.gen();
            history.mutations += 1;
        }

        fn size(&self) -> usize {
            self.size
        }
    }

    type TestPopulation = Population<(), TestHistory, TestGenome>;

    pub(crate) fn organism(id: usize, fitness: f32, genome: TestGenome) -> Organism<TestGenome> {
        let mut organism = Organism::new(OrganismID(id), 0, genome);
        organism.set_fitness(fitness);
        organism
    }

    fn config(size: usize) -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::new(size).unwrap(),
            distance_threshold: 0.5,
            crossover_chance: 0.5,
            post_crossover_mutation_chance: 0.5,
            cull_fraction: 0.5,
            elitism_threshold: 2,
            staleness_limit: 15,
            protect_champion_species: true,
            protected_species: 2,
            seed: 11,
        }
    }

    fn sized_seeds(sizes: &[usize]) -> Vec<TestGenome> {
        sizes.iter().map(|s| TestGenome::of_size(*s)).collect()
    }

    #[test]
    fn accessors_need_no_genome_bounds() {
        fn census<C, H, G>(population: &Population<C, H, G>) -> (usize, usize, f32) {
            let best = population
                .species()
                .map(|s| s.max_fitness().max(s.champion().fitness()))
                .fold(0.0, f32::max);
            (population.len(), population.species().count(), best)
        }

        let mut population = TestPopulation::new_seeded(sized_seeds(&[1, 5]), config(6), ()).unwrap();
        population.evaluate_fitness(|g| g.size as f32).unwrap();
        assert_eq!(census(&population), (6, 2, 5.0));
        assert!(!population.is_empty());
    }

    #[test]
    fn new_population_is_fully_speciated() {
        let population = TestPopulation::new(config(12), ()).unwrap();
        assert_eq!(population.len(), 12);
        assert_eq!(population.generation(), 0);
        assert_eq!(population.species().count(), 1);
        let ids: Vec<usize> = population.organisms().map(|o| o.id().0).collect();
        assert_eq!(ids, (0..12).collect::<Vec<_>>());
        assert!(population
            .organisms()
            .all(|o| o.species() == Some(SpeciesID(0, 0))));
        assert!(population.champion().is_none());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let bad = PopulationConfig {
            cull_fraction: -0.1,
            ..config(5)
        };
        assert_eq!(
            TestPopulation::new(bad, ()).unwrap_err(),
            PopulationError::InvalidConfig(ConfigError::ProbabilityOutOfRange {
                field: "cull_fraction",
                value: -0.1
            })
        );
    }

    #[test]
    fn seeds_are_checked_and_speciated() {
        assert_eq!(
            TestPopulation::new_seeded(sized_seeds(&[1, 1, 1]), config(2), ()).unwrap_err(),
            PopulationError::TooManySeeds { seeds: 3, size: 2 }
        );
        assert_eq!(
            TestPopulation::new_seeded(sized_seeds(&[1, 0]), config(2), ()).unwrap_err(),
            PopulationError::NonconformingSeed(1)
        );

        let population = TestPopulation::new_seeded(sized_seeds(&[1, 5, 1]), config(5), ()).unwrap();
        let species: Vec<(SpeciesID, usize)> =
            population.species().map(|s| (s.id(), s.len())).collect();
        assert_eq!(species, [(SpeciesID(0, 0), 4), (SpeciesID(0, 1), 1)]);
    }

    #[test]
    fn failed_evaluation_writes_nothing() {
        let mut population = TestPopulation::new(config(6), ()).unwrap();
        population.evaluate_fitness(|g| g.value).unwrap();
        let before = population.clone();

        let mut calls = 0;
        let result = population.evaluate_fitness(|_| {
            calls += 1;
            if calls == 4 {
                f32::NAN
            } else {
                1.0
            }
        });
        assert!(matches!(
            result,
            Err(EvaluationError::InvalidFitness { organism: OrganismID(3), .. })
        ));
        assert_eq!(population, before);

        let result = population.try_evaluate_fitness(|g| {
            if g.value >= 0.0 {
                Err("evaluator failed")
            } else {
                Ok(1.0)
            }
        });
        assert!(matches!(result, Err(EvaluationError::Evaluator { .. })));
        assert!(matches!(
            population.evaluate_fitness(|_| -1.0),
            Err(EvaluationError::InvalidFitness { .. })
        ));
        assert_eq!(population, before);
    }

    #[test]
    fn size_is_preserved_across_generations() {
        let mut population = TestPopulation::new_seeded(sized_seeds(&[1, 3, 5]), config(30), ()).unwrap();
        for generation in 1..=20 {
            population.evaluate_fitness(|g| g.value * g.size as f32).unwrap();
            population.evolve().unwrap();
            assert_eq!(population.len(), 30);
            assert_eq!(population.generation(), generation);
            assert_eq!(population.history().generations, generation);
            assert!(population.organisms().all(|o| o.generation() == generation));
            let ids: Vec<SpeciesID> = population.species().map(Species::id).collect();
            let mut sorted = ids.clone();
            sorted.sort();
            assert_eq!(ids, sorted);
        }
    }

    #[test]
    fn evolution_is_deterministic() {
        let run = || {
            let mut population = TestPopulation::new_seeded(sized_seeds(&[1, 4]), config(20), ()).unwrap();
            for _ in 0..10 {
                population.evaluate_fitness(|g| g.value).unwrap();
                population.evolve().unwrap();
            }
            population
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn snapshot_continues_identically() {
        let mut population = TestPopulation::new_seeded(sized_seeds(&[1, 4]), config(20), ()).unwrap();
        for _ in 0..3 {
            population.evaluate_fitness(|g| g.value).unwrap();
            population.evolve().unwrap();
        }
        let json = serde_json::to_string(&population).unwrap();
        let mut restored: TestPopulation = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, population);

        for _ in 0..3 {
            population.evaluate_fitness(|g| g.value).unwrap();
            population.evolve().unwrap();
            restored.evaluate_fitness(|g| g.value).unwrap();
            restored.evolve().unwrap();
        }
        assert_eq!(restored, population);
    }

    fn stale_config(protect_champion_species: bool) -> PopulationConfig {
        PopulationConfig {
            distance_threshold: 1.0,
            staleness_limit: 2,
            protect_champion_species,
            protected_species: 0,
            ..config(4)
        }
    }

    #[test]
    fn stale_species_are_removed() {
        let mut population =
            TestPopulation::new_seeded(sized_seeds(&[1, 1, 5, 5]), stale_config(true), ()).unwrap();
        let fitness = |g: &TestGenome| if g.size == 1 { 1.0 } else { 0.5 };
        for _ in 0..3 {
            population.evaluate_fitness(fitness).unwrap();
            population.evolve().unwrap();
            assert_eq!(population.species().count(), 2);
        }
        assert!(population.species().all(|s| s.staleness() == 2));

        population.evaluate_fitness(fitness).unwrap();
        population.evolve().unwrap();
        let species: Vec<SpeciesID> = population.species().map(Species::id).collect();
        assert_eq!(species, [SpeciesID(0, 0)]);
        assert_eq!(population.len(), 4);
        assert_eq!(population.champion().unwrap().species(), Some(SpeciesID(0, 0)));
    }

    #[test]
    fn fittest_species_are_protected_from_staleness() {
        let run = |fitness: fn(&TestGenome) -> f32| {
            let config = PopulationConfig {
                protected_species: 1,
                ..stale_config(false)
            };
            let mut population =
                TestPopulation::new_seeded(sized_seeds(&[1, 1, 5, 5]), config, ()).unwrap();
            for _ in 0..4 {
                population.evaluate_fitness(fitness).unwrap();
                population.evolve().unwrap();
            }
            assert_eq!(population.len(), 4);
            population.species().map(Species::id).collect::<Vec<_>>()
        };

        // The later species survives by having the highest fitness.
        let species = run(|g| if g.size == 5 { 1.0 } else { 0.5 });
        assert_eq!(species, [SpeciesID(0, 1)]);

        // Ties go to the older species.
        let species = run(|_| 1.0);
        assert_eq!(species, [SpeciesID(0, 0)]);
    }

    #[test]
    fn removing_every_species_is_an_error() {
        let mut population =
            TestPopulation::new_seeded(sized_seeds(&[1, 1, 5, 5]), stale_config(false), ()).unwrap();
        let fitness = |g: &TestGenome| if g.size == 1 { 1.0 } else { 0.5 };
        for _ in 0..3 {
            population.evaluate_fitness(fitness).unwrap();
            population.evolve().unwrap();
        }
        population.evaluate_fitness(fitness).unwrap();
        let before = population.clone();
        assert_eq!(population.evolve(), Err(PopulationError::DegeneratePopulation));
        assert_eq!(population, before);

        population.reset();
        assert_eq!(population.generation(), 0);
        assert_eq!(population.len(), 4);
    }

    #[test]
    fn champion_is_replaced_only_when_surpassed() {
        let mut population = TestPopulation::new(config(10), ()).unwrap();
        population.evaluate_fitness(|_| 2.0).unwrap();
        population.evolve().unwrap();
        let champion = population.champion().unwrap().clone();
        assert_eq!(champion.fitness(), 2.0);
        assert_eq!(champion.id(), OrganismID(0));

        population.evaluate_fitness(|_| 2.0).unwrap();
        population.evolve().unwrap();
        assert_eq!(population.champion(), Some(&champion));

        population.evaluate_fitness(|_| 3.0).unwrap();
        population.evolve().unwrap();
        assert_eq!(population.champion().unwrap().fitness(), 3.0);
    }

    #[test]
    fn allocation_rounds_to_population_size() {
        assert_eq!(allocate_offspring(&[10.0, 10.0, 11.0], 10), [3, 3, 4]);
        assert_eq!(allocate_offspring(&[1.0, 1.0, 1.0], 10), [4, 3, 3]);
        assert_eq!(allocate_offspring(&[1.0, 1.0], 3), [1, 2]);
        assert_eq!(allocate_offspring(&[0.0, 5.0, 0.0], 7), [0, 7, 0]);
    }

    #[test]
    fn zero_fitness_allocates_equally() {
        assert_eq!(allocate_offspring(&[0.0, 0.0, 0.0], 10), [4, 3, 3]);
        assert_eq!(allocate_offspring(&[0.0, 0.0], 1), [1, 0]);
        assert!(allocate_offspring(&[], 5).is_empty());
    }
}
