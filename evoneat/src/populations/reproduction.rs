use super::{Organism, OrganismID, PopulationConfig, Species};
use crate::Genome;

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use std::cmp::Ordering;

/// Auxiliary type for offspring generation.
/// Handles all the tasks of generating a species'
/// offspring according to the specified configs,
/// issuing organism IDs in creation order.
pub(super) struct Reproducer<'a, G: Genome, R: ?Sized> {
    history: &'a mut G::InnovationHistory,
    genetic_config: &'a G::Config,
    population_config: &'a PopulationConfig,
    rng: &'a mut R,
    next_organism_id: &'a mut usize,
    generation: usize,
}

impl<'a, G, R> Reproducer<'a, G, R>
where
    G: Genome + Clone,
    R: Rng + ?Sized,
{
    /// `generation` is the generation the offspring are born into.
    pub(super) fn new(
        history: &'a mut G::InnovationHistory,
        genetic_config: &'a G::Config,
        population_config: &'a PopulationConfig,
        rng: &'a mut R,
        next_organism_id: &'a mut usize,
        generation: usize,
    ) -> Reproducer<'a, G, R> {
        Reproducer {
            history,
            genetic_config,
            population_config,
            rng,
            next_organism_id,
            generation,
        }
    }

    /// Generates the species' allotted offspring. The first
    /// is always an unmutated copy of the species champion.
    pub(super) fn reproduce(&mut self, species: &Species<G>) -> Vec<Organism<G>> {
        let quota = species.allotted_offspring();
        let mut offspring = Vec::with_capacity(quota);
        if quota == 0 {
            return offspring;
        }

        let id = self.issue_id();
        offspring.push(species.champion().offspring_clone(id, self.generation));
        if species.len() >= self.population_config.elitism_threshold {
            trace!("species {:?} keeps its elite champion", species.id());
        } else {
            trace!("species {:?} keeps its champion slot", species.id());
        }

        let members = species.members_slice();
        for _ in 1..quota {
            let child = self.make_child(members);
            offspring.push(child);
        }
        offspring
    }

    /// Produces a single non-elite child of `members`.
    fn make_child(&mut self, members: &[Organism<G>]) -> Organism<G> {
        let id = self.issue_id();
        if members.len() == 1 || self.rng.gen::<f32>() >= self.population_config.crossover_chance
        {
            // Parents are never empty after culling.
            let parent = members.choose(&mut *self.rng).unwrap_or(&members[0]);
            let mut child = parent.offspring_clone(id, self.generation);
            let genome = child.genome_mut();
            genome.mutate(self.history, self.genetic_config, &mut *self.rng);
            child
        } else {
            let first = &members[self.rng.gen_range(0..members.len())];
            let second = &members[self.rng.gen_range(0..members.len())];
            let (fitter, other) = match compare_parents(first, second) {
                Ordering::Less => (second, first),
                _ => (first, second),
            };
            let equal_fitness = fitter.fitness() == other.fitness();
            let mut genome = G::mate(
                fitter.genome(),
                other.genome(),
                equal_fitness,
                self.genetic_config,
                &mut *self.rng,
            );
            if self.rng.gen::<f32>() < self.population_config.post_crossover_mutation_chance {
                genome.mutate(self.history, self.genetic_config, &mut *self.rng);
            }
            let mut child = Organism::new(id, self.generation, genome);
            if let Some(species) = fitter.species() {
                child.set_species(species);
            }
            child
        }
    }

    fn issue_id(&mut self) -> OrganismID {
        let id = OrganismID(*self.next_organism_id);
        *self.next_organism_id += 1;
        id
    }
}

/// Orders parents so that the fitter one is greater:
/// by fitness, then by fewer genes, then by smaller ID.
pub(super) fn compare_parents<G: Genome>(a: &Organism<G>, b: &Organism<G>) -> Ordering {
    a.fitness()
        .total_cmp(&b.fitness())
        .then_with(|| b.genome().size().cmp(&a.genome().size()))
        .then_with(|| b.id().cmp(&a.id()))
}
