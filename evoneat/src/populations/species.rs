use super::Organism;
use crate::Genome;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::cmp::Ordering;

/// Species identifier. Specifies
/// the generation in which the species
/// was born, and the count of other species
/// generated in the _same generation_ before
/// the one identified (i.e, if it was the
/// third species born in generation 5, it
/// will be species [5, 2]).
///
/// The ordering of IDs is the species'
/// creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpeciesID(pub usize, pub usize);

/// Species are collections of reproductively
/// compatible (within a certain [genetic distance])
/// organisms. Membership is determined by calculating
/// the genetic distance to a _representative_,
/// which is the founder of the species in its first
/// generation, and a randomly chosen survivor
/// in every generation thereafter.
///
/// Species become stale after each generation in which
/// their best member doesn't surpass the species' champion,
/// and are removed once they have been stale for longer
/// than the [`staleness_limit`].
///
/// [genetic distance]: crate::PopulationConfig::distance_threshold
/// [`staleness_limit`]: crate::PopulationConfig::staleness_limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species<G> {
    id: SpeciesID,
    members: Vec<Organism<G>>,
    representative: G,
    champion: Organism<G>,
    staleness: usize,
    allotted_offspring: usize,
}

impl<G: Genome + Clone> Species<G> {
    /// Creates a new species founded by `founder`, which
    /// becomes its first member, representative and champion.
    pub(crate) fn new(id: SpeciesID, mut founder: Organism<G>) -> Species<G> {
        founder.set_species(id);
        Species {
            id,
            representative: founder.genome().clone(),
            champion: founder.clone(),
            members: vec![founder],
            staleness: 0,
            allotted_offspring: 0,
        }
    }

    /// Returns the genetic distance between the species'
    /// representative and `other`.
    pub fn genetic_distance(&self, other: &G, config: &G::Config) -> f32 {
        G::genetic_distance(&self.representative, other, config)
    }

    /// Replaces the champion if the best current member
    /// surpasses it, and otherwise increases staleness.
    /// Members must already be sorted.
    pub(crate) fn update_champion(&mut self) {
        match self.members.first() {
            Some(best) if best.fitness() > self.champion.fitness() => {
                self.champion = best.clone();
                self.staleness = 0;
            }
            _ => self.staleness += 1,
        }
    }

    /// Samples a new representative from the current members.
    pub(crate) fn choose_representative<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(member) = self.members.choose(rng) {
            self.representative = member.genome().clone();
        }
    }
}

impl<G> Species<G> {
    /// Returns the species' ID.
    pub fn id(&self) -> SpeciesID {
        self.id
    }

    /// Returns the species' representative.
    pub fn representative(&self) -> &G {
        &self.representative
    }

    /// Returns the best organism the species has
    /// produced, as of the last generation step.
    pub fn champion(&self) -> &Organism<G> {
        &self.champion
    }

    /// Returns the number of consecutive generations
    /// in which the species failed to improve on its
    /// champion.
    pub fn staleness(&self) -> usize {
        self.staleness
    }

    /// Returns the number of offspring assigned to
    /// the species in the last generation step.
    pub fn allotted_offspring(&self) -> usize {
        self.allotted_offspring
    }

    /// Returns an iterator over the species' members.
    pub fn members(&self) -> impl Iterator<Item = &Organism<G>> {
        self.members.iter()
    }

    /// Returns the number of members in the species.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the species has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the highest fitness among the
    /// current members, or 0 if there are none.
    pub fn max_fitness(&self) -> f32 {
        self.members
            .iter()
            .map(Organism::fitness)
            .fold(0.0, f32::max)
    }

    /// Returns the mean fitness of the species' members.
    pub fn average_fitness(&self) -> f32 {
        if self.members.is_empty() {
            return 0.0;
        }
        self.members.iter().map(Organism::fitness).sum::<f32>() / self.members.len() as f32
    }

    /// Returns the sum of the members' shared fitnesses.
    pub fn adjusted_fitness_total(&self) -> f32 {
        self.members.iter().map(Organism::adjusted_fitness).sum()
    }

    /// Adds an organism to the species.
    pub(crate) fn add_member(&mut self, mut organism: Organism<G>) {
        organism.set_species(self.id);
        self.members.push(organism);
    }

    /// Sorts members by descending fitness,
    /// breaking ties by ascending organism ID.
    pub(crate) fn sort_descending(&mut self) {
        self.members.sort_by(compare_members);
    }

    /// Divides each member's fitness by the size
    /// of the species.
    pub(crate) fn share_fitness(&mut self) {
        let size = self.members.len() as f32;
        for member in &mut self.members {
            member.set_adjusted_fitness(member.fitness() / size);
        }
    }

    /// Discards the worst `fraction` of the
    /// (sorted) members, always keeping at least one.
    pub(crate) fn cull(&mut self, fraction: f32) {
        let keep = (self.members.len() as f32 * (1.0 - fraction)).ceil() as usize;
        self.members.truncate(keep.max(1));
    }

    pub(crate) fn set_allotted_offspring(&mut self, allotted_offspring: usize) {
        self.allotted_offspring = allotted_offspring;
    }

    pub(crate) fn members_slice(&self) -> &[Organism<G>] {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> impl Iterator<Item = &mut Organism<G>> {
        self.members.iter_mut()
    }

    pub(crate) fn clear_members(&mut self) {
        self.members.clear();
    }
}

/// Canonical member order: fitness descending, then ID ascending.
pub(crate) fn compare_members<G>(a: &Organism<G>, b: &Organism<G>) -> Ordering {
    b.fitness()
        .total_cmp(&a.fitness())
        .then_with(|| a.id().cmp(&b.id()))
}
