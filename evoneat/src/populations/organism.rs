use super::SpeciesID;

use serde::{Deserialize, Serialize};

use std::fmt;

/// Organism identifier. Unique within a population,
/// and assigned in order of creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrganismID(pub usize);

/// An individual of the population: a genome,
/// together with its evaluation results and
/// bookkeeping data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism<G> {
    id: OrganismID,
    generation: usize,
    fitness: f32,
    adjusted_fitness: f32,
    species: Option<SpeciesID>,
    genome: G,
}

impl<G> Organism<G> {
    /// Creates an unevaluated organism, born in
    /// `generation` and not yet assigned to a species.
    pub(crate) fn new(id: OrganismID, generation: usize, genome: G) -> Organism<G> {
        Organism {
            id,
            generation,
            fitness: 0.0,
            adjusted_fitness: 0.0,
            species: None,
            genome,
        }
    }

    /// Returns the organism's ID.
    pub fn id(&self) -> OrganismID {
        self.id
    }

    /// Returns the generation in which the organism was born.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the organism's raw fitness, as set by the
    /// last evaluation. Unevaluated organisms have a
    /// fitness of 0.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Returns the organism's fitness after being shared
    /// among the members of its species.
    pub fn adjusted_fitness(&self) -> f32 {
        self.adjusted_fitness
    }

    /// Returns the ID of the species the organism belongs to.
    pub fn species(&self) -> Option<SpeciesID> {
        self.species
    }

    /// Returns the organism's genome.
    pub fn genome(&self) -> &G {
        &self.genome
    }

    pub(crate) fn genome_mut(&mut self) -> &mut G {
        &mut self.genome
    }

    pub(crate) fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    pub(crate) fn set_adjusted_fitness(&mut self, adjusted_fitness: f32) {
        self.adjusted_fitness = adjusted_fitness;
    }

    pub(crate) fn set_species(&mut self, species: SpeciesID) {
        self.species = Some(species);
    }
}

impl<G: Clone> Organism<G> {
    /// Returns a deep copy of the organism under a new
    /// identity, born in `generation`. The copy is
    /// unevaluated but keeps the species assignment.
    pub(crate) fn offspring_clone(&self, id: OrganismID, generation: usize) -> Organism<G> {
        Organism {
            species: self.species,
            ..Organism::new(id, generation, self.genome.clone())
        }
    }
}

impl fmt::Display for OrganismID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl<G> fmt::Display for Organism<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Organism {} [gen: {}, species: {:?}, fitness: {:.4}]",
            self.id, self.generation, self.species, self.fitness
        )
    }
}
