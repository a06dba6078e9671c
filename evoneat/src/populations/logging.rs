//! Generational snapshots of a population, for
//! inspecting an evolutionary run after the fact.
use super::{Organism, Population, SpeciesID};

use crate::genome::{Genome, InnovationHistory};

use serde::{Deserialize, Serialize};

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllOrganisms,
    /// Clones species and their champions.
    SpeciesChampions,
    /// Clones only the population champion.
    PopulationChampion,
    /// Clones no organisms.
    NoOrganisms,
}

/// A snapshot of a population.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Log<G> {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord<G>,
    pub species_count: usize,
    pub organism_stats: Vec<(String, Option<Stats>)>,
}

impl<G> fmt::Display for Log<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Log {{")?;
        writeln!(f, "\tgeneration_number: {}", self.generation_number)?;
        writeln!(f, "\tspecies_count: {}", self.species_count)?;
        for (name, stats) in &self.organism_stats {
            match stats {
                Some(stats) => writeln!(f, "\t{}: {}", name, stats)?,
                None => writeln!(f, "\t{}: -", name)?,
            }
        }
        write!(f, "}}")
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use evoneat::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::from(std::iter::empty()).is_none());
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Option<Stats> {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return None;
        }
        data.sort_by(f32::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        })
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max {:.4}, min {:.4}, mean {:.4}, median {:.4}",
            self.maximum, self.minimum, self.mean, self.median
        )
    }
}

/// A reporting-level dependant store
/// of organisms from a population.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GenerationMemberRecord<G> {
    /// Species IDs, members and staleness.
    Species(Vec<(SpeciesID, Vec<Organism<G>>, usize)>),
    /// Only species IDs, species champions, and staleness.
    SpeciesChampions(Vec<(SpeciesID, Organism<G>, usize)>),
    /// Only population champion.
    PopulationChampion(Organism<G>),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<Log<G>>,
}

impl<G: Genome + Clone> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::NNGenome as G;
    /// use evoneat::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let logger = EvolutionLogger::<G>::new(ReportingLevel::NoOrganisms);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population.
    ///
    /// The `stat_extractor` provides a way of
    /// obtaining arbitrary statistics on the population,
    /// where each statistic is named by `stat_names`.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use evoneat::{Population, PopulationConfig};
    /// use evoneat::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut logger = EvolutionLogger::<G>::new(ReportingLevel::NoOrganisms);
    /// # let genetic_config = GeneticConfig::zero();
    /// let population = Population::new(PopulationConfig::zero(), genetic_config).unwrap();
    ///
    /// // Do something with the population...
    /// // Then log a snapshot.
    /// logger.log(&population, &|o| [o.fitness()], ["fitness"]);
    /// assert_eq!(logger.iter().count(), 1);
    /// ```
    pub fn log<C, H, SE, const N: usize>(
        &mut self,
        population: &Population<C, H, G>,
        stat_extractor: &SE,
        stat_names: [&str; N],
    ) where
        H: InnovationHistory<Config = C>,
        G: Genome<InnovationHistory = H, Config = C>,
        SE: Fn(&Organism<G>) -> [f32; N],
    {
        let stats: Vec<[f32; N]> = population.organisms().map(stat_extractor).collect();
        let organism_stats = stat_names
            .iter()
            .map(|name| String::from(*name))
            .zip(unzip_n_vecs(stats))
            .map(|(name, data)| (name, Stats::from(data.into_iter())))
            .collect();
        let generation_sample = match self.reporting_level {
            ReportingLevel::AllOrganisms => GenerationMemberRecord::Species(
                population
                    .species()
                    .map(|s| (s.id(), s.members().cloned().collect(), s.staleness()))
                    .collect(),
            ),
            ReportingLevel::SpeciesChampions => GenerationMemberRecord::SpeciesChampions(
                population
                    .species()
                    .map(|s| (s.id(), s.champion().clone(), s.staleness()))
                    .collect(),
            ),
            ReportingLevel::PopulationChampion => match population.champion() {
                Some(champion) => GenerationMemberRecord::PopulationChampion(champion.clone()),
                None => GenerationMemberRecord::None,
            },
            ReportingLevel::NoOrganisms => GenerationMemberRecord::None,
        };
        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample,
            species_count: population.species().count(),
            organism_stats,
        })
    }

    /// Iterate over all logged snapshots.
    ///
    /// # Examples
    /// ```
    /// # use evoneat_nn::genomics::NNGenome as G;
    /// use evoneat::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let logger = EvolutionLogger::<G>::new(ReportingLevel::AllOrganisms);
    /// // Log some stuff... then
    /// for log in logger.iter() {
    ///     println!("{}", log);
    /// }
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = &Log<G>> {
        self.logs.iter()
    }

    pub fn reporting_level(&self) -> ReportingLevel {
        self.reporting_level
    }
}

fn unzip_n_vecs<T, const N: usize>(rows: Vec<[T; N]>) -> Vec<Vec<T>> {
    let mut columns: Vec<Vec<T>> = (0..N).map(|_| Vec::with_capacity(rows.len())).collect();
    for row in rows {
        for (column, item) in columns.iter_mut().zip(row) {
            column.push(item);
        }
    }
    columns
}
