//! Genomes are the focus of evolution in NEAT.
//! They are a collection of genes and nodes that can be instantiated
//! as a phenotype (a neural network). Genomes can be progressively mutated,
//! thus adding complexity and functionality.

mod config;
mod errors;
mod genes;
mod history;
mod nodes;
mod record;

pub use config::GeneticConfig;
pub use errors::{
    GeneAdditionMutationError, GeneValidityError, GenomeLoadError, NodeAdditionMutationError,
    NodeValidityError,
};
pub use genes::Gene;
pub use history::History;
pub use nodes::{ActivationType, Node, NodeType};
pub use record::GenomeRecord;

use crate::Innovation;

use ahash::RandomState;
use evoneat::{ConfigError, Genome};
use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A mutable collection of genes and nodes.
///
/// Genes and nodes are kept in ascending ID order. Nodes
/// are numbered inputs first, then the bias (if any),
/// then outputs; hidden nodes get their IDs from the
/// [`History`].
///
/// Suports Serde for convenient genome saving and loading,
/// through the [`GenomeRecord`] format.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "GenomeRecord", into = "GenomeRecord")]
pub struct NNGenome {
    genes: BTreeMap<Innovation, Gene>,
    nodes: BTreeMap<Innovation, Node>,
    node_pairings: HashSet<(Innovation, Innovation), RandomState>,
}

impl NNGenome {
    /// Create a new, minimal genome with the specified configuration:
    /// every input (and the bias) connected to every output, with
    /// weights uniformly distributed over ±[`initial_weight_bound`].
    ///
    /// Initially generated genes are given the innovation number
    /// `1 + o + i ⨯ output_count`, where `i` is the index
    /// of their input node and `o` that of their output node,
    /// so all fresh genomes share the same innovation numbers.
    ///
    /// [`initial_weight_bound`]: GeneticConfig::initial_weight_bound
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(3).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     bias: true,
    ///     weight_bound: 5.0,
    ///     initial_weight_bound: 1.0,
    ///     ..GeneticConfig::zero()
    /// };
    ///
    /// let genome = NNGenome::new(&config, &mut ChaCha8Rng::seed_from_u64(0));
    ///
    /// // 3 inputs, a bias, and 2 outputs, all connected.
    /// assert_eq!(genome.nodes().count(), 6);
    /// assert_eq!(genome.genes().count(), 4 * 2);
    /// assert_eq!(genome.node(3).unwrap().node_type(), NodeType::Bias);
    /// assert!(genome.genes().all(|g| g.weight().abs() <= 1.0));
    /// ```
    pub fn new<R: Rng + ?Sized>(config: &GeneticConfig, rng: &mut R) -> NNGenome {
        let mut genome = NNGenome::unconnected(config);
        let interface_count = config.interface_count();
        let output_count = config.output_count.get();
        for i in 0..interface_count {
            for o in 0..output_count {
                let weight = Gene::random_weight(config.initial_weight_bound, rng);
                genome.add_gene_unchecked(1 + o + i * output_count, i, interface_count + o, weight);
            }
        }
        genome
    }

    /// Create a new genome with the configured input,
    /// bias and output nodes, but no genes.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let genome = NNGenome::unconnected(&GeneticConfig::zero());
    ///
    /// assert_eq!(genome.nodes().count(), 2);
    /// assert_eq!(genome.genes().count(), 0);
    /// ```
    pub fn unconnected(config: &GeneticConfig) -> NNGenome {
        let mut genome = NNGenome::empty();
        let input_count = config.input_count.get();
        let interface_count = config.interface_count();
        for i in 0..input_count {
            genome.add_node_unchecked(i, NodeType::Input, ActivationType::Identity);
        }
        if config.bias {
            genome.add_node_unchecked(input_count, NodeType::Bias, ActivationType::Identity);
        }
        for o in 0..config.output_count.get() {
            let activation_type = *config
                .output_activation_types
                .get(o)
                .unwrap_or(&ActivationType::Sigmoid);
            genome.add_node_unchecked(interface_count + o, NodeType::Output, activation_type);
        }
        genome
    }

    /// A genome without any nodes.
    pub(super) fn empty() -> NNGenome {
        NNGenome {
            genes: BTreeMap::new(),
            nodes: BTreeMap::new(),
            node_pairings: HashSet::default(),
        }
    }

    /// Add a new gene to the genome.
    /// Returns a reference to the new gene.
    ///
    /// Cycles are not checked for, so this can be used
    /// to build recurrent genomes by hand.
    ///
    /// # Errors
    ///
    /// Returns an error if the gene's ID is already
    /// present, either endpoint doesn't exist, the genome
    /// already connects the same endpoints, or the output
    /// endpoint is an input or bias node.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, GeneValidityError, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut genome = NNGenome::unconnected(&config);
    ///
    /// let gene = genome.add_gene(42, 0, 2, 2.5).unwrap();
    /// assert_eq!(gene.endpoints(), (0, 2));
    ///
    /// // Recursive gene.
    /// genome.add_gene(43, 2, 2, -1.0).unwrap();
    ///
    /// assert_eq!(
    ///     genome.add_gene(44, 0, 2, 1.0).unwrap_err(),
    ///     GeneValidityError::DuplicateGeneWithEndpoints(44, (0, 2))
    /// );
    /// ```
    pub fn add_gene(
        &mut self,
        gene_id: Innovation,
        input_id: Innovation,
        output_id: Innovation,
        weight: f32,
    ) -> Result<&mut Gene, GeneValidityError> {
        self.check_gene_viability(gene_id, input_id, output_id)?;
        Ok(self.add_gene_unchecked(gene_id, input_id, output_id, weight))
    }

    /// Add a new gene to the genome.
    /// Returns a reference to the new gene.
    /// Assumes that the gene is not a duplicate
    /// or invalid gene for the genome.
    fn add_gene_unchecked(
        &mut self,
        gene_id: Innovation,
        input_id: Innovation,
        output_id: Innovation,
        weight: f32,
    ) -> &mut Gene {
        if let Some(input) = self.nodes.get_mut(&input_id) {
            input.add_output_gene(gene_id);
        }
        if let Some(output) = self.nodes.get_mut(&output_id) {
            output.add_input_gene(gene_id);
        }
        self.node_pairings.insert((input_id, output_id));
        self.genes
            .entry(gene_id)
            .or_insert_with(|| Gene::new(gene_id, input_id, output_id, weight))
    }

    /// Checks whether a gene is a duplicate or
    /// is invalid for the genome.
    fn check_gene_viability(
        &self,
        gene_id: Innovation,
        input_id: Innovation,
        output_id: Innovation,
    ) -> Result<(), GeneValidityError> {
        use GeneValidityError::*;
        match (self.nodes.get(&input_id), self.nodes.get(&output_id)) {
            _ if self.genes.contains_key(&gene_id) => Err(DuplicateGeneID(gene_id)),
            (None, _) | (_, None) => Err(NonexistantEndpoints(input_id, output_id)),
            _ if self.node_pairings.contains(&(input_id, output_id)) => {
                Err(DuplicateGeneWithEndpoints(gene_id, (input_id, output_id)))
            }
            (_, Some(output)) if output.node_type().is_sensor() => Err(SensorEndpoint(output_id)),
            _ => Ok(()),
        }
    }

    /// Add a new hidden node to the genome.
    /// Returns a reference to the newly created node.
    ///
    /// # Errors
    ///
    /// Returns an error if a node of the
    /// same ID already exists in the genome.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ActivationType, GeneticConfig, NNGenome, NodeType};
    ///
    /// let mut genome = NNGenome::unconnected(&GeneticConfig::zero());
    ///
    /// let inserted_node = genome.add_node(42, ActivationType::ReLU).unwrap().clone();
    ///
    /// assert_eq!(genome.nodes().count(), 3);
    /// assert_eq!(inserted_node.innovation(), 42);
    /// assert_eq!(inserted_node.activation_type(), ActivationType::ReLU);
    /// assert_eq!(inserted_node.node_type(), NodeType::Hidden);
    ///
    /// assert!(genome.add_node(42, ActivationType::ReLU).is_err());
    /// ```
    pub fn add_node(
        &mut self,
        node_id: Innovation,
        activation_type: ActivationType,
    ) -> Result<&mut Node, NodeValidityError> {
        self.add_node_of_type(node_id, NodeType::Hidden, activation_type)
    }

    /// Add a new node of any type to the genome.
    pub(super) fn add_node_of_type(
        &mut self,
        node_id: Innovation,
        node_type: NodeType,
        activation_type: ActivationType,
    ) -> Result<&mut Node, NodeValidityError> {
        if self.nodes.contains_key(&node_id) {
            Err(NodeValidityError::DuplicateNodeID(node_id))
        } else {
            Ok(self.add_node_unchecked(node_id, node_type, activation_type))
        }
    }

    /// Add a new node to the genome, or return
    /// the existing node with the same ID.
    fn add_node_unchecked(
        &mut self,
        node_id: Innovation,
        node_type: NodeType,
        activation_type: ActivationType,
    ) -> &mut Node {
        self.nodes
            .entry(node_id)
            .or_insert_with(|| Node::new(node_id, node_type, activation_type))
    }

    /// Induces a _weight mutation_ in the genome.
    ///
    /// Every gene's weight is perturbed with probability
    /// [`weight_perturb_chance`], and reset to a uniformly
    /// random value otherwise. Weights never leave the
    /// range ±[`weight_bound`].
    ///
    /// [`weight_perturb_chance`]: GeneticConfig::weight_perturb_chance
    /// [`weight_bound`]: GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig {
    ///     weight_bound: 3.0,
    ///     initial_weight_bound: 1.0,
    ///     weight_perturb_chance: 0.9,
    ///     weight_perturb_sigma: 2.5,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let mut genome = NNGenome::new(&config, &mut rng);
    ///
    /// for _ in 0..50 {
    ///     genome.mutate_weights(&config, &mut rng);
    ///     assert!(genome.genes().all(|g| g.weight().abs() <= 3.0));
    /// }
    /// ```
    pub fn mutate_weights<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        for gene in self.genes.values_mut() {
            if rng.gen::<f32>() < config.weight_perturb_chance {
                gene.perturb_weight(config, rng);
            } else {
                gene.randomize_weight(config, rng);
            }
        }
    }

    /// Induces a _gene mutation_ in the genome.
    /// If successful, returns the new gene's innovation number.
    ///
    /// Sources are any node but outputs, and destinations any
    /// node but inputs and the bias. Unless recurrence is allowed,
    /// self-loops and genes closing a cycle are rejected; if it is,
    /// outputs may be sources too.
    ///
    /// # Errors
    ///
    /// Returns an error if no viable pair of nodes
    /// was found in [`max_gene_addition_mutation_attempts`] tries.
    ///
    /// [`max_gene_addition_mutation_attempts`]: GeneticConfig::max_gene_addition_mutation_attempts
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig {
    ///     max_gene_addition_mutation_attempts: 1,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let mut genome = NNGenome::unconnected(&config);
    ///
    /// // The only possible gene goes from the input to the output.
    /// let gene = genome
    ///     .mutate_add_gene(&mut History::new(&config), &config, &mut rng)
    ///     .unwrap();
    /// assert_eq!(gene, 1);
    ///
    /// // Which leaves nothing else to connect.
    /// assert!(genome
    ///     .mutate_add_gene(&mut History::new(&config), &config, &mut rng)
    ///     .is_err());
    /// ```
    pub fn mutate_add_gene<R: Rng + ?Sized>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<Innovation, GeneAdditionMutationError> {
        let sources: Vec<Innovation> = self
            .nodes
            .values()
            .filter(|n| config.allow_recurrence || n.node_type() != NodeType::Output)
            .map(Node::innovation)
            .collect();
        let destinations: Vec<Innovation> = self
            .nodes
            .values()
            .filter(|n| !n.node_type().is_sensor())
            .map(Node::innovation)
            .collect();
        if sources.is_empty() || destinations.is_empty() {
            return Err(GeneAdditionMutationError::NoCandidateNodes);
        }

        for _ in 0..config.max_gene_addition_mutation_attempts {
            let (input_id, output_id) = match (sources.choose(rng), destinations.choose(rng)) {
                (Some(input_id), Some(output_id)) => (*input_id, *output_id),
                _ => break,
            };
            if self.node_pairings.contains(&(input_id, output_id)) {
                continue;
            }
            if !config.allow_recurrence
                && (input_id == output_id || self.path_exists(output_id, input_id))
            {
                continue;
            }
            let gene_id = history.get_or_issue_link(input_id, output_id);
            if self.genes.contains_key(&gene_id) {
                continue;
            }
            let weight = Gene::random_weight(config.weight_bound, rng);
            self.add_gene_unchecked(gene_id, input_id, output_id, weight);
            return Ok(gene_id);
        }
        Err(GeneAdditionMutationError::NoInputOutputPairFound)
    }

    /// Returns whether `to` can be reached from `from`
    /// through any genes, enabled or not.
    fn path_exists(&self, from: Innovation, to: Innovation) -> bool {
        let mut visited: HashSet<Innovation, RandomState> = HashSet::default();
        let mut pending = vec![from];
        while let Some(node_id) = pending.pop() {
            if node_id == to {
                return true;
            }
            if !visited.insert(node_id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&node_id) {
                pending.extend(
                    node.output_genes()
                        .filter_map(|g| self.genes.get(g))
                        .map(Gene::output),
                );
            }
        }
        false
    }

    /// Induces a _node mutation_ in the genome.
    /// If successful, returns the new node's innovation number.
    ///
    /// A random enabled gene is disabled and split in two,
    /// with a new hidden node in between. The gene into the
    /// new node has weight 1.0, and the gene out of it keeps
    /// the split gene's weight.
    ///
    /// # Errors
    ///
    /// Returns an error if the genome has no enabled genes.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig::zero();
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let mut history = History::new(&config);
    /// let mut genome = NNGenome::new(&config, &mut rng);
    ///
    /// let node = genome.mutate_add_node(&mut history, &config, &mut rng).unwrap();
    ///
    /// assert_eq!(genome.nodes().count(), 3);
    /// assert_eq!(genome.genes().count(), 3);
    /// assert!(!genome.gene(1).unwrap().enabled());
    /// assert_eq!(genome.gene(2).unwrap().endpoints(), (0, node));
    /// ```
    pub fn mutate_add_node<R: Rng + ?Sized>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<Innovation, NodeAdditionMutationError> {
        let enabled_genes: Vec<&Gene> = self.genes.values().filter(|g| g.enabled()).collect();
        let (split_gene, (input_id, output_id), weight) = match enabled_genes.choose(rng) {
            Some(gene) => (gene.innovation(), gene.endpoints(), gene.weight()),
            None => return Err(NodeAdditionMutationError::NoEnabledGene),
        };

        let mut triplet = history.get_or_issue_split(split_gene, input_id, output_id);
        let (input_gene, new_node, output_gene) = triplet;
        if self.nodes.contains_key(&new_node)
            || self.genes.contains_key(&input_gene)
            || self.genes.contains_key(&output_gene)
        {
            triplet = history.issue_split(input_id, output_id);
        }
        let (input_gene, new_node, output_gene) = triplet;

        let activation_type = history.split_activation(new_node, || {
            *config
                .activation_types
                .choose(rng)
                .unwrap_or(&ActivationType::Sigmoid)
        });
        self.add_node_unchecked(new_node, NodeType::Hidden, activation_type);
        self.add_gene_unchecked(input_gene, input_id, new_node, 1.0);
        self.add_gene_unchecked(output_gene, new_node, output_id, weight);
        if let Some(gene) = self.genes.get_mut(&split_gene) {
            gene.set_enabled(false);
        }
        Ok(new_node)
    }

    /// Flips the enabled status of a random gene.
    /// Returns the toggled gene's innovation number,
    /// or `None` if the genome has no genes.
    pub fn mutate_toggle_enabled<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Innovation> {
        let gene_ids: Vec<Innovation> = self.genes.keys().copied().collect();
        let gene_id = *gene_ids.choose(rng)?;
        let gene = self.genes.get_mut(&gene_id)?;
        gene.set_enabled(!gene.enabled());
        Some(gene_id)
    }

    /// Enables a random disabled gene.
    /// Returns the enabled gene's innovation number,
    /// or `None` if all genes are enabled.
    pub fn mutate_reenable<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Innovation> {
        let disabled: Vec<Innovation> = self
            .genes
            .values()
            .filter(|g| !g.enabled())
            .map(Gene::innovation)
            .collect();
        let gene_id = *disabled.choose(rng)?;
        self.genes.get_mut(&gene_id)?.set_enabled(true);
        Some(gene_id)
    }

    /// Performs every mutation with its configured probability,
    /// in order: weights, toggle, re-enable, gene addition,
    /// and node addition. Mutations that cannot be performed
    /// are skipped.
    pub fn mutate_all<R: Rng + ?Sized>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        if rng.gen::<f32>() < config.weight_mutation_chance {
            self.mutate_weights(config, rng);
        }
        if rng.gen::<f32>() < config.toggle_enabled_chance
            && self.mutate_toggle_enabled(rng).is_none()
        {
            trace!("toggle mutation on genome without genes");
        }
        if rng.gen::<f32>() < config.reenable_chance && self.mutate_reenable(rng).is_none() {
            trace!("re-enable mutation on genome without disabled genes");
        }
        if rng.gen::<f32>() < config.gene_addition_mutation_chance {
            if let Err(e) = self.mutate_add_gene(history, config, rng) {
                trace!("skipped gene mutation: {}", e);
            }
        }
        if rng.gen::<f32>() < config.node_addition_mutation_chance {
            if let Err(e) = self.mutate_add_node(history, config, rng) {
                trace!("skipped node mutation: {}", e);
            }
        }
    }

    /// Combines two genomes into a child genome.
    ///
    /// Matching genes are inherited with a weight randomly chosen
    /// from either parent. Disjoint and excess genes are inherited
    /// from the fitter parent only, unless both parents are equally
    /// fit, in which case each one is inherited with probability 0.5.
    /// A gene disabled in either parent is inherited disabled with
    /// probability [`inherit_disabled_chance`].
    ///
    /// [`inherit_disabled_chance`]: GeneticConfig::inherit_disabled_chance
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig::zero();
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let mut history = History::new(&config);
    ///
    /// let mut fitter = NNGenome::new(&config, &mut rng);
    /// let other = fitter.clone();
    /// fitter.mutate_add_node(&mut history, &config, &mut rng).unwrap();
    ///
    /// let child = NNGenome::mate(&fitter, &other, false, &config, &mut rng);
    ///
    /// // All of the fitter parent's structure is inherited.
    /// assert!(child.genes().map(|g| g.innovation()).eq(fitter.genes().map(|g| g.innovation())));
    /// ```
    pub fn mate<R: Rng + ?Sized>(
        fitter: &NNGenome,
        other: &NNGenome,
        equal_fitness: bool,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> NNGenome {
        let mut child = NNGenome::empty();
        for node in fitter
            .nodes
            .values()
            .filter(|n| n.node_type() != NodeType::Hidden)
        {
            child.add_node_unchecked(node.innovation(), node.node_type(), node.activation_type());
        }

        for (id, gene) in &fitter.genes {
            match other.genes.get(id) {
                Some(others_gene) => {
                    let weight = if rng.gen::<bool>() {
                        others_gene.weight()
                    } else {
                        gene.weight()
                    };
                    let disabled = !gene.enabled() || !others_gene.enabled();
                    let enabled = inherited_enabled(disabled, config, rng);
                    child.inherit_gene(gene, fitter, weight, enabled);
                }
                None if !equal_fitness || rng.gen::<bool>() => {
                    let enabled = inherited_enabled(!gene.enabled(), config, rng);
                    child.inherit_gene(gene, fitter, gene.weight(), enabled);
                }
                None => {}
            }
        }

        if equal_fitness {
            for (id, gene) in &other.genes {
                if fitter.genes.contains_key(id) || !rng.gen::<bool>() {
                    continue;
                }
                let (input_id, output_id) = gene.endpoints();
                if child.node_pairings.contains(&(input_id, output_id)) {
                    continue;
                }
                if !config.allow_recurrence
                    && (input_id == output_id || child.path_exists(output_id, input_id))
                {
                    continue;
                }
                let enabled = inherited_enabled(!gene.enabled(), config, rng);
                child.inherit_gene(gene, other, gene.weight(), enabled);
            }
        }

        child
    }

    /// Copies a parent's gene into `self`, along with
    /// any of its endpoints `self` is missing.
    fn inherit_gene(&mut self, gene: &Gene, parent: &NNGenome, weight: f32, enabled: bool) {
        for node in [gene.input(), gene.output()]
            .iter()
            .filter_map(|id| parent.nodes.get(id))
        {
            self.add_node_unchecked(node.innovation(), node.node_type(), node.activation_type());
        }
        self.add_gene_unchecked(gene.innovation(), gene.input(), gene.output(), weight)
            .set_enabled(enabled);
    }

    /// Calculates the _genetic distance_ between `first` and `second`,
    /// weighting excess genes, disjoint genes and the average weight
    /// difference of matching genes as specified in `config`.
    ///
    /// Gene counts are divided by the size of the larger genome,
    /// unless both are smaller than [`small_genome_threshold`].
    ///
    /// [`small_genome_threshold`]: GeneticConfig::small_genome_threshold
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ActivationType, GeneticConfig, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// // Completely arbitrary quantities.
    /// const EXCESS_FACTOR: f32 = 1.5;
    /// const DISJOINT_FACTOR: f32 = 0.5;
    /// const WEIGHT_FACTOR: f32 = 0.25;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     excess_gene_factor: EXCESS_FACTOR,
    ///     disjoint_gene_factor: DISJOINT_FACTOR,
    ///     common_weight_factor: WEIGHT_FACTOR,
    ///     small_genome_threshold: 20,
    ///     ..GeneticConfig::zero()
    /// };
    ///
    /// let mut genome1 = NNGenome::unconnected(&config);
    /// let mut genome2 = NNGenome::unconnected(&config);
    ///
    /// genome1.add_node(3, ActivationType::Sigmoid).unwrap();
    /// genome2.add_node(3, ActivationType::Sigmoid).unwrap();
    ///
    /// // Common gene, weight difference of 2.0.
    /// genome1.add_gene(1, 0, 2, 1.0).unwrap();
    /// genome2.add_gene(1, 0, 2, -1.0).unwrap();
    ///
    /// // Disjoint genes.
    /// genome1.add_gene(2, 1, 2, 3.0).unwrap();
    /// genome2.add_gene(3, 1, 3, 1.0).unwrap();
    ///
    /// // Common gene, weight_difference of 0.0.
    /// genome1.add_gene(4, 3, 2, 1.0).unwrap();
    /// genome2.add_gene(4, 3, 2, 1.0).unwrap();
    ///
    /// // Excess gene.
    /// genome1.add_gene(5, 0, 3, 3.0).unwrap();
    ///
    /// // Both genomes are below the small genome threshold,
    /// // so gene counts are not normalized.
    /// assert_eq!(
    ///     NNGenome::genetic_distance(&genome1, &genome2, &config),
    ///     DISJOINT_FACTOR * (1 + 1) as f32 +
    ///         EXCESS_FACTOR * (1) as f32 +
    ///         WEIGHT_FACTOR * (2.0 + 0.0) / 2.0
    /// );
    /// ```
    pub fn genetic_distance(first: &NNGenome, second: &NNGenome, config: &GeneticConfig) -> f32 {
        let (mut excess, mut disjoint) = (0, 0);
        for (genes, others) in [(&first.genes, &second.genes), (&second.genes, &first.genes)] {
            let others_max = others.keys().next_back();
            for id in genes.keys().filter(|id| !others.contains_key(*id)) {
                if others_max.map_or(true, |max| id > max) {
                    excess += 1;
                } else {
                    disjoint += 1;
                }
            }
        }

        let (matching, weight_difference) = first
            .genes
            .iter()
            .filter_map(|(id, gene)| second.genes.get(id).map(|other| (gene, other)))
            .fold((0, 0.0), |(count, total), (gene, other)| {
                (count + 1, total + (gene.weight() - other.weight()).abs())
            });
        let average_weight_difference = if matching > 0 {
            weight_difference / matching as f32
        } else {
            0.0
        };

        let (first_len, second_len) = (first.genes.len(), second.genes.len());
        let normalization = if first_len < config.small_genome_threshold
            && second_len < config.small_genome_threshold
        {
            1.0
        } else {
            first_len.max(second_len).max(1) as f32
        };

        config.excess_gene_factor * excess as f32 / normalization
            + config.disjoint_gene_factor * disjoint as f32 / normalization
            + config.common_weight_factor * average_weight_difference
    }

    /// Returns an iterator over the genome's genes,
    /// in ascending innovation number order.
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.genes.values()
    }

    /// Returns an iterator over the genome's nodes,
    /// in ascending innovation number order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns the gene with the specified innovation number.
    pub fn gene(&self, id: Innovation) -> Option<&Gene> {
        self.genes.get(&id)
    }

    /// Returns the node with the specified innovation number.
    pub fn node(&self, id: Innovation) -> Option<&Node> {
        self.nodes.get(&id)
    }
}

/// Decides whether an inherited gene is enabled.
fn inherited_enabled<R: Rng + ?Sized>(
    disabled_in_parent: bool,
    config: &GeneticConfig,
    rng: &mut R,
) -> bool {
    !disabled_in_parent || rng.gen::<f32>() >= config.inherit_disabled_chance
}

impl Genome for NNGenome {
    type Config = GeneticConfig;
    type InnovationHistory = History;

    fn new<R: Rng + ?Sized>(config: &GeneticConfig, rng: &mut R) -> Self {
        NNGenome::new(config, rng)
    }

    fn validate_config(config: &GeneticConfig) -> Result<(), ConfigError> {
        config.validate()
    }

    fn conforms_to(&self, config: &GeneticConfig) -> bool {
        let interface = |genome: &NNGenome| -> Vec<(Innovation, NodeType, ActivationType)> {
            genome
                .nodes()
                .filter(|n| n.node_type() != NodeType::Hidden)
                .map(|n| (n.innovation(), n.node_type(), n.activation_type()))
                .collect()
        };
        interface(self) == interface(&NNGenome::unconnected(config))
    }

    fn genetic_distance(first: &Self, second: &Self, config: &GeneticConfig) -> f32 {
        NNGenome::genetic_distance(first, second, config)
    }

    fn mate<R: Rng + ?Sized>(
        fitter: &Self,
        other: &Self,
        equal_fitness: bool,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Self {
        NNGenome::mate(fitter, other, equal_fitness, config, rng)
    }

    fn mutate<R: Rng + ?Sized>(&mut self, history: &mut History, config: &GeneticConfig, rng: &mut R) {
        self.mutate_all(history, config, rng);
    }

    fn size(&self) -> usize {
        self.genes.len()
    }
}

impl fmt::Display for NNGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let genes: Vec<&Gene> = self.genes.values().collect();
        let nodes: Vec<&Node> = self.nodes.values().collect();
        f.debug_struct("NNGenome")
            .field("Genes", &genes)
            .field("Nodes", &nodes)
            .finish()
    }
}
