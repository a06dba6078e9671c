use crate::genomics::{ActivationType, GeneticConfig};
use crate::Innovation;

use ahash::RandomState;
use evoneat::InnovationHistory;
use serde::{Deserialize, Serialize};

use std::collections::hash_map::{Entry, HashMap};

/// A `History` keeps track of gene and node innovations in a
/// population, in order to make sure identical mutations
/// within a generation are assigned the same innovation numbers.
///
/// For gene innovations the input and output nodes are used to
/// identify identical mutations, and the corresponding innovation
/// number is recorded.
///
/// For node innovations the split gene is used to identify
/// identical mutations, and the innovation numbers for the
/// corresponding input gene, new node, and output gene are
/// recorded, in that order. The activation type the new node
/// was first given is recorded too, so that every genome gets
/// the same node for the same split.
///
/// Records are cleared at the start of every generation, but
/// innovation counters only ever increase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    next_gene_innovation: Innovation,
    next_node_innovation: Innovation,
    interface_count: usize,
    output_count: usize,
    #[serde(with = "entries")]
    gene_innovations: HashMap<(Innovation, Innovation), Innovation, RandomState>,
    #[serde(with = "entries")]
    node_innovations: HashMap<Innovation, (Innovation, Innovation, Innovation), RandomState>,
    #[serde(with = "entries")]
    node_activations: HashMap<Innovation, ActivationType, RandomState>,
}

impl InnovationHistory for History {
    type Config = GeneticConfig;

    fn new(config: &GeneticConfig) -> History {
        Self::new(config)
    }

    fn begin_generation(&mut self) {
        self.gene_innovations.clear();
        self.node_innovations.clear();
        self.node_activations.clear();
    }
}

impl History {
    /// Creates a new History using the specified configuration.
    ///
    /// Initially generated genes are given the innovation number
    /// `1 + o + i ⨯ output_count`, where `i` is the index of their
    /// input node (inputs, then bias) and `o` the index of their
    /// output node. Thus, the first gene innovation number
    /// issued by the `History` is `1 + interface_count ⨯ output_count`.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History};
    /// use std::num::NonZeroUsize;
    ///
    /// let history = History::new(&GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     bias: true,
    ///     ..GeneticConfig::zero()
    /// });
    ///
    /// assert_eq!(history.max_gene_innovation(), 3);
    /// assert_eq!(history.max_node_innovation(), 3);
    /// ```
    pub fn new(config: &GeneticConfig) -> History {
        let interface_count = config.interface_count();
        let output_count = config.output_count.get();
        History::with_counters(
            config,
            1 + interface_count * output_count,
            interface_count + output_count,
        )
    }

    /// Creates a History that resumes issuing innovation
    /// numbers from the specified counters. Useful for
    /// continuing from genomes built by hand or loaded
    /// from storage.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History};
    ///
    /// let mut history = History::with_counters(&GeneticConfig::zero(), 10, 5);
    ///
    /// assert_eq!(history.get_or_issue_link(4, 1), 10);
    /// assert_eq!(history.get_or_issue_split(10, 4, 1), (11, 5, 12));
    /// ```
    pub fn with_counters(
        config: &GeneticConfig,
        next_gene_innovation: Innovation,
        next_node_innovation: Innovation,
    ) -> History {
        History {
            next_gene_innovation,
            next_node_innovation,
            interface_count: config.interface_count(),
            output_count: config.output_count.get(),
            gene_innovations: HashMap::default(),
            node_innovations: HashMap::default(),
            node_activations: HashMap::default(),
        }
    }

    /// Returns the innovation number for a gene between the specified
    /// nodes. Genes between an interface node and an output node
    /// always get their initial innovation number; other genes get the
    /// number previously assigned during the current generation, or
    /// a new one.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History};
    ///
    /// let mut history = History::new(&GeneticConfig::zero());
    ///
    /// assert_eq!(history.get_or_issue_link(0, 1), 1);
    /// assert_eq!(history.get_or_issue_link(1, 1), 2);
    /// assert_eq!(history.get_or_issue_link(1, 1), 2);
    /// ```
    pub fn get_or_issue_link(&mut self, input_id: Innovation, output_id: Innovation) -> Innovation {
        if let Some(innovation) = self.initial_innovation(input_id, output_id) {
            return innovation;
        }
        match self.gene_innovations.entry((input_id, output_id)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let innovation = self.next_gene_innovation;
                self.next_gene_innovation += 1;
                *entry.insert(innovation)
            }
        }
    }

    /// Returns the innovation numbers for a split of the specified gene,
    /// in the format `(input gene, new node, output gene)`. Splits of
    /// the same gene during the current generation are assigned the
    /// same numbers. Both new genes are registered as gene innovations.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History};
    ///
    /// let mut history = History::new(&GeneticConfig::zero());
    ///
    /// let split = history.get_or_issue_split(1, 0, 1);
    /// assert_eq!(split, (2, 2, 3));
    /// assert_eq!(history.get_or_issue_split(1, 0, 1), split);
    /// assert_eq!(history.get_or_issue_link(2, 1), 3);
    /// ```
    pub fn get_or_issue_split(
        &mut self,
        split_gene: Innovation,
        input_id: Innovation,
        output_id: Innovation,
    ) -> (Innovation, Innovation, Innovation) {
        match self.node_innovations.get(&split_gene) {
            Some(record) => *record,
            None => {
                let record = self.issue_split(input_id, output_id);
                self.node_innovations.insert(split_gene, record);
                record
            }
        }
    }

    /// Issues fresh innovation numbers for a split, even if the
    /// same gene was already split in this generation. This is used
    /// when the previously assigned numbers refer to genes or nodes
    /// already present in the mutating genome.
    pub(crate) fn issue_split(
        &mut self,
        input_id: Innovation,
        output_id: Innovation,
    ) -> (Innovation, Innovation, Innovation) {
        let new_node = self.next_node_innovation;
        self.next_node_innovation += 1;
        let input_gene = self.issue_link(input_id, new_node);
        let output_gene = self.issue_link(new_node, output_id);
        (input_gene, new_node, output_gene)
    }

    /// Returns the activation type recorded for a node created
    /// by a split in the current generation, or records the one
    /// produced by `choose` if there is none.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ActivationType, GeneticConfig, History};
    ///
    /// let mut history = History::new(&GeneticConfig::zero());
    ///
    /// let (_, node, _) = history.get_or_issue_split(1, 0, 1);
    /// assert_eq!(history.split_activation(node, || ActivationType::Gaussian), ActivationType::Gaussian);
    /// assert_eq!(history.split_activation(node, || ActivationType::ReLU), ActivationType::Gaussian);
    /// ```
    pub fn split_activation<F>(&mut self, node_id: Innovation, choose: F) -> ActivationType
    where
        F: FnOnce() -> ActivationType,
    {
        *self.node_activations.entry(node_id).or_insert_with(choose)
    }

    /// Issues a new gene innovation number and records it
    /// for the endpoints if none was recorded yet.
    fn issue_link(&mut self, input_id: Innovation, output_id: Innovation) -> Innovation {
        let innovation = self.next_gene_innovation;
        self.next_gene_innovation += 1;
        self.gene_innovations
            .entry((input_id, output_id))
            .or_insert(innovation);
        innovation
    }

    fn initial_innovation(&self, input_id: Innovation, output_id: Innovation) -> Option<Innovation> {
        let outputs = self.interface_count..self.interface_count + self.output_count;
        if input_id < self.interface_count && outputs.contains(&output_id) {
            let output_index = output_id - self.interface_count;
            Some(1 + output_index + input_id * self.output_count)
        } else {
            None
        }
    }

    /// Returns the highest gene innovation number generated.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History};
    ///
    /// let history = History::new(&GeneticConfig::zero());
    ///
    /// assert_eq!(history.max_gene_innovation(), 1);
    /// ```
    pub fn max_gene_innovation(&self) -> Innovation {
        self.next_gene_innovation - 1
    }

    /// Returns the highest node innovation number generated.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, History};
    ///
    /// let history = History::new(&GeneticConfig::zero());
    ///
    /// assert_eq!(history.max_node_innovation(), 1);
    /// ```
    pub fn max_node_innovation(&self) -> Innovation {
        self.next_node_innovation - 1
    }

    /// Returns an iterator over the gene innovations recorded
    /// in the current generation, in the format
    /// `((input node, output node), gene innovation)`.
    /// No ordering is guaranteed.
    pub fn gene_innovation_history(
        &self,
    ) -> impl Iterator<Item = (&(Innovation, Innovation), &Innovation)> {
        self.gene_innovations.iter()
    }

    /// Returns an iterator over the node innovations recorded
    /// in the current generation, in the format
    /// `(split gene, (input gene, new node, output gene))`.
    /// No ordering is guaranteed.
    pub fn node_innovation_history(
        &self,
    ) -> impl Iterator<Item = (&Innovation, &(Innovation, Innovation, Innovation))> {
        self.node_innovations.iter()
    }
}

/// (De)serializes lookup maps as key-ordered lists of
/// entries, so that non-string keys survive formats
/// like JSON and output doesn't depend on hashing.
mod entries {
    use ahash::RandomState;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use std::collections::HashMap;
    use std::hash::Hash;

    pub(super) fn serialize<K, V, S>(
        map: &HashMap<K, V, RandomState>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        K: Serialize + Ord,
        V: Serialize,
        S: Serializer,
    {
        let mut entries: Vec<(&K, &V)> = map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        serializer.collect_seq(entries)
    }

    pub(super) fn deserialize<'de, K, V, D>(
        deserializer: D,
    ) -> Result<HashMap<K, V, RandomState>, D::Error>
    where
        K: Deserialize<'de> + Eq + Hash,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let entries = Vec::<(K, V)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
