//! A Network is a simple near-isomorphism of a Genome
//! generated as the phenotypes of said Genome,
//! with disabled genes being ignored. Genes are
//! converted into connections, and genome nodes
//! into network nodes.
//!
//! The `RealTimeNetwork` type is best suited for real-time
//! control tasks, with new inputs set for each activation,
//! and multiple time-steps involved.
//!
//! For a more instantaneous input-result use-case, the
//! `FunctionApproximatorNetwork` type is more appropiate.
mod connection;
mod function_approximator;

pub use function_approximator::FunctionApproximatorNetwork;

use crate::genomics::{ActivationType, NNGenome, NodeType};
use crate::Innovation;
use connection::Connection;

use ahash::RandomState;

use std::collections::HashMap;
use std::fmt;

/// An arbitrarily-structured neural network.
///
/// Nodes are laid out as inputs, bias (if any),
/// outputs, and hidden nodes, each group in
/// ascending ID order.
#[derive(Clone, Debug)]
pub struct RealTimeNetwork {
    input_count: usize,
    bias_count: usize,
    output_count: usize,
    node_ids: Box<[Innovation]>,
    input_sums: Box<[f32]>,
    activation_levels: Box<[f32]>,
    activation_functions: Box<[ActivationType]>,
    connections: Box<[Box<[Connection]>]>,
}

impl RealTimeNetwork {
    /// Generates a new network from the passed genome.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::{
    ///     genomics::{GeneticConfig, NNGenome},
    ///     networks::RealTimeNetwork,
    /// };
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use std::num::NonZeroUsize;
    ///
    /// let genome = NNGenome::new(
    ///     &GeneticConfig {
    ///         input_count: NonZeroUsize::new(3).unwrap(),
    ///         output_count: NonZeroUsize::new(2).unwrap(),
    ///         bias: true,
    ///         initial_weight_bound: 1.0,
    ///         weight_bound: 5.0,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut ChaCha8Rng::seed_from_u64(0),
    /// );
    ///
    /// let network = RealTimeNetwork::new(&genome);
    /// assert_eq!(network.outputs().len(), 2);
    /// ```
    pub fn new(genome: &NNGenome) -> RealTimeNetwork {
        let mut input_nodes = vec![];
        let mut bias_nodes = vec![];
        let mut output_nodes = vec![];
        let mut hidden_nodes = vec![];

        // Genome nodes are iterated in ascending ID order,
        // so every group comes out sorted.
        for node in genome.nodes() {
            match node.node_type() {
                NodeType::Input => &mut input_nodes,
                NodeType::Bias => &mut bias_nodes,
                NodeType::Output => &mut output_nodes,
                NodeType::Hidden => &mut hidden_nodes,
            }
            .push((node.innovation(), node.activation_type()));
        }
        let (node_ids, activation_functions): (Vec<_>, Vec<_>) = input_nodes
            .iter()
            .chain(&bias_nodes)
            .chain(&output_nodes)
            .chain(&hidden_nodes)
            .copied()
            .unzip();
        let total_node_count = node_ids.len();

        let node_index_from_id: HashMap<_, _, RandomState> = node_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        let mut connections = vec![vec![]; total_node_count];

        for gene in genome.genes().filter(|g| g.enabled()) {
            if let (Some(&input_index), Some(&output_index)) = (
                node_index_from_id.get(&gene.input()),
                node_index_from_id.get(&gene.output()),
            ) {
                connections[input_index].push(Connection::new(output_index, gene.weight()));
            }
        }

        let mut network = RealTimeNetwork {
            input_count: input_nodes.len(),
            bias_count: bias_nodes.len(),
            output_count: output_nodes.len(),
            node_ids: node_ids.into(),
            input_sums: vec![0.0; total_node_count].into(),
            activation_levels: vec![0.0; total_node_count].into(),
            activation_functions: activation_functions.into(),
            connections: connections.into_iter().map(|v| v.into()).collect(),
        };
        network.feed_bias();
        network
    }

    /// Number of input and bias nodes.
    fn sensor_count(&self) -> usize {
        self.input_count + self.bias_count
    }

    /// Fires all nodes, propagating all activations
    /// (including set inputs and the bias), and then
    /// computing new activation levels.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::{
    ///     genomics::{ActivationType, GeneticConfig, NNGenome},
    ///     networks::RealTimeNetwork,
    /// };
    /// use std::num::NonZeroUsize;
    ///
    /// let mut genome = NNGenome::unconnected(&GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     output_count: NonZeroUsize::new(1).unwrap(),
    ///     output_activation_types: vec![ActivationType::ReLU],
    ///     ..GeneticConfig::zero()
    /// });
    /// genome.add_gene(1, 0, 2, 2.5).unwrap();
    /// genome.add_gene(2, 1, 2, -2.5).unwrap();
    ///
    /// let mut network = RealTimeNetwork::new(&genome);
    /// network.set_inputs(&[0.5, 1.0]);
    ///
    /// network.activate();
    ///
    /// assert_eq!(network.outputs()[0], ((0.5 * 2.5 + 1.0 * (-2.5)) as f32).max(0.0));
    /// ```
    pub fn activate(&mut self) {
        self.feed_bias();
        self.fire_nodes();
        self.compute_activations();
    }

    /// Sets the bias node's activation level to 1.0.
    fn feed_bias(&mut self) {
        let sensor_count = self.sensor_count();
        for level in &mut self.activation_levels[self.input_count..sensor_count] {
            *level = 1.0;
        }
    }

    /// Propagates each node's signal through all its
    /// outgoing connections.
    fn fire_nodes(&mut self) {
        for (activation, output_connections) in self
            .activation_levels
            .iter()
            .zip(self.connections.iter())
        {
            for connection in output_connections.iter() {
                self.input_sums[connection.output] += *activation * connection.weight;
            }
        }
    }

    /// Computes each non-sensor node's activation
    /// level, based on input sum.
    fn compute_activations(&mut self) {
        let sensor_count = self.sensor_count();
        for ((input_sum, activation_level), activation_function) in self.input_sums
            [sensor_count..]
            .iter_mut()
            .zip(&mut self.activation_levels[sensor_count..])
            .zip(&self.activation_functions[sensor_count..])
        {
            *activation_level = activation_function.apply(*input_sum);
            *input_sum = 0.0;
        }
    }

    /// Clears the activation state of all nodes.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::{
    ///     genomics::{GeneticConfig, NNGenome},
    ///     networks::RealTimeNetwork,
    /// };
    ///
    /// let mut genome = NNGenome::unconnected(&GeneticConfig::zero());
    /// genome.add_gene(1, 0, 1, 1.0).unwrap();
    ///
    /// let mut network = RealTimeNetwork::new(&genome);
    /// network.set_inputs(&[1.0]);
    /// network.activate();
    /// assert_ne!(network.outputs()[0], 0.0);
    ///
    /// network.clear_state();
    ///
    /// assert_eq!(network.outputs()[0], 0.0);
    /// ```
    pub fn clear_state(&mut self) {
        for (input_sum, activation) in self
            .input_sums
            .iter_mut()
            .zip(self.activation_levels.iter_mut())
        {
            *input_sum = 0.0;
            *activation = 0.0;
        }
        self.feed_bias();
    }

    /// Sets the activation level of each input node
    /// to the corresponding value in the passed slice.
    /// The bias node is not included.
    ///
    /// # Panics
    /// This function panics if the length of the passed
    /// slice is not equal to the number of inputs in the network.
    pub fn set_inputs(&mut self, values: &[f32]) {
        self.activation_levels[..self.input_count].copy_from_slice(values);
    }

    /// Returns the current output node activation levels
    /// as a vector.
    pub fn outputs(&self) -> Vec<f32> {
        let sensor_count = self.sensor_count();
        self.activation_levels[sensor_count..sensor_count + self.output_count].to_vec()
    }

    /// Returns the genome node ID behind each network node,
    /// in network order.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::{
    ///     genomics::{ActivationType, GeneticConfig, NNGenome},
    ///     networks::RealTimeNetwork,
    /// };
    ///
    /// let mut genome = NNGenome::unconnected(&GeneticConfig {
    ///     bias: true,
    ///     ..GeneticConfig::zero()
    /// });
    /// genome.add_node(7, ActivationType::ReLU).unwrap();
    ///
    /// let network = RealTimeNetwork::new(&genome);
    /// // Input, bias, output, hidden.
    /// assert_eq!(network.node_ids(), &[0, 1, 2, 7]);
    /// ```
    pub fn node_ids(&self) -> &[Innovation] {
        &self.node_ids
    }
}

impl From<&NNGenome> for RealTimeNetwork {
    fn from(genome: &NNGenome) -> Self {
        RealTimeNetwork::new(genome)
    }
}

impl fmt::Display for RealTimeNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self as &dyn fmt::Debug).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::GeneticConfig;
    use std::num::NonZeroUsize;

    fn sigmoid(x: f32) -> f32 {
        1.0 / (1.0 + (-4.9 * x).exp())
    }

    #[test]
    fn from() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            output_count: NonZeroUsize::new(2).unwrap(),
            bias: true,
            output_activation_types: vec![ActivationType::Sigmoid, ActivationType::Gaussian],
            ..GeneticConfig::zero()
        };
        let mut genome = NNGenome::unconnected(&config);
        genome.add_node(5, ActivationType::ReLU).unwrap();

        // Nodes: inputs 0, 1, bias 2, outputs 3, 4, hidden 5.
        let ids = [1, 3, 7, 8, 4, 6, 5];
        let inputs = [0, 0, 1, 2, 5, 5, 5];
        let outputs = [3, 5, 5, 4, 4, 3, 5];
        let weights = [1.0, 1.0, 2.5, -2.0, -1.0, -1.5, 3.2];

        for i in 0..7 {
            genome
                .add_gene(ids[i], inputs[i], outputs[i], weights[i])
                .unwrap();
        }
        // Disabled gene shouldn't be expressed in network.
        genome.add_gene(2, 0, 4, -1.0).unwrap().set_enabled(false);

        let network = RealTimeNetwork::new(&genome);
        assert_eq!(network.input_count, 2);
        assert_eq!(network.bias_count, 1);
        assert_eq!(network.output_count, 2);
        assert_eq!(network.node_ids(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(
            &*network.activation_functions,
            &[
                ActivationType::Identity,
                ActivationType::Identity,
                ActivationType::Identity,
                ActivationType::Sigmoid,
                ActivationType::Gaussian,
                ActivationType::ReLU,
            ]
        );
        assert!(!network.connections[0].contains(&Connection::new(4, -1.0)));
        assert_eq!(network.connections.iter().map(|c| c.len()).sum::<usize>(), 7);
        for node_idx in 0..network.node_ids.len() {
            let (node_id, node_outputs) =
                (network.node_ids[node_idx], &network.connections[node_idx]);
            for idx in (0..7).filter(|i| inputs[*i] == node_id) {
                assert!(node_outputs.contains(&Connection::new(outputs[idx], weights[idx])));
            }
        }
    }

    #[test]
    fn activate_empty() {
        let genome = NNGenome::unconnected(&GeneticConfig::zero());
        let mut network = RealTimeNetwork::new(&genome);
        assert!((0..100).all(|_| {
            network.activate();
            network.outputs()[0] == sigmoid(0.0)
        }));
    }

    #[test]
    fn activate_single() {
        let mut genome = NNGenome::unconnected(&GeneticConfig::zero());
        genome.add_gene(1, 0, 1, 1.0).unwrap();
        let mut network = RealTimeNetwork::new(&genome);
        for input in -20..=20 {
            let input = input as f32 / 10.0;
            network.clear_state();
            network.set_inputs(&[input]);
            network.activate();
            assert_eq!(network.outputs()[0], sigmoid(input))
        }
    }

    #[test]
    fn activate_single_recursive() {
        let mut genome = NNGenome::unconnected(&GeneticConfig::zero());
        genome.add_gene(1, 0, 1, 1.0).unwrap();
        genome.add_gene(2, 1, 1, -1.0).unwrap(); // Recursive connection
        let mut network = RealTimeNetwork::new(&genome);
        let mut prev_output = 0.0;
        for input in -20..=20 {
            let input = input as f32 / 10.0;
            network.set_inputs(&[input]);
            network.activate();
            assert_eq!(network.outputs()[0], sigmoid(input - prev_output));
            prev_output = network.outputs()[0];
        }
    }

    #[test]
    fn activate_double() {
        let mut genome = NNGenome::unconnected(&GeneticConfig::zero());
        genome.add_node(2, ActivationType::Sigmoid).unwrap();
        genome.add_gene(1, 0, 2, 1.0).unwrap();
        genome.add_gene(2, 2, 1, 1.0).unwrap();
        let mut network = RealTimeNetwork::new(&genome);
        for input in -20..=20 {
            let input = input as f32 / 10.0;
            network.clear_state();
            network.set_inputs(&[input]);
            network.activate();
            network.activate();
            assert_eq!(network.outputs()[0], sigmoid(sigmoid(input)))
        }
    }

    #[test]
    fn activate_with_bias() {
        let config = GeneticConfig {
            bias: true,
            output_activation_types: vec![ActivationType::Identity],
            ..GeneticConfig::zero()
        };
        let mut genome = NNGenome::unconnected(&config);
        genome.add_gene(1, 0, 2, 1.0).unwrap();
        genome.add_gene(2, 1, 2, -0.5).unwrap();
        let mut network = RealTimeNetwork::new(&genome);
        for input in -20..=20 {
            let input = input as f32 / 10.0;
            network.clear_state();
            network.set_inputs(&[input]);
            network.activate();
            assert_eq!(network.outputs()[0], input - 0.5);
        }
    }

    #[test]
    fn activate_multiple_inputs() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(3).unwrap(),
            ..GeneticConfig::zero()
        };
        let mut genome = NNGenome::unconnected(&config);
        genome.add_gene(1, 0, 3, -1.0).unwrap();
        genome.add_gene(2, 1, 3, 1.0).unwrap();
        genome.add_gene(3, 2, 3, 0.5).unwrap();
        let mut network = RealTimeNetwork::new(&genome);
        for ((x, y), z) in (-20..=20).zip(-20..=20).zip(-20..=20) {
            let (x, y, z) = (x as f32 / 10.0, y as f32 / 10.0, z as f32 / 10.0);
            network.clear_state();
            network.set_inputs(&[x, y, z]);
            network.activate();
            assert_eq!(
                network.outputs()[0],
                sigmoid(-x + y + 0.5 * z),
                "{} {} {}",
                x,
                y,
                z
            );
        }
    }
}
