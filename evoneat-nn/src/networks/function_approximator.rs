use crate::genomics::NNGenome;
use crate::networks::RealTimeNetwork;

/// A neural network best suited for function
/// approximation.
///
/// Each evaluation starts from a clean state and runs
/// as many activation steps as the longest path from
/// an input or the bias to an output.
///
/// # Generic parameters
/// `MAX_NODE_VISITS`: the maximum number of times a node
/// can be visited in a path through the network before
/// the network's activation freezes. Setting it to 0 will
/// effectively disable the entire network, 1 will dissallow
/// any cycles, 2 will allow single pass through the longest
/// cycle in the network, etc.
#[derive(Clone, Debug)]
pub struct FunctionApproximatorNetwork<const MAX_NODE_VISITS: u8> {
    network: RealTimeNetwork,
    depth: usize,
}

impl<const MAX_NODE_VISITS: u8> From<&NNGenome> for FunctionApproximatorNetwork<MAX_NODE_VISITS> {
    /// Generates a new network from the passed genome.
    ///
    /// # Complexity
    /// This function has `O(d^(n × MAX_NODE_VISITS))` time complexity,
    /// and `O(n × MAX_NODE_VISITS)` space complexity,
    /// where `d` is the highest output count in the genome's nodes.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{GeneticConfig, NNGenome};
    /// use evoneat_nn::networks::FunctionApproximatorNetwork;
    ///
    /// let genome = NNGenome::unconnected(&GeneticConfig::zero());
    /// let mut network = FunctionApproximatorNetwork::<1>::from(&genome);
    ///
    /// // Nothing reaches the output.
    /// assert_eq!(network.evaluate_at(&[1.0]), [0.0]);
    /// ```
    fn from(genome: &NNGenome) -> FunctionApproximatorNetwork<MAX_NODE_VISITS> {
        let network = RealTimeNetwork::new(genome);
        let depth = (0..network.sensor_count())
            .map(|root| {
                Self::calculate_depth(&network, root, &mut vec![0; network.connections.len()], 0)
            })
            .max()
            .unwrap_or(0);

        FunctionApproximatorNetwork { network, depth }
    }
}

impl<const MAX_NODE_VISITS: u8> FunctionApproximatorNetwork<MAX_NODE_VISITS> {
    /// Calculates the length of the longest path
    /// from the `root` node to an output that doesn't
    /// pass through any node more than `MAX_NODE_VISITS` times.
    fn calculate_depth(
        network: &RealTimeNetwork,
        root: usize,
        visited: &mut [u8],
        current_depth: usize,
    ) -> usize {
        let mut max_depth = 0;

        for c in network.connections[root].iter() {
            if visited[c.output] < MAX_NODE_VISITS {
                visited[c.output] += 1;
                max_depth = max_depth.max(Self::calculate_depth(
                    network,
                    c.output,
                    visited,
                    current_depth + 1,
                ));
                visited[c.output] -= 1;
            }
        }

        let outputs = network.sensor_count()..network.sensor_count() + network.output_count;
        if max_depth == 0 && outputs.contains(&root) {
            current_depth
        } else {
            max_depth
        }
    }

    /// Returns the approximated function's value
    /// at the N-dimensional point given by `inputs`.
    /// The bias, if any, is supplied by the network.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ActivationType, GeneticConfig, NNGenome};
    /// use evoneat_nn::networks::FunctionApproximatorNetwork;
    ///
    /// fn sigmoid(x: f32) -> f32 {
    ///     1.0 / (1.0 + (-4.9 * x).exp())
    /// }
    ///
    /// // Create a network with a two sigmoid nodes.
    /// let mut genome = NNGenome::unconnected(&GeneticConfig::zero());
    /// genome.add_node(2, ActivationType::Sigmoid).unwrap();
    /// genome.add_gene(1, 0, 2, 1.0).unwrap();
    /// genome.add_gene(2, 2, 1, 1.0).unwrap();
    /// let mut network = FunctionApproximatorNetwork::<1>::from(&genome);
    ///
    /// // The result is identical to double application of a sigmoid function.
    /// for input in -20..=20 {
    ///     let input = input as f32 / 10.0;
    ///     assert_eq!(network.evaluate_at(&[input])[0], sigmoid(sigmoid(input)));
    /// }
    /// ```
    pub fn evaluate_at(&mut self, inputs: &[f32]) -> Vec<f32> {
        self.network.clear_state();
        self.network.set_inputs(inputs);
        for _ in 0..self.depth {
            self.network.activate();
        }
        self.network.outputs()
    }

    /// Number of activation steps run per evaluation.
    pub fn depth(&self) -> usize {
        self.depth
    }
}
