use crate::Innovation;

use serde::{Deserialize, Serialize};

use std::collections::BTreeSet;
use std::fmt;

/// Activation functions available to network nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ActivationType {
    // 1 / (1 + exp(-4.9x))
    Sigmoid,
    // x
    Identity,
    // 0   if x < 0
    // x   if x ≥ 0
    ReLU,
    // exp(-x²)
    Gaussian,
    // sin(πx)
    Sinusoidal,
}

impl ActivationType {
    /// Applies the activation function to `x`.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::ActivationType;
    ///
    /// assert_eq!(ActivationType::Sigmoid.apply(0.0), 0.5);
    /// assert_eq!(ActivationType::ReLU.apply(-3.0), 0.0);
    /// assert_eq!(ActivationType::Identity.apply(-3.0), -3.0);
    /// ```
    pub fn apply(self, x: f32) -> f32 {
        match self {
            ActivationType::Sigmoid => 1.0 / (1.0 + (-4.9 * x).exp()),
            ActivationType::Identity => x,
            ActivationType::ReLU => x.max(0.0),
            ActivationType::Gaussian => (-x.powi(2)).exp(),
            ActivationType::Sinusoidal => (x * std::f32::consts::PI).sin(),
        }
    }
}

/// The role a node plays in its genome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    /// Fed an input value by networks.
    Input,
    /// Always fed 1.0 by networks.
    Bias,
    /// Created by node addition mutations.
    Hidden,
    /// Read out by networks.
    Output,
}

impl NodeType {
    /// Returns `true` for node types that
    /// cannot be the destination of a gene.
    pub fn is_sensor(self) -> bool {
        matches!(self, NodeType::Input | NodeType::Bias)
    }
}

/// Nodes are the endpoints of genes, and become
/// neurons in the genome's phenotype. Each node
/// keeps track of the genes entering and leaving it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Node {
    id: Innovation,
    inputs: BTreeSet<Innovation>,
    outputs: BTreeSet<Innovation>,
    node_type: NodeType,
    activation_type: ActivationType,
}

impl Node {
    /// Returns a new unconnected node.
    ///
    /// # Examples
    /// ```
    /// use evoneat_nn::genomics::{ActivationType, Node, NodeType};
    ///
    /// let node = Node::new(4, NodeType::Hidden, ActivationType::ReLU);
    /// assert_eq!(node.input_genes().count(), 0);
    /// ```
    pub fn new(id: Innovation, node_type: NodeType, activation_type: ActivationType) -> Node {
        Node {
            id,
            inputs: BTreeSet::new(),
            outputs: BTreeSet::new(),
            node_type,
            activation_type,
        }
    }

    /// Registers a gene entering the node. Returns `false`
    /// if it was already registered.
    pub(super) fn add_input_gene(&mut self, gene_id: Innovation) -> bool {
        self.inputs.insert(gene_id)
    }

    /// Registers a gene leaving the node. Returns `false`
    /// if it was already registered.
    pub(super) fn add_output_gene(&mut self, gene_id: Innovation) -> bool {
        self.outputs.insert(gene_id)
    }

    /// Returns the node's innovation number.
    pub fn innovation(&self) -> Innovation {
        self.id
    }

    /// Returns the IDs of genes entering the node,
    /// in ascending order.
    pub fn input_genes(&self) -> impl Iterator<Item = &Innovation> {
        self.inputs.iter()
    }

    /// Returns the IDs of genes leaving the node,
    /// in ascending order.
    pub fn output_genes(&self) -> impl Iterator<Item = &Innovation> {
        self.outputs.iter()
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn activation_type(&self) -> ActivationType {
        self.activation_type
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}[{:?}, {:?}, IN: {:?}, OUT: {:?}]",
            self.id, self.node_type, self.activation_type, self.inputs, self.outputs,
        )
    }
}
