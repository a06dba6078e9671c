use crate::Innovation;

use std::error::Error;
use std::fmt;

/// An error type indicating the gene being created
/// or added is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneValidityError {
    /// The gene's ID is a duplicate.
    DuplicateGeneID(Innovation),
    /// The gene's endpoints do not exist.
    NonexistantEndpoints(Innovation, Innovation),
    /// The gene has the same endpoints as another with a different ID.
    DuplicateGeneWithEndpoints(Innovation, (Innovation, Innovation)),
    /// The gene's destination is an input or bias node.
    SensorEndpoint(Innovation),
}

/// An error type indicating the node being created
/// or added is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValidityError {
    /// The node's ID is a duplicate.
    DuplicateNodeID(Innovation),
}

/// An error type indicating that a serialized
/// genome record doesn't describe a valid genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenomeLoadError {
    /// One of the record's nodes is invalid.
    Node(NodeValidityError),
    /// One of the record's connections is invalid.
    Gene(GeneValidityError),
}

/// An error type indicating a failure
/// to carry out a gene addition mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneAdditionMutationError {
    /// There are no valid source or destination nodes.
    NoCandidateNodes,
    /// No pair of nodes was found to connect.
    NoInputOutputPairFound,
}

/// An error type indicating a failure
/// to carry out a node addition mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAdditionMutationError {
    /// The genome has no enabled genes to split.
    NoEnabledGene,
}

impl fmt::Display for GeneValidityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateGeneID(gene_id) => {
                write!(f, "duplicate gene insertion with id {}", gene_id)
            }
            Self::NonexistantEndpoints(input, output) => write!(
                f,
                "gene insertion between nonexistant endpoint(s) {} -> {}",
                input, output
            ),
            Self::DuplicateGeneWithEndpoints(duplicate_id, (input, output)) => write!(
                f,
                "gene insertion with endpoints {} -> {} and id {} shadows gene with same endpoints",
                input, output, duplicate_id,
            ),
            Self::SensorEndpoint(id) => write!(
                f,
                "gene insertion with input or bias node as destination with id {}",
                id
            ),
        }
    }
}

impl fmt::Display for NodeValidityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeID(id) => write!(f, "duplicate node insertion with id {}", id),
        }
    }
}

impl fmt::Display for GenomeLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(e) => write!(f, "invalid genome record: {}", e),
            Self::Gene(e) => write!(f, "invalid genome record: {}", e),
        }
    }
}

impl fmt::Display for GeneAdditionMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCandidateNodes => write!(f, "gene mutation on genome without candidate nodes"),
            Self::NoInputOutputPairFound => {
                write!(f, "no viable input-output pair found for gene mutation")
            }
        }
    }
}

impl fmt::Display for NodeAdditionMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEnabledGene => write!(f, "node mutation on genome without enabled genes"),
        }
    }
}

impl Error for GeneValidityError {}
impl Error for NodeValidityError {}
impl Error for GeneAdditionMutationError {}
impl Error for NodeAdditionMutationError {}

impl Error for GenomeLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Node(e) => Some(e),
            Self::Gene(e) => Some(e),
        }
    }
}

impl From<NodeValidityError> for GenomeLoadError {
    fn from(e: NodeValidityError) -> Self {
        GenomeLoadError::Node(e)
    }
}

impl From<GeneValidityError> for GenomeLoadError {
    fn from(e: GeneValidityError) -> Self {
        GenomeLoadError::Gene(e)
    }
}
