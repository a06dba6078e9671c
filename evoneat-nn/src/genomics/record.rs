use super::{ActivationType, GenomeLoadError, NNGenome, NodeType};
use crate::Innovation;

use serde::{Deserialize, Serialize};

/// The storage format of an [`NNGenome`]: its nodes as
/// `(id, type, activation)` and its genes as
/// `(innovation, input, output, weight, enabled)`,
/// both in ascending ID order.
///
/// Genomes are (de)serialized through this type, so loading
/// a genome validates it and rejects unknown endpoints,
/// duplicate IDs or endpoints, and input or bias destinations.
///
/// # Examples
/// ```
/// use evoneat_nn::genomics::{GeneticConfig, GenomeRecord, NNGenome};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let genome = NNGenome::new(&GeneticConfig::zero(), &mut ChaCha8Rng::seed_from_u64(0));
/// let record = GenomeRecord::from(genome.clone());
/// assert_eq!(record.nodes.len(), 2);
/// assert_eq!(record.connections.len(), 1);
/// assert_eq!(NNGenome::try_from(record), Ok(genome));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenomeRecord {
    pub nodes: Vec<(Innovation, NodeType, ActivationType)>,
    pub connections: Vec<(Innovation, Innovation, Innovation, f32, bool)>,
}

impl From<NNGenome> for GenomeRecord {
    fn from(genome: NNGenome) -> Self {
        GenomeRecord {
            nodes: genome
                .nodes()
                .map(|n| (n.innovation(), n.node_type(), n.activation_type()))
                .collect(),
            connections: genome
                .genes()
                .map(|g| (g.innovation(), g.input(), g.output(), g.weight(), g.enabled()))
                .collect(),
        }
    }
}

impl TryFrom<GenomeRecord> for NNGenome {
    type Error = GenomeLoadError;

    fn try_from(record: GenomeRecord) -> Result<Self, Self::Error> {
        let mut genome = NNGenome::empty();
        for (id, node_type, activation_type) in record.nodes {
            genome.add_node_of_type(id, node_type, activation_type)?;
        }
        for (id, input, output, weight, enabled) in record.connections {
            genome
                .add_gene(id, input, output, weight)?
                .set_enabled(enabled);
        }
        Ok(genome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{GeneValidityError, NodeValidityError};

    fn record() -> GenomeRecord {
        GenomeRecord {
            nodes: vec![
                (0, NodeType::Input, ActivationType::Identity),
                (1, NodeType::Bias, ActivationType::Identity),
                (2, NodeType::Output, ActivationType::Sigmoid),
                (5, NodeType::Hidden, ActivationType::ReLU),
            ],
            connections: vec![
                (1, 0, 2, 0.5, false),
                (2, 1, 2, -1.0, true),
                (7, 0, 5, 1.0, true),
                (8, 5, 2, 0.5, true),
            ],
        }
    }

    #[test]
    fn loads_valid_records() {
        let genome = NNGenome::try_from(record()).unwrap();
        assert_eq!(genome.nodes().count(), 4);
        assert_eq!(genome.genes().count(), 4);
        assert!(!genome.gene(1).unwrap().enabled());
        assert_eq!(genome.node(5).unwrap().node_type(), NodeType::Hidden);
        assert_eq!(GenomeRecord::from(genome), record());
    }

    #[test]
    fn rejects_invalid_records() {
        let mut duplicate_node = record();
        duplicate_node
            .nodes
            .push((5, NodeType::Hidden, ActivationType::Sigmoid));
        assert_eq!(
            NNGenome::try_from(duplicate_node),
            Err(GenomeLoadError::Node(NodeValidityError::DuplicateNodeID(5)))
        );

        let mut unknown_endpoint = record();
        unknown_endpoint.connections.push((9, 0, 6, 1.0, true));
        assert_eq!(
            NNGenome::try_from(unknown_endpoint),
            Err(GenomeLoadError::Gene(
                GeneValidityError::NonexistantEndpoints(0, 6)
            ))
        );

        let mut duplicate_pair = record();
        duplicate_pair.connections.push((9, 0, 2, 1.0, true));
        assert_eq!(
            NNGenome::try_from(duplicate_pair),
            Err(GenomeLoadError::Gene(
                GeneValidityError::DuplicateGeneWithEndpoints(9, (0, 2))
            ))
        );

        let mut sensor_destination = record();
        sensor_destination.connections.push((9, 5, 1, 1.0, true));
        assert_eq!(
            NNGenome::try_from(sensor_destination),
            Err(GenomeLoadError::Gene(GeneValidityError::SensorEndpoint(1)))
        );
    }

    #[test]
    fn json_loading_validates() {
        let json = r#"{"nodes":[[0,"Input","Identity"],[1,"Output","Sigmoid"]],"connections":[[1,0,1,0.5,true],[1,0,1,0.5,true]]}"#;
        let error = serde_json::from_str::<NNGenome>(json).unwrap_err();
        assert!(error.to_string().contains("duplicate gene"));

        let json = r#"{"nodes":[[0,"Input","Identity"],[1,"Output","Sigmoid"]],"connections":[[1,0,1,0.5,true]]}"#;
        let genome: NNGenome = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&genome).unwrap(), json);
    }
}
