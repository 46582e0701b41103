//! Byte layout for the `routing` archive section (§4.3 step 6, §6).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ArchiveError;
use crate::feature::FeatureId;
use crate::vehicle::VehicleMask;

use super::IndexGraph;

/// The full `routing` section payload: the joint-indexed graph followed by
/// the per-feature vehicle mask table (§6: "Persisted layout").
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RoutingSection {
    graph: IndexGraph,
    masks: HashMap<FeatureId, VehicleMask>,
}

/// Encodes/decodes the `routing` archive section.
pub struct IndexGraphSerializer;

impl IndexGraphSerializer {
    /// # Errors
    /// Returns [`ArchiveError::Decode`] if `graph`/`masks` cannot be encoded,
    /// which should not happen for in-memory values built by this crate.
    pub fn serialize(graph: &IndexGraph, masks: &HashMap<FeatureId, VehicleMask>) -> Result<Vec<u8>, ArchiveError> {
        let section = RoutingSection { graph: graph.clone(), masks: masks.clone() };
        bincode::serialize(&section).map_err(|source| ArchiveError::Decode { tag: "routing".to_owned(), source })
    }

    /// # Errors
    /// Returns [`ArchiveError::Decode`] if `bytes` is not a valid encoded
    /// section.
    pub fn deserialize(bytes: &[u8]) -> Result<(IndexGraph, HashMap<FeatureId, VehicleMask>), ArchiveError> {
        let section: RoutingSection =
            bincode::deserialize(bytes).map_err(|source| ArchiveError::Decode { tag: "routing".to_owned(), source })?;
        Ok((section.graph, section.masks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_graph::Joint;
    use crate::feature::RoadPoint;

    #[test]
    fn serialize_then_deserialize_is_the_identity() {
        let joint = Joint::new([RoadPoint::new(FeatureId::new(1), 0), RoadPoint::new(FeatureId::new(2), 0)]);
        let graph = IndexGraph::import(vec![joint]);
        let mut masks = HashMap::new();
        masks.insert(FeatureId::new(1), VehicleMask::empty());

        let encoded = IndexGraphSerializer::serialize(&graph, &masks).unwrap();
        let (decoded_graph, decoded_masks) = IndexGraphSerializer::deserialize(&encoded).unwrap();

        assert_eq!(decoded_graph.joints().len(), 1);
        assert_eq!(decoded_masks.len(), 1);
    }
}
