//! The index graph builder (§4.3): reduces a tile's features to a compact
//! joint-indexed graph by coalescing geometrically coincident endpoints.

use std::collections::HashMap;

use crate::bridge::VehicleClassificationBridge;
use crate::error::BridgeError;
use crate::feature::{Feature, FeatureId, FeatureSource, RoadPoint, VehicleModel};
use crate::geometry::LocationKey;
use crate::index_graph::{IndexGraph, Joint};
use crate::vehicle::VehicleMask;

/// Geometry parsing resolution used by the builder. Must match the tile
/// format's own coordinate resolution (§4.3: "bit-exact with the map
/// format"), same constraint as [`crate::geometry::POINT_COORD_BITS`].
const BUILD_RESOLUTION: u8 = 0;

/// Output of one builder run: the joint-indexed graph plus the per-feature
/// road mask table, both destined for the tile's "routing" archive section.
pub struct IndexGraphBuild {
    pub graph: IndexGraph,
    pub masks: HashMap<FeatureId, VehicleMask>,
}

/// Drives §4.3's procedure end to end. Single-threaded per tile (§4.3, §5).
pub struct IndexGraphBuilder<'a, M: VehicleModel> {
    bridge: &'a VehicleClassificationBridge<M>,
}

impl<'a, M: VehicleModel> IndexGraphBuilder<'a, M> {
    #[must_use]
    pub fn new(bridge: &'a VehicleClassificationBridge<M>) -> Self {
        Self { bridge }
    }

    /// Builds the tile's index graph and mask table from `source`.
    pub fn build<S: FeatureSource>(&self, source: &S) -> IndexGraphBuild {
        let mut masks = HashMap::new();
        let mut groups: HashMap<LocationKey, Vec<RoadPoint>> = HashMap::new();

        source.for_each_feature(&mut |feature, feature_id| {
            let mask = self.bridge.classify_road(feature);
            if mask.is_empty() {
                return;
            }
            masks.insert(feature_id, mask);

            feature.parse_geometry(BUILD_RESOLUTION);
            let count = feature.point_count();
            for i in 0..count {
                let key = feature.point(i).location_key();
                groups.entry(key).or_default().push(RoadPoint::new(feature_id, u32::try_from(i).expect("polyline index fits u32")));
            }
        });

        let joints: Vec<Joint> = groups.into_values().filter(|members| members.len() >= 2).map(Joint::new).collect();

        tracing::info!(joint_count = joints.len(), feature_count = masks.len(), "index graph built");

        IndexGraphBuild { graph: IndexGraph::import(joints), masks }
    }
}

/// Constructs a bridge and immediately runs the builder, the common case
/// for the index-builder CLI (§4.3 inputs: "the feature iterator... the
/// country string").
pub fn build_index_graph<S, M, F>(source: &S, factory: &F, country: &str) -> Result<IndexGraphBuild, BridgeError>
where
    S: FeatureSource,
    M: VehicleModel,
    F: crate::feature::VehicleModelFactory<Model = M>,
{
    let bridge = VehicleClassificationBridge::new(factory, country)?;
    Ok(IndexGraphBuilder::new(&bridge).build(source))
}
