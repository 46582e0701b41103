//! Incident-edge materialisation protocol (§4.2).
//!
//! A shared scan over a feature's polyline finds every vertex equal (under
//! epsilon) to a query point and offers the matching segment(s) to a loader.
//! Outgoing and ingoing loaders are a tagged variant rather than a trait
//! object hierarchy (§9: no inheritance needed for this).

use crate::edge::Edge;
use crate::feature::FeatureId;
use crate::road_graph::Mode;
use crate::road_info::RoadInfo;

/// Which side of the cross point the materialised edges are anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeLoader {
    /// Cross point is the edge's start.
    Outgoing,
    /// Cross point is the edge's end.
    Ingoing,
}

impl EdgeLoader {
    /// Scans `road_info`'s polyline for vertices matching `cross` (epsilon)
    /// and calls `visit` once for each real edge this loader produces at
    /// that vertex, honouring `mode` against the feature's one-way flag.
    pub fn for_each_edge(
        self,
        feature_id: FeatureId,
        road_info: &RoadInfo,
        cross: crate::geometry::Point,
        mode: Mode,
        mut visit: impl FnMut(Edge),
    ) {
        let junctions = road_info.junctions();
        for (i, junction) in junctions.iter().enumerate() {
            if !junction.point.almost_equal(&cross) {
                continue;
            }

            if let Some(next) = junctions.get(i + 1) {
                let forward_edge = Edge::new(
                    feature_id,
                    true,
                    false,
                    u32::try_from(i).expect("polyline index fits u32"),
                    *junction,
                    *next,
                );
                match self {
                    EdgeLoader::Outgoing => visit(forward_edge),
                    EdgeLoader::Ingoing => {
                        let arriving = forward_edge.reverse();
                        if mode.allows(road_info.is_one_way(), arriving.forward) {
                            visit(arriving);
                        }
                    }
                }
            }

            if i > 0 {
                let prev = &junctions[i - 1];
                let forward_edge = Edge::new(
                    feature_id,
                    true,
                    false,
                    u32::try_from(i - 1).expect("polyline index fits u32"),
                    *prev,
                    *junction,
                );
                match self {
                    EdgeLoader::Outgoing => {
                        let departing = forward_edge.reverse();
                        if mode.allows(road_info.is_one_way(), departing.forward) {
                            visit(departing);
                        }
                    }
                    EdgeLoader::Ingoing => visit(forward_edge),
                }
            }
        }
    }
}
