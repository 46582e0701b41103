//! A concrete, in-memory [`RoadGraph`] wiring a feature source, a single
//! vehicle model, and a fake-edge overlay. Road info is computed once at
//! construction and cached for the lifetime of the graph, per §3's
//! "Lifecycles" note.

use std::collections::HashMap;

use crate::edge::Edge;
use crate::feature::{Feature, FeatureId, FeatureSource, VehicleModel};
use crate::geometry::{Junction, Point};
use crate::road_graph::closest::{closest_edge_for_segment, rank_closest, ClosestEdge};
use crate::road_graph::loader::EdgeLoader;
use crate::road_graph::overlay::FakeEdgeOverlay;
use crate::road_graph::{Mode, RoadGraph, TypesHolder};
use crate::road_info::RoadInfo;
use crate::vehicle::VehicleType;

/// Geometry parsing resolution passed to [`Feature::parse_geometry`]. A
/// single fixed resolution is sufficient for the in-memory graph; tile
/// formats that support level-of-detail geometry would vary this.
const FULL_RESOLUTION: u8 = 0;

pub struct InMemoryRoadGraph {
    road_infos: HashMap<FeatureId, RoadInfo>,
    vehicle: VehicleType,
    mode: Mode,
    max_speed_kmph: f64,
    overlay: FakeEdgeOverlay,
}

impl InMemoryRoadGraph {
    /// Builds the graph for one vehicle profile by iterating every feature
    /// in `source` once, skipping features the model does not consider a
    /// road and features with zero points (§7: "Empty feature... silently
    /// skipped, not an error").
    pub fn build<S, M>(source: &S, model: &M, vehicle: VehicleType, mode: Mode) -> Self
    where
        S: FeatureSource,
        M: VehicleModel,
    {
        let mut road_infos = HashMap::new();
        source.for_each_feature(&mut |feature, feature_id| {
            if !model.is_road(feature) {
                return;
            }
            feature.parse_geometry(FULL_RESOLUTION);
            let count = feature.point_count();
            if count == 0 {
                return;
            }
            let junctions = (0..count).map(|i| Junction::new(feature.point(i), feature.altitude(i)));
            let mask = [vehicle].into_iter().collect();
            let info = RoadInfo::new(junctions, model.max_speed_kmph(), model.is_one_way(feature), mask);
            road_infos.insert(feature_id, info);
        });

        Self {
            road_infos,
            vehicle,
            mode,
            max_speed_kmph: model.max_speed_kmph(),
            overlay: FakeEdgeOverlay::new(),
        }
    }

    fn types_for(&self, info: &RoadInfo) -> TypesHolder {
        TypesHolder {
            road_mask: info.road_mask(),
            one_way_mask: if info.is_one_way() { info.road_mask() } else { Default::default() },
        }
    }
}

impl RoadGraph for InMemoryRoadGraph {
    fn regular_outgoing_edges(&self, j: &Junction) -> Vec<Edge> {
        let mut edges = Vec::new();
        for (feature_id, info) in &self.road_infos {
            EdgeLoader::Outgoing.for_each_edge(*feature_id, info, j.point, self.mode, |e| edges.push(e));
        }
        edges
    }

    fn regular_ingoing_edges(&self, j: &Junction) -> Vec<Edge> {
        let mut edges = Vec::new();
        for (feature_id, info) in &self.road_infos {
            EdgeLoader::Ingoing.for_each_edge(*feature_id, info, j.point, self.mode, |e| edges.push(e));
        }
        edges
    }

    fn fake_outgoing_edges(&self, j: &Junction) -> Vec<Edge> {
        self.overlay.outgoing(j).to_vec()
    }

    fn fake_ingoing_edges(&self, j: &Junction) -> Vec<Edge> {
        self.overlay.ingoing(j).to_vec()
    }

    fn max_speed_kmph(&self) -> f64 {
        self.max_speed_kmph
    }

    fn speed_kmph_for_feature(&self, feature_id: FeatureId) -> f64 {
        self.road_infos.get(&feature_id).map_or(self.max_speed_kmph, RoadInfo::speed_kmph)
    }

    fn fake_edge_speed_kmph(&self, edge: &Edge) -> Option<f64> {
        self.overlay.inherited_speed_kmph(edge)
    }

    fn road_info(&self, feature_id: FeatureId) -> Option<RoadInfo> {
        self.road_infos.get(&feature_id).cloned()
    }

    fn find_closest_edges(&self, point: Point, count: usize) -> Vec<ClosestEdge> {
        let mut candidates = Vec::new();
        for (feature_id, info) in &self.road_infos {
            let junctions = info.junctions();
            for i in 0..junctions.len().saturating_sub(1) {
                let segment_index = u32::try_from(i).expect("polyline index fits u32");
                candidates.push(closest_edge_for_segment(*feature_id, segment_index, &junctions[i], &junctions[i + 1], point));
            }
        }
        rank_closest(candidates, count)
    }

    fn for_each_feature_closest_to_cross(&self, point: Point, visit: &mut dyn FnMut(FeatureId, &RoadInfo)) {
        for (feature_id, info) in &self.road_infos {
            if info.junctions().iter().any(|j| j.point.almost_equal(&point)) {
                visit(*feature_id, info);
            }
        }
    }

    fn edge_types(&self, edge: &Edge) -> TypesHolder {
        self.feature_types(edge.feature_id)
    }

    fn junction_types(&self, j: &Junction) -> TypesHolder {
        let mut merged = TypesHolder::default();
        self.for_each_feature_closest_to_cross(j.point, &mut |_, info| {
            merged.road_mask |= info.road_mask();
            if info.is_one_way() {
                merged.one_way_mask |= info.road_mask();
            }
        });
        merged
    }

    fn feature_types(&self, feature_id: FeatureId) -> TypesHolder {
        self.road_infos.get(&feature_id).map_or_else(Default::default, |info| self.types_for(info))
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn add_fake_edges(&mut self, j: Junction, vicinities: &[(Edge, Junction)]) {
        for (edge, projection) in vicinities {
            let source_speed_kmph = self.speed_kmph_for_feature(edge.feature_id);

            let to_projection = Edge::new(FeatureId::INVALID, true, true, 0, j, *projection);
            let from_projection = to_projection.reverse();
            self.overlay.push_outgoing(&j, to_projection);
            self.overlay.push_ingoing(projection, to_projection);
            self.overlay.push_outgoing(projection, from_projection);
            self.overlay.push_ingoing(&j, from_projection);
            self.overlay.record_inherited_speed(to_projection, source_speed_kmph);
            self.overlay.record_inherited_speed(from_projection, source_speed_kmph);

            if !projection.point.almost_equal(&edge.start_junction.point) {
                let half = Edge::new(FeatureId::INVALID, true, true, 0, *projection, edge.start_junction);
                self.overlay.push_outgoing(projection, half);
                self.overlay.push_ingoing(&edge.start_junction, half);
                let half_rev = half.reverse();
                self.overlay.push_outgoing(&edge.start_junction, half_rev);
                self.overlay.push_ingoing(projection, half_rev);
                self.overlay.record_inherited_speed(half, source_speed_kmph);
                self.overlay.record_inherited_speed(half_rev, source_speed_kmph);
            }
            if !projection.point.almost_equal(&edge.end_junction.point) {
                let half = Edge::new(FeatureId::INVALID, true, true, 0, *projection, edge.end_junction);
                self.overlay.push_outgoing(projection, half);
                self.overlay.push_ingoing(&edge.end_junction, half);
                let half_rev = half.reverse();
                self.overlay.push_outgoing(&edge.end_junction, half_rev);
                self.overlay.push_ingoing(projection, half_rev);
                self.overlay.record_inherited_speed(half, source_speed_kmph);
                self.overlay.record_inherited_speed(half_rev, source_speed_kmph);
            }
        }
    }

    fn reset_fakes(&mut self) {
        self.overlay.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureId as Fid;

    struct OneRoad {
        points: Vec<Point>,
    }

    impl Feature for OneRoad {
        fn parse_geometry(&mut self, _resolution: u8) {}

        fn point_count(&self) -> usize {
            self.points.len()
        }

        fn point(&self, index: usize) -> Point {
            self.points[index]
        }

        fn altitude(&self, _index: usize) -> crate::geometry::Altitude {
            crate::geometry::UNKNOWN_ALTITUDE
        }
    }

    struct OneRoadSource {
        one_way: bool,
    }

    impl FeatureSource for OneRoadSource {
        type Feature = OneRoad;

        fn for_each_feature(&self, visit: &mut dyn FnMut(&mut Self::Feature, Fid)) {
            let mut feature = OneRoad {
                points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)],
            };
            visit(&mut feature, Fid::new(1));
        }
    }

    struct CarModel {
        one_way: bool,
    }

    impl VehicleModel for CarModel {
        fn is_road(&self, _feature: &dyn Feature) -> bool {
            true
        }

        fn is_one_way(&self, _feature: &dyn Feature) -> bool {
            self.one_way
        }

        fn max_speed_kmph(&self) -> f64 {
            50.0
        }
    }

    #[test]
    fn bidirectional_feature_yields_two_edges_at_interior_vertex() {
        let source = OneRoadSource { one_way: false };
        let model = CarModel { one_way: false };
        let graph = InMemoryRoadGraph::build(&source, &model, VehicleType::Car, Mode::ObeyOnewayTag);
        let j = Junction::without_altitude(Point::new(1.0, 0.0));
        let edges = graph.outgoing_edges(&j);
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn fake_overlay_is_empty_after_reset() {
        let source = OneRoadSource { one_way: false };
        let model = CarModel { one_way: false };
        let mut graph = InMemoryRoadGraph::build(&source, &model, VehicleType::Car, Mode::ObeyOnewayTag);
        let j = Junction::without_altitude(Point::new(0.5, 0.1));
        let edge = Edge::new(Fid::new(1), true, false, 0, Junction::without_altitude(Point::new(0.0, 0.0)), Junction::without_altitude(Point::new(1.0, 0.0)));
        let projection = Junction::without_altitude(Point::new(0.5, 0.0));
        graph.add_fake_edges(j, &[(edge, projection)]);
        assert!(!graph.fake_outgoing_edges(&j).is_empty());
        graph.reset_fakes();
        assert!(graph.fake_outgoing_edges(&j).is_empty());
        assert!(graph.fake_ingoing_edges(&j).is_empty());
    }

    #[test]
    fn add_fake_edges_inserts_part_of_real_edge_to_projection() {
        let source = OneRoadSource { one_way: false };
        let model = CarModel { one_way: false };
        let mut graph = InMemoryRoadGraph::build(&source, &model, VehicleType::Car, Mode::ObeyOnewayTag);
        let j = Junction::without_altitude(Point::new(0.5, 0.1));
        let edge = Edge::new(Fid::new(1), true, false, 0, Junction::without_altitude(Point::new(0.0, 0.0)), Junction::without_altitude(Point::new(1.0, 0.0)));
        let projection = Junction::without_altitude(Point::new(0.5, 0.0));
        graph.add_fake_edges(j, &[(edge, projection)]);
        let outgoing = graph.fake_outgoing_edges(&j);
        let found = outgoing.iter().find(|e| e.end_junction.point.almost_equal(&projection.point));
        let found = found.expect("fake edge to projection present");
        assert!(found.part_of_real);
        assert!(!found.feature_id.is_valid());
    }

    #[test]
    fn one_way_graph_obeys_mode_at_interior_vertex() {
        let source = OneRoadSource { one_way: true };
        let model = CarModel { one_way: true };
        let graph = InMemoryRoadGraph::build(&source, &model, VehicleType::Car, Mode::ObeyOnewayTag);
        let j = Junction::without_altitude(Point::new(1.0, 0.0));
        let edges = graph.outgoing_edges(&j);
        assert_eq!(edges.len(), 1);
        assert!(edges[0].forward);
    }
}
