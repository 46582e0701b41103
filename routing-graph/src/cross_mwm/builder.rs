//! Transition detection and leap-weight precomputation (§4.4).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::border::{BorderLoader, Region};
use crate::bridge::VehicleClassificationBridge;
use crate::error::CrossMwmBuildError;
use crate::feature::{EdgeEstimator, Feature, FeatureId, VehicleModel};
use crate::geometry::Point;
use crate::index_graph::{IndexGraph, JointId};
use crate::road_info::RoadInfo;
use crate::vehicle::VehicleType;

use super::{CrossMwmConnector, CrossMwmTransition, Segment};

/// Geometry parsing resolution used when scanning for border crossings.
const SCAN_RESOLUTION: u8 = 0;

/// Drives §4.4 steps 1-3: detects border-crossing transitions, bootstraps a
/// per-vehicle connector, and fills its leap-weight table.
///
/// The design note in §9 flags that the original hard-codes step 3 to the
/// Car profile; this builder takes the vehicle type as a parameter instead
/// and callers loop over [`VehicleType::ALL`] themselves.
pub struct CrossMwmConnectorBuilder<'a, M: VehicleModel> {
    bridge: &'a VehicleClassificationBridge<M>,
}

impl<'a, M: VehicleModel> CrossMwmConnectorBuilder<'a, M> {
    #[must_use]
    pub fn new(bridge: &'a VehicleClassificationBridge<M>) -> Self {
        Self { bridge }
    }

    /// §4.4 step 1: scans every road-masked feature for border crossings
    /// against `regions`, returning the full transition list.
    pub fn detect_transitions<S, R>(&self, source: &S, regions: &[R]) -> Vec<CrossMwmTransition>
    where
        S: crate::feature::FeatureSource,
        R: Region,
    {
        let mut transitions = Vec::new();
        source.for_each_feature(&mut |feature, feature_id| {
            let road_mask = self.bridge.classify_road(feature);
            if road_mask.is_empty() {
                return;
            }
            feature.parse_geometry(SCAN_RESOLUTION);
            let count = feature.point_count();
            if count == 0 {
                return;
            }

            let one_way_mask = self.bridge.classify_oneway(feature);
            let mut prev_inside = crate::border::contains_any(regions, feature.point(0));

            for i in 1..count {
                let point = feature.point(i);
                let inside = crate::border::contains_any(regions, point);
                if inside != prev_inside {
                    let (point_on_inside, point_on_outside) = if inside {
                        (point, feature.point(i - 1))
                    } else {
                        (feature.point(i - 1), point)
                    };
                    transitions.push(CrossMwmTransition {
                        feature_id,
                        segment_index: u32::try_from(i - 1).expect("polyline index fits u32"),
                        road_mask,
                        one_way_mask,
                        enter_side: inside,
                        point_on_inside,
                        point_on_outside,
                    });
                }
                prev_inside = inside;
            }
        });
        transitions
    }

    /// §4.4 step 2: bootstraps one vehicle's connector from the global
    /// transition list.
    #[must_use]
    pub fn connector_for(transitions: &[CrossMwmTransition], vehicle: VehicleType) -> CrossMwmConnector {
        let mut connector = CrossMwmConnector::new(vehicle);
        for transition in transitions {
            if !transition.permits(vehicle) {
                continue;
            }
            let segment = transition.as_segment();
            if transition.enter_side {
                connector.push_enter(segment);
            } else {
                connector.push_exit(segment);
            }
        }
        connector
    }

    /// §4.4 step 3: runs a Dijkstra wave from every enter over `graph`,
    /// recording the cost to every reachable exit.
    pub fn fill_leap_weights(
        connector: &mut CrossMwmConnector,
        graph: &IndexGraph,
        road_infos: &HashMap<FeatureId, RoadInfo>,
        estimator: &dyn EdgeEstimator,
        segment_joint: impl Fn(Segment) -> Option<JointId>,
    ) {
        let enters: Vec<_> = connector.enters().to_vec();
        let exits: Vec<_> = connector.exits().to_vec();

        let exit_joints: Vec<Option<JointId>> = exits.iter().map(|s| segment_joint(*s)).collect();

        let mut weight_rows: Vec<Vec<f64>> = Vec::with_capacity(enters.len());
        for (enter_index, enter) in enters.iter().enumerate() {
            let Some(start) = segment_joint(*enter) else {
                weight_rows.push(vec![super::NO_ROUTE; exits.len()]);
                continue;
            };

            let distance_map = dijkstra_wave(graph, road_infos, estimator, start, |_| false);

            let row: Vec<f64> = exit_joints.iter().map(|exit| exit.and_then(|j| distance_map.get(&j).copied()).unwrap_or(super::NO_ROUTE)).collect();
            weight_rows.push(row);

            if (enter_index + 1) % 10 == 0 {
                tracing::info!(enters_done = enter_index + 1, total = enters.len(), "leap weights: enters processed");
            }
        }

        connector.fill_weights(|enter_index, exit_index| weight_rows[enter_index][exit_index]);
    }
}

/// Constructs a bridge and scans for transitions in one call (§4.4 inputs:
/// border polygons, road-masked features).
///
/// # Errors
/// Returns [`CrossMwmBuildError::Bridge`] if a vehicle model is missing, or
/// [`CrossMwmBuildError::BorderLoad`] if the border file cannot be loaded.
pub fn detect_transitions_for_country<S, M, F, B>(
    source: &S,
    factory: &F,
    country: &str,
    border_loader: &B,
    border_path: &std::path::Path,
) -> Result<Vec<CrossMwmTransition>, CrossMwmBuildError>
where
    S: crate::feature::FeatureSource,
    M: VehicleModel,
    F: crate::feature::VehicleModelFactory<Model = M>,
    B: BorderLoader,
{
    let bridge = VehicleClassificationBridge::new(factory, country)?;
    let regions = border_loader.load_borders(border_path)?;
    Ok(CrossMwmConnectorBuilder::new(&bridge).detect_transitions(source, &regions))
}

#[derive(PartialEq)]
struct HeapEntry {
    cost: f64,
    tie_break: Segment,
    joint: JointId,
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reversed so [`BinaryHeap`] (a max-heap) pops the smallest cost first,
/// ties broken by segment order (§4.4: "ties broken by Segment order").
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.tie_break.cmp(&self.tie_break))
    }
}

/// A best-first Dijkstra wave over `graph`'s joints, starting at `start`,
/// until the queue is exhausted (§4.4: "the wave's termination predicate is
/// 'queue empty'"). `should_stop` is evaluated on each dequeue (§5
/// cancellation); the leap builder passes a constant-false.
fn dijkstra_wave(
    graph: &IndexGraph,
    road_infos: &HashMap<FeatureId, RoadInfo>,
    estimator: &dyn EdgeEstimator,
    start: JointId,
    should_stop: impl Fn(JointId) -> bool,
) -> HashMap<JointId, f64> {
    let mut distance_map: HashMap<JointId, f64> = HashMap::new();
    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { cost: 0.0, tie_break: Segment { feature_id: FeatureId::INVALID, segment_index: 0, forward: true }, joint: start });

    while let Some(HeapEntry { cost, joint, .. }) = heap.pop() {
        if should_stop(joint) {
            break;
        }
        if distance_map.contains_key(&joint) {
            continue;
        }
        distance_map.insert(joint, cost);

        for (next, weight) in graph.outgoing_transitions(joint, road_infos, estimator) {
            debug_assert!(weight >= 0.0, "negative weights are forbidden (§4.4)");
            let next_cost = cost + weight;
            if distance_map.contains_key(&next) {
                continue;
            }
            let tie_break = graph.joint(next).members().first().map_or(
                Segment { feature_id: FeatureId::INVALID, segment_index: 0, forward: true },
                |m| Segment { feature_id: m.feature_id, segment_index: m.point_index, forward: true },
            );
            heap.push(HeapEntry { cost: next_cost, tie_break, joint: next });
        }
    }

    distance_map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Feature as _, RoadPoint};
    use crate::geometry::{Junction, UNKNOWN_ALTITUDE};
    use crate::index_graph::Joint;
    use crate::vehicle::VehicleMask;

    struct StubFeature {
        points: Vec<Point>,
    }

    impl Feature for StubFeature {
        fn parse_geometry(&mut self, _resolution: u8) {}
        fn point_count(&self) -> usize {
            self.points.len()
        }
        fn point(&self, index: usize) -> Point {
            self.points[index]
        }
        fn altitude(&self, _index: usize) -> crate::geometry::Altitude {
            UNKNOWN_ALTITUDE
        }
    }

    struct CrossingSource;

    impl crate::feature::FeatureSource for CrossingSource {
        type Feature = StubFeature;

        fn for_each_feature(&self, visit: &mut dyn FnMut(&mut Self::Feature, FeatureId)) {
            let mut feature = StubFeature { points: vec![Point::new(0.5, 0.9), Point::new(0.5, 1.1)] };
            visit(&mut feature, FeatureId::new(1));
        }
    }

    struct UnitSquare;

    impl Region for UnitSquare {
        fn contains(&self, point: Point) -> bool {
            (0.0..=1.0).contains(&point.x) && (0.0..=1.0).contains(&point.y)
        }
    }

    struct AllRoadsModel;

    impl VehicleModel for AllRoadsModel {
        fn is_road(&self, _feature: &dyn Feature) -> bool {
            true
        }
        fn is_one_way(&self, _feature: &dyn Feature) -> bool {
            false
        }
        fn max_speed_kmph(&self) -> f64 {
            50.0
        }
    }

    struct AllRoadsFactory;

    impl crate::feature::VehicleModelFactory for AllRoadsFactory {
        type Model = AllRoadsModel;
        fn model_for(&self, _vehicle: VehicleType, _country: &str) -> Option<AllRoadsModel> {
            Some(AllRoadsModel)
        }
    }

    #[test]
    fn exiting_feature_records_a_single_exit_transition() {
        let bridge = VehicleClassificationBridge::new(&AllRoadsFactory, "xx").unwrap();
        let builder = CrossMwmConnectorBuilder::new(&bridge);
        let transitions = builder.detect_transitions(&CrossingSource, &[UnitSquare]);
        assert_eq!(transitions.len(), 1);
        assert!(!transitions[0].enter_side);
        assert_eq!(transitions[0].segment_index, 0);
    }

    #[test]
    fn transition_containment_differs_between_inside_and_outside_points() {
        let bridge = VehicleClassificationBridge::new(&AllRoadsFactory, "xx").unwrap();
        let builder = CrossMwmConnectorBuilder::new(&bridge);
        let transitions = builder.detect_transitions(&CrossingSource, &[UnitSquare]);
        let t = &transitions[0];
        assert_ne!(crate::border::contains_any(&[UnitSquare], t.point_on_inside), crate::border::contains_any(&[UnitSquare], t.point_on_outside));
    }

    struct FixedCostEstimator;

    impl EdgeEstimator for FixedCostEstimator {
        fn weight(&self, _from: &crate::edge::Edge, _to: &crate::edge::Edge, _edge: &crate::edge::Edge) -> f64 {
            1.0
        }
        fn max_speed_kmph(&self) -> f64 {
            100.0
        }
    }

    #[test]
    fn leap_weight_sums_estimator_cost_along_a_straight_road() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0), Point::new(3.0, 0.0)];
        let info = RoadInfo::new(points.map(Junction::without_altitude), 100.0, false, VehicleMask::empty());
        let mut road_infos = HashMap::new();
        road_infos.insert(FeatureId::new(1), info);

        let enter_point = RoadPoint::new(FeatureId::new(1), 0);
        let exit_point = RoadPoint::new(FeatureId::new(1), 3);
        let joint_a = Joint::new([enter_point, RoadPoint::new(FeatureId::new(2), 0)]);
        let joint_b = Joint::new([exit_point, RoadPoint::new(FeatureId::new(3), 0)]);
        let graph = IndexGraph::import(vec![joint_a, joint_b]);

        let start = graph.joint_for(enter_point).unwrap();
        let distances = dijkstra_wave(&graph, &road_infos, &FixedCostEstimator, start, |_| false);
        let end = graph.joint_for(exit_point).unwrap();
        assert_eq!(distances.get(&end).copied(), Some(3.0));
    }

    #[test]
    fn unreachable_exit_has_no_entry_in_the_distance_map() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        let info = RoadInfo::new(points.map(Junction::without_altitude), 100.0, false, VehicleMask::empty());
        let mut road_infos = HashMap::new();
        road_infos.insert(FeatureId::new(1), info);

        let enter_point = RoadPoint::new(FeatureId::new(1), 0);
        let joint_a = Joint::new([enter_point, RoadPoint::new(FeatureId::new(2), 0)]);
        let unreachable = RoadPoint::new(FeatureId::new(9), 0);
        let joint_b = Joint::new([unreachable, RoadPoint::new(FeatureId::new(10), 0)]);
        let graph = IndexGraph::import(vec![joint_a, joint_b]);

        let start = graph.joint_for(enter_point).unwrap();
        let distances = dijkstra_wave(&graph, &road_infos, &FixedCostEstimator, start, |_| false);
        let unreachable_joint = graph.joint_for(unreachable).unwrap();
        assert!(!distances.contains_key(&unreachable_joint));
    }
}
