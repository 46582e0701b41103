//! Point-to-segment projection, shared between closest-edge search and
//! fake-edge splitting: a cheap squared-distance estimator rather than a
//! true geodesic one, since both callers only need relative ordering and
//! a projection point.

use crate::bridge::projection_altitude;
use crate::edge::Edge;
use crate::feature::FeatureId;
use crate::geometry::{Junction, Point};

/// One result of [`crate::road_graph::RoadGraph::find_closest_edges`]: the
/// candidate edge plus the point on it nearest the query point.
#[derive(Debug, Clone, Copy)]
pub struct ClosestEdge {
    pub edge: Edge,
    pub projection: Junction,
    pub distance_squared: f64,
}

/// Projects `point` onto the segment `(start, end)`, returning the
/// projection as a [`Junction`] (altitude interpolated per §4.2) and the
/// squared distance from `point` to that projection.
#[must_use]
pub fn project_onto_segment(point: Point, start: &Junction, end: &Junction) -> (Junction, f64) {
    let dx = end.point.x - start.point.x;
    let dy = end.point.y - start.point.y;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq > 0.0 {
        ((((point.x - start.point.x) * dx) + ((point.y - start.point.y) * dy)) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let projected = Point::new(start.point.x + t * dx, start.point.y + t * dy);
    let altitude = projection_altitude(start, end, t);
    let junction = Junction::new(projected, altitude);
    let distance_squared = point.distance_squared(&projected);
    (junction, distance_squared)
}

/// Ranks candidate edges by squared distance from their projection to
/// `point`, ascending, tie-broken by `(feature_id, segment_index)`, and
/// truncates to `count`.
#[must_use]
pub fn rank_closest(mut candidates: Vec<ClosestEdge>, count: usize) -> Vec<ClosestEdge> {
    candidates.sort_by(|a, b| {
        a.distance_squared
            .partial_cmp(&b.distance_squared)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.edge.feature_id.cmp(&b.edge.feature_id))
            .then_with(|| a.edge.segment_index.cmp(&b.edge.segment_index))
    });
    candidates.truncate(count);
    candidates
}

/// Helper to build a [`ClosestEdge`] for one polyline segment of `feature_id`.
#[must_use]
pub fn closest_edge_for_segment(feature_id: FeatureId, segment_index: u32, start: &Junction, end: &Junction, point: Point) -> ClosestEdge {
    let (projection, distance_squared) = project_onto_segment(point, start, end);
    let edge = Edge::new(feature_id, true, false, segment_index, *start, *end);
    ClosestEdge { edge, projection, distance_squared }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::UNKNOWN_ALTITUDE;

    fn junction(x: f64, y: f64) -> Junction {
        Junction::without_altitude(Point::new(x, y))
    }

    #[test]
    fn projection_clamps_to_segment_endpoints() {
        let start = junction(0.0, 0.0);
        let end = junction(1.0, 0.0);
        let (projection, _) = project_onto_segment(Point::new(-5.0, 0.0), &start, &end);
        assert!(projection.point.almost_equal(&start.point));
    }

    #[test]
    fn projection_lands_at_perpendicular_foot() {
        let start = junction(0.0, 0.0);
        let end = junction(2.0, 0.0);
        let (projection, distance_squared) = project_onto_segment(Point::new(1.0, 1.0), &start, &end);
        assert!(projection.point.almost_equal(&Point::new(1.0, 0.0)));
        assert!((distance_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_altitude_propagates_through_projection() {
        let start = Junction::new(Point::new(0.0, 0.0), 10);
        let end = Junction::new(Point::new(1.0, 0.0), UNKNOWN_ALTITUDE);
        let (projection, _) = project_onto_segment(Point::new(0.5, 0.0), &start, &end);
        assert_eq!(projection.altitude, UNKNOWN_ALTITUDE);
    }

    #[test]
    fn rank_closest_orders_by_distance_then_tie_break() {
        let a = ClosestEdge {
            edge: Edge::new(FeatureId::new(2), true, false, 0, junction(0.0, 0.0), junction(1.0, 0.0)),
            projection: junction(0.0, 0.0),
            distance_squared: 1.0,
        };
        let b = ClosestEdge {
            edge: Edge::new(FeatureId::new(1), true, false, 0, junction(0.0, 0.0), junction(1.0, 0.0)),
            projection: junction(0.0, 0.0),
            distance_squared: 1.0,
        };
        let ranked = rank_closest(vec![a, b], 2);
        assert_eq!(ranked[0].edge.feature_id, FeatureId::new(1));
    }
}
