//! The cross-tile ("cross-MWM") connectivity layer (§4.4): border-crossing
//! detection, enter/exit classification, and precomputed leap weights.

pub mod builder;
pub mod serializer;

use serde::{Deserialize, Serialize};

use crate::feature::FeatureId;
use crate::geometry::Point;
use crate::vehicle::{VehicleMask, VehicleType};

pub use builder::CrossMwmConnectorBuilder;
pub use serializer::CrossMwmConnectorSerializer;

/// Sentinel recorded for an (enter, exit) pair with no path (§3, §7: "this
/// is normal data, not an error").
pub const NO_ROUTE: f64 = f64::INFINITY;

/// A directed single-step traversal between two adjacent feature vertices,
/// identified by feature and segment ordinal (§3 Glossary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub feature_id: FeatureId,
    pub segment_index: u32,
    pub forward: bool,
}

/// A directed border crossing (§3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CrossMwmTransition {
    pub feature_id: FeatureId,
    pub segment_index: u32,
    pub road_mask: VehicleMask,
    pub one_way_mask: VehicleMask,
    /// `true` if the feature enters this tile at this segment, `false` if
    /// it exits.
    pub enter_side: bool,
    pub point_on_inside: Point,
    pub point_on_outside: Point,
}

impl CrossMwmTransition {
    #[must_use]
    pub fn as_segment(&self) -> Segment {
        Segment { feature_id: self.feature_id, segment_index: self.segment_index, forward: self.enter_side }
    }

    #[must_use]
    pub fn permits(&self, vehicle: VehicleType) -> bool {
        self.road_mask.contains(vehicle)
    }
}

/// Per-vehicle enter/exit lists and the leap-weight table between them
/// (§3, §4.4).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossMwmConnector {
    vehicle: Option<VehicleType>,
    enters: Vec<Segment>,
    exits: Vec<Segment>,
    /// Row-major `enters.len() x exits.len()` weight matrix.
    weights: Vec<f64>,
}

impl CrossMwmConnector {
    #[must_use]
    pub fn new(vehicle: VehicleType) -> Self {
        Self { vehicle: Some(vehicle), enters: Vec::new(), exits: Vec::new(), weights: Vec::new() }
    }

    #[must_use]
    pub fn vehicle(&self) -> Option<VehicleType> {
        self.vehicle
    }

    #[must_use]
    pub fn enters(&self) -> &[Segment] {
        &self.enters
    }

    #[must_use]
    pub fn exits(&self) -> &[Segment] {
        &self.exits
    }

    pub fn push_enter(&mut self, segment: Segment) {
        self.enters.push(segment);
    }

    pub fn push_exit(&mut self, segment: Segment) {
        self.exits.push(segment);
    }

    #[must_use]
    pub fn weight(&self, enter_index: usize, exit_index: usize) -> f64 {
        self.weights.get(enter_index * self.exits.len() + exit_index).copied().unwrap_or(NO_ROUTE)
    }

    /// Fills the weight matrix by calling `lookup(enter_index, exit_index)`
    /// for every (enter, exit) pair (§4.4 step 3: `connector.fill_weights`).
    pub fn fill_weights(&mut self, mut lookup: impl FnMut(usize, usize) -> f64) {
        self.weights = Vec::with_capacity(self.enters.len() * self.exits.len());
        for enter_index in 0..self.enters.len() {
            for exit_index in 0..self.exits.len() {
                self.weights.push(lookup(enter_index, exit_index));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfilled_weight_reports_no_route() {
        let connector = CrossMwmConnector::new(VehicleType::Car);
        assert_eq!(connector.weight(0, 0), NO_ROUTE);
    }

    #[test]
    fn fill_weights_populates_row_major_matrix() {
        let mut connector = CrossMwmConnector::new(VehicleType::Car);
        connector.push_enter(Segment { feature_id: FeatureId::new(1), segment_index: 0, forward: true });
        connector.push_exit(Segment { feature_id: FeatureId::new(2), segment_index: 0, forward: false });
        connector.push_exit(Segment { feature_id: FeatureId::new(3), segment_index: 0, forward: false });
        connector.fill_weights(|enter, exit| (enter * 10 + exit) as f64);
        assert_eq!(connector.weight(0, 0), 0.0);
        assert_eq!(connector.weight(0, 1), 1.0);
    }

    #[test]
    fn transition_enter_exit_classification_matches_inside_outside_containment() {
        let transition = CrossMwmTransition {
            feature_id: FeatureId::new(1),
            segment_index: 0,
            road_mask: VehicleMask::empty(),
            one_way_mask: VehicleMask::empty(),
            enter_side: false,
            point_on_inside: Point::new(0.5, 0.9),
            point_on_outside: Point::new(0.5, 1.1),
        };
        assert!(!transition.enter_side);
    }
}
