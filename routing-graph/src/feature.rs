//! The external collaborators the core consumes (§6), plus the small
//! identifier types that tie them to graph structures.

use serde::{Deserialize, Serialize};

use crate::geometry::{Altitude, Point};
use crate::vehicle::VehicleMask;

/// An opaque identifier into a tile's feature table.
///
/// The all-ones value is reserved as "invalid"; an [`crate::edge::Edge`]
/// carrying an invalid `FeatureId` is a fake edge (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureId(u32);

impl FeatureId {
    pub const INVALID: FeatureId = FeatureId(u32::MAX);

    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Default for FeatureId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// A vertex identified by its owning feature and its ordinal on that
/// feature's polyline. The builder's unit of coalescence (§3, §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoadPoint {
    pub feature_id: FeatureId,
    pub point_index: u32,
}

impl RoadPoint {
    #[must_use]
    pub const fn new(feature_id: FeatureId, point_index: u32) -> Self {
        Self { feature_id, point_index }
    }
}

/// A single map feature, as exposed by the tile's feature reader.
///
/// This is an external collaborator (§6): the core only ever reads from it.
pub trait Feature {
    /// Parses the feature's geometry at the given resolution, making
    /// [`Feature::point_count`]/[`Feature::point`]/[`Feature::altitude`]
    /// available. Implementations may treat this as a no-op if geometry is
    /// always resident.
    fn parse_geometry(&mut self, resolution: u8);

    /// Number of vertices on the feature's polyline.
    fn point_count(&self) -> usize;

    /// The vertex at `index`, valid only after [`Feature::parse_geometry`].
    fn point(&self, index: usize) -> Point;

    /// The altitude at `index`, or [`crate::geometry::UNKNOWN_ALTITUDE`] if
    /// unavailable.
    fn altitude(&self, index: usize) -> Altitude;
}

/// Iterates the features of one tile.
///
/// An external collaborator (§6). Implementations decide how features are
/// stored and fetched; the core only needs sequential, deterministic
/// iteration (§5: "the feature iteration order, which the feature reader
/// defines deterministically").
pub trait FeatureSource {
    type Feature: Feature;

    /// Invokes `visit` once per feature in this tile, in the reader's
    /// deterministic order, passing the feature and its [`FeatureId`].
    fn for_each_feature(&self, visit: &mut dyn FnMut(&mut Self::Feature, FeatureId));
}

/// A single vehicle's classification model for one country.
///
/// An external collaborator (§4.1, §6): the bridge fails to construct if a
/// country is missing a model for any [`crate::vehicle::VehicleType`].
pub trait VehicleModel {
    fn is_road(&self, feature: &dyn Feature) -> bool;
    fn is_one_way(&self, feature: &dyn Feature) -> bool;
    fn max_speed_kmph(&self) -> f64;
}

/// Produces the three per-vehicle models for a given country.
///
/// An external collaborator (§4.1): "construction of the bridge requires
/// all three and fails if any is missing."
pub trait VehicleModelFactory {
    type Model: VehicleModel;

    /// Returns `None` if this country has no model for this vehicle type.
    fn model_for(&self, vehicle: crate::vehicle::VehicleType, country: &str) -> Option<Self::Model>;
}

/// Per-feature routing metadata computed by the bridge (§4.1): a
/// classification verdict plus the max speed available for that profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationVerdict {
    pub road_mask: VehicleMask,
    pub one_way_mask: VehicleMask,
}

/// Supplies edge weights to the cross-tile leap-weight builder (§4.4, §6).
///
/// An external collaborator: "Edge weights come from the `EdgeEstimator`
/// (external)."
pub trait EdgeEstimator {
    /// The cost of traversing `edge` starting the transition from `from`
    /// (in the sense of a transition penalty) to `to`. Must be
    /// non-negative (§4.4: "Negative weights are forbidden").
    fn weight(&self, from: &crate::edge::Edge, to: &crate::edge::Edge, edge: &crate::edge::Edge) -> f64;

    fn max_speed_kmph(&self) -> f64;
}
