//! The geometry-&-model bridge (§4.1): turns one feature into a vehicle
//! classification verdict and a polyline of junctions with altitudes.

use crate::error::BridgeError;
use crate::feature::{Feature, VehicleModel, VehicleModelFactory};
use crate::geometry::{interpolate_altitude, Junction, Point};
use crate::road_info::RoadInfo;
use crate::vehicle::{VehicleMask, VehicleType};

/// Resolves the three per-vehicle models for one country and exposes the
/// classification operations every other component builds on.
///
/// Stateless after construction: `classify_road`/`classify_oneway`/`max_speed`
/// take no `&mut self`, so one bridge may be shared across concurrent
/// callers (§4.1: "must be callable concurrently").
pub struct VehicleClassificationBridge<M: VehicleModel> {
    models: [M; 3],
}

impl<M: VehicleModel> VehicleClassificationBridge<M> {
    /// Builds a bridge for `country`, resolving all three vehicle models
    /// through `factory`. Fails if any model is unavailable (§4.1, §7
    /// Missing-model).
    pub fn new<F>(factory: &F, country: &str) -> Result<Self, BridgeError>
    where
        F: VehicleModelFactory<Model = M>,
    {
        let mut models: Vec<M> = Vec::with_capacity(3);
        for vehicle in VehicleType::ALL {
            let model = factory
                .model_for(vehicle, country)
                .ok_or_else(|| BridgeError::MissingModel { vehicle, country: country.to_owned() })?;
            models.push(model);
        }
        let models: [M; 3] = models
            .try_into()
            .unwrap_or_else(|_| unreachable!("exactly VehicleType::ALL.len() models were pushed"));
        Ok(Self { models })
    }

    fn model(&self, vehicle: VehicleType) -> &M {
        &self.models[VehicleType::ALL.iter().position(|v| *v == vehicle).expect("VehicleType::ALL is exhaustive")]
    }

    /// Sets each bit iff the corresponding vehicle model considers `feature`
    /// a road.
    #[must_use]
    pub fn classify_road(&self, feature: &dyn Feature) -> VehicleMask {
        VehicleType::ALL.into_iter().filter(|v| self.model(*v).is_road(feature)).collect()
    }

    /// Sets each bit iff the corresponding vehicle model treats `feature` as
    /// one-way.
    #[must_use]
    pub fn classify_oneway(&self, feature: &dyn Feature) -> VehicleMask {
        VehicleType::ALL.into_iter().filter(|v| self.model(*v).is_one_way(feature)).collect()
    }

    #[must_use]
    pub fn max_speed_kmph(&self, vehicle: VehicleType) -> f64 {
        self.model(vehicle).max_speed_kmph()
    }

    /// Parses `feature`'s geometry at `resolution` and builds the
    /// [`RoadInfo`] used by the road graph and index builder, for the given
    /// vehicle's speed/one-way semantics.
    ///
    /// Returns `Ok(None)` for a feature with zero points (§7: "Empty
    /// feature... silently skipped, not an error").
    pub fn build_road_info(&self, feature: &mut dyn Feature, resolution: u8, vehicle: VehicleType) -> Option<RoadInfo> {
        feature.parse_geometry(resolution);
        let count = feature.point_count();
        if count == 0 {
            return None;
        }

        let points: Vec<Point> = (0..count).map(|i| feature.point(i)).collect();
        let altitudes: Vec<_> = (0..count).map(|i| feature.altitude(i)).collect();
        let junctions = points.iter().zip(altitudes.iter()).map(|(p, a)| Junction::new(*p, *a));

        let road_mask = self.classify_road(feature);
        let model = self.model(vehicle);
        let one_way = model.is_one_way(feature);
        let speed = model.max_speed_kmph();

        Some(RoadInfo::new(junctions, speed, one_way, road_mask))
    }
}

/// Interpolated altitude for a projection point that falls `t` of the way
/// between the endpoints of one polyline segment.
#[must_use]
pub fn projection_altitude(segment_start: &Junction, segment_end: &Junction, t: f64) -> crate::geometry::Altitude {
    interpolate_altitude(segment_start.altitude, segment_end.altitude, t)
}
