//! Per-feature routing attributes, shared by every edge cut from that feature.

use smallvec::SmallVec;

use crate::geometry::Junction;
use crate::vehicle::VehicleMask;

/// Inline capacity for a feature's junction polyline before it spills to the
/// heap. Most roads are short polylines; this keeps the common case
/// allocation-free without bounding the rare long one.
const INLINE_JUNCTIONS: usize = 32;

/// Routing attributes derived once per feature by the bridge (§4.1) and
/// shared by every [`crate::edge::Edge`] cut from its polyline.
#[derive(Debug, Clone)]
pub struct RoadInfo {
    junctions: SmallVec<[Junction; INLINE_JUNCTIONS]>,
    speed_kmph: f64,
    one_way: bool,
    road_mask: VehicleMask,
}

impl RoadInfo {
    #[must_use]
    pub fn new(junctions: impl IntoIterator<Item = Junction>, speed_kmph: f64, one_way: bool, road_mask: VehicleMask) -> Self {
        Self {
            junctions: junctions.into_iter().collect(),
            speed_kmph,
            one_way,
            road_mask,
        }
    }

    /// The feature's polyline, in the order it was parsed from the source
    /// geometry.
    #[must_use]
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.junctions.len()
    }

    /// Speed in km/h applicable to the vehicle the bridge was built for.
    #[must_use]
    pub fn speed_kmph(&self) -> f64 {
        self.speed_kmph
    }

    /// Whether this road only permits travel in its stored direction.
    #[must_use]
    pub fn is_one_way(&self) -> bool {
        self.one_way
    }

    /// The vehicles this road is open to at all.
    #[must_use]
    pub fn road_mask(&self) -> VehicleMask {
        self.road_mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::vehicle::VehicleType;

    #[test]
    fn junctions_preserve_parse_order() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        let info = RoadInfo::new(points.iter().map(|p| Junction::without_altitude(*p)), 50.0, false, VehicleMask::empty());
        assert_eq!(info.point_count(), 3);
        assert_eq!(info.junctions()[1].point, points[1]);
    }

    #[test]
    fn road_mask_reports_permitted_vehicles() {
        let mask: VehicleMask = [VehicleType::Car].into_iter().collect();
        let info = RoadInfo::new([], 90.0, true, mask);
        assert!(info.road_mask().contains(VehicleType::Car));
        assert!(!info.road_mask().contains(VehicleType::Pedestrian));
        assert!(info.is_one_way());
    }
}
