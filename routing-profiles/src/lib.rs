//! Reference implementations of the vehicle-model and edge-estimator
//! collaborators the routing core consumes (§6), one per profile, grounded
//! on the same cost-accumulation shape as a traversal costing module: an
//! `edge_cost` derived from length and speed, with no transition penalty.
//!
//! The core's `Feature` trait (§6) only exposes geometry accessors, not tag
//! data, so these models classify purely from point count rather than road
//! class/highway tags a real feature reader would carry. See DESIGN.md for
//! the reasoning.

use routing_graph::{Edge, Feature, Junction, VehicleModel};

/// Speed and classification constants for one vehicle profile.
#[derive(Debug, Clone, Copy)]
struct ProfileConstants {
    max_speed_kmph: f64,
    one_way_by_default: bool,
}

/// A feature is considered a road for any profile as long as it has at
/// least two points (§7: the zero-point case is handled upstream as
/// "empty feature", not here).
fn has_geometry(feature: &dyn Feature) -> bool {
    feature.point_count() >= 2
}

macro_rules! profile_model {
    ($name:ident, $max_speed:expr, $one_way_by_default:expr) => {
        #[doc = concat!("Vehicle model for the ", stringify!($name), " profile.")]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            const CONSTANTS: ProfileConstants = ProfileConstants {
                max_speed_kmph: $max_speed,
                one_way_by_default: $one_way_by_default,
            };
        }

        impl VehicleModel for $name {
            fn is_road(&self, feature: &dyn Feature) -> bool {
                has_geometry(feature)
            }

            fn is_one_way(&self, feature: &dyn Feature) -> bool {
                has_geometry(feature) && Self::CONSTANTS.one_way_by_default
            }

            fn max_speed_kmph(&self) -> f64 {
                Self::CONSTANTS.max_speed_kmph
            }
        }
    };
}

profile_model!(PedestrianModel, 5.0, false);
profile_model!(BicycleModel, 20.0, false);
profile_model!(CarModel, 130.0, true);

/// Resolves the three profile models for any country: this reference
/// implementation is not country-specialised (§4.1 still requires a
/// country-keyed factory; this one ignores the key).
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformVehicleModelFactory;

/// The concrete model type handed back by [`UniformVehicleModelFactory`].
#[derive(Debug, Clone, Copy)]
pub enum Profile {
    Pedestrian(PedestrianModel),
    Bicycle(BicycleModel),
    Car(CarModel),
}

impl VehicleModel for Profile {
    fn is_road(&self, feature: &dyn Feature) -> bool {
        match self {
            Profile::Pedestrian(m) => m.is_road(feature),
            Profile::Bicycle(m) => m.is_road(feature),
            Profile::Car(m) => m.is_road(feature),
        }
    }

    fn is_one_way(&self, feature: &dyn Feature) -> bool {
        match self {
            Profile::Pedestrian(m) => m.is_one_way(feature),
            Profile::Bicycle(m) => m.is_one_way(feature),
            Profile::Car(m) => m.is_one_way(feature),
        }
    }

    fn max_speed_kmph(&self) -> f64 {
        match self {
            Profile::Pedestrian(m) => m.max_speed_kmph(),
            Profile::Bicycle(m) => m.max_speed_kmph(),
            Profile::Car(m) => m.max_speed_kmph(),
        }
    }
}

impl routing_graph::VehicleModelFactory for UniformVehicleModelFactory {
    type Model = Profile;

    fn model_for(&self, vehicle: routing_graph::VehicleType, _country: &str) -> Option<Profile> {
        Some(match vehicle {
            routing_graph::VehicleType::Pedestrian => Profile::Pedestrian(PedestrianModel),
            routing_graph::VehicleType::Bicycle => Profile::Bicycle(BicycleModel),
            routing_graph::VehicleType::Car => Profile::Car(CarModel),
        })
    }
}

/// Straight-line-length-over-speed edge estimator, the simplest cost shape
/// that still respects §4.4's "negative weights are forbidden" and gives
/// every edge a strictly positive cost.
#[derive(Debug, Clone, Copy)]
pub struct SpeedBasedEdgeEstimator {
    max_speed_kmph: f64,
}

impl SpeedBasedEdgeEstimator {
    #[must_use]
    pub const fn new(max_speed_kmph: f64) -> Self {
        Self { max_speed_kmph }
    }

    fn edge_length_metres(edge: &Edge) -> f64 {
        distance_metres(&edge.start_junction, &edge.end_junction)
    }
}

fn distance_metres(a: &Junction, b: &Junction) -> f64 {
    a.point.distance_squared(&b.point).sqrt()
}

impl routing_graph::feature::EdgeEstimator for SpeedBasedEdgeEstimator {
    fn weight(&self, _from: &Edge, _to: &Edge, edge: &Edge) -> f64 {
        let length = Self::edge_length_metres(edge);
        let speed_metres_per_sec = self.max_speed_kmph / 3.6;
        length / speed_metres_per_sec
    }

    fn max_speed_kmph(&self) -> f64 {
        self.max_speed_kmph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routing_graph::{FeatureId, Point};

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

        fn altitude(&self, _index: usize) -> routing_graph::geometry::Altitude {
            routing_graph::geometry::UNKNOWN_ALTITUDE
        }
    }

    #[test]
    fn car_model_is_one_way_by_default_pedestrian_is_not() {
        let feature = StubFeature { points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)] };
        assert!(CarModel.is_one_way(&feature));
        assert!(!PedestrianModel.is_one_way(&feature));
    }

    #[test]
    fn empty_geometry_is_never_a_road() {
        let feature = StubFeature { points: vec![] };
        assert!(!CarModel.is_road(&feature));
    }

    #[test]
    fn car_max_speed_exceeds_bicycle_and_pedestrian() {
        assert!(CarModel.max_speed_kmph() > BicycleModel.max_speed_kmph());
        assert!(BicycleModel.max_speed_kmph() > PedestrianModel.max_speed_kmph());
    }

    #[test]
    fn estimator_weight_is_positive_and_scales_with_length() {
        let estimator = SpeedBasedEdgeEstimator::new(36.0); // 10 m/s
        let short = Edge::new(FeatureId::new(1), true, false, 0, Junction::without_altitude(Point::new(0.0, 0.0)), Junction::without_altitude(Point::new(10.0, 0.0)));
        let long = Edge::new(FeatureId::new(1), true, false, 0, Junction::without_altitude(Point::new(0.0, 0.0)), Junction::without_altitude(Point::new(100.0, 0.0)));
        let short_weight = estimator.weight(&short, &short, &short);
        let long_weight = estimator.weight(&long, &long, &long);
        assert!(short_weight > 0.0);
        assert!(long_weight > short_weight);
        assert!((short_weight - 1.0).abs() < 1e-9);
    }
}
