//! The in-memory routable graph at the heart of an offline map navigation
//! stack: a road graph abstraction, the cross-tile connectivity layer, and
//! the index-building pipeline that turns raw map features into a compact
//! routable graph. No I/O and no knowledge of any concrete tile format;
//! those live behind the traits in [`feature`], [`border`], and [`archive`].

pub mod archive;
pub mod border;
pub mod bridge;
pub mod cross_mwm;
pub mod edge;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod index_graph;
pub mod road_graph;
pub mod road_info;
pub mod vehicle;

pub use archive::Archive;
pub use border::{BorderLoader, Region};
pub use bridge::VehicleClassificationBridge;
pub use cross_mwm::{CrossMwmConnector, CrossMwmConnectorBuilder, CrossMwmConnectorSerializer, CrossMwmTransition, Segment, NO_ROUTE};
pub use edge::Edge;
pub use error::{ArchiveError, BorderLoadError, BridgeError, CrossMwmBuildError, IndexGraphBuildError};
pub use feature::{EdgeEstimator, Feature, FeatureId, FeatureSource, RoadPoint, VehicleModel, VehicleModelFactory};
pub use geometry::{Junction, Point};
pub use index_graph::{IndexGraph, IndexGraphBuilder, IndexGraphSerializer, Joint, JointId};
pub use road_graph::{InMemoryRoadGraph, Mode, RoadGraph};
pub use road_info::RoadInfo;
pub use vehicle::{VehicleMask, VehicleType};
