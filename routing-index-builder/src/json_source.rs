//! A minimal JSON-backed feature reader. A real deployment reads features
//! out of the map tile directly; this reference reader exists so the CLI and
//! its tests have something concrete to drive the core with (§6's feature
//! reader is an external collaborator, not part of the core).

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use routing_graph::geometry::Altitude;
use routing_graph::{Feature, FeatureId, FeatureSource, Point};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawFeature {
    points: Vec<[f64; 2]>,
    #[serde(default)]
    altitudes: Vec<Altitude>,
}

/// One feature's geometry, already parsed (§6: `parse_geometry` is a no-op
/// here since the whole file is read up front).
pub struct JsonFeature {
    points: Vec<Point>,
    altitudes: Vec<Altitude>,
}

impl Feature for JsonFeature {
    fn parse_geometry(&mut self, _resolution: u8) {}

    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    fn altitude(&self, index: usize) -> Altitude {
        self.altitudes.get(index).copied().unwrap_or(routing_graph::geometry::UNKNOWN_ALTITUDE)
    }
}

/// A tile's features, loaded wholesale from a JSON array of `{points,
/// altitudes}` objects.
pub struct JsonFeatureSource {
    features: Vec<RawFeature>,
}

impl JsonFeatureSource {
    /// # Errors
    /// Returns an error if `path` cannot be read or does not contain a JSON
    /// array of features.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let features: Vec<RawFeature> = serde_json::from_reader(reader)?;
        Ok(Self { features })
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

impl FeatureSource for JsonFeatureSource {
    type Feature = JsonFeature;

    fn for_each_feature(&self, visit: &mut dyn FnMut(&mut Self::Feature, FeatureId)) {
        for (index, raw) in self.features.iter().enumerate() {
            let mut feature = JsonFeature {
                points: raw.points.iter().map(|[x, y]| Point::new(*x, *y)).collect(),
                altitudes: raw.altitudes.clone(),
            };
            let feature_id = FeatureId::new(u32::try_from(index).expect("fewer than u32::MAX features per tile"));
            visit(&mut feature, feature_id);
        }
    }
}
