//! Planar geometry primitives shared by the road graph and the index builder.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Absolute epsilon used for point equality throughout the core.
///
/// Two points within this distance (independently on each axis) are treated
/// as the same location. This is intentionally generous about what counts
/// as "the same point" because feature geometry is re-derived from stored
/// tile coordinates and can pick up small rounding differences between
/// features that share a vertex.
pub const POINTS_EQUAL_EPSILON: f64 = 1e-6;

/// Number of bits of precision used to quantise a coordinate into a
/// [`LocationKey`]. This must match the tile format's own coordinate
/// resolution, since the location key is used as a coalescence key during
/// index graph building and any mismatch would silently split joints that
/// should have merged.
pub const POINT_COORD_BITS: u32 = 30;

/// A planar point in the map's projected coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Equality under [`POINTS_EQUAL_EPSILON`].
    #[must_use]
    pub fn almost_equal(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < POINTS_EQUAL_EPSILON && (self.y - other.y).abs() < POINTS_EQUAL_EPSILON
    }

    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Quantises this point into a 64-bit key at [`POINT_COORD_BITS`]
    /// resolution. Two points with the same key are considered coincident
    /// by the index graph builder (§4.3); this is the sole coalescence
    /// criterion there, deliberately without an epsilon comparison.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn location_key(&self) -> LocationKey {
        let scale = f64::from(1u32 << (POINT_COORD_BITS / 2));
        let qx = (self.x * scale).round() as i32;
        let qy = (self.y * scale).round() as i32;
        LocationKey((u64::from(qx as u32) << 32) | u64::from(qy as u32))
    }
}

/// A quantised location, used as a hash/ordering key for coalescing
/// coincident feature vertices into [`crate::index_graph::Joint`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationKey(u64);

/// Lexicographic ordering of points: `x` first, then `y`.
impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .partial_cmp(&other.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.y.partial_cmp(&other.y).unwrap_or(Ordering::Equal))
    }
}

/// Signed altitude in metres.
pub type Altitude = i32;

/// Sentinel value for an unknown altitude.
pub const UNKNOWN_ALTITUDE: Altitude = Altitude::MIN;

/// A node on the routing graph: a point with an (optionally unknown) altitude.
///
/// Identity is by [`Point`] under [`POINTS_EQUAL_EPSILON`]; altitude is
/// carried through for downstream consumers (e.g. elevation-aware costing)
/// but does not affect equality or ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Junction {
    pub point: Point,
    pub altitude: Altitude,
}

impl Junction {
    #[must_use]
    pub const fn new(point: Point, altitude: Altitude) -> Self {
        Self { point, altitude }
    }

    #[must_use]
    pub const fn without_altitude(point: Point) -> Self {
        Self {
            point,
            altitude: UNKNOWN_ALTITUDE,
        }
    }
}

impl PartialEq for Junction {
    fn eq(&self, other: &Self) -> bool {
        self.point.almost_equal(&other.point)
    }
}

impl Eq for Junction {}

impl PartialOrd for Junction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Junction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.point.cmp(&other.point)
    }
}

/// Linearly interpolates altitude between two endpoints at parameter `t`
/// (clamped to `[0, 1]`), falling back to [`UNKNOWN_ALTITUDE`] if either
/// endpoint's altitude is unknown.
#[must_use]
pub fn interpolate_altitude(a: Altitude, b: Altitude, t: f64) -> Altitude {
    if a == UNKNOWN_ALTITUDE || b == UNKNOWN_ALTITUDE {
        return UNKNOWN_ALTITUDE;
    }
    let t = t.clamp(0.0, 1.0);
    #[allow(clippy::cast_possible_truncation)]
    let interpolated = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
    interpolated.round() as Altitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn almost_equal_within_epsilon() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(1.0 + POINTS_EQUAL_EPSILON / 10.0, 2.0);
        assert!(a.almost_equal(&b));
    }

    #[test]
    fn not_almost_equal_outside_epsilon() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(1.0 + POINTS_EQUAL_EPSILON * 10.0, 2.0);
        assert!(!a.almost_equal(&b));
    }

    #[test]
    fn junction_equality_ignores_altitude() {
        let a = Junction::new(Point::new(1.0, 2.0), 100);
        let b = Junction::new(Point::new(1.0, 2.0), UNKNOWN_ALTITUDE);
        assert_eq!(a, b);
    }

    #[test]
    fn location_key_coalesces_coincident_vertices() {
        // Two features sharing vertex (1, 0) quantise to the same key.
        let a = Point::new(1.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert_eq!(a.location_key(), b.location_key());
    }

    #[test]
    fn location_key_distinguishes_distinct_vertices() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert_ne!(a.location_key(), b.location_key());
    }

    #[test]
    fn altitude_interpolation_midpoint() {
        assert_eq!(interpolate_altitude(0, 100, 0.5), 50);
    }

    #[test]
    fn altitude_interpolation_unknown_propagates() {
        assert_eq!(interpolate_altitude(UNKNOWN_ALTITUDE, 100, 0.5), UNKNOWN_ALTITUDE);
    }

    #[test]
    fn point_ordering_is_lexicographic() {
        let a = Point::new(0.0, 5.0);
        let b = Point::new(1.0, 0.0);
        assert!(a < b);
    }
}
